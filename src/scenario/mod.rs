pub mod chaos;
pub mod context;
pub mod hooks;
pub mod registry;
pub mod runner;
pub mod world;

pub use chaos::ChaosPolicy;
pub use context::{Attachment, ScenarioContext, ScenarioStatus};
pub use registry::{ResolvedStep, StepArgs, StepKeyword, StepRegistry};
pub use runner::{SuiteRunner, SuiteSummary};
pub use world::World;

/// One declarative line of a scenario, bound to a handler at run time.
#[derive(Debug, Clone)]
pub struct ScenarioStep {
    pub keyword: StepKeyword,
    pub text: String,
}

/// One executable test case: an ordered sequence of steps plus tags.
#[derive(Debug, Clone)]
pub struct Scenario {
    pub name: String,
    pub tags: Vec<String>,
    pub steps: Vec<ScenarioStep>,
}

impl Scenario {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tags: Vec::new(),
            steps: Vec::new(),
        }
    }

    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    pub fn given(self, text: impl Into<String>) -> Self {
        self.step(StepKeyword::Given, text)
    }

    pub fn when(self, text: impl Into<String>) -> Self {
        self.step(StepKeyword::When, text)
    }

    pub fn then(self, text: impl Into<String>) -> Self {
        self.step(StepKeyword::Then, text)
    }

    pub fn step(mut self, keyword: StepKeyword, text: impl Into<String>) -> Self {
        self.steps.push(ScenarioStep {
            keyword,
            text: text.into(),
        });
        self
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_preserves_step_order() {
        let scenario = Scenario::new("Login with valid credentials")
            .given("I am on the login page")
            .when("I click the login button")
            .then("I should be redirected to the dashboard page");

        assert_eq!(scenario.steps.len(), 3);
        assert_eq!(scenario.steps[0].keyword, StepKeyword::Given);
        assert_eq!(
            scenario.steps[2].text,
            "I should be redirected to the dashboard page"
        );
    }

    #[test]
    fn tags_are_queryable() {
        let scenario = Scenario::new("First page count").tag("flaky");
        assert!(scenario.has_tag("flaky"));
        assert!(!scenario.has_tag("dynamic"));
    }
}
