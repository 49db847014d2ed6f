pub mod auth;
pub mod dashboard;
pub mod project;

use crate::core::BrowserTrait;
use crate::errors::Result;
use crate::scenario::{Scenario, StepRegistry};

/// Registers every feature area's bindings into one registry. Matching runs
/// over the union, so a phrase claimed by two areas is caught as ambiguous
/// during suite validation.
pub fn register_all<B: BrowserTrait>(registry: &mut StepRegistry<B>) -> Result<()> {
    auth::register(registry)?;
    dashboard::register(registry)?;
    project::register(registry)?;
    Ok(())
}

/// The built-in suite for the QA sandbox application.
pub fn default_suite() -> Vec<Scenario> {
    vec![
        Scenario::new("Login with valid credentials")
            .given("I am on the login page")
            .when("I enter username \"testuser\" and password \"password123\"")
            .when("I click the login button")
            .then("I should be redirected to the dashboard page")
            .then("I should see the project list"),
        Scenario::new("Login with empty credentials shows validation errors")
            .given("I am on the login page")
            .when("I enter username \"\" and password \"\"")
            .when("I click the login button")
            .then("I should see validation errors")
            .then("I should remain on the login page"),
        Scenario::new("Dashboard shows the seeded project grid")
            .given("I am logged in to the application")
            .given("I am on the dashboard page")
            .then("I should see the project table")
            .then("I should see project data loaded")
            .then("I should see pagination controls"),
        Scenario::new("Add Project button works despite its dynamic id")
            .tag("dynamic")
            .given("I am logged in to the application")
            .given("I am on the dashboard page")
            .then("I should see the \"Add Project\" button with a dynamic ID")
            .then("the button should be clickable regardless of ID changes")
            .when("I click the \"Add Project\" button")
            .then("I should be redirected to the add project page"),
        Scenario::new("Create a project from the form")
            .given("I am logged in to the application")
            .given("I am on the add project page")
            .when("I enter project name \"Orbital Launch Tracker\"")
            .when("I select status \"On Track\"")
            .when("I enter lead name \"Ada Park\"")
            .when("I click the create project button")
            .then("I should see a success message")
            .then("I should see the new project in the project list"),
        Scenario::new("Reject a too-short project name")
            .given("I am logged in to the application")
            .given("I am on the add project page")
            .when("I enter project name \"ab\"")
            .when("I select status \"On Track\"")
            .when("I enter lead name \"Ada Park\"")
            .when("I click the create project button")
            .then("I should see validation errors for minimum length")
            .then("I should remain on the add project page"),
        Scenario::new("First page shows the expected project count")
            .tag("flaky")
            .given("I am logged in to the application")
            .given("I am on the dashboard page")
            .then("I should see project data loaded")
            .then("I should see exactly 10 projects on the first page"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockBrowser;

    /// Every step of every built-in scenario must resolve to exactly one
    /// binding; this is the ambiguity check the runner performs before a
    /// session exists.
    #[test]
    fn every_suite_step_resolves_unambiguously() {
        let mut registry: StepRegistry<MockBrowser> = StepRegistry::new();
        register_all(&mut registry).unwrap();

        for scenario in default_suite() {
            for step in &scenario.steps {
                registry
                    .resolve(&step.text)
                    .unwrap_or_else(|e| panic!("{}: {e}", scenario.name));
            }
        }
    }

    #[test]
    fn suite_covers_all_three_feature_areas() {
        let suite = default_suite();
        assert!(suite.iter().any(|s| s.name.contains("Login")));
        assert!(suite.iter().any(|s| s.name.contains("Dashboard")));
        assert!(suite.iter().any(|s| s.name.contains("project")));
        assert!(suite.iter().any(|s| s.has_tag("flaky")));
    }
}
