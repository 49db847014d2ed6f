use crate::core::BrowserTrait;
use crate::errors::{HarnessError, Result};
use crate::scenario::world::World;
use regex::Regex;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepKeyword {
    Given,
    When,
    Then,
}

impl fmt::Display for StepKeyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StepKeyword::Given => write!(f, "Given"),
            StepKeyword::When => write!(f, "When"),
            StepKeyword::Then => write!(f, "Then"),
        }
    }
}

/// Captured placeholder values for one matched step.
#[derive(Debug, Clone)]
pub struct StepArgs {
    values: Vec<String>,
}

impl StepArgs {
    pub fn new(values: Vec<String>) -> Self {
        Self { values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn string(&self, index: usize) -> Result<&str> {
        self.values
            .get(index)
            .map(String::as_str)
            .ok_or_else(|| {
                HarnessError::ConfigurationError(format!("step argument {index} missing"))
            })
    }

    pub fn int(&self, index: usize) -> Result<i64> {
        let raw = self.string(index)?;
        raw.parse().map_err(|_| {
            HarnessError::ConfigurationError(format!("step argument {index} is not an integer: {raw}"))
        })
    }
}

/// A step pattern with `{string}` / `{int}` placeholders, compiled to an
/// anchored regex. `{string}` matches a double-quoted literal in the step
/// text; `{int}` matches a signed integer.
#[derive(Debug)]
pub struct StepPattern {
    source: String,
    regex: Regex,
}

impl StepPattern {
    pub fn compile(source: &str) -> Result<Self> {
        let mut pattern = String::from("^");
        let mut rest = source;
        while let Some(idx) = rest.find('{') {
            pattern.push_str(&regex::escape(&rest[..idx]));
            let tail = &rest[idx..];
            if let Some(after) = tail.strip_prefix("{string}") {
                pattern.push_str("\"([^\"]*)\"");
                rest = after;
            } else if let Some(after) = tail.strip_prefix("{int}") {
                pattern.push_str("(-?\\d+)");
                rest = after;
            } else {
                return Err(HarnessError::ConfigurationError(format!(
                    "unknown placeholder in step pattern: {source}"
                )));
            }
        }
        pattern.push_str(&regex::escape(rest));
        pattern.push('$');

        let regex = Regex::new(&pattern)
            .map_err(|e| HarnessError::ConfigurationError(format!("bad step pattern: {e}")))?;
        Ok(Self {
            source: source.to_string(),
            regex,
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn match_text(&self, text: &str) -> Option<StepArgs> {
        self.regex.captures(text).map(|caps| {
            let values = caps
                .iter()
                .skip(1)
                .map(|m| m.map(|m| m.as_str().to_string()).unwrap_or_default())
                .collect();
            StepArgs::new(values)
        })
    }
}

pub type StepFuture = Pin<Box<dyn Future<Output = Result<()>> + Send>>;
pub type StepHandler<B> = Arc<dyn Fn(Arc<World<B>>, StepArgs) -> StepFuture + Send + Sync>;

struct StepBinding<B: BrowserTrait> {
    #[allow(dead_code)]
    keyword: StepKeyword,
    pattern: StepPattern,
    handler: StepHandler<B>,
}

/// A step text matched to exactly one handler, with its captured arguments.
pub struct ResolvedStep<B: BrowserTrait> {
    pub pattern: String,
    pub handler: StepHandler<B>,
    pub args: StepArgs,
}

impl<B: BrowserTrait> std::fmt::Debug for ResolvedStep<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolvedStep")
            .field("pattern", &self.pattern)
            .field("args", &self.args)
            .finish_non_exhaustive()
    }
}

/// Maps declarative scenario phrases to handlers.
///
/// The Given/When/Then keyword is registration-time documentation; matching
/// runs over the union of all bindings, and a text matched by more than one
/// binding is an authoring error surfaced before any scenario runs.
pub struct StepRegistry<B: BrowserTrait> {
    bindings: Vec<StepBinding<B>>,
}

impl<B: BrowserTrait> StepRegistry<B> {
    pub fn new() -> Self {
        Self {
            bindings: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn given<F>(&mut self, pattern: &str, handler: F) -> Result<()>
    where
        F: Fn(Arc<World<B>>, StepArgs) -> StepFuture + Send + Sync + 'static,
    {
        self.register(StepKeyword::Given, pattern, handler)
    }

    pub fn when<F>(&mut self, pattern: &str, handler: F) -> Result<()>
    where
        F: Fn(Arc<World<B>>, StepArgs) -> StepFuture + Send + Sync + 'static,
    {
        self.register(StepKeyword::When, pattern, handler)
    }

    pub fn then<F>(&mut self, pattern: &str, handler: F) -> Result<()>
    where
        F: Fn(Arc<World<B>>, StepArgs) -> StepFuture + Send + Sync + 'static,
    {
        self.register(StepKeyword::Then, pattern, handler)
    }

    pub fn register<F>(&mut self, keyword: StepKeyword, pattern: &str, handler: F) -> Result<()>
    where
        F: Fn(Arc<World<B>>, StepArgs) -> StepFuture + Send + Sync + 'static,
    {
        let pattern = StepPattern::compile(pattern)?;
        self.bindings.push(StepBinding {
            keyword,
            pattern,
            handler: Arc::new(handler),
        });
        Ok(())
    }

    /// Finds the single binding matching `text`. Zero matches is
    /// `StepUndefined`; several is `StepAmbiguous` with every offender named.
    pub fn resolve(&self, text: &str) -> Result<ResolvedStep<B>> {
        let mut matches: Vec<(&StepBinding<B>, StepArgs)> = self
            .bindings
            .iter()
            .filter_map(|b| b.pattern.match_text(text).map(|args| (b, args)))
            .collect();

        match matches.len() {
            0 => Err(HarnessError::StepUndefined(text.to_string())),
            1 => {
                let (binding, args) = matches.remove(0);
                Ok(ResolvedStep {
                    pattern: binding.pattern.source().to_string(),
                    handler: Arc::clone(&binding.handler),
                    args,
                })
            }
            _ => Err(HarnessError::StepAmbiguous {
                text: text.to_string(),
                patterns: matches
                    .iter()
                    .map(|(b, _)| b.pattern.source().to_string())
                    .collect(),
            }),
        }
    }
}

impl<B: BrowserTrait> Default for StepRegistry<B> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockBrowser;

    fn noop_handler(_: Arc<World<MockBrowser>>, _: StepArgs) -> StepFuture {
        Box::pin(async { Ok(()) })
    }

    #[test]
    fn string_placeholder_captures_quoted_literal() {
        let pattern = StepPattern::compile("I enter project name {string}").unwrap();
        let args = pattern
            .match_text("I enter project name \"Orbital Launch Tracker\"")
            .unwrap();
        assert_eq!(args.string(0).unwrap(), "Orbital Launch Tracker");
    }

    #[test]
    fn int_placeholder_captures_signed_integer() {
        let pattern =
            StepPattern::compile("I should see exactly {int} projects on the first page").unwrap();
        let args = pattern
            .match_text("I should see exactly 10 projects on the first page")
            .unwrap();
        assert_eq!(args.int(0).unwrap(), 10);
    }

    #[test]
    fn mixed_placeholders_capture_in_order() {
        let pattern =
            StepPattern::compile("I enter username {string} and password {string}").unwrap();
        let args = pattern
            .match_text("I enter username \"testuser\" and password \"password123\"")
            .unwrap();
        assert_eq!(args.len(), 2);
        assert_eq!(args.string(0).unwrap(), "testuser");
        assert_eq!(args.string(1).unwrap(), "password123");
    }

    #[test]
    fn matching_is_anchored() {
        let pattern = StepPattern::compile("I click the login button").unwrap();
        assert!(pattern.match_text("I click the login button").is_some());
        assert!(pattern
            .match_text("I click the login button twice")
            .is_none());
    }

    #[test]
    fn literal_regex_metacharacters_are_escaped() {
        let pattern = StepPattern::compile("the grid (first page) loads").unwrap();
        assert!(pattern.match_text("the grid (first page) loads").is_some());
        assert!(pattern.match_text("the grid first page loads").is_none());
    }

    #[test]
    fn unknown_placeholder_is_rejected() {
        let err = StepPattern::compile("I wait {float} seconds").unwrap_err();
        assert!(matches!(err, HarnessError::ConfigurationError(_)));
    }

    #[test]
    fn resolve_rejects_undefined_steps() {
        let registry: StepRegistry<MockBrowser> = StepRegistry::new();
        let err = registry.resolve("I do something unheard of").unwrap_err();
        assert!(matches!(err, HarnessError::StepUndefined(_)));
    }

    #[test]
    fn resolve_rejects_ambiguous_steps() {
        let mut registry: StepRegistry<MockBrowser> = StepRegistry::new();
        registry
            .when("I click the {string} button", noop_handler)
            .unwrap();
        registry
            .when("I click the \"Add Project\" button", noop_handler)
            .unwrap();

        let err = registry
            .resolve("I click the \"Add Project\" button")
            .unwrap_err();
        match err {
            HarnessError::StepAmbiguous { patterns, .. } => assert_eq!(patterns.len(), 2),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn resolve_returns_the_single_match_with_args() {
        let mut registry: StepRegistry<MockBrowser> = StepRegistry::new();
        registry
            .when("I enter lead name {string}", noop_handler)
            .unwrap();

        let resolved = registry.resolve("I enter lead name \"Ada Park\"").unwrap();
        assert_eq!(resolved.pattern, "I enter lead name {string}");
        assert_eq!(resolved.args.string(0).unwrap(), "Ada Park");
    }
}
