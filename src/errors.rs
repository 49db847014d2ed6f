use thiserror::Error;

#[derive(Error, Debug)]
pub enum HarnessError {
    #[error("Unsupported browser: {0}")]
    UnsupportedBrowser(String),

    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    #[error("Browser session already initialized")]
    AlreadyInitialized,

    #[error("Browser session not initialized")]
    SessionNotInitialized,

    #[error("Browser launch failed: {0}")]
    LaunchFailed(String),

    #[error("Browser not launched")]
    BrowserNotLaunched,

    #[error("Tab creation failed: {0}")]
    TabCreationFailed(String),

    #[error("Navigation failed: {0}")]
    NavigationFailed(String),

    #[error("Element not found: {locator} (waited {waited_ms}ms)")]
    ElementNotFound { locator: String, waited_ms: u64 },

    #[error("Condition not met within {waited_ms}ms: {condition}")]
    WaitTimedOut { condition: String, waited_ms: u64 },

    #[error("JavaScript execution failed: {0}")]
    JavaScriptFailed(String),

    #[error("Screenshot failed: {0}")]
    ScreenshotFailed(String),

    #[error("No step binding matches: {0}")]
    StepUndefined(String),

    #[error("Ambiguous step {text:?}: matched by {patterns:?}")]
    StepAmbiguous { text: String, patterns: Vec<String> },

    #[error("Assertion failed: {0}")]
    AssertionFailed(String),

    #[error("Injected failure: {0}")]
    ChaosInjected(String),

    #[error("Browser engine error: {0}")]
    EngineError(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl HarnessError {
    /// True for failures the suite injects on purpose (the chaos step), so
    /// reporting can keep them apart from genuine regressions.
    pub fn is_expected_flaky(&self) -> bool {
        matches!(self, HarnessError::ChaosInjected(_))
    }
}

pub type Result<T> = std::result::Result<T, HarnessError>;

// The browser engine crate surfaces anyhow errors.
impl From<anyhow::Error> for HarnessError {
    fn from(err: anyhow::Error) -> Self {
        HarnessError::EngineError(err.to_string())
    }
}
