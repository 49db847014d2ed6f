use chrono::{DateTime, Utc};
use serde::Serialize;

/// Structured completion event the runner emits for every executed step,
/// passed or failed. Sinks decide what to keep.
#[derive(Debug, Clone, Serialize)]
pub struct StepEvent {
    pub scenario: String,
    pub step: String,
    pub duration_ms: f64,
    pub timestamp: DateTime<Utc>,
    pub passed: bool,
    /// Set when the failure came from the chaos step or a `@flaky`-tagged
    /// scenario, so reporting can separate designed instability from
    /// genuine regressions.
    pub expected_flaky: bool,
}
