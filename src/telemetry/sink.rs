use crate::errors::Result;
use crate::telemetry::event::StepEvent;
use tracing::{info, warn};

/// Subscriber to step-completion events. The runner fans every event out to
/// all registered sinks; persistence, logging and any future consumers stay
/// decoupled from step execution.
pub trait EventSink: Send + Sync {
    fn on_step_finished(&self, event: &StepEvent);

    /// Called once at suite end, before the browser session is released.
    fn flush(&self) -> Result<()> {
        Ok(())
    }
}

/// Logs step outcomes as they happen.
pub struct ConsoleSink;

impl EventSink for ConsoleSink {
    fn on_step_finished(&self, event: &StepEvent) {
        if event.passed {
            info!(
                scenario = %event.scenario,
                duration_ms = format_args!("{:.1}", event.duration_ms),
                "step passed: {}",
                event.step
            );
        } else if event.expected_flaky {
            warn!(
                scenario = %event.scenario,
                "step failed (expected-flaky): {}",
                event.step
            );
        } else {
            warn!(
                scenario = %event.scenario,
                duration_ms = format_args!("{:.1}", event.duration_ms),
                "step failed: {}",
                event.step
            );
        }
    }
}
