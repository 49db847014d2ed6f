pub mod collector;
pub mod event;
pub mod sink;

pub use collector::{StepRecord, TelemetryCollector, TimingReport};
pub use event::StepEvent;
pub use sink::{ConsoleSink, EventSink};
