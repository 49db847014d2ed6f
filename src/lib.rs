pub mod actions;
pub mod browser;
pub mod core;
pub mod errors;
pub mod scenario;
pub mod steps;
pub mod telemetry;
pub mod testing;

pub use actions::{ActionLibrary, Locator};
pub use browser::{ChromeBrowser, SessionManager};
pub use core::{BrowserKind, BrowserTrait, Config};
pub use errors::{HarnessError, Result};
pub use scenario::{Scenario, ScenarioContext, StepRegistry, SuiteRunner, SuiteSummary, World};
pub use telemetry::{ConsoleSink, EventSink, StepEvent, TelemetryCollector};
