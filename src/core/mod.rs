pub mod browser;
pub mod config;

pub use browser::BrowserTrait;
pub use config::{
    AppConfig, BrowserConfig, BrowserKind, ChaosConfig, Config, TelemetryConfig, TimeoutConfig,
    Viewport,
};
