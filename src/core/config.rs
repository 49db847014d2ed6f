use crate::errors::{HarnessError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub browser: BrowserConfig,
    pub app: AppConfig,
    pub timeouts: TimeoutConfig,
    pub telemetry: TelemetryConfig,
    pub chaos: ChaosConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrowserConfig {
    pub kind: BrowserKind,
    pub viewport: Viewport,
    pub implicit_wait_ms: u64,
    pub args: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BrowserKind {
    Chrome,
    ChromeHeadless,
}

impl BrowserKind {
    /// Parses the `BROWSER`-style selector. Anything this harness cannot
    /// drive fails here, before any session exists.
    pub fn parse(name: &str) -> Result<Self> {
        match name.to_lowercase().as_str() {
            "chrome" => Ok(BrowserKind::Chrome),
            "chrome-headless" => Ok(BrowserKind::ChromeHeadless),
            other => Err(HarnessError::UnsupportedBrowser(other.to_string())),
        }
    }

    pub fn is_headless(&self) -> bool {
        matches!(self, BrowserKind::ChromeHeadless)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BrowserKind::Chrome => "chrome",
            BrowserKind::ChromeHeadless => "chrome-headless",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub base_url: String,
    pub username: String,
    pub password: String,
}

impl AppConfig {
    pub fn page_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeoutConfig {
    pub page_load_ms: u64,
    pub element_ms: u64,
    pub redirect_ms: u64,
    pub grid_mount_ms: u64,
    pub grid_data_ms: u64,
    pub validation_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetryConfig {
    pub report_path: PathBuf,
    pub screenshot_dir: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChaosConfig {
    pub failure_probability: f64,
    pub seed: Option<u64>,
}

impl Config {
    /// Configuration errors are fatal and must fire before any resource is
    /// acquired.
    pub fn validate(&self) -> Result<()> {
        url::Url::parse(&self.app.base_url)
            .map_err(|e| HarnessError::ConfigurationError(format!("invalid base url: {e}")))?;
        if !(0.0..=1.0).contains(&self.chaos.failure_probability) {
            return Err(HarnessError::ConfigurationError(format!(
                "chaos probability must be within [0, 1], got {}",
                self.chaos.failure_probability
            )));
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            browser: BrowserConfig::default(),
            app: AppConfig::default(),
            timeouts: TimeoutConfig::default(),
            telemetry: TelemetryConfig::default(),
            chaos: ChaosConfig::default(),
        }
    }
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            kind: BrowserKind::Chrome,
            viewport: Viewport {
                width: 1920,
                height: 1080,
            },
            implicit_wait_ms: 10_000,
            args: vec![],
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:4200".to_string(),
            username: "testuser".to_string(),
            password: "password123".to_string(),
        }
    }
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            page_load_ms: 10_000,
            element_ms: 10_000,
            redirect_ms: 10_000,
            grid_mount_ms: 15_000,
            grid_data_ms: 20_000,
            validation_ms: 5_000,
        }
    }
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            report_path: PathBuf::from("reports/step-timings.json"),
            screenshot_dir: PathBuf::from("reports/screenshots"),
        }
    }
}

impl Default for ChaosConfig {
    fn default() -> Self {
        Self {
            failure_probability: 0.3,
            seed: None,
        }
    }
}
