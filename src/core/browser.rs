use crate::core::config::BrowserConfig;
use crate::errors::Result;
use async_trait::async_trait;
use serde_json::Value;

/// Seam between the harness and a concrete browser engine. The session
/// manager, action library and hooks only ever talk to this trait, so the
/// harness's own tests run against a scripted fake instead of a real browser.
#[async_trait]
pub trait BrowserTrait: Send + Sync + 'static {
    type TabHandle: Clone + Send + Sync;

    /// Launch the browser process. Capability flags (headless mode, window
    /// size, suppressed browser UI) are applied here and only here.
    async fn launch(&mut self, config: &BrowserConfig) -> Result<()>;

    /// Open the tab the whole run drives.
    async fn open_tab(&self) -> Result<Self::TabHandle>;

    async fn navigate(&self, tab: &Self::TabHandle, url: &str) -> Result<()>;

    async fn execute_script(&self, tab: &Self::TabHandle, script: &str) -> Result<Value>;

    async fn take_screenshot(&self, tab: &Self::TabHandle) -> Result<Vec<u8>>;

    async fn get_url(&self, tab: &Self::TabHandle) -> Result<String>;

    async fn get_title(&self, tab: &Self::TabHandle) -> Result<String>;

    /// Dismiss a native dialog if one is open. Errors when none is present;
    /// callers treat that as benign.
    async fn dismiss_dialog(&self, tab: &Self::TabHandle) -> Result<()>;

    fn is_running(&self) -> bool;

    async fn close(&self) -> Result<()>;
}
