use crate::core::{BrowserConfig, BrowserTrait};
use crate::errors::{HarnessError, Result};
use async_trait::async_trait;
use headless_chrome::protocol::cdp::Page;
use headless_chrome::{Browser, LaunchOptions, Tab};
use parking_lot::Mutex;
use serde_json::Value;
use std::ffi::OsStr;
use std::sync::Arc;

/// Flags that keep the application under test undisturbed: no password
/// manager prompts, no translate bars, no notification popups.
const QUIET_CHROME_ARGS: &[&str] = &[
    "--no-sandbox",
    "--disable-dev-shm-usage",
    "--disable-gpu",
    "--disable-infobars",
    "--disable-notifications",
    "--disable-popup-blocking",
    "--disable-extensions",
    "--disable-default-apps",
    "--disable-translate",
    "--disable-sync",
    "--disable-background-networking",
    "--disable-save-password-bubble",
    "--disable-password-generation",
    "--disable-client-side-phishing-detection",
    "--disable-features=TranslateUI,PasswordLeakDetection,AutofillServerCommunication",
];

/// Chrome engine implementation over the DevTools protocol.
pub struct ChromeBrowser {
    browser: Mutex<Option<Browser>>,
}

impl ChromeBrowser {
    pub fn new() -> Self {
        Self {
            browser: Mutex::new(None),
        }
    }
}

impl Default for ChromeBrowser {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BrowserTrait for ChromeBrowser {
    type TabHandle = Arc<Tab>;

    async fn launch(&mut self, config: &BrowserConfig) -> Result<()> {
        let window_size_arg = format!(
            "--window-size={},{}",
            config.viewport.width, config.viewport.height
        );

        let mut args: Vec<&OsStr> = QUIET_CHROME_ARGS.iter().map(OsStr::new).collect();
        args.push(OsStr::new(&window_size_arg));
        for arg in &config.args {
            args.push(OsStr::new(arg));
        }

        let launch_options = LaunchOptions::default_builder()
            .headless(config.kind.is_headless())
            .window_size(Some((config.viewport.width, config.viewport.height)))
            .args(args)
            .build()
            .map_err(|e| HarnessError::LaunchFailed(e.to_string()))?;

        let browser = Browser::new(launch_options)
            .map_err(|e| HarnessError::LaunchFailed(e.to_string()))?;

        *self.browser.lock() = Some(browser);
        Ok(())
    }

    async fn open_tab(&self) -> Result<Self::TabHandle> {
        let guard = self.browser.lock();
        let browser = guard.as_ref().ok_or(HarnessError::BrowserNotLaunched)?;

        browser
            .new_tab()
            .map_err(|e| HarnessError::TabCreationFailed(e.to_string()))
    }

    async fn navigate(&self, tab: &Self::TabHandle, url: &str) -> Result<()> {
        tab.navigate_to(url)
            .map_err(|e| HarnessError::NavigationFailed(e.to_string()))?;

        tab.wait_until_navigated()
            .map_err(|e| HarnessError::NavigationFailed(e.to_string()))?;

        Ok(())
    }

    async fn execute_script(&self, tab: &Self::TabHandle, script: &str) -> Result<Value> {
        let result = tab
            .evaluate(script, false)
            .map_err(|e| HarnessError::JavaScriptFailed(e.to_string()))?;

        Ok(result.value.unwrap_or(Value::Null))
    }

    async fn take_screenshot(&self, tab: &Self::TabHandle) -> Result<Vec<u8>> {
        tab.capture_screenshot(
            Page::CaptureScreenshotFormatOption::Png,
            None,
            None,
            true,
        )
        .map_err(|e| HarnessError::ScreenshotFailed(e.to_string()))
    }

    async fn get_url(&self, tab: &Self::TabHandle) -> Result<String> {
        Ok(tab.get_url())
    }

    async fn get_title(&self, tab: &Self::TabHandle) -> Result<String> {
        let result = self.execute_script(tab, "document.title").await?;
        Ok(result.as_str().unwrap_or("").to_string())
    }

    async fn dismiss_dialog(&self, tab: &Self::TabHandle) -> Result<()> {
        tab.call_method(Page::HandleJavaScriptDialog {
            accept: false,
            prompt_text: None,
        })
        .map_err(|e| HarnessError::EngineError(e.to_string()))?;
        Ok(())
    }

    fn is_running(&self) -> bool {
        self.browser.lock().is_some()
    }

    async fn close(&self) -> Result<()> {
        // Dropping the handle tears down the Chrome process.
        self.browser.lock().take();
        Ok(())
    }
}
