use crate::actions::locator::{js_string, Locator};
use crate::browser::SessionManager;
use crate::core::BrowserTrait;
use crate::errors::{HarnessError, Result};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::debug;

const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(250);
const DEFAULT_IMPLICIT_WAIT_MS: u64 = 10_000;

/// Reusable browser operations for step implementations.
///
/// Every operation fetches the live session from the manager and resolves
/// its locator inside the page at call time, so nothing here can act on a
/// handle that a re-render invalidated. All waiting is one polling loop with
/// one interval; steps never roll their own timeout policy. Element actions
/// (type, click, read) first wait up to the implicit-wait bound for their
/// locator to match, mirroring a WebDriver implicit wait.
pub struct ActionLibrary<B: BrowserTrait> {
    session: Arc<SessionManager<B>>,
    poll_interval: Duration,
    implicit_wait_ms: u64,
}

impl<B: BrowserTrait> ActionLibrary<B> {
    pub fn new(session: Arc<SessionManager<B>>) -> Self {
        Self {
            session,
            poll_interval: DEFAULT_POLL_INTERVAL,
            implicit_wait_ms: DEFAULT_IMPLICIT_WAIT_MS,
        }
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    pub fn with_implicit_wait(mut self, implicit_wait_ms: u64) -> Self {
        self.implicit_wait_ms = implicit_wait_ms;
        self
    }

    async fn eval(&self, script: &str) -> Result<serde_json::Value> {
        let session = self.session.get()?;
        session.browser.execute_script(&session.tab, script).await
    }

    /// Loads a page. Waits only for the protocol-level load; readiness of
    /// asynchronously rendered content is the business of the wait operations.
    pub async fn navigate(&self, url: &str) -> Result<()> {
        debug!(url, "navigate");
        let session = self.session.get()?;
        session.browser.navigate(&session.tab, url).await
    }

    pub async fn current_url(&self) -> Result<String> {
        let session = self.session.get()?;
        session.browser.get_url(&session.tab).await
    }

    pub async fn title(&self) -> Result<String> {
        let session = self.session.get()?;
        session.browser.get_title(&session.tab).await
    }

    /// Polls until `locator` matches an element in the DOM.
    pub async fn wait_for_element(&self, locator: &Locator, timeout_ms: u64) -> Result<()> {
        let script = format!("({}) !== null", locator.js_expression());
        let deadline = Instant::now() + Duration::from_millis(timeout_ms);
        loop {
            if self.eval(&script).await?.as_bool() == Some(true) {
                return Ok(());
            }
            if Instant::now() >= deadline {
                return Err(HarnessError::ElementNotFound {
                    locator: locator.to_string(),
                    waited_ms: timeout_ms,
                });
            }
            tokio::time::sleep(self.poll_interval).await;
        }
    }

    /// Polls the current URL; detects navigation completion without coupling
    /// to a DOM signal.
    pub async fn wait_for_url_contains(&self, fragment: &str, timeout_ms: u64) -> Result<()> {
        let deadline = Instant::now() + Duration::from_millis(timeout_ms);
        loop {
            if self.current_url().await?.contains(fragment) {
                return Ok(());
            }
            if Instant::now() >= deadline {
                return Err(HarnessError::WaitTimedOut {
                    condition: format!("url contains {fragment:?}"),
                    waited_ms: timeout_ms,
                });
            }
            tokio::time::sleep(self.poll_interval).await;
        }
    }

    pub async fn wait_for_title_contains(&self, fragment: &str, timeout_ms: u64) -> Result<()> {
        let deadline = Instant::now() + Duration::from_millis(timeout_ms);
        loop {
            if self.title().await?.contains(fragment) {
                return Ok(());
            }
            if Instant::now() >= deadline {
                return Err(HarnessError::WaitTimedOut {
                    condition: format!("title contains {fragment:?}"),
                    waited_ms: timeout_ms,
                });
            }
            tokio::time::sleep(self.poll_interval).await;
        }
    }

    /// Clears and types into an input, dispatching the events the
    /// application's framework listens for.
    pub async fn type_text(&self, locator: &Locator, text: &str) -> Result<()> {
        self.resolve_first(locator).await?;
        let script = format!(
            r#"
            (function() {{
                const el = {expr};
                if (!el) return {{ success: false, error: 'element not found' }};
                el.focus();
                el.value = {text};
                el.dispatchEvent(new Event('input', {{ bubbles: true }}));
                el.dispatchEvent(new Event('change', {{ bubbles: true }}));
                el.blur();
                return {{ success: true }};
            }})()
            "#,
            expr = locator.js_expression(),
            text = js_string(text),
        );
        self.expect_success(locator, &script).await
    }

    pub async fn click(&self, locator: &Locator) -> Result<()> {
        self.resolve_first(locator).await?;
        let script = format!(
            r#"
            (function() {{
                const el = {expr};
                if (!el) return {{ success: false, error: 'element not found' }};
                el.scrollIntoView({{ block: 'center' }});
                el.focus();
                el.click();
                return {{ success: true }};
            }})()
            "#,
            expr = locator.js_expression(),
        );
        self.expect_success(locator, &script).await
    }

    /// Sets the value of a `<select>` and fires its change event.
    pub async fn select_option(&self, locator: &Locator, value: &str) -> Result<()> {
        self.resolve_first(locator).await?;
        let script = format!(
            r#"
            (function() {{
                const el = {expr};
                if (!el) return {{ success: false, error: 'element not found' }};
                el.value = {value};
                el.dispatchEvent(new Event('change', {{ bubbles: true }}));
                return {{ success: true }};
            }})()
            "#,
            expr = locator.js_expression(),
            value = js_string(value),
        );
        self.expect_success(locator, &script).await
    }

    /// Reads an attribute from a freshly resolved element. `Ok(None)` means
    /// the element exists but lacks the attribute.
    pub async fn read_attribute(&self, locator: &Locator, name: &str) -> Result<Option<String>> {
        self.resolve_first(locator).await?;
        let script = format!(
            r#"
            (function() {{
                const el = {expr};
                if (!el) return {{ found: false }};
                return {{ found: true, value: el.getAttribute({name}) }};
            }})()
            "#,
            expr = locator.js_expression(),
            name = js_string(name),
        );
        let result = self.eval(&script).await?;
        if result.get("found").and_then(|v| v.as_bool()) != Some(true) {
            return Err(HarnessError::ElementNotFound {
                locator: locator.to_string(),
                waited_ms: 0,
            });
        }
        Ok(result
            .get("value")
            .and_then(|v| v.as_str())
            .map(str::to_string))
    }

    pub async fn read_text(&self, locator: &Locator) -> Result<String> {
        self.resolve_first(locator).await?;
        let script = format!(
            r#"
            (function() {{
                const el = {expr};
                if (!el) return {{ found: false }};
                return {{ found: true, value: (el.textContent || '').trim() }};
            }})()
            "#,
            expr = locator.js_expression(),
        );
        let result = self.eval(&script).await?;
        if result.get("found").and_then(|v| v.as_bool()) != Some(true) {
            return Err(HarnessError::ElementNotFound {
                locator: locator.to_string(),
                waited_ms: 0,
            });
        }
        Ok(result
            .get("value")
            .and_then(|v| v.as_str())
            .unwrap_or("")
            .to_string())
    }

    pub async fn count_elements(&self, locator: &Locator) -> Result<u64> {
        let result = self.eval(&locator.js_count_expression()).await?;
        result.as_u64().ok_or_else(|| {
            HarnessError::JavaScriptFailed(format!("count for {locator} returned {result}"))
        })
    }

    /// Viewport PNG, used only by failure diagnostics.
    pub async fn screenshot(&self) -> Result<Vec<u8>> {
        let session = self.session.get()?;
        session.browser.take_screenshot(&session.tab).await
    }

    /// Clears persisted client-side state on the current origin.
    pub async fn clear_storage(&self) -> Result<()> {
        let script = r#"
            (function() {
                try {
                    localStorage.clear();
                    sessionStorage.clear();
                    return true;
                } catch (e) {
                    return false;
                }
            })()
        "#;
        if self.eval(script).await?.as_bool() != Some(true) {
            return Err(HarnessError::JavaScriptFailed(
                "storage clear was rejected by the page".to_string(),
            ));
        }
        Ok(())
    }

    pub async fn set_viewport(&self, width: u32, height: u32) -> Result<()> {
        let script = format!("window.resizeTo({width}, {height}); true");
        self.eval(&script).await?;
        Ok(())
    }

    /// Best-effort native dialog dismissal. Absence of a dialog is the
    /// normal case and is not an error.
    pub async fn dismiss_dialog(&self) -> Result<bool> {
        let session = self.session.get()?;
        match session.browser.dismiss_dialog(&session.tab).await {
            Ok(()) => Ok(true),
            Err(err) => {
                debug!(%err, "no dialog to dismiss");
                Ok(false)
            }
        }
    }

    /// The implicit wait applied before every element action.
    async fn resolve_first(&self, locator: &Locator) -> Result<()> {
        self.wait_for_element(locator, self.implicit_wait_ms).await
    }

    async fn expect_success(&self, locator: &Locator, script: &str) -> Result<()> {
        let result = self.eval(script).await?;
        if result.get("success").and_then(|v| v.as_bool()) == Some(true) {
            return Ok(());
        }
        Err(HarnessError::ElementNotFound {
            locator: locator.to_string(),
            waited_ms: 0,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::BrowserConfig;
    use crate::testing::MockBrowser;
    use serde_json::json;

    async fn library_with(mock: MockBrowser) -> ActionLibrary<MockBrowser> {
        let manager = Arc::new(SessionManager::new(mock));
        manager.acquire(&BrowserConfig::default()).await.unwrap();
        ActionLibrary::new(manager)
            .with_poll_interval(Duration::from_millis(5))
            .with_implicit_wait(30)
    }

    #[tokio::test]
    async fn actions_fail_before_session_exists() {
        let manager = Arc::new(SessionManager::new(MockBrowser::new()));
        let library = ActionLibrary::new(manager);
        let err = library.navigate("http://localhost:4200").await.unwrap_err();
        assert!(matches!(err, HarnessError::SessionNotInitialized));
    }

    #[tokio::test]
    async fn wait_for_element_times_out_with_locator_context() {
        let mock = MockBrowser::with_responder(|_| json!(false));
        let library = library_with(mock).await;

        let err = library
            .wait_for_element(&Locator::css(".alert-success"), 20)
            .await
            .unwrap_err();
        match err {
            HarnessError::ElementNotFound { locator, waited_ms } => {
                assert_eq!(locator, "css=.alert-success");
                assert_eq!(waited_ms, 20);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn wait_for_element_returns_once_present() {
        let mock = MockBrowser::with_responder(|_| json!(true));
        let library = library_with(mock).await;
        library
            .wait_for_element(&Locator::id("username"), 100)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn wait_for_url_contains_polls_the_driver_url() {
        let mock = MockBrowser::new();
        let library = library_with(mock).await;
        library.navigate("http://localhost:4200/dashboard").await.unwrap();
        library.wait_for_url_contains("/dashboard", 50).await.unwrap();

        let err = library
            .wait_for_url_contains("/add-project", 20)
            .await
            .unwrap_err();
        assert!(matches!(err, HarnessError::WaitTimedOut { waited_ms: 20, .. }));
    }

    #[tokio::test]
    async fn type_text_reports_missing_element() {
        let mock = MockBrowser::with_responder(|_| json!({ "success": false, "error": "element not found" }));
        let library = library_with(mock).await;
        let err = library
            .type_text(&Locator::id("username"), "testuser")
            .await
            .unwrap_err();
        assert!(matches!(err, HarnessError::ElementNotFound { .. }));
    }

    #[tokio::test]
    async fn read_attribute_distinguishes_missing_attribute_from_missing_element() {
        let mock = MockBrowser::with_responder(|script| {
            if script.contains("getAttribute") {
                json!({ "found": true, "value": null })
            } else {
                json!(true)
            }
        });
        let library = library_with(mock).await;
        let value = library
            .read_attribute(&Locator::id_contains("add-project-btn-"), "disabled")
            .await
            .unwrap();
        assert_eq!(value, None);
    }

    #[tokio::test]
    async fn count_elements_parses_numeric_result() {
        let mock = MockBrowser::with_responder(|script| {
            if script.contains(".length") {
                json!(7)
            } else {
                json!(true)
            }
        });
        let library = library_with(mock).await;
        let count = library.count_elements(&Locator::css(".ag-row")).await.unwrap();
        assert_eq!(count, 7);
    }

    #[tokio::test]
    async fn dismiss_dialog_swallows_absence() {
        let mock = MockBrowser::new();
        let library = library_with(mock).await;
        // No dialog is queued in the mock; the action must not error.
        assert!(!library.dismiss_dialog().await.unwrap());
    }
}
