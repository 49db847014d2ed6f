use crate::core::{BrowserConfig, BrowserTrait};
use crate::errors::{HarnessError, Result};
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::info;

/// The live browser handle for a run: the launched engine plus the one tab
/// every scenario drives.
pub struct Session<B: BrowserTrait> {
    pub browser: Arc<B>,
    pub tab: B::TabHandle,
}

impl<B: BrowserTrait> std::fmt::Debug for Session<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session").finish_non_exhaustive()
    }
}

impl<B: BrowserTrait> Clone for Session<B> {
    fn clone(&self) -> Self {
        Self {
            browser: Arc::clone(&self.browser),
            tab: self.tab.clone(),
        }
    }
}

/// Owns the single browser session of a test run.
///
/// The engine is injected at construction and consumed by the one permitted
/// `acquire` call; a second acquire, or any `get` before the first, is a
/// contract violation in the harness itself and fails loudly. `release` is
/// idempotent so suite-level fault paths can call it unconditionally.
pub struct SessionManager<B: BrowserTrait> {
    engine: Mutex<Option<B>>,
    live: Mutex<Option<Session<B>>>,
}

impl<B: BrowserTrait> SessionManager<B> {
    pub fn new(engine: B) -> Self {
        Self {
            engine: Mutex::new(Some(engine)),
            live: Mutex::new(None),
        }
    }

    /// Launches the engine and opens the run's tab. Called exactly once, by
    /// the suite-level before-hook.
    pub async fn acquire(&self, config: &BrowserConfig) -> Result<()> {
        if self.live.lock().is_some() {
            return Err(HarnessError::AlreadyInitialized);
        }
        let mut engine = self
            .engine
            .lock()
            .take()
            .ok_or(HarnessError::AlreadyInitialized)?;

        info!(browser = config.kind.as_str(), "launching browser session");
        engine.launch(config).await?;
        let tab = engine.open_tab().await?;

        *self.live.lock() = Some(Session {
            browser: Arc::new(engine),
            tab,
        });
        Ok(())
    }

    /// Returns the live session. Never creates one implicitly.
    pub fn get(&self) -> Result<Session<B>> {
        self.live
            .lock()
            .clone()
            .ok_or(HarnessError::SessionNotInitialized)
    }

    pub fn is_live(&self) -> bool {
        self.live.lock().is_some()
    }

    /// Tears down the live session if there is one; a no-op otherwise.
    pub async fn release(&self) -> Result<()> {
        let session = self.live.lock().take();
        if let Some(session) = session {
            info!("releasing browser session");
            session.browser.close().await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::BrowserConfig;
    use crate::testing::MockBrowser;

    fn manager() -> SessionManager<MockBrowser> {
        SessionManager::new(MockBrowser::new())
    }

    #[tokio::test]
    async fn get_before_acquire_fails() {
        let manager = manager();
        let err = manager.get().unwrap_err();
        assert!(matches!(err, HarnessError::SessionNotInitialized));
    }

    #[tokio::test]
    async fn acquire_launches_exactly_once() {
        let manager = manager();
        manager.acquire(&BrowserConfig::default()).await.unwrap();
        assert!(manager.is_live());
        assert!(manager.get().is_ok());

        let err = manager.acquire(&BrowserConfig::default()).await.unwrap_err();
        assert!(matches!(err, HarnessError::AlreadyInitialized));
    }

    #[tokio::test]
    async fn release_is_idempotent() {
        let manager = manager();
        manager.acquire(&BrowserConfig::default()).await.unwrap();

        let session = manager.get().unwrap();
        manager.release().await.unwrap();
        manager.release().await.unwrap();

        assert_eq!(session.browser.close_count(), 1);
        assert!(matches!(
            manager.get().unwrap_err(),
            HarnessError::SessionNotInitialized
        ));
    }

    #[tokio::test]
    async fn release_without_acquire_is_a_no_op() {
        let manager = manager();
        assert!(manager.release().await.is_ok());
    }

    #[tokio::test]
    async fn acquire_after_release_is_rejected() {
        let manager = manager();
        manager.acquire(&BrowserConfig::default()).await.unwrap();
        manager.release().await.unwrap();

        // One session per run: the engine is gone after teardown.
        let err = manager.acquire(&BrowserConfig::default()).await.unwrap_err();
        assert!(matches!(err, HarnessError::AlreadyInitialized));
    }
}
