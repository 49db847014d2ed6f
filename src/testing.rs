//! Test support: a scripted in-memory browser engine.
//!
//! The harness's own tests exercise the session manager, action library,
//! hooks and runner against this fake instead of a real browser process.

use crate::core::{BrowserConfig, BrowserTrait};
use crate::errors::{HarnessError, Result};
use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

type Responder = Box<dyn Fn(&str) -> Value + Send + Sync>;

/// Fake engine whose script results come from an injectable responder.
///
/// The default responder answers the action library's scripts the way a
/// healthy page would: waits see their element, actions succeed, counts
/// return a small number.
pub struct MockBrowser {
    launched: AtomicBool,
    close_count: AtomicUsize,
    url: Mutex<String>,
    title: Mutex<String>,
    dialog_open: AtomicBool,
    scripts: Mutex<Vec<String>>,
    responder: Responder,
}

impl MockBrowser {
    pub fn new() -> Self {
        Self::with_responder(default_responder)
    }

    pub fn with_responder<F>(responder: F) -> Self
    where
        F: Fn(&str) -> Value + Send + Sync + 'static,
    {
        Self {
            launched: AtomicBool::new(false),
            close_count: AtomicUsize::new(0),
            url: Mutex::new(String::from("about:blank")),
            title: Mutex::new(String::from("QA Sandbox")),
            dialog_open: AtomicBool::new(false),
            scripts: Mutex::new(Vec::new()),
            responder: Box::new(responder),
        }
    }

    pub fn set_url(&self, url: impl Into<String>) {
        *self.url.lock() = url.into();
    }

    pub fn set_title(&self, title: impl Into<String>) {
        *self.title.lock() = title.into();
    }

    pub fn open_dialog(&self) {
        self.dialog_open.store(true, Ordering::SeqCst);
    }

    pub fn launched(&self) -> bool {
        self.launched.load(Ordering::SeqCst)
    }

    pub fn close_count(&self) -> usize {
        self.close_count.load(Ordering::SeqCst)
    }

    /// Every script the harness executed, in order.
    pub fn scripts(&self) -> Vec<String> {
        self.scripts.lock().clone()
    }
}

impl Default for MockBrowser {
    fn default() -> Self {
        Self::new()
    }
}

/// Answers the action library's scripts the way a healthy page would. Custom
/// responders usually special-case a few scripts and delegate the rest here.
pub fn default_responder(script: &str) -> Value {
    if script.contains("!== null") {
        // element wait probes
        json!(true)
    } else if script.contains("localStorage") {
        // storage reset
        json!(true)
    } else if script.contains(".length") {
        // match counts
        json!(3)
    } else if script.contains("return { found") {
        if script.contains("getAttribute") {
            json!({ "found": true, "value": "add-project-btn-4217" })
        } else {
            json!({ "found": true, "value": "" })
        }
    } else if script.contains("return { success") {
        // click / type / select
        json!({ "success": true })
    } else {
        json!(true)
    }
}

#[async_trait]
impl BrowserTrait for MockBrowser {
    type TabHandle = ();

    async fn launch(&mut self, _config: &BrowserConfig) -> Result<()> {
        self.launched.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn open_tab(&self) -> Result<Self::TabHandle> {
        Ok(())
    }

    async fn navigate(&self, _tab: &Self::TabHandle, url: &str) -> Result<()> {
        *self.url.lock() = url.to_string();
        Ok(())
    }

    async fn execute_script(&self, _tab: &Self::TabHandle, script: &str) -> Result<Value> {
        self.scripts.lock().push(script.to_string());
        Ok((self.responder)(script))
    }

    async fn take_screenshot(&self, _tab: &Self::TabHandle) -> Result<Vec<u8>> {
        Ok(vec![0x89, b'P', b'N', b'G'])
    }

    async fn get_url(&self, _tab: &Self::TabHandle) -> Result<String> {
        Ok(self.url.lock().clone())
    }

    async fn get_title(&self, _tab: &Self::TabHandle) -> Result<String> {
        Ok(self.title.lock().clone())
    }

    async fn dismiss_dialog(&self, _tab: &Self::TabHandle) -> Result<()> {
        if self.dialog_open.swap(false, Ordering::SeqCst) {
            Ok(())
        } else {
            Err(HarnessError::EngineError("no dialog open".to_string()))
        }
    }

    fn is_running(&self) -> bool {
        self.launched.load(Ordering::SeqCst) && self.close_count.load(Ordering::SeqCst) == 0
    }

    async fn close(&self) -> Result<()> {
        self.close_count.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
