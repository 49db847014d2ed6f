use crate::actions::ActionLibrary;
use crate::browser::SessionManager;
use crate::core::{BrowserTrait, Config};
use crate::errors::Result;
use crate::scenario::chaos::ChaosPolicy;
use parking_lot::Mutex;
use std::sync::Arc;

/// Everything a hook or step handler may touch, threaded explicitly instead
/// of living in module-level globals: the one session manager, the action
/// library over it, the run configuration and the chaos policy.
pub struct World<B: BrowserTrait> {
    pub config: Config,
    pub session: Arc<SessionManager<B>>,
    pub actions: ActionLibrary<B>,
    pub chaos: Mutex<ChaosPolicy>,
}

impl<B: BrowserTrait> World<B> {
    pub fn new(engine: B, config: Config) -> Result<Self> {
        config.validate()?;
        let session = Arc::new(SessionManager::new(engine));
        let actions = ActionLibrary::new(Arc::clone(&session))
            .with_implicit_wait(config.browser.implicit_wait_ms);
        let chaos = Mutex::new(ChaosPolicy::new(
            config.chaos.failure_probability,
            config.chaos.seed,
        ));
        Ok(Self {
            config,
            session,
            actions,
            chaos,
        })
    }
}
