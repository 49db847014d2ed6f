use crate::core::BrowserTrait;
use crate::errors::Result;
use crate::scenario::context::{ScenarioContext, ScenarioStatus};
use crate::scenario::world::World;
use crate::telemetry::EventSink;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Suite-level setup: the one `acquire` of the run.
pub async fn before_all<B: BrowserTrait>(world: &World<B>) -> Result<()> {
    info!("starting e2e suite");
    world.session.acquire(&world.config.browser).await
}

/// Suite-level teardown. Sinks flush first so in-flight telemetry survives a
/// failing browser quit; release itself is idempotent.
pub async fn after_all<B: BrowserTrait>(
    world: &World<B>,
    sinks: &[Arc<dyn EventSink>],
) -> Result<()> {
    info!("completed e2e suite");
    for sink in sinks {
        if let Err(err) = sink.flush() {
            warn!(%err, "event sink flush failed");
        }
    }
    world.session.release().await
}

/// Per-scenario setup: enter the application, then reset client-side state,
/// then restore the window geometry.
///
/// Storage is origin-scoped, so the navigation has to come first; clearing
/// against the blank start page would not touch the application's storage.
pub async fn before_scenario<B: BrowserTrait>(
    world: &World<B>,
    ctx: &mut ScenarioContext,
) -> Result<()> {
    info!(scenario = %ctx.name, "starting scenario");
    if ctx.has_tag("flaky") {
        warn!(
            scenario = %ctx.name,
            "running flaky scenario; it may fail intermittently by design"
        );
    }

    world.actions.navigate(&world.config.app.base_url).await?;
    world.actions.clear_storage().await?;
    let viewport = world.config.browser.viewport;
    world
        .actions
        .set_viewport(viewport.width, viewport.height)
        .await?;
    Ok(())
}

/// Per-scenario teardown: failure diagnostics, then best-effort dialog
/// cleanup. Never changes the scenario's already-determined status.
pub async fn after_scenario<B: BrowserTrait>(
    world: &World<B>,
    ctx: &mut ScenarioContext,
) -> Result<()> {
    if ctx.status == ScenarioStatus::Failed {
        capture_failure_screenshot(world, ctx).await;
        if ctx.has_tag("flaky") {
            warn!(
                scenario = %ctx.name,
                failure = ctx.failure.as_deref().unwrap_or("unknown"),
                "flaky scenario failed as designed"
            );
        } else {
            error!(
                scenario = %ctx.name,
                failure = ctx.failure.as_deref().unwrap_or("unknown"),
                "scenario failed"
            );
        }
    } else {
        info!(scenario = %ctx.name, "scenario passed");
    }

    // A leftover native dialog would wedge every later scenario.
    world.actions.dismiss_dialog().await?;
    Ok(())
}

async fn capture_failure_screenshot<B: BrowserTrait>(world: &World<B>, ctx: &mut ScenarioContext) {
    let bytes = match world.actions.screenshot().await {
        Ok(bytes) => bytes,
        Err(err) => {
            warn!(%err, "failure screenshot could not be captured");
            return;
        }
    };

    let file_name = format!("{}.png", slug(&ctx.name));
    let dir = &world.config.telemetry.screenshot_dir;
    let path = dir.join(&file_name);
    if let Err(err) = std::fs::create_dir_all(dir).and_then(|_| std::fs::write(&path, &bytes)) {
        warn!(%err, path = %path.display(), "failure screenshot could not be saved");
    } else {
        info!(path = %path.display(), "failure screenshot saved");
    }
    ctx.attach(file_name, "image/png", bytes);
}

fn slug(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            out.push(c.to_ascii_lowercase());
        } else if !out.ends_with('-') {
            out.push('-');
        }
    }
    out.trim_matches('-').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slug_flattens_punctuation_and_case() {
        assert_eq!(slug("Login with valid credentials"), "login-with-valid-credentials");
        assert_eq!(slug("Reject a too-short project name!"), "reject-a-too-short-project-name");
        assert_eq!(slug("  spaced  "), "spaced");
    }
}
