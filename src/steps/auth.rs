use crate::actions::Locator;
use crate::core::BrowserTrait;
use crate::errors::{HarnessError, Result};
use crate::scenario::StepRegistry;

/// Steps for the login page.
pub fn register<B: BrowserTrait>(registry: &mut StepRegistry<B>) -> Result<()> {
    registry.given("I am on the login page", |world, _| {
        Box::pin(async move {
            let url = world.config.app.page_url("/login");
            world.actions.navigate(&url).await?;
            world
                .actions
                .wait_for_title_contains("QA Sandbox", world.config.timeouts.page_load_ms)
                .await
        })
    })?;

    registry.when(
        "I enter username {string} and password {string}",
        |world, args| {
            Box::pin(async move {
                world
                    .actions
                    .type_text(&Locator::id("username"), args.string(0)?)
                    .await?;
                world
                    .actions
                    .type_text(&Locator::id("password"), args.string(1)?)
                    .await
            })
        },
    )?;

    registry.when("I click the login button", |world, _| {
        Box::pin(async move {
            world
                .actions
                .click(&Locator::css("button[type=\"submit\"]"))
                .await
        })
    })?;

    registry.then("I should be redirected to the dashboard page", |world, _| {
        Box::pin(async move {
            world
                .actions
                .wait_for_url_contains("/dashboard", world.config.timeouts.redirect_ms)
                .await
        })
    })?;

    registry.then("I should see the project list", |world, _| {
        Box::pin(async move {
            world
                .actions
                .wait_for_element(
                    &Locator::css("ag-grid-angular"),
                    world.config.timeouts.grid_mount_ms,
                )
                .await
        })
    })?;

    registry.then("I should see validation errors", |world, _| {
        Box::pin(async move {
            world
                .actions
                .wait_for_element(
                    &Locator::css(".invalid-feedback"),
                    world.config.timeouts.validation_ms,
                )
                .await
        })
    })?;

    registry.then("I should remain on the login page", |world, _| {
        Box::pin(async move {
            let url = world.actions.current_url().await?;
            if url.contains("/login") {
                Ok(())
            } else {
                Err(HarnessError::AssertionFailed(format!(
                    "expected to stay on /login, but url is {url}"
                )))
            }
        })
    })?;

    Ok(())
}
