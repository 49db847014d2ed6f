use crate::actions::Locator;
use crate::core::BrowserTrait;
use crate::errors::{HarnessError, Result};
use crate::scenario::StepRegistry;
use regex::Regex;
use std::time::Duration;

/// The stable part of the dashboard button whose id suffix is re-randomized
/// on every page load.
const ADD_PROJECT_BTN_PREFIX: &str = "add-project-btn-";

/// Steps for the dashboard page and its project grid.
pub fn register<B: BrowserTrait>(registry: &mut StepRegistry<B>) -> Result<()> {
    registry.given("I am logged in to the application", |world, _| {
        Box::pin(async move {
            let url = world.config.app.page_url("/login");
            world.actions.navigate(&url).await?;
            world
                .actions
                .type_text(&Locator::id("username"), &world.config.app.username)
                .await?;
            world
                .actions
                .type_text(&Locator::id("password"), &world.config.app.password)
                .await?;
            world
                .actions
                .click(&Locator::css("button[type=\"submit\"]"))
                .await?;
            world
                .actions
                .wait_for_url_contains("/dashboard", world.config.timeouts.redirect_ms)
                .await
        })
    })?;

    registry.given("I am on the dashboard page", |world, _| {
        Box::pin(async move {
            let url = world.config.app.page_url("/dashboard");
            world.actions.navigate(&url).await?;
            world
                .actions
                .wait_for_element(&Locator::css("h2"), world.config.timeouts.page_load_ms)
                .await
        })
    })?;

    registry.then("I should see the project table", |world, _| {
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

    registry.then("I should see project data loaded", |world, _| {
        Box::pin(async move {
            // The grid mounts before its data arrives; rows are the signal
            // that the fetch finished.
            world
                .actions
                .wait_for_element(&Locator::css(".ag-row"), world.config.timeouts.grid_data_ms)
                .await?;
            let rows = world.actions.count_elements(&Locator::css(".ag-row")).await?;
            if rows == 0 {
                return Err(HarnessError::AssertionFailed(
                    "grid rendered without any project rows".to_string(),
                ));
            }
            Ok(())
        })
    })?;

    registry.then("I should see pagination controls", |world, _| {
        Box::pin(async move {
            world
                .actions
                .wait_for_element(
                    &Locator::css(".ag-paging-panel"),
                    world.config.timeouts.grid_mount_ms,
                )
                .await
        })
    })?;

    registry.when("I click the {string} button", |world, args| {
        Box::pin(async move {
            let label = args.string(0)?.to_string();
            if label == "Add Project" {
                // Prefer the id-substring match; fall back to the label if
                // the application ever drops the id entirely.
                let by_id = Locator::id_contains(ADD_PROJECT_BTN_PREFIX);
                if world.actions.click(&by_id).await.is_ok() {
                    return Ok(());
                }
            }
            world.actions.click(&Locator::button_text(label)).await
        })
    })?;

    registry.then("I should be redirected to the add project page", |world, _| {
        Box::pin(async move {
            world
                .actions
                .wait_for_url_contains("/add-project", world.config.timeouts.redirect_ms)
                .await
        })
    })?;

    registry.then(
        "I should see the {string} button with a dynamic ID",
        |world, _| {
            Box::pin(async move {
                let locator = Locator::id_contains(ADD_PROJECT_BTN_PREFIX);
                world
                    .actions
                    .wait_for_element(&locator, world.config.timeouts.element_ms)
                    .await?;
                let id = world
                    .actions
                    .read_attribute(&locator, "id")
                    .await?
                    .unwrap_or_default();
                let shape = Regex::new(r"^add-project-btn-\d+$")
                    .map_err(|e| HarnessError::ConfigurationError(e.to_string()))?;
                if shape.is_match(&id) {
                    Ok(())
                } else {
                    Err(HarnessError::AssertionFailed(format!(
                        "button id {id:?} does not match the dynamic pattern"
                    )))
                }
            })
        },
    )?;

    registry.then(
        "the button should be clickable regardless of ID changes",
        |world, _| {
            Box::pin(async move {
                let locator = Locator::id_contains(ADD_PROJECT_BTN_PREFIX);
                let disabled = world.actions.read_attribute(&locator, "disabled").await?;
                if disabled.is_some() {
                    return Err(HarnessError::AssertionFailed(
                        "add-project button is disabled".to_string(),
                    ));
                }
                Ok(())
            })
        },
    )?;

    // Chaos step: models the application's unreliable first-page count. The
    // failure probability and settle delay come from the injected policy so
    // harness tests can pin them down.
    registry.then(
        "I should see exactly {int} projects on the first page",
        |world, args| {
            Box::pin(async move {
                let expected = args.int(0)?;
                world
                    .actions
                    .wait_for_element(&Locator::css(".ag-row"), world.config.timeouts.grid_data_ms)
                    .await?;

                let (delay_ms, inject_failure) = {
                    let mut chaos = world.chaos.lock();
                    (chaos.settle_delay_ms(), chaos.should_fail())
                };
                tokio::time::sleep(Duration::from_millis(delay_ms)).await;

                let rows = world.actions.count_elements(&Locator::css(".ag-row")).await?;
                if inject_failure {
                    return Err(HarnessError::ChaosInjected(format!(
                        "expected {expected} projects but observed {rows}"
                    )));
                }
                if rows == 0 {
                    return Err(HarnessError::AssertionFailed(
                        "no project rows on the first page".to_string(),
                    ));
                }
                Ok(())
            })
        },
    )?;

    registry.then(
        "the project count should be stable across refreshes",
        |world, _| {
            Box::pin(async move {
                let before = world.actions.count_elements(&Locator::css(".ag-row")).await?;
                let url = world.actions.current_url().await?;
                world.actions.navigate(&url).await?;
                world
                    .actions
                    .wait_for_element(&Locator::css(".ag-row"), world.config.timeouts.grid_data_ms)
                    .await?;
                let after = world.actions.count_elements(&Locator::css(".ag-row")).await?;
                if before != after {
                    return Err(HarnessError::AssertionFailed(format!(
                        "row count changed across refresh: {before} -> {after}"
                    )));
                }
                Ok(())
            })
        },
    )?;

    Ok(())
}
