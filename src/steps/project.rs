use crate::actions::Locator;
use crate::core::BrowserTrait;
use crate::errors::{HarnessError, Result};
use crate::scenario::StepRegistry;

/// Steps for the add-project form.
pub fn register<B: BrowserTrait>(registry: &mut StepRegistry<B>) -> Result<()> {
    registry.given("I am on the add project page", |world, _| {
        Box::pin(async move {
            let url = world.config.app.page_url("/add-project");
            world.actions.navigate(&url).await?;
            world
                .actions
                .wait_for_element(&Locator::css("h4"), world.config.timeouts.page_load_ms)
                .await
        })
    })?;

    registry.when("I enter project name {string}", |world, args| {
        Box::pin(async move {
            world
                .actions
                .type_text(&Locator::id("projectName"), args.string(0)?)
                .await
        })
    })?;

    registry.when("I select status {string}", |world, args| {
        Box::pin(async move {
            world
                .actions
                .select_option(&Locator::id("status"), args.string(0)?)
                .await
        })
    })?;

    registry.when("I enter lead name {string}", |world, args| {
        Box::pin(async move {
            world
                .actions
                .type_text(&Locator::id("lead"), args.string(0)?)
                .await
        })
    })?;

    registry.when("I click the create project button", |world, _| {
        Box::pin(async move {
            world
                .actions
                .click(&Locator::css("button[type=\"submit\"]"))
                .await
        })
    })?;

    registry.when("I click the cancel button", |world, _| {
        Box::pin(async move { world.actions.click(&Locator::button_text("Cancel")).await })
    })?;

    registry.then("I should see a success message", |world, _| {
        Box::pin(async move {
            world
                .actions
                .wait_for_element(
                    &Locator::css(".alert-success"),
                    world.config.timeouts.element_ms,
                )
                .await
        })
    })?;

    registry.then(
        "I should see the new project in the project list",
        |world, _| {
            Box::pin(async move {
                // The form redirects to the dashboard a moment after the
                // success alert; follow it and wait for data.
                world
                    .actions
                    .wait_for_url_contains("/dashboard", world.config.timeouts.redirect_ms)
                    .await?;
                world
                    .actions
                    .wait_for_element(
                        &Locator::css("ag-grid-angular"),
                        world.config.timeouts.grid_mount_ms,
                    )
                    .await?;
                world
                    .actions
                    .wait_for_element(&Locator::css(".ag-row"), world.config.timeouts.grid_data_ms)
                    .await?;
                let rows = world.actions.count_elements(&Locator::css(".ag-row")).await?;
                if rows == 0 {
                    return Err(HarnessError::AssertionFailed(
                        "dashboard grid is empty after project creation".to_string(),
                    ));
                }
                Ok(())
            })
        },
    )?;

    registry.then(
        "I should see validation errors for required fields",
        |world, _| {
            Box::pin(async move {
                world
                    .actions
                    .wait_for_element(
                        &Locator::css(".invalid-feedback"),
                        world.config.timeouts.validation_ms,
                    )
                    .await
            })
        },
    )?;

    registry.then(
        "I should see validation errors for minimum length",
        |world, _| {
            Box::pin(async move {
                world
                    .actions
                    .wait_for_element(
                        &Locator::css(".invalid-feedback"),
                        world.config.timeouts.validation_ms,
                    )
                    .await
            })
        },
    )?;

    registry.then("I should remain on the add project page", |world, _| {
        Box::pin(async move {
            let url = world.actions.current_url().await?;
            if url.contains("/add-project") {
                Ok(())
            } else {
                Err(HarnessError::AssertionFailed(format!(
                    "expected to stay on /add-project, but url is {url}"
                )))
            }
        })
    })?;

    Ok(())
}
