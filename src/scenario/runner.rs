use crate::core::BrowserTrait;
use crate::errors::Result;
use crate::scenario::context::{ScenarioContext, ScenarioStatus};
use crate::scenario::hooks;
use crate::scenario::registry::StepRegistry;
use crate::scenario::world::World;
use crate::scenario::Scenario;
use crate::telemetry::{EventSink, StepEvent};
use chrono::Utc;
use std::sync::Arc;
use std::time::Instant;
use tracing::warn;

/// Outcome counts for one suite run.
#[derive(Debug, Clone, Default)]
pub struct SuiteSummary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    /// Failed scenarios that were tagged `@flaky`; a subset of `failed`.
    pub flaky_failed: usize,
}

impl SuiteSummary {
    pub fn success(&self) -> bool {
        self.failed == 0
    }

    /// Failures that are not covered by the designed instability.
    pub fn genuine_failures(&self) -> usize {
        self.failed - self.flaky_failed
    }
}

/// Drives scenarios strictly sequentially against the shared session.
///
/// One worker by construction: the session is an unsynchronized process-wide
/// resource, and serial execution is what keeps its navigation and DOM state
/// coherent.
pub struct SuiteRunner<B: BrowserTrait> {
    world: Arc<World<B>>,
    registry: StepRegistry<B>,
    sinks: Vec<Arc<dyn EventSink>>,
}

impl<B: BrowserTrait> SuiteRunner<B> {
    pub fn new(world: Arc<World<B>>, registry: StepRegistry<B>) -> Self {
        Self {
            world,
            registry,
            sinks: Vec::new(),
        }
    }

    pub fn add_sink(&mut self, sink: Arc<dyn EventSink>) -> &mut Self {
        self.sinks.push(sink);
        self
    }

    /// Runs the whole suite. Binding problems (undefined or ambiguous steps)
    /// abort before the session is acquired; afterwards every scenario runs
    /// to its own verdict and teardown is guaranteed.
    pub async fn run(&self, scenarios: &[Scenario]) -> Result<SuiteSummary> {
        self.validate_bindings(scenarios)?;

        if let Err(err) = hooks::before_all(&self.world).await {
            // The session may be half-built; the teardown path is safe to
            // run unconditionally.
            if let Err(teardown_err) = hooks::after_all(&self.world, &self.sinks).await {
                warn!(err = %teardown_err, "suite teardown failed");
            }
            return Err(err);
        }

        let mut summary = SuiteSummary::default();
        for scenario in scenarios {
            let ctx = self.run_scenario(scenario).await;
            summary.total += 1;
            match ctx.status {
                ScenarioStatus::Failed => {
                    summary.failed += 1;
                    if ctx.has_tag("flaky") {
                        summary.flaky_failed += 1;
                    }
                }
                _ => summary.passed += 1,
            }
        }

        if let Err(err) = hooks::after_all(&self.world, &self.sinks).await {
            warn!(%err, "suite teardown failed");
        }
        Ok(summary)
    }

    /// Every step of every scenario must resolve to exactly one binding
    /// before anything expensive happens.
    fn validate_bindings(&self, scenarios: &[Scenario]) -> Result<()> {
        for scenario in scenarios {
            for step in &scenario.steps {
                self.registry.resolve(&step.text)?;
            }
        }
        Ok(())
    }

    async fn run_scenario(&self, scenario: &Scenario) -> ScenarioContext {
        let mut ctx = ScenarioContext::new(&scenario.name, scenario.tags.clone());
        ctx.status = ScenarioStatus::Running;

        match hooks::before_scenario(&self.world, &mut ctx).await {
            Ok(()) => self.run_steps(scenario, &mut ctx).await,
            Err(err) => {
                // A broken setup means nothing below it can be trusted; the
                // scenario fails without executing a single step, and the
                // suite moves on.
                warn!(scenario = %scenario.name, %err, "before-hook failed, skipping steps");
                ctx.mark_failed(format!("before-hook failed: {err}"));
            }
        }

        if ctx.status == ScenarioStatus::Running {
            ctx.status = ScenarioStatus::Passed;
        }

        if let Err(err) = hooks::after_scenario(&self.world, &mut ctx).await {
            warn!(scenario = %scenario.name, %err, "after-hook failed");
        }
        ctx
    }

    async fn run_steps(&self, scenario: &Scenario, ctx: &mut ScenarioContext) {
        for step in &scenario.steps {
            let resolved = match self.registry.resolve(&step.text) {
                Ok(resolved) => resolved,
                Err(err) => {
                    ctx.mark_failed(err.to_string());
                    return;
                }
            };

            let started = Instant::now();
            let result = (resolved.handler)(Arc::clone(&self.world), resolved.args).await;
            let duration_ms = started.elapsed().as_secs_f64() * 1000.0;

            let expected_flaky = match &result {
                Ok(()) => false,
                Err(err) => err.is_expected_flaky() || ctx.has_tag("flaky"),
            };
            let event = StepEvent {
                scenario: scenario.name.clone(),
                step: step.text.clone(),
                duration_ms,
                timestamp: Utc::now(),
                passed: result.is_ok(),
                expected_flaky,
            };
            for sink in &self.sinks {
                sink.on_step_finished(&event);
            }

            if let Err(err) = result {
                ctx.mark_failed(err.to_string());
                return;
            }
        }
    }
}
