use anyhow::Context;
use clap::Parser;
use qaprobe::core::{AppConfig, BrowserConfig, BrowserKind, ChaosConfig, Config, TelemetryConfig};
use qaprobe::steps;
use qaprobe::{ChromeBrowser, ConsoleSink, StepRegistry, SuiteRunner, TelemetryCollector, World};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// End-to-end suite runner for the QA sandbox application.
#[derive(Parser, Debug)]
#[command(name = "qaprobe", version, about)]
struct Cli {
    /// Browser to drive: chrome or chrome-headless
    #[arg(long, env = "BROWSER", default_value = "chrome")]
    browser: String,

    /// Base URL of the application under test
    #[arg(long, env = "APP_BASE_URL", default_value = "http://localhost:4200")]
    base_url: String,

    /// Where the step-timing artifact is written
    #[arg(long, default_value = "reports/step-timings.json")]
    report: PathBuf,

    /// Where failure screenshots are written
    #[arg(long, default_value = "reports/screenshots")]
    screenshot_dir: PathBuf,

    /// Run only scenarios carrying this tag
    #[arg(long)]
    tag: Option<String>,

    /// Failure probability of the chaos step
    #[arg(long, default_value_t = 0.3)]
    chaos_probability: f64,

    /// Seed for the chaos step, for reproducible runs
    #[arg(long)]
    seed: Option<u64>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    // Unsupported browsers fail here, before anything is launched.
    let kind = BrowserKind::parse(&cli.browser)?;
    let config = Config {
        browser: BrowserConfig {
            kind,
            ..Default::default()
        },
        app: AppConfig {
            base_url: cli.base_url,
            ..Default::default()
        },
        telemetry: TelemetryConfig {
            report_path: cli.report,
            screenshot_dir: cli.screenshot_dir,
        },
        chaos: ChaosConfig {
            failure_probability: cli.chaos_probability,
            seed: cli.seed,
        },
        timeouts: Default::default(),
    };

    let mut registry = StepRegistry::new();
    steps::register_all(&mut registry).context("step registration failed")?;

    let mut suite = steps::default_suite();
    if let Some(tag) = &cli.tag {
        suite.retain(|s| s.has_tag(tag));
        info!(tag = %tag, scenarios = suite.len(), "tag filter applied");
    }

    let world = Arc::new(World::new(ChromeBrowser::new(), config.clone())?);
    let collector = Arc::new(TelemetryCollector::new(&config.telemetry));
    let mut runner = SuiteRunner::new(world, registry);
    runner.add_sink(Arc::new(ConsoleSink));
    runner.add_sink(collector);

    let summary = runner.run(&suite).await.context("suite execution failed")?;

    info!(
        total = summary.total,
        passed = summary.passed,
        failed = summary.failed,
        flaky_failed = summary.flaky_failed,
        "suite finished"
    );

    if !summary.success() {
        if summary.genuine_failures() == 0 {
            warn!("all failures came from flaky-tagged scenarios");
        }
        std::process::exit(1);
    }
    Ok(())
}
