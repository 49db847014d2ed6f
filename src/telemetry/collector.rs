use crate::core::TelemetryConfig;
use crate::errors::Result;
use crate::telemetry::event::StepEvent;
use crate::telemetry::sink::EventSink;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::info;
use uuid::Uuid;

/// One entry per successfully executed step. Failed steps are excluded on
/// purpose: their timing reflects a timeout, not real work.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepRecord {
    pub step: String,
    pub scenario: String,
    pub duration_ms: f64,
    pub timestamp: DateTime<Utc>,
}

/// On-disk shape of the telemetry artifact.
#[derive(Debug, Serialize, Deserialize)]
pub struct TimingReport {
    pub run_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub records: Vec<StepRecord>,
}

/// Accumulates step durations in memory and flushes them to a JSON artifact
/// at suite end. Each run fully overwrites the previous artifact; there is
/// no cross-run merge.
pub struct TelemetryCollector {
    output_path: PathBuf,
    run_id: Uuid,
    records: Mutex<Vec<StepRecord>>,
}

impl TelemetryCollector {
    pub fn new(config: &TelemetryConfig) -> Self {
        Self {
            output_path: config.report_path.clone(),
            run_id: Uuid::new_v4(),
            records: Mutex::new(Vec::new()),
        }
    }

    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    /// Snapshot of the records collected so far, in execution order.
    pub fn records(&self) -> Vec<StepRecord> {
        self.records.lock().clone()
    }
}

impl EventSink for TelemetryCollector {
    fn on_step_finished(&self, event: &StepEvent) {
        if !event.passed {
            return;
        }
        self.records.lock().push(StepRecord {
            step: event.step.clone(),
            scenario: event.scenario.clone(),
            duration_ms: event.duration_ms,
            timestamp: event.timestamp,
        });
    }

    fn flush(&self) -> Result<()> {
        let records = self.records.lock().clone();
        if records.is_empty() {
            // An empty artifact would read as "a run happened and nothing
            // was measured"; skip it instead.
            info!("no step timings recorded, skipping telemetry artifact");
            return Ok(());
        }

        if let Some(parent) = self.output_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let report = TimingReport {
            run_id: self.run_id,
            generated_at: Utc::now(),
            records,
        };
        let json = serde_json::to_string_pretty(&report)?;
        std::fs::write(&self.output_path, json)?;

        info!(
            path = %self.output_path.display(),
            records = report.records.len(),
            "telemetry artifact written"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::TelemetryConfig;

    fn event(step: &str, passed: bool, duration_ms: f64) -> StepEvent {
        StepEvent {
            scenario: "Login with valid credentials".to_string(),
            step: step.to_string(),
            duration_ms,
            timestamp: Utc::now(),
            passed,
            expected_flaky: false,
        }
    }

    fn collector_at(path: PathBuf) -> TelemetryCollector {
        TelemetryCollector::new(&TelemetryConfig {
            report_path: path,
            screenshot_dir: PathBuf::from("reports/screenshots"),
        })
    }

    #[test]
    fn records_only_passed_steps_in_order() {
        let collector = collector_at(PathBuf::from("unused.json"));
        collector.on_step_finished(&event("I am on the login page", true, 12.0));
        collector.on_step_finished(&event("I click the login button", false, 5000.0));
        collector.on_step_finished(&event("I should see the project list", true, 80.5));

        let records = collector.records();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].step, "I am on the login page");
        assert_eq!(records[1].step, "I should see the project list");
        assert!(records.iter().all(|r| r.duration_ms >= 0.0));
    }

    #[test]
    fn flush_writes_exactly_the_recorded_steps() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("step-timings.json");
        let collector = collector_at(path.clone());

        collector.on_step_finished(&event("step one", true, 1.0));
        collector.on_step_finished(&event("step two", true, 2.0));
        collector.flush().unwrap();

        let report: TimingReport =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(report.run_id, collector.run_id());
        assert_eq!(report.records.len(), 2);
        assert_eq!(report.records[0].step, "step one");
        assert_eq!(report.records[1].step, "step two");
    }

    #[test]
    fn flush_without_records_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("step-timings.json");
        let collector = collector_at(path.clone());

        collector.flush().unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn flush_overwrites_the_previous_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("step-timings.json");

        let first = collector_at(path.clone());
        first.on_step_finished(&event("old step", true, 1.0));
        first.flush().unwrap();

        let second = collector_at(path.clone());
        second.on_step_finished(&event("new step", true, 2.0));
        second.flush().unwrap();

        let report: TimingReport =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(report.records.len(), 1);
        assert_eq!(report.records[0].step, "new step");
    }
}
