//! Step events, report sinks and the run report

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::{Component, Path};
use std::sync::Mutex;
use tracing::{error, info};

use crate::assertion::{Verdict, VerdictStatus};
use crate::{Error, Result, VERSION};

/// How a step ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepOutcome {
    Passed,
    Failed,
}

/// One executed step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepEvent {
    pub scenario: String,
    pub step: String,
    pub outcome: StepOutcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub at: DateTime<Utc>,
}

impl StepEvent {
    pub fn passed<S: Into<String>, T: Into<String>>(scenario: S, step: T) -> Self {
        Self {
            scenario: scenario.into(),
            step: step.into(),
            outcome: StepOutcome::Passed,
            message: None,
            at: Utc::now(),
        }
    }

    pub fn failed<S: Into<String>, T: Into<String>>(scenario: S, step: T, error: &Error) -> Self {
        Self {
            scenario: scenario.into(),
            step: step.into(),
            outcome: StepOutcome::Failed,
            message: Some(error.to_string()),
            at: Utc::now(),
        }
    }
}

/// Receives step events and verdicts
pub trait ReportSink: Send + Sync {
    fn step(&self, event: &StepEvent);

    fn verdict(&self, verdict: &Verdict);
}

/// Logs events through `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReportSink;

impl ReportSink for TracingReportSink {
    fn step(&self, event: &StepEvent) {
        match event.outcome {
            StepOutcome::Passed => info!(
                scenario = %event.scenario,
                step = %event.step,
                "step passed"
            ),
            StepOutcome::Failed => error!(
                scenario = %event.scenario,
                step = %event.step,
                detail = event.message.as_deref().unwrap_or(""),
                "step failed"
            ),
        }
    }

    fn verdict(&self, verdict: &Verdict) {
        match verdict.status {
            VerdictStatus::Passed => info!(
                scenario = %verdict.scenario,
                elapsed_ms = verdict.elapsed_ms,
                "PASSED"
            ),
            VerdictStatus::Failed => error!(
                scenario = %verdict.scenario,
                step = verdict.step.as_deref().unwrap_or("-"),
                kind = ?verdict.error_kind,
                detail = verdict.message.as_deref().unwrap_or(""),
                "FAILED"
            ),
            VerdictStatus::Skipped => info!(
                scenario = %verdict.scenario,
                reason = verdict.message.as_deref().unwrap_or(""),
                "SKIPPED"
            ),
        }
    }
}

/// Keeps everything in memory
#[derive(Debug, Default)]
pub struct MemoryReportSink {
    steps: Mutex<Vec<StepEvent>>,
    verdicts: Mutex<Vec<Verdict>>,
}

impl MemoryReportSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn steps(&self) -> Vec<StepEvent> {
        self.steps
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn verdicts(&self) -> Vec<Verdict> {
        self.verdicts
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl ReportSink for MemoryReportSink {
    fn step(&self, event: &StepEvent) {
        self.steps
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(event.clone());
    }

    fn verdict(&self, verdict: &Verdict) {
        self.verdicts
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(verdict.clone());
    }
}

/// Counts per status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
}

/// All verdicts of one run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    pub version: String,
    pub generated_at: DateTime<Utc>,
    pub summary: RunSummary,
    pub verdicts: Vec<Verdict>,
}

impl RunReport {
    pub fn new(verdicts: Vec<Verdict>) -> Self {
        let mut summary = RunSummary {
            total: verdicts.len(),
            ..Default::default()
        };
        for verdict in &verdicts {
            match verdict.status {
                VerdictStatus::Passed => summary.passed += 1,
                VerdictStatus::Failed => summary.failed += 1,
                VerdictStatus::Skipped => summary.skipped += 1,
            }
        }
        Self {
            version: VERSION.to_string(),
            generated_at: Utc::now(),
            summary,
            verdicts,
        }
    }

    /// Every scenario passed (an empty run counts as passing)
    pub fn all_passed(&self) -> bool {
        self.summary.passed == self.summary.total
    }

    /// Write the report as pretty JSON to a relative path
    pub fn write_to_path(&self, path: &Path) -> Result<()> {
        if path.is_absolute() || path.has_root() {
            return Err(Error::configuration(
                "report path must be relative and must not start with a separator",
            ));
        }
        if path
            .components()
            .any(|c| matches!(c, Component::ParentDir | Component::Prefix(_)))
        {
            return Err(Error::configuration(
                "report path cannot contain '..' or drive prefixes",
            ));
        }
        let payload = serde_json::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, payload)?;
        Ok(())
    }

    pub fn write_to_writer<W: Write>(&self, writer: &mut W) -> Result<()> {
        let payload = serde_json::to_string_pretty(self)?;
        writer.write_all(payload.as_bytes())?;
        writer.write_all(b"\n")?;
        Ok(())
    }
}
