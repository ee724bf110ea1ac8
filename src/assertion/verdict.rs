//! Verdicts

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::{Error, ErrorKind};

/// Terminal status of a scenario
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerdictStatus {
    Passed,
    Failed,
    /// Never reached its first step
    Skipped,
}

/// Terminal outcome of one scenario execution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Verdict {
    pub scenario: String,
    pub status: VerdictStatus,
    /// Step that was running when the scenario halted
    #[serde(skip_serializing_if = "Option::is_none")]
    pub step: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<ErrorKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual: Option<String>,
    pub elapsed_ms: u64,
    pub finished_at: DateTime<Utc>,
}

impl Verdict {
    pub fn passed<S: Into<String>>(scenario: S, elapsed: Duration) -> Self {
        Self {
            scenario: scenario.into(),
            status: VerdictStatus::Passed,
            step: None,
            message: None,
            error_kind: None,
            expected: None,
            actual: None,
            elapsed_ms: elapsed.as_millis() as u64,
            finished_at: Utc::now(),
        }
    }

    pub fn failed<S: Into<String>>(scenario: S, step: Option<String>, error: &Error, elapsed: Duration) -> Self {
        let (expected, actual) = match error {
            Error::AssertionFailure {
                expected, actual, ..
            } => (Some(expected.clone()), Some(actual.clone())),
            _ => (None, None),
        };
        Self {
            scenario: scenario.into(),
            status: VerdictStatus::Failed,
            step,
            message: Some(error.to_string()),
            error_kind: Some(error.kind()),
            expected,
            actual,
            elapsed_ms: elapsed.as_millis() as u64,
            finished_at: Utc::now(),
        }
    }

    pub fn skipped<S: Into<String>, R: Into<String>>(scenario: S, reason: R, error_kind: Option<ErrorKind>) -> Self {
        Self {
            scenario: scenario.into(),
            status: VerdictStatus::Skipped,
            step: None,
            message: Some(reason.into()),
            error_kind,
            expected: None,
            actual: None,
            elapsed_ms: 0,
            finished_at: Utc::now(),
        }
    }

    pub fn is_passed(&self) -> bool {
        self.status == VerdictStatus::Passed
    }
}
