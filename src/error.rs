//! Unified error types for Scenario-Harness

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Unified Result type
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for Scenario-Harness
#[derive(Error, Debug)]
pub enum Error {
    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Session could not be created or configured
    #[error("Session init failed: {0}")]
    SessionInit(String),

    /// Session already torn down
    #[error("Session closed: {0}")]
    SessionClosed(String),

    /// A bounded wait ran out of time
    #[error("Timed out after {}ms waiting for {condition}", timeout.as_millis())]
    ConditionTimeout { condition: String, timeout: Duration },

    /// Frame or window switch failed
    #[error("Context switch failed: {0}")]
    ContextSwitch(String),

    /// Navigation failed
    #[error("Navigation failed: {0}")]
    Navigation(String),

    /// The expected extra window never showed up
    #[error("Unexpected window count: expected more than {expected_more_than}, found {actual}")]
    UnexpectedWindowCount { expected_more_than: usize, actual: usize },

    /// No native dialog was open
    #[error("No alert present: {0}")]
    NoAlertPresent(String),

    /// Expected-vs-actual mismatch
    #[error("Assertion failed in '{step}': expected {expected}, got {actual}")]
    AssertionFailure {
        step: String,
        expected: String,
        actual: String,
    },

    /// Element not found
    #[error("Element not found: {0}")]
    ElementNotFound(String),

    /// Element reference no longer attached to the DOM
    #[error("Stale element: {0}")]
    StaleElement(String),

    /// Element present but not interactable
    #[error("Element not interactable: {0}")]
    ElementNotInteractable(String),

    /// WebDriver protocol errors
    #[error("Driver error: {0}")]
    Driver(String),

    /// HTTP transport errors
    #[error("HTTP error: {0}")]
    Http(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Stable, serializable classification of an [`Error`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Io,
    Serialization,
    SessionInit,
    SessionClosed,
    ConditionTimeout,
    ContextSwitch,
    Navigation,
    UnexpectedWindowCount,
    NoAlertPresent,
    AssertionFailure,
    ElementNotFound,
    StaleElement,
    ElementNotInteractable,
    Driver,
    Http,
    Configuration,
    Internal,
}

impl Error {
    /// Create a new session init error
    pub fn session_init<S: Into<String>>(msg: S) -> Self {
        Error::SessionInit(msg.into())
    }

    /// Create a new session closed error
    pub fn session_closed<S: Into<String>>(id: S) -> Self {
        Error::SessionClosed(id.into())
    }

    /// Create a new condition timeout error
    pub fn condition_timeout<S: Into<String>>(condition: S, timeout: Duration) -> Self {
        Error::ConditionTimeout {
            condition: condition.into(),
            timeout,
        }
    }

    /// Create a new context switch error
    pub fn context_switch<S: Into<String>>(msg: S) -> Self {
        Error::ContextSwitch(msg.into())
    }

    /// Create a new navigation error
    pub fn navigation<S: Into<String>>(msg: S) -> Self {
        Error::Navigation(msg.into())
    }

    /// Create a new unexpected window count error
    pub fn unexpected_window_count(expected_more_than: usize, actual: usize) -> Self {
        Error::UnexpectedWindowCount {
            expected_more_than,
            actual,
        }
    }

    /// Create a new no alert present error
    pub fn no_alert_present<S: Into<String>>(msg: S) -> Self {
        Error::NoAlertPresent(msg.into())
    }

    /// Create a new assertion failure
    pub fn assertion<S, E, A>(step: S, expected: E, actual: A) -> Self
    where
        S: Into<String>,
        E: Into<String>,
        A: Into<String>,
    {
        Error::AssertionFailure {
            step: step.into(),
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    /// Create a new element not found error
    pub fn element_not_found<S: Into<String>>(what: S) -> Self {
        Error::ElementNotFound(what.into())
    }

    /// Create a new stale element error
    pub fn stale_element<S: Into<String>>(id: S) -> Self {
        Error::StaleElement(id.into())
    }

    /// Create a new element not interactable error
    pub fn not_interactable<S: Into<String>>(msg: S) -> Self {
        Error::ElementNotInteractable(msg.into())
    }

    /// Create a new driver error
    pub fn driver<S: Into<String>>(msg: S) -> Self {
        Error::Driver(msg.into())
    }

    /// Create a new HTTP error
    pub fn http<S: Into<String>>(msg: S) -> Self {
        Error::Http(msg.into())
    }

    /// Create a new configuration error
    pub fn configuration<S: Into<String>>(msg: S) -> Self {
        Error::Configuration(msg.into())
    }

    /// Create a new internal error
    pub fn internal<S: Into<String>>(msg: S) -> Self {
        Error::Internal(msg.into())
    }

    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Io(_) => ErrorKind::Io,
            Error::Serialization(_) => ErrorKind::Serialization,
            Error::SessionInit(_) => ErrorKind::SessionInit,
            Error::SessionClosed(_) => ErrorKind::SessionClosed,
            Error::ConditionTimeout { .. } => ErrorKind::ConditionTimeout,
            Error::ContextSwitch(_) => ErrorKind::ContextSwitch,
            Error::Navigation(_) => ErrorKind::Navigation,
            Error::UnexpectedWindowCount { .. } => ErrorKind::UnexpectedWindowCount,
            Error::NoAlertPresent(_) => ErrorKind::NoAlertPresent,
            Error::AssertionFailure { .. } => ErrorKind::AssertionFailure,
            Error::ElementNotFound(_) => ErrorKind::ElementNotFound,
            Error::StaleElement(_) => ErrorKind::StaleElement,
            Error::ElementNotInteractable(_) => ErrorKind::ElementNotInteractable,
            Error::Driver(_) => ErrorKind::Driver,
            Error::Http(_) => ErrorKind::Http,
            Error::Configuration(_) => ErrorKind::Configuration,
            Error::Internal(_) => ErrorKind::Internal,
        }
    }

    /// Whether a condition poll hitting this error should keep polling.
    ///
    /// Missing, stale and not-yet-interactable elements are ordinary intermediate
    /// states of a live page until the deadline passes.
    pub fn is_pending_state(&self) -> bool {
        matches!(
            self,
            Error::ElementNotFound(_) | Error::StaleElement(_) | Error::ElementNotInteractable(_)
        )
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Http(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_mapping() {
        assert_eq!(
            Error::condition_timeout("x", Duration::from_millis(5)).kind(),
            ErrorKind::ConditionTimeout
        );
        assert_eq!(Error::no_alert_present("none").kind(), ErrorKind::NoAlertPresent);
        assert_eq!(
            Error::assertion("step", "a", "b").kind(),
            ErrorKind::AssertionFailure
        );
    }

    #[test]
    fn test_pending_states() {
        assert!(Error::element_not_found("#id").is_pending_state());
        assert!(Error::stale_element("e1").is_pending_state());
        assert!(!Error::driver("boom").is_pending_state());
        assert!(!Error::context_switch("frame").is_pending_state());
    }

    #[test]
    fn test_timeout_message_names_condition() {
        let err = Error::condition_timeout("element #go to be clickable", Duration::from_secs(2));
        assert_eq!(
            err.to_string(),
            "Timed out after 2000ms waiting for element #go to be clickable"
        );
    }
}
