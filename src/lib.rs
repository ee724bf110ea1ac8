//! Scenario-Harness: end-to-end scenarios for browser and REST checks
//!
//! This library drives browsers over the W3C WebDriver protocol and REST APIs over HTTP,
//! running named scenarios with bounded waits, typed failures and one verdict per scenario.

pub mod error;
pub mod config;

pub mod driver;
pub mod http;
pub mod credentials;
pub mod wait;
pub mod session;
pub mod steps;
pub mod assertion;
pub mod report;
pub mod scenario;
pub mod scenarios;

// Re-exports
pub use error::{Error, Result};

/// Scenario-Harness library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
