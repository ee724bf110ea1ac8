//! Scenario trait

use async_trait::async_trait;

use crate::config::{Config, SessionConfig};
use crate::scenario::context::ScenarioContext;
use crate::Result;

/// One end-to-end test case
///
/// `run` drives steps through the context and returns on the first failure. The session is
/// opened before `run` and closed after it by the runner.
#[async_trait]
pub trait Scenario: Send + Sync {
    /// Unique name used for selection and reporting
    fn name(&self) -> &str;

    fn description(&self) -> &str {
        ""
    }

    /// Session this scenario needs
    fn session_config(&self, config: &Config) -> SessionConfig;

    async fn run(&self, ctx: &mut ScenarioContext) -> Result<()>;
}
