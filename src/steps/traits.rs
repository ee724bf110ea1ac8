//! Step trait

use async_trait::async_trait;

use crate::session::Session;
use crate::Result;

/// A named, composable unit of work
#[async_trait]
pub trait Step: Send + Sync {
    type Output: Send;

    /// Name reported in step events and verdicts
    fn name(&self) -> String;

    async fn execute(&self, session: &mut Session) -> Result<Self::Output>;
}
