//! Session management traits

use async_trait::async_trait;

use crate::config::SessionConfig;
use crate::session::state::Session;
use crate::Result;

/// Session manager trait
///
/// Acquires and releases automation sessions. Every session returned by `open` must be passed
/// to `close` exactly once.
#[async_trait]
pub trait SessionManager: Send + Sync {
    /// Open a browser or HTTP session as configured
    async fn open(&self, config: &SessionConfig) -> Result<Session>;

    /// Tear down a session, releasing its backend
    async fn close(&self, session: Session) -> Result<()>;

    /// Number of open sessions
    fn session_count(&self) -> usize;

    /// Ids of open sessions
    fn active_sessions(&self) -> Vec<String>;
}
