//! Bounded polling

use async_trait::async_trait;
use std::time::Duration;
use tokio::time::{sleep, timeout, Instant};
use tracing::{debug, trace};

use crate::config::SessionConfig;
use crate::session::Session;
use crate::{Error, Result};

/// A side-effect-free predicate over a session
///
/// `check` returns `Ok(None)` while the condition is not yet satisfied.
#[async_trait]
pub trait Condition: Send + Sync {
    type Output: Send;

    /// Human-readable description used in timeout errors
    fn describe(&self) -> String;

    async fn check(&self, session: &Session) -> Result<Option<Self::Output>>;
}

/// Timeout and poll interval for explicit waits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitPolicy {
    pub timeout: Duration,
    pub poll_interval: Duration,
}

impl Default for WaitPolicy {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            poll_interval: Duration::from_millis(500),
        }
    }
}

impl WaitPolicy {
    pub fn new(timeout: Duration, poll_interval: Duration) -> Self {
        Self {
            timeout,
            poll_interval,
        }
    }

    pub fn from_config(config: &SessionConfig) -> Self {
        Self::new(config.timeout, config.poll_interval)
    }

    /// Same poll interval, different budget
    pub fn with_timeout(self, timeout: Duration) -> Self {
        Self { timeout, ..self }
    }

    /// Poll `condition` until it yields a value or the timeout elapses
    pub async fn wait_until<C>(&self, session: &Session, condition: &C) -> Result<C::Output>
    where
        C: Condition + ?Sized,
    {
        let started = Instant::now();
        let deadline = started + self.timeout;
        let mut polls: u32 = 0;

        loop {
            polls += 1;
            // A check that never returns must not outlive the deadline
            let remaining = deadline.saturating_duration_since(Instant::now());
            let checked = match timeout(remaining, condition.check(session)).await {
                Ok(result) => result,
                Err(_) => {
                    debug!("Poll {} still running at deadline: {}", polls, condition.describe());
                    return Err(Error::condition_timeout(condition.describe(), self.timeout));
                }
            };

            match checked {
                Ok(Some(value)) => {
                    debug!(
                        "Condition met after {} poll(s) in {:?}: {}",
                        polls,
                        started.elapsed(),
                        condition.describe()
                    );
                    return Ok(value);
                }
                Ok(None) => {}
                Err(e) if e.is_pending_state() => {
                    trace!("Poll {} pending: {}", polls, e);
                }
                Err(e) => return Err(e),
            }

            let now = Instant::now();
            if now >= deadline {
                return Err(Error::condition_timeout(condition.describe(), self.timeout));
            }
            sleep(self.poll_interval.min(deadline - now)).await;
        }
    }
}
