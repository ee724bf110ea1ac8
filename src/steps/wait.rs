//! Explicit wait as a step

use async_trait::async_trait;

use crate::session::Session;
use crate::steps::traits::Step;
use crate::wait::{Condition, WaitPolicy};
use crate::Result;

/// Wait for a condition using the session's policy, or an override
#[derive(Debug, Clone)]
pub struct WaitFor<C> {
    pub condition: C,
    pub policy: Option<WaitPolicy>,
}

impl<C: Condition> WaitFor<C> {
    pub fn new(condition: C) -> Self {
        Self {
            condition,
            policy: None,
        }
    }

    pub fn with_policy(mut self, policy: WaitPolicy) -> Self {
        self.policy = Some(policy);
        self
    }
}

#[async_trait]
impl<C: Condition> Step for WaitFor<C> {
    type Output = C::Output;

    fn name(&self) -> String {
        format!("WaitFor({})", self.condition.describe())
    }

    async fn execute(&self, session: &mut Session) -> Result<C::Output> {
        let policy = self.policy.unwrap_or_else(|| session.wait_policy());
        policy.wait_until(session, &self.condition).await
    }
}
