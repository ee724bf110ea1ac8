//! Native dialog handling

use async_trait::async_trait;
use tracing::{info, instrument};

use crate::session::Session;
use crate::steps::traits::Step;
use crate::wait::AlertPresent;
use crate::{Error, Result};

/// Wait for a dialog, check its text and accept it
///
/// Yields the dialog text. On a text mismatch the dialog is left open.
#[derive(Debug, Clone)]
pub struct HandleAlert {
    pub expected: String,
}

impl HandleAlert {
    pub fn containing<S: Into<String>>(expected: S) -> Self {
        Self {
            expected: expected.into(),
        }
    }
}

#[async_trait]
impl Step for HandleAlert {
    type Output = String;

    fn name(&self) -> String {
        format!("HandleAlert(contains '{}')", self.expected)
    }

    #[instrument(skip(self, session), fields(expected = %self.expected))]
    async fn execute(&self, session: &mut Session) -> Result<String> {
        let policy = session.wait_policy();
        let text = policy
            .wait_until(session, &AlertPresent)
            .await
            .map_err(|e| match e {
                Error::ConditionTimeout { timeout, .. } => Error::no_alert_present(format!(
                    "no dialog within {}ms",
                    timeout.as_millis()
                )),
                other => other,
            })?;

        if !text.contains(&self.expected) {
            return Err(Error::assertion(
                self.name(),
                format!("alert text containing '{}'", self.expected),
                format!("'{}'", text),
            ));
        }

        session.browser()?.accept_alert().await?;
        info!("Accepted alert: {}", text);
        Ok(text)
    }
}
