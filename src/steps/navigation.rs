//! Page loads and document reads

use async_trait::async_trait;
use tracing::{debug, instrument};

use crate::session::Session;
use crate::steps::traits::Step;
use crate::{Error, Result};

/// Load a URL in the current window
#[derive(Debug, Clone)]
pub struct Navigate {
    pub url: String,
}

impl Navigate {
    pub fn new<S: Into<String>>(url: S) -> Self {
        Self { url: url.into() }
    }
}

#[async_trait]
impl Step for Navigate {
    type Output = ();

    fn name(&self) -> String {
        format!("Navigate({})", self.url)
    }

    #[instrument(skip(self, session), fields(url = %self.url))]
    async fn execute(&self, session: &mut Session) -> Result<()> {
        reqwest::Url::parse(&self.url)
            .map_err(|e| Error::navigation(format!("{}: {}", self.url, e)))?;

        session
            .browser()?
            .navigate(&self.url)
            .await
            .map_err(|e| match e {
                Error::Navigation(_) | Error::SessionClosed(_) => e,
                other => Error::navigation(format!("{}: {}", self.url, other)),
            })?;

        // A page load always lands in the top-level document
        session.context_mut().frame = None;
        debug!("Navigated to {}", self.url);
        Ok(())
    }
}

/// Serialized DOM of the current context
#[derive(Debug, Clone, Copy, Default)]
pub struct ReadPageSource;

#[async_trait]
impl Step for ReadPageSource {
    type Output = String;

    fn name(&self) -> String {
        "ReadPageSource".to_string()
    }

    async fn execute(&self, session: &mut Session) -> Result<String> {
        session.browser()?.page_source().await
    }
}
