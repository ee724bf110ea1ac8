//! Script execution

use async_trait::async_trait;
use serde_json::Value;
use tracing::instrument;

use crate::session::Session;
use crate::steps::traits::Step;
use crate::Result;

/// Run a synchronous script in the current context
#[derive(Debug, Clone)]
pub struct ExecuteScript {
    pub script: String,
    pub args: Vec<Value>,
}

impl ExecuteScript {
    pub fn new<S: Into<String>>(script: S) -> Self {
        Self {
            script: script.into(),
            args: Vec::new(),
        }
    }

    pub fn with_args(mut self, args: Vec<Value>) -> Self {
        self.args = args;
        self
    }

    /// Scroll to the bottom of the document
    pub fn scroll_to_bottom() -> Self {
        Self::new("window.scrollTo(0, document.body.scrollHeight);")
    }
}

#[async_trait]
impl Step for ExecuteScript {
    type Output = Value;

    fn name(&self) -> String {
        let preview: String = self.script.chars().take(40).collect();
        format!("ExecuteScript({})", preview)
    }

    #[instrument(skip(self, session))]
    async fn execute(&self, session: &mut Session) -> Result<Value> {
        session
            .browser()?
            .execute_script(&self.script, self.args.clone())
            .await
    }
}
