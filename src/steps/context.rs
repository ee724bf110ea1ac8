//! Frame and window switching

use async_trait::async_trait;
use std::fmt;
use tracing::{debug, instrument};

use crate::driver::WindowHandle;
use crate::session::Session;
use crate::steps::traits::Step;
use crate::{Error, Result};

/// Where element operations should apply next
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContextTarget {
    /// Child frame of the current document, by id or name
    Frame(String),
    /// Top-level document of the current window
    DefaultContent,
    Window(WindowHandle),
}

impl fmt::Display for ContextTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContextTarget::Frame(id) => write!(f, "frame {}", id),
            ContextTarget::DefaultContent => f.write_str("default content"),
            ContextTarget::Window(handle) => write!(f, "window {}", handle),
        }
    }
}

/// Change the active frame or window
#[derive(Debug, Clone)]
pub struct SwitchContext {
    pub target: ContextTarget,
}

impl SwitchContext {
    pub fn frame<S: Into<String>>(id: S) -> Self {
        Self {
            target: ContextTarget::Frame(id.into()),
        }
    }

    pub fn default_content() -> Self {
        Self {
            target: ContextTarget::DefaultContent,
        }
    }

    pub fn window(handle: WindowHandle) -> Self {
        Self {
            target: ContextTarget::Window(handle),
        }
    }
}

#[async_trait]
impl Step for SwitchContext {
    type Output = ();

    fn name(&self) -> String {
        format!("SwitchContext({})", self.target)
    }

    #[instrument(skip(self, session), fields(target = %self.target))]
    async fn execute(&self, session: &mut Session) -> Result<()> {
        let browser = session.browser()?.clone();
        let switched = match &self.target {
            ContextTarget::Frame(id) => browser.switch_to_frame(id).await,
            ContextTarget::DefaultContent => browser.switch_to_default_content().await,
            ContextTarget::Window(handle) => browser.switch_to_window(handle).await,
        };

        // A missing frame is a context problem, not an element lookup failure.
        // Transport failures keep their own kind.
        switched.map_err(|e| match e {
            Error::ElementNotFound(msg) => {
                Error::context_switch(format!("{}: {}", self.target, msg))
            }
            other => other,
        })?;

        let context = session.context_mut();
        match &self.target {
            ContextTarget::Frame(id) => context.frame = Some(id.clone()),
            ContextTarget::DefaultContent => context.frame = None,
            ContextTarget::Window(handle) => {
                context.window = Some(handle.clone());
                context.frame = None;
            }
        }
        debug!("Context is now {}", session.context());
        Ok(())
    }
}
