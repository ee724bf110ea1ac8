//! Session handle

use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

use crate::config::{SessionConfig, SessionKind};
use crate::driver::{BrowserDriver, WindowHandle};
use crate::http::HttpClient;
use crate::wait::WaitPolicy;
use crate::{Error, Result};

/// Automation backend behind a session
#[derive(Debug, Clone)]
pub enum SessionBackend {
    Browser(Arc<dyn BrowserDriver>),
    Http(Arc<dyn HttpClient>),
}

impl SessionBackend {
    pub fn kind(&self) -> SessionKind {
        match self {
            SessionBackend::Browser(_) => SessionKind::Browser,
            SessionBackend::Http(_) => SessionKind::Http,
        }
    }
}

/// Which window and frame element operations currently apply to
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NavigationContext {
    pub window: Option<WindowHandle>,
    /// `None` is the top-level document
    pub frame: Option<String>,
}

impl fmt::Display for NavigationContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let window = self.window.as_ref().map(WindowHandle::as_str).unwrap_or("-");
        match &self.frame {
            Some(frame) => write!(f, "{} > frame {}", window, frame),
            None => write!(f, "{} > top", window),
        }
    }
}

/// A live automation session
///
/// Owned by exactly one scenario. Obtained from
/// [`SessionManager::open`](crate::session::SessionManager::open) and released by passing it
/// back to [`SessionManager::close`](crate::session::SessionManager::close).
#[derive(Debug)]
pub struct Session {
    id: String,
    backend: SessionBackend,
    context: NavigationContext,
    wait: WaitPolicy,
    config: SessionConfig,
}

impl Session {
    pub fn new(backend: SessionBackend, config: SessionConfig) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            backend,
            context: NavigationContext::default(),
            wait: WaitPolicy::from_config(&config),
            config,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn kind(&self) -> SessionKind {
        self.backend.kind()
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn backend(&self) -> &SessionBackend {
        &self.backend
    }

    /// Browser driver, or an error for HTTP sessions
    pub fn browser(&self) -> Result<&Arc<dyn BrowserDriver>> {
        match &self.backend {
            SessionBackend::Browser(driver) => Ok(driver),
            SessionBackend::Http(_) => Err(Error::internal(format!(
                "Session {} has no browser driver",
                self.id
            ))),
        }
    }

    /// HTTP client, or an error for browser sessions
    pub fn http(&self) -> Result<&Arc<dyn HttpClient>> {
        match &self.backend {
            SessionBackend::Http(client) => Ok(client),
            SessionBackend::Browser(_) => Err(Error::internal(format!(
                "Session {} has no HTTP client",
                self.id
            ))),
        }
    }

    pub fn wait_policy(&self) -> WaitPolicy {
        self.wait
    }

    pub fn set_wait_policy(&mut self, policy: WaitPolicy) {
        self.wait = policy;
    }

    pub fn context(&self) -> &NavigationContext {
        &self.context
    }

    pub(crate) fn context_mut(&mut self) -> &mut NavigationContext {
        &mut self.context
    }
}
