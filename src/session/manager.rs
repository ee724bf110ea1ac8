//! Session manager implementation
//!
//! Opens browser and HTTP sessions through pluggable factories and tracks which are still live.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use tracing::{debug, info, instrument, warn};

use crate::config::{Config, SessionConfig, SessionKind, WindowSize};
use crate::driver::{BrowserDriver, DriverFactory, WebDriverFactory};
use crate::http::{HttpClientFactory, ReqwestClientFactory};
use crate::session::state::{Session, SessionBackend};
use crate::session::traits::SessionManager;
use crate::{Error, Result};

/// Session manager implementation
pub struct SessionManagerImpl {
    pub(super) sessions: Arc<RwLock<HashMap<String, SessionKind>>>,
    driver_factory: Arc<dyn DriverFactory>,
    http_factory: Arc<dyn HttpClientFactory>,
}

impl SessionManagerImpl {
    /// Create a new session manager
    pub fn new(driver_factory: Arc<dyn DriverFactory>, http_factory: Arc<dyn HttpClientFactory>) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            driver_factory,
            http_factory,
        }
    }

    /// Create a session manager backed by a WebDriver endpoint and reqwest
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            Arc::new(
                WebDriverFactory::new(&config.webdriver_url, &config.browser)
                    .with_command_timeout(config.command_timeout()),
            ),
            Arc::new(ReqwestClientFactory),
        )
    }

    async fn open_browser(&self, config: &SessionConfig) -> Result<Session> {
        let driver = self.driver_factory.launch(config).await?;

        if let Err(e) = Self::configure_browser(driver.as_ref(), config).await {
            warn!("Browser setup failed, quitting driver: {}", e);
            if let Err(quit_err) = driver.quit().await {
                warn!("Failed to quit driver after setup error: {}", quit_err);
            }
            return Err(match e {
                Error::SessionInit(_) => e,
                other => Error::session_init(other.to_string()),
            });
        }

        let window = driver.window_handle().await.ok();
        let mut session = Session::new(SessionBackend::Browser(driver), config.clone());
        session.context_mut().window = window;
        Ok(session)
    }

    async fn configure_browser(driver: &dyn BrowserDriver, config: &SessionConfig) -> Result<()> {
        driver.set_implicit_wait(config.implicit_wait).await?;

        match config.window {
            WindowSize::Maximized => driver.maximize_window().await?,
            WindowSize::Fixed { width, height } => driver.set_window_size(width, height).await?,
            WindowSize::Unspecified => {}
        }

        if let Some(url) = &config.base_url {
            driver.navigate(url).await?;
        }
        Ok(())
    }

    fn register(&self, session: &Session) -> Result<()> {
        self.sessions
            .write()
            .map_err(|e| Error::internal(format!("Lock error: {}", e)))?
            .insert(session.id().to_string(), session.kind());
        Ok(())
    }

    fn unregister(&self, id: &str) -> Result<bool> {
        Ok(self
            .sessions
            .write()
            .map_err(|e| Error::internal(format!("Lock error: {}", e)))?
            .remove(id)
            .is_some())
    }
}

#[async_trait]
impl SessionManager for SessionManagerImpl {
    #[instrument(skip(self, config), fields(kind = ?config.kind))]
    async fn open(&self, config: &SessionConfig) -> Result<Session> {
        let session = match config.kind {
            SessionKind::Browser => self.open_browser(config).await?,
            SessionKind::Http => {
                let client = self.http_factory.build(config)?;
                Session::new(SessionBackend::Http(client), config.clone())
            }
        };

        if let Err(e) = self.register(&session) {
            warn!("Failed to register session {}, releasing it: {}", session.id(), e);
            if let SessionBackend::Browser(driver) = session.backend() {
                if let Err(quit_err) = driver.quit().await {
                    warn!("Failed to quit driver after register error: {}", quit_err);
                }
            }
            return Err(e);
        }
        info!("Opened {:?} session {}", session.kind(), session.id());
        Ok(session)
    }

    #[instrument(skip(self, session), fields(session = %session.id()))]
    async fn close(&self, session: Session) -> Result<()> {
        if !self.unregister(session.id())? {
            return Err(Error::session_closed(session.id()));
        }

        if let SessionBackend::Browser(driver) = session.backend() {
            if session.config().clear_cookies_on_close {
                if let Err(e) = driver.delete_all_cookies().await {
                    warn!("Failed to clear cookies: {}", e);
                }
            }
            driver.quit().await?;
        }

        debug!("Closed session {}", session.id());
        Ok(())
    }

    fn session_count(&self) -> usize {
        self.sessions.read().map(|s| s.len()).unwrap_or(0)
    }

    fn active_sessions(&self) -> Vec<String> {
        self.sessions
            .read()
            .map(|s| s.keys().cloned().collect())
            .unwrap_or_default()
    }
}
