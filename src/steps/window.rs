//! Window enumeration and cleanup

use async_trait::async_trait;
use tracing::{info, instrument, warn};

use crate::driver::{ElementRef, WindowHandle};
use crate::session::Session;
use crate::steps::traits::Step;
use crate::wait::NewWindowsSince;
use crate::{Error, Result};

/// Handles of all open windows
#[derive(Debug, Clone, Copy, Default)]
pub struct EnumerateWindows;

#[async_trait]
impl Step for EnumerateWindows {
    type Output = Vec<WindowHandle>;

    fn name(&self) -> String {
        "EnumerateWindows".to_string()
    }

    async fn execute(&self, session: &mut Session) -> Result<Vec<WindowHandle>> {
        session.browser()?.window_handles().await
    }
}

/// Close one window and return to the window that was active before
#[derive(Debug, Clone)]
pub struct CloseWindow {
    pub handle: WindowHandle,
}

impl CloseWindow {
    pub fn new(handle: WindowHandle) -> Self {
        Self { handle }
    }
}

#[async_trait]
impl Step for CloseWindow {
    type Output = ();

    fn name(&self) -> String {
        format!("CloseWindow({})", self.handle)
    }

    #[instrument(skip(self, session), fields(handle = %self.handle))]
    async fn execute(&self, session: &mut Session) -> Result<()> {
        let browser = session.browser()?.clone();
        let original = browser.window_handle().await?;

        browser.switch_to_window(&self.handle).await?;
        browser.close_window().await?;

        let context = session.context_mut();
        context.frame = None;
        if original == self.handle {
            // Closed the active window; nothing to return to
            context.window = None;
        } else {
            browser.switch_to_window(&original).await?;
            context.window = Some(original);
        }
        Ok(())
    }
}

/// Click a trigger that opens new windows, then close every new window
///
/// Yields the closed handles. The window active before the click is active again afterwards,
/// at its top-level document.
#[derive(Debug, Clone)]
pub struct CloseNewWindows {
    pub trigger: ElementRef,
}

impl CloseNewWindows {
    pub fn new(trigger: ElementRef) -> Self {
        Self { trigger }
    }
}

#[async_trait]
impl Step for CloseNewWindows {
    type Output = Vec<WindowHandle>;

    fn name(&self) -> String {
        format!("CloseNewWindows({})", self.trigger.locator())
    }

    #[instrument(skip(self, session), fields(trigger = %self.trigger))]
    async fn execute(&self, session: &mut Session) -> Result<Vec<WindowHandle>> {
        let browser = session.browser()?.clone();
        let original = browser.window_handle().await?;
        let before = browser.window_handles().await?;

        browser.click(&self.trigger).await?;

        let waited = session
            .wait_policy()
            .wait_until(session, &NewWindowsSince::new(before.iter().cloned()))
            .await;
        let fresh = match waited {
            Ok(fresh) => fresh,
            Err(Error::ConditionTimeout { .. }) => {
                let actual = browser
                    .window_handles()
                    .await
                    .map(|h| h.len())
                    .unwrap_or(before.len());
                return Err(Error::unexpected_window_count(before.len(), actual));
            }
            Err(e) => return Err(e),
        };

        let mut closed = Vec::with_capacity(fresh.len());
        let mut failure = None;
        for handle in &fresh {
            let result: Result<()> = async {
                browser.switch_to_window(handle).await?;
                browser.close_window().await
            }
            .await;
            match result {
                Ok(()) => closed.push(handle.clone()),
                Err(e) => {
                    warn!("Failed to close window {}: {}", handle, e);
                    failure = Some(e);
                    break;
                }
            }
        }

        browser.switch_to_window(&original).await?;
        let context = session.context_mut();
        context.window = Some(original);
        context.frame = None;

        if let Some(e) = failure {
            return Err(e);
        }
        info!("Closed {} new window(s)", closed.len());
        Ok(closed)
    }
}
