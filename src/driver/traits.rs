//! Browser driver capability traits
//!
//! The harness talks to a browser only through [`BrowserDriver`]. Any backend that can locate
//! elements, send keys and switch between frames, windows and dialogs can sit behind it.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::config::SessionConfig;
use crate::driver::keys::KeySequence;
use crate::{Error, Result};

/// Selector strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum By {
    Id,
    Name,
    ClassName,
    Css,
    XPath,
    LinkText,
    PartialLinkText,
    TagName,
}

impl By {
    fn label(&self) -> &'static str {
        match self {
            By::Id => "id",
            By::Name => "name",
            By::ClassName => "class",
            By::Css => "css",
            By::XPath => "xpath",
            By::LinkText => "link",
            By::PartialLinkText => "partial-link",
            By::TagName => "tag",
        }
    }
}

/// Declarative description of how to find an element
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Locator {
    pub by: By,
    pub value: String,
}

impl Locator {
    pub fn new<S: Into<String>>(by: By, value: S) -> Self {
        Self {
            by,
            value: value.into(),
        }
    }

    pub fn id<S: Into<String>>(value: S) -> Self {
        Self::new(By::Id, value)
    }

    pub fn name<S: Into<String>>(value: S) -> Self {
        Self::new(By::Name, value)
    }

    pub fn class_name<S: Into<String>>(value: S) -> Self {
        Self::new(By::ClassName, value)
    }

    pub fn css<S: Into<String>>(value: S) -> Self {
        Self::new(By::Css, value)
    }

    pub fn xpath<S: Into<String>>(value: S) -> Self {
        Self::new(By::XPath, value)
    }

    pub fn link_text<S: Into<String>>(value: S) -> Self {
        Self::new(By::LinkText, value)
    }

    pub fn partial_link_text<S: Into<String>>(value: S) -> Self {
        Self::new(By::PartialLinkText, value)
    }

    pub fn tag_name<S: Into<String>>(value: S) -> Self {
        Self::new(By::TagName, value)
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.by.label(), self.value)
    }
}

/// Addressable element resolved in the current browsing context
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementRef {
    id: String,
    locator: Locator,
}

impl ElementRef {
    pub fn new<S: Into<String>>(id: S, locator: Locator) -> Self {
        Self {
            id: id.into(),
            locator,
        }
    }

    /// Driver-assigned element id
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Locator this element was resolved from
    pub fn locator(&self) -> &Locator {
        &self.locator
    }
}

impl fmt::Display for ElementRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.locator, self.id)
    }
}

/// Top-level browsing context handle (tab or window)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WindowHandle(String);

impl WindowHandle {
    pub fn new<S: Into<String>>(handle: S) -> Self {
        Self(handle.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WindowHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Browser driver trait
///
/// One live browser session. Element-level operations act on the current frame of the
/// current window.
#[async_trait]
pub trait BrowserDriver: Send + Sync + fmt::Debug {
    /// Driver session id
    fn session_id(&self) -> &str;

    /// Load a URL in the current window
    async fn navigate(&self, url: &str) -> Result<()>;

    /// URL of the current top-level context
    async fn current_url(&self) -> Result<String>;

    /// Serialized DOM of the current context
    async fn page_source(&self) -> Result<String>;

    /// Find all elements matching the locator (empty when none match)
    async fn find_elements(&self, locator: &Locator) -> Result<Vec<ElementRef>>;

    /// Find the first matching element
    async fn find_element(&self, locator: &Locator) -> Result<ElementRef> {
        self.find_elements(locator)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| Error::element_not_found(locator.to_string()))
    }

    /// Click the element
    async fn click(&self, element: &ElementRef) -> Result<()>;

    /// Send a key sequence to the element
    async fn send_keys(&self, element: &ElementRef, keys: &KeySequence) -> Result<()>;

    /// Clear an editable element
    async fn clear(&self, element: &ElementRef) -> Result<()>;

    /// Rendered text of the element
    async fn element_text(&self, element: &ElementRef) -> Result<String>;

    /// Attribute, falling back to the DOM property of the same name
    async fn element_attribute(&self, element: &ElementRef, name: &str) -> Result<Option<String>>;

    /// Whether the element is rendered
    async fn is_displayed(&self, element: &ElementRef) -> Result<bool>;

    /// Whether the element accepts input
    async fn is_enabled(&self, element: &ElementRef) -> Result<bool>;

    /// Whether the element has been detached from the DOM
    async fn is_stale(&self, element: &ElementRef) -> Result<bool> {
        match self.is_enabled(element).await {
            Ok(_) => Ok(false),
            Err(Error::StaleElement(_)) | Err(Error::ElementNotFound(_)) => Ok(true),
            Err(e) => Err(e),
        }
    }

    /// Switch into a child frame by its id or name attribute
    async fn switch_to_frame(&self, id_or_name: &str) -> Result<()>;

    /// Switch back to the top-level document
    async fn switch_to_default_content(&self) -> Result<()>;

    /// Handle of the current window
    async fn window_handle(&self) -> Result<WindowHandle>;

    /// Handles of all open windows
    async fn window_handles(&self) -> Result<Vec<WindowHandle>>;

    /// Make a window current
    async fn switch_to_window(&self, handle: &WindowHandle) -> Result<()>;

    /// Close the current window
    async fn close_window(&self) -> Result<()>;

    /// Text of the open native dialog
    async fn alert_text(&self) -> Result<String>;

    /// Accept the open native dialog
    async fn accept_alert(&self) -> Result<()>;

    /// Run a synchronous script in the current context
    async fn execute_script(&self, script: &str, args: Vec<Value>) -> Result<Value>;

    /// Implicit element lookup timeout
    async fn set_implicit_wait(&self, timeout: Duration) -> Result<()>;

    /// Maximize the current window
    async fn maximize_window(&self) -> Result<()>;

    /// Resize the current window
    async fn set_window_size(&self, width: u32, height: u32) -> Result<()>;

    /// Delete all cookies visible to the current document
    async fn delete_all_cookies(&self) -> Result<()>;

    /// PNG screenshot of the current window
    async fn screenshot(&self) -> Result<Vec<u8>>;

    /// End the driver session and release the browser
    async fn quit(&self) -> Result<()>;
}

/// Launches browser drivers for new sessions
#[async_trait]
pub trait DriverFactory: Send + Sync {
    async fn launch(&self, config: &SessionConfig) -> Result<Arc<dyn BrowserDriver>>;
}
