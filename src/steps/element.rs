//! Element lookup and interaction

use async_trait::async_trait;
use std::fmt;
use tracing::{debug, instrument};

use crate::driver::{ElementRef, KeySequence, Locator};
use crate::session::Session;
use crate::steps::traits::Step;
use crate::Result;

/// Resolve a locator in the current context without waiting
#[derive(Debug, Clone)]
pub struct Locate {
    pub locator: Locator,
}

impl Locate {
    pub fn new(locator: Locator) -> Self {
        Self { locator }
    }
}

#[async_trait]
impl Step for Locate {
    type Output = ElementRef;

    fn name(&self) -> String {
        format!("Locate({})", self.locator)
    }

    async fn execute(&self, session: &mut Session) -> Result<ElementRef> {
        session.browser()?.find_element(&self.locator).await
    }
}

/// What to do with an element
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Click,
    Type(KeySequence),
    ReadAttribute(String),
    ReadText,
    Clear,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Click => f.write_str("click"),
            Action::Type(keys) => write!(f, "type {}", keys),
            Action::ReadAttribute(name) => write!(f, "read @{}", name),
            Action::ReadText => f.write_str("read text"),
            Action::Clear => f.write_str("clear"),
        }
    }
}

/// Act on a resolved element
///
/// Reads yield `Some(value)`; an attribute that is not set yields `None`. Other actions
/// yield `None`.
#[derive(Debug, Clone)]
pub struct Interact {
    pub element: ElementRef,
    pub action: Action,
}

impl Interact {
    pub fn new(element: ElementRef, action: Action) -> Self {
        Self { element, action }
    }

    pub fn click(element: ElementRef) -> Self {
        Self::new(element, Action::Click)
    }

    pub fn type_keys<K: Into<KeySequence>>(element: ElementRef, keys: K) -> Self {
        Self::new(element, Action::Type(keys.into()))
    }

    pub fn read_text(element: ElementRef) -> Self {
        Self::new(element, Action::ReadText)
    }

    pub fn read_attribute<S: Into<String>>(element: ElementRef, name: S) -> Self {
        Self::new(element, Action::ReadAttribute(name.into()))
    }

    pub fn clear(element: ElementRef) -> Self {
        Self::new(element, Action::Clear)
    }
}

#[async_trait]
impl Step for Interact {
    type Output = Option<String>;

    fn name(&self) -> String {
        format!("Interact({} {})", self.action, self.element.locator())
    }

    #[instrument(skip(self, session), fields(element = %self.element))]
    async fn execute(&self, session: &mut Session) -> Result<Option<String>> {
        let browser = session.browser()?;
        let output = match &self.action {
            Action::Click => {
                browser.click(&self.element).await?;
                None
            }
            Action::Type(keys) => {
                browser.send_keys(&self.element, keys).await?;
                None
            }
            Action::Clear => {
                browser.clear(&self.element).await?;
                None
            }
            Action::ReadText => Some(browser.element_text(&self.element).await?),
            Action::ReadAttribute(name) => browser.element_attribute(&self.element, name).await?,
        };
        debug!("{} done", self.action);
        Ok(output)
    }
}
