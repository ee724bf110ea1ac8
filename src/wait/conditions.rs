//! Built-in wait conditions

use async_trait::async_trait;
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use crate::driver::{ElementRef, Locator, WindowHandle};
use crate::session::Session;
use crate::wait::policy::Condition;
use crate::{Error, Result};

/// At least one element matches the locator
#[derive(Debug, Clone)]
pub struct ElementPresent(pub Locator);

#[async_trait]
impl Condition for ElementPresent {
    type Output = ElementRef;

    fn describe(&self) -> String {
        format!("element {} to be present", self.0)
    }

    async fn check(&self, session: &Session) -> Result<Option<ElementRef>> {
        let found = session.browser()?.find_elements(&self.0).await?;
        Ok(found.into_iter().next())
    }
}

/// The first matching element is displayed
#[derive(Debug, Clone)]
pub struct ElementVisible(pub Locator);

#[async_trait]
impl Condition for ElementVisible {
    type Output = ElementRef;

    fn describe(&self) -> String {
        format!("element {} to be visible", self.0)
    }

    async fn check(&self, session: &Session) -> Result<Option<ElementRef>> {
        let browser = session.browser()?;
        let element = browser.find_element(&self.0).await?;
        if browser.is_displayed(&element).await? {
            Ok(Some(element))
        } else {
            Ok(None)
        }
    }
}

/// The first matching element is displayed and enabled
#[derive(Debug, Clone)]
pub struct ElementClickable(pub Locator);

#[async_trait]
impl Condition for ElementClickable {
    type Output = ElementRef;

    fn describe(&self) -> String {
        format!("element {} to be clickable", self.0)
    }

    async fn check(&self, session: &Session) -> Result<Option<ElementRef>> {
        let browser = session.browser()?;
        let element = browser.find_element(&self.0).await?;
        if browser.is_displayed(&element).await? && browser.is_enabled(&element).await? {
            Ok(Some(element))
        } else {
            Ok(None)
        }
    }
}

/// A previously resolved element has been detached from the DOM
#[derive(Debug, Clone)]
pub struct StalenessOf(pub ElementRef);

#[async_trait]
impl Condition for StalenessOf {
    type Output = ();

    fn describe(&self) -> String {
        format!("element {} to become stale", self.0)
    }

    async fn check(&self, session: &Session) -> Result<Option<()>> {
        let stale = session.browser()?.is_stale(&self.0).await?;
        Ok(stale.then_some(()))
    }
}

/// At least `n` top-level windows are open
#[derive(Debug, Clone, Copy)]
pub struct WindowCountAtLeast(pub usize);

#[async_trait]
impl Condition for WindowCountAtLeast {
    type Output = Vec<WindowHandle>;

    fn describe(&self) -> String {
        format!("at least {} open window(s)", self.0)
    }

    async fn check(&self, session: &Session) -> Result<Option<Vec<WindowHandle>>> {
        let handles = session.browser()?.window_handles().await?;
        Ok((handles.len() >= self.0).then_some(handles))
    }
}

/// Windows that were not in the given snapshot have appeared
#[derive(Debug, Clone)]
pub struct NewWindowsSince {
    before: HashSet<WindowHandle>,
}

impl NewWindowsSince {
    pub fn new<I: IntoIterator<Item = WindowHandle>>(before: I) -> Self {
        Self {
            before: before.into_iter().collect(),
        }
    }
}

#[async_trait]
impl Condition for NewWindowsSince {
    type Output = Vec<WindowHandle>;

    fn describe(&self) -> String {
        format!("a window beyond the {} already open", self.before.len())
    }

    async fn check(&self, session: &Session) -> Result<Option<Vec<WindowHandle>>> {
        let handles = session.browser()?.window_handles().await?;
        let fresh: Vec<WindowHandle> = handles
            .into_iter()
            .filter(|h| !self.before.contains(h))
            .collect();
        Ok((!fresh.is_empty()).then_some(fresh))
    }
}

/// A native dialog is open; yields its text
#[derive(Debug, Clone, Copy, Default)]
pub struct AlertPresent;

#[async_trait]
impl Condition for AlertPresent {
    type Output = String;

    fn describe(&self) -> String {
        "an alert to be present".to_string()
    }

    async fn check(&self, session: &Session) -> Result<Option<String>> {
        match session.browser()?.alert_text().await {
            Ok(text) => Ok(Some(text)),
            Err(Error::NoAlertPresent(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }
}

type TextPredicate = Arc<dyn Fn(&str) -> bool + Send + Sync>;

/// The trimmed text of the first matching element satisfies a predicate
#[derive(Clone)]
pub struct ElementTextMatches {
    locator: Locator,
    expectation: String,
    predicate: TextPredicate,
}

impl ElementTextMatches {
    pub fn new<S, F>(locator: Locator, expectation: S, predicate: F) -> Self
    where
        S: Into<String>,
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        Self {
            locator,
            expectation: expectation.into(),
            predicate: Arc::new(predicate),
        }
    }

    /// Text equal to `expected`
    pub fn equals<S: Into<String>>(locator: Locator, expected: S) -> Self {
        let expected = expected.into();
        let wanted = expected.clone();
        Self::new(locator, format!("'{}'", expected), move |text| text == wanted)
    }

    /// Text containing `fragment`
    pub fn contains<S: Into<String>>(locator: Locator, fragment: S) -> Self {
        let fragment = fragment.into();
        let wanted = fragment.clone();
        Self::new(locator, format!("containing '{}'", fragment), move |text| {
            text.contains(&wanted)
        })
    }
}

impl fmt::Debug for ElementTextMatches {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ElementTextMatches")
            .field("locator", &self.locator)
            .field("expectation", &self.expectation)
            .finish()
    }
}

#[async_trait]
impl Condition for ElementTextMatches {
    type Output = String;

    fn describe(&self) -> String {
        format!("text of {} to be {}", self.locator, self.expectation)
    }

    async fn check(&self, session: &Session) -> Result<Option<String>> {
        let browser = session.browser()?;
        let element = browser.find_element(&self.locator).await?;
        let text = browser.element_text(&element).await?;
        let text = text.trim();
        Ok((self.predicate)(text).then(|| text.to_string()))
    }
}

/// The current URL contains a fragment
#[derive(Debug, Clone)]
pub struct UrlContains(pub String);

#[async_trait]
impl Condition for UrlContains {
    type Output = String;

    fn describe(&self) -> String {
        format!("URL to contain '{}'", self.0)
    }

    async fn check(&self, session: &Session) -> Result<Option<String>> {
        let url = session.browser()?.current_url().await?;
        Ok(url.contains(&self.0).then_some(url))
    }
}
