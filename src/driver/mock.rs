//! Mock browser implementation for testing
//!
//! This module provides a scriptable in-memory browser. Tests describe a page as a list of
//! elements and attach click, keyboard and navigation handlers that mutate the page the way the
//! real site would.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use uuid::Uuid;

use crate::config::SessionConfig;
use crate::driver::keys::{Key, KeySequence, Keystroke};
use crate::driver::traits::{BrowserDriver, DriverFactory, ElementRef, Locator, WindowHandle};
use crate::{Error, Result};

/// Reaction to a click on an element
pub type ClickHandler = Arc<dyn Fn(&mut MockState) + Send + Sync>;

/// Reaction to keys sent to an element
pub type KeysHandler = Arc<dyn Fn(&mut MockElement, &[Keystroke]) + Send + Sync>;

/// Reaction to a page load
pub type NavigateHandler = Arc<dyn Fn(&mut MockState, &str) + Send + Sync>;

/// Mock DOM element
#[derive(Debug, Clone)]
pub struct MockElement {
    pub id: String,
    pub locators: Vec<Locator>,
    /// Frame the element lives in (`None` = top-level document)
    pub frame: Option<String>,
    pub text: String,
    pub value: String,
    pub attributes: HashMap<String, String>,
    pub displayed: bool,
    pub enabled: bool,
    pub attached: bool,
    /// Lookups that miss before the element is found
    pub absent_polls: u32,
    /// Visibility checks that report hidden before the element shows
    pub hidden_polls: u32,
}

impl MockElement {
    /// Create a new mock element
    pub fn new(locator: Locator) -> Self {
        Self {
            id: format!("el-{}", Uuid::new_v4()),
            locators: vec![locator],
            frame: None,
            text: String::new(),
            value: String::new(),
            attributes: HashMap::new(),
            displayed: true,
            enabled: true,
            attached: true,
            absent_polls: 0,
            hidden_polls: 0,
        }
    }

    pub fn also(mut self, locator: Locator) -> Self {
        self.locators.push(locator);
        self
    }

    pub fn with_text<S: Into<String>>(mut self, text: S) -> Self {
        self.text = text.into();
        self
    }

    pub fn with_attribute<K: Into<String>, V: Into<String>>(mut self, name: K, value: V) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    pub fn in_frame<S: Into<String>>(mut self, frame: S) -> Self {
        self.frame = Some(frame.into());
        self
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    pub fn hidden(mut self) -> Self {
        self.displayed = false;
        self
    }

    pub fn absent_for(mut self, polls: u32) -> Self {
        self.absent_polls = polls;
        self
    }

    pub fn hidden_for(mut self, polls: u32) -> Self {
        self.hidden_polls = polls;
        self
    }

    fn matches(&self, locator: &Locator) -> bool {
        self.locators.iter().any(|l| l == locator)
    }
}

/// Observable and mutable state of the mock browser
#[derive(Debug)]
pub struct MockState {
    pub url: String,
    pub source: String,
    pub windows: Vec<WindowHandle>,
    pub current_window: WindowHandle,
    pub frames: HashSet<String>,
    pub current_frame: Option<String>,
    pub elements: Vec<MockElement>,
    pub alert: Option<String>,
    pub accepted_alerts: Vec<String>,
    pub closed_windows: Vec<WindowHandle>,
    pub navigations: Vec<String>,
    pub scripts: Vec<String>,
    pub cookies_cleared: usize,
    pub implicit_wait: Option<Duration>,
    pub maximized: bool,
    pub window_size: Option<(u32, u32)>,
    next_window: usize,
}

impl MockState {
    fn new() -> Self {
        let main = WindowHandle::new("window-0");
        Self {
            url: "about:blank".to_string(),
            source: String::new(),
            windows: vec![main.clone()],
            current_window: main,
            frames: HashSet::new(),
            current_frame: None,
            elements: Vec::new(),
            alert: None,
            accepted_alerts: Vec::new(),
            closed_windows: Vec::new(),
            navigations: Vec::new(),
            scripts: Vec::new(),
            cookies_cleared: 0,
            implicit_wait: None,
            maximized: false,
            window_size: None,
            next_window: 1,
        }
    }

    /// Open a new top-level window without focusing it
    pub fn open_window(&mut self) -> WindowHandle {
        let handle = WindowHandle::new(format!("window-{}", self.next_window));
        self.next_window += 1;
        self.windows.push(handle.clone());
        handle
    }

    pub fn add_element(&mut self, element: MockElement) {
        self.elements.push(element);
    }

    pub fn add_frame<S: Into<String>>(&mut self, frame: S) {
        self.frames.insert(frame.into());
    }

    pub fn show_alert<S: Into<String>>(&mut self, text: S) {
        self.alert = Some(text.into());
    }

    /// First attached element matching the locator, in any frame
    pub fn element_mut(&mut self, locator: &Locator) -> Option<&mut MockElement> {
        self.elements
            .iter_mut()
            .find(|e| e.attached && e.matches(locator))
    }

    pub fn set_text<S: Into<String>>(&mut self, locator: &Locator, text: S) {
        if let Some(element) = self.element_mut(locator) {
            element.text = text.into();
        }
    }

    /// Detach every element matching the locator; existing references go stale
    pub fn detach(&mut self, locator: &Locator) {
        for element in self.elements.iter_mut().filter(|e| e.matches(locator)) {
            element.attached = false;
        }
    }

    /// Detach the whole document, as a page load does
    pub fn clear_page(&mut self) {
        for element in &mut self.elements {
            element.attached = false;
        }
        self.frames.clear();
        self.current_frame = None;
    }
}

/// Mock browser driver
pub struct MockBrowser {
    session_id: String,
    state: Mutex<MockState>,
    click_handlers: Mutex<HashMap<Locator, ClickHandler>>,
    key_handlers: Mutex<HashMap<Locator, KeysHandler>>,
    navigate_handler: Mutex<Option<NavigateHandler>>,
    unreachable: Mutex<HashSet<String>>,
    disconnected: Mutex<Option<String>>,
    quit_count: AtomicUsize,
    closed: AtomicBool,
}

impl fmt::Debug for MockBrowser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MockBrowser")
            .field("session_id", &self.session_id)
            .field("quit_count", &self.quit_count.load(Ordering::SeqCst))
            .finish()
    }
}

impl Default for MockBrowser {
    fn default() -> Self {
        Self::new()
    }
}

impl MockBrowser {
    /// Create a new mock browser showing about:blank
    pub fn new() -> Self {
        Self {
            session_id: Uuid::new_v4().to_string(),
            state: Mutex::new(MockState::new()),
            click_handlers: Mutex::new(HashMap::new()),
            key_handlers: Mutex::new(HashMap::new()),
            navigate_handler: Mutex::new(None),
            unreachable: Mutex::new(HashSet::new()),
            disconnected: Mutex::new(None),
            quit_count: AtomicUsize::new(0),
            closed: AtomicBool::new(false),
        }
    }

    /// Lock the page state for setup or inspection
    pub fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn add_element(&self, element: MockElement) {
        self.state().add_element(element);
    }

    pub fn on_click<F>(&self, locator: Locator, handler: F)
    where
        F: Fn(&mut MockState) + Send + Sync + 'static,
    {
        self.click_handlers
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(locator, Arc::new(handler));
    }

    pub fn on_keys<F>(&self, locator: Locator, handler: F)
    where
        F: Fn(&mut MockElement, &[Keystroke]) + Send + Sync + 'static,
    {
        self.key_handlers
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(locator, Arc::new(handler));
    }

    pub fn on_navigate<F>(&self, handler: F)
    where
        F: Fn(&mut MockState, &str) + Send + Sync + 'static,
    {
        *self
            .navigate_handler
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(Arc::new(handler));
    }

    /// Make navigation to `url` fail
    pub fn set_unreachable<S: Into<String>>(&self, url: S) {
        self.unreachable
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(url.into());
    }

    /// Fail every later command with a transport error, as if the driver went away
    pub fn disconnect<S: Into<String>>(&self, reason: S) {
        *self
            .disconnected
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(reason.into());
    }

    /// Number of times `quit` was called
    pub fn quit_count(&self) -> usize {
        self.quit_count.load(Ordering::SeqCst)
    }

    fn ensure_open(&self) -> Result<()> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(Error::session_closed(&self.session_id));
        }
        if let Some(reason) = self
            .disconnected
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .as_ref()
        {
            return Err(Error::driver(format!("WebDriver request failed: {}", reason)));
        }
        Ok(())
    }

    /// Run `f` against the attached element behind `element`
    fn with_element<T>(&self, element: &ElementRef, f: impl FnOnce(&mut MockElement) -> Result<T>) -> Result<T> {
        self.ensure_open()?;
        let mut state = self.state();
        let target = state
            .elements
            .iter_mut()
            .find(|e| e.id == element.id() && e.attached)
            .ok_or_else(|| Error::stale_element(element.to_string()))?;
        f(target)
    }

    fn handler_for<H: Clone>(
        handlers: &Mutex<HashMap<Locator, H>>,
        locators: &[Locator],
    ) -> Option<H> {
        let handlers = handlers.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        locators.iter().find_map(|l| handlers.get(l).cloned())
    }

    fn ensure_interactable(element: &MockElement) -> Result<()> {
        if !element.displayed || element.hidden_polls > 0 || !element.enabled {
            return Err(Error::not_interactable(format!("{}", element.locators[0])));
        }
        Ok(())
    }
}

fn default_typing(element: &mut MockElement, strokes: &[Keystroke]) {
    for stroke in strokes {
        match stroke {
            Keystroke::Char(ch) => element.value.push(*ch),
            Keystroke::Key(Key::Space) => element.value.push(' '),
            Keystroke::Key(Key::Backspace) => {
                element.value.pop();
            }
            _ => {}
        }
    }
}

#[async_trait]
impl BrowserDriver for MockBrowser {
    fn session_id(&self) -> &str {
        &self.session_id
    }

    async fn navigate(&self, url: &str) -> Result<()> {
        self.ensure_open()?;
        let unreachable = self
            .unreachable
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .contains(url);
        if unreachable {
            return Err(Error::navigation(format!("{}: net::ERR_NAME_NOT_RESOLVED", url)));
        }

        let handler = self
            .navigate_handler
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone();
        let mut state = self.state();
        state.url = url.to_string();
        state.navigations.push(url.to_string());
        state.current_frame = None;
        if let Some(handler) = handler {
            handler(&mut state, url);
        }
        Ok(())
    }

    async fn current_url(&self) -> Result<String> {
        self.ensure_open()?;
        Ok(self.state().url.clone())
    }

    async fn page_source(&self) -> Result<String> {
        self.ensure_open()?;
        Ok(self.state().source.clone())
    }

    async fn find_elements(&self, locator: &Locator) -> Result<Vec<ElementRef>> {
        self.ensure_open()?;
        let mut state = self.state();
        let frame = state.current_frame.clone();
        let mut found = Vec::new();
        for element in state
            .elements
            .iter_mut()
            .filter(|e| e.attached && e.frame == frame && e.matches(locator))
        {
            if element.absent_polls > 0 {
                element.absent_polls -= 1;
                continue;
            }
            found.push(ElementRef::new(element.id.clone(), locator.clone()));
        }
        Ok(found)
    }

    async fn click(&self, element: &ElementRef) -> Result<()> {
        let locators = self.with_element(element, |e| {
            Self::ensure_interactable(e)?;
            Ok(e.locators.clone())
        })?;

        if let Some(handler) = Self::handler_for(&self.click_handlers, &locators) {
            handler(&mut self.state());
        }
        Ok(())
    }

    async fn send_keys(&self, element: &ElementRef, keys: &KeySequence) -> Result<()> {
        let locators = self.with_element(element, |e| {
            Self::ensure_interactable(e)?;
            Ok(e.locators.clone())
        })?;

        let strokes = KeySequence::decode(&keys.encode());
        let handler = Self::handler_for(&self.key_handlers, &locators);
        self.with_element(element, |e| {
            match &handler {
                Some(handler) => handler(e, &strokes),
                None => default_typing(e, &strokes),
            }
            Ok(())
        })
    }

    async fn clear(&self, element: &ElementRef) -> Result<()> {
        self.with_element(element, |e| {
            e.value.clear();
            Ok(())
        })
    }

    async fn element_text(&self, element: &ElementRef) -> Result<String> {
        self.with_element(element, |e| Ok(e.text.clone()))
    }

    async fn element_attribute(&self, element: &ElementRef, name: &str) -> Result<Option<String>> {
        self.with_element(element, |e| {
            if let Some(value) = e.attributes.get(name) {
                return Ok(Some(value.clone()));
            }
            Ok(match name {
                "value" => Some(e.value.clone()),
                "innerHTML" | "textContent" => Some(e.text.clone()),
                _ => None,
            })
        })
    }

    async fn is_displayed(&self, element: &ElementRef) -> Result<bool> {
        self.with_element(element, |e| {
            if e.hidden_polls > 0 {
                e.hidden_polls -= 1;
                return Ok(false);
            }
            Ok(e.displayed)
        })
    }

    async fn is_enabled(&self, element: &ElementRef) -> Result<bool> {
        self.with_element(element, |e| Ok(e.enabled))
    }

    async fn switch_to_frame(&self, id_or_name: &str) -> Result<()> {
        self.ensure_open()?;
        let mut state = self.state();
        if !state.frames.contains(id_or_name) {
            return Err(Error::context_switch(format!("No such frame: {}", id_or_name)));
        }
        state.current_frame = Some(id_or_name.to_string());
        Ok(())
    }

    async fn switch_to_default_content(&self) -> Result<()> {
        self.ensure_open()?;
        self.state().current_frame = None;
        Ok(())
    }

    async fn window_handle(&self) -> Result<WindowHandle> {
        self.ensure_open()?;
        let state = self.state();
        if !state.windows.contains(&state.current_window) {
            return Err(Error::context_switch(format!(
                "no such window: {}",
                state.current_window
            )));
        }
        Ok(state.current_window.clone())
    }

    async fn window_handles(&self) -> Result<Vec<WindowHandle>> {
        self.ensure_open()?;
        Ok(self.state().windows.clone())
    }

    async fn switch_to_window(&self, handle: &WindowHandle) -> Result<()> {
        self.ensure_open()?;
        let mut state = self.state();
        if !state.windows.contains(handle) {
            return Err(Error::context_switch(format!("no such window: {}", handle)));
        }
        state.current_window = handle.clone();
        state.current_frame = None;
        Ok(())
    }

    async fn close_window(&self) -> Result<()> {
        self.ensure_open()?;
        let mut state = self.state();
        let current = state.current_window.clone();
        let before = state.windows.len();
        state.windows.retain(|h| h != &current);
        if state.windows.len() == before {
            return Err(Error::context_switch(format!("no such window: {}", current)));
        }
        state.closed_windows.push(current);
        Ok(())
    }

    async fn alert_text(&self) -> Result<String> {
        self.ensure_open()?;
        self.state()
            .alert
            .clone()
            .ok_or_else(|| Error::no_alert_present("no such alert"))
    }

    async fn accept_alert(&self) -> Result<()> {
        self.ensure_open()?;
        let mut state = self.state();
        let text = state
            .alert
            .take()
            .ok_or_else(|| Error::no_alert_present("no such alert"))?;
        state.accepted_alerts.push(text);
        Ok(())
    }

    async fn execute_script(&self, script: &str, _args: Vec<Value>) -> Result<Value> {
        self.ensure_open()?;
        self.state().scripts.push(script.to_string());
        Ok(Value::Null)
    }

    async fn set_implicit_wait(&self, timeout: Duration) -> Result<()> {
        self.ensure_open()?;
        self.state().implicit_wait = Some(timeout);
        Ok(())
    }

    async fn maximize_window(&self) -> Result<()> {
        self.ensure_open()?;
        self.state().maximized = true;
        Ok(())
    }

    async fn set_window_size(&self, width: u32, height: u32) -> Result<()> {
        self.ensure_open()?;
        self.state().window_size = Some((width, height));
        Ok(())
    }

    async fn delete_all_cookies(&self) -> Result<()> {
        self.ensure_open()?;
        self.state().cookies_cleared += 1;
        Ok(())
    }

    async fn screenshot(&self) -> Result<Vec<u8>> {
        self.ensure_open()?;
        // Minimal PNG header
        Ok(vec![
            0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, // PNG signature
            0x00, 0x00, 0x00, 0x0D, // IHDR length
            0x49, 0x48, 0x44, 0x52, // IHDR
        ])
    }

    async fn quit(&self) -> Result<()> {
        self.quit_count.fetch_add(1, Ordering::SeqCst);
        self.closed.store(true, Ordering::SeqCst);
        Ok(())
    }
}

type BrowserBuilder = Arc<dyn Fn() -> MockBrowser + Send + Sync>;

/// Factory handing out mock browsers
///
/// Every launched browser is kept so tests can inspect it after teardown.
pub struct MockDriverFactory {
    builder: BrowserBuilder,
    launched: Mutex<Vec<Arc<MockBrowser>>>,
    failure: Option<String>,
}

impl MockDriverFactory {
    /// Create a factory that builds each browser with `builder`
    pub fn new<F>(builder: F) -> Self
    where
        F: Fn() -> MockBrowser + Send + Sync + 'static,
    {
        Self {
            builder: Arc::new(builder),
            launched: Mutex::new(Vec::new()),
            failure: None,
        }
    }

    /// Create a factory whose launches always fail
    pub fn unavailable<S: Into<String>>(reason: S) -> Self {
        Self {
            builder: Arc::new(MockBrowser::new),
            launched: Mutex::new(Vec::new()),
            failure: Some(reason.into()),
        }
    }

    /// Browsers launched so far, in launch order
    pub fn launched(&self) -> Vec<Arc<MockBrowser>> {
        self.launched
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl Default for MockDriverFactory {
    fn default() -> Self {
        Self::new(MockBrowser::new)
    }
}

#[async_trait]
impl DriverFactory for MockDriverFactory {
    async fn launch(&self, _config: &SessionConfig) -> Result<Arc<dyn BrowserDriver>> {
        if let Some(reason) = &self.failure {
            return Err(Error::session_init(reason.clone()));
        }
        let browser = Arc::new((self.builder)());
        self.launched
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(browser.clone());
        Ok(browser)
    }
}
