//! W3C WebDriver client
//!
//! Speaks the WebDriver HTTP/JSON wire protocol to chromedriver, geckodriver or a grid.

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use reqwest::Method;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument};

use crate::config::{SessionConfig, WindowSize};
use crate::driver::keys::KeySequence;
use crate::driver::traits::{BrowserDriver, By, DriverFactory, ElementRef, Locator, WindowHandle};
use crate::{Error, Result};

/// Key under which W3C drivers return element references
pub const ELEMENT_KEY: &str = "element-6066-11e4-a52e-4f735466cecf";

/// Upper bound on one wire command when none is configured
pub const DEFAULT_COMMAND_TIMEOUT: Duration = Duration::from_secs(60);

/// WebDriver session client
#[derive(Debug, Clone)]
pub struct WebDriverClient {
    /// Driver endpoint (e.g., "http://localhost:9515")
    endpoint: String,
    session_id: String,
    http: reqwest::Client,
}

impl WebDriverClient {
    /// Create a new session on the driver at `endpoint`
    ///
    /// # Arguments
    /// * `endpoint` - Driver base URL
    /// * `capabilities` - `capabilities` object of the new-session request
    pub async fn connect<S: Into<String>>(endpoint: S, capabilities: Value) -> Result<Self> {
        Self::connect_with_timeout(endpoint, capabilities, DEFAULT_COMMAND_TIMEOUT).await
    }

    /// Create a new session whose every command, teardown included, fails after `command_timeout`
    pub async fn connect_with_timeout<S: Into<String>>(
        endpoint: S,
        capabilities: Value,
        command_timeout: Duration,
    ) -> Result<Self> {
        let endpoint = endpoint.into().trim_end_matches('/').to_string();
        info!("Creating WebDriver session at {}", endpoint);

        let http = reqwest::Client::builder()
            .timeout(command_timeout)
            .build()
            .map_err(|e| Error::internal(format!("Failed to create HTTP client: {}", e)))?;

        let url = format!("{}/session", endpoint);
        let value = send(&http, Method::POST, &url, Some(json!({ "capabilities": capabilities }))).await?;

        let session_id = value
            .get("sessionId")
            .and_then(Value::as_str)
            .ok_or_else(|| Error::driver("New session response has no sessionId"))?
            .to_string();

        info!("WebDriver session {} created", session_id);
        Ok(Self {
            endpoint,
            session_id,
            http,
        })
    }

    async fn command(&self, method: Method, path: &str, body: Option<Value>) -> Result<Value> {
        let url = format!("{}/session/{}{}", self.endpoint, self.session_id, path);
        send(&self.http, method, &url, body).await
    }

    fn element_path(element: &ElementRef, suffix: &str) -> String {
        format!("/element/{}{}", element.id(), suffix)
    }

    fn parse_element(value: &Value, locator: &Locator) -> Result<ElementRef> {
        value
            .get(ELEMENT_KEY)
            .and_then(Value::as_str)
            .map(|id| ElementRef::new(id, locator.clone()))
            .ok_or_else(|| Error::driver(format!("Malformed element reference: {}", value)))
    }
}

/// Send one wire command and unwrap its `value`
async fn send(http: &reqwest::Client, method: Method, url: &str, body: Option<Value>) -> Result<Value> {
    debug!("WebDriver {} {}", method, url);

    let mut request = http.request(method, url);
    if let Some(body) = body {
        request = request.json(&body);
    }

    let response = request.send().await.map_err(|e| {
        if e.is_timeout() {
            Error::driver(format!("WebDriver command timed out: {}", url))
        } else {
            Error::driver(format!("WebDriver request failed: {}", e))
        }
    })?;
    let status = response.status();
    let payload: Value = response
        .json()
        .await
        .map_err(|e| Error::driver(format!("Invalid WebDriver response: {}", e)))?;
    let value = payload.get("value").cloned().unwrap_or(Value::Null);

    if status.is_success() {
        return Ok(value);
    }

    let code = value
        .get("error")
        .and_then(Value::as_str)
        .unwrap_or("unknown error");
    let message = value.get("message").and_then(Value::as_str).unwrap_or("");
    Err(wire_error(code, message))
}

/// Map a WebDriver error code onto the harness taxonomy
pub fn wire_error(code: &str, message: &str) -> Error {
    match code {
        "no such element" => Error::element_not_found(message),
        "stale element reference" => Error::stale_element(message),
        "element not interactable" | "element click intercepted" | "invalid element state" => {
            Error::not_interactable(message)
        }
        "no such frame" | "no such window" => Error::context_switch(format!("{}: {}", code, message)),
        "no such alert" => Error::no_alert_present(message),
        "invalid session id" => Error::session_closed(message),
        "session not created" => Error::session_init(message),
        _ => Error::driver(format!("{}: {}", code, message)),
    }
}

/// Translate a locator into a W3C `(using, value)` pair
pub fn locator_strategy(locator: &Locator) -> (&'static str, String) {
    match locator.by {
        By::Id => ("css selector", css_attribute("id", &locator.value)),
        By::Name => ("css selector", css_attribute("name", &locator.value)),
        By::ClassName => ("css selector", format!(".{}", locator.value.trim())),
        By::Css => ("css selector", locator.value.clone()),
        By::XPath => ("xpath", locator.value.clone()),
        By::LinkText => ("link text", locator.value.clone()),
        By::PartialLinkText => ("partial link text", locator.value.clone()),
        By::TagName => ("tag name", locator.value.clone()),
    }
}

fn css_attribute(name: &str, value: &str) -> String {
    let escaped = value.replace('\\', "\\\\").replace('"', "\\\"");
    format!("[{}=\"{}\"]", name, escaped)
}

fn value_as_string(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    }
}

#[async_trait]
impl BrowserDriver for WebDriverClient {
    fn session_id(&self) -> &str {
        &self.session_id
    }

    #[instrument(skip(self))]
    async fn navigate(&self, url: &str) -> Result<()> {
        reqwest::Url::parse(url).map_err(|e| Error::navigation(format!("{}: {}", url, e)))?;
        info!("Navigating to {}", url);

        self.command(Method::POST, "/url", Some(json!({ "url": url })))
            .await
            .map(|_| ())
            .map_err(|e| match e {
                Error::Driver(msg) | Error::Http(msg) => Error::navigation(format!("{}: {}", url, msg)),
                other => other,
            })
    }

    async fn current_url(&self) -> Result<String> {
        let value = self.command(Method::GET, "/url", None).await?;
        value_as_string(value).ok_or_else(|| Error::driver("Current URL is null"))
    }

    async fn page_source(&self) -> Result<String> {
        let value = self.command(Method::GET, "/source", None).await?;
        Ok(value_as_string(value).unwrap_or_default())
    }

    #[instrument(skip(self))]
    async fn find_elements(&self, locator: &Locator) -> Result<Vec<ElementRef>> {
        let (using, value) = locator_strategy(locator);
        let result = self
            .command(
                Method::POST,
                "/elements",
                Some(json!({ "using": using, "value": value })),
            )
            .await?;

        result
            .as_array()
            .ok_or_else(|| Error::driver("Find elements returned a non-array"))?
            .iter()
            .map(|v| Self::parse_element(v, locator))
            .collect()
    }

    async fn click(&self, element: &ElementRef) -> Result<()> {
        debug!("Clicking element: {}", element);
        self.command(Method::POST, &Self::element_path(element, "/click"), Some(json!({})))
            .await
            .map(|_| ())
    }

    async fn send_keys(&self, element: &ElementRef, keys: &KeySequence) -> Result<()> {
        debug!("Typing into element: {}, keys: {}", element, keys);
        self.command(
            Method::POST,
            &Self::element_path(element, "/value"),
            Some(json!({ "text": keys.encode() })),
        )
        .await
        .map(|_| ())
    }

    async fn clear(&self, element: &ElementRef) -> Result<()> {
        self.command(Method::POST, &Self::element_path(element, "/clear"), Some(json!({})))
            .await
            .map(|_| ())
    }

    async fn element_text(&self, element: &ElementRef) -> Result<String> {
        let value = self
            .command(Method::GET, &Self::element_path(element, "/text"), None)
            .await?;
        Ok(value_as_string(value).unwrap_or_default())
    }

    async fn element_attribute(&self, element: &ElementRef, name: &str) -> Result<Option<String>> {
        let encoded = urlencoding::encode(name);
        let attribute = self
            .command(
                Method::GET,
                &Self::element_path(element, &format!("/attribute/{}", encoded)),
                None,
            )
            .await?;

        if let Some(value) = value_as_string(attribute) {
            return Ok(Some(value));
        }

        // innerHTML, value and friends are properties, not attributes
        let property = self
            .command(
                Method::GET,
                &Self::element_path(element, &format!("/property/{}", encoded)),
                None,
            )
            .await?;
        Ok(value_as_string(property))
    }

    async fn is_displayed(&self, element: &ElementRef) -> Result<bool> {
        let value = self
            .command(Method::GET, &Self::element_path(element, "/displayed"), None)
            .await?;
        Ok(value.as_bool().unwrap_or(false))
    }

    async fn is_enabled(&self, element: &ElementRef) -> Result<bool> {
        let value = self
            .command(Method::GET, &Self::element_path(element, "/enabled"), None)
            .await?;
        Ok(value.as_bool().unwrap_or(false))
    }

    #[instrument(skip(self))]
    async fn switch_to_frame(&self, id_or_name: &str) -> Result<()> {
        let by_id = Locator::css(css_attribute("id", id_or_name));
        let by_name = Locator::css(css_attribute("name", id_or_name));

        let mut frame = self.find_elements(&by_id).await?.into_iter().next();
        if frame.is_none() {
            frame = self.find_elements(&by_name).await?.into_iter().next();
        }
        let frame = frame.ok_or_else(|| Error::context_switch(format!("No such frame: {}", id_or_name)))?;

        self.command(
            Method::POST,
            "/frame",
            Some(json!({ "id": { ELEMENT_KEY: frame.id() } })),
        )
        .await
        .map(|_| ())
    }

    async fn switch_to_default_content(&self) -> Result<()> {
        self.command(Method::POST, "/frame", Some(json!({ "id": null })))
            .await
            .map(|_| ())
    }

    async fn window_handle(&self) -> Result<WindowHandle> {
        let value = self.command(Method::GET, "/window", None).await?;
        value_as_string(value)
            .map(WindowHandle::new)
            .ok_or_else(|| Error::driver("Window handle is null"))
    }

    async fn window_handles(&self) -> Result<Vec<WindowHandle>> {
        let value = self.command(Method::GET, "/window/handles", None).await?;
        let handles = value
            .as_array()
            .ok_or_else(|| Error::driver("Window handles returned a non-array"))?
            .iter()
            .filter_map(Value::as_str)
            .map(WindowHandle::new)
            .collect();
        Ok(handles)
    }

    async fn switch_to_window(&self, handle: &WindowHandle) -> Result<()> {
        self.command(Method::POST, "/window", Some(json!({ "handle": handle.as_str() })))
            .await
            .map(|_| ())
    }

    async fn close_window(&self) -> Result<()> {
        self.command(Method::DELETE, "/window", None).await.map(|_| ())
    }

    async fn alert_text(&self) -> Result<String> {
        let value = self.command(Method::GET, "/alert/text", None).await?;
        Ok(value_as_string(value).unwrap_or_default())
    }

    async fn accept_alert(&self) -> Result<()> {
        self.command(Method::POST, "/alert/accept", Some(json!({})))
            .await
            .map(|_| ())
    }

    async fn execute_script(&self, script: &str, args: Vec<Value>) -> Result<Value> {
        self.command(
            Method::POST,
            "/execute/sync",
            Some(json!({ "script": script, "args": args })),
        )
        .await
    }

    async fn set_implicit_wait(&self, timeout: Duration) -> Result<()> {
        self.command(
            Method::POST,
            "/timeouts",
            Some(json!({ "implicit": timeout.as_millis() as u64 })),
        )
        .await
        .map(|_| ())
    }

    async fn maximize_window(&self) -> Result<()> {
        self.command(Method::POST, "/window/maximize", Some(json!({})))
            .await
            .map(|_| ())
    }

    async fn set_window_size(&self, width: u32, height: u32) -> Result<()> {
        self.command(
            Method::POST,
            "/window/rect",
            Some(json!({ "width": width, "height": height })),
        )
        .await
        .map(|_| ())
    }

    async fn delete_all_cookies(&self) -> Result<()> {
        self.command(Method::DELETE, "/cookie", None).await.map(|_| ())
    }

    async fn screenshot(&self) -> Result<Vec<u8>> {
        let value = self.command(Method::GET, "/screenshot", None).await?;
        let data = value
            .as_str()
            .ok_or_else(|| Error::driver("Screenshot returned a non-string"))?;
        BASE64
            .decode(data)
            .map_err(|e| Error::driver(format!("Failed to decode screenshot: {}", e)))
    }

    async fn quit(&self) -> Result<()> {
        info!("Deleting WebDriver session {}", self.session_id);
        let url = format!("{}/session/{}", self.endpoint, self.session_id);
        send(&self.http, Method::DELETE, &url, None).await.map(|_| ())
    }
}

/// Build new-session capabilities for the configured browser
pub fn capabilities(browser: &str, config: &SessionConfig) -> Value {
    let mut args: Vec<String> = Vec::new();

    match browser {
        "firefox" => {
            if config.headless {
                args.push("-headless".to_string());
            }
            json!({
                "alwaysMatch": {
                    "browserName": "firefox",
                    "moz:firefoxOptions": { "args": args }
                }
            })
        }
        other => {
            if config.headless {
                args.push("--headless=new".to_string());
            }
            if let WindowSize::Fixed { width, height } = config.window {
                args.push(format!("--window-size={},{}", width, height));
            }
            json!({
                "alwaysMatch": {
                    "browserName": other,
                    "goog:chromeOptions": { "args": args }
                }
            })
        }
    }
}

/// Launches [`WebDriverClient`] sessions against one driver endpoint
#[derive(Debug, Clone)]
pub struct WebDriverFactory {
    endpoint: String,
    browser: String,
    command_timeout: Duration,
}

impl WebDriverFactory {
    pub fn new<E: Into<String>, B: Into<String>>(endpoint: E, browser: B) -> Self {
        Self {
            endpoint: endpoint.into(),
            browser: browser.into(),
            command_timeout: DEFAULT_COMMAND_TIMEOUT,
        }
    }

    pub fn with_command_timeout(mut self, command_timeout: Duration) -> Self {
        self.command_timeout = command_timeout;
        self
    }
}

#[async_trait]
impl DriverFactory for WebDriverFactory {
    async fn launch(&self, config: &SessionConfig) -> Result<Arc<dyn BrowserDriver>> {
        let caps = capabilities(&self.browser, config);
        let client =
            WebDriverClient::connect_with_timeout(self.endpoint.clone(), caps, self.command_timeout)
                .await
                .map_err(|e| match e {
                    Error::SessionInit(msg) => Error::SessionInit(msg),
                    other => Error::session_init(format!(
                        "Failed to start {} via {}: {}",
                        self.browser, self.endpoint, other
                    )),
                })?;
        Ok(Arc::new(client))
    }
}
