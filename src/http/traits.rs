//! HTTP capability traits

use async_trait::async_trait;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::config::SessionConfig;
use crate::{Error, Result};

/// Request method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        };
        f.write_str(name)
    }
}

/// Response of one HTTP call
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    /// Header names are lower-cased
    pub headers: BTreeMap<String, String>,
    pub body: String,
    /// Parsed body when it is valid JSON
    pub json: Option<Value>,
}

impl HttpResponse {
    /// Build a response, parsing the body as JSON when possible
    pub fn new<S: Into<String>>(status: u16, headers: BTreeMap<String, String>, body: S) -> Self {
        let body = body.into();
        let json = serde_json::from_str(&body).ok();
        Self {
            status,
            headers,
            body,
            json,
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// Parsed JSON body, or an error when the body is not JSON
    pub fn json(&self) -> Result<&Value> {
        self.json.as_ref().ok_or_else(|| {
            Error::http(format!(
                "Response body is not JSON (status {}): {}",
                self.status,
                self.body.chars().take(120).collect::<String>()
            ))
        })
    }
}

/// Opt-in retry policy for a single request step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts including the first
    pub attempts: u32,
    pub backoff: Duration,
}

impl RetryPolicy {
    pub fn new(attempts: u32, backoff: Duration) -> Self {
        Self {
            attempts: attempts.max(1),
            backoff,
        }
    }
}

/// HTTP client trait
///
/// Paths are resolved against the client's base location.
#[async_trait]
pub trait HttpClient: Send + Sync + fmt::Debug {
    /// Base location requests are resolved against
    fn base_url(&self) -> &str;

    /// Issue one request
    async fn request(&self, method: HttpMethod, path: &str, body: Option<Value>) -> Result<HttpResponse>;
}

/// Builds HTTP clients for new sessions
pub trait HttpClientFactory: Send + Sync {
    fn build(&self, config: &SessionConfig) -> Result<Arc<dyn HttpClient>>;
}
