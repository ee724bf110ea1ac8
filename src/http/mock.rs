//! Mock HTTP client for testing

use async_trait::async_trait;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use crate::config::SessionConfig;
use crate::http::traits::{HttpClient, HttpClientFactory, HttpMethod, HttpResponse};
use crate::{Error, Result};

/// A request the mock received
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    pub method: HttpMethod,
    pub path: String,
    pub body: Option<Value>,
}

/// Mock HTTP client
///
/// Routes are matched on method and path. A route may hold a queue of responses; the last one
/// repeats once the queue is drained.
#[derive(Debug, Default)]
pub struct MockHttpClient {
    base_url: String,
    routes: Mutex<HashMap<(HttpMethod, String), VecDeque<HttpResponse>>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl MockHttpClient {
    /// Create a new mock client
    pub fn new<S: Into<String>>(base_url: S) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Queue a JSON response for `method path`
    pub fn respond_json(&self, method: HttpMethod, path: &str, status: u16, body: Value) {
        let mut headers = BTreeMap::new();
        headers.insert("content-type".to_string(), "application/json".to_string());
        self.respond(method, path, HttpResponse::new(status, headers, body.to_string()));
    }

    /// Queue a response for `method path`
    pub fn respond(&self, method: HttpMethod, path: &str, response: HttpResponse) {
        self.routes
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .entry((method, path.to_string()))
            .or_default()
            .push_back(response);
    }

    /// Requests received so far
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

#[async_trait]
impl HttpClient for MockHttpClient {
    fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn request(&self, method: HttpMethod, path: &str, body: Option<Value>) -> Result<HttpResponse> {
        self.requests
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(RecordedRequest {
                method,
                path: path.to_string(),
                body,
            });

        let mut routes = self.routes.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        let queue = routes
            .get_mut(&(method, path.to_string()))
            .ok_or_else(|| Error::http(format!("No mock route for {} {}", method, path)))?;

        let response = if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().cloned()
        };
        response.ok_or_else(|| Error::http(format!("No mock response left for {} {}", method, path)))
    }
}

/// Factory handing out one shared mock client
#[derive(Debug, Clone)]
pub struct MockHttpFactory {
    client: Arc<MockHttpClient>,
}

impl MockHttpFactory {
    pub fn new(client: Arc<MockHttpClient>) -> Self {
        Self { client }
    }
}

impl HttpClientFactory for MockHttpFactory {
    fn build(&self, _config: &SessionConfig) -> Result<Arc<dyn HttpClient>> {
        Ok(self.client.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_routes_and_recording() {
        let client = MockHttpClient::new("https://api.example.com");
        client.respond_json(HttpMethod::Get, "/users", 200, json!([{"name": "Leanne"}]));

        let response = client.request(HttpMethod::Get, "/users", None).await.unwrap();
        assert_eq!(response.status, 200);
        assert_eq!(response.json().unwrap()[0]["name"], "Leanne");
        assert_eq!(response.header("Content-Type"), Some("application/json"));
        assert_eq!(client.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_queued_responses_then_repeat() {
        let client = MockHttpClient::new("https://api.example.com");
        client.respond_json(HttpMethod::Get, "/flaky", 503, json!({}));
        client.respond_json(HttpMethod::Get, "/flaky", 200, json!({"ok": true}));

        let first = client.request(HttpMethod::Get, "/flaky", None).await.unwrap();
        let second = client.request(HttpMethod::Get, "/flaky", None).await.unwrap();
        let third = client.request(HttpMethod::Get, "/flaky", None).await.unwrap();
        assert_eq!((first.status, second.status, third.status), (503, 200, 200));
    }

    #[tokio::test]
    async fn test_unknown_route() {
        let client = MockHttpClient::new("https://api.example.com");
        let err = client.request(HttpMethod::Delete, "/users/1", None).await.unwrap_err();
        assert!(matches!(err, Error::Http(_)));
    }
}
