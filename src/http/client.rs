//! reqwest-backed HTTP client

use async_trait::async_trait;
use reqwest::Method;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info};

use crate::config::SessionConfig;
use crate::http::traits::{HttpClient, HttpClientFactory, HttpMethod, HttpResponse};
use crate::{Error, Result};

/// HTTP client bound to one base URL
#[derive(Debug, Clone)]
pub struct ReqwestHttpClient {
    base_url: String,
    client: reqwest::Client,
}

impl ReqwestHttpClient {
    /// Create a new client
    ///
    /// # Arguments
    /// * `base_url` - Absolute base URL (e.g., "https://jsonplaceholder.typicode.com")
    pub fn new<S: Into<String>>(base_url: S, timeout: std::time::Duration) -> Result<Self> {
        let base_url = base_url.into();
        reqwest::Url::parse(&base_url)
            .map_err(|e| Error::configuration(format!("Invalid base URL {}: {}", base_url, e)))?;

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::internal(format!("Failed to create HTTP client: {}", e)))?;

        info!("HTTP client ready for {}", base_url);
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    /// Resolve `path` against the base URL; absolute URLs pass through
    pub fn resolve(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    fn method(method: HttpMethod) -> Method {
        match method {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
            HttpMethod::Put => Method::PUT,
            HttpMethod::Patch => Method::PATCH,
            HttpMethod::Delete => Method::DELETE,
        }
    }
}

#[async_trait]
impl HttpClient for ReqwestHttpClient {
    fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn request(&self, method: HttpMethod, path: &str, body: Option<Value>) -> Result<HttpResponse> {
        let url = self.resolve(path);
        debug!("{} {}", method, url);

        let mut request = self.client.request(Self::method(method), &url);
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request.send().await?;
        let status = response.status().as_u16();
        let headers: BTreeMap<String, String> = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_ascii_lowercase(), v.to_string()))
            })
            .collect();
        let body = response.text().await?;

        debug!("{} {} -> {} ({} bytes)", method, url, status, body.len());
        Ok(HttpResponse::new(status, headers, body))
    }
}

/// Builds [`ReqwestHttpClient`]s from session configuration
#[derive(Debug, Clone, Default)]
pub struct ReqwestClientFactory;

impl HttpClientFactory for ReqwestClientFactory {
    fn build(&self, config: &SessionConfig) -> Result<Arc<dyn HttpClient>> {
        let base_url = config
            .base_url
            .as_deref()
            .ok_or_else(|| Error::session_init("HTTP session needs a base URL"))?;
        let client = ReqwestHttpClient::new(base_url, config.timeout)
            .map_err(|e| Error::session_init(e.to_string()))?;
        Ok(Arc::new(client))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_resolve_paths() {
        let client = ReqwestHttpClient::new("https://api.example.com/", Duration::from_secs(5)).unwrap();
        assert_eq!(client.resolve("/users"), "https://api.example.com/users");
        assert_eq!(client.resolve("users/1"), "https://api.example.com/users/1");
        assert_eq!(client.resolve("http://other/x"), "http://other/x");
    }

    #[test]
    fn test_invalid_base_url() {
        let err = ReqwestHttpClient::new("not a url", Duration::from_secs(5)).unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
    }

    #[test]
    fn test_factory_requires_base_url() {
        let mut config = crate::config::Config::default().http_session("https://api.example.com");
        config.base_url = None;
        let err = ReqwestClientFactory.build(&config).unwrap_err();
        assert!(matches!(err, Error::SessionInit(_)));
    }
}
