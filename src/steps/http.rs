//! HTTP request step

use async_trait::async_trait;
use serde_json::Value;
use tokio::time::sleep;
use tracing::{debug, instrument, warn};

use crate::http::{HttpMethod, HttpResponse, RetryPolicy};
use crate::session::Session;
use crate::steps::traits::Step;
use crate::Result;

/// Issue one request against the session's HTTP client
///
/// Not retried unless a [`RetryPolicy`] is attached. With a policy, transport errors and
/// non-2xx responses are retried; the last outcome is returned as is.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub path: String,
    pub body: Option<Value>,
    pub retry: Option<RetryPolicy>,
}

impl HttpRequest {
    pub fn new<S: Into<String>>(method: HttpMethod, path: S) -> Self {
        Self {
            method,
            path: path.into(),
            body: None,
            retry: None,
        }
    }

    pub fn get<S: Into<String>>(path: S) -> Self {
        Self::new(HttpMethod::Get, path)
    }

    pub fn post<S: Into<String>>(path: S, body: Value) -> Self {
        Self::new(HttpMethod::Post, path).with_body(body)
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_retry(mut self, policy: RetryPolicy) -> Self {
        self.retry = Some(policy);
        self
    }
}

#[async_trait]
impl Step for HttpRequest {
    type Output = HttpResponse;

    fn name(&self) -> String {
        format!("HttpRequest({} {})", self.method, self.path)
    }

    #[instrument(skip(self, session), fields(method = %self.method, path = %self.path))]
    async fn execute(&self, session: &mut Session) -> Result<HttpResponse> {
        let client = session.http()?;
        let policy = self.retry.unwrap_or(RetryPolicy {
            attempts: 1,
            backoff: Default::default(),
        });

        let mut attempt = 1;
        loop {
            let outcome = client
                .request(self.method, &self.path, self.body.clone())
                .await;
            let retryable = match &outcome {
                Ok(response) => !response.is_success(),
                Err(_) => true,
            };

            if !retryable || attempt >= policy.attempts {
                if let Ok(response) = &outcome {
                    debug!("{} {} -> {}", self.method, self.path, response.status);
                }
                return outcome;
            }

            match &outcome {
                Ok(response) => warn!(
                    "Attempt {}/{} got status {}, retrying",
                    attempt, policy.attempts, response.status
                ),
                Err(e) => warn!("Attempt {}/{} failed: {}, retrying", attempt, policy.attempts, e),
            }
            sleep(policy.backoff).await;
            attempt += 1;
        }
    }
}
