//! HTTP client layer
//!
//! Capability interface for REST scenarios plus a reqwest-backed client and a mock.

pub mod traits;
pub mod client;
pub mod mock;

pub use traits::{HttpClient, HttpClientFactory, HttpMethod, HttpResponse, RetryPolicy};
pub use client::{ReqwestClientFactory, ReqwestHttpClient};
pub use mock::{MockHttpClient, MockHttpFactory, RecordedRequest};
