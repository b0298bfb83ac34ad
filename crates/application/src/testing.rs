//! Scripted HTTP port shared by the unit tests.

use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use powershare_domain::{RequestSpec, ResponseSpec};

use crate::ports::{HttpClient, HttpClientError};

type Handler = dyn Fn(&RequestSpec) -> Result<ResponseSpec, HttpClientError> + Send + Sync;

/// Records every request and answers with `handler`, after an optional delay.
pub struct FakeHttpClient {
    handler: Box<Handler>,
    requests: Mutex<Vec<RequestSpec>>,
    latency: Duration,
}

impl FakeHttpClient {
    pub fn new(
        handler: impl Fn(&RequestSpec) -> Result<ResponseSpec, HttpClientError>
        + Send
        + Sync
        + 'static,
    ) -> Self {
        Self {
            handler: Box::new(handler),
            requests: Mutex::new(Vec::new()),
            latency: Duration::ZERO,
        }
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn requests(&self) -> Vec<RequestSpec> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn calls_to(&self, url: &str) -> usize {
        self.requests().iter().filter(|r| r.url == url).count()
    }
}

impl HttpClient for FakeHttpClient {
    async fn execute(&self, request: &RequestSpec) -> Result<ResponseSpec, HttpClientError> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request.clone());
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        (self.handler)(request)
    }
}

/// Returns the bearer token a request was sent with.
pub fn bearer_of(request: &RequestSpec) -> Option<&str> {
    request
        .headers
        .get("Authorization")
        .and_then(|v| v.strip_prefix("Bearer "))
}
