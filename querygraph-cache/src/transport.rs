//! The network boundary.

use crate::error::{CacheError, Result};
use async_trait::async_trait;
use querygraph_datasource::RequestDescriptor;
use reqwest::Client;
use serde_json::Value;
use std::str::FromStr;
use std::time::Duration;

/// The only suspension point in the core: perform one request and decode
/// its JSON body.
///
/// The cache drives this trait; implementations must not retry or cache on
/// their own.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Execute the request and return the decoded response body.
    async fn perform(&self, request: &RequestDescriptor) -> Result<Value>;
}

/// reqwest-backed transport.
///
/// Honors the descriptor's method and headers. The browser-style mode,
/// credentials and cache directives have no server-side equivalent and are
/// ignored here; hosts embedding this core in a browser runtime supply
/// their own [`Transport`] that forwards them.
pub struct HttpTransport {
    client: Client,
    request_timeout: Duration,
}

impl HttpTransport {
    /// Create a transport with default timeouts (5 s connect, 30 s request).
    pub fn new() -> Result<Self> {
        Self::with_timeouts(Duration::from_secs(5), Duration::from_secs(30))
    }

    /// Create a transport with explicit timeouts.
    pub fn with_timeouts(connect_timeout: Duration, request_timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(connect_timeout)
            .timeout(request_timeout)
            .build()
            .map_err(|e| CacheError::fetch(format!("failed to create HTTP client: {}", e)))?;
        Ok(Self {
            client,
            request_timeout,
        })
    }

    /// The per-request timeout.
    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }
}

impl std::fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpTransport")
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn perform(&self, request: &RequestDescriptor) -> Result<Value> {
        let method = reqwest::Method::from_str(&request.method.to_uppercase())
            .map_err(|_| CacheError::invalid_request(format!("bad method: {}", request.method)))?;

        let mut http_request = self.client.request(method, &request.url);
        for (name, value) in &request.headers {
            http_request = http_request.header(name, value);
        }

        let response = http_request.send().await.map_err(|e| {
            if e.is_timeout() {
                CacheError::fetch(format!("request timeout: {}", e))
            } else if e.is_connect() {
                CacheError::fetch(format!("failed to connect: {}", e))
            } else {
                CacheError::fetch(format!("request failed: {}", e))
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let snippet: String = body.chars().take(200).collect();
            return Err(CacheError::fetch(format!(
                "endpoint returned {}: {}",
                status, snippet
            )));
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| CacheError::decode(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_construction() {
        let transport = HttpTransport::new().unwrap();
        assert_eq!(transport.request_timeout(), Duration::from_secs(30));

        let tuned =
            HttpTransport::with_timeouts(Duration::from_secs(1), Duration::from_secs(60)).unwrap();
        assert_eq!(tuned.request_timeout(), Duration::from_secs(60));
    }

    #[tokio::test]
    async fn test_bad_method_is_invalid_request() {
        let transport = HttpTransport::new().unwrap();
        let request = RequestDescriptor {
            method: "NOT A METHOD".to_string(),
            url: "https://data.example.org/sparql".to_string(),
            headers: Default::default(),
            mode: None,
            credentials: None,
            cache: None,
        };
        let err = transport.perform(&request).await.unwrap_err();
        assert!(matches!(err, CacheError::InvalidRequest { .. }));
    }
}
