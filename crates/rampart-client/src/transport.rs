//! The platform HTTP seam.
//!
//! The executor never talks to a concrete HTTP library; it dispatches
//! [`TransportRequest`]s through the [`HttpTransport`] trait and classifies
//! the outcome. [`ReqwestTransport`] is the production implementation; tests
//! substitute scripted transports.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::TransportError;
use crate::method::HttpMethod;

/// A fully-built request, ready for the wire.
#[derive(Debug, Clone)]
pub struct TransportRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

/// A raw response as the transport saw it.
#[derive(Debug, Clone)]
pub struct TransportResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl TransportResponse {
    /// First occurrence of a header, case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Abstraction over the platform HTTP runtime.
///
/// Implementations suspend the calling task until the exchange completes or
/// fails; dropping the future aborts the pending I/O.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn execute(&self, request: TransportRequest) -> Result<TransportResponse, TransportError>;
}

/// Connection and read timeouts applied by the production transport.
///
/// Timeout expiry surfaces as [`TransportError::Network`], which the result
/// algebra classifies as retryable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransportConfig {
    /// TCP connect timeout.
    pub connect_timeout: Duration,

    /// Total per-request timeout (connect + transfer).
    pub read_timeout: Duration,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(5),
            read_timeout: Duration::from_secs(30),
        }
    }
}

/// Production transport backed by a shared `reqwest::Client`.
///
/// The client is constructed once and reused for every request issued
/// through this transport; reqwest pools connections internally.
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Build the underlying client. Fails only on broken TLS or resolver
    /// setup, which is a configuration error by definition.
    pub fn new(config: TransportConfig) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.read_timeout)
            .build()
            .map_err(|e| TransportError::Configuration(e.to_string()))?;
        Ok(Self { client })
    }

    fn to_reqwest_method(method: HttpMethod) -> reqwest::Method {
        match method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Delete => reqwest::Method::DELETE,
            HttpMethod::Patch => reqwest::Method::PATCH,
            HttpMethod::Head => reqwest::Method::HEAD,
            HttpMethod::Options => reqwest::Method::OPTIONS,
        }
    }

    fn classify(error: reqwest::Error) -> TransportError {
        if error.is_builder() {
            return TransportError::Configuration(error.to_string());
        }
        // Everything that got as far as the wire is a network fault:
        // connect failures, resets, DNS, timeout expiry.
        TransportError::Network(error.to_string())
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn execute(&self, request: TransportRequest) -> Result<TransportResponse, TransportError> {
        let url = reqwest::Url::parse(&request.url)
            .map_err(|e| TransportError::Configuration(format!("invalid URL: {}", e)))?;

        let mut builder = self
            .client
            .request(Self::to_reqwest_method(request.method), url);

        for (name, value) in &request.headers {
            let header_name = reqwest::header::HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| TransportError::Configuration(format!("invalid header name: {}", e)))?;
            let header_value = reqwest::header::HeaderValue::from_str(value)
                .map_err(|e| TransportError::Configuration(format!("invalid header value: {}", e)))?;
            builder = builder.header(header_name, header_value);
        }

        if !request.body.is_empty() {
            builder = builder.body(request.body.clone());
        }

        debug!(method = %request.method, url = %request.url, "transport dispatch");

        let response = builder.send().await.map_err(Self::classify)?;
        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .map(|(n, v)| {
                (
                    n.as_str().to_string(),
                    String::from_utf8_lossy(v.as_bytes()).into_owned(),
                )
            })
            .collect();
        let body = response.bytes().await.map_err(Self::classify)?.to_vec();

        Ok(TransportResponse {
            status,
            headers,
            body,
        })
    }
}
