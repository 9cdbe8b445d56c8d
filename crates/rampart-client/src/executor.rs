//! The base HTTP executor.
//!
//! Issues exactly one request per dispatch and synthesizes a typed
//! [`HttpResult`]. All resilience lives in the decorators above; the
//! executor's contract is classification:
//!
//! | Outcome | Result |
//! |---------|--------|
//! | 2xx, body converts | `Success{content, etag, status}` |
//! | 2xx, empty body | `Success{content: None, etag, status}` |
//! | 2xx, conversion fails | `Failure{InvalidContent}` |
//! | 304 | `Failure{InvalidContent, status: 304}` (the cache layer resolves it) |
//! | 4xx | `Failure{ClientError}` |
//! | 5xx | `Failure{ServerError}` |
//! | 1xx / 3xx / out of range | `Failure{InvalidContent}` |
//! | transport network fault | `Failure{NetworkError}` |
//! | transport config fault | `Failure{ConfigurationError}` |

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::adapter::{AdapterRequest, HttpAdapter};
use crate::convert::ResponseConverter;
use crate::error::TransportError;
use crate::result::{ErrorCategory, HttpResult};
use crate::status::HttpStatusFamily;
use crate::transport::{HttpTransport, TransportRequest};

/// Base adapter: one URI, one transport, one response converter.
///
/// The transport (and its underlying HTTP client) is created once and
/// shared by every request this executor dispatches.
pub struct HttpExecutor<T> {
    uri: String,
    transport: Arc<dyn HttpTransport>,
    converter: Arc<dyn ResponseConverter<T>>,
}

impl<T> HttpExecutor<T> {
    pub fn new(
        uri: impl Into<String>,
        transport: Arc<dyn HttpTransport>,
        converter: Arc<dyn ResponseConverter<T>>,
    ) -> Self {
        Self {
            uri: uri.into(),
            transport,
            converter,
        }
    }
}

#[async_trait]
impl<T: Send + Sync + 'static> HttpAdapter<T> for HttpExecutor<T> {
    fn uri(&self) -> &str {
        &self.uri
    }

    async fn dispatch(&self, request: AdapterRequest) -> HttpResult<T> {
        // Precondition: safe methods carry no body. Checked before any
        // network activity.
        if request.method.is_safe() && request.body.is_some() {
            warn!(method = %request.method, uri = %self.uri, "safe method dispatched with a body");
            return HttpResult::failure(
                format!("{} requests may not carry a body", request.method),
                None,
                ErrorCategory::ConfigurationError,
            );
        }

        let mut headers = request.headers;
        if let (Some(content_type), Some(_)) = (&request.content_type, &request.body) {
            headers.push(("Content-Type".to_string(), content_type.header_value()));
        }

        let wire_request = TransportRequest {
            method: request.method,
            url: self.uri.clone(),
            headers,
            body: request.body.unwrap_or_default(),
        };

        debug!(method = %request.method, uri = %self.uri, "executing request");

        let response = match self.transport.execute(wire_request).await {
            Ok(response) => response,
            Err(error) => {
                let category = match &error {
                    TransportError::Network(_) => ErrorCategory::NetworkError,
                    TransportError::Configuration(_) => ErrorCategory::ConfigurationError,
                };
                warn!(uri = %self.uri, category = %category, "transport failure: {}", error);
                return HttpResult::failure(error.to_string(), Some(Box::new(error)), category);
            }
        };

        let status = response.status;
        let etag = response.header("etag").map(str::to_string);

        if status == 304 {
            // Reserved for the cache layer; reaching here means nobody
            // supplied conditional request state.
            return HttpResult::failure_with_fallback(
                "304 Not Modified without a cached entry to serve",
                None,
                None,
                ErrorCategory::InvalidContent,
                etag,
                Some(status),
            );
        }

        let family = HttpStatusFamily::from_code(status);
        if family.is_success() {
            if response.body.is_empty() {
                return HttpResult::success(None, etag, status);
            }
            return match self.converter.convert(&response.body) {
                Some(content) => HttpResult::success(Some(content), etag, status),
                None => HttpResult::failure_with_fallback(
                    format!(
                        "response body conversion failed ({} bytes as {})",
                        response.body.len(),
                        self.converter.content_type()
                    ),
                    None,
                    None,
                    ErrorCategory::InvalidContent,
                    etag,
                    Some(status),
                ),
            };
        }

        let category = match ErrorCategory::try_from(family) {
            Ok(category) => category,
            // Unreachable: the success family was handled above.
            Err(_) => ErrorCategory::InvalidContent,
        };
        HttpResult::failure_with_fallback(
            format!("HTTP {} ({})", status, family),
            None,
            None,
            category,
            etag,
            Some(status),
        )
    }
}
