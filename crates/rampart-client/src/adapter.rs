//! The adapter contract shared by the executor and its decorators.
//!
//! Decorator chaining works because every layer implements the same
//! single-dispatch contract: the retry layer wraps the cache layer wraps the
//! executor, each owning its inner adapter. The verb methods are provided
//! sugar over [`HttpAdapter::dispatch`], so decorators intercept every
//! request no matter which verb the caller used.

use async_trait::async_trait;

use crate::content_type::ContentType;
use crate::convert::RequestConverter;
use crate::method::HttpMethod;
use crate::result::{ErrorCategory, HttpResult};

/// One request as it travels down the adapter chain.
///
/// The target URI is not part of the request: an adapter chain is bound to
/// one resource (see [`HttpAdapter::uri`]), which is what makes cache-key
/// composition and retry logging work without threading the URI through
/// every call.
#[derive(Debug, Clone)]
pub struct AdapterRequest {
    pub method: HttpMethod,
    pub headers: Vec<(String, String)>,
    /// Serialized body; `None` for bodyless requests.
    pub body: Option<Vec<u8>>,
    /// Content type of `body`, stamped as the `Content-Type` header by the
    /// executor. `None` when there is no body.
    pub content_type: Option<ContentType>,
}

impl AdapterRequest {
    pub fn new(method: HttpMethod) -> Self {
        Self {
            method,
            headers: Vec::new(),
            body: None,
            content_type: None,
        }
    }

    pub fn with_headers(mut self, headers: &[(String, String)]) -> Self {
        self.headers.extend_from_slice(headers);
        self
    }

    pub fn with_body(mut self, body: Vec<u8>, content_type: ContentType) -> Self {
        self.body = Some(body);
        self.content_type = Some(content_type);
        self
    }
}

/// Contract implemented by the executor and every decorator.
///
/// An adapter is bound to a single URI at construction; all verbs target
/// that resource. Implementations must be `Send + Sync`: one adapter chain
/// serves any number of concurrent tasks.
#[async_trait]
pub trait HttpAdapter<T: Send + 'static>: Send + Sync {
    /// The resource this adapter chain targets.
    fn uri(&self) -> &str;

    /// Dispatch one request. This is the single point decorators wrap.
    async fn dispatch(&self, request: AdapterRequest) -> HttpResult<T>;

    /// GET the resource.
    async fn get(&self, headers: &[(String, String)]) -> HttpResult<T> {
        self.dispatch(AdapterRequest::new(HttpMethod::Get).with_headers(headers))
            .await
    }

    /// HEAD the resource.
    async fn head(&self, headers: &[(String, String)]) -> HttpResult<T> {
        self.dispatch(AdapterRequest::new(HttpMethod::Head).with_headers(headers))
            .await
    }

    /// OPTIONS on the resource.
    async fn options(&self, headers: &[(String, String)]) -> HttpResult<T> {
        self.dispatch(AdapterRequest::new(HttpMethod::Options).with_headers(headers))
            .await
    }

    /// DELETE the resource.
    async fn delete(&self, headers: &[(String, String)]) -> HttpResult<T> {
        self.dispatch(AdapterRequest::new(HttpMethod::Delete).with_headers(headers))
            .await
    }

    /// POST a typed body to the resource.
    async fn post<R>(
        &self,
        body: Option<&R>,
        converter: &(dyn RequestConverter<R>),
        headers: &[(String, String)],
    ) -> HttpResult<T>
    where
        R: Sync,
    {
        self.send_with_body(HttpMethod::Post, body, converter, headers)
            .await
    }

    /// PUT a typed body to the resource.
    async fn put<R>(
        &self,
        body: Option<&R>,
        converter: &(dyn RequestConverter<R>),
        headers: &[(String, String)],
    ) -> HttpResult<T>
    where
        R: Sync,
    {
        self.send_with_body(HttpMethod::Put, body, converter, headers)
            .await
    }

    /// PATCH the resource with a typed body.
    async fn patch<R>(
        &self,
        body: Option<&R>,
        converter: &(dyn RequestConverter<R>),
        headers: &[(String, String)],
    ) -> HttpResult<T>
    where
        R: Sync,
    {
        self.send_with_body(HttpMethod::Patch, body, converter, headers)
            .await
    }

    /// Shared body-carrying path: serialize first, fail as
    /// `ConfigurationError` without dispatching when serialization breaks.
    async fn send_with_body<R>(
        &self,
        method: HttpMethod,
        body: Option<&R>,
        converter: &(dyn RequestConverter<R>),
        headers: &[(String, String)],
    ) -> HttpResult<T>
    where
        R: Sync,
    {
        let bytes = match converter.to_bytes(body) {
            Ok(bytes) => bytes,
            Err(error) => {
                return HttpResult::failure(
                    error.to_string(),
                    Some(Box::new(error)),
                    ErrorCategory::ConfigurationError,
                );
            }
        };

        let mut request = AdapterRequest::new(method).with_headers(headers);
        if body.is_some() {
            request = request.with_body(bytes, converter.content_type());
        }
        self.dispatch(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content_type::ContentType;
    use crate::convert::StringRequestConverter;
    use crate::error::ConversionError;

    struct EchoAdapter;

    #[async_trait]
    impl HttpAdapter<String> for EchoAdapter {
        fn uri(&self) -> &str {
            "https://example.test/echo"
        }

        async fn dispatch(&self, request: AdapterRequest) -> HttpResult<String> {
            let summary = format!(
                "{} body={} ct={:?}",
                request.method,
                request.body.map(|b| b.len()).unwrap_or(0),
                request.content_type
            );
            HttpResult::success(Some(summary), None, 200)
        }
    }

    struct FailingConverter;

    impl RequestConverter<String> for FailingConverter {
        fn content_type(&self) -> ContentType {
            ContentType::Json
        }

        fn to_bytes(&self, _body: Option<&String>) -> Result<Vec<u8>, ConversionError> {
            Err(ConversionError("cannot serialize".into()))
        }
    }

    #[tokio::test]
    async fn test_get_sugar_has_no_body() {
        let result = EchoAdapter.get(&[]).await;
        assert_eq!(result.content().map(String::as_str), Some("GET body=0 ct=None"));
    }

    #[tokio::test]
    async fn test_post_sugar_serializes_body() {
        let body = "hello".to_string();
        let result = EchoAdapter
            .post(Some(&body), &StringRequestConverter, &[])
            .await;
        assert_eq!(
            result.content().map(String::as_str),
            Some("POST body=5 ct=Some(Text)")
        );
    }

    #[tokio::test]
    async fn test_post_without_body_sets_no_content_type() {
        let result = EchoAdapter
            .post::<String>(None, &StringRequestConverter, &[])
            .await;
        assert_eq!(result.content().map(String::as_str), Some("POST body=0 ct=None"));
    }

    #[tokio::test]
    async fn test_serialization_failure_never_dispatches() {
        let body = "x".to_string();
        let result = EchoAdapter.post(Some(&body), &FailingConverter, &[]).await;
        assert!(result.is_failure());
        assert_eq!(
            result.error_category(),
            Some(ErrorCategory::ConfigurationError)
        );
        assert!(!result.is_retryable());
    }
}
