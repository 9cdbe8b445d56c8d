//! The sealed result algebra of the client runtime.
//!
//! Every operation resolves to an [`HttpResult<T>`]: a typed success or a
//! categorized failure. No exception crosses the async boundary; transport
//! faults, bad statuses and conversion failures all land here with an
//! [`ErrorCategory`] that downstream layers (notably retry) consume.

use serde::{Deserialize, Serialize};

/// Category of a failed operation. Drives retryability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorCategory {
    /// Transport-level fault (connect, DNS, timeout). Retryable.
    NetworkError,
    /// 5xx response. Retryable.
    ServerError,
    /// 4xx response. The request is wrong; retrying cannot help.
    ClientError,
    /// The response arrived but could not be interpreted: conversion
    /// failure, unexpected status family, 304 without conditional state.
    InvalidContent,
    /// The request was never dispatched: precondition violation, body
    /// serialization failure, broken transport setup.
    ConfigurationError,
}

impl ErrorCategory {
    /// Whether the retry layer may re-dispatch a failure of this category.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::NetworkError | Self::ServerError)
    }
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::NetworkError => "network error",
            Self::ServerError => "server error",
            Self::ClientError => "client error",
            Self::InvalidContent => "invalid content",
            Self::ConfigurationError => "configuration error",
        };
        f.write_str(label)
    }
}

/// Result of one HTTP operation, sealed to exactly two shapes.
///
/// # Example
///
/// ```rust
/// use rampart_client::{ErrorCategory, HttpResult};
///
/// let ok: HttpResult<String> = HttpResult::success(Some("body".into()), Some("\"v1\"".into()), 200);
/// assert!(ok.is_success());
/// assert_eq!(ok.etag(), Some("\"v1\""));
///
/// let err: HttpResult<String> = HttpResult::failure("boom", None, ErrorCategory::ServerError);
/// assert!(err.is_retryable());
/// ```
#[derive(Debug)]
pub enum HttpResult<T> {
    /// The exchange succeeded (2xx, or a cache-resolved 304).
    Success {
        /// Converted body; `None` for bodyless responses.
        content: Option<T>,
        /// First `ETag` response header, if any.
        etag: Option<String>,
        /// The HTTP status that produced this result.
        http_status: u16,
    },

    /// The exchange failed or produced uninterpretable content.
    Failure {
        /// Human-readable description.
        message: String,
        /// Underlying error, when one exists.
        cause: Option<Box<dyn std::error::Error + Send + Sync>>,
        /// Stale content a caching layer can supply alongside the failure.
        fallback_content: Option<T>,
        /// Failure classification; drives retry policy.
        category: ErrorCategory,
        /// ETag associated with `fallback_content` or the failed response.
        cached_etag: Option<String>,
        /// HTTP status, when the exchange got far enough to have one.
        http_status: Option<u16>,
    },
}

impl<T> HttpResult<T> {
    /// Construct a success.
    pub fn success(content: Option<T>, etag: Option<String>, http_status: u16) -> Self {
        Self::Success {
            content,
            etag,
            http_status,
        }
    }

    /// Construct a failure with no fallback content.
    pub fn failure(
        message: impl Into<String>,
        cause: Option<Box<dyn std::error::Error + Send + Sync>>,
        category: ErrorCategory,
    ) -> Self {
        Self::Failure {
            message: message.into(),
            cause,
            fallback_content: None,
            category,
            cached_etag: None,
            http_status: None,
        }
    }

    /// Construct a fully-populated failure, as the cache layer does when it
    /// can furnish stale content.
    pub fn failure_with_fallback(
        message: impl Into<String>,
        cause: Option<Box<dyn std::error::Error + Send + Sync>>,
        fallback_content: Option<T>,
        category: ErrorCategory,
        cached_etag: Option<String>,
        http_status: Option<u16>,
    ) -> Self {
        Self::Failure {
            message: message.into(),
            cause,
            fallback_content,
            category,
            cached_etag,
            http_status,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failure { .. })
    }

    /// Body content: present for successes with a body and for failures
    /// carrying fallback content.
    pub fn content(&self) -> Option<&T> {
        match self {
            Self::Success { content, .. } => content.as_ref(),
            Self::Failure {
                fallback_content, ..
            } => fallback_content.as_ref(),
        }
    }

    /// Consume the result, returning the content (or fallback content).
    pub fn into_content(self) -> Option<T> {
        match self {
            Self::Success { content, .. } => content,
            Self::Failure {
                fallback_content, ..
            } => fallback_content,
        }
    }

    /// ETag of the success, or the cached ETag attached to a failure.
    pub fn etag(&self) -> Option<&str> {
        match self {
            Self::Success { etag, .. } => etag.as_deref(),
            Self::Failure { cached_etag, .. } => cached_etag.as_deref(),
        }
    }

    /// HTTP status, when the exchange produced one.
    pub fn http_status(&self) -> Option<u16> {
        match self {
            Self::Success { http_status, .. } => Some(*http_status),
            Self::Failure { http_status, .. } => *http_status,
        }
    }

    /// Failure category; `None` for successes.
    pub fn error_category(&self) -> Option<ErrorCategory> {
        match self {
            Self::Success { .. } => None,
            Self::Failure { category, .. } => Some(*category),
        }
    }

    /// Whether the retry layer may re-dispatch this result.
    pub fn is_retryable(&self) -> bool {
        self.error_category()
            .is_some_and(|category| category.is_retryable())
    }

    /// Failure message; `None` for successes.
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Success { .. } => None,
            Self::Failure { message, .. } => Some(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_accessors() {
        let result: HttpResult<String> =
            HttpResult::success(Some("body".into()), Some("\"abc\"".into()), 200);
        assert!(result.is_success());
        assert!(!result.is_failure());
        assert_eq!(result.content().map(String::as_str), Some("body"));
        assert_eq!(result.etag(), Some("\"abc\""));
        assert_eq!(result.http_status(), Some(200));
        assert_eq!(result.error_category(), None);
        assert!(!result.is_retryable());
        assert_eq!(result.message(), None);
    }

    #[test]
    fn test_bodyless_success() {
        let result: HttpResult<String> = HttpResult::success(None, None, 204);
        assert!(result.is_success());
        assert_eq!(result.content(), None);
    }

    #[test]
    fn test_failure_accessors() {
        let result: HttpResult<String> =
            HttpResult::failure("status 503", None, ErrorCategory::ServerError);
        assert!(result.is_failure());
        assert_eq!(result.error_category(), Some(ErrorCategory::ServerError));
        assert!(result.is_retryable());
        assert_eq!(result.message(), Some("status 503"));
        assert_eq!(result.http_status(), None);
    }

    #[test]
    fn test_fallback_failure_carries_stale_content() {
        let result: HttpResult<String> = HttpResult::failure_with_fallback(
            "refresh failed",
            None,
            Some("stale".into()),
            ErrorCategory::ServerError,
            Some("\"v1\"".into()),
            Some(503),
        );
        assert!(result.is_failure());
        assert_eq!(result.content().map(String::as_str), Some("stale"));
        assert_eq!(result.etag(), Some("\"v1\""));
        assert_eq!(result.http_status(), Some(503));
    }

    #[test]
    fn test_retryability_per_category() {
        assert!(ErrorCategory::NetworkError.is_retryable());
        assert!(ErrorCategory::ServerError.is_retryable());
        assert!(!ErrorCategory::ClientError.is_retryable());
        assert!(!ErrorCategory::InvalidContent.is_retryable());
        assert!(!ErrorCategory::ConfigurationError.is_retryable());
    }

    #[test]
    fn test_into_content() {
        let result: HttpResult<u32> = HttpResult::success(Some(7), None, 200);
        assert_eq!(result.into_content(), Some(7));
    }
}
