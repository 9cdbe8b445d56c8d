//! HTTP method enumeration with safety and idempotency predicates.

use serde::{Deserialize, Serialize};

/// The HTTP methods the client runtime dispatches.
///
/// The two predicates drive policy elsewhere in the crate: safe methods may
/// not carry a request body (executor precondition) and only idempotent
/// methods are eligible for retry when
/// [`RetryConfig::idempotent_only`](crate::RetryConfig) is set.
///
/// Invariant: every safe method is idempotent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Patch,
    Head,
    Options,
}

impl HttpMethod {
    /// The method token as it appears on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
            Self::Patch => "PATCH",
            Self::Head => "HEAD",
            Self::Options => "OPTIONS",
        }
    }

    /// Safe methods are not expected to modify server state (RFC 7231 §4.2.1).
    pub fn is_safe(&self) -> bool {
        matches!(self, Self::Get | Self::Head | Self::Options)
    }

    /// Idempotent methods have the same effect repeated as executed once
    /// (RFC 7231 §4.2.2).
    pub fn is_idempotent(&self) -> bool {
        matches!(
            self,
            Self::Get | Self::Put | Self::Delete | Self::Head | Self::Options
        )
    }
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
