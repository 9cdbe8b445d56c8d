//! Error types for the client runtime.

use thiserror::Error;

/// Failures raised at the transport seam, classified so the executor can
/// map them onto [`ErrorCategory`](crate::ErrorCategory) without inspecting
/// implementation-specific error types.
#[derive(Debug, Error)]
pub enum TransportError {
    /// I/O level failure: connection refused/reset, DNS, timeout expiry.
    /// Retryable.
    #[error("network error: {0}")]
    Network(String),

    /// The request could never be sent: invalid URI, TLS setup failure,
    /// malformed header. Never retryable.
    #[error("transport configuration error: {0}")]
    Configuration(String),
}

/// A request body converter failed to serialize its payload.
#[derive(Debug, Error)]
#[error("request body serialization failed: {0}")]
pub struct ConversionError(pub String);

/// Raised when asking for the error category of a successful status family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("success responses have no error category")]
pub struct CategoryConversionError;
