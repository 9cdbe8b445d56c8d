//! Error types for the Rampart facade.

use thiserror::Error;

use rampart_validation::SecurityViolation;

/// Facade-level error: either the input failed validation or a client
/// component could not be constructed.
#[derive(Debug, Error)]
pub enum RampartError {
    /// A validation pipeline rejected the input.
    #[error(transparent)]
    Validation(#[from] SecurityViolation),

    /// Transport setup failed (TLS, resolver, timeouts).
    #[error("transport error: {0}")]
    Transport(String),

    /// Invalid facade configuration.
    #[error("configuration error: {0}")]
    Config(String),
}
