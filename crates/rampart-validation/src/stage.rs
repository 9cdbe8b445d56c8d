//! The validation stage contract.
//!
//! A stage is a pure transformation over one HTTP component value: it either
//! refines the input (possibly rewriting it, as decoding and normalization
//! do) or raises a [`SecurityViolation`]. Stages are immutable after
//! construction and freely shared across threads.

use serde::{Deserialize, Serialize};

use crate::violation::SecurityViolation;

/// The HTTP component a stage or pattern applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComponentKind {
    /// A URL path or full URL.
    Path,
    /// A query parameter value.
    Parameter,
    /// An HTTP header value.
    HeaderValue,
    /// An HTTP header name.
    HeaderName,
}

impl ComponentKind {
    /// Short label used in log fields and violation details.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Path => "path",
            Self::Parameter => "parameter",
            Self::HeaderValue => "header value",
            Self::HeaderName => "header name",
        }
    }
}

/// Contract every validation stage implements.
///
/// The pipeline invokes [`validate`](ValidationStage::validate); an absent
/// input (`None`) propagates without invoking the stage body, so individual
/// stages only implement [`validate_value`](ValidationStage::validate_value)
/// over a present value.
///
/// # Purity
///
/// Stages must be deterministic and side-effect-free apart from tracing.
/// They share no mutable state; a stage may be called concurrently from any
/// number of threads.
pub trait ValidationStage: Send + Sync {
    /// Stage name as it appears in violations and logs.
    fn name(&self) -> &'static str;

    /// Validate one present value, returning the (possibly transformed)
    /// value to hand to the next stage.
    fn validate_value(&self, value: &str) -> Result<String, SecurityViolation>;

    /// Validate an optional value. `None` short-circuits to `Ok(None)`.
    fn validate(&self, value: Option<String>) -> Result<Option<String>, SecurityViolation> {
        match value {
            None => Ok(None),
            Some(v) => self.validate_value(&v).map(Some),
        }
    }
}
