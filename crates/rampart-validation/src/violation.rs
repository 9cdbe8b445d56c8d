//! Violation types raised by validation stages.
//!
//! Every stage failure surfaces as a [`SecurityViolation`] carrying a precise
//! [`ViolationKind`] tag, the name of the stage that raised it, and a bounded
//! snippet of the offending value. Violations are never recovered locally:
//! the first violation terminates the pipeline and no later stage observes
//! the input (fail-secure contract).

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Maximum number of characters of the offending value kept in a violation.
///
/// Violations are routinely logged; keeping the snippet bounded means an
/// attacker cannot use a megabyte payload to flood the audit trail.
const SNIPPET_MAX_CHARS: usize = 64;

/// The taxonomy of attacks and malformations a pipeline can reject.
///
/// Each variant corresponds to a distinct attack class or encoding defect
/// with a dedicated detection strategy:
///
/// | Variant | Detected by | Typical payload |
/// |---------|-------------|-----------------|
/// | `PathTraversal` | normalization | `../../etc/passwd` |
/// | `DoubleEncoding` | decoding | `%252e%252e%252f` |
/// | `OverlongUtf8` | decoding | `%c0%af` (overlong `/`) |
/// | `NullByte` | decoding | `file.txt%00.jpg` |
/// | `ControlCharacter` | character validation | `value\r\nSet-Cookie:` |
/// | `LengthExceeded` | length validation | oversized component |
/// | `InvalidCharacter` | character validation | `\` in a path, `@` in a header name |
/// | `SuspiciousPattern` | pattern matching | catalogued attack indicator |
/// | `MalformedInput` | decoding | `%zz`, lone surrogate bytes |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ViolationKind {
    /// A path segment walk escaped the root.
    PathTraversal,

    /// A percent-encoded sequence decoded into another percent-encoded
    /// sequence (classic filter-evasion layering).
    DoubleEncoding,

    /// A codepoint was encoded in more UTF-8 bytes than minimally required.
    OverlongUtf8,

    /// An embedded NUL byte, raw or percent-encoded.
    NullByte,

    /// A C0/C1 control character or DEL after decoding.
    ControlCharacter,

    /// The component exceeded its configured length limit.
    LengthExceeded,

    /// A character outside the allowed class for this component.
    InvalidCharacter,

    /// A catalogued attack pattern matched; carries the pattern id.
    SuspiciousPattern(u32),

    /// Input that cannot be decoded at all: bad hex digits, truncated
    /// escapes, surrogate halves, non-standard `%uXXXX` escapes.
    MalformedInput,
}

impl std::fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PathTraversal => write!(f, "path traversal"),
            Self::DoubleEncoding => write!(f, "double encoding"),
            Self::OverlongUtf8 => write!(f, "overlong UTF-8"),
            Self::NullByte => write!(f, "null byte"),
            Self::ControlCharacter => write!(f, "control character"),
            Self::LengthExceeded => write!(f, "length exceeded"),
            Self::InvalidCharacter => write!(f, "invalid character"),
            Self::SuspiciousPattern(id) => write!(f, "suspicious pattern #{}", id),
            Self::MalformedInput => write!(f, "malformed input"),
        }
    }
}

/// A security violation raised by a validation stage.
///
/// Carries everything an audit log needs: the kind of attack, the stage that
/// caught it, a human-readable detail, and a truncated snippet of the
/// offending value.
///
/// # Example
///
/// ```rust
/// use rampart_validation::{SecurityViolation, ViolationKind};
///
/// let v = SecurityViolation::new(
///     ViolationKind::NullByte,
///     "DecodingStage",
///     "John%00",
///     "embedded NUL at byte 4",
/// );
/// assert_eq!(v.kind(), ViolationKind::NullByte);
/// assert_eq!(v.stage(), "DecodingStage");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{kind} rejected by {stage}: {detail} (input: {snippet:?})")]
pub struct SecurityViolation {
    kind: ViolationKind,
    stage: String,
    snippet: String,
    detail: String,
}

impl SecurityViolation {
    /// Create a violation, truncating the offending value to a bounded snippet.
    pub fn new(
        kind: ViolationKind,
        stage: &str,
        offending_value: &str,
        detail: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            stage: stage.to_string(),
            snippet: snip(offending_value),
            detail: detail.into(),
        }
    }

    /// The violation tag.
    pub fn kind(&self) -> ViolationKind {
        self.kind
    }

    /// Name of the stage that raised the violation.
    pub fn stage(&self) -> &str {
        &self.stage
    }

    /// Truncated snippet of the offending value.
    pub fn snippet(&self) -> &str {
        &self.snippet
    }

    /// Human-readable detail.
    pub fn detail(&self) -> &str {
        &self.detail
    }

    /// Returns the matched pattern id for `SuspiciousPattern` violations.
    pub fn pattern_id(&self) -> Option<u32> {
        match self.kind {
            ViolationKind::SuspiciousPattern(id) => Some(id),
            _ => None,
        }
    }
}

/// Truncate a value for inclusion in logs and violation records.
fn snip(value: &str) -> String {
    if value.chars().count() <= SNIPPET_MAX_CHARS {
        return value.to_string();
    }
    let mut s: String = value.chars().take(SNIPPET_MAX_CHARS).collect();
    s.push_str("...");
    s
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_violation_accessors() {
        let v = SecurityViolation::new(
            ViolationKind::PathTraversal,
            "NormalizationStage",
            "../../etc/passwd",
            "segment walk underflowed the root",
        );
        assert_eq!(v.kind(), ViolationKind::PathTraversal);
        assert_eq!(v.stage(), "NormalizationStage");
        assert_eq!(v.snippet(), "../../etc/passwd");
        assert!(v.detail().contains("underflowed"));
        assert_eq!(v.pattern_id(), None);
    }

    #[test]
    fn test_pattern_id_exposed() {
        let v = SecurityViolation::new(
            ViolationKind::SuspiciousPattern(42),
            "PatternMatchingStage",
            "union select",
            "matched catalogue entry",
        );
        assert_eq!(v.pattern_id(), Some(42));
    }

    #[test]
    fn test_snippet_truncated() {
        let long = "a".repeat(500);
        let v = SecurityViolation::new(ViolationKind::LengthExceeded, "LengthValidationStage", &long, "too long");
        assert!(v.snippet().len() < 80);
        assert!(v.snippet().ends_with("..."));
    }

    #[test]
    fn test_display_includes_stage_and_kind() {
        let v = SecurityViolation::new(ViolationKind::NullByte, "DecodingStage", "x%00", "NUL");
        let msg = v.to_string();
        assert!(msg.contains("null byte"));
        assert!(msg.contains("DecodingStage"));
    }

    #[test]
    fn test_serialization_round_trip() {
        let v = SecurityViolation::new(ViolationKind::DoubleEncoding, "DecodingStage", "%252f", "layered");
        let json = serde_json::to_string(&v).unwrap();
        let parsed: SecurityViolation = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, v);
    }
}
