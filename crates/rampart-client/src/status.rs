//! RFC 7231 status-code families and their mapping onto error categories.

use serde::{Deserialize, Serialize};

use crate::error::CategoryConversionError;
use crate::result::ErrorCategory;

/// The five RFC 7231 response families plus a bucket for out-of-range codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HttpStatusFamily {
    /// 1xx.
    Informational,
    /// 2xx.
    Success,
    /// 3xx.
    Redirection,
    /// 4xx.
    ClientError,
    /// 5xx.
    ServerError,
    /// Anything outside 100..=599.
    Unknown,
}

impl HttpStatusFamily {
    /// Classify a raw status code.
    pub fn from_code(code: u16) -> Self {
        match code {
            100..=199 => Self::Informational,
            200..=299 => Self::Success,
            300..=399 => Self::Redirection,
            400..=499 => Self::ClientError,
            500..=599 => Self::ServerError,
            _ => Self::Unknown,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }
}

impl std::fmt::Display for HttpStatusFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Informational => "informational (1xx)",
            Self::Success => "success (2xx)",
            Self::Redirection => "redirection (3xx)",
            Self::ClientError => "client error (4xx)",
            Self::ServerError => "server error (5xx)",
            Self::Unknown => "unknown",
        };
        f.write_str(label)
    }
}

/// Failure-category mapping for non-success families.
///
/// The `Success` family has no error category; asking for one is a caller
/// bug and fails with a precondition error rather than guessing.
impl TryFrom<HttpStatusFamily> for ErrorCategory {
    type Error = CategoryConversionError;

    fn try_from(family: HttpStatusFamily) -> Result<Self, Self::Error> {
        match family {
            HttpStatusFamily::ClientError => Ok(ErrorCategory::ClientError),
            HttpStatusFamily::ServerError => Ok(ErrorCategory::ServerError),
            HttpStatusFamily::Informational
            | HttpStatusFamily::Redirection
            | HttpStatusFamily::Unknown => Ok(ErrorCategory::InvalidContent),
            HttpStatusFamily::Success => Err(CategoryConversionError),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_family_boundaries() {
        assert_eq!(HttpStatusFamily::from_code(100), HttpStatusFamily::Informational);
        assert_eq!(HttpStatusFamily::from_code(200), HttpStatusFamily::Success);
        assert_eq!(HttpStatusFamily::from_code(299), HttpStatusFamily::Success);
        assert_eq!(HttpStatusFamily::from_code(304), HttpStatusFamily::Redirection);
        assert_eq!(HttpStatusFamily::from_code(404), HttpStatusFamily::ClientError);
        assert_eq!(HttpStatusFamily::from_code(503), HttpStatusFamily::ServerError);
        assert_eq!(HttpStatusFamily::from_code(99), HttpStatusFamily::Unknown);
        assert_eq!(HttpStatusFamily::from_code(600), HttpStatusFamily::Unknown);
    }

    #[test]
    fn test_category_mapping() {
        assert_eq!(
            ErrorCategory::try_from(HttpStatusFamily::ClientError).unwrap(),
            ErrorCategory::ClientError
        );
        assert_eq!(
            ErrorCategory::try_from(HttpStatusFamily::ServerError).unwrap(),
            ErrorCategory::ServerError
        );
        assert_eq!(
            ErrorCategory::try_from(HttpStatusFamily::Redirection).unwrap(),
            ErrorCategory::InvalidContent
        );
        assert_eq!(
            ErrorCategory::try_from(HttpStatusFamily::Unknown).unwrap(),
            ErrorCategory::InvalidContent
        );
    }

    #[test]
    fn test_success_family_not_convertible() {
        assert!(ErrorCategory::try_from(HttpStatusFamily::Success).is_err());
    }
}
