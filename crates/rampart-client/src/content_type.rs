//! Content-type enumeration for request and response converters.

use serde::{Deserialize, Serialize};

/// The media types the built-in converters speak.
///
/// Text-based types default to UTF-8; binary types carry no charset. The
/// enumeration is closed: exotic media types belong in caller-provided
/// converters that treat the payload as opaque bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContentType {
    Json,
    Text,
    Html,
    Xml,
    FormUrlEncoded,
    OctetStream,
}

impl ContentType {
    /// The bare media type.
    pub fn media_type(&self) -> &'static str {
        match self {
            Self::Json => "application/json",
            Self::Text => "text/plain",
            Self::Html => "text/html",
            Self::Xml => "application/xml",
            Self::FormUrlEncoded => "application/x-www-form-urlencoded",
            Self::OctetStream => "application/octet-stream",
        }
    }

    /// Default charset, when the type is textual.
    pub fn charset(&self) -> Option<&'static str> {
        match self {
            Self::Json | Self::Text | Self::Html | Self::Xml | Self::FormUrlEncoded => {
                Some("utf-8")
            }
            Self::OctetStream => None,
        }
    }

    /// The full `Content-Type` header value: `media_type[; charset=NAME]`.
    pub fn header_value(&self) -> String {
        match self.charset() {
            Some(charset) => format!("{}; charset={}", self.media_type(), charset),
            None => self.media_type().to_string(),
        }
    }
}

impl std::fmt::Display for ContentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.media_type())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_media_types() {
        assert_eq!(ContentType::Json.media_type(), "application/json");
        assert_eq!(ContentType::OctetStream.media_type(), "application/octet-stream");
    }

    #[test]
    fn test_text_types_default_utf8() {
        assert_eq!(ContentType::Json.charset(), Some("utf-8"));
        assert_eq!(ContentType::Html.charset(), Some("utf-8"));
        assert_eq!(ContentType::OctetStream.charset(), None);
    }

    #[test]
    fn test_header_value_rendering() {
        assert_eq!(ContentType::Text.header_value(), "text/plain; charset=utf-8");
        assert_eq!(ContentType::OctetStream.header_value(), "application/octet-stream");
    }
}
