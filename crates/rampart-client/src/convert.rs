//! Typed body conversion at the adapter boundary.
//!
//! Response converters turn raw bytes into `T` and **never fail loudly**: a
//! parse error is `None`, which the executor classifies as an
//! `InvalidContent` failure. Request converters serialize a typed payload
//! into bytes; their failures are domain errors the adapter surface turns
//! into `ConfigurationError` failures before anything touches the network.

use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::content_type::ContentType;
use crate::error::ConversionError;

/// Converts response bodies into `T`.
pub trait ResponseConverter<T>: Send + Sync {
    /// The content type this converter expects.
    fn content_type(&self) -> ContentType;

    /// Convert raw bytes, returning `None` on any parse failure.
    fn convert(&self, raw: &[u8]) -> Option<T>;
}

/// Converts a typed request payload into body bytes.
pub trait RequestConverter<R>: Send + Sync {
    /// The content type stamped on requests carrying this body.
    fn content_type(&self) -> ContentType;

    /// Serialize the payload. `None` yields an empty body.
    fn to_bytes(&self, body: Option<&R>) -> Result<Vec<u8>, ConversionError>;
}

/// JSON response converter backed by serde.
pub struct JsonResponseConverter<T> {
    _marker: PhantomData<fn() -> T>,
}

impl<T> JsonResponseConverter<T> {
    pub fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<T> Default for JsonResponseConverter<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: DeserializeOwned + Send + Sync> ResponseConverter<T> for JsonResponseConverter<T> {
    fn content_type(&self) -> ContentType {
        ContentType::Json
    }

    fn convert(&self, raw: &[u8]) -> Option<T> {
        serde_json::from_slice(raw).ok()
    }
}

/// UTF-8 string response converter.
pub struct StringResponseConverter;

impl ResponseConverter<String> for StringResponseConverter {
    fn content_type(&self) -> ContentType {
        ContentType::Text
    }

    fn convert(&self, raw: &[u8]) -> Option<String> {
        String::from_utf8(raw.to_vec()).ok()
    }
}

/// Opaque byte response converter; payload inspection is the caller's
/// concern.
pub struct BytesResponseConverter;

impl ResponseConverter<Vec<u8>> for BytesResponseConverter {
    fn content_type(&self) -> ContentType {
        ContentType::OctetStream
    }

    fn convert(&self, raw: &[u8]) -> Option<Vec<u8>> {
        Some(raw.to_vec())
    }
}

/// JSON request converter backed by serde.
pub struct JsonRequestConverter<R> {
    _marker: PhantomData<fn(R)>,
}

impl<R> JsonRequestConverter<R> {
    pub fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<R> Default for JsonRequestConverter<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Serialize + Send + Sync> RequestConverter<R> for JsonRequestConverter<R> {
    fn content_type(&self) -> ContentType {
        ContentType::Json
    }

    fn to_bytes(&self, body: Option<&R>) -> Result<Vec<u8>, ConversionError> {
        match body {
            None => Ok(Vec::new()),
            Some(value) => {
                serde_json::to_vec(value).map_err(|e| ConversionError(e.to_string()))
            }
        }
    }
}

/// Plain-text request converter.
pub struct StringRequestConverter;

impl RequestConverter<String> for StringRequestConverter {
    fn content_type(&self) -> ContentType {
        ContentType::Text
    }

    fn to_bytes(&self, body: Option<&String>) -> Result<Vec<u8>, ConversionError> {
        Ok(body.map(|s| s.as_bytes().to_vec()).unwrap_or_default())
    }
}

/// Opaque byte request converter.
pub struct BytesRequestConverter;

impl RequestConverter<Vec<u8>> for BytesRequestConverter {
    fn content_type(&self) -> ContentType {
        ContentType::OctetStream
    }

    fn to_bytes(&self, body: Option<&Vec<u8>>) -> Result<Vec<u8>, ConversionError> {
        Ok(body.cloned().unwrap_or_default())
    }
}
