//! The unified Rampart facade.
//!
//! Wires the validation pipelines and the client decorator stack behind one
//! configuration surface. The facade enforces the crossover contract: a URL
//! must pass the url-path pipeline before any client is constructed for it,
//! so a violating URL never reaches the network layer.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use tracing::info;

use rampart_client::{
    EtagCachingAdapter, HttpExecutor, HttpTransport, JsonResponseConverter, ReqwestTransport,
    ResponseConverter, RetryingAdapter, StringResponseConverter,
};
use rampart_validation::{PatternCatalog, SecurityViolation, ValidationPipeline};

use crate::config::RampartConfig;
use crate::error::RampartError;

/// The full decorator stack the facade hands out: retry over cache over the
/// base executor.
pub type SecuredClient<T> = RetryingAdapter<EtagCachingAdapter<T, HttpExecutor<T>>>;

/// Facade over the validation pipelines and the resilient client runtime.
///
/// # Example
///
/// ```rust,no_run
/// use rampart_core::{Rampart, RampartConfig};
/// use rampart_client::HttpAdapter;
///
/// # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
/// let rampart = Rampart::new(RampartConfig::default())?;
///
/// // Validation only:
/// assert!(rampart.validate_parameter("name=John").is_ok());
/// assert!(rampart.validate_url("/a/../../etc/passwd").is_err());
///
/// // Validated, cached, retried client:
/// let client = rampart.json_client::<serde_json::Value>("https://api.example.com/items")?;
/// let result = client.get(&[]).await;
/// # Ok(()) }
/// ```
pub struct Rampart {
    config: RampartConfig,
    transport: Arc<dyn HttpTransport>,
    url_pipeline: ValidationPipeline,
    parameter_pipeline: ValidationPipeline,
    header_name_pipeline: ValidationPipeline,
    header_value_pipeline: ValidationPipeline,
}

impl Rampart {
    /// Create a facade with the compiled-in attack catalogue.
    pub fn new(config: RampartConfig) -> Result<Self, RampartError> {
        Self::with_catalog(config, PatternCatalog::builtin())
    }

    /// Create a facade with a caller-supplied catalogue.
    pub fn with_catalog(
        config: RampartConfig,
        catalog: PatternCatalog,
    ) -> Result<Self, RampartError> {
        let transport = ReqwestTransport::new(config.transport.clone())
            .map_err(|e| RampartError::Transport(e.to_string()))?;

        let validation = Arc::new(config.validation.clone());
        let catalog = Arc::new(catalog);

        info!(
            patterns = catalog.len(),
            max_attempts = config.retry.max_attempts,
            cache_size = config.cache.max_cache_size,
            "Rampart initialized"
        );

        Ok(Self {
            url_pipeline: ValidationPipeline::url_path(Arc::clone(&validation), Arc::clone(&catalog)),
            parameter_pipeline: ValidationPipeline::parameter(Arc::clone(&validation), Arc::clone(&catalog)),
            header_name_pipeline: ValidationPipeline::header_name(Arc::clone(&validation), Arc::clone(&catalog)),
            header_value_pipeline: ValidationPipeline::header_value(validation, catalog),
            transport: Arc::new(transport),
            config,
        })
    }

    /// Validate a bare path or an absolute URL. The universal entry point
    /// for URL validation.
    pub fn validate_url(&self, url: &str) -> Result<String, SecurityViolation> {
        self.url_pipeline.validate_str(url)
    }

    /// Validate a URL path. Same pipeline as [`validate_url`](Self::validate_url).
    pub fn validate_path(&self, path: &str) -> Result<String, SecurityViolation> {
        self.url_pipeline.validate_str(path)
    }

    /// Validate a query parameter value.
    pub fn validate_parameter(&self, value: &str) -> Result<String, SecurityViolation> {
        self.parameter_pipeline.validate_str(value)
    }

    /// Validate a header name.
    pub fn validate_header_name(&self, name: &str) -> Result<String, SecurityViolation> {
        self.header_name_pipeline.validate_str(name)
    }

    /// Validate a header value.
    pub fn validate_header_value(&self, value: &str) -> Result<String, SecurityViolation> {
        self.header_value_pipeline.validate_str(value)
    }

    /// Validate a complete header pair.
    pub fn validate_header(
        &self,
        name: &str,
        value: &str,
    ) -> Result<(String, String), SecurityViolation> {
        Ok((
            self.validate_header_name(name)?,
            self.validate_header_value(value)?,
        ))
    }

    /// Validate a whole query string pair by pair.
    ///
    /// Splits on `&` and `=` and runs every name and value through the
    /// parameter pipeline. Returns the canonical (decoded, normalized)
    /// re-assembly; the first violating pair aborts the whole query.
    pub fn validate_query(&self, query: &str) -> Result<String, SecurityViolation> {
        let mut sanitized = Vec::new();
        for pair in query.split('&').filter(|p| !p.is_empty()) {
            match pair.split_once('=') {
                Some((name, value)) => {
                    let name = self.parameter_pipeline.validate_str(name)?;
                    let value = self.parameter_pipeline.validate_str(value)?;
                    sanitized.push(format!("{}={}", name, value));
                }
                None => sanitized.push(self.parameter_pipeline.validate_str(pair)?),
            }
        }
        Ok(sanitized.join("&"))
    }

    /// Build the full decorated client for a URL, with a caller-supplied
    /// response converter.
    ///
    /// Fail-secure: the URL runs through the url-path pipeline first and a
    /// violation aborts construction.
    pub fn client<T>(
        &self,
        url: &str,
        converter: Arc<dyn ResponseConverter<T>>,
    ) -> Result<SecuredClient<T>, RampartError>
    where
        T: Clone + Send + Sync + 'static,
    {
        self.client_with_transport(url, Arc::clone(&self.transport), converter)
    }

    /// Like [`client`](Self::client), but over a caller-supplied transport.
    /// The platform HTTP runtime is an external collaborator; anything
    /// implementing [`HttpTransport`] slots in here.
    pub fn client_with_transport<T>(
        &self,
        url: &str,
        transport: Arc<dyn HttpTransport>,
        converter: Arc<dyn ResponseConverter<T>>,
    ) -> Result<SecuredClient<T>, RampartError>
    where
        T: Clone + Send + Sync + 'static,
    {
        let validated = self.validate_url(url)?;
        let executor = HttpExecutor::new(validated, transport, converter);
        let cached = EtagCachingAdapter::new(executor, self.config.cache.clone());
        Ok(RetryingAdapter::new(cached, self.config.retry.clone()))
    }

    /// JSON convenience client.
    pub fn json_client<T>(&self, url: &str) -> Result<SecuredClient<T>, RampartError>
    where
        T: DeserializeOwned + Clone + Send + Sync + 'static,
    {
        self.client(url, Arc::new(JsonResponseConverter::<T>::new()))
    }

    /// Plain-text convenience client.
    pub fn text_client(&self, url: &str) -> Result<SecuredClient<String>, RampartError> {
        self.client(url, Arc::new(StringResponseConverter))
    }

    /// The active configuration.
    pub fn config(&self) -> &RampartConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rampart_validation::ViolationKind;

    fn rampart() -> Rampart {
        Rampart::new(RampartConfig::default()).unwrap()
    }

    #[test]
    fn test_facade_construction() {
        assert!(Rampart::new(RampartConfig::default()).is_ok());
    }

    #[test]
    fn test_url_validation_wired() {
        let r = rampart();
        assert_eq!(r.validate_url("/api//users/./1").unwrap(), "/api/users/1");
        let err = r.validate_url("../../etc/passwd").unwrap_err();
        assert_eq!(err.kind(), ViolationKind::PathTraversal);
    }

    #[test]
    fn test_parameter_validation_wired() {
        let r = rampart();
        assert!(r.validate_parameter("John").is_ok());
        let err = r.validate_parameter("John%00").unwrap_err();
        assert_eq!(err.kind(), ViolationKind::NullByte);
    }

    #[test]
    fn test_header_validation_wired() {
        let r = rampart();
        assert!(r.validate_header("X-Request-Id", "abc-123").is_ok());
        assert!(r.validate_header("X:Bad", "v").is_err());
        assert!(r.validate_header("X-Good", "v\r\nInjected: yes").is_err());
    }

    #[test]
    fn test_query_validation_wired() {
        let r = rampart();
        assert_eq!(
            r.validate_query("name=John&page=2").unwrap(),
            "name=John&page=2"
        );
        // Decoded canonical form comes back.
        assert_eq!(r.validate_query("q=a%20b").unwrap(), "q=a b");
        // One bad pair sinks the whole query.
        let err = r.validate_query("name=John&file=a%00").unwrap_err();
        assert_eq!(err.kind(), ViolationKind::NullByte);
        assert_eq!(r.validate_query("").unwrap(), "");
    }

    #[test]
    fn test_client_construction_rejects_violating_url() {
        let r = rampart();
        let built = r.text_client("https://host.example/a/../../etc/passwd");
        assert!(matches!(built, Err(RampartError::Validation(_))));
    }

    #[test]
    fn test_client_construction_accepts_clean_url() {
        let r = rampart();
        assert!(r.text_client("https://host.example/api/items").is_ok());
    }
}
