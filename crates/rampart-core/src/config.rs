//! Aggregated configuration for the Rampart facade.

use rampart_client::{CacheConfig, RetryConfig, TransportConfig};
use rampart_validation::ValidationConfig;

/// Configuration for every layer the facade wires together.
///
/// Each section is the owning crate's config type; the facade adds nothing
/// of its own. `Default` composes the per-layer defaults.
#[derive(Debug, Clone, Default)]
pub struct RampartConfig {
    /// Validation pipeline settings.
    pub validation: ValidationConfig,

    /// Retry decorator policy.
    pub retry: RetryConfig,

    /// ETag cache sizing and key policy.
    pub cache: CacheConfig,

    /// Transport timeouts.
    pub transport: TransportConfig,
}

impl RampartConfig {
    pub fn with_validation(mut self, validation: ValidationConfig) -> Self {
        self.validation = validation;
        self
    }

    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_cache(mut self, cache: CacheConfig) -> Self {
        self.cache = cache;
        self
    }

    pub fn with_transport(mut self, transport: TransportConfig) -> Self {
        self.transport = transport;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_default_composes_layer_defaults() {
        let config = RampartConfig::default();
        assert_eq!(config.retry.max_attempts, 3);
        assert_eq!(config.cache.max_cache_size, 256);
        assert_eq!(config.validation.max_path_length, 4096);
        assert_eq!(config.transport.connect_timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_builder_replaces_sections() {
        let config = RampartConfig::default()
            .with_retry(RetryConfig::default().with_max_attempts(7));
        assert_eq!(config.retry.max_attempts, 7);
    }
}
