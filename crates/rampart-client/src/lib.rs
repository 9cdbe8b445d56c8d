//! # Rampart Client - Resilient HTTP Client Runtime
//!
//! A client-side execution runtime built from three independently useful
//! layers sharing one adapter contract:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │  caller                                                          │
//! │    │                                                             │
//! │    ▼                                                             │
//! │  ┌────────────────────┐   retry gate, exponential backoff        │
//! │  │  RetryingAdapter   │   + jitter, idempotency-aware            │
//! │  └─────────┬──────────┘                                          │
//! │            ▼                                                     │
//! │  ┌────────────────────┐   If-None-Match / 304 handling,          │
//! │  │ EtagCachingAdapter │   bounded eviction, stale fallback       │
//! │  └─────────┬──────────┘                                          │
//! │            ▼                                                     │
//! │  ┌────────────────────┐   precondition checks, status            │
//! │  │    HttpExecutor    │   classification, typed conversion       │
//! │  └─────────┬──────────┘                                          │
//! │            ▼                                                     │
//! │  ┌────────────────────┐                                          │
//! │  │   HttpTransport    │   reqwest (production) or a mock         │
//! │  └────────────────────┘                                          │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every operation resolves to a sealed [`HttpResult`]: a typed success or
//! a categorized failure. Nothing panics across the async boundary;
//! cancellation is dropping the future.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use rampart_client::{
//!     CacheConfig, EtagCachingAdapter, HttpAdapter, HttpExecutor,
//!     JsonResponseConverter, ReqwestTransport, RetryConfig, RetryingAdapter,
//!     TransportConfig,
//! };
//!
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let transport = Arc::new(ReqwestTransport::new(TransportConfig::default())?);
//! let executor = HttpExecutor::new(
//!     "https://api.example.com/items",
//!     transport,
//!     Arc::new(JsonResponseConverter::<serde_json::Value>::new()),
//! );
//! let cached = EtagCachingAdapter::new(executor, CacheConfig::default());
//! let client = RetryingAdapter::new(cached, RetryConfig::default());
//!
//! let result = client.get(&[]).await;
//! if result.is_success() {
//!     println!("{:?}", result.content());
//! }
//! # Ok(()) }
//! ```

mod adapter;
mod blocking;
mod cache;
mod cache_key;
mod content_type;
mod convert;
mod error;
mod executor;
mod method;
mod result;
mod retry;
mod status;
mod transport;

pub use adapter::{AdapterRequest, HttpAdapter};
pub use blocking::BlockingAdapter;
pub use cache::{CacheConfig, CacheEntry, EtagCachingAdapter};
pub use cache_key::CacheKeyHeaderFilter;
pub use content_type::ContentType;
pub use convert::{
    BytesRequestConverter, BytesResponseConverter, JsonRequestConverter, JsonResponseConverter,
    RequestConverter, ResponseConverter, StringRequestConverter, StringResponseConverter,
};
pub use error::{CategoryConversionError, ConversionError, TransportError};
pub use executor::HttpExecutor;
pub use method::HttpMethod;
pub use result::{ErrorCategory, HttpResult};
pub use retry::{RetryConfig, RetryingAdapter};
pub use status::HttpStatusFamily;
pub use transport::{HttpTransport, ReqwestTransport, TransportConfig, TransportRequest, TransportResponse};
