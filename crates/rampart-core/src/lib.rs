//! # Rampart Core
//!
//! Unified facade over the Rampart security toolkit: fail-secure validation
//! of HTTP components plus a resilient, validated HTTP client runtime.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                        RAMPART CORE                             │
//! ├─────────────────────────────────────────────────────────────────┤
//! │                                                                 │
//! │                    ┌─────────────────┐                          │
//! │                    │     Rampart     │  ← Unified Facade        │
//! │                    └────────┬────────┘                          │
//! │                             │                                   │
//! │             ┌───────────────┴───────────────┐                   │
//! │             ▼                               ▼                   │
//! │  ┌─────────────────────┐       ┌─────────────────────┐          │
//! │  │ Validation          │       │ Client runtime      │          │
//! │  │ pipelines           │       │ retry → cache →     │          │
//! │  │ (path, parameter,   │       │ executor →          │          │
//! │  │  header name/value) │       │ transport           │          │
//! │  └─────────────────────┘       └─────────────────────┘          │
//! │                                                                 │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The crossover contract is fail-secure: [`Rampart::client`] validates the
//! target URL through the url-path pipeline before constructing anything,
//! so a violating URL never reaches the network.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use rampart_core::{Rampart, RampartConfig};
//! use rampart_client::HttpAdapter;
//!
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let rampart = Rampart::new(RampartConfig::default())?;
//! let client = rampart.json_client::<serde_json::Value>("https://api.example.com/items")?;
//!
//! match client.get(&[]).await {
//!     result if result.is_success() => println!("{:?}", result.content()),
//!     result => eprintln!("{:?}: {:?}", result.error_category(), result.message()),
//! }
//! # Ok(()) }
//! ```

mod config;
mod error;
mod rampart;

pub use config::RampartConfig;
pub use error::RampartError;
pub use rampart::{Rampart, SecuredClient};

// Re-export component types callers need at the facade surface.
pub use rampart_client::{
    CacheConfig, CacheKeyHeaderFilter, ErrorCategory, HttpAdapter, HttpMethod, HttpResult,
    RetryConfig, TransportConfig,
};
pub use rampart_validation::{
    CharacterClass, PatternCatalog, SecurityViolation, ValidationConfig, ViolationKind,
};
