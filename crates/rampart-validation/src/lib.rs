//! # Rampart Validation - Fail-Secure HTTP Component Validation
//!
//! Composable validation pipelines that inspect HTTP protocol components
//! (URL paths, full URLs, query parameters, header names and values) for
//! injection, traversal, and encoding-based attacks before they reach
//! application code.
//!
//! ## Threat Model
//!
//! | Threat | Example payload | Defense |
//! |--------|-----------------|---------|
//! | Path traversal | `../../etc/passwd` | Segment-walk canonicalization |
//! | Encoded traversal | `%2e%2e%2f` | Decode before normalizing |
//! | Double encoding | `%252e%252e%252f` | Residual-escape detection |
//! | Overlong UTF-8 | `%c0%af` | Minimal-length byte validation |
//! | NUL injection | `file%00.jpg` | Byte scan before any use |
//! | Header injection | `v\r\nSet-Cookie:` | Control-character rejection |
//! | Catalogued payloads | `union select`, `<script` | Deterministic pattern scan |
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                      ValidationPipeline                          │
//! │                                                                  │
//! │  untrusted ──▶ Decoding ──▶ Normalization ──▶ Character ──▶      │
//! │     input       stage         stage            stage             │
//! │                                                                  │
//! │            ──▶ Length ──▶ PatternMatching ──▶ sanitized value    │
//! │                 stage        stage                               │
//! │                                                                  │
//! │        any stage ──▶ SecurityViolation (pipeline stops)          │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The contract is fail-secure: the first violation terminates the
//! pipeline, nothing downstream observes the rejected input, and violations
//! are never silently recovered.
//!
//! ## Usage
//!
//! ```rust
//! use std::sync::Arc;
//! use rampart_validation::{PatternCatalog, ValidationConfig, ValidationPipeline};
//!
//! let config = Arc::new(ValidationConfig::default());
//! let catalog = Arc::new(PatternCatalog::builtin());
//!
//! let paths = ValidationPipeline::url_path(Arc::clone(&config), Arc::clone(&catalog));
//! assert!(paths.validate(Some("/api/users".into())).is_ok());
//! assert!(paths.validate(Some("../../etc/passwd".into())).is_err());
//! ```
//!
//! ## Thread Safety
//!
//! Pipelines, stages, configurations and catalogues are immutable after
//! construction and `Send + Sync`; share them freely behind `Arc`.

mod config;
mod patterns;
mod pipeline;
mod stage;
mod stages;
mod violation;

pub use config::{CharacterClass, HeaderNameGrammar, ValidationConfig};
pub use patterns::{AttackPattern, MatchKind, PatternCatalog, PatternFamily};
pub use pipeline::ValidationPipeline;
pub use stage::{ComponentKind, ValidationStage};
pub use stages::{
    CharacterValidationStage, DecodingStage, LengthValidationStage, NormalizationMode,
    NormalizationStage, PatternMatchingStage,
};
pub use violation::{SecurityViolation, ViolationKind};

/// Convenience alias used throughout the validation crate.
pub type ValidationResult = Result<Option<String>, SecurityViolation>;
