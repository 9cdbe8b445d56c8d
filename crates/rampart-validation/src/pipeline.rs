//! Stage composition into per-component pipelines.
//!
//! A pipeline is an ordered list of stages; the first violation wins and no
//! later stage observes the input. Four prewired compositions cover the
//! HTTP components:
//!
//! | Pipeline | Stages |
//! |----------|--------|
//! | `url_path` | Decoding → Normalization(Path) → Character → Length → Pattern |
//! | `parameter` | Decoding → Normalization(Text) → Character → Length → Pattern |
//! | `header_value` | Decoding → Normalization(Text) → Character → Length → Pattern |
//! | `header_name` | Character → Length → Pattern |
//!
//! Header names are never percent-encoded on the wire, so their pipeline
//! skips the decoding and normalization stages; the restricted name grammar
//! does the heavy lifting there.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::config::ValidationConfig;
use crate::patterns::PatternCatalog;
use crate::stage::{ComponentKind, ValidationStage};
use crate::stages::{
    CharacterValidationStage, DecodingStage, LengthValidationStage, NormalizationMode,
    NormalizationStage, PatternMatchingStage,
};
use crate::violation::SecurityViolation;

/// An ordered, immutable sequence of validation stages for one component.
///
/// Pipelines are `Send + Sync` and freely shared across threads; validating
/// borrows the pipeline immutably.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use rampart_validation::{PatternCatalog, ValidationConfig, ValidationPipeline, ViolationKind};
///
/// let pipeline = ValidationPipeline::url_path(
///     Arc::new(ValidationConfig::default()),
///     Arc::new(PatternCatalog::builtin()),
/// );
///
/// let ok = pipeline.validate(Some("/api//users/./42".to_string())).unwrap();
/// assert_eq!(ok.as_deref(), Some("/api/users/42"));
///
/// let err = pipeline.validate(Some("../../etc/passwd".to_string())).unwrap_err();
/// assert_eq!(err.kind(), ViolationKind::PathTraversal);
/// ```
pub struct ValidationPipeline {
    component: ComponentKind,
    stages: Vec<Box<dyn ValidationStage>>,
}

impl ValidationPipeline {
    /// The universal URL entry point: validates bare paths and absolute
    /// URLs with scheme and host.
    pub fn url_path(config: Arc<ValidationConfig>, catalog: Arc<PatternCatalog>) -> Self {
        Self {
            component: ComponentKind::Path,
            stages: vec![
                Box::new(DecodingStage::new(Arc::clone(&config))),
                Box::new(NormalizationStage::new(Arc::clone(&config), NormalizationMode::Path)),
                Box::new(CharacterValidationStage::new(Arc::clone(&config), ComponentKind::Path)),
                Box::new(LengthValidationStage::new(config, ComponentKind::Path)),
                Box::new(PatternMatchingStage::new(catalog, ComponentKind::Path)),
            ],
        }
    }

    /// Pipeline for query parameter values.
    pub fn parameter(config: Arc<ValidationConfig>, catalog: Arc<PatternCatalog>) -> Self {
        Self {
            component: ComponentKind::Parameter,
            stages: vec![
                Box::new(DecodingStage::new(Arc::clone(&config))),
                Box::new(NormalizationStage::new(Arc::clone(&config), NormalizationMode::Text)),
                Box::new(CharacterValidationStage::new(Arc::clone(&config), ComponentKind::Parameter)),
                Box::new(LengthValidationStage::new(config, ComponentKind::Parameter)),
                Box::new(PatternMatchingStage::new(catalog, ComponentKind::Parameter)),
            ],
        }
    }

    /// Pipeline for header values.
    pub fn header_value(config: Arc<ValidationConfig>, catalog: Arc<PatternCatalog>) -> Self {
        Self {
            component: ComponentKind::HeaderValue,
            stages: vec![
                Box::new(DecodingStage::new(Arc::clone(&config))),
                Box::new(NormalizationStage::new(Arc::clone(&config), NormalizationMode::Text)),
                Box::new(CharacterValidationStage::new(Arc::clone(&config), ComponentKind::HeaderValue)),
                Box::new(LengthValidationStage::new(config, ComponentKind::HeaderValue)),
                Box::new(PatternMatchingStage::new(catalog, ComponentKind::HeaderValue)),
            ],
        }
    }

    /// Pipeline for header names.
    pub fn header_name(config: Arc<ValidationConfig>, catalog: Arc<PatternCatalog>) -> Self {
        Self {
            component: ComponentKind::HeaderName,
            stages: vec![
                Box::new(CharacterValidationStage::new(Arc::clone(&config), ComponentKind::HeaderName)),
                Box::new(LengthValidationStage::new(config, ComponentKind::HeaderName)),
                Box::new(PatternMatchingStage::new(catalog, ComponentKind::HeaderName)),
            ],
        }
    }

    /// A custom stage composition for one component.
    pub fn custom(component: ComponentKind, stages: Vec<Box<dyn ValidationStage>>) -> Self {
        Self { component, stages }
    }

    /// The component this pipeline inspects.
    pub fn component(&self) -> ComponentKind {
        self.component
    }

    /// Run the input through every stage in order.
    ///
    /// `None` propagates as `Ok(None)` without invoking any stage. The
    /// first violation terminates the pipeline; the sanitized value of the
    /// last stage is returned otherwise.
    pub fn validate(&self, input: Option<String>) -> crate::ValidationResult {
        let mut current = input;
        for stage in &self.stages {
            match stage.validate(current) {
                Ok(value) => {
                    debug!(
                        component = self.component.label(),
                        stage = stage.name(),
                        "stage passed"
                    );
                    current = value;
                }
                Err(violation) => {
                    warn!(
                        component = self.component.label(),
                        stage = violation.stage(),
                        kind = %violation.kind(),
                        "validation rejected input"
                    );
                    return Err(violation);
                }
            }
        }
        Ok(current)
    }

    /// Convenience wrapper over [`validate`](Self::validate) for borrowed
    /// input.
    pub fn validate_str(&self, input: &str) -> Result<String, SecurityViolation> {
        // A present input always yields a present output.
        Ok(self
            .validate(Some(input.to_string()))?
            .unwrap_or_default())
    }
}
