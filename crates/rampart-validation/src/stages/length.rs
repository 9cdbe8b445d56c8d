//! Per-component length limits.
//!
//! Lengths are measured in UTF-16 code units, not bytes, so limits line up
//! with what downstream JVM- and JavaScript-based services will count. The
//! stage runs after decoding and normalization, which means percent-encoded
//! expansions are counted in their decoded form.

use std::sync::Arc;

use crate::config::ValidationConfig;
use crate::stage::{ComponentKind, ValidationStage};
use crate::violation::{SecurityViolation, ViolationKind};

const STAGE_NAME: &str = "LengthValidationStage";

/// Rejects values longer than the configured per-component limit.
pub struct LengthValidationStage {
    config: Arc<ValidationConfig>,
    component: ComponentKind,
}

impl LengthValidationStage {
    pub fn new(config: Arc<ValidationConfig>, component: ComponentKind) -> Self {
        Self { config, component }
    }

    fn limit(&self) -> usize {
        match self.component {
            ComponentKind::Path => self.config.max_path_length,
            ComponentKind::Parameter => self.config.max_parameter_length,
            ComponentKind::HeaderName => self.config.max_header_name_length,
            ComponentKind::HeaderValue => self.config.max_header_value_length,
        }
    }
}

impl ValidationStage for LengthValidationStage {
    fn name(&self) -> &'static str {
        STAGE_NAME
    }

    fn validate_value(&self, value: &str) -> Result<String, SecurityViolation> {
        let length = value.encode_utf16().count();
        let limit = self.limit();
        if length > limit {
            return Err(SecurityViolation::new(
                ViolationKind::LengthExceeded,
                STAGE_NAME,
                value,
                format!(
                    "{} length {} exceeds limit {} (UTF-16 code units)",
                    self.component.label(),
                    length,
                    limit
                ),
            ));
        }
        Ok(value.to_string())
    }
}
