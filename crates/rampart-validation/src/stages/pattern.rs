//! Deterministic matching against the attack-pattern catalogue.
//!
//! The stage compiles its view of the catalogue once at construction:
//! entries filtered by component, case-insensitive payloads pre-folded.
//! Matching scans in id order and reports the first (lowest-id) hit, so the
//! violation id for a given catalogue and input never varies across runs or
//! threads.

use std::sync::Arc;

use crate::patterns::{MatchKind, PatternCatalog};
use crate::stage::{ComponentKind, ValidationStage};
use crate::violation::{SecurityViolation, ViolationKind};

const STAGE_NAME: &str = "PatternMatchingStage";

enum Matcher {
    /// Raw subsequence over the input bytes (literal and byte_sequence).
    Bytes(Vec<u8>),
    /// Substring over the lowercase-folded input.
    Folded(String),
}

struct CompiledPattern {
    id: u32,
    matcher: Matcher,
}

/// Catalogue-driven detection stage. Runs last in every pipeline, over the
/// decoded and normalized value.
pub struct PatternMatchingStage {
    compiled: Vec<CompiledPattern>,
}

impl PatternMatchingStage {
    /// Compile the catalogue entries for one component. The construction
    /// cost is paid once per pipeline and amortized across all requests.
    pub fn new(catalog: Arc<PatternCatalog>, component: ComponentKind) -> Self {
        let compiled = catalog
            .patterns_for(component)
            .into_iter()
            .filter_map(|p| {
                let matcher = match p.match_kind {
                    MatchKind::Literal | MatchKind::ByteSequence => {
                        Matcher::Bytes(p.payload.clone())
                    }
                    MatchKind::CaseInsensitive => match std::str::from_utf8(&p.payload) {
                        Ok(text) => Matcher::Folded(text.to_lowercase()),
                        // The catalogue loader already warned and dropped
                        // these; guard here for hand-built catalogues.
                        Err(_) => return None,
                    },
                };
                Some(CompiledPattern { id: p.id, matcher })
            })
            .collect();
        Self { compiled }
    }
}

impl ValidationStage for PatternMatchingStage {
    fn name(&self) -> &'static str {
        STAGE_NAME
    }

    fn validate_value(&self, value: &str) -> Result<String, SecurityViolation> {
        let folded = value.to_lowercase();
        let bytes = value.as_bytes();

        for pattern in &self.compiled {
            let hit = match &pattern.matcher {
                Matcher::Bytes(needle) => contains_bytes(bytes, needle),
                Matcher::Folded(needle) => folded.contains(needle.as_str()),
            };
            if hit {
                return Err(SecurityViolation::new(
                    ViolationKind::SuspiciousPattern(pattern.id),
                    STAGE_NAME,
                    value,
                    format!("matched attack pattern #{}", pattern.id),
                ));
            }
        }

        Ok(value.to_string())
    }
}

fn contains_bytes(haystack: &[u8], needle: &[u8]) -> bool {
    if needle.is_empty() || needle.len() > haystack.len() {
        return false;
    }
    haystack.windows(needle.len()).any(|window| window == needle)
}
