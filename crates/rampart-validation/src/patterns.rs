//! The attack-pattern catalogue.
//!
//! Patterns are deterministic indicators (no regexes): a literal string, a
//! case-folded string, or a raw byte sequence, each bound to the HTTP
//! component it applies to. The catalogue is built once — either from the
//! compiled-in set or from external JSON records — and shared immutably by
//! every pipeline; lookup never reloads.
//!
//! ## Determinism
//!
//! Entries are sorted by id and deduplicated by `(applies_to, payload)` at
//! load, keeping the lowest id. The matching stage scans in id order, so for
//! a fixed catalogue and input the reported pattern id is identical across
//! runs, threads, and platforms.
//!
//! ## Record format
//!
//! External catalogues are JSON arrays of records:
//!
//! ```json
//! [{"id": 2101, "family": "owasp", "match_kind": "case_insensitive",
//!   "payload_bytes": [60, 115, 99, 114, 105, 112, 116],
//!   "applies_to": "parameter"}]
//! ```
//!
//! Unknown fields are ignored; a record with an unknown `match_kind`,
//! `family` or `applies_to` is dropped with a warning.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::stage::ComponentKind;

/// Attack class a pattern belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PatternFamily {
    /// Indicator tied to a published CVE class.
    Cve,
    /// OWASP Top 10 style injection indicator.
    Owasp,
    /// Protocol-level abuse (request smuggling, response splitting).
    ProtocolSpecific,
}

/// How a pattern's payload is compared against the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    /// Raw substring comparison.
    Literal,
    /// Substring comparison over the lowercase-folded input.
    CaseInsensitive,
    /// Subsequence search over the post-decoded byte view.
    ByteSequence,
}

/// One immutable catalogue entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttackPattern {
    pub id: u32,
    pub family: PatternFamily,
    pub match_kind: MatchKind,
    pub payload: Vec<u8>,
    pub applies_to: ComponentKind,
}

impl AttackPattern {
    fn new(
        id: u32,
        family: PatternFamily,
        match_kind: MatchKind,
        payload: &[u8],
        applies_to: ComponentKind,
    ) -> Self {
        Self {
            id,
            family,
            match_kind,
            payload: payload.to_vec(),
            applies_to,
        }
    }
}

/// Raw record shape accepted from external catalogue files. Unknown JSON
/// fields are ignored by serde's default behavior; enum-valued fields are
/// kept as strings here so unknown values degrade to a warning instead of
/// failing the whole load.
#[derive(Debug, Deserialize)]
struct RawRecord {
    id: u32,
    family: String,
    match_kind: String,
    payload_bytes: Vec<u8>,
    applies_to: String,
}

/// A sorted, deduplicated set of attack patterns.
#[derive(Debug, Clone)]
pub struct PatternCatalog {
    patterns: Vec<AttackPattern>,
}

impl PatternCatalog {
    /// The compiled-in catalogue.
    ///
    /// Entries are grouped by attack family; ids are namespaced per family
    /// (1xxx cve, 2xxx owasp, 3xxx protocol) and stable across releases so
    /// violation records stay comparable over time.
    pub fn builtin() -> Self {
        use ComponentKind::*;
        use MatchKind::*;
        use PatternFamily::*;

        let patterns = vec![
            // ============================================================
            // SENSITIVE FILE PROBES
            // Survive path normalization (no dot-segments involved).
            // ============================================================
            AttackPattern::new(1001, Cve, CaseInsensitive, b"/etc/passwd", Path),
            AttackPattern::new(1002, Cve, CaseInsensitive, b"/etc/shadow", Path),
            AttackPattern::new(1003, Cve, CaseInsensitive, b"/proc/self", Path),
            AttackPattern::new(1004, Cve, CaseInsensitive, b"web-inf", Path),
            AttackPattern::new(1005, Cve, CaseInsensitive, b".git/", Path),
            AttackPattern::new(1006, Cve, CaseInsensitive, b".htaccess", Path),
            AttackPattern::new(1007, Cve, CaseInsensitive, b"boot.ini", Path),

            // ============================================================
            // INJECTION INDICATORS (OWASP A03)
            // ============================================================
            AttackPattern::new(2001, Owasp, CaseInsensitive, b"<script", Parameter),
            AttackPattern::new(2002, Owasp, CaseInsensitive, b"javascript:", Parameter),
            AttackPattern::new(2003, Owasp, CaseInsensitive, b"' or 1=1", Parameter),
            AttackPattern::new(2004, Owasp, CaseInsensitive, b"union select", Parameter),
            AttackPattern::new(2005, Owasp, CaseInsensitive, b"../", Parameter),
            AttackPattern::new(2006, Owasp, Literal, b"$(", Parameter),
            AttackPattern::new(2007, Owasp, CaseInsensitive, b"etc/passwd", Parameter),
            AttackPattern::new(2008, Owasp, CaseInsensitive, b"<script", HeaderValue),
            AttackPattern::new(2009, Owasp, CaseInsensitive, b"javascript:", HeaderValue),

            // ============================================================
            // PROTOCOL ABUSE
            // Byte-level indicators over the post-decoded view; the
            // character stage catches most of these first, the catalogue
            // keeps them attributable when pipelines are customized.
            // ============================================================
            AttackPattern::new(3001, ProtocolSpecific, ByteSequence, &[0x0D, 0x0A], HeaderValue),
            AttackPattern::new(3002, ProtocolSpecific, ByteSequence, &[0x0D, 0x0A], Path),
            AttackPattern::new(3003, ProtocolSpecific, ByteSequence, &[0x0D, 0x0A], Parameter),
        ];

        Self::from_patterns(patterns)
    }

    /// An empty catalogue, for pipelines that only need structural checks.
    pub fn empty() -> Self {
        Self { patterns: Vec::new() }
    }

    /// Build a catalogue from already-typed entries, sorting and
    /// deduplicating by `(applies_to, payload)` with the lowest id winning.
    pub fn from_patterns(mut patterns: Vec<AttackPattern>) -> Self {
        patterns.sort_by_key(|p| p.id);
        let mut seen: std::collections::HashSet<(ComponentKind, Vec<u8>)> =
            std::collections::HashSet::new();
        patterns.retain(|p| seen.insert((p.applies_to, p.payload.clone())));
        Self { patterns }
    }

    /// Parse an external JSON catalogue. Records with unknown enum values
    /// are dropped with a warning; a syntactically invalid document is an
    /// error.
    pub fn from_records(json: &str) -> Result<Self, serde_json::Error> {
        let raw: Vec<RawRecord> = serde_json::from_str(json)?;
        let mut patterns = Vec::with_capacity(raw.len());
        for record in raw {
            let Some(family) = parse_family(&record.family) else {
                warn!(id = record.id, family = %record.family, "dropping pattern with unknown family");
                continue;
            };
            let Some(match_kind) = parse_match_kind(&record.match_kind) else {
                warn!(id = record.id, match_kind = %record.match_kind, "dropping pattern with unknown match kind");
                continue;
            };
            let Some(applies_to) = parse_component(&record.applies_to) else {
                warn!(id = record.id, applies_to = %record.applies_to, "dropping pattern with unknown component");
                continue;
            };
            if match_kind == MatchKind::CaseInsensitive
                && std::str::from_utf8(&record.payload_bytes).is_err()
            {
                warn!(id = record.id, "dropping case-insensitive pattern with non-UTF-8 payload");
                continue;
            }
            patterns.push(AttackPattern {
                id: record.id,
                family,
                match_kind,
                payload: record.payload_bytes,
                applies_to,
            });
        }
        Ok(Self::from_patterns(patterns))
    }

    /// Entries applying to one component, in id order.
    pub fn patterns_for(&self, component: ComponentKind) -> Vec<&AttackPattern> {
        self.patterns
            .iter()
            .filter(|p| p.applies_to == component)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

fn parse_family(s: &str) -> Option<PatternFamily> {
    match s {
        "cve" => Some(PatternFamily::Cve),
        "owasp" => Some(PatternFamily::Owasp),
        "protocol-specific" => Some(PatternFamily::ProtocolSpecific),
        _ => None,
    }
}

fn parse_match_kind(s: &str) -> Option<MatchKind> {
    match s {
        "literal" => Some(MatchKind::Literal),
        "case_insensitive" => Some(MatchKind::CaseInsensitive),
        "byte_sequence" => Some(MatchKind::ByteSequence),
        _ => None,
    }
}

fn parse_component(s: &str) -> Option<ComponentKind> {
    match s {
        "path" => Some(ComponentKind::Path),
        "parameter" => Some(ComponentKind::Parameter),
        "header_value" => Some(ComponentKind::HeaderValue),
        "header_name" => Some(ComponentKind::HeaderName),
        _ => None,
    }
}
