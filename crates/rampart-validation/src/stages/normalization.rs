//! Unicode and path normalization.
//!
//! Two modes share this stage:
//!
//! - [`NormalizationMode::Path`] applies Unicode NFC and then collapses path
//!   segments (`a//b` → `a/b`, `a/./b` → `a/b`, `a/b/../c` → `a/c`). A
//!   segment walk that would escape the root is a [`ViolationKind::PathTraversal`]
//!   violation. Absolute URLs are handled by splitting off the
//!   `scheme://authority` prefix and any `?query`/`#fragment` suffix so only
//!   the path portion is collapsed.
//! - [`NormalizationMode::Text`] applies NFC only. Used for parameter values
//!   and header values where `/` has no structural meaning.
//!
//! NFC matters because `café` can arrive as `caf\u{e9}` or `cafe\u{301}`;
//! pattern matching and length limits must see one canonical form.

use std::sync::Arc;

use unicode_normalization::UnicodeNormalization;

use crate::config::ValidationConfig;
use crate::stage::ValidationStage;
use crate::violation::{SecurityViolation, ViolationKind};

const STAGE_NAME: &str = "NormalizationStage";

/// Whether path-segment collapsing applies on top of NFC.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NormalizationMode {
    /// NFC plus path canonicalization.
    Path,
    /// NFC only.
    Text,
}

/// Unicode NFC + path canonicalization stage.
pub struct NormalizationStage {
    config: Arc<ValidationConfig>,
    mode: NormalizationMode,
}

impl NormalizationStage {
    pub fn new(config: Arc<ValidationConfig>, mode: NormalizationMode) -> Self {
        Self { config, mode }
    }

    fn normalize_path(&self, value: &str) -> Result<String, SecurityViolation> {
        let mut input = value.to_string();

        if input.contains('\\') {
            if self.config.allow_backslash_separator {
                input = input.replace('\\', "/");
            } else {
                return Err(SecurityViolation::new(
                    ViolationKind::InvalidCharacter,
                    STAGE_NAME,
                    value,
                    "backslash path separator",
                ));
            }
        }

        // Absolute URL: leave scheme://authority and ?query/#fragment alone,
        // collapse only the path portion between them.
        if let Some((prefix, rest)) = split_scheme_authority(&input) {
            let (path, suffix) = split_query_fragment(rest);
            let collapsed = collapse_segments(path, value)?;
            return Ok(format!("{}{}{}", prefix, collapsed, suffix));
        }

        let (path, suffix) = split_query_fragment(&input);
        let collapsed = collapse_segments(path, value)?;
        Ok(format!("{}{}", collapsed, suffix))
    }
}

impl ValidationStage for NormalizationStage {
    fn name(&self) -> &'static str {
        STAGE_NAME
    }

    fn validate_value(&self, value: &str) -> Result<String, SecurityViolation> {
        let composed: String = if self.config.normalize_unicode {
            value.nfc().collect()
        } else {
            value.to_string()
        };

        match self.mode {
            NormalizationMode::Text => Ok(composed),
            NormalizationMode::Path => self.normalize_path(&composed),
        }
    }
}

/// Split `scheme://authority` off an absolute URL, returning the prefix
/// (up to and including the authority) and the remainder starting at the
/// path. Returns `None` for bare paths.
fn split_scheme_authority(input: &str) -> Option<(&str, &str)> {
    let scheme_end = input.find("://")?;
    let scheme = &input[..scheme_end];
    if scheme.is_empty() || !scheme.chars().next().is_some_and(|c| c.is_ascii_alphabetic()) {
        return None;
    }
    if !scheme
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
    {
        return None;
    }
    let after = &input[scheme_end + 3..];
    match after.find(['/', '?', '#']) {
        Some(pos) => Some((&input[..scheme_end + 3 + pos], &after[pos..])),
        None => Some((input, "")),
    }
}

/// Split off `?query` / `#fragment`; both pass through untouched.
fn split_query_fragment(input: &str) -> (&str, &str) {
    match input.find(['?', '#']) {
        Some(pos) => (&input[..pos], &input[pos..]),
        None => (input, ""),
    }
}

/// Collapse `.`, `..` and repeated separators in a path.
///
/// `original` is the pre-normalization value, used only for violation
/// snippets so the caller sees what was actually submitted.
fn collapse_segments(path: &str, original: &str) -> Result<String, SecurityViolation> {
    if path.is_empty() {
        return Ok(String::new());
    }

    let absolute = path.starts_with('/');
    let trailing_slash = path.len() > 1 && path.ends_with('/');

    let mut segments: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            // Repeated separators and leading/trailing slashes produce
            // empty segments; "." segments are no-ops.
            "" | "." => {}
            ".." => {
                if segments.pop().is_none() {
                    return Err(SecurityViolation::new(
                        ViolationKind::PathTraversal,
                        STAGE_NAME,
                        original,
                        "path segment walk escaped the root",
                    ));
                }
            }
            s => segments.push(s),
        }
    }

    let joined = segments.join("/");
    let mut out = String::with_capacity(path.len());
    if absolute {
        out.push('/');
    }
    out.push_str(&joined);
    if trailing_slash && !segments.is_empty() {
        out.push('/');
    }
    Ok(out)
}
