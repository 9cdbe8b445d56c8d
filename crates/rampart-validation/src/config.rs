//! Configuration types for validation pipelines.

use serde::{Deserialize, Serialize};

/// Character class permitted in non-header-name components after decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CharacterClass {
    /// Printable ASCII only; any codepoint above U+007E is rejected.
    PrintableAscii,

    /// Any non-control Unicode codepoint. The default.
    PrintableUtf8,

    /// Unreserved URL characters plus the path separator:
    /// `[A-Za-z0-9._~/-]`. For callers that want allowlist semantics.
    Strict,
}

/// Grammar accepted for HTTP header names.
///
/// The restricted subset rejects legitimate-but-exotic token characters
/// (`!#$%&'*+.^_|~`) that rarely appear in real header names and frequently
/// appear in injection payloads. Widening to the full RFC 7230 token set is
/// a policy decision recorded here, not guessed at validation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HeaderNameGrammar {
    /// `[A-Za-z0-9-]` only. The default.
    Restricted,

    /// The full RFC 7230 token grammar.
    Rfc7230Token,
}

/// Immutable configuration shared by the stages of one pipeline.
///
/// Constructed once, wrapped in an `Arc`, and shared by reference across
/// threads; stages never mutate it.
///
/// # Defaults
///
/// The defaults are tuned for a typical REST API surface:
///
/// - Component limits sized for real-world URLs and headers (4096-character
///   paths, 8192-character header values).
/// - Percent-encoding allowed, Unicode NFC applied.
/// - Backslash separators and non-standard `%uXXXX` escapes rejected.
///
/// # Example
///
/// ```rust
/// use rampart_validation::{CharacterClass, ValidationConfig};
///
/// let strict = ValidationConfig::default()
///     .with_max_path_length(1024)
///     .with_character_class(CharacterClass::PrintableAscii);
/// assert_eq!(strict.max_path_length, 1024);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationConfig {
    /// Maximum URL path length in UTF-16 code units.
    pub max_path_length: usize,

    /// Maximum query parameter value length in UTF-16 code units.
    pub max_parameter_length: usize,

    /// Maximum header name length in UTF-16 code units.
    pub max_header_name_length: usize,

    /// Maximum header value length in UTF-16 code units.
    pub max_header_value_length: usize,

    /// Whether percent-encoded input is accepted at all. When false, any
    /// `%` escape is rejected as an invalid character.
    pub allow_percent_encoding: bool,

    /// Whether Unicode NFC normalization is applied.
    pub normalize_unicode: bool,

    /// Cap on recursive decode passes when probing for layered encoding.
    pub decode_iterations_max: usize,

    /// Character class enforced for paths and parameter values.
    pub allowed_character_class: CharacterClass,

    /// Whether `\` is accepted as a path separator (then normalized to `/`).
    pub allow_backslash_separator: bool,

    /// Whether non-standard `%uXXXX` escapes are decoded instead of rejected.
    pub allow_unicode_escapes: bool,

    /// Grammar enforced for header names.
    pub header_name_grammar: HeaderNameGrammar,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            max_path_length: 4096,
            max_parameter_length: 2048,
            max_header_name_length: 256,
            max_header_value_length: 8192,
            allow_percent_encoding: true,
            normalize_unicode: true,
            decode_iterations_max: 3,
            allowed_character_class: CharacterClass::PrintableUtf8,
            allow_backslash_separator: false,
            allow_unicode_escapes: false,
            header_name_grammar: HeaderNameGrammar::Restricted,
        }
    }
}

impl ValidationConfig {
    /// Set the maximum path length.
    pub fn with_max_path_length(mut self, limit: usize) -> Self {
        self.max_path_length = limit;
        self
    }

    /// Set the maximum parameter value length.
    pub fn with_max_parameter_length(mut self, limit: usize) -> Self {
        self.max_parameter_length = limit;
        self
    }

    /// Set the maximum header name length.
    pub fn with_max_header_name_length(mut self, limit: usize) -> Self {
        self.max_header_name_length = limit;
        self
    }

    /// Set the maximum header value length.
    pub fn with_max_header_value_length(mut self, limit: usize) -> Self {
        self.max_header_value_length = limit;
        self
    }

    /// Allow or reject percent-encoded input.
    pub fn with_percent_encoding(mut self, allow: bool) -> Self {
        self.allow_percent_encoding = allow;
        self
    }

    /// Enable or disable Unicode NFC normalization.
    pub fn with_unicode_normalization(mut self, normalize: bool) -> Self {
        self.normalize_unicode = normalize;
        self
    }

    /// Cap the number of decode passes. Clamped to at least 1.
    pub fn with_decode_iterations_max(mut self, max: usize) -> Self {
        self.decode_iterations_max = max.max(1);
        self
    }

    /// Set the enforced character class.
    pub fn with_character_class(mut self, class: CharacterClass) -> Self {
        self.allowed_character_class = class;
        self
    }

    /// Accept `\` as a path separator.
    pub fn with_backslash_separator(mut self, allow: bool) -> Self {
        self.allow_backslash_separator = allow;
        self
    }

    /// Accept non-standard `%uXXXX` escapes.
    pub fn with_unicode_escapes(mut self, allow: bool) -> Self {
        self.allow_unicode_escapes = allow;
        self
    }

    /// Set the header name grammar.
    pub fn with_header_name_grammar(mut self, grammar: HeaderNameGrammar) -> Self {
        self.header_name_grammar = grammar;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ValidationConfig::default();
        assert_eq!(config.max_path_length, 4096);
        assert!(config.allow_percent_encoding);
        assert!(config.normalize_unicode);
        assert!(!config.allow_backslash_separator);
        assert_eq!(config.header_name_grammar, HeaderNameGrammar::Restricted);
    }

    #[test]
    fn test_builder_methods() {
        let config = ValidationConfig::default()
            .with_max_parameter_length(100)
            .with_percent_encoding(false)
            .with_character_class(CharacterClass::Strict);
        assert_eq!(config.max_parameter_length, 100);
        assert!(!config.allow_percent_encoding);
        assert_eq!(config.allowed_character_class, CharacterClass::Strict);
    }

    #[test]
    fn test_decode_iterations_clamped() {
        let config = ValidationConfig::default().with_decode_iterations_max(0);
        assert_eq!(config.decode_iterations_max, 1);
    }

    #[test]
    fn test_config_serialization() {
        let config = ValidationConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let parsed: ValidationConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, config);
    }
}
