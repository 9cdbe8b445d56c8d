//! Control-character and character-class validation.
//!
//! Runs after decoding, so `%0d%0a` smuggled into a header value has already
//! been turned back into raw CR/LF by the time this stage sees it. Header
//! names get their own grammar check on top of the control-character scan.

use std::sync::Arc;

use crate::config::{CharacterClass, HeaderNameGrammar, ValidationConfig};
use crate::stage::{ComponentKind, ValidationStage};
use crate::violation::{SecurityViolation, ViolationKind};

const STAGE_NAME: &str = "CharacterValidationStage";

/// Rejects control characters and characters outside the component's
/// allowed class.
pub struct CharacterValidationStage {
    config: Arc<ValidationConfig>,
    component: ComponentKind,
}

impl CharacterValidationStage {
    pub fn new(config: Arc<ValidationConfig>, component: ComponentKind) -> Self {
        Self { config, component }
    }

    fn check_header_name_char(&self, c: char) -> bool {
        match self.config.header_name_grammar {
            HeaderNameGrammar::Restricted => c.is_ascii_alphanumeric() || c == '-',
            HeaderNameGrammar::Rfc7230Token => is_rfc7230_token_char(c),
        }
    }

    fn check_class_char(&self, c: char) -> bool {
        match self.config.allowed_character_class {
            CharacterClass::PrintableAscii => c.is_ascii() && !c.is_ascii_control(),
            CharacterClass::PrintableUtf8 => true,
            CharacterClass::Strict => {
                c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '~' | '/' | '-')
            }
        }
    }
}

impl ValidationStage for CharacterValidationStage {
    fn name(&self) -> &'static str {
        STAGE_NAME
    }

    fn validate_value(&self, value: &str) -> Result<String, SecurityViolation> {
        for (pos, c) in value.char_indices() {
            // NUL keeps its own tag even in pipelines without a decoding
            // stage in front of this one.
            if c == '\0' {
                return Err(SecurityViolation::new(
                    ViolationKind::NullByte,
                    STAGE_NAME,
                    value,
                    format!("NUL character at byte {}", pos),
                ));
            }
            if is_control(c) {
                return Err(SecurityViolation::new(
                    ViolationKind::ControlCharacter,
                    STAGE_NAME,
                    value,
                    format!("control character U+{:04X} at byte {}", c as u32, pos),
                ));
            }

            let allowed = match self.component {
                ComponentKind::HeaderName => self.check_header_name_char(c),
                _ => self.check_class_char(c),
            };
            if !allowed {
                return Err(SecurityViolation::new(
                    ViolationKind::InvalidCharacter,
                    STAGE_NAME,
                    value,
                    format!(
                        "character U+{:04X} not allowed in {}",
                        c as u32,
                        self.component.label()
                    ),
                ));
            }
        }
        Ok(value.to_string())
    }
}

/// C0 controls, DEL, and C1 controls (U+0080..U+009F).
fn is_control(c: char) -> bool {
    let cp = c as u32;
    cp < 0x20 || cp == 0x7F || (0x80..=0x9F).contains(&cp)
}

/// RFC 7230 `tchar`.
fn is_rfc7230_token_char(c: char) -> bool {
    c.is_ascii_alphanumeric()
        || matches!(
            c,
            '!' | '#' | '$' | '%' | '&' | '\'' | '*' | '+' | '-' | '.' | '^' | '_' | '`' | '|' | '~'
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stage(component: ComponentKind) -> CharacterValidationStage {
        CharacterValidationStage::new(Arc::new(ValidationConfig::default()), component)
    }

    #[test]
    fn test_clean_path_passes() {
        let s = stage(ComponentKind::Path);
        assert_eq!(s.validate_value("/api/users/42").unwrap(), "/api/users/42");
    }

    #[test]
    fn test_crlf_rejected() {
        let s = stage(ComponentKind::HeaderValue);
        let err = s.validate_value("value\r\nSet-Cookie: x=1").unwrap_err();
        assert_eq!(err.kind(), ViolationKind::ControlCharacter);
    }

    #[test]
    fn test_c0_controls_rejected() {
        let s = stage(ComponentKind::Parameter);
        for c in ['\x01', '\x1F', '\t', '\n'] {
            let err = s.validate_value(&format!("a{}b", c)).unwrap_err();
            assert_eq!(err.kind(), ViolationKind::ControlCharacter, "char: {:?}", c);
        }
    }

    #[test]
    fn test_nul_keeps_its_own_tag() {
        // Header names skip the decoding stage, so this stage is the one
        // that must report NUL as NullByte rather than ControlCharacter.
        for component in [ComponentKind::HeaderName, ComponentKind::Parameter] {
            let err = stage(component).validate_value("a\0b").unwrap_err();
            assert_eq!(err.kind(), ViolationKind::NullByte);
        }
    }

    #[test]
    fn test_del_and_c1_controls_rejected() {
        let s = stage(ComponentKind::Parameter);
        for c in ['\u{7F}', '\u{80}', '\u{9F}'] {
            let err = s.validate_value(&format!("a{}b", c)).unwrap_err();
            assert_eq!(err.kind(), ViolationKind::ControlCharacter, "char: {:?}", c);
        }
    }

    #[test]
    fn test_u00a0_not_a_control() {
        // U+00A0 no-break space is outside the C1 range.
        let s = stage(ComponentKind::Parameter);
        assert!(s.validate_value("a\u{A0}b").is_ok());
    }

    #[test]
    fn test_header_name_restricted_grammar() {
        let s = stage(ComponentKind::HeaderName);
        assert!(s.validate_value("X-Request-Id").is_ok());
        assert!(s.validate_value("Content-Type").is_ok());
        for bad in ["X_Request", "X Request", "X:Y", "Naïve", "x!"] {
            let err = s.validate_value(bad).unwrap_err();
            assert_eq!(err.kind(), ViolationKind::InvalidCharacter, "name: {}", bad);
        }
    }

    #[test]
    fn test_header_name_rfc7230_grammar_widens() {
        let config = ValidationConfig::default().with_header_name_grammar(HeaderNameGrammar::Rfc7230Token);
        let s = CharacterValidationStage::new(Arc::new(config), ComponentKind::HeaderName);
        assert!(s.validate_value("X_Request.Id!").is_ok());
        // Separators are still not token characters.
        assert!(s.validate_value("X:Y").is_err());
    }

    #[test]
    fn test_printable_ascii_class() {
        let config = ValidationConfig::default().with_character_class(CharacterClass::PrintableAscii);
        let s = CharacterValidationStage::new(Arc::new(config), ComponentKind::Parameter);
        assert!(s.validate_value("hello world").is_ok());
        let err = s.validate_value("café").unwrap_err();
        assert_eq!(err.kind(), ViolationKind::InvalidCharacter);
    }

    #[test]
    fn test_strict_class() {
        let config = ValidationConfig::default().with_character_class(CharacterClass::Strict);
        let s = CharacterValidationStage::new(Arc::new(config), ComponentKind::Path);
        assert!(s.validate_value("/api/v1/users-2.json").is_ok());
        let err = s.validate_value("/api?x=1").unwrap_err();
        assert_eq!(err.kind(), ViolationKind::InvalidCharacter);
    }

    #[test]
    fn test_utf8_class_allows_non_ascii() {
        let s = stage(ComponentKind::Parameter);
        assert!(s.validate_value("café ☕").is_ok());
    }
}
