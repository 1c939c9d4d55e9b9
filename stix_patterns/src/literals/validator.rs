//! Literal format validation
//!
//! Judges the raw text of a literal, wrapper included, against the format its
//! kind requires. The checks are purely structural: the property a literal is
//! compared against plays no part.

use crate::config::constants::compile_time::syntax::MAX_LIST_ELEMENTS;
use crate::grammar::ast::nodes::{Literal, LiteralKind};
use crate::logging::{codes, Code};
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine;
use chrono::{DateTime, FixedOffset};

const QUOTE_HINT: &str = "string values must be enclosed in single quotes";

/// Standard alphabet; padding may be present or absent
const BINARY_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LiteralError {
    #[error("Invalid number '{text}': {detail}")]
    InvalidNumber { text: String, detail: String },

    #[error("Invalid hex literal {text}: {detail}")]
    InvalidHex { text: String, detail: String },

    #[error("Invalid binary literal {text}: {detail}")]
    InvalidBinary { text: String, detail: String },

    #[error("Invalid timestamp {text}: {detail}")]
    InvalidTimestamp { text: String, detail: String },

    #[error("Invalid string literal {text}: {detail}")]
    InvalidString { text: String, detail: String },

    #[error("Invalid boolean '{text}': expected true or false")]
    InvalidBoolean { text: String },

    #[error("Unquoted value '{text}': {QUOTE_HINT}")]
    UnquotedString { text: String },

    #[error("Empty list: a list operand needs at least one value")]
    EmptyList,

    #[error("Mixed list: {found} value in a list of {expected} values")]
    HeterogeneousList {
        expected: &'static str,
        found: &'static str,
    },

    #[error("List too long: {count} elements (max {MAX_LIST_ELEMENTS})")]
    ListTooLong { count: usize },

    #[error("Unsupported {kind} literal {text}")]
    UnsupportedLiteral { kind: &'static str, text: String },
}

impl LiteralError {
    pub fn error_code(&self) -> Code {
        match self {
            Self::InvalidNumber { .. } => codes::literal::INVALID_NUMBER,
            Self::InvalidHex { .. } => codes::literal::INVALID_HEX,
            Self::InvalidBinary { .. } => codes::literal::INVALID_BINARY,
            Self::InvalidTimestamp { .. } => codes::literal::INVALID_TIMESTAMP,
            Self::InvalidString { .. } => codes::literal::INVALID_STRING,
            Self::InvalidBoolean { .. } => codes::literal::INVALID_BOOLEAN,
            Self::UnquotedString { .. } => codes::literal::UNQUOTED_STRING,
            Self::EmptyList => codes::literal::EMPTY_LIST,
            Self::HeterogeneousList { .. } => codes::literal::HETEROGENEOUS_LIST,
            Self::ListTooLong { .. } => codes::literal::LIST_TOO_LONG,
            Self::UnsupportedLiteral { .. } => codes::literal::UNSUPPORTED_LITERAL,
        }
    }
}

/// Validate a literal's raw text against its declared kind
pub fn validate_literal(raw: &str, kind: LiteralKind) -> Result<(), LiteralError> {
    match kind {
        LiteralKind::String => validate_string(raw),
        LiteralKind::Number => validate_number(raw),
        LiteralKind::Hex => validate_hex(raw),
        LiteralKind::Binary => validate_binary(raw),
        LiteralKind::Timestamp => validate_timestamp(raw),
        LiteralKind::Boolean => match raw {
            "true" | "false" => Ok(()),
            _ => Err(LiteralError::InvalidBoolean {
                text: raw.to_string(),
            }),
        },
        LiteralKind::Unquoted => Err(LiteralError::UnquotedString {
            text: raw.to_string(),
        }),
        LiteralKind::SlashDelimited => Err(LiteralError::UnsupportedLiteral {
            kind: kind.as_str(),
            text: raw.to_string(),
        }),
    }
}

/// Validate an AST literal
pub fn validate(literal: &Literal) -> Result<(), LiteralError> {
    validate_literal(&literal.raw, literal.kind)
}

/// List-level rules: non-empty, bounded, one kind throughout.
/// Elements never valid on their own (unquoted, slash-delimited) are left
/// to per-element validation and ignored here.
pub fn validate_list_shape(items: &[Literal]) -> Result<(), LiteralError> {
    if items.is_empty() {
        return Err(LiteralError::EmptyList);
    }

    // RESOURCE: cap list size
    if items.len() > MAX_LIST_ELEMENTS {
        return Err(LiteralError::ListTooLong { count: items.len() });
    }

    let mut kinds = items
        .iter()
        .map(|item| item.kind)
        .filter(|kind| !matches!(kind, LiteralKind::Unquoted | LiteralKind::SlashDelimited));

    if let Some(expected) = kinds.next() {
        if let Some(found) = kinds.find(|kind| *kind != expected) {
            return Err(LiteralError::HeterogeneousList {
                expected: expected.as_str(),
                found: found.as_str(),
            });
        }
    }

    Ok(())
}

/// Full list validation: shape first, then each element in order
pub fn validate_list(items: &[Literal]) -> Result<(), LiteralError> {
    validate_list_shape(items)?;
    items.iter().try_for_each(validate)
}

// ============================================================================
// Per-kind checks
// ============================================================================

fn validate_number(raw: &str) -> Result<(), LiteralError> {
    let unsigned = raw.strip_prefix(|c: char| c == '+' || c == '-').unwrap_or(raw);
    let (integer, fraction) = match unsigned.split_once('.') {
        Some((integer, fraction)) => (integer, Some(fraction)),
        None => (unsigned, None),
    };

    if all_digits(integer) && fraction.map_or(true, all_digits) {
        return Ok(());
    }

    let detail = if raw.chars().any(|c| c.is_ascii_alphabetic()) {
        format!("not a number; {}", QUOTE_HINT)
    } else {
        "expected optional sign, digits and an optional fraction".to_string()
    };
    Err(LiteralError::InvalidNumber {
        text: raw.to_string(),
        detail,
    })
}

fn validate_string(raw: &str) -> Result<(), LiteralError> {
    let invalid = |detail: &str| LiteralError::InvalidString {
        text: raw.to_string(),
        detail: detail.to_string(),
    };

    let body = unwrap_quoted(raw, "'").ok_or_else(|| invalid("missing single quotes"))?;

    let mut chars = body.chars();
    while let Some(ch) = chars.next() {
        match ch {
            '\\' => {
                if chars.next().is_none() {
                    return Err(invalid("dangling escape at end of string"));
                }
            }
            '\'' => return Err(invalid("unescaped single quote")),
            _ => {}
        }
    }

    Ok(())
}

fn validate_hex(raw: &str) -> Result<(), LiteralError> {
    let invalid = |detail: &str| LiteralError::InvalidHex {
        text: raw.to_string(),
        detail: detail.to_string(),
    };

    let body = unwrap_quoted(raw, "h'").ok_or_else(|| invalid("expected h'...'"))?;

    if !body.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(invalid("contains non-hexadecimal characters"));
    }
    if body.len() % 2 != 0 {
        return Err(invalid("odd number of hex digits"));
    }

    Ok(())
}

fn validate_binary(raw: &str) -> Result<(), LiteralError> {
    let invalid = |detail: String| LiteralError::InvalidBinary {
        text: raw.to_string(),
        detail,
    };

    let body = unwrap_quoted(raw, "b'").ok_or_else(|| invalid("expected b'...'".to_string()))?;

    BINARY_ENGINE
        .decode(body)
        .map(|_| ())
        .map_err(|e| invalid(format!("not valid base64: {}", e)))
}

fn validate_timestamp(raw: &str) -> Result<(), LiteralError> {
    let invalid = |detail: String| LiteralError::InvalidTimestamp {
        text: raw.to_string(),
        detail,
    };

    let body = unwrap_quoted(raw, "t'").ok_or_else(|| invalid("expected t'...'".to_string()))?;

    parse_timestamp(body).map(|_| ()).map_err(invalid)
}

/// Date-time with an upper-case `T` separator and a `Z` or `+hh:mm` offset.
///
/// chrono alone also takes a space, `t` or `z`, which STIX timestamps do not allow.
pub fn parse_timestamp(body: &str) -> Result<DateTime<FixedOffset>, String> {
    if body.as_bytes().get(10) != Some(&b'T') {
        return Err("date and time must be separated by 'T'".to_string());
    }
    if body.ends_with('z') {
        return Err("UTC designator must be an upper-case 'Z'".to_string());
    }

    DateTime::parse_from_rfc3339(body).map_err(|e| format!("not an RFC 3339 date-time: {}", e))
}

fn unwrap_quoted<'a>(raw: &'a str, open: &str) -> Option<&'a str> {
    raw.strip_prefix(open)?.strip_suffix('\'')
}

fn all_digits(text: &str) -> bool {
    !text.is_empty() && text.bytes().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::Span;
    use assert_matches::assert_matches;

    fn lit(kind: LiteralKind, raw: &str) -> Literal {
        Literal::new(kind, raw, Span::default())
    }

    #[test]
    fn test_numbers() {
        for ok in ["1280", "-5", "+3", "7.0", "0.25", "-12.5"] {
            assert!(validate_literal(ok, LiteralKind::Number).is_ok(), "{}", ok);
        }
        for bad in ["1.", "1.2.3", "--1", "1e5", "12_000"] {
            assert_matches!(
                validate_literal(bad, LiteralKind::Number),
                Err(LiteralError::InvalidNumber { .. }),
                "{}",
                bad
            );
        }
    }

    #[test]
    fn test_number_with_letters_hints_at_quotes() {
        let error = validate_literal("4c0b3a", LiteralKind::Number).unwrap_err();
        assert_eq!(error.error_code(), codes::literal::INVALID_NUMBER);
        assert!(error.to_string().contains(QUOTE_HINT));
    }

    #[test]
    fn test_strings() {
        assert!(validate_literal("'abc'", LiteralKind::String).is_ok());
        assert!(validate_literal("''", LiteralKind::String).is_ok());
        assert!(validate_literal("'it\\'s'", LiteralKind::String).is_ok());
        assert!(validate_literal("'hkey_local_machine\\\\foo\\\\bar'", LiteralKind::String).is_ok());
        assert_matches!(
            validate_literal("'a'b'", LiteralKind::String),
            Err(LiteralError::InvalidString { .. })
        );
        assert_matches!(
            validate_literal("'abc\\'", LiteralKind::String),
            Err(LiteralError::InvalidString { .. })
        );
    }

    #[test]
    fn test_hex() {
        assert!(validate_literal("h'ffd8'", LiteralKind::Hex).is_ok());
        assert!(validate_literal("h''", LiteralKind::Hex).is_ok());
        assert_matches!(
            validate_literal("h'fff'", LiteralKind::Hex),
            Err(LiteralError::InvalidHex { .. })
        );
        assert_matches!(
            validate_literal("h'zz'", LiteralKind::Hex),
            Err(LiteralError::InvalidHex { .. })
        );
    }

    #[test]
    fn test_binary() {
        assert!(validate_literal("b'dGhpcyBpcyBhIHRlc3Q='", LiteralKind::Binary).is_ok());
        assert!(validate_literal("b'dGhpcyBpcyBhIHRlc3Q'", LiteralKind::Binary).is_ok());
        assert!(validate_literal("b''", LiteralKind::Binary).is_ok());
        assert_matches!(
            validate_literal("b'not base64!'", LiteralKind::Binary),
            Err(LiteralError::InvalidBinary { .. })
        );
    }

    #[test]
    fn test_timestamps() {
        assert!(validate_literal("t'2014-01-13T07:03:17Z'", LiteralKind::Timestamp).is_ok());
        assert!(validate_literal("t'2016-06-01T00:00:00.123+02:00'", LiteralKind::Timestamp).is_ok());
        assert_matches!(
            validate_literal("t'2014-13-01T07:03:17Z'", LiteralKind::Timestamp),
            Err(LiteralError::InvalidTimestamp { .. })
        );
        assert_matches!(
            validate_literal("t'2014-01-13'", LiteralKind::Timestamp),
            Err(LiteralError::InvalidTimestamp { .. })
        );
    }

    #[test]
    fn test_timestamp_separators_are_strict() {
        for bad in [
            "t'2016-06-01 00:00:00Z'",
            "t'2016-06-01t00:00:00Z'",
            "t'2016-06-01T00:00:00z'",
            "t'2016-06-01t00:00:00z'",
        ] {
            assert_matches!(
                validate_literal(bad, LiteralKind::Timestamp),
                Err(LiteralError::InvalidTimestamp { .. }),
                "{}",
                bad
            );
        }
        assert!(parse_timestamp("2016-06-01T00:00:00-05:00").is_ok());
        assert!(parse_timestamp("2016-06-01 00:00:00Z")
            .unwrap_err()
            .contains("'T'"));
    }

    #[test]
    fn test_always_rejected_kinds() {
        let error = validate_literal("cead3f77", LiteralKind::Unquoted).unwrap_err();
        assert_eq!(error.error_code(), codes::literal::UNQUOTED_STRING);
        assert!(error.to_string().contains("single quotes"));

        assert_matches!(
            validate_literal("/.*/", LiteralKind::SlashDelimited),
            Err(LiteralError::UnsupportedLiteral { .. })
        );
    }

    #[test]
    fn test_lists() {
        assert_eq!(validate_list(&[]), Err(LiteralError::EmptyList));
        assert!(validate_list(&[lit(LiteralKind::Number, "1024"), lit(LiteralKind::Number, "2048")]).is_ok());
        assert_matches!(
            validate_list(&[lit(LiteralKind::String, "'a'"), lit(LiteralKind::Number, "1")]),
            Err(LiteralError::HeterogeneousList { expected: "string", found: "number" })
        );
        assert_matches!(
            validate_list(&[lit(LiteralKind::Number, "1"), lit(LiteralKind::Number, "x1")]),
            Err(LiteralError::InvalidNumber { .. })
        );

        let long: Vec<_> = (0..=MAX_LIST_ELEMENTS)
            .map(|i| lit(LiteralKind::Number, &i.to_string()))
            .collect();
        assert_matches!(validate_list_shape(&long), Err(LiteralError::ListTooLong { .. }));
    }

    #[test]
    fn test_list_shape_ignores_unquoted_elements() {
        let items = [lit(LiteralKind::String, "'a'"), lit(LiteralKind::Unquoted, "b")];
        assert!(validate_list_shape(&items).is_ok());
        assert_matches!(validate_list(&items), Err(LiteralError::UnquotedString { .. }));
    }
}
