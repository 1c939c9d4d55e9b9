//! Lexical analysis for STIX patterns
//!
//! Converts pattern text into a span-tagged token stream. Lexing is
//! all-or-nothing: the first lexical error aborts the pipeline.

pub mod analyzer;

use crate::tokens::TokenStream;

pub use analyzer::{LexerError, LexicalAnalyzer, LexicalMetrics};

/// Tokenize pattern text with a fresh analyzer
pub fn tokenize(source: &str) -> Result<TokenStream, LexerError> {
    let mut analyzer = LexicalAnalyzer::new();
    analyzer.tokenize(source)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::constants::compile_time::lexical::*;
    use crate::grammar::keywords::Keyword;
    use crate::logging::codes;
    use crate::tokens::Token;
    use assert_matches::assert_matches;

    fn kinds(source: &str) -> Vec<Token> {
        tokenize(source)
            .expect("pattern should tokenize")
            .tokens()
            .iter()
            .map(|t| t.value.clone())
            .collect()
    }

    #[test]
    fn test_simple_comparison() {
        assert_eq!(
            kinds("[file:size = 1280]"),
            vec![
                Token::LeftBracket,
                Token::Identifier("file".into()),
                Token::Colon,
                Token::Identifier("size".into()),
                Token::Equals,
                Token::Number("1280".into()),
                Token::RightBracket,
                Token::Eof,
            ]
        );
    }

    #[test]
    fn test_typed_literals_keep_wrapper() {
        let tokens = kinds("t'2014-01-13T07:03:17Z' h'ffd8' b'AAAA' 'it\\'s'");
        assert_eq!(tokens[0], Token::TimestampLiteral("t'2014-01-13T07:03:17Z'".into()));
        assert_eq!(tokens[1], Token::HexLiteral("h'ffd8'".into()));
        assert_eq!(tokens[2], Token::BinaryLiteral("b'AAAA'".into()));
        assert_eq!(tokens[3], Token::StringLiteral("'it\\'s'".into()));
    }

    #[test]
    fn test_identifier_starting_with_type_tag() {
        assert_eq!(kinds("hashes")[0], Token::Identifier("hashes".into()));
        assert_eq!(kinds("body")[0], Token::Identifier("body".into()));
    }

    #[test]
    fn test_keywords_are_case_sensitive() {
        assert_eq!(kinds("AND and")[..2], [
            Token::Keyword(Keyword::And),
            Token::Identifier("and".into())
        ]);
        assert_eq!(kinds("true")[0], Token::Boolean(true));
    }

    #[test]
    fn test_hyphenated_identifier_and_quoted_key() {
        let tokens = kinds("x509-certificate:hashes.\"SHA-256\"");
        assert_eq!(tokens[0], Token::Identifier("x509-certificate".into()));
        assert_eq!(tokens[4], Token::QuotedKey("\"SHA-256\"".into()));
    }

    #[test]
    fn test_operators() {
        assert_eq!(
            kinds("!= <= >= < >"),
            vec![
                Token::NotEquals,
                Token::LessThanOrEqual,
                Token::GreaterThanOrEqual,
                Token::LessThan,
                Token::GreaterThan,
                Token::Eof,
            ]
        );
    }

    #[test]
    fn test_number_keeps_trailing_letters() {
        assert_eq!(kinds("4c0b")[0], Token::Number("4c0b".into()));
        assert_eq!(kinds("-12.5")[0], Token::Number("-12.5".into()));
    }

    #[test]
    fn test_slash_delimited() {
        assert_eq!(kinds("/.*\\.dll/")[0], Token::SlashDelimited("/.*\\.dll/".into()));
    }

    #[test]
    fn test_spans_track_lines() {
        let stream = tokenize("[a:b = 1]\nAND").expect("tokenize");
        let and = &stream.tokens()[7];
        assert_eq!(and.value, Token::Keyword(Keyword::And));
        assert_eq!(and.span.start.offset, 10);
        assert_eq!(and.span.start.line, 2);
        assert_eq!(and.span.start.column, 1);
        assert_eq!(and.span.end.offset, 13);
    }

    #[test]
    fn test_unterminated_string_points_at_quote() {
        let error = tokenize("[file:name = 'abc]").unwrap_err();
        assert_eq!(error.error_code(), codes::lexical::UNTERMINATED_LITERAL);
        assert_eq!(error.span().start.offset, 13);
    }

    #[test]
    fn test_trailing_backslash_is_unterminated() {
        let error = tokenize("'abc\\").unwrap_err();
        assert_matches!(error, LexerError::UnterminatedLiteral { kind: "string literal", .. });
    }

    #[test]
    fn test_unterminated_typed_literal_points_at_tag() {
        let error = tokenize("[a:b = h'00").unwrap_err();
        assert_matches!(error, LexerError::UnterminatedLiteral { kind: "hex literal", .. });
        assert_eq!(error.span().start.offset, 7);
    }

    #[test]
    fn test_invalid_characters() {
        assert_matches!(
            tokenize("[a:b = $]"),
            Err(LexerError::InvalidCharacter { character: '$', .. })
        );
        assert_matches!(
            tokenize("[a:b = -x]"),
            Err(LexerError::InvalidCharacter { character: '-', .. })
        );
        assert_matches!(
            tokenize("!"),
            Err(LexerError::InvalidCharacter { character: '!', .. })
        );
    }

    #[test]
    fn test_identifier_length_limit() {
        let long = "a".repeat(MAX_IDENTIFIER_LENGTH + 1);
        assert_matches!(
            tokenize(&long),
            Err(LexerError::IdentifierTooLong { length, .. }) if length == MAX_IDENTIFIER_LENGTH + 1
        );
    }

    #[test]
    fn test_pattern_length_limit() {
        let long = " ".repeat(MAX_PATTERN_LENGTH + 1);
        let error = tokenize(&long).unwrap_err();
        assert_eq!(error.error_code(), codes::lexical::PATTERN_TOO_LONG);
    }

    #[test]
    fn test_string_size_limit() {
        let source = format!("'{}'", "x".repeat(MAX_STRING_SIZE + 1));
        assert_matches!(tokenize(&source), Err(LexerError::StringTooLarge { .. }));
    }

    #[test]
    fn test_whitespace_only_yields_eof() {
        let stream = tokenize(" \t\r\n").expect("tokenize");
        assert!(stream.is_empty());
    }

    #[test]
    fn test_metrics() {
        let mut analyzer = LexicalAnalyzer::new();
        analyzer
            .tokenize("[file:name LIKE 'a%'] AND [file:size > 10]")
            .expect("tokenize");
        let metrics = analyzer.metrics();
        assert_eq!(metrics.keyword_tokens, 1);
        assert_eq!(metrics.operator_tokens, 2);
        assert_eq!(metrics.literal_tokens, 2);
        assert_eq!(metrics.identifier_tokens, 4);
    }
}
