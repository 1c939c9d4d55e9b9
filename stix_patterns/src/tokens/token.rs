//! Token definitions for the STIX pattern lexer
//!
//! Literal tokens keep their raw source text, wrapper included (`h'ffd8'`,
//! `'abc'`), so that the literal validator judges exactly what was written.

use crate::grammar::keywords::Keyword;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Token {
    Keyword(Keyword),
    /// `[A-Za-z_][A-Za-z0-9_-]*` that is not a keyword or boolean
    Identifier(String),

    // === LITERALS (raw text) ===
    StringLiteral(String),
    /// Double-quoted object path component
    QuotedKey(String),
    /// Sign, digit, then any run of `[0-9A-Za-z_.]`; judged later
    Number(String),
    HexLiteral(String),
    BinaryLiteral(String),
    TimestampLiteral(String),
    Boolean(bool),
    /// `/.../`, recognized only so it can be rejected with a clear message
    SlashDelimited(String),

    // === COMPARISON OPERATORS ===
    Equals,
    NotEquals,
    LessThan,
    LessThanOrEqual,
    GreaterThan,
    GreaterThanOrEqual,

    // === PUNCTUATION ===
    LeftBracket,
    RightBracket,
    LeftParen,
    RightParen,
    Comma,
    Dot,
    Colon,
    Asterisk,

    Eof,
}

impl Token {
    /// Source spelling of this token
    pub fn text(&self) -> &str {
        match self {
            Token::Keyword(keyword) => keyword.as_str(),
            Token::Identifier(text)
            | Token::StringLiteral(text)
            | Token::QuotedKey(text)
            | Token::Number(text)
            | Token::HexLiteral(text)
            | Token::BinaryLiteral(text)
            | Token::TimestampLiteral(text)
            | Token::SlashDelimited(text) => text,
            Token::Boolean(true) => "true",
            Token::Boolean(false) => "false",
            Token::Equals => "=",
            Token::NotEquals => "!=",
            Token::LessThan => "<",
            Token::LessThanOrEqual => "<=",
            Token::GreaterThan => ">",
            Token::GreaterThanOrEqual => ">=",
            Token::LeftBracket => "[",
            Token::RightBracket => "]",
            Token::LeftParen => "(",
            Token::RightParen => ")",
            Token::Comma => ",",
            Token::Dot => ".",
            Token::Colon => ":",
            Token::Asterisk => "*",
            Token::Eof => "",
        }
    }

    /// Short description used in "expected X, found Y" messages
    pub fn describe(&self) -> String {
        match self {
            Token::Keyword(keyword) => format!("keyword '{}'", keyword),
            Token::Identifier(text) => format!("identifier '{}'", text),
            Token::StringLiteral(_) => "string literal".to_string(),
            Token::QuotedKey(text) => format!("quoted key {}", text),
            Token::Number(text) => format!("number '{}'", text),
            Token::HexLiteral(_) => "hex literal".to_string(),
            Token::BinaryLiteral(_) => "binary literal".to_string(),
            Token::TimestampLiteral(_) => "timestamp literal".to_string(),
            Token::Boolean(value) => format!("boolean '{}'", value),
            Token::SlashDelimited(_) => "slash-delimited literal".to_string(),
            Token::Eof => "end of pattern".to_string(),
            other => format!("'{}'", other.text()),
        }
    }

    pub fn is_keyword(&self, keyword: Keyword) -> bool {
        matches!(self, Token::Keyword(k) if *k == keyword)
    }

    /// Tokens that can stand as the right-hand side of a comparison
    pub fn is_literal(&self) -> bool {
        matches!(
            self,
            Token::StringLiteral(_)
                | Token::Number(_)
                | Token::HexLiteral(_)
                | Token::BinaryLiteral(_)
                | Token::TimestampLiteral(_)
                | Token::Boolean(_)
                | Token::SlashDelimited(_)
        )
    }

    pub fn is_comparison_operator(&self) -> bool {
        matches!(
            self,
            Token::Equals
                | Token::NotEquals
                | Token::LessThan
                | Token::LessThanOrEqual
                | Token::GreaterThan
                | Token::GreaterThanOrEqual
        )
    }

    /// Any token that starts an operator, word operators and `NOT` included
    pub fn starts_operator(&self) -> bool {
        match self {
            Token::Keyword(keyword) => keyword.is_word_operator() || *keyword == Keyword::Not,
            other => other.is_comparison_operator(),
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Eof => f.write_str("<eof>"),
            other => f.write_str(other.text()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_text_keeps_raw_literal() {
        assert_eq!(Token::HexLiteral("h'ffd8'".into()).text(), "h'ffd8'");
        assert_eq!(Token::Keyword(Keyword::Within).text(), "WITHIN");
        assert_eq!(Token::GreaterThanOrEqual.text(), ">=");
    }

    #[test]
    fn test_classification() {
        assert!(Token::Boolean(true).is_literal());
        assert!(!Token::Identifier("abc".into()).is_literal());
        assert!(Token::Keyword(Keyword::Not).starts_operator());
        assert!(Token::Keyword(Keyword::IsSubset).starts_operator());
        assert!(!Token::Keyword(Keyword::And).starts_operator());
        assert!(Token::NotEquals.starts_operator());
    }

    #[test]
    fn test_describe() {
        assert_eq!(Token::Eof.describe(), "end of pattern");
        assert_eq!(Token::Colon.describe(), "':'");
        assert_eq!(
            Token::Keyword(Keyword::And).describe(),
            "keyword 'AND'"
        );
    }
}
