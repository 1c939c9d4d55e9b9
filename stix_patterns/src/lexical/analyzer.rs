//! Core lexical analyzer for STIX patterns
//!
//! Whitespace is discarded. Literal tokens keep their wrapper text and are
//! judged later by the literal validator, so the lexer only has to find where
//! each literal ends.

use crate::config::constants::compile_time::lexical::*;
use crate::grammar::keywords::Keyword;
use crate::logging::codes;
use crate::tokens::{SpannedToken, Token, TokenStream};
use crate::utils::{Position, Span, Spanned};
use crate::{log_debug, log_error, log_success};
use std::iter::Peekable;
use std::str::CharIndices;

type Chars<'a> = Peekable<CharIndices<'a>>;

/// Lexical analysis errors with compile-time security boundaries
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LexerError {
    #[error("Invalid character '{character}' at line {}, column {}", .span.start.line, .span.start.column)]
    InvalidCharacter { character: char, span: Span },

    #[error("Unterminated {kind} starting at line {}, column {}", .span.start.line, .span.start.column)]
    UnterminatedLiteral { kind: &'static str, span: Span },

    #[error("Identifier too long: {length} characters (max {MAX_IDENTIFIER_LENGTH})")]
    IdentifierTooLong { length: usize, span: Span },

    #[error("Literal too large: {size} bytes (max {MAX_STRING_SIZE})")]
    StringTooLarge { size: usize, span: Span },

    #[error("Pattern too long: {length} bytes (max {MAX_PATTERN_LENGTH})")]
    PatternTooLong { length: usize },

    #[error("Too many tokens: {count} (max {MAX_TOKEN_COUNT})")]
    TooManyTokens { count: usize, span: Span },
}

impl LexerError {
    pub fn error_code(&self) -> crate::logging::Code {
        match self {
            LexerError::InvalidCharacter { .. } => codes::lexical::INVALID_CHARACTER,
            LexerError::UnterminatedLiteral { .. } => codes::lexical::UNTERMINATED_LITERAL,
            LexerError::IdentifierTooLong { .. } => codes::lexical::IDENTIFIER_TOO_LONG,
            LexerError::StringTooLarge { .. } => codes::lexical::STRING_TOO_LARGE,
            LexerError::PatternTooLong { .. } => codes::lexical::PATTERN_TOO_LONG,
            LexerError::TooManyTokens { .. } => codes::lexical::TOO_MANY_TOKENS,
        }
    }

    /// Source location the error is pinned to
    pub fn span(&self) -> Span {
        match self {
            LexerError::InvalidCharacter { span, .. }
            | LexerError::UnterminatedLiteral { span, .. }
            | LexerError::IdentifierTooLong { span, .. }
            | LexerError::StringTooLarge { span, .. }
            | LexerError::TooManyTokens { span, .. } => *span,
            LexerError::PatternTooLong { .. } => Span::point(Position::start()),
        }
    }
}

/// Lexical analysis counters, reset on every call to `tokenize`
#[derive(Debug, Default, Clone)]
pub struct LexicalMetrics {
    pub total_tokens: usize,
    pub keyword_tokens: usize,
    pub identifier_tokens: usize,
    pub literal_tokens: usize,
    pub operator_tokens: usize,
    pub max_literal_length: usize,
}

impl LexicalMetrics {
    pub(crate) fn record_token(&mut self, token: &Token) {
        self.total_tokens += 1;

        match token {
            Token::Keyword(keyword) if keyword.is_word_operator() => self.operator_tokens += 1,
            Token::Keyword(_) => self.keyword_tokens += 1,
            Token::Identifier(_) | Token::QuotedKey(_) => self.identifier_tokens += 1,
            other if other.is_comparison_operator() => self.operator_tokens += 1,
            other if other.is_literal() => {
                self.literal_tokens += 1;
                self.max_literal_length = self.max_literal_length.max(other.text().len());
            }
            _ => {}
        }
    }
}

/// Why a delimited scan stopped early
enum ScanFailure {
    Unterminated,
    TooLarge(usize),
}

/// Tokenizer for STIX pattern text
#[derive(Debug, Default)]
pub struct LexicalAnalyzer {
    metrics: LexicalMetrics,
}

impl LexicalAnalyzer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tokenize a pattern into a stream terminated by `Eof`
    pub fn tokenize(&mut self, source: &str) -> Result<TokenStream, LexerError> {
        self.metrics = LexicalMetrics::default();

        log_debug!("Starting lexical analysis",
            "length" => source.len(),
            "max_tokens_allowed" => MAX_TOKEN_COUNT
        );

        // SECURITY: Reject oversized input before scanning it
        if source.len() > MAX_PATTERN_LENGTH {
            let error = LexerError::PatternTooLong {
                length: source.len(),
            };
            log_error!(error.error_code(), "Pattern length limit exceeded",
                "length" => source.len(),
                "limit" => MAX_PATTERN_LENGTH
            );
            return Err(error);
        }

        let mut tokens: Vec<SpannedToken> = Vec::new();
        let mut chars = source.char_indices().peekable();
        let mut current_pos = Position::start();

        while let Some((byte_offset, ch)) = chars.next() {
            if matches!(ch, ' ' | '\t' | '\r' | '\n') {
                current_pos = current_pos.advance(ch);
                continue;
            }

            // SECURITY: Check token count limit to prevent DoS
            if tokens.len() >= MAX_TOKEN_COUNT {
                let error = LexerError::TooManyTokens {
                    count: tokens.len(),
                    span: Span::single(current_pos, ch),
                };
                log_error!(error.error_code(), "Token limit exceeded",
                    span = error.span(),
                    "token_count" => tokens.len(),
                    "limit" => MAX_TOKEN_COUNT
                );
                return Err(error);
            }

            let result = self.scan_token(ch, current_pos, &mut chars);

            let token = match result {
                Ok(token) => token,
                Err(error) => {
                    log_error!(error.error_code(), "Lexical analysis failed",
                        span = error.span(),
                        "character" => ch,
                        "tokens_processed" => tokens.len()
                    );
                    return Err(error);
                }
            };

            let end_offset = chars.peek().map(|(offset, _)| *offset).unwrap_or(source.len());
            let end_pos = current_pos.advance_str(&source[byte_offset..end_offset]);

            self.metrics.record_token(&token);
            tokens.push(Spanned::new(token, Span::new(current_pos, end_pos)));
            current_pos = end_pos;
        }

        tokens.push(Spanned::new(Token::Eof, Span::point(current_pos)));
        let token_stream = TokenStream::new(tokens);

        log_success!(codes::success::TOKENIZATION_COMPLETE,
            "Lexical analysis completed successfully",
            "token_count" => token_stream.len(),
            "keywords" => self.metrics.keyword_tokens,
            "identifiers" => self.metrics.identifier_tokens,
            "literals" => self.metrics.literal_tokens,
            "operators" => self.metrics.operator_tokens,
            "max_literal_length" => self.metrics.max_literal_length
        );

        Ok(token_stream)
    }

    pub fn metrics(&self) -> &LexicalMetrics {
        &self.metrics
    }

    // ========================================================================
    // Private scanning methods
    // ========================================================================

    /// Scan one token whose first character `ch` has already been consumed
    fn scan_token(
        &mut self,
        ch: char,
        start: Position,
        chars: &mut Chars<'_>,
    ) -> Result<Token, LexerError> {
        let invalid = |character: char| LexerError::InvalidCharacter {
            character,
            span: Span::single(start, character),
        };

        match ch {
            '[' => Ok(Token::LeftBracket),
            ']' => Ok(Token::RightBracket),
            '(' => Ok(Token::LeftParen),
            ')' => Ok(Token::RightParen),
            ',' => Ok(Token::Comma),
            '.' => Ok(Token::Dot),
            ':' => Ok(Token::Colon),
            '*' => Ok(Token::Asterisk),
            '=' => Ok(Token::Equals),

            '!' => {
                if next_is(chars, '=') {
                    chars.next();
                    Ok(Token::NotEquals)
                } else {
                    Err(invalid(ch))
                }
            }
            '<' => {
                if next_is(chars, '=') {
                    chars.next();
                    Ok(Token::LessThanOrEqual)
                } else {
                    Ok(Token::LessThan)
                }
            }
            '>' => {
                if next_is(chars, '=') {
                    chars.next();
                    Ok(Token::GreaterThanOrEqual)
                } else {
                    Ok(Token::GreaterThan)
                }
            }

            '\'' => self
                .scan_literal(chars, '\'', "string literal", start, ch)
                .map(Token::StringLiteral),
            '"' => self
                .scan_literal(chars, '"', "quoted key", start, ch)
                .map(Token::QuotedKey),
            '/' => self
                .scan_literal(chars, '/', "slash-delimited literal", start, ch)
                .map(Token::SlashDelimited),

            // Typed literals: h'..', b'..', t'..'
            'h' | 'b' | 't' if next_is(chars, '\'') => {
                chars.next();
                let (kind, wrap): (&'static str, fn(String) -> Token) = match ch {
                    'h' => ("hex literal", Token::HexLiteral),
                    'b' => ("binary literal", Token::BinaryLiteral),
                    _ => ("timestamp literal", Token::TimestampLiteral),
                };
                self.scan_literal(chars, '\'', kind, start, ch)
                    .map(|body| wrap(format!("{}{}", ch, body)))
            }

            '+' | '-' => {
                if chars.peek().is_some_and(|(_, c)| c.is_ascii_digit()) {
                    Ok(Token::Number(scan_number(ch, chars)))
                } else {
                    Err(invalid(ch))
                }
            }
            '0'..='9' => Ok(Token::Number(scan_number(ch, chars))),

            'a'..='z' | 'A'..='Z' | '_' => self.scan_word(ch, start, chars),

            _ => Err(invalid(ch)),
        }
    }

    /// Scan up to the closing delimiter, honoring backslash escapes.
    /// Returns the raw text including both delimiters.
    fn scan_literal(
        &mut self,
        chars: &mut Chars<'_>,
        close: char,
        kind: &'static str,
        start: Position,
        first: char,
    ) -> Result<String, LexerError> {
        let mut text = String::new();
        text.push(close);

        match scan_delimited(chars, close, &mut text) {
            Ok(()) => {
                text.push(close);
                Ok(text)
            }
            Err(ScanFailure::Unterminated) => Err(LexerError::UnterminatedLiteral {
                kind,
                span: Span::single(start, first),
            }),
            Err(ScanFailure::TooLarge(size)) => Err(LexerError::StringTooLarge {
                size,
                span: Span::single(start, first),
            }),
        }
    }

    fn scan_word(
        &mut self,
        first: char,
        start: Position,
        chars: &mut Chars<'_>,
    ) -> Result<Token, LexerError> {
        let mut word = String::new();
        word.push(first);

        while let Some(&(_, ch)) = chars.peek() {
            if ch.is_ascii_alphanumeric() || ch == '_' || ch == '-' {
                word.push(ch);
                chars.next();
            } else {
                break;
            }
        }

        // SECURITY: Check identifier length against compile-time limit
        if word.len() > MAX_IDENTIFIER_LENGTH {
            return Err(LexerError::IdentifierTooLong {
                length: word.len(),
                span: Span::new(start, start.advance_str(&word)),
            });
        }

        Ok(classify_word(word))
    }
}

fn next_is(chars: &mut Chars<'_>, expected: char) -> bool {
    chars.peek().map(|(_, c)| *c) == Some(expected)
}

/// Keywords are exact-case; `true`/`false` become booleans
fn classify_word(word: String) -> Token {
    if let Some(keyword) = Keyword::from_str(&word) {
        return Token::Keyword(keyword);
    }
    match word.as_str() {
        "true" => Token::Boolean(true),
        "false" => Token::Boolean(false),
        _ => Token::Identifier(word),
    }
}

/// Number tokens swallow any trailing alphanumerics so that `4c0b` reaches
/// the literal validator as one malformed number instead of two tokens.
fn scan_number(first: char, chars: &mut Chars<'_>) -> String {
    let mut text = String::new();
    text.push(first);

    while let Some(&(_, ch)) = chars.peek() {
        if ch.is_ascii_alphanumeric() || ch == '_' || ch == '.' {
            text.push(ch);
            chars.next();
        } else {
            break;
        }
    }

    text
}

/// Consume characters up to and including `close`, copying everything
/// before it into `text`
fn scan_delimited(chars: &mut Chars<'_>, close: char, text: &mut String) -> Result<(), ScanFailure> {
    let mut size = 0usize;

    loop {
        match chars.next() {
            None => return Err(ScanFailure::Unterminated),
            Some((_, ch)) if ch == close => return Ok(()),
            Some((_, '\\')) => {
                let (_, escaped) = chars.next().ok_or(ScanFailure::Unterminated)?;
                text.push('\\');
                text.push(escaped);
                size += 1 + escaped.len_utf8();
            }
            Some((_, ch)) => {
                text.push(ch);
                size += ch.len_utf8();
            }
        }

        // SECURITY: Fail fast on oversized literals
        if size > MAX_STRING_SIZE {
            return Err(ScanFailure::TooLarge(size));
        }
    }
}
