//! Span-accurate token stream consumed by the parser

use crate::{
    tokens::token::Token,
    utils::{Span, Spanned},
};

/// A token with span information
pub type SpannedToken = Spanned<Token>;

/// Token stream ending in exactly one `Eof` token
#[derive(Debug, Clone)]
pub struct TokenStream {
    tokens: Vec<SpannedToken>,
    position: usize,
}

impl TokenStream {
    /// Wrap lexer output; an `Eof` token is appended if missing
    pub fn new(mut tokens: Vec<SpannedToken>) -> Self {
        if !matches!(tokens.last().map(|t| &t.value), Some(Token::Eof)) {
            let end = tokens
                .last()
                .map(|t| Span::point(t.span.end))
                .unwrap_or_default();
            tokens.push(Spanned::new(Token::Eof, end));
        }

        Self {
            tokens,
            position: 0,
        }
    }

    // === NAVIGATION ===

    /// Current token; the final `Eof` is returned once the stream is exhausted
    pub fn current(&self) -> &SpannedToken {
        let last = self.tokens.len() - 1;
        &self.tokens[self.position.min(last)]
    }

    pub fn current_token(&self) -> &Token {
        &self.current().value
    }

    pub fn current_span(&self) -> Span {
        self.current().span
    }

    /// Consume the current token and return it
    pub fn advance(&mut self) -> SpannedToken {
        let token = self.current().clone();
        if !self.is_at_end() {
            self.position += 1;
        }
        token
    }

    pub fn is_at_end(&self) -> bool {
        matches!(self.current_token(), Token::Eof)
    }

    // === STATE ===

    pub fn position(&self) -> usize {
        self.position
    }

    /// Number of tokens including the trailing `Eof`
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// True when the stream holds nothing but `Eof`
    pub fn is_empty(&self) -> bool {
        self.tokens.len() == 1
    }

    pub fn tokens(&self) -> &[SpannedToken] {
        &self.tokens
    }
}
