//! Shared helpers for the grammar builders

use super::atomic::Parser;
use crate::grammar::keywords::Keyword;
use crate::syntax::error::{SyntaxError, SyntaxResult};
use crate::tokens::Token;
use crate::utils::Span;

/// Error for the current token when `expected` was required.
/// End of input gets its own error kind.
pub fn unexpected_token_error(parser: &dyn Parser, expected: &str) -> SyntaxError {
    let span = parser.current_span();
    match parser.current_token() {
        Token::Eof => SyntaxError::unexpected_end_of_input(expected, span),
        found => SyntaxError::unexpected_token(expected, &found.describe(), span),
    }
}

/// Consume `expected` or fail with an unexpected-token error
pub fn expect_token(parser: &mut dyn Parser, expected: &Token, description: &str) -> SyntaxResult<Span> {
    if parser.current_token() == expected {
        Ok(parser.advance().span)
    } else {
        Err(unexpected_token_error(parser, description))
    }
}

pub fn expect_keyword(parser: &mut dyn Parser, keyword: Keyword) -> SyntaxResult<Span> {
    if parser.current_token().is_keyword(keyword) {
        Ok(parser.advance().span)
    } else {
        Err(unexpected_token_error(parser, &format!("'{}'", keyword)))
    }
}

/// Consume the closer for a delimiter opened at `open_span`.
/// Running out of input reports the opener as unmatched.
pub fn expect_closing(
    parser: &mut dyn Parser,
    open: char,
    close: Token,
    open_span: Span,
) -> SyntaxResult<Span> {
    if *parser.current_token() == close {
        return Ok(parser.advance().span);
    }

    match parser.current_token() {
        Token::Eof => Err(SyntaxError::UnmatchedDelimiter {
            delimiter: open,
            span: open_span,
        }),
        found => Err(SyntaxError::unexpected_token(
            &format!("'{}'", close.text()),
            &found.describe(),
            parser.current_span(),
        )),
    }
}

/// Run `build` one nesting level deeper, failing past the depth limit
pub fn nested<T>(
    parser: &mut dyn Parser,
    context: &'static str,
    build: impl FnOnce(&mut dyn Parser) -> SyntaxResult<T>,
) -> SyntaxResult<T> {
    parser.enter_context(context)?;
    let result = build(parser);
    parser.exit_context();
    result
}
