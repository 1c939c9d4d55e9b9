//! Pattern parser driving the grammar builders
//!
//! The parser owns the token stream and the nesting stack. All grammar
//! decisions live in `grammar::builders`; this type supplies navigation and
//! enforces the nesting limit.

use crate::config::constants::compile_time::syntax::*;
use crate::grammar::{
    ast::nodes::Pattern,
    builders::{atomic::Parser, parse_pattern},
};
use crate::logging::codes;
use crate::syntax::error::{SyntaxError, SyntaxResult};
use crate::tokens::{SpannedToken, Token, TokenStream};
use crate::utils::Span;
use crate::{log_debug, log_error, log_success};

pub struct PatternParser {
    tokens: TokenStream,
    context_stack: Vec<&'static str>,
    max_depth_reached: usize,
}

impl PatternParser {
    pub fn new(tokens: TokenStream) -> Self {
        log_debug!("Creating pattern parser", "tokens" => tokens.len());

        Self {
            tokens,
            context_stack: Vec::new(),
            max_depth_reached: 0,
        }
    }

    /// Parse the whole token stream into a pattern
    pub fn parse(&mut self) -> SyntaxResult<Pattern> {
        let result = parse_pattern(self);

        match &result {
            Ok(_) => {
                log_success!(codes::success::AST_CONSTRUCTION_COMPLETE,
                    "Pattern parsing completed successfully",
                    "tokens" => self.tokens.len(),
                    "max_depth" => self.max_depth_reached
                );
            }
            Err(error) => {
                log_error!(error.error_code(), "Pattern parsing failed",
                    span = error.span(),
                    "error" => error,
                    "context" => self.current_context(),
                    "position" => self.tokens.position()
                );
            }
        }

        result
    }

    /// Nesting path at the current position, outermost first
    pub fn current_context(&self) -> String {
        if self.context_stack.is_empty() {
            "pattern".to_string()
        } else {
            self.context_stack.join(" -> ")
        }
    }

    pub fn depth(&self) -> usize {
        self.context_stack.len()
    }

    pub fn max_depth_reached(&self) -> usize {
        self.max_depth_reached
    }
}

impl Parser for PatternParser {
    fn current_token(&self) -> &Token {
        self.tokens.current_token()
    }

    fn current_span(&self) -> Span {
        self.tokens.current_span()
    }

    fn advance(&mut self) -> SpannedToken {
        self.tokens.advance()
    }

    fn enter_context(&mut self, context: &'static str) -> SyntaxResult<()> {
        // SECURITY: Bound recursion on deeply nested input
        if self.context_stack.len() >= MAX_PARSE_DEPTH {
            return Err(SyntaxError::MaxRecursionDepth {
                depth: MAX_PARSE_DEPTH,
                span: self.current_span(),
            });
        }

        self.context_stack.push(context);
        self.max_depth_reached = self.max_depth_reached.max(self.context_stack.len());
        Ok(())
    }

    fn exit_context(&mut self) {
        self.context_stack.pop();
    }
}

/// Parse a token stream with a fresh parser
pub fn parse_token_stream(tokens: TokenStream) -> SyntaxResult<Pattern> {
    PatternParser::new(tokens).parse()
}
