//! Syntax error types with error code mapping
//!
//! Every variant carries the span it is pinned to; the pipeline turns the
//! first syntax error into a single diagnostic.

use crate::logging::{codes, Code};
use crate::utils::Span;

pub type SyntaxResult<T> = Result<T, SyntaxError>;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SyntaxError {
    #[error("Unexpected token: expected {expected}, found {found}")]
    UnexpectedToken {
        expected: String,
        found: String,
        span: Span,
    },

    #[error("Unexpected end of pattern: expected {expected}")]
    UnexpectedEndOfInput { expected: String, span: Span },

    #[error("Empty pattern: expected an observation expression")]
    EmptyPattern { span: Span },

    #[error("Unmatched delimiter '{delimiter}'")]
    UnmatchedDelimiter { delimiter: char, span: Span },

    #[error("Grammar violation: {message}")]
    GrammarViolation { message: String, span: Span },

    #[error("Maximum nesting depth exceeded ({depth})")]
    MaxRecursionDepth { depth: usize, span: Span },
}

impl SyntaxError {
    pub fn unexpected_token(expected: &str, found: &str, span: Span) -> Self {
        Self::UnexpectedToken {
            expected: expected.to_string(),
            found: found.to_string(),
            span,
        }
    }

    pub fn unexpected_end_of_input(expected: &str, span: Span) -> Self {
        Self::UnexpectedEndOfInput {
            expected: expected.to_string(),
            span,
        }
    }

    pub fn grammar_violation(message: &str, span: Span) -> Self {
        Self::GrammarViolation {
            message: message.to_string(),
            span,
        }
    }

    /// Get error code for global logging system
    pub fn error_code(&self) -> Code {
        match self {
            Self::UnexpectedToken { .. } => codes::syntax::UNEXPECTED_TOKEN,
            Self::UnexpectedEndOfInput { .. } => codes::syntax::UNEXPECTED_END_OF_INPUT,
            Self::EmptyPattern { .. } => codes::syntax::EMPTY_PATTERN,
            Self::UnmatchedDelimiter { .. } => codes::syntax::UNMATCHED_DELIMITER,
            Self::GrammarViolation { .. } => codes::syntax::GRAMMAR_VIOLATION,
            Self::MaxRecursionDepth { .. } => codes::syntax::MAX_RECURSION_DEPTH,
        }
    }

    pub fn span(&self) -> Span {
        match self {
            Self::UnexpectedToken { span, .. }
            | Self::UnexpectedEndOfInput { span, .. }
            | Self::EmptyPattern { span }
            | Self::UnmatchedDelimiter { span, .. }
            | Self::GrammarViolation { span, .. }
            | Self::MaxRecursionDepth { span, .. } => *span,
        }
    }

    pub fn requires_halt(&self) -> bool {
        matches!(self, Self::MaxRecursionDepth { .. })
    }

    pub fn description(&self) -> &'static str {
        codes::get_description(self.error_code().as_str())
    }

    pub fn recommended_action(&self) -> &'static str {
        codes::get_action(self.error_code().as_str())
    }
}
