use crate::diagnostics::Diagnostic;
use crate::lexical::LexerError;
use crate::logging::Code;
use crate::syntax::SyntaxError;
use crate::utils::Span;

/// Failures that stop a pattern before an AST exists
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PipelineError {
    #[error("Lexical analysis failed: {0}")]
    LexicalAnalysis(#[from] LexerError),

    #[error("Syntax analysis failed: {0}")]
    SyntaxAnalysis(#[from] SyntaxError),
}

impl PipelineError {
    pub fn error_code(&self) -> Code {
        match self {
            Self::LexicalAnalysis(error) => error.error_code(),
            Self::SyntaxAnalysis(error) => error.error_code(),
        }
    }

    pub fn span(&self) -> Span {
        match self {
            Self::LexicalAnalysis(error) => error.span(),
            Self::SyntaxAnalysis(error) => error.span(),
        }
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            Self::LexicalAnalysis(error) => Diagnostic::from_lexer_error(error),
            Self::SyntaxAnalysis(error) => Diagnostic::from_syntax_error(error),
        }
    }
}
