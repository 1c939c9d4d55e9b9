//! STIX Patterning language validator
//!
//! `validate` runs a pattern through the lexer, parser, literal validator and
//! semantic checker and returns a [`Report`] with every diagnostic found.

// Internal modules
pub mod config;
pub mod diagnostics;
pub mod grammar;
pub mod lexical;
pub mod literals;
#[macro_use]
pub mod logging;
pub mod pipeline;
pub mod semantic_analysis;
pub mod syntax;
pub mod tokens;
pub mod utils;

// Re-export key types for library consumers
pub use config::{RuntimeConfig, ValidatorOptions};
pub use diagnostics::{Diagnostic, DiagnosticSeverity, Report, Stage};
pub use grammar::ast::nodes::Pattern;
pub use pipeline::{parse_pattern, validate, validate_pattern, PipelineError};
pub use semantic_analysis::check;
pub use utils::{Position, Span};
