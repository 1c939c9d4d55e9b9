//! Top-level validation: text -> tokens -> AST -> diagnostics -> report
//!
//! Lexical and syntax failures short-circuit with a single diagnostic since
//! no AST exists to analyze. Literal and semantic diagnostics are collected
//! in one walk.

mod error;

pub use error::PipelineError;

use crate::config::ValidatorOptions;
use crate::diagnostics::Report;
use crate::grammar::ast::nodes::Pattern;
use crate::logging::codes;
use crate::{lexical, semantic_analysis, syntax};
use crate::{log_debug, log_success};

/// Lex and parse only
pub fn parse_pattern(text: &str) -> Result<Pattern, PipelineError> {
    let tokens = lexical::tokenize(text)?;
    let pattern = syntax::parse(tokens)?;
    Ok(pattern)
}

/// Run the full pipeline and report every diagnostic
pub fn validate(text: &str, options: &ValidatorOptions) -> Report {
    log_debug!("Starting pattern validation", "length" => text.len());

    let pattern = match parse_pattern(text) {
        Ok(pattern) => pattern,
        Err(error) => return Report::rejected(error.to_diagnostic()),
    };

    let report = Report::new(semantic_analysis::check(&pattern, options));

    if report.accepted {
        log_success!(codes::success::PATTERN_ACCEPTED,
            "Pattern accepted",
            "warnings" => report.warnings().count()
        );
    }

    report
}

/// Accept/reject with default options
pub fn validate_pattern(text: &str) -> bool {
    validate(text, &ValidatorOptions::default()).accepted
}
