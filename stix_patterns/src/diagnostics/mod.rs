//! Diagnostics and the validation report
//!
//! Every stage error is converted into a [`Diagnostic`] carrying its code,
//! stage and span. A [`Report`] is the single result of a validation run.

use crate::config::constants::compile_time::semantic::*;
use crate::config::ValidatorOptions;
use crate::lexical::LexerError;
use crate::literals::LiteralError;
use crate::logging::{codes, Code};
use crate::semantic_analysis::SemanticError;
use crate::syntax::SyntaxError;
use crate::utils::{Position, SourceMap, Span};
use crate::log_error;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticSeverity {
    Error,
    Warning,
}

impl DiagnosticSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
        }
    }
}

/// Stage of the pipeline that produced a diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Lexical,
    Syntax,
    Literal,
    Semantic,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Lexical => "lexical",
            Self::Syntax => "syntax",
            Self::Literal => "literal",
            Self::Semantic => "semantic",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnostic {
    pub code: Code,
    pub severity: DiagnosticSeverity,
    pub stage: Stage,
    pub message: String,
    pub span: Span,
}

impl Diagnostic {
    pub fn error(code: Code, stage: Stage, message: &str, span: Span) -> Self {
        Self {
            code,
            severity: DiagnosticSeverity::Error,
            stage,
            message: truncate_message(message),
            span,
        }
    }

    pub fn warning(code: Code, stage: Stage, message: &str, span: Span) -> Self {
        Self {
            severity: DiagnosticSeverity::Warning,
            ..Self::error(code, stage, message, span)
        }
    }

    pub fn from_lexer_error(error: &LexerError) -> Self {
        Self::error(
            error.error_code(),
            Stage::Lexical,
            &error.to_string(),
            error.span(),
        )
    }

    pub fn from_syntax_error(error: &SyntaxError) -> Self {
        Self::error(
            error.error_code(),
            Stage::Syntax,
            &error.to_string(),
            error.span(),
        )
    }

    /// Literal errors carry no location of their own; the caller supplies the literal's span
    pub fn from_literal_error(error: &LiteralError, span: Span) -> Self {
        Self::error(error.error_code(), Stage::Literal, &error.to_string(), span)
    }

    pub fn from_semantic_error(error: &SemanticError) -> Self {
        Self::error(
            error.error_code(),
            Stage::Semantic,
            &error.to_string(),
            error.span(),
        )
    }

    /// Start of the offending substring
    pub fn position(&self) -> Position {
        self.span.start
    }

    pub fn is_error(&self) -> bool {
        self.severity == DiagnosticSeverity::Error
    }

    pub fn description(&self) -> &'static str {
        codes::get_description(self.code.as_str())
    }

    pub fn recommended_action(&self) -> &'static str {
        codes::get_action(self.code.as_str())
    }

    /// Cargo-style rendering against the validated source
    pub fn render(&self, source_map: &SourceMap) -> String {
        let label = format!("{}[{}]", self.severity.as_str(), self.code);
        source_map.format_error(&label, &self.span, &self.message)
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}[{}] at {}: {}",
            self.severity.as_str(),
            self.code,
            self.span.start,
            self.message
        )
    }
}

fn truncate_message(message: &str) -> String {
    if message.len() <= MAX_ERROR_MESSAGE_LENGTH {
        return message.to_string();
    }

    let mut cut = MAX_ERROR_MESSAGE_LENGTH;
    while !message.is_char_boundary(cut) {
        cut -= 1;
    }
    format!("{}...", &message[..cut])
}

// ============================================================================
// REPORT
// ============================================================================

/// Outcome of one validation run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    /// True iff no diagnostic has error severity
    pub accepted: bool,
    pub diagnostics: Vec<Diagnostic>,
}

impl Report {
    pub fn new(diagnostics: Vec<Diagnostic>) -> Self {
        Self {
            accepted: !diagnostics.iter().any(Diagnostic::is_error),
            diagnostics,
        }
    }

    /// Report for a run that stopped at a single lexical or syntax failure
    pub fn rejected(diagnostic: Diagnostic) -> Self {
        Self::new(vec![diagnostic])
    }

    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| d.is_error())
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| !d.is_error())
    }

    pub fn error_count(&self) -> usize {
        self.errors().count()
    }

    pub fn has_code(&self, code: Code) -> bool {
        self.diagnostics.iter().any(|d| d.code == code)
    }

    /// Render every diagnostic with source context, one block per diagnostic
    pub fn render(&self, source: &str) -> String {
        let source_map = SourceMap::new(source);
        self.diagnostics
            .iter()
            .map(|diagnostic| diagnostic.render(&source_map))
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

// ============================================================================
// COLLECTOR
// ============================================================================

/// Accumulates literal and semantic diagnostics under the configured limits.
///
/// With `collect_all_errors` off, collection halts after the first error.
/// In any case it halts once `MAX_SEMANTIC_ERRORS` errors are held, after
/// appending one limit-reached diagnostic.
#[derive(Debug)]
pub struct DiagnosticCollector {
    diagnostics: Vec<Diagnostic>,
    collect_all: bool,
    error_count: usize,
    halted: bool,
}

impl DiagnosticCollector {
    pub fn new(options: &ValidatorOptions) -> Self {
        Self {
            diagnostics: Vec::new(),
            collect_all: options.collect_all_errors,
            error_count: 0,
            halted: false,
        }
    }

    /// Record a diagnostic; ignored once collection has halted
    pub fn push(&mut self, diagnostic: Diagnostic) {
        if self.halted {
            return;
        }

        let is_error = diagnostic.is_error();
        let span = diagnostic.span;
        self.diagnostics.push(diagnostic);

        if !is_error {
            return;
        }

        self.error_count += 1;
        if !self.collect_all {
            self.halted = true;
        } else if self.error_count >= MAX_SEMANTIC_ERRORS {
            // SECURITY: bound the report size on adversarial input
            log_error!(codes::semantic::ERROR_LIMIT_REACHED,
                "Error collection limit reached",
                "max_errors" => MAX_SEMANTIC_ERRORS
            );
            self.diagnostics.push(Diagnostic::error(
                codes::semantic::ERROR_LIMIT_REACHED,
                Stage::Semantic,
                &format!(
                    "Error limit reached: stopped after {} errors",
                    MAX_SEMANTIC_ERRORS
                ),
                span,
            ));
            self.halted = true;
        }
    }

    pub fn is_halted(&self) -> bool {
        self.halted
    }

    pub fn error_count(&self) -> usize {
        self.error_count
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::Position;

    fn span_at(offset: usize, len: usize) -> Span {
        Span::new(
            Position::new(offset, 1, offset as u32 + 1),
            Position::new(offset + len, 1, (offset + len) as u32 + 1),
        )
    }

    fn semantic_error(offset: usize) -> Diagnostic {
        Diagnostic::error(
            codes::semantic::OPERAND_SHAPE_MISMATCH,
            Stage::Semantic,
            "bad operand",
            span_at(offset, 1),
        )
    }

    #[test]
    fn test_report_acceptance_ignores_warnings() {
        let warning = Diagnostic::warning(
            codes::warnings::MISSING_WITHIN,
            Stage::Semantic,
            "FOLLOWEDBY without WITHIN",
            span_at(10, 10),
        );
        let report = Report::new(vec![warning]);
        assert!(report.accepted);
        assert_eq!(report.warnings().count(), 1);
        assert_eq!(report.error_count(), 0);

        let report = Report::new(vec![semantic_error(3)]);
        assert!(!report.accepted);
        assert!(report.has_code(codes::semantic::OPERAND_SHAPE_MISMATCH));
    }

    #[test]
    fn test_message_truncation() {
        let long = "é".repeat(MAX_ERROR_MESSAGE_LENGTH);
        let diagnostic = Diagnostic::error(
            codes::literal::INVALID_STRING,
            Stage::Literal,
            &long,
            Span::default(),
        );
        assert!(diagnostic.message.len() <= MAX_ERROR_MESSAGE_LENGTH + 3);
        assert!(diagnostic.message.ends_with("..."));
    }

    #[test]
    fn test_render_points_at_span() {
        let source = "[file:name MATCHES /x/]";
        let diagnostic = semantic_error(19);
        let report = Report::rejected(diagnostic.clone());

        let rendered = report.render(source);
        assert!(rendered.starts_with("error[E180]: bad operand"));
        assert!(rendered.contains("--> 1:20"));
        assert!(rendered.contains(source));
        assert_eq!(diagnostic.to_string(), "error[E180] at 1:20: bad operand");
        assert_eq!(diagnostic.position().offset, 19);
    }

    #[test]
    fn test_json_output() {
        let report = Report::rejected(semantic_error(0));
        let json = report.to_json().expect("serializes");
        let value: serde_json::Value = serde_json::from_str(&json).expect("valid json");
        assert_eq!(value["accepted"], false);
        assert_eq!(value["diagnostics"][0]["code"], "E180");
        assert_eq!(value["diagnostics"][0]["severity"], "error");
        assert_eq!(value["diagnostics"][0]["stage"], "semantic");
        assert_eq!(value["diagnostics"][0]["span"]["start"]["offset"], 0);
    }

    #[test]
    fn test_collector_stops_at_first_error_when_asked() {
        let options = ValidatorOptions {
            collect_all_errors: false,
            ..ValidatorOptions::default()
        };
        let mut collector = DiagnosticCollector::new(&options);
        collector.push(Diagnostic::warning(
            codes::warnings::MISSING_WITHIN,
            Stage::Semantic,
            "warning first",
            Span::default(),
        ));
        assert!(!collector.is_halted());

        collector.push(semantic_error(1));
        collector.push(semantic_error(2));
        assert!(collector.is_halted());
        assert_eq!(collector.into_diagnostics().len(), 2);
    }

    #[test]
    fn test_collector_error_limit() {
        let mut collector = DiagnosticCollector::new(&ValidatorOptions::default());
        for offset in 0..MAX_SEMANTIC_ERRORS + 10 {
            collector.push(semantic_error(offset));
        }
        assert!(collector.is_halted());
        assert_eq!(collector.error_count(), MAX_SEMANTIC_ERRORS);

        let diagnostics = collector.into_diagnostics();
        assert_eq!(diagnostics.len(), MAX_SEMANTIC_ERRORS + 1);
        assert_eq!(
            diagnostics.last().map(|d| d.code),
            Some(codes::semantic::ERROR_LIMIT_REACHED)
        );
    }
}
