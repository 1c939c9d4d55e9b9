//! Semantic analysis of a parsed pattern
//!
//! A single walk over the AST validates literal formats, operator/operand
//! compatibility, NOT placement, qualifier arguments and the FOLLOWEDBY
//! WITHIN rule. Diagnostics are collected in the order the walk meets them,
//! which is source order.

pub mod checker;
pub mod qualifiers;
pub mod types;

pub use types::{SemanticError, SemanticResult};

use crate::config::constants::compile_time::semantic::*;
use crate::config::ValidatorOptions;
use crate::diagnostics::{Diagnostic, DiagnosticCollector, Stage};
use crate::grammar::ast::nodes::{ComparisonExpr, ObservationExpr, ObservationOp, Pattern, Qualifier};
use crate::logging::codes;
use crate::utils::Span;
use crate::{log_debug, log_info, log_success};

pub struct SemanticAnalyzer {
    options: ValidatorOptions,
    sink: DiagnosticCollector,
    tests_checked: usize,
}

impl SemanticAnalyzer {
    pub fn new(options: &ValidatorOptions) -> Self {
        Self {
            options: *options,
            sink: DiagnosticCollector::new(options),
            tests_checked: 0,
        }
    }

    /// Run every check over the pattern and return the collected diagnostics
    pub fn analyze(mut self, pattern: &Pattern) -> Vec<Diagnostic> {
        log_debug!("Starting semantic analysis",
            "strict_qualifiers" => self.options.strict_qualifiers,
            "collect_all_errors" => self.options.collect_all_errors,
            "max_errors_limit" => MAX_SEMANTIC_ERRORS
        );

        self.walk_observation(&pattern.expression, false);

        let halted = self.sink.is_halted();
        let error_count = self.sink.error_count();
        let diagnostics = self.sink.into_diagnostics();

        if error_count == 0 {
            log_success!(codes::success::SEMANTIC_ANALYSIS_COMPLETE,
                "Semantic analysis completed",
                "property_tests" => self.tests_checked,
                "warnings" => diagnostics.len()
            );
        } else {
            log_info!("Semantic analysis found errors",
                "error_count" => error_count,
                "stopped_early" => halted
            );
        }

        diagnostics
    }

    /// `governed` is true when an enclosing group carries WITHIN
    fn walk_observation(&mut self, expression: &ObservationExpr, governed: bool) {
        if self.sink.is_halted() {
            return;
        }

        match expression {
            ObservationExpr::Observation {
                comparison,
                qualifiers,
                ..
            } => {
                self.walk_comparison(comparison);
                qualifiers::check_qualifiers(qualifiers, &mut self.sink);
            }
            ObservationExpr::Group {
                inner, qualifiers, ..
            } => {
                let governed = governed || has_within(qualifiers);
                self.walk_observation(inner, governed);
                qualifiers::check_qualifiers(qualifiers, &mut self.sink);
            }
            ObservationExpr::Composite {
                op,
                operands,
                operator_span,
                ..
            } => {
                let missing_within = *op == ObservationOp::FollowedBy
                    && !governed
                    && !operands.last().is_some_and(ObservationExpr::has_within);

                for (index, operand) in operands.iter().enumerate() {
                    self.walk_observation(operand, governed);
                    if index == 0 && missing_within {
                        self.report_missing_within(*operator_span);
                    }
                }
            }
        }
    }

    fn walk_comparison(&mut self, comparison: &ComparisonExpr) {
        if self.sink.is_halted() {
            return;
        }

        match comparison {
            ComparisonExpr::Test(test) => {
                self.tests_checked += 1;
                checker::check_property_test(test, &mut self.sink);
            }
            ComparisonExpr::Group { inner, .. } => self.walk_comparison(inner),
            ComparisonExpr::Composite { operands, .. } => {
                for operand in operands {
                    self.walk_comparison(operand);
                }
            }
        }
    }

    fn report_missing_within(&mut self, span: Span) {
        let error = SemanticError::MissingWithin { span };
        let diagnostic = if self.options.strict_qualifiers {
            Diagnostic::from_semantic_error(&error)
        } else {
            Diagnostic::warning(error.warning_code(), Stage::Semantic, &error.to_string(), span)
        };
        self.sink.push(diagnostic);
    }
}

fn has_within(qualifiers: &[Qualifier]) -> bool {
    qualifiers.iter().any(|q| matches!(q, Qualifier::Within { .. }))
}

/// Semantic diagnostics for an already parsed pattern
pub fn check(pattern: &Pattern, options: &ValidatorOptions) -> Vec<Diagnostic> {
    SemanticAnalyzer::new(options).analyze(pattern)
}
