//! Qualifier checks: argument ranges, duplicates and START/STOP windows

use crate::diagnostics::{Diagnostic, DiagnosticCollector};
use crate::grammar::ast::nodes::{Literal, LiteralKind, Qualifier, QualifierKind};
use crate::literals;
use crate::semantic_analysis::types::{SemanticError, SemanticResult};
use chrono::{DateTime, FixedOffset};

/// Check the qualifiers attached to one observation expression
pub fn check_qualifiers(qualifiers: &[Qualifier], sink: &mut DiagnosticCollector) {
    let mut seen: Vec<QualifierKind> = Vec::with_capacity(qualifiers.len());

    for qualifier in qualifiers {
        let kind = qualifier.kind();
        if seen.contains(&kind) {
            sink.push(Diagnostic::from_semantic_error(
                &SemanticError::DuplicateQualifier {
                    qualifier: kind,
                    span: qualifier.span(),
                },
            ));
        } else {
            seen.push(kind);
        }

        for error in check_qualifier(qualifier) {
            sink.push(Diagnostic::from_semantic_error(&error));
        }
    }
}

/// Argument rules for a single qualifier, in source order
pub fn check_qualifier(qualifier: &Qualifier) -> Vec<SemanticError> {
    match qualifier {
        Qualifier::Within { value, .. } => check_within(value).err().into_iter().collect(),
        Qualifier::Repeats { count, .. } => check_repeats(count).err().into_iter().collect(),
        Qualifier::StartStop { start, stop, span } => {
            match (parse_time(start), parse_time(stop)) {
                (Ok(start_time), Ok(stop_time)) if start_time < stop_time => Vec::new(),
                (Ok(_), Ok(_)) => vec![SemanticError::InvalidTimeWindow {
                    start: start.body().to_string(),
                    stop: stop.body().to_string(),
                    span: *span,
                }],
                (start_result, stop_result) => [start_result.err(), stop_result.err()]
                    .into_iter()
                    .flatten()
                    .collect(),
            }
        }
    }
}

/// WITHIN takes a number greater than zero
fn check_within(value: &Literal) -> SemanticResult<()> {
    let invalid = |reason: &str| {
        SemanticError::invalid_qualifier_value(QualifierKind::Within, &value.raw, reason, value.span)
    };

    literals::validate(value).map_err(|_| invalid("not a number"))?;

    match value.raw.parse::<f64>() {
        Ok(seconds) if seconds > 0.0 => Ok(()),
        _ => Err(invalid("must be greater than zero")),
    }
}

/// REPEATS takes an integer greater than zero
fn check_repeats(count: &Literal) -> SemanticResult<()> {
    let digits = count.raw.strip_prefix('+').unwrap_or(&count.raw);
    let is_integer = !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit());

    if is_integer && digits.bytes().any(|b| b != b'0') {
        Ok(())
    } else {
        Err(SemanticError::invalid_qualifier_value(
            QualifierKind::Repeats,
            &count.raw,
            "must be a positive integer",
            count.span,
        ))
    }
}

/// START/STOP accept `t'...'` or a quoted string holding the same date-time
fn parse_time(literal: &Literal) -> SemanticResult<DateTime<FixedOffset>> {
    let invalid = |reason: &str| {
        SemanticError::invalid_qualifier_value(
            QualifierKind::StartStop,
            &literal.raw,
            reason,
            literal.span,
        )
    };

    match literal.kind {
        LiteralKind::Timestamp | LiteralKind::String => {
            literals::parse_timestamp(literal.body()).map_err(|reason| invalid(&reason))
        }
        _ => Err(invalid("expected a timestamp")),
    }
}
