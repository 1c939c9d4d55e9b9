//! Semantic analysis error types
//!
//! Each variant maps to one E18x code and is pinned to the node that broke
//! the rule.

use crate::config::constants::compile_time::semantic::MAX_ERROR_MESSAGE_LENGTH;
use crate::grammar::ast::nodes::{Operator, QualifierKind};
use crate::logging::{codes, Code};
use crate::utils::Span;
use thiserror::Error;

pub type SemanticResult<T> = Result<T, SemanticError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SemanticError {
    /// Operand shape does not fit the operator (E180)
    #[error("Operator {} expects {expected}, found {found}", .operator.as_str())]
    OperandShapeMismatch {
        operator: Operator,
        expected: &'static str,
        found: String,
        span: Span,
    },

    /// NOT before an operator that cannot be negated (E181)
    #[error("NOT cannot be applied to {}; only ISSUBSET and ISSUPERSET accept it", .operator.as_str())]
    IllegalNegation { operator: Operator, span: Span },

    /// Qualifier argument out of range (E182)
    #[error("Invalid {} value '{value}': {reason}", .qualifier.as_str())]
    InvalidQualifierValue {
        qualifier: QualifierKind,
        value: String,
        reason: String,
        span: Span,
    },

    /// Same qualifier twice on one observation expression (E183)
    #[error("Duplicate {} qualifier on the same observation expression", .qualifier.as_str())]
    DuplicateQualifier { qualifier: QualifierKind, span: Span },

    /// START is not before STOP (E184)
    #[error("Invalid time window: START {start} is not before STOP {stop}")]
    InvalidTimeWindow {
        start: String,
        stop: String,
        span: Span,
    },

    /// FOLLOWEDBY without a governing WITHIN (E185 / W185)
    #[error("FOLLOWEDBY requires a WITHIN qualifier on the enclosing group or on its final observation")]
    MissingWithin { span: Span },

    /// ISSUBSET / ISSUPERSET operand is not an address with a prefix (E186)
    #[error("Operator {} needs an address/prefix value, found '{value}': {reason}", .operator.as_str())]
    InvalidSubsetOperand {
        operator: Operator,
        value: String,
        reason: String,
        span: Span,
    },
}

impl SemanticError {
    pub fn error_code(&self) -> Code {
        match self {
            Self::OperandShapeMismatch { .. } => codes::semantic::OPERAND_SHAPE_MISMATCH,
            Self::IllegalNegation { .. } => codes::semantic::ILLEGAL_NEGATION,
            Self::InvalidQualifierValue { .. } => codes::semantic::INVALID_QUALIFIER_VALUE,
            Self::DuplicateQualifier { .. } => codes::semantic::DUPLICATE_QUALIFIER,
            Self::InvalidTimeWindow { .. } => codes::semantic::INVALID_TIME_WINDOW,
            Self::MissingWithin { .. } => codes::semantic::MISSING_WITHIN,
            Self::InvalidSubsetOperand { .. } => codes::semantic::INVALID_SUBSET_OPERAND,
        }
    }

    /// Code used when the rule is reported as a warning instead of an error
    pub fn warning_code(&self) -> Code {
        match self {
            Self::MissingWithin { .. } => codes::warnings::MISSING_WITHIN,
            _ => self.error_code(),
        }
    }

    pub fn error_type(&self) -> &'static str {
        match self {
            Self::OperandShapeMismatch { .. } => "OperandShapeMismatch",
            Self::IllegalNegation { .. } => "IllegalNegation",
            Self::InvalidQualifierValue { .. } => "InvalidQualifierValue",
            Self::DuplicateQualifier { .. } => "DuplicateQualifier",
            Self::InvalidTimeWindow { .. } => "InvalidTimeWindow",
            Self::MissingWithin { .. } => "MissingWithin",
            Self::InvalidSubsetOperand { .. } => "InvalidSubsetOperand",
        }
    }

    pub fn span(&self) -> Span {
        match self {
            Self::OperandShapeMismatch { span, .. }
            | Self::IllegalNegation { span, .. }
            | Self::InvalidQualifierValue { span, .. }
            | Self::DuplicateQualifier { span, .. }
            | Self::InvalidTimeWindow { span, .. }
            | Self::MissingWithin { span }
            | Self::InvalidSubsetOperand { span, .. } => *span,
        }
    }

    pub fn invalid_qualifier_value(
        qualifier: QualifierKind,
        value: &str,
        reason: &str,
        span: Span,
    ) -> Self {
        Self::InvalidQualifierValue {
            qualifier,
            value: Self::truncate(value),
            reason: reason.to_string(),
            span,
        }
    }

    pub fn invalid_subset_operand(operator: Operator, value: &str, reason: &str, span: Span) -> Self {
        Self::InvalidSubsetOperand {
            operator,
            value: Self::truncate(value),
            reason: reason.to_string(),
            span,
        }
    }

    // SECURITY: echoed user text is bounded
    fn truncate(text: &str) -> String {
        if text.len() <= MAX_ERROR_MESSAGE_LENGTH {
            return text.to_string();
        }
        let mut cut = MAX_ERROR_MESSAGE_LENGTH;
        while !text.is_char_boundary(cut) {
            cut -= 1;
        }
        format!("{}...", &text[..cut])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_and_messages() {
        let error = SemanticError::IllegalNegation {
            operator: Operator::Equal,
            span: Span::default(),
        };
        assert_eq!(error.error_code(), codes::semantic::ILLEGAL_NEGATION);
        assert!(error.to_string().contains("NOT cannot be applied to ="));

        let error = SemanticError::MissingWithin {
            span: Span::default(),
        };
        assert_eq!(error.error_code(), codes::semantic::MISSING_WITHIN);
        assert_eq!(error.warning_code(), codes::warnings::MISSING_WITHIN);

        let error = SemanticError::invalid_qualifier_value(
            QualifierKind::Repeats,
            "0",
            "must be a positive integer",
            Span::default(),
        );
        assert_eq!(
            error.to_string(),
            "Invalid REPEATS value '0': must be a positive integer"
        );
    }

    #[test]
    fn test_long_values_are_truncated() {
        let value = "1".repeat(MAX_ERROR_MESSAGE_LENGTH * 2);
        let error = SemanticError::invalid_subset_operand(
            Operator::IsSubset,
            &value,
            "no prefix",
            Span::default(),
        );
        assert_matches::assert_matches!(
            error,
            SemanticError::InvalidSubsetOperand { value, .. } if value.len() == MAX_ERROR_MESSAGE_LENGTH + 3
        );
    }
}
