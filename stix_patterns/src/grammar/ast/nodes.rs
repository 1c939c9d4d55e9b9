//! AST node definitions for STIX patterns
//!
//! Every node carries the span of the source text it was built from so that
//! literal and semantic diagnostics can point at the offending substring.
//! Chains of the same operator are flattened into one n-ary node whose
//! operands keep source order.

use crate::utils::{Span, Spanned};
use serde::{Deserialize, Serialize};
use std::fmt;

// === PATTERN ===

/// Root of a parsed pattern
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pattern {
    pub expression: ObservationExpr,
    pub span: Span,
}

impl Pattern {
    /// Every property test in the pattern, in source order
    pub fn property_tests(&self) -> Vec<&PropertyTest> {
        let mut tests = Vec::new();
        self.expression.collect_tests(&mut tests);
        tests
    }
}

// === OBSERVATION EXPRESSIONS ===

/// Operators joining observation expressions, loosest first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObservationOp {
    FollowedBy,
    Or,
    And,
}

impl ObservationOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FollowedBy => "FOLLOWEDBY",
            Self::Or => "OR",
            Self::And => "AND",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ObservationExpr {
    /// `[ comparison ] qualifier*`
    Observation {
        comparison: ComparisonExpr,
        qualifiers: Vec<Qualifier>,
        span: Span,
    },
    /// `( observation_exprs ) qualifier*`
    Group {
        inner: Box<ObservationExpr>,
        qualifiers: Vec<Qualifier>,
        span: Span,
    },
    /// Two or more operands joined by the same operator
    Composite {
        op: ObservationOp,
        operands: Vec<ObservationExpr>,
        /// Span of the first operator keyword
        operator_span: Span,
        span: Span,
    },
}

impl ObservationExpr {
    pub fn span(&self) -> Span {
        match self {
            Self::Observation { span, .. } | Self::Group { span, .. } | Self::Composite { span, .. } => {
                *span
            }
        }
    }

    /// Qualifiers attached directly to this expression
    pub fn qualifiers(&self) -> &[Qualifier] {
        match self {
            Self::Observation { qualifiers, .. } | Self::Group { qualifiers, .. } => qualifiers,
            Self::Composite { .. } => &[],
        }
    }

    /// True when a WITHIN qualifier is attached directly to this expression
    pub fn has_within(&self) -> bool {
        self.qualifiers()
            .iter()
            .any(|q| matches!(q, Qualifier::Within { .. }))
    }

    fn collect_tests<'a>(&'a self, out: &mut Vec<&'a PropertyTest>) {
        match self {
            Self::Observation { comparison, .. } => comparison.collect_tests(out),
            Self::Group { inner, .. } => inner.collect_tests(out),
            Self::Composite { operands, .. } => {
                for operand in operands {
                    operand.collect_tests(out);
                }
            }
        }
    }
}

// === COMPARISON EXPRESSIONS ===

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BooleanOp {
    Or,
    And,
}

impl BooleanOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Or => "OR",
            Self::And => "AND",
        }
    }
}

/// Boolean combination of property tests inside one observation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ComparisonExpr {
    Test(PropertyTest),
    Group {
        inner: Box<ComparisonExpr>,
        span: Span,
    },
    Composite {
        op: BooleanOp,
        operands: Vec<ComparisonExpr>,
        span: Span,
    },
}

impl ComparisonExpr {
    pub fn span(&self) -> Span {
        match self {
            Self::Test(test) => test.span,
            Self::Group { span, .. } | Self::Composite { span, .. } => *span,
        }
    }

    fn collect_tests<'a>(&'a self, out: &mut Vec<&'a PropertyTest>) {
        match self {
            Self::Test(test) => out.push(test),
            Self::Group { inner, .. } => inner.collect_tests(out),
            Self::Composite { operands, .. } => {
                for operand in operands {
                    operand.collect_tests(out);
                }
            }
        }
    }
}

/// `object_path NOT? operator operand`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyTest {
    pub path: ObjectPath,
    pub operator: Spanned<Operator>,
    /// Span of a `NOT` written before the operator
    pub negation: Option<Span>,
    pub operand: Operand,
    pub span: Span,
}

// === OPERATORS ===

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    Equal,
    NotEqual,
    LessThan,
    LessThanOrEqual,
    GreaterThan,
    GreaterThanOrEqual,
    In,
    Like,
    Matches,
    IsSubset,
    IsSuperset,
}

impl Operator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Equal => "=",
            Self::NotEqual => "!=",
            Self::LessThan => "<",
            Self::LessThanOrEqual => "<=",
            Self::GreaterThan => ">",
            Self::GreaterThanOrEqual => ">=",
            Self::In => "IN",
            Self::Like => "LIKE",
            Self::Matches => "MATCHES",
            Self::IsSubset => "ISSUBSET",
            Self::IsSuperset => "ISSUPERSET",
        }
    }

    /// The six symbolic comparison operators
    pub fn is_comparison(&self) -> bool {
        matches!(
            self,
            Self::Equal
                | Self::NotEqual
                | Self::LessThan
                | Self::LessThanOrEqual
                | Self::GreaterThan
                | Self::GreaterThanOrEqual
        )
    }

    /// Operators that may be negated with `NOT`
    pub fn is_set_relation(&self) -> bool {
        matches!(self, Self::IsSubset | Self::IsSuperset)
    }
}

// === OPERANDS AND LITERALS ===

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LiteralKind {
    String,
    Number,
    Hex,
    Binary,
    Timestamp,
    Boolean,
    /// Bare word in value position; never valid
    Unquoted,
    /// `/.../`; never valid
    SlashDelimited,
}

impl LiteralKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Hex => "hex",
            Self::Binary => "binary",
            Self::Timestamp => "timestamp",
            Self::Boolean => "boolean",
            Self::Unquoted => "unquoted",
            Self::SlashDelimited => "slash-delimited",
        }
    }
}

/// A literal exactly as written, wrapper included
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Literal {
    pub kind: LiteralKind,
    pub raw: String,
    pub span: Span,
}

impl Literal {
    pub fn new(kind: LiteralKind, raw: impl Into<String>, span: Span) -> Self {
        Self {
            kind,
            raw: raw.into(),
            span,
        }
    }

    /// Text between the wrapper quotes (`h'ff'` -> `ff`); other kinds are returned whole
    pub fn body(&self) -> &str {
        let raw = self.raw.as_str();
        let inner = match self.kind {
            LiteralKind::String => raw.strip_prefix('\''),
            LiteralKind::Hex => raw.strip_prefix("h'"),
            LiteralKind::Binary => raw.strip_prefix("b'"),
            LiteralKind::Timestamp => raw.strip_prefix("t'"),
            LiteralKind::SlashDelimited => raw.strip_prefix('/'),
            _ => return raw,
        };
        let close = if self.kind == LiteralKind::SlashDelimited {
            '/'
        } else {
            '\''
        };
        inner
            .and_then(|s| s.strip_suffix(close))
            .unwrap_or(raw)
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Parenthesized, comma-separated literals; may be empty
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiteralList {
    pub items: Vec<Literal>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Operand {
    Literal(Literal),
    List(LiteralList),
}

impl Operand {
    pub fn span(&self) -> Span {
        match self {
            Self::Literal(literal) => literal.span,
            Self::List(list) => list.span,
        }
    }

    /// Shape name used in operand mismatch messages
    pub fn describe(&self) -> String {
        match self {
            Self::Literal(literal) => format!("{} literal", literal.kind.as_str()),
            Self::List(_) => "list".to_string(),
        }
    }
}

// === OBJECT PATHS ===

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PathSegment {
    Property(String),
    /// Quoted component kept with its quotes
    Quoted(String),
    /// Digits of a list index
    Index(String),
    Wildcard,
}

/// `object-type:property(.property | [index] | [*])*`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectPath {
    pub object_type: Spanned<String>,
    pub segments: Vec<Spanned<PathSegment>>,
    pub span: Span,
}

impl fmt::Display for ObjectPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:", self.object_type.value)?;
        for (i, segment) in self.segments.iter().enumerate() {
            match &segment.value {
                PathSegment::Property(name) | PathSegment::Quoted(name) => {
                    if i > 0 {
                        f.write_str(".")?;
                    }
                    f.write_str(name)?;
                }
                PathSegment::Index(index) => write!(f, "[{}]", index)?,
                PathSegment::Wildcard => f.write_str("[*]")?,
            }
        }
        Ok(())
    }
}

// === QUALIFIERS ===

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimeUnit {
    Milliseconds,
    Seconds,
    Minutes,
    Hours,
    Days,
    Months,
    Years,
}

impl TimeUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Milliseconds => "MILLISECONDS",
            Self::Seconds => "SECONDS",
            Self::Minutes => "MINUTES",
            Self::Hours => "HOURS",
            Self::Days => "DAYS",
            Self::Months => "MONTHS",
            Self::Years => "YEARS",
        }
    }
}

/// Kind of qualifier, used for duplicate detection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QualifierKind {
    Within,
    Repeats,
    StartStop,
}

impl QualifierKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Within => "WITHIN",
            Self::Repeats => "REPEATS",
            Self::StartStop => "START/STOP",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Qualifier {
    /// `WITHIN <number> <unit>`
    Within {
        value: Literal,
        unit: Spanned<TimeUnit>,
        span: Span,
    },
    /// `REPEATS <number> TIMES`
    Repeats { count: Literal, span: Span },
    /// `START <time> STOP <time>`
    StartStop {
        start: Literal,
        stop: Literal,
        span: Span,
    },
}

impl Qualifier {
    pub fn kind(&self) -> QualifierKind {
        match self {
            Self::Within { .. } => QualifierKind::Within,
            Self::Repeats { .. } => QualifierKind::Repeats,
            Self::StartStop { .. } => QualifierKind::StartStop,
        }
    }

    pub fn span(&self) -> Span {
        match self {
            Self::Within { span, .. } | Self::Repeats { span, .. } | Self::StartStop { span, .. } => {
                *span
            }
        }
    }
}

// === DISPLAY ===

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for TimeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for QualifierKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
