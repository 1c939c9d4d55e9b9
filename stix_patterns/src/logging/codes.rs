//! Consolidated diagnostic codes and classification system
//!
//! Single source of truth for every code a validation run or the logging
//! system can emit, together with the metadata used to classify it.

use std::collections::HashMap;
use std::sync::OnceLock;

// ============================================================================
// CODE WRAPPER TYPE
// ============================================================================

/// Universal code wrapper for error, warning and success codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(transparent)]
pub struct Code(&'static str);

impl Code {
    pub const fn new(code: &'static str) -> Self {
        Self(code)
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl std::fmt::Display for Code {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// ERROR CLASSIFICATION TYPES
// ============================================================================

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Critical = 0,
    High = 1,
    Medium = 2,
    Low = 3,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "Critical",
            Severity::High => "High",
            Severity::Medium => "Medium",
            Severity::Low => "Low",
        }
    }
}

/// Complete metadata for a code
#[derive(Debug, Clone)]
pub struct ErrorMetadata {
    pub code: &'static str,
    pub category: &'static str,
    pub severity: Severity,
    pub recoverable: bool,
    pub requires_halt: bool,
    pub description: &'static str,
    pub recommended_action: &'static str,
}

impl ErrorMetadata {
    pub fn new(
        code: &'static str,
        category: &'static str,
        severity: Severity,
        recoverable: bool,
        requires_halt: bool,
        description: &'static str,
        recommended_action: &'static str,
    ) -> Self {
        Self {
            code,
            category,
            severity,
            recoverable,
            requires_halt,
            description,
            recommended_action,
        }
    }
}

// ============================================================================
// ERROR CODE CONSTANTS
// ============================================================================

/// System error codes
pub mod system {
    use super::Code;

    pub const INTERNAL_ERROR: Code = Code::new("ERR001");
}

/// Lexical analysis error codes
pub mod lexical {
    use super::Code;

    pub const INVALID_CHARACTER: Code = Code::new("E020");
    pub const UNTERMINATED_LITERAL: Code = Code::new("E021");
    pub const IDENTIFIER_TOO_LONG: Code = Code::new("E023");
    pub const STRING_TOO_LARGE: Code = Code::new("E024");
    pub const PATTERN_TOO_LONG: Code = Code::new("E026");
    pub const TOO_MANY_TOKENS: Code = Code::new("E027");
}

/// Syntax analysis error codes
pub mod syntax {
    use super::Code;

    pub const UNEXPECTED_END_OF_INPUT: Code = Code::new("E040");
    pub const EMPTY_PATTERN: Code = Code::new("E041");
    pub const UNMATCHED_DELIMITER: Code = Code::new("E042");
    pub const GRAMMAR_VIOLATION: Code = Code::new("E043");
    pub const UNEXPECTED_TOKEN: Code = Code::new("E050");
    pub const MAX_RECURSION_DEPTH: Code = Code::new("E087");
}

/// Literal format error codes
pub mod literal {
    use super::Code;

    pub const INVALID_NUMBER: Code = Code::new("E100");
    pub const INVALID_HEX: Code = Code::new("E101");
    pub const INVALID_BINARY: Code = Code::new("E102");
    pub const INVALID_TIMESTAMP: Code = Code::new("E103");
    pub const INVALID_STRING: Code = Code::new("E104");
    pub const INVALID_BOOLEAN: Code = Code::new("E105");
    pub const UNQUOTED_STRING: Code = Code::new("E106");
    pub const EMPTY_LIST: Code = Code::new("E107");
    pub const HETEROGENEOUS_LIST: Code = Code::new("E108");
    pub const LIST_TOO_LONG: Code = Code::new("E109");
    pub const UNSUPPORTED_LITERAL: Code = Code::new("E110");
}

/// Semantic analysis error codes
pub mod semantic {
    use super::Code;

    pub const OPERAND_SHAPE_MISMATCH: Code = Code::new("E180");
    pub const ILLEGAL_NEGATION: Code = Code::new("E181");
    pub const INVALID_QUALIFIER_VALUE: Code = Code::new("E182");
    pub const DUPLICATE_QUALIFIER: Code = Code::new("E183");
    pub const INVALID_TIME_WINDOW: Code = Code::new("E184");
    pub const MISSING_WITHIN: Code = Code::new("E185");
    pub const INVALID_SUBSET_OPERAND: Code = Code::new("E186");
    pub const ERROR_LIMIT_REACHED: Code = Code::new("E189");
}

/// Warning codes
pub mod warnings {
    use super::Code;

    pub const MISSING_WITHIN: Code = Code::new("W185");
}

// ============================================================================
// SUCCESS CODE CONSTANTS
// ============================================================================

/// Success codes
pub mod success {
    use super::Code;

    pub const SYSTEM_INITIALIZATION_COMPLETED: Code = Code::new("I004");
    pub const TOKENIZATION_COMPLETE: Code = Code::new("I020");
    pub const AST_CONSTRUCTION_COMPLETE: Code = Code::new("I040");
    pub const SEMANTIC_ANALYSIS_COMPLETE: Code = Code::new("I070");
    pub const PATTERN_ACCEPTED: Code = Code::new("I090");
}

// ============================================================================
// ERROR METADATA REGISTRY
// ============================================================================

static ERROR_REGISTRY: OnceLock<HashMap<&'static str, ErrorMetadata>> = OnceLock::new();

fn get_error_registry() -> &'static HashMap<&'static str, ErrorMetadata> {
    ERROR_REGISTRY.get_or_init(|| {
        let mut registry = HashMap::new();
        let mut add = |metadata: ErrorMetadata| {
            registry.insert(metadata.code, metadata);
        };

        // System errors
        add(ErrorMetadata::new(
            "ERR001",
            "System",
            Severity::Critical,
            false,
            true,
            "Critical internal validator error",
            "File a bug report with the pattern that triggered it",
        ));

        // Lexical errors
        add(ErrorMetadata::new(
            "E020",
            "Lexical",
            Severity::High,
            false,
            true,
            "Character not allowed in a STIX pattern",
            "Remove the character or enclose it in a quoted string",
        ));
        add(ErrorMetadata::new(
            "E021",
            "Lexical",
            Severity::High,
            false,
            true,
            "String or typed literal is missing its closing quote",
            "Add the closing single quote",
        ));
        add(ErrorMetadata::new(
            "E023",
            "Lexical",
            Severity::Medium,
            false,
            true,
            "Identifier exceeds the maximum length",
            "Shorten the object type or property name",
        ));
        add(ErrorMetadata::new(
            "E024",
            "Lexical",
            Severity::Medium,
            false,
            true,
            "String literal exceeds the maximum size",
            "Shorten the literal",
        ));
        add(ErrorMetadata::new(
            "E026",
            "Lexical",
            Severity::Medium,
            false,
            true,
            "Pattern exceeds the maximum length",
            "Split the pattern into smaller patterns",
        ));
        add(ErrorMetadata::new(
            "E027",
            "Lexical",
            Severity::Medium,
            false,
            true,
            "Pattern contains too many tokens",
            "Split the pattern into smaller patterns",
        ));

        // Syntax errors
        add(ErrorMetadata::new(
            "E040",
            "Syntax",
            Severity::High,
            false,
            true,
            "Pattern ended before the expression was complete",
            "Complete the expression or close open brackets",
        ));
        add(ErrorMetadata::new(
            "E041",
            "Syntax",
            Severity::High,
            false,
            true,
            "Pattern is empty",
            "Provide at least one observation expression",
        ));
        add(ErrorMetadata::new(
            "E042",
            "Syntax",
            Severity::High,
            false,
            true,
            "Bracket or parenthesis is not balanced",
            "Add the matching closing delimiter",
        ));
        add(ErrorMetadata::new(
            "E043",
            "Syntax",
            Severity::High,
            false,
            true,
            "Pattern violates the STIX patterning grammar",
            "Check the expression against the patterning grammar",
        ));
        add(ErrorMetadata::new(
            "E050",
            "Syntax",
            Severity::High,
            false,
            true,
            "Unexpected token",
            "Check the token at the reported position",
        ));
        add(ErrorMetadata::new(
            "E087",
            "Syntax",
            Severity::High,
            false,
            true,
            "Expression nesting exceeds the maximum depth",
            "Reduce the nesting of brackets and parentheses",
        ));

        // Literal errors
        add(ErrorMetadata::new(
            "E100",
            "Literal",
            Severity::Medium,
            true,
            false,
            "Malformed numeric literal",
            "Use digits with an optional sign and fraction, or quote the value",
        ));
        add(ErrorMetadata::new(
            "E101",
            "Literal",
            Severity::Medium,
            true,
            false,
            "Malformed hex literal",
            "Use an even number of hex digits inside h'...'",
        ));
        add(ErrorMetadata::new(
            "E102",
            "Literal",
            Severity::Medium,
            true,
            false,
            "Malformed binary literal",
            "Use base64 content inside b'...'",
        ));
        add(ErrorMetadata::new(
            "E103",
            "Literal",
            Severity::Medium,
            true,
            false,
            "Malformed timestamp literal",
            "Use an RFC 3339 date-time with Z or an offset inside t'...'",
        ));
        add(ErrorMetadata::new(
            "E104",
            "Literal",
            Severity::Medium,
            true,
            false,
            "Malformed string literal",
            "Escape inner quotes and backslashes",
        ));
        add(ErrorMetadata::new(
            "E105",
            "Literal",
            Severity::Medium,
            true,
            false,
            "Malformed boolean literal",
            "Use true or false",
        ));
        add(ErrorMetadata::new(
            "E106",
            "Literal",
            Severity::Medium,
            true,
            false,
            "String value is not enclosed in single quotes",
            "Enclose the value in single quotes",
        ));
        add(ErrorMetadata::new(
            "E107",
            "Literal",
            Severity::Medium,
            true,
            false,
            "Literal list is empty",
            "Provide at least one element",
        ));
        add(ErrorMetadata::new(
            "E108",
            "Literal",
            Severity::Medium,
            true,
            false,
            "Literal list mixes element kinds",
            "Use elements of a single kind",
        ));
        add(ErrorMetadata::new(
            "E109",
            "Literal",
            Severity::Medium,
            true,
            false,
            "Literal list has too many elements",
            "Split the comparison",
        ));
        add(ErrorMetadata::new(
            "E110",
            "Literal",
            Severity::Medium,
            true,
            false,
            "Literal form is not supported",
            "Use a quoted string or typed literal",
        ));

        // Semantic errors
        add(ErrorMetadata::new(
            "E180",
            "Semantic",
            Severity::Medium,
            true,
            false,
            "Operand shape is not allowed for the operator",
            "Check the operator's allowed operand kinds",
        ));
        add(ErrorMetadata::new(
            "E181",
            "Semantic",
            Severity::Medium,
            true,
            false,
            "NOT is only allowed before ISSUBSET or ISSUPERSET",
            "Use != or remove NOT",
        ));
        add(ErrorMetadata::new(
            "E182",
            "Semantic",
            Severity::Medium,
            true,
            false,
            "Qualifier argument is out of range",
            "Use a positive WITHIN value and a positive integer REPEATS count",
        ));
        add(ErrorMetadata::new(
            "E183",
            "Semantic",
            Severity::Medium,
            true,
            false,
            "Qualifier appears more than once on an observation expression",
            "Remove the duplicate qualifier",
        ));
        add(ErrorMetadata::new(
            "E184",
            "Semantic",
            Severity::Medium,
            true,
            false,
            "START timestamp is not before STOP timestamp",
            "Swap or correct the timestamps",
        ));
        add(ErrorMetadata::new(
            "E185",
            "Semantic",
            Severity::Medium,
            true,
            false,
            "FOLLOWEDBY is not bounded by a WITHIN qualifier",
            "Add WITHIN to the final operand or to an enclosing group",
        ));
        add(ErrorMetadata::new(
            "E186",
            "Semantic",
            Severity::Medium,
            true,
            false,
            "Subset operand is not an address with a prefix length",
            "Use an IPv4 or IPv6 network such as '10.0.0.0/8'",
        ));
        add(ErrorMetadata::new(
            "E189",
            "Semantic",
            Severity::High,
            false,
            true,
            "Too many diagnostics; collection stopped",
            "Fix the reported errors and validate again",
        ));

        // Warnings
        add(ErrorMetadata::new(
            "W185",
            "Semantic",
            Severity::Low,
            true,
            false,
            "FOLLOWEDBY is not bounded by a WITHIN qualifier",
            "Add WITHIN to the final operand or to an enclosing group",
        ));

        registry
    })
}

// ============================================================================
// CLASSIFICATION FUNCTIONS
// ============================================================================

pub fn get_error_metadata(code: &str) -> Option<&'static ErrorMetadata> {
    get_error_registry().get(code)
}

pub fn get_severity(code: &str) -> Severity {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.severity)
        .unwrap_or(Severity::Medium)
}

pub fn is_recoverable(code: &str) -> bool {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.recoverable)
        .unwrap_or(true)
}

pub fn requires_halt(code: &str) -> bool {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.requires_halt)
        .unwrap_or(false)
}

pub fn get_description(code: &str) -> &'static str {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.description)
        .unwrap_or("Unknown error")
}

pub fn get_action(code: &str) -> &'static str {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.recommended_action)
        .unwrap_or("No specific action available")
}

pub fn get_category(code: &str) -> &'static str {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.category)
        .unwrap_or("Unknown")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_codes_have_metadata() {
        for code in [
            lexical::INVALID_CHARACTER,
            syntax::UNEXPECTED_TOKEN,
            literal::UNQUOTED_STRING,
            semantic::OPERAND_SHAPE_MISMATCH,
            warnings::MISSING_WITHIN,
        ] {
            assert!(get_error_metadata(code.as_str()).is_some(), "{}", code);
        }
    }

    #[test]
    fn test_classification() {
        assert_eq!(get_category("E021"), "Lexical");
        assert_eq!(get_category("E106"), "Literal");
        assert!(requires_halt("E050"));
        assert!(!requires_halt("E180"));
        assert_eq!(get_severity("W185"), Severity::Low);
    }

    #[test]
    fn test_unknown_code_fallbacks() {
        assert_eq!(get_description("Z999"), "Unknown error");
        assert_eq!(get_action("Z999"), "No specific action available");
        assert_eq!(get_category("Z999"), "Unknown");
        assert!(is_recoverable("Z999"));
    }
}
