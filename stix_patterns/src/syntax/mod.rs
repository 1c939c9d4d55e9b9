//! Syntax analysis - token stream to AST
//!
//! Parsing stops at the first syntax error; the error carries the span of the
//! token where the grammar could not continue.

pub mod error;
pub mod parser;

pub use error::{SyntaxError, SyntaxResult};
pub use parser::{parse_token_stream, PatternParser};

use crate::grammar::ast::nodes::Pattern;
use crate::tokens::TokenStream;
use crate::log_debug;

/// Parse a token stream into a pattern AST
pub fn parse(token_stream: TokenStream) -> SyntaxResult<Pattern> {
    log_debug!("Starting syntax analysis", "tokens" => token_stream.len());
    parse_token_stream(token_stream)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::constants::compile_time::syntax::MAX_PARSE_DEPTH;
    use crate::grammar::ast::nodes::*;
    use crate::lexical::tokenize;
    use assert_matches::assert_matches;

    fn parse_str(source: &str) -> SyntaxResult<Pattern> {
        parse(tokenize(source).expect("pattern should tokenize"))
    }

    fn parse_ok(source: &str) -> Pattern {
        parse_str(source).unwrap_or_else(|e| panic!("'{}' failed to parse: {}", source, e))
    }

    fn single_test(pattern: &Pattern) -> &PropertyTest {
        let tests = pattern.property_tests();
        assert_eq!(tests.len(), 1);
        tests[0]
    }

    #[test]
    fn test_simple_observation() {
        let pattern = parse_ok("[file:size = 1280]");
        let test = single_test(&pattern);
        assert_eq!(test.path.to_string(), "file:size");
        assert_eq!(test.operator.value, Operator::Equal);
        assert_matches!(&test.operand, Operand::Literal(lit) if lit.kind == LiteralKind::Number && lit.raw == "1280");
        assert_eq!(pattern.span.start.offset, 0);
        assert_eq!(pattern.span.end.offset, 18);
    }

    #[test]
    fn test_same_operator_chain_is_flattened() {
        let pattern = parse_ok("[a:b = 1] AND [c:d = 2] AND [e:f = 3]");
        assert_matches!(
            &pattern.expression,
            ObservationExpr::Composite { op: ObservationOp::And, operands, .. } if operands.len() == 3
        );
    }

    #[test]
    fn test_observation_precedence() {
        let pattern = parse_ok("[a:b = 1] OR [c:d = 2] FOLLOWEDBY [e:f = 3] AND [g:h = 4]");
        let ObservationExpr::Composite { op, operands, operator_span, .. } = &pattern.expression else {
            panic!("expected composite");
        };
        assert_eq!(*op, ObservationOp::FollowedBy);
        assert_eq!(operator_span.start.offset, 23);
        assert_matches!(&operands[0], ObservationExpr::Composite { op: ObservationOp::Or, .. });
        assert_matches!(&operands[1], ObservationExpr::Composite { op: ObservationOp::And, .. });
    }

    #[test]
    fn test_comparison_precedence() {
        let pattern = parse_ok("[a:b = 1 OR a:c = 2 AND a:d = 3]");
        let ObservationExpr::Observation { comparison, .. } = &pattern.expression else {
            panic!("expected observation");
        };
        let ComparisonExpr::Composite { op, operands, .. } = comparison else {
            panic!("expected composite comparison");
        };
        assert_eq!(*op, BooleanOp::Or);
        assert_matches!(&operands[1], ComparisonExpr::Composite { op: BooleanOp::And, .. });
    }

    #[test]
    fn test_parenthesized_comparison() {
        let pattern = parse_ok(
            "[(file:name = 'pdf.exe' OR file:size = '371712') AND file:created = t'2014-01-13T07:03:17Z']",
        );
        assert_eq!(pattern.property_tests().len(), 3);
    }

    #[test]
    fn test_qualifier_binds_to_preceding_observation() {
        let pattern = parse_ok("[a:b = 1] FOLLOWEDBY [c:d = 2] WITHIN 300 SECONDS");
        let ObservationExpr::Composite { operands, .. } = &pattern.expression else {
            panic!("expected composite");
        };
        assert!(!operands[0].has_within());
        assert!(operands[1].has_within());
        assert!(pattern.expression.qualifiers().is_empty());
    }

    #[test]
    fn test_group_qualifiers() {
        let pattern = parse_ok("([a:b = 1] FOLLOWEDBY [c:d = 2]) REPEATS 5 TIMES WITHIN 1800 SECONDS");
        let ObservationExpr::Group { qualifiers, .. } = &pattern.expression else {
            panic!("expected group");
        };
        assert_eq!(qualifiers.len(), 2);
        assert_eq!(qualifiers[0].kind(), QualifierKind::Repeats);
        assert_matches!(&qualifiers[1], Qualifier::Within { value, unit, .. }
            if value.raw == "1800" && unit.value == TimeUnit::Seconds);
    }

    #[test]
    fn test_start_stop_qualifier() {
        let pattern = parse_ok(
            "[a:b = 1] START t'2016-06-01T00:00:00Z' STOP t'2016-07-01T00:00:00Z'",
        );
        assert_matches!(
            pattern.expression.qualifiers(),
            [Qualifier::StartStop { start, stop, .. }]
                if start.kind == LiteralKind::Timestamp && stop.raw == "t'2016-07-01T00:00:00Z'"
        );
    }

    #[test]
    fn test_object_path_segments() {
        let pattern = parse_ok(
            "[file:extensions.'windows-pebinary-ext'.sections[*].entropy > 7.0]",
        );
        let test = single_test(&pattern);
        let segments: Vec<_> = test.path.segments.iter().map(|s| s.value.clone()).collect();
        assert_eq!(
            segments,
            vec![
                PathSegment::Property("extensions".into()),
                PathSegment::Quoted("'windows-pebinary-ext'".into()),
                PathSegment::Property("sections".into()),
                PathSegment::Wildcard,
                PathSegment::Property("entropy".into()),
            ]
        );

        let pattern = parse_ok("[x:extended_properties[0].source_payload = 'a']");
        assert_eq!(
            single_test(&pattern).path.to_string(),
            "x:extended_properties[0].source_payload"
        );
    }

    #[test]
    fn test_negation_and_lists() {
        let pattern = parse_ok("[ipv4-addr:value NOT ISSUBSET '10.0.0.0/8']");
        let test = single_test(&pattern);
        assert!(test.negation.is_some());
        assert_eq!(test.operator.value, Operator::IsSubset);

        let pattern = parse_ok("[a:b IN ('a', 'b')]");
        assert_matches!(&single_test(&pattern).operand, Operand::List(list) if list.items.len() == 2);

        let pattern = parse_ok("[a:b IN ()]");
        assert_matches!(&single_test(&pattern).operand, Operand::List(list) if list.items.is_empty());
    }

    #[test]
    fn test_bare_word_operand_is_unquoted_literal() {
        let pattern = parse_ok("[file:hashes.MD5 = cead3f77f6cda6ec00f57d76c9a6879f]");
        assert_matches!(&single_test(&pattern).operand, Operand::Literal(lit) if lit.kind == LiteralKind::Unquoted);
    }

    #[test]
    fn test_missing_brackets() {
        let error = parse_str("file:size = 1280").unwrap_err();
        assert_matches!(error, SyntaxError::UnexpectedToken { .. });
        assert_eq!(error.span().start.offset, 0);
    }

    #[test]
    fn test_dot_instead_of_colon() {
        let error = parse_str("[file.size = 1280]").unwrap_err();
        assert_matches!(&error, SyntaxError::UnexpectedToken { expected, .. } if expected == "':'");
        assert_eq!(error.span().start.offset, 5);
    }

    #[test]
    fn test_empty_pattern() {
        assert_matches!(parse_str(""), Err(SyntaxError::EmptyPattern { .. }));
        assert_matches!(parse_str("  \n "), Err(SyntaxError::EmptyPattern { .. }));
    }

    #[test]
    fn test_unmatched_delimiters() {
        let error = parse_str("[a:b = 1").unwrap_err();
        assert_matches!(error, SyntaxError::UnmatchedDelimiter { delimiter: '[', .. });
        assert_eq!(error.span().start.offset, 0);

        assert_matches!(
            parse_str("[a:b = 1])"),
            Err(SyntaxError::UnmatchedDelimiter { delimiter: ')', .. })
        );
        assert_matches!(
            parse_str("([a:b = 1]"),
            Err(SyntaxError::UnmatchedDelimiter { delimiter: '(', .. })
        );
    }

    #[test]
    fn test_misplaced_tokens() {
        assert_matches!(parse_str("[a:b = 1] [c:d = 2]"), Err(SyntaxError::UnexpectedToken { .. }));
        assert_matches!(parse_str("[NOT a:b = 1]"), Err(SyntaxError::UnexpectedToken { .. }));
        assert_matches!(parse_str("[a:b =]"), Err(SyntaxError::UnexpectedToken { .. }));
        assert_matches!(parse_str("[a:b[x] = 1]"), Err(SyntaxError::UnexpectedToken { .. }));
        assert_matches!(parse_str("[a:b = 1] WITHIN SECONDS"), Err(SyntaxError::UnexpectedToken { .. }));
        assert_matches!(parse_str("[a:b = 1] REPEATS 5"), Err(SyntaxError::UnexpectedEndOfInput { .. }));
    }

    #[test]
    fn test_negative_index_is_grammar_violation() {
        assert_matches!(parse_str("[a:b[-1] = 1]"), Err(SyntaxError::GrammarViolation { .. }));
    }

    #[test]
    fn test_dangling_operator() {
        let error = parse_str("[a:b = 1] AND").unwrap_err();
        assert_matches!(error, SyntaxError::UnexpectedEndOfInput { .. });
        assert_eq!(error.span().start.offset, 13);
    }

    #[test]
    fn test_nesting_limit() {
        let depth = MAX_PARSE_DEPTH + 5;
        let source = format!("{}[a:b = 1]{}", "(".repeat(depth), ")".repeat(depth));
        assert_matches!(parse_str(&source), Err(SyntaxError::MaxRecursionDepth { .. }));

        let depth = MAX_PARSE_DEPTH - 1;
        let source = format!("{}[a:b = 1]{}", "(".repeat(depth), ")".repeat(depth));
        assert!(parse_str(&source).is_ok());
    }
}
