//! Property test checks: literal formats, negation placement and the
//! operator/operand compatibility table

use crate::diagnostics::{Diagnostic, DiagnosticCollector};
use crate::grammar::ast::nodes::{Literal, LiteralKind, Operand, Operator, PropertyTest};
use crate::literals;
use crate::semantic_analysis::types::{SemanticError, SemanticResult};
use ipnet::IpNet;

/// Check one property test, in source order: NOT, then the operand
pub fn check_property_test(test: &PropertyTest, sink: &mut DiagnosticCollector) {
    let operator = test.operator.value;

    if let Some(span) = test.negation {
        if !operator.is_set_relation() {
            sink.push(Diagnostic::from_semantic_error(
                &SemanticError::IllegalNegation { operator, span },
            ));
        }
    }

    check_operand_literals(operator, &test.operand, sink);

    if let Err(error) = check_operand_shape(operator, &test.operand) {
        sink.push(Diagnostic::from_semantic_error(&error));
    }
}

fn check_operand_literals(operator: Operator, operand: &Operand, sink: &mut DiagnosticCollector) {
    match operand {
        // Slash-delimited operands are an operand shape error, reported once
        Operand::Literal(literal) if literal.kind == LiteralKind::SlashDelimited => {}
        Operand::Literal(literal) => check_literal(literal, sink),
        Operand::List(list) => {
            if operator == Operator::In {
                if let Err(error) = literals::validate_list_shape(&list.items) {
                    sink.push(Diagnostic::from_literal_error(&error, list.span));
                }
            }
            for item in &list.items {
                check_literal(item, sink);
            }
        }
    }
}

fn check_literal(literal: &Literal, sink: &mut DiagnosticCollector) {
    if let Err(error) = literals::validate(literal) {
        sink.push(Diagnostic::from_literal_error(&error, literal.span));
    }
}

/// Operator -> allowed operand shape. Unquoted values are skipped here since
/// the literal check already rejects them.
pub fn check_operand_shape(operator: Operator, operand: &Operand) -> SemanticResult<()> {
    let mismatch = |expected: &'static str| SemanticError::OperandShapeMismatch {
        operator,
        expected,
        found: operand.describe(),
        span: operand.span(),
    };

    let literal = match operand {
        Operand::Literal(literal) if literal.kind == LiteralKind::Unquoted => return Ok(()),
        Operand::Literal(literal) => Some(literal),
        Operand::List(_) => None,
    };

    match operator {
        Operator::Equal
        | Operator::NotEqual
        | Operator::LessThan
        | Operator::LessThanOrEqual
        | Operator::GreaterThan
        | Operator::GreaterThanOrEqual => match literal {
            Some(literal) if literal.kind != LiteralKind::SlashDelimited => Ok(()),
            _ => Err(mismatch("a single literal value")),
        },
        Operator::In => match operand {
            Operand::List(_) => Ok(()),
            Operand::Literal(_) => Err(mismatch("a parenthesized list of literals")),
        },
        // MATCHES bodies are not compiled as regexes, only required to be strings
        Operator::Like | Operator::Matches => match literal {
            Some(literal) if literal.kind == LiteralKind::String => Ok(()),
            _ => Err(mismatch("a quoted string")),
        },
        Operator::IsSubset | Operator::IsSuperset => match literal {
            Some(literal) if literal.kind == LiteralKind::String => {
                check_address_prefix(operator, literal)
            }
            _ => Err(mismatch("a quoted address/prefix string")),
        },
    }
}

/// `<IPv4 or IPv6 address>/<prefix length>`; host bits may be set
fn check_address_prefix(operator: Operator, literal: &Literal) -> SemanticResult<()> {
    let body = literal.body();

    body.parse::<IpNet>().map(|_| ()).map_err(|e: ipnet::AddrParseError| {
        SemanticError::invalid_subset_operand(
            operator,
            body,
            &format!("expected <address>/<prefix length>: {}", e),
            literal.span,
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ValidatorOptions;
    use crate::grammar::ast::nodes::{ComparisonExpr, ObservationExpr, Pattern};
    use crate::logging::codes;
    use crate::pipeline::parse_pattern;
    use assert_matches::assert_matches;

    fn first_test(pattern: &Pattern) -> &PropertyTest {
        match &pattern.expression {
            ObservationExpr::Observation {
                comparison: ComparisonExpr::Test(test),
                ..
            } => test,
            other => panic!("expected a single property test, got {:?}", other),
        }
    }

    fn codes_for(source: &str) -> Vec<&'static str> {
        let pattern = parse_pattern(source).expect("parses");
        let mut sink = DiagnosticCollector::new(&ValidatorOptions::default());
        check_property_test(first_test(&pattern), &mut sink);
        sink.into_diagnostics()
            .iter()
            .map(|d| d.code.as_str())
            .collect()
    }

    #[test]
    fn test_comparisons_accept_any_scalar() {
        for source in [
            "[file:size = 1280]",
            "[file:size != 1280]",
            "[file:size >= -1.5]",
            "[file:name < 'a']",
            "[file:magic_number_hex = h'ffd8']",
            "[artifact:payload_bin = b'dGVzdA==']",
            "[file:created > t'2014-01-13T07:03:17Z']",
            "[file:is_encrypted = true]",
        ] {
            assert!(codes_for(source).is_empty(), "{}", source);
        }
    }

    #[test]
    fn test_operand_shapes() {
        assert_eq!(codes_for("[file:size = (1, 2)]"), vec!["E180"]);
        assert_eq!(codes_for("[file:size IN 1024]"), vec!["E180"]);
        assert_eq!(codes_for("[file:name LIKE 5]"), vec!["E180"]);
        assert_eq!(codes_for("[file:name MATCHES /.*\\.dll/]"), vec!["E180"]);
        assert_eq!(codes_for("[file:name = /x/]"), vec!["E180"]);
    }

    #[test]
    fn test_unquoted_reported_once() {
        assert_eq!(codes_for("[file:name MATCHES foo]"), vec!["E106"]);
        assert_eq!(codes_for("[file:hashes.MD5 = cead3f77f6cda6ec00f57d76c9a6879f]"), vec!["E106"]);
    }

    #[test]
    fn test_in_lists() {
        assert!(codes_for("[file:size IN (1024, 2048, 4096)]").is_empty());
        assert_eq!(codes_for("[file:size IN ()]"), vec!["E107"]);
        assert_eq!(codes_for("[file:size IN (1, 'a')]"), vec!["E108"]);
        assert_eq!(codes_for("[file:hash IN (h'abc', h'ab')]"), vec!["E101"]);
        assert_eq!(codes_for("[file:size IN (1, /x/)]"), vec!["E110"]);
    }

    #[test]
    fn test_negation_placement() {
        assert!(codes_for("[ipv4-addr:value NOT ISSUBSET '192.168.0.1/24']").is_empty());
        assert!(codes_for("[ipv4-addr:value NOT ISSUPERSET '10.0.0.0/8']").is_empty());
        assert_eq!(codes_for("[file:name NOT = 'a']"), vec!["E181"]);
        assert_eq!(codes_for("[file:name NOT LIKE 5]"), vec!["E181", "E180"]);
    }

    #[test]
    fn test_address_prefix_operands() {
        assert!(codes_for("[a:b ISSUBSET '2001:0db8:dead:beef:0000:0000:0000:0000/64']").is_empty());
        assert!(codes_for("[a:b ISSUBSET '2001:0db8:dead:beef::/64']").is_empty());
        assert!(codes_for("[a:b ISSUBSET '0.0.0.0/0']").is_empty());

        for bad in [
            "[a:b ISSUBSET '192.168.0.1']",
            "[a:b ISSUBSET '192.168.0.1/33']",
            "[a:b ISSUBSET '2001:db8::/129']",
            "[a:b ISSUBSET 'example.com/24']",
            "[a:b ISSUBSET '10.0.0.0/+8']",
            "[a:b ISSUBSET '10.0.0.0/']",
            "[a:b ISSUBSET '10.0.0.0/8/8']",
        ] {
            assert_eq!(codes_for(bad), vec!["E186"], "{}", bad);
        }
        assert_eq!(codes_for("[a:b ISSUBSET 1234]"), vec!["E180"]);
    }

    #[test]
    fn test_address_prefix_error_reason() {
        let pattern = parse_pattern("[a:b ISSUPERSET '192.168.0.1/33']").expect("parses");
        let test = first_test(&pattern);
        let error = check_operand_shape(test.operator.value, &test.operand).unwrap_err();
        assert_matches!(
            &error,
            SemanticError::InvalidSubsetOperand { operator: Operator::IsSuperset, reason, .. }
                if reason.starts_with("expected <address>/<prefix length>")
        );
        assert_eq!(error.error_code(), codes::semantic::INVALID_SUBSET_OPERAND);
    }

    #[test]
    fn test_matches_body_is_not_compiled() {
        assert!(codes_for("[file:name MATCHES '(unclosed']").is_empty());
    }

    #[test]
    fn test_shape_error_details() {
        let pattern = parse_pattern("[file:name MATCHES /.*\\.dll/]").expect("parses");
        let test = first_test(&pattern);
        let error = check_operand_shape(test.operator.value, &test.operand).unwrap_err();
        assert_matches!(
            &error,
            SemanticError::OperandShapeMismatch { operator: Operator::Matches, found, .. }
                if found == "slash-delimited literal"
        );
        assert_eq!(error.span().start.offset, 19);
        assert_eq!(error.error_code(), codes::semantic::OPERAND_SHAPE_MISMATCH);
    }
}
