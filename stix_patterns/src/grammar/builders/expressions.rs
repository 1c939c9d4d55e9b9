//! Comparison expression builders (the part between `[` and `]`)

use super::atomic::{parse_object_path, parse_operand, parse_operator, Parser};
use super::helpers::{expect_closing, nested, unexpected_token_error};
use crate::grammar::ast::nodes::*;
use crate::grammar::keywords::Keyword;
use crate::syntax::error::SyntaxResult;
use crate::tokens::Token;

/// comparison ::= and_comparison (OR and_comparison)*
pub fn parse_comparison(parser: &mut dyn Parser) -> SyntaxResult<ComparisonExpr> {
    let mut operands = vec![parse_and_comparison(parser)?];
    while parser.current_token().is_keyword(Keyword::Or) {
        parser.advance();
        operands.push(parse_and_comparison(parser)?);
    }
    Ok(combine(BooleanOp::Or, operands))
}

/// and_comparison ::= comparison_term (AND comparison_term)*
fn parse_and_comparison(parser: &mut dyn Parser) -> SyntaxResult<ComparisonExpr> {
    let mut operands = vec![parse_comparison_term(parser)?];
    while parser.current_token().is_keyword(Keyword::And) {
        parser.advance();
        operands.push(parse_comparison_term(parser)?);
    }
    Ok(combine(BooleanOp::And, operands))
}

/// comparison_term ::= '(' comparison ')' | property_test
fn parse_comparison_term(parser: &mut dyn Parser) -> SyntaxResult<ComparisonExpr> {
    match parser.current_token() {
        Token::LeftParen => nested(parser, "comparison group", |parser| {
            let open = parser.advance().span;
            let inner = parse_comparison(parser)?;
            let close = expect_closing(parser, '(', Token::RightParen, open)?;
            Ok(ComparisonExpr::Group {
                inner: Box::new(inner),
                span: open.merge(close),
            })
        }),
        Token::Identifier(_) => parse_property_test(parser).map(ComparisonExpr::Test),
        _ => Err(unexpected_token_error(parser, "object path or '('")),
    }
}

/// property_test ::= object_path NOT? operator operand
pub fn parse_property_test(parser: &mut dyn Parser) -> SyntaxResult<PropertyTest> {
    let path = parse_object_path(parser)?;

    let negation = if parser.current_token().is_keyword(Keyword::Not) {
        Some(parser.advance().span)
    } else {
        None
    };

    let operator = parse_operator(parser)?;
    let operand = parse_operand(parser)?;

    Ok(PropertyTest {
        span: path.span.merge(operand.span()),
        path,
        operator,
        negation,
        operand,
    })
}

fn combine(op: BooleanOp, mut operands: Vec<ComparisonExpr>) -> ComparisonExpr {
    if operands.len() == 1 {
        if let Some(single) = operands.pop() {
            return single;
        }
    }

    let span = match (operands.first(), operands.last()) {
        (Some(first), Some(last)) => first.span().merge(last.span()),
        _ => Default::default(),
    };
    ComparisonExpr::Composite { op, operands, span }
}
