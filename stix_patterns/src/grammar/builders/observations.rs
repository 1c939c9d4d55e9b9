//! Observation expression builders and the pattern entry point
//!
//! Precedence, loosest first: FOLLOWEDBY, OR, AND. Qualifiers bind to the
//! observation expression immediately before them, so a qualifier meant for
//! a whole chain needs parentheses around the chain.

use super::atomic::{parse_qualifiers, Parser};
use super::expressions::parse_comparison;
use super::helpers::{expect_closing, nested, unexpected_token_error};
use crate::grammar::ast::nodes::*;
use crate::grammar::keywords::Keyword;
use crate::syntax::error::{SyntaxError, SyntaxResult};
use crate::tokens::Token;
use crate::utils::Span;

/// pattern ::= observation_exprs EOF
pub fn parse_pattern(parser: &mut dyn Parser) -> SyntaxResult<Pattern> {
    if *parser.current_token() == Token::Eof {
        return Err(SyntaxError::EmptyPattern {
            span: parser.current_span(),
        });
    }

    let expression = parse_observation_expressions(parser)?;

    match parser.current_token() {
        Token::Eof => Ok(Pattern {
            span: expression.span(),
            expression,
        }),
        Token::RightParen | Token::RightBracket => {
            let delimiter = if *parser.current_token() == Token::RightParen {
                ')'
            } else {
                ']'
            };
            Err(SyntaxError::UnmatchedDelimiter {
                delimiter,
                span: parser.current_span(),
            })
        }
        _ => Err(unexpected_token_error(
            parser,
            "end of pattern or an observation operator",
        )),
    }
}

/// observation_exprs ::= or_expr (FOLLOWEDBY or_expr)*
pub fn parse_observation_expressions(parser: &mut dyn Parser) -> SyntaxResult<ObservationExpr> {
    parse_chain(parser, Keyword::FollowedBy, ObservationOp::FollowedBy, parse_or_expression)
}

/// or_expr ::= and_expr (OR and_expr)*
fn parse_or_expression(parser: &mut dyn Parser) -> SyntaxResult<ObservationExpr> {
    parse_chain(parser, Keyword::Or, ObservationOp::Or, parse_and_expression)
}

/// and_expr ::= observation (AND observation)*
fn parse_and_expression(parser: &mut dyn Parser) -> SyntaxResult<ObservationExpr> {
    parse_chain(parser, Keyword::And, ObservationOp::And, parse_observation)
}

/// Left-associative chain of one operator, flattened into a single node
fn parse_chain(
    parser: &mut dyn Parser,
    keyword: Keyword,
    op: ObservationOp,
    operand: fn(&mut dyn Parser) -> SyntaxResult<ObservationExpr>,
) -> SyntaxResult<ObservationExpr> {
    let first = operand(parser)?;
    if !parser.current_token().is_keyword(keyword) {
        return Ok(first);
    }

    let mut operator_span: Option<Span> = None;
    let mut operands = vec![first];
    while parser.current_token().is_keyword(keyword) {
        let span = parser.advance().span;
        operator_span.get_or_insert(span);
        operands.push(operand(parser)?);
    }

    let span = match (operands.first(), operands.last()) {
        (Some(first), Some(last)) => first.span().merge(last.span()),
        _ => Span::default(),
    };

    Ok(ObservationExpr::Composite {
        op,
        operands,
        operator_span: operator_span.unwrap_or_default(),
        span,
    })
}

/// observation ::= ('[' comparison ']' | '(' observation_exprs ')') qualifier*
fn parse_observation(parser: &mut dyn Parser) -> SyntaxResult<ObservationExpr> {
    match parser.current_token() {
        Token::LeftBracket => nested(parser, "observation", |parser| {
            let open = parser.advance().span;
            let comparison = parse_comparison(parser)?;
            let close = expect_closing(parser, '[', Token::RightBracket, open)?;
            let qualifiers = parse_qualifiers(parser)?;
            let end = qualifiers.last().map(|q| q.span()).unwrap_or(close);
            Ok(ObservationExpr::Observation {
                comparison,
                qualifiers,
                span: open.merge(end),
            })
        }),
        Token::LeftParen => nested(parser, "observation group", |parser| {
            let open = parser.advance().span;
            let inner = parse_observation_expressions(parser)?;
            let close = expect_closing(parser, '(', Token::RightParen, open)?;
            let qualifiers = parse_qualifiers(parser)?;
            let end = qualifiers.last().map(|q| q.span()).unwrap_or(close);
            Ok(ObservationExpr::Group {
                inner: Box::new(inner),
                qualifiers,
                span: open.merge(end),
            })
        }),
        _ => Err(unexpected_token_error(parser, "'[' or '('")),
    }
}
