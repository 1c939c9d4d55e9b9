//! Atomic builders: literals, operands, operators, object paths and qualifiers
//!
//! Builders only decide what the grammar allows. Whether a literal's text is
//! well formed, or whether an operand suits its operator, is left to the
//! literal validator and the semantic checker.

use super::helpers::{expect_closing, expect_keyword, expect_token, unexpected_token_error};
use crate::grammar::ast::nodes::*;
use crate::grammar::keywords::Keyword;
use crate::syntax::error::{SyntaxError, SyntaxResult};
use crate::tokens::{SpannedToken, Token};
use crate::utils::{Span, Spanned};

/// Parser interface the builders are written against
pub trait Parser {
    // === BASIC NAVIGATION ===
    fn current_token(&self) -> &Token;
    fn current_span(&self) -> Span;
    fn advance(&mut self) -> SpannedToken;

    // === NESTING ===
    /// Enter a nested production; fails once the depth limit is reached
    fn enter_context(&mut self, context: &'static str) -> SyntaxResult<()>;
    fn exit_context(&mut self);
}

// === LITERALS ===

/// Literal kind for a token in value position. Bare identifiers become
/// `Unquoted` so they can be reported as missing quotes.
pub fn literal_kind(token: &Token) -> Option<LiteralKind> {
    match token {
        Token::StringLiteral(_) => Some(LiteralKind::String),
        Token::Number(_) => Some(LiteralKind::Number),
        Token::HexLiteral(_) => Some(LiteralKind::Hex),
        Token::BinaryLiteral(_) => Some(LiteralKind::Binary),
        Token::TimestampLiteral(_) => Some(LiteralKind::Timestamp),
        Token::Boolean(_) => Some(LiteralKind::Boolean),
        Token::SlashDelimited(_) => Some(LiteralKind::SlashDelimited),
        Token::Identifier(_) => Some(LiteralKind::Unquoted),
        _ => None,
    }
}

/// literal ::= String | Number | Hex | Binary | Timestamp | Boolean | Identifier | SlashDelimited
pub fn parse_literal(parser: &mut dyn Parser) -> SyntaxResult<Literal> {
    let Some(kind) = literal_kind(parser.current_token()) else {
        return Err(unexpected_token_error(parser, "literal value"));
    };
    let token = parser.advance();
    Ok(Literal::new(kind, token.value.text(), token.span))
}

/// operand ::= literal | '(' literal (',' literal)* ')' | '(' ')'
pub fn parse_operand(parser: &mut dyn Parser) -> SyntaxResult<Operand> {
    if *parser.current_token() != Token::LeftParen {
        return parse_literal(parser).map(Operand::Literal);
    }

    let open = parser.advance().span;
    let mut items = Vec::new();

    if *parser.current_token() != Token::RightParen {
        loop {
            items.push(parse_literal(parser)?);
            if *parser.current_token() == Token::Comma {
                parser.advance();
            } else {
                break;
            }
        }
    }

    let close = expect_closing(parser, '(', Token::RightParen, open)?;
    Ok(Operand::List(LiteralList {
        items,
        span: open.merge(close),
    }))
}

// === OPERATORS ===

pub fn operator_for(token: &Token) -> Option<Operator> {
    let operator = match token {
        Token::Equals => Operator::Equal,
        Token::NotEquals => Operator::NotEqual,
        Token::LessThan => Operator::LessThan,
        Token::LessThanOrEqual => Operator::LessThanOrEqual,
        Token::GreaterThan => Operator::GreaterThan,
        Token::GreaterThanOrEqual => Operator::GreaterThanOrEqual,
        Token::Keyword(Keyword::In) => Operator::In,
        Token::Keyword(Keyword::Like) => Operator::Like,
        Token::Keyword(Keyword::Matches) => Operator::Matches,
        Token::Keyword(Keyword::IsSubset) => Operator::IsSubset,
        Token::Keyword(Keyword::IsSuperset) => Operator::IsSuperset,
        _ => return None,
    };
    Some(operator)
}

pub fn parse_operator(parser: &mut dyn Parser) -> SyntaxResult<Spanned<Operator>> {
    let Some(operator) = operator_for(parser.current_token()) else {
        return Err(unexpected_token_error(parser, "comparison operator"));
    };
    let span = parser.advance().span;
    Ok(Spanned::new(operator, span))
}

// === OBJECT PATHS ===

/// object_path ::= Identifier ':' component ( '.' component | '[' (Number | '*') ']' )*
pub fn parse_object_path(parser: &mut dyn Parser) -> SyntaxResult<ObjectPath> {
    let Token::Identifier(name) = parser.current_token() else {
        return Err(unexpected_token_error(parser, "object type"));
    };
    let name = name.clone();
    let type_span = parser.advance().span;
    let object_type = Spanned::new(name, type_span);

    expect_token(parser, &Token::Colon, "':'")?;

    let mut segments = vec![parse_path_component(parser)?];
    loop {
        match parser.current_token() {
            Token::Dot => {
                parser.advance();
                segments.push(parse_path_component(parser)?);
            }
            Token::LeftBracket => segments.push(parse_path_index(parser)?),
            _ => break,
        }
    }

    let end = segments.last().map(|s| s.span).unwrap_or(type_span);
    Ok(ObjectPath {
        object_type,
        segments,
        span: type_span.merge(end),
    })
}

fn parse_path_component(parser: &mut dyn Parser) -> SyntaxResult<Spanned<PathSegment>> {
    let segment = match parser.current_token() {
        Token::Identifier(name) => PathSegment::Property(name.clone()),
        Token::QuotedKey(raw) | Token::StringLiteral(raw) => PathSegment::Quoted(raw.clone()),
        _ => return Err(unexpected_token_error(parser, "property name")),
    };
    let span = parser.advance().span;
    Ok(Spanned::new(segment, span))
}

fn parse_path_index(parser: &mut dyn Parser) -> SyntaxResult<Spanned<PathSegment>> {
    let open = parser.advance().span;

    let segment = match parser.current_token() {
        Token::Asterisk => PathSegment::Wildcard,
        Token::Number(text) if !text.is_empty() && text.bytes().all(|b| b.is_ascii_digit()) => {
            PathSegment::Index(text.clone())
        }
        Token::Number(_) => {
            return Err(SyntaxError::grammar_violation(
                "list index must be a non-negative integer or '*'",
                parser.current_span(),
            ))
        }
        _ => return Err(unexpected_token_error(parser, "list index or '*'")),
    };
    parser.advance();

    let close = expect_closing(parser, '[', Token::RightBracket, open)?;
    Ok(Spanned::new(segment, open.merge(close)))
}

// === QUALIFIERS ===

/// qualifier* following an observation expression
pub fn parse_qualifiers(parser: &mut dyn Parser) -> SyntaxResult<Vec<Qualifier>> {
    let mut qualifiers = Vec::new();
    while matches!(parser.current_token(), Token::Keyword(k) if k.is_qualifier_start()) {
        qualifiers.push(parse_qualifier(parser)?);
    }
    Ok(qualifiers)
}

/// qualifier ::= WITHIN Number TimeUnit | REPEATS Number TIMES | START time STOP time
pub fn parse_qualifier(parser: &mut dyn Parser) -> SyntaxResult<Qualifier> {
    let start = parser.current_span();

    match parser.current_token() {
        Token::Keyword(Keyword::Within) => {
            parser.advance();
            let value = parse_number(parser, "number of time units")?;
            let unit = parse_time_unit(parser)?;
            Ok(Qualifier::Within {
                span: start.merge(unit.span),
                value,
                unit,
            })
        }
        Token::Keyword(Keyword::Repeats) => {
            parser.advance();
            let count = parse_number(parser, "repeat count")?;
            let end = expect_keyword(parser, Keyword::Times)?;
            Ok(Qualifier::Repeats {
                count,
                span: start.merge(end),
            })
        }
        Token::Keyword(Keyword::Start) => {
            parser.advance();
            let start_time = parse_time_literal(parser)?;
            expect_keyword(parser, Keyword::Stop)?;
            let stop_time = parse_time_literal(parser)?;
            Ok(Qualifier::StartStop {
                span: start.merge(stop_time.span),
                start: start_time,
                stop: stop_time,
            })
        }
        _ => Err(unexpected_token_error(parser, "qualifier")),
    }
}

fn parse_number(parser: &mut dyn Parser, expected: &str) -> SyntaxResult<Literal> {
    if !matches!(parser.current_token(), Token::Number(_)) {
        return Err(unexpected_token_error(parser, expected));
    }
    let token = parser.advance();
    Ok(Literal::new(LiteralKind::Number, token.value.text(), token.span))
}

fn parse_time_literal(parser: &mut dyn Parser) -> SyntaxResult<Literal> {
    let kind = match parser.current_token() {
        Token::TimestampLiteral(_) => LiteralKind::Timestamp,
        Token::StringLiteral(_) => LiteralKind::String,
        _ => return Err(unexpected_token_error(parser, "timestamp")),
    };
    let token = parser.advance();
    Ok(Literal::new(kind, token.value.text(), token.span))
}

pub fn parse_time_unit(parser: &mut dyn Parser) -> SyntaxResult<Spanned<TimeUnit>> {
    let unit = match parser.current_token() {
        Token::Keyword(Keyword::Milliseconds) => TimeUnit::Milliseconds,
        Token::Keyword(Keyword::Seconds) => TimeUnit::Seconds,
        Token::Keyword(Keyword::Minutes) => TimeUnit::Minutes,
        Token::Keyword(Keyword::Hours) => TimeUnit::Hours,
        Token::Keyword(Keyword::Days) => TimeUnit::Days,
        Token::Keyword(Keyword::Months) => TimeUnit::Months,
        Token::Keyword(Keyword::Years) => TimeUnit::Years,
        _ => return Err(unexpected_token_error(parser, "time unit")),
    };
    let span = parser.advance().span;
    Ok(Spanned::new(unit, span))
}
