use crate::{
    ast::ast::Expr,
    errors::errors::DiagnosticKind,
    lexer::tokens::TokenKind,
};

use super::{parser::Parser, stmt::parse_block_stmt};

/// Binding powers for the Pratt loop, ordered low to high. All binary
/// operators are left-associative, so the loop only continues while the
/// next operator binds strictly tighter than the current context.
#[derive(PartialEq, PartialOrd, Clone, Copy, Debug)]
pub enum Precedence {
    Lowest,
    Logical,
    Equality,
    Relational,
    Additive,
    Multiplicative,
    Prefix,
    Call,
    Index,
}

/// The fixed operator table. Token kinds outside it bind at `Lowest`,
/// which terminates the infix loop.
pub fn precedence_of(kind: TokenKind) -> Precedence {
    match kind {
        TokenKind::And | TokenKind::Or => Precedence::Logical,
        TokenKind::Equals | TokenKind::NotEquals => Precedence::Equality,
        TokenKind::Less
        | TokenKind::LessEquals
        | TokenKind::Greater
        | TokenKind::GreaterEquals => Precedence::Relational,
        TokenKind::Plus | TokenKind::Dash => Precedence::Additive,
        TokenKind::Star | TokenKind::Slash | TokenKind::Percent => Precedence::Multiplicative,
        TokenKind::OpenParen => Precedence::Call,
        TokenKind::OpenBracket => Precedence::Index,
        _ => Precedence::Lowest,
    }
}

/// Pratt expression parsing: dispatch the current token to its prefix
/// rule, then fold infix operators while they out-bind `min`.
pub fn parse_expr(parser: &mut Parser, min: Precedence) -> Option<Expr> {
    let mut left = parse_prefix(parser)?;

    while precedence_of(parser.current_kind()) > min {
        left = match parser.current_kind() {
            TokenKind::OpenParen => parse_call_expr(parser, left)?,
            TokenKind::OpenBracket => parse_index_expr(parser, left)?,
            _ => parse_infix_expr(parser, left)?,
        };
    }

    Some(left)
}

fn parse_prefix(parser: &mut Parser) -> Option<Expr> {
    match parser.current_kind() {
        TokenKind::Identifier => {
            let token = parser.advance();
            Some(Expr::Identifier {
                name: token.lexeme,
                line: token.line,
            })
        }
        TokenKind::Number => parse_number_literal(parser),
        TokenKind::String => {
            let token = parser.advance();
            Some(Expr::StringLiteral {
                value: token.lexeme,
                line: token.line,
            })
        }
        TokenKind::True | TokenKind::False => {
            let token = parser.advance();
            Some(Expr::BooleanLiteral {
                value: token.kind == TokenKind::True,
                line: token.line,
            })
        }
        TokenKind::Not | TokenKind::Dash => parse_prefix_expr(parser),
        TokenKind::OpenParen => parse_grouped_expr(parser),
        TokenKind::If => parse_if_expr(parser),
        TokenKind::Function => parse_function_literal(parser),
        TokenKind::OpenBracket => parse_array_literal(parser),
        _ => {
            let token = parser.current().clone();
            parser.record(DiagnosticKind::NoPrefixRule { got: token.kind }, token.line);
            None
        }
    }
}

fn parse_number_literal(parser: &mut Parser) -> Option<Expr> {
    let token = parser.advance();

    match token.lexeme.parse::<f64>() {
        Ok(value) => Some(Expr::NumberLiteral {
            value,
            line: token.line,
        }),
        Err(_) => {
            parser.record(
                DiagnosticKind::NumberParse {
                    literal: token.lexeme,
                },
                token.line,
            );
            None
        }
    }
}

fn parse_prefix_expr(parser: &mut Parser) -> Option<Expr> {
    let operator = parser.advance();
    let operand = parse_expr(parser, Precedence::Prefix)?;

    Some(Expr::Prefix {
        operator: operator.lexeme,
        operand: Box::new(operand),
        line: operator.line,
    })
}

fn parse_grouped_expr(parser: &mut Parser) -> Option<Expr> {
    parser.advance();
    let expression = parse_expr(parser, Precedence::Lowest)?;
    parser.expect(TokenKind::CloseParen)?;

    Some(expression)
}

/// `if ( condition ) { consequence }` with an optional `else { .. }`.
/// The condition must be parenthesized and both bodies must be blocks.
fn parse_if_expr(parser: &mut Parser) -> Option<Expr> {
    let token = parser.advance();

    parser.expect(TokenKind::OpenParen)?;
    let condition = parse_expr(parser, Precedence::Lowest)?;
    parser.expect(TokenKind::CloseParen)?;

    let consequence = parse_block_stmt(parser)?;

    let alternative = if parser.current_kind() == TokenKind::Else {
        parser.advance();
        Some(parse_block_stmt(parser)?)
    } else {
        None
    };

    Some(Expr::If {
        condition: Box::new(condition),
        consequence,
        alternative,
        line: token.line,
    })
}

/// `fnc ( name, ... ) { body }`. Parameters are plain identifiers.
fn parse_function_literal(parser: &mut Parser) -> Option<Expr> {
    let token = parser.advance();

    parser.expect(TokenKind::OpenParen)?;

    let mut parameters = vec![];
    if parser.current_kind() != TokenKind::CloseParen {
        parameters.push(parser.expect(TokenKind::Identifier)?.lexeme);

        while parser.current_kind() == TokenKind::Comma {
            parser.advance();
            parameters.push(parser.expect(TokenKind::Identifier)?.lexeme);
        }
    }

    parser.expect(TokenKind::CloseParen)?;

    let body = parse_block_stmt(parser)?;

    Some(Expr::Function {
        parameters,
        body,
        line: token.line,
    })
}

fn parse_array_literal(parser: &mut Parser) -> Option<Expr> {
    let token = parser.advance();
    let elements = parse_expr_list(parser, TokenKind::CloseBracket)?;

    Some(Expr::Array {
        elements,
        line: token.line,
    })
}

fn parse_call_expr(parser: &mut Parser, callee: Expr) -> Option<Expr> {
    let token = parser.advance();
    let arguments = parse_expr_list(parser, TokenKind::CloseParen)?;

    Some(Expr::Call {
        callee: Box::new(callee),
        arguments,
        line: token.line,
    })
}

fn parse_index_expr(parser: &mut Parser, left: Expr) -> Option<Expr> {
    let token = parser.advance();
    let index = parse_expr(parser, Precedence::Lowest)?;
    parser.expect(TokenKind::CloseBracket)?;

    Some(Expr::Index {
        left: Box::new(left),
        index: Box::new(index),
        line: token.line,
    })
}

/// Comma-separated expressions up to (and consuming) the closing
/// delimiter. Shared by call arguments and array literals.
fn parse_expr_list(parser: &mut Parser, end: TokenKind) -> Option<Vec<Expr>> {
    let mut list = vec![];

    if parser.current_kind() != end {
        list.push(parse_expr(parser, Precedence::Lowest)?);

        while parser.current_kind() == TokenKind::Comma {
            parser.advance();
            list.push(parse_expr(parser, Precedence::Lowest)?);
        }
    }

    parser.expect(end)?;
    Some(list)
}

/// Left-associative binary operator: the right-hand side is parsed at
/// the operator's own binding power.
fn parse_infix_expr(parser: &mut Parser, left: Expr) -> Option<Expr> {
    let operator = parser.advance();
    let right = parse_expr(parser, precedence_of(operator.kind))?;

    Some(Expr::Infix {
        operator: operator.lexeme,
        left: Box::new(left),
        right: Box::new(right),
        line: operator.line,
    })
}
