use crate::{
    ast::ast::{BlockStmt, Stmt},
    lexer::tokens::TokenKind,
};

use super::{
    expr::{parse_expr, Precedence},
    parser::Parser,
};

/// Dispatches on the leading token: `decl` and `return` have dedicated
/// statement forms, `{` opens a block, and anything else is parsed as
/// an expression statement.
pub fn parse_stmt(parser: &mut Parser) -> Option<Stmt> {
    match parser.current_kind() {
        TokenKind::Declare => parse_var_decl_stmt(parser),
        TokenKind::Return => parse_return_stmt(parser),
        TokenKind::OpenCurly => parse_block_stmt(parser).map(Stmt::Block),
        _ => parse_expr_stmt(parser),
    }
}

/// `decl name;` or `decl name -> initializer;`.
pub fn parse_var_decl_stmt(parser: &mut Parser) -> Option<Stmt> {
    let token = parser.advance();
    let name = parser.expect(TokenKind::Identifier)?.lexeme;

    let value = if parser.current_kind() == TokenKind::Arrow {
        parser.advance();
        Some(parse_expr(parser, Precedence::Lowest)?)
    } else {
        None
    };

    parser.expect_terminator();

    Some(Stmt::VarDecl {
        name,
        value,
        line: token.line,
    })
}

/// `return;` or `return value;`.
pub fn parse_return_stmt(parser: &mut Parser) -> Option<Stmt> {
    let token = parser.advance();

    let value = if parser.current_kind() != TokenKind::Semicolon {
        Some(parse_expr(parser, Precedence::Lowest)?)
    } else {
        None
    };

    parser.expect_terminator();

    Some(Stmt::Return {
        value,
        line: token.line,
    })
}

pub fn parse_expr_stmt(parser: &mut Parser) -> Option<Stmt> {
    let expression = parse_expr(parser, Precedence::Lowest)?;
    parser.expect_terminator();

    Some(Stmt::Expression {
        line: expression.line(),
        expression,
    })
}

/// A `{ }`-delimited statement sequence. Statement failures inside the
/// block are contained the same way as at the top level: the bad
/// statement is dropped, the parser resynchronizes, and the rest of the
/// block is still parsed.
pub fn parse_block_stmt(parser: &mut Parser) -> Option<BlockStmt> {
    let open = parser.expect(TokenKind::OpenCurly)?;

    let mut statements = vec![];
    while parser.current_kind() != TokenKind::CloseCurly
        && parser.current_kind() != TokenKind::EOF
    {
        let before = parser.position();
        match parse_stmt(parser) {
            Some(stmt) => statements.push(stmt),
            None => parser.synchronize(before),
        }
    }

    parser.expect(TokenKind::CloseCurly)?;

    Some(BlockStmt {
        statements,
        line: open.line,
    })
}
