//! Parser state and program entry point.
//!
//! The parser walks the token stream with a one-token lookahead cursor
//! and hands expression parsing to the Pratt loop in `expr`. All
//! failures are recorded as diagnostics; a failed statement yields an
//! absent node and the parser resynchronizes at the next statement
//! boundary, so one malformed statement never aborts the program.

use crate::{
    ast::ast::Program,
    errors::errors::{Diagnostic, DiagnosticKind},
    lexer::tokens::{Token, TokenKind},
};

use super::stmt::parse_stmt;

pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    diagnostics: Vec<Diagnostic>,
}

impl Parser {
    /// Creates a parser over a token stream. The cursor relies on a
    /// trailing end-of-file token; one is appended if missing.
    pub fn new(mut tokens: Vec<Token>) -> Self {
        if tokens.last().map(|token| token.kind) != Some(TokenKind::EOF) {
            let line = tokens.last().map(|token| token.line).unwrap_or(1);
            tokens.push(Token::new(TokenKind::EOF, "", line));
        }

        Parser {
            tokens,
            pos: 0,
            diagnostics: vec![],
        }
    }

    /// Returns the current token without advancing.
    pub(crate) fn current(&self) -> &Token {
        &self.tokens[self.pos]
    }

    pub(crate) fn current_kind(&self) -> TokenKind {
        self.current().kind
    }

    /// Consumes the current token and returns it. The cursor never
    /// moves past the end-of-file token.
    pub(crate) fn advance(&mut self) -> Token {
        let token = self.current().clone();
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
        token
    }

    pub(crate) fn position(&self) -> usize {
        self.pos
    }

    /// Consumes a token of the expected kind, or records a diagnostic
    /// with the expected kind, actual kind, and line and returns an
    /// absent result. Callers propagate the absence upward.
    pub(crate) fn expect(&mut self, expected: TokenKind) -> Option<Token> {
        if self.current_kind() == expected {
            return Some(self.advance());
        }

        let token = self.current().clone();
        self.record(
            DiagnosticKind::ExpectedToken {
                expected,
                got: token.kind,
            },
            token.line,
        );
        None
    }

    /// Consumes the statement terminator. A missing `;` records a
    /// diagnostic, but the current position is treated as the
    /// statement boundary anyway rather than entering an error state.
    pub(crate) fn expect_terminator(&mut self) {
        if self.current_kind() == TokenKind::Semicolon {
            self.advance();
            return;
        }

        let token = self.current().clone();
        self.record(
            DiagnosticKind::ExpectedToken {
                expected: TokenKind::Semicolon,
                got: token.kind,
            },
            token.line,
        );
    }

    pub(crate) fn record(&mut self, kind: DiagnosticKind, line: u32) {
        self.diagnostics.push(Diagnostic::parse(kind, line));
    }

    /// Skips to just past the next `;`, or stops before `}` / end of
    /// input, after a statement failed to parse. Guaranteed to make
    /// progress even when the failure consumed no tokens.
    pub(crate) fn synchronize(&mut self, before: usize) {
        if self.pos == before && self.current_kind() != TokenKind::EOF {
            self.advance();
        }

        while self.current_kind() != TokenKind::EOF {
            match self.current_kind() {
                TokenKind::Semicolon => {
                    self.advance();
                    return;
                }
                TokenKind::CloseCurly => return,
                _ => {
                    self.advance();
                }
            }
        }
    }
}

/// Parses a token stream into a program.
///
/// Always returns a program: statements that failed to parse are
/// dropped (their children were already reported as diagnostics) and
/// parsing continues with the next statement. Code generation must not
/// run when the returned diagnostics are non-empty.
pub fn parse_program(tokens: Vec<Token>) -> (Program, Vec<Diagnostic>) {
    let mut parser = Parser::new(tokens);
    let mut program = Program::default();

    while parser.current_kind() != TokenKind::EOF {
        let before = parser.position();
        match parse_stmt(&mut parser) {
            Some(stmt) => program.statements.push(stmt),
            None => parser.synchronize(before),
        }
    }

    (program, parser.diagnostics)
}
