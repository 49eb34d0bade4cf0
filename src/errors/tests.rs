//! Unit tests for diagnostics.

use crate::lexer::tokens::TokenKind;

use super::errors::{Diagnostic, DiagnosticKind, Severity};

#[test]
fn test_diagnostic_construction() {
    let diagnostic = Diagnostic::lex(
        DiagnosticKind::UnknownSymbol {
            symbol: "@".to_string(),
        },
        3,
    );

    assert_eq!(diagnostic.severity(), Severity::Lex);
    assert_eq!(diagnostic.line(), 3);
    assert_eq!(
        diagnostic.kind(),
        &DiagnosticKind::UnknownSymbol {
            symbol: "@".to_string()
        }
    );
}

#[test]
fn test_diagnostic_severities() {
    let lex = Diagnostic::lex(DiagnosticKind::UnterminatedString, 1);
    let parse = Diagnostic::parse(
        DiagnosticKind::ExpectedToken {
            expected: TokenKind::Semicolon,
            got: TokenKind::EOF,
        },
        1,
    );
    let codegen = Diagnostic::codegen(
        DiagnosticKind::UndefinedSymbol {
            name: "x".to_string(),
        },
        1,
    );

    assert_eq!(lex.severity(), Severity::Lex);
    assert_eq!(parse.severity(), Severity::Parse);
    assert_eq!(codegen.severity(), Severity::Codegen);
}

#[test]
fn test_diagnostic_messages() {
    let diagnostic = Diagnostic::lex(
        DiagnosticKind::MalformedNumber {
            literal: "1.2.3".to_string(),
        },
        7,
    );
    assert_eq!(
        diagnostic.message(),
        "num literal must have at most one decimal point: \"1.2.3\""
    );

    let diagnostic = Diagnostic::parse(
        DiagnosticKind::ExpectedToken {
            expected: TokenKind::Semicolon,
            got: TokenKind::Declare,
        },
        2,
    );
    assert_eq!(diagnostic.message(), "expected `Semicolon`, got `Declare`");

    let diagnostic = Diagnostic::codegen(
        DiagnosticKind::ArityMismatch {
            expected: 2,
            received: 3,
        },
        4,
    );
    assert_eq!(diagnostic.message(), "expected 2 arguments, received 3");
}

#[test]
fn test_diagnostic_display() {
    let diagnostic = Diagnostic::codegen(
        DiagnosticKind::UndefinedSymbol {
            name: "foo".to_string(),
        },
        12,
    );

    assert_eq!(
        diagnostic.to_string(),
        "codegen error: undefined symbol: \"foo\" (line 12)"
    );
}

#[test]
fn test_duplicate_symbol_message() {
    let diagnostic = Diagnostic::codegen(
        DiagnosticKind::DuplicateSymbol {
            name: "x".to_string(),
        },
        1,
    );

    assert_eq!(
        diagnostic.message(),
        "symbol \"x\" already declared in this scope"
    );
}
