use std::fmt::Display;

use thiserror::Error;

use crate::lexer::tokens::TokenKind;

/// Which stage of the pipeline reported a diagnostic.
///
/// Code generation is gated on the absence of `Lex` and `Parse`
/// diagnostics, so the severity doubles as the gate criterion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Lex,
    Parse,
    Codegen,
}

impl Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Lex => write!(f, "lex"),
            Severity::Parse => write!(f, "parse"),
            Severity::Codegen => write!(f, "codegen"),
        }
    }
}

/// A reported problem with a message, source line, and severity.
///
/// Diagnostics are accumulated in order across a compilation run and
/// returned as part of each stage's result value. They are never used
/// for control flow beyond aborting the enclosing top-level item.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    kind: DiagnosticKind,
    line: u32,
    severity: Severity,
}

impl Diagnostic {
    pub fn lex(kind: DiagnosticKind, line: u32) -> Self {
        Diagnostic {
            kind,
            line,
            severity: Severity::Lex,
        }
    }

    pub fn parse(kind: DiagnosticKind, line: u32) -> Self {
        Diagnostic {
            kind,
            line,
            severity: Severity::Parse,
        }
    }

    pub fn codegen(kind: DiagnosticKind, line: u32) -> Self {
        Diagnostic {
            kind,
            line,
            severity: Severity::Codegen,
        }
    }

    pub fn kind(&self) -> &DiagnosticKind {
        &self.kind
    }

    pub fn line(&self) -> u32 {
        self.line
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn message(&self) -> String {
        self.kind.to_string()
    }
}

impl Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} error: {} (line {})", self.severity, self.kind, self.line)
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DiagnosticKind {
    #[error("unknown symbol: {symbol:?}")]
    UnknownSymbol { symbol: String },
    #[error("num literal must have at most one decimal point: {literal:?}")]
    MalformedNumber { literal: String },
    #[error("unterminated string")]
    UnterminatedString,
    #[error("expected `{expected}`, got `{got}`")]
    ExpectedToken { expected: TokenKind, got: TokenKind },
    #[error("no prefix parse rule for `{got}`")]
    NoPrefixRule { got: TokenKind },
    #[error("error parsing number: {literal:?}")]
    NumberParse { literal: String },
    #[error("undefined symbol: {name:?}")]
    UndefinedSymbol { name: String },
    #[error("symbol {name:?} already declared in this scope")]
    DuplicateSymbol { name: String },
    #[error("symbol {name:?} is not callable")]
    NotCallable { name: String },
    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch { expected: String, found: String },
    #[error("expected {expected} arguments, received {received}")]
    ArityMismatch { expected: usize, received: usize },
    #[error("not every path through function {function:?} returns a value")]
    MissingReturn { function: String },
    #[error("unreachable statement after block terminator")]
    UnreachableCode,
    #[error("backend error: {message}")]
    Backend { message: String },
}
