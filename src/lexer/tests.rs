//! Unit tests for the lexer module.
//!
//! This module contains tests for tokenization including:
//! - Keywords and identifiers
//! - Numeric and string literals
//! - Operators and punctuation
//! - Comments and line counting
//! - Error recovery

use crate::errors::errors::DiagnosticKind;

use super::{
    lexer::{tokenize, Lexer},
    tokens::TokenKind,
};

#[test]
fn test_tokenize_full_surface() {
    let source = "fnc if else while return break continue true false foo 123 45.67 =+-*/%!|&^.$->\n> < >= <= == != && || (){}[];:,\"hello world\"\n";
    let (tokens, diagnostics) = tokenize(source);

    let expected: Vec<(TokenKind, &str, u32)> = vec![
        (TokenKind::Function, "fnc", 1),
        (TokenKind::If, "if", 1),
        (TokenKind::Else, "else", 1),
        (TokenKind::While, "while", 1),
        (TokenKind::Return, "return", 1),
        (TokenKind::Break, "break", 1),
        (TokenKind::Continue, "continue", 1),
        (TokenKind::True, "true", 1),
        (TokenKind::False, "false", 1),
        (TokenKind::Identifier, "foo", 1),
        (TokenKind::Number, "123", 1),
        (TokenKind::Number, "45.67", 1),
        (TokenKind::Assignment, "=", 1),
        (TokenKind::Plus, "+", 1),
        (TokenKind::Dash, "-", 1),
        (TokenKind::Star, "*", 1),
        (TokenKind::Slash, "/", 1),
        (TokenKind::Percent, "%", 1),
        (TokenKind::Not, "!", 1),
        (TokenKind::Bar, "|", 1),
        (TokenKind::Ampersand, "&", 1),
        (TokenKind::Circumflex, "^", 1),
        (TokenKind::Dot, ".", 1),
        (TokenKind::Dollar, "$", 1),
        (TokenKind::Arrow, "->", 1),
        (TokenKind::Greater, ">", 2),
        (TokenKind::Less, "<", 2),
        (TokenKind::GreaterEquals, ">=", 2),
        (TokenKind::LessEquals, "<=", 2),
        (TokenKind::Equals, "==", 2),
        (TokenKind::NotEquals, "!=", 2),
        (TokenKind::And, "&&", 2),
        (TokenKind::Or, "||", 2),
        (TokenKind::OpenParen, "(", 2),
        (TokenKind::CloseParen, ")", 2),
        (TokenKind::OpenCurly, "{", 2),
        (TokenKind::CloseCurly, "}", 2),
        (TokenKind::OpenBracket, "[", 2),
        (TokenKind::CloseBracket, "]", 2),
        (TokenKind::Semicolon, ";", 2),
        (TokenKind::Colon, ":", 2),
        (TokenKind::Comma, ",", 2),
        (TokenKind::String, "hello world", 2),
        (TokenKind::EOF, "", 3),
    ];

    assert!(diagnostics.is_empty());
    assert_eq!(tokens.len(), expected.len());
    for (token, (kind, lexeme, line)) in tokens.iter().zip(expected) {
        assert_eq!(token.kind, kind);
        assert_eq!(token.lexeme, lexeme);
        assert_eq!(token.line, line);
    }
}

#[test]
fn test_tokenize_declaration() {
    let source = "decl x -> 42;";
    let (tokens, diagnostics) = tokenize(source);

    assert!(diagnostics.is_empty());
    assert_eq!(tokens.len(), 6); // decl, x, ->, 42, ;, EOF
    assert_eq!(tokens[0].kind, TokenKind::Declare);
    assert_eq!(tokens[1].kind, TokenKind::Identifier);
    assert_eq!(tokens[1].lexeme, "x");
    assert_eq!(tokens[2].kind, TokenKind::Arrow);
    assert_eq!(tokens[3].kind, TokenKind::Number);
    assert_eq!(tokens[3].lexeme, "42");
    assert_eq!(tokens[4].kind, TokenKind::Semicolon);
    assert_eq!(tokens[5].kind, TokenKind::EOF);
}

#[test]
fn test_tokenize_numbers() {
    let source = "42 3.14 0 100.5";
    let (tokens, diagnostics) = tokenize(source);

    assert!(diagnostics.is_empty());
    assert_eq!(tokens[0].kind, TokenKind::Number);
    assert_eq!(tokens[0].lexeme, "42");
    assert_eq!(tokens[1].kind, TokenKind::Number);
    assert_eq!(tokens[1].lexeme, "3.14");
    assert_eq!(tokens[2].kind, TokenKind::Number);
    assert_eq!(tokens[2].lexeme, "0");
    assert_eq!(tokens[3].kind, TokenKind::Number);
    assert_eq!(tokens[3].lexeme, "100.5");
    assert_eq!(tokens[4].kind, TokenKind::EOF);
}

#[test]
fn test_tokenize_malformed_number() {
    // the whole run is consumed into a single illegal token so the
    // stream stays aligned, and lexing resumes after it
    let source = "12.3.4 + 7";
    let (tokens, diagnostics) = tokenize(source);

    assert_eq!(tokens[0].kind, TokenKind::Illegal);
    assert_eq!(tokens[0].lexeme, "12.3.4");
    assert_eq!(tokens[1].kind, TokenKind::Plus);
    assert_eq!(tokens[2].kind, TokenKind::Number);
    assert_eq!(tokens[2].lexeme, "7");
    assert_eq!(tokens[3].kind, TokenKind::EOF);

    assert_eq!(diagnostics.len(), 1);
    assert_eq!(
        diagnostics[0].kind(),
        &DiagnosticKind::MalformedNumber {
            literal: "12.3.4".to_string()
        }
    );
    assert_eq!(diagnostics[0].line(), 1);
}

#[test]
fn test_tokenize_strings() {
    let source = r#""hello" "multiple words" """#;
    let (tokens, diagnostics) = tokenize(source);

    assert!(diagnostics.is_empty());
    assert_eq!(tokens[0].kind, TokenKind::String);
    assert_eq!(tokens[0].lexeme, "hello");
    assert_eq!(tokens[1].kind, TokenKind::String);
    assert_eq!(tokens[1].lexeme, "multiple words");
    assert_eq!(tokens[2].kind, TokenKind::String);
    assert_eq!(tokens[2].lexeme, "");
    assert_eq!(tokens[3].kind, TokenKind::EOF);
}

#[test]
fn test_tokenize_unterminated_string() {
    let source = "\"abc";
    let (tokens, diagnostics) = tokenize(source);

    // the partial content is still a string token, not an illegal one
    assert_eq!(tokens[0].kind, TokenKind::String);
    assert_eq!(tokens[0].lexeme, "abc");
    assert_eq!(tokens[1].kind, TokenKind::EOF);

    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].kind(), &DiagnosticKind::UnterminatedString);
}

#[test]
fn test_tokenize_unknown_symbol() {
    let source = "decl x -> `5;";
    let (tokens, diagnostics) = tokenize(source);

    assert_eq!(tokens[0].kind, TokenKind::Declare);
    assert_eq!(tokens[1].kind, TokenKind::Identifier);
    assert_eq!(tokens[2].kind, TokenKind::Arrow);
    assert_eq!(tokens[3].kind, TokenKind::Illegal);
    assert_eq!(tokens[3].lexeme, "`");
    // valid tokens after the unknown symbol are still produced
    assert_eq!(tokens[4].kind, TokenKind::Number);
    assert_eq!(tokens[4].lexeme, "5");
    assert_eq!(tokens[5].kind, TokenKind::Semicolon);
    assert_eq!(tokens[6].kind, TokenKind::EOF);

    assert_eq!(diagnostics.len(), 1);
    assert_eq!(
        diagnostics[0].kind(),
        &DiagnosticKind::UnknownSymbol {
            symbol: "`".to_string()
        }
    );
}

#[test]
fn test_tokenize_comments() {
    let source = "decl x -> 5; // this is a comment\ndecl y -> 10;";
    let (tokens, diagnostics) = tokenize(source);

    assert!(diagnostics.is_empty());
    assert_eq!(tokens[0].kind, TokenKind::Declare);
    assert_eq!(tokens[4].kind, TokenKind::Semicolon);
    // the comment is discarded and the next token sits on line 2
    assert_eq!(tokens[5].kind, TokenKind::Declare);
    assert_eq!(tokens[5].line, 2);
    assert_eq!(tokens[6].lexeme, "y");
}

#[test]
fn test_tokenize_comment_only_line() {
    let source = "// nothing here\n// or here\nfoo";
    let (tokens, diagnostics) = tokenize(source);

    assert!(diagnostics.is_empty());
    assert_eq!(tokens[0].kind, TokenKind::Identifier);
    assert_eq!(tokens[0].lexeme, "foo");
    assert_eq!(tokens[0].line, 3);
    assert_eq!(tokens[1].kind, TokenKind::EOF);
}

#[test]
fn test_tokenize_line_counting() {
    let source = "a\nb\n\n\nc";
    let (tokens, _) = tokenize(source);

    assert_eq!(tokens[0].line, 1);
    assert_eq!(tokens[1].line, 2);
    assert_eq!(tokens[2].line, 5);
}

#[test]
fn test_tokenize_two_character_operator_fallbacks() {
    let source = "= == ! != - -> < <= > >= | || & &&";
    let (tokens, diagnostics) = tokenize(source);

    assert!(diagnostics.is_empty());
    let kinds: Vec<TokenKind> = tokens.iter().map(|token| token.kind).collect();
    assert_eq!(
        kinds,
        vec![
            TokenKind::Assignment,
            TokenKind::Equals,
            TokenKind::Not,
            TokenKind::NotEquals,
            TokenKind::Dash,
            TokenKind::Arrow,
            TokenKind::Less,
            TokenKind::LessEquals,
            TokenKind::Greater,
            TokenKind::GreaterEquals,
            TokenKind::Bar,
            TokenKind::Or,
            TokenKind::Ampersand,
            TokenKind::And,
            TokenKind::EOF,
        ]
    );
}

#[test]
fn test_tokenize_keywords_are_case_sensitive() {
    let source = "decl Decl DECL";
    let (tokens, _) = tokenize(source);

    assert_eq!(tokens[0].kind, TokenKind::Declare);
    assert_eq!(tokens[1].kind, TokenKind::Identifier);
    assert_eq!(tokens[2].kind, TokenKind::Identifier);
}

#[test]
fn test_next_token_after_eof() {
    let mut lexer = Lexer::new("x");

    assert_eq!(lexer.next_token().kind, TokenKind::Identifier);
    assert_eq!(lexer.next_token().kind, TokenKind::EOF);
    // callable any number of times after end of input
    assert_eq!(lexer.next_token().kind, TokenKind::EOF);
    assert_eq!(lexer.next_token().kind, TokenKind::EOF);
}

#[test]
fn test_tokenize_empty_source() {
    let (tokens, diagnostics) = tokenize("");

    assert!(diagnostics.is_empty());
    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0].kind, TokenKind::EOF);
    assert_eq!(tokens[0].line, 1);
}

#[test]
fn test_tokenize_whitespace_handling() {
    let source = "  decl   x   ->   42  ";
    let (tokens, _) = tokenize(source);

    assert_eq!(tokens[0].kind, TokenKind::Declare);
    assert_eq!(tokens[1].kind, TokenKind::Identifier);
    assert_eq!(tokens[2].kind, TokenKind::Arrow);
    assert_eq!(tokens[3].kind, TokenKind::Number);
    assert_eq!(tokens[4].kind, TokenKind::EOF);
}
