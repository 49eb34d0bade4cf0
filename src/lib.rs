#![allow(clippy::module_inception)]

use inkwell::{context::Context, module::Module};

use crate::{
    compiler::compiler::generate, errors::errors::Diagnostic, lexer::lexer::tokenize,
    parser::parser::parse_program,
};

pub mod ast;
pub mod compiler;
pub mod errors;
pub mod lexer;
pub mod parser;

/// Runs the full pipeline over an in-memory source string.
///
/// Lexing and parsing always run to completion, accumulating
/// diagnostics instead of stopping early. Code generation is gated: if
/// any lex or parse diagnostic exists the AST cannot be trusted, no
/// module is produced, and only those diagnostics are reported. When
/// the AST is clean, codegen diagnostics (if any) are returned
/// alongside the module handle.
pub fn compile_source<'a>(
    source: &str,
    context: &'a Context,
    file_name: &str,
) -> (Option<Module<'a>>, Vec<Diagnostic>) {
    let (tokens, mut diagnostics) = tokenize(source);
    log::debug!("tokenized {} tokens", tokens.len());

    let (program, parse_diagnostics) = parse_program(tokens);
    diagnostics.extend(parse_diagnostics);

    if !diagnostics.is_empty() {
        return (None, diagnostics);
    }

    let (module, codegen_diagnostics) = generate(&program, context, file_name);
    diagnostics.extend(codegen_diagnostics);

    (Some(module), diagnostics)
}

/// Returns the 1-indexed line of the source text, if it exists.
pub fn source_line(source: &str, line: u32) -> Option<&str> {
    if line == 0 {
        return None;
    }
    source.lines().nth(line as usize - 1)
}

/// Prints a diagnostic with the offending source line.
///
/// ```text
/// parse error: expected `Semicolon`, got `EOF`
/// -> final.cb:2
/// 2 | decl a -> 5
/// ```
pub fn display_diagnostic(diagnostic: &Diagnostic, source: &str, file_name: &str) {
    println!("{} error: {}", diagnostic.severity(), diagnostic.message());
    println!("-> {}:{}", file_name, diagnostic.line());
    if let Some(text) = source_line(source, diagnostic.line()) {
        println!("{} | {}", diagnostic.line(), text.trim());
    }
}
