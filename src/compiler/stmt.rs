use inkwell::values::BasicValueEnum;

use crate::{
    ast::ast::{BlockStmt, Expr, Stmt},
    errors::errors::{Diagnostic, DiagnosticKind},
};

use super::{
    compiler::{emit, value_kind, Binding, Compiler},
    expr::{gen_expression, gen_function},
};

/// Generates LLVM IR for the given statement.
///
/// Expression statements yield their value so an enclosing block can
/// use its trailing expression as the block's result; other statements
/// yield nothing.
pub fn gen_statement<'a>(
    compiler: &mut Compiler<'a>,
    statement: &Stmt,
) -> Result<Option<BasicValueEnum<'a>>, Diagnostic> {
    match statement {
        Stmt::Expression { expression, .. } => {
            let value = gen_expression(compiler, expression)?;
            Ok(Some(value))
        }
        Stmt::VarDecl { name, value, line } => {
            gen_var_decl(compiler, name, value.as_ref(), *line)?;
            Ok(None)
        }
        Stmt::Return { value, line } => {
            gen_return(compiler, value.as_ref(), *line)?;
            Ok(None)
        }
        Stmt::Block(block) => {
            gen_block(compiler, block)?;
            Ok(None)
        }
    }
}

/// `decl name -> value;`
///
/// A function literal initializer declares a named module function.
/// Any other initializer is generated and stored into stack storage
/// hoisted to the entry block of the current function; an absent
/// initializer stores the unit value.
fn gen_var_decl<'a>(
    compiler: &mut Compiler<'a>,
    name: &str,
    value: Option<&Expr>,
    line: u32,
) -> Result<(), Diagnostic> {
    if let Some(Expr::Function {
        parameters,
        body,
        line: literal_line,
    }) = value
    {
        let function = gen_function(compiler, name, parameters, body, *literal_line)?;
        compiler.declare(name, Binding::Function(function), line)?;
        return Ok(());
    }

    let initial = match value {
        Some(expression) => gen_expression(compiler, expression)?,
        None => compiler.unit_value(),
    };

    let alloca = compiler.create_entry_block_alloca(initial.get_type(), name, line)?;
    emit(compiler.builder.build_store(alloca, initial), line)?;
    compiler.declare(name, Binding::Variable(alloca), line)?;

    Ok(())
}

/// `return;` / `return value;`
///
/// Inside a declared function the value must be numeric (functions are
/// `num -> num`); a bare return yields the unit value. At the top
/// level the statement returns from the synthetic `main`, truncating a
/// numeric value to the process exit status.
fn gen_return<'a>(
    compiler: &mut Compiler<'a>,
    value: Option<&Expr>,
    line: u32,
) -> Result<(), Diagnostic> {
    if compiler.in_main_function() {
        let status = match value {
            Some(expression) => {
                let value = gen_expression(compiler, expression)?;
                match value {
                    BasicValueEnum::FloatValue(float) => emit(
                        compiler.builder.build_float_to_signed_int(
                            float,
                            compiler.context.i32_type(),
                            "status",
                        ),
                        line,
                    )?,
                    other => {
                        return Err(Diagnostic::codegen(
                            DiagnosticKind::TypeMismatch {
                                expected: String::from("num"),
                                found: value_kind(&other).to_string(),
                            },
                            line,
                        ))
                    }
                }
            }
            None => compiler.context.i32_type().const_zero(),
        };

        emit(compiler.builder.build_return(Some(&status)), line)?;
        return Ok(());
    }

    let value = match value {
        Some(expression) => {
            let value = gen_expression(compiler, expression)?;
            if !value.is_float_value() {
                return Err(Diagnostic::codegen(
                    DiagnosticKind::TypeMismatch {
                        expected: String::from("num"),
                        found: value_kind(&value).to_string(),
                    },
                    line,
                ));
            }
            value
        }
        None => compiler.unit_value(),
    };

    emit(compiler.builder.build_return(Some(&value)), line)?;
    Ok(())
}

/// Generates a block in a fresh child scope.
///
/// Returns the value of the block's trailing expression statement, if
/// any. Statements after a terminator are unreachable and rejected
/// with a diagnostic rather than silently dropped.
pub fn gen_block<'a>(
    compiler: &mut Compiler<'a>,
    block: &BlockStmt,
) -> Result<Option<BasicValueEnum<'a>>, Diagnostic> {
    compiler.enter_scope();
    let result = gen_block_body(compiler, block);
    compiler.exit_scope();
    result
}

fn gen_block_body<'a>(
    compiler: &mut Compiler<'a>,
    block: &BlockStmt,
) -> Result<Option<BasicValueEnum<'a>>, Diagnostic> {
    let mut last = None;

    for statement in &block.statements {
        if compiler.block_terminated() {
            return Err(Diagnostic::codegen(
                DiagnosticKind::UnreachableCode,
                statement.line(),
            ));
        }
        last = gen_statement(compiler, statement)?;
    }

    Ok(last)
}
