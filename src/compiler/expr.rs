use inkwell::{
    types::{AnyTypeEnum, BasicMetadataTypeEnum, BasicType},
    values::{BasicMetadataValueEnum, BasicValueEnum, FunctionValue, IntValue},
    FloatPredicate, IntPredicate,
};

use crate::{
    ast::ast::{BlockStmt, Expr},
    errors::errors::{Diagnostic, DiagnosticKind},
};

use super::{
    compiler::{emit, value_kind, Binding, Compiler},
    stmt::gen_block,
};

/// Generates LLVM IR for the given expression, returning the value it
/// evaluates to.
pub fn gen_expression<'a>(
    compiler: &mut Compiler<'a>,
    expression: &Expr,
) -> Result<BasicValueEnum<'a>, Diagnostic> {
    match expression {
        Expr::NumberLiteral { value, .. } => {
            Ok(compiler.context.f64_type().const_float(*value).into())
        }
        Expr::BooleanLiteral { value, .. } => Ok(compiler
            .context
            .bool_type()
            .const_int(*value as u64, false)
            .into()),
        Expr::StringLiteral { value, line } => {
            let global = emit(compiler.builder.build_global_string_ptr(value, "str"), *line)?;
            Ok(global.as_pointer_value().into())
        }
        Expr::Identifier { name, line } => gen_identifier(compiler, name, *line),
        Expr::Prefix {
            operator,
            operand,
            line,
        } => gen_prefix_expr(compiler, operator, operand, *line),
        Expr::Infix {
            operator,
            left,
            right,
            line,
        } => gen_infix_expr(compiler, operator, left, right, *line),
        Expr::If {
            condition,
            consequence,
            alternative,
            line,
        } => gen_if_expr(compiler, condition, consequence, alternative.as_ref(), *line),
        Expr::Function {
            parameters,
            body,
            line,
        } => {
            let name = compiler.next_lambda_name();
            let function = gen_function(compiler, &name, parameters, body, *line)?;
            Ok(function.as_global_value().as_pointer_value().into())
        }
        Expr::Call {
            callee,
            arguments,
            line,
        } => gen_call_expr(compiler, callee, arguments, *line),
        Expr::Array { elements, line } => gen_array_literal(compiler, elements, *line),
        Expr::Index { left, index, line } => gen_index_expr(compiler, left, index, *line),
    }
}

/// Loads an identifier from its scope-resolved storage. Function names
/// evaluate to the function's address.
fn gen_identifier<'a>(
    compiler: &mut Compiler<'a>,
    name: &str,
    line: u32,
) -> Result<BasicValueEnum<'a>, Diagnostic> {
    match compiler.resolve(name) {
        Some(Binding::Variable(alloca)) if compiler.owns_storage(alloca) => {
            emit(compiler.builder.build_load(alloca, name), line)
        }
        Some(Binding::Function(function)) => {
            Ok(function.as_global_value().as_pointer_value().into())
        }
        _ => Err(Diagnostic::codegen(
            DiagnosticKind::UndefinedSymbol {
                name: name.to_string(),
            },
            line,
        )),
    }
}

fn gen_prefix_expr<'a>(
    compiler: &mut Compiler<'a>,
    operator: &str,
    operand: &Expr,
    line: u32,
) -> Result<BasicValueEnum<'a>, Diagnostic> {
    let value = gen_expression(compiler, operand)?;

    match operator {
        "-" => match value {
            BasicValueEnum::FloatValue(float) => {
                Ok(emit(compiler.builder.build_float_neg(float, "neg"), line)?.into())
            }
            other => Err(type_mismatch("num", &other, line)),
        },
        "!" => {
            let operand = bool_operand(value, line)?;
            Ok(emit(compiler.builder.build_not(operand, "not"), line)?.into())
        }
        _ => Err(Diagnostic::codegen(
            DiagnosticKind::TypeMismatch {
                expected: String::from("prefix operator `-` or `!`"),
                found: format!("`{}`", operator),
            },
            line,
        )),
    }
}

fn gen_infix_expr<'a>(
    compiler: &mut Compiler<'a>,
    operator: &str,
    left: &Expr,
    right: &Expr,
    line: u32,
) -> Result<BasicValueEnum<'a>, Diagnostic> {
    if operator == "&&" || operator == "||" {
        return gen_logical_expr(compiler, operator, left, right, line);
    }

    let lhs = gen_expression(compiler, left)?;
    let rhs = gen_expression(compiler, right)?;

    match (lhs, rhs) {
        (BasicValueEnum::FloatValue(lhs), BasicValueEnum::FloatValue(rhs)) => {
            let value: BasicValueEnum = match operator {
                "+" => emit(compiler.builder.build_float_add(lhs, rhs, "add"), line)?.into(),
                "-" => emit(compiler.builder.build_float_sub(lhs, rhs, "sub"), line)?.into(),
                "*" => emit(compiler.builder.build_float_mul(lhs, rhs, "mul"), line)?.into(),
                "/" => emit(compiler.builder.build_float_div(lhs, rhs, "div"), line)?.into(),
                "%" => emit(compiler.builder.build_float_rem(lhs, rhs, "rem"), line)?.into(),
                "==" => float_compare(compiler, FloatPredicate::OEQ, lhs, rhs, line)?,
                "!=" => float_compare(compiler, FloatPredicate::ONE, lhs, rhs, line)?,
                "<" => float_compare(compiler, FloatPredicate::OLT, lhs, rhs, line)?,
                "<=" => float_compare(compiler, FloatPredicate::OLE, lhs, rhs, line)?,
                ">" => float_compare(compiler, FloatPredicate::OGT, lhs, rhs, line)?,
                ">=" => float_compare(compiler, FloatPredicate::OGE, lhs, rhs, line)?,
                _ => {
                    return Err(Diagnostic::codegen(
                        DiagnosticKind::TypeMismatch {
                            expected: String::from("binary operator"),
                            found: format!("`{}`", operator),
                        },
                        line,
                    ))
                }
            };
            Ok(value)
        }
        (BasicValueEnum::IntValue(lhs), BasicValueEnum::IntValue(rhs)) => match operator {
            "==" => Ok(emit(
                compiler
                    .builder
                    .build_int_compare(IntPredicate::EQ, lhs, rhs, "eq"),
                line,
            )?
            .into()),
            "!=" => Ok(emit(
                compiler
                    .builder
                    .build_int_compare(IntPredicate::NE, lhs, rhs, "neq"),
                line,
            )?
            .into()),
            _ => Err(Diagnostic::codegen(
                DiagnosticKind::TypeMismatch {
                    expected: String::from("num"),
                    found: String::from("bool"),
                },
                line,
            )),
        },
        (lhs, rhs) => Err(Diagnostic::codegen(
            DiagnosticKind::TypeMismatch {
                expected: value_kind(&lhs).to_string(),
                found: value_kind(&rhs).to_string(),
            },
            line,
        )),
    }
}

fn float_compare<'a>(
    compiler: &Compiler<'a>,
    predicate: FloatPredicate,
    lhs: inkwell::values::FloatValue<'a>,
    rhs: inkwell::values::FloatValue<'a>,
    line: u32,
) -> Result<BasicValueEnum<'a>, Diagnostic> {
    Ok(emit(
        compiler.builder.build_float_compare(predicate, lhs, rhs, "cmp"),
        line,
    )?
    .into())
}

/// Short-circuiting `&&` / `||`: the right operand is generated inside
/// a conditionally-taken block, so its side effects do not occur when
/// the left operand already decides the result.
fn gen_logical_expr<'a>(
    compiler: &mut Compiler<'a>,
    operator: &str,
    left: &Expr,
    right: &Expr,
    line: u32,
) -> Result<BasicValueEnum<'a>, Diagnostic> {
    let lhs = gen_expression(compiler, left)?;
    let lhs = bool_operand(lhs, line)?;

    let function = compiler.current_function();
    let lhs_block = compiler
        .builder
        .get_insert_block()
        .expect("the builder is positioned while generating expressions");
    let rhs_block = compiler.context.append_basic_block(function, "rhs");
    let merge_block = compiler.context.append_basic_block(function, "merge");

    if operator == "&&" {
        emit(
            compiler
                .builder
                .build_conditional_branch(lhs, rhs_block, merge_block),
            line,
        )?;
    } else {
        emit(
            compiler
                .builder
                .build_conditional_branch(lhs, merge_block, rhs_block),
            line,
        )?;
    }

    compiler.builder.position_at_end(rhs_block);
    let rhs = gen_expression(compiler, right)?;
    let rhs = bool_operand(rhs, line)?;
    let rhs_end = compiler
        .builder
        .get_insert_block()
        .expect("the builder is positioned while generating expressions");
    emit(compiler.builder.build_unconditional_branch(merge_block), line)?;

    compiler.builder.position_at_end(merge_block);
    let phi = emit(
        compiler.builder.build_phi(compiler.context.bool_type(), "logical"),
        line,
    )?;
    phi.add_incoming(&[(&lhs, lhs_block), (&rhs, rhs_end)]);

    Ok(phi.as_basic_value())
}

/// Branches to the consequence or alternative block and merges into a
/// successor block.
///
/// The expression's value is the merged value of the branch results
/// when both are present and agree in kind; with no alternative (or
/// disagreeing branch results) the value falls back to the unit value.
fn gen_if_expr<'a>(
    compiler: &mut Compiler<'a>,
    condition: &Expr,
    consequence: &BlockStmt,
    alternative: Option<&BlockStmt>,
    line: u32,
) -> Result<BasicValueEnum<'a>, Diagnostic> {
    let condition_value = gen_expression(compiler, condition)?;
    let condition_value = bool_operand(condition_value, line)?;

    let function = compiler.current_function();
    let condition_block = compiler
        .builder
        .get_insert_block()
        .expect("the builder is positioned while generating expressions");
    let then_block = compiler.context.append_basic_block(function, "then");
    let else_block = alternative.map(|_| compiler.context.append_basic_block(function, "else"));
    let merge_block = compiler.context.append_basic_block(function, "merge");

    emit(
        compiler.builder.build_conditional_branch(
            condition_value,
            then_block,
            else_block.unwrap_or(merge_block),
        ),
        line,
    )?;

    let mut incomings = vec![];

    compiler.builder.position_at_end(then_block);
    let then_value = gen_block(compiler, consequence)?;
    if !compiler.block_terminated() {
        let then_end = compiler
            .builder
            .get_insert_block()
            .expect("the builder is positioned while generating expressions");
        emit(compiler.builder.build_unconditional_branch(merge_block), line)?;
        incomings.push((then_value.unwrap_or(compiler.unit_value()), then_end));
    }

    match (alternative, else_block) {
        (Some(alternative), Some(else_block)) => {
            compiler.builder.position_at_end(else_block);
            let else_value = gen_block(compiler, alternative)?;
            if !compiler.block_terminated() {
                let else_end = compiler
                    .builder
                    .get_insert_block()
                    .expect("the builder is positioned while generating expressions");
                emit(compiler.builder.build_unconditional_branch(merge_block), line)?;
                incomings.push((else_value.unwrap_or(compiler.unit_value()), else_end));
            }
        }
        _ => {
            // no alternative: the false edge reaches the merge block
            // directly, carrying the unit value
            incomings.push((compiler.unit_value(), condition_block));
        }
    }

    compiler.builder.position_at_end(merge_block);

    match incomings.as_slice() {
        [] => Ok(compiler.unit_value()),
        [(value, _)] => Ok(*value),
        [(then_value, then_end), (else_value, else_end)] => {
            if then_value.get_type() == else_value.get_type() {
                let phi = emit(
                    compiler.builder.build_phi(then_value.get_type(), "ifvalue"),
                    line,
                )?;
                phi.add_incoming(&[(then_value, *then_end), (else_value, *else_end)]);
                Ok(phi.as_basic_value())
            } else {
                Ok(compiler.unit_value())
            }
        }
        _ => Ok(compiler.unit_value()),
    }
}

/// Emits a new function into the module and generates its body against
/// a fresh scope binding each parameter to stack storage. Functions are
/// uniformly numeric: every parameter and the return value are `num`.
pub fn gen_function<'a>(
    compiler: &mut Compiler<'a>,
    name: &str,
    parameters: &[String],
    body: &BlockStmt,
    line: u32,
) -> Result<FunctionValue<'a>, Diagnostic> {
    let previous_block = compiler.builder.get_insert_block();

    let f64_type = compiler.context.f64_type();
    let param_types: Vec<BasicMetadataTypeEnum> =
        parameters.iter().map(|_| f64_type.into()).collect();
    let fn_type = f64_type.fn_type(&param_types, false);
    let function = compiler.module.add_function(name, fn_type, None);

    let entry = compiler.context.append_basic_block(function, "entry");
    compiler.builder.position_at_end(entry);

    compiler.enter_scope();
    let result = gen_function_body(compiler, function, name, parameters, body, line);
    compiler.exit_scope();

    match previous_block {
        Some(block) => compiler.builder.position_at_end(block),
        None => compiler.builder.clear_insertion_position(),
    }

    result?;
    Ok(function)
}

fn gen_function_body<'a>(
    compiler: &mut Compiler<'a>,
    function: FunctionValue<'a>,
    name: &str,
    parameters: &[String],
    body: &BlockStmt,
    line: u32,
) -> Result<(), Diagnostic> {
    for (index, parameter) in parameters.iter().enumerate() {
        let argument = function
            .get_nth_param(index as u32)
            .expect("the signature was built from this parameter list")
            .into_float_value();
        argument.set_name(parameter);

        let alloca = compiler.create_entry_block_alloca(
            compiler.context.f64_type().into(),
            parameter,
            line,
        )?;
        emit(compiler.builder.build_store(alloca, argument), line)?;
        compiler.declare(parameter, Binding::Variable(alloca), line)?;
    }

    gen_block(compiler, body)?;

    let block = compiler
        .builder
        .get_insert_block()
        .expect("the builder is positioned while generating a body");
    if block.get_terminator().is_none() {
        let reachable = block.get_first_use().is_some()
            || function.get_first_basic_block() == Some(block);
        if reachable {
            return Err(Diagnostic::codegen(
                DiagnosticKind::MissingReturn {
                    function: name.to_string(),
                },
                line,
            ));
        }
        // a dangling merge block on a body whose branches all return
        emit(compiler.builder.build_unreachable(), line)?;
    }

    Ok(())
}

/// Resolves the callee, generates the arguments left to right, and
/// emits the call.
fn gen_call_expr<'a>(
    compiler: &mut Compiler<'a>,
    callee: &Expr,
    arguments: &[Expr],
    line: u32,
) -> Result<BasicValueEnum<'a>, Diagnostic> {
    let name = match callee {
        Expr::Identifier { name, .. } => name,
        other => {
            return Err(Diagnostic::codegen(
                DiagnosticKind::NotCallable {
                    name: other.to_string(),
                },
                line,
            ))
        }
    };

    // Scope bindings win; otherwise fall back to the module so a
    // function body can call itself while it is still being generated.
    let function = match compiler.resolve(name) {
        Some(Binding::Function(function)) => function,
        Some(Binding::Variable(_)) => {
            return Err(Diagnostic::codegen(
                DiagnosticKind::NotCallable {
                    name: name.to_string(),
                },
                line,
            ))
        }
        None => match compiler.module.get_function(name) {
            Some(function) => function,
            None => {
                return Err(Diagnostic::codegen(
                    DiagnosticKind::UndefinedSymbol {
                        name: name.to_string(),
                    },
                    line,
                ))
            }
        },
    };

    let expected = function.count_params() as usize;
    if arguments.len() != expected {
        return Err(Diagnostic::codegen(
            DiagnosticKind::ArityMismatch {
                expected,
                received: arguments.len(),
            },
            line,
        ));
    }

    let mut args: Vec<BasicMetadataValueEnum> = vec![];
    for argument in arguments {
        let value = gen_expression(compiler, argument)?;
        if !value.is_float_value() {
            return Err(type_mismatch("num", &value, argument.line()));
        }
        args.push(value.into());
    }

    let call = emit(compiler.builder.build_call(function, &args, "call"), line)?;
    Ok(call
        .try_as_basic_value()
        .left()
        .unwrap_or(compiler.unit_value()))
}

/// Fixed-size contiguous storage sized to the literal's element count.
/// Elements must agree in kind; the value is a pointer to the storage.
fn gen_array_literal<'a>(
    compiler: &mut Compiler<'a>,
    elements: &[Expr],
    line: u32,
) -> Result<BasicValueEnum<'a>, Diagnostic> {
    let mut values = vec![];
    for element in elements {
        values.push((gen_expression(compiler, element)?, element.line()));
    }

    let element_type = values
        .first()
        .map(|(value, _)| value.get_type())
        .unwrap_or(compiler.context.f64_type().into());

    for (value, element_line) in &values {
        if value.get_type() != element_type {
            return Err(Diagnostic::codegen(
                DiagnosticKind::TypeMismatch {
                    expected: value_kind(&values[0].0).to_string(),
                    found: value_kind(value).to_string(),
                },
                *element_line,
            ));
        }
    }

    let array_type = element_type.array_type(values.len() as u32);
    let storage = emit(compiler.builder.build_alloca(array_type, "array"), line)?;

    let i64_type = compiler.context.i64_type();
    for (index, (value, element_line)) in values.iter().enumerate() {
        let slot = unsafe {
            emit(
                compiler.builder.build_in_bounds_gep(
                    storage,
                    &[i64_type.const_zero(), i64_type.const_int(index as u64, false)],
                    "slot",
                ),
                *element_line,
            )?
        };
        emit(compiler.builder.build_store(slot, *value), *element_line)?;
    }

    Ok(storage.into())
}

/// Indexing loads from the array's storage. Indices are not
/// bounds-checked at this layer.
fn gen_index_expr<'a>(
    compiler: &mut Compiler<'a>,
    left: &Expr,
    index: &Expr,
    line: u32,
) -> Result<BasicValueEnum<'a>, Diagnostic> {
    let target = gen_expression(compiler, left)?;
    let pointer = match target {
        BasicValueEnum::PointerValue(pointer) => pointer,
        other => return Err(type_mismatch("array", &other, line)),
    };

    if !matches!(
        pointer.get_type().get_element_type(),
        AnyTypeEnum::ArrayType(_)
    ) {
        return Err(type_mismatch("array", &target, line));
    }

    let index_value = gen_expression(compiler, index)?;
    let index_value = match index_value {
        BasicValueEnum::FloatValue(float) => emit(
            compiler
                .builder
                .build_float_to_signed_int(float, compiler.context.i64_type(), "idx"),
            line,
        )?,
        other => return Err(type_mismatch("num", &other, line)),
    };

    let slot = unsafe {
        emit(
            compiler.builder.build_in_bounds_gep(
                pointer,
                &[compiler.context.i64_type().const_zero(), index_value],
                "slot",
            ),
            line,
        )?
    };

    emit(compiler.builder.build_load(slot, "element"), line)
}

fn bool_operand<'a>(value: BasicValueEnum<'a>, line: u32) -> Result<IntValue<'a>, Diagnostic> {
    match value {
        BasicValueEnum::IntValue(int) if int.get_type().get_bit_width() == 1 => Ok(int),
        other => Err(type_mismatch("bool", &other, line)),
    }
}

fn type_mismatch(expected: &str, value: &BasicValueEnum, line: u32) -> Diagnostic {
    Diagnostic::codegen(
        DiagnosticKind::TypeMismatch {
            expected: expected.to_string(),
            found: value_kind(value).to_string(),
        },
        line,
    )
}
