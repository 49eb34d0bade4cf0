//! Main code generation module.
//!
//! This module contains the core Compiler structure and the entry point
//! that lowers a parsed program into LLVM IR. It manages the LLVM
//! context, module, and builder, plus the scope stack used for name
//! resolution during the walk.

use std::collections::HashMap;

use inkwell::{
    builder::{Builder, BuilderError},
    context::Context,
    module::Module,
    types::{AnyTypeEnum, BasicTypeEnum},
    values::{BasicValue, BasicValueEnum, FunctionValue, PointerValue},
};

use crate::{
    ast::ast::Program,
    errors::errors::{Diagnostic, DiagnosticKind},
};

use super::stmt::gen_statement;

/// What a name in scope resolves to: stack storage for a variable, or
/// a function declared in the module.
#[derive(Debug, Clone, Copy)]
pub enum Binding<'a> {
    Variable(PointerValue<'a>),
    Function(FunctionValue<'a>),
}

/// The state of one code generation run.
///
/// Every field is owned by this run; nothing is process-global, so
/// independent compilations can proceed concurrently as long as each
/// gets its own LLVM context and module.
///
/// Top-level statements are generated into a synthetic `main` function
/// against a single global scope. Scopes chain outward: lookups walk
/// from the innermost scope to the global one, and a name may shadow an
/// outer binding but not a binding in its own scope.
pub struct Compiler<'a> {
    /// Reference to the LLVM context
    pub context: &'a Context,
    /// The LLVM module being built
    pub module: Module<'a>,
    /// The LLVM IR builder
    pub builder: Builder<'a>,

    main_function: FunctionValue<'a>,
    scopes: Vec<HashMap<String, Binding<'a>>>,
    diagnostics: Vec<Diagnostic>,
    lambda_counter: usize,
}

impl<'a> Compiler<'a> {
    pub fn new(context: &'a Context, file_name: &str) -> Self {
        let module = context.create_module(file_name);
        let builder = context.create_builder();

        let main_type = context.i32_type().fn_type(&[], false);
        let main_function = module.add_function("main", main_type, None);
        let entry = context.append_basic_block(main_function, "entry");
        builder.position_at_end(entry);

        Compiler {
            context,
            module,
            builder,
            main_function,
            scopes: vec![HashMap::new()],
            diagnostics: vec![],
            lambda_counter: 0,
        }
    }

    /// Walks the program once in document order.
    ///
    /// A diagnostic aborts generation of the offending top-level
    /// statement only; the walk recovers and continues with the next
    /// one, so a single run reports every independent problem it can
    /// find.
    pub fn generate(mut self, program: &Program) -> (Module<'a>, Vec<Diagnostic>) {
        for statement in &program.statements {
            if self.block_terminated() {
                self.diagnostics.push(Diagnostic::codegen(
                    DiagnosticKind::UnreachableCode,
                    statement.line(),
                ));
                self.recover();
            }

            if let Err(diagnostic) = gen_statement(&mut self, statement) {
                self.diagnostics.push(diagnostic);
                self.recover();
            }
        }

        if !self.block_terminated() {
            let zero = self.context.i32_type().const_zero();
            if let Err(error) = self.builder.build_return(Some(&zero)) {
                self.diagnostics.push(Diagnostic::codegen(
                    DiagnosticKind::Backend {
                        message: error.to_string(),
                    },
                    0,
                ));
            }
        }

        (self.module, self.diagnostics)
    }

    /// Repositions into a fresh block of `main` and drops any scopes
    /// the failed statement left behind, so the next top-level
    /// statement starts from a clean state.
    fn recover(&mut self) {
        self.scopes.truncate(1);
        let block = self.context.append_basic_block(self.main_function, "recover");
        self.builder.position_at_end(block);
    }

    /// Whether the block under the cursor already ends in a terminator.
    pub(crate) fn block_terminated(&self) -> bool {
        self.builder
            .get_insert_block()
            .and_then(|block| block.get_terminator())
            .is_some()
    }

    /// The function currently being emitted into.
    pub(crate) fn current_function(&self) -> FunctionValue<'a> {
        self.builder
            .get_insert_block()
            .and_then(|block| block.get_parent())
            .unwrap_or(self.main_function)
    }

    /// Whether emission is currently inside the synthetic `main` (the
    /// top level of the program) rather than a declared function.
    pub(crate) fn in_main_function(&self) -> bool {
        self.current_function() == self.main_function
    }

    pub(crate) fn enter_scope(&mut self) {
        self.scopes.push(HashMap::new());
    }

    pub(crate) fn exit_scope(&mut self) {
        self.scopes.pop();
    }

    /// Binds a name in the innermost scope. Shadowing an outer scope is
    /// allowed; rebinding within the same scope is not.
    pub(crate) fn declare(
        &mut self,
        name: &str,
        binding: Binding<'a>,
        line: u32,
    ) -> Result<(), Diagnostic> {
        let scope = self
            .scopes
            .last_mut()
            .expect("the global scope outlives the whole run");

        if scope.contains_key(name) {
            return Err(Diagnostic::codegen(
                DiagnosticKind::DuplicateSymbol {
                    name: name.to_string(),
                },
                line,
            ));
        }

        scope.insert(name.to_string(), binding);
        Ok(())
    }

    /// Resolves a name by walking outward through enclosing scopes.
    pub(crate) fn resolve(&self, name: &str) -> Option<Binding<'a>> {
        for scope in self.scopes.iter().rev() {
            if let Some(binding) = scope.get(name) {
                return Some(*binding);
            }
        }
        None
    }

    /// Whether the given stack slot belongs to the function currently
    /// being emitted. Storage of an enclosing function is not loadable
    /// from another one; there is no capture.
    pub(crate) fn owns_storage(&self, alloca: PointerValue<'a>) -> bool {
        let owner = alloca
            .as_instruction_value()
            .and_then(|instruction| instruction.get_parent())
            .and_then(|block| block.get_parent());
        owner == Some(self.current_function())
    }

    /// Allocates local storage in the entry block of the current
    /// function, regardless of where in the body the declaration
    /// textually occurs.
    pub(crate) fn create_entry_block_alloca(
        &self,
        ty: BasicTypeEnum<'a>,
        name: &str,
        line: u32,
    ) -> Result<PointerValue<'a>, Diagnostic> {
        let builder = self.context.create_builder();
        let entry = self
            .current_function()
            .get_first_basic_block()
            .expect("functions are created with an entry block");

        match entry.get_first_instruction() {
            Some(instruction) => builder.position_before(&instruction),
            None => builder.position_at_end(entry),
        }

        emit(builder.build_alloca(ty, name), line)
    }

    /// The language's unit value, used where an expression has no
    /// other defined result.
    pub(crate) fn unit_value(&self) -> BasicValueEnum<'a> {
        self.context.f64_type().const_zero().into()
    }

    pub(crate) fn next_lambda_name(&mut self) -> String {
        self.lambda_counter += 1;
        format!("lambda_{}", self.lambda_counter)
    }
}

/// Generates LLVM IR for a whole program.
///
/// Returns the module handle together with the codegen diagnostics.
/// Callers must not invoke this when lex or parse diagnostics exist.
pub fn generate<'a>(
    program: &Program,
    context: &'a Context,
    file_name: &str,
) -> (Module<'a>, Vec<Diagnostic>) {
    let compiler = Compiler::new(context, file_name);
    compiler.generate(program)
}

/// Surfaces a backend failure as a codegen diagnostic on the given
/// line.
pub(crate) fn emit<T>(result: Result<T, BuilderError>, line: u32) -> Result<T, Diagnostic> {
    result.map_err(|error| {
        Diagnostic::codegen(
            DiagnosticKind::Backend {
                message: error.to_string(),
            },
            line,
        )
    })
}

/// A short name for the kind of a generated value, used in type
/// mismatch diagnostics.
pub(crate) fn value_kind(value: &BasicValueEnum) -> &'static str {
    match value {
        BasicValueEnum::FloatValue(_) => "num",
        BasicValueEnum::IntValue(_) => "bool",
        BasicValueEnum::PointerValue(pointer) => match pointer.get_type().get_element_type() {
            AnyTypeEnum::ArrayType(_) => "array",
            AnyTypeEnum::FunctionType(_) => "function",
            _ => "str",
        },
        _ => "value",
    }
}
