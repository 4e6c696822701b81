//! Top-level codegen module
//!
//! `CodeGen` owns the LLVM `Module` and `Builder` for one translation unit
//! and borrows the shared `Context`. Lowering is organized across
//! submodules that each add methods to `CodeGen`:
//! - `emit` : top-level item lowering (declarations, definitions)
//! - `stmt` : statement lowering
//! - `expr` : expression lowering
//! - `helpers` : small re-usable utilities
//!
//! Errors propagate as `Diagnostic`s; the first one aborts the unit.

use crate::diagnostics::DiagnosticResult;
use crate::types::{FunctionSig, KilnType, SymbolTable};
use inkwell::basic_block::BasicBlock;
use inkwell::builder::Builder;
use inkwell::context::Context;
use inkwell::module::Module;
use inkwell::targets::TargetMachine;
use inkwell::values::{BasicValueEnum, FunctionValue, PointerValue};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;

pub mod emit;
pub mod expr;
pub mod helpers;
pub mod stmt;

/// Pass pipeline run on each function after it verifies.
pub const FUNCTION_PIPELINE: &str = "function(mem2reg,instcombine,reassociate,gvn,simplifycfg)";

/// Break/continue targets of the innermost enclosing loop.
#[derive(Clone, Copy)]
pub struct LoopContext<'a> {
    pub continue_block: BasicBlock<'a>,
    pub break_block: BasicBlock<'a>,
}

/// Per-function state statements need: where `return` stores and jumps.
#[derive(Clone, Copy)]
pub struct FnContext<'a> {
    pub function: FunctionValue<'a>,
    /// `None` for void functions.
    pub ret_slot: Option<PointerValue<'a>>,
    pub exit_block: BasicBlock<'a>,
    pub ret_type: KilnType,
}

/// A lowered expression. `raw` is `None` only for the result of a call to
/// a void function.
#[derive(Debug, Clone, Copy)]
pub struct Value<'a> {
    pub raw: Option<BasicValueEnum<'a>>,
    pub ty: KilnType,
}

impl<'a> Value<'a> {
    pub fn new(raw: BasicValueEnum<'a>, ty: KilnType) -> Self {
        Value { raw: Some(raw), ty }
    }

    pub fn void() -> Self {
        Value {
            raw: None,
            ty: KilnType::VOID,
        }
    }
}

/// Optimization settings for the per-function pipeline.
pub struct FunctionPasses {
    pub machine: TargetMachine,
    pub pipeline: &'static str,
}

// The main code generation structure for a single translation unit.
pub struct CodeGen<'a> {
    pub context: &'a Context,
    pub module: Module<'a>,
    pub builder: Builder<'a>,
    /// `None` at optimization level 0.
    pub passes: Option<FunctionPasses>,
    pub signatures: RefCell<HashMap<String, FunctionSig>>,
    pub loop_context_stack: RefCell<Vec<LoopContext<'a>>>,
    pub next_str_id: Cell<u32>,
    pub string_literals: RefCell<HashMap<Vec<u8>, PointerValue<'a>>>,
}

impl<'a> CodeGen<'a> {
    pub fn new(context: &'a Context, module_name: &str, passes: Option<FunctionPasses>) -> Self {
        CodeGen {
            context,
            module: context.create_module(module_name),
            builder: context.create_builder(),
            passes,
            signatures: RefCell::new(HashMap::new()),
            loop_context_stack: RefCell::new(Vec::new()),
            next_str_id: Cell::new(0),
            string_literals: RefCell::new(HashMap::new()),
        }
    }

    /// Lower every top-level item in source order.
    ///
    /// A call can only name a function declared or defined above it (or the
    /// function being defined, for recursion).
    pub fn gen_module(&self, module: &kiln_ast::Module) -> DiagnosticResult<()> {
        for item in &module.items {
            match item {
                kiln_ast::TopLevel::FnDecl(decl) => {
                    self.gen_function_decl(decl)?;
                }
                kiln_ast::TopLevel::FnDef(def) => {
                    self.gen_function_def(def)?;
                }
            }
        }
        Ok(())
    }

    /// Give up the builder and hand the finished module to the caller.
    pub fn into_module(self) -> Module<'a> {
        self.module
    }

    /// Copy-based scope for a nested block.
    pub(crate) fn enter_scope(&self, parent: &SymbolTable<'a>) -> SymbolTable<'a> {
        parent.clone()
    }
}
