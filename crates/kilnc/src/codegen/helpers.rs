//! Small helper utilities used across codegen lowering.
//!
//! - Boolean widening (`i1_to_boolean`) and condition narrowing
//!   (`build_condition`).
//! - Terminator checks used after every nested construct.
//! - Entry-block slot allocation.
//! - Builder error conversion into diagnostics.

use crate::diagnostics::{Diagnostic, DiagnosticResult};
use crate::types::KilnType;
use inkwell::IntPredicate;
use inkwell::basic_block::BasicBlock;
use inkwell::builder::BuilderError;
use inkwell::types::BasicTypeEnum;
use inkwell::values::{BasicValueEnum, FunctionValue, IntValue, PointerValue};

use super::Value;

/// Turn an inkwell builder failure into a diagnostic at `span_start`.
pub(crate) fn builder_err(span_start: usize) -> impl Fn(BuilderError) -> Diagnostic {
    move |e| Diagnostic::simple_with_span(format!("internal builder error: {}", e), span_start)
}

impl<'a> super::CodeGen<'a> {
    /// Widen a raw `i1` comparison result to the one-byte boolean.
    pub(crate) fn i1_to_boolean(
        &self,
        bit: IntValue<'a>,
        span_start: usize,
    ) -> DiagnosticResult<IntValue<'a>> {
        self.builder
            .build_int_z_extend(bit, self.context.i8_type(), "bool")
            .map_err(builder_err(span_start))
    }

    /// Compare a lowered condition against zero of its own type, producing
    /// the `i1` a conditional branch needs.
    pub(crate) fn build_condition(
        &self,
        cond: Value<'a>,
        span_start: usize,
    ) -> DiagnosticResult<IntValue<'a>> {
        match self.expect_basic(cond, span_start)? {
            BasicValueEnum::IntValue(v) => self
                .builder
                .build_int_compare(IntPredicate::NE, v, v.get_type().const_zero(), "cond")
                .map_err(builder_err(span_start)),
            BasicValueEnum::PointerValue(p) => self
                .builder
                .build_is_not_null(p, "cond")
                .map_err(builder_err(span_start)),
            _ => Err(Diagnostic::simple_with_span(
                "condition must be an integer or pointer",
                span_start,
            )),
        }
    }

    /// The backend value of `v`, rejecting results of void calls.
    pub(crate) fn expect_basic(
        &self,
        v: Value<'a>,
        span_start: usize,
    ) -> DiagnosticResult<BasicValueEnum<'a>> {
        v.raw
            .ok_or_else(|| {
                Diagnostic::simple_with_span("void value used in expression", span_start)
            })
    }

    /// The integer value of `v`, rejecting void and pointer values.
    pub(crate) fn expect_int(
        &self,
        v: Value<'a>,
        span_start: usize,
    ) -> DiagnosticResult<IntValue<'a>> {
        match self.expect_basic(v, span_start)? {
            BasicValueEnum::IntValue(i) => Ok(i),
            _ => Err(Diagnostic::simple_with_span(
                format!("integer operand required, found '{}'", v.ty),
                span_start,
            )),
        }
    }

    /// Whether the block the builder points into already has a terminator.
    pub(crate) fn current_block_terminated(&self) -> bool {
        self.builder
            .get_insert_block()
            .and_then(|bb| bb.get_terminator())
            .is_some()
    }

    // Emits `br target` unless the current block already ends in a terminator.
    pub(crate) fn ensure_unconditional_branch(
        &self,
        target: BasicBlock<'a>,
        span_start: usize,
    ) -> DiagnosticResult<()> {
        if !self.current_block_terminated() {
            self.builder
                .build_unconditional_branch(target)
                .map_err(builder_err(span_start))?;
        }
        Ok(())
    }

    /// Code after a `return`, `break` or `continue` still gets lowered (and
    /// checked); it just lands in a block nothing branches to.
    pub(crate) fn ensure_open_block(&self, function: FunctionValue<'a>) {
        if self.current_block_terminated() {
            let dead = self.context.append_basic_block(function, "unreachable");
            self.builder.position_at_end(dead);
        }
    }

    /// Allocate a slot in the function's entry block, so a slot is created
    /// once no matter how often its definition executes.
    pub(crate) fn build_entry_alloca(
        &self,
        function: FunctionValue<'a>,
        ty: BasicTypeEnum<'a>,
        name: &str,
        span_start: usize,
    ) -> DiagnosticResult<PointerValue<'a>> {
        let entry = function
            .get_first_basic_block()
            .ok_or_else(|| {
                Diagnostic::simple_with_span("function has no entry block", span_start)
            })?;
        let tmp = self.context.create_builder();
        match entry.get_first_instruction() {
            Some(first) => tmp.position_before(&first),
            None => tmp.position_at_end(entry),
        }
        tmp.build_alloca(ty, name).map_err(builder_err(span_start))
    }

    /// A zero of `ty`; used for `main`'s implicit return value.
    pub(crate) fn zero_value(&self, ty: KilnType) -> Option<BasicValueEnum<'a>> {
        match ty.basic_type(self.context)? {
            BasicTypeEnum::IntType(t) => Some(t.const_zero().into()),
            BasicTypeEnum::PointerType(t) => Some(t.const_null().into()),
            _ => None,
        }
    }

    /// Load the current value of a slot.
    pub(crate) fn load_slot(
        &self,
        slot: PointerValue<'a>,
        ty: KilnType,
        name: &str,
        span_start: usize,
    ) -> DiagnosticResult<Value<'a>> {
        let llvm_ty = ty.basic_type(self.context).ok_or_else(|| {
            Diagnostic::simple_with_span("cannot load a value of type 'void'", span_start)
        })?;
        let raw = self
            .builder
            .build_load(llvm_ty, slot, name)
            .map_err(builder_err(span_start))?;
        Ok(Value::new(raw, ty))
    }
}
