//! Assignment lowering: `=` and the compound forms.
//!
//! The target must be a plain variable reference bound to a mutable slot.
//! Every form stores and then reloads from the slot, so the expression's
//! value is what storage holds after the store.

use crate::codegen::helpers::builder_err;
use crate::diagnostics::{Diagnostic, DiagnosticResult};
use crate::types::SymbolTable;
use inkwell::values::BasicValueEnum;
use kiln_ast::{AssignExpr, Expr};

use crate::codegen::Value;

impl<'a> crate::codegen::CodeGen<'a> {
    pub(crate) fn lower_assign(
        &self,
        assign: &AssignExpr,
        scope: &SymbolTable<'a>,
    ) -> DiagnosticResult<Value<'a>> {
        let span_start = assign.span.start;
        let Expr::Ident(target) = &*assign.target else {
            return Err(Diagnostic::simple_with_span(
                "left-hand side was not a variable",
                assign.target.span().start,
            ));
        };
        let binding = scope.lookup(&target.sym).ok_or_else(|| {
            Diagnostic::simple_with_span(
                format!("unknown variable name '{}'", target.sym),
                target.span.start,
            )
        })?;
        if !binding.is_mutable {
            return Err(Diagnostic::simple_with_span(
                format!("assignment of read-only variable '{}'", target.sym),
                target.span.start,
            ));
        }

        let rhs = self.lower_expr(&assign.value, scope)?;
        let value_start = assign.value.span().start;
        let r = self.expect_basic(rhs, value_start)?;
        if !binding.ty.same_backend_type(rhs.ty) {
            return Err(Diagnostic::simple_with_span(
                "incompatible type for assignment",
                value_start,
            )
            .with_note(format!(
                "'{}' has type '{}', value has type '{}'",
                target.sym, binding.ty, rhs.ty
            )));
        }

        let stored: BasicValueEnum<'a> = match assign.op.binary_op() {
            None => r,
            Some(op) => {
                let current = self.load_slot(binding.slot, binding.ty, &target.sym, span_start)?;
                let l = self.expect_int(current, span_start)?;
                let r = self.expect_int(rhs, value_start)?;
                self.build_int_arith(op, l, r, binding.is_signed, span_start)?
                    .into()
            }
        };
        self.builder
            .build_store(binding.slot, stored)
            .map_err(builder_err(span_start))?;
        self.load_slot(binding.slot, binding.ty, &target.sym, span_start)
    }
}
