//! Prefix operators: `+`, `-`, `&` and `*`.

use crate::codegen::helpers::builder_err;
use crate::diagnostics::{Diagnostic, DiagnosticResult};
use crate::types::SymbolTable;
use inkwell::values::{BasicValue, BasicValueEnum};
use kiln_ast::{AddrOfExpr, DerefExpr, Expr, UnaryExpr, UnaryOp};

use crate::codegen::Value;

impl<'a> crate::codegen::CodeGen<'a> {
    pub(crate) fn lower_unary(
        &self,
        unary: &UnaryExpr,
        scope: &SymbolTable<'a>,
    ) -> DiagnosticResult<Value<'a>> {
        let span_start = unary.span.start;
        let operand = self.lower_expr(&unary.arg, scope)?;
        let v = self.expect_int(operand, unary.arg.span().start)?;
        match unary.op {
            UnaryOp::Plus => Ok(Value::new(v.as_basic_value_enum(), operand.ty)),
            UnaryOp::Minus => {
                let neg = self
                    .builder
                    .build_int_sub(v.get_type().const_zero(), v, "neg")
                    .map_err(builder_err(span_start))?;
                Ok(Value::new(neg.as_basic_value_enum(), operand.ty))
            }
        }
    }

    /// `&x` yields the variable's slot; `&*p` yields `p` itself.
    pub(crate) fn lower_addr_of(
        &self,
        addr: &AddrOfExpr,
        scope: &SymbolTable<'a>,
    ) -> DiagnosticResult<Value<'a>> {
        match &*addr.arg {
            Expr::Ident(ident) => {
                let binding = scope.lookup(&ident.sym).ok_or_else(|| {
                    Diagnostic::simple_with_span(
                        format!("unknown variable '{}' referenced", ident.sym),
                        ident.span.start,
                    )
                })?;
                Ok(Value::new(
                    binding.slot.as_basic_value_enum(),
                    binding.ty.pointer_to(),
                ))
            }
            Expr::Deref(inner) => {
                let ptr = self.lower_expr(&inner.arg, scope)?;
                if !ptr.ty.is_pointer() {
                    return Err(Diagnostic::simple_with_span(
                        "unary '*' requires pointer operand",
                        inner.span.start,
                    ));
                }
                Ok(ptr)
            }
            other => Err(Diagnostic::simple_with_span(
                "lvalue required as unary '&' operand",
                other.span().start,
            )),
        }
    }

    pub(crate) fn lower_deref(
        &self,
        deref: &DerefExpr,
        scope: &SymbolTable<'a>,
    ) -> DiagnosticResult<Value<'a>> {
        let span_start = deref.span.start;
        let ptr = self.lower_expr(&deref.arg, scope)?;
        let pointee = ptr.ty.pointee().ok_or_else(|| {
            Diagnostic::simple_with_span("unary '*' requires pointer operand", span_start)
        })?;
        let BasicValueEnum::PointerValue(slot) = self.expect_basic(ptr, span_start)? else {
            return Err(Diagnostic::simple_with_span(
                "unary '*' requires pointer operand",
                span_start,
            ));
        };
        self.load_slot(slot, pointee, "deref", span_start)
    }
}
