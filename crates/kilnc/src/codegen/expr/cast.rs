//! `as` conversions.
//!
//! Integer to integer conversions truncate, or extend according to the
//! source type's signedness. Integers and pointers convert into each other
//! bitwise; pointer to pointer conversions only change the static type.

use crate::codegen::helpers::builder_err;
use crate::diagnostics::{Diagnostic, DiagnosticResult};
use crate::types::{self, SymbolTable};
use inkwell::types::BasicTypeEnum;
use inkwell::values::{BasicValue, BasicValueEnum};
use kiln_ast::CastExpr;

use crate::codegen::Value;

impl<'a> crate::codegen::CodeGen<'a> {
    pub(crate) fn lower_cast(
        &self,
        cast: &CastExpr,
        scope: &SymbolTable<'a>,
    ) -> DiagnosticResult<Value<'a>> {
        let span_start = cast.span.start;
        let target = types::resolve(self.context, &cast.ty.kind, cast.ty.is_pointer).ok_or_else(|| {
            Diagnostic::simple_with_span(
                format!("cannot convert to undefined type '{}'", cast.ty),
                cast.ty.span.start,
            )
        })?;
        let Some(target_llvm) = target.llvm else {
            return Err(Diagnostic::simple_with_span(
                "cannot convert to 'void'",
                cast.ty.span.start,
            ));
        };

        let src = self.lower_expr(&cast.expr, scope)?;
        let raw = self.expect_basic(src, cast.expr.span().start)?;

        let converted: BasicValueEnum<'a> = match (raw, target_llvm) {
            (BasicValueEnum::IntValue(v), BasicTypeEnum::IntType(t)) => self
                .builder
                .build_int_cast_sign_flag(v, t, src.ty.is_signed(), "conv")
                .map_err(builder_err(span_start))?
                .as_basic_value_enum(),
            (BasicValueEnum::IntValue(v), BasicTypeEnum::PointerType(t)) => self
                .builder
                .build_int_to_ptr(v, t, "inttoptr")
                .map_err(builder_err(span_start))?
                .as_basic_value_enum(),
            (BasicValueEnum::PointerValue(p), BasicTypeEnum::IntType(t)) => self
                .builder
                .build_ptr_to_int(p, t, "ptrtoint")
                .map_err(builder_err(span_start))?
                .as_basic_value_enum(),
            (BasicValueEnum::PointerValue(p), BasicTypeEnum::PointerType(_)) => {
                p.as_basic_value_enum()
            }
            _ => {
                return Err(Diagnostic::simple_with_span(
                    format!("cannot convert '{}' to '{}'", src.ty, target.ty),
                    span_start,
                ));
            }
        };
        Ok(Value::new(converted, target.ty))
    }
}
