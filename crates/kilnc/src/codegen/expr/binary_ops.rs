//! Binary arithmetic and comparison lowering.
//!
//! Both operands must lower to the same backend type. Signedness comes from
//! the left operand: it picks `sdiv`/`udiv`, `srem`/`urem` and the signed or
//! unsigned comparison predicates. Comparison results are widened to the
//! one-byte boolean.

use crate::codegen::helpers::builder_err;
use crate::diagnostics::{Diagnostic, DiagnosticResult};
use crate::types::{KilnType, SymbolTable};
use inkwell::IntPredicate;
use inkwell::values::{BasicValue, BasicValueEnum, IntValue};
use kiln_ast::{BinaryExpr, BinaryOp};

use crate::codegen::Value;

impl<'a> crate::codegen::CodeGen<'a> {
    pub(crate) fn lower_binary(
        &self,
        bin: &BinaryExpr,
        scope: &SymbolTable<'a>,
    ) -> DiagnosticResult<Value<'a>> {
        let span_start = bin.span.start;
        let lhs = self.lower_expr(&bin.left, scope)?;
        let rhs = self.lower_expr(&bin.right, scope)?;
        let l = self.expect_basic(lhs, bin.left.span().start)?;
        let r = self.expect_basic(rhs, bin.right.span().start)?;

        if !lhs.ty.same_backend_type(rhs.ty) {
            return Err(Diagnostic::simple_with_span(
                "both operands are not of the same type",
                span_start,
            )
            .with_note(format!("left is '{}', right is '{}'", lhs.ty, rhs.ty)));
        }

        match (l, r) {
            (BasicValueEnum::IntValue(l), BasicValueEnum::IntValue(r)) => {
                if bin.op.is_comparison() {
                    let bit =
                        self.build_int_comparison(bin.op, l, r, lhs.ty.is_signed(), span_start)?;
                    let b = self.i1_to_boolean(bit, span_start)?;
                    Ok(Value::new(b.as_basic_value_enum(), KilnType::BOOL))
                } else {
                    let v = self.build_int_arith(bin.op, l, r, lhs.ty.is_signed(), span_start)?;
                    Ok(Value::new(v.as_basic_value_enum(), lhs.ty))
                }
            }
            (BasicValueEnum::PointerValue(l), BasicValueEnum::PointerValue(r))
                if matches!(bin.op, BinaryOp::EqEq | BinaryOp::NotEq) =>
            {
                let pred = if bin.op == BinaryOp::EqEq {
                    IntPredicate::EQ
                } else {
                    IntPredicate::NE
                };
                let bit = self
                    .builder
                    .build_int_compare(pred, l, r, "ptrcmp")
                    .map_err(builder_err(span_start))?;
                let b = self.i1_to_boolean(bit, span_start)?;
                Ok(Value::new(b.as_basic_value_enum(), KilnType::BOOL))
            }
            _ => Err(Diagnostic::simple_with_span(
                format!("invalid operands to binary '{}'", bin.op),
                span_start,
            )),
        }
    }

    /// Arithmetic shared by binary expressions and compound assignment.
    pub(crate) fn build_int_arith(
        &self,
        op: BinaryOp,
        l: IntValue<'a>,
        r: IntValue<'a>,
        signed: bool,
        span_start: usize,
    ) -> DiagnosticResult<IntValue<'a>> {
        let b = &self.builder;
        let res = match op {
            BinaryOp::Add => b.build_int_add(l, r, "add"),
            BinaryOp::Sub => b.build_int_sub(l, r, "sub"),
            BinaryOp::Mul => b.build_int_mul(l, r, "mul"),
            BinaryOp::Div if signed => b.build_int_signed_div(l, r, "div"),
            BinaryOp::Div => b.build_int_unsigned_div(l, r, "div"),
            BinaryOp::Mod if signed => b.build_int_signed_rem(l, r, "rem"),
            BinaryOp::Mod => b.build_int_unsigned_rem(l, r, "rem"),
            cmp => {
                return Err(Diagnostic::simple_with_span(
                    format!("'{}' is not an arithmetic operator", cmp),
                    span_start,
                ));
            }
        };
        res.map_err(builder_err(span_start))
    }

    fn build_int_comparison(
        &self,
        op: BinaryOp,
        l: IntValue<'a>,
        r: IntValue<'a>,
        signed: bool,
        span_start: usize,
    ) -> DiagnosticResult<IntValue<'a>> {
        let pred = match (op, signed) {
            (BinaryOp::EqEq, _) => IntPredicate::EQ,
            (BinaryOp::NotEq, _) => IntPredicate::NE,
            (BinaryOp::Lt, true) => IntPredicate::SLT,
            (BinaryOp::Lt, false) => IntPredicate::ULT,
            (BinaryOp::LtEq, true) => IntPredicate::SLE,
            (BinaryOp::LtEq, false) => IntPredicate::ULE,
            (BinaryOp::Gt, true) => IntPredicate::SGT,
            (BinaryOp::Gt, false) => IntPredicate::UGT,
            (BinaryOp::GtEq, true) => IntPredicate::SGE,
            (BinaryOp::GtEq, false) => IntPredicate::UGE,
            (other, _) => {
                return Err(Diagnostic::simple_with_span(
                    format!("'{}' is not a comparison operator", other),
                    span_start,
                ));
            }
        };
        self.builder
            .build_int_compare(pred, l, r, "cmp")
            .map_err(builder_err(span_start))
    }
}
