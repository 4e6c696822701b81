//! Literal expression lowering
//!
//! - Integer literals take the smallest of `i32`/`i64` (or `u32`/`u64` with
//!   a `u` suffix) that holds the value.
//! - `true`/`false` are one-byte booleans.
//! - Character literals are `i8`.
//! - String literals become private NUL-terminated globals, one per distinct
//!   byte sequence, and evaluate to `*i8`.

use crate::diagnostics::{Diagnostic, DiagnosticResult};
use crate::types::KilnType;
use inkwell::module::Linkage;
use inkwell::values::BasicValue;
use kiln_ast::{BoolLit, CharLit, IntLit, StrLit};

use crate::codegen::Value;

impl<'a> crate::codegen::CodeGen<'a> {
    pub(crate) fn lower_int_lit(&self, lit: &IntLit) -> DiagnosticResult<Value<'a>> {
        let ty = int_literal_type(lit).ok_or_else(|| {
            Diagnostic::simple_with_span(
                format!("integer literal '{}' is too large", lit.value),
                lit.span.start,
            )
        })?;
        let int_ty = self.context.custom_width_int_type(ty.scalar.bits().unwrap_or(64));
        let v = int_ty.const_int(lit.value, false);
        Ok(Value::new(v.as_basic_value_enum(), ty))
    }

    pub(crate) fn lower_bool_lit(&self, lit: &BoolLit) -> DiagnosticResult<Value<'a>> {
        let v = self.context.i8_type().const_int(u64::from(lit.value), false);
        Ok(Value::new(v.as_basic_value_enum(), KilnType::BOOL))
    }

    pub(crate) fn lower_char_lit(&self, lit: &CharLit) -> Value<'a> {
        let v = self.context.i8_type().const_int(u64::from(lit.value), false);
        Value::new(v.as_basic_value_enum(), KilnType::I8)
    }

    pub(crate) fn lower_str_lit(&self, lit: &StrLit) -> DiagnosticResult<Value<'a>> {
        let str_ty = KilnType::I8.pointer_to();
        if let Some(ptr) = self.string_literals.borrow().get(&lit.value) {
            return Ok(Value::new(ptr.as_basic_value_enum(), str_ty));
        }

        let data = self.context.const_string(&lit.value, true);
        let id = self.next_str_id.get();
        self.next_str_id.set(id.wrapping_add(1));
        let gv = self
            .module
            .add_global(data.get_type(), None, &format!(".str.{}", id));
        gv.set_initializer(&data);
        gv.set_constant(true);
        gv.set_linkage(Linkage::Private);
        gv.set_unnamed_addr(true);

        let ptr = gv.as_pointer_value();
        self.string_literals
            .borrow_mut()
            .insert(lit.value.clone(), ptr);
        Ok(Value::new(ptr.as_basic_value_enum(), str_ty))
    }
}

/// The type an integer literal takes, `None` if no candidate holds it.
pub(crate) fn int_literal_type(lit: &IntLit) -> Option<KilnType> {
    let v = lit.value;
    if lit.unsigned {
        if v <= u64::from(u32::MAX) {
            Some(KilnType::U32)
        } else {
            Some(KilnType::U64)
        }
    } else if v <= i32::MAX as u64 {
        Some(KilnType::I32)
    } else if v <= i64::MAX as u64 {
        Some(KilnType::I64)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lit(value: u64, unsigned: bool) -> IntLit {
        IntLit {
            value,
            unsigned,
            span: 0..1,
        }
    }

    #[test]
    fn small_literals_are_32_bit() {
        assert_eq!(int_literal_type(&lit(7, false)), Some(KilnType::I32));
        assert_eq!(int_literal_type(&lit(7, true)), Some(KilnType::U32));
    }

    #[test]
    fn large_literals_widen_to_64_bit() {
        assert_eq!(int_literal_type(&lit(1 << 31, false)), Some(KilnType::I64));
        assert_eq!(int_literal_type(&lit(1 << 32, true)), Some(KilnType::U64));
        assert_eq!(int_literal_type(&lit(u64::MAX, true)), Some(KilnType::U64));
    }

    #[test]
    fn signed_literal_past_i64_is_rejected() {
        assert_eq!(int_literal_type(&lit(u64::MAX, false)), None);
    }
}
