//! Function call lowering.

use crate::codegen::helpers::builder_err;
use crate::diagnostics::{Diagnostic, DiagnosticResult};
use crate::types::SymbolTable;
use inkwell::values::BasicMetadataValueEnum;
use kiln_ast::CallExpr;

use crate::codegen::Value;

impl<'a> crate::codegen::CodeGen<'a> {
    /// Calls resolve against functions already declared or defined in this
    /// unit. Arity is checked before any argument is lowered; argument types
    /// are checked once all of them are.
    pub(crate) fn lower_call(
        &self,
        call: &CallExpr,
        scope: &SymbolTable<'a>,
    ) -> DiagnosticResult<Value<'a>> {
        let name = call.callee.sym.as_str();
        let span_start = call.span.start;
        let unknown = || {
            Diagnostic::simple_with_span(
                format!("unknown function '{}' referenced", name),
                call.callee.span.start,
            )
        };
        let function = self.module.get_function(name).ok_or_else(unknown)?;
        let sig = self
            .signatures
            .borrow()
            .get(name)
            .cloned()
            .ok_or_else(unknown)?;

        let arity_ok = if sig.is_vararg {
            call.args.len() >= sig.params.len()
        } else {
            call.args.len() == sig.params.len()
        };
        if !arity_ok {
            return Err(Diagnostic::simple_with_span("incorrect arguments passed", span_start)
                .with_note(format!(
                    "'{}' takes {}{} argument(s), {} given",
                    name,
                    if sig.is_vararg { "at least " } else { "" },
                    sig.params.len(),
                    call.args.len()
                )));
        }

        let mut lowered = Vec::with_capacity(call.args.len());
        for arg in &call.args {
            let v = self.lower_expr(arg, scope)?;
            let raw = self.expect_basic(v, arg.span().start)?;
            lowered.push((v.ty, raw));
        }

        for (idx, (param_ty, (arg_ty, _))) in sig.params.iter().zip(&lowered).enumerate() {
            if !param_ty.same_backend_type(*arg_ty) {
                return Err(Diagnostic::simple_with_span(
                    format!("incompatible type for argument {} of '{}'", idx + 1, name),
                    call.args[idx].span().start,
                )
                .with_note(format!("expected '{}', found '{}'", param_ty, arg_ty)));
            }
        }

        let args: Vec<BasicMetadataValueEnum<'a>> =
            lowered.iter().map(|(_, raw)| (*raw).into()).collect();
        let call_name = if sig.ret.is_void() { "" } else { "call" };
        let site = self
            .builder
            .build_call(function, &args, call_name)
            .map_err(builder_err(span_start))?;

        match site.try_as_basic_value().left() {
            Some(raw) => Ok(Value::new(raw, sig.ret)),
            None => Ok(Value::void()),
        }
    }
}
