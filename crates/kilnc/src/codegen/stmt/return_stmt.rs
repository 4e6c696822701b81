use crate::codegen::helpers::builder_err;
use crate::diagnostics::{Diagnostic, DiagnosticResult};
use crate::types::SymbolTable;
use kiln_ast::ReturnStmt;

use crate::codegen::FnContext;

impl<'a> crate::codegen::CodeGen<'a> {
    /// Store the result in the function's return slot and jump to its exit
    /// block. Every `return` in a function shares that one exit.
    pub(crate) fn lower_return(
        &self,
        ret: &ReturnStmt,
        fx: &FnContext<'a>,
        scope: &SymbolTable<'a>,
    ) -> DiagnosticResult<()> {
        let span_start = ret.span.start;
        match (&ret.arg, fx.ret_slot) {
            (Some(expr), Some(slot)) => {
                let v = self.lower_expr(expr, scope)?;
                let raw = self.expect_basic(v, expr.span().start)?;
                if !fx.ret_type.same_backend_type(v.ty) {
                    return Err(Diagnostic::simple_with_span(
                        "incompatible type for result type",
                        expr.span().start,
                    )
                    .with_note(format!(
                        "function returns '{}', value has type '{}'",
                        fx.ret_type, v.ty
                    )));
                }
                self.builder
                    .build_store(slot, raw)
                    .map_err(builder_err(span_start))?;
            }
            (Some(expr), None) => {
                let v = self.lower_expr(expr, scope)?;
                if v.raw.is_some() {
                    return Err(Diagnostic::simple_with_span(
                        "return with a value in function returning 'void'",
                        expr.span().start,
                    ));
                }
            }
            (None, Some(_)) => {
                return Err(Diagnostic::simple_with_span(
                    format!("return with no value in function returning '{}'", fx.ret_type),
                    span_start,
                ));
            }
            (None, None) => {}
        }
        self.builder
            .build_unconditional_branch(fx.exit_block)
            .map_err(builder_err(span_start))?;
        Ok(())
    }
}
