//! Identifier lowering: a read of the variable's current value.

use crate::diagnostics::{Diagnostic, DiagnosticResult};
use crate::types::SymbolTable;
use kiln_ast::Ident;

use crate::codegen::Value;

impl<'a> crate::codegen::CodeGen<'a> {
    pub(crate) fn lower_ident(
        &self,
        ident: &Ident,
        scope: &SymbolTable<'a>,
    ) -> DiagnosticResult<Value<'a>> {
        let binding = scope.lookup(&ident.sym).ok_or_else(|| {
            Diagnostic::simple_with_span(
                format!("unknown variable '{}' referenced", ident.sym),
                ident.span.start,
            )
        })?;
        self.load_slot(binding.slot, binding.ty, &ident.sym, ident.span.start)
    }
}
