use crate::diagnostics::DiagnosticResult;
use crate::types::SymbolTable;
use kiln_ast::ExprStmt;

impl<'a> crate::codegen::CodeGen<'a> {
    pub(crate) fn lower_expr_stmt(
        &self,
        stmt: &ExprStmt,
        scope: &SymbolTable<'a>,
    ) -> DiagnosticResult<()> {
        // Value discarded; void calls are fine here.
        self.lower_expr(&stmt.expr, scope)?;
        Ok(())
    }
}
