use crate::diagnostics::DiagnosticResult;
use crate::types::SymbolTable;
use kiln_ast::BlockStmt;

use crate::codegen::FnContext;

impl<'a> crate::codegen::CodeGen<'a> {
    /// A `{ ... }` block sees its parent's bindings; its own end with it.
    pub(crate) fn lower_block(
        &self,
        block: &BlockStmt,
        fx: &FnContext<'a>,
        parent: &SymbolTable<'a>,
    ) -> DiagnosticResult<()> {
        let mut scope = self.enter_scope(parent);
        self.lower_stmts(&block.stmts, fx, &mut scope)
    }
}
