use crate::codegen::helpers::builder_err;
use crate::diagnostics::DiagnosticResult;
use kiln_ast::{BreakStmt, ContinueStmt};

// Outside of any loop both statements are accepted and emit nothing.

impl<'a> crate::codegen::CodeGen<'a> {
    pub(crate) fn lower_break(&self, brk: &BreakStmt) -> DiagnosticResult<()> {
        let target = self.loop_context_stack.borrow().last().map(|c| c.break_block);
        match target {
            Some(bb) => {
                self.builder
                    .build_unconditional_branch(bb)
                    .map_err(builder_err(brk.span.start))?;
            }
            None => log::debug!("break outside of a loop at offset {} ignored", brk.span.start),
        }
        Ok(())
    }

    pub(crate) fn lower_continue(&self, cont: &ContinueStmt) -> DiagnosticResult<()> {
        let target = self
            .loop_context_stack
            .borrow()
            .last()
            .map(|c| c.continue_block);
        match target {
            Some(bb) => {
                self.builder
                    .build_unconditional_branch(bb)
                    .map_err(builder_err(cont.span.start))?;
            }
            None => log::debug!(
                "continue outside of a loop at offset {} ignored",
                cont.span.start
            ),
        }
        Ok(())
    }
}
