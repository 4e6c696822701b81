//! Statement lowering
//!
//! Statements lower into the block the builder points at. A statement that
//! ends its block (`return`, `break`, `continue`) leaves the builder in a
//! terminated block; whatever follows is lowered into a fresh block with no
//! predecessors so it is still checked.

pub mod block;
pub mod break_continue;
pub mod control_flow;
pub mod decl;
pub mod expr_stmt;
pub mod return_stmt;

use crate::diagnostics::DiagnosticResult;
use crate::types::SymbolTable;
use kiln_ast::Stmt;

use super::FnContext;

impl<'a> crate::codegen::CodeGen<'a> {
    /// Lower a sequence of statements into the current function.
    pub(crate) fn lower_stmts(
        &self,
        stmts: &[Stmt],
        fx: &FnContext<'a>,
        scope: &mut SymbolTable<'a>,
    ) -> DiagnosticResult<()> {
        for stmt in stmts {
            self.lower_stmt(stmt, fx, scope)?;
        }
        Ok(())
    }

    pub(crate) fn lower_stmt(
        &self,
        stmt: &Stmt,
        fx: &FnContext<'a>,
        scope: &mut SymbolTable<'a>,
    ) -> DiagnosticResult<()> {
        self.ensure_open_block(fx.function);
        match stmt {
            Stmt::Empty(_) => Ok(()),
            Stmt::Expr(expr_stmt) => self.lower_expr_stmt(expr_stmt, scope),
            Stmt::VarDef(var) => self.lower_var_def(var, fx, scope),
            Stmt::Return(ret) => self.lower_return(ret, fx, scope),
            Stmt::If(if_stmt) => self.lower_if(if_stmt, fx, scope),
            Stmt::Loop(loop_stmt) => self.lower_loop(loop_stmt, fx, scope),
            Stmt::While(while_stmt) => self.lower_while(while_stmt, fx, scope),
            Stmt::For(for_stmt) => self.lower_for(for_stmt, fx, scope),
            Stmt::Break(brk) => self.lower_break(brk),
            Stmt::Continue(cont) => self.lower_continue(cont),
            Stmt::Block(block) => self.lower_block(block, fx, scope),
        }
    }
}
