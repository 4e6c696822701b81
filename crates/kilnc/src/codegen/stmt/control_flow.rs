//! `if`, `loop`, `while` and `for`.
//!
//! All blocks of a construct are created before any of its parts are
//! lowered. After each nested statement the current block may already be
//! terminated, so the closing branch goes through
//! `ensure_unconditional_branch`.

use crate::codegen::helpers::builder_err;
use crate::diagnostics::DiagnosticResult;
use crate::types::SymbolTable;
use kiln_ast::{ForInit, ForStmt, IfStmt, LoopStmt, Stmt, WhileStmt};

use crate::codegen::{FnContext, LoopContext};

impl<'a> crate::codegen::CodeGen<'a> {
    pub(crate) fn lower_if(
        &self,
        if_stmt: &IfStmt,
        fx: &FnContext<'a>,
        scope: &SymbolTable<'a>,
    ) -> DiagnosticResult<()> {
        let span_start = if_stmt.span.start;
        let then_bb = self.context.append_basic_block(fx.function, "if.then");
        let else_bb = self.context.append_basic_block(fx.function, "if.else");
        let merge_bb = self.context.append_basic_block(fx.function, "if.merge");

        let cond = self.lower_expr(&if_stmt.test, scope)?;
        let bit = self.build_condition(cond, if_stmt.test.span().start)?;
        self.builder
            .build_conditional_branch(bit, then_bb, else_bb)
            .map_err(builder_err(span_start))?;

        self.builder.position_at_end(then_bb);
        self.lower_nested(&if_stmt.cons, fx, scope)?;
        self.ensure_unconditional_branch(merge_bb, span_start)?;

        self.builder.position_at_end(else_bb);
        if let Some(alt) = &if_stmt.alt {
            self.lower_nested(alt, fx, scope)?;
        }
        self.ensure_unconditional_branch(merge_bb, span_start)?;

        self.builder.position_at_end(merge_bb);
        Ok(())
    }

    pub(crate) fn lower_loop(
        &self,
        loop_stmt: &LoopStmt,
        fx: &FnContext<'a>,
        scope: &SymbolTable<'a>,
    ) -> DiagnosticResult<()> {
        let span_start = loop_stmt.span.start;
        let body_bb = self.context.append_basic_block(fx.function, "loop.body");
        let end_bb = self.context.append_basic_block(fx.function, "loop.end");

        self.builder
            .build_unconditional_branch(body_bb)
            .map_err(builder_err(span_start))?;

        self.builder.position_at_end(body_bb);
        self.lower_loop_body(&loop_stmt.body, body_bb, end_bb, fx, scope)?;
        self.ensure_unconditional_branch(body_bb, span_start)?;

        self.builder.position_at_end(end_bb);
        Ok(())
    }

    pub(crate) fn lower_while(
        &self,
        while_stmt: &WhileStmt,
        fx: &FnContext<'a>,
        scope: &SymbolTable<'a>,
    ) -> DiagnosticResult<()> {
        let span_start = while_stmt.span.start;
        let cond_bb = self.context.append_basic_block(fx.function, "while.cond");
        let body_bb = self.context.append_basic_block(fx.function, "while.body");
        let after_bb = self.context.append_basic_block(fx.function, "while.after");

        self.builder
            .build_unconditional_branch(cond_bb)
            .map_err(builder_err(span_start))?;

        self.builder.position_at_end(cond_bb);
        let cond = self.lower_expr(&while_stmt.test, scope)?;
        let bit = self.build_condition(cond, while_stmt.test.span().start)?;
        self.builder
            .build_conditional_branch(bit, body_bb, after_bb)
            .map_err(builder_err(span_start))?;

        self.builder.position_at_end(body_bb);
        self.lower_loop_body(&while_stmt.body, cond_bb, after_bb, fx, scope)?;
        self.ensure_unconditional_branch(cond_bb, span_start)?;

        self.builder.position_at_end(after_bb);
        Ok(())
    }

    /// `for (init; test; update) body`
    ///
    /// The init clause gets its own scope, so a variable it defines is gone
    /// after the loop. `continue` jumps to the update step.
    pub(crate) fn lower_for(
        &self,
        for_stmt: &ForStmt,
        fx: &FnContext<'a>,
        parent: &SymbolTable<'a>,
    ) -> DiagnosticResult<()> {
        let span_start = for_stmt.span.start;
        let mut scope = self.enter_scope(parent);

        match &for_stmt.init {
            Some(ForInit::VarDef(var)) => self.lower_var_def(var, fx, &mut scope)?,
            Some(ForInit::Expr(expr)) => {
                self.lower_expr(expr, &scope)?;
            }
            None => {}
        }

        let cond_bb = self.context.append_basic_block(fx.function, "for.cond");
        let body_bb = self.context.append_basic_block(fx.function, "for.body");
        let incr_bb = self.context.append_basic_block(fx.function, "for.incr");
        let after_bb = self.context.append_basic_block(fx.function, "for.after");

        self.builder
            .build_unconditional_branch(cond_bb)
            .map_err(builder_err(span_start))?;

        self.builder.position_at_end(cond_bb);
        match &for_stmt.test {
            Some(test) => {
                let cond = self.lower_expr(test, &scope)?;
                let bit = self.build_condition(cond, test.span().start)?;
                self.builder
                    .build_conditional_branch(bit, body_bb, after_bb)
                    .map_err(builder_err(span_start))?;
            }
            None => {
                self.builder
                    .build_unconditional_branch(body_bb)
                    .map_err(builder_err(span_start))?;
            }
        }

        self.builder.position_at_end(body_bb);
        self.lower_loop_body(&for_stmt.body, incr_bb, after_bb, fx, &scope)?;
        self.ensure_unconditional_branch(incr_bb, span_start)?;

        self.builder.position_at_end(incr_bb);
        if let Some(update) = &for_stmt.update {
            self.lower_expr(update, &scope)?;
        }
        self.builder
            .build_unconditional_branch(cond_bb)
            .map_err(builder_err(span_start))?;

        self.builder.position_at_end(after_bb);
        Ok(())
    }

    /// Lower a loop body with `continue_block`/`break_block` as the targets
    /// of its unlabeled `continue`/`break`.
    fn lower_loop_body(
        &self,
        body: &Stmt,
        continue_block: inkwell::basic_block::BasicBlock<'a>,
        break_block: inkwell::basic_block::BasicBlock<'a>,
        fx: &FnContext<'a>,
        scope: &SymbolTable<'a>,
    ) -> DiagnosticResult<()> {
        self.loop_context_stack.borrow_mut().push(LoopContext {
            continue_block,
            break_block,
        });
        let result = self.lower_nested(body, fx, scope);
        self.loop_context_stack.borrow_mut().pop();
        result
    }

    /// A statement in a branch or loop body. Definitions it makes do not
    /// escape into the enclosing scope even without braces.
    fn lower_nested(
        &self,
        stmt: &Stmt,
        fx: &FnContext<'a>,
        scope: &SymbolTable<'a>,
    ) -> DiagnosticResult<()> {
        let mut inner = self.enter_scope(scope);
        self.lower_stmt(stmt, fx, &mut inner)
    }
}
