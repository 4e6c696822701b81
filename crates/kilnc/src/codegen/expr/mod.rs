//! Expression lowering
//!
//! `lower_expr` dispatches on the expression variant; every case returns a
//! [`Value`](super::Value) or fails with a diagnostic. The per-variant logic
//! lives in the sibling modules.

pub mod assignments;
pub mod binary_ops;
pub mod calls;
pub mod cast;
pub mod ident;
pub mod literals;
pub mod unary_ops;

use crate::diagnostics::DiagnosticResult;
use crate::types::SymbolTable;
use kiln_ast::Expr;

use super::Value;

impl<'a> crate::codegen::CodeGen<'a> {
    pub(crate) fn lower_expr(
        &self,
        expr: &Expr,
        scope: &SymbolTable<'a>,
    ) -> DiagnosticResult<Value<'a>> {
        match expr {
            Expr::Int(lit) => self.lower_int_lit(lit),
            Expr::Bool(lit) => self.lower_bool_lit(lit),
            Expr::Str(lit) => self.lower_str_lit(lit),
            Expr::Char(lit) => Ok(self.lower_char_lit(lit)),
            Expr::Ident(ident) => self.lower_ident(ident, scope),
            Expr::Unary(unary) => self.lower_unary(unary, scope),
            Expr::Binary(binary) => self.lower_binary(binary, scope),
            Expr::Assign(assign) => self.lower_assign(assign, scope),
            Expr::Call(call) => self.lower_call(call, scope),
            Expr::Cast(cast) => self.lower_cast(cast, scope),
            Expr::AddrOf(addr) => self.lower_addr_of(addr, scope),
            Expr::Deref(deref) => self.lower_deref(deref, scope),
        }
    }
}
