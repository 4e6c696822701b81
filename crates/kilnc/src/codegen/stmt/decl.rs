//! Variable definitions.

use crate::codegen::helpers::builder_err;
use crate::diagnostics::{Diagnostic, DiagnosticResult};
use crate::types::{self, Binding, SymbolTable};
use kiln_ast::VarDef;

use crate::codegen::FnContext;

impl<'a> crate::codegen::CodeGen<'a> {
    /// `let [mutable] name: T [= init];`
    ///
    /// A name may not be defined twice while a binding for it is visible,
    /// which also rules out shadowing a name from an enclosing block.
    pub(crate) fn lower_var_def(
        &self,
        var: &VarDef,
        fx: &FnContext<'a>,
        scope: &mut SymbolTable<'a>,
    ) -> DiagnosticResult<()> {
        let name = var.ident.sym.as_str();
        let span_start = var.span.start;
        if scope.exists(name) {
            return Err(Diagnostic::simple_with_span(
                format!("redefinition of '{}'", name),
                var.ident.span.start,
            ));
        }

        let undefined = || {
            Diagnostic::simple_with_span(
                "variables of undefined type cannot be defined",
                var.ty.span.start,
            )
            .with_note(format!("'{}' has type '{}'", name, var.ty))
        };
        let resolved = types::resolve(self.context, &var.ty.kind, var.ty.is_pointer)
            .ok_or_else(undefined)?;
        let llvm_ty = resolved.llvm.ok_or_else(undefined)?;

        // The initializer cannot see the variable it initializes.
        let init = match &var.init {
            Some(expr) => {
                let v = self.lower_expr(expr, scope)?;
                let raw = self.expect_basic(v, expr.span().start)?;
                if !resolved.ty.same_backend_type(v.ty) {
                    return Err(Diagnostic::simple_with_span(
                        "incompatible type for initializer",
                        expr.span().start,
                    )
                    .with_note(format!(
                        "'{}' has type '{}', initializer has type '{}'",
                        name, resolved.ty, v.ty
                    )));
                }
                Some(raw)
            }
            None => None,
        };

        let slot = self.build_entry_alloca(fx.function, llvm_ty, name, span_start)?;
        if let Some(raw) = init {
            self.builder
                .build_store(slot, raw)
                .map_err(builder_err(span_start))?;
        }

        log::trace!("bound local '{}' as {}", name, resolved.ty);
        scope.register(
            name,
            Binding {
                slot,
                ty: resolved.ty,
                is_mutable: var.qualifier.is_mutable(),
                is_signed: resolved.is_signed,
            },
        );
        Ok(())
    }
}
