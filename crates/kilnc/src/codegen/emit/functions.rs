use crate::codegen::FnContext;
use crate::codegen::helpers::builder_err;
use crate::diagnostics::{Diagnostic, DiagnosticResult};
use crate::types::{self, Binding, FunctionSig, KilnType, SymbolTable};
use inkwell::module::Linkage as LlvmLinkage;
use inkwell::passes::PassBuilderOptions;
use inkwell::types::{BasicMetadataTypeEnum, BasicType, BasicTypeEnum};
use inkwell::values::{BasicValue, BasicValueEnum};
use inkwell::values::FunctionValue;
use kiln_ast::{FnDecl, FnDef, Linkage, Param};

impl<'a> crate::codegen::CodeGen<'a> {
    /// Declare a function, or return the existing declaration when an
    /// identical prototype was seen before.
    pub fn gen_function_decl(&self, decl: &FnDecl) -> DiagnosticResult<FunctionValue<'a>> {
        let name = decl.ident.sym.as_str();
        validate_params(decl)?;

        let mut param_types = Vec::with_capacity(decl.params.len());
        let mut param_llvm: Vec<BasicMetadataTypeEnum<'a>> = Vec::with_capacity(decl.params.len());
        for param in &decl.params {
            let Param::Named(p) = param else { continue };
            let llvm = types::resolve(self.context, &p.ty.kind, p.ty.is_pointer)
                .and_then(|r| r.llvm.map(|llvm| (r.ty, llvm)));
            let Some((ty, llvm)) = llvm else {
                return Err(Diagnostic::simple_with_span(
                    "arguments of undefined types cannot be declared",
                    p.ty.span.start,
                )
                .with_note(format!("parameter '{}' has type '{}'", p.ident.sym, p.ty)));
            };
            param_types.push(ty);
            param_llvm.push(llvm.into());
        }

        let ret = types::resolve(
            self.context,
            &decl.return_type.kind,
            decl.return_type.is_pointer,
        )
        .ok_or_else(|| {
            Diagnostic::simple_with_span(
                "return type cannot be an undefined type",
                decl.return_type.span.start,
            )
            .with_note(format!("'{}' returns '{}'", name, decl.return_type))
        })?;

        let sig = FunctionSig {
            params: param_types,
            ret: ret.ty,
            is_vararg: decl.is_vararg(),
        };

        if let Some(existing) = self.module.get_function(name) {
            let same = self.signatures.borrow().get(name) == Some(&sig);
            if !same {
                return Err(Diagnostic::simple_with_span(
                    format!("conflicting types for '{}'", name),
                    decl.ident.span.start,
                ));
            }
            return Ok(existing);
        }

        let fn_type = match ret.llvm {
            Some(llvm) => llvm.fn_type(&param_llvm, sig.is_vararg),
            None => self.context.void_type().fn_type(&param_llvm, sig.is_vararg),
        };
        let linkage = match decl.linkage {
            Linkage::External => LlvmLinkage::External,
            Linkage::Internal => LlvmLinkage::Internal,
        };
        let function = self.module.add_function(name, fn_type, Some(linkage));

        let named = decl.params.iter().filter_map(|p| match p {
            Param::Named(p) => Some(p.ident.sym.as_str()),
            Param::VarArg(_) => None,
        });
        for (value, pname) in function.get_param_iter().zip(named) {
            value.set_name(pname);
        }

        log::debug!("declared function '{}' ({:?})", name, sig);
        self.signatures.borrow_mut().insert(name.to_string(), sig);
        Ok(function)
    }

    /// Lower a function definition.
    pub fn gen_function_def(&self, def: &FnDef) -> DiagnosticResult<FunctionValue<'a>> {
        let name = def.decl.ident.sym.as_str();
        let function = self.gen_function_decl(&def.decl)?;
        if function.count_basic_blocks() > 0 {
            return Err(Diagnostic::simple_with_span(
                format!("redefinition of '{}'", name),
                def.decl.ident.span.start,
            ));
        }
        let ret_type = self
            .signatures
            .borrow()
            .get(name)
            .map(|s| s.ret)
            .unwrap_or(KilnType::VOID);

        // A half-built body stays put: earlier calls may refer to `function`.
        if let Err(diag) = self.build_function_body(def, function, ret_type) {
            self.builder.clear_insertion_position();
            return Err(diag);
        }

        if !function.verify(false) {
            let detail = match self.module.verify() {
                Err(msg) => msg.to_string(),
                Ok(()) => String::from("function failed verification"),
            };
            self.builder.clear_insertion_position();
            let callee = function.as_global_value().as_pointer_value();
            if callee.get_first_use().is_none() {
                // SAFETY: nothing refers to `function` and the builder no
                // longer points into its blocks.
                unsafe { function.delete() };
            }
            return Err(Diagnostic::simple_with_span(
                format!("invalid code generated for '{}'", name),
                def.decl.ident.span.start,
            )
            .with_note(detail.trim_end().to_string()));
        }

        if let Some(passes) = &self.passes {
            self.module
                .run_passes(passes.pipeline, &passes.machine, PassBuilderOptions::create())
                .map_err(|e| {
                    Diagnostic::simple_with_span(
                        format!("optimization of '{}' failed: {}", name, e),
                        def.decl.ident.span.start,
                    )
                })?;
        }

        log::debug!("defined function '{}'", name);
        Ok(function)
    }

    fn build_function_body(
        &self,
        def: &FnDef,
        function: FunctionValue<'a>,
        ret_type: KilnType,
    ) -> DiagnosticResult<()> {
        let span_start = def.span.start;
        let entry = self.context.append_basic_block(function, "entry");
        let exit_block = self.context.append_basic_block(function, "exit");
        self.builder.position_at_end(entry);

        let mut scope = SymbolTable::new();
        let named = def.decl.params.iter().filter_map(|p| match p {
            Param::Named(p) => Some(p),
            Param::VarArg(_) => None,
        });
        for (value, param) in function.get_param_iter().zip(named) {
            let pname = param.ident.sym.as_str();
            if scope.exists(pname) {
                return Err(Diagnostic::simple_with_span(
                    format!("redefinition of '{}'", pname),
                    param.ident.span.start,
                ));
            }
            let resolved = types::resolve(self.context, &param.ty.kind, param.ty.is_pointer)
                .ok_or_else(|| {
                    Diagnostic::simple_with_span(
                        "arguments of undefined types cannot be declared",
                        param.ty.span.start,
                    )
                })?;
            let slot =
                self.build_entry_alloca(function, value.get_type(), pname, param.span.start)?;
            self.builder
                .build_store(slot, value)
                .map_err(builder_err(param.span.start))?;
            scope.register(
                pname,
                Binding {
                    slot,
                    ty: resolved.ty,
                    is_mutable: param.qualifier.is_mutable(),
                    is_signed: resolved.is_signed,
                },
            );
        }

        let ret_slot = match ret_type.basic_type(self.context) {
            Some(llvm) => Some(self.build_entry_alloca(function, llvm, "retval", span_start)?),
            None => None,
        };

        let fx = FnContext {
            function,
            ret_slot,
            exit_block,
            ret_type,
        };
        self.lower_stmts(&def.body.stmts, &fx, &mut scope)?;

        // Falling off the end of a value-returning function returns 0 from
        // `main` and an undefined value from anything else.
        if !self.current_block_terminated() {
            if let Some(slot) = ret_slot {
                let fallback = if def.decl.ident.sym == "main" {
                    self.zero_value(ret_type)
                } else {
                    ret_type.basic_type(self.context).and_then(undef_of)
                };
                if let Some(v) = fallback {
                    self.builder
                        .build_store(slot, v)
                        .map_err(builder_err(span_start))?;
                }
            }
            self.builder
                .build_unconditional_branch(exit_block)
                .map_err(builder_err(span_start))?;
        }

        if let Some(last) = function.get_last_basic_block()
            && last != exit_block
        {
            exit_block
                .move_after(last)
                .map_err(|_| {
                    Diagnostic::simple_with_span("failed to place exit block", span_start)
                })?;
        }
        self.builder.position_at_end(exit_block);
        match ret_slot {
            Some(slot) => {
                let v = self.load_slot(slot, ret_type, "ret", span_start)?;
                let raw = self.expect_basic(v, span_start)?;
                self.builder
                    .build_return(Some(&raw))
                    .map_err(builder_err(span_start))?;
            }
            None => {
                self.builder
                    .build_return(None)
                    .map_err(builder_err(span_start))?;
            }
        }
        Ok(())
    }
}

fn undef_of(ty: BasicTypeEnum<'_>) -> Option<BasicValueEnum<'_>> {
    match ty {
        BasicTypeEnum::IntType(t) => Some(t.get_undef().into()),
        BasicTypeEnum::PointerType(t) => Some(t.get_undef().into()),
        _ => None,
    }
}

/// At most one `...`, after at least one named parameter, and nothing after
/// it.
fn validate_params(decl: &FnDecl) -> DiagnosticResult<()> {
    let mut seen_vararg: Option<usize> = None;
    for (idx, param) in decl.params.iter().enumerate() {
        match param {
            Param::VarArg(span) => {
                if seen_vararg.is_some() {
                    return Err(Diagnostic::simple_with_span(
                        "cannot have multiple variable arguments",
                        span.start,
                    ));
                }
                if idx == 0 {
                    return Err(Diagnostic::simple_with_span(
                        "requires a named argument before '...'",
                        span.start,
                    ));
                }
                seen_vararg = Some(idx);
            }
            Param::Named(p) if seen_vararg.is_some() => {
                return Err(Diagnostic::simple_with_span(
                    "'...' must be the last parameter",
                    p.span.start,
                ));
            }
            Param::Named(_) => {}
        }
    }
    Ok(())
}
