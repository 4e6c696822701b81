//! Function-related parsers
//!
//! Declarations (`extern` prototypes) and definitions (`fn` with a body)
//! share one prototype grammar.

use super::common::{Extra, ident_parser, kw, qualifier_parser, sym, to_span};
use super::stmt::{block_parser, stmt_parser};
use super::types::type_parser;
use chumsky::prelude::*;
use kiln_ast::*;

/// Pattern: `mutable? name: type` or `...`
fn param_parser<'a>() -> impl Parser<'a, &'a str, Param, Extra<'a>> + Clone {
    let vararg = sym("...").map_with(|_, e| Param::VarArg(to_span(e.span())));

    let named = qualifier_parser()
        .then(ident_parser())
        .then_ignore(sym(":"))
        .then(type_parser())
        .map_with(|((qualifier, ident), ty), e| {
            Param::Named(NamedParam {
                qualifier,
                ident,
                ty,
                span: to_span(e.span()),
            })
        });

    choice((vararg, named))
}

/// Pattern: `private? name(params) -> type`
fn proto_parser<'a>()
-> impl Parser<'a, &'a str, (Linkage, Ident, Vec<Param>, TypeInfo), Extra<'a>> + Clone {
    kw("private")
        .or_not()
        .then(ident_parser())
        .then(
            param_parser()
                .separated_by(sym(","))
                .collect::<Vec<_>>()
                .delimited_by(sym("("), sym(")")),
        )
        .then_ignore(sym("->"))
        .then(type_parser())
        .map(|(((private, ident), params), return_type)| {
            let linkage = if private.is_some() {
                Linkage::Internal
            } else {
                Linkage::External
            };
            (linkage, ident, params, return_type)
        })
}

/// Pattern: `extern proto;`
pub fn fn_decl_parser<'a>() -> impl Parser<'a, &'a str, FnDecl, Extra<'a>> + Clone {
    kw("extern")
        .ignore_then(proto_parser())
        .then_ignore(sym(";"))
        .map_with(|(linkage, ident, params, return_type), e| FnDecl {
            linkage,
            ident,
            params,
            return_type,
            span: to_span(e.span()),
        })
}

/// Pattern: `fn proto { body }`
pub fn fn_def_parser<'a>() -> impl Parser<'a, &'a str, FnDef, Extra<'a>> + Clone {
    kw("fn")
        .ignore_then(proto_parser().map_with(|proto, e| (proto, to_span(e.span()))))
        .then(block_parser(stmt_parser()))
        .map_with(|(((linkage, ident, params, return_type), proto_span), body), e| FnDef {
            decl: FnDecl {
                linkage,
                ident,
                params,
                return_type,
                span: proto_span,
            },
            body,
            span: to_span(e.span()),
        })
}
