//! Kiln Parser
//!
//! A chumsky parser for the Kiln language. It turns one source file into a
//! [`kiln_ast::Module`] whose nodes carry byte spans back into the input.

mod common;
mod expr;
mod function;
mod stmt;
mod types;

use chumsky::prelude::*;
use common::{Extra, to_span, ws};
use kiln_ast::*;
use std::fmt;

/// The first error the parser hit, with the span it points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub message: String,
    pub span: Span,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ParseError {}

/// Parse a string into a Kiln AST module.
///
/// Only the first error is returned; the compiler aborts a translation unit
/// on its first problem anyway.
pub fn parse_module(input: &str) -> Result<Module, ParseError> {
    module_parser()
        .parse(input)
        .into_result()
        .map_err(|errors| match errors.into_iter().next() {
            Some(err) => ParseError {
                message: err.to_string(),
                span: to_span(*err.span()),
            },
            None => ParseError {
                message: "unexpected end of input".to_string(),
                span: input.len()..input.len(),
            },
        })
}

/// Top-level module parser.
///
/// A module is a sequence of function declarations and definitions,
/// terminated by end of input.
fn module_parser<'a>() -> impl Parser<'a, &'a str, Module, Extra<'a>> {
    let top_level = choice((
        function::fn_decl_parser().map(TopLevel::FnDecl),
        function::fn_def_parser().map(TopLevel::FnDef),
    ));

    ws().ignore_then(top_level.repeated().collect::<Vec<_>>())
        .then_ignore(end())
        .map_with(|items, e| Module {
            items,
            span: to_span(e.span()),
        })
}
