//! Type descriptor parser
//!
//! Kiln types are a scalar name with an optional leading `*`. Names that are
//! not builtin scalars still parse as [`TypeKind::Named`]; the compiler
//! decides whether they resolve.

use super::common::{Extra, sym, to_span, ws};
use chumsky::prelude::*;
use kiln_ast::*;

fn kind_from_name(name: &str) -> TypeKind {
    match name {
        "void" => TypeKind::Void,
        "i8" => TypeKind::I8,
        "u8" => TypeKind::U8,
        "i16" => TypeKind::I16,
        "u16" => TypeKind::U16,
        "i32" => TypeKind::I32,
        "u32" => TypeKind::U32,
        "i64" => TypeKind::I64,
        "u64" => TypeKind::U64,
        "bool" => TypeKind::Bool,
        other => TypeKind::Named(other.to_string()),
    }
}

/// Pattern: `*? name`
pub fn type_parser<'a>() -> impl Parser<'a, &'a str, TypeInfo, Extra<'a>> + Clone {
    sym("*")
        .or_not()
        .then(text::ident().then_ignore(ws()))
        .map_with(|(star, name): (Option<()>, &str), e| TypeInfo {
            kind: kind_from_name(name),
            is_pointer: star.is_some(),
            span: to_span(e.span()),
        })
}
