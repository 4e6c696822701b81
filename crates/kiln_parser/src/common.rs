//! Common parsing utilities
//!
//! Reusable building blocks shared by the expression, statement and
//! function parsers. Every token parser consumes the whitespace and
//! comments that follow it, so node spans start on the first real
//! character of the node.

use chumsky::prelude::*;
use kiln_ast::*;

/// Parser extra used by every Kiln parser.
pub type Extra<'a> = extra::Err<Rich<'a, char>>;

/// Words that can never be used as identifiers.
pub const KEYWORDS: &[&str] = &[
    "fn", "extern", "private", "mutable", "let", "return", "if", "else", "loop", "while", "for",
    "break", "continue", "true", "false", "as",
];

pub fn to_span(span: SimpleSpan) -> Span {
    span.start..span.end
}

/// Whitespace, `// line` comments and `/* block */` comments.
pub fn ws<'a>() -> impl Parser<'a, &'a str, (), Extra<'a>> + Clone {
    let line_comment = just("//")
        .then(any().and_is(just('\n').not()).repeated())
        .ignored();
    let block_comment = just("/*")
        .then(any().and_is(just("*/").not()).repeated())
        .then(just("*/"))
        .ignored();

    choice((
        one_of(" \t\r\n").ignored(),
        line_comment,
        block_comment,
    ))
    .repeated()
    .ignored()
}

/// A punctuation token.
pub fn sym<'a>(s: &'static str) -> impl Parser<'a, &'a str, (), Extra<'a>> + Clone {
    just(s).then_ignore(ws()).ignored()
}

/// An operator token that must not be the prefix of a compound assignment
/// (`+` but not `+=`, `=` but not `==`).
pub fn op<'a>(s: &'static str) -> impl Parser<'a, &'a str, (), Extra<'a>> + Clone {
    just(s)
        .then_ignore(just('=').not())
        .then_ignore(ws())
        .ignored()
}

/// A reserved word.
pub fn kw<'a>(s: &'static str) -> impl Parser<'a, &'a str, (), Extra<'a>> + Clone {
    text::keyword(s).then_ignore(ws()).ignored()
}

/// Parser for identifiers. Rejects reserved words.
pub fn ident_parser<'a>() -> impl Parser<'a, &'a str, Ident, Extra<'a>> + Clone {
    text::ident()
        .try_map(|sym: &str, span| {
            if KEYWORDS.contains(&sym) {
                Err(Rich::custom(
                    span,
                    format!("expected identifier, found keyword '{}'", sym),
                ))
            } else {
                Ok(sym.to_string())
            }
        })
        .map_with(|sym, e| Ident {
            sym,
            span: to_span(e.span()),
        })
        .then_ignore(ws())
}

/// Optional `mutable` qualifier.
pub fn qualifier_parser<'a>() -> impl Parser<'a, &'a str, VarQualifier, Extra<'a>> + Clone {
    kw("mutable")
        .or_not()
        .map(|q| match q {
            Some(()) => VarQualifier::Mutable,
            None => VarQualifier::Immutable,
        })
}
