//! Expression parsers
//!
//! Precedence, lowest to highest:
//! 1. Assignment (`=`, `+=`, `-=`, `*=`, `/=`, `%=`), right associative
//! 2. Equality (`==`, `!=`)
//! 3. Relational (`<`, `<=`, `>`, `>=`)
//! 4. Additive (`+`, `-`)
//! 5. Multiplicative (`*`, `/`, `%`)
//! 6. Conversion (`expr as T`)
//! 7. Prefix (`+`, `-`, `&`, `*`)
//! 8. Primary (literals, calls, identifiers, parentheses)

use super::common::{Extra, ident_parser, kw, op, sym, to_span, ws};
use super::types::type_parser;
use chumsky::prelude::*;
use kiln_ast::*;

#[derive(Clone, Copy)]
enum Prefix {
    Plus,
    Minus,
    AddrOf,
    Deref,
}

fn binary(op: BinaryOp, left: Expr, right: Expr, span: SimpleSpan) -> Expr {
    Expr::Binary(BinaryExpr {
        op,
        left: Box::new(left),
        right: Box::new(right),
        span: to_span(span),
    })
}

/// `\n`-style and `\xHH` escapes inside string and char literals.
fn escape_parser<'a>() -> impl Parser<'a, &'a str, u8, Extra<'a>> + Clone {
    let hex = just('x').ignore_then(
        any()
            .filter(|c: &char| c.is_ascii_hexdigit())
            .repeated()
            .exactly(2)
            .to_slice()
            .try_map(|digits: &str, span| {
                u8::from_str_radix(digits, 16)
                    .map_err(|_| Rich::custom(span, "invalid hexadecimal escape"))
            }),
    );

    let named = one_of("abfnrtv0\\'\"").map(|c: char| match c {
        'a' => 0x07,
        'b' => 0x08,
        'f' => 0x0c,
        'n' => b'\n',
        'r' => b'\r',
        't' => b'\t',
        'v' => 0x0b,
        '0' => 0,
        other => other as u8,
    });

    just('\\').ignore_then(choice((hex, named)))
}

/// Literals: integers (with optional `u` suffix), booleans, strings, chars.
pub fn literal_parser<'a>() -> impl Parser<'a, &'a str, Expr, Extra<'a>> + Clone {
    let int = text::int(10)
        .then(just('u').or_not())
        .try_map(|(digits, suffix): (&str, Option<char>), span| {
            digits
                .parse::<u64>()
                .map(|value| (value, suffix.is_some()))
                .map_err(|_| {
                    Rich::custom(span, format!("integer literal '{}' is too large", digits))
                })
        })
        .map_with(|(value, unsigned), e| {
            Expr::Int(IntLit {
                value,
                unsigned,
                span: to_span(e.span()),
            })
        })
        .then_ignore(ws());

    let boolean = choice((kw("true").to(true), kw("false").to(false))).map_with(|value, e| {
        Expr::Bool(BoolLit {
            value,
            span: to_span(e.span()),
        })
    });

    let string = just('"')
        .ignore_then(
            choice((
                escape_parser().map(|b| vec![b]),
                none_of("\"\\\n").map(|c: char| c.to_string().into_bytes()),
            ))
            .repeated()
            .collect::<Vec<_>>(),
        )
        .then_ignore(just('"'))
        .map_with(|chunks: Vec<Vec<u8>>, e| {
            Expr::Str(StrLit {
                value: chunks.concat(),
                span: to_span(e.span()),
            })
        })
        .then_ignore(ws());

    let character = just('\'')
        .ignore_then(choice((
            escape_parser(),
            none_of("'\\\n").try_map(|c: char, span| {
                if c.is_ascii() {
                    Ok(c as u8)
                } else {
                    Err(Rich::custom(span, "character literal must be ASCII"))
                }
            }),
        )))
        .then_ignore(just('\''))
        .map_with(|value, e| {
            Expr::Char(CharLit {
                value,
                span: to_span(e.span()),
            })
        })
        .then_ignore(ws());

    choice((int, boolean, string, character))
}

/// Parser for expressions with proper precedence.
pub fn expr_parser<'a>() -> impl Parser<'a, &'a str, Expr, Extra<'a>> + Clone {
    recursive(|expr| {
        let call = ident_parser()
            .then(
                expr.clone()
                    .separated_by(sym(","))
                    .collect::<Vec<_>>()
                    .delimited_by(sym("("), sym(")")),
            )
            .map_with(|(callee, args), e| {
                Expr::Call(CallExpr {
                    callee,
                    args,
                    span: to_span(e.span()),
                })
            });

        let primary = choice((
            literal_parser(),
            call,
            ident_parser().map(Expr::Ident),
            expr.clone().delimited_by(sym("("), sym(")")),
        ))
        .boxed();

        let unary = recursive(|unary| {
            let prefix = choice((
                op("+").to(Prefix::Plus),
                op("-").to(Prefix::Minus),
                sym("&").to(Prefix::AddrOf),
                sym("*").to(Prefix::Deref),
            ));

            prefix
                .then(unary)
                .map_with(|(prefix, arg), e| {
                    let span = to_span(e.span());
                    let arg = Box::new(arg);
                    match prefix {
                        Prefix::Plus => Expr::Unary(UnaryExpr {
                            op: UnaryOp::Plus,
                            arg,
                            span,
                        }),
                        Prefix::Minus => Expr::Unary(UnaryExpr {
                            op: UnaryOp::Minus,
                            arg,
                            span,
                        }),
                        Prefix::AddrOf => Expr::AddrOf(AddrOfExpr { arg, span }),
                        Prefix::Deref => Expr::Deref(DerefExpr { arg, span }),
                    }
                })
                .or(primary)
        })
        .boxed();

        // `-x as i64` converts the negated value.
        let conversion = unary
            .foldl_with(
                kw("as").ignore_then(type_parser()).repeated(),
                |expr, ty, e| {
                    Expr::Cast(CastExpr {
                        expr: Box::new(expr),
                        ty,
                        span: to_span(e.span()),
                    })
                },
            )
            .boxed();

        let mul_op = choice((
            op("*").to(BinaryOp::Mul),
            op("/").to(BinaryOp::Div),
            op("%").to(BinaryOp::Mod),
        ));
        let product = conversion
            .clone()
            .foldl_with(mul_op.then(conversion).repeated(), |left, (op, right), e| {
                binary(op, left, right, e.span())
            })
            .boxed();

        let add_op = choice((op("+").to(BinaryOp::Add), op("-").to(BinaryOp::Sub)));
        let sum = product
            .clone()
            .foldl_with(add_op.then(product).repeated(), |left, (op, right), e| {
                binary(op, left, right, e.span())
            })
            .boxed();

        let rel_op = choice((
            sym("<=").to(BinaryOp::LtEq),
            sym(">=").to(BinaryOp::GtEq),
            op("<").to(BinaryOp::Lt),
            op(">").to(BinaryOp::Gt),
        ));
        let relation = sum
            .clone()
            .foldl_with(rel_op.then(sum).repeated(), |left, (op, right), e| {
                binary(op, left, right, e.span())
            })
            .boxed();

        let eq_op = choice((sym("==").to(BinaryOp::EqEq), sym("!=").to(BinaryOp::NotEq)));
        let equality = relation
            .clone()
            .foldl_with(eq_op.then(relation).repeated(), |left, (op, right), e| {
                binary(op, left, right, e.span())
            })
            .boxed();

        let assign_op = choice((
            sym("+=").to(AssignOp::AddAssign),
            sym("-=").to(AssignOp::SubAssign),
            sym("*=").to(AssignOp::MulAssign),
            sym("/=").to(AssignOp::DivAssign),
            sym("%=").to(AssignOp::ModAssign),
            op("=").to(AssignOp::Assign),
        ));

        equality
            .then(assign_op.then(expr).or_not())
            .map_with(|(target, rhs), e| match rhs {
                Some((op, value)) => Expr::Assign(AssignExpr {
                    op,
                    target: Box::new(target),
                    value: Box::new(value),
                    span: to_span(e.span()),
                }),
                None => target,
            })
    })
}
