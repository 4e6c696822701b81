//! Statement parsers

use super::common::{Extra, ident_parser, kw, op, qualifier_parser, sym, to_span};
use super::expr::expr_parser;
use super::types::type_parser;
use chumsky::prelude::*;
use kiln_ast::*;

/// Parser for a braced statement list.
pub fn block_parser<'a, P>(stmt: P) -> impl Parser<'a, &'a str, BlockStmt, Extra<'a>> + Clone
where
    P: Parser<'a, &'a str, Stmt, Extra<'a>> + Clone + 'a,
{
    stmt.repeated()
        .collect::<Vec<_>>()
        .delimited_by(sym("{"), sym("}"))
        .map_with(|stmts, e| BlockStmt {
            stmts,
            span: to_span(e.span()),
        })
}

/// Parser for variable definitions, without the trailing `;`.
///
/// Pattern: `let mutable? name: type (= init)?`
pub fn var_def_parser<'a, P>(expr: P) -> impl Parser<'a, &'a str, VarDef, Extra<'a>> + Clone
where
    P: Parser<'a, &'a str, Expr, Extra<'a>> + Clone + 'a,
{
    kw("let")
        .ignore_then(qualifier_parser())
        .then(ident_parser())
        .then_ignore(sym(":"))
        .then(type_parser())
        .then(op("=").ignore_then(expr).or_not())
        .map_with(|(((qualifier, ident), ty), init), e| VarDef {
            qualifier,
            ident,
            ty,
            init,
            span: to_span(e.span()),
        })
}

/// Parser for statements.
pub fn stmt_parser<'a>() -> impl Parser<'a, &'a str, Stmt, Extra<'a>> + Clone {
    recursive(|stmt| {
        let expr = expr_parser().boxed();
        let paren_expr = expr.clone().delimited_by(sym("("), sym(")"));

        let empty = sym(";").map_with(|_, e| Stmt::Empty(to_span(e.span())));

        let block = block_parser(stmt.clone()).map(Stmt::Block);

        let loop_stmt = kw("loop")
            .ignore_then(stmt.clone())
            .map_with(|body, e| {
                Stmt::Loop(LoopStmt {
                    body: Box::new(body),
                    span: to_span(e.span()),
                })
            });

        let while_stmt = kw("while")
            .ignore_then(paren_expr.clone())
            .then(stmt.clone())
            .map_with(|(test, body), e| {
                Stmt::While(WhileStmt {
                    test,
                    body: Box::new(body),
                    span: to_span(e.span()),
                })
            });

        let for_init = choice((
            var_def_parser(expr.clone()).map(ForInit::VarDef),
            expr.clone().map(ForInit::Expr),
        ));
        let for_stmt = kw("for")
            .ignore_then(sym("("))
            .ignore_then(for_init.or_not())
            .then_ignore(sym(";"))
            .then(expr.clone().or_not())
            .then_ignore(sym(";"))
            .then(expr.clone().or_not())
            .then_ignore(sym(")"))
            .then(stmt.clone())
            .map_with(|(((init, test), update), body), e| {
                Stmt::For(ForStmt {
                    init,
                    test,
                    update,
                    body: Box::new(body),
                    span: to_span(e.span()),
                })
            });

        let if_stmt = kw("if")
            .ignore_then(paren_expr)
            .then(stmt.clone())
            .then(kw("else").ignore_then(stmt.clone()).or_not())
            .map_with(|((test, cons), alt), e| {
                Stmt::If(IfStmt {
                    test,
                    cons: Box::new(cons),
                    alt: alt.map(Box::new),
                    span: to_span(e.span()),
                })
            });

        let break_stmt = kw("break")
            .then_ignore(sym(";"))
            .map_with(|_, e| Stmt::Break(BreakStmt { span: to_span(e.span()) }));

        let continue_stmt = kw("continue")
            .then_ignore(sym(";"))
            .map_with(|_, e| Stmt::Continue(ContinueStmt { span: to_span(e.span()) }));

        let return_stmt = kw("return")
            .ignore_then(expr.clone().or_not())
            .then_ignore(sym(";"))
            .map_with(|arg, e| {
                Stmt::Return(ReturnStmt {
                    arg,
                    span: to_span(e.span()),
                })
            });

        let var_def = var_def_parser(expr.clone())
            .then_ignore(sym(";"))
            .map(Stmt::VarDef);

        let expr_stmt = expr
            .then_ignore(sym(";"))
            .map_with(|expr, e| {
                Stmt::Expr(ExprStmt {
                    expr,
                    span: to_span(e.span()),
                })
            });

        choice((
            empty,
            block,
            loop_stmt,
            while_stmt,
            for_stmt,
            if_stmt,
            break_stmt,
            continue_stmt,
            return_stmt,
            var_def,
            expr_stmt,
        ))
        .boxed()
    })
}
