//! Kiln AST definitions
//!
//! This crate defines the abstract syntax tree (AST) for the Kiln language.
//! It serves as the contract between the parser and the compiler core.
//! Every node carries the byte span it was parsed from; the compiler uses
//! those spans only when it has to report a diagnostic.

use std::fmt;
use std::ops::Range;

/// Represents a source code span as a byte range.
pub type Span = Range<usize>;

/// The top-level module AST node (one translation unit).
#[derive(Debug, Clone)]
pub struct Module {
    pub items: Vec<TopLevel>,
    pub span: Span,
}

/// Items allowed at module scope.
#[derive(Debug, Clone)]
pub enum TopLevel {
    /// `extern name(...) -> T;`
    FnDecl(FnDecl),
    /// `fn name(...) -> T { ... }`
    FnDef(FnDef),
}

impl TopLevel {
    pub fn span(&self) -> Span {
        match self {
            TopLevel::FnDecl(d) => d.span.clone(),
            TopLevel::FnDef(d) => d.span.clone(),
        }
    }
}

/// Function linkage qualifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Linkage {
    /// No qualifier: visible outside the translation unit.
    #[default]
    External,
    /// `private`
    Internal,
}

/// Variable and parameter mutability qualifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VarQualifier {
    #[default]
    Immutable,
    /// `mutable`
    Mutable,
}

impl VarQualifier {
    pub fn is_mutable(self) -> bool {
        matches!(self, VarQualifier::Mutable)
    }
}

/// A function prototype.
#[derive(Debug, Clone)]
pub struct FnDecl {
    pub linkage: Linkage,
    pub ident: Ident,
    pub params: Vec<Param>,
    pub return_type: TypeInfo,
    pub span: Span,
}

impl FnDecl {
    pub fn is_vararg(&self) -> bool {
        self.params.iter().any(|p| matches!(p, Param::VarArg(_)))
    }
}

/// A function definition: a prototype plus its body.
#[derive(Debug, Clone)]
pub struct FnDef {
    pub decl: FnDecl,
    pub body: BlockStmt,
    pub span: Span,
}

/// Function parameter.
#[derive(Debug, Clone)]
pub enum Param {
    Named(NamedParam),
    /// The `...` marker.
    VarArg(Span),
}

impl Param {
    pub fn span(&self) -> Span {
        match self {
            Param::Named(p) => p.span.clone(),
            Param::VarArg(span) => span.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct NamedParam {
    pub qualifier: VarQualifier,
    pub ident: Ident,
    pub ty: TypeInfo,
    pub span: Span,
}

/// A source type descriptor: a scalar kind plus a pointer flag.
#[derive(Debug, Clone)]
pub struct TypeInfo {
    pub kind: TypeKind,
    pub is_pointer: bool,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeKind {
    Void,
    I8,
    U8,
    I16,
    U16,
    I32,
    U32,
    I64,
    U64,
    Bool,
    /// Any other identifier in type position. Never resolves.
    Named(String),
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TypeKind::Void => "void",
            TypeKind::I8 => "i8",
            TypeKind::U8 => "u8",
            TypeKind::I16 => "i16",
            TypeKind::U16 => "u16",
            TypeKind::I32 => "i32",
            TypeKind::U32 => "u32",
            TypeKind::I64 => "i64",
            TypeKind::U64 => "u64",
            TypeKind::Bool => "bool",
            TypeKind::Named(name) => name.as_str(),
        };
        f.write_str(s)
    }
}

impl fmt::Display for TypeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_pointer {
            write!(f, "*{}", self.kind)
        } else {
            write!(f, "{}", self.kind)
        }
    }
}

/// Identifier with its span.
#[derive(Debug, Clone)]
pub struct Ident {
    pub sym: String,
    pub span: Span,
}

/// Statements in the AST.
#[derive(Debug, Clone)]
pub enum Stmt {
    /// `;`
    Empty(Span),
    Expr(ExprStmt),
    VarDef(VarDef),
    Return(ReturnStmt),
    If(IfStmt),
    Loop(LoopStmt),
    While(WhileStmt),
    For(ForStmt),
    Break(BreakStmt),
    Continue(ContinueStmt),
    Block(BlockStmt),
}

impl Stmt {
    pub fn span(&self) -> Span {
        match self {
            Stmt::Empty(span) => span.clone(),
            Stmt::Expr(s) => s.span.clone(),
            Stmt::VarDef(s) => s.span.clone(),
            Stmt::Return(s) => s.span.clone(),
            Stmt::If(s) => s.span.clone(),
            Stmt::Loop(s) => s.span.clone(),
            Stmt::While(s) => s.span.clone(),
            Stmt::For(s) => s.span.clone(),
            Stmt::Break(s) => s.span.clone(),
            Stmt::Continue(s) => s.span.clone(),
            Stmt::Block(s) => s.span.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ExprStmt {
    pub expr: Expr,
    pub span: Span,
}

/// `let [mutable] name: T [= init];`
#[derive(Debug, Clone)]
pub struct VarDef {
    pub qualifier: VarQualifier,
    pub ident: Ident,
    pub ty: TypeInfo,
    pub init: Option<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct ReturnStmt {
    pub arg: Option<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct IfStmt {
    pub test: Expr,
    pub cons: Box<Stmt>,
    pub alt: Option<Box<Stmt>>,
    pub span: Span,
}

/// Unconditional `loop body`.
#[derive(Debug, Clone)]
pub struct LoopStmt {
    pub body: Box<Stmt>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct WhileStmt {
    pub test: Expr,
    pub body: Box<Stmt>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct ForStmt {
    pub init: Option<ForInit>,
    pub test: Option<Expr>,
    pub update: Option<Expr>,
    pub body: Box<Stmt>,
    pub span: Span,
}

/// The init clause of a `for` statement.
#[derive(Debug, Clone)]
pub enum ForInit {
    VarDef(VarDef),
    Expr(Expr),
}

#[derive(Debug, Clone)]
pub struct BreakStmt {
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct ContinueStmt {
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct BlockStmt {
    pub stmts: Vec<Stmt>,
    pub span: Span,
}

/// Expressions in the AST.
#[derive(Debug, Clone)]
pub enum Expr {
    Int(IntLit),
    Bool(BoolLit),
    Str(StrLit),
    Char(CharLit),
    Ident(Ident),
    Unary(UnaryExpr),
    Binary(BinaryExpr),
    Assign(AssignExpr),
    Call(CallExpr),
    Cast(CastExpr),
    AddrOf(AddrOfExpr),
    Deref(DerefExpr),
}

impl Expr {
    pub fn span(&self) -> Span {
        match self {
            Expr::Int(e) => e.span.clone(),
            Expr::Bool(e) => e.span.clone(),
            Expr::Str(e) => e.span.clone(),
            Expr::Char(e) => e.span.clone(),
            Expr::Ident(e) => e.span.clone(),
            Expr::Unary(e) => e.span.clone(),
            Expr::Binary(e) => e.span.clone(),
            Expr::Assign(e) => e.span.clone(),
            Expr::Call(e) => e.span.clone(),
            Expr::Cast(e) => e.span.clone(),
            Expr::AddrOf(e) => e.span.clone(),
            Expr::Deref(e) => e.span.clone(),
        }
    }
}

/// Integer literal. `unsigned` is set by a trailing `u`.
#[derive(Debug, Clone)]
pub struct IntLit {
    pub value: u64,
    pub unsigned: bool,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct BoolLit {
    pub value: bool,
    pub span: Span,
}

/// String literal with escapes already decoded.
#[derive(Debug, Clone)]
pub struct StrLit {
    pub value: Vec<u8>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct CharLit {
    pub value: u8,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Plus,
    Minus,
}

#[derive(Debug, Clone)]
pub struct UnaryExpr {
    pub op: UnaryOp,
    pub arg: Box<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    EqEq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
}

impl BinaryOp {
    pub fn is_comparison(self) -> bool {
        matches!(
            self,
            BinaryOp::EqEq
                | BinaryOp::NotEq
                | BinaryOp::Lt
                | BinaryOp::LtEq
                | BinaryOp::Gt
                | BinaryOp::GtEq
        )
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Mod => "%",
            BinaryOp::EqEq => "==",
            BinaryOp::NotEq => "!=",
            BinaryOp::Lt => "<",
            BinaryOp::LtEq => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::GtEq => ">=",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone)]
pub struct BinaryExpr {
    pub op: BinaryOp,
    pub left: Box<Expr>,
    pub right: Box<Expr>,
    pub span: Span,
}

/// `=` and the compound assignment operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignOp {
    Assign,
    AddAssign,
    SubAssign,
    MulAssign,
    DivAssign,
    ModAssign,
}

impl AssignOp {
    /// The arithmetic operator a compound form applies, `None` for plain `=`.
    pub fn binary_op(self) -> Option<BinaryOp> {
        match self {
            AssignOp::Assign => None,
            AssignOp::AddAssign => Some(BinaryOp::Add),
            AssignOp::SubAssign => Some(BinaryOp::Sub),
            AssignOp::MulAssign => Some(BinaryOp::Mul),
            AssignOp::DivAssign => Some(BinaryOp::Div),
            AssignOp::ModAssign => Some(BinaryOp::Mod),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AssignExpr {
    pub op: AssignOp,
    /// Any expression; the compiler rejects targets that are not a bare variable.
    pub target: Box<Expr>,
    pub value: Box<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct CallExpr {
    pub callee: Ident,
    pub args: Vec<Expr>,
    pub span: Span,
}

/// `expr as T`
#[derive(Debug, Clone)]
pub struct CastExpr {
    pub expr: Box<Expr>,
    pub ty: TypeInfo,
    pub span: Span,
}

/// `&expr`
#[derive(Debug, Clone)]
pub struct AddrOfExpr {
    pub arg: Box<Expr>,
    pub span: Span,
}

/// `*expr`
#[derive(Debug, Clone)]
pub struct DerefExpr {
    pub arg: Box<Expr>,
    pub span: Span,
}
