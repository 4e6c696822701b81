//! Type resolution and symbol scoping.
//!
//! `KilnType` is the compiler's own view of a value's type. It remembers
//! signedness and pointee types, neither of which survive into LLVM IR
//! (integers are sign-less and pointers are opaque). `resolve` maps a
//! source type descriptor onto it; `SymbolTable` maps variable names onto
//! their storage slots.

use inkwell::AddressSpace;
use inkwell::context::Context;
use inkwell::types::{BasicType, BasicTypeEnum, IntType};
use inkwell::values::PointerValue;
use kiln_ast::TypeKind;
use std::collections::HashMap;
use std::fmt;

/// Builtin scalar kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scalar {
    Void,
    I8,
    U8,
    I16,
    U16,
    I32,
    U32,
    I64,
    U64,
    /// Stored as an unsigned one-byte integer, never as `i1`.
    Bool,
}

impl Scalar {
    fn from_kind(kind: &TypeKind) -> Option<Scalar> {
        Some(match kind {
            TypeKind::Void => Scalar::Void,
            TypeKind::I8 => Scalar::I8,
            TypeKind::U8 => Scalar::U8,
            TypeKind::I16 => Scalar::I16,
            TypeKind::U16 => Scalar::U16,
            TypeKind::I32 => Scalar::I32,
            TypeKind::U32 => Scalar::U32,
            TypeKind::I64 => Scalar::I64,
            TypeKind::U64 => Scalar::U64,
            TypeKind::Bool => Scalar::Bool,
            TypeKind::Named(_) => return None,
        })
    }

    pub fn is_signed(self) -> bool {
        matches!(self, Scalar::I8 | Scalar::I16 | Scalar::I32 | Scalar::I64)
    }

    /// Bit width, `None` for void.
    pub fn bits(self) -> Option<u32> {
        match self {
            Scalar::Void => None,
            Scalar::I8 | Scalar::U8 | Scalar::Bool => Some(8),
            Scalar::I16 | Scalar::U16 => Some(16),
            Scalar::I32 | Scalar::U32 => Some(32),
            Scalar::I64 | Scalar::U64 => Some(64),
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Scalar::Void => "void",
            Scalar::I8 => "i8",
            Scalar::U8 => "u8",
            Scalar::I16 => "i16",
            Scalar::U16 => "u16",
            Scalar::I32 => "i32",
            Scalar::U32 => "u32",
            Scalar::I64 => "i64",
            Scalar::U64 => "u64",
            Scalar::Bool => "bool",
        };
        f.write_str(s)
    }
}

/// A scalar behind zero or more levels of pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KilnType {
    pub scalar: Scalar,
    pub pointer_depth: u8,
}

/// What a type looks like to the backend. Two types with the same shape are
/// interchangeable in IR even if their source types differ (`i32`/`u32`,
/// `bool`/`u8`, any two pointers).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Void,
    Int(u32),
    Ptr,
}

impl KilnType {
    pub const fn scalar(scalar: Scalar) -> Self {
        KilnType {
            scalar,
            pointer_depth: 0,
        }
    }

    pub const VOID: KilnType = KilnType::scalar(Scalar::Void);
    pub const BOOL: KilnType = KilnType::scalar(Scalar::Bool);
    pub const I8: KilnType = KilnType::scalar(Scalar::I8);
    pub const I32: KilnType = KilnType::scalar(Scalar::I32);
    pub const U32: KilnType = KilnType::scalar(Scalar::U32);
    pub const I64: KilnType = KilnType::scalar(Scalar::I64);
    pub const U64: KilnType = KilnType::scalar(Scalar::U64);

    pub fn is_void(self) -> bool {
        self.scalar == Scalar::Void && self.pointer_depth == 0
    }

    pub fn is_pointer(self) -> bool {
        self.pointer_depth > 0
    }

    /// Pointers compare and divide as unsigned.
    pub fn is_signed(self) -> bool {
        !self.is_pointer() && self.scalar.is_signed()
    }

    pub fn pointer_to(self) -> KilnType {
        KilnType {
            scalar: self.scalar,
            pointer_depth: self.pointer_depth.saturating_add(1),
        }
    }

    pub fn pointee(self) -> Option<KilnType> {
        if self.is_pointer() {
            Some(KilnType {
                scalar: self.scalar,
                pointer_depth: self.pointer_depth - 1,
            })
        } else {
            None
        }
    }

    pub fn shape(self) -> Shape {
        if self.is_pointer() {
            Shape::Ptr
        } else {
            match self.scalar.bits() {
                Some(bits) => Shape::Int(bits),
                None => Shape::Void,
            }
        }
    }

    /// Structural comparison: do both types lower to the same backend type?
    pub fn same_backend_type(self, other: KilnType) -> bool {
        self.shape() == other.shape()
    }

    /// The LLVM type of a value of this type, `None` for void.
    pub fn basic_type<'ctx>(self, context: &'ctx Context) -> Option<BasicTypeEnum<'ctx>> {
        if self.is_pointer() {
            return Some(context.ptr_type(AddressSpace::default()).as_basic_type_enum());
        }
        self.int_type(context).map(|t| t.as_basic_type_enum())
    }

    /// The LLVM integer type, `None` for void and pointers.
    pub fn int_type<'ctx>(self, context: &'ctx Context) -> Option<IntType<'ctx>> {
        if self.is_pointer() {
            return None;
        }
        self.scalar
            .bits()
            .map(|bits| context.custom_width_int_type(bits))
    }
}

impl fmt::Display for KilnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for _ in 0..self.pointer_depth {
            f.write_str("*")?;
        }
        write!(f, "{}", self.scalar)
    }
}

/// A resolved source type: the compiler type, its backend type (absent for
/// void) and its signedness.
#[derive(Debug, Clone, Copy)]
pub struct ResolvedType<'ctx> {
    pub ty: KilnType,
    pub llvm: Option<BasicTypeEnum<'ctx>>,
    pub is_signed: bool,
}

/// Maps a type descriptor to its resolved type.
///
/// Returns `None` for a kind that names no builtin scalar; callers turn that
/// into their own "undefined type" error. Pointer wrapping is applied after
/// the scalar resolves.
pub fn resolve<'ctx>(
    context: &'ctx Context,
    kind: &TypeKind,
    is_pointer: bool,
) -> Option<ResolvedType<'ctx>> {
    let scalar = Scalar::from_kind(kind)?;
    let base = KilnType::scalar(scalar);
    let ty = if is_pointer { base.pointer_to() } else { base };
    Some(ResolvedType {
        ty,
        llvm: ty.basic_type(context),
        is_signed: ty.is_signed(),
    })
}

/// Storage binding for one source-level variable.
#[derive(Debug, Clone, Copy)]
pub struct Binding<'ctx> {
    pub slot: PointerValue<'ctx>,
    pub ty: KilnType,
    pub is_mutable: bool,
    pub is_signed: bool,
}

/// Name to slot mapping for one lexical scope.
///
/// Scopes are copied, not chained: a nested block clones its parent's table,
/// adds its own bindings, and drops the clone when the block ends. Slots are
/// shared storage, so stores through a binding stay visible to the parent.
#[derive(Debug, Clone, Default)]
pub struct SymbolTable<'ctx> {
    bindings: HashMap<String, Binding<'ctx>>,
}

impl<'ctx> SymbolTable<'ctx> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lookup(&self, name: &str) -> Option<Binding<'ctx>> {
        self.bindings.get(name).copied()
    }

    pub fn exists(&self, name: &str) -> bool {
        self.bindings.contains_key(name)
    }

    /// Adds or replaces a binding. Rejecting duplicates is the caller's job.
    pub fn register(&mut self, name: impl Into<String>, binding: Binding<'ctx>) {
        self.bindings.insert(name.into(), binding);
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

/// Signature of a declared or defined function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionSig {
    pub params: Vec<KilnType>,
    pub ret: KilnType,
    pub is_vararg: bool,
}
