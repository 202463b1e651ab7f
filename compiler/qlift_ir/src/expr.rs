//! Computation tree node kinds and their index newtypes.
//!
//! Children are referenced by [`ExprId`] into an [`ExprArena`](crate::ExprArena);
//! variable-length child lists by [`ExprRange`]. Every kind is `Copy`, so a
//! rewriting pass can read a node out of one arena and push a variant of it
//! into another without cloning side tables.

use std::fmt;

use smallvec::SmallVec;

use crate::{Idx, Name};

/// Index into an [`ExprArena`](crate::ExprArena).
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
#[repr(transparent)]
pub struct ExprId(u32);

impl ExprId {
    /// Sentinel value indicating "no expression" (e.g. a static call's receiver).
    pub const INVALID: ExprId = ExprId(u32::MAX);

    #[inline]
    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Returns `true` if this is a valid (non-sentinel) ID.
    #[inline]
    pub const fn is_valid(self) -> bool {
        self.0 != u32::MAX
    }
}

impl fmt::Debug for ExprId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_valid() {
            write!(f, "ExprId({})", self.0)
        } else {
            write!(f, "ExprId::INVALID")
        }
    }
}

impl Default for ExprId {
    fn default() -> Self {
        Self::INVALID
    }
}

/// A contiguous range of expression IDs (call arguments, constructor arguments).
#[derive(Copy, Clone, Eq, PartialEq, Hash, Default, Debug)]
pub struct ExprRange {
    pub start: u32,
    pub len: u16,
}

impl ExprRange {
    pub const EMPTY: Self = Self { start: 0, len: 0 };

    #[inline]
    pub const fn new(start: u32, len: u16) -> Self {
        Self { start, len }
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub const fn len(&self) -> usize {
        self.len as usize
    }
}

/// Parameter identity. Two `Param` nodes refer to the same variable iff
/// their `ParamId`s are equal.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[repr(transparent)]
pub struct ParamId(u32);

impl ParamId {
    #[inline]
    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// A contiguous range of parameter IDs (a lambda's parameter list).
#[derive(Copy, Clone, Eq, PartialEq, Hash, Default, Debug)]
pub struct ParamRange {
    pub start: u32,
    pub len: u16,
}

impl ParamRange {
    pub const EMPTY: Self = Self { start: 0, len: 0 };

    #[inline]
    pub const fn new(start: u32, len: u16) -> Self {
        Self { start, len }
    }

    #[inline]
    pub const fn len(&self) -> usize {
        self.len as usize
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// Index into an arena's method table.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[repr(transparent)]
pub struct MethodId(u32);

impl MethodId {
    #[inline]
    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// A declared lambda parameter.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct Param {
    pub name: Name,
    pub ty: Idx,
}

/// Reference to a method: declaring type, name, and generic arguments.
///
/// Static methods are called with an `INVALID` receiver.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct MethodRef {
    pub owner: Idx,
    pub name: Name,
    pub type_args: SmallVec<[Idx; 2]>,
}

impl MethodRef {
    /// A non-generic method.
    pub fn new(owner: Idx, name: Name) -> Self {
        Self {
            owner,
            name,
            type_args: SmallVec::new(),
        }
    }

    /// A generic method instantiated with `type_args`.
    pub fn generic(owner: Idx, name: Name, type_args: &[Idx]) -> Self {
        Self {
            owner,
            name,
            type_args: SmallVec::from_slice(type_args),
        }
    }
}

/// Literal value of a `Constant` node.
///
/// Floats are stored as bits so the type stays `Eq + Hash`.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ConstValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(u64),
    Str(Name),
}

impl ConstValue {
    /// Build a float constant.
    pub fn float(value: f64) -> Self {
        ConstValue::Float(value.to_bits())
    }
}

/// Unary operators.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum UnaryOp {
    /// Logical negation.
    Not,
    /// Arithmetic negation.
    Neg,
    /// Conversion to the node's type.
    Convert,
}

/// Binary operators. All are pure.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum BinaryOp {
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    And,
    Or,
    Add,
    Sub,
    Mul,
}

/// Computation tree node kind.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ExprKind {
    /// Literal value.
    Constant(ConstValue),
    /// Reference to a lambda parameter.
    Param(ParamId),
    /// Lambda; the node type is `Fn<params.., return>`.
    Lambda { params: ParamRange, body: ExprId },
    /// Method call; `receiver` is `INVALID` for static methods.
    Call {
        receiver: ExprId,
        method: MethodId,
        args: ExprRange,
    },
    /// Object construction; the constructed type is the node type.
    New { args: ExprRange },
    /// `test ? if_true : if_false`.
    Conditional {
        test: ExprId,
        if_true: ExprId,
        if_false: ExprId,
    },
    Unary { op: UnaryOp, operand: ExprId },
    Binary {
        op: BinaryOp,
        left: ExprId,
        right: ExprId,
    },
    /// Marks a nested lambda as a description rather than something to run.
    /// The node type is `Quote<lambda type>`.
    Quote(ExprId),
}

/// A node as stored in the arena: kind plus static type.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct Expr {
    pub kind: ExprKind,
    pub ty: Idx,
}

impl Expr {
    #[inline]
    pub const fn new(kind: ExprKind, ty: Idx) -> Self {
        Self { kind, ty }
    }
}
