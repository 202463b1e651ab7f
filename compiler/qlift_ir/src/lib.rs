//! qlift IR - computation trees and runtime types.
//!
//! This crate contains the data structures shared by the selector rewriter
//! (`qlift_normalize`) and the generic shape cache (`qlift_shape`):
//! - [`Pool`]: thread-safe interning pool of runtime types, referenced by [`Idx`]
//! - [`ExprArena`]: arena-allocated computation trees, referenced by [`ExprId`]
//! - [`StringInterner`]: interned names ([`Name`])
//! - [`const_fold`]: constant folding used to decide conditional tests
//! - [`stack`]: stack growth for recursive walks
//!
//! # Design Philosophy
//!
//! - **Intern Everything**: strings → `Name(u32)`, types → `Idx(u32)`
//! - **Flatten Everything**: no `Box<Expr>`, children are `ExprId` indices
//! - **Never Mutate**: arenas are append-only; passes build new arenas

mod arena;
pub mod const_fold;
mod expr;
mod idx;
mod interner;
mod name;
mod pool;
pub mod stack;

pub use arena::ExprArena;
pub use expr::{
    BinaryOp, ConstValue, Expr, ExprId, ExprKind, ExprRange, MethodId, MethodRef, Param, ParamId,
    ParamRange, UnaryOp,
};
pub use idx::Idx;
pub use interner::StringInterner;
pub use name::Name;
pub use pool::{Family, Pool, SharedPool, TypeData, WellKnownNames};
