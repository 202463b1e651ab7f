//! Shape cache errors.

use qlift_ir::Idx;
use thiserror::Error;

/// A shape could not be built for the requested type key.
///
/// These are caller errors; retrying with the same key fails the same way.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShapeError {
    /// `Idx::NONE` was passed where a type is required.
    #[error("a type is required")]
    MissingType,

    /// The handle was not produced by the cache's pool.
    #[error("{0:?} is not a type of this pool")]
    UnknownType(Idx),

    /// The sequence's element type is not assignable to the converter's
    /// declared source type.
    #[error("sequence of {found:?} cannot be converted as a sequence of {expected:?}")]
    SourceMismatch { expected: Idx, found: Idx },

    #[error("function shapes support at most {max} parameters, got {arity}")]
    UnsupportedArity { arity: usize, max: usize },
}

/// An element failed its runtime type check during enumeration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CastError {
    /// `found` is `Idx::NONE` for a null element.
    #[error("element of type {found:?} is not an instance of {target:?}")]
    InvalidCast { found: Idx, target: Idx },
}
