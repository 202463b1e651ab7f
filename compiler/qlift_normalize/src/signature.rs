//! Selector signatures: what the rewritten lambda must look like.

use qlift_ir::Idx;
use smallvec::{smallvec, SmallVec};

/// Source element types of a selector, in parameter order.
///
/// Selectors take one or two sources; other arities are not representable.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum SourceTypes {
    One(Idx),
    Two(Idx, Idx),
}

impl SourceTypes {
    /// Number of source parameters.
    pub const fn len(self) -> usize {
        match self {
            SourceTypes::One(_) => 1,
            SourceTypes::Two(..) => 2,
        }
    }

    /// Always `false`; kept for the `len`/`is_empty` pair.
    pub const fn is_empty(self) -> bool {
        false
    }

    /// Source types in parameter order.
    pub fn types(self) -> SmallVec<[Idx; 2]> {
        match self {
            SourceTypes::One(a) => smallvec![a],
            SourceTypes::Two(a, b) => smallvec![a, b],
        }
    }
}

/// Expected shape of an async selector and the synchronous result type.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct SelectorSignature {
    pub sources: SourceTypes,
    /// `R`: the body of the rewritten lambda must have exactly this type.
    pub result: Idx,
    /// Whether the async lambda takes a trailing cancellation parameter.
    pub cancellable: bool,
}

impl SelectorSignature {
    /// `(source) => Deferred<result>`.
    pub const fn unary(source: Idx, result: Idx) -> Self {
        Self {
            sources: SourceTypes::One(source),
            result,
            cancellable: false,
        }
    }

    /// `(first, second) => Deferred<result>`.
    pub const fn binary(first: Idx, second: Idx, result: Idx) -> Self {
        Self {
            sources: SourceTypes::Two(first, second),
            result,
            cancellable: false,
        }
    }

    /// `(source) => Deferred<bool>`.
    pub const fn predicate(source: Idx) -> Self {
        Self::unary(source, Idx::BOOL)
    }

    /// `(first, second) => Deferred<bool>`.
    pub const fn predicate2(first: Idx, second: Idx) -> Self {
        Self::binary(first, second, Idx::BOOL)
    }

    /// The same signature with a trailing cancellation parameter.
    #[must_use]
    pub const fn with_cancellation(self) -> Self {
        Self {
            cancellable: true,
            ..self
        }
    }

    /// Parameter count of the async lambda.
    pub fn parameter_count(&self) -> usize {
        self.sources.len() + usize::from(self.cancellable)
    }
}
