//! Reasons a selector cannot be normalized.

use qlift_ir::Idx;
use thiserror::Error;

/// The tree is not provably a synchronous computation in an async wrapper.
///
/// This is a routing decision for the caller (fall back to executing the
/// selector asynchronously), not a fault.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NotTranslatable {
    /// The root is neither a lambda nor a quote of one.
    #[error("selector root is not a lambda")]
    NotALambda,

    #[error("selector takes {found} parameter(s), expected {expected}")]
    ParameterCount { expected: usize, found: usize },

    /// The trailing parameter is not a cancellation signal.
    #[error("trailing parameter has type {found:?}, expected a cancellation signal")]
    CancellationType { found: Idx },

    #[error("source parameter {position} has type {found:?}, expected {expected:?}")]
    SourceType {
        position: usize,
        expected: Idx,
        found: Idx,
    },

    /// A result position did not reduce to exactly the result type.
    #[error("result position has type {found:?} after rewriting, expected {expected:?}")]
    ResultType { expected: Idx, found: Idx },

    /// The body reads the cancellation parameter, which the synchronous
    /// form does not have.
    #[error("selector body uses its cancellation parameter")]
    CancellationUsed,
}
