//! Arity-specific entry points.
//!
//! Each builds the matching [`SelectorSignature`] and calls [`normalize`].
//! Selectors return `Deferred<result>`; predicates return `Deferred<bool>`.

use qlift_ir::{ExprArena, ExprId, Idx, Pool};

use crate::{normalize, NotTranslatable, Normalized, SelectorSignature};

/// `(source) => Deferred<result>` into `(source) => result`.
pub fn normalize_selector(
    pool: &Pool,
    arena: &ExprArena,
    root: ExprId,
    source: Idx,
    result: Idx,
) -> Result<Normalized, NotTranslatable> {
    normalize(pool, arena, root, &SelectorSignature::unary(source, result))
}

/// `(source, cancellation) => Deferred<result>` into `(source) => result`.
pub fn normalize_selector_cancellable(
    pool: &Pool,
    arena: &ExprArena,
    root: ExprId,
    source: Idx,
    result: Idx,
) -> Result<Normalized, NotTranslatable> {
    let signature = SelectorSignature::unary(source, result).with_cancellation();
    normalize(pool, arena, root, &signature)
}

/// `(first, second) => Deferred<result>` into `(first, second) => result`.
pub fn normalize_selector2(
    pool: &Pool,
    arena: &ExprArena,
    root: ExprId,
    first: Idx,
    second: Idx,
    result: Idx,
) -> Result<Normalized, NotTranslatable> {
    normalize(pool, arena, root, &SelectorSignature::binary(first, second, result))
}

/// `(first, second, cancellation) => Deferred<result>` into `(first, second) => result`.
pub fn normalize_selector2_cancellable(
    pool: &Pool,
    arena: &ExprArena,
    root: ExprId,
    first: Idx,
    second: Idx,
    result: Idx,
) -> Result<Normalized, NotTranslatable> {
    let signature = SelectorSignature::binary(first, second, result).with_cancellation();
    normalize(pool, arena, root, &signature)
}

/// `(source) => Deferred<bool>` into `(source) => bool`.
pub fn normalize_predicate(
    pool: &Pool,
    arena: &ExprArena,
    root: ExprId,
    source: Idx,
) -> Result<Normalized, NotTranslatable> {
    normalize(pool, arena, root, &SelectorSignature::predicate(source))
}

/// `(source, cancellation) => Deferred<bool>` into `(source) => bool`.
pub fn normalize_predicate_cancellable(
    pool: &Pool,
    arena: &ExprArena,
    root: ExprId,
    source: Idx,
) -> Result<Normalized, NotTranslatable> {
    let signature = SelectorSignature::predicate(source).with_cancellation();
    normalize(pool, arena, root, &signature)
}

/// `(first, second) => Deferred<bool>` into `(first, second) => bool`.
pub fn normalize_predicate2(
    pool: &Pool,
    arena: &ExprArena,
    root: ExprId,
    first: Idx,
    second: Idx,
) -> Result<Normalized, NotTranslatable> {
    normalize(pool, arena, root, &SelectorSignature::predicate2(first, second))
}

/// `(first, second, cancellation) => Deferred<bool>` into `(first, second) => bool`.
pub fn normalize_predicate2_cancellable(
    pool: &Pool,
    arena: &ExprArena,
    root: ExprId,
    first: Idx,
    second: Idx,
) -> Result<Normalized, NotTranslatable> {
    let signature = SelectorSignature::predicate2(first, second).with_cancellation();
    normalize(pool, arena, root, &signature)
}
