//! Selector normalization.
//!
//! Rewrites an async-shaped selector lambda, `(source.., cancellation?) =>
//! Deferred<R>`, into the synchronous lambda `(source..) => R` it really
//! describes, when that can be proven at build time.
//!
//! # Pipeline Position
//!
//! ```text
//! caller-built tree → normalize → synchronous tree → query engine
//!                         ↓
//!                   NotTranslatable → caller falls back to async execution
//! ```
//!
//! A tree is translatable when every result position (the lambda body, and
//! the live branches of conditionals reached from it) ends in a completed
//! deferred-result construction whose payload already has the result type.
//! Conditionals whose test folds to a constant are tree-shaken first.
//!
//! The source arena is never modified: normalization reads it by shared
//! reference and builds a fresh arena for the output.

mod entry;
mod error;
mod rewrite;
mod signature;

pub use entry::{
    normalize_predicate, normalize_predicate2, normalize_predicate2_cancellable,
    normalize_predicate_cancellable, normalize_selector, normalize_selector2,
    normalize_selector2_cancellable, normalize_selector_cancellable,
};
pub use error::NotTranslatable;
pub use rewrite::{normalize, Normalized};
pub use signature::{SelectorSignature, SourceTypes};
