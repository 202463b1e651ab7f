//! Runtime generic shape cache.
//!
//! Element types of asynchronous sequences are only known when a query
//! runs. [`ShapeCache`] builds the typed artifacts for such a type once and
//! hands out the cached copy afterwards:
//! - typed sequence converters (`seq` → `AsyncSeq<T>` facades)
//! - element cast converters (`AsyncSeq<S>` → `AsyncSeq<T>`)
//! - function shape types (`Fn<P1..Pn, R>`)
//!
//! Artifacts are keyed by [`Idx`](qlift_ir::Idx) handles from one shared
//! [`Pool`](qlift_ir::Pool). Entries are never evicted.

mod cache;
mod error;
mod scratch;
mod sequence;
mod value;

pub use cache::{CacheStats, CastConverter, ShapeCache, TypedConverter, MAX_FUNCTION_ARITY};
pub use error::{CastError, ShapeError};
pub use sequence::{
    AsyncSource, CastSequence, ElementStream, TypedSequence, UntypedSequence, VecSource,
};
pub use value::{Object, Value};
