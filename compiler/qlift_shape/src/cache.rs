//! The shape cache.
//!
//! # Concurrency
//! Lookups go to a `DashMap` shard under a read lock. On a miss the artifact
//! is built with no lock held, then published with `entry().or_insert`: when
//! two threads race on one key both may build, and the first published
//! artifact is the one every caller sees from then on.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use dashmap::DashMap;
use qlift_ir::{Family, Idx, SharedPool};
use rustc_hash::FxBuildHasher;
use tracing::{debug, trace};

use crate::scratch::with_type_args;
use crate::{CastSequence, ShapeError, TypedSequence, UntypedSequence};

/// Largest parameter count of a function shape.
pub const MAX_FUNCTION_ARITY: usize = 16;

/// Presents an untyped sequence as `AsyncSeq<T>` for one `T`.
pub type TypedConverter = Arc<dyn Fn(&UntypedSequence) -> TypedSequence + Send + Sync>;

/// Converts a sequence of `S` into a sequence of `T` for one `(S, T)`.
pub type CastConverter =
    Arc<dyn Fn(&UntypedSequence) -> Result<UntypedSequence, ShapeError> + Send + Sync>;

/// Build and hit counters, summed over all artifact kinds.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct CacheStats {
    /// Artifacts built, including duplicates that lost a publication race.
    pub builds: u64,
    pub hits: u64,
}

/// Lazily built, never evicted generic artifacts keyed by runtime type.
pub struct ShapeCache {
    pool: SharedPool,
    typed: DashMap<Idx, TypedConverter, FxBuildHasher>,
    casts: DashMap<(Idx, Idx), CastConverter, FxBuildHasher>,
    builds: AtomicU64,
    hits: AtomicU64,
}

impl ShapeCache {
    pub fn new(pool: SharedPool) -> Self {
        Self {
            pool,
            typed: DashMap::with_hasher(FxBuildHasher),
            casts: DashMap::with_hasher(FxBuildHasher),
            builds: AtomicU64::new(0),
            hits: AtomicU64::new(0),
        }
    }

    /// The pool every key must come from.
    pub fn pool(&self) -> &SharedPool {
        &self.pool
    }

    /// Converter presenting untyped sequences as `AsyncSeq<element_type>`.
    pub fn untyped_to_typed_converter(
        &self,
        element_type: Idx,
    ) -> Result<TypedConverter, ShapeError> {
        self.check_type(element_type)?;
        if let Some(converter) = self.typed.get(&element_type) {
            self.hit(element_type, Idx::NONE);
            return Ok(Arc::clone(converter.value()));
        }

        let built = self.build_typed(element_type);
        Ok(Arc::clone(
            self.typed.entry(element_type).or_insert(built).value(),
        ))
    }

    /// Converter from sequences of `source` to sequences of `target`.
    pub fn element_cast_converter(
        &self,
        source: Idx,
        target: Idx,
    ) -> Result<CastConverter, ShapeError> {
        self.check_type(source)?;
        self.check_type(target)?;
        if let Some(converter) = self.casts.get(&(source, target)) {
            self.hit(source, target);
            return Ok(Arc::clone(converter.value()));
        }

        let built = self.build_cast(source, target);
        Ok(Arc::clone(
            self.casts.entry((source, target)).or_insert(built).value(),
        ))
    }

    /// The function shape `Fn<params.., result>`.
    ///
    /// The pool's intern table is the cache for these: the argument list is
    /// assembled in thread-local scratch space and looked up by slice.
    pub fn function_shape_type(&self, params: &[Idx], result: Idx) -> Result<Idx, ShapeError> {
        if params.len() > MAX_FUNCTION_ARITY {
            return Err(ShapeError::UnsupportedArity {
                arity: params.len(),
                max: MAX_FUNCTION_ARITY,
            });
        }
        for ty in params.iter().chain(std::iter::once(&result)) {
            self.check_type(*ty)?;
        }

        let arity = params.len();
        Ok(with_type_args(arity + 1, |args| {
            args[..arity].copy_from_slice(params);
            args[arity] = result;
            if let Some(shape) = self.pool.lookup_generic(Family::Function, args) {
                self.hits.fetch_add(1, Ordering::Relaxed);
                return shape;
            }
            self.builds.fetch_add(1, Ordering::Relaxed);
            let shape = self.pool.generic(Family::Function, args);
            debug!(shape = %self.pool.display(shape), "built function shape");
            shape
        }))
    }

    /// Present `seq` as `AsyncSeq<element_type>`.
    pub fn as_typed(
        &self,
        seq: &UntypedSequence,
        element_type: Idx,
    ) -> Result<TypedSequence, ShapeError> {
        let converter = self.untyped_to_typed_converter(element_type)?;
        Ok(converter(seq))
    }

    /// Present `seq` as a sequence of `target`.
    pub fn cast(&self, seq: &UntypedSequence, target: Idx) -> Result<UntypedSequence, ShapeError> {
        let converter = self.element_cast_converter(seq.element_type(), target)?;
        converter(seq)
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            builds: self.builds.load(Ordering::Relaxed),
            hits: self.hits.load(Ordering::Relaxed),
        }
    }

    /// Number of cached converters of both kinds.
    pub fn cached_converters(&self) -> usize {
        self.typed.len() + self.casts.len()
    }

    fn check_type(&self, ty: Idx) -> Result<(), ShapeError> {
        if ty.is_none() {
            return Err(ShapeError::MissingType);
        }
        if !self.pool.contains(ty) {
            return Err(ShapeError::UnknownType(ty));
        }
        Ok(())
    }

    fn hit(&self, first: Idx, second: Idx) {
        self.hits.fetch_add(1, Ordering::Relaxed);
        trace!(?first, ?second, "shape cache hit");
    }

    #[tracing::instrument(level = "debug", skip(self), fields(element = %self.pool.display(element_type)))]
    fn build_typed(&self, element_type: Idx) -> TypedConverter {
        self.builds.fetch_add(1, Ordering::Relaxed);
        let facade = self.pool.async_seq(element_type);
        debug!(facade = %self.pool.display(facade), "built typed sequence converter");

        let pool = self.pool.clone();
        Arc::new(move |seq: &UntypedSequence| {
            if let Some(typed) = seq.downcast_ref::<TypedSequence>() {
                if typed.element_type() == element_type {
                    return typed.clone();
                }
            }
            TypedSequence::new(pool.clone(), facade, element_type, seq.clone())
        })
    }

    #[tracing::instrument(level = "debug", skip(self), fields(
        source = %self.pool.display(source),
        target = %self.pool.display(target),
    ))]
    fn build_cast(&self, source: Idx, target: Idx) -> CastConverter {
        self.builds.fetch_add(1, Ordering::Relaxed);
        let pool = self.pool.clone();

        if pool.is_assignable(source, target) {
            debug!("built identity cast converter");
            return Arc::new(move |seq: &UntypedSequence| {
                check_source(&pool, seq, source)?;
                Ok(collapse(seq, target).unwrap_or_else(|| seq.clone()))
            });
        }

        let adapter = pool.cast_adapter(source, target);
        debug!(adapter = %pool.display(adapter), "built element cast converter");
        Arc::new(move |seq: &UntypedSequence| {
            check_source(&pool, seq, source)?;
            if let Some(inner) = collapse(seq, target) {
                trace!("collapsed round-trip cast");
                return Ok(inner);
            }
            if pool.is_assignable(seq.element_type(), target) {
                return Ok(seq.clone());
            }
            Ok(UntypedSequence::new(CastSequence::new(
                pool.clone(),
                adapter,
                source,
                target,
                seq.clone(),
            )))
        })
    }
}

impl Default for ShapeCache {
    fn default() -> Self {
        Self::new(SharedPool::default())
    }
}

fn check_source(pool: &SharedPool, seq: &UntypedSequence, source: Idx) -> Result<(), ShapeError> {
    let found = seq.element_type();
    if pool.is_assignable(found, source) {
        Ok(())
    } else {
        Err(ShapeError::SourceMismatch {
            expected: source,
            found,
        })
    }
}

/// The sequence under a `Cast<A, B>` adapter when casting it back to `A`.
///
/// Any other target keeps the adapter, so elements that failed its check
/// stay failed.
fn collapse(seq: &UntypedSequence, target: Idx) -> Option<UntypedSequence> {
    let cast = seq.downcast_ref::<CastSequence>()?;
    (cast.source_type() == target).then(|| cast.inner().clone())
}
