//! Asynchronous sequences.
//!
//! [`UntypedSequence`] is the untyped contract (`seq`): a cheap, clonable
//! handle over any [`AsyncSource`]. [`TypedSequence`] and [`CastSequence`]
//! are the facades the shape cache builds on top of one. Enumeration is lazy
//! and sequences can be enumerated any number of times.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use futures_util::stream::{self, BoxStream, StreamExt};
use qlift_ir::{Idx, SharedPool};

use crate::{CastError, Value};

/// Stream of elements produced by one enumeration.
pub type ElementStream = BoxStream<'static, Result<Value, CastError>>;

/// Something that can be enumerated asynchronously.
pub trait AsyncSource: Send + Sync + 'static {
    /// Static type of the elements.
    fn element_type(&self) -> Idx;

    /// Start a fresh enumeration.
    fn enumerate(&self) -> ElementStream;

    /// For recognising facades when converting.
    fn as_any(&self) -> &dyn Any;
}

/// Untyped asynchronous sequence handle.
#[derive(Clone)]
pub struct UntypedSequence(Arc<dyn AsyncSource>);

impl UntypedSequence {
    pub fn new(source: impl AsyncSource) -> Self {
        UntypedSequence(Arc::new(source))
    }

    /// In-memory sequence of `values`, declared as elements of `element_type`.
    pub fn from_values(element_type: Idx, values: Vec<Value>) -> Self {
        Self::new(VecSource::new(element_type, values))
    }

    #[inline]
    pub fn element_type(&self) -> Idx {
        self.0.element_type()
    }

    pub fn enumerate(&self) -> ElementStream {
        self.0.enumerate()
    }

    /// Whether both handles share one source.
    pub fn ptr_eq(&self, other: &UntypedSequence) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// The concrete source, if it is a `T`.
    pub fn downcast_ref<T: AsyncSource>(&self) -> Option<&T> {
        self.0.as_any().downcast_ref::<T>()
    }
}

impl fmt::Debug for UntypedSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "UntypedSequence({:?})", self.element_type())
    }
}

/// Source over values held in memory.
pub struct VecSource {
    element_type: Idx,
    values: Arc<[Value]>,
}

impl VecSource {
    pub fn new(element_type: Idx, values: Vec<Value>) -> Self {
        Self {
            element_type,
            values: values.into(),
        }
    }
}

impl AsyncSource for VecSource {
    fn element_type(&self) -> Idx {
        self.element_type
    }

    fn enumerate(&self) -> ElementStream {
        let values = Arc::clone(&self.values);
        stream::iter((0..values.len()).map(move |i| Ok(values[i].clone()))).boxed()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// `AsyncSeq<T>` facade over an untyped sequence.
///
/// Elements are checked against `T` as they are produced; a mismatch is a
/// `CastError` item in the stream, not a failure to build the facade.
#[derive(Clone)]
pub struct TypedSequence {
    facade_type: Idx,
    element_type: Idx,
    inner: UntypedSequence,
    pool: SharedPool,
}

impl TypedSequence {
    pub(crate) fn new(
        pool: SharedPool,
        facade_type: Idx,
        element_type: Idx,
        inner: UntypedSequence,
    ) -> Self {
        Self {
            facade_type,
            element_type,
            inner,
            pool,
        }
    }

    /// `AsyncSeq<T>`.
    pub fn facade_type(&self) -> Idx {
        self.facade_type
    }

    /// `T`.
    pub fn element_type(&self) -> Idx {
        self.element_type
    }

    /// The wrapped untyped sequence.
    pub fn inner(&self) -> &UntypedSequence {
        &self.inner
    }

    pub fn enumerate(&self) -> ElementStream {
        checked(self.inner.enumerate(), self.pool.clone(), self.element_type)
    }

    /// Erase back to the untyped contract.
    pub fn into_untyped(self) -> UntypedSequence {
        UntypedSequence::new(self)
    }
}

impl AsyncSource for TypedSequence {
    fn element_type(&self) -> Idx {
        self.element_type
    }

    fn enumerate(&self) -> ElementStream {
        TypedSequence::enumerate(self)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl fmt::Debug for TypedSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypedSequence")
            .field("facade_type", &self.facade_type)
            .field("inner", &self.inner)
            .finish_non_exhaustive()
    }
}

/// `Cast<S, T>` adapter: presents a sequence of `S` as a sequence of `T`,
/// casting each element on the way out.
pub struct CastSequence {
    adapter_type: Idx,
    source_type: Idx,
    target_type: Idx,
    inner: UntypedSequence,
    pool: SharedPool,
}

impl CastSequence {
    pub(crate) fn new(
        pool: SharedPool,
        adapter_type: Idx,
        source_type: Idx,
        target_type: Idx,
        inner: UntypedSequence,
    ) -> Self {
        Self {
            adapter_type,
            source_type,
            target_type,
            inner,
            pool,
        }
    }

    /// `Cast<S, T>`.
    pub fn adapter_type(&self) -> Idx {
        self.adapter_type
    }

    pub fn source_type(&self) -> Idx {
        self.source_type
    }

    pub fn target_type(&self) -> Idx {
        self.target_type
    }

    /// The sequence being cast.
    pub fn inner(&self) -> &UntypedSequence {
        &self.inner
    }
}

impl AsyncSource for CastSequence {
    fn element_type(&self) -> Idx {
        self.target_type
    }

    fn enumerate(&self) -> ElementStream {
        checked(self.inner.enumerate(), self.pool.clone(), self.target_type)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Check every element of `elements` against `target`.
fn checked(elements: ElementStream, pool: SharedPool, target: Idx) -> ElementStream {
    elements
        .map(move |item| {
            item.and_then(|value| {
                if value.is_instance(&pool, target) {
                    Ok(value)
                } else {
                    Err(CastError::InvalidCast {
                        found: value.runtime_type(),
                        target,
                    })
                }
            })
        })
        .boxed()
}
