//! Construction and projection helpers for generic families.

use smallvec::SmallVec;

use super::{Family, Pool};
use crate::Idx;

impl Pool {
    // === Constructors ===

    /// Create the deferred-result type `Deferred<result>`.
    pub fn deferred(&self, result: Idx) -> Idx {
        self.generic(Family::Deferred, &[result])
    }

    /// Create the typed asynchronous sequence type `AsyncSeq<elem>`.
    pub fn async_seq(&self, elem: Idx) -> Idx {
        self.generic(Family::AsyncSeq, &[elem])
    }

    /// Create the quoted-lambda type `Quote<function>`.
    pub fn quote(&self, function: Idx) -> Idx {
        self.generic(Family::Quote, &[function])
    }

    /// Create the element-cast adapter type `Cast<source, target>`.
    pub fn cast_adapter(&self, source: Idx, target: Idx) -> Idx {
        self.generic(Family::Cast, &[source, target])
    }

    /// Create a function shape `fn(params...) -> ret`.
    ///
    /// Layout of the type arguments: `[param0, param1, ..., ret]`.
    pub fn function(&self, params: &[Idx], ret: Idx) -> Idx {
        let mut args: SmallVec<[Idx; 8]> = SmallVec::with_capacity(params.len() + 1);
        args.extend_from_slice(params);
        args.push(ret);
        self.generic(Family::Function, &args)
    }

    // === Projections ===

    /// `R` of `Deferred<R>`.
    pub fn deferred_result(&self, idx: Idx) -> Option<Idx> {
        self.generic_args(idx, Family::Deferred).map(|args| args[0])
    }

    /// `T` of `AsyncSeq<T>`.
    pub fn async_seq_element(&self, idx: Idx) -> Option<Idx> {
        self.generic_args(idx, Family::AsyncSeq).map(|args| args[0])
    }

    /// `F` of `Quote<F>`.
    pub fn quoted_function(&self, idx: Idx) -> Option<Idx> {
        self.generic_args(idx, Family::Quote).map(|args| args[0])
    }

    /// `(S, T)` of `Cast<S, T>`.
    pub fn cast_pair(&self, idx: Idx) -> Option<(Idx, Idx)> {
        self.generic_args(idx, Family::Cast)
            .map(|args| (args[0], args[1]))
    }

    /// Result type of a function shape.
    pub fn function_result(&self, idx: Idx) -> Option<Idx> {
        self.generic_args(idx, Family::Function)
            .and_then(|args| args.last().copied())
    }

    /// Parameter types of a function shape.
    pub fn function_params(&self, idx: Idx) -> Option<SmallVec<[Idx; 4]>> {
        self.generic_args(idx, Family::Function)
            .map(|args| args[..args.len() - 1].iter().copied().collect())
    }
}
