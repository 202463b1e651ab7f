//! Thread-local scratch space for type-argument lists.
//!
//! Building `Fn<P1..Pn, R>` needs the arguments as one contiguous slice.
//! Each thread keeps one buffer wide enough for the largest supported shape;
//! a caller borrows a prefix of it for the duration of a single synchronous
//! call. A nested borrow on the same thread gets an inline `SmallVec`
//! instead.

use std::cell::RefCell;

use qlift_ir::Idx;
use smallvec::{smallvec, SmallVec};

use crate::MAX_FUNCTION_ARITY;

/// Parameters plus the result.
const WIDTH: usize = MAX_FUNCTION_ARITY + 1;

thread_local! {
    static TYPE_ARGS: RefCell<[Idx; WIDTH]> = const { RefCell::new([Idx::NONE; WIDTH]) };
}

/// Run `f` with a slice of `len` slots, each initialised to `Idx::NONE`.
///
/// # Panics
/// Panics if `len` exceeds `MAX_FUNCTION_ARITY + 1`.
pub(crate) fn with_type_args<R>(len: usize, f: impl FnOnce(&mut [Idx]) -> R) -> R {
    assert!(len <= WIDTH, "{len} type arguments exceed the scratch width {WIDTH}");
    TYPE_ARGS.with(|buf| match buf.try_borrow_mut() {
        Ok(mut buf) => {
            let args = &mut buf[..len];
            args.fill(Idx::NONE);
            f(args)
        }
        Err(_) => {
            let mut args: SmallVec<[Idx; WIDTH]> = smallvec![Idx::NONE; len];
            f(&mut args)
        }
    })
}
