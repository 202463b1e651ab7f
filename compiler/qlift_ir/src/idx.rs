//! Runtime type handle.
//!
//! `Idx` is the runtime type identity shared by computation trees and the
//! shape cache. Every type lives in a [`Pool`](crate::Pool) and is referenced
//! by its 32-bit index, so type equality is index equality.

use std::fmt;

/// A 32-bit index into the type pool.
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
#[repr(transparent)]
pub struct Idx(u32);

impl Idx {
    // === Pre-interned types (indices 0-8) ===

    /// The root reference type every type is assignable to.
    pub const OBJECT: Self = Self(0);
    /// The `bool` type.
    pub const BOOL: Self = Self(1);
    /// The `int` type (64-bit signed integer).
    pub const INT: Self = Self(2);
    /// The `float` type (64-bit floating point).
    pub const FLOAT: Self = Self(3);
    /// The `str` type.
    pub const STR: Self = Self(4);
    /// The unit type.
    pub const UNIT: Self = Self(5);
    /// The cancellation-signal type accepted as a trailing selector parameter.
    pub const CANCELLATION: Self = Self(6);
    /// The untyped asynchronous sequence contract.
    pub const UNTYPED_SEQ: Self = Self(7);
    /// Static holder of the completed-result factory (`Deferred::from_result`).
    pub const DEFERRED_FACTORY: Self = Self(8);

    /// Number of pre-interned types; dynamic types start here.
    pub const FIRST_DYNAMIC: u32 = 9;

    /// Sentinel value indicating no type.
    pub const NONE: Self = Self(u32::MAX);

    /// Create an index from a raw u32 value.
    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// Get the raw u32 value.
    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Position in the pool's type table.
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Check if this is one of the pre-interned types.
    #[inline]
    pub const fn is_primitive(self) -> bool {
        self.0 < Self::FIRST_DYNAMIC
    }

    /// Check if this is the NONE sentinel.
    #[inline]
    pub const fn is_none(self) -> bool {
        self.0 == u32::MAX
    }

    /// Human-readable name for pre-interned types.
    ///
    /// Dynamic types need the pool to render; see
    /// [`Pool::display`](crate::Pool::display).
    pub const fn name(self) -> Option<&'static str> {
        match self.0 {
            0 => Some("object"),
            1 => Some("bool"),
            2 => Some("int"),
            3 => Some("float"),
            4 => Some("str"),
            5 => Some("unit"),
            6 => Some("cancellation"),
            7 => Some("seq"),
            8 => Some("Deferred"),
            _ => None,
        }
    }
}

impl fmt::Debug for Idx {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_none() {
            write!(f, "Idx::NONE")
        } else if let Some(name) = self.name() {
            write!(f, "Idx({name})")
        } else {
            write!(f, "Idx({})", self.0)
        }
    }
}

impl Default for Idx {
    fn default() -> Self {
        Self::NONE
    }
}

#[cfg(test)]
mod tests;
