//! Identity contract for diffable elements
//!
//! Two elements are **the same** when their keys are equal, and **equal**
//! when `PartialEq` says so. The distinction is what turns
//! "same key, different content" into an `Update` instead of a
//! delete + insert pair.
//!
//! ```
//! use tola_listdiff::Diffable;
//!
//! #[derive(PartialEq)]
//! struct Row {
//!     id: u32,
//!     title: String,
//! }
//!
//! impl Diffable for Row {
//!     type Key = u32;
//!     fn diff_key(&self) -> u32 {
//!         self.id
//!     }
//! }
//! ```
//!
//! With the `macros` feature the same impl is `#[derive(Diffable)]` plus
//! `#[diff(key)]` on the `id` field.

use std::hash::Hash;

use compact_str::CompactString;

use crate::algo::StableKey;

/// An element that can be matched across two sequences.
///
/// The key must be stable for the duration of one diff call. It does not
/// need to be unique: repeated keys are matched in order of occurrence.
pub trait Diffable: PartialEq {
    /// Identity type
    type Key: Hash + Eq;

    /// Identity of this element
    fn diff_key(&self) -> Self::Key;
}

impl<T: Diffable + ?Sized> Diffable for &T {
    type Key = T::Key;

    #[inline]
    fn diff_key(&self) -> Self::Key {
        (**self).diff_key()
    }
}

impl<T: Diffable + ?Sized> Diffable for Box<T> {
    type Key = T::Key;

    #[inline]
    fn diff_key(&self) -> Self::Key {
        (**self).diff_key()
    }
}

impl Diffable for str {
    type Key = CompactString;

    #[inline]
    fn diff_key(&self) -> CompactString {
        CompactString::from(self)
    }
}

crate::impl_diffable_by_value!(
    u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize, char, bool, String,
    CompactString,
);

// =============================================================================
// AnyItem - type-erased capability object
// =============================================================================

/// Type-erased diffable value, for diffing mixed-type collections.
///
/// Captures two digests at construction instead of the value itself:
/// - `key`: the element's identity, salted with the concrete type name so
///   that `1u32` and `"1"` never match each other
/// - `fingerprint`: the element's full content, compared for updates
///
/// Keep the original collection around to map indices back to values.
///
/// ```
/// use tola_listdiff::{diff, AnyItem};
///
/// let old = [AnyItem::new(&1u32), AnyItem::new(&"one".to_string())];
/// let new = [AnyItem::new(&"one".to_string()), AnyItem::new(&1u32)];
/// assert_eq!(diff(&old, &new).moves.len(), 2);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AnyItem {
    key: StableKey,
    fingerprint: StableKey,
    type_name: &'static str,
}

impl AnyItem {
    /// Capture a value's identity and content fingerprint.
    pub fn new<T>(value: &T) -> Self
    where
        T: Diffable + Hash,
    {
        let type_name = std::any::type_name::<T>();
        Self {
            key: StableKey::of(type_name, &value.diff_key()),
            fingerprint: StableKey::of(type_name, value),
            type_name,
        }
    }

    /// Identity digest
    #[inline]
    pub fn key(&self) -> StableKey {
        self.key
    }

    /// Content digest
    #[inline]
    pub fn fingerprint(&self) -> StableKey {
        self.fingerprint
    }

    /// Name of the concrete type this item was built from
    #[inline]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }
}

impl Diffable for AnyItem {
    type Key = StableKey;

    #[inline]
    fn diff_key(&self) -> StableKey {
        self.key
    }
}
