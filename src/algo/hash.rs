//! Deterministic hashing for type-erased identities
//!
//! `std`'s `DefaultHasher` is randomly seeded per process, which makes it
//! useless for identities that should survive a restart (or be compared
//! across two processes). `StableHasher` feeds everything into blake3
//! instead.

use std::fmt;
use std::hash::{Hash, Hasher};

// =============================================================================
// StableHasher - Builder Pattern
// =============================================================================

/// A deterministic hasher using blake3
///
/// Can be driven two ways:
/// - the builder methods (`update_str`, `update_u64`, ...) for hand-built keys
/// - `std::hash::Hasher`, so any `T: Hash` can be fed through `value.hash(&mut h)`
///
/// Note: `Hash` impls of primitive integers write native-endian bytes, so keys
/// built through `Hasher` are stable across processes but not across
/// architectures with different endianness.
#[derive(Clone)]
pub struct StableHasher {
    inner: blake3::Hasher,
}

impl StableHasher {
    /// Create a new StableHasher
    #[inline]
    pub fn new() -> Self {
        Self {
            inner: blake3::Hasher::new(),
        }
    }

    /// Create a hasher salted with a domain string (e.g. a type name)
    #[inline]
    pub fn with_domain(domain: &str) -> Self {
        Self::new().update_str(domain).update(&[0xff])
    }

    /// Update with raw bytes
    #[inline]
    pub fn update(mut self, data: &[u8]) -> Self {
        self.inner.update(data);
        self
    }

    /// Update with a string
    #[inline]
    pub fn update_str(self, s: &str) -> Self {
        self.update(s.as_bytes())
    }

    /// Update with a u64 value (little-endian)
    #[inline]
    pub fn update_u64(self, v: u64) -> Self {
        self.update(&v.to_le_bytes())
    }

    /// Feed any `Hash` value through the `Hasher` impl
    #[inline]
    pub fn update_hash<T: Hash + ?Sized>(mut self, value: &T) -> Self {
        value.hash(&mut self);
        self
    }

    /// Finish into a [`StableKey`]
    #[inline]
    pub fn finish_key(&self) -> StableKey {
        let hash = self.inner.finalize();
        let mut bytes = [0u8; 16];
        bytes.copy_from_slice(&hash.as_bytes()[..16]);
        StableKey(u128::from_le_bytes(bytes))
    }
}

impl Default for StableHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl Hasher for StableHasher {
    #[inline]
    fn write(&mut self, bytes: &[u8]) {
        self.inner.update(bytes);
    }

    /// First 8 bytes of the blake3 output as little-endian u64.
    #[inline]
    fn finish(&self) -> u64 {
        let hash = self.inner.finalize();
        let mut bytes = [0u8; 8];
        bytes.copy_from_slice(&hash.as_bytes()[..8]);
        u64::from_le_bytes(bytes)
    }
}

// =============================================================================
// StableKey
// =============================================================================

/// 128-bit deterministic digest, used as the identity of type-erased items.
///
/// - 16 bytes, `Copy`
/// - Same input (and domain) always produces the same key
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[must_use]
pub struct StableKey(u128);

impl StableKey {
    /// Hash a value under a domain
    pub fn of<T: Hash + ?Sized>(domain: &str, value: &T) -> Self {
        StableHasher::with_domain(domain).update_hash(value).finish_key()
    }

    /// Wrap a raw digest
    #[inline]
    pub const fn from_raw(raw: u128) -> Self {
        Self(raw)
    }

    /// Raw digest
    #[inline]
    pub const fn as_raw(&self) -> u128 {
        self.0
    }
}

impl fmt::Debug for StableKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StableKey({:032x})", self.0)
    }
}

impl fmt::Display for StableKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:032x}", self.0)
    }
}
