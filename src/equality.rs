//! Key equality definitions used by [`ImmutableMap`](crate::ImmutableMap).
//!
//! A map never calls `Hash`/`Eq` on its keys directly; it asks its
//! `KeyEquality` for a 32-bit hash and an equality verdict. Implementations
//! must keep `equals(a, b) => hash(a) == hash(b)`.

use crate::hashing::{eq_ordinal_ignore_case, hash_ordinal, hash_ordinal_ignore_case};
use core::hash::{BuildHasher, Hash};
use std::collections::hash_map::RandomState;

pub trait KeyEquality<K: ?Sized> {
    fn hash(&self, key: &K) -> u32;
    fn equals(&self, a: &K, b: &K) -> bool;
}

/// `Hash + Eq` keys hashed through a `BuildHasher`, truncated to 32 bits.
#[derive(Clone, Debug, Default)]
pub struct DefaultEquality<S = RandomState> {
    hasher: S,
}

impl<S> DefaultEquality<S> {
    pub fn with_hasher(hasher: S) -> Self {
        Self { hasher }
    }
}

impl<K, S> KeyEquality<K> for DefaultEquality<S>
where
    K: ?Sized + Hash + Eq,
    S: BuildHasher,
{
    #[inline]
    fn hash(&self, key: &K) -> u32 {
        let h = self.hasher.hash_one(key);
        // Fold the high half in so bucket masks see all 64 bits.
        (h ^ (h >> 32)) as u32
    }

    #[inline]
    fn equals(&self, a: &K, b: &K) -> bool {
        a == b
    }
}

/// Case-sensitive ordinal string equality with the unseeded ordinal hash.
#[derive(Clone, Copy, Debug, Default)]
pub struct Ordinal;

impl<K> KeyEquality<K> for Ordinal
where
    K: ?Sized + AsRef<str>,
{
    #[inline]
    fn hash(&self, key: &K) -> u32 {
        hash_ordinal(key.as_ref())
    }

    #[inline]
    fn equals(&self, a: &K, b: &K) -> bool {
        a.as_ref() == b.as_ref()
    }
}

/// Ordinal ignore-case string equality.
#[derive(Clone, Copy, Debug, Default)]
pub struct OrdinalIgnoreCase;

impl<K> KeyEquality<K> for OrdinalIgnoreCase
where
    K: ?Sized + AsRef<str>,
{
    #[inline]
    fn hash(&self, key: &K) -> u32 {
        hash_ordinal_ignore_case(key.as_ref())
    }

    #[inline]
    fn equals(&self, a: &K, b: &K) -> bool {
        eq_ordinal_ignore_case(a.as_ref(), b.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Invariant: equal keys hash equally under every provided definition.
    #[test]
    fn equal_keys_hash_equal() {
        let d = DefaultEquality::<RandomState>::default();
        assert!(KeyEquality::<str>::equals(&d, "k", "k"));
        assert_eq!(KeyEquality::<str>::hash(&d, "k"), KeyEquality::<str>::hash(&d, "k"));

        assert!(Ordinal.equals("Lemon", "Lemon"));
        assert!(!Ordinal.equals("Lemon", "lemon"));

        assert!(OrdinalIgnoreCase.equals("Lemon", "lEMON"));
        assert_eq!(OrdinalIgnoreCase.hash("Lemon"), OrdinalIgnoreCase.hash("LEMON"));
    }

    /// Invariant: owned and borrowed string keys agree.
    #[test]
    fn owned_and_borrowed_agree() {
        let owned = String::from("Banana");
        assert_eq!(OrdinalIgnoreCase.hash(&owned), OrdinalIgnoreCase.hash("banana"));
        assert_eq!(Ordinal.hash(&owned), Ordinal.hash("Banana"));
    }
}
