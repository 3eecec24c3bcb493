//! IgnoreCaseMap: string-keyed [`ImmutableMap`] with ordinal ignore-case keys.

use crate::equality::OrdinalIgnoreCase;
use crate::error::Result;
use crate::immutable_map::{ImmutableMap, Iter};
use core::fmt;

/// Immutable map from strings to `V`, matching keys by ordinal ignore-case
/// comparison. Lookups take `&str` and never allocate.
#[derive(Clone)]
pub struct IgnoreCaseMap<V> {
    inner: ImmutableMap<Box<str>, V, OrdinalIgnoreCase>,
}

impl<V> IgnoreCaseMap<V> {
    /// Fails when two keys differ only by case (or are equal).
    pub fn try_from_iter<I, S>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, V)>,
        S: Into<Box<str>>,
    {
        let inner = ImmutableMap::try_from_iter_with(
            pairs.into_iter().map(|(k, v)| (k.into(), v)),
            OrdinalIgnoreCase,
        )?;
        Ok(Self { inner })
    }

    pub fn try_from_items<T, I, S, FK, FV>(items: I, mut key: FK, mut value: FV) -> Result<Self>
    where
        I: IntoIterator<Item = T>,
        S: Into<Box<str>>,
        FK: FnMut(&T) -> S,
        FV: FnMut(T) -> V,
    {
        Self::try_from_iter(items.into_iter().map(|item| (key(&item), value(item))))
    }

    /// Borrowed-key lookup; the hot path of ignore-case name resolution.
    #[inline]
    pub fn get(&self, key: &str) -> Option<&V> {
        self.inner.get(key)
    }

    /// Returns the stored key spelling along with the value.
    pub fn get_key_value(&self, key: &str) -> Option<(&str, &V)> {
        self.inner.get_key_value(key).map(|(k, v)| (&**k, v))
    }

    #[inline]
    pub fn contains_key(&self, key: &str) -> bool {
        self.inner.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn iter(&self) -> Iter<'_, Box<str>, V> {
        self.inner.iter()
    }
}

impl<V: fmt::Debug> fmt::Debug for IgnoreCaseMap<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.inner, f)
    }
}
