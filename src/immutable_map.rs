//! ImmutableMap: build-once chained hash map.
//!
//! Entries live in a `SlotMap` arena and are linked into per-bucket chains
//! through `next` keys. The bucket array length is always a power of two, at
//! least [`MIN_CAPACITY`], and the load factor stays at or below 3/4 after
//! every insertion. Growing re-links existing entries by their stored hash;
//! key equality is never consulted during a rehash.

use crate::equality::{DefaultEquality, KeyEquality};
use crate::error::{Error, Result};
use core::borrow::Borrow;
use core::fmt;
use slotmap::{DefaultKey, SlotMap};
use tracing::trace;

/// Smallest bucket array a map ever allocates.
pub const MIN_CAPACITY: usize = 8;

/// Size assumed when the input does not report an exact length.
pub const DEFAULT_SIZE_ESTIMATE: usize = 4;

#[derive(Clone, Debug)]
struct Entry<K, V> {
    key: K,
    value: V,
    hash: u32,
    next: Option<DefaultKey>,
}

/// Smallest power of two holding `len` entries at load factor 0.75.
#[inline]
pub(crate) fn capacity_for(len: usize) -> usize {
    let needed = len.saturating_mul(4).saturating_add(2) / 3;
    needed.max(MIN_CAPACITY).next_power_of_two()
}

#[inline]
fn size_estimate(size_hint: (usize, Option<usize>)) -> usize {
    match size_hint {
        (lo, Some(hi)) if lo == hi => lo,
        _ => DEFAULT_SIZE_ESTIMATE,
    }
}

/// Immutable hash map built once from a finite sequence of pairs.
#[derive(Clone)]
pub struct ImmutableMap<K, V, E = DefaultEquality> {
    equality: E,
    buckets: Box<[Option<DefaultKey>]>,
    slots: SlotMap<DefaultKey, Entry<K, V>>,
}

impl<K, V, E> ImmutableMap<K, V, E>
where
    E: KeyEquality<K> + Default,
{
    /// Build from `(key, value)` pairs. Fails on the first repeated key.
    pub fn try_from_iter<I>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
    {
        Self::try_from_iter_with(pairs, E::default())
    }

    /// Build from arbitrary items through key and value projections.
    pub fn try_from_items<T, I, FK, FV>(items: I, mut key: FK, mut value: FV) -> Result<Self>
    where
        I: IntoIterator<Item = T>,
        FK: FnMut(&T) -> K,
        FV: FnMut(T) -> V,
    {
        Self::try_from_iter(items.into_iter().map(|item| (key(&item), value(item))))
    }
}

impl<K, V, E> ImmutableMap<K, V, E>
where
    E: KeyEquality<K>,
{
    /// Build with an explicit key equality definition.
    pub fn try_from_iter_with<I>(pairs: I, equality: E) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
    {
        let pairs = pairs.into_iter();
        let estimate = size_estimate(pairs.size_hint());
        let mut map = Self::with_capacity(capacity_for(estimate), equality);
        for (index, (key, value)) in pairs.enumerate() {
            if !map.insert(key, value) {
                return Err(Error::DuplicateKey { index });
            }
        }
        Ok(map)
    }

    fn with_capacity(capacity: usize, equality: E) -> Self {
        Self {
            equality,
            buckets: vec![None; capacity].into_boxed_slice(),
            slots: SlotMap::with_capacity(capacity),
        }
    }

    /// Returns `false` without inserting when an equal key is present.
    fn insert(&mut self, key: K, value: V) -> bool {
        let wanted = capacity_for(self.slots.len() + 1);
        if self.buckets.len() < wanted {
            self.rehash(wanted);
        }

        let hash = self.equality.hash(&key);
        let index = self.index_of(hash);
        let mut tail = None;
        let mut cur = self.buckets[index];
        while let Some(k) = cur {
            let Some(e) = self.slots.get(k) else { break };
            if e.hash == hash && self.equality.equals(&e.key, &key) {
                return false;
            }
            tail = Some(k);
            cur = e.next;
        }

        let k = self.slots.insert(Entry {
            key,
            value,
            hash,
            next: None,
        });
        match tail.and_then(|t| self.slots.get_mut(t)) {
            Some(last) => last.next = Some(k),
            None => self.buckets[index] = Some(k),
        }
        true
    }

    fn rehash(&mut self, capacity: usize) {
        trace!(
            from = self.buckets.len(),
            to = capacity,
            len = self.slots.len(),
            "rehash"
        );
        let order: Vec<(DefaultKey, u32)> = self.slots.iter().map(|(k, e)| (k, e.hash)).collect();
        let mut buckets = vec![None; capacity].into_boxed_slice();
        let mut tails: Vec<Option<DefaultKey>> = vec![None; capacity];
        let mask = capacity - 1;
        for (k, hash) in order {
            let index = hash as usize & mask;
            if let Some(e) = self.slots.get_mut(k) {
                e.next = None;
            }
            match tails[index].and_then(|t| self.slots.get_mut(t)) {
                Some(last) => last.next = Some(k),
                None => buckets[index] = Some(k),
            }
            tails[index] = Some(k);
        }
        self.buckets = buckets;
    }
}

impl<K, V, E> ImmutableMap<K, V, E> {
    #[inline]
    fn index_of(&self, hash: u32) -> usize {
        hash as usize & (self.buckets.len() - 1)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Number of buckets; always a power of two.
    pub fn capacity(&self) -> usize {
        self.buckets.len()
    }

    pub fn equality(&self) -> &E {
        &self.equality
    }

    fn find<Q>(&self, q: &Q) -> Option<&Entry<K, V>>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        E: KeyEquality<Q>,
    {
        let hash = self.equality.hash(q);
        let mut cur = self.buckets[self.index_of(hash)];
        while let Some(k) = cur {
            let e = self.slots.get(k)?;
            if e.hash == hash && self.equality.equals(e.key.borrow(), q) {
                return Some(e);
            }
            cur = e.next;
        }
        None
    }

    #[inline]
    pub fn get<Q>(&self, q: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        E: KeyEquality<Q>,
    {
        self.find(q).map(|e| &e.value)
    }

    pub fn get_key_value<Q>(&self, q: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        E: KeyEquality<Q>,
    {
        self.find(q).map(|e| (&e.key, &e.value))
    }

    #[inline]
    pub fn contains_key<Q>(&self, q: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized,
        E: KeyEquality<Q>,
    {
        self.get(q).is_some()
    }

    /// Bucket-then-chain traversal. The order carries no meaning.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            buckets: self.buckets.iter(),
            slots: &self.slots,
            chain: None,
            remaining: self.slots.len(),
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> + '_ {
        self.iter().map(|(k, _)| k)
    }

    pub fn values(&self) -> impl Iterator<Item = &V> + '_ {
        self.iter().map(|(_, v)| v)
    }

    #[cfg(test)]
    pub(crate) fn chain_lengths(&self) -> Vec<usize> {
        self.buckets
            .iter()
            .map(|head| {
                let mut n = 0;
                let mut cur = *head;
                while let Some(k) = cur {
                    n += 1;
                    cur = self.slots.get(k).and_then(|e| e.next);
                }
                n
            })
            .collect()
    }
}

/// Iterator over the entries of an [`ImmutableMap`].
pub struct Iter<'a, K, V> {
    buckets: core::slice::Iter<'a, Option<DefaultKey>>,
    slots: &'a SlotMap<DefaultKey, Entry<K, V>>,
    chain: Option<DefaultKey>,
    remaining: usize,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(k) = self.chain {
                let e = self.slots.get(k)?;
                self.chain = e.next;
                self.remaining = self.remaining.saturating_sub(1);
                return Some((&e.key, &e.value));
            }
            self.chain = *self.buckets.next()?;
        }
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

impl<'a, K, V, E> IntoIterator for &'a ImmutableMap<K, V, E> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K: fmt::Debug, V: fmt::Debug, E> fmt::Debug for ImmutableMap<K, V, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}
