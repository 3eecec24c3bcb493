#![cfg(test)]

// Property tests for ImmutableMap kept inside the crate so they can inspect
// bucket chains.

use crate::equality::{KeyEquality, OrdinalIgnoreCase};
use crate::error::Error;
use crate::hashing::{hash_ordinal, hash_ordinal_ignore_case};
use crate::immutable_map::{capacity_for, ImmutableMap};
use proptest::prelude::*;
use std::collections::{BTreeMap, BTreeSet, HashMap};

// Equality with few distinct hashes so chains get long.
#[derive(Default)]
struct NarrowEquality;

impl KeyEquality<String> for NarrowEquality {
    fn hash(&self, key: &String) -> u32 {
        KeyEquality::<str>::hash(self, key.as_str())
    }
    fn equals(&self, a: &String, b: &String) -> bool {
        a == b
    }
}

impl KeyEquality<str> for NarrowEquality {
    fn hash(&self, key: &str) -> u32 {
        hash_ordinal(key) & 0x3
    }
    fn equals(&self, a: &str, b: &str) -> bool {
        a == b
    }
}

fn unique_pairs() -> impl Strategy<Value = Vec<(String, i32)>> {
    proptest::collection::btree_map("[a-zA-Z0-9]{0,6}", any::<i32>(), 0..80)
        .prop_map(|m: BTreeMap<String, i32>| m.into_iter().collect())
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]

    // Property: with unique keys, every key resolves to its value, len matches,
    // iteration covers the input exactly once, and the load factor holds.
    #[test]
    fn prop_unique_keys_resolve(pairs in unique_pairs(), probes in proptest::collection::vec("[a-zA-Z0-9]{0,6}", 0..20)) {
        let model: HashMap<String, i32> = pairs.iter().cloned().collect();
        let m: ImmutableMap<String, i32> = ImmutableMap::try_from_iter(pairs.clone()).unwrap();

        prop_assert_eq!(m.len(), pairs.len());
        prop_assert!(m.capacity().is_power_of_two());
        prop_assert!(m.capacity() >= 8);
        prop_assert!(m.len() * 4 <= m.capacity() * 3);
        prop_assert_eq!(m.capacity(), capacity_for(pairs.len()));

        for (k, v) in &pairs {
            prop_assert_eq!(m.get(k.as_str()), Some(v));
        }
        for p in &probes {
            prop_assert_eq!(m.get(p.as_str()), model.get(p));
        }

        let seen: BTreeSet<(String, i32)> = m.iter().map(|(k, v)| (k.clone(), *v)).collect();
        let expected: BTreeSet<(String, i32)> = pairs.iter().cloned().collect();
        prop_assert_eq!(seen.len(), m.iter().count());
        prop_assert_eq!(seen, expected);
    }

    // Property: unsized sources grow through rehashes and still resolve.
    #[test]
    fn prop_rehash_under_collisions(pairs in unique_pairs()) {
        let source = pairs.clone().into_iter().filter(|_| true);
        let m: ImmutableMap<String, i32, NarrowEquality> = ImmutableMap::try_from_iter(source).unwrap();
        prop_assert_eq!(m.chain_lengths().iter().sum::<usize>(), pairs.len());
        prop_assert!(m.chain_lengths().iter().skip(4).all(|&n| n == 0));
        for (k, v) in &pairs {
            prop_assert_eq!(m.get(k.as_str()), Some(v));
        }
    }

    // Property: a repeated key fails the build at the second occurrence.
    #[test]
    fn prop_duplicate_fails((pairs, dup) in unique_pairs()
        .prop_filter("need a key", |p| !p.is_empty())
        .prop_flat_map(|p| { let n = p.len(); (Just(p), 0..n) }))
    {
        let mut input = pairs.clone();
        let (k, _) = input[dup].clone();
        input.push((k, 0));
        let r: Result<ImmutableMap<String, i32>, Error> = ImmutableMap::try_from_iter(input);
        prop_assert_eq!(r.err(), Some(Error::DuplicateKey { index: pairs.len() }));
    }

    // Property: ignore-case hash is invariant under ASCII and Unicode case mapping.
    #[test]
    fn prop_ignore_case_hash_invariant(s in "\\PC{0,12}") {
        let h = hash_ordinal_ignore_case(&s);
        prop_assert_eq!(h, hash_ordinal_ignore_case(&s.to_ascii_uppercase()));
        prop_assert_eq!(h, hash_ordinal_ignore_case(&s.to_ascii_lowercase()));
        if OrdinalIgnoreCase.equals(s.as_str(), s.to_uppercase().as_str()) {
            prop_assert_eq!(h, hash_ordinal_ignore_case(&s.to_uppercase()));
        }
        if OrdinalIgnoreCase.equals(s.as_str(), s.to_lowercase().as_str()) {
            prop_assert_eq!(h, hash_ordinal_ignore_case(&s.to_lowercase()));
        }
    }

    // Property: for ASCII, toUpper/toLower always stay equal under ignore-case.
    #[test]
    fn prop_ascii_case_variants(s in "[ -~]{0,16}") {
        let h = hash_ordinal_ignore_case(&s);
        prop_assert_eq!(h, hash_ordinal_ignore_case(&s.to_uppercase()));
        prop_assert_eq!(h, hash_ordinal_ignore_case(&s.to_lowercase()));
    }
}
