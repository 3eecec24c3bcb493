// ImmutableMap / IgnoreCaseMap integration tests.
//
// Invariants exercised:
// - Lookup: every input key resolves to its paired value; absent keys miss.
// - Uniqueness: duplicate keys abort construction; no map is produced.
// - Ignore-case: keys differing only in case resolve to the same entry.
// - Sharing: a built map is read from many threads without locking.
use enum_cache::{
    Error, IgnoreCaseMap, ImmutableMap, KeyEquality, Ordinal, OrdinalIgnoreCase,
};
use std::collections::BTreeSet;
use std::sync::Arc;

// Test: small literal map.
// Verifies: hit returns the paired value, miss returns None.
#[test]
fn build_then_lookup() {
    let m: ImmutableMap<&str, i32> =
        ImmutableMap::try_from_iter([("A", 1), ("B", 2), ("C", 3)]).expect("unique keys");
    assert_eq!(m.get("B"), Some(&2));
    assert_eq!(m.get("Z"), None);
    assert_eq!(m.len(), 3);
}

// Test: duplicate detection under each equality definition.
// Verifies: the build fails at the offending position.
#[test]
fn duplicates_fail_under_each_equality() {
    let plain = ImmutableMap::<String, u8, Ordinal>::try_from_iter([
        ("x".to_string(), 1),
        ("X".to_string(), 2),
    ]);
    assert!(plain.is_ok(), "ordinal equality is case-sensitive");

    let folded = ImmutableMap::<String, u8, OrdinalIgnoreCase>::try_from_iter([
        ("x".to_string(), 1),
        ("X".to_string(), 2),
    ]);
    assert_eq!(folded.err(), Some(Error::DuplicateKey { index: 1 }));

    let ints = ImmutableMap::<u64, ()>::try_from_iter((0..50).chain([17]).map(|i| (i, ())));
    assert_eq!(ints.err(), Some(Error::DuplicateKey { index: 50 }));
}

// Test: ignore-case scenario.
// Verifies: both spellings resolve, with zero-copy &str queries.
#[test]
fn ignore_case_map_lookup() {
    let m = IgnoreCaseMap::try_from_iter([("Melon", 4)]).unwrap();
    assert_eq!(m.get("melon"), Some(&4));
    assert_eq!(m.get("MELON"), Some(&4));
    let owned = String::from("MeLoN");
    assert_eq!(m.get(&owned), Some(&4));
    assert!(!m.contains_key("lemon"));
}

// Test: custom key equality plugged into the generic map.
// Verifies: lookups use the supplied hash and equality.
#[test]
fn custom_equality() {
    #[derive(Default)]
    struct ByLength;
    impl KeyEquality<str> for ByLength {
        fn hash(&self, key: &str) -> u32 {
            key.len() as u32
        }
        fn equals(&self, a: &str, b: &str) -> bool {
            a.len() == b.len()
        }
    }
    impl KeyEquality<&'static str> for ByLength {
        fn hash(&self, key: &&'static str) -> u32 {
            key.len() as u32
        }
        fn equals(&self, a: &&'static str, b: &&'static str) -> bool {
            a.len() == b.len()
        }
    }

    let m: ImmutableMap<&'static str, u8, ByLength> =
        ImmutableMap::try_from_iter([("a", 1), ("bb", 2), ("ccc", 3)]).unwrap();
    assert_eq!(m.get("zz"), Some(&2));
    assert_eq!(m.get("zzzz"), None);
    assert!(ImmutableMap::<&'static str, u8, ByLength>::try_from_iter([("a", 1), ("b", 2)]).is_err());
}

// Test: large map shared across threads.
// Verifies: concurrent readers see every entry; iteration is complete.
#[test]
fn concurrent_readers() {
    let m: Arc<ImmutableMap<String, usize>> = Arc::new(
        ImmutableMap::try_from_iter((0..5_000).map(|i| (format!("key-{i}"), i))).unwrap(),
    );
    std::thread::scope(|s| {
        for t in 0..4 {
            let m = Arc::clone(&m);
            s.spawn(move || {
                for i in (t..5_000).step_by(4) {
                    assert_eq!(m.get(format!("key-{i}").as_str()), Some(&i));
                }
                assert!(m.get("key-5000").is_none());
            });
        }
    });
    let values: BTreeSet<usize> = m.values().copied().collect();
    assert_eq!(values.len(), 5_000);
    assert_eq!(m.keys().count(), 5_000);
}
