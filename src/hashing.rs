//! Ordinal string hashing.
//!
//! Both hashes walk the UTF-16 code units of the input two at a time, pack
//! each pair into a little-endian `u32` word (a missing trailing unit reads as
//! zero) and feed the words alternately into two DJB-style accumulators. The
//! result is stable across runs and processes; it is not seeded.
//!
//! The ignore-case variant folds every character to its simple uppercase form
//! and then sets bit `0x20` on each code unit. For ASCII that maps `A` and `a`
//! to the same unit. It also merges a few unrelated punctuation pairs
//! (`^`/`~`, `@`/`` ` ``), which only costs an extra equality check.

const SEED: u32 = (5381 << 16) + 5381;
const MIX: u32 = 1_566_083_941;
const LOWER_BIT: u16 = 0x0020;

struct WordHasher {
    h1: u32,
    h2: u32,
    pending: Option<u32>,
}

impl WordHasher {
    #[inline]
    fn new() -> Self {
        Self {
            h1: SEED,
            h2: SEED,
            pending: None,
        }
    }

    #[inline]
    fn write(&mut self, word: u32) {
        match self.pending.take() {
            None => self.pending = Some(word),
            Some(first) => {
                self.h1 = (self.h1.rotate_left(5).wrapping_add(self.h1)) ^ first;
                self.h2 = (self.h2.rotate_left(5).wrapping_add(self.h2)) ^ word;
            }
        }
    }

    #[inline]
    fn finish(mut self) -> u32 {
        // An odd trailing word always lands in the second accumulator.
        if let Some(last) = self.pending.take() {
            self.h2 = (self.h2.rotate_left(5).wrapping_add(self.h2)) ^ last;
        }
        self.h1.wrapping_add(self.h2.wrapping_mul(MIX))
    }
}

#[inline]
fn hash_units<I>(units: I, or_mask: u16) -> u32
where
    I: Iterator<Item = u16>,
{
    let mut units = units;
    let mut hasher = WordHasher::new();
    while let Some(lo) = units.next() {
        let hi = units.next().map(|u| u | or_mask).unwrap_or(0);
        hasher.write(u32::from(lo | or_mask) | (u32::from(hi) << 16));
    }
    hasher.finish()
}

/// Single-character uppercase mapping used by ordinal ignore-case
/// comparison. Built on the full `to_uppercase` mapping: characters whose
/// uppercase form expands to several characters map to themselves, so this
/// approximates the Unicode simple case mapping (`'\u{1FB3}'` stays as is
/// instead of becoming `'\u{1FBC}'`).
#[inline]
pub fn fold_case(c: char) -> char {
    if c.is_ascii() {
        return c.to_ascii_uppercase();
    }
    let mut upper = c.to_uppercase();
    match (upper.next(), upper.next()) {
        (Some(u), None) => u,
        _ => c,
    }
}

#[inline]
fn folded_units(s: &str) -> impl Iterator<Item = u16> + '_ {
    s.chars().flat_map(|c| {
        let mut buf = [0u16; 2];
        let n = fold_case(c).encode_utf16(&mut buf).len();
        buf.into_iter().take(n)
    })
}

/// Case-sensitive ordinal hash of `s`.
#[inline]
pub fn hash_ordinal(s: &str) -> u32 {
    hash_units(s.encode_utf16(), 0)
}

/// Ordinal ignore-case hash of `s`.
///
/// `hash_ordinal_ignore_case(a) == hash_ordinal_ignore_case(b)` whenever
/// `eq_ordinal_ignore_case(a, b)`. For lowercase ASCII input made of letters,
/// digits and space the result equals [`hash_ordinal`].
#[inline]
pub fn hash_ordinal_ignore_case(s: &str) -> u32 {
    hash_units(folded_units(s), LOWER_BIT)
}

/// Ordinal ignore-case equality: character-by-character comparison of the
/// [`fold_case`] forms, no locale rules.
#[inline]
pub fn eq_ordinal_ignore_case(a: &str, b: &str) -> bool {
    if a.len() == b.len() && a.eq_ignore_ascii_case(b) {
        return true;
    }
    a.chars().map(fold_case).eq(b.chars().map(fold_case))
}
