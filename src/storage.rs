//! Storage kinds: the primitive representations a fixed-value type may use,
//! and the checked conversions between them.
//!
//! Every conversion goes through an `i128` pivot, which holds every supported
//! primitive exactly. Narrowing that loses information fails with
//! [`Error::OutOfRange`] instead of truncating.

use crate::error::{Error, Result};
use core::fmt;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum StorageKind {
    I8,
    U8,
    I16,
    U16,
    I32,
    U32,
    I64,
    U64,
    Char,
}

impl StorageKind {
    pub const ALL: [StorageKind; 9] = [
        StorageKind::I8,
        StorageKind::U8,
        StorageKind::I16,
        StorageKind::U16,
        StorageKind::I32,
        StorageKind::U32,
        StorageKind::I64,
        StorageKind::U64,
        StorageKind::Char,
    ];

    pub fn name(self) -> &'static str {
        match self {
            StorageKind::I8 => "i8",
            StorageKind::U8 => "u8",
            StorageKind::I16 => "i16",
            StorageKind::U16 => "u16",
            StorageKind::I32 => "i32",
            StorageKind::U32 => "u32",
            StorageKind::I64 => "i64",
            StorageKind::U64 => "u64",
            StorageKind::Char => "char",
        }
    }

    /// Parse a numeric literal of exactly this kind.
    ///
    /// Integer kinds ignore surrounding ASCII whitespace and accept an
    /// optional sign; unsigned kinds also accept a negative zero. `Char`
    /// accepts exactly one character, untrimmed.
    pub fn parse_literal(self, s: &str) -> Option<StorageValue> {
        if self == StorageKind::Char {
            let mut chars = s.chars();
            return match (chars.next(), chars.next()) {
                (Some(c), None) => Some(StorageValue::Char(c)),
                _ => None,
            };
        }
        let s = s.trim_matches(|c: char| c.is_ascii_whitespace());
        match self {
            StorageKind::I8 => s.parse().ok().map(StorageValue::I8),
            StorageKind::U8 => unsigned_digits(s).parse().ok().map(StorageValue::U8),
            StorageKind::I16 => s.parse().ok().map(StorageValue::I16),
            StorageKind::U16 => unsigned_digits(s).parse().ok().map(StorageValue::U16),
            StorageKind::I32 => s.parse().ok().map(StorageValue::I32),
            StorageKind::U32 => unsigned_digits(s).parse().ok().map(StorageValue::U32),
            StorageKind::I64 => s.parse().ok().map(StorageValue::I64),
            StorageKind::U64 => unsigned_digits(s).parse().ok().map(StorageValue::U64),
            StorageKind::Char => None,
        }
    }
}

/// Drops the sign of a negative zero so unsigned parsing accepts it.
fn unsigned_digits(s: &str) -> &str {
    match s.strip_prefix('-') {
        Some(digits) if !digits.is_empty() && digits.bytes().all(|b| b == b'0') => digits,
        _ => s,
    }
}

impl fmt::Display for StorageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One primitive value, tagged with its storage kind.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum StorageValue {
    I8(i8),
    U8(u8),
    I16(i16),
    U16(u16),
    I32(i32),
    U32(u32),
    I64(i64),
    U64(u64),
    Char(char),
}

impl StorageValue {
    pub fn kind(self) -> StorageKind {
        match self {
            StorageValue::I8(_) => StorageKind::I8,
            StorageValue::U8(_) => StorageKind::U8,
            StorageValue::I16(_) => StorageKind::I16,
            StorageValue::U16(_) => StorageKind::U16,
            StorageValue::I32(_) => StorageKind::I32,
            StorageValue::U32(_) => StorageKind::U32,
            StorageValue::I64(_) => StorageKind::I64,
            StorageValue::U64(_) => StorageKind::U64,
            StorageValue::Char(_) => StorageKind::Char,
        }
    }

    fn widen(self) -> i128 {
        match self {
            StorageValue::I8(v) => v.into(),
            StorageValue::U8(v) => v.into(),
            StorageValue::I16(v) => v.into(),
            StorageValue::U16(v) => v.into(),
            StorageValue::I32(v) => v.into(),
            StorageValue::U32(v) => v.into(),
            StorageValue::I64(v) => v.into(),
            StorageValue::U64(v) => v.into(),
            StorageValue::Char(c) => u32::from(c).into(),
        }
    }

    /// Value-preserving conversion to `kind`.
    pub fn convert(self, kind: StorageKind) -> Result<StorageValue> {
        if self.kind() == kind {
            return Ok(self);
        }
        let wide = self.widen();
        let out = match kind {
            StorageKind::I8 => i8::try_from(wide).ok().map(StorageValue::I8),
            StorageKind::U8 => u8::try_from(wide).ok().map(StorageValue::U8),
            StorageKind::I16 => i16::try_from(wide).ok().map(StorageValue::I16),
            StorageKind::U16 => u16::try_from(wide).ok().map(StorageValue::U16),
            StorageKind::I32 => i32::try_from(wide).ok().map(StorageValue::I32),
            StorageKind::U32 => u32::try_from(wide).ok().map(StorageValue::U32),
            StorageKind::I64 => i64::try_from(wide).ok().map(StorageValue::I64),
            StorageKind::U64 => u64::try_from(wide).ok().map(StorageValue::U64),
            StorageKind::Char => u32::try_from(wide)
                .ok()
                .and_then(char::from_u32)
                .map(StorageValue::Char),
        };
        out.ok_or_else(|| Error::OutOfRange {
            value: self.to_string(),
            kind,
        })
    }
}

impl fmt::Display for StorageValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageValue::I8(v) => v.fmt(f),
            StorageValue::U8(v) => v.fmt(f),
            StorageValue::I16(v) => v.fmt(f),
            StorageValue::U16(v) => v.fmt(f),
            StorageValue::I32(v) => v.fmt(f),
            StorageValue::U32(v) => v.fmt(f),
            StorageValue::I64(v) => v.fmt(f),
            StorageValue::U64(v) => v.fmt(f),
            StorageValue::Char(c) => write!(f, "{c:?}"),
        }
    }
}

/// A primitive that can back a fixed-value type.
pub trait StorageRepr: Copy + Eq + core::hash::Hash + Send + Sync + 'static {
    const KIND: StorageKind;

    fn into_value(self) -> StorageValue;

    /// `None` unless `v` carries exactly this primitive.
    fn from_value(v: StorageValue) -> Option<Self>;
}

macro_rules! storage_repr {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl StorageRepr for $ty {
                const KIND: StorageKind = StorageKind::$variant;

                #[inline]
                fn into_value(self) -> StorageValue {
                    StorageValue::$variant(self)
                }

                #[inline]
                fn from_value(v: StorageValue) -> Option<Self> {
                    match v {
                        StorageValue::$variant(x) => Some(x),
                        _ => None,
                    }
                }
            }

            impl From<$ty> for StorageValue {
                #[inline]
                fn from(v: $ty) -> Self {
                    StorageValue::$variant(v)
                }
            }
        )*
    };
}

storage_repr! {
    i8 => I8,
    u8 => U8,
    i16 => I16,
    u16 => U16,
    i32 => I32,
    u32 => U32,
    i64 => I64,
    u64 => U64,
    char => Char,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(kind: StorageKind) -> StorageValue {
        match kind {
            StorageKind::I8 => StorageValue::I8(65),
            StorageKind::U8 => StorageValue::U8(65),
            StorageKind::I16 => StorageValue::I16(65),
            StorageKind::U16 => StorageValue::U16(65),
            StorageKind::I32 => StorageValue::I32(65),
            StorageKind::U32 => StorageValue::U32(65),
            StorageKind::I64 => StorageValue::I64(65),
            StorageKind::U64 => StorageValue::U64(65),
            StorageKind::Char => StorageValue::Char('A'),
        }
    }

    /// Invariant: every (source, target) pair converts a value that fits in both.
    #[test]
    fn every_pair_converts_in_range_values() {
        for from in StorageKind::ALL {
            for to in StorageKind::ALL {
                let out = sample(from).convert(to).unwrap();
                assert_eq!(out, sample(to), "{from} -> {to}");
                assert_eq!(out.kind(), to);
            }
        }
    }

    /// Invariant: narrowing and sign changes fail rather than truncate.
    #[test]
    fn out_of_range_conversions_fail() {
        let cases = [
            (StorageValue::I32(300), StorageKind::U8),
            (StorageValue::I32(-1), StorageKind::U32),
            (StorageValue::I8(-1), StorageKind::U64),
            (StorageValue::U8(200), StorageKind::I8),
            (StorageValue::U64(u64::MAX), StorageKind::I64),
            (StorageValue::I64(i64::MIN), StorageKind::I32),
            (StorageValue::U16(u16::MAX), StorageKind::I16),
            (StorageValue::U32(0xD800), StorageKind::Char),
            (StorageValue::I32(-5), StorageKind::Char),
            (StorageValue::Char('\u{10000}'), StorageKind::U16),
        ];
        for (v, kind) in cases {
            assert_eq!(
                v.convert(kind),
                Err(Error::OutOfRange {
                    value: v.to_string(),
                    kind
                }),
                "{v} -> {kind}"
            );
        }
    }

    /// Invariant: extreme values survive widening and the matching narrowing.
    #[test]
    fn extremes_round_through_wider_kinds() {
        assert_eq!(
            StorageValue::I8(i8::MIN).convert(StorageKind::I64),
            Ok(StorageValue::I64(-128))
        );
        assert_eq!(
            StorageValue::U32(u32::MAX).convert(StorageKind::U64),
            Ok(StorageValue::U64(4_294_967_295))
        );
        assert_eq!(
            StorageValue::U64(u64::from(u32::MAX)).convert(StorageKind::U32),
            Ok(StorageValue::U32(u32::MAX))
        );
        assert_eq!(
            StorageValue::Char('\u{10FFFF}').convert(StorageKind::I32),
            Ok(StorageValue::I32(0x10FFFF))
        );
    }

    #[test]
    fn parse_literal_per_kind() {
        assert_eq!(StorageKind::U8.parse_literal("11"), Some(StorageValue::U8(11)));
        assert_eq!(StorageKind::U8.parse_literal("256"), None);
        assert_eq!(StorageKind::U8.parse_literal("-1"), None);
        assert_eq!(StorageKind::I8.parse_literal("-128"), Some(StorageValue::I8(-128)));
        assert_eq!(StorageKind::I16.parse_literal(" +42 "), Some(StorageValue::I16(42)));
        assert_eq!(StorageKind::U16.parse_literal("65535"), Some(StorageValue::U16(65535)));
        assert_eq!(StorageKind::I32.parse_literal("2147483648"), None);
        assert_eq!(StorageKind::U32.parse_literal("4294967295"), Some(StorageValue::U32(u32::MAX)));
        assert_eq!(StorageKind::I64.parse_literal("-9"), Some(StorageValue::I64(-9)));
        assert_eq!(
            StorageKind::U64.parse_literal("18446744073709551615"),
            Some(StorageValue::U64(u64::MAX))
        );
        assert_eq!(StorageKind::Char.parse_literal("x"), Some(StorageValue::Char('x')));
        assert_eq!(StorageKind::Char.parse_literal("xy"), None);
        assert_eq!(StorageKind::Char.parse_literal(" "), Some(StorageValue::Char(' ')));
        assert_eq!(StorageKind::Char.parse_literal(" x "), None);
        assert_eq!(StorageKind::Char.parse_literal(""), None);
        assert_eq!(StorageKind::I32.parse_literal("Apple"), None);
        assert_eq!(StorageKind::I32.parse_literal(""), None);
    }

    /// Invariant: negative zero is zero for unsigned kinds; other negatives fail.
    #[test]
    fn unsigned_kinds_accept_negative_zero() {
        assert_eq!(StorageKind::U8.parse_literal("-0"), Some(StorageValue::U8(0)));
        assert_eq!(StorageKind::U16.parse_literal(" -00 "), Some(StorageValue::U16(0)));
        assert_eq!(StorageKind::U32.parse_literal("-0"), Some(StorageValue::U32(0)));
        assert_eq!(StorageKind::U64.parse_literal("-000"), Some(StorageValue::U64(0)));
        assert_eq!(StorageKind::U8.parse_literal("-"), None);
        assert_eq!(StorageKind::U8.parse_literal("-01"), None);
        assert_eq!(StorageKind::I8.parse_literal("-0"), Some(StorageValue::I8(0)));
    }

    #[test]
    fn repr_round_trip_tags() {
        assert_eq!(<u8 as StorageRepr>::KIND, StorageKind::U8);
        assert_eq!(u8::from_value(StorageValue::U8(3)), Some(3));
        assert_eq!(u8::from_value(StorageValue::I8(3)), None);
        assert_eq!('q'.into_value(), StorageValue::Char('q'));
    }
}
