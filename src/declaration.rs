//! Static declarations of fixed-value types.
//!
//! A fixed-value type is an open newtype over a [`StorageRepr`] primitive with
//! a list of named constants. Any bit pattern of the primitive is a valid
//! instance; the named constants are its declared members. The
//! [`fixed_value!`](crate::fixed_value) macro generates such a type together
//! with its [`FixedValue`] impl.

use crate::error::{Error, Result};
use crate::storage::{StorageKind, StorageRepr, StorageValue};
use core::hash::Hash;

/// One declared member and its annotations.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Member<T> {
    pub name: &'static str,
    pub value: T,
    /// Alternate name used by external serializers.
    pub serialized_name: Option<&'static str>,
    /// Indexed string annotations, in declaration order.
    pub labels: &'static [(i32, &'static str)],
}

impl<T> Member<T> {
    pub const fn new(name: &'static str, value: T) -> Self {
        Self {
            name,
            value,
            serialized_name: None,
            labels: &[],
        }
    }

    pub const fn serialized_as(mut self, name: &'static str) -> Self {
        self.serialized_name = Some(name);
        self
    }

    pub const fn with_labels(mut self, labels: &'static [(i32, &'static str)]) -> Self {
        self.labels = labels;
        self
    }
}

/// Provider of a type's static declaration.
pub trait FixedValue: Copy + Eq + Hash + Send + Sync + 'static {
    type Repr: StorageRepr;

    /// Values are meant to be OR-combined.
    const IS_FLAGS: bool = false;

    /// Declared members in declaration order.
    fn members() -> &'static [Member<Self>];

    fn from_repr(repr: Self::Repr) -> Self;

    fn to_repr(self) -> Self::Repr;

    fn type_name() -> &'static str {
        core::any::type_name::<Self>()
    }

    fn storage_kind() -> StorageKind {
        <Self::Repr as StorageRepr>::KIND
    }

    fn to_storage(self) -> StorageValue {
        self.to_repr().into_value()
    }

    /// Fails unless `value` carries exactly this type's primitive.
    fn from_storage(value: StorageValue) -> Result<Self> {
        <Self::Repr as StorageRepr>::from_value(value)
            .map(Self::from_repr)
            .ok_or(Error::UnsupportedStorageKind {
                type_name: Self::type_name(),
                expected: Self::storage_kind(),
                found: value.kind(),
            })
    }
}

#[doc(hidden)]
#[macro_export]
macro_rules! __opt {
    () => {
        ::core::option::Option::None
    };
    ($e:expr) => {
        ::core::option::Option::Some($e)
    };
}

/// Declare an open fixed-value type.
///
/// ```
/// enum_cache::fixed_value! {
///     #[flags]
///     /// Fruit basket.
///     pub struct Fruit: u8 {
///         Apple = 1 => { rename: "apple", labels: [0 => "red", 1 => "crisp"] },
///         Lemon = 2,
///         Melon = 4,
///         Banana = 8 => { labels: [0 => "yellow"] },
///     }
/// }
///
/// use enum_cache::FixedValue;
/// assert!(Fruit::IS_FLAGS);
/// assert_eq!(Fruit::members().len(), 4);
/// assert_eq!((Fruit::Apple | Fruit::Lemon | Fruit::Banana).0, 11);
/// ```
///
/// `#[flags]`, when present, must be the first attribute. It marks the type
/// as a bit-flag set and adds `|`, `&` and `contains`.
#[macro_export]
macro_rules! fixed_value {
    (
        #[flags]
        $(#[$outer:meta])*
        $vis:vis struct $Name:ident : $repr:ty { $($body:tt)* }
    ) => {
        $crate::fixed_value!(@define true; $(#[$outer])* $vis struct $Name : $repr { $($body)* });
        $crate::fixed_value!(@flags $Name);
    };
    (
        @define $flags:literal;
        $(#[$outer:meta])*
        $vis:vis struct $Name:ident : $repr:ty {
            $(
                $(#[$inner:meta])*
                $Member:ident = $value:expr
                $( => {
                    $( rename: $ser:literal $(,)? )?
                    $( labels: [ $( $idx:literal => $label:literal ),* $(,)? ] $(,)? )?
                } )?
            ),* $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[repr(transparent)]
        $vis struct $Name(pub $repr);

        #[allow(non_upper_case_globals)]
        impl $Name {
            $(
                $(#[$inner])*
                pub const $Member: Self = Self($value);
            )*
        }

        impl $crate::FixedValue for $Name {
            type Repr = $repr;
            const IS_FLAGS: bool = $flags;

            fn members() -> &'static [$crate::Member<Self>] {
                const MEMBERS: &[$crate::Member<$Name>] = &[
                    $(
                        $crate::Member {
                            name: ::core::stringify!($Member),
                            value: $Name::$Member,
                            serialized_name: $crate::__opt!($( $( $ser )? )?),
                            labels: &[ $( $( $( ($idx, $label), )* )? )? ],
                        },
                    )*
                ];
                MEMBERS
            }

            #[inline]
            fn from_repr(repr: $repr) -> Self {
                Self(repr)
            }

            #[inline]
            fn to_repr(self) -> $repr {
                self.0
            }

            fn type_name() -> &'static str {
                ::core::stringify!($Name)
            }
        }

        impl ::core::fmt::Debug for $Name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                let declared = <$Name as $crate::FixedValue>::members()
                    .iter()
                    .find(|m| m.value == *self);
                match declared {
                    Some(m) => ::core::write!(f, "{}::{}", ::core::stringify!($Name), m.name),
                    None => ::core::write!(f, "{}({:?})", ::core::stringify!($Name), self.0),
                }
            }
        }
    };
    (@flags $Name:ident) => {
        impl ::core::ops::BitOr for $Name {
            type Output = Self;
            #[inline]
            fn bitor(self, rhs: Self) -> Self {
                Self(self.0 | rhs.0)
            }
        }

        impl ::core::ops::BitAnd for $Name {
            type Output = Self;
            #[inline]
            fn bitand(self, rhs: Self) -> Self {
                Self(self.0 & rhs.0)
            }
        }

        impl $Name {
            /// All bits of `other` are set in `self`.
            #[inline]
            pub fn contains(self, other: Self) -> bool {
                self.0 & other.0 == other.0
            }
        }
    };
    (
        $(#[$outer:meta])*
        $vis:vis struct $Name:ident : $repr:ty { $($body:tt)* }
    ) => {
        $crate::fixed_value!(@define false; $(#[$outer])* $vis struct $Name : $repr { $($body)* });
    };
}
