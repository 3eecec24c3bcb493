//! Metadata caches for fixed-value types.
//!
//! [`FixedValueInfo`] is the query contract; [`MetadataCache`] is the default
//! implementation built from a type's declaration. A cache is immutable once
//! built and can be shared across threads without locking.
//!
//! Parsing always tries names first (exact or ignore-case, as requested) and
//! only then a numeric literal of the declared storage kind. A numeric literal
//! yields a value even when no member declares it.

use crate::config::CacheConfig;
use crate::declaration::{FixedValue, Member};
use crate::equality::Ordinal;
use crate::error::{Error, Result};
use crate::hashing::{eq_ordinal_ignore_case, fold_case};
use crate::ignore_case_map::IgnoreCaseMap;
use crate::immutable_map::ImmutableMap;
use crate::storage::{StorageKind, StorageValue};
use core::fmt;
use hashbrown::HashSet;
use tracing::{debug, warn};

/// Query contract of a per-type metadata cache.
///
/// Custom implementations can be installed in a
/// [`Registry`](crate::Registry) in place of the default [`MetadataCache`].
pub trait FixedValueInfo<T: FixedValue>: Send + Sync {
    /// Name lookup, then numeric fallback. `None` when both fail.
    fn try_parse(&self, name: &str, ignore_case: bool) -> Option<T>;

    fn parse(&self, name: &str, ignore_case: bool) -> Result<T> {
        self.try_parse(name, ignore_case).ok_or_else(|| Error::Parse {
            input: name.to_owned(),
            type_name: T::type_name(),
        })
    }

    /// Declared name of `value`; `None` for undeclared values.
    fn name(&self, value: T) -> Option<&'static str>;

    /// Declared names in declaration order.
    fn names(&self) -> &[&'static str];

    /// Declared values in declaration order, parallel to [`names`](Self::names).
    fn values(&self) -> &[T];

    /// Exact (case-sensitive) name membership.
    fn is_defined(&self, name: &str) -> bool;

    fn is_defined_value(&self, value: T) -> bool {
        self.name(value).is_some()
    }

    fn serialized_name(&self, value: T) -> Option<&'static str>;

    fn labels(&self, value: T) -> Option<&ImmutableMap<i32, &'static str>>;

    fn label(&self, value: T, index: i32) -> Option<&'static str> {
        self.labels(value)?.get(&index).copied()
    }

    fn is_flags(&self) -> bool;

    fn is_empty(&self) -> bool {
        self.values().is_empty()
    }

    fn storage_kind(&self) -> StorageKind;

    /// Checked conversion of any supported primitive into `T`.
    fn to_value(&self, primitive: StorageValue) -> Result<T> {
        T::from_storage(primitive.convert(self.storage_kind())?)
    }

    /// Case-sensitive [`parse`](Self::parse).
    fn to_value_from_str(&self, s: &str) -> Result<T> {
        self.parse(s, false)
    }
}

struct ValueInfo {
    name: &'static str,
    serialized_name: Option<&'static str>,
    labels: ImmutableMap<i32, &'static str>,
}

/// Default [`FixedValueInfo`] built from a declaration.
pub struct MetadataCache<T: FixedValue> {
    names: Box<[&'static str]>,
    values: Box<[T]>,
    by_value: ImmutableMap<T, ValueInfo>,
    by_name: ImmutableMap<&'static str, T, Ordinal>,
    by_name_ignore_case: Option<IgnoreCaseMap<T>>,
    is_flags: bool,
    storage_kind: StorageKind,
}

fn label_map(labels: &'static [(i32, &'static str)]) -> Result<ImmutableMap<i32, &'static str>> {
    let mut seen = HashSet::with_capacity(labels.len());
    ImmutableMap::try_from_iter(labels.iter().copied().filter(|(index, _)| seen.insert(*index)))
}

impl<T: FixedValue> MetadataCache<T> {
    pub fn new() -> Result<Self> {
        Self::with_config(&CacheConfig::default())
    }

    pub fn with_config(config: &CacheConfig) -> Result<Self> {
        Self::from_members(T::members().iter().copied(), T::IS_FLAGS, config)
    }

    /// Build from members supplied directly instead of `T::members()`.
    pub fn from_members<I>(members: I, is_flags: bool, config: &CacheConfig) -> Result<Self>
    where
        I: IntoIterator<Item = Member<T>>,
    {
        let members: Vec<Member<T>> = members.into_iter().collect();
        let type_name = T::type_name();

        let by_name =
            ImmutableMap::try_from_iter_with(members.iter().map(|m| (m.name, m.value)), Ordinal)
                .map_err(|e| match e {
                    Error::DuplicateKey { index } => Error::DuplicateName {
                        type_name,
                        name: members[index].name,
                    },
                    other => other,
                })?;

        // Aliases share a value; the first declared name owns it.
        let mut seen_values = HashSet::with_capacity(members.len());
        let mut by_value_entries = Vec::with_capacity(members.len());
        for m in &members {
            if !seen_values.insert(m.value) {
                debug!(type_name, alias = m.name, "value alias left out of the value table");
                continue;
            }
            let info = ValueInfo {
                name: m.name,
                serialized_name: m.serialized_name,
                labels: label_map(m.labels)?,
            };
            by_value_entries.push((m.value, info));
        }
        let by_value = ImmutableMap::try_from_iter(by_value_entries)?;

        let by_name_ignore_case = if config.ignore_case_index {
            let mut seen_folded = HashSet::with_capacity(members.len());
            let mut entries = Vec::with_capacity(members.len());
            for m in &members {
                let folded: String = m.name.chars().map(fold_case).collect();
                if seen_folded.insert(folded) {
                    entries.push((m.name, m.value));
                } else {
                    warn!(
                        type_name,
                        name = m.name,
                        "name differs from an earlier member only by case; ignore-case lookups resolve to the earlier one"
                    );
                }
            }
            Some(IgnoreCaseMap::try_from_iter(entries)?)
        } else {
            None
        };

        let storage_kind = T::storage_kind();
        debug!(
            type_name,
            members = members.len(),
            flags = is_flags,
            storage = %storage_kind,
            ignore_case_index = config.ignore_case_index,
            "built metadata cache"
        );

        Ok(Self {
            names: members.iter().map(|m| m.name).collect(),
            values: members.iter().map(|m| m.value).collect(),
            by_value,
            by_name,
            by_name_ignore_case,
            is_flags,
            storage_kind,
        })
    }

    fn find_ignore_case(&self, name: &str) -> Option<T> {
        match &self.by_name_ignore_case {
            Some(index) => index.get(name).copied(),
            None => self
                .names
                .iter()
                .position(|n| eq_ordinal_ignore_case(n, name))
                .map(|i| self.values[i]),
        }
    }

    fn parse_numeric(&self, name: &str) -> Option<T> {
        let literal = self.storage_kind.parse_literal(name)?;
        T::from_storage(literal).ok()
    }
}

impl<T: FixedValue> FixedValueInfo<T> for MetadataCache<T> {
    fn try_parse(&self, name: &str, ignore_case: bool) -> Option<T> {
        let named = if ignore_case {
            self.find_ignore_case(name)
        } else {
            self.by_name.get(name).copied()
        };
        named.or_else(|| self.parse_numeric(name))
    }

    #[inline]
    fn name(&self, value: T) -> Option<&'static str> {
        self.by_value.get(&value).map(|v| v.name)
    }

    fn names(&self) -> &[&'static str] {
        &self.names
    }

    fn values(&self) -> &[T] {
        &self.values
    }

    fn is_defined(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    fn serialized_name(&self, value: T) -> Option<&'static str> {
        self.by_value.get(&value)?.serialized_name
    }

    fn labels(&self, value: T) -> Option<&ImmutableMap<i32, &'static str>> {
        self.by_value.get(&value).map(|v| &v.labels)
    }

    fn is_flags(&self) -> bool {
        self.is_flags
    }

    fn storage_kind(&self) -> StorageKind {
        self.storage_kind
    }
}

impl<T: FixedValue> fmt::Debug for MetadataCache<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MetadataCache")
            .field("type", &T::type_name())
            .field("names", &self.names)
            .field("is_flags", &self.is_flags)
            .field("storage_kind", &self.storage_kind)
            .finish()
    }
}
