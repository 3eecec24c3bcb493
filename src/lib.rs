//! enum-cache: build-once hash maps and per-type metadata caches for open,
//! fixed-value label types.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: name/value translation for fixed-value types with lookups that
//!   never allocate and never lock once a cache is published.
//! - Layers:
//!   - hashing: unseeded ordinal hashes over UTF-16 code units, with a
//!     case-folding variant.
//!   - ImmutableMap<K, V, E>: chained hash map built once from a finite
//!     sequence; duplicate keys abort the build. `E: KeyEquality<K>` supplies
//!     the 32-bit hash and equality.
//!   - IgnoreCaseMap<V>: ImmutableMap over `Box<str>` keys with ordinal
//!     ignore-case equality and `&str` lookups.
//!   - MetadataCache<T>: per-type tables (exact names, ignore-case names,
//!     value -> name/serialized name/labels) built from `T::members()`.
//!   - Registry: binds each type to one `Arc<dyn FixedValueInfo<T>>`, either
//!     a custom override or a lazily built MetadataCache.
//!
//! Constraints
//! - Maps keep a power-of-two bucket array of at least 8 and a load factor
//!   of at most 3/4; growth happens only during construction.
//! - Entries store their hash; rehashing never calls back into key code.
//! - Parsing resolves names before numeric literals. A numeric literal of
//!   the storage width is accepted even when no member declares it.
//! - Fixed-value types are open newtypes: every bit pattern of the storage
//!   primitive is a valid instance.
//!
//! Concurrency
//! - Construction takes ownership or `&mut`, so it is serialized by the
//!   borrow checker. Built maps and caches are `Send + Sync` and are read
//!   concurrently without synchronization.
//! - The global registry takes a shared lock to find a binding and an
//!   exclusive lock to create one, so a type is built at most once.
//!
//! Notes and non-goals
//! - No removal, mutation or resizing after construction.
//! - A binding cannot be uninstalled or replaced.

mod config;
pub mod declaration;
pub mod equality;
mod error;
pub mod hashing;
mod ignore_case_map;
pub mod immutable_map;
mod immutable_map_proptest;
pub mod metadata;
mod registry;
pub mod storage;

// Public surface
pub use config::CacheConfig;
pub use declaration::{FixedValue, Member};
pub use equality::{DefaultEquality, KeyEquality, Ordinal, OrdinalIgnoreCase};
pub use error::{Error, Result};
pub use ignore_case_map::IgnoreCaseMap;
pub use immutable_map::ImmutableMap;
pub use metadata::{FixedValueInfo, MetadataCache};
pub use registry::{FixedValueExt, Registry};
pub use storage::{StorageKind, StorageRepr, StorageValue};
