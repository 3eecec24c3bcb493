//! Registry: binds each fixed-value type to one metadata cache.
//!
//! A binding is made either explicitly with [`Registry::install`] or lazily
//! by the first [`Registry::info`] call, which builds the default
//! [`MetadataCache`]. Once made, a binding is never replaced.
//!
//! Bound caches are handed out as `Arc<dyn FixedValueInfo<T>>` and are read
//! without synchronization. A process-wide registry is available through
//! [`Registry::global`] and the [`FixedValueExt`] shorthands.

use crate::config::CacheConfig;
use crate::declaration::FixedValue;
use crate::error::{Error, Result};
use crate::metadata::{FixedValueInfo, MetadataCache};
use crate::storage::StorageValue;
use core::any::{Any, TypeId};
use hashbrown::HashMap;
use parking_lot::RwLock;
use std::sync::{Arc, OnceLock};
use tracing::debug;

type Binding = Box<dyn Any + Send + Sync>;

#[derive(Default)]
pub struct Registry {
    config: CacheConfig,
    bindings: HashMap<TypeId, Binding>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry whose lazily built caches use `config`.
    pub fn with_config(config: CacheConfig) -> Self {
        Self {
            config,
            bindings: HashMap::new(),
        }
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Number of bound types.
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn is_bound<T: FixedValue>(&self) -> bool {
        self.bindings.contains_key(&TypeId::of::<T>())
    }

    /// Bind a custom implementation for `T`. Fails if `T` is already bound.
    pub fn install<T: FixedValue>(&mut self, info: Arc<dyn FixedValueInfo<T>>) -> Result<()> {
        let id = TypeId::of::<T>();
        if self.bindings.contains_key(&id) {
            return Err(Error::AlreadyBound {
                type_name: T::type_name(),
            });
        }
        debug!(type_name = T::type_name(), "installed metadata override");
        self.bindings.insert(id, Box::new(info));
        Ok(())
    }

    /// The bound cache for `T`, if any.
    pub fn get<T: FixedValue>(&self) -> Option<Arc<dyn FixedValueInfo<T>>> {
        self.bindings
            .get(&TypeId::of::<T>())?
            .downcast_ref::<Arc<dyn FixedValueInfo<T>>>()
            .cloned()
    }

    /// The bound cache for `T`, building and binding the default one first
    /// if needed. A failed build leaves `T` unbound.
    pub fn info<T: FixedValue>(&mut self) -> Result<Arc<dyn FixedValueInfo<T>>> {
        if let Some(info) = self.get::<T>() {
            return Ok(info);
        }
        let info: Arc<dyn FixedValueInfo<T>> = Arc::new(MetadataCache::<T>::with_config(&self.config)?);
        self.bindings
            .insert(TypeId::of::<T>(), Box::new(Arc::clone(&info)));
        Ok(info)
    }

    /// Process-wide registry.
    pub fn global() -> &'static RwLock<Registry> {
        static GLOBAL: OnceLock<RwLock<Registry>> = OnceLock::new();
        GLOBAL.get_or_init(|| RwLock::new(Registry::new()))
    }

    /// [`info`](Self::info) against the global registry. Readers of an
    /// already bound type only take the shared lock.
    pub fn global_info<T: FixedValue>() -> Result<Arc<dyn FixedValueInfo<T>>> {
        let global = Self::global();
        if let Some(info) = global.read().get::<T>() {
            return Ok(info);
        }
        global.write().info::<T>()
    }

    /// [`install`](Self::install) against the global registry.
    pub fn install_global<T: FixedValue>(info: Arc<dyn FixedValueInfo<T>>) -> Result<()> {
        Self::global().write().install(info)
    }
}

/// Shorthands on fixed-value types, routed through [`Registry::global`].
pub trait FixedValueExt: FixedValue {
    fn info() -> Result<Arc<dyn FixedValueInfo<Self>>> {
        Registry::global_info::<Self>()
    }

    fn parse(name: &str) -> Result<Self> {
        Self::info()?.parse(name, false)
    }

    fn parse_ignore_case(name: &str) -> Result<Self> {
        Self::info()?.parse(name, true)
    }

    fn try_parse(name: &str, ignore_case: bool) -> Option<Self> {
        Self::info().ok()?.try_parse(name, ignore_case)
    }

    fn is_flags() -> Result<bool> {
        Ok(Self::info()?.is_flags())
    }

    fn from_primitive<P: Into<StorageValue>>(primitive: P) -> Result<Self> {
        Self::info()?.to_value(primitive.into())
    }

    fn name(self) -> Option<&'static str> {
        Self::info().ok()?.name(self)
    }

    fn is_defined_value(self) -> bool {
        Self::info().is_ok_and(|info| info.is_defined_value(self))
    }

    fn label(self, index: i32) -> Option<&'static str> {
        Self::info().ok()?.label(self, index)
    }
}

impl<T: FixedValue> FixedValueExt for T {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::immutable_map::ImmutableMap;
    use crate::storage::StorageKind;

    crate::fixed_value! {
        pub struct Color: u32 {
            Red = 1,
            Green = 2,
        }
    }

    struct Fixed;

    impl FixedValueInfo<Color> for Fixed {
        fn try_parse(&self, _name: &str, _ignore_case: bool) -> Option<Color> {
            Some(Color::Green)
        }
        fn name(&self, _value: Color) -> Option<&'static str> {
            Some("always")
        }
        fn names(&self) -> &[&'static str] {
            &["always"]
        }
        fn values(&self) -> &[Color] {
            &[Color::Green]
        }
        fn is_defined(&self, _name: &str) -> bool {
            true
        }
        fn serialized_name(&self, _value: Color) -> Option<&'static str> {
            None
        }
        fn labels(&self, _value: Color) -> Option<&ImmutableMap<i32, &'static str>> {
            None
        }
        fn is_flags(&self) -> bool {
            false
        }
        fn storage_kind(&self) -> StorageKind {
            StorageKind::U32
        }
    }

    /// Invariant: lazy binding builds once; later calls return the same cache.
    #[test]
    fn lazy_binding_is_stable() {
        let mut r = Registry::new();
        assert!(!r.is_bound::<Color>());
        assert!(r.get::<Color>().is_none());
        let a = r.info::<Color>().unwrap();
        let b = r.info::<Color>().unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert!(r.is_bound::<Color>());
        assert_eq!(r.len(), 1);
        assert_eq!(a.parse("Red", false), Ok(Color::Red));
    }

    /// Invariant: an installed override is used and cannot be replaced.
    #[test]
    fn override_before_first_use() {
        let mut r = Registry::new();
        r.install::<Color>(Arc::new(Fixed)).unwrap();
        let info = r.info::<Color>().unwrap();
        assert_eq!(info.parse("Red", false), Ok(Color::Green));
        assert_eq!(info.name(Color::Red), Some("always"));
        assert_eq!(
            r.install::<Color>(Arc::new(Fixed)),
            Err(Error::AlreadyBound { type_name: "Color" })
        );
    }

    /// Invariant: installing after a lazy default binding fails.
    #[test]
    fn install_after_use_rejected() {
        let mut r = Registry::new();
        let _ = r.info::<Color>().unwrap();
        assert!(matches!(
            r.install::<Color>(Arc::new(Fixed)),
            Err(Error::AlreadyBound { .. })
        ));
        assert_eq!(r.info::<Color>().unwrap().name(Color::Red), Some("Red"));
    }

    #[test]
    fn registries_are_independent() {
        let mut a = Registry::new();
        let mut b = Registry::new();
        a.install::<Color>(Arc::new(Fixed)).unwrap();
        assert_eq!(b.info::<Color>().unwrap().name(Color::Red), Some("Red"));
        assert_eq!(a.info::<Color>().unwrap().name(Color::Red), Some("always"));
    }

    #[test]
    fn config_reaches_lazy_builds() {
        let mut r = Registry::with_config(CacheConfig::new().ignore_case_index(false));
        assert!(!r.config().ignore_case_index);
        assert_eq!(r.info::<Color>().unwrap().parse("gREEN", true), Ok(Color::Green));
    }
}
