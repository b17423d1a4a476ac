//! Singleton instance registry.
//!
//! One registry is created at startup and shared by `Arc` with every
//! extractor. It hands out exactly one instance per concrete type and
//! records which implementation backs each interface.
//!
//! Interface bindings are explicit. Binding a second, different
//! implementation to the same interface is rejected immediately, so a scan
//! never has to decide between two candidates.

use std::any::Any;
use std::sync::Arc;

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use tracing::{debug, info};

use crate::descriptor::TypeKey;
use crate::error::{Error, Result};

/// A shared handler object.
pub type Instance = Arc<dyn Any + Send + Sync>;

/// Zero-argument constructor of a concrete endpoint type.
pub type Constructor = fn() -> Instance;

pub(crate) fn construct<T: Default + Send + Sync + 'static>() -> Instance {
    Arc::new(T::default())
}

/// The concrete type registered behind an interface.
#[derive(Clone, Copy, Debug)]
pub struct Implementation {
    key: TypeKey,
    constructor: Constructor,
}

impl Implementation {
    pub fn new(key: TypeKey, constructor: Constructor) -> Self {
        Self { key, constructor }
    }

    pub fn of<T: Default + Send + Sync + 'static>() -> Self {
        Self::new(TypeKey::of::<T>(), construct::<T>)
    }

    pub fn key(&self) -> TypeKey { self.key }
    pub fn constructor(&self) -> Constructor { self.constructor }
}

/// Get-or-create singleton store plus interface bindings.
#[derive(Default)]
pub struct InstanceRegistry {
    singletons: DashMap<TypeKey, Instance>,
    bindings: DashMap<TypeKey, Implementation>,
}

impl InstanceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the singleton for `key`, creating it with `constructor` on
    /// first use.
    ///
    /// Creation happens at most once per key even under concurrent callers:
    /// the map entry stays locked while `constructor` runs. A constructor
    /// must therefore not call back into the registry.
    pub fn get_or_create(&self, key: TypeKey, constructor: Constructor) -> Instance {
        if let Some(found) = self.singletons.get(&key) {
            return Arc::clone(found.value());
        }
        let entry = self.singletons.entry(key).or_insert_with(|| {
            debug!(ty = key.name(), "creating singleton");
            constructor()
        });
        Arc::clone(entry.value())
    }

    /// Binds `T` as the implementation of interface `I`.
    pub fn bind<I, T>(&self) -> Result<()>
    where
        I: ?Sized + 'static,
        T: Default + Send + Sync + 'static,
    {
        self.bind_with(TypeKey::of::<I>(), Implementation::of::<T>())
    }

    /// Binds `implementation` to `interface`. Re-binding the same type is a
    /// no-op; a different type is an ambiguity error.
    pub fn bind_with(&self, interface: TypeKey, implementation: Implementation) -> Result<()> {
        match self.bindings.entry(interface) {
            Entry::Occupied(existing) if existing.get().key == implementation.key => Ok(()),
            Entry::Occupied(existing) => Err(Error::AmbiguousImplementation {
                interface: interface.name(),
                existing: existing.get().key.name(),
                candidate: implementation.key.name(),
            }),
            Entry::Vacant(slot) => {
                info!(
                    interface = interface.name(),
                    implementation = implementation.key.name(),
                    "bound implementation"
                );
                slot.insert(implementation);
                Ok(())
            }
        }
    }

    /// The unique implementation bound to `interface`, if any.
    pub fn find_unique_implementation(&self, interface: &TypeKey) -> Option<Implementation> {
        self.bindings.get(interface).map(|found| *found.value())
    }

    /// Whether a singleton for `key` has been created.
    pub fn contains(&self, key: &TypeKey) -> bool {
        self.singletons.contains_key(key)
    }

    /// Number of live singletons.
    pub fn len(&self) -> usize {
        self.singletons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.singletons.is_empty()
    }

    /// Drops every singleton. Bindings survive so a rescan can recreate them.
    pub fn clear(&self) {
        info!(singletons = self.singletons.len(), "clearing instance registry");
        self.singletons.clear();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;

    use super::*;

    trait Api {}

    #[derive(Default)]
    struct First;

    #[derive(Default)]
    struct Second;

    static CREATED: AtomicUsize = AtomicUsize::new(0);

    struct Counted;

    fn counted() -> Instance {
        CREATED.fetch_add(1, Ordering::SeqCst);
        Arc::new(Counted)
    }

    #[test]
    fn creates_each_singleton_once_under_contention() {
        let registry = Arc::new(InstanceRegistry::new());
        let key = TypeKey::of::<Counted>();

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let registry = Arc::clone(&registry);
                thread::spawn(move || registry.get_or_create(key, counted))
            })
            .collect();
        let instances: Vec<Instance> = handles.into_iter().map(|h| h.join().unwrap()).collect();

        assert_eq!(CREATED.load(Ordering::SeqCst), 1);
        assert!(instances.windows(2).all(|w| Arc::ptr_eq(&w[0], &w[1])));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn rejects_a_second_implementation() {
        let registry = InstanceRegistry::new();
        registry.bind::<dyn Api, First>().unwrap();
        registry.bind::<dyn Api, First>().unwrap();

        let err = registry.bind::<dyn Api, Second>().unwrap_err();
        assert!(matches!(err, Error::AmbiguousImplementation { .. }));

        let found = registry.find_unique_implementation(&TypeKey::of::<dyn Api>()).unwrap();
        assert_eq!(found.key(), TypeKey::of::<First>());
    }

    #[test]
    fn clear_keeps_bindings() {
        let registry = InstanceRegistry::new();
        registry.bind::<dyn Api, First>().unwrap();
        registry.get_or_create(TypeKey::of::<First>(), construct::<First>);
        assert!(registry.contains(&TypeKey::of::<First>()));

        registry.clear();
        assert!(registry.is_empty());
        assert!(registry.find_unique_implementation(&TypeKey::of::<dyn Api>()).is_some());
    }
}
