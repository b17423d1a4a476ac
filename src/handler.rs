//! Handler references and their binding.
//!
//! # How handler objects are stored
//!
//! A route table holds handlers of many unrelated endpoint types, so every
//! singleton is kept type-erased as `Arc<dyn Any + Send + Sync>`. The
//! dispatcher recovers the concrete type with [`Handler::downcast`].
//!
//! ```text
//! Endpoint::constructible::<UserApi>()      ← declaration
//!        ↓ extract()
//! registry.get_or_create(UserApi, ctor)     ← created once, shared forever
//!        ↓
//! Handler::Singleton(Arc<dyn Any>)          ← stored on every route of UserApi
//!        ↓ at dispatch time
//! handler.downcast::<UserApi>()             ← one TypeId comparison
//! ```
//!
//! An interface without a bound implementation gets [`Handler::Virtual`]:
//! there is nothing to invoke locally and the dispatcher forwards the
//! request to the message bus instead.

use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::descriptor::Endpoint;
use crate::error::{Error, Result};
use crate::registry::{Instance, InstanceRegistry};

/// What a route invokes.
#[derive(Clone)]
pub enum Handler {
    /// The singleton of the declaring type (or of the interface's implementation).
    Singleton(Instance),
    /// No local invocation. Forward to the bus.
    Virtual,
}

impl Handler {
    pub fn is_virtual(&self) -> bool {
        matches!(self, Self::Virtual)
    }

    pub fn instance(&self) -> Option<&Instance> {
        match self {
            Self::Singleton(instance) => Some(instance),
            Self::Virtual => None,
        }
    }

    /// The singleton as its concrete type, if it is one.
    pub fn downcast<T: Send + Sync + 'static>(&self) -> Option<Arc<T>> {
        self.instance()
            .and_then(|instance| Arc::clone(instance).downcast::<T>().ok())
    }
}

/// Identity, not value, equality: two singletons are equal only when they
/// are the same allocation.
impl PartialEq for Handler {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Singleton(a), Self::Singleton(b)) => {
                std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
            }
            (Self::Virtual, Self::Virtual) => true,
            _ => false,
        }
    }
}

impl Eq for Handler {}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Singleton(instance) => write!(f, "Singleton({:p})", Arc::as_ptr(instance)),
            Self::Virtual => f.write_str("Virtual"),
        }
    }
}

/// Resolves the handler of an endpoint's routes.
pub struct HandlerBinder;

impl HandlerBinder {
    /// Concrete types get their own singleton. Interfaces get the singleton
    /// of their bound implementation, or [`Handler::Virtual`] when none is
    /// bound.
    pub fn bind(endpoint: &Endpoint, registry: &InstanceRegistry) -> Result<Handler> {
        let key = endpoint.key();
        if !endpoint.is_interface() {
            let constructor = endpoint
                .zero_arg_constructor()
                .ok_or(Error::NoArgConstructor(key.name()))?;
            return Ok(Handler::Singleton(registry.get_or_create(key, constructor)));
        }
        match registry.find_unique_implementation(&key) {
            Some(implementation) => Ok(Handler::Singleton(
                registry.get_or_create(implementation.key(), implementation.constructor()),
            )),
            None => {
                debug!(interface = key.name(), "no implementation bound, routes are bus-only");
                Ok(Handler::Virtual)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    trait Api {}

    #[derive(Default)]
    struct Impl;

    #[test]
    fn concrete_types_share_one_singleton() {
        let registry = InstanceRegistry::new();
        let endpoint = Endpoint::constructible::<Impl>();

        let a = HandlerBinder::bind(&endpoint, &registry).unwrap();
        let b = HandlerBinder::bind(&endpoint, &registry).unwrap();
        assert_eq!(a, b);
        assert!(a.downcast::<Impl>().is_some());
    }

    #[test]
    fn unbound_interfaces_get_the_placeholder() {
        let registry = InstanceRegistry::new();
        let handler = HandlerBinder::bind(&Endpoint::interface::<dyn Api>(), &registry).unwrap();

        assert!(handler.is_virtual());
        assert!(handler.instance().is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn bound_interfaces_use_the_implementation_singleton() {
        let registry = InstanceRegistry::new();
        registry.bind::<dyn Api, Impl>().unwrap();

        let via_interface = HandlerBinder::bind(&Endpoint::interface::<dyn Api>(), &registry).unwrap();
        let direct = HandlerBinder::bind(&Endpoint::constructible::<Impl>(), &registry).unwrap();
        assert_eq!(via_interface, direct);
        assert_ne!(via_interface, Handler::Virtual);
    }

    #[test]
    fn equal_values_are_not_equal_handlers() {
        let a = Handler::Singleton(Arc::new(Impl));
        let b = Handler::Singleton(Arc::new(Impl));
        assert_ne!(a, b);
    }
}
