//! Endpoint declarations.
//!
//! trellis does not reflect over types. An endpoint type is described once,
//! at startup, by chaining builder calls: the markers a framework would
//! normally read off annotations are stated explicitly.
//!
//! ```rust
//! use trellis::{Endpoint, Method, Operation, Param};
//!
//! #[derive(Default)]
//! struct UserApi;
//!
//! let endpoint = Endpoint::constructible::<UserApi>()
//!     .marked()
//!     .root("/users")
//!     .produces("application/json")
//!     .operation(Operation::new("get").verb(Method::Get).path("{id}"))
//!     .operation(
//!         Operation::new("create")
//!             .verb(Method::Post)
//!             .param(Param::new("body").codex()),
//!     );
//! ```

use std::any::{self, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::method::Method;
use crate::registry::{Constructor, construct};

// ── TypeKey ───────────────────────────────────────────────────────────────────

/// Identity of a Rust type (struct or `dyn Trait`), with its name kept for logs.
#[derive(Clone, Copy)]
pub struct TypeKey {
    id: TypeId,
    name: &'static str,
}

impl TypeKey {
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self { id: TypeId::of::<T>(), name: any::type_name::<T>() }
    }

    pub fn name(&self) -> &'static str { self.name }
}

impl PartialEq for TypeKey {
    fn eq(&self, other: &Self) -> bool { self.id == other.id }
}

impl Eq for TypeKey {}

impl Hash for TypeKey {
    fn hash<H: Hasher>(&self, state: &mut H) { self.id.hash(state) }
}

impl fmt::Debug for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

// ── Endpoint ──────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug)]
enum Kind {
    Concrete(Option<Constructor>),
    Interface,
}

/// Declaration of one endpoint type and the operations it exposes.
///
/// Types are public and unmarked by default. A type handed to the extractor
/// must carry the endpoint marker ([`Endpoint::marked`]) to produce routes.
#[derive(Clone, Debug)]
pub struct Endpoint {
    key: TypeKey,
    kind: Kind,
    public: bool,
    marked: bool,
    root: Option<String>,
    consumes: Vec<String>,
    produces: Vec<String>,
    operations: Vec<Arc<Operation>>,
}

impl Endpoint {
    fn with_kind(key: TypeKey, kind: Kind) -> Self {
        Self {
            key,
            kind,
            public: true,
            marked: false,
            root: None,
            consumes: Vec::new(),
            produces: Vec::new(),
            operations: Vec::new(),
        }
    }

    /// A concrete type with no zero-argument constructor until
    /// [`constructor`](Endpoint::constructor) supplies one.
    pub fn concrete<T: 'static>() -> Self {
        Self::with_kind(TypeKey::of::<T>(), Kind::Concrete(None))
    }

    /// A concrete type built through its [`Default`] impl.
    pub fn constructible<T: Default + Send + Sync + 'static>() -> Self {
        Self::with_kind(TypeKey::of::<T>(), Kind::Concrete(Some(construct::<T>)))
    }

    /// An interface, usually `dyn Trait`. Its handler is the implementation
    /// bound in the registry, or the bus-only placeholder when there is none.
    pub fn interface<I: ?Sized + 'static>() -> Self {
        Self::with_kind(TypeKey::of::<I>(), Kind::Interface)
    }

    /// Supplies the zero-argument constructor of a concrete type.
    /// Ignored for interfaces.
    pub fn constructor(mut self, constructor: Constructor) -> Self {
        if let Kind::Concrete(slot) = &mut self.kind {
            *slot = Some(constructor);
        }
        self
    }

    pub fn public(mut self) -> Self {
        self.public = true;
        self
    }

    pub fn private(mut self) -> Self {
        self.public = false;
        self
    }

    /// Attaches the endpoint marker.
    pub fn marked(mut self) -> Self {
        self.marked = true;
        self
    }

    /// Root path shared by every operation of the type.
    pub fn root(mut self, path: impl Into<String>) -> Self {
        self.root = Some(path.into());
        self
    }

    /// Type-level consumed media type. Repeatable.
    pub fn consumes(mut self, media: impl Into<String>) -> Self {
        self.consumes.push(media.into());
        self
    }

    /// Type-level produced media type. Repeatable.
    pub fn produces(mut self, media: impl Into<String>) -> Self {
        self.produces.push(media.into());
        self
    }

    pub fn operation(mut self, operation: Operation) -> Self {
        self.operations.push(Arc::new(operation));
        self
    }

    pub fn key(&self) -> TypeKey { self.key }
    pub fn name(&self) -> &'static str { self.key.name() }
    pub fn is_interface(&self) -> bool { matches!(self.kind, Kind::Interface) }
    pub fn is_public(&self) -> bool { self.public }
    pub fn is_marked(&self) -> bool { self.marked }
    pub fn root_path(&self) -> Option<&str> { self.root.as_deref() }
    pub fn consumed(&self) -> &[String] { &self.consumes }
    pub fn produced(&self) -> &[String] { &self.produces }
    pub fn operations(&self) -> &[Arc<Operation>] { &self.operations }

    /// The zero-argument constructor, if the type is concrete and has one.
    pub fn zero_arg_constructor(&self) -> Option<Constructor> {
        match self.kind {
            Kind::Concrete(constructor) => constructor,
            Kind::Interface => None,
        }
    }
}

// ── Operation ─────────────────────────────────────────────────────────────────

/// Declaration of one method on an endpoint type.
#[derive(Clone, Debug)]
pub struct Operation {
    name: String,
    verbs: Vec<Method>,
    path: Option<String>,
    consumes: Vec<String>,
    produces: Vec<String>,
    params: Vec<Param>,
    is_static: bool,
    synthetic: bool,
}

impl Operation {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            verbs: Vec::new(),
            path: None,
            consumes: Vec::new(),
            produces: Vec::new(),
            params: Vec::new(),
            is_static: false,
            synthetic: false,
        }
    }

    /// Adds a verb marker. Calling this twice makes the operation ambiguous
    /// and therefore not routable.
    pub fn verb(mut self, verb: Method) -> Self {
        self.verbs.push(verb);
        self
    }

    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn consumes(mut self, media: impl Into<String>) -> Self {
        self.consumes.push(media.into());
        self
    }

    pub fn produces(mut self, media: impl Into<String>) -> Self {
        self.produces.push(media.into());
        self
    }

    pub fn param(mut self, param: Param) -> Self {
        self.params.push(param);
        self
    }

    /// Marks the operation as an associated function without a receiver.
    pub fn associated(mut self) -> Self {
        self.is_static = true;
        self
    }

    /// Marks the operation as generated glue rather than user code.
    pub fn synthetic(mut self) -> Self {
        self.synthetic = true;
        self
    }

    pub fn name(&self) -> &str { &self.name }
    pub fn verbs(&self) -> &[Method] { &self.verbs }
    pub fn path_marker(&self) -> Option<&str> { self.path.as_deref() }
    pub fn consumed(&self) -> &[String] { &self.consumes }
    pub fn produced(&self) -> &[String] { &self.produces }
    pub fn params(&self) -> &[Param] { &self.params }
    pub fn is_static(&self) -> bool { self.is_static }
    pub fn is_synthetic(&self) -> bool { self.synthetic }
}

// ── Param ─────────────────────────────────────────────────────────────────────

/// A method parameter. Only the codex (request body) marker matters here.
#[derive(Clone, Debug)]
pub struct Param {
    name: String,
    codex: bool,
}

impl Param {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), codex: false }
    }

    /// Binds the request body to this parameter.
    pub fn codex(mut self) -> Self {
        self.codex = true;
        self
    }

    pub fn name(&self) -> &str { &self.name }
    pub fn is_codex(&self) -> bool { self.codex }
}

#[cfg(test)]
mod tests {
    use super::*;

    trait Api {}

    #[derive(Default)]
    struct Impl;

    #[test]
    fn type_keys_compare_by_type() {
        assert_eq!(TypeKey::of::<Impl>(), TypeKey::of::<Impl>());
        assert_ne!(TypeKey::of::<Impl>(), TypeKey::of::<dyn Api>());
        assert!(TypeKey::of::<dyn Api>().name().contains("Api"));
    }

    #[test]
    fn constructor_only_applies_to_concrete_types() {
        assert!(Endpoint::concrete::<Impl>().zero_arg_constructor().is_none());
        assert!(Endpoint::constructible::<Impl>().zero_arg_constructor().is_some());
        assert!(
            Endpoint::interface::<dyn Api>()
                .constructor(construct::<Impl>)
                .zero_arg_constructor()
                .is_none()
        );
    }
}
