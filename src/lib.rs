//! # trellis
//!
//! Route discovery for endpoint types. Describe a type once, get back every
//! HTTP route it exposes.
//!
//! ## The contract
//!
//! trellis turns declarations into an immutable route set at startup. It
//! does not listen on sockets, match URLs or write responses: the
//! dispatcher that consumes the route set does that.
//!
//! For each endpoint type trellis:
//!
//! - **verifies** the type can be scanned at all (constructor, access, marker)
//! - **composes** each operation's path with the type's root path
//! - **resolves** the verb and the consumed/produced media types
//! - **binds** a handler: the type's singleton, the singleton of an
//!   interface's implementation, or the bus-only placeholder
//!
//! ## Quick start
//!
//! ```rust
//! use std::sync::Arc;
//! use trellis::{Endpoint, EventExtractor, InstanceRegistry, Method, Operation};
//!
//! #[derive(Default)]
//! struct UserApi;
//!
//! let registry = Arc::new(InstanceRegistry::new());
//! let extractor = EventExtractor::new(registry);
//!
//! let users = Endpoint::constructible::<UserApi>()
//!     .marked()
//!     .root("/users")
//!     .operation(Operation::new("get").verb(Method::Get).path("{id}"))
//!     .operation(Operation::new("create").verb(Method::Post));
//!
//! let routes = extractor.extract(&users).unwrap();
//! assert_eq!(routes.len(), 2);
//! assert!(routes.iter().any(|r| r.path() == Some("/users/{id}")));
//! ```

mod config;
mod descriptor;
mod envelope;
mod error;
mod event;
mod extract;
mod handler;
mod media;
mod method;
mod path;
mod registry;
mod table;
mod verb;
mod verify;

pub use config::{ANY_MEDIA, ExtractorConfig};
pub use descriptor::{Endpoint, Operation, Param, TypeKey};
pub use envelope::{Envelope, WebError};
pub use error::{Error, Result};
pub use event::{Action, Event};
pub use extract::EventExtractor;
pub use handler::{Handler, HandlerBinder};
pub use media::MediaResolver;
pub use method::Method;
pub use path::PathResolver;
pub use registry::{Constructor, Implementation, Instance, InstanceRegistry};
pub use table::{RouteTable, RouteTableBuilder};
pub use verb::MethodResolver;
pub use verify::Verifier;
