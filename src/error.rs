//! Unified error type.

use thiserror::Error;

use crate::method::Method;

/// Result alias for trellis operations.
pub type Result<T> = std::result::Result<T, Error>;

/// The error type returned by trellis' fallible operations.
///
/// Every variant is a bootstrap-time failure. None of them are retried:
/// they describe an endpoint declaration that has to be fixed in code.
#[derive(Error, Debug)]
pub enum Error {
    /// A concrete endpoint type cannot be built without arguments.
    #[error("endpoint `{0}` has no zero-argument constructor")]
    NoArgConstructor(&'static str),

    /// The endpoint type is not publicly accessible.
    #[error("endpoint `{0}` is not public and cannot be proxied")]
    AccessProxy(&'static str),

    /// The type was handed to the extractor without the endpoint marker.
    #[error("type `{0}` is not marked as an endpoint")]
    EventSource(&'static str),

    /// An operation binds the request body to more than one parameter.
    #[error("operation `{endpoint}::{operation}` declares {count} codex parameters, at most one is allowed")]
    EventCodexMulti {
        endpoint: &'static str,
        operation: String,
        count: usize,
    },

    /// An interface was bound to a second, different implementation.
    #[error("interface `{interface}` is implemented by both `{existing}` and `{candidate}`")]
    AmbiguousImplementation {
        interface: &'static str,
        existing: &'static str,
        candidate: &'static str,
    },

    /// Two operations, of the same or of different endpoint types, declare
    /// the same route or templates differing only in parameter names.
    #[error("route {verb} {path} conflicts with {with}")]
    RouteConflict {
        verb: Method,
        path: String,
        with: String,
    },

    /// A scan worker panicked or was cancelled.
    #[error("scan worker failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

impl Error {
    /// Whether the error is a declaration mistake rather than a runtime failure.
    pub fn is_configuration(&self) -> bool {
        !matches!(self, Self::Join(_))
    }
}
