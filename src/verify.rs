//! Endpoint eligibility checks.

use tracing::error;

use crate::descriptor::Endpoint;
use crate::error::{Error, Result};

/// Rejects types that cannot be scanned at all.
pub struct Verifier;

impl Verifier {
    /// Checks, in order: zero-argument constructor (concrete types only),
    /// public access, endpoint marker. The first failure aborts the scan.
    pub fn verify(endpoint: &Endpoint) -> Result<()> {
        let name = endpoint.name();
        if !endpoint.is_interface() && endpoint.zero_arg_constructor().is_none() {
            error!(endpoint = name, "concrete endpoint has no zero-argument constructor");
            return Err(Error::NoArgConstructor(name));
        }
        if !endpoint.is_public() {
            error!(endpoint = name, "endpoint is not public");
            return Err(Error::AccessProxy(name));
        }
        if !endpoint.is_marked() {
            error!(endpoint = name, "type is missing the endpoint marker");
            return Err(Error::EventSource(name));
        }
        Ok(())
    }
}
