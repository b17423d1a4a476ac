//! Route extraction for one endpoint type.

use std::collections::HashSet;
use std::sync::Arc;

use rayon::prelude::*;
use tracing::{error, info, info_span, warn};

use crate::config::ExtractorConfig;
use crate::descriptor::{Endpoint, Operation};
use crate::error::{Error, Result};
use crate::event::{Action, Event};
use crate::handler::HandlerBinder;
use crate::media::MediaResolver;
use crate::path::PathResolver;
use crate::registry::InstanceRegistry;
use crate::verb::MethodResolver;
use crate::verify::Verifier;

/// Scans endpoint declarations into route sets.
///
/// An extractor is cheap to share: it holds the registry by `Arc` and its
/// configuration. Scanning never mutates the declaration, so the same
/// endpoint can be rescanned at will and yields the same singletons.
pub struct EventExtractor {
    registry: Arc<InstanceRegistry>,
    config: ExtractorConfig,
}

impl EventExtractor {
    pub fn new(registry: Arc<InstanceRegistry>) -> Self {
        Self { registry, config: ExtractorConfig::default() }
    }

    pub fn with_config(mut self, config: ExtractorConfig) -> Self {
        self.config = config;
        self
    }

    pub fn registry(&self) -> &Arc<InstanceRegistry> { &self.registry }
    pub fn config(&self) -> &ExtractorConfig { &self.config }

    /// Extracts every route `endpoint` declares.
    ///
    /// Either the complete set is returned or the first fatal error; a
    /// partially scanned type is never observable. Operations without a
    /// single verb marker are skipped silently. Two routes with the same
    /// identity collapse into the first one declared.
    pub fn extract(&self, endpoint: &Endpoint) -> Result<HashSet<Event>> {
        let span = info_span!("extract", endpoint = endpoint.name());
        let _guard = span.enter();

        Verifier::verify(endpoint)?;
        // A blank root is no root: its operations fall back to bus-only.
        let root = endpoint
            .root_path()
            .filter(|r| !r.trim().is_empty())
            .map(PathResolver::resolve_root);
        check_codex(endpoint)?;

        let routable: Vec<&Arc<Operation>> = endpoint
            .operations()
            .iter()
            .filter(|op| MethodResolver::is_valid(op))
            .collect();

        // Both branches keep declaration order so "first declared wins" holds.
        let built = if routable.len() >= self.config.parallel_threshold {
            routable
                .par_iter()
                .map(|op| self.event(endpoint, op, root.as_deref()))
                .collect::<Result<Vec<_>>>()?
        } else {
            routable
                .iter()
                .map(|op| self.event(endpoint, op, root.as_deref()))
                .collect::<Result<Vec<_>>>()?
        };

        let mut events: HashSet<Event> = HashSet::with_capacity(built.len());
        for event in built.into_iter().flatten() {
            if let Some(kept) = events.get(&event) {
                warn!(
                    route = %event,
                    kept = ?kept.action(),
                    "duplicate route collapsed"
                );
                continue;
            }
            events.insert(event);
        }

        info!(routes = events.len(), "endpoint scanned");
        Ok(events)
    }

    fn event(
        &self,
        endpoint: &Endpoint,
        operation: &Arc<Operation>,
        root: Option<&str>,
    ) -> Result<Option<Event>> {
        let Some(verb) = MethodResolver::resolve(operation) else {
            return Ok(None);
        };
        let path = PathResolver::resolve_method(operation.path_marker(), root);
        let consumes = MediaResolver::consumes(operation, endpoint, &self.config);
        let produces = MediaResolver::produces(operation, endpoint, &self.config);
        let handler = HandlerBinder::bind(endpoint, &self.registry)?;
        let action = Action::new(endpoint.key(), Arc::clone(operation));
        Ok(Some(Event::new(verb, path, consumes, produces, action, handler)))
    }
}

/// At most one parameter per operation may bind the request body.
///
/// Applies to every declared operation, routable or not. Keeping each
/// operation at one codex parameter also keeps the type's total at or
/// below its operation count.
fn check_codex(endpoint: &Endpoint) -> Result<()> {
    for op in endpoint.operations() {
        let count = op.params().iter().filter(|p| p.is_codex()).count();
        if count > 1 {
            error!(operation = op.name(), count, "more than one codex parameter");
            return Err(Error::EventCodexMulti {
                endpoint: endpoint.name(),
                operation: op.name().to_owned(),
                count,
            });
        }
    }
    Ok(())
}
