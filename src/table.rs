//! Bootstrap route table.
//!
//! Collects the routes of every endpoint type an application declares. One
//! radix tree per verb is built while merging, purely to reject routes two
//! types would both answer: identical templates, or templates that differ
//! only in parameter names. Matching requests against the table is the
//! dispatcher's job, not this module's.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use matchit::{InsertError, Router as MatchitRouter};
use tokio::task::JoinSet;
use tracing::{info, warn};

use crate::config::ExtractorConfig;
use crate::descriptor::Endpoint;
use crate::error::{Error, Result};
use crate::event::Event;
use crate::extract::EventExtractor;
use crate::method::Method;
use crate::registry::InstanceRegistry;

/// The merged, immutable route set of an application.
///
/// Built once at startup through [`RouteTable::builder`]. A rescan builds a
/// fresh table; an existing one is never patched.
#[derive(Debug)]
pub struct RouteTable {
    events: Vec<Event>,
}

impl RouteTable {
    pub fn builder(registry: Arc<InstanceRegistry>) -> RouteTableBuilder {
        RouteTableBuilder {
            registry,
            config: ExtractorConfig::default(),
            endpoints: Vec::new(),
        }
    }

    pub fn len(&self) -> usize { self.events.len() }
    pub fn is_empty(&self) -> bool { self.events.is_empty() }

    /// Routes in endpoint registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Event> {
        self.events.iter()
    }

    pub fn routes_for(&self, verb: Method) -> impl Iterator<Item = &Event> {
        self.events.iter().filter(move |e| e.verb() == verb)
    }

    /// Routes with no HTTP path, reachable through the bus only.
    pub fn bus_only(&self) -> impl Iterator<Item = &Event> {
        self.events.iter().filter(|e| e.is_bus_only())
    }
}

impl<'a> IntoIterator for &'a RouteTable {
    type Item = &'a Event;
    type IntoIter = std::slice::Iter<'a, Event>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.iter()
    }
}

/// Accumulates endpoint declarations. Each [`endpoint`](Self::endpoint) call
/// returns `self` so registrations chain naturally.
pub struct RouteTableBuilder {
    registry: Arc<InstanceRegistry>,
    config: ExtractorConfig,
    endpoints: Vec<Endpoint>,
}

impl RouteTableBuilder {
    pub fn config(mut self, config: ExtractorConfig) -> Self {
        self.config = config;
        self
    }

    pub fn endpoint(mut self, endpoint: Endpoint) -> Self {
        self.endpoints.push(endpoint);
        self
    }

    /// Scans every endpoint on the calling thread.
    pub fn build(self) -> Result<RouteTable> {
        let extractor = EventExtractor::new(self.registry).with_config(self.config);
        let mut merger = Merger::default();
        for endpoint in &self.endpoints {
            merger.merge(extractor.extract(endpoint)?)?;
        }
        Ok(merger.finish())
    }

    /// Scans every endpoint on tokio's blocking pool, one task per type.
    ///
    /// Scans are CPU-bound and independent; the only shared state is the
    /// registry. Results are merged in registration order once all tasks
    /// have finished, so conflicts are reported deterministically.
    pub async fn scan(self) -> Result<RouteTable> {
        let extractor = Arc::new(EventExtractor::new(self.registry).with_config(self.config));

        // JoinSet tracks every scan task; dropping it on an early error
        // return cancels whatever has not started yet.
        let mut tasks = JoinSet::new();
        for (index, endpoint) in self.endpoints.into_iter().enumerate() {
            let extractor = Arc::clone(&extractor);
            tasks.spawn_blocking(move || (index, extractor.extract(&endpoint)));
        }

        let mut scanned = Vec::with_capacity(tasks.len());
        while let Some(joined) = tasks.join_next().await {
            let (index, events) = joined?;
            scanned.push((index, events?));
        }
        scanned.sort_unstable_by_key(|(index, _)| *index);

        let mut merger = Merger::default();
        for (_, events) in scanned {
            merger.merge(events)?;
        }
        Ok(merger.finish())
    }
}

// ── Merging ───────────────────────────────────────────────────────────────────

#[derive(Default)]
struct Merger {
    trees: HashMap<Method, MatchitRouter<usize>>,
    events: Vec<Event>,
}

impl Merger {
    fn merge(&mut self, scanned: HashSet<Event>) -> Result<()> {
        let mut batch: Vec<Event> = scanned.into_iter().collect();
        batch.sort_by(|a, b| {
            (a.verb(), a.path(), a.action().name()).cmp(&(b.verb(), b.path(), b.action().name()))
        });

        for event in batch {
            if let Some(path) = event.path() {
                let tree = self.trees.entry(event.verb()).or_default();
                match tree.insert(path, self.events.len()) {
                    Ok(()) => {}
                    Err(InsertError::Conflict { with }) => {
                        let owner = self.owner_of(event.verb(), &with);
                        return Err(Error::RouteConflict {
                            verb: event.verb(),
                            path: path.to_owned(),
                            with: owner.map_or(with.clone(), |o| format!("{with} declared by {o}")),
                        });
                    }
                    Err(e) => {
                        warn!(route = %event, "template not checked for conflicts: {e}");
                    }
                }
            }
            self.events.push(event);
        }
        Ok(())
    }

    fn owner_of(&self, verb: Method, path: &str) -> Option<String> {
        self.events
            .iter()
            .find(|e| e.verb() == verb && e.path() == Some(path))
            .map(|e| format!("{:?}", e.action()))
    }

    fn finish(self) -> RouteTable {
        info!(routes = self.events.len(), "route table built");
        RouteTable { events: self.events }
    }
}
