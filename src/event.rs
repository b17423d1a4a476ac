//! Route records.

use std::collections::BTreeSet;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::descriptor::{Operation, TypeKey};
use crate::handler::Handler;
use crate::method::Method;

/// The operation a route was extracted from.
#[derive(Clone)]
pub struct Action {
    owner: TypeKey,
    operation: Arc<Operation>,
}

impl Action {
    pub(crate) fn new(owner: TypeKey, operation: Arc<Operation>) -> Self {
        Self { owner, operation }
    }

    /// The declaring type.
    pub fn owner(&self) -> TypeKey { self.owner }
    pub fn operation(&self) -> &Operation { &self.operation }
    pub fn name(&self) -> &str { self.operation.name() }
}

/// Same declaring type and the very same declared operation.
impl PartialEq for Action {
    fn eq(&self, other: &Self) -> bool {
        self.owner == other.owner && Arc::ptr_eq(&self.operation, &other.operation)
    }
}

impl Eq for Action {}

impl Hash for Action {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.owner.hash(state);
        self.operation.name().hash(state);
    }
}

impl fmt::Debug for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.owner.name(), self.operation.name())
    }
}

/// One routable operation. Built once per scan, never modified.
///
/// # Identity
///
/// A route is identified by verb, path and action. Routes sharing a verb
/// and a concrete path are the same logical route no matter which action
/// declared them, because a dispatcher could never tell them apart. A
/// bus-only route (no path) is only equal to a route of the same action.
#[derive(Clone)]
pub struct Event {
    verb: Method,
    path: Option<String>,
    consumes: BTreeSet<String>,
    produces: BTreeSet<String>,
    action: Action,
    handler: Handler,
}

impl Event {
    pub(crate) fn new(
        verb: Method,
        path: Option<String>,
        consumes: BTreeSet<String>,
        produces: BTreeSet<String>,
        action: Action,
        handler: Handler,
    ) -> Self {
        Self { verb, path, consumes, produces, action, handler }
    }

    pub fn verb(&self) -> Method { self.verb }
    pub fn path(&self) -> Option<&str> { self.path.as_deref() }
    pub fn consumes(&self) -> &BTreeSet<String> { &self.consumes }
    pub fn produces(&self) -> &BTreeSet<String> { &self.produces }
    pub fn action(&self) -> &Action { &self.action }
    pub fn handler(&self) -> &Handler { &self.handler }

    /// No HTTP path: dispatched through the bus only.
    pub fn is_bus_only(&self) -> bool {
        self.path.is_none()
    }
}

impl PartialEq for Event {
    fn eq(&self, other: &Self) -> bool {
        self.verb == other.verb
            && self.path == other.path
            && (self.path.is_some() || self.action == other.action)
    }
}

impl Eq for Event {}

impl Hash for Event {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.verb.hash(state);
        self.path.hash(state);
        if self.path.is_none() {
            self.action.hash(state);
        }
    }
}

impl fmt::Debug for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Event")
            .field("verb", &self.verb)
            .field("path", &self.path)
            .field("consumes", &self.consumes)
            .field("produces", &self.produces)
            .field("action", &self.action)
            .field("handler", &self.handler)
            .finish()
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.path {
            Some(path) => write!(f, "{} {} -> {:?}", self.verb, path, self.action),
            None => write!(f, "{} <bus> -> {:?}", self.verb, self.action),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    struct Api;

    fn event(verb: Method, path: Option<&str>, operation: &Arc<Operation>) -> Event {
        Event::new(
            verb,
            path.map(str::to_owned),
            BTreeSet::new(),
            BTreeSet::new(),
            Action::new(TypeKey::of::<Api>(), Arc::clone(operation)),
            Handler::Virtual,
        )
    }

    #[test]
    fn same_verb_and_path_collapse() {
        let a = Arc::new(Operation::new("a"));
        let b = Arc::new(Operation::new("b"));
        let set: HashSet<Event> = [
            event(Method::Get, Some("/x"), &a),
            event(Method::Get, Some("/x"), &b),
            event(Method::Post, Some("/x"), &b),
        ]
        .into_iter()
        .collect();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn bus_only_routes_keep_their_action() {
        let a = Arc::new(Operation::new("a"));
        let b = Arc::new(Operation::new("b"));
        assert_ne!(event(Method::Post, None, &a), event(Method::Post, None, &b));
        assert_eq!(event(Method::Post, None, &a), event(Method::Post, None, &a));
    }
}
