//! Verb marker resolution.

use tracing::debug;

use crate::descriptor::Operation;
use crate::method::Method;

/// Maps an operation's verb marker to its HTTP method.
pub struct MethodResolver;

impl MethodResolver {
    /// An operation is routable when it has a receiver, is user code and
    /// carries exactly one verb marker.
    pub fn is_valid(operation: &Operation) -> bool {
        !operation.is_static() && !operation.is_synthetic() && operation.verbs().len() == 1
    }

    /// The verb of the single marker. Missing or conflicting markers are not
    /// errors: the operation is simply not a route.
    pub fn resolve(operation: &Operation) -> Option<Method> {
        match operation.verbs() {
            [verb] => Some(*verb),
            [] => None,
            verbs => {
                debug!(operation = operation.name(), ?verbs, "ambiguous verb markers, skipped");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_marker_resolves() {
        let op = Operation::new("get").verb(Method::Get);
        assert!(MethodResolver::is_valid(&op));
        assert_eq!(MethodResolver::resolve(&op), Some(Method::Get));
    }

    #[test]
    fn missing_or_duplicate_markers_are_not_routable() {
        let none = Operation::new("helper");
        assert!(!MethodResolver::is_valid(&none));
        assert_eq!(MethodResolver::resolve(&none), None);

        let both = Operation::new("both").verb(Method::Get).verb(Method::Post);
        assert!(!MethodResolver::is_valid(&both));
        assert_eq!(MethodResolver::resolve(&both), None);
    }

    #[test]
    fn associated_and_synthetic_operations_are_excluded() {
        assert!(!MethodResolver::is_valid(&Operation::new("new").verb(Method::Get).associated()));
        assert!(!MethodResolver::is_valid(&Operation::new("glue").verb(Method::Get).synthetic()));
    }
}
