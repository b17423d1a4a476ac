//! Route tables built from several endpoint types.

use std::sync::Arc;

use trellis::{Endpoint, Error, InstanceRegistry, Method, Operation, RouteTable};

#[derive(Default)]
struct Users;

#[derive(Default)]
struct Admins;

trait Audit {}

fn users() -> Endpoint {
    Endpoint::constructible::<Users>()
        .marked()
        .root("/users")
        .operation(Operation::new("list").verb(Method::Get))
        .operation(Operation::new("get").verb(Method::Get).path("{id}"))
        .operation(Operation::new("create").verb(Method::Post))
}

fn audit() -> Endpoint {
    Endpoint::interface::<dyn Audit>()
        .marked()
        .operation(Operation::new("record").verb(Method::Post))
}

#[tokio::test]
async fn scan_merges_every_endpoint() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    let registry = Arc::new(InstanceRegistry::new());

    let table = RouteTable::builder(Arc::clone(&registry))
        .endpoint(users())
        .endpoint(audit())
        .endpoint(
            Endpoint::constructible::<Admins>()
                .marked()
                .root("/admins")
                .operation(Operation::new("list").verb(Method::Get)),
        )
        .scan()
        .await
        .unwrap();

    assert_eq!(table.len(), 5);
    assert_eq!(table.routes_for(Method::Get).count(), 3);
    assert_eq!(table.bus_only().count(), 1);
    assert_eq!(registry.len(), 2);
}

#[test]
fn build_matches_scan_order() {
    let table = RouteTable::builder(Arc::new(InstanceRegistry::new()))
        .endpoint(users())
        .endpoint(audit())
        .build()
        .unwrap();

    let names: Vec<&str> = table.iter().map(|e| e.action().name()).collect();
    assert_eq!(names, ["list", "get", "create", "record"]);
}

#[test]
fn identical_routes_across_types_conflict() {
    let clash = Endpoint::constructible::<Admins>()
        .marked()
        .operation(Operation::new("all_users").verb(Method::Get).path("/users"));

    let err = RouteTable::builder(Arc::new(InstanceRegistry::new()))
        .endpoint(users())
        .endpoint(clash)
        .build()
        .unwrap_err();

    match err {
        Error::RouteConflict { verb, path, with } => {
            assert_eq!(verb, Method::Get);
            assert_eq!(path, "/users");
            assert!(with.contains("list"), "{with}");
        }
        other => panic!("expected RouteConflict, got {other:?}"),
    }
}

#[tokio::test]
async fn scan_surfaces_extraction_errors() {
    let err = RouteTable::builder(Arc::new(InstanceRegistry::new()))
        .endpoint(users())
        .endpoint(Endpoint::constructible::<Admins>())
        .scan()
        .await
        .unwrap_err();
    assert!(matches!(err, Error::EventSource(_)));
}

#[test]
fn ambiguous_templates_within_one_type_conflict() {
    let ambiguous = Endpoint::constructible::<Admins>()
        .marked()
        .root("/x")
        .operation(Operation::new("by_id").verb(Method::Get).path("{id}"))
        .operation(Operation::new("by_name").verb(Method::Get).path("{name}"));

    let err = RouteTable::builder(Arc::new(InstanceRegistry::new()))
        .endpoint(ambiguous)
        .build()
        .unwrap_err();
    assert!(matches!(err, Error::RouteConflict { verb: Method::Get, .. }));
}

#[test]
fn same_path_under_another_verb_is_fine() {
    let replace = Endpoint::constructible::<Admins>()
        .marked()
        .operation(Operation::new("replace").verb(Method::Put).path("/users/{id}"));

    let table = RouteTable::builder(Arc::new(InstanceRegistry::new()))
        .endpoint(users())
        .endpoint(replace)
        .build()
        .unwrap();
    assert_eq!(table.len(), 4);
}
