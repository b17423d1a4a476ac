//! Minimal trellis example: declare endpoints, scan them, print the table.
//!
//! Run with:
//!   RUST_LOG=debug cargo run --example bootstrap

use std::sync::Arc;

use trellis::{Endpoint, InstanceRegistry, Method, Operation, Param, RouteTable};

#[derive(Default)]
struct UserApi;

#[derive(Default)]
struct OrderService;

trait OrderApi {}

impl OrderApi for OrderService {}

trait AuditApi {}

#[tokio::main]
async fn main() -> trellis::Result<()> {
    tracing_subscriber::fmt::init();

    let registry = Arc::new(InstanceRegistry::new());
    registry.bind::<dyn OrderApi, OrderService>()?;

    let table = RouteTable::builder(Arc::clone(&registry))
        // GET /users/{id}, POST /users
        .endpoint(
            Endpoint::constructible::<UserApi>()
                .marked()
                .root("/users")
                .produces("application/json")
                .operation(Operation::new("get").verb(Method::Get).path("{id}"))
                .operation(
                    Operation::new("create")
                        .verb(Method::Post)
                        .consumes("application/json")
                        .param(Param::new("user").codex()),
                ),
        )
        // Served by OrderService, the bound implementation.
        .endpoint(
            Endpoint::interface::<dyn OrderApi>()
                .marked()
                .root("/orders")
                .operation(Operation::new("list").verb(Method::Get)),
        )
        // Nothing implements AuditApi: bus-only.
        .endpoint(
            Endpoint::interface::<dyn AuditApi>()
                .marked()
                .operation(Operation::new("record").verb(Method::Post)),
        )
        .scan()
        .await?;

    for route in &table {
        let target = if route.handler().is_virtual() { "bus" } else { "local" };
        println!("{route} [{target}]");
    }
    Ok(())
}
