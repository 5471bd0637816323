//! Connection pooling walkthrough.
//!
//! Uses the scripted mock driver from `pgsql-testing` so the example runs
//! without a PostgreSQL server.
//!
//! # Running
//!
//! ```bash
//! cargo run --example connection_pool
//! ```

// Allow common patterns in example code
#![allow(clippy::unwrap_used, clippy::expect_used)]

use pgsql_driver_pool::{PgHandle, PoolConfig, PoolRegistry};
use pgsql_testing::MockDriver;

fn main() {
    tracing_subscriber::fmt::init();

    let driver = MockDriver::new();
    let registry = PoolRegistry::with_config(driver, PoolConfig::new().max_connections(4));

    let target = "host=localhost port=5432 user=app password=secret dbname=app";
    let pool = registry.get_or_create(target);

    println!("=== Pooled connections ===\n");

    {
        let handle = PgHandle::pooled(&pool).expect("checkout failed");
        println!(
            "connected to {} on {}:{} as {}",
            handle.db(),
            handle.host(),
            handle.port(),
            handle.user()
        );
    } // handle drops here and its connection returns to the pool

    // The second checkout reuses the released session instead of opening.
    let handle = PgHandle::pooled(&pool).expect("checkout failed");
    drop(handle);

    println!("\n=== Pool statistics ===\n");
    for stats in registry.stats() {
        println!(
            "pool {}: requested={} opened={} released={} sweeped={} free={}/{}",
            stats.connection_string.as_deref().unwrap_or("<never connected>"),
            stats.counters.requested,
            stats.counters.opened,
            stats.counters.released,
            stats.counters.sweeped,
            stats.free_connections,
            stats.total_connections,
        );
    }

    // Periodic idle eviction across every pool the registry knows about.
    registry.sweep_idle();
    println!("\nidle connections swept");
}
