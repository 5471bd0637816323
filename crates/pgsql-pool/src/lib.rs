//! # pgsql-driver-pool
//!
//! Pooled connection management for PostgreSQL.
//!
//! Opening a session to a PostgreSQL server costs a network round trip plus
//! authentication. This crate amortizes that cost by reusing healthy
//! sessions across many short-lived logical connections: a [`Pool`] owns
//! the sessions for one target descriptor, a [`PoolRegistry`] hands out one
//! pool per descriptor, and a [`PgHandle`] wraps a single borrowed (or
//! standalone) session and guarantees it is returned or closed exactly once.
//!
//! ## Features
//!
//! - FIFO reuse: the oldest released connection is handed out first
//! - Health revalidation at checkout; dead sessions are pruned and replaced
//!   transparently
//! - Optional per-pool connection bound
//! - Lifetime counters and locked stats snapshots per pool
//! - Idle-eviction sweep and full teardown across all pools
//!
//! ## Example
//!
//! ```rust,ignore
//! use pgsql_driver_pool::{PgHandle, PoolConfig, PoolRegistry};
//!
//! let registry = PoolRegistry::with_config(driver, PoolConfig::new().max_connections(10));
//!
//! let pool = registry.get_or_create("host=db1 user=app password=secret dbname=app");
//! let handle = PgHandle::pooled(&pool)?;
//! // Run queries through the handle...
//! drop(handle); // connection goes back to the pool
//!
//! for stats in registry.stats() {
//!     println!("{stats:?}");
//! }
//! ```
//!
//! All operations are synchronous and block the calling thread; each pool
//! serializes its activity behind a single mutex, held across the network
//! connect on the new-open path.

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod config;
pub mod error;
pub mod handle;
pub mod pool;
pub mod registry;
pub mod stats;

pub use config::PoolConfig;
pub use error::PoolError;
pub use handle::PgHandle;
pub use pool::{Checkout, ConnId, Pool};
pub use registry::PoolRegistry;
pub use stats::{PoolCounters, PoolStats};
