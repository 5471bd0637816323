//! # pgsql-testing
//!
//! Test infrastructure for the PostgreSQL pooling driver.
//!
//! Provides a scripted, in-memory stand-in for the external client library
//! so pool and handle behavior can be tested without a server: connect
//! failures and half-open sessions can be injected, any live session can be
//! flipped to a bad status, and notices can be emitted on demand. Every
//! session ever opened stays reachable through a [`ConnControl`] so tests
//! can assert on close and cancel accounting after the fact.
//!
//! ## Example
//!
//! ```rust,ignore
//! use pgsql_testing::MockDriver;
//!
//! let driver = MockDriver::new();
//! let pool = Pool::new(driver.clone(), "host=db1 dbname=app", PoolConfig::new());
//!
//! let checkout = pool.acquire()?;
//! driver.connection(0).unwrap().set_status(ConnStatus::Bad);
//! pool.release(checkout); // swept, not pooled
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod mock;

pub use mock::{ConnControl, MockConnection, MockDriver};
