//! # pgsql-client
//!
//! Connection contract and session glue for the PostgreSQL pooling driver.
//!
//! This crate does not speak the PostgreSQL wire protocol. It defines the
//! boundary to an existing client library (the [`Driver`] and
//! [`RawConnection`] traits mirror the connect/status/finish primitives such
//! a library exposes) plus the small pieces of per-session state the driver
//! layers on top:
//!
//! - [`SessionInfo`]: fixed session metadata captured once after a
//!   successful open
//! - [`NoticeBuffer`]: capture of the most recent server notice
//! - [`NonBlockingGuard`]: scoped non-blocking mode override for
//!   busy/cancellation polling
//!
//! The pooling layer itself lives in `pgsql-driver-pool`.

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod config;
pub mod connection;
pub mod error;
pub mod nonblocking;
pub mod notice;
pub mod session;

pub use config::ClientConfig;
pub use connection::{ConnStatus, Driver, NoticeHandler, RawConnection};
pub use error::{Error, Result};
pub use nonblocking::NonBlockingGuard;
pub use notice::NoticeBuffer;
pub use session::SessionInfo;

#[cfg(test)]
pub(crate) mod test_support;
