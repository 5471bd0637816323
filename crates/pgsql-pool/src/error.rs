//! Pool error types.

use thiserror::Error;

/// Errors that can occur while checking out a connection.
///
/// Stale idle connections found at checkout are not an error: they are
/// pruned and replaced within the same acquire call.
#[derive(Debug, Error)]
pub enum PoolError {
    /// The pool already owns its configured maximum number of connections.
    #[error("connection pool is full (max {max})")]
    CapacityExceeded {
        /// Configured connection bound.
        max: usize,
    },

    /// Opening a new session failed, or produced a session that reported
    /// itself dead.
    #[error("failed to open connection: {0}")]
    OpenFailed(String),
}

/// Result type for pool operations.
pub type Result<T> = std::result::Result<T, PoolError>;
