//! Client error types.

use thiserror::Error;

/// Errors surfaced at the connection boundary.
#[derive(Debug, Error)]
pub enum Error {
    /// Connection could not be established.
    #[error("connection failed: {0}")]
    Connection(String),

    /// Operation attempted on a session that has been closed.
    #[error("connection closed")]
    Closed,
}

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, Error>;
