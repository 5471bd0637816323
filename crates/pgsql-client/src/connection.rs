//! The connection contract consumed from the external client library.
//!
//! The pooling driver never implements the wire protocol. Everything it
//! needs from a network session is captured by [`RawConnection`], and
//! everything it needs to open one by [`Driver`]. A real backend implements
//! these over libpq-style primitives; tests implement them with scripted
//! mocks.

use crate::error::Error;

/// Health of a network session as reported by the client library.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnStatus {
    /// Session is established and usable.
    Ok,
    /// Session is broken and must be discarded.
    Bad,
    /// Connection establishment has started but not yet completed.
    InProgress,
}

impl ConnStatus {
    /// Whether the session may be handed to a caller or kept in a pool.
    ///
    /// [`ConnStatus::InProgress`] counts as usable; only
    /// [`ConnStatus::Bad`] disqualifies a session.
    #[must_use]
    pub fn is_usable(self) -> bool {
        !matches!(self, Self::Bad)
    }
}

/// Callback invoked with the text of each server notice.
pub type NoticeHandler = Box<dyn FnMut(&str) + Send + 'static>;

/// A live (or dead) network session to a PostgreSQL server.
///
/// Mirrors the synchronous primitives of the underlying client library:
/// status inspection, teardown, session parameter accessors, the notice
/// callback hook, and the non-blocking mode toggle used while polling for
/// busy/cancellation state.
///
/// `status()` is a cheap local flag, not a round trip. Expensive
/// revalidation is a separate, explicit operation ([`RawConnection::reset`]).
pub trait RawConnection {
    /// Current health of the session.
    fn status(&self) -> ConnStatus;

    /// Human-readable text of the most recent session-level error.
    fn error_message(&self) -> String;

    /// Close the session and release its network resources.
    fn close(&mut self);

    /// Name of the connected database.
    fn db(&self) -> String;

    /// Name the session authenticated as.
    fn user(&self) -> String;

    /// Host the session is connected to.
    fn host(&self) -> String;

    /// Port the session is connected to, as reported by the library.
    fn port(&self) -> String;

    /// Command-line options sent to the server at session start.
    fn options(&self) -> String;

    /// Current value of a server parameter, if the server reported one.
    fn parameter_status(&self, name: &str) -> Option<String>;

    /// Install the callback invoked for each server notice.
    ///
    /// Replaces any previously installed handler.
    fn set_notice_handler(&mut self, handler: NoticeHandler);

    /// Whether the session is currently in non-blocking mode.
    fn is_nonblocking(&self) -> bool;

    /// Switch the session between blocking and non-blocking mode.
    fn set_nonblocking(&mut self, nonblocking: bool);

    /// Consume any input available on the socket without blocking.
    ///
    /// Returns `false` if the session has failed.
    fn consume_input(&mut self) -> bool;

    /// Whether a request is still being processed.
    fn is_busy(&self) -> bool;

    /// Ask the server to abandon the in-flight request.
    ///
    /// Returns whether the cancel request was dispatched.
    fn cancel_request(&mut self) -> bool;

    /// Tear down and re-establish the session over the same target.
    fn reset(&mut self);
}

/// Opens new sessions against one kind of backend.
///
/// The target descriptor is passed through verbatim; the driver neither
/// parses nor validates it.
pub trait Driver: Send + Sync {
    /// Session type produced by this driver.
    type Conn: RawConnection + Send;

    /// Open a new session to `target`, blocking until the attempt resolves.
    ///
    /// # Errors
    ///
    /// Fails when no session could be constructed at all. A returned
    /// session may still be half-open: callers must check
    /// [`RawConnection::status`] and close sessions that report
    /// [`ConnStatus::Bad`].
    fn connect(&self, target: &str) -> Result<Self::Conn, Error>;
}
