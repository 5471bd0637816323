//! Caller-facing connection handles.

use std::fmt;
use std::mem;
use std::sync::Arc;

use pgsql_client::{
    ClientConfig, ConnStatus, Driver, NonBlockingGuard, NoticeBuffer, RawConnection, SessionInfo,
};

use crate::error::PoolError;
use crate::pool::{Checkout, ConnId, Pool};

/// Where a handle's connection came from, and where it goes back to.
enum Origin<D: Driver> {
    Standalone,
    Pooled { pool: Arc<Pool<D>>, id: ConnId },
}

/// A caller-facing wrapper around one connection, pooled or standalone.
///
/// A handle is either fully usable or never constructed: both constructors
/// surface open failures instead of returning a degraded handle. Disposal
/// is single-shot: [`close`](PgHandle::close) returns a pool-backed
/// connection to its pool (or closes a standalone one) and clears the
/// internal references, so calling it again is a no-op. Dropping the handle
/// disposes it the same way.
///
/// Session metadata (database, user, host, port, options) is captured once
/// at construction and stays readable after disposal.
pub struct PgHandle<D: Driver> {
    conn: Option<D::Conn>,
    origin: Origin<D>,
    target: String,
    info: SessionInfo,
    notice: NoticeBuffer,
}

impl<D: Driver> PgHandle<D> {
    /// Open a standalone (non-pooled) connection to `target`.
    ///
    /// # Errors
    ///
    /// [`PoolError::OpenFailed`] when the session could not be established
    /// or reported itself dead; the half-open session is closed first.
    pub fn connect(driver: &D, target: &str) -> Result<Self, PoolError> {
        Self::connect_with(driver, target, &ClientConfig::default())
    }

    /// Open a standalone connection with explicit client configuration.
    ///
    /// # Errors
    ///
    /// See [`connect`](PgHandle::connect).
    pub fn connect_with(
        driver: &D,
        target: &str,
        config: &ClientConfig,
    ) -> Result<Self, PoolError> {
        let mut conn = driver
            .connect(target)
            .map_err(|err| PoolError::OpenFailed(err.to_string()))?;

        if !conn.status().is_usable() {
            let message = conn.error_message();
            conn.close();
            return Err(PoolError::OpenFailed(message));
        }

        Ok(Self::wrap(conn, Origin::Standalone, target.to_owned(), config))
    }

    /// Borrow a connection from `pool`.
    ///
    /// # Errors
    ///
    /// Propagates [`Pool::acquire`] failures.
    pub fn pooled(pool: &Arc<Pool<D>>) -> Result<Self, PoolError> {
        Self::pooled_with(pool, &ClientConfig::default())
    }

    /// Borrow a connection from `pool` with explicit client configuration.
    ///
    /// # Errors
    ///
    /// Propagates [`Pool::acquire`] failures.
    pub fn pooled_with(pool: &Arc<Pool<D>>, config: &ClientConfig) -> Result<Self, PoolError> {
        let Checkout { id, conn } = pool.acquire()?;
        let origin = Origin::Pooled {
            pool: Arc::clone(pool),
            id,
        };
        Ok(Self::wrap(conn, origin, pool.target().to_owned(), config))
    }

    /// Capture session metadata and install the notice-capture callback.
    fn wrap(mut conn: D::Conn, origin: Origin<D>, target: String, config: &ClientConfig) -> Self {
        let info = SessionInfo::from_connection(&conn);
        let notice = NoticeBuffer::new();
        let buffer = notice.clone();
        let log_notices = config.log_notices;
        conn.set_notice_handler(Box::new(move |message| {
            buffer.record(message);
            if log_notices {
                tracing::info!(notice = %message, "server notice");
            }
        }));

        Self {
            conn: Some(conn),
            origin,
            target,
            info,
            notice,
        }
    }

    /// Dispose of the handle.
    ///
    /// A pool-backed connection goes back to its pool; a standalone one is
    /// closed. Idempotent: the first call clears the connection and pool
    /// references, and any repeat call does nothing.
    pub fn close(&mut self) {
        let Some(mut conn) = self.conn.take() else {
            return;
        };
        match mem::replace(&mut self.origin, Origin::Standalone) {
            Origin::Pooled { pool, id } => pool.release(Checkout { id, conn }),
            Origin::Standalone => conn.close(),
        }
    }

    /// Health of the underlying session; [`ConnStatus::Bad`] once the
    /// handle has been disposed.
    #[must_use]
    pub fn status(&self) -> ConnStatus {
        self.conn
            .as_ref()
            .map_or(ConnStatus::Bad, RawConnection::status)
    }

    /// Whether the connection is borrowed from a pool.
    ///
    /// `false` after disposal: closing clears the pool reference too.
    #[must_use]
    pub fn is_pooled(&self) -> bool {
        matches!(self.origin, Origin::Pooled { .. })
    }

    /// Whether the handle still holds its connection.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.conn.is_some()
    }

    /// The target descriptor the connection was opened against, verbatim.
    #[must_use]
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Session metadata captured when the connection was opened.
    #[must_use]
    pub fn session(&self) -> &SessionInfo {
        &self.info
    }

    /// Name of the connected database.
    #[must_use]
    pub fn db(&self) -> &str {
        &self.info.db
    }

    /// Name the session authenticated as.
    #[must_use]
    pub fn user(&self) -> &str {
        &self.info.user
    }

    /// Host the session is connected to.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.info.host
    }

    /// Port the session is connected to.
    #[must_use]
    pub fn port(&self) -> &str {
        &self.info.port
    }

    /// Command-line options sent at session start.
    #[must_use]
    pub fn options(&self) -> &str {
        &self.info.options
    }

    /// The most recent server notice, if any arrived on this handle.
    #[must_use]
    pub fn last_notice(&self) -> Option<String> {
        self.notice.last()
    }

    /// Current value of a server parameter; `None` once disposed.
    #[must_use]
    pub fn parameter_status(&self, name: &str) -> Option<String> {
        self.conn.as_ref().and_then(|conn| conn.parameter_status(name))
    }

    /// The underlying session, if the handle is still open.
    #[must_use]
    pub fn connection(&self) -> Option<&D::Conn> {
        self.conn.as_ref()
    }

    /// Mutable access to the underlying session.
    pub fn connection_mut(&mut self) -> Option<&mut D::Conn> {
        self.conn.as_mut()
    }

    /// Hold the session in non-blocking mode for one scope.
    pub fn as_nonblocking(&mut self) -> Option<NonBlockingGuard<'_, D::Conn>> {
        self.conn.as_mut().map(NonBlockingGuard::new)
    }

    /// Whether the session is still processing a request.
    ///
    /// Consumes pending input and polls the busy flag under the scoped
    /// non-blocking override, so the check never blocks on the socket.
    /// `false` once disposed.
    pub fn is_busy(&mut self) -> bool {
        match self.as_nonblocking() {
            Some(mut guard) => {
                guard.consume_input();
                guard.is_busy()
            }
            None => false,
        }
    }

    /// Ask the server to abandon the in-flight request.
    ///
    /// Returns whether the cancel request was dispatched; `false` once
    /// disposed.
    pub fn cancel_query(&mut self) -> bool {
        match self.as_nonblocking() {
            Some(mut guard) => guard.cancel_request(),
            None => false,
        }
    }

    /// Tear down and re-establish the underlying session, reporting
    /// whether it came back healthy. `false` once disposed.
    pub fn reset(&mut self) -> bool {
        match self.conn.as_mut() {
            Some(conn) => {
                conn.reset();
                conn.status().is_usable()
            }
            None => false,
        }
    }
}

impl<D: Driver> Drop for PgHandle<D> {
    fn drop(&mut self) {
        self.close();
    }
}

impl<D: Driver> fmt::Debug for PgHandle<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PgHandle")
            .field("db", &self.info.db)
            .field("host", &self.info.host)
            .field("pooled", &self.is_pooled())
            .field("open", &self.is_open())
            .finish_non_exhaustive()
    }
}
