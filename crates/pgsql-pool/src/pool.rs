//! Connection pool implementation.

use std::collections::VecDeque;
use std::fmt;

use hashbrown::HashMap;
use parking_lot::Mutex;
use pgsql_client::{Driver, RawConnection};

use crate::config::PoolConfig;
use crate::error::PoolError;
use crate::stats::{PoolCounters, PoolStats};

/// Identifier of a pool-owned connection.
///
/// Ids are allocated from a per-pool monotone counter and never reused, so
/// a stale id can never alias a newer connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnId(u64);

/// A connection checked out of a [`Pool`].
///
/// The checkout is the single owner of the session until it is handed back
/// via [`Pool::release`]. Dropping it without releasing leaks the pool's
/// bookkeeping slot; handles take care of this automatically.
pub struct Checkout<C> {
    pub(crate) id: ConnId,
    pub(crate) conn: C,
}

impl<C> Checkout<C> {
    /// Identifier of the checked-out connection within its pool.
    #[must_use]
    pub fn id(&self) -> ConnId {
        self.id
    }

    /// The checked-out session.
    #[must_use]
    pub fn connection(&self) -> &C {
        &self.conn
    }

    /// Mutable access to the checked-out session.
    pub fn connection_mut(&mut self) -> &mut C {
        &mut self.conn
    }
}

impl<C> fmt::Debug for Checkout<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Checkout")
            .field("id", &self.id)
            .finish_non_exhaustive()
    }
}

/// Where an owned connection currently lives.
enum Slot<C> {
    /// Parked in the pool, available for reuse.
    Idle(C),
    /// Moved out to a checkout.
    CheckedOut,
}

struct PoolState<C> {
    /// Every connection this pool has opened and not yet pruned.
    owned: HashMap<ConnId, Slot<C>>,
    /// Idle members of `owned`, oldest release first.
    idle: VecDeque<ConnId>,
    counters: PoolCounters,
    /// Credential-stripped display form, cached on first successful open.
    display: Option<String>,
    next_id: u64,
}

/// A pool of reusable connections to one target descriptor.
///
/// All mutable state sits behind a single mutex, which is held for the full
/// duration of [`acquire`](Pool::acquire) and [`release`](Pool::release),
/// including the blocking network connect on the new-open path. That
/// serializes all activity per pool; it also keeps the owned-set bookkeeping
/// atomic with the connect outcome.
pub struct Pool<D: Driver> {
    driver: D,
    target: String,
    max_connections: Option<usize>,
    state: Mutex<PoolState<D::Conn>>,
}

impl<D: Driver> Pool<D> {
    /// Create an empty pool for `target`.
    ///
    /// No connection is opened until the first [`acquire`](Pool::acquire).
    pub fn new(driver: D, target: impl Into<String>, config: PoolConfig) -> Self {
        Self {
            driver,
            target: target.into(),
            max_connections: config.max_connections,
            state: Mutex::new(PoolState {
                owned: HashMap::new(),
                idle: VecDeque::new(),
                counters: PoolCounters::default(),
                display: None,
                next_id: 0,
            }),
        }
    }

    /// Target descriptor this pool connects to, verbatim.
    #[must_use]
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Configured connection bound, if any.
    #[must_use]
    pub fn max_connections(&self) -> Option<usize> {
        self.max_connections
    }

    /// Check out a connection.
    ///
    /// Idle connections are tried in release order (oldest first). Each one
    /// found unhealthy is pruned and closed, and the scan continues; the
    /// first healthy one is returned as-is. Only when the idle queue is
    /// exhausted does the pool open a new session, blocking the calling
    /// thread for the network round trip.
    ///
    /// # Errors
    ///
    /// [`PoolError::CapacityExceeded`] when a bound is configured and the
    /// pool already owns that many connections;
    /// [`PoolError::OpenFailed`] when the new session could not be
    /// established. Opens are not retried.
    pub fn acquire(&self) -> Result<Checkout<D::Conn>, PoolError> {
        let mut state = self.state.lock();
        state.counters.requested += 1;

        tracing::trace!("acquiring connection from pool");

        while let Some(id) = state.idle.pop_front() {
            let slot = state
                .owned
                .get_mut(&id)
                .map(|slot| std::mem::replace(slot, Slot::CheckedOut));
            let conn = match slot {
                Some(Slot::Idle(conn)) => conn,
                _ => continue,
            };

            if conn.status().is_usable() {
                return Ok(Checkout { id, conn });
            }
            self.sweep_locked(&mut state, id, conn);
        }

        // The bound counts every owned connection, idle or checked out.
        if let Some(max) = self.max_connections {
            if state.owned.len() >= max {
                return Err(PoolError::CapacityExceeded { max });
            }
        }

        tracing::debug!("opening new connection");
        let mut conn = match self.driver.connect(&self.target) {
            Ok(conn) => conn,
            Err(err) => {
                state.counters.errors += 1;
                let message = err.to_string();
                tracing::warn!(error = %message, "failed to open connection");
                return Err(PoolError::OpenFailed(message));
            }
        };

        if !conn.status().is_usable() {
            state.counters.errors += 1;
            let message = conn.error_message();
            conn.close();
            tracing::warn!(error = %message, "new connection reported bad status");
            return Err(PoolError::OpenFailed(message));
        }

        state.counters.opened += 1;
        let id = ConnId(state.next_id);
        state.next_id += 1;
        state.owned.insert(id, Slot::CheckedOut);

        if state.display.is_none() {
            state.display = Some(display_descriptor(&conn));
        }

        Ok(Checkout { id, conn })
    }

    /// Hand a checked-out connection back to the pool.
    ///
    /// A healthy connection joins the tail of the idle queue; an unhealthy
    /// one is closed and pruned. If the pool no longer owns the id (it was
    /// torn down in the meantime), the connection is closed instead of
    /// pooled.
    pub fn release(&self, checkout: Checkout<D::Conn>) {
        let Checkout { id, mut conn } = checkout;
        let mut state = self.state.lock();
        state.counters.released += 1;

        if conn.status().is_usable() {
            if let Some(slot) = state.owned.get_mut(&id) {
                *slot = Slot::Idle(conn);
                state.idle.push_back(id);
            } else {
                conn.close();
            }
        } else if state.owned.contains_key(&id) {
            self.sweep_locked(&mut state, id, conn);
        } else {
            conn.close();
        }
    }

    /// Close every idle connection and forget every owned one.
    ///
    /// Callers must not hold a checkout across this call: a checkout
    /// released afterwards is closed rather than pooled.
    pub fn close_all(&self) {
        let mut state = self.state.lock();
        state.idle.clear();
        for (_, slot) in state.owned.drain() {
            if let Slot::Idle(mut conn) = slot {
                conn.close();
            }
        }
        tracing::info!("closed all pooled connections");
    }

    /// Close and drop the idle queue's current contents, leaving
    /// checked-out connections untouched.
    pub fn close_idle(&self) {
        let mut state = self.state.lock();
        let mut closed = 0usize;
        while let Some(id) = state.idle.pop_front() {
            if let Some(Slot::Idle(mut conn)) = state.owned.remove(&id) {
                conn.close();
                closed += 1;
            }
        }
        if closed > 0 {
            tracing::debug!(closed, "closed idle connections");
        }
    }

    /// Point-in-time snapshot of counters and sizes.
    #[must_use]
    pub fn stats(&self) -> PoolStats {
        let state = self.state.lock();
        PoolStats {
            connection_string: state.display.clone(),
            counters: state.counters,
            total_connections: state.owned.len(),
            free_connections: state.idle.len(),
        }
    }

    /// Remove `id` from the owned set and close its connection.
    fn sweep_locked(&self, state: &mut PoolState<D::Conn>, id: ConnId, mut conn: D::Conn) {
        state.owned.remove(&id);
        state.counters.sweeped += 1;
        conn.close();
        tracing::debug!("swept unhealthy connection");
    }
}

impl<D: Driver> fmt::Debug for Pool<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.lock();
        f.debug_struct("Pool")
            .field("display", &state.display)
            .field("max_connections", &self.max_connections)
            .field("total", &state.owned.len())
            .field("free", &state.idle.len())
            .finish_non_exhaustive()
    }
}

/// Credential-stripped display form, built from the session's reported
/// parameters rather than by re-parsing the target string.
fn display_descriptor<C: RawConnection>(conn: &C) -> String {
    format!(
        "host={} port={} user={} dbname={}",
        conn.host(),
        conn.port(),
        conn.user(),
        conn.db()
    )
}
