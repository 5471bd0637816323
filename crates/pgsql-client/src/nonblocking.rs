//! Scoped non-blocking mode override.

use std::ops::{Deref, DerefMut};

use crate::connection::RawConnection;

/// Holds a session in non-blocking mode for one scope.
///
/// On construction the guard saves the session's current mode and switches
/// it to non-blocking; on drop it restores the saved mode, including on
/// early return or panic. Operations that poll for busy or cancellation
/// state run under this guard so they never block indefinitely on the
/// underlying socket.
pub struct NonBlockingGuard<'a, C: RawConnection> {
    conn: &'a mut C,
    saved: bool,
}

impl<'a, C: RawConnection> NonBlockingGuard<'a, C> {
    /// Switch `conn` to non-blocking mode until the guard is dropped.
    pub fn new(conn: &'a mut C) -> Self {
        let saved = conn.is_nonblocking();
        conn.set_nonblocking(true);
        Self { conn, saved }
    }
}

impl<C: RawConnection> Deref for NonBlockingGuard<'_, C> {
    type Target = C;

    fn deref(&self) -> &C {
        self.conn
    }
}

impl<C: RawConnection> DerefMut for NonBlockingGuard<'_, C> {
    fn deref_mut(&mut self) -> &mut C {
        self.conn
    }
}

impl<C: RawConnection> Drop for NonBlockingGuard<'_, C> {
    fn drop(&mut self) {
        self.conn.set_nonblocking(self.saved);
    }
}
