//! Session metadata captured once after a successful open.

use crate::connection::RawConnection;

/// Fixed facts about an open session.
///
/// Read from the client library exactly once, right after the session is
/// opened, so accessors stay valid even after the session itself is handed
/// back or torn down. The port is kept as the library reports it, a string,
/// since Unix-socket targets have no numeric port.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionInfo {
    /// Name of the connected database.
    pub db: String,
    /// Name the session authenticated as.
    pub user: String,
    /// Host the session is connected to.
    pub host: String,
    /// Port the session is connected to.
    pub port: String,
    /// Command-line options sent at session start.
    pub options: String,
}

impl SessionInfo {
    /// Capture the metadata of `conn`.
    pub fn from_connection<C: RawConnection>(conn: &C) -> Self {
        Self {
            db: conn.db(),
            user: conn.user(),
            host: conn.host(),
            port: conn.port(),
            options: conn.options(),
        }
    }
}
