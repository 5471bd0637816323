//! Pool activity counters and stats snapshots.

use serde::Serialize;

/// Lifetime activity counters for one pool.
///
/// Every counter is monotonically non-decreasing and advances on failure
/// paths too, so the numbers stay an accurate activity log even when opens
/// fail or connections die.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PoolCounters {
    /// Checkouts requested, successful or not.
    pub requested: u64,
    /// New sessions opened successfully.
    pub opened: u64,
    /// Connections handed back by their handles.
    pub released: u64,
    /// Connections pruned as unhealthy.
    pub sweeped: u64,
    /// Open attempts that failed.
    pub errors: u64,
}

/// Point-in-time view of one pool.
///
/// Taken under the same lock that guards mutation, so the counters and
/// sizes are consistent with each other.
#[derive(Debug, Clone, Serialize)]
pub struct PoolStats {
    /// Credential-stripped display form of the target descriptor.
    ///
    /// `None` until the pool has opened its first connection; built from
    /// the session's reported parameters, never from the input string.
    pub connection_string: Option<String>,
    /// Lifetime activity counters.
    #[serde(flatten)]
    pub counters: PoolCounters,
    /// Connections currently owned, idle plus checked out.
    pub total_connections: usize,
    /// Connections currently idle.
    pub free_connections: usize,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_serializes_flat() {
        let stats = PoolStats {
            connection_string: Some("host=db1 port=5432 user=app dbname=app".into()),
            counters: PoolCounters {
                requested: 5,
                opened: 2,
                released: 3,
                sweeped: 1,
                errors: 0,
            },
            total_connections: 2,
            free_connections: 1,
        };

        let value = serde_json::to_value(&stats).unwrap();
        assert_eq!(value["requested"], 5);
        assert_eq!(value["sweeped"], 1);
        assert_eq!(value["total_connections"], 2);
        assert_eq!(value["free_connections"], 1);
        assert_eq!(
            value["connection_string"],
            "host=db1 port=5432 user=app dbname=app"
        );
    }
}
