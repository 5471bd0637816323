//! Pool configuration.

/// Configuration for a connection pool.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PoolConfig {
    /// Maximum number of connections a pool may own, idle plus checked
    /// out. `None` disables the bound.
    pub max_connections: Option<usize>,
}

impl PoolConfig {
    /// Create a configuration with no connection bound.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Bound the pool at `max` owned connections.
    ///
    /// A `max` of zero disables the bound.
    #[must_use]
    pub fn max_connections(mut self, max: usize) -> Self {
        self.max_connections = (max > 0).then_some(max);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unbounded_by_default() {
        assert_eq!(PoolConfig::default().max_connections, None);
    }

    #[test]
    fn builder_sets_bound() {
        let config = PoolConfig::new().max_connections(8);
        assert_eq!(config.max_connections, Some(8));
    }

    #[test]
    fn zero_disables_bound() {
        let config = PoolConfig::new().max_connections(8).max_connections(0);
        assert_eq!(config.max_connections, None);
    }
}
