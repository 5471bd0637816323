//! Per-target pool registry.

use std::sync::Arc;

use hashbrown::HashMap;
use parking_lot::Mutex;
use pgsql_client::Driver;

use crate::config::PoolConfig;
use crate::pool::Pool;
use crate::stats::PoolStats;

/// One pool per target descriptor, created on first use.
///
/// The registry is an explicit, constructed-once object: pass it by
/// reference into whatever needs pooled connections instead of reaching for
/// a global. The target string is used verbatim as the key, so equivalent
/// descriptors spelled differently get separate pools.
///
/// Pools are never removed once created; teardown closes their connections
/// but leaves the pools in place.
pub struct PoolRegistry<D: Driver + Clone> {
    driver: D,
    config: PoolConfig,
    pools: Mutex<HashMap<String, Arc<Pool<D>>>>,
}

impl<D: Driver + Clone> PoolRegistry<D> {
    /// Create a registry whose pools use the default configuration.
    #[must_use]
    pub fn new(driver: D) -> Self {
        Self::with_config(driver, PoolConfig::default())
    }

    /// Create a registry whose pools use `config`.
    #[must_use]
    pub fn with_config(driver: D, config: PoolConfig) -> Self {
        Self {
            driver,
            config,
            pools: Mutex::new(HashMap::new()),
        }
    }

    /// Find or lazily create the pool for `target`.
    ///
    /// Idempotent: repeated calls with the same descriptor return the same
    /// pool instance.
    pub fn get_or_create(&self, target: &str) -> Arc<Pool<D>> {
        let mut pools = self.pools.lock();
        if let Some(pool) = pools.get(target) {
            return Arc::clone(pool);
        }

        tracing::debug!("creating connection pool");
        let pool = Arc::new(Pool::new(
            self.driver.clone(),
            target,
            self.config.clone(),
        ));
        pools.insert(target.to_owned(), Arc::clone(&pool));
        pool
    }

    /// Snapshot of all pools created so far.
    ///
    /// Safe to call concurrently with pool creation; returns whatever
    /// existed at the locked instant.
    #[must_use]
    pub fn pools(&self) -> Vec<Arc<Pool<D>>> {
        self.pools.lock().values().cloned().collect()
    }

    /// Stats snapshot for every pool.
    #[must_use]
    pub fn stats(&self) -> Vec<PoolStats> {
        self.pools().iter().map(|pool| pool.stats()).collect()
    }

    /// Close the idle connections of every pool, leaving checked-out
    /// connections untouched.
    pub fn sweep_idle(&self) {
        for pool in self.pools() {
            pool.close_idle();
        }
    }

    /// Close every connection in every pool.
    ///
    /// Called once at process teardown; also runs when the registry is
    /// dropped.
    pub fn close_all(&self) {
        for pool in self.pools() {
            pool.close_all();
        }
    }
}

impl<D: Driver + Clone> Drop for PoolRegistry<D> {
    fn drop(&mut self) {
        self.close_all();
    }
}

impl<D: Driver + Clone> std::fmt::Debug for PoolRegistry<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PoolRegistry")
            .field("pools", &self.pools.lock().len())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
