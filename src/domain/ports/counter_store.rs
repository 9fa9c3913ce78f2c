//! Shared counter store trait.

use async_trait::async_trait;
use std::time::Duration;

use crate::domain::errors::CounterStoreError;

/// Atomic, TTL-capable key/value counters shared by every handler invocation.
///
/// Implementations must make [`CounterStore::increment`] atomic across concurrent
/// callers (and across processes for shared deployments). Calling
/// [`CounterStore::expire_after`] twice for the same key is harmless.
///
/// # Implementations
///
/// - [`crate::infrastructure::counter::RedisCounterStore`] - Shared Redis counters
/// - [`crate::infrastructure::counter::MemoryCounterStore`] - Single-process counters
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CounterStore: Send + Sync {
    /// Increments the counter at `key`, creating it at 1 if absent or expired.
    ///
    /// Returns the value after incrementing.
    async fn increment(&self, key: &str) -> Result<u64, CounterStoreError>;

    /// Attaches an expiry of `ttl` to `key`.
    async fn expire_after(&self, key: &str, ttl: Duration) -> Result<(), CounterStoreError>;

    /// Remaining lifetime of `key`.
    ///
    /// Returns `Ok(None)` when the key is missing or has no expiry attached.
    async fn time_to_live(&self, key: &str) -> Result<Option<Duration>, CounterStoreError>;

    /// Checks whether the store is reachable.
    async fn health_check(&self) -> bool;
}
