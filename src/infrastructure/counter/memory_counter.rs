//! In-process counter store.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

use crate::domain::errors::CounterStoreError;
use crate::domain::ports::CounterStore;

#[derive(Debug, Clone, Copy)]
struct Entry {
    count: u64,
    expires_at: Option<Instant>,
}

impl Entry {
    fn is_live(&self, now: Instant) -> bool {
        self.expires_at.is_none_or(|at| at > now)
    }
}

/// Counters held in a mutex-guarded map.
///
/// Atomic within one process only. Used when no Redis URL is configured and as the
/// store in tests. Expired entries are dropped lazily when touched and swept once
/// the map grows past [`MemoryCounterStore::SWEEP_THRESHOLD`] entries.
#[derive(Debug, Default)]
pub struct MemoryCounterStore {
    entries: Mutex<HashMap<String, Entry>>,
}

impl MemoryCounterStore {
    const SWEEP_THRESHOLD: usize = 10_000;

    pub fn new() -> Self {
        debug!("Using in-process counter store");
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, Entry>>, CounterStoreError> {
        self.entries
            .lock()
            .map_err(|_| CounterStoreError::Unavailable("counter map poisoned".to_string()))
    }
}

#[async_trait]
impl CounterStore for MemoryCounterStore {
    async fn increment(&self, key: &str) -> Result<u64, CounterStoreError> {
        let now = Instant::now();
        let mut entries = self.lock()?;

        if entries.len() > Self::SWEEP_THRESHOLD {
            entries.retain(|_, entry| entry.is_live(now));
        }

        let entry = entries.entry(key.to_string()).or_insert(Entry {
            count: 0,
            expires_at: None,
        });
        if !entry.is_live(now) {
            *entry = Entry {
                count: 0,
                expires_at: None,
            };
        }
        entry.count += 1;

        Ok(entry.count)
    }

    async fn expire_after(&self, key: &str, ttl: Duration) -> Result<(), CounterStoreError> {
        let now = Instant::now();
        let mut entries = self.lock()?;
        if let Some(entry) = entries.get_mut(key) {
            entry.expires_at = Some(now + ttl);
        }
        Ok(())
    }

    async fn time_to_live(&self, key: &str) -> Result<Option<Duration>, CounterStoreError> {
        let now = Instant::now();
        let entries = self.lock()?;
        Ok(entries
            .get(key)
            .filter(|entry| entry.is_live(now))
            .and_then(|entry| entry.expires_at)
            .map(|at| at.saturating_duration_since(now)))
    }

    async fn health_check(&self) -> bool {
        self.entries.lock().is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_increment_counts_up() {
        let store = MemoryCounterStore::new();

        assert_eq!(store.increment("k").await.unwrap(), 1);
        assert_eq!(store.increment("k").await.unwrap(), 2);
        assert_eq!(store.increment("other").await.unwrap(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_counter_resets_after_expiry() {
        let store = MemoryCounterStore::new();

        store.increment("k").await.unwrap();
        store.expire_after("k", Duration::from_secs(10)).await.unwrap();
        store.increment("k").await.unwrap();

        tokio::time::advance(Duration::from_secs(11)).await;

        assert_eq!(store.increment("k").await.unwrap(), 1);
        assert_eq!(store.time_to_live("k").await.unwrap(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_time_to_live_counts_down() {
        let store = MemoryCounterStore::new();

        store.increment("k").await.unwrap();
        assert_eq!(store.time_to_live("k").await.unwrap(), None);

        store.expire_after("k", Duration::from_secs(60)).await.unwrap();
        tokio::time::advance(Duration::from_secs(15)).await;

        assert_eq!(
            store.time_to_live("k").await.unwrap(),
            Some(Duration::from_secs(45))
        );
    }

    #[tokio::test]
    async fn test_expire_on_missing_key_is_noop() {
        let store = MemoryCounterStore::new();
        store
            .expire_after("missing", Duration::from_secs(5))
            .await
            .unwrap();
        assert_eq!(store.time_to_live("missing").await.unwrap(), None);
    }
}
