//! Redis-backed counter store.

use async_trait::async_trait;
use redis::{AsyncCommands, Client, aio::ConnectionManager};
use std::time::Duration;
use tracing::{debug, info};

use crate::domain::errors::CounterStoreError;
use crate::domain::ports::CounterStore;

/// Counters stored in Redis with native `INCR` / `EXPIRE`.
///
/// Uses `ConnectionManager` for automatic reconnection. Unlike a cache, errors are
/// propagated: the rate limiter decides whether to fail open or closed.
#[derive(Clone)]
pub struct RedisCounterStore {
    conn: ConnectionManager,
}

impl RedisCounterStore {
    /// Connects to Redis and validates the connection with a PING.
    ///
    /// # Errors
    ///
    /// Returns [`CounterStoreError::Unavailable`] if the URL is invalid, the connection
    /// cannot be established, or the PING fails.
    pub async fn connect(redis_url: &str) -> Result<Self, CounterStoreError> {
        info!("Connecting to Redis counter store");

        let client = Client::open(redis_url).map_err(|e| {
            CounterStoreError::Unavailable(format!("Failed to create Redis client: {}", e))
        })?;

        let manager = ConnectionManager::new(client).await.map_err(|e| {
            CounterStoreError::Unavailable(format!("Failed to connect to Redis: {}", e))
        })?;

        let mut test_conn = manager.clone();
        test_conn
            .ping::<()>()
            .await
            .map_err(|e| CounterStoreError::Unavailable(format!("Redis PING failed: {}", e)))?;

        info!("✓ Connected to Redis");

        Ok(Self { conn: manager })
    }

    /// Deletes a counter. Used by the admin CLI.
    pub async fn reset(&self, key: &str) -> Result<bool, CounterStoreError> {
        let mut conn = self.conn.clone();
        let deleted: i64 = conn.del(key).await.map_err(command_error)?;
        Ok(deleted > 0)
    }

    /// Reads a counter without incrementing it. Used by the admin CLI.
    pub async fn peek(&self, key: &str) -> Result<Option<u64>, CounterStoreError> {
        let mut conn = self.conn.clone();
        conn.get::<_, Option<u64>>(key).await.map_err(command_error)
    }
}

fn command_error(e: redis::RedisError) -> CounterStoreError {
    if e.is_io_error() {
        CounterStoreError::Unavailable(e.to_string())
    } else {
        CounterStoreError::Command(e.to_string())
    }
}

#[async_trait]
impl CounterStore for RedisCounterStore {
    async fn increment(&self, key: &str) -> Result<u64, CounterStoreError> {
        let mut conn = self.conn.clone();
        let count: u64 = conn.incr(key, 1u64).await.map_err(command_error)?;
        debug!("INCR {} -> {}", key, count);
        Ok(count)
    }

    async fn expire_after(&self, key: &str, ttl: Duration) -> Result<(), CounterStoreError> {
        let mut conn = self.conn.clone();
        let seconds = ttl.as_secs().max(1) as i64;
        let _: bool = conn.expire(key, seconds).await.map_err(command_error)?;
        Ok(())
    }

    async fn time_to_live(&self, key: &str) -> Result<Option<Duration>, CounterStoreError> {
        let mut conn = self.conn.clone();
        // -2: missing key, -1: no expiry
        let ttl: i64 = conn.ttl(key).await.map_err(command_error)?;
        Ok((ttl > 0).then(|| Duration::from_secs(ttl as u64)))
    }

    async fn health_check(&self) -> bool {
        let mut conn = self.conn.clone();
        conn.ping::<()>().await.is_ok()
    }
}
