//! Fixed-window rate limiting.

use std::sync::Arc;
use tracing::{debug, error, warn};

use crate::domain::entities::{RateDecision, RateLimitKey, RateLimitPolicy};
use crate::domain::errors::CounterStoreError;
use crate::domain::ports::CounterStore;

/// What a gate does when the counter store cannot be reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureMode {
    /// Treat the request as rejected. Used in production.
    Closed,
    /// Admit the request and log a warning. Used for local development.
    Open,
}

/// Fixed-window counter over a shared [`CounterStore`].
///
/// The first increment in a window attaches the expiry. Two callers that both
/// observe `count == 1` both set the same expiry, which is harmless. Every call
/// increments, so no request passes unrecorded.
pub struct RateLimiter {
    store: Arc<dyn CounterStore>,
}

impl RateLimiter {
    pub fn new(store: Arc<dyn CounterStore>) -> Self {
        Self { store }
    }

    /// Records one request for `key` and decides whether it is admitted.
    ///
    /// Rejected decisions carry the remaining TTL of the window, or the full window
    /// length when the TTL cannot be read.
    ///
    /// # Errors
    ///
    /// Returns [`CounterStoreError`] if the increment (or the first expiry) fails.
    /// Callers apply their [`FailureMode`].
    pub async fn allow(
        &self,
        key: &RateLimitKey,
        policy: RateLimitPolicy,
    ) -> Result<RateDecision, CounterStoreError> {
        let storage_key = key.storage_key();
        let count = self.store.increment(&storage_key).await?;

        if count == 1 {
            self.store.expire_after(&storage_key, policy.window()).await?;
        }

        if count <= policy.limit() {
            debug!(key = %key, count, limit = policy.limit(), "Rate limit admitted");
            return Ok(RateDecision::admit(count));
        }

        let window_secs = policy.window().as_secs();
        let retry_after = match self.store.time_to_live(&storage_key).await {
            Ok(Some(ttl)) => ttl.as_secs(),
            Ok(None) => {
                // Counter outlived its expiry (lost EXPIRE); re-attach so the key cannot lock forever.
                warn!(key = %key, "Rate limit counter had no expiry, re-attaching");
                if let Err(e) = self.store.expire_after(&storage_key, policy.window()).await {
                    warn!(key = %key, "Failed to re-attach expiry: {}", e);
                }
                window_secs
            }
            Err(e) => {
                warn!(key = %key, "Failed to read rate limit TTL: {}", e);
                window_secs
            }
        };

        Ok(RateDecision::reject(count, retry_after))
    }

    pub async fn health_check(&self) -> bool {
        self.store.health_check().await
    }
}

/// A limiter bound to one bucket, its policy and the deployment's failure mode.
pub struct RateGate {
    limiter: Arc<RateLimiter>,
    bucket: String,
    policy: RateLimitPolicy,
    failure_mode: FailureMode,
}

impl RateGate {
    pub fn new(
        limiter: Arc<RateLimiter>,
        bucket: impl Into<String>,
        policy: RateLimitPolicy,
        failure_mode: FailureMode,
    ) -> Self {
        Self {
            limiter,
            bucket: bucket.into(),
            policy,
            failure_mode,
        }
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    pub fn policy(&self) -> RateLimitPolicy {
        self.policy
    }

    /// Checks the gate for `client`, applying the failure mode on store errors.
    ///
    /// Never fails: a store error becomes either an admit (open) or a rejection
    /// for the whole window (closed).
    pub async fn check(&self, client: &str) -> RateDecision {
        let key = RateLimitKey::new(self.bucket.clone(), client);

        match self.limiter.allow(&key, self.policy).await {
            Ok(decision) => {
                if !decision.admitted {
                    warn!(
                        key = %key,
                        count = decision.count,
                        retry_after = decision.retry_after_secs,
                        "Rate limit exceeded"
                    );
                }
                decision
            }
            Err(e) => match self.failure_mode {
                FailureMode::Open => {
                    warn!(key = %key, "Rate limiter unavailable, failing open: {}", e);
                    RateDecision::admit(0)
                }
                FailureMode::Closed => {
                    error!(key = %key, "Rate limiter unavailable, failing closed: {}", e);
                    RateDecision::reject(0, self.policy.window().as_secs())
                }
            },
        }
    }
}
