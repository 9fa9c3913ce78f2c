//! Rate limiter bookkeeping types.

use std::fmt;
use std::time::Duration;

/// Window used when a configured window is zero or negative.
pub const DEFAULT_WINDOW: Duration = Duration::from_secs(60);

/// Composite counter key: a logical bucket (e.g. `email`) plus a client identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RateLimitKey {
    pub bucket: String,
    pub client: String,
}

impl RateLimitKey {
    pub fn new(bucket: impl Into<String>, client: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            client: client.into(),
        }
    }

    /// Key used in the counter store (`ratelimit:<bucket>:<client>`).
    pub fn storage_key(&self) -> String {
        let client = self.client.trim_start_matches('[').trim_end_matches(']');
        format!("ratelimit:{}:{}", self.bucket, client)
    }
}

impl fmt::Display for RateLimitKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.bucket, self.client)
    }
}

/// Requests allowed per fixed window.
///
/// Construction normalizes invalid input: a non-positive limit becomes 1 and a
/// non-positive window becomes [`DEFAULT_WINDOW`]. There is no way to express
/// "unlimited".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitPolicy {
    limit: u64,
    window: Duration,
}

impl RateLimitPolicy {
    pub fn new(limit: i64, window_secs: i64) -> Self {
        let limit = if limit <= 0 { 1 } else { limit as u64 };
        let window = if window_secs <= 0 {
            DEFAULT_WINDOW
        } else {
            Duration::from_secs(window_secs as u64)
        };
        Self { limit, window }
    }

    pub fn limit(&self) -> u64 {
        self.limit
    }

    pub fn window(&self) -> Duration {
        self.window
    }
}

/// Result of a single limiter check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateDecision {
    pub admitted: bool,
    /// Seconds until the window resets. Zero when admitted.
    pub retry_after_secs: u64,
    pub count: u64,
}

impl RateDecision {
    pub fn admit(count: u64) -> Self {
        Self {
            admitted: true,
            retry_after_secs: 0,
            count,
        }
    }

    pub fn reject(count: u64, retry_after_secs: u64) -> Self {
        Self {
            admitted: false,
            retry_after_secs: retry_after_secs.max(1),
            count,
        }
    }
}
