//! Process-wide throttle using the token bucket algorithm.

use governor::clock::QuantaInstant;
use governor::middleware::NoOpMiddleware;
use std::sync::Arc;
use tower_governor::{
    GovernorLayer, governor::GovernorConfigBuilder, key_extractor::GlobalKeyExtractor,
};

/// Creates the global throttle shared by every client.
///
/// Complements the per-bucket fixed-window limiter: this layer caps total
/// throughput of the process, the per-bucket limiter caps each client.
///
/// # Limits
///
/// - **Rate**: `per_second` requests per second
/// - **Burst**: `burst` requests
///
/// Requests exceeding the limit receive `429 Too Many Requests`.
///
/// Returns `None` if either value is zero.
///
/// # Example
///
/// ```rust,ignore
/// if let Some(throttle) = rate_limit::global_layer(5, 10) {
///     router = router.layer(throttle);
/// }
/// ```
pub fn global_layer(
    per_second: u64,
    burst: u32,
) -> Option<GovernorLayer<GlobalKeyExtractor, NoOpMiddleware<QuantaInstant>, axum::body::Body>> {
    if per_second == 0 || burst == 0 {
        return None;
    }

    let replenish_ms = (1000 / per_second).max(1);
    let governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .key_extractor(GlobalKeyExtractor)
            .per_millisecond(replenish_ms)
            .burst_size(burst)
            .finish()?,
    );

    Some(GovernorLayer::new(governor_conf))
}
