//! HTTP middleware for request processing and protection.
//!
//! Provides the origin guard, the process-wide throttle and request tracing.

pub mod origin;
pub mod rate_limit;
pub mod tracing;
