//! Counter stores backing the rate limiter.
//!
//! Provides two [`crate::domain::ports::CounterStore`] implementations:
//! - [`RedisCounterStore`] - Shared counters for multi-instance deployments
//! - [`MemoryCounterStore`] - Process-local counters for development and tests

mod memory_counter;
mod redis_counter;

pub use memory_counter::MemoryCounterStore;
pub use redis_counter::RedisCounterStore;
