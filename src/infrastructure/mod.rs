//! Infrastructure layer for external integrations.
//!
//! Implements the collaborator traits from [`crate::domain::ports`].
//!
//! # Modules
//!
//! - [`counter`] - Rate limiter counter stores (Redis and in-process)
//! - [`oracles`] - HTTP clients for the bot-scoring and address oracles
//! - [`channels`] - Email and webhook delivery channels plus their I/O primitives

pub mod channels;
pub mod counter;
pub mod oracles;
