//! HTTP layer: DTOs, handlers, middleware and route composition.
//!
//! # Modules
//!
//! - [`dto`] - Request/response bodies
//! - [`extract`] - Custom extractors (client IP)
//! - [`handlers`] - HTTP request handlers
//! - [`middleware`] - Origin guard, global throttle and tracing layers
//! - [`routes`] - Route configuration

pub mod dto;
pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod routes;
