//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `POST /send-email`      - Contact form submission
//! - `POST /discord-webhook` - Webhook relay
//! - `GET  /preview-email`   - Sample notification
//! - `GET  /health`          - Health check
//!
//! # Middleware (outermost first)
//!
//! - **Tracing** - Structured request/response logging
//! - **CORS** - Header negotiation and preflight answers
//! - **Origin guard** - 403 for disallowed `Origin` headers
//! - **Global throttle** - Process-wide token bucket

use crate::api;
use crate::api::middleware::{origin, rate_limit, tracing};
use crate::state::AppState;
use axum::{Router, middleware};

/// Process-wide throttle settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThrottleSettings {
    pub per_second: u64,
    pub burst: u32,
}

/// Constructs the application router with all routes and middleware.
///
/// # Arguments
///
/// - `state` - shared application state injected into all handlers
/// - `throttle` - global token bucket; built here so its lifetime is the router's
pub fn app_router(state: AppState, throttle: ThrottleSettings) -> Router {
    let mut routes = api::routes::public_routes();

    match rate_limit::global_layer(throttle.per_second, throttle.burst) {
        Some(layer) => routes = routes.layer(layer),
        None => ::tracing::warn!("Global throttle disabled: rate and burst must be non-zero"),
    }

    let cors = state.cors.layer();

    routes
        .layer(middleware::from_fn_with_state(state.clone(), origin::layer))
        .layer(cors)
        .with_state(state)
        .layer(tracing::layer())
}
