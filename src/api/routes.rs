//! API route configuration.

use crate::api::handlers::{
    health_handler, preview_handler, send_email_handler, webhook_handler,
};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

/// Public routes. Gate enforcement happens in the handlers' services and the
/// layers applied by [`crate::routes::app_router`].
///
/// # Endpoints
///
/// - `POST /send-email`      - Contact form submission
/// - `POST /discord-webhook` - Webhook relay
/// - `GET  /preview-email`   - Sample notification
/// - `GET  /health`          - Counter store and channel status
pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/send-email", post(send_email_handler))
        .route("/discord-webhook", post(webhook_handler))
        .route("/preview-email", get(preview_handler))
        .route("/health", get(health_handler))
}
