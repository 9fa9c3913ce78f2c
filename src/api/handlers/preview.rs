//! Handler for the notification preview.

use axum::{extract::State, response::Html};
use serde_json::json;

use crate::domain::entities::{NotificationDocument, SiteMetadata};
use crate::domain::ports::NotificationRenderer;
use crate::error::AppError;
use crate::state::AppState;

/// Renders the fixed sample notification with the trusted preview path.
///
/// # Endpoint
///
/// `GET /preview-email`
pub async fn preview_handler(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    let site = SiteMetadata::current(&state.site.app_name, &state.site.site_url);
    let document = NotificationDocument::preview(&site);

    state.preview_renderer.render(&document).map(Html).map_err(|e| {
        tracing::error!("Preview render failed: {}", e);
        AppError::internal(
            "Failed to render email template",
            if state.debug {
                json!({ "reason": e.to_string() })
            } else {
                json!({})
            },
        )
    })
}
