//! Origin guard, the first gate every request passes.

use axum::{
    extract::{Request, State},
    http::header::ORIGIN,
    middleware::Next,
    response::Response,
};
use serde_json::json;

use crate::{error::AppError, state::AppState};

/// Rejects requests whose `Origin` header is present but not allow-listed.
///
/// Requests without an `Origin` header (server-to-server calls, curl) pass.
/// Header negotiation for allowed origins is left to the CORS layer.
///
/// # Errors
///
/// Returns `403 Forbidden` before any other gate runs.
///
/// # Example
///
/// ```rust,ignore
/// let app = Router::new()
///     .route("/send-email", post(send_email_handler))
///     .layer(middleware::from_fn_with_state(state.clone(), origin::layer));
/// ```
pub async fn layer(
    State(st): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    if let Some(origin) = req.headers().get(ORIGIN) {
        let origin = origin.to_str().unwrap_or_default();
        if !st.cors.is_origin_allowed(origin) {
            tracing::warn!(origin = %origin, "Rejected request from disallowed origin");
            return Err(AppError::forbidden(
                "Origin not allowed",
                json!({ "origin": origin }),
            ));
        }
    }

    Ok(next.run(req).await)
}
