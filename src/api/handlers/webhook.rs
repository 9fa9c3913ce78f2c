//! Handler for the webhook relay endpoint.

use axum::{
    Json,
    body::Bytes,
    extract::State,
    http::HeaderMap,
};

use crate::api::dto::message::MessageResponse;
use crate::api::extract::ClientIp;
use crate::error::AppError;
use crate::state::AppState;

pub const API_KEY_HEADER: &str = "x-api-key";

/// Forwards a caller-built webhook payload unchanged.
///
/// # Endpoint
///
/// `POST /discord-webhook`
///
/// # Response Codes
///
/// - **200 OK**: Forwarded and accepted by the target
/// - **400 Bad Request**: Empty, malformed, or without `content`/`embeds`
/// - **401 Unauthorized**: `X-API-Key` missing or wrong (when a key is configured)
/// - **429 Too Many Requests**: Rate limit exceeded
/// - **502 Bad Gateway**: Target unreachable or rejected the payload
pub async fn webhook_handler(
    State(state): State<AppState>,
    ClientIp(client_ip): ClientIp,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<MessageResponse>, AppError> {
    let presented_key = headers.get(API_KEY_HEADER).and_then(|v| v.to_str().ok());

    state
        .relay
        .relay(body, presented_key, &client_ip)
        .await
        .map_err(|e| AppError::from_relay(e, state.debug))?;

    Ok(Json(MessageResponse {
        message: "Webhook sent",
    }))
}
