//! Handler for the contact form endpoint.

use axum::{Json, extract::State, http::StatusCode};
use validator::Validate;

use crate::api::dto::contact::ContactRequest;
use crate::api::dto::message::MessageResponse;
use crate::api::extract::ClientIp;
use crate::domain::entities::Submission;
use crate::error::AppError;
use crate::state::AppState;

/// Runs a contact form submission through the dispatch pipeline.
///
/// # Endpoint
///
/// `POST /send-email`
///
/// # Request Body
///
/// ```json
/// {
///   "from": "jane@example.com",
///   "subject": "Project inquiry",
///   "body": "Hi! **Markdown** or <b>HTML</b> both work.",
///   "name": "Jane",
///   "recaptchaToken": "03AGdBq2..."
/// }
/// ```
///
/// # Response Codes
///
/// - **201 Created**: Delivered to every required channel
/// - **400 Bad Request**: Body validation failed, malformed or undeliverable address
/// - **403 Forbidden**: Bot verification failed
/// - **429 Too Many Requests**: Rate limit exceeded (`Retry-After` set)
/// - **502 Bad Gateway**: No address oracle reachable
/// - **500 Internal Server Error**: A required channel failed
pub async fn send_email_handler(
    State(state): State<AppState>,
    ClientIp(client_ip): ClientIp,
    Json(payload): Json<ContactRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), AppError> {
    state
        .pipeline
        .check_rate(&client_ip)
        .await
        .map_err(|e| AppError::from_pipeline(e, state.debug))?;

    payload.validate()?;

    let submission = Submission::from(payload);

    state
        .pipeline
        .dispatch(&submission, &client_ip)
        .await
        .map_err(|e| AppError::from_pipeline(e, state.debug))?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            message: "Your message was sent successfully!",
        }),
    ))
}
