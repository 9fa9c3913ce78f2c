//! HTTP boundary error type.
//!
//! Every failure leaving a handler is an [`AppError`] rendered as
//! `{ "error": { "code", "message", "details" } }`. Upstream detail goes into
//! `details` only when debug output is enabled.

use axum::{
    Json,
    http::{HeaderValue, StatusCode, header::RETRY_AFTER},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Value, json};
use validator::ValidationErrors;

use crate::application::services::{PipelineError, RelayError};

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorInfo,
}

#[derive(Debug, Serialize)]
pub struct ErrorInfo {
    pub code: &'static str,
    pub message: String,
    pub details: Value,
}

#[derive(Debug)]
pub enum AppError {
    Validation { message: String, details: Value },
    Unauthorized { message: String, details: Value },
    Forbidden { message: String, details: Value },
    TooManyRequests { message: String, retry_after_secs: u64 },
    BadGateway { message: String, details: Value },
    Internal { message: String, details: Value },
}

impl AppError {
    pub fn bad_request(message: impl Into<String>, details: Value) -> Self {
        Self::Validation {
            message: message.into(),
            details,
        }
    }
    pub fn unauthorized(message: impl Into<String>, details: Value) -> Self {
        Self::Unauthorized {
            message: message.into(),
            details,
        }
    }
    pub fn forbidden(message: impl Into<String>, details: Value) -> Self {
        Self::Forbidden {
            message: message.into(),
            details,
        }
    }
    pub fn too_many_requests(retry_after_secs: u64) -> Self {
        Self::TooManyRequests {
            message: "Too many requests, please try again later".to_string(),
            retry_after_secs,
        }
    }
    pub fn bad_gateway(message: impl Into<String>, details: Value) -> Self {
        Self::BadGateway {
            message: message.into(),
            details,
        }
    }
    pub fn internal(message: impl Into<String>, details: Value) -> Self {
        Self::Internal {
            message: message.into(),
            details,
        }
    }

    /// Maps a pipeline rejection. Only the address format message is echoed as-is.
    pub fn from_pipeline(err: PipelineError, debug: bool) -> Self {
        let details = |detail: Value| if debug { detail } else { json!({}) };
        let reason = err.to_string();

        match err {
            PipelineError::RateLimited { retry_after_secs } => {
                Self::too_many_requests(retry_after_secs)
            }
            PipelineError::BotSuspected => Self::forbidden("Bot verification failed", json!({})),
            PipelineError::InvalidAddress => {
                Self::bad_request("Invalid email address format", json!({ "field": "from" }))
            }
            PipelineError::UnverifiableAddress => {
                Self::bad_request(
                    "Email is invalid, disposable, or does not exist",
                    json!({}),
                )
            }
            PipelineError::ValidationUnavailable => Self::bad_gateway(
                "Email validation is temporarily unavailable",
                details(json!({ "reason": reason })),
            ),
            PipelineError::DeliveryFailed(report) => Self::internal(
                "Failed to send message",
                details(json!({ "outcomes": report.outcomes })),
            ),
        }
    }

    pub fn from_relay(err: RelayError, debug: bool) -> Self {
        let details = |detail: Value| if debug { detail } else { json!({}) };
        let reason = err.to_string();

        match err {
            RelayError::Unauthorized => Self::unauthorized("Invalid or missing API key", json!({})),
            RelayError::RateLimited { retry_after_secs } => {
                Self::too_many_requests(retry_after_secs)
            }
            RelayError::EmptyPayload | RelayError::MissingContent => {
                Self::bad_request(reason, json!({}))
            }
            RelayError::Malformed(reason) => {
                Self::bad_request("Invalid webhook payload", json!({ "reason": reason }))
            }
            RelayError::NotConfigured => Self::internal("Webhook is not configured", json!({})),
            RelayError::Delivery(e) => Self::bad_gateway(
                "Failed to send webhook",
                details(json!({ "reason": e.to_string() })),
            ),
        }
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        let fields: serde_json::Map<String, Value> = errors
            .field_errors()
            .into_iter()
            .map(|(field, errs)| {
                let messages: Vec<String> = errs
                    .iter()
                    .map(|e| {
                        e.message
                            .as_ref()
                            .map(|m| m.to_string())
                            .unwrap_or_else(|| e.code.to_string())
                    })
                    .collect();
                (field.to_string(), json!(messages))
            })
            .collect();

        Self::bad_request("Validation failed", json!({ "fields": fields }))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let mut retry_after = None;

        let (status, code, message, details) = match self {
            AppError::Validation { message, details } => (
                StatusCode::BAD_REQUEST,
                "validation_error",
                message,
                details,
            ),
            AppError::Unauthorized { message, details } => {
                (StatusCode::UNAUTHORIZED, "unauthorized", message, details)
            }
            AppError::Forbidden { message, details } => {
                (StatusCode::FORBIDDEN, "forbidden", message, details)
            }
            AppError::TooManyRequests {
                message,
                retry_after_secs,
            } => {
                retry_after = Some(retry_after_secs);
                (
                    StatusCode::TOO_MANY_REQUESTS,
                    "rate_limited",
                    message,
                    json!({ "retry_after": retry_after_secs }),
                )
            }
            AppError::BadGateway { message, details } => {
                (StatusCode::BAD_GATEWAY, "upstream_error", message, details)
            }
            AppError::Internal { message, details } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                message,
                details,
            ),
        };

        let body = ErrorBody {
            error: ErrorInfo {
                code,
                message,
                details,
            },
        };

        let mut response = (status, Json(body)).into_response();
        if let Some(secs) = retry_after {
            response
                .headers_mut()
                .insert(RETRY_AFTER, HeaderValue::from(secs));
        }
        response
    }
}
