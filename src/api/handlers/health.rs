//! Handler for health check endpoint.

use axum::{Json, extract::State, http::StatusCode};

use crate::api::dto::health::{CheckStatus, HealthChecks, HealthResponse};
use crate::state::AppState;

/// Returns service health status with component checks.
///
/// # Endpoint
///
/// `GET /health`
///
/// # Response Codes
///
/// - **200 OK**: Counter store reachable
/// - **503 Service Unavailable**: Counter store unreachable
///
/// # Response
///
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0",
///   "checks": {
///     "counter_store": { "status": "ok" },
///     "channels": { "status": "ok", "message": "email, webhook" }
///   }
/// }
/// ```
pub async fn health_handler(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, (StatusCode, Json<HealthResponse>)> {
    let counter_store = check_counter_store(&state).await;
    let channels = check_channels(&state);

    let all_healthy = counter_store.status == "ok" && channels.status == "ok";

    let response = HealthResponse {
        status: if all_healthy { "healthy" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: HealthChecks {
            counter_store,
            channels,
        },
    };

    if all_healthy {
        Ok(Json(response))
    } else {
        Err((StatusCode::SERVICE_UNAVAILABLE, Json(response)))
    }
}

async fn check_counter_store(state: &AppState) -> CheckStatus {
    if state.rate_limiter.health_check().await {
        CheckStatus {
            status: "ok".to_string(),
            message: None,
        }
    } else {
        CheckStatus {
            status: "error".to_string(),
            message: Some("Counter store unreachable".to_string()),
        }
    }
}

fn check_channels(state: &AppState) -> CheckStatus {
    let ids = state.pipeline.channel_ids();
    if ids.is_empty() {
        CheckStatus {
            status: "error".to_string(),
            message: Some("No delivery channel configured".to_string()),
        }
    } else {
        CheckStatus {
            status: "ok".to_string(),
            message: Some(ids.join(", ")),
        }
    }
}
