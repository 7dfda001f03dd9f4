//! Endpoints de health.

use axum::{Json, extract::State, http::StatusCode};
use serde::Serialize;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self::up()
    }
}

impl HealthResponse {
    pub fn up() -> Self {
        Self {
            status: "UP".to_string(),
            detail: None,
        }
    }

    pub fn down(detail: impl Into<String>) -> Self {
        Self {
            status: "DOWN".to_string(),
            detail: Some(detail.into()),
        }
    }
}

/// GET /health
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse::default())
}

/// GET /health/upstream
/// Llama al upstream de traduccion; DOWN incluye el error del upstream.
pub async fn upstream_health(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    match state.translations().upstream_health().await {
        Ok(()) => (StatusCode::OK, Json(HealthResponse::up())),
        Err(err) => {
            tracing::warn!(error = %err, "Upstream health check failed");
            let status =
                StatusCode::from_u16(err.http_status()).unwrap_or(StatusCode::SERVICE_UNAVAILABLE);
            (status, Json(HealthResponse::down(err.to_string())))
        },
    }
}
