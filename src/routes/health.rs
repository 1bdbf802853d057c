//! Database-backed health check.
//!
//! Every request runs a fresh probe; results are never cached. A reachable
//! database yields 200 `{"status":"ok"}`, anything else 500 `{"status":"error"}`.

use axum::{extract::State, Json};
use serde::Serialize;
use tracing::instrument;

use crate::error::AppError;
use crate::state::AppState;

pub const MESSAGE_HEALTHY: &str = "API connected to database!";

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub message: &'static str,
}

/// Health check handler.
#[instrument(name = "health::health", skip(state))]
pub async fn health(State(state): State<AppState>) -> Result<Json<HealthResponse>, AppError> {
    let status = state.prober.probe().await;

    if status.connected {
        Ok(Json(HealthResponse {
            status: "ok",
            message: MESSAGE_HEALTHY,
        }))
    } else {
        tracing::warn!(details = ?status.details, "Health check failed");
        Err(AppError::DatabaseUnavailable)
    }
}
