//! HTTP handlers for the telemetry endpoints.

use crate::metrics::{MetricsProvider, MetricsSnapshot};
use axum::{extract::State, http::StatusCode, response::Json};
use std::sync::Arc;
use tracing::error;

/// Collect a fresh snapshot for this request.
pub async fn get_snapshot<P: MetricsProvider>(
    State(provider): State<Arc<P>>,
) -> Result<Json<MetricsSnapshot>, StatusCode> {
    match provider.collect_snapshot().await {
        Ok(snapshot) => Ok(Json(snapshot)),
        Err(e) => {
            error!("Failed to collect snapshot: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Health check endpoint, independent of probe state.
pub async fn health_check() -> Json<bool> {
    Json(true)
}
