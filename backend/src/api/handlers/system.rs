use crate::api::models::{ComponentStatus, HealthResponse};
use axum::{extract::State, Json};
use chrono::Utc;

use super::AppState;

/// Handler for GET /health - Liveness plus a database ping
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let db = state.db.clone();
    let database = match tokio::task::spawn_blocking(move || db.ping()).await {
        Ok(Ok(())) => ComponentStatus::Ok,
        Ok(Err(e)) => {
            tracing::warn!(error = %e, "Health check: database unavailable");
            ComponentStatus::Unavailable
        }
        Err(e) => {
            tracing::error!(error = %e, "Health check: database probe panicked");
            ComponentStatus::Unavailable
        }
    };

    let status = if database == ComponentStatus::Ok { "ok" } else { "degraded" };

    Json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: Utc::now().timestamp(),
        database,
    })
}
