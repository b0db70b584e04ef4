use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde_json::{json, Value};
use tracing::warn;

use crate::dashboard::{dashboard_stats, DashboardStats};
use crate::identity::Identity;

use super::AppState;

/// `GET /api/dashboard`. Always 200; an unreachable datastore yields the
/// empty summary.
pub async fn dashboard(State(state): State<AppState>, identity: Identity) -> Json<DashboardStats> {
    Json(dashboard_stats(state.store.as_ref(), &identity).await)
}

/// `GET /health`
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    match state.store.health_check().await {
        Ok(now) => (
            StatusCode::OK,
            Json(json!({ "healthy": true, "timestamp": now })),
        ),
        Err(err) => {
            warn!(error = %err, "Health check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "healthy": false, "error": "datastore unavailable" })),
            )
        }
    }
}
