use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET / - liveness check
pub async fn root() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// GET /health - liveness plus a database round-trip
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    match state.items.health_check().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "status": "ok",
                "database": "ok",
                "version": env!("CARGO_PKG_VERSION"),
            })),
        ),
        Err(e) => {
            tracing::error!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "status": "degraded",
                    "database": "unavailable",
                    "version": env!("CARGO_PKG_VERSION"),
                })),
            )
        }
    }
}
