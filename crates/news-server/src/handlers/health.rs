//! Storage health check

use crate::AppState;
use axum::{extract::State, http::StatusCode, Json};
use serde_json::{json, Value};
use tracing::{error, info};

pub async fn db_health(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    let backend = state.store.name();

    match state.store.ping().await {
        Ok(()) => {
            info!("Health check passed for {} backend", backend);
            (
                StatusCode::OK,
                Json(json!({
                    "status": "ok",
                    "message": format!("{} backend is reachable", backend),
                })),
            )
        }
        Err(e) => {
            error!("Health check failed for {} backend: {}", backend, e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "status": "error",
                    "message": e.to_string(),
                })),
            )
        }
    }
}
