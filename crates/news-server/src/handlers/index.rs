//! Service index

use axum::Json;
use serde_json::{json, Value};

/// Static map of the available endpoints.
pub async fn index() -> Json<Value> {
    Json(json!({
        "service": "news-server",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "GET /": "This endpoint map",
            "GET /news": "List all news items",
            "POST /news": "Create a news item ({title, content?})",
            "PUT /news/{id}": "Update a news item ({title?, content?})",
            "DELETE /news/{id}": "Delete a news item",
            "GET /db-health": "Check storage connectivity",
        }
    }))
}
