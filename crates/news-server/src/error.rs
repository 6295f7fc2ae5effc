//! Error responses for HTTP handlers

use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use news_core::NewsError;
use serde_json::json;

/// Error returned by handlers, rendered as `{"error": message}`.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

impl From<NewsError> for ApiError {
    fn from(e: NewsError) -> Self {
        let status = match &e {
            NewsError::Validation(_) => StatusCode::BAD_REQUEST,
            NewsError::NotFound(_) => StatusCode::NOT_FOUND,
            NewsError::ConnectionFailed { .. } | NewsError::Backend(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        if e.is_client_error() {
            tracing::debug!("Request rejected: {}", e);
        } else {
            tracing::error!("Storage failure: {}", e);
        }

        ApiError::new(status, e.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        NewsError::validation(format!(
            "Request body must be a JSON object: {}",
            rejection.body_text()
        ))
        .into()
    }
}

// Non-numeric ids can never match an item
impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        tracing::debug!("Unroutable news id: {}", rejection.body_text());
        ApiError::new(StatusCode::NOT_FOUND, "News item not found")
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "error": self.message,
        }));
        (self.status, body).into_response()
    }
}
