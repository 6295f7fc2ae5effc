//! News handlers

use crate::error::ApiError;
use crate::AppState;
use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    Json,
};
use news_core::{NewsError, NewsItem, NewsUpdate};
use serde::{Deserialize, Serialize};
use tracing::info;

#[derive(Debug, Serialize)]
pub struct NewsListResponse {
    count: usize,
    items: Vec<NewsItem>,
}

pub async fn list(State(state): State<AppState>) -> Result<Json<NewsListResponse>, ApiError> {
    let items = state.store.list().await?;
    Ok(Json(NewsListResponse {
        count: items.len(),
        items,
    }))
}

#[derive(Debug, Deserialize)]
pub struct CreateNewsRequest {
    title: Option<String>,
    content: Option<String>,
}

pub async fn create(
    State(state): State<AppState>,
    body: Result<Json<CreateNewsRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<NewsItem>), ApiError> {
    let Json(req_body) = body?;
    let title = req_body
        .title
        .ok_or_else(|| NewsError::validation("title is required"))?;
    let content = req_body.content.unwrap_or_default();

    let item = state.store.create(&title, &content).await?;
    info!("Created news item {}", item.id);

    Ok((StatusCode::CREATED, Json(item)))
}

pub async fn update(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
    body: Result<Json<NewsUpdate>, JsonRejection>,
) -> Result<Json<NewsItem>, ApiError> {
    let Path(id) = id?;
    let Json(fields) = body?;

    let item = state.store.update(id, &fields).await?;
    info!("Updated news item {}", id);

    Ok(Json(item))
}

#[derive(Debug, Serialize)]
pub struct DeleteNewsResponse {
    status: &'static str,
    id: i64,
}

pub async fn delete(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<DeleteNewsResponse>, ApiError> {
    let Path(id) = id?;

    state.store.delete(id).await?;
    info!("Deleted news item {}", id);

    Ok(Json(DeleteNewsResponse {
        status: "deleted",
        id,
    }))
}
