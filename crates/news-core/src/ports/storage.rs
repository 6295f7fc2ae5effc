//! Storage traits for persistence

use crate::{NewsItem, NewsUpdate, Result};
use async_trait::async_trait;

/// News store
///
/// Implemented by every backend the server can run against. Handlers only
/// ever see this trait, so swapping backends does not change the HTTP
/// contract.
#[async_trait]
pub trait NewsStore: Send + Sync {
    /// Short backend name for logs and health messages.
    fn name(&self) -> &'static str;

    /// All items, oldest first.
    async fn list(&self) -> Result<Vec<NewsItem>>;

    /// Insert a new item and return it with its assigned id.
    async fn create(&self, title: &str, content: &str) -> Result<NewsItem>;

    /// Apply a partial update. Fails with `NotFound` for unknown ids.
    async fn update(&self, id: i64, fields: &NewsUpdate) -> Result<NewsItem>;

    /// Remove an item. Fails with `NotFound` if nothing was removed.
    async fn delete(&self, id: i64) -> Result<()>;

    /// Check that the backend is reachable.
    async fn ping(&self) -> Result<()>;
}
