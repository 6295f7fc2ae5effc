//! In-memory news store (lost on restart)

use async_trait::async_trait;
use news_core::{NewsError, NewsItem, NewsStore, NewsUpdate, Result};
use tokio::sync::Mutex;
use tracing::debug;

/// News items kept in insertion order behind a mutex.
///
/// Ids come from a counter that only ever goes up, so deleted ids are
/// never handed out again.
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

struct Inner {
    items: Vec<NewsItem>,
    next_id: i64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                items: Vec::new(),
                next_id: 1,
            }),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl NewsStore for MemoryStore {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn list(&self) -> Result<Vec<NewsItem>> {
        let inner = self.inner.lock().await;
        Ok(inner.items.clone())
    }

    async fn create(&self, title: &str, content: &str) -> Result<NewsItem> {
        let mut inner = self.inner.lock().await;
        let item = NewsItem::new(inner.next_id, title, content);
        inner.next_id += 1;
        inner.items.push(item.clone());

        debug!("Created news item {} in memory", item.id);
        Ok(item)
    }

    async fn update(&self, id: i64, fields: &NewsUpdate) -> Result<NewsItem> {
        let mut inner = self.inner.lock().await;
        let item = inner
            .items
            .iter_mut()
            .find(|item| item.id == id)
            .ok_or(NewsError::NotFound(id))?;

        fields.apply_to(item);
        Ok(item.clone())
    }

    async fn delete(&self, id: i64) -> Result<()> {
        let mut inner = self.inner.lock().await;
        let index = inner
            .items
            .iter()
            .position(|item| item.id == id)
            .ok_or(NewsError::NotFound(id))?;

        inner.items.remove(index);
        debug!("Deleted news item {} from memory", id);
        Ok(())
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}
