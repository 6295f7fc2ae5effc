//! News item types

use serde::{Deserialize, Serialize};

/// A single news entry.
///
/// `id` is assigned by the store at creation and never changes afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsItem {
    pub id: i64,
    pub title: String,
    pub content: String,
}

impl NewsItem {
    pub fn new(id: i64, title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            content: content.into(),
        }
    }
}

/// Partial update: fields left as `None` keep their current value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsUpdate {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
}

impl NewsUpdate {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.content.is_none()
    }

    /// Apply the present fields to `item`. The id is never touched.
    pub fn apply_to(&self, item: &mut NewsItem) {
        if let Some(title) = &self.title {
            item.title = title.clone();
        }
        if let Some(content) = &self.content {
            item.content = content.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_json_shape() {
        let item = NewsItem::new(1, "Hello", "");
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "id": 1, "title": "Hello", "content": "" })
        );
    }

    #[test]
    fn test_partial_update_keeps_title() {
        let mut item = NewsItem::new(3, "Hello", "");
        let update: NewsUpdate = serde_json::from_str(r#"{"content":"World"}"#).unwrap();
        update.apply_to(&mut item);

        assert_eq!(item, NewsItem::new(3, "Hello", "World"));
    }

    #[test]
    fn test_empty_update_is_noop() {
        let mut item = NewsItem::new(2, "Title", "Body");
        let update: NewsUpdate = serde_json::from_str("{}").unwrap();
        assert!(update.is_empty());

        update.apply_to(&mut item);
        assert_eq!(item, NewsItem::new(2, "Title", "Body"));
    }

    #[test]
    fn test_update_ignores_unknown_fields() {
        let update: NewsUpdate =
            serde_json::from_str(r#"{"id":99,"title":"New"}"#).unwrap();
        assert_eq!(update.title.as_deref(), Some("New"));
        assert_eq!(update.content, None);
    }
}
