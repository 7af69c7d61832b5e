//! News article records held by the news store.

use crate::Id;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[schema(as = entity::news_records::Model)]
#[serde(rename_all = "camelCase")]
pub struct Model {
    pub id: Id,

    pub title: String,

    pub content: String,

    pub author: String,

    /// Set once when the article is created and never changed afterwards.
    #[schema(value_type = String, format = DateTime)]
    pub published_at: DateTime<Utc>,

    /// Free-form label such as "General" or "Development".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    #[serde(default)]
    pub featured: bool,

    #[serde(default)]
    pub is_read: bool,
}

/// Fields supplied by a caller when creating a new article. The store assigns
/// `id`, `published_at` and `is_read`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewNews {
    pub title: String,
    pub content: String,
    pub author: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub featured: bool,
}

/// A partial update. Only fields that are `Some` are merged into the stored
/// record; `id` and `published_at` are not updatable.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewsUpdate {
    pub title: Option<String>,
    pub content: Option<String>,
    pub author: Option<String>,
    pub category: Option<String>,
    pub featured: Option<bool>,
    pub is_read: Option<bool>,
}

impl Model {
    /// Builds a fresh, unread record from creation fields.
    pub fn from_new(id: Id, published_at: DateTime<Utc>, new_news: NewNews) -> Self {
        Self {
            id,
            title: new_news.title,
            content: new_news.content,
            author: new_news.author,
            published_at,
            category: new_news.category,
            featured: new_news.featured,
            is_read: false,
        }
    }

    /// Shallow-merges the provided fields of `update` into this record.
    pub fn apply(&mut self, update: NewsUpdate) {
        if let Some(title) = update.title {
            self.title = title;
        }
        if let Some(content) = update.content {
            self.content = content;
        }
        if let Some(author) = update.author {
            self.author = author;
        }
        if let Some(category) = update.category {
            self.category = Some(category);
        }
        if let Some(featured) = update.featured {
            self.featured = featured;
        }
        if let Some(is_read) = update.is_read {
            self.is_read = is_read;
        }
    }
}
