use crate::error::{Error, FieldErrors};
use crate::news_records::{Model, NewNews, NewsUpdate};
use crate::NewsStore;
use chrono::{DateTime, Utc};
use events::{DomainEvent, EventPublisher};
use log::*;
use std::fmt;
use std::str::FromStr;

/// The two ways a client may change the read state of an article.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReadAction {
    MarkRead,
    ToggleRead,
}

impl FromStr for ReadAction {
    type Err = Error;

    fn from_str(action: &str) -> Result<Self, Self::Err> {
        match action {
            "mark-read" => Ok(ReadAction::MarkRead),
            "toggle-read" => Ok(ReadAction::ToggleRead),
            _ => Err(Error::invalid()),
        }
    }
}

impl fmt::Display for ReadAction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ReadAction::MarkRead => write!(f, "mark-read"),
            ReadAction::ToggleRead => write!(f, "toggle-read"),
        }
    }
}

/// All articles, newest first.
pub fn find_all(store: &dyn NewsStore) -> Vec<Model> {
    store.list()
}

pub fn find_by_id(store: &dyn NewsStore, id: &str) -> Result<Model, Error> {
    store.get(id).ok_or_else(|| {
        error!("News article with id {id} not found");
        Error::not_found()
    })
}

/// Fetches an article for display, marking it as read on the way.
pub fn read(store: &dyn NewsStore, id: &str) -> Result<Model, Error> {
    let news = find_by_id(store, id)?;
    if news.is_read {
        return Ok(news);
    }
    mark_read(store, id)
}

/// Checks that the required fields are present and not blank. Every missing
/// field is reported, not just the first.
pub fn validate(new_news: &NewNews) -> Result<(), Error> {
    let mut field_errors = FieldErrors::new();

    if new_news.title.trim().is_empty() {
        field_errors.add("title", "Title is required");
    }
    if new_news.content.trim().is_empty() {
        field_errors.add("content", "Content is required");
    }
    if new_news.author.trim().is_empty() {
        field_errors.add("author", "Author is required");
    }

    if field_errors.is_empty() {
        Ok(())
    } else {
        Err(field_errors.into())
    }
}

/// Validates and stores a new article, then announces it to event subscribers.
///
/// Storing and announcing happen as one turn of `event_publisher`, so
/// subscribers receive new articles in the order they were stored.
pub async fn create(
    store: &dyn NewsStore,
    event_publisher: &EventPublisher,
    new_news: NewNews,
) -> Result<Model, Error> {
    validate(&new_news)?;

    event_publisher
        .sequenced(|| -> Result<_, Error> {
            let news = store.create(new_news);
            debug!("Created News article: {news:?}");

            let event = DomainEvent::NewsCreated {
                news_id: news.id.clone(),
                published_at: news.published_at,
                news: serde_json::to_value(&news)?,
            };
            Ok((news, event))
        })
        .await
}

pub fn mark_read(store: &dyn NewsStore, id: &str) -> Result<Model, Error> {
    store.mark_read(id).ok_or_else(|| {
        error!("Cannot mark News article {id} as read: not found");
        Error::not_found()
    })
}

pub fn toggle_read(store: &dyn NewsStore, id: &str) -> Result<Model, Error> {
    store.toggle_read(id).ok_or_else(|| {
        error!("Cannot toggle read state of News article {id}: not found");
        Error::not_found()
    })
}

/// Checks that a request named the article it wants to change. An empty id
/// counts as missing.
pub fn require_news_id(news_id: Option<&str>) -> Result<&str, Error> {
    match news_id {
        Some(id) if !id.is_empty() => Ok(id),
        _ => {
            let mut field_errors = FieldErrors::new();
            field_errors.add("newsId", "News ID is required");
            Err(field_errors.into())
        }
    }
}

pub fn update_read_state(
    store: &dyn NewsStore,
    id: &str,
    action: ReadAction,
) -> Result<Model, Error> {
    match action {
        ReadAction::MarkRead => mark_read(store, id),
        ReadAction::ToggleRead => toggle_read(store, id),
    }
}

pub fn update(store: &dyn NewsStore, id: &str, update: NewsUpdate) -> Result<Model, Error> {
    store.update(id, update).ok_or_else(|| {
        error!("News article with id {id} not found");
        Error::not_found()
    })
}

pub fn delete_by_id(store: &dyn NewsStore, id: &str) -> Result<(), Error> {
    if store.delete(id) {
        Ok(())
    } else {
        error!("Cannot delete News article {id}: not found");
        Err(Error::not_found())
    }
}

pub fn unread_count(store: &dyn NewsStore) -> usize {
    store.unread_count()
}

pub fn latest(store: &dyn NewsStore) -> Option<Model> {
    store.latest()
}

/// Publish time of the newest article, or `None` when there are no articles.
pub fn latest_published_at(store: &dyn NewsStore) -> Option<DateTime<Utc>> {
    store.latest().map(|news| news.published_at)
}
