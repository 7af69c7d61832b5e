use crate::clock::{Clock, SystemClock};
use entity::news_records::{Model, NewNews, NewsUpdate};
use entity::Id;
use log::*;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

/// Repository of news records.
///
/// Lookups of unknown ids return `None` (or `false` for `delete`) rather than
/// an error. Implementations do not validate field contents; that is left to
/// the caller. Every mutation is visible to all reads that follow it.
pub trait NewsStore: Send + Sync {
    /// All records, newest `published_at` first.
    fn list(&self) -> Vec<Model>;

    fn get(&self, id: &str) -> Option<Model>;

    /// Stores a new, unread record stamped with the current time.
    fn create(&self, new_news: NewNews) -> Model;

    /// Stores a fully built record under a freshly assigned id, keeping its
    /// `published_at` and read state.
    fn insert(&self, record: Model) -> Model;

    fn mark_read(&self, id: &str) -> Option<Model>;

    fn toggle_read(&self, id: &str) -> Option<Model>;

    fn update(&self, id: &str, update: NewsUpdate) -> Option<Model>;

    fn delete(&self, id: &str) -> bool;

    fn unread_count(&self) -> usize;

    /// The record with the greatest `published_at`, if any.
    fn latest(&self) -> Option<Model>;
}

#[derive(Default)]
struct Inner {
    records: HashMap<Id, Model>,
    // Ids sorted by published_at, newest first. Equal timestamps keep the
    // most recently inserted record in front.
    order: Vec<Id>,
    // Last id handed out. Never decreases, so ids are not reused after a delete.
    last_id: u64,
}

impl Inner {
    fn next_id(&mut self) -> Id {
        self.last_id += 1;
        self.last_id.to_string()
    }

    fn insert_ordered(&mut self, record: Model) {
        let records = &self.records;
        let index = self.order.partition_point(|id| {
            records
                .get(id)
                .is_some_and(|existing| existing.published_at > record.published_at)
        });
        self.order.insert(index, record.id.clone());
        self.records.insert(record.id.clone(), record);
    }

    fn modify<F>(&mut self, id: &str, f: F) -> Option<Model>
    where
        F: FnOnce(&mut Model),
    {
        let record = self.records.get_mut(id)?;
        f(record);
        Some(record.clone())
    }
}

/// `NewsStore` kept entirely in process memory.
pub struct InMemoryNewsStore {
    inner: RwLock<Inner>,
    clock: Arc<dyn Clock>,
}

impl InMemoryNewsStore {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            inner: RwLock::new(Inner::default()),
            clock,
        }
    }

    /// Builds a store that already holds `records`, keeping their ids. New ids
    /// are allocated after the largest numeric id present. When an id appears
    /// more than once the last record with that id wins.
    pub fn with_records(records: Vec<Model>, clock: Arc<dyn Clock>) -> Self {
        let mut inner = Inner::default();
        for record in records {
            if let Ok(numeric_id) = record.id.parse::<u64>() {
                inner.last_id = inner.last_id.max(numeric_id);
            }
            if inner.records.contains_key(&record.id) {
                inner.order.retain(|id| id != &record.id);
            }
            inner.insert_ordered(record);
        }

        Self {
            inner: RwLock::new(inner),
            clock,
        }
    }

    pub fn len(&self) -> usize {
        self.inner.read().records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for InMemoryNewsStore {
    fn default() -> Self {
        Self::new()
    }
}

impl NewsStore for InMemoryNewsStore {
    fn list(&self) -> Vec<Model> {
        let inner = self.inner.read();
        inner
            .order
            .iter()
            .filter_map(|id| inner.records.get(id).cloned())
            .collect()
    }

    fn get(&self, id: &str) -> Option<Model> {
        self.inner.read().records.get(id).cloned()
    }

    fn create(&self, new_news: NewNews) -> Model {
        let mut inner = self.inner.write();
        // Stamped under the lock so publish times follow id order.
        let published_at = self.clock.now();
        let id = inner.next_id();
        let record = Model::from_new(id, published_at, new_news);

        debug!("Inserting News record: {record:?}");
        inner.insert_ordered(record.clone());
        record
    }

    fn insert(&self, mut record: Model) -> Model {
        let mut inner = self.inner.write();
        record.id = inner.next_id();
        inner.insert_ordered(record.clone());
        record
    }

    fn mark_read(&self, id: &str) -> Option<Model> {
        self.inner.write().modify(id, |record| record.is_read = true)
    }

    fn toggle_read(&self, id: &str) -> Option<Model> {
        self.inner
            .write()
            .modify(id, |record| record.is_read = !record.is_read)
    }

    fn update(&self, id: &str, update: NewsUpdate) -> Option<Model> {
        self.inner.write().modify(id, |record| record.apply(update))
    }

    fn delete(&self, id: &str) -> bool {
        let mut inner = self.inner.write();
        if inner.records.remove(id).is_none() {
            return false;
        }
        inner.order.retain(|existing| existing != id);
        true
    }

    fn unread_count(&self) -> usize {
        self.inner
            .read()
            .records
            .values()
            .filter(|record| !record.is_read)
            .count()
    }

    fn latest(&self) -> Option<Model> {
        let inner = self.inner.read();
        inner
            .order
            .first()
            .and_then(|id| inner.records.get(id).cloned())
    }
}
