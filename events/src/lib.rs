//! Event system infrastructure for the news platform.
//!
//! This crate provides the event system that decouples domain logic from
//! infrastructure concerns (like SSE notifications).
//!
//! # Architecture
//!
//! - **DomainEvent**: Enum representing all business events in the system
//! - **EventHandler**: Trait for implementing event handlers
//! - **EventPublisher**: Publishes events to registered handlers
//!
//! This crate has no dependencies on internal crates (entity, domain, etc.),
//! avoiding circular dependencies. Entity data is carried as serialized JSON values.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Matches the id type of the entity crate.
pub type Id = String;

/// Domain events that represent business-level changes in the system.
/// These events are emitted when domain operations complete successfully.
#[derive(Debug, Clone)]
pub enum DomainEvent {
    /// Emitted when a new news article has been stored.
    /// Triggers SSE notifications so connected readers see the article immediately.
    NewsCreated {
        news_id: Id,
        /// Publish time of the article, used by subscribers to decide whether
        /// it is newer than anything they have already seen.
        published_at: DateTime<Utc>,
        /// Complete serialized news record, forwarded to clients as-is.
        news: Value,
    },
}

/// Trait for handling domain events.
/// Implementations can perform side effects like sending notifications,
/// updating caches, logging, etc.
#[async_trait]
pub trait EventHandler: Send + Sync {
    async fn handle(&self, event: &DomainEvent);
}

/// Publishes domain events to registered handlers.
/// Handlers are called sequentially in registration order.
///
/// Operations run through [`EventPublisher::sequenced`] or
/// [`EventPublisher::exclusive`] take turns: each one finishes, including
/// delivery of its event, before the next one starts. Clones share the turn.
#[derive(Clone)]
pub struct EventPublisher {
    handlers: Arc<Vec<Arc<dyn EventHandler>>>,
    turn: Arc<Mutex<()>>,
}

impl EventPublisher {
    pub fn new() -> Self {
        Self {
            handlers: Arc::new(Vec::new()),
            turn: Arc::new(Mutex::new(())),
        }
    }

    /// Register a new event handler.
    /// Note: This creates a new publisher instance with the additional handler.
    /// Store the returned publisher in your application state.
    pub fn with_handler(mut self, handler: Arc<dyn EventHandler>) -> Self {
        let mut handlers = (*self.handlers).clone();
        handlers.push(handler);
        self.handlers = Arc::new(handlers);
        self
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }

    /// Publish an event to all registered handlers, one after another.
    pub async fn publish(&self, event: DomainEvent) {
        for handler in self.handlers.iter() {
            handler.handle(&event).await;
        }
    }

    /// Runs `operation` and publishes the event it produces while holding the
    /// turn, so handlers see events in the order the operations ran.
    pub async fn sequenced<T, E, F>(&self, operation: F) -> Result<T, E>
    where
        F: FnOnce() -> Result<(T, DomainEvent), E>,
    {
        let _turn = self.turn.lock().await;
        let (value, event) = operation()?;
        self.publish(event).await;
        Ok(value)
    }

    /// Runs `operation` while no sequenced operation is in flight. Anything
    /// it observes has either been fully published or not started yet.
    pub async fn exclusive<T, F>(&self, operation: F) -> T
    where
        F: FnOnce() -> T,
    {
        let _turn = self.turn.lock().await;
        operation()
    }
}

impl Default for EventPublisher {
    fn default() -> Self {
        Self::new()
    }
}
