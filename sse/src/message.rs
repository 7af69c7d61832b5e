use crate::connection::ConnectionId;
use chrono::{DateTime, Utc};
use serde_json::Value;

#[derive(Debug, Clone)]
pub enum Event {
    /// A news article that is newer than anything the receiver has seen.
    /// Sent without an event name, so browsers dispatch it as a plain
    /// `message`; the `data` field carries the serialized record itself.
    NewsPublished {
        published_at: DateTime<Utc>,
        news: Value,
    },
}

impl Event {
    /// Publish time compared against each connection's notifier.
    pub fn published_at(&self) -> DateTime<Utc> {
        match self {
            Event::NewsPublished { published_at, .. } => *published_at,
        }
    }

    /// Body of the SSE `data` field.
    pub fn payload(&self) -> Result<String, serde_json::Error> {
        match self {
            Event::NewsPublished { news, .. } => serde_json::to_string(news),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Message {
    pub event: Event,
    pub scope: MessageScope,
}

#[derive(Debug, Clone)]
pub enum MessageScope {
    /// Send to a single connection
    Connection { connection_id: ConnectionId },
    /// Send to every connected client
    Broadcast,
}
