use crate::notifier::Notifier;
use axum::response::sse::Event;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use log::*;
use std::convert::Infallible;
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::AbortHandle;

/// Unique identifier for a connection (server-generated)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConnectionId(String);

impl ConnectionId {
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

/// Per-connection state
#[derive(Debug)]
pub struct ConnectionInfo {
    pub sender: UnboundedSender<Result<Event, Infallible>>,
    pub notifier: Notifier,
}

/// Registry of open SSE connections keyed by connection id
pub struct ConnectionRegistry {
    connections: DashMap<ConnectionId, ConnectionInfo>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self {
            connections: DashMap::new(),
        }
    }

    /// Register a new connection - O(1)
    pub fn register(
        &self,
        sender: UnboundedSender<Result<Event, Infallible>>,
        notifier: Notifier,
    ) -> ConnectionId {
        let connection_id = ConnectionId::new();

        self.connections
            .insert(connection_id.clone(), ConnectionInfo { sender, notifier });

        connection_id
    }

    /// Unregister a connection - O(1)
    pub fn unregister(&self, connection_id: &ConnectionId) {
        self.connections.remove(connection_id);
    }

    pub fn len(&self) -> usize {
        self.connections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }

    pub fn contains(&self, connection_id: &ConnectionId) -> bool {
        self.connections.contains_key(connection_id)
    }

    /// Send to one connection if its notifier accepts `published_at`.
    /// Returns whether the event was queued.
    pub fn send_to_connection(
        &self,
        connection_id: &ConnectionId,
        published_at: DateTime<Utc>,
        event: Event,
    ) -> bool {
        match self.connections.get_mut(connection_id) {
            Some(mut info) => Self::deliver(connection_id, &mut info, published_at, event),
            None => false,
        }
    }

    /// Send to every connection whose notifier accepts `published_at` - O(n).
    /// Returns how many connections the event was queued for.
    pub fn broadcast(&self, published_at: DateTime<Utc>, event: Event) -> usize {
        let mut delivered = 0;
        for mut entry in self.connections.iter_mut() {
            let (connection_id, info) = entry.pair_mut();
            if Self::deliver(connection_id, info, published_at, event.clone()) {
                delivered += 1;
            }
        }
        delivered
    }

    fn deliver(
        connection_id: &ConnectionId,
        info: &mut ConnectionInfo,
        published_at: DateTime<Utc>,
        event: Event,
    ) -> bool {
        if !info.notifier.observe(published_at) {
            trace!(
                "Connection {} already has an article at least as new, skipping",
                connection_id.as_str()
            );
            return false;
        }

        if let Err(e) = info.sender.send(Ok(event)) {
            warn!(
                "Failed to send event to connection {}: {}. Connection will be cleaned up.",
                connection_id.as_str(),
                e
            );
            return false;
        }
        true
    }
}

impl Default for ConnectionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Keeps a connection registered for as long as it is alive. Dropping the
/// guard (which happens when the client goes away and axum drops the response
/// stream) unregisters the connection and aborts any tasks tied to it.
pub struct ConnectionGuard {
    registry: Arc<ConnectionRegistry>,
    connection_id: ConnectionId,
    tasks: Vec<AbortHandle>,
}

impl ConnectionGuard {
    pub(crate) fn new(registry: Arc<ConnectionRegistry>, connection_id: ConnectionId) -> Self {
        Self {
            registry,
            connection_id,
            tasks: Vec::new(),
        }
    }

    pub fn connection_id(&self) -> &ConnectionId {
        &self.connection_id
    }

    /// Ties a background task's lifetime to this connection.
    pub fn attach_task(&mut self, task: AbortHandle) {
        self.tasks.push(task);
    }
}

impl Drop for ConnectionGuard {
    fn drop(&mut self) {
        debug!(
            "SSE connection {} closed, cleaning up",
            self.connection_id.as_str()
        );
        for task in &self.tasks {
            task.abort();
        }
        self.registry.unregister(&self.connection_id);
    }
}
