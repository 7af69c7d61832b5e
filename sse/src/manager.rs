use crate::connection::{ConnectionGuard, ConnectionRegistry};
use crate::message::{Message as SseMessage, MessageScope};
use crate::notifier::Notifier;
use axum::response::sse::Event;
use log::*;
use std::sync::Arc;

pub struct Manager {
    registry: Arc<ConnectionRegistry>,
}

impl Manager {
    pub fn new() -> Self {
        Self {
            registry: Arc::new(ConnectionRegistry::new()),
        }
    }

    /// Register a new connection. The returned guard keeps it registered
    /// until dropped.
    pub fn register_connection(
        &self,
        sender: tokio::sync::mpsc::UnboundedSender<Result<Event, std::convert::Infallible>>,
        notifier: Notifier,
    ) -> ConnectionGuard {
        let connection_id = self.registry.register(sender, notifier);
        info!(
            "Registered new SSE connection {} ({} open)",
            connection_id.as_str(),
            self.registry.len()
        );
        ConnectionGuard::new(Arc::clone(&self.registry), connection_id)
    }

    pub fn connection_count(&self) -> usize {
        self.registry.len()
    }

    /// Send a message based on its scope. Returns how many connections it was
    /// queued for.
    pub fn send_message(&self, message: SseMessage) -> usize {
        let published_at = message.event.published_at();

        let event_data = match message.event.payload() {
            Ok(json) => json,
            Err(e) => {
                error!("Failed to serialize SSE event: {e}");
                return 0;
            }
        };

        // Unnamed, so clients receive it through `EventSource.onmessage`.
        let event = Event::default().data(event_data);

        match message.scope {
            MessageScope::Connection { connection_id } => {
                usize::from(
                    self.registry
                        .send_to_connection(&connection_id, published_at, event),
                )
            }
            MessageScope::Broadcast => self.registry.broadcast(published_at, event),
        }
    }
}

impl Default for Manager {
    fn default() -> Self {
        Self::new()
    }
}
