use crate::message::{Event as SseEvent, Message as SseMessage, MessageScope};
use crate::Manager;
use async_trait::async_trait;
use events::{DomainEvent, EventHandler};
use log::*;
use std::sync::Arc;

/// Handles domain events by converting them to SSE messages and broadcasting
/// them to every open connection. Each connection's notifier then decides
/// whether the article is new to that reader.
pub struct SseDomainEventHandler {
    sse_manager: Arc<Manager>,
}

impl SseDomainEventHandler {
    pub fn new(sse_manager: Arc<Manager>) -> Self {
        Self { sse_manager }
    }
}

#[async_trait]
impl EventHandler for SseDomainEventHandler {
    async fn handle(&self, event: &DomainEvent) {
        match event {
            DomainEvent::NewsCreated {
                news_id,
                published_at,
                news,
            } => {
                debug!("Handling NewsCreated event for news article {news_id}");

                let delivered = self.sse_manager.send_message(SseMessage {
                    event: SseEvent::NewsPublished {
                        published_at: *published_at,
                        news: news.clone(),
                    },
                    scope: MessageScope::Broadcast,
                });

                debug!("Sent news article {news_id} to {delivered} SSE connection(s)");
            }
        }
    }
}
