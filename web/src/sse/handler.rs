use crate::AppState;
use ::sse::connection::ConnectionId;
use ::sse::message::{Event as SseEvent, Message as SseMessage, MessageScope};
use ::sse::{Manager, Notifier};
use async_stream::stream;
use axum::extract::State;
use axum::response::sse::{Event, KeepAlive, Sse};
use domain::{news as NewsApi, NewsStore};
use futures::Stream;
use log::*;
use service::config::NotifierMode;
use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;

/// SSE handler that establishes a long-lived connection for news updates.
///
/// The connection starts from the newest article that exists right now, so a
/// client only ever hears about articles published after it connected. The
/// starting point is read and the connection registered while no create is
/// being announced, so every article is either already in the store or
/// delivered. The returned stream owns the connection guard; when the client
/// goes away axum drops the stream and the connection is unregistered.
pub(crate) async fn sse_handler(
    State(app_state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let (tx, mut rx) = mpsc::unbounded_channel();

    let mut guard = app_state
        .event_publisher
        .exclusive(|| {
            let notifier =
                Notifier::new(NewsApi::latest_published_at(app_state.news_store_ref()));
            app_state.sse_manager.register_connection(tx, notifier)
        })
        .await;

    debug!(
        "Establishing SSE connection {} in {} mode",
        guard.connection_id().as_str(),
        app_state.config.notifier_mode
    );

    if app_state.config.notifier_mode == NotifierMode::Poll {
        let poller = tokio::spawn(poll_latest_news(
            app_state.news_store(),
            Arc::clone(&app_state.sse_manager),
            guard.connection_id().clone(),
            app_state.config.notifier_poll_interval(),
        ));
        guard.attach_task(poller.abort_handle());
    }

    // Events arrive from the channel, either broadcast by the domain event
    // handler or sent by this connection's poller.
    let stream = stream! {
        let _guard = guard;
        while let Some(event) = rx.recv().await {
            yield event;
        }
    };

    Sse::new(stream).keep_alive(KeepAlive::default())
}

/// Re-reads the newest article every `period` and offers it to one connection.
/// The connection's notifier drops it unless it is newer than the last one sent.
async fn poll_latest_news(
    news_store: Arc<dyn NewsStore>,
    sse_manager: Arc<Manager>,
    connection_id: ConnectionId,
    period: Duration,
) {
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick completes immediately.
    interval.tick().await;

    loop {
        interval.tick().await;

        let Some(news) = NewsApi::latest(news_store.as_ref()) else {
            continue;
        };

        let news_value = match serde_json::to_value(&news) {
            Ok(value) => value,
            Err(e) => {
                error!("Failed to serialize News article {}: {e}", news.id);
                continue;
            }
        };

        let sent = sse_manager.send_message(SseMessage {
            event: SseEvent::NewsPublished {
                published_at: news.published_at,
                news: news_value,
            },
            scope: MessageScope::Connection {
                connection_id: connection_id.clone(),
            },
        });
        if sent > 0 {
            debug!(
                "Sent News article {} to SSE connection {}",
                news.id,
                connection_id.as_str()
            );
        }
    }
}
