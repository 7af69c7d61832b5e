use domain::events::EventPublisher;
use domain::NewsStore;
use log::*;
use service::config::NotifierMode;
use std::ops::Deref;
use std::sync::Arc;
use tokio::net::TcpListener;

mod controller;
mod error;
mod params;
pub(crate) mod router;
mod sse;

pub use error::{Error, PageError, Result};

/// Web-layer state handed to every handler. Wraps the infrastructure-only
/// `service::AppState` and adds the pieces that connect handlers to
/// real-time delivery.
#[derive(Clone)]
pub struct AppState {
    service_state: service::AppState,
    pub sse_manager: Arc<::sse::Manager>,
    pub event_publisher: EventPublisher,
}

impl AppState {
    pub fn new(
        service_state: service::AppState,
        sse_manager: &Arc<::sse::Manager>,
        event_publisher: EventPublisher,
    ) -> Self {
        Self {
            service_state,
            sse_manager: Arc::clone(sse_manager),
            event_publisher,
        }
    }

    pub fn news_store(&self) -> Arc<dyn NewsStore> {
        Arc::clone(&self.service_state.news_store)
    }
}

impl Deref for AppState {
    type Target = service::AppState;

    fn deref(&self) -> &Self::Target {
        &self.service_state
    }
}

/// Builds the publisher that domain operations announce events through. In
/// push mode new articles go straight to the SSE connections; in poll mode
/// each connection finds them on its own timer, so nothing is subscribed.
pub fn event_publisher(
    notifier_mode: NotifierMode,
    sse_manager: &Arc<::sse::Manager>,
) -> EventPublisher {
    match notifier_mode {
        NotifierMode::Push => EventPublisher::new().with_handler(Arc::new(
            ::sse::SseDomainEventHandler::new(Arc::clone(sse_manager)),
        )),
        NotifierMode::Poll => EventPublisher::new(),
    }
}

pub async fn init_server(app_state: AppState) -> std::io::Result<()> {
    let listen_addr = app_state.config.listen_addr();

    info!(
        "Server starting... listening for connections on http://{listen_addr} (notifier mode: {})",
        app_state.config.notifier_mode
    );

    let listener = TcpListener::bind(&listen_addr).await?;
    let router = router::define_routes(app_state);

    axum::serve(listener, router).await
}
