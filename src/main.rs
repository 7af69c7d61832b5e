use domain::{InMemoryNewsStore, NewsStore};
use log::*;
use service::{config::Config, logging::Logger};
use std::sync::Arc;

#[tokio::main]
async fn main() {
    let config = Config::new();
    Logger::init_logger(&config as &Config);

    info!(
        "Starting news platform [{} environment, {} notifier]",
        config.runtime_env(),
        config.notifier_mode
    );

    let news_store: Arc<dyn NewsStore> = Arc::new(InMemoryNewsStore::new());
    if config.seed_sample_news {
        domain::seed_store(news_store.as_ref());
    }

    let sse_manager = Arc::new(sse::Manager::new());
    let event_publisher = web::event_publisher(config.notifier_mode, &sse_manager);

    let service_state = service::AppState::new(config, &news_store);
    let app_state = web::AppState::new(service_state, &sse_manager, event_publisher);

    if let Err(e) = web::init_server(app_state).await {
        error!("Server stopped unexpectedly: {e}");
        std::process::exit(1);
    }
}
