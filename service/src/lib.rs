use config::Config;
use entity_api::NewsStore;
use std::sync::Arc;

pub mod config;
pub mod logging;

// Service-level state containing only infrastructure concerns
// Needs to implement Clone to be able to be passed into Router as State
#[derive(Clone)]
pub struct AppState {
    pub news_store: Arc<dyn NewsStore>,
    pub config: Config,
}

impl AppState {
    pub fn new(app_config: Config, news_store: &Arc<dyn NewsStore>) -> Self {
        Self {
            news_store: Arc::clone(news_store),
            config: app_config,
        }
    }

    pub fn news_store_ref(&self) -> &dyn NewsStore {
        self.news_store.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use entity_api::InMemoryNewsStore;

    #[test]
    fn app_state_shares_the_news_store() {
        let store: Arc<dyn NewsStore> = Arc::new(InMemoryNewsStore::new());
        let config = Config::parse_from(["news_platform_rs"]);

        let app_state = AppState::new(config, &store);
        entity_api::seed_store(app_state.news_store_ref());

        assert_eq!(store.list().len(), 2);
        assert_eq!(Arc::strong_count(&store), 2);
    }
}
