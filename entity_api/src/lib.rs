use chrono::{Duration, Utc};
use log::*;

pub use entity::{news_records, Id};

pub mod clock;
pub mod news_store;

pub use clock::{Clock, SystemClock};
pub use news_store::{InMemoryNewsStore, NewsStore};

/// Fills `store` with the sample articles the platform ships with so a fresh
/// instance has something to show. Ids continue from whatever the store holds.
pub fn seed_store(store: &dyn NewsStore) {
    let now = Utc::now();

    let welcome = news_records::Model {
        id: String::new(),
        title: "Welcome to Our News Platform".to_string(),
        content: "This is the first news article on our platform. Stay tuned for more updates!"
            .to_string(),
        author: "Admin".to_string(),
        published_at: now,
        category: Some("General".to_string()),
        featured: true,
        is_read: false,
    };

    let migration = news_records::Model {
        id: String::new(),
        title: "Project Update: React Router Migration".to_string(),
        content: "We've successfully migrated from Remix to React Router v7. This brings improved \
                  performance and better developer experience."
            .to_string(),
        author: "Development Team".to_string(),
        published_at: now - Duration::days(1),
        category: Some("Development".to_string()),
        featured: false,
        is_read: false,
    };

    for record in [welcome, migration] {
        let seeded = store.insert(record);
        info!("Seeded news article {} ({})", seeded.id, seeded.title);
    }
}
