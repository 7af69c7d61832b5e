//! This module re-exports various items from the `entity_api` crate.
//!
//! The purpose of this re-export is to ensure that consumers of the `domain` crate do not need to
//! directly depend on the `entity_api` crate. By re-exporting these items, we provide a clear and
//! consistent interface for working with the news store within the domain layer, while the
//! underlying implementation details remain in the `entity_api` crate.
pub use entity_api::{
    news_records, seed_store, Clock, Id, InMemoryNewsStore, NewsStore, SystemClock,
};

pub use events;

pub mod error;
pub mod news;
