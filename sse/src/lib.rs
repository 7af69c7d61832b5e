//! Server-Sent Events (SSE) infrastructure for real-time news updates.
//!
//! This crate provides an app-wide SSE implementation that pushes newly
//! published articles from the backend to every connected reader.
//!
//! # Architecture
//!
//! - **One registry entry per connection**: each `/sse` request registers a
//!   connection in a `DashMap`-backed `ConnectionRegistry`.
//! - **Per-connection notifier**: every connection remembers the newest
//!   `publishedAt` it has seen. An article is delivered only when it is
//!   strictly newer, so a reader never receives the same or an older article.
//! - **Broadcast and Connection scopes**: messages either fan out to all
//!   connections or target one connection (used by the polling mode).
//! - **Ephemeral messages**: if nobody is connected, the event is dropped;
//!   readers see fresh data on their next page load.
//!
//! # Message Flow
//!
//! 1. Client opens an SSE connection via the `/sse` endpoint
//! 2. The connection is registered with the publish time of the current
//!    newest article as its starting point
//! 3. When an article is created the domain layer publishes
//!    `DomainEvent::NewsCreated`
//! 4. `SseDomainEventHandler` turns it into a broadcast `Message`
//! 5. Each connection's `Notifier` decides whether the article is newer and,
//!    if so, the event is queued on that connection's channel
//! 6. When the client disconnects, the `ConnectionGuard` attached to the
//!    response stream unregisters the connection and stops any poll task
//!
//! # Modules
//!
//! - `connection`: ConnectionRegistry, ConnectionId and ConnectionGuard
//! - `manager`: High-level message routing (delegates to ConnectionRegistry)
//! - `message`: Event and scope definitions
//! - `notifier`: Strictly-newer filter applied per connection
//! - `domain_event_handler`: Bridge from domain events to SSE messages

pub mod connection;
pub mod domain_event_handler;
pub mod manager;
pub mod message;
pub mod notifier;

pub use domain_event_handler::SseDomainEventHandler;
pub use manager::Manager;
pub use notifier::Notifier;
