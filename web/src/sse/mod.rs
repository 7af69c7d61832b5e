//! SSE HTTP handler for the web layer.
//!
//! This module contains only the Axum handler for SSE endpoints.
//! The core SSE infrastructure (Manager, ConnectionRegistry, Message types)
//! lives in the `sse` crate so that domain event handlers can reach it
//! without depending on the web layer.

pub mod handler;
