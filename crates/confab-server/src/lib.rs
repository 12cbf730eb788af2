//! HTTP surface for the Confab memory service.

pub mod api;

use axum::Router;
use axum::routing::get;
use confab_memory::MemoryStore;
use std::sync::Arc;

/// Build the service router over a shared store handle.
///
/// The store is injected rather than ambient so each deployment constructs
/// exactly one at startup and hands it to whatever surfaces need it.
pub fn router(store: Arc<MemoryStore>) -> Router {
    Router::new()
        .route("/health", get(api::health))
        .route("/api/memory", get(api::load_memory).post(api::append_turn))
        .with_state(store)
}
