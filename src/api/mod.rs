//! HTTP surface
//!
//! - GET  /        - List registry items
//! - POST /        - Claim an item (`{"action": "claim", "rowIndex": n, "claimedBy": "..."}`)
//! - GET  /health  - Sheet availability and uptime

mod health;
mod items;

pub use health::health_check;
pub use items::{claim_item, list_items, not_found, ClaimRequest, ListItemsResponse};

use crate::registry::RegistryStore;
use axum::{extract::DefaultBodyLimit, routing::get, Router};
use std::sync::Arc;
use std::time::Instant;

/// Shared state for all registry endpoints
pub struct RegistryState {
    pub store: RegistryStore,
    pub start_time: Instant,
}

impl RegistryState {
    pub fn new(store: RegistryStore) -> Self {
        Self {
            store,
            start_time: Instant::now(),
        }
    }
}

/// Registry routes with the request body limit applied.
///
/// The limit is enforced by the body extractor so oversized requests still
/// get the JSON error envelope. The binary adds tracing and CORS.
pub fn build_router(state: Arc<RegistryState>, max_body_bytes: usize) -> Router {
    Router::new()
        .route("/", get(list_items).post(claim_item))
        .route("/health", get(health_check))
        .fallback(not_found)
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .with_state(state)
}
