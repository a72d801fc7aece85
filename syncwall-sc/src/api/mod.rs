//! HTTP control interface for the sync controller
//!
//! Exposes session-wide transport commands, sync status, and an SSE
//! event stream.

pub mod handlers;
pub mod sse;

use crate::registry::StreamRegistry;
use crate::state::SharedState;
use crate::sync::SyncSession;
use crate::transport::TransportController;
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

/// Shared application context passed to all handlers
#[derive(Clone)]
pub struct AppContext {
    pub state: Arc<SharedState>,
    pub registry: Arc<StreamRegistry>,
    pub session: Arc<SyncSession>,
    pub transport: Arc<TransportController>,
    /// Server port (reported by /health)
    pub port: u16,
}

/// Create the API router
pub fn create_router(ctx: AppContext) -> Router {
    Router::new()
        // Health check (no prefix for health endpoint)
        .route("/health", get(handlers::health))
        // API v1 routes
        .nest(
            "/api/v1",
            Router::new()
                // Bound registry
                .route("/streams", get(handlers::get_streams))
                // Sync session status
                .route("/sync/status", get(handlers::get_sync_status))
                // Transport control
                .route("/transport/play", post(handlers::play))
                .route("/transport/pause", post(handlers::pause))
                .route("/transport/seek", post(handlers::seek))
                // SSE events
                .route("/events", get(sse::event_stream)),
        )
        .with_state(ctx)
        // Enable CORS for local access
        .layer(CorsLayer::permissive())
}
