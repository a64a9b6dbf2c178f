use super::handlers;
use super::state::AppState;
use super::ws;
use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;

/// Create the HTTP router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Streaming transcription
        .route("/ws/transcribe", get(ws::ws_transcribe))
        // Session queries
        .route(
            "/sessions/:session_id/status",
            get(handlers::get_session_status),
        )
        .route(
            "/sessions/:session_id/transcript",
            get(handlers::get_session_transcript),
        )
        // Add tracing middleware for request logging
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
