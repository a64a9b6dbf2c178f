//! HTTP and WebSocket surface
//!
//! - GET /ws/transcribe?session_id=... - streaming transcription socket
//! - GET /sessions/:id/status - session phase and buffer depth
//! - GET /sessions/:id/transcript - latest transcript for a live session
//! - GET /health - recognizer/broadcast availability

mod handlers;
mod routes;
mod state;
mod ws;

pub use routes::create_router;
pub use state::AppState;
