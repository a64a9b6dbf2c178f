use std::sync::Arc;

use crate::config::SttSettings;
use crate::nats::BroadcastStore;
use crate::session::SessionRegistry;
use crate::stt::SttEngine;

/// Shared application state for HTTP and WebSocket handlers
#[derive(Clone)]
pub struct AppState {
    /// Live sessions (session_id -> handle)
    pub registry: Arc<SessionRegistry>,
    /// Transcoder + recognizer shared by all sessions
    pub engine: Arc<SttEngine>,
    /// Optional best-effort transcript sink
    pub sink: Option<Arc<dyn BroadcastStore>>,
    /// Trigger/rotation tuning
    pub stt: Arc<SttSettings>,
}
