use serde::{Deserialize, Serialize};

use super::store::SegmentStore;

/// Session lifecycle phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    /// Normal operation, accepting chunks and commands
    Active,
    /// End received, finalizing
    Closing,
    /// Resources released, terminal
    Terminated,
}

/// Mutable per-session record, owned exclusively by the connection task
#[derive(Debug)]
pub struct SessionState {
    pub session_id: String,
    pub store: SegmentStore,
    /// Running transcript; replaced on change, never appended
    pub last_text: String,
    pub phase: Phase,
}

impl SessionState {
    pub fn new(session_id: String) -> Self {
        Self {
            session_id,
            store: SegmentStore::new(),
            last_text: String::new(),
            phase: Phase::Active,
        }
    }
}
