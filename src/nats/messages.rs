use serde::{Deserialize, Serialize};

/// Latest-transcript update published to the broadcast subject
#[derive(Debug, Serialize, Deserialize)]
pub struct TranscriptUpdate {
    pub session_id: String,
    pub transcript: String,
    /// Unix timestamp (seconds)
    pub ts: i64,
}
