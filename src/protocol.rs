//! WebSocket message protocol
//!
//! Inbound text frames carry JSON control messages selected by a
//! case-insensitive `command` field; anything unparseable degrades to
//! `Unknown` instead of failing the session. Outbound events are JSON
//! objects tagged by `type`.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Control message parsed from an inbound text frame
#[derive(Debug, Clone, PartialEq)]
pub enum ControlCommand {
    /// Finalize the current buffer into a `final` transcript
    Flush,
    /// End the session and close the connection
    End,
    /// Anything else, carrying the raw payload for the echo reply
    Unknown(Value),
}

impl ControlCommand {
    pub fn parse(raw: &str) -> Self {
        let payload: Value = match serde_json::from_str(raw) {
            Ok(v) => v,
            Err(_) => json!({ "command": "unknown", "raw": raw }),
        };

        let command = payload
            .get("command")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_ascii_lowercase();

        match command.as_str() {
            "flush" => ControlCommand::Flush,
            "end" => ControlCommand::End,
            _ => ControlCommand::Unknown(payload),
        }
    }
}

/// Event sent back to the client, serialized as `{"type": ..., ...}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum OutboundEvent {
    Ack {
        buffered_count: usize,
    },
    Partial {
        text: String,
    },
    Final {
        text: String,
        full_text: String,
    },
    Error {
        error: String,
    },
    Info {
        msg: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        payload: Option<Value>,
    },
}

impl OutboundEvent {
    pub fn error(error: impl Into<String>) -> Self {
        OutboundEvent::Error {
            error: error.into(),
        }
    }

    pub fn info(msg: impl Into<String>) -> Self {
        OutboundEvent::Info {
            msg: msg.into(),
            payload: None,
        }
    }
}
