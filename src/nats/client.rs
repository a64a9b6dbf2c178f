use anyhow::{Context, Result};
use async_nats::Client;
use tracing::info;

use super::messages::TranscriptUpdate;

/// Best-effort sink for the latest transcript of a session
///
/// Publishing is outside the session's correctness contract; callers log and
/// swallow failures rather than surfacing them to the client.
#[async_trait::async_trait]
pub trait BroadcastStore: Send + Sync {
    /// Record the latest transcript for a session
    async fn set(&self, session_id: &str, text: &str) -> Result<()>;

    /// Broadcast a transcript update to subscribers
    async fn publish(&self, session_id: &str, text: &str) -> Result<()>;
}

pub struct NatsBroadcast {
    client: Client,
}

impl NatsBroadcast {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Connect to NATS server
    pub async fn connect(url: &str) -> Result<Self> {
        info!("Connecting to NATS at {}", url);

        let client = async_nats::connect(url)
            .await
            .context("Failed to connect to NATS")?;

        info!("Connected to NATS successfully");

        Ok(Self { client })
    }
}

#[async_trait::async_trait]
impl BroadcastStore for NatsBroadcast {
    async fn set(&self, session_id: &str, text: &str) -> Result<()> {
        let subject = format!("transcript.{}", session_id);

        self.client
            .publish(subject, text.as_bytes().to_vec().into())
            .await
            .context("Failed to publish latest transcript")?;

        Ok(())
    }

    async fn publish(&self, session_id: &str, text: &str) -> Result<()> {
        let update = TranscriptUpdate {
            session_id: session_id.to_string(),
            transcript: text.to_string(),
            ts: chrono::Utc::now().timestamp(),
        };
        let payload = serde_json::to_vec(&update)?;

        self.client
            .publish("transcripts", payload.into())
            .await
            .context("Failed to broadcast transcript update")?;

        Ok(())
    }
}
