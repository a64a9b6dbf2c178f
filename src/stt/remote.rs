use std::time::Duration;

use base64::Engine as _;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{RecognitionError, Recognizer, TextSpan};
use crate::audio::AudioClip;

/// Request sent to the recognizer service (audio as base64-encoded WAV)
#[derive(Debug, Serialize)]
struct TranscribeRequest {
    audio_wav: String,
    sample_rate: u32,
    channels: u16,
}

#[derive(Debug, Deserialize)]
struct TranscribeResponse {
    #[serde(default)]
    spans: Vec<TextSpan>,
    #[serde(default)]
    error: Option<String>,
}

/// Recognizer backed by a NATS request/reply service
///
/// Built without a client when NATS is unreachable at startup; every pass
/// then reports not-ready until the process is restarted with a live broker.
pub struct NatsRecognizer {
    client: Option<async_nats::Client>,
    subject: String,
    timeout_secs: u64,
}

impl NatsRecognizer {
    pub fn new(client: Option<async_nats::Client>, subject: String, timeout_secs: u64) -> Self {
        Self {
            client,
            subject,
            timeout_secs,
        }
    }
}

#[async_trait::async_trait]
impl Recognizer for NatsRecognizer {
    async fn ready(&self) -> bool {
        match &self.client {
            Some(client) => {
                client.connection_state() == async_nats::connection::State::Connected
            }
            None => false,
        }
    }

    async fn transcribe(&self, clip: &AudioClip) -> Result<Vec<TextSpan>, RecognitionError> {
        let client = self.client.as_ref().ok_or(RecognitionError::NotReady)?;

        let wav_bytes = clip
            .to_wav_bytes()
            .map_err(|e| RecognitionError::Engine(format!("wav encode: {}", e)))?;

        let request = TranscribeRequest {
            audio_wav: base64::engine::general_purpose::STANDARD.encode(&wav_bytes),
            sample_rate: clip.sample_rate,
            channels: clip.channels,
        };
        let payload =
            serde_json::to_vec(&request).map_err(|e| RecognitionError::Engine(e.to_string()))?;

        debug!(
            "recognition request: {} ({} wav bytes, {:.1}s)",
            self.subject,
            wav_bytes.len(),
            clip.duration_seconds()
        );

        let reply = tokio::time::timeout(
            Duration::from_secs(self.timeout_secs),
            client.request(self.subject.clone(), payload.into()),
        )
        .await
        .map_err(|_| RecognitionError::Timeout(self.timeout_secs))?
        .map_err(|e| RecognitionError::Engine(e.to_string()))?;

        let response: TranscribeResponse = serde_json::from_slice(&reply.payload)
            .map_err(|e| RecognitionError::Engine(format!("malformed reply: {}", e)))?;

        if let Some(error) = response.error {
            return Err(RecognitionError::Engine(error));
        }

        Ok(response.spans)
    }
}
