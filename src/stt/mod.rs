//! Speech recognition capability
//!
//! The `Recognizer` is an explicit capability object handed to the session
//! pipeline instead of an ambient global. Readiness is a distinct, retryable
//! condition: a not-ready engine reports an error on each pass but leaves the
//! buffered audio in place for the next attempt.

mod remote;

pub use remote::NatsRecognizer;

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

use crate::audio::{AudioClip, Transcoder};

/// One recognized span of text, in utterance order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextSpan {
    pub text: String,
}

#[derive(Debug, Error)]
pub enum RecognitionError {
    #[error("recognition engine not ready")]
    NotReady,

    #[error("recognition request timed out after {0}s")]
    Timeout(u64),

    #[error("recognition failed: {0}")]
    Engine(String),
}

#[async_trait::async_trait]
pub trait Recognizer: Send + Sync {
    /// Whether the engine can currently serve requests
    async fn ready(&self) -> bool;

    /// Transcribe a merged clip into ordered text spans
    async fn transcribe(&self, clip: &AudioClip) -> Result<Vec<TextSpan>, RecognitionError>;
}

/// Transcoder + recognizer pair shared by all sessions, with an optional
/// global admission limit on concurrent recognition passes
pub struct SttEngine {
    pub transcoder: Arc<dyn Transcoder>,
    pub recognizer: Arc<dyn Recognizer>,
    passes: Option<Arc<Semaphore>>,
}

impl SttEngine {
    pub fn new(
        transcoder: Arc<dyn Transcoder>,
        recognizer: Arc<dyn Recognizer>,
        max_concurrent_passes: Option<usize>,
    ) -> Self {
        Self {
            transcoder,
            recognizer,
            passes: max_concurrent_passes.map(|n| Arc::new(Semaphore::new(n))),
        }
    }

    /// Wait for an admission permit when a pass limit is configured
    pub async fn admit(&self) -> Option<OwnedSemaphorePermit> {
        match &self.passes {
            Some(semaphore) => Arc::clone(semaphore).acquire_owned().await.ok(),
            None => None,
        }
    }
}
