//! Merge-transcribe pipeline
//!
//! Merges every currently buffered segment into one clip, runs the
//! recognizer over it, and joins the recognized spans into a single
//! candidate string. Failure at any step leaves the caller's segment store
//! untouched so a later trigger can retry with the same or more data.

use thiserror::Error;

use crate::audio::{AudioClip, MergeError};
use crate::session::SegmentStore;
use crate::stt::{RecognitionError, SttEngine, TextSpan};

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("merge failed: {0}")]
    Merge(#[from] MergeError),

    #[error(transparent)]
    Recognition(#[from] RecognitionError),
}

/// Run one recognition pass over all buffered segments
///
/// Repeated re-recognition of a growing buffer is the intended strategy; the
/// candidate covers everything buffered, not just the newest chunk.
pub async fn merge_transcribe(
    engine: &SttEngine,
    store: &SegmentStore,
) -> Result<String, PipelineError> {
    // Not-ready is retryable and must not be reported as a merge failure
    if !engine.recognizer.ready().await {
        return Err(RecognitionError::NotReady.into());
    }

    let _permit = engine.admit().await;

    let clips: Vec<&AudioClip> = store.clips().collect();
    let merged = engine.transcoder.merge(&clips).await?;

    let spans = engine.recognizer.transcribe(&merged).await?;

    Ok(join_spans(&spans))
}

/// Trim spans and join them with single spaces
pub fn join_spans(spans: &[TextSpan]) -> String {
    spans
        .iter()
        .map(|span| span.text.trim())
        .filter(|text| !text.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Whether a candidate transcript replaces the previous one
pub fn text_changed(last_text: &str, candidate: &str) -> bool {
    !candidate.is_empty() && candidate != last_text
}
