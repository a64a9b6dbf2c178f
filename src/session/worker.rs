use std::sync::Arc;

use tracing::{debug, info, warn};

use super::policy::{RotationPolicy, TriggerPolicy};
use super::registry::{SessionHandle, SessionRegistry};
use super::state::{Phase, SessionState};
use crate::config::SttSettings;
use crate::nats::BroadcastStore;
use crate::pipeline::{merge_transcribe, text_changed};
use crate::protocol::{ControlCommand, OutboundEvent};
use crate::stt::SttEngine;

/// Result of handling one control message
pub struct CommandOutcome {
    pub events: Vec<OutboundEvent>,
    /// Whether the connection should be closed after the events are sent
    pub close: bool,
}

impl CommandOutcome {
    fn reply(event: OutboundEvent) -> Self {
        Self {
            events: vec![event],
            close: false,
        }
    }
}

/// Per-session command handler and state machine
///
/// Owned by exactly one connection task and driven strictly sequentially, so
/// the segment buffer needs no locking. Concurrency exists only across
/// sessions; the registry handle is the one shared structure this touches.
pub struct SessionWorker {
    state: SessionState,
    handle: Arc<SessionHandle>,
    engine: Arc<SttEngine>,
    sink: Option<Arc<dyn BroadcastStore>>,
    trigger: TriggerPolicy,
    rotation: RotationPolicy,
}

impl SessionWorker {
    pub fn new(
        handle: Arc<SessionHandle>,
        engine: Arc<SttEngine>,
        sink: Option<Arc<dyn BroadcastStore>>,
        settings: &SttSettings,
    ) -> Self {
        Self {
            state: SessionState::new(handle.session_id.clone()),
            handle,
            engine,
            sink,
            trigger: TriggerPolicy::new(settings.trigger_bytes),
            rotation: RotationPolicy::new(settings.max_segments),
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Handle one inbound binary chunk: decode, buffer, maybe run a
    /// recognition pass
    pub async fn on_chunk(&mut self, raw: Vec<u8>) -> Option<OutboundEvent> {
        if self.state.phase != Phase::Active {
            return None;
        }

        let clip = match self.engine.transcoder.decode(raw).await {
            Ok(clip) => clip,
            Err(e) => {
                // Chunk dropped, buffer unchanged, session continues
                warn!("session {}: {}", self.state.session_id, e);
                return Some(OutboundEvent::error(format!("decode error: {}", e)));
            }
        };

        self.state.store.push(clip);
        self.handle.set_buffered_segments(self.state.store.len());

        if !self.trigger.should_run(self.state.store.total_bytes()) {
            return Some(OutboundEvent::Ack {
                buffered_count: self.state.store.len(),
            });
        }

        match merge_transcribe(&self.engine, &self.state.store).await {
            Ok(candidate) => {
                let event = self.apply_candidate(candidate).await;

                // Rotation runs only on the success path; a failed pass must
                // leave the store exactly as it was
                let evicted = self.rotation.rotate(&mut self.state.store);
                if evicted > 0 {
                    debug!(
                        "session {}: rotated out {} oldest segments",
                        self.state.session_id, evicted
                    );
                }
                self.handle.set_buffered_segments(self.state.store.len());

                event
            }
            Err(e) => {
                warn!("session {}: recognition pass failed: {}", self.state.session_id, e);
                Some(OutboundEvent::error(format!("transcription error: {}", e)))
            }
        }
    }

    /// Handle one inbound text frame as a control command
    pub async fn on_command(&mut self, raw: &str) -> CommandOutcome {
        if self.state.phase != Phase::Active {
            return CommandOutcome {
                events: Vec::new(),
                close: true,
            };
        }

        match ControlCommand::parse(raw) {
            ControlCommand::Flush => self.flush().await,
            ControlCommand::End => {
                info!("session {}: end requested", self.state.session_id);
                self.state.phase = Phase::Closing;
                self.handle.set_phase(Phase::Closing).await;
                CommandOutcome {
                    events: vec![OutboundEvent::info("ending session")],
                    close: true,
                }
            }
            ControlCommand::Unknown(payload) => CommandOutcome::reply(OutboundEvent::Info {
                msg: "unknown command".to_string(),
                payload: Some(payload),
            }),
        }
    }

    /// Finalize the entire buffer regardless of the byte threshold
    async fn flush(&mut self) -> CommandOutcome {
        if self.state.store.is_empty() {
            return CommandOutcome::reply(OutboundEvent::Final {
                text: String::new(),
                full_text: self.state.last_text.clone(),
            });
        }

        match merge_transcribe(&self.engine, &self.state.store).await {
            Ok(candidate) => {
                let final_text = if candidate.is_empty() {
                    self.state.last_text.clone()
                } else {
                    candidate
                };

                self.state.last_text = final_text.clone();
                self.handle.set_last_text(&final_text).await;
                self.publish_best_effort().await;

                let released = self.state.store.clear();
                self.handle.set_buffered_segments(0);
                info!(
                    "session {}: flushed {} segments",
                    self.state.session_id, released
                );

                CommandOutcome::reply(OutboundEvent::Final {
                    text: final_text.clone(),
                    full_text: final_text,
                })
            }
            Err(e) => {
                // Buffer retained; the client can send more chunks or retry
                warn!("session {}: flush failed: {}", self.state.session_id, e);
                CommandOutcome::reply(OutboundEvent::error(format!("flush error: {}", e)))
            }
        }
    }

    /// Diff a candidate transcript against the running text and publish on
    /// change
    async fn apply_candidate(&mut self, candidate: String) -> Option<OutboundEvent> {
        if !text_changed(&self.state.last_text, &candidate) {
            return None;
        }

        self.state.last_text = candidate.clone();
        self.handle.set_last_text(&candidate).await;
        self.publish_best_effort().await;

        Some(OutboundEvent::Partial { text: candidate })
    }

    async fn publish_best_effort(&self) {
        let Some(sink) = &self.sink else {
            return;
        };

        if let Err(e) = sink.set(&self.state.session_id, &self.state.last_text).await {
            warn!(
                "session {}: failed to store transcript: {}",
                self.state.session_id, e
            );
        }
        if let Err(e) = sink
            .publish(&self.state.session_id, &self.state.last_text)
            .await
        {
            warn!(
                "session {}: failed to broadcast transcript: {}",
                self.state.session_id, e
            );
        }
    }

    /// Release everything and drop the registry entry
    ///
    /// Runs on explicit end and on abnormal disconnect alike; must be safe
    /// even when the session never fully initialized.
    pub async fn teardown(&mut self, registry: &SessionRegistry) {
        let released = self.state.store.clear();
        self.state.phase = Phase::Terminated;
        self.handle.set_phase(Phase::Terminated).await;
        self.handle.set_buffered_segments(0);

        registry.remove(&self.state.session_id).await;

        info!(
            "session {}: torn down, {} segments released",
            self.state.session_id, released
        );
    }
}
