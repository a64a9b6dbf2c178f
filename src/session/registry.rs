use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::debug;

use super::state::Phase;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("session {0} already exists")]
    Duplicate(String),

    #[error("session {0} not found")]
    NotFound(String),
}

/// Observable face of a session, shared between the owning connection task
/// and read-only REST handlers
///
/// The connection task is the only writer; everything here is a snapshot for
/// observers, never the task's working state.
pub struct SessionHandle {
    pub session_id: String,
    pub started_at: DateTime<Utc>,
    buffered_segments: AtomicUsize,
    last_text: RwLock<String>,
    phase: RwLock<Phase>,
}

impl SessionHandle {
    fn new(session_id: String) -> Self {
        Self {
            session_id,
            started_at: Utc::now(),
            buffered_segments: AtomicUsize::new(0),
            last_text: RwLock::new(String::new()),
            phase: RwLock::new(Phase::Active),
        }
    }

    pub fn buffered_segments(&self) -> usize {
        self.buffered_segments.load(Ordering::SeqCst)
    }

    pub(crate) fn set_buffered_segments(&self, count: usize) {
        self.buffered_segments.store(count, Ordering::SeqCst);
    }

    pub async fn last_text(&self) -> String {
        self.last_text.read().await.clone()
    }

    pub(crate) async fn set_last_text(&self, text: &str) {
        let mut last = self.last_text.write().await;
        text.clone_into(&mut last);
    }

    pub async fn phase(&self) -> Phase {
        *self.phase.read().await
    }

    pub(crate) async fn set_phase(&self, phase: Phase) {
        *self.phase.write().await = phase;
    }
}

/// Shared mapping from session id to live session handles
///
/// The only mutable structure shared across connection tasks; everything
/// per-session lives inside the task that owns the connection.
#[derive(Default)]
pub struct SessionRegistry {
    sessions: RwLock<HashMap<String, Arc<SessionHandle>>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new session; an existing id is rejected deterministically
    pub async fn create(&self, session_id: &str) -> Result<Arc<SessionHandle>, RegistryError> {
        let mut sessions = self.sessions.write().await;
        if sessions.contains_key(session_id) {
            return Err(RegistryError::Duplicate(session_id.to_string()));
        }

        let handle = Arc::new(SessionHandle::new(session_id.to_string()));
        sessions.insert(session_id.to_string(), Arc::clone(&handle));
        debug!("registered session {}", session_id);

        Ok(handle)
    }

    pub async fn get(&self, session_id: &str) -> Result<Arc<SessionHandle>, RegistryError> {
        let sessions = self.sessions.read().await;
        sessions
            .get(session_id)
            .cloned()
            .ok_or_else(|| RegistryError::NotFound(session_id.to_string()))
    }

    /// Remove a session entry; safe to call for ids that never fully
    /// initialized or were already removed
    pub async fn remove(&self, session_id: &str) -> Option<Arc<SessionHandle>> {
        let removed = self.sessions.write().await.remove(session_id);
        if removed.is_some() {
            debug!("removed session {}", session_id);
        }
        removed
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}
