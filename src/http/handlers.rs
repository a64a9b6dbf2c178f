use super::state::AppState;
use crate::session::Phase;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub recognizer: String,
    pub broadcast: String,
}

#[derive(Debug, Serialize)]
pub struct SessionStatusResponse {
    pub session_id: String,
    pub phase: Phase,
    pub started_at: DateTime<Utc>,
    pub buffered_segments: usize,
}

#[derive(Debug, Serialize)]
pub struct SessionTranscriptResponse {
    pub session_id: String,
    pub text: String,
}

/// GET /health
/// Reports whether the recognizer and broadcast sink are available
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let recognizer = if state.engine.recognizer.ready().await {
        "ready"
    } else {
        "not_ready"
    };
    let broadcast = if state.sink.is_some() {
        "connected"
    } else {
        "not_connected"
    };

    Json(HealthResponse {
        status: "ok".to_string(),
        recognizer: recognizer.to_string(),
        broadcast: broadcast.to_string(),
    })
}

/// GET /sessions/:session_id/status
pub async fn get_session_status(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> impl IntoResponse {
    match state.registry.get(&session_id).await {
        Ok(handle) => (
            StatusCode::OK,
            Json(SessionStatusResponse {
                session_id: handle.session_id.clone(),
                phase: handle.phase().await,
                started_at: handle.started_at,
                buffered_segments: handle.buffered_segments(),
            }),
        )
            .into_response(),
        Err(e) => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: e.to_string(),
            }),
        )
            .into_response(),
    }
}

/// GET /sessions/:session_id/transcript
/// Latest transcript known for a live session
pub async fn get_session_transcript(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> impl IntoResponse {
    match state.registry.get(&session_id).await {
        Ok(handle) => (
            StatusCode::OK,
            Json(SessionTranscriptResponse {
                session_id: handle.session_id.clone(),
                text: handle.last_text().await,
            }),
        )
            .into_response(),
        Err(e) => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: e.to_string(),
            }),
        )
            .into_response(),
    }
}
