use std::sync::Arc;

use anyhow::Result;
use axum::{
    extract::{
        ws::{CloseFrame, Message, WebSocket},
        Query, State, WebSocketUpgrade,
    },
    response::Response,
};
use serde::Deserialize;
use tracing::{info, warn};

use super::state::AppState;
use crate::protocol::OutboundEvent;
use crate::session::SessionWorker;

/// Close code for a connection without a session identifier
const CLOSE_MISSING_SESSION_ID: u16 = 4001;
/// Close code for a session id that is already connected
const CLOSE_DUPLICATE_SESSION: u16 = 4002;

#[derive(Debug, Deserialize)]
pub struct ConnectQuery {
    pub session_id: Option<String>,
}

/// GET /ws/transcribe?session_id=...
///
/// Binary frames carry compressed audio chunks; text frames carry JSON
/// control messages (`flush`, `end`). Each accepted connection gets its own
/// task owning all per-session state.
pub async fn ws_transcribe(
    ws: WebSocketUpgrade,
    Query(query): Query<ConnectQuery>,
    State(state): State<AppState>,
) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, query.session_id, state))
}

async fn handle_socket(mut socket: WebSocket, session_id: Option<String>, state: AppState) {
    // Protocol violation: no session id, rejected before any state exists
    let Some(session_id) = session_id.filter(|id| !id.is_empty()) else {
        warn!("rejecting connection without session_id");
        let _ = socket
            .send(Message::Close(Some(CloseFrame {
                code: CLOSE_MISSING_SESSION_ID,
                reason: "missing session_id".into(),
            })))
            .await;
        return;
    };

    let handle = match state.registry.create(&session_id).await {
        Ok(handle) => handle,
        Err(e) => {
            warn!("rejecting connection: {}", e);
            let _ = socket
                .send(Message::Close(Some(CloseFrame {
                    code: CLOSE_DUPLICATE_SESSION,
                    reason: "duplicate session".into(),
                })))
                .await;
            return;
        }
    };

    info!("session {} connected", session_id);

    let mut worker = SessionWorker::new(
        handle,
        Arc::clone(&state.engine),
        state.sink.clone(),
        &state.stt,
    );

    'receive: loop {
        let message = match socket.recv().await {
            Some(Ok(message)) => message,
            Some(Err(e)) => {
                warn!("session {}: websocket error: {}", session_id, e);
                break;
            }
            None => break,
        };

        match message {
            Message::Binary(bytes) => {
                if let Some(event) = worker.on_chunk(bytes).await {
                    if send_event(&mut socket, &event).await.is_err() {
                        break 'receive;
                    }
                }
            }
            Message::Text(text) => {
                let outcome = worker.on_command(&text).await;
                for event in &outcome.events {
                    if send_event(&mut socket, event).await.is_err() {
                        break 'receive;
                    }
                }
                if outcome.close {
                    let _ = socket.send(Message::Close(None)).await;
                    break;
                }
            }
            Message::Close(_) => break,
            Message::Ping(_) | Message::Pong(_) => {}
        }
    }

    // Same cleanup for explicit end and abnormal disconnect
    worker.teardown(&state.registry).await;
    info!("session {} cleaned up", session_id);
}

async fn send_event(socket: &mut WebSocket, event: &OutboundEvent) -> Result<()> {
    let text = serde_json::to_string(event)?;
    socket.send(Message::Text(text)).await?;
    Ok(())
}
