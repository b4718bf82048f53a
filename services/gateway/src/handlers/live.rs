//! Read side: polling and streaming the published snapshot.
//!
//! A socket receives the latest snapshot on connect, then one message per
//! committed mutation. A client that falls behind the broadcast buffer
//! skips straight to the newest snapshot.

use crate::state::AppState;
use auction_engine::AuctionSnapshot;
use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::IntoResponse;
use axum::Json;
use futures::{SinkExt, StreamExt};
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, warn};

/// `GET /v1/live_state`
pub async fn live_state(State(state): State<AppState>) -> Json<Arc<AuctionSnapshot>> {
    Json(state.engine.snapshot())
}

/// `GET /v1/ws`
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: AppState) {
    debug!("Live client connected");
    let (mut sender, mut receiver) = socket.split();

    // Subscribe before reading the latest so no commit falls in between.
    let mut rx = state.engine.subscribe();
    let initial = state.engine.snapshot();

    let mut send_task = tokio::spawn(async move {
        let mut last_version = initial.version;
        if send_snapshot(&mut sender, &initial).await.is_err() {
            return;
        }
        loop {
            match rx.recv().await {
                Ok(snapshot) => {
                    if snapshot.version <= last_version {
                        continue;
                    }
                    last_version = snapshot.version;
                    if send_snapshot(&mut sender, &snapshot).await.is_err() {
                        break;
                    }
                }
                Err(RecvError::Lagged(n)) => {
                    debug!(skipped = n, "Live client lagged");
                }
                Err(RecvError::Closed) => break,
            }
        }
    });

    // Inbound frames are ignored apart from close.
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            match msg {
                Ok(Message::Close(_)) => break,
                Err(e) => {
                    warn!("WebSocket error: {}", e);
                    break;
                }
                _ => {}
            }
        }
    });

    tokio::select! {
        _ = &mut send_task => recv_task.abort(),
        _ = &mut recv_task => send_task.abort(),
    }
    debug!("Live client disconnected");
}

async fn send_snapshot<S>(sender: &mut S, snapshot: &AuctionSnapshot) -> Result<(), ()>
where
    S: futures::Sink<Message> + Unpin,
{
    let json = match serde_json::to_string(snapshot) {
        Ok(json) => json,
        Err(e) => {
            warn!("Failed to serialize snapshot: {}", e);
            return Ok(());
        }
    };
    sender.send(Message::Text(json.into())).await.map_err(|_| ())
}
