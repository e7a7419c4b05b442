//! WebSocket endpoint for live reload.
//!
//! A connected browser receives one JSON message per re-rendered example
//! document and swaps the content in place. The socket carries no client
//! commands; incoming traffic is limited to keepalive pings and close
//! frames.

use std::sync::Arc;

use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::IntoResponse;
use tokio::sync::broadcast;

use super::manager::ReloadEvent;
use crate::state::AppState;

pub(crate) async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| forward_reloads(socket, state))
}

/// Forward reload events to one client until either side disconnects.
async fn forward_reloads(mut socket: WebSocket, state: Arc<AppState>) {
    // The route is only mounted when live reload is enabled, but drop the
    // connection cleanly if a socket arrives without a manager.
    let Some(ref live_reload) = state.live_reload else {
        return;
    };

    let mut events: broadcast::Receiver<ReloadEvent> = live_reload.subscribe();

    loop {
        tokio::select! {
            event = events.recv() => {
                match event {
                    Ok(event) => {
                        let Ok(payload) = serde_json::to_string(&event) else {
                            continue;
                        };
                        if socket.send(Message::Text(payload.into())).await.is_err() {
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                    // A slow browser misses some reloads; the next event
                    // still refreshes it to the latest content.
                    Err(broadcast::error::RecvError::Lagged(_)) => {}
                }
            }
            incoming = socket.recv() => {
                match incoming {
                    Some(Ok(Message::Ping(payload))) => {
                        if socket.send(Message::Pong(payload)).await.is_err() {
                            break;
                        }
                    }
                    Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                    Some(Ok(_)) => {}
                }
            }
        }
    }
}
