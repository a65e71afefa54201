//! WebSocket feed for viewer clients.
//!
//! A viewer connects with `?session=<id>` and receives the `init` envelope
//! followed by `new-image` envelopes as the phone pushes captures. Frames
//! from the client are ignored; the feed is one-way.

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Query, State};
use axum::response::{IntoResponse, Response};
use futures::{SinkExt, StreamExt};
use serde::Deserialize;

use scandock_core::sync::SyncChannel;

use crate::routes::{ApiError, AppState};

#[derive(Deserialize)]
pub struct WsQuery {
    session: Option<String>,
}

pub async fn ws_handler(
    State(state): State<AppState>,
    Query(query): Query<WsQuery>,
    upgrade: WebSocketUpgrade,
) -> Response {
    // A missing session id is terminal for this client; there is nothing
    // to subscribe it to.
    let Some(session_id) = query.session.filter(|s| !s.is_empty()) else {
        return ApiError::bad_request("Session ID required").into_response();
    };
    upgrade.on_upgrade(move |socket| handle_socket(socket, state, session_id))
}

async fn handle_socket(socket: WebSocket, state: AppState, session_id: String) {
    let mut subscription = match state.channel.subscribe(&session_id).await {
        Ok(subscription) => subscription,
        Err(e) => {
            tracing::warn!(%session_id, "subscribe failed: {}", e);
            return;
        }
    };
    tracing::info!(%session_id, "viewer connected");

    let (mut sink, mut stream) = socket.split();
    loop {
        tokio::select! {
            event = subscription.next_event() => {
                let Some(event) = event else { break };
                let text = match serde_json::to_string(&event) {
                    Ok(text) => text,
                    Err(e) => {
                        tracing::warn!(%session_id, "event serialization failed: {}", e);
                        continue;
                    }
                };
                if sink.send(Message::Text(text)).await.is_err() {
                    break;
                }
            }
            frame = stream.next() => {
                match frame {
                    // Inbound frames (pings, stray text) carry no protocol.
                    Some(Ok(_)) => {}
                    Some(Err(_)) | None => break,
                }
            }
        }
    }

    tracing::info!(%session_id, "viewer disconnected");
}
