/**
 * Realtime Socket Handler
 *
 * This module implements the WebSocket endpoint (`GET /ws`) and the
 * per-connection lifecycle.
 *
 * # Connection Lifecycle
 *
 * 1. Upgrade: the connection is registered and gets an outbound queue
 * 2. Loop: inbound frames are dispatched to the hub in arrival order while
 *    queued outbound events are written to the socket
 * 3. Close, error or end of stream: the registry entry and all channel
 *    subscriptions are removed
 *
 * # Frames
 *
 * ```json
 * {"event":"join","data":"42"}
 * {"event":"notificationRead","data":{"notificationId":"n1","userId":"42"}}
 * ```
 */

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::IntoResponse,
};
use futures_util::{SinkExt, StreamExt};

use crate::backend::realtime::hub::RealtimeHub;

/// Handle WebSocket upgrade (GET /ws)
pub async fn handle_ws_upgrade(
    State(hub): State<RealtimeHub>,
    ws: WebSocketUpgrade,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| run_connection(hub, socket))
}

/// Drive one connection until it closes
pub async fn run_connection(hub: RealtimeHub, socket: WebSocket) {
    let (connection, mut outbound) = hub.open_connection();
    let (mut sink, mut stream) = socket.split();

    loop {
        tokio::select! {
            incoming = stream.next() => match incoming {
                Some(Ok(Message::Text(text))) => hub.handle_text(connection, text.as_str()),
                Some(Ok(Message::Binary(_))) => {
                    tracing::debug!("[Realtime] Ignoring binary frame from {}", connection);
                }
                Some(Ok(Message::Ping(_))) | Some(Ok(Message::Pong(_))) => {}
                Some(Ok(Message::Close(_))) | None => break,
                Some(Err(e)) => {
                    tracing::warn!("[Realtime] Socket error on {}: {}", connection, e);
                    break;
                }
            },
            outgoing = outbound.recv() => {
                let Some(event) = outgoing else {
                    break;
                };
                let frame = match event.to_frame() {
                    Ok(frame) => frame,
                    Err(e) => {
                        tracing::error!("[Realtime] Failed to serialize {}: {}", event.name(), e);
                        continue;
                    }
                };
                if let Err(e) = sink.send(Message::Text(frame.into())).await {
                    tracing::debug!("[Realtime] Write to {} failed: {}", connection, e);
                    break;
                }
            }
        }
    }

    hub.close_connection(connection);
}
