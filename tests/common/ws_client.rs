//! Minimal WebSocket client for the event protocol

use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use serde_json::{json, Value};
use socialhub::shared::ServerEvent;
use tokio::net::TcpStream;
use tokio::time::timeout;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

const RECEIVE_TIMEOUT: Duration = Duration::from_secs(2);

pub struct WsClient {
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

impl WsClient {
    pub async fn connect(url: &str) -> Self {
        let (stream, _response) = connect_async(url)
            .await
            .expect("failed to open websocket");
        Self { stream }
    }

    /// Send a raw text frame
    pub async fn send_text(&mut self, text: impl Into<String>) {
        self.stream
            .send(Message::text(text.into()))
            .await
            .expect("failed to send frame");
    }

    /// Send `{"event": event, "data": data}`
    pub async fn emit(&mut self, event: &str, data: Value) {
        let frame = json!({ "event": event, "data": data });
        self.send_text(frame.to_string()).await;
    }

    pub async fn join(&mut self, user: impl Into<Value>) {
        self.emit("join", user.into()).await;
    }

    pub async fn mark_read(&mut self, notification_id: impl Into<Value>, user: impl Into<Value>) {
        self.emit(
            "notificationRead",
            json!({ "notificationId": notification_id.into(), "userId": user.into() }),
        )
        .await;
    }

    /// Next server event, skipping control frames
    pub async fn next_event(&mut self) -> ServerEvent {
        let text = timeout(RECEIVE_TIMEOUT, async {
            loop {
                match self.stream.next().await {
                    Some(Ok(Message::Text(text))) => return text.as_str().to_owned(),
                    Some(Ok(Message::Close(_))) | None => {
                        panic!("socket closed while waiting for an event")
                    }
                    Some(Ok(_)) => continue,
                    Some(Err(e)) => panic!("socket error while waiting for an event: {}", e),
                }
            }
        })
        .await
        .expect("timed out waiting for a server event");

        serde_json::from_str(&text).expect("server sent a malformed event")
    }

    /// Assert nothing arrives within `window`
    pub async fn expect_silence(&mut self, window: Duration) {
        if let Ok(frame) = timeout(window, self.stream.next()).await {
            panic!("expected no frames, got {:?}", frame);
        }
    }

    pub async fn close(mut self) {
        let _ = self.stream.close(None).await;
    }
}
