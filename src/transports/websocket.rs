//! Bridge connections over `tokio-tungstenite`.
//!
//! [`BridgeClient::connect`](crate::BridgeClient::connect) opens one
//! [`WebSocketTransport`] per connection attempt through [`WebSocketConnector`].
//! Requires the default `transport-websocket` feature.

use std::time::Duration;

use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode as WsCloseCode;
use tokio_tungstenite::tungstenite::protocol::{CloseFrame, Message};

use crate::close_codes::CloseCode;
use crate::endpoint::Endpoint;
use crate::error::BridgeError;
use crate::transport::{Connector, Inbound, Transport};

/// Stream type wrapped by [`WebSocketTransport`], see
/// [`WebSocketTransport::from_stream`].
pub type WsStream =
    tokio_tungstenite::WebSocketStream<tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>>;

/// One WebSocket connection to the bridge's `/stream` endpoint.
///
/// [`recv`](Transport::recv) is cancel-safe, which the connection loop relies
/// on when it races reads against outgoing commands.
#[derive(Debug)]
pub struct WebSocketTransport {
    stream: WsStream,
    closed: bool,
}

impl WebSocketTransport {
    /// Open a connection to `url`.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::Io`] for a bad URL or a failed handshake, keeping
    /// the I/O [`ErrorKind`](std::io::ErrorKind) when there is one.
    pub async fn connect(url: &str) -> Result<Self, BridgeError> {
        tracing::debug!(url = %url, "opening bridge connection");

        let (stream, _response) = tokio_tungstenite::connect_async(url).await.map_err(|e| {
            let kind = match &e {
                tokio_tungstenite::tungstenite::Error::Io(io) => io.kind(),
                _ => std::io::ErrorKind::Other,
            };
            BridgeError::Io(std::io::Error::new(kind, e))
        })?;

        tracing::debug!(url = %url, "bridge handshake complete");

        Ok(Self::from_stream(stream))
    }

    /// Wrap a stream whose handshake is already done.
    pub fn from_stream(stream: WsStream) -> Self {
        Self {
            stream,
            closed: false,
        }
    }

    /// [`connect`](Self::connect), bounded by `timeout`.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::Timeout`] once `timeout` elapses.
    pub async fn connect_with_timeout(url: &str, timeout: Duration) -> Result<Self, BridgeError> {
        tokio::time::timeout(timeout, Self::connect(url))
            .await
            .map_err(|_| BridgeError::Timeout)?
    }
}

#[async_trait]
impl Transport for WebSocketTransport {
    async fn send(&mut self, message: String) -> Result<(), BridgeError> {
        if self.closed {
            return Err(BridgeError::TransportClosed);
        }
        self.stream
            .send(Message::Text(message.into()))
            .await
            .map_err(|e| BridgeError::TransportSend(e.to_string()))
    }

    async fn recv(&mut self) -> Option<Result<Inbound, BridgeError>> {
        loop {
            let msg = match self.stream.next().await {
                Some(Ok(msg)) => msg,
                Some(Err(e)) => {
                    return Some(Err(BridgeError::TransportReceive(e.to_string())));
                }
                None => return None,
            };

            match msg {
                Message::Text(text) => return Some(Ok(Inbound::Text(text.to_string()))),
                Message::Close(Some(frame)) => {
                    tracing::debug!(?frame, "bridge sent close frame");
                    return Some(Ok(Inbound::Closed {
                        code: CloseCode::from(u16::from(frame.code)),
                        reason: frame.reason.to_string(),
                    }));
                }
                Message::Close(None) => {
                    tracing::debug!("bridge sent close frame without status");
                    return Some(Ok(Inbound::Closed {
                        code: CloseCode::Empty,
                        reason: String::new(),
                    }));
                }
                Message::Ping(_) => {
                    // tungstenite auto-queues a Pong reply.
                    tracing::trace!("ping");
                }
                Message::Pong(_) => {
                    tracing::trace!("pong");
                }
                Message::Binary(data) => {
                    tracing::warn!(len = data.len(), "bridge sent a binary frame, skipping");
                }
                Message::Frame(_) => {
                    // Never produced by the read half; kept for exhaustiveness.
                    tracing::trace!("raw frame skipped");
                }
            }
        }
    }

    async fn close(&mut self, code: CloseCode) -> Result<(), BridgeError> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        let frame = CloseFrame {
            code: WsCloseCode::from(code.code()),
            reason: String::new().into(),
        };
        self.stream
            .close(Some(frame))
            .await
            .map_err(|e| BridgeError::TransportSend(e.to_string()))
    }
}

/// Opens a [`WebSocketTransport`] per connection attempt.
#[derive(Debug, Clone, Default)]
pub struct WebSocketConnector {
    connect_timeout: Option<Duration>,
}

impl WebSocketConnector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail attempts that take longer than `timeout` with [`BridgeError::Timeout`].
    #[must_use]
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }
}

#[async_trait]
impl Connector for WebSocketConnector {
    type Transport = WebSocketTransport;

    async fn connect(&self, endpoint: &Endpoint) -> Result<WebSocketTransport, BridgeError> {
        match self.connect_timeout {
            Some(timeout) => WebSocketTransport::connect_with_timeout(endpoint.as_str(), timeout).await,
            None => WebSocketTransport::connect(endpoint.as_str()).await,
        }
    }
}

#[cfg(test)]
#[cfg(feature = "transport-websocket")]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::todo,
    clippy::unimplemented,
    clippy::indexing_slicing
)]
mod tests {
    use super::*;
    use crate::client::{BridgeClient, BridgeConfig};
    use crate::event::BridgeEvent;
    use serde_json::json;

    #[test]
    fn websocket_transport_is_send() {
        fn assert_send<T: Send>() {}
        assert_send::<WebSocketTransport>();
    }

    #[tokio::test]
    async fn connect_fails_with_invalid_url() {
        let result = WebSocketTransport::connect("not-a-valid-url").await;
        let err = result.unwrap_err();
        assert!(matches!(err, BridgeError::Io(_)));
    }

    #[tokio::test]
    async fn connect_fails_with_unreachable_host() {
        let result = WebSocketTransport::connect("ws://127.0.0.1:1/stream").await;
        let err = result.unwrap_err();
        assert!(matches!(err, BridgeError::Io(_)));
    }

    #[tokio::test]
    async fn connect_with_timeout_times_out() {
        // Use a non-routable address to guarantee a timeout.
        let result = WebSocketTransport::connect_with_timeout(
            "ws://192.0.2.1:1/stream",
            Duration::from_millis(50),
        )
        .await;

        let err = result.unwrap_err();
        assert!(matches!(err, BridgeError::Timeout));
    }

    // ── Mock-server helpers ──────────────────────────────────────────────

    use tokio::net::TcpListener;

    /// Start a local WebSocket server that runs `handler` on the accepted
    /// connection and returns the `host:port` it listens on.
    async fn start_mock_server<F, Fut>(handler: F) -> String
    where
        F: FnOnce(tokio_tungstenite::WebSocketStream<tokio::net::TcpStream>) -> Fut
            + Send
            + 'static,
        Fut: std::future::Future<Output = ()> + Send,
    {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (tcp, _) = listener.accept().await.unwrap();
            let ws = tokio_tungstenite::accept_async(tcp).await.unwrap();
            handler(ws).await;
        });

        addr.to_string()
    }

    async fn connect_transport(addr: &str) -> WebSocketTransport {
        WebSocketTransport::connect(&format!("ws://{addr}/stream"))
            .await
            .unwrap()
    }

    // ── Transport tests ──────────────────────────────────────────────────

    #[tokio::test]
    async fn recv_receives_text_frames() {
        let addr = start_mock_server(|mut ws| async move {
            ws.send(Message::Text("hello".into())).await.unwrap();
            ws.send(Message::Text("world".into())).await.unwrap();
        })
        .await;

        let mut transport = connect_transport(&addr).await;
        let first = transport.recv().await.unwrap().unwrap();
        assert_eq!(first, Inbound::Text("hello".into()));
        let second = transport.recv().await.unwrap().unwrap();
        assert_eq!(second, Inbound::Text("world".into()));
    }

    #[tokio::test]
    async fn recv_reports_close_code_and_reason() {
        let addr = start_mock_server(|mut ws| async move {
            ws.close(Some(CloseFrame {
                code: WsCloseCode::Away,
                reason: "restarting".into(),
            }))
            .await
            .unwrap();
        })
        .await;

        let mut transport = connect_transport(&addr).await;
        let inbound = transport.recv().await.unwrap().unwrap();
        assert_eq!(
            inbound,
            Inbound::Closed {
                code: CloseCode::EndpointUnavailable,
                reason: "restarting".into(),
            }
        );
    }

    #[tokio::test]
    async fn recv_skips_binary_frames() {
        let addr = start_mock_server(|mut ws| async move {
            ws.send(Message::Binary(vec![0xDE, 0xAD].into()))
                .await
                .unwrap();
            ws.send(Message::Text("after_binary".into())).await.unwrap();
        })
        .await;

        let mut transport = connect_transport(&addr).await;
        let inbound = transport.recv().await.unwrap().unwrap();
        assert_eq!(inbound, Inbound::Text("after_binary".into()));
    }

    #[tokio::test]
    async fn close_sends_requested_code() {
        let (code_tx, code_rx) = tokio::sync::oneshot::channel();
        let addr = start_mock_server(|mut ws| async move {
            while let Some(Ok(msg)) = ws.next().await {
                if let Message::Close(Some(frame)) = msg {
                    let _ = code_tx.send(u16::from(frame.code));
                    break;
                }
            }
        })
        .await;

        let mut transport = connect_transport(&addr).await;
        transport.close(CloseCode::Normal).await.unwrap();
        assert_eq!(code_rx.await.unwrap(), 1000);
    }

    #[tokio::test]
    async fn send_after_close_returns_transport_closed() {
        let addr =
            start_mock_server(|mut ws| async move { while let Some(Ok(_)) = ws.next().await {} })
                .await;

        let mut transport = connect_transport(&addr).await;
        transport.close(CloseCode::Normal).await.unwrap();
        // Second close is a no-op.
        transport.close(CloseCode::Normal).await.unwrap();

        let err = transport.send("oops".to_string()).await.unwrap_err();
        assert!(matches!(err, BridgeError::TransportClosed));
    }

    // ── Client over a real socket ────────────────────────────────────────

    #[tokio::test]
    async fn client_round_trip_over_websocket() {
        let (frame_tx, frame_rx) = tokio::sync::oneshot::channel::<String>();
        let addr = start_mock_server(|mut ws| async move {
            ws.send(Message::Text(
                r#"{"messageType":1,"message":{"name":"Alice"}}"#.into(),
            ))
            .await
            .unwrap();
            if let Some(Ok(Message::Text(text))) = ws.next().await {
                let _ = frame_tx.send(text.to_string());
            }
            ws.close(Some(CloseFrame {
                code: WsCloseCode::Normal,
                reason: "bye".into(),
            }))
            .await
            .unwrap();
        })
        .await;

        let (mut client, mut events) =
            BridgeClient::connect(&addr, BridgeConfig::default()).unwrap();
        assert_eq!(client.endpoint().as_str(), format!("ws://{addr}/stream"));

        assert_eq!(events.recv().await.unwrap(), BridgeEvent::Connected);
        assert_eq!(
            events.recv().await.unwrap(),
            BridgeEvent::Player(json!({ "name": "Alice" }))
        );
        assert_eq!(events.recv().await.unwrap().name(), "message");

        client
            .send_raw("PLAYER_LEVEL", json!({ "playerName": "Alice", "level": 5 }))
            .unwrap();
        assert_eq!(
            frame_rx.await.unwrap(),
            r#"{"messageType":3,"message":{"type":"PLAYER_LEVEL","playerName":"Alice","value":5}}"#
        );

        let closed = events.recv().await.unwrap();
        assert_eq!(
            closed,
            BridgeEvent::Closed {
                code: CloseCode::Normal,
                reason: "bye".into(),
            }
        );
        assert!(events.recv().await.is_none());

        client.shutdown().await;
    }

    #[tokio::test]
    async fn unreachable_bridge_reports_aborted_closure() {
        let config = BridgeConfig::default().with_reconnect(false);
        let (_client, mut events) = BridgeClient::connect("127.0.0.1:1", config).unwrap();

        let event = events.recv().await.unwrap();
        assert!(matches!(
            event,
            BridgeEvent::Closed {
                code: CloseCode::Aborted,
                ..
            }
        ));
        assert!(events.recv().await.is_none());
    }
}
