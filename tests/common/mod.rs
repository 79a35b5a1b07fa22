#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::todo,
    clippy::unimplemented,
    clippy::indexing_slicing,
    dead_code
)]
//! Shared test utilities for bridge client integration tests.
//!
//! Provides a scripted [`MockConnector`] whose attempts either fail or open a
//! [`MockTransport`] replaying frames, plus helpers for building frames.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex as StdMutex};

use async_trait::async_trait;
use game_bridge_client::{BridgeError, CloseCode, Connector, Endpoint, Inbound, Transport};
use serde_json::Value;

/// One scripted item returned by `MockTransport::recv`.
pub type Frame = Option<Result<Inbound, BridgeError>>;

/// Outcome of one connection attempt.
pub enum Attempt {
    /// The attempt fails as if the connection were refused.
    Refuse,
    /// The attempt opens a transport that replays these frames, then idles.
    Open(Vec<Frame>),
}

/// Shared handles for inspecting what the client did.
#[derive(Clone, Default)]
pub struct Recorder {
    /// Frames sent by the client, across all transports.
    pub sent: Arc<StdMutex<Vec<String>>>,
    /// Codes passed to `close`, across all transports.
    pub close_codes: Arc<StdMutex<Vec<CloseCode>>>,
    /// Number of connection attempts made.
    pub attempts: Arc<AtomicUsize>,
}

impl Recorder {
    pub fn sent(&self) -> Vec<String> {
        self.sent.lock().unwrap().clone()
    }

    pub fn close_codes(&self) -> Vec<CloseCode> {
        self.close_codes.lock().unwrap().clone()
    }

    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

// ── MockConnector ───────────────────────────────────────────────────

/// A connector that plays back scripted attempts in order.
///
/// Once the script runs out every further attempt is refused.
pub struct MockConnector {
    script: StdMutex<VecDeque<Attempt>>,
    recorder: Recorder,
}

impl MockConnector {
    pub fn new(script: Vec<Attempt>) -> (Self, Recorder) {
        let recorder = Recorder::default();
        let connector = Self {
            script: StdMutex::new(VecDeque::from(script)),
            recorder: recorder.clone(),
        };
        (connector, recorder)
    }
}

#[async_trait]
impl Connector for MockConnector {
    type Transport = MockTransport;

    async fn connect(&self, _endpoint: &Endpoint) -> Result<MockTransport, BridgeError> {
        self.recorder.attempts.fetch_add(1, Ordering::SeqCst);
        let next = self.script.lock().unwrap().pop_front();
        match next {
            Some(Attempt::Open(frames)) => Ok(MockTransport {
                incoming: VecDeque::from(frames),
                recorder: self.recorder.clone(),
            }),
            Some(Attempt::Refuse) | None => Err(BridgeError::Io(std::io::Error::from(
                std::io::ErrorKind::ConnectionRefused,
            ))),
        }
    }
}

// ── MockTransport ───────────────────────────────────────────────────

/// A transport that replays scripted frames and records what is sent.
pub struct MockTransport {
    incoming: VecDeque<Frame>,
    recorder: Recorder,
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&mut self, message: String) -> Result<(), BridgeError> {
        self.recorder.sent.lock().unwrap().push(message);
        Ok(())
    }

    async fn recv(&mut self) -> Option<Result<Inbound, BridgeError>> {
        if let Some(item) = self.incoming.pop_front() {
            item
        } else {
            // No more scripted frames: hang forever so the session stays
            // open until the client closes it.
            std::future::pending().await
        }
    }

    async fn close(&mut self, code: CloseCode) -> Result<(), BridgeError> {
        self.recorder.close_codes.lock().unwrap().push(code);
        Ok(())
    }
}

// ── Frame helpers ───────────────────────────────────────────────────

/// A text frame carrying `{"messageType": message_type, "message": message}`.
pub fn envelope_frame(message_type: i64, message: Value) -> Frame {
    text_frame(&envelope_json(message_type, message))
}

/// Returns the JSON text of an envelope.
pub fn envelope_json(message_type: i64, message: Value) -> String {
    serde_json::json!({ "messageType": message_type, "message": message }).to_string()
}

/// A raw text frame.
pub fn text_frame(text: &str) -> Frame {
    Some(Ok(Inbound::Text(text.to_string())))
}

/// A close frame from the bridge.
pub fn close_frame(code: u16) -> Frame {
    Some(Ok(Inbound::Closed {
        code: CloseCode::from(code),
        reason: String::new(),
    }))
}

/// A transport-level failure.
pub fn error_frame() -> Frame {
    Some(Err(BridgeError::TransportReceive("connection reset".into())))
}
