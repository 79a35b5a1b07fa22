//! Transport abstraction for the bridge event stream.
//!
//! A [`Transport`] is one live, bidirectional text-message connection. A
//! [`Connector`] opens a fresh transport for every connection attempt; the
//! client calls it once on start-up and again for each reconnect, dropping
//! the previous transport before the new one is opened.
//!
//! # Implementing a Custom Transport
//!
//! ```rust,no_run
//! use async_trait::async_trait;
//! use game_bridge_client::close_codes::CloseCode;
//! use game_bridge_client::endpoint::Endpoint;
//! use game_bridge_client::error::BridgeError;
//! use game_bridge_client::transport::{Connector, Inbound, Transport};
//!
//! struct MyTransport { /* ... */ }
//!
//! #[async_trait]
//! impl Transport for MyTransport {
//!     async fn send(&mut self, message: String) -> Result<(), BridgeError> {
//!         // Send the JSON text frame
//!         todo!()
//!     }
//!
//!     async fn recv(&mut self) -> Option<Result<Inbound, BridgeError>> {
//!         // Yield the next text frame or the close frame;
//!         // return None when the connection drops without one
//!         todo!()
//!     }
//!
//!     async fn close(&mut self, code: CloseCode) -> Result<(), BridgeError> {
//!         todo!()
//!     }
//! }
//!
//! struct MyConnector;
//!
//! #[async_trait]
//! impl Connector for MyConnector {
//!     type Transport = MyTransport;
//!
//!     async fn connect(&self, endpoint: &Endpoint) -> Result<MyTransport, BridgeError> {
//!         todo!()
//!     }
//! }
//! ```

use async_trait::async_trait;

use crate::close_codes::CloseCode;
use crate::endpoint::Endpoint;
use crate::error::BridgeError;

/// One item read from a transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inbound {
    /// A complete text frame.
    Text(String),
    /// The peer closed the connection with a close frame.
    Closed {
        code: CloseCode,
        reason: String,
    },
}

/// A bidirectional text message transport to the bridge.
///
/// # Cancel Safety
///
/// The [`recv`](Transport::recv) method **MUST** be cancel-safe because it is used
/// inside `tokio::select!`. If `recv` is cancelled before completion, calling it
/// again must not lose data.
#[async_trait]
pub trait Transport: Send + 'static {
    /// Send one JSON text frame.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::TransportSend`] if the frame could not be sent.
    async fn send(&mut self, message: String) -> Result<(), BridgeError>;

    /// Receive the next frame.
    ///
    /// Returns:
    /// - `Some(Ok(Inbound::Text(_)))`: a text frame arrived
    /// - `Some(Ok(Inbound::Closed { .. }))`: the bridge sent a close frame
    /// - `Some(Err(e))`: the connection failed
    /// - `None`: the connection ended without a close frame
    async fn recv(&mut self) -> Option<Result<Inbound, BridgeError>>;

    /// Close the connection with the given status code.
    ///
    /// # Errors
    ///
    /// Returns an error if the close handshake fails. Implementations should
    /// still release resources in that case.
    async fn close(&mut self, code: CloseCode) -> Result<(), BridgeError>;
}

/// Opens transports to a bridge endpoint.
#[async_trait]
pub trait Connector: Send + Sync + 'static {
    /// Transport produced by a successful attempt.
    type Transport: Transport;

    /// Open a new transport to `endpoint`.
    ///
    /// # Errors
    ///
    /// Any error means the attempt failed; the client reports it as an
    /// aborted closure and applies its reconnect policy.
    async fn connect(&self, endpoint: &Endpoint) -> Result<Self::Transport, BridgeError>;
}
