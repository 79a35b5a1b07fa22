//! Transport implementations for the bridge event stream.
//!
//! | Feature                | Transport              | Connector              |
//! |------------------------|------------------------|------------------------|
//! | `transport-websocket`  | [`WebSocketTransport`] | [`WebSocketConnector`] |
//!
//! # Example
//!
//! ```rust,ignore
//! # async fn example() -> Result<(), game_bridge_client::BridgeError> {
//! use game_bridge_client::transport::{Inbound, Transport};
//! use game_bridge_client::WebSocketTransport;
//!
//! let mut ws = WebSocketTransport::connect("ws://localhost:10692/stream").await?;
//!
//! if let Some(Ok(Inbound::Text(frame))) = ws.recv().await {
//!     println!("bridge said: {frame}");
//! }
//! # Ok(())
//! # }
//! ```

#[cfg(feature = "transport-websocket")]
pub mod websocket;

#[cfg(feature = "transport-websocket")]
pub use websocket::{WebSocketConnector, WebSocketTransport};
