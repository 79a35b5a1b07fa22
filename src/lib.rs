//! # Game Bridge Client
//!
//! Auto-reconnecting Rust client for the game-server bridge event stream.
//!
//! The bridge pushes player, server and sign state changes as JSON envelopes
//! and accepts control commands (player health, walk speed, level, game mode,
//! location; sign state) in the same envelope format.
//!
//! ## Features
//!
//! - **Typed events**: receive [`BridgeEvent`]s via a channel
//! - **Validated commands**: typed [`Command`] constructors, plus a lenient
//!   `send_raw` path that checks field presence only
//! - **Reconnects**: abnormal closures retry after a configurable interval,
//!   optionally bounded by a maximum attempt count
//! - **Transport-agnostic**: implement [`Connector`] and [`Transport`] for any
//!   backend; WebSocket is built in behind the default `transport-websocket` feature
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! # async fn example() -> Result<(), game_bridge_client::BridgeError> {
//! use game_bridge_client::{BridgeClient, BridgeConfig, BridgeEvent};
//!
//! let (client, mut events) = BridgeClient::connect("bridge.local:10692", BridgeConfig::default())?;
//!
//! while let Some(event) = events.recv().await {
//!     match event {
//!         BridgeEvent::Connected => client.set_sign_state("Gate", true)?,
//!         BridgeEvent::Sign(payload) => println!("sign changed: {payload}"),
//!         _ => {}
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod close_codes;
pub mod dispatch;
pub mod endpoint;
pub mod error;
pub mod event;
pub mod protocol;
pub mod transport;
pub mod transports;

// Re-export primary types for ergonomic imports.
pub use client::{BridgeClient, BridgeConfig, ConnectionState};
pub use close_codes::CloseCode;
pub use endpoint::Endpoint;
pub use error::BridgeError;
pub use event::BridgeEvent;
pub use protocol::{Command, CommandType, Envelope, GameMode, Location, MessageType};
pub use transport::{Connector, Inbound, Transport};

#[cfg(feature = "transport-websocket")]
pub use transports::{WebSocketConnector, WebSocketTransport};
