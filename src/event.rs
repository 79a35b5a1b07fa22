//! Notifications emitted by the bridge client.

use serde_json::Value;

use crate::close_codes::CloseCode;
use crate::protocol::Envelope;

/// Events delivered on the channel returned by
/// [`BridgeClient::connect`](crate::BridgeClient::connect).
///
/// For every decoded inbound frame the client first emits the specific
/// notification (`Player`, `Server` or `Sign`, when the message type has one)
/// and then the generic [`Message`](BridgeEvent::Message) carrying the whole
/// envelope.
#[derive(Debug, Clone, PartialEq)]
pub enum BridgeEvent {
    /// The transport opened.
    Connected,

    /// The transport closed.
    ///
    /// [`CloseCode::Normal`] means the client will not reconnect. Failed
    /// connection attempts are reported as [`CloseCode::Aborted`].
    Closed {
        code: CloseCode,
        /// Close reason sent by the bridge, empty when there was none.
        reason: String,
    },

    /// A reconnect attempt is starting. `attempt` counts from 1.
    Reconnecting { attempt: u32 },

    /// Every decoded inbound frame, after any specific notification.
    Message(Envelope),

    /// Payload of a player state message.
    Player(Value),

    /// Payload of a server state message.
    Server(Value),

    /// Payload of a sign state message.
    Sign(Value),

    /// A command was rejected or could not be sent. Nothing reached the bridge.
    Error { message: String },
}

impl BridgeEvent {
    /// Name of the notification channel, matching the bridge's event names.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Connected => "connect",
            Self::Closed { .. } => "close",
            Self::Reconnecting { .. } => "reconnect",
            Self::Message(_) => "message",
            Self::Player(_) => "player",
            Self::Server(_) => "server",
            Self::Sign(_) => "sign",
            Self::Error { .. } => "error",
        }
    }
}
