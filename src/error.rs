//! Error types for the bridge client.

use thiserror::Error;

/// Errors that can occur when using the bridge client.
#[derive(Debug, Error)]
pub enum BridgeError {
    /// Failed to send a frame through the transport.
    #[error("transport send error: {0}")]
    TransportSend(String),

    /// Failed to receive a frame from the transport.
    #[error("transport receive error: {0}")]
    TransportReceive(String),

    /// The transport connection was already closed.
    #[error("transport connection closed")]
    TransportClosed,

    /// Failed to serialize or deserialize a wire envelope.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The host string could not be turned into a bridge endpoint.
    #[error("invalid endpoint: {0}")]
    InvalidEndpoint(#[from] url::ParseError),

    /// The command type is not part of the bridge command set.
    #[error("unknown command type: {0}")]
    UnknownCommandType(String),

    /// A command was missing one of the fields its type requires.
    #[error("invalid arguments for {command_type}: missing `{field}`")]
    MissingField {
        /// Command type whose arguments were rejected.
        command_type: String,
        /// Name of the absent field.
        field: &'static str,
    },

    /// Attempted an operation that requires an open connection.
    #[error("not connected to bridge")]
    NotConnected,

    /// An operation timed out.
    #[error("operation timed out")]
    Timeout,

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A specialized [`Result`] type for bridge client operations.
pub type Result<T> = std::result::Result<T, BridgeError>;
