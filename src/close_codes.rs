//! WebSocket close status codes reported by the `Closed` event.
//!
//! The bridge only attaches meaning to [`CloseCode::Normal`]: a transport that
//! closes with it is treated as an intentional disconnect and never triggers a
//! reconnect. Every other code is a failure.

use std::fmt;

/// Close status codes a bridge connection can end with.
///
/// Codes outside the known table are preserved in [`CloseCode::Other`].
/// Use [`description()`](CloseCode::description) for a human-readable explanation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CloseCode {
    /// 1000: intentional, successful closure.
    Normal,
    /// 1001: the endpoint is going away.
    EndpointUnavailable,
    /// 1002: protocol error.
    ProtocolError,
    /// 1003: unsupported data type.
    InvalidDataType,
    /// 1005: closed without a status code.
    Empty,
    /// 1006: closed abnormally, without a close frame.
    Aborted,
    /// 1007: payload was not consistent with the message type.
    InvalidPayload,
    /// 1008: policy violation.
    PolicyViolation,
    /// 1009: message too big to process.
    MessageTooBig,
    /// 1010: a required extension was not negotiated.
    UnsupportedExtensions,
    /// 1011: the server hit an unexpected condition.
    ServerError,
    /// 1015: the TLS handshake failed.
    SecureHandshakeError,
    /// Any other code.
    Other(u16),
}

impl CloseCode {
    /// Returns the numeric close status.
    pub fn code(self) -> u16 {
        match self {
            Self::Normal => 1000,
            Self::EndpointUnavailable => 1001,
            Self::ProtocolError => 1002,
            Self::InvalidDataType => 1003,
            Self::Empty => 1005,
            Self::Aborted => 1006,
            Self::InvalidPayload => 1007,
            Self::PolicyViolation => 1008,
            Self::MessageTooBig => 1009,
            Self::UnsupportedExtensions => 1010,
            Self::ServerError => 1011,
            Self::SecureHandshakeError => 1015,
            Self::Other(code) => code,
        }
    }

    /// Returns `true` for the one code that suppresses reconnecting.
    pub fn is_normal(self) -> bool {
        self == Self::Normal
    }

    /// Returns a human-readable description of the close reason.
    pub fn description(self) -> &'static str {
        match self {
            Self::Normal => "The connection was closed intentionally.",
            Self::EndpointUnavailable => "The remote endpoint is going away.",
            Self::ProtocolError => "The connection was closed because of a protocol error.",
            Self::InvalidDataType => "The remote endpoint received a data type it cannot accept.",
            Self::Empty => "The connection was closed without a status code.",
            Self::Aborted => {
                "The connection was lost without a close frame (refused, reset or timed out)."
            }
            Self::InvalidPayload => "A message payload did not match its declared type.",
            Self::PolicyViolation => "A message violated the remote endpoint's policy.",
            Self::MessageTooBig => "A message was too big for the remote endpoint to process.",
            Self::UnsupportedExtensions => "A required WebSocket extension was not negotiated.",
            Self::ServerError => "The bridge hit an unexpected condition.",
            Self::SecureHandshakeError => "The TLS handshake failed.",
            Self::Other(_) => "The connection was closed with an unrecognized status code.",
        }
    }
}

impl From<u16> for CloseCode {
    fn from(code: u16) -> Self {
        match code {
            1000 => Self::Normal,
            1001 => Self::EndpointUnavailable,
            1002 => Self::ProtocolError,
            1003 => Self::InvalidDataType,
            1005 => Self::Empty,
            1006 => Self::Aborted,
            1007 => Self::InvalidPayload,
            1008 => Self::PolicyViolation,
            1009 => Self::MessageTooBig,
            1010 => Self::UnsupportedExtensions,
            1011 => Self::ServerError,
            1015 => Self::SecureHandshakeError,
            other => Self::Other(other),
        }
    }
}

impl From<CloseCode> for u16 {
    fn from(code: CloseCode) -> Self {
        code.code()
    }
}

impl fmt::Display for CloseCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.code(), self.description())
    }
}

#[cfg(test)]
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

    #[test]
    fn known_codes_map_both_ways() {
        for code in [
            1000u16, 1001, 1002, 1003, 1005, 1006, 1007, 1008, 1009, 1010, 1011, 1015,
        ] {
            let close = CloseCode::from(code);
            assert!(!matches!(close, CloseCode::Other(_)), "{code} should be known");
            assert_eq!(u16::from(close), code);
        }
    }

    #[test]
    fn unknown_code_is_preserved() {
        let close = CloseCode::from(4001);
        assert_eq!(close, CloseCode::Other(4001));
        assert_eq!(close.code(), 4001);
        assert!(!close.is_normal());
    }

    #[test]
    fn only_normal_is_normal() {
        assert!(CloseCode::Normal.is_normal());
        assert!(!CloseCode::Aborted.is_normal());
        assert!(!CloseCode::EndpointUnavailable.is_normal());
    }

    #[test]
    fn display_includes_numeric_code() {
        let text = CloseCode::Aborted.to_string();
        assert!(text.starts_with("1006 "));
    }
}
