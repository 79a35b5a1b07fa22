//! Routing of inbound envelopes to typed notifications.

use std::iter;

use tracing::debug;

use crate::event::BridgeEvent;
use crate::protocol::{Envelope, MessageType};

/// Turn one decoded envelope into the events it produces.
///
/// Yields at most one specific event followed by exactly one
/// [`BridgeEvent::Message`]. Message types without a dedicated notification
/// (command echoes, unknown discriminators) only produce the generic event.
pub fn route(envelope: Envelope) -> impl Iterator<Item = BridgeEvent> {
    let specific = match envelope.message_type {
        MessageType::PlayerMessage => Some(BridgeEvent::Player(envelope.message.clone())),
        MessageType::ServerMessage => Some(BridgeEvent::Server(envelope.message.clone())),
        MessageType::SignMessage => Some(BridgeEvent::Sign(envelope.message.clone())),
        other => {
            debug!(message_type = %other, "unhandled inbound message type");
            None
        }
    };

    specific
        .into_iter()
        .chain(iter::once(BridgeEvent::Message(envelope)))
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
    use serde_json::json;

    fn routed(text: &str) -> Vec<BridgeEvent> {
        route(Envelope::decode(text).unwrap()).collect()
    }

    #[test]
    fn player_message_routes_specific_then_generic() {
        let events = routed(r#"{"messageType":1,"message":{"name":"Alice","health":18}}"#);
        assert_eq!(events.len(), 2);
        assert_eq!(
            events[0],
            BridgeEvent::Player(json!({ "name": "Alice", "health": 18 }))
        );
        assert!(matches!(
            &events[1],
            BridgeEvent::Message(env) if env.message_type == MessageType::PlayerMessage
        ));
    }

    #[test]
    fn server_and_sign_messages_route() {
        let events = routed(r#"{"messageType":2,"message":{"online":3}}"#);
        assert_eq!(events[0], BridgeEvent::Server(json!({ "online": 3 })));
        assert_eq!(events[1].name(), "message");

        let events = routed(r#"{"messageType":4,"message":{"name":"Gate","active":true}}"#);
        assert_eq!(
            events[0],
            BridgeEvent::Sign(json!({ "name": "Gate", "active": true }))
        );
        assert_eq!(events[1].name(), "message");
    }

    #[test]
    fn command_and_unknown_types_only_route_generic() {
        for code in [3, 5, 0, 99, -1] {
            let events = routed(&format!(r#"{{"messageType":{code},"message":{{}}}}"#));
            assert_eq!(events.len(), 1, "message type {code}");
            assert!(matches!(&events[0], BridgeEvent::Message(env) if env.message_type.code() == Some(code)));
        }
    }

    #[test]
    fn unrecognized_message_type_routes_generic_only() {
        for frame in [
            r#"{"messageType":"1","message":{}}"#,
            r#"{"message":{"name":"Alice"}}"#,
            "42",
        ] {
            let events = routed(frame);
            assert_eq!(events.len(), 1, "{frame}");
            assert!(matches!(
                &events[0],
                BridgeEvent::Message(env) if env.message_type == MessageType::Unrecognized
            ));
        }
    }

    #[test]
    fn integral_float_message_type_routes_specific() {
        let events = routed(r#"{"messageType":1.0,"message":{"name":"Alice"}}"#);
        assert_eq!(events[0], BridgeEvent::Player(json!({ "name": "Alice" })));
        assert_eq!(events[1].name(), "message");
    }
}
