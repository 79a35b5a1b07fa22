//! Integration-style client tests for the bridge client.
//!
//! Uses the scripted `MockConnector` from `tests/common` to drive connection
//! attempts and verify command encoding, inbound routing, close handling and
//! the reconnect policy. Tests run on a paused clock so reconnect intervals
//! elapse instantly once the client is idle.

mod common;

use std::time::Duration;

use game_bridge_client::{
    BridgeClient, BridgeConfig, BridgeError, BridgeEvent, CloseCode, ConnectionState, Envelope,
    GameMode, Location, MessageType,
};
use serde_json::json;
use tokio::sync::mpsc::error::TryRecvError;
use tokio::sync::mpsc::Receiver;
use tokio_test::{assert_err, assert_ok};

use common::{
    close_frame, envelope_frame, error_frame, text_frame, Attempt, MockConnector, Recorder,
};

// ════════════════════════════════════════════════════════════════════
// Helpers
// ════════════════════════════════════════════════════════════════════

fn start_client(
    script: Vec<Attempt>,
    config: BridgeConfig,
) -> (BridgeClient, Receiver<BridgeEvent>, Recorder) {
    let (connector, recorder) = MockConnector::new(script);
    let (client, events) =
        BridgeClient::connect_with(connector, "bridge.test", config).expect("start client");
    (client, events, recorder)
}

/// A client whose first attempt opens and stays open.
fn start_open_client() -> (BridgeClient, Receiver<BridgeEvent>, Recorder) {
    start_client(vec![Attempt::Open(vec![])], BridgeConfig::default())
}

async fn next_event(events: &mut Receiver<BridgeEvent>) -> BridgeEvent {
    events.recv().await.expect("expected an event")
}

async fn expect_connected(events: &mut Receiver<BridgeEvent>) {
    let ev = next_event(events).await;
    assert_eq!(ev, BridgeEvent::Connected, "expected Connected, got {ev:?}");
}

async fn expect_closed(events: &mut Receiver<BridgeEvent>, code: CloseCode) {
    let ev = next_event(events).await;
    match ev {
        BridgeEvent::Closed { code: actual, .. } => assert_eq!(actual, code),
        other => panic!("expected Closed({code}), got {other:?}"),
    }
}

async fn expect_reconnecting(events: &mut Receiver<BridgeEvent>, attempt: u32) {
    let ev = next_event(events).await;
    assert_eq!(
        ev,
        BridgeEvent::Reconnecting { attempt },
        "expected Reconnecting({attempt}), got {ev:?}"
    );
}

async fn expect_error(events: &mut Receiver<BridgeEvent>) -> String {
    match next_event(events).await {
        BridgeEvent::Error { message } => message,
        other => panic!("expected Error, got {other:?}"),
    }
}

/// Let the connection loop drain whatever it has queued.
async fn settle() {
    tokio::time::sleep(Duration::from_millis(50)).await;
}

fn assert_no_pending_events(events: &mut Receiver<BridgeEvent>) {
    let pending = events.try_recv();
    assert!(
        matches!(pending, Err(TryRecvError::Empty)),
        "expected no further events, got {pending:?}"
    );
}

// ════════════════════════════════════════════════════════════════════
// Endpoint
// ════════════════════════════════════════════════════════════════════

#[tokio::test(start_paused = true)]
async fn endpoint_uses_configured_port() {
    let (mut client, _events, _recorder) = start_open_client();
    assert_eq!(client.endpoint().as_str(), "ws://bridge.test:10692/stream");
    client.shutdown().await;

    let (mut client, _events, _recorder) = start_client(
        vec![Attempt::Open(vec![])],
        BridgeConfig::default().with_port(4000),
    );
    assert_eq!(client.endpoint().as_str(), "ws://bridge.test:4000/stream");
    client.shutdown().await;
}

// ════════════════════════════════════════════════════════════════════
// Outbound commands
// ════════════════════════════════════════════════════════════════════

#[tokio::test(start_paused = true)]
async fn player_health_sends_exact_envelope() {
    let (mut client, mut events, recorder) = start_open_client();
    expect_connected(&mut events).await;

    assert_ok!(client.send_raw(
        "PLAYER_HEALTH",
        json!({ "playerName": "Alice", "health": 20 })
    ));
    settle().await;

    assert_eq!(
        recorder.sent(),
        vec![
            r#"{"messageType":3,"message":{"type":"PLAYER_HEALTH","playerName":"Alice","value":20}}"#
                .to_string()
        ]
    );
    assert_no_pending_events(&mut events);

    client.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn sign_state_sends_exact_envelope() {
    let (mut client, mut events, recorder) = start_open_client();
    expect_connected(&mut events).await;

    assert_ok!(client.send_raw("SIGN_STATE", json!({ "signName": "Gate", "state": true })));
    settle().await;

    assert_eq!(
        recorder.sent(),
        vec![
            r#"{"messageType":5,"message":{"type":"COMMAND_SIGN_ACTIVE","signName":"Gate","value":true}}"#
                .to_string()
        ]
    );

    client.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn typed_helpers_send_one_frame_each_with_correct_category() {
    let (mut client, mut events, recorder) = start_open_client();
    expect_connected(&mut events).await;

    client.set_player_health("Alice", 18.5).unwrap();
    client.set_player_walk_speed("Alice", 0.3).unwrap();
    client.set_player_level("Alice", 12).unwrap();
    client
        .set_player_game_mode("Alice", GameMode::Adventure)
        .unwrap();
    client
        .set_player_location("Alice", Location::new(1.0, 70.0, -4.5))
        .unwrap();
    client.set_sign_state("Gate", false).unwrap();
    settle().await;

    let sent = recorder.sent();
    assert_eq!(sent.len(), 6);

    let expected = [
        (MessageType::PlayerCommandsMessage, "PLAYER_HEALTH", "playerName"),
        (MessageType::PlayerCommandsMessage, "PLAYER_WALK_SPEED", "playerName"),
        (MessageType::PlayerCommandsMessage, "PLAYER_LEVEL", "playerName"),
        (MessageType::PlayerCommandsMessage, "PLAYER_GAME_MODE", "playerName"),
        (MessageType::PlayerCommandsMessage, "PLAYER_LOCATION", "playerName"),
        (MessageType::SignCommandsMessage, "COMMAND_SIGN_ACTIVE", "signName"),
    ];
    for (frame, (message_type, command_type, identifier)) in sent.iter().zip(expected) {
        let envelope = Envelope::decode(frame).unwrap();
        assert_eq!(envelope.message_type, message_type, "{frame}");
        assert_eq!(envelope.message["type"], command_type, "{frame}");
        assert!(envelope.message.get(identifier).is_some(), "{frame}");
    }
    assert_no_pending_events(&mut events);

    client.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn typed_health_matches_raw_encoding() {
    let (mut client, mut events, recorder) = start_open_client();
    expect_connected(&mut events).await;

    client.set_player_health("Alice", 20.0).unwrap();
    client
        .send_raw("PLAYER_HEALTH", json!({ "playerName": "Alice", "health": 20 }))
        .unwrap();
    client.set_player_health("Alice", 19.5).unwrap();
    settle().await;

    let sent = recorder.sent();
    let whole =
        r#"{"messageType":3,"message":{"type":"PLAYER_HEALTH","playerName":"Alice","value":20}}"#;
    assert_eq!(sent[0], whole);
    assert_eq!(sent[1], whole);
    assert_eq!(
        sent[2],
        r#"{"messageType":3,"message":{"type":"PLAYER_HEALTH","playerName":"Alice","value":19.5}}"#
    );

    client.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn missing_field_emits_one_error_and_sends_nothing() {
    let (mut client, mut events, recorder) = start_open_client();
    expect_connected(&mut events).await;

    assert_ok!(client.send_raw("PLAYER_HEALTH", json!({ "playerName": "Alice" })));

    let message = expect_error(&mut events).await;
    assert!(message.contains("PLAYER_HEALTH"), "{message}");
    assert!(message.contains("health"), "{message}");

    settle().await;
    assert!(recorder.sent().is_empty());
    assert_no_pending_events(&mut events);

    client.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn missing_identifier_emits_error() {
    let (mut client, mut events, recorder) = start_open_client();
    expect_connected(&mut events).await;

    client
        .send_raw("PLAYER_GAMEMODE", json!({ "gameMode": "CREATIVE" }))
        .unwrap();

    let message = expect_error(&mut events).await;
    assert!(message.contains("PLAYER_GAMEMODE"), "{message}");
    assert!(message.contains("playerName"), "{message}");
    settle().await;
    assert!(recorder.sent().is_empty());

    client.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn unknown_command_type_emits_error() {
    let (mut client, mut events, recorder) = start_open_client();
    expect_connected(&mut events).await;

    client
        .send_raw("PLAYER_MANA", json!({ "playerName": "Alice", "mana": 5 }))
        .unwrap();

    let message = expect_error(&mut events).await;
    assert!(message.contains("PLAYER_MANA"), "{message}");
    settle().await;
    assert!(recorder.sent().is_empty());
    assert_no_pending_events(&mut events);

    client.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn value_type_is_sent_verbatim() {
    let (mut client, mut events, recorder) = start_open_client();
    expect_connected(&mut events).await;

    client
        .send_raw(
            "PLAYER_HEALTH",
            json!({ "playerName": "Alice", "health": "full" }),
        )
        .unwrap();
    settle().await;

    assert_eq!(
        recorder.sent(),
        vec![
            r#"{"messageType":3,"message":{"type":"PLAYER_HEALTH","playerName":"Alice","value":"full"}}"#
                .to_string()
        ]
    );

    client.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn client_stays_usable_after_rejected_command() {
    let (mut client, mut events, recorder) = start_open_client();
    expect_connected(&mut events).await;

    client.send_raw("SIGN_STATE", json!({})).unwrap();
    let _ = expect_error(&mut events).await;

    client.set_sign_state("Gate", true).unwrap();
    settle().await;
    assert_eq!(recorder.sent().len(), 1);
    assert!(client.is_open());

    client.shutdown().await;
}

// ════════════════════════════════════════════════════════════════════
// Inbound routing
// ════════════════════════════════════════════════════════════════════

#[tokio::test(start_paused = true)]
async fn inbound_frames_route_specific_then_generic() {
    let (mut client, mut events, _recorder) = start_client(
        vec![Attempt::Open(vec![
            envelope_frame(1, json!({ "name": "Alice", "health": 20 })),
            envelope_frame(2, json!({ "online": 4 })),
            envelope_frame(4, json!({ "name": "Gate", "active": true })),
        ])],
        BridgeConfig::default(),
    );
    expect_connected(&mut events).await;

    assert_eq!(
        next_event(&mut events).await,
        BridgeEvent::Player(json!({ "name": "Alice", "health": 20 }))
    );
    assert!(matches!(
        next_event(&mut events).await,
        BridgeEvent::Message(env) if env.message_type == MessageType::PlayerMessage
    ));

    assert_eq!(
        next_event(&mut events).await,
        BridgeEvent::Server(json!({ "online": 4 }))
    );
    assert!(matches!(
        next_event(&mut events).await,
        BridgeEvent::Message(env) if env.message_type == MessageType::ServerMessage
    ));

    assert_eq!(
        next_event(&mut events).await,
        BridgeEvent::Sign(json!({ "name": "Gate", "active": true }))
    );
    assert!(matches!(
        next_event(&mut events).await,
        BridgeEvent::Message(env) if env.message_type == MessageType::SignMessage
    ));

    settle().await;
    assert_no_pending_events(&mut events);
    client.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn other_message_types_only_produce_generic_message() {
    let (mut client, mut events, _recorder) = start_client(
        vec![Attempt::Open(vec![
            envelope_frame(3, json!({ "type": "PLAYER_LEVEL" })),
            envelope_frame(5, json!({ "type": "COMMAND_SIGN_ACTIVE" })),
            envelope_frame(42, json!({ "future": true })),
        ])],
        BridgeConfig::default(),
    );
    expect_connected(&mut events).await;

    for expected in [3, 5, 42] {
        match next_event(&mut events).await {
            BridgeEvent::Message(env) => assert_eq!(env.message_type.code(), Some(expected)),
            other => panic!("expected Message({expected}), got {other:?}"),
        }
    }

    settle().await;
    assert_no_pending_events(&mut events);
    client.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn non_json_frames_are_dropped() {
    let (mut client, mut events, _recorder) = start_client(
        vec![Attempt::Open(vec![
            text_frame("not json"),
            text_frame("{\"messageType\":"),
            envelope_frame(2, json!({ "tps": 20 })),
        ])],
        BridgeConfig::default(),
    );
    expect_connected(&mut events).await;

    // The two bad frames produce nothing; the next event is the good one.
    assert_eq!(
        next_event(&mut events).await,
        BridgeEvent::Server(json!({ "tps": 20 }))
    );
    assert_eq!(next_event(&mut events).await.name(), "message");
    assert!(client.is_open());

    client.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn unrecognized_message_types_still_produce_generic_message() {
    let (mut client, mut events, _recorder) = start_client(
        vec![Attempt::Open(vec![
            text_frame(r#"{"messageType":"1","message":{}}"#),
            text_frame(r#"{"message":{}}"#),
        ])],
        BridgeConfig::default(),
    );
    expect_connected(&mut events).await;

    for _ in 0..2 {
        match next_event(&mut events).await {
            BridgeEvent::Message(env) => {
                assert_eq!(env.message_type, MessageType::Unrecognized);
                assert_eq!(env.message, json!({}));
            }
            other => panic!("expected Message, got {other:?}"),
        }
    }

    settle().await;
    assert_no_pending_events(&mut events);
    client.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn integral_float_message_type_routes_like_integer() {
    let (mut client, mut events, _recorder) = start_client(
        vec![Attempt::Open(vec![text_frame(
            r#"{"messageType":1.0,"message":{"name":"Alice"}}"#,
        )])],
        BridgeConfig::default(),
    );
    expect_connected(&mut events).await;

    assert_eq!(
        next_event(&mut events).await,
        BridgeEvent::Player(json!({ "name": "Alice" }))
    );
    assert!(matches!(
        next_event(&mut events).await,
        BridgeEvent::Message(env) if env.message_type == MessageType::PlayerMessage
    ));

    settle().await;
    assert_no_pending_events(&mut events);
    client.shutdown().await;
}

// ════════════════════════════════════════════════════════════════════
// Closing
// ════════════════════════════════════════════════════════════════════

#[tokio::test(start_paused = true)]
async fn normal_close_from_bridge_never_reconnects() {
    let (_client, mut events, recorder) = start_client(
        vec![
            Attempt::Open(vec![close_frame(1000)]),
            Attempt::Open(vec![]),
        ],
        BridgeConfig::default().with_reconnect_interval(Duration::ZERO),
    );

    expect_connected(&mut events).await;
    expect_closed(&mut events, CloseCode::Normal).await;
    assert!(events.recv().await.is_none());
    assert_eq!(recorder.attempts(), 1);
}

#[tokio::test(start_paused = true)]
async fn client_close_uses_normal_code_and_stops() {
    let (client, mut events, recorder) = start_open_client();
    expect_connected(&mut events).await;
    assert!(client.is_open());

    client.close().unwrap();

    let ev = next_event(&mut events).await;
    assert_eq!(
        ev,
        BridgeEvent::Closed {
            code: CloseCode::Normal,
            reason: "closed by client".into(),
        }
    );
    assert!(events.recv().await.is_none());

    assert_eq!(recorder.close_codes(), vec![CloseCode::Normal]);
    assert_eq!(recorder.attempts(), 1);
    assert_eq!(client.state(), ConnectionState::Closed);
}

#[tokio::test(start_paused = true)]
async fn shutdown_stops_the_client() {
    let (mut client, mut events, _recorder) = start_open_client();
    expect_connected(&mut events).await;

    client.shutdown().await;

    assert!(matches!(
        client.set_player_level("Alice", 1),
        Err(BridgeError::NotConnected)
    ));
    assert_err!(client.close());
    assert_eq!(client.state(), ConnectionState::Closed);
}

#[tokio::test(start_paused = true)]
async fn state_follows_the_transport() {
    let (client, mut events, _recorder) = start_open_client();
    let mut watch = client.watch_state();

    expect_connected(&mut events).await;
    assert_eq!(client.state(), ConnectionState::Open);
    assert_eq!(*watch.borrow_and_update(), ConnectionState::Open);

    client.close().unwrap();
    expect_closed(&mut events, CloseCode::Normal).await;
    assert_eq!(client.state(), ConnectionState::Closed);
    assert!(watch.has_changed().unwrap());
}

#[tokio::test(start_paused = true)]
async fn lifecycle_events_survive_a_full_channel() {
    let (mut client, mut events, _recorder) = start_client(
        vec![
            Attempt::Open(vec![
                envelope_frame(1, json!({ "name": "Alice" })),
                envelope_frame(2, json!({ "online": 1 })),
                close_frame(1006),
            ]),
            Attempt::Open(vec![]),
        ],
        BridgeConfig::default()
            .with_reconnect_interval(Duration::ZERO)
            .with_event_channel_capacity(1),
    );

    // Let the loop run ahead of the consumer so the channel stays full.
    settle().await;

    // Data events were dropped; every state transition arrives in order.
    expect_connected(&mut events).await;
    expect_closed(&mut events, CloseCode::Aborted).await;
    expect_reconnecting(&mut events, 1).await;
    expect_connected(&mut events).await;

    client.shutdown().await;
}

// ════════════════════════════════════════════════════════════════════
// Transport failures
// ════════════════════════════════════════════════════════════════════

#[tokio::test(start_paused = true)]
async fn transport_error_is_swallowed_and_reported_as_close() {
    let (_client, mut events, _recorder) = start_client(
        vec![Attempt::Open(vec![error_frame()])],
        BridgeConfig::default().with_reconnect(false),
    );

    expect_connected(&mut events).await;
    // No Error event: the failure only shows up as an aborted closure.
    expect_closed(&mut events, CloseCode::Aborted).await;
    assert!(events.recv().await.is_none());
}

#[tokio::test(start_paused = true)]
async fn stream_end_without_close_frame_is_aborted() {
    let (_client, mut events, _recorder) = start_client(
        vec![Attempt::Open(vec![None])],
        BridgeConfig::default().with_reconnect(false),
    );

    expect_connected(&mut events).await;
    expect_closed(&mut events, CloseCode::Aborted).await;
    assert!(events.recv().await.is_none());
}

#[tokio::test(start_paused = true)]
async fn abnormal_close_without_reconnect_stops() {
    let (_client, mut events, recorder) = start_client(
        vec![Attempt::Open(vec![close_frame(1011)]), Attempt::Open(vec![])],
        BridgeConfig::default().with_reconnect(false),
    );

    expect_connected(&mut events).await;
    expect_closed(&mut events, CloseCode::ServerError).await;
    assert!(events.recv().await.is_none());
    assert_eq!(recorder.attempts(), 1);
}

// ════════════════════════════════════════════════════════════════════
// Reconnect policy
// ════════════════════════════════════════════════════════════════════

#[tokio::test(start_paused = true)]
async fn abnormal_close_reconnects_after_interval() {
    let (mut client, mut events, recorder) = start_client(
        vec![Attempt::Open(vec![close_frame(1006)]), Attempt::Open(vec![])],
        BridgeConfig::default(),
    );

    expect_connected(&mut events).await;
    expect_closed(&mut events, CloseCode::Aborted).await;
    let closed_at = tokio::time::Instant::now();

    expect_reconnecting(&mut events, 1).await;
    assert!(closed_at.elapsed() >= Duration::from_millis(6000));
    assert_eq!(client.reconnect_attempts(), 1);

    expect_connected(&mut events).await;
    assert_eq!(recorder.attempts(), 2);

    client.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn refused_attempt_is_retried() {
    let (mut client, mut events, recorder) = start_client(
        vec![Attempt::Refuse, Attempt::Open(vec![])],
        BridgeConfig::default().with_reconnect_interval(Duration::ZERO),
    );

    expect_closed(&mut events, CloseCode::Aborted).await;
    expect_reconnecting(&mut events, 1).await;
    expect_connected(&mut events).await;
    assert_eq!(recorder.attempts(), 2);

    client.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn reconnects_stop_when_attempts_are_exhausted() {
    // Every attempt is refused.
    let (client, mut events, recorder) = start_client(
        vec![],
        BridgeConfig::default()
            .with_reconnect_interval(Duration::from_secs(1))
            .with_max_reconnect_attempts(2),
    );

    expect_closed(&mut events, CloseCode::Aborted).await;
    expect_reconnecting(&mut events, 1).await;
    expect_closed(&mut events, CloseCode::Aborted).await;
    expect_reconnecting(&mut events, 2).await;
    expect_closed(&mut events, CloseCode::Aborted).await;
    assert!(events.recv().await.is_none());

    assert_eq!(recorder.attempts(), 3);
    assert_eq!(client.reconnect_attempts(), 2);
    assert_eq!(client.state(), ConnectionState::Closed);

    // Nothing is ever scheduled again.
    tokio::time::sleep(Duration::from_secs(60)).await;
    assert_eq!(recorder.attempts(), 3);
}

#[tokio::test(start_paused = true)]
async fn zero_max_attempts_never_reconnects() {
    let (_client, mut events, recorder) = start_client(
        vec![],
        BridgeConfig::default().with_max_reconnect_attempts(0),
    );

    expect_closed(&mut events, CloseCode::Aborted).await;
    assert!(events.recv().await.is_none());
    assert_eq!(recorder.attempts(), 1);
}

#[tokio::test(start_paused = true)]
async fn close_cancels_pending_reconnect() {
    let (client, mut events, recorder) = start_client(
        vec![Attempt::Open(vec![close_frame(1006)]), Attempt::Open(vec![])],
        BridgeConfig::default().with_reconnect_interval(Duration::from_secs(60)),
    );

    expect_connected(&mut events).await;
    expect_closed(&mut events, CloseCode::Aborted).await;

    client.close().unwrap();
    assert!(events.recv().await.is_none());

    tokio::time::sleep(Duration::from_secs(120)).await;
    assert_eq!(recorder.attempts(), 1);
    assert_eq!(client.reconnect_attempts(), 0);
}

#[tokio::test(start_paused = true)]
async fn reconnect_counter_survives_successful_opens_by_default() {
    let (_client, mut events, recorder) = start_client(
        vec![
            Attempt::Open(vec![close_frame(1006)]),
            Attempt::Open(vec![close_frame(1006)]),
            Attempt::Open(vec![]),
        ],
        BridgeConfig::default()
            .with_reconnect_interval(Duration::ZERO)
            .with_max_reconnect_attempts(1),
    );

    expect_connected(&mut events).await;
    expect_closed(&mut events, CloseCode::Aborted).await;
    expect_reconnecting(&mut events, 1).await;
    expect_connected(&mut events).await;
    expect_closed(&mut events, CloseCode::Aborted).await;
    assert!(events.recv().await.is_none());
    assert_eq!(recorder.attempts(), 2);
}

#[tokio::test(start_paused = true)]
async fn reconnect_counter_resets_on_open_when_configured() {
    let (mut client, mut events, recorder) = start_client(
        vec![
            Attempt::Open(vec![close_frame(1006)]),
            Attempt::Open(vec![close_frame(1006)]),
            Attempt::Open(vec![]),
        ],
        BridgeConfig::default()
            .with_reconnect_interval(Duration::ZERO)
            .with_max_reconnect_attempts(1)
            .with_reset_reconnect_count_on_open(true),
    );

    expect_connected(&mut events).await;
    expect_closed(&mut events, CloseCode::Aborted).await;
    expect_reconnecting(&mut events, 1).await;
    expect_connected(&mut events).await;
    expect_closed(&mut events, CloseCode::Aborted).await;
    expect_reconnecting(&mut events, 1).await;
    expect_connected(&mut events).await;
    assert_eq!(recorder.attempts(), 3);
    assert_eq!(client.reconnect_attempts(), 0);

    client.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn sends_while_reconnecting_are_rejected() {
    let (mut client, mut events, recorder) = start_client(
        vec![Attempt::Open(vec![close_frame(1006)])],
        BridgeConfig::default().with_reconnect_interval(Duration::from_secs(60)),
    );

    expect_connected(&mut events).await;
    expect_closed(&mut events, CloseCode::Aborted).await;

    client.set_player_level("Alice", 3).unwrap();
    assert_eq!(expect_error(&mut events).await, "not connected to bridge");

    client
        .send_raw("SIGN_STATE", json!({ "signName": "Gate" }))
        .unwrap();
    let message = expect_error(&mut events).await;
    assert!(message.contains("SIGN_STATE"), "{message}");

    assert!(recorder.sent().is_empty());
    client.shutdown().await;
}
