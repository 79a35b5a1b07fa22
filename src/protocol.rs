//! Wire-compatible protocol types for the bridge event stream.
//!
//! Every frame, in both directions, is a JSON envelope:
//!
//! ```text
//! { "messageType": <1..5>, "message": { ... } }
//! ```
//!
//! Outbound commands carry `{ "type", "playerName" | "signName", "value" }`
//! in `message`. [`Command`] owns the mapping between a [`CommandType`] and
//! the fields it requires; the typed constructors produce well-formed commands
//! and [`Command::from_args`] performs the presence-only validation used for
//! loosely-typed callers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{BridgeError, Result};

// ── Message types ───────────────────────────────────────────────────

/// Discriminator of the outer envelope.
///
/// Integers the client does not know are kept as [`MessageType::Unknown`] so
/// that newer bridges can add message kinds without breaking older clients.
/// Decoding never fails: an integral float counts as its integer and any
/// other value, or none at all, becomes [`MessageType::Unrecognized`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(from = "Value")]
pub enum MessageType {
    /// Player state change (1).
    PlayerMessage,
    /// Server state change (2).
    ServerMessage,
    /// Player-targeted command (3).
    PlayerCommandsMessage,
    /// Sign state change (4).
    SignMessage,
    /// Sign-targeted command (5).
    SignCommandsMessage,
    /// Any other integer discriminator.
    Unknown(i64),
    /// Missing, or not an integer.
    #[default]
    Unrecognized,
}

impl MessageType {
    /// Returns the wire discriminator, `None` for [`MessageType::Unrecognized`].
    pub fn code(self) -> Option<i64> {
        match self {
            Self::PlayerMessage => Some(1),
            Self::ServerMessage => Some(2),
            Self::PlayerCommandsMessage => Some(3),
            Self::SignMessage => Some(4),
            Self::SignCommandsMessage => Some(5),
            Self::Unknown(code) => Some(code),
            Self::Unrecognized => None,
        }
    }

    /// Returns `true` for the two command-carrying message types.
    pub fn is_command(self) -> bool {
        matches!(self, Self::PlayerCommandsMessage | Self::SignCommandsMessage)
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.code() {
            Some(code) => write!(f, "{code}"),
            None => f.write_str("unrecognized"),
        }
    }
}

impl From<i64> for MessageType {
    fn from(code: i64) -> Self {
        match code {
            1 => Self::PlayerMessage,
            2 => Self::ServerMessage,
            3 => Self::PlayerCommandsMessage,
            4 => Self::SignMessage,
            5 => Self::SignCommandsMessage,
            other => Self::Unknown(other),
        }
    }
}

impl From<Value> for MessageType {
    fn from(value: Value) -> Self {
        if let Some(code) = value.as_i64() {
            return Self::from(code);
        }
        value
            .as_f64()
            .and_then(whole_number)
            .map_or(Self::Unrecognized, Self::from)
    }
}

impl Serialize for MessageType {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self.code() {
            Some(code) => serializer.serialize_i64(code),
            None => serializer.serialize_none(),
        }
    }
}

// ── Envelope ────────────────────────────────────────────────────────

/// The outer wire object shared by inbound and outbound frames.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    /// Kind of payload carried in `message`.
    #[serde(rename = "messageType", default)]
    pub message_type: MessageType,
    /// Opaque payload; its shape depends on `message_type`.
    #[serde(default)]
    pub message: Value,
}

impl Envelope {
    /// Parse one inbound text frame.
    ///
    /// Any JSON is accepted. A value that is not an object is carried whole in
    /// `message` under [`MessageType::Unrecognized`].
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::Serialization`] if the frame is not JSON.
    pub fn decode(text: &str) -> Result<Self> {
        match serde_json::from_str::<Value>(text)? {
            object @ Value::Object(_) => Ok(serde_json::from_value(object)?),
            other => Ok(Self {
                message_type: MessageType::Unrecognized,
                message: other,
            }),
        }
    }

    /// Extract the command carried by a player- or sign-commands envelope.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::UnknownCommandType`] if the envelope is not a
    /// command envelope, or any error [`Command`] deserialization produces.
    pub fn into_command(self) -> Result<Command> {
        if !self.message_type.is_command() {
            return Err(BridgeError::UnknownCommandType(format!(
                "envelope message type {} does not carry a command",
                self.message_type
            )));
        }
        Ok(serde_json::from_value(self.message)?)
    }
}

/// Borrowing envelope used on the send path so the command keeps its field order.
#[derive(Serialize)]
struct OutboundEnvelope<'a> {
    #[serde(rename = "messageType")]
    message_type: MessageType,
    message: &'a Command,
}

// ── Command types ───────────────────────────────────────────────────

/// Whether a command targets a player or a sign.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandCategory {
    /// Targets a player by `playerName`.
    Player,
    /// Targets a sign by `signName`.
    Sign,
}

impl CommandCategory {
    /// Name of the field identifying the command's target.
    pub fn identifier_field(self) -> &'static str {
        match self {
            Self::Player => "playerName",
            Self::Sign => "signName",
        }
    }

    /// Envelope type commands of this category are sent with.
    pub fn message_type(self) -> MessageType {
        match self {
            Self::Player => MessageType::PlayerCommandsMessage,
            Self::Sign => MessageType::SignCommandsMessage,
        }
    }
}

/// The fixed set of commands the bridge accepts.
///
/// Serializes to the bridge's wire strings (`PLAYER_WALK_SPEED`,
/// `COMMAND_SIGN_ACTIVE`, ...). [`FromStr`] accepts both the wire strings and
/// the short identifiers returned by [`name`](CommandType::name).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CommandType {
    #[serde(rename = "PLAYER_HEALTH")]
    PlayerHealth,
    #[serde(rename = "PLAYER_WALK_SPEED", alias = "PLAYER_WALKSPEED")]
    PlayerWalkSpeed,
    #[serde(rename = "PLAYER_LEVEL")]
    PlayerLevel,
    #[serde(rename = "PLAYER_GAME_MODE", alias = "PLAYER_GAMEMODE")]
    PlayerGameMode,
    #[serde(rename = "PLAYER_LOCATION")]
    PlayerLocation,
    #[serde(rename = "COMMAND_SIGN_ACTIVE", alias = "SIGN_STATE")]
    SignState,
}

impl CommandType {
    /// Every command type, player commands first.
    pub const ALL: [CommandType; 6] = [
        Self::PlayerHealth,
        Self::PlayerWalkSpeed,
        Self::PlayerLevel,
        Self::PlayerGameMode,
        Self::PlayerLocation,
        Self::SignState,
    ];

    /// String sent in the `type` field.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::PlayerHealth => "PLAYER_HEALTH",
            Self::PlayerWalkSpeed => "PLAYER_WALK_SPEED",
            Self::PlayerLevel => "PLAYER_LEVEL",
            Self::PlayerGameMode => "PLAYER_GAME_MODE",
            Self::PlayerLocation => "PLAYER_LOCATION",
            Self::SignState => "COMMAND_SIGN_ACTIVE",
        }
    }

    /// Short identifier used in error messages and accepted by `send_raw`.
    pub fn name(self) -> &'static str {
        match self {
            Self::PlayerHealth => "PLAYER_HEALTH",
            Self::PlayerWalkSpeed => "PLAYER_WALKSPEED",
            Self::PlayerLevel => "PLAYER_LEVEL",
            Self::PlayerGameMode => "PLAYER_GAMEMODE",
            Self::PlayerLocation => "PLAYER_LOCATION",
            Self::SignState => "SIGN_STATE",
        }
    }

    pub fn category(self) -> CommandCategory {
        match self {
            Self::SignState => CommandCategory::Sign,
            _ => CommandCategory::Player,
        }
    }

    /// Name of the argument holding the command's value.
    pub fn value_field(self) -> &'static str {
        match self {
            Self::PlayerHealth => "health",
            Self::PlayerWalkSpeed => "walkSpeed",
            Self::PlayerLevel => "level",
            Self::PlayerGameMode => "gameMode",
            Self::PlayerLocation => "location",
            Self::SignState => "state",
        }
    }
}

impl fmt::Display for CommandType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CommandType {
    type Err = BridgeError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|ty| ty.name() == s || ty.as_str() == s)
            .ok_or_else(|| BridgeError::UnknownCommandType(s.to_string()))
    }
}

// ── Typed values ────────────────────────────────────────────────────

/// Game modes accepted by [`Command::player_game_mode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GameMode {
    Survival,
    Creative,
    Adventure,
    Spectator,
}

/// A position accepted by [`Command::player_location`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    /// World name; the bridge keeps the player's current world when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub world: Option<String>,
}

impl Location {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self {
            x,
            y,
            z,
            world: None,
        }
    }

    #[must_use]
    pub fn in_world(mut self, world: impl Into<String>) -> Self {
        self.world = Some(world.into());
        self
    }
}

impl From<GameMode> for Value {
    fn from(mode: GameMode) -> Self {
        let name = match mode {
            GameMode::Survival => "SURVIVAL",
            GameMode::Creative => "CREATIVE",
            GameMode::Adventure => "ADVENTURE",
            GameMode::Spectator => "SPECTATOR",
        };
        Value::String(name.to_string())
    }
}

impl From<Location> for Value {
    fn from(location: Location) -> Self {
        let mut map = serde_json::Map::new();
        map.insert("x".into(), json_number(location.x));
        map.insert("y".into(), json_number(location.y));
        map.insert("z".into(), json_number(location.z));
        if let Some(world) = location.world {
            map.insert("world".into(), Value::String(world));
        }
        Value::Object(map)
    }
}

// ── Commands ────────────────────────────────────────────────────────

/// One outbound control command.
///
/// `value` is forwarded verbatim: the client does not check that a health is
/// a number or a level is in range, that is the bridge's business. The typed
/// constructors send whole-number floats as integers (`20.0` as `20`).
///
/// # Example
///
/// ```
/// use game_bridge_client::protocol::Command;
///
/// let json = Command::sign_state("Gate", true).encode().unwrap();
/// assert_eq!(
///     json,
///     r#"{"messageType":5,"message":{"type":"COMMAND_SIGN_ACTIVE","signName":"Gate","value":true}}"#
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "WireCommand", try_from = "WireCommand")]
pub struct Command {
    pub command_type: CommandType,
    /// Player or sign name, depending on the command's category.
    pub target_name: String,
    pub value: Value,
}

impl Command {
    /// Build a command from its parts without further checks.
    pub fn new(
        command_type: CommandType,
        target_name: impl Into<String>,
        value: impl Into<Value>,
    ) -> Self {
        Self {
            command_type,
            target_name: target_name.into(),
            value: value.into(),
        }
    }

    pub fn player_health(player_name: impl Into<String>, health: f64) -> Self {
        Self::new(CommandType::PlayerHealth, player_name, json_number(health))
    }

    pub fn player_walk_speed(player_name: impl Into<String>, walk_speed: f64) -> Self {
        Self::new(CommandType::PlayerWalkSpeed, player_name, json_number(walk_speed))
    }

    pub fn player_level(player_name: impl Into<String>, level: u32) -> Self {
        Self::new(CommandType::PlayerLevel, player_name, level)
    }

    pub fn player_game_mode(player_name: impl Into<String>, game_mode: GameMode) -> Self {
        Self::new(CommandType::PlayerGameMode, player_name, game_mode)
    }

    pub fn player_location(player_name: impl Into<String>, location: Location) -> Self {
        Self::new(CommandType::PlayerLocation, player_name, location)
    }

    pub fn sign_state(sign_name: impl Into<String>, active: bool) -> Self {
        Self::new(CommandType::SignState, sign_name, active)
    }

    /// Build a command from a loosely-typed argument object such as
    /// `{"playerName": "Alice", "health": 20}`.
    ///
    /// Only the presence of the identifier and value fields is checked; a
    /// `null` counts as absent. A non-string identifier is stringified.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::MissingField`] naming the first absent field.
    pub fn from_args(command_type: CommandType, args: &Value) -> Result<Self> {
        let identifier = command_type.category().identifier_field();
        let target = present(args, identifier).ok_or_else(|| BridgeError::MissingField {
            command_type: command_type.name().to_string(),
            field: identifier,
        })?;
        let value_field = command_type.value_field();
        let value = present(args, value_field).ok_or_else(|| BridgeError::MissingField {
            command_type: command_type.name().to_string(),
            field: value_field,
        })?;

        let target_name = match target {
            Value::String(name) => name.clone(),
            other => other.to_string(),
        };
        Ok(Self::new(command_type, target_name, value.clone()))
    }

    /// Parse `command_type` and validate `args` in one step.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::UnknownCommandType`] or
    /// [`BridgeError::MissingField`].
    pub fn from_raw(command_type: &str, args: &Value) -> Result<Self> {
        let command_type = command_type.parse::<CommandType>()?;
        Self::from_args(command_type, args)
    }

    pub fn category(&self) -> CommandCategory {
        self.command_type.category()
    }

    /// Serialize the command wrapped in its category's envelope.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::Serialization`] if the value cannot be encoded.
    pub fn encode(&self) -> Result<String> {
        let envelope = OutboundEnvelope {
            message_type: self.category().message_type(),
            message: self,
        };
        Ok(serde_json::to_string(&envelope)?)
    }

    /// Decode a command envelope produced by [`encode`](Self::encode).
    ///
    /// # Errors
    ///
    /// Returns an error if the frame is not a well-formed command envelope.
    pub fn decode(text: &str) -> Result<Self> {
        Envelope::decode(text)?.into_command()
    }
}

/// `n` as an integer when it has no fractional part and fits in `i64`.
fn whole_number(n: f64) -> Option<i64> {
    // `i64::MAX as f64` rounds up to 2^63, hence the strict upper bound.
    (n.fract() == 0.0 && n >= i64::MIN as f64 && n < i64::MAX as f64).then(|| n as i64)
}

/// Encode a whole number without a fractional part, so `20.0` goes out as `20`.
fn json_number(n: f64) -> Value {
    whole_number(n).map_or_else(|| Value::from(n), Value::from)
}

fn present<'a>(args: &'a Value, field: &str) -> Option<&'a Value> {
    args.get(field).filter(|value| !value.is_null())
}

/// On-the-wire shape of [`Command`].
#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireCommand {
    #[serde(rename = "type")]
    command_type: CommandType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    player_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    sign_name: Option<String>,
    #[serde(default)]
    value: Value,
}

impl From<Command> for WireCommand {
    fn from(command: Command) -> Self {
        let (player_name, sign_name) = match command.category() {
            CommandCategory::Player => (Some(command.target_name), None),
            CommandCategory::Sign => (None, Some(command.target_name)),
        };
        Self {
            command_type: command.command_type,
            player_name,
            sign_name,
            value: command.value,
        }
    }
}

impl TryFrom<WireCommand> for Command {
    type Error = BridgeError;

    fn try_from(wire: WireCommand) -> Result<Self> {
        let category = wire.command_type.category();
        let target_name = match category {
            CommandCategory::Player => wire.player_name,
            CommandCategory::Sign => wire.sign_name,
        }
        .ok_or_else(|| BridgeError::MissingField {
            command_type: wire.command_type.name().to_string(),
            field: category.identifier_field(),
        })?;
        Ok(Self {
            command_type: wire.command_type,
            target_name,
            value: wire.value,
        })
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
    use serde_json::json;

    #[test]
    fn message_type_codes() {
        assert_eq!(MessageType::from(1), MessageType::PlayerMessage);
        assert_eq!(MessageType::from(5), MessageType::SignCommandsMessage);
        assert_eq!(MessageType::from(42), MessageType::Unknown(42));
        assert_eq!(MessageType::SignMessage.code(), Some(4));
        assert_eq!(MessageType::Unrecognized.code(), None);
        assert!(MessageType::PlayerCommandsMessage.is_command());
        assert!(!MessageType::ServerMessage.is_command());
    }

    #[test]
    fn command_type_parses_names_and_wire_strings() {
        assert_eq!(
            "PLAYER_WALKSPEED".parse::<CommandType>().unwrap(),
            CommandType::PlayerWalkSpeed
        );
        assert_eq!(
            "PLAYER_WALK_SPEED".parse::<CommandType>().unwrap(),
            CommandType::PlayerWalkSpeed
        );
        assert_eq!(
            "SIGN_STATE".parse::<CommandType>().unwrap(),
            CommandType::SignState
        );
        assert_eq!(
            "COMMAND_SIGN_ACTIVE".parse::<CommandType>().unwrap(),
            CommandType::SignState
        );
        let err = "PLAYER_MANA".parse::<CommandType>().unwrap_err();
        assert!(matches!(err, BridgeError::UnknownCommandType(ref ty) if ty == "PLAYER_MANA"));
    }

    #[test]
    fn categories_follow_the_fixed_table() {
        for ty in CommandType::ALL {
            let expected = if ty == CommandType::SignState {
                CommandCategory::Sign
            } else {
                CommandCategory::Player
            };
            assert_eq!(ty.category(), expected, "{ty}");
        }
    }

    #[test]
    fn player_health_scenario_encodes_exactly() {
        let command = Command::from_raw(
            "PLAYER_HEALTH",
            &json!({ "playerName": "Alice", "health": 20 }),
        )
        .unwrap();
        assert_eq!(
            command.encode().unwrap(),
            r#"{"messageType":3,"message":{"type":"PLAYER_HEALTH","playerName":"Alice","value":20}}"#
        );
    }

    #[test]
    fn sign_state_scenario_encodes_exactly() {
        let command =
            Command::from_raw("SIGN_STATE", &json!({ "signName": "Gate", "state": true })).unwrap();
        assert_eq!(
            command.encode().unwrap(),
            r#"{"messageType":5,"message":{"type":"COMMAND_SIGN_ACTIVE","signName":"Gate","value":true}}"#
        );
    }

    #[test]
    fn every_command_type_validates_its_own_fields() {
        for ty in CommandType::ALL {
            let mut args = serde_json::Map::new();
            args.insert(ty.category().identifier_field().into(), json!("target"));
            args.insert(ty.value_field().into(), json!(1));
            let command = Command::from_args(ty, &Value::Object(args)).unwrap();
            assert_eq!(command.command_type, ty);
            assert_eq!(command.target_name, "target");
            assert_eq!(command.value, json!(1));
        }
    }

    #[test]
    fn missing_identifier_is_reported() {
        let err = Command::from_args(CommandType::PlayerLevel, &json!({ "level": 3 })).unwrap_err();
        match err {
            BridgeError::MissingField {
                command_type,
                field,
            } => {
                assert_eq!(command_type, "PLAYER_LEVEL");
                assert_eq!(field, "playerName");
            }
            other => panic!("expected MissingField, got {other:?}"),
        }
    }

    #[test]
    fn missing_value_is_reported() {
        let err = Command::from_args(CommandType::SignState, &json!({ "signName": "Gate" }))
            .unwrap_err();
        assert!(err.to_string().contains("SIGN_STATE"));
        assert!(err.to_string().contains("state"));
    }

    #[test]
    fn wrong_category_identifier_is_rejected() {
        let err = Command::from_args(
            CommandType::SignState,
            &json!({ "playerName": "Alice", "state": true }),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            BridgeError::MissingField {
                field: "signName",
                ..
            }
        ));
    }

    #[test]
    fn null_counts_as_missing() {
        let err = Command::from_args(
            CommandType::PlayerHealth,
            &json!({ "playerName": "Alice", "health": null }),
        )
        .unwrap_err();
        assert!(matches!(err, BridgeError::MissingField { field: "health", .. }));
    }

    #[test]
    fn non_object_args_are_rejected() {
        assert!(Command::from_args(CommandType::PlayerHealth, &json!([1, 2])).is_err());
        assert!(Command::from_args(CommandType::PlayerHealth, &json!("Alice")).is_err());
    }

    #[test]
    fn value_type_is_not_checked() {
        let command = Command::from_args(
            CommandType::PlayerHealth,
            &json!({ "playerName": "Alice", "health": "twenty" }),
        )
        .unwrap();
        assert_eq!(command.value, json!("twenty"));
        assert!(command.encode().unwrap().contains(r#""value":"twenty""#));
    }

    #[test]
    fn extra_fields_are_ignored() {
        let command = Command::from_args(
            CommandType::PlayerLevel,
            &json!({ "playerName": "Bob", "level": 7, "reason": "quest" }),
        )
        .unwrap();
        assert!(!command.encode().unwrap().contains("quest"));
    }

    #[test]
    fn numeric_identifier_is_stringified() {
        let command = Command::from_args(
            CommandType::SignState,
            &json!({ "signName": 12, "state": false }),
        )
        .unwrap();
        assert_eq!(command.target_name, "12");
    }

    #[test]
    fn encoded_command_decodes_back() {
        let original = Command::player_location(
            "Steve",
            Location::new(10.5, 64.0, -3.25).in_world("nether"),
        );
        let decoded = Command::decode(&original.encode().unwrap()).unwrap();
        assert_eq!(decoded, original);
    }

    #[test]
    fn typed_constructors_fill_values() {
        assert_eq!(
            Command::player_game_mode("Alex", GameMode::Creative).value,
            json!("CREATIVE")
        );
        assert_eq!(Command::player_level("Alex", 30).value, json!(30));
        assert_eq!(Command::player_walk_speed("Alex", 0.5).value, json!(0.5));
        assert_eq!(
            Command::player_location("Alex", Location::new(1.0, 2.5, 3.0)).value,
            json!({ "x": 1, "y": 2.5, "z": 3 })
        );
    }

    #[test]
    fn envelope_keeps_unknown_message_types() {
        let envelope = Envelope::decode(r#"{"messageType":17,"message":{"a":1}}"#).unwrap();
        assert_eq!(envelope.message_type, MessageType::Unknown(17));
        assert_eq!(envelope.message, json!({ "a": 1 }));
    }

    #[test]
    fn envelope_without_message_defaults_to_null() {
        let envelope = Envelope::decode(r#"{"messageType":2}"#).unwrap();
        assert_eq!(envelope.message_type, MessageType::ServerMessage);
        assert!(envelope.message.is_null());
    }

    #[test]
    fn non_command_envelope_is_not_a_command() {
        let envelope = Envelope::decode(r#"{"messageType":1,"message":{}}"#).unwrap();
        assert!(envelope.into_command().is_err());
    }

    #[test]
    fn only_non_json_fails_to_decode() {
        assert!(Envelope::decode("not json").is_err());
        assert!(Envelope::decode("{").is_err());
        assert!(Envelope::decode("").is_err());
    }

    #[test]
    fn message_type_decodes_leniently() {
        let cases = [
            (r#"{"messageType":1.0}"#, MessageType::PlayerMessage),
            (r#"{"messageType":-2.0}"#, MessageType::Unknown(-2)),
            (r#"{"messageType":1.5}"#, MessageType::Unrecognized),
            (r#"{"messageType":"1"}"#, MessageType::Unrecognized),
            (r#"{"messageType":null}"#, MessageType::Unrecognized),
            (r#"{"messageType":[4]}"#, MessageType::Unrecognized),
            (r#"{"messageType":18446744073709551615}"#, MessageType::Unrecognized),
            (r#"{"message":{}}"#, MessageType::Unrecognized),
        ];
        for (frame, expected) in cases {
            assert_eq!(Envelope::decode(frame).unwrap().message_type, expected, "{frame}");
        }
    }

    #[test]
    fn non_object_json_is_carried_whole() {
        let envelope = Envelope::decode("[1,2]").unwrap();
        assert_eq!(envelope.message_type, MessageType::Unrecognized);
        assert_eq!(envelope.message, json!([1, 2]));
    }

    #[test]
    fn whole_number_floats_encode_as_integers() {
        assert_eq!(Command::player_health("Alice", 20.0).value, json!(20));
        assert_eq!(Command::player_health("Alice", 18.5).value, json!(18.5));
        assert_eq!(Command::player_walk_speed("Alice", -1.0).value, json!(-1));
        assert_eq!(
            Command::player_health("Alice", 20.0).encode().unwrap(),
            r#"{"messageType":3,"message":{"type":"PLAYER_HEALTH","playerName":"Alice","value":20}}"#
        );
    }
}
