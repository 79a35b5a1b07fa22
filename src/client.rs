//! Auto-reconnecting client for the bridge event stream.
//!
//! [`BridgeClient`] is a thin handle that talks to a background connection
//! loop task over an unbounded MPSC channel. The loop owns the transport, the
//! connection state and the reconnect counter; events are emitted on a bounded
//! channel ([`tokio::sync::mpsc::Receiver<BridgeEvent>`]) returned from
//! [`BridgeClient::connect`].
//!
//! # Example
//!
//! ```rust,no_run
//! # async fn example() -> Result<(), game_bridge_client::BridgeError> {
//! use game_bridge_client::{BridgeClient, BridgeConfig, BridgeEvent};
//!
//! let (client, mut events) = BridgeClient::connect("bridge.local", BridgeConfig::default())?;
//!
//! while let Some(event) = events.recv().await {
//!     match event {
//!         BridgeEvent::Connected => client.set_player_health("Alice", 20.0)?,
//!         BridgeEvent::Player(payload) => println!("player update: {payload}"),
//!         BridgeEvent::Error { message } => eprintln!("rejected: {message}"),
//!         _ => {}
//!     }
//! }
//! # Ok(())
//! # }
//! ```

use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn};

use crate::close_codes::CloseCode;
use crate::dispatch;
use crate::endpoint::{Endpoint, DEFAULT_PORT};
use crate::error::{BridgeError, Result};
use crate::event::BridgeEvent;
use crate::protocol::{Command, Envelope, GameMode, Location};
use crate::transport::{Connector, Inbound, Transport};

/// Default delay between a failed connection and the next attempt.
pub const DEFAULT_RECONNECT_INTERVAL: Duration = Duration::from_millis(6000);

/// Default capacity of the bounded event channel.
const DEFAULT_EVENT_CHANNEL_CAPACITY: usize = 256;

/// Default timeout for the graceful shutdown.
const DEFAULT_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(1);

// ── Configuration ───────────────────────────────────────────────────

/// Configuration for a [`BridgeClient`].
///
/// # Example
///
/// ```
/// use game_bridge_client::BridgeConfig;
/// use std::time::Duration;
///
/// let config = BridgeConfig::default()
///     .with_port(9000)
///     .with_reconnect_interval(Duration::from_secs(2))
///     .with_max_reconnect_attempts(5);
/// assert_eq!(config.port, 9000);
/// assert_eq!(config.max_reconnect_attempts, Some(5));
/// ```
///
/// # Loading from JSON
///
/// The reconnect-related fields can be read from the bridge's options object.
/// A zero port or interval falls back to the default, as does any absent field.
///
/// ```
/// use game_bridge_client::BridgeConfig;
/// use std::time::Duration;
///
/// let config: BridgeConfig =
///     serde_json::from_str(r#"{"port":8080,"reconnectInterval":1500,"maxReconnects":3}"#).unwrap();
/// assert_eq!(config.port, 8080);
/// assert!(config.reconnect);
/// assert_eq!(config.reconnect_interval, Duration::from_millis(1500));
/// assert_eq!(config.max_reconnect_attempts, Some(3));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BridgeConfig {
    /// Port used when the host does not name one. Defaults to **10692**.
    #[serde(deserialize_with = "port_or_default")]
    pub port: u16,
    /// Whether abnormal closures trigger a reconnect. Defaults to `true`.
    #[serde(deserialize_with = "enabled_unless_false")]
    pub reconnect: bool,
    /// Delay before each reconnect attempt. Defaults to **6 seconds**; a zero
    /// interval retries immediately.
    #[serde(deserialize_with = "interval_millis")]
    pub reconnect_interval: Duration,
    /// Reconnect attempts allowed before giving up. `None` retries forever.
    #[serde(rename = "maxReconnects")]
    pub max_reconnect_attempts: Option<u32>,
    /// Reset the reconnect counter whenever a connection opens.
    ///
    /// Defaults to `false`: the counter lives as long as the client, so a
    /// long session that reconnects successfully many times still runs out
    /// of attempts eventually.
    pub reset_reconnect_count_on_open: bool,
    /// Capacity of the bounded event channel.
    ///
    /// When the consumer cannot keep up, data and error events are dropped
    /// (with a warning logged). `Connected`, `Closed` and `Reconnecting` wait
    /// for capacity and are always delivered.
    ///
    /// Defaults to **256**. Values below 1 are clamped to 1.
    #[serde(skip)]
    pub event_channel_capacity: usize,
    /// Time [`BridgeClient::shutdown`] waits for the loop before aborting it.
    /// Defaults to **1 second**.
    #[serde(skip)]
    pub shutdown_timeout: Duration,
    /// Per-attempt connect timeout for the WebSocket connector. `None` waits
    /// as long as the operating system does.
    #[serde(skip)]
    pub connect_timeout: Option<Duration>,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            reconnect: true,
            reconnect_interval: DEFAULT_RECONNECT_INTERVAL,
            max_reconnect_attempts: None,
            reset_reconnect_count_on_open: false,
            event_channel_capacity: DEFAULT_EVENT_CHANNEL_CAPACITY,
            shutdown_timeout: DEFAULT_SHUTDOWN_TIMEOUT,
            connect_timeout: None,
        }
    }
}

impl BridgeConfig {
    #[must_use]
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    #[must_use]
    pub fn with_reconnect(mut self, reconnect: bool) -> Self {
        self.reconnect = reconnect;
        self
    }

    #[must_use]
    pub fn with_reconnect_interval(mut self, interval: Duration) -> Self {
        self.reconnect_interval = interval;
        self
    }

    #[must_use]
    pub fn with_max_reconnect_attempts(mut self, attempts: u32) -> Self {
        self.max_reconnect_attempts = Some(attempts);
        self
    }

    #[must_use]
    pub fn with_reset_reconnect_count_on_open(mut self, reset: bool) -> Self {
        self.reset_reconnect_count_on_open = reset;
        self
    }

    /// Set the capacity of the bounded event channel.
    ///
    /// Defaults to **256**. Values below 1 are clamped to 1.
    #[must_use]
    pub fn with_event_channel_capacity(mut self, capacity: usize) -> Self {
        self.event_channel_capacity = capacity.max(1);
        self
    }

    #[must_use]
    pub fn with_shutdown_timeout(mut self, timeout: Duration) -> Self {
        self.shutdown_timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }
}

fn port_or_default<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<u16, D::Error> {
    let port = Option::<u16>::deserialize(d)?;
    Ok(port.filter(|port| *port != 0).unwrap_or(DEFAULT_PORT))
}

fn enabled_unless_false<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<bool, D::Error> {
    Ok(Option::<bool>::deserialize(d)? != Some(false))
}

fn interval_millis<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<Duration, D::Error> {
    let millis = Option::<u64>::deserialize(d)?;
    Ok(millis
        .filter(|ms| *ms != 0)
        .map_or(DEFAULT_RECONNECT_INTERVAL, Duration::from_millis))
}

// ── Connection state ────────────────────────────────────────────────

/// Lifecycle state of the underlying transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConnectionState {
    Connecting,
    Open,
    Closing,
    Closed,
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Connecting => "connecting",
            Self::Open => "open",
            Self::Closing => "closing",
            Self::Closed => "closed",
        };
        f.write_str(name)
    }
}

/// State published by the connection loop.
struct ClientState {
    connection: watch::Sender<ConnectionState>,
    reconnect_attempts: AtomicU32,
}

impl ClientState {
    fn new() -> Self {
        let (connection, _) = watch::channel(ConnectionState::Connecting);
        Self {
            connection,
            reconnect_attempts: AtomicU32::new(0),
        }
    }

    fn set(&self, state: ConnectionState) {
        let previous = self.connection.send_replace(state);
        if previous != state {
            debug!(from = %previous, to = %state, "connection state changed");
        }
    }
}

/// Work queued by the handle for the connection loop.
enum LoopCommand {
    Send(Command),
    SendRaw { command_type: String, args: Value },
    Close,
}

impl LoopCommand {
    /// Validate and encode an outbound command.
    fn encode(self) -> Option<Result<String>> {
        match self {
            Self::Send(command) => Some(command.encode()),
            Self::SendRaw { command_type, args } => {
                Some(Command::from_raw(&command_type, &args).and_then(|command| command.encode()))
            }
            Self::Close => None,
        }
    }
}

// ── Client handle ───────────────────────────────────────────────────

/// Async client handle for the bridge event stream.
///
/// Created via [`BridgeClient::connect`] (WebSocket) or
/// [`BridgeClient::connect_with`] (any [`Connector`]), which spawn the
/// background connection loop and return this handle together with an event
/// receiver. The loop connects immediately and keeps reconnecting after
/// abnormal closures according to [`BridgeConfig`].
///
/// Sending methods queue the command and return immediately. Invalid
/// commands, and commands issued while the transport is not open, are
/// reported as [`BridgeEvent::Error`] and never reach the bridge.
pub struct BridgeClient {
    /// Sender half of the command channel to the connection loop.
    cmd_tx: mpsc::UnboundedSender<LoopCommand>,
    /// State published by the connection loop.
    state: Arc<ClientState>,
    endpoint: Endpoint,
    /// Handle to the background connection loop task.
    task: Option<tokio::task::JoinHandle<()>>,
    shutdown_timeout: Duration,
}

impl BridgeClient {
    /// Resolve `host` and start a WebSocket client for it.
    ///
    /// Must be called from within a tokio runtime. An unreachable bridge is
    /// not an error here: it shows up as a [`BridgeEvent::Closed`] with
    /// [`CloseCode::Aborted`] followed by the configured reconnect attempts.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::InvalidEndpoint`] if `host` cannot be turned
    /// into a URL.
    #[cfg(feature = "transport-websocket")]
    pub fn connect(
        host: &str,
        config: BridgeConfig,
    ) -> Result<(Self, mpsc::Receiver<BridgeEvent>)> {
        let mut connector = crate::transports::WebSocketConnector::new();
        if let Some(timeout) = config.connect_timeout {
            connector = connector.with_connect_timeout(timeout);
        }
        Self::connect_with(connector, host, config)
    }

    /// Resolve `host` and start a client that opens transports with `connector`.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::InvalidEndpoint`] if `host` cannot be turned
    /// into a URL.
    pub fn connect_with<C: Connector>(
        connector: C,
        host: &str,
        config: BridgeConfig,
    ) -> Result<(Self, mpsc::Receiver<BridgeEvent>)> {
        let endpoint = Endpoint::resolve(host, config.port)?;

        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel::<LoopCommand>();
        // Clamp capacity to at least 1 (tokio panics on 0).
        let capacity = config.event_channel_capacity.max(1);
        let (event_tx, event_rx) = mpsc::channel::<BridgeEvent>(capacity);

        let state = Arc::new(ClientState::new());
        let shutdown_timeout = config.shutdown_timeout;

        let task = tokio::spawn(connection_loop(
            connector,
            endpoint.clone(),
            config,
            cmd_rx,
            event_tx,
            Arc::clone(&state),
        ));

        let client = Self {
            cmd_tx,
            state,
            endpoint,
            task: Some(task),
            shutdown_timeout,
        };

        Ok((client, event_rx))
    }

    // ── Commands ────────────────────────────────────────────────────

    /// Queue a command for the bridge.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::NotConnected`] if the connection loop has stopped.
    pub fn send(&self, command: Command) -> Result<()> {
        self.queue(LoopCommand::Send(command))
    }

    /// Queue a command given as a type name and a loose argument object,
    /// e.g. `send_raw("PLAYER_HEALTH", json!({"playerName": "Alice", "health": 20}))`.
    ///
    /// Unknown command types and missing fields are reported as
    /// [`BridgeEvent::Error`]; the value is forwarded without type checks.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::NotConnected`] if the connection loop has stopped.
    pub fn send_raw(&self, command_type: impl Into<String>, args: Value) -> Result<()> {
        self.queue(LoopCommand::SendRaw {
            command_type: command_type.into(),
            args,
        })
    }

    /// # Errors
    ///
    /// Returns [`BridgeError::NotConnected`] if the connection loop has stopped.
    pub fn set_player_health(&self, player_name: impl Into<String>, health: f64) -> Result<()> {
        self.send(Command::player_health(player_name, health))
    }

    /// # Errors
    ///
    /// Returns [`BridgeError::NotConnected`] if the connection loop has stopped.
    pub fn set_player_walk_speed(
        &self,
        player_name: impl Into<String>,
        walk_speed: f64,
    ) -> Result<()> {
        self.send(Command::player_walk_speed(player_name, walk_speed))
    }

    /// # Errors
    ///
    /// Returns [`BridgeError::NotConnected`] if the connection loop has stopped.
    pub fn set_player_level(&self, player_name: impl Into<String>, level: u32) -> Result<()> {
        self.send(Command::player_level(player_name, level))
    }

    /// # Errors
    ///
    /// Returns [`BridgeError::NotConnected`] if the connection loop has stopped.
    pub fn set_player_game_mode(
        &self,
        player_name: impl Into<String>,
        game_mode: GameMode,
    ) -> Result<()> {
        self.send(Command::player_game_mode(player_name, game_mode))
    }

    /// # Errors
    ///
    /// Returns [`BridgeError::NotConnected`] if the connection loop has stopped.
    pub fn set_player_location(
        &self,
        player_name: impl Into<String>,
        location: Location,
    ) -> Result<()> {
        self.send(Command::player_location(player_name, location))
    }

    /// # Errors
    ///
    /// Returns [`BridgeError::NotConnected`] if the connection loop has stopped.
    pub fn set_sign_state(&self, sign_name: impl Into<String>, active: bool) -> Result<()> {
        self.send(Command::sign_state(sign_name, active))
    }

    /// Close the connection with [`CloseCode::Normal`] and stop reconnecting.
    ///
    /// A reconnect that is waiting for its interval is cancelled.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::NotConnected`] if the connection loop has already stopped.
    pub fn close(&self) -> Result<()> {
        self.queue(LoopCommand::Close)
    }

    /// Close the connection and wait for the connection loop to exit.
    ///
    /// The loop gets [`BridgeConfig::shutdown_timeout`] to finish; after that
    /// it is aborted.
    pub async fn shutdown(&mut self) {
        debug!("BridgeClient: shutdown requested");
        let _ = self.cmd_tx.send(LoopCommand::Close);

        if let Some(mut task) = self.task.take() {
            match tokio::time::timeout(self.shutdown_timeout, &mut task).await {
                Ok(Ok(())) => {}
                Ok(Err(join_err)) => {
                    warn!("connection loop terminated with join error: {join_err}");
                }
                Err(_) => {
                    warn!("connection loop did not exit within timeout; aborting task");
                    task.abort();
                    if let Err(join_err) = task.await {
                        debug!("connection loop aborted: {join_err}");
                    }
                }
            }
        }

        self.state.set(ConnectionState::Closed);
    }

    // ── State accessors ─────────────────────────────────────────────

    /// Current state of the transport.
    pub fn state(&self) -> ConnectionState {
        *self.state.connection.borrow()
    }

    /// Returns `true` while a transport is open.
    pub fn is_open(&self) -> bool {
        self.state() == ConnectionState::Open
    }

    /// Subscribe to connection state changes.
    pub fn watch_state(&self) -> watch::Receiver<ConnectionState> {
        self.state.connection.subscribe()
    }

    /// Reconnect attempts made so far.
    pub fn reconnect_attempts(&self) -> u32 {
        self.state.reconnect_attempts.load(Ordering::Acquire)
    }

    /// The resolved bridge endpoint.
    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    fn queue(&self, cmd: LoopCommand) -> Result<()> {
        self.cmd_tx
            .send(cmd)
            .map_err(|_| BridgeError::NotConnected)
    }
}

impl fmt::Debug for BridgeClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BridgeClient")
            .field("endpoint", &self.endpoint.as_str())
            .field("state", &self.state())
            .field("reconnect_attempts", &self.reconnect_attempts())
            .field("has_task", &self.task.is_some())
            .finish()
    }
}

impl Drop for BridgeClient {
    fn drop(&mut self) {
        // No executor is available to drive a graceful close from `Drop`;
        // aborting drops the loop future and with it the transport.
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

// ── Connection loop ─────────────────────────────────────────────────

/// How a connection ended.
struct Closure {
    code: CloseCode,
    reason: String,
}

impl Closure {
    fn normal(reason: &str) -> Self {
        Self {
            code: CloseCode::Normal,
            reason: reason.to_string(),
        }
    }

    fn aborted() -> Self {
        Self {
            code: CloseCode::Aborted,
            reason: String::new(),
        }
    }
}

/// Background loop driving connect → open → closed → reconnect.
///
/// Exits when:
/// - A connection closes with [`CloseCode::Normal`] (either side)
/// - A connection fails and reconnecting is disabled or exhausted
/// - A close is requested while a reconnect is pending
async fn connection_loop<C: Connector>(
    connector: C,
    endpoint: Endpoint,
    config: BridgeConfig,
    mut cmd_rx: mpsc::UnboundedReceiver<LoopCommand>,
    event_tx: mpsc::Sender<BridgeEvent>,
    state: Arc<ClientState>,
) {
    debug!(endpoint = %endpoint, "connection loop started");
    let mut attempts: u32 = 0;

    loop {
        state.set(ConnectionState::Connecting);
        let closure = match open(&connector, &endpoint, &mut cmd_rx, &event_tx).await {
            Ok(transport) => {
                info!(endpoint = %endpoint, "connected to bridge");
                state.set(ConnectionState::Open);
                if config.reset_reconnect_count_on_open && attempts != 0 {
                    attempts = 0;
                    state.reconnect_attempts.store(0, Ordering::Release);
                }
                emit_lifecycle(&event_tx, BridgeEvent::Connected).await;
                run_session(transport, &mut cmd_rx, &event_tx, &state).await
            }
            Err(closure) => closure,
        };

        state.set(ConnectionState::Closed);
        let code = closure.code;
        emit_closed(&event_tx, closure).await;

        if code.is_normal() {
            debug!("connection closed normally, not reconnecting");
            break;
        }
        if !config.reconnect {
            info!(code = code.code(), "connection lost and reconnect is disabled");
            break;
        }
        if config
            .max_reconnect_attempts
            .is_some_and(|max| attempts >= max)
        {
            warn!(attempts, "reconnect attempts exhausted, giving up");
            break;
        }
        if !wait_for_retry(config.reconnect_interval, &mut cmd_rx, &event_tx).await {
            break;
        }

        attempts = attempts.saturating_add(1);
        state.reconnect_attempts.store(attempts, Ordering::Release);
        info!(attempt = attempts, endpoint = %endpoint, "reconnecting to bridge");
        emit_lifecycle(&event_tx, BridgeEvent::Reconnecting { attempt: attempts }).await;
    }

    state.set(ConnectionState::Closed);
    debug!("connection loop exited");
}

/// Open a transport, still serving the command channel while the attempt runs.
///
/// A failed attempt or a close request yields the [`Closure`] to report.
async fn open<C: Connector>(
    connector: &C,
    endpoint: &Endpoint,
    cmd_rx: &mut mpsc::UnboundedReceiver<LoopCommand>,
    event_tx: &mpsc::Sender<BridgeEvent>,
) -> std::result::Result<C::Transport, Closure> {
    let attempt = connector.connect(endpoint);
    tokio::pin!(attempt);

    loop {
        tokio::select! {
            result = &mut attempt => {
                return result.map_err(|e| {
                    // Transport errors are not surfaced; the closure says enough.
                    debug!(error = %e, "connection attempt failed");
                    Closure::aborted()
                });
            }
            cmd = cmd_rx.recv() => match cmd {
                Some(LoopCommand::Close) | None => {
                    debug!("close requested while connecting");
                    return Err(Closure::normal("closed before open"));
                }
                Some(cmd) => reject_while_disconnected(event_tx, cmd).await,
            }
        }
    }
}

/// Pump one open transport until it closes.
async fn run_session(
    mut transport: impl Transport,
    cmd_rx: &mut mpsc::UnboundedReceiver<LoopCommand>,
    event_tx: &mpsc::Sender<BridgeEvent>,
    state: &ClientState,
) -> Closure {
    loop {
        tokio::select! {
            // Branch 1: outgoing command from the client handle
            cmd = cmd_rx.recv() => match cmd.map(LoopCommand::encode) {
                Some(Some(Ok(json))) => {
                    debug!(frame = %json, "sending command");
                    if let Err(e) = transport.send(json).await {
                        // The close that follows a broken transport is what gets reported.
                        debug!(error = %e, "transport send failed");
                    }
                }
                Some(Some(Err(e))) => {
                    warn!(error = %e, "command rejected");
                    emit_event(event_tx, BridgeEvent::Error { message: e.to_string() }).await;
                }
                // Close requested or handle dropped.
                Some(None) | None => {
                    state.set(ConnectionState::Closing);
                    if let Err(e) = transport.close(CloseCode::Normal).await {
                        debug!(error = %e, "transport close failed");
                    }
                    return Closure::normal("closed by client");
                }
            },

            // Branch 2: incoming frame from the bridge
            incoming = transport.recv() => match incoming {
                Some(Ok(Inbound::Text(text))) => match Envelope::decode(&text) {
                    Ok(envelope) => {
                        for event in dispatch::route(envelope) {
                            emit_event(event_tx, event).await;
                        }
                    }
                    Err(e) => {
                        warn!("inbound frame is not JSON: {e} (raw: {text})");
                    }
                },
                Some(Ok(Inbound::Closed { code, reason })) => {
                    debug!(code = code.code(), reason = %reason, "bridge closed the connection");
                    return Closure { code, reason };
                }
                Some(Err(e)) => {
                    debug!(error = %e, "transport error");
                    return Closure::aborted();
                }
                None => {
                    debug!("transport ended without a close frame");
                    return Closure::aborted();
                }
            },
        }
    }
}

/// Sleep out the reconnect interval while serving the command channel.
///
/// Returns `false` if a close was requested, which cancels the retry.
async fn wait_for_retry(
    interval: Duration,
    cmd_rx: &mut mpsc::UnboundedReceiver<LoopCommand>,
    event_tx: &mpsc::Sender<BridgeEvent>,
) -> bool {
    if interval.is_zero() {
        return true;
    }

    debug!(delay = ?interval, "reconnect scheduled");
    let delay = tokio::time::sleep(interval);
    tokio::pin!(delay);

    loop {
        tokio::select! {
            () = &mut delay => return true,
            cmd = cmd_rx.recv() => match cmd {
                Some(LoopCommand::Close) | None => {
                    debug!("pending reconnect cancelled");
                    return false;
                }
                Some(cmd) => reject_while_disconnected(event_tx, cmd).await,
            }
        }
    }
}

/// Report a send issued while no transport is open.
async fn reject_while_disconnected(event_tx: &mpsc::Sender<BridgeEvent>, cmd: LoopCommand) {
    let message = match cmd.encode() {
        Some(Ok(_)) => BridgeError::NotConnected.to_string(),
        Some(Err(e)) => e.to_string(),
        None => return,
    };
    debug!(%message, "command dropped while disconnected");
    emit_event(event_tx, BridgeEvent::Error { message }).await;
}

/// Emit an event to the event channel. If the channel is full, log a warning
/// and drop the event to avoid blocking the connection loop.
async fn emit_event(event_tx: &mpsc::Sender<BridgeEvent>, event: BridgeEvent) {
    match event_tx.try_send(event) {
        Ok(()) => {}
        Err(mpsc::error::TrySendError::Full(dropped)) => {
            warn!(event = dropped.name(), "event channel full, dropping event");
        }
        Err(mpsc::error::TrySendError::Closed(_)) => {
            debug!("event channel closed, receiver dropped");
        }
    }
}

/// Emit a [`Closed`](BridgeEvent::Closed) event.
async fn emit_closed(event_tx: &mpsc::Sender<BridgeEvent>, closure: Closure) {
    let event = BridgeEvent::Closed {
        code: closure.code,
        reason: closure.reason,
    };
    emit_lifecycle(event_tx, event).await;
}

/// Emit a connection state transition (`Connected`, `Closed`, `Reconnecting`).
///
/// Uses `send().await` instead of `try_send`: consumers track the connection
/// through these events, so they wait for capacity rather than being dropped.
async fn emit_lifecycle(event_tx: &mpsc::Sender<BridgeEvent>, event: BridgeEvent) {
    if event_tx.send(event).await.is_err() {
        debug!("event channel closed, receiver dropped");
    }
}

// ── Tests ───────────────────────────────────────────────────────────

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
    use async_trait::async_trait;

    /// A connector whose attempts never complete.
    struct PendingConnector;

    struct NeverTransport;

    #[async_trait]
    impl Transport for NeverTransport {
        async fn send(&mut self, _message: String) -> Result<()> {
            Ok(())
        }

        async fn recv(&mut self) -> Option<Result<Inbound>> {
            std::future::pending().await
        }

        async fn close(&mut self, _code: CloseCode) -> Result<()> {
            Ok(())
        }
    }

    #[async_trait]
    impl Connector for PendingConnector {
        type Transport = NeverTransport;

        async fn connect(&self, _endpoint: &Endpoint) -> Result<NeverTransport> {
            std::future::pending().await
        }
    }

    #[test]
    fn config_defaults() {
        let config = BridgeConfig::default();
        assert_eq!(config.port, 10692);
        assert!(config.reconnect);
        assert_eq!(config.reconnect_interval, Duration::from_millis(6000));
        assert_eq!(config.max_reconnect_attempts, None);
        assert!(!config.reset_reconnect_count_on_open);
        assert_eq!(config.event_channel_capacity, 256);
        assert_eq!(config.shutdown_timeout, Duration::from_secs(1));
        assert_eq!(config.connect_timeout, None);
    }

    #[test]
    fn config_event_channel_capacity_is_clamped() {
        let config = BridgeConfig::default().with_event_channel_capacity(0);
        assert_eq!(config.event_channel_capacity, 1);
    }

    #[test]
    fn config_from_empty_json_uses_defaults() {
        let config: BridgeConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, BridgeConfig::default());
    }

    #[test]
    fn config_zero_values_fall_back_to_defaults() {
        let config: BridgeConfig =
            serde_json::from_str(r#"{"port":0,"reconnectInterval":0,"reconnect":null}"#).unwrap();
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.reconnect_interval, DEFAULT_RECONNECT_INTERVAL);
        assert!(config.reconnect);
    }

    #[test]
    fn config_reads_all_option_fields() {
        let config: BridgeConfig = serde_json::from_str(
            r#"{"port":9000,"reconnect":false,"reconnectInterval":250,"maxReconnects":4,"resetReconnectCountOnOpen":true}"#,
        )
        .unwrap();
        assert_eq!(config.port, 9000);
        assert!(!config.reconnect);
        assert_eq!(config.reconnect_interval, Duration::from_millis(250));
        assert_eq!(config.max_reconnect_attempts, Some(4));
        assert!(config.reset_reconnect_count_on_open);
    }

    #[test]
    fn connection_state_display() {
        assert_eq!(ConnectionState::Connecting.to_string(), "connecting");
        assert_eq!(ConnectionState::Closed.to_string(), "closed");
    }

    #[tokio::test]
    async fn invalid_host_fails_construction() {
        let err = BridgeClient::connect_with(PendingConnector, "", BridgeConfig::default())
            .unwrap_err();
        assert!(matches!(err, BridgeError::InvalidEndpoint(_)));
    }

    #[tokio::test]
    async fn client_starts_connecting_with_resolved_endpoint() {
        let (mut client, _events) =
            BridgeClient::connect_with(PendingConnector, "example.com", BridgeConfig::default())
                .unwrap();
        assert_eq!(client.endpoint().as_str(), "ws://example.com:10692/stream");
        assert_eq!(client.state(), ConnectionState::Connecting);
        assert!(!client.is_open());
        assert_eq!(client.reconnect_attempts(), 0);

        client.shutdown().await;
        assert_eq!(client.state(), ConnectionState::Closed);
    }

    #[tokio::test]
    async fn close_while_connecting_reports_normal_closure() {
        let (client, mut events) =
            BridgeClient::connect_with(PendingConnector, "example.com", BridgeConfig::default())
                .unwrap();
        client.close().unwrap();

        let event = events.recv().await.unwrap();
        assert!(matches!(
            event,
            BridgeEvent::Closed {
                code: CloseCode::Normal,
                ..
            }
        ));
        assert!(events.recv().await.is_none());
    }

    #[tokio::test]
    async fn send_while_connecting_is_rejected() {
        let (mut client, mut events) =
            BridgeClient::connect_with(PendingConnector, "example.com", BridgeConfig::default())
                .unwrap();
        client.set_sign_state("Gate", true).unwrap();

        let event = events.recv().await.unwrap();
        assert_eq!(
            event,
            BridgeEvent::Error {
                message: "not connected to bridge".into()
            }
        );

        client.shutdown().await;
    }

    #[tokio::test]
    async fn debug_output_names_endpoint() {
        let (mut client, _events) =
            BridgeClient::connect_with(PendingConnector, "example.com:81", BridgeConfig::default())
                .unwrap();
        let debug = format!("{client:?}");
        assert!(debug.contains("ws://example.com:81/stream"));
        client.shutdown().await;
    }
}
