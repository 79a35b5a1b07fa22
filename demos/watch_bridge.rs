//! # Watch Bridge Example
//!
//! Connects to a game-server bridge, logs every event it pushes and, once
//! connected, opens a sign to show the command path.
//!
//! ## Running
//!
//! ```sh
//! # With a bridge listening on localhost:10692:
//! cargo run --example watch_bridge
//!
//! # Another host, and the sign to toggle:
//! cargo run --example watch_bridge -- mc.example.net:10692 Gate
//! ```

use std::time::Duration;

use game_bridge_client::{BridgeClient, BridgeConfig, BridgeEvent};

/// Bridge host when no argument is given.
const DEFAULT_HOST: &str = "localhost";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // ── Logging ─────────────────────────────────────────────────────
    // Set `RUST_LOG=debug` to see state changes and raw frames.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    // ── Configuration ───────────────────────────────────────────────
    let mut args = std::env::args().skip(1);
    let host = args.next().unwrap_or_else(|| DEFAULT_HOST.to_string());
    let sign = args.next();

    let config = BridgeConfig::default()
        .with_reconnect_interval(Duration::from_secs(3))
        .with_max_reconnect_attempts(10)
        .with_connect_timeout(Duration::from_secs(5));

    let (mut client, mut events) = BridgeClient::connect(&host, config)?;
    tracing::info!("Watching {}", client.endpoint());

    // ── Event loop ──────────────────────────────────────────────────
    loop {
        tokio::select! {
            event = events.recv() => {
                let Some(event) = event else {
                    tracing::info!("Event channel closed, exiting");
                    break;
                };

                match event {
                    BridgeEvent::Connected => {
                        tracing::info!("Connected");
                        if let Some(sign) = &sign {
                            client.set_sign_state(sign.as_str(), true)?;
                            tracing::info!("Opened sign {sign}");
                        }
                    }
                    BridgeEvent::Player(payload) => tracing::info!("player: {payload}"),
                    BridgeEvent::Server(payload) => tracing::info!("server: {payload}"),
                    BridgeEvent::Sign(payload) => tracing::info!("sign: {payload}"),
                    BridgeEvent::Message(envelope) => {
                        tracing::debug!("message type {}", envelope.message_type);
                    }
                    BridgeEvent::Reconnecting { attempt } => {
                        tracing::warn!("Reconnecting (attempt {attempt})");
                    }
                    BridgeEvent::Closed { code, reason } => {
                        tracing::warn!("Closed: {code} {reason}");
                    }
                    BridgeEvent::Error { message } => tracing::error!("Rejected: {message}"),
                }
            }

            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Ctrl+C received, closing");
                break;
            }
        }
    }

    client.shutdown().await;
    Ok(())
}
