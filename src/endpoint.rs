//! Resolution of the bridge stream endpoint from a user-supplied host.
//!
//! Hosts are accepted either as absolute URLs (`ws://bridge.local:9000`,
//! `http://bridge.local/`) or as bare `host[:port]` strings. Whatever comes
//! in, the resolved endpoint always has the `ws` scheme, an explicit port and
//! the `stream` path segment.

use std::fmt;

use url::Url;

use crate::error::Result;

/// Port the bridge listens on when the host does not name one.
pub const DEFAULT_PORT: u16 = 10692;

/// Path segment of the bridge event stream.
pub const STREAM_PATH: &str = "stream";

/// A fully-qualified bridge stream address.
///
/// # Example
///
/// ```
/// use game_bridge_client::endpoint::{Endpoint, DEFAULT_PORT};
///
/// let endpoint = Endpoint::resolve("example.com", DEFAULT_PORT).unwrap();
/// assert_eq!(endpoint.as_str(), "ws://example.com:10692/stream");
///
/// let endpoint = Endpoint::resolve("example.com:8080", DEFAULT_PORT).unwrap();
/// assert_eq!(endpoint.as_str(), "ws://example.com:8080/stream");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    url: Url,
}

impl Endpoint {
    /// Resolve `host` into a stream endpoint.
    ///
    /// A port present in `host` wins over `default_port`.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::InvalidEndpoint`](crate::BridgeError::InvalidEndpoint)
    /// if `host` cannot be read as a URL even after prefixing `ws://`.
    pub fn resolve(host: &str, default_port: u16) -> Result<Self> {
        let host = host.trim();

        // Bare `host:port` strings either fail to parse or parse as an opaque
        // URL whose "scheme" is the host name; both cases fall back here.
        let mut url = match Url::parse(host).and_then(|base| base.join(STREAM_PATH)) {
            Ok(url) => url,
            Err(_) => Url::parse(&format!("ws://{host}"))?.join(STREAM_PATH)?,
        };

        if url.set_scheme("ws").is_err() {
            // Non-special schemes cannot be switched to `ws` in place.
            let authority = url.host_str().ok_or(url::ParseError::EmptyHost)?;
            let rebuilt = match url.port() {
                Some(port) => format!("ws://{authority}:{port}{}", url.path()),
                None => format!("ws://{authority}{}", url.path()),
            };
            url = Url::parse(&rebuilt)?;
        }

        if url.host_str().is_none_or(str::is_empty) {
            return Err(url::ParseError::EmptyHost.into());
        }

        if url.port().is_none() {
            url.set_port(Some(default_port))
                .map_err(|()| url::ParseError::InvalidPort)?;
        }

        tracing::debug!(endpoint = %url, "resolved bridge endpoint");
        Ok(Self { url })
    }

    /// The endpoint as a URL string, ready to hand to a connector.
    pub fn as_str(&self) -> &str {
        self.url.as_str()
    }

    /// The parsed endpoint URL.
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Host name or address of the bridge.
    pub fn host(&self) -> &str {
        self.url.host_str().unwrap_or_default()
    }

    /// Port of the bridge.
    pub fn port(&self) -> u16 {
        self.url.port_or_known_default().unwrap_or(DEFAULT_PORT)
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.url.as_str())
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
    use crate::error::BridgeError;

    fn resolve(host: &str) -> String {
        Endpoint::resolve(host, DEFAULT_PORT).unwrap().to_string()
    }

    #[test]
    fn bare_host_gets_default_port_and_path() {
        assert_eq!(resolve("example.com"), "ws://example.com:10692/stream");
    }

    #[test]
    fn explicit_port_is_preserved() {
        assert_eq!(resolve("example.com:8080"), "ws://example.com:8080/stream");
        assert_eq!(resolve("localhost:3000"), "ws://localhost:3000/stream");
        assert_eq!(resolve("127.0.0.1:9001"), "ws://127.0.0.1:9001/stream");
    }

    #[test]
    fn configured_port_is_used_when_host_has_none() {
        let endpoint = Endpoint::resolve("10.0.0.5", 4000).unwrap();
        assert_eq!(endpoint.as_str(), "ws://10.0.0.5:4000/stream");
        assert_eq!(endpoint.host(), "10.0.0.5");
        assert_eq!(endpoint.port(), 4000);
    }

    #[test]
    fn absolute_urls_are_rewritten_to_ws() {
        assert_eq!(resolve("ws://example.com"), "ws://example.com:10692/stream");
        assert_eq!(resolve("wss://example.com:9443/"), "ws://example.com:9443/stream");
        assert_eq!(resolve("http://example.com:81/"), "ws://example.com:81/stream");
    }

    #[test]
    fn non_special_scheme_is_rebuilt() {
        assert_eq!(resolve("bridge://example.com:7000"), "ws://example.com:7000/stream");
    }

    #[test]
    fn ipv6_host_keeps_brackets() {
        assert_eq!(resolve("[::1]:8080"), "ws://[::1]:8080/stream");
    }

    #[test]
    fn surrounding_whitespace_is_ignored() {
        assert_eq!(resolve("  example.com  "), "ws://example.com:10692/stream");
    }

    #[test]
    fn empty_host_is_rejected() {
        let err = Endpoint::resolve("", DEFAULT_PORT).unwrap_err();
        assert!(matches!(err, BridgeError::InvalidEndpoint(_)));
    }
}
