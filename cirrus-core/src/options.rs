//! Connection options for Cirrus clients
//!
//! This module provides the caller-facing configuration for connection
//! attempts, along with server address parsing utilities.

use crate::error::{Error, Result};
use std::fmt;
use std::net::IpAddr;
use std::path::PathBuf;
use std::time::Duration;

/// Default server port
pub const DEFAULT_PORT: u16 = 4870;

/// Server used when the caller supplies no addresses
pub const DEFAULT_SERVER: &str = "127.0.0.1:4870";

/// Default connection timeout
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// Connection options
///
/// The bootstrap layer only inspects `servers` (for scheme capability checks)
/// and passes everything else through to the connection engine untouched.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConnectionOptions {
    /// Server addresses, each optionally prefixed with a scheme
    /// (`tcp://`, `tls://`, `ws://`, `wss://`)
    pub servers: Vec<String>,
    /// TLS configuration; presence alone requests an encrypted connection
    pub tls: Option<TlsOptions>,
    /// Client name reported to the server
    pub name: Option<String>,
    /// Username credential
    pub user: Option<String>,
    /// Password credential
    pub pass: Option<String>,
    /// Token credential
    pub token: Option<String>,
    /// Timeout applied to each dial attempt
    pub connect_timeout: Duration,
    /// Disable Nagle's algorithm on the underlying socket
    pub no_delay: bool,
}

impl Default for ConnectionOptions {
    fn default() -> Self {
        Self {
            servers: Vec::new(),
            tls: None,
            name: None,
            user: None,
            pass: None,
            token: None,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            no_delay: true,
        }
    }
}

impl ConnectionOptions {
    /// Create options with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a server address
    pub fn server(mut self, server: impl Into<String>) -> Self {
        self.servers.push(server.into());
        self
    }

    /// Replace the server address list
    pub fn servers<I, S>(mut self, servers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.servers = servers.into_iter().map(Into::into).collect();
        self
    }

    /// Set the TLS configuration
    pub fn tls(mut self, tls: TlsOptions) -> Self {
        self.tls = Some(tls);
        self
    }

    /// Set the client name
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set username and password credentials
    pub fn user_and_pass(mut self, user: impl Into<String>, pass: impl Into<String>) -> Self {
        self.user = Some(user.into());
        self.pass = Some(pass.into());
        self
    }

    /// Set a token credential
    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Set the per-attempt connection timeout
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Parse the configured servers, substituting the default server when
    /// the list is empty
    pub fn server_addrs(&self) -> Result<Vec<ServerAddr>> {
        if self.servers.is_empty() {
            return Ok(vec![ServerAddr::parse(DEFAULT_SERVER)?]);
        }
        self.servers.iter().map(|s| ServerAddr::parse(s)).collect()
    }
}

/// TLS options
///
/// The bootstrap layer never reads these fields; it only checks presence.
/// The structure reaches the TLS transport unchanged.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TlsOptions {
    /// Verify the server certificate chain; disabling accepts any
    /// certificate the server presents
    pub verify: bool,
    /// Path to a PEM file with additional root certificates
    pub ca_file: Option<PathBuf>,
    /// Path to a PEM client certificate file
    pub cert_file: Option<PathBuf>,
    /// Path to a PEM client private key file
    pub key_file: Option<PathBuf>,
    /// Server name for SNI, overriding the dialed hostname
    pub server_name: Option<String>,
}

impl Default for TlsOptions {
    fn default() -> Self {
        Self {
            verify: true,
            ca_file: None,
            cert_file: None,
            key_file: None,
            server_name: None,
        }
    }
}

impl TlsOptions {
    /// Create TLS options with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable certificate chain verification
    pub fn verify(mut self, verify: bool) -> Self {
        self.verify = verify;
        self
    }

    /// Set the root CA certificate file
    pub fn ca_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.ca_file = Some(path.into());
        self
    }

    /// Set the client certificate file
    pub fn cert_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.cert_file = Some(path.into());
        self
    }

    /// Set the client private key file
    pub fn key_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.key_file = Some(path.into());
        self
    }

    /// Override the server name used for SNI
    pub fn server_name(mut self, name: impl Into<String>) -> Self {
        self.server_name = Some(name.into());
        self
    }
}

/// Address scheme indicating which transport family a server requires
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Scheme {
    /// Plain TCP (`tcp://` or no prefix)
    Plain,
    /// TLS over TCP (`tls://`)
    Tls,
    /// WebSocket (`ws://`)
    Ws,
    /// WebSocket over TLS (`wss://`)
    Wss,
}

impl Scheme {
    /// Split a known scheme prefix off a server string
    fn split(s: &str) -> (Scheme, &str) {
        let lower = s.to_ascii_lowercase();
        for (prefix, scheme) in [
            ("tls://", Scheme::Tls),
            ("tcp://", Scheme::Plain),
            ("wss://", Scheme::Wss),
            ("ws://", Scheme::Ws),
        ] {
            if lower.starts_with(prefix) {
                return (scheme, &s[prefix.len()..]);
            }
        }
        (Scheme::Plain, s)
    }

    /// Check if this scheme requires a WebSocket-capable transport
    pub fn is_websocket(&self) -> bool {
        matches!(self, Scheme::Ws | Scheme::Wss)
    }

    /// Check if this scheme requires an encrypted connection
    pub fn is_secure(&self) -> bool {
        matches!(self, Scheme::Tls | Scheme::Wss)
    }

    /// The prefix form of this scheme
    pub fn as_str(&self) -> &'static str {
        match self {
            Scheme::Plain => "tcp",
            Scheme::Tls => "tls",
            Scheme::Ws => "ws",
            Scheme::Wss => "wss",
        }
    }
}

/// A parsed server address
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ServerAddr {
    scheme: Scheme,
    host: String,
    port: u16,
}

impl ServerAddr {
    /// Parse a server string of the form `[scheme://]host[:port]`
    ///
    /// IPv6 hosts use bracket notation, e.g. `tls://[::1]:4870`.
    pub fn parse(s: &str) -> Result<Self> {
        let (scheme, rest) = Scheme::split(s.trim());
        if rest.is_empty() {
            return Err(Error::invalid_argument(
                "servers",
                format!("'{s}' is missing a host"),
            ));
        }

        let (host, port) = if let Some(rest) = rest.strip_prefix('[') {
            // bracketed IPv6
            let end = rest.find(']').ok_or_else(|| {
                Error::invalid_argument("servers", format!("'{s}' has an unterminated '['"))
            })?;
            let host = &rest[..end];
            let port = match &rest[end + 1..] {
                "" => DEFAULT_PORT,
                p => match p.strip_prefix(':') {
                    Some(p) => parse_port(s, p)?,
                    None => {
                        return Err(Error::invalid_argument(
                            "servers",
                            format!("'{s}' has unexpected characters after ']'"),
                        ))
                    }
                },
            };
            (host.to_string(), port)
        } else {
            match rest.rsplit_once(':') {
                Some((host, port)) if !host.contains(':') => {
                    (host.to_string(), parse_port(s, port)?)
                }
                // more than one ':' means an unbracketed IPv6 literal
                _ => (rest.to_string(), DEFAULT_PORT),
            }
        };

        if host.is_empty() {
            return Err(Error::invalid_argument(
                "servers",
                format!("'{s}' is missing a host"),
            ));
        }

        Ok(Self { scheme, host, port })
    }

    /// The address scheme
    pub fn scheme(&self) -> Scheme {
        self.scheme
    }

    /// The host portion of the address
    pub fn host(&self) -> &str {
        &self.host
    }

    /// The port portion of the address
    pub fn port(&self) -> u16 {
        self.port
    }

    /// The host parsed as an IP literal, if it is one
    pub fn ip(&self) -> Option<IpAddr> {
        self.host.parse().ok()
    }
}

impl fmt::Display for ServerAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.host.contains(':') {
            write!(f, "{}://[{}]:{}", self.scheme.as_str(), self.host, self.port)
        } else {
            write!(f, "{}://{}:{}", self.scheme.as_str(), self.host, self.port)
        }
    }
}

fn parse_port(full: &str, port: &str) -> Result<u16> {
    port.parse().map_err(|_| {
        Error::invalid_argument("servers", format!("'{full}' has an invalid port '{port}'"))
    })
}

/// Check whether any configured server requires a WebSocket transport
///
/// This only sniffs scheme prefixes; malformed addresses are left for the
/// connection engine to reject.
pub fn has_ws_scheme(options: &ConnectionOptions) -> bool {
    options.servers.iter().any(|s| {
        let lower = s.trim().to_ascii_lowercase();
        lower.starts_with("ws://") || lower.starts_with("wss://")
    })
}
