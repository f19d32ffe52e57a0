//! Error types for Cirrus
//!
//! This module defines all error types used throughout the Cirrus library.
//! Errors are designed to be ergonomic and provide clear context for debugging.

use std::time::Duration;
use thiserror::Error;

/// Result type alias for Cirrus operations
pub type Result<T> = std::result::Result<T, Error>;

/// Comprehensive error type for Cirrus operations
#[derive(Error, Debug)]
pub enum Error {
    /// A caller-supplied option was rejected before any connection attempt
    #[error("invalid argument '{field}': {message}")]
    InvalidArgument {
        /// Name of the offending option field
        field: String,
        /// Explanation of why the value was rejected
        message: String,
    },

    /// No transport descriptor has been registered for this process
    #[error("no transport registered; connect through a transport-specific entry point")]
    NoTransport,

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// DNS resolution errors
    #[error("DNS resolution error for '{host}': {message}")]
    Dns {
        /// Hostname that failed to resolve
        host: String,
        /// Resolver failure detail
        message: String,
    },

    /// TLS errors
    #[error("TLS error: {0}")]
    Tls(String),

    /// Connection errors
    #[error("connection error: {0}")]
    Connection(String),

    /// Connection attempt exceeded the configured timeout
    #[error("connection timed out after {0:?}")]
    Timeout(Duration),
}

impl Error {
    /// Create an `InvalidArgument` error for the given option field
    pub fn invalid_argument(field: impl Into<String>, message: impl Into<String>) -> Self {
        Error::InvalidArgument {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a DNS resolution error for the given hostname
    pub fn dns(host: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Dns {
            host: host.into(),
            message: message.into(),
        }
    }

    /// Check if this error was raised by option validation
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Error::InvalidArgument { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_argument_display() {
        let err = Error::invalid_argument("servers", "websocket schemes are not supported");
        let msg = err.to_string();
        assert!(msg.contains("servers"));
        assert!(msg.contains("websocket"));
        assert!(err.is_invalid_argument());
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        let err = Error::from(io);
        assert!(matches!(err, Error::Io(_)));
        assert!(!err.is_invalid_argument());
    }

    #[test]
    fn test_timeout_display() {
        let err = Error::Timeout(Duration::from_secs(5));
        assert!(err.to_string().contains("timed out"));
    }
}
