//! Error types for RedisBloom operations

use std::io;
use thiserror::Error;

/// Result type for RedisBloom operations
pub type RedisResult<T> = Result<T, RedisError>;

/// Every failure a RedisBloom call can surface
///
/// Errors fall into three classes:
/// - server rejections ([`RedisError::Response`]), carrying the server message verbatim
/// - client-side validation failures ([`RedisError::InvalidArgument`]), raised before any I/O
/// - connection problems (everything else), see [`RedisError::is_client_error`]
#[derive(Error, Debug)]
pub enum RedisError {
    /// The server answered with an error reply
    #[error("{0}")]
    Response(String),

    /// An argument failed validation; nothing was sent to the server
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// No open connection (never connected, or disconnected)
    #[error("Not connected to Redis")]
    NotConnected,

    /// IO error during network operations
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Protocol parsing error
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// Connection error
    #[error("Connection error: {0}")]
    Connection(String),

    /// Timeout error
    #[error("Operation timed out")]
    Timeout,

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Authentication error
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// Type conversion error
    #[error("Type conversion error: {0}")]
    Type(String),

    /// Reply did not have the shape the command expects
    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),
}

impl RedisError {
    /// The server rejected the command
    #[must_use]
    pub const fn is_response_error(&self) -> bool {
        matches!(self, Self::Response(_))
    }

    /// Validation failed before the command was sent
    #[must_use]
    pub const fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument(_))
    }

    /// The connection is unusable or could not be established
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::NotConnected
                | Self::Io(_)
                | Self::Protocol(_)
                | Self::Connection(_)
                | Self::Timeout
                | Self::Config(_)
                | Self::Auth(_)
        )
    }

    /// Whether the transport should be considered broken after this error
    ///
    /// A stream that failed mid-request may hold a half-read reply, so it
    /// cannot be reused.
    #[must_use]
    pub const fn breaks_connection(&self) -> bool {
        matches!(
            self,
            Self::Io(_) | Self::Protocol(_) | Self::Connection(_) | Self::Timeout
        )
    }

    /// Server message of a [`RedisError::Response`]
    #[must_use]
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Response(msg) => Some(msg),
            _ => None,
        }
    }

    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_message_is_verbatim() {
        let err = RedisError::Response("ERR item exists".to_string());
        assert_eq!(err.to_string(), "ERR item exists");
        assert_eq!(err.server_message(), Some("ERR item exists"));
        assert!(err.is_response_error());
        assert!(!err.is_client_error());
    }

    #[test]
    fn test_classification() {
        assert!(RedisError::NotConnected.is_client_error());
        assert!(RedisError::Timeout.is_client_error());
        assert!(RedisError::invalid("empty key").is_invalid_argument());
        assert!(!RedisError::invalid("empty key").is_client_error());
        assert!(RedisError::Timeout.breaks_connection());
        assert!(!RedisError::Config("x".into()).breaks_connection());
    }
}
