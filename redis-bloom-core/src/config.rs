//! Configuration types for Redis connections

use crate::error::{RedisError, RedisResult};
use std::time::Duration;

const DEFAULT_PORT: u16 = 6379;

/// Configuration for a Redis connection
#[derive(Debug, Clone)]
pub struct ConnectionConfig {
    /// Connection string (e.g., `<redis://localhost:6379>`)
    pub connection_string: String,

    /// Optional password for authentication
    pub password: Option<String>,

    /// Database number
    pub database: u8,

    /// Connection timeout
    pub connect_timeout: Duration,

    /// Read/write operation timeout
    pub operation_timeout: Duration,

    /// Enable TCP keepalive
    pub tcp_keepalive: Option<Duration>,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            connection_string: "redis://localhost:6379".to_string(),
            password: None,
            database: 0,
            connect_timeout: Duration::from_secs(5),
            operation_timeout: Duration::from_secs(30),
            tcp_keepalive: Some(Duration::from_secs(60)),
        }
    }
}

impl ConnectionConfig {
    /// Create a new configuration with the given connection string
    pub fn new(connection_string: impl Into<String>) -> Self {
        Self {
            connection_string: connection_string.into(),
            ..Default::default()
        }
    }

    /// Configuration from the `REDIS_URL` environment variable, falling back
    /// to `redis://localhost:6379`
    #[must_use]
    pub fn from_env() -> Self {
        std::env::var("REDIS_URL").map_or_else(|_| Self::default(), Self::new)
    }

    /// Set the password for authentication
    #[must_use]
    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    /// Set the database number
    #[must_use]
    pub const fn with_database(mut self, database: u8) -> Self {
        self.database = database;
        self
    }

    /// Set the connection timeout
    #[must_use]
    pub const fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Set the operation timeout
    #[must_use]
    pub const fn with_operation_timeout(mut self, timeout: Duration) -> Self {
        self.operation_timeout = timeout;
        self
    }

    /// Set or disable TCP keepalive
    #[must_use]
    pub const fn with_tcp_keepalive(mut self, keepalive: Option<Duration>) -> Self {
        self.tcp_keepalive = keepalive;
        self
    }

    /// Host and port named by the connection string
    ///
    /// Accepts `redis://host:port`, `host:port` or a bare host (port 6379).
    ///
    /// # Errors
    ///
    /// Returns [`RedisError::Config`] when no host is given or the port is
    /// not a number.
    pub fn endpoint(&self) -> RedisResult<(String, u16)> {
        let conn_str = self.connection_string.trim();
        let addr = conn_str.strip_prefix("redis://").unwrap_or(conn_str);
        // Credentials in the URL are not supported; use `with_password`.
        let addr = addr.rsplit_once('@').map_or(addr, |(_, host)| host);
        let addr = addr.trim_end_matches('/');

        if addr.is_empty() {
            return Err(RedisError::Config("No endpoint specified".to_string()));
        }

        match addr.rsplit_once(':') {
            Some((host, port)) => {
                let port = port
                    .parse::<u16>()
                    .map_err(|e| RedisError::Config(format!("Invalid port {port:?}: {e}")))?;
                if host.is_empty() {
                    return Err(RedisError::Config("No host specified".to_string()));
                }
                Ok((host.to_string(), port))
            }
            None => Ok((addr.to_string(), DEFAULT_PORT)),
        }
    }
}
