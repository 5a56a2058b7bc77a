//! Connection to a Redis server
//!
//! [`Transport`] is the seam between the dispatcher and the network: it
//! takes one command and returns one raw reply. [`RedisConnection`] is the
//! TCP implementation.

use crate::protocol::{RespDecoder, RespEncoder};
use async_trait::async_trait;
use bytes::{Buf, BytesMut};
use redis_bloom_core::{
    config::ConnectionConfig,
    error::{RedisError, RedisResult},
    value::RespValue,
};
use std::io::Cursor;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::timeout;
use tracing::{debug, info};

/// A request/response channel to a Redis server
///
/// Implementations send exactly one command per call and return the raw
/// reply, including error replies as [`RespValue::Error`]. Transport
/// faults are returned as `Err`.
#[async_trait]
pub trait Transport: Send {
    /// Send a command and wait for its reply
    async fn execute_command(&mut self, command: &str, args: &[RespValue])
        -> RedisResult<RespValue>;

    /// Close the underlying connection
    async fn close(&mut self) -> RedisResult<()>;
}

/// A TCP connection to a Redis server
pub struct RedisConnection {
    stream: TcpStream,
    read_buffer: BytesMut,
    config: ConnectionConfig,
}

impl RedisConnection {
    /// Connect to the server named by `config`, authenticating and selecting
    /// the database as configured
    pub async fn connect(config: ConnectionConfig) -> RedisResult<Self> {
        let (host, port) = config.endpoint()?;
        let addr = format!("{}:{}", host, port);
        debug!("Connecting to Redis at {}", addr);

        let stream = timeout(config.connect_timeout, TcpStream::connect(&addr))
            .await
            .map_err(|_| RedisError::Timeout)?
            .map_err(|e| RedisError::Connection(format!("Failed to connect to {}: {}", addr, e)))?;

        let stream = match config.tcp_keepalive {
            Some(keepalive_duration) => {
                let socket = socket2::Socket::from(stream.into_std()?);
                let keepalive = socket2::TcpKeepalive::new().with_time(keepalive_duration);
                socket.set_tcp_keepalive(&keepalive).map_err(|e| {
                    RedisError::Connection(format!("Failed to set TCP keepalive: {}", e))
                })?;
                TcpStream::from_std(socket.into())?
            }
            None => stream,
        };

        let mut conn = Self {
            stream,
            read_buffer: BytesMut::with_capacity(8192),
            config,
        };

        if let Some(password) = conn.config.password.clone() {
            conn.authenticate(&password).await?;
        }
        if conn.config.database != 0 {
            conn.select_database(conn.config.database).await?;
        }

        info!("Connected to Redis at {}", addr);
        Ok(conn)
    }

    async fn authenticate(&mut self, password: &str) -> RedisResult<()> {
        debug!("Authenticating with Redis server");
        match self
            .execute_command("AUTH", &[RespValue::from(password)])
            .await?
        {
            RespValue::SimpleString(ref s) if s == "OK" => Ok(()),
            RespValue::Error(e) => Err(RedisError::Auth(e)),
            other => Err(RedisError::Auth(format!(
                "Unexpected authentication response: {:?}",
                other
            ))),
        }
    }

    async fn select_database(&mut self, db: u8) -> RedisResult<()> {
        debug!("Selecting database {}", db);
        match self
            .execute_command("SELECT", &[RespValue::from(u32::from(db))])
            .await?
        {
            RespValue::SimpleString(ref s) if s == "OK" => Ok(()),
            RespValue::Error(e) => Err(RedisError::Config(format!(
                "Cannot select database {}: {}",
                db, e
            ))),
            other => Err(RedisError::UnexpectedResponse(format!("{:?}", other))),
        }
    }

    /// Read a complete RESP reply from the connection
    async fn read_response(&mut self) -> RedisResult<RespValue> {
        loop {
            let mut cursor = Cursor::new(&self.read_buffer[..]);
            if let Some(value) = RespDecoder::decode(&mut cursor)? {
                let pos = cursor.position() as usize;
                self.read_buffer.advance(pos);
                return Ok(value);
            }

            let n = self.stream.read_buf(&mut self.read_buffer).await?;
            if n == 0 {
                return Err(RedisError::Connection(
                    "Connection closed by server".to_string(),
                ));
            }
        }
    }
}

#[async_trait]
impl Transport for RedisConnection {
    async fn execute_command(
        &mut self,
        command: &str,
        args: &[RespValue],
    ) -> RedisResult<RespValue> {
        let encoded = RespEncoder::encode_command(command, args);

        timeout(
            self.config.operation_timeout,
            self.stream.write_all(&encoded),
        )
        .await
        .map_err(|_| RedisError::Timeout)??;

        timeout(self.config.operation_timeout, self.read_response())
            .await
            .map_err(|_| RedisError::Timeout)?
    }

    async fn close(&mut self) -> RedisResult<()> {
        self.stream.shutdown().await?;
        Ok(())
    }
}
