//! RESP (`REdis` Serialization Protocol) reply values

use crate::error::{RedisError, RedisResult};
use bytes::Bytes;

/// A single RESP2 value, as sent on the wire or received as a reply
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RespValue {
    /// Simple string: +OK\r\n
    SimpleString(String),
    /// Error: -ERR message\r\n
    Error(String),
    /// Integer: :1000\r\n
    Integer(i64),
    /// Bulk string: $6\r\nfoobar\r\n
    BulkString(Bytes),
    /// Null bulk string or null array: $-1\r\n
    Null,
    /// Array: *2\r\n$3\r\nfoo\r\n$3\r\nbar\r\n
    Array(Vec<RespValue>),
}

impl RespValue {
    /// Convert to a string if possible
    ///
    /// # Errors
    ///
    /// Returns an error if the value is not a string or not valid UTF-8.
    pub fn as_string(&self) -> RedisResult<String> {
        match self {
            Self::SimpleString(s) => Ok(s.clone()),
            Self::BulkString(b) => String::from_utf8(b.to_vec())
                .map_err(|e| RedisError::Type(format!("Invalid UTF-8: {e}"))),
            Self::Null => Err(RedisError::Type("Value is null".to_string())),
            _ => Err(RedisError::Type(format!(
                "Cannot convert {self:?} to string"
            ))),
        }
    }

    /// Convert to a string, mapping null to `None`
    ///
    /// # Errors
    ///
    /// Returns an error if the value is neither null nor a string.
    pub fn as_optional_string(&self) -> RedisResult<Option<String>> {
        if self.is_null() {
            Ok(None)
        } else {
            self.as_string().map(Some)
        }
    }

    /// Convert to an integer if possible
    ///
    /// # Errors
    ///
    /// Returns an error if the value cannot be converted to an integer.
    pub fn as_int(&self) -> RedisResult<i64> {
        match self {
            Self::Integer(i) => Ok(*i),
            Self::BulkString(_) | Self::SimpleString(_) => self
                .as_string()?
                .parse::<i64>()
                .map_err(|e| RedisError::Type(format!("Cannot parse integer: {e}"))),
            _ => Err(RedisError::Type(format!(
                "Cannot convert {self:?} to integer"
            ))),
        }
    }

    /// Convert to a float if possible
    ///
    /// RESP2 has no double type, so floats arrive as bulk strings.
    ///
    /// # Errors
    ///
    /// Returns an error if the value cannot be converted to a float.
    pub fn as_float(&self) -> RedisResult<f64> {
        match self {
            Self::Integer(i) => Ok(*i as f64),
            Self::BulkString(_) | Self::SimpleString(_) => self
                .as_string()?
                .parse::<f64>()
                .map_err(|e| RedisError::Type(format!("Cannot parse float: {e}"))),
            _ => Err(RedisError::Type(format!(
                "Cannot convert {self:?} to float"
            ))),
        }
    }

    /// Convert an integer `0`/`1` (or `OK`) reply to a bool
    ///
    /// # Errors
    ///
    /// Returns an error for any other value.
    pub fn as_bool(&self) -> RedisResult<bool> {
        match self {
            Self::Integer(1) => Ok(true),
            Self::Integer(0) => Ok(false),
            Self::SimpleString(s) if s == "OK" => Ok(true),
            _ => Err(RedisError::Type(format!("Cannot convert {self:?} to bool"))),
        }
    }

    /// Convert to bytes if possible
    ///
    /// # Errors
    ///
    /// Returns an error if the value cannot be converted to bytes.
    pub fn as_bytes(&self) -> RedisResult<Bytes> {
        match self {
            Self::BulkString(b) => Ok(b.clone()),
            Self::SimpleString(s) => Ok(Bytes::from(s.as_bytes().to_vec())),
            Self::Null => Err(RedisError::Type("Value is null".to_string())),
            _ => Err(RedisError::Type(format!(
                "Cannot convert {self:?} to bytes"
            ))),
        }
    }

    /// Take the elements of an array
    ///
    /// # Errors
    ///
    /// Returns an error if the value is not an array.
    pub fn into_array(self) -> RedisResult<Vec<Self>> {
        match self {
            Self::Array(arr) => Ok(arr),
            other => Err(RedisError::Type(format!(
                "Cannot convert {other:?} to array"
            ))),
        }
    }

    /// Check if this is a null value
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Check if this is an error
    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }

    /// Extract error message if this is an error
    #[must_use]
    pub fn into_error(self) -> Option<String> {
        match self {
            Self::Error(msg) => Some(msg),
            _ => None,
        }
    }
}

impl From<String> for RespValue {
    fn from(s: String) -> Self {
        Self::BulkString(Bytes::from(s.into_bytes()))
    }
}

impl From<&str> for RespValue {
    fn from(s: &str) -> Self {
        Self::BulkString(Bytes::copy_from_slice(s.as_bytes()))
    }
}

// Arguments always travel as bulk strings; the server parses numbers itself.
impl From<i64> for RespValue {
    fn from(i: i64) -> Self {
        Self::from(i.to_string())
    }
}

impl From<u64> for RespValue {
    fn from(i: u64) -> Self {
        Self::from(i.to_string())
    }
}

impl From<u32> for RespValue {
    fn from(i: u32) -> Self {
        Self::from(i.to_string())
    }
}

impl From<f64> for RespValue {
    fn from(f: f64) -> Self {
        Self::from(f.to_string())
    }
}

impl From<Vec<u8>> for RespValue {
    fn from(b: Vec<u8>) -> Self {
        Self::BulkString(Bytes::from(b))
    }
}

impl From<Bytes> for RespValue {
    fn from(b: Bytes) -> Self {
        Self::BulkString(b)
    }
}

impl TryFrom<RespValue> for String {
    type Error = RedisError;

    fn try_from(value: RespValue) -> Result<Self, Self::Error> {
        value.as_string()
    }
}

impl TryFrom<RespValue> for i64 {
    type Error = RedisError;

    fn try_from(value: RespValue) -> Result<Self, Self::Error> {
        value.as_int()
    }
}

impl TryFrom<RespValue> for bool {
    type Error = RedisError;

    fn try_from(value: RespValue) -> Result<Self, Self::Error> {
        value.as_bool()
    }
}
