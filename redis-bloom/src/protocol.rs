//! RESP2 framing
//!
//! Commands are always sent as arrays of bulk strings; replies are decoded
//! incrementally from a read buffer.

use bytes::{Buf, BufMut, Bytes, BytesMut};
use redis_bloom_core::{
    error::{RedisError, RedisResult},
    value::RespValue,
};
use std::io::Cursor;

const CRLF: &[u8] = b"\r\n";

/// Encodes commands into RESP2 bytes
pub struct RespEncoder;

impl RespEncoder {
    /// Encode a RESP value into a buffer
    pub fn encode(value: &RespValue, buf: &mut BytesMut) {
        match value {
            RespValue::SimpleString(s) => Self::put_line(buf, b'+', s.as_bytes()),
            RespValue::Error(e) => Self::put_line(buf, b'-', e.as_bytes()),
            RespValue::Integer(i) => Self::put_line(buf, b':', i.to_string().as_bytes()),
            RespValue::BulkString(data) => Self::put_bulk(buf, data),
            RespValue::Null => buf.put_slice(b"$-1\r\n"),
            RespValue::Array(arr) => {
                Self::put_line(buf, b'*', arr.len().to_string().as_bytes());
                for item in arr {
                    Self::encode(item, buf);
                }
            }
        }
    }

    /// Encode a command name and its arguments as one request
    #[must_use]
    pub fn encode_command(command: &str, args: &[RespValue]) -> Bytes {
        let mut buf = BytesMut::with_capacity(16 + command.len() + args.len() * 16);

        Self::put_line(&mut buf, b'*', (1 + args.len()).to_string().as_bytes());
        Self::put_bulk(&mut buf, command.as_bytes());
        for arg in args {
            Self::encode(arg, &mut buf);
        }

        buf.freeze()
    }

    fn put_line(buf: &mut BytesMut, prefix: u8, body: &[u8]) {
        buf.put_u8(prefix);
        buf.put_slice(body);
        buf.put_slice(CRLF);
    }

    fn put_bulk(buf: &mut BytesMut, data: &[u8]) {
        Self::put_line(buf, b'$', data.len().to_string().as_bytes());
        buf.put_slice(data);
        buf.put_slice(CRLF);
    }
}

/// Decodes RESP2 replies
pub struct RespDecoder;

impl RespDecoder {
    /// Decode one value from the buffer
    ///
    /// Returns `Ok(None)` when the buffer holds only part of a value; the
    /// cursor position is then meaningless and the caller should retry with
    /// more data from the same starting point.
    pub fn decode(buf: &mut Cursor<&[u8]>) -> RedisResult<Option<RespValue>> {
        if !buf.has_remaining() {
            return Ok(None);
        }

        let type_byte = buf.get_u8();
        let Some(line) = Self::read_line(buf) else {
            return Ok(None);
        };

        match type_byte {
            b'+' => Ok(Some(RespValue::SimpleString(Self::utf8(line)?))),
            b'-' => Ok(Some(RespValue::Error(Self::utf8(line)?))),
            b':' => Ok(Some(RespValue::Integer(Self::parse_int(line, "integer")?))),
            b'$' => {
                let len = Self::parse_int(line, "bulk string length")?;
                if len < 0 {
                    return Ok(Some(RespValue::Null));
                }
                let len = len as usize;
                if buf.remaining() < len + 2 {
                    return Ok(None);
                }
                let data = Bytes::copy_from_slice(&buf.chunk()[..len]);
                buf.advance(len);
                if buf.chunk()[..2] != *CRLF {
                    return Err(RedisError::Protocol(
                        "Bulk string not terminated by CRLF".to_string(),
                    ));
                }
                buf.advance(2);
                Ok(Some(RespValue::BulkString(data)))
            }
            b'*' => {
                let len = Self::parse_int(line, "array length")?;
                if len < 0 {
                    return Ok(Some(RespValue::Null));
                }
                let mut arr = Vec::with_capacity(len as usize);
                for _ in 0..len {
                    match Self::decode(buf)? {
                        Some(value) => arr.push(value),
                        None => return Ok(None),
                    }
                }
                Ok(Some(RespValue::Array(arr)))
            }
            other => Err(RedisError::Protocol(format!(
                "Invalid RESP type byte: {}",
                other as char
            ))),
        }
    }

    fn read_line<'a>(buf: &mut Cursor<&'a [u8]>) -> Option<&'a [u8]> {
        let start = buf.position() as usize;
        let slice: &'a [u8] = *buf.get_ref();
        let end = slice[start..].windows(2).position(|w| w == CRLF)? + start;
        buf.set_position((end + 2) as u64);
        Some(&slice[start..end])
    }

    fn utf8(line: &[u8]) -> RedisResult<String> {
        String::from_utf8(line.to_vec())
            .map_err(|e| RedisError::Protocol(format!("Invalid UTF-8: {}", e)))
    }

    fn parse_int(line: &[u8], what: &str) -> RedisResult<i64> {
        Self::utf8(line)?
            .parse::<i64>()
            .map_err(|e| RedisError::Protocol(format!("Invalid {}: {}", what, e)))
    }
}
