//! Common types used throughout the library

use crate::error::{RedisError, RedisResult};
use crate::value::RespValue;
use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// A caller-supplied argument value
///
/// Filter items are accepted in a loosely typed form so that strings,
/// numbers and raw bytes can share one call. Only the scalar variants are
/// valid items; booleans, arrays and nil are rejected by
/// [`RedisValue::into_item`] before anything reaches the server.
#[derive(Debug, Clone, PartialEq)]
pub enum RedisValue {
    /// Null value
    Nil,
    /// String value
    String(String),
    /// Binary data
    Bytes(Bytes),
    /// Integer value
    Int(i64),
    /// Floating point value
    Float(f64),
    /// Boolean value
    Bool(bool),
    /// Array of values
    Array(Vec<RedisValue>),
}

impl RedisValue {
    /// Name of the variant, used in validation messages
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Nil => "nil",
            Self::String(_) => "string",
            Self::Bytes(_) => "bytes",
            Self::Int(_) => "integer",
            Self::Float(_) => "float",
            Self::Bool(_) => "boolean",
            Self::Array(_) => "array",
        }
    }

    /// Whether the value may be used as a filter item
    #[must_use]
    pub fn is_scalar(&self) -> bool {
        match self {
            Self::String(_) | Self::Bytes(_) | Self::Int(_) => true,
            Self::Float(f) => f.is_finite(),
            Self::Nil | Self::Bool(_) | Self::Array(_) => false,
        }
    }

    /// Encode as an item argument
    ///
    /// Floats use the shortest representation that round-trips, so `1337.0`
    /// is sent as `1337` and `13.4` as `13.4`.
    ///
    /// # Errors
    ///
    /// Returns [`RedisError::InvalidArgument`] for booleans, arrays, nil and
    /// non-finite floats.
    pub fn into_item(self) -> RedisResult<RespValue> {
        match self {
            Self::String(s) => Ok(RespValue::from(s)),
            Self::Bytes(b) => Ok(RespValue::BulkString(b)),
            Self::Int(i) => Ok(RespValue::from(i)),
            Self::Float(f) if f.is_finite() => Ok(RespValue::from(f)),
            Self::Float(f) => Err(RedisError::invalid(format!(
                "item must be a finite number, got {f}"
            ))),
            other => Err(RedisError::invalid(format!(
                "item must be a string, integer or float, got {}",
                other.kind()
            ))),
        }
    }
}

impl From<String> for RedisValue {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<&str> for RedisValue {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<&String> for RedisValue {
    fn from(s: &String) -> Self {
        Self::String(s.clone())
    }
}

impl From<Vec<u8>> for RedisValue {
    fn from(b: Vec<u8>) -> Self {
        Self::Bytes(Bytes::from(b))
    }
}

impl From<&[u8]> for RedisValue {
    fn from(b: &[u8]) -> Self {
        Self::Bytes(Bytes::copy_from_slice(b))
    }
}

impl From<Bytes> for RedisValue {
    fn from(b: Bytes) -> Self {
        Self::Bytes(b)
    }
}

impl From<i64> for RedisValue {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<i32> for RedisValue {
    fn from(i: i32) -> Self {
        Self::Int(i64::from(i))
    }
}

impl From<u32> for RedisValue {
    fn from(i: u32) -> Self {
        Self::Int(i64::from(i))
    }
}

impl From<u64> for RedisValue {
    fn from(i: u64) -> Self {
        i64::try_from(i).map_or_else(|_| Self::String(i.to_string()), Self::Int)
    }
}

impl From<f64> for RedisValue {
    fn from(f: f64) -> Self {
        Self::Float(f)
    }
}

impl From<f32> for RedisValue {
    fn from(f: f32) -> Self {
        Self::Float(f64::from(f))
    }
}

impl From<bool> for RedisValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<Vec<Self>> for RedisValue {
    fn from(arr: Vec<Self>) -> Self {
        Self::Array(arr)
    }
}

/// One piece of a filter dump produced by `SCANDUMP`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanDumpChunk {
    /// Cursor to pass to the next `SCANDUMP` and to `LOADCHUNK`; `0` once
    /// the dump is finished
    pub iterator: i64,
    /// Opaque chunk payload
    pub data: Bytes,
}

impl ScanDumpChunk {
    /// Create a chunk
    #[must_use]
    pub const fn new(iterator: i64, data: Bytes) -> Self {
        Self { iterator, data }
    }

    /// Whether this is the terminating chunk of a dump
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.iterator == 0
    }
}

/// Per-item result of `CF.INSERT` / `CF.INSERTNX`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CfInsertOutcome {
    /// The item was added (`1`)
    Added,
    /// `CF.INSERTNX` only: the item was already present (`0`)
    Exists,
    /// The filter is full and cannot grow (`-1`)
    Full,
}

impl CfInsertOutcome {
    /// Whether the item was stored by this call
    #[must_use]
    pub const fn is_added(self) -> bool {
        matches!(self, Self::Added)
    }
}

/// `BF.INFO` reply
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BloomInfo {
    /// Number of items the filter can hold before scaling
    pub capacity: i64,
    /// Memory used, in bytes
    pub size: i64,
    /// Number of sub-filters
    pub number_of_filters: i64,
    /// Number of items added
    pub number_of_items_inserted: i64,
    /// Growth factor; `None` for non-scaling filters
    pub expansion_rate: Option<i64>,
}

/// `CF.INFO` reply
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CuckooInfo {
    /// Memory used, in bytes
    pub size: i64,
    /// Number of buckets
    pub number_of_buckets: i64,
    /// Number of sub-filters
    pub number_of_filters: i64,
    /// Number of items added
    pub number_of_items_inserted: i64,
    /// Number of items deleted
    pub number_of_items_deleted: i64,
    /// Items per bucket
    pub bucket_size: i64,
    /// Growth factor
    pub expansion_rate: i64,
    /// Swap attempts before declaring the filter full
    pub max_iterations: i64,
}

/// `CMS.INFO` reply
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountMinSketchInfo {
    /// Counters per row
    pub width: i64,
    /// Number of rows
    pub depth: i64,
    /// Total of all increments
    pub count: i64,
}

/// `TOPK.INFO` reply
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TopKInfo {
    /// Number of tracked items
    pub k: i64,
    /// Counters per array
    pub width: i64,
    /// Number of arrays
    pub depth: i64,
    /// Decay probability
    pub decay: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_items_encode() {
        assert_eq!(
            RedisValue::from("foo").into_item().unwrap(),
            RespValue::from("foo")
        );
        assert_eq!(
            RedisValue::from(1337).into_item().unwrap(),
            RespValue::from("1337")
        );
        assert_eq!(
            RedisValue::from(13.4).into_item().unwrap(),
            RespValue::from("13.4")
        );
        assert_eq!(
            RedisValue::from(1337.0).into_item().unwrap(),
            RespValue::from("1337")
        );
    }

    #[test]
    fn test_non_scalar_items_rejected() {
        for value in [
            RedisValue::from(true),
            RedisValue::from(false),
            RedisValue::Nil,
            RedisValue::from(vec![RedisValue::from(1), RedisValue::from(2)]),
            RedisValue::from(f64::NAN),
        ] {
            let err = value.into_item().unwrap_err();
            assert!(err.is_invalid_argument(), "{err}");
        }
    }

    #[test]
    fn test_large_u64_falls_back_to_string() {
        assert_eq!(
            RedisValue::from(u64::MAX),
            RedisValue::String(u64::MAX.to_string())
        );
        assert_eq!(RedisValue::from(5_u64), RedisValue::Int(5));
    }

    #[test]
    fn test_scan_dump_chunk_completion() {
        assert!(ScanDumpChunk::new(0, Bytes::new()).is_complete());
        assert!(!ScanDumpChunk::new(1, Bytes::from_static(b"x")).is_complete());
    }

    #[test]
    fn test_info_serializes() {
        let info = CountMinSketchInfo {
            width: 100,
            depth: 4,
            count: 136,
        };
        let json = serde_json::to_string(&info).unwrap();
        assert_eq!(json, r#"{"width":100,"depth":4,"count":136}"#);
    }
}
