//! Core types for the redis-bloom RedisBloom client
//!
//! This crate provides the error type, wire values, argument values,
//! connection configuration and typed replies shared by the client crate.

#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod types;
pub mod value;

pub use config::ConnectionConfig;
pub use error::{RedisError, RedisResult};
pub use types::{
    BloomInfo, CfInsertOutcome, CountMinSketchInfo, CuckooInfo, RedisValue, ScanDumpChunk,
    TopKInfo,
};
pub use value::RespValue;
