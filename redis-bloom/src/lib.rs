//! Async client for the RedisBloom module
//!
//! `redis-bloom` drives the four probabilistic data types RedisBloom adds to
//! a Redis server: Bloom filters, Cuckoo filters, Count-Min Sketches and
//! Top-K. Arguments are validated before anything reaches the wire, and
//! server rejections are surfaced verbatim.
//!
//! # Features
//!
//! - Typed command builders for every `BF.*`, `CF.*`, `CMS.*` and `TOPK.*` command
//! - Key-bound handles ([`BloomFilter`], [`CuckooFilter`], [`CountMinSketch`], [`TopK`])
//! - Filter copy through the SCANDUMP/LOADCHUNK chunk protocol
//! - Async/await support with Tokio
//!
//! # Quick Start
//!
//! ```no_run
//! use redis_bloom::{Client, ConnectionConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ConnectionConfig::new("redis://localhost:6379");
//!     let client = Client::connect(config).await?;
//!
//!     let sketch = client.count_min_sketch("colors");
//!     sketch.init_by_dim(100, 4).await?;
//!     let counts = sketch
//!         .increment_by([("green", 40), ("black", 90), ("orange", 6)])
//!         .await?;
//!     println!("Counts: {:?}", counts);
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_const_for_fn)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::future_not_send)]
#![allow(clippy::significant_drop_tightening)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::return_self_not_must_use)]

pub mod client;
pub mod commands;
pub mod connection;
pub mod data_types;
pub mod protocol;
pub mod reply;

pub use client::Client;
pub use commands::{
    BfInsertOptions, BfReserveOptions, CfInsertOptions, CfReserveOptions, Command,
    TopKDimensions,
};
pub use connection::{RedisConnection, Transport};
pub use data_types::{BloomFilter, CountMinSketch, CuckooFilter, TopK};

pub use redis_bloom_core;
pub use redis_bloom_core::{
    config::ConnectionConfig,
    error::{RedisError, RedisResult},
    types::{
        BloomInfo, CfInsertOutcome, CountMinSketchInfo, CuckooInfo, RedisValue, ScanDumpChunk,
        TopKInfo,
    },
    value::RespValue,
};
