//! Key-bound Bloom filter handle

use crate::client::Client;
use crate::commands::{BfInsertOptions, BfReserveOptions};
use bytes::Bytes;
use redis_bloom_core::{
    config::ConnectionConfig,
    error::RedisResult,
    types::{BloomInfo, RedisValue, ScanDumpChunk},
};

/// Bloom filter stored at one key
///
/// # Example
///
/// ```no_run
/// use redis_bloom::{BloomFilter, ConnectionConfig};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let filter = BloomFilter::connect("visitors", ConnectionConfig::from_env()).await?;
///     filter.add("alice").await?;
///     assert!(filter.exists("alice").await?);
///     filter.disconnect().await?;
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct BloomFilter {
    client: Client,
    key: String,
}

impl BloomFilter {
    pub(crate) fn new(client: Client, key: impl Into<String>) -> Self {
        Self {
            client,
            key: key.into(),
        }
    }

    /// Open a dedicated connection and bind it to `key`
    pub async fn connect(key: impl Into<String>, config: ConnectionConfig) -> RedisResult<Self> {
        Ok(Self::new(Client::connect(config).await?, key))
    }

    /// Key this handle addresses
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Underlying client
    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Create the filter; fails if the key already exists
    pub async fn reserve(
        &self,
        error_rate: f64,
        capacity: u64,
        options: BfReserveOptions,
    ) -> RedisResult<bool> {
        self.client
            .bf_reserve(self.key.as_str(), error_rate, capacity, options)
            .await
    }

    /// Add an item; `false` if it was (probably) already present
    pub async fn add(&self, item: impl Into<RedisValue>) -> RedisResult<bool> {
        self.client.bf_add(self.key.as_str(), item).await
    }

    /// Add several items
    pub async fn multi_add<T: Into<RedisValue>>(
        &self,
        items: impl IntoIterator<Item = T>,
    ) -> RedisResult<Vec<bool>> {
        self.client.bf_madd(self.key.as_str(), items).await
    }

    /// Add several items, creating the filter from `options` if needed
    pub async fn insert<T: Into<RedisValue>>(
        &self,
        items: impl IntoIterator<Item = T>,
        options: BfInsertOptions,
    ) -> RedisResult<Vec<bool>> {
        self.client.bf_insert(self.key.as_str(), items, options).await
    }

    /// Whether an item may have been added
    pub async fn exists(&self, item: impl Into<RedisValue>) -> RedisResult<bool> {
        self.client.bf_exists(self.key.as_str(), item).await
    }

    /// [`exists`](Self::exists) for several items
    pub async fn multi_exists<T: Into<RedisValue>>(
        &self,
        items: impl IntoIterator<Item = T>,
    ) -> RedisResult<Vec<bool>> {
        self.client.bf_mexists(self.key.as_str(), items).await
    }

    /// Next dump chunk after `iterator`; start at 0, done when the returned
    /// iterator is 0
    pub async fn scan_dump(&self, iterator: i64) -> RedisResult<ScanDumpChunk> {
        self.client.bf_scandump(self.key.as_str(), iterator).await
    }

    /// Restore a chunk produced by [`scan_dump`](Self::scan_dump)
    pub async fn load_chunk(&self, iterator: i64, data: impl Into<Bytes>) -> RedisResult<bool> {
        self.client
            .bf_loadchunk(self.key.as_str(), iterator, data)
            .await
    }

    /// Filter statistics
    pub async fn info(&self) -> RedisResult<BloomInfo> {
        self.client.bf_info(self.key.as_str()).await
    }

    /// Copy this filter to `destination`
    pub async fn copy(&self, destination: impl Into<String>) -> RedisResult<bool> {
        self.client.bf_copy(self.key.as_str(), destination).await
    }

    /// Close the shared connection; `false` if it was already closed
    pub async fn disconnect(&self) -> RedisResult<bool> {
        self.client.disconnect().await
    }
}
