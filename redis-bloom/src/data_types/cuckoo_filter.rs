//! Key-bound Cuckoo filter handle

use crate::client::Client;
use crate::commands::{CfInsertOptions, CfReserveOptions};
use bytes::Bytes;
use redis_bloom_core::{
    config::ConnectionConfig,
    error::RedisResult,
    types::{CfInsertOutcome, CuckooInfo, RedisValue, ScanDumpChunk},
};

/// Cuckoo filter stored at one key
///
/// Unlike a Bloom filter it supports deletion and per-item counts.
#[derive(Debug, Clone)]
pub struct CuckooFilter {
    client: Client,
    key: String,
}

impl CuckooFilter {
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
    pub async fn reserve(&self, capacity: u64, options: CfReserveOptions) -> RedisResult<bool> {
        self.client
            .cf_reserve(self.key.as_str(), capacity, options)
            .await
    }

    /// Add an item, even if already present
    pub async fn add(&self, item: impl Into<RedisValue>) -> RedisResult<bool> {
        self.client.cf_add(self.key.as_str(), item).await
    }

    /// Add an item unless it is already present
    pub async fn add_if_not_exist(&self, item: impl Into<RedisValue>) -> RedisResult<bool> {
        self.client.cf_addnx(self.key.as_str(), item).await
    }

    /// Add several items, creating the filter from `options` if needed
    pub async fn insert<T: Into<RedisValue>>(
        &self,
        items: impl IntoIterator<Item = T>,
        options: CfInsertOptions,
    ) -> RedisResult<Vec<CfInsertOutcome>> {
        self.client.cf_insert(self.key.as_str(), items, options).await
    }

    /// Add several items, skipping those already present
    pub async fn insert_if_not_exist<T: Into<RedisValue>>(
        &self,
        items: impl IntoIterator<Item = T>,
        options: CfInsertOptions,
    ) -> RedisResult<Vec<CfInsertOutcome>> {
        self.client
            .cf_insertnx(self.key.as_str(), items, options)
            .await
    }

    /// Whether an item may be present
    pub async fn exists(&self, item: impl Into<RedisValue>) -> RedisResult<bool> {
        self.client.cf_exists(self.key.as_str(), item).await
    }

    /// [`exists`](Self::exists) for several items
    pub async fn multi_exists<T: Into<RedisValue>>(
        &self,
        items: impl IntoIterator<Item = T>,
    ) -> RedisResult<Vec<bool>> {
        self.client.cf_mexists(self.key.as_str(), items).await
    }

    /// Approximate number of times an item was added
    pub async fn count(&self, item: impl Into<RedisValue>) -> RedisResult<i64> {
        self.client.cf_count(self.key.as_str(), item).await
    }

    /// Remove one occurrence of an item; `false` if none was found
    pub async fn delete(&self, item: impl Into<RedisValue>) -> RedisResult<bool> {
        self.client.cf_del(self.key.as_str(), item).await
    }

    /// Next dump chunk after `iterator`; start at 0, done at 0 again
    pub async fn scan_dump(&self, iterator: i64) -> RedisResult<ScanDumpChunk> {
        self.client.cf_scandump(self.key.as_str(), iterator).await
    }

    /// Restore a chunk produced by [`scan_dump`](Self::scan_dump)
    pub async fn load_chunk(&self, iterator: i64, data: impl Into<Bytes>) -> RedisResult<bool> {
        self.client
            .cf_loadchunk(self.key.as_str(), iterator, data)
            .await
    }

    /// Filter statistics
    pub async fn info(&self) -> RedisResult<CuckooInfo> {
        self.client.cf_info(self.key.as_str()).await
    }

    /// Copy this filter to `destination`
    pub async fn copy(&self, destination: impl Into<String>) -> RedisResult<bool> {
        self.client.cf_copy(self.key.as_str(), destination).await
    }

    /// Close the shared connection; `false` if it was already closed
    pub async fn disconnect(&self) -> RedisResult<bool> {
        self.client.disconnect().await
    }
}
