//! Key-bound Count-Min Sketch handle

use crate::client::Client;
use redis_bloom_core::{
    config::ConnectionConfig,
    error::RedisResult,
    types::{CountMinSketchInfo, RedisValue},
};

/// Count-Min Sketch stored at one key
#[derive(Debug, Clone)]
pub struct CountMinSketch {
    client: Client,
    key: String,
}

impl CountMinSketch {
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

    /// Create the sketch with explicit dimensions
    pub async fn init_by_dim(&self, width: u64, depth: u64) -> RedisResult<bool> {
        self.client
            .cms_init_by_dim(self.key.as_str(), width, depth)
            .await
    }

    /// Create the sketch sized for an error bound and the probability of
    /// exceeding it
    pub async fn init_by_prob(&self, error: f64, probability: f64) -> RedisResult<bool> {
        self.client
            .cms_init_by_prob(self.key.as_str(), error, probability)
            .await
    }

    /// Increase counts by `(item, increment)` pairs; returns the new counts
    /// in the same order
    pub async fn increment_by<T: Into<RedisValue>>(
        &self,
        increments: impl IntoIterator<Item = (T, i64)>,
    ) -> RedisResult<Vec<i64>> {
        self.client
            .cms_incr_by(self.key.as_str(), increments)
            .await
    }

    /// Estimated counts
    pub async fn query<T: Into<RedisValue>>(
        &self,
        items: impl IntoIterator<Item = T>,
    ) -> RedisResult<Vec<i64>> {
        self.client.cms_query(self.key.as_str(), items).await
    }

    /// Overwrite this sketch with the (optionally weighted) sum of `sources`
    ///
    /// All sketches must share the same dimensions and this one must exist.
    pub async fn merge_from(
        &self,
        sources: Vec<String>,
        weights: Option<Vec<i64>>,
    ) -> RedisResult<bool> {
        self.client
            .cms_merge(self.key.as_str(), sources, weights)
            .await
    }

    /// Sketch dimensions and total count
    pub async fn info(&self) -> RedisResult<CountMinSketchInfo> {
        self.client.cms_info(self.key.as_str()).await
    }

    /// Close the shared connection; `false` if it was already closed
    pub async fn disconnect(&self) -> RedisResult<bool> {
        self.client.disconnect().await
    }
}
