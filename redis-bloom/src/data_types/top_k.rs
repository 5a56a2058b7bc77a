//! Key-bound Top-K handle

use crate::client::Client;
use crate::commands::TopKDimensions;
use redis_bloom_core::{
    config::ConnectionConfig,
    error::RedisResult,
    types::{RedisValue, TopKInfo},
};

/// Top-K stored at one key
#[derive(Debug, Clone)]
pub struct TopK {
    client: Client,
    key: String,
}

impl TopK {
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

    /// Create the structure tracking the `k` most frequent items
    ///
    /// Without `dimensions` the server defaults apply.
    pub async fn reserve(&self, k: u64, dimensions: Option<TopKDimensions>) -> RedisResult<bool> {
        self.client
            .topk_reserve(self.key.as_str(), k, dimensions)
            .await
    }

    /// Add items; each slot holds the item expelled from the list, if any
    pub async fn add<T: Into<RedisValue>>(
        &self,
        items: impl IntoIterator<Item = T>,
    ) -> RedisResult<Vec<Option<String>>> {
        self.client.topk_add(self.key.as_str(), items).await
    }

    /// Increase item scores by `(item, increment)` pairs; replies like
    /// [`add`](Self::add)
    pub async fn increment_by<T: Into<RedisValue>>(
        &self,
        increments: impl IntoIterator<Item = (T, u64)>,
    ) -> RedisResult<Vec<Option<String>>> {
        self.client
            .topk_incr_by(self.key.as_str(), increments)
            .await
    }

    /// Whether each item is currently in the list
    pub async fn query<T: Into<RedisValue>>(
        &self,
        items: impl IntoIterator<Item = T>,
    ) -> RedisResult<Vec<bool>> {
        self.client.topk_query(self.key.as_str(), items).await
    }

    /// Estimated count of each item
    pub async fn count<T: Into<RedisValue>>(
        &self,
        items: impl IntoIterator<Item = T>,
    ) -> RedisResult<Vec<i64>> {
        self.client.topk_count(self.key.as_str(), items).await
    }

    /// Items in the list, most frequent first
    pub async fn list(&self) -> RedisResult<Vec<String>> {
        self.client.topk_list(self.key.as_str()).await
    }

    /// Items in the list with their estimated counts
    pub async fn list_with_count(&self) -> RedisResult<Vec<(String, i64)>> {
        self.client.topk_list_with_count(self.key.as_str()).await
    }

    /// Top-K parameters
    pub async fn info(&self) -> RedisResult<TopKInfo> {
        self.client.topk_info(self.key.as_str()).await
    }

    /// Close the shared connection; `false` if it was already closed
    pub async fn disconnect(&self) -> RedisResult<bool> {
        self.client.disconnect().await
    }
}
