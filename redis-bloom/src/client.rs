//! High-level RedisBloom client
//!
//! [`Client`] is the single funnel through which every command reaches the
//! server. It owns one connection; clones share it.

use crate::commands::{
    BfAddCommand, BfExistsCommand, BfInfoCommand, BfInsertCommand, BfInsertOptions,
    BfLoadChunkCommand, BfMAddCommand, BfMExistsCommand, BfReserveCommand, BfReserveOptions,
    BfScanDumpCommand, CfAddCommand, CfAddNxCommand, CfCountCommand, CfDelCommand,
    CfExistsCommand, CfInfoCommand, CfInsertCommand, CfInsertNxCommand, CfInsertOptions,
    CfLoadChunkCommand, CfMExistsCommand, CfReserveCommand, CfReserveOptions, CfScanDumpCommand,
    CmsIncrByCommand, CmsInfoCommand, CmsInitByDimCommand, CmsInitByProbCommand, CmsMergeCommand,
    CmsQueryCommand, Command, TopKAddCommand, TopKCountCommand, TopKDimensions,
    TopKIncrByCommand, TopKInfoCommand, TopKListCommand, TopKListWithCountCommand,
    TopKQueryCommand, TopKReserveCommand,
};
use crate::connection::{RedisConnection, Transport};
use crate::data_types::{BloomFilter, CountMinSketch, CuckooFilter, TopK};
use crate::reply;
use bytes::Bytes;
use redis_bloom_core::{
    config::ConnectionConfig,
    error::{RedisError, RedisResult},
    types::{
        BloomInfo, CfInsertOutcome, CountMinSketchInfo, CuckooInfo, RedisValue, ScanDumpChunk,
        TopKInfo,
    },
    value::RespValue,
};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// RedisBloom client
///
/// Every call is one request/response round trip on the owned connection;
/// concurrent callers are serialized. There is no retry: a transport fault
/// drops the connection and later calls fail with
/// [`RedisError::NotConnected`] until [`Client::reconnect`] succeeds.
#[derive(Clone)]
pub struct Client {
    transport: Arc<Mutex<Option<Box<dyn Transport>>>>,
    config: Option<ConnectionConfig>,
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Client {
    /// Connect to Redis with the given configuration
    ///
    /// # Example
    ///
    /// ```no_run
    /// use redis_bloom::{Client, ConnectionConfig};
    ///
    /// #[tokio::main]
    /// async fn main() -> Result<(), Box<dyn std::error::Error>> {
    ///     let config = ConnectionConfig::new("redis://localhost:6379");
    ///     let client = Client::connect(config).await?;
    ///     client.bf_add("visitors", "alice").await?;
    ///     Ok(())
    /// }
    /// ```
    pub async fn connect(config: ConnectionConfig) -> RedisResult<Self> {
        info!("Connecting to Redis...");
        let connection: Box<dyn Transport> =
            Box::new(RedisConnection::connect(config.clone()).await?);
        Ok(Self {
            transport: Arc::new(Mutex::new(Some(connection))),
            config: Some(config),
        })
    }

    /// Build a client over an already established transport
    ///
    /// Such a client cannot [`reconnect`](Self::reconnect).
    pub fn with_transport(transport: impl Transport + 'static) -> Self {
        let transport: Box<dyn Transport> = Box::new(transport);
        Self {
            transport: Arc::new(Mutex::new(Some(transport))),
            config: None,
        }
    }

    /// Whether a connection is currently open
    pub async fn is_connected(&self) -> bool {
        self.transport.lock().await.is_some()
    }

    /// Close the connection
    ///
    /// Returns `true` if an open connection was closed and `false` if there
    /// was none. Every handle sharing this client is disconnected.
    pub async fn disconnect(&self) -> RedisResult<bool> {
        let Some(mut transport) = self.transport.lock().await.take() else {
            return Ok(false);
        };
        info!("Disconnecting from Redis");
        transport.close().await?;
        Ok(true)
    }

    /// Replace the connection with a fresh one built from the stored
    /// configuration
    pub async fn reconnect(&self) -> RedisResult<()> {
        let config = self.config.clone().ok_or_else(|| {
            RedisError::Config("Client was built without a connection config".to_string())
        })?;
        let connection: Box<dyn Transport> = Box::new(RedisConnection::connect(config).await?);
        if let Some(mut old) = self.transport.lock().await.replace(connection) {
            // Best effort; the old connection is discarded either way.
            let _ = old.close().await;
        }
        Ok(())
    }

    /// Execute a command and decode its reply
    pub async fn execute<C: Command>(&self, command: C) -> RedisResult<C::Output> {
        let response = self
            .send(command.command_name(), &command.args())
            .await?;
        command.parse_response(response)
    }

    /// Send an arbitrary command and return the raw reply
    ///
    /// Error replies are still turned into [`RedisError::Response`].
    pub async fn raw_command(
        &self,
        command: &str,
        args: Vec<RespValue>,
    ) -> RedisResult<RespValue> {
        self.send(command, &args).await
    }

    /// Server `INFO`, optionally restricted to one section, as `field -> value`
    pub async fn info(&self, section: Option<&str>) -> RedisResult<HashMap<String, String>> {
        let args: Vec<RespValue> = section.map(RespValue::from).into_iter().collect();
        reply::to_server_info(self.send("INFO", &args).await?)
    }

    async fn send(&self, command: &str, args: &[RespValue]) -> RedisResult<RespValue> {
        let mut guard = self.transport.lock().await;
        let transport = guard.as_mut().ok_or(RedisError::NotConnected)?;

        debug!("Sending {} with {} argument(s)", command, args.len());
        match transport.execute_command(command, args).await {
            Ok(RespValue::Error(msg)) => {
                debug!("{} rejected by server: {}", command, msg);
                Err(RedisError::Response(msg))
            }
            Ok(response) => Ok(response),
            Err(e) => {
                if e.breaks_connection() {
                    warn!("Dropping connection after transport error: {}", e);
                    *guard = None;
                }
                Err(e)
            }
        }
    }

    /// Copy a dumpable filter by streaming SCANDUMP chunks into LOADCHUNK
    async fn copy_chunks<S, L>(
        &self,
        scan: impl Fn(i64) -> RedisResult<S>,
        load: impl Fn(ScanDumpChunk) -> RedisResult<L>,
    ) -> RedisResult<bool>
    where
        S: Command<Output = ScanDumpChunk>,
        L: Command<Output = bool>,
    {
        let mut iterator = 0;
        loop {
            let chunk = self.execute(scan(iterator)?).await?;
            if chunk.is_complete() {
                return Ok(true);
            }
            iterator = chunk.iterator;
            self.execute(load(chunk)?).await?;
        }
    }

    // Bloom filter

    /// BF.RESERVE
    pub async fn bf_reserve(
        &self,
        key: impl Into<String>,
        error_rate: f64,
        capacity: u64,
        options: BfReserveOptions,
    ) -> RedisResult<bool> {
        self.execute(BfReserveCommand::new(key, error_rate, capacity, options)?)
            .await
    }

    /// BF.ADD
    pub async fn bf_add(
        &self,
        key: impl Into<String>,
        item: impl Into<RedisValue>,
    ) -> RedisResult<bool> {
        self.execute(BfAddCommand::new(key, item)?).await
    }

    /// BF.MADD
    pub async fn bf_madd<T: Into<RedisValue>>(
        &self,
        key: impl Into<String>,
        items: impl IntoIterator<Item = T>,
    ) -> RedisResult<Vec<bool>> {
        self.execute(BfMAddCommand::new(key, items)?).await
    }

    /// BF.INSERT
    pub async fn bf_insert<T: Into<RedisValue>>(
        &self,
        key: impl Into<String>,
        items: impl IntoIterator<Item = T>,
        options: BfInsertOptions,
    ) -> RedisResult<Vec<bool>> {
        self.execute(BfInsertCommand::new(key, items, options)?)
            .await
    }

    /// BF.EXISTS
    pub async fn bf_exists(
        &self,
        key: impl Into<String>,
        item: impl Into<RedisValue>,
    ) -> RedisResult<bool> {
        self.execute(BfExistsCommand::new(key, item)?).await
    }

    /// BF.MEXISTS
    pub async fn bf_mexists<T: Into<RedisValue>>(
        &self,
        key: impl Into<String>,
        items: impl IntoIterator<Item = T>,
    ) -> RedisResult<Vec<bool>> {
        self.execute(BfMExistsCommand::new(key, items)?).await
    }

    /// BF.SCANDUMP
    pub async fn bf_scandump(
        &self,
        key: impl Into<String>,
        iterator: i64,
    ) -> RedisResult<ScanDumpChunk> {
        self.execute(BfScanDumpCommand::new(key, iterator)?).await
    }

    /// BF.LOADCHUNK
    pub async fn bf_loadchunk(
        &self,
        key: impl Into<String>,
        iterator: i64,
        data: impl Into<Bytes>,
    ) -> RedisResult<bool> {
        self.execute(BfLoadChunkCommand::new(key, iterator, data)?)
            .await
    }

    /// BF.INFO
    pub async fn bf_info(&self, key: impl Into<String>) -> RedisResult<BloomInfo> {
        self.execute(BfInfoCommand::new(key)?).await
    }

    /// Copy a Bloom filter to `destination`
    ///
    /// Fails with [`RedisError::Response`] if `source` does not exist.
    pub async fn bf_copy(
        &self,
        source: impl Into<String>,
        destination: impl Into<String>,
    ) -> RedisResult<bool> {
        let (source, destination) = (source.into(), destination.into());
        debug!("Copying Bloom filter {} to {}", source, destination);
        self.copy_chunks(
            |iterator| BfScanDumpCommand::new(source.as_str(), iterator),
            |chunk| BfLoadChunkCommand::new(destination.as_str(), chunk.iterator, chunk.data),
        )
        .await
    }

    // Cuckoo filter

    /// CF.RESERVE
    pub async fn cf_reserve(
        &self,
        key: impl Into<String>,
        capacity: u64,
        options: CfReserveOptions,
    ) -> RedisResult<bool> {
        self.execute(CfReserveCommand::new(key, capacity, options)?)
            .await
    }

    /// CF.ADD
    pub async fn cf_add(
        &self,
        key: impl Into<String>,
        item: impl Into<RedisValue>,
    ) -> RedisResult<bool> {
        self.execute(CfAddCommand::new(key, item)?).await
    }

    /// CF.ADDNX
    pub async fn cf_addnx(
        &self,
        key: impl Into<String>,
        item: impl Into<RedisValue>,
    ) -> RedisResult<bool> {
        self.execute(CfAddNxCommand::new(key, item)?).await
    }

    /// CF.INSERT; reports per item whether it was added or the filter is full
    pub async fn cf_insert<T: Into<RedisValue>>(
        &self,
        key: impl Into<String>,
        items: impl IntoIterator<Item = T>,
        options: CfInsertOptions,
    ) -> RedisResult<Vec<CfInsertOutcome>> {
        self.execute(CfInsertCommand::new(key, items, options)?)
            .await
    }

    /// CF.INSERTNX
    pub async fn cf_insertnx<T: Into<RedisValue>>(
        &self,
        key: impl Into<String>,
        items: impl IntoIterator<Item = T>,
        options: CfInsertOptions,
    ) -> RedisResult<Vec<CfInsertOutcome>> {
        self.execute(CfInsertNxCommand::new(key, items, options)?)
            .await
    }

    /// CF.EXISTS
    pub async fn cf_exists(
        &self,
        key: impl Into<String>,
        item: impl Into<RedisValue>,
    ) -> RedisResult<bool> {
        self.execute(CfExistsCommand::new(key, item)?).await
    }

    /// CF.MEXISTS
    pub async fn cf_mexists<T: Into<RedisValue>>(
        &self,
        key: impl Into<String>,
        items: impl IntoIterator<Item = T>,
    ) -> RedisResult<Vec<bool>> {
        self.execute(CfMExistsCommand::new(key, items)?).await
    }

    /// CF.COUNT
    pub async fn cf_count(
        &self,
        key: impl Into<String>,
        item: impl Into<RedisValue>,
    ) -> RedisResult<i64> {
        self.execute(CfCountCommand::new(key, item)?).await
    }

    /// CF.DEL
    pub async fn cf_del(
        &self,
        key: impl Into<String>,
        item: impl Into<RedisValue>,
    ) -> RedisResult<bool> {
        self.execute(CfDelCommand::new(key, item)?).await
    }

    /// CF.SCANDUMP
    pub async fn cf_scandump(
        &self,
        key: impl Into<String>,
        iterator: i64,
    ) -> RedisResult<ScanDumpChunk> {
        self.execute(CfScanDumpCommand::new(key, iterator)?).await
    }

    /// CF.LOADCHUNK
    pub async fn cf_loadchunk(
        &self,
        key: impl Into<String>,
        iterator: i64,
        data: impl Into<Bytes>,
    ) -> RedisResult<bool> {
        self.execute(CfLoadChunkCommand::new(key, iterator, data)?)
            .await
    }

    /// CF.INFO
    pub async fn cf_info(&self, key: impl Into<String>) -> RedisResult<CuckooInfo> {
        self.execute(CfInfoCommand::new(key)?).await
    }

    /// Copy a Cuckoo filter to `destination`
    ///
    /// Fails with [`RedisError::Response`] if `source` does not exist.
    pub async fn cf_copy(
        &self,
        source: impl Into<String>,
        destination: impl Into<String>,
    ) -> RedisResult<bool> {
        let (source, destination) = (source.into(), destination.into());
        debug!("Copying Cuckoo filter {} to {}", source, destination);
        self.copy_chunks(
            |iterator| CfScanDumpCommand::new(source.as_str(), iterator),
            |chunk| CfLoadChunkCommand::new(destination.as_str(), chunk.iterator, chunk.data),
        )
        .await
    }

    // Count-Min Sketch

    /// CMS.INITBYDIM
    pub async fn cms_init_by_dim(
        &self,
        key: impl Into<String>,
        width: u64,
        depth: u64,
    ) -> RedisResult<bool> {
        self.execute(CmsInitByDimCommand::new(key, width, depth)?)
            .await
    }

    /// CMS.INITBYPROB
    pub async fn cms_init_by_prob(
        &self,
        key: impl Into<String>,
        error: f64,
        probability: f64,
    ) -> RedisResult<bool> {
        self.execute(CmsInitByProbCommand::new(key, error, probability)?)
            .await
    }

    /// CMS.INCRBY with `(item, increment)` pairs; returns the updated counts
    pub async fn cms_incr_by<T: Into<RedisValue>>(
        &self,
        key: impl Into<String>,
        increments: impl IntoIterator<Item = (T, i64)>,
    ) -> RedisResult<Vec<i64>> {
        self.execute(CmsIncrByCommand::new(key, increments)?)
            .await
    }

    /// CMS.QUERY
    pub async fn cms_query<T: Into<RedisValue>>(
        &self,
        key: impl Into<String>,
        items: impl IntoIterator<Item = T>,
    ) -> RedisResult<Vec<i64>> {
        self.execute(CmsQueryCommand::new(key, items)?).await
    }

    /// CMS.MERGE
    pub async fn cms_merge(
        &self,
        destination: impl Into<String>,
        sources: Vec<String>,
        weights: Option<Vec<i64>>,
    ) -> RedisResult<bool> {
        self.execute(CmsMergeCommand::new(destination, sources, weights)?)
            .await
    }

    /// CMS.INFO
    pub async fn cms_info(&self, key: impl Into<String>) -> RedisResult<CountMinSketchInfo> {
        self.execute(CmsInfoCommand::new(key)?).await
    }

    // Top-K

    /// TOPK.RESERVE
    pub async fn topk_reserve(
        &self,
        key: impl Into<String>,
        k: u64,
        dimensions: Option<TopKDimensions>,
    ) -> RedisResult<bool> {
        self.execute(TopKReserveCommand::new(key, k, dimensions)?)
            .await
    }

    /// TOPK.ADD; returns the item expelled by each addition, if any
    pub async fn topk_add<T: Into<RedisValue>>(
        &self,
        key: impl Into<String>,
        items: impl IntoIterator<Item = T>,
    ) -> RedisResult<Vec<Option<String>>> {
        self.execute(TopKAddCommand::new(key, items)?).await
    }

    /// TOPK.INCRBY with `(item, increment)` pairs
    pub async fn topk_incr_by<T: Into<RedisValue>>(
        &self,
        key: impl Into<String>,
        increments: impl IntoIterator<Item = (T, u64)>,
    ) -> RedisResult<Vec<Option<String>>> {
        self.execute(TopKIncrByCommand::new(key, increments)?)
            .await
    }

    /// TOPK.QUERY
    pub async fn topk_query<T: Into<RedisValue>>(
        &self,
        key: impl Into<String>,
        items: impl IntoIterator<Item = T>,
    ) -> RedisResult<Vec<bool>> {
        self.execute(TopKQueryCommand::new(key, items)?).await
    }

    /// TOPK.COUNT
    pub async fn topk_count<T: Into<RedisValue>>(
        &self,
        key: impl Into<String>,
        items: impl IntoIterator<Item = T>,
    ) -> RedisResult<Vec<i64>> {
        self.execute(TopKCountCommand::new(key, items)?).await
    }

    /// TOPK.LIST
    pub async fn topk_list(&self, key: impl Into<String>) -> RedisResult<Vec<String>> {
        self.execute(TopKListCommand::new(key)?).await
    }

    /// TOPK.LIST WITHCOUNT
    pub async fn topk_list_with_count(
        &self,
        key: impl Into<String>,
    ) -> RedisResult<Vec<(String, i64)>> {
        self.execute(TopKListWithCountCommand::new(key)?).await
    }

    /// TOPK.INFO
    pub async fn topk_info(&self, key: impl Into<String>) -> RedisResult<TopKInfo> {
        self.execute(TopKInfoCommand::new(key)?).await
    }

    // Data-type handles

    /// Handle bound to the Bloom filter at `key`
    pub fn bloom_filter(&self, key: impl Into<String>) -> BloomFilter {
        BloomFilter::new(self.clone(), key)
    }

    /// Handle bound to the Cuckoo filter at `key`
    pub fn cuckoo_filter(&self, key: impl Into<String>) -> CuckooFilter {
        CuckooFilter::new(self.clone(), key)
    }

    /// Handle bound to the Count-Min Sketch at `key`
    pub fn count_min_sketch(&self, key: impl Into<String>) -> CountMinSketch {
        CountMinSketch::new(self.clone(), key)
    }

    /// Handle bound to the Top-K at `key`
    pub fn top_k(&self, key: impl Into<String>) -> TopK {
        TopK::new(self.clone(), key)
    }
}
