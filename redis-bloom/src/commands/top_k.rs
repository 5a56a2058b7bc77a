//! Top-K commands (`TOPK.*`)

use super::options::TopKDimensions;
use super::{check_positive, CommandArgs};
use crate::reply;
use redis_bloom_core::{
    error::{RedisError, RedisResult},
    types::{RedisValue, TopKInfo},
    value::RespValue,
};

keyed_command!(
    /// TOPK.RESERVE - Create a Top-K tracking `k` items
    TopKReserveCommand,
    "TOPK.RESERVE",
    bool,
    reply::to_ok
);

impl TopKReserveCommand {
    /// Create a new TOPK.RESERVE command
    pub fn new(
        key: impl Into<String>,
        k: u64,
        dimensions: Option<TopKDimensions>,
    ) -> RedisResult<Self> {
        check_positive("k", k)?;
        let mut args = CommandArgs::new(key)?.arg(k);
        if let Some(dimensions) = dimensions {
            dimensions.validate()?;
            args = dimensions.apply(args);
        }
        Ok(Self { args })
    }
}

keyed_command!(
    /// TOPK.ADD - Add items; replies with the item each addition expelled
    /// from the list, if any
    TopKAddCommand,
    "TOPK.ADD",
    Vec<Option<String>>,
    reply::to_optional_string_array
);

impl TopKAddCommand {
    /// Create a new TOPK.ADD command
    pub fn new<I, T>(key: impl Into<String>, items: I) -> RedisResult<Self>
    where
        I: IntoIterator<Item = T>,
        T: Into<RedisValue>,
    {
        Ok(Self {
            args: CommandArgs::new(key)?.items(items)?,
        })
    }
}

keyed_command!(
    /// TOPK.INCRBY - Increase the score of items; replies like TOPK.ADD
    TopKIncrByCommand,
    "TOPK.INCRBY",
    Vec<Option<String>>,
    reply::to_optional_string_array
);

impl TopKIncrByCommand {
    /// Create a new TOPK.INCRBY command from `(item, increment)` pairs
    pub fn new<I, T>(key: impl Into<String>, increments: I) -> RedisResult<Self>
    where
        I: IntoIterator<Item = (T, u64)>,
        T: Into<RedisValue>,
    {
        let mut args = CommandArgs::new(key)?;
        let mut pairs = 0_usize;
        for (item, increment) in increments {
            args = args.item(item)?.arg(check_positive("increment", increment)?);
            pairs += 1;
        }
        if pairs == 0 {
            return Err(RedisError::InvalidArgument(
                "at least one item/increment pair is required".to_string(),
            ));
        }
        Ok(Self { args })
    }
}

keyed_command!(
    /// TOPK.QUERY - Whether each item is currently in the top list
    TopKQueryCommand,
    "TOPK.QUERY",
    Vec<bool>,
    reply::to_bool_array
);

impl TopKQueryCommand {
    /// Create a new TOPK.QUERY command
    pub fn new<I, T>(key: impl Into<String>, items: I) -> RedisResult<Self>
    where
        I: IntoIterator<Item = T>,
        T: Into<RedisValue>,
    {
        Ok(Self {
            args: CommandArgs::new(key)?.items(items)?,
        })
    }
}

keyed_command!(
    /// TOPK.COUNT - Estimated count of each item
    TopKCountCommand,
    "TOPK.COUNT",
    Vec<i64>,
    reply::to_int_array
);

impl TopKCountCommand {
    /// Create a new TOPK.COUNT command
    pub fn new<I, T>(key: impl Into<String>, items: I) -> RedisResult<Self>
    where
        I: IntoIterator<Item = T>,
        T: Into<RedisValue>,
    {
        Ok(Self {
            args: CommandArgs::new(key)?.items(items)?,
        })
    }
}

keyed_command!(
    /// TOPK.LIST - Items currently in the top list
    TopKListCommand,
    "TOPK.LIST",
    Vec<String>,
    reply::to_string_array
);

impl TopKListCommand {
    /// Create a new TOPK.LIST command
    pub fn new(key: impl Into<String>) -> RedisResult<Self> {
        Ok(Self {
            args: CommandArgs::new(key)?,
        })
    }
}

keyed_command!(
    /// TOPK.LIST WITHCOUNT - Items in the top list with their counts
    TopKListWithCountCommand,
    "TOPK.LIST",
    Vec<(String, i64)>,
    reply::to_string_count_pairs
);

impl TopKListWithCountCommand {
    /// Create a new TOPK.LIST ... WITHCOUNT command
    pub fn new(key: impl Into<String>) -> RedisResult<Self> {
        Ok(Self {
            args: CommandArgs::new(key)?.arg("WITHCOUNT"),
        })
    }
}

keyed_command!(
    /// TOPK.INFO - Top-K parameters
    TopKInfoCommand,
    "TOPK.INFO",
    TopKInfo,
    reply::to_top_k_info
);

impl TopKInfoCommand {
    /// Create a new TOPK.INFO command
    pub fn new(key: impl Into<String>) -> RedisResult<Self> {
        Ok(Self {
            args: CommandArgs::new(key)?,
        })
    }
}
