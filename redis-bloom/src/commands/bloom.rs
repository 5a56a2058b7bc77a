//! Bloom filter commands (`BF.*`)

use super::options::{BfInsertOptions, BfReserveOptions};
use super::{check_positive, CommandArgs};
use crate::reply;
use bytes::Bytes;
use redis_bloom_core::{
    error::RedisResult,
    types::{BloomInfo, RedisValue, ScanDumpChunk},
    value::RespValue,
};

keyed_command!(
    /// BF.RESERVE - Create an empty filter with a given error rate and capacity
    BfReserveCommand,
    "BF.RESERVE",
    bool,
    reply::to_ok
);

impl BfReserveCommand {
    /// Create a new BF.RESERVE command
    ///
    /// `capacity` must be positive. `error_rate` is range-checked by the
    /// server; values outside (0, 1) come back as a `Response` error.
    pub fn new(
        key: impl Into<String>,
        error_rate: f64,
        capacity: u64,
        options: BfReserveOptions,
    ) -> RedisResult<Self> {
        check_positive("capacity", capacity)?;
        options.validate()?;
        let args = CommandArgs::new(key)?.arg(error_rate).arg(capacity);
        Ok(Self {
            args: options.apply(args),
        })
    }
}

keyed_command!(
    /// BF.ADD - Add an item, creating the filter if needed
    BfAddCommand,
    "BF.ADD",
    bool,
    reply::to_bool
);

impl BfAddCommand {
    /// Create a new BF.ADD command
    pub fn new(key: impl Into<String>, item: impl Into<RedisValue>) -> RedisResult<Self> {
        Ok(Self {
            args: CommandArgs::new(key)?.item(item)?,
        })
    }
}

keyed_command!(
    /// BF.MADD - Add several items
    BfMAddCommand,
    "BF.MADD",
    Vec<bool>,
    reply::to_bool_array
);

impl BfMAddCommand {
    /// Create a new BF.MADD command
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
    /// BF.INSERT - Add several items, creating the filter with the given
    /// parameters if needed
    BfInsertCommand,
    "BF.INSERT",
    Vec<bool>,
    reply::to_bool_array
);

impl BfInsertCommand {
    /// Create a new BF.INSERT command
    pub fn new<I, T>(
        key: impl Into<String>,
        items: I,
        options: BfInsertOptions,
    ) -> RedisResult<Self>
    where
        I: IntoIterator<Item = T>,
        T: Into<RedisValue>,
    {
        options.validate()?;
        let args = options.apply(CommandArgs::new(key)?).arg("ITEMS");
        Ok(Self {
            args: args.items(items)?,
        })
    }
}

keyed_command!(
    /// BF.EXISTS - Check whether an item may be in the filter
    BfExistsCommand,
    "BF.EXISTS",
    bool,
    reply::to_bool
);

impl BfExistsCommand {
    /// Create a new BF.EXISTS command
    pub fn new(key: impl Into<String>, item: impl Into<RedisValue>) -> RedisResult<Self> {
        Ok(Self {
            args: CommandArgs::new(key)?.item(item)?,
        })
    }
}

keyed_command!(
    /// BF.MEXISTS - Check several items
    BfMExistsCommand,
    "BF.MEXISTS",
    Vec<bool>,
    reply::to_bool_array
);

impl BfMExistsCommand {
    /// Create a new BF.MEXISTS command
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
    /// BF.SCANDUMP - Fetch the chunk following `iterator` (start with 0)
    BfScanDumpCommand,
    "BF.SCANDUMP",
    ScanDumpChunk,
    reply::to_scan_dump_chunk
);

impl BfScanDumpCommand {
    /// Create a new BF.SCANDUMP command
    pub fn new(key: impl Into<String>, iterator: i64) -> RedisResult<Self> {
        Ok(Self {
            args: CommandArgs::new(key)?.arg(iterator),
        })
    }
}

keyed_command!(
    /// BF.LOADCHUNK - Restore a chunk produced by BF.SCANDUMP
    BfLoadChunkCommand,
    "BF.LOADCHUNK",
    bool,
    reply::to_ok
);

impl BfLoadChunkCommand {
    /// Create a new BF.LOADCHUNK command
    pub fn new(
        key: impl Into<String>,
        iterator: i64,
        data: impl Into<Bytes>,
    ) -> RedisResult<Self> {
        Ok(Self {
            args: CommandArgs::new(key)?
                .arg(iterator)
                .arg(RespValue::BulkString(data.into())),
        })
    }
}

keyed_command!(
    /// BF.INFO - Filter statistics
    BfInfoCommand,
    "BF.INFO",
    BloomInfo,
    reply::to_bloom_info
);

impl BfInfoCommand {
    /// Create a new BF.INFO command
    pub fn new(key: impl Into<String>) -> RedisResult<Self> {
        Ok(Self {
            args: CommandArgs::new(key)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::Command;

    fn strings(args: Vec<RespValue>) -> Vec<String> {
        args.iter().map(|a| a.as_string().unwrap()).collect()
    }

    #[test]
    fn test_bf_add_command() {
        let cmd = BfAddCommand::new("filter", 12).unwrap();
        assert_eq!(cmd.command_name(), "BF.ADD");
        assert_eq!(cmd.keys(), vec![b"filter"]);
        assert_eq!(strings(cmd.args()), vec!["filter", "12"]);
        assert!(cmd.parse_response(RespValue::Integer(1)).unwrap());
        assert!(!cmd.parse_response(RespValue::Integer(0)).unwrap());
    }

    #[test]
    fn test_bf_add_float_item() {
        let cmd = BfAddCommand::new("filter", 7.01).unwrap();
        assert_eq!(strings(cmd.args()), vec!["filter", "7.01"]);
    }

    #[test]
    fn test_bf_add_rejects_non_scalar_items() {
        assert!(BfAddCommand::new("filter", true)
            .unwrap_err()
            .is_invalid_argument());
        assert!(BfAddCommand::new("filter", false)
            .unwrap_err()
            .is_invalid_argument());
        let array = RedisValue::from(vec![RedisValue::from(1), RedisValue::from(2)]);
        assert!(BfAddCommand::new("filter", array)
            .unwrap_err()
            .is_invalid_argument());
    }

    #[test]
    fn test_bf_reserve_command() {
        let options = BfReserveOptions::new().with_expansion(4);
        let cmd = BfReserveCommand::new("filter", 0.1, 50, options).unwrap();
        assert_eq!(cmd.command_name(), "BF.RESERVE");
        assert_eq!(
            strings(cmd.args()),
            vec!["filter", "0.1", "50", "EXPANSION", "4"]
        );
        assert!(cmd
            .parse_response(RespValue::SimpleString("OK".to_string()))
            .unwrap());
    }

    #[test]
    fn test_bf_reserve_bounds() {
        let options = BfReserveOptions::new();
        assert!(BfReserveCommand::new("f", 0.01, 0, options).is_err());
        assert!(BfReserveCommand::new("", 0.01, 100, options).is_err());
        let non_scaling = options.with_non_scaling(true);
        assert!(BfReserveCommand::new("f", 0.001, 10_000_000, non_scaling).is_ok());
    }

    #[test]
    fn test_bf_reserve_forwards_error_rate_to_server() {
        // Out-of-range rates are the server's to reject
        for rate in [0.0, 1.0] {
            let cmd = BfReserveCommand::new("f", rate, 100, BfReserveOptions::new()).unwrap();
            assert_eq!(strings(cmd.args())[1], rate.to_string());
        }
    }

    #[test]
    fn test_bf_insert_command() {
        let options = BfInsertOptions::new().with_capacity(100).with_error_rate(0.01);
        let cmd = BfInsertCommand::new("filter", [6, 7], options).unwrap();
        assert_eq!(
            strings(cmd.args()),
            vec!["filter", "CAPACITY", "100", "ERROR", "0.01", "ITEMS", "6", "7"]
        );
    }

    #[test]
    fn test_bf_insert_requires_items() {
        let err = BfInsertCommand::new("filter", Vec::<i64>::new(), BfInsertOptions::new())
            .unwrap_err();
        assert!(err.is_invalid_argument());
    }

    #[test]
    fn test_bf_madd_and_mexists() {
        let cmd = BfMAddCommand::new("filter", 2..=5).unwrap();
        assert_eq!(strings(cmd.args()), vec!["filter", "2", "3", "4", "5"]);
        let reply = RespValue::Array(vec![RespValue::Integer(1), RespValue::Integer(0)]);
        assert_eq!(cmd.parse_response(reply).unwrap(), vec![true, false]);

        let cmd = BfMExistsCommand::new("filter", ["a", "b"]).unwrap();
        assert_eq!(cmd.command_name(), "BF.MEXISTS");
        assert!(BfMExistsCommand::new("filter", Vec::<String>::new()).is_err());
    }

    #[test]
    fn test_bf_scandump_and_loadchunk() {
        let cmd = BfScanDumpCommand::new("filter", 0).unwrap();
        assert_eq!(strings(cmd.args()), vec!["filter", "0"]);
        let chunk = cmd
            .parse_response(RespValue::Array(vec![
                RespValue::Integer(1),
                RespValue::BulkString(Bytes::from_static(b"\x01")),
            ]))
            .unwrap();
        assert_eq!(chunk.iterator, 1);

        let cmd = BfLoadChunkCommand::new("copy", chunk.iterator, chunk.data).unwrap();
        let args = cmd.args();
        assert_eq!(args.len(), 3);
        assert_eq!(args[2], RespValue::BulkString(Bytes::from_static(b"\x01")));
    }

    #[test]
    fn test_bf_info_command() {
        let cmd = BfInfoCommand::new("filter").unwrap();
        assert_eq!(cmd.command_name(), "BF.INFO");
        assert_eq!(strings(cmd.args()), vec!["filter"]);
    }
}
