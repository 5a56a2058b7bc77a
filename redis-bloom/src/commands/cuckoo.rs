//! Cuckoo filter commands (`CF.*`)

use super::options::{CfInsertOptions, CfReserveOptions};
use super::{check_positive, CommandArgs};
use crate::reply;
use bytes::Bytes;
use redis_bloom_core::{
    error::RedisResult,
    types::{CfInsertOutcome, CuckooInfo, RedisValue, ScanDumpChunk},
    value::RespValue,
};

keyed_command!(
    /// CF.RESERVE - Create an empty filter with a given capacity
    CfReserveCommand,
    "CF.RESERVE",
    bool,
    reply::to_ok
);

impl CfReserveCommand {
    /// Create a new CF.RESERVE command
    pub fn new(
        key: impl Into<String>,
        capacity: u64,
        options: CfReserveOptions,
    ) -> RedisResult<Self> {
        check_positive("capacity", capacity)?;
        options.validate()?;
        Ok(Self {
            args: options.apply(CommandArgs::new(key)?.arg(capacity)),
        })
    }
}

fn key_item(key: impl Into<String>, item: impl Into<RedisValue>) -> RedisResult<CommandArgs> {
    CommandArgs::new(key)?.item(item)
}

keyed_command!(
    /// CF.ADD - Add an item, creating the filter if needed; duplicates are
    /// stored again
    CfAddCommand,
    "CF.ADD",
    bool,
    reply::to_bool
);

impl CfAddCommand {
    /// Create a new CF.ADD command
    pub fn new(key: impl Into<String>, item: impl Into<RedisValue>) -> RedisResult<Self> {
        Ok(Self {
            args: key_item(key, item)?,
        })
    }
}

keyed_command!(
    /// CF.ADDNX - Add an item only if it is not already present
    CfAddNxCommand,
    "CF.ADDNX",
    bool,
    reply::to_bool
);

impl CfAddNxCommand {
    /// Create a new CF.ADDNX command
    pub fn new(key: impl Into<String>, item: impl Into<RedisValue>) -> RedisResult<Self> {
        Ok(Self {
            args: key_item(key, item)?,
        })
    }
}

fn insert_args<I, T>(
    key: impl Into<String>,
    items: I,
    options: CfInsertOptions,
) -> RedisResult<CommandArgs>
where
    I: IntoIterator<Item = T>,
    T: Into<RedisValue>,
{
    options.validate()?;
    options
        .apply(CommandArgs::new(key)?)
        .arg("ITEMS")
        .items(items)
}

keyed_command!(
    /// CF.INSERT - Add several items, creating the filter if needed; a
    /// full filter is reported per item
    CfInsertCommand,
    "CF.INSERT",
    Vec<CfInsertOutcome>,
    reply::to_cf_insert_outcomes
);

impl CfInsertCommand {
    /// Create a new CF.INSERT command
    pub fn new<I, T>(
        key: impl Into<String>,
        items: I,
        options: CfInsertOptions,
    ) -> RedisResult<Self>
    where
        I: IntoIterator<Item = T>,
        T: Into<RedisValue>,
    {
        Ok(Self {
            args: insert_args(key, items, options)?,
        })
    }
}

keyed_command!(
    /// CF.INSERTNX - Add several items, skipping those already present
    CfInsertNxCommand,
    "CF.INSERTNX",
    Vec<CfInsertOutcome>,
    reply::to_cf_insert_outcomes
);

impl CfInsertNxCommand {
    /// Create a new CF.INSERTNX command
    pub fn new<I, T>(
        key: impl Into<String>,
        items: I,
        options: CfInsertOptions,
    ) -> RedisResult<Self>
    where
        I: IntoIterator<Item = T>,
        T: Into<RedisValue>,
    {
        Ok(Self {
            args: insert_args(key, items, options)?,
        })
    }
}

keyed_command!(
    /// CF.EXISTS - Check whether an item may be in the filter
    CfExistsCommand,
    "CF.EXISTS",
    bool,
    reply::to_bool
);

impl CfExistsCommand {
    /// Create a new CF.EXISTS command
    pub fn new(key: impl Into<String>, item: impl Into<RedisValue>) -> RedisResult<Self> {
        Ok(Self {
            args: key_item(key, item)?,
        })
    }
}

keyed_command!(
    /// CF.MEXISTS - Check several items
    CfMExistsCommand,
    "CF.MEXISTS",
    Vec<bool>,
    reply::to_bool_array
);

impl CfMExistsCommand {
    /// Create a new CF.MEXISTS command
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
    /// CF.COUNT - Approximate number of times an item was added
    CfCountCommand,
    "CF.COUNT",
    i64,
    reply::to_int
);

impl CfCountCommand {
    /// Create a new CF.COUNT command
    pub fn new(key: impl Into<String>, item: impl Into<RedisValue>) -> RedisResult<Self> {
        Ok(Self {
            args: key_item(key, item)?,
        })
    }
}

keyed_command!(
    /// CF.DEL - Remove one occurrence of an item
    CfDelCommand,
    "CF.DEL",
    bool,
    reply::to_bool
);

impl CfDelCommand {
    /// Create a new CF.DEL command
    pub fn new(key: impl Into<String>, item: impl Into<RedisValue>) -> RedisResult<Self> {
        Ok(Self {
            args: key_item(key, item)?,
        })
    }
}

keyed_command!(
    /// CF.SCANDUMP - Fetch the chunk following `iterator` (start with 0)
    CfScanDumpCommand,
    "CF.SCANDUMP",
    ScanDumpChunk,
    reply::to_scan_dump_chunk
);

impl CfScanDumpCommand {
    /// Create a new CF.SCANDUMP command
    pub fn new(key: impl Into<String>, iterator: i64) -> RedisResult<Self> {
        Ok(Self {
            args: CommandArgs::new(key)?.arg(iterator),
        })
    }
}

keyed_command!(
    /// CF.LOADCHUNK - Restore a chunk produced by CF.SCANDUMP
    CfLoadChunkCommand,
    "CF.LOADCHUNK",
    bool,
    reply::to_ok
);

impl CfLoadChunkCommand {
    /// Create a new CF.LOADCHUNK command
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
    /// CF.INFO - Filter statistics
    CfInfoCommand,
    "CF.INFO",
    CuckooInfo,
    reply::to_cuckoo_info
);

impl CfInfoCommand {
    /// Create a new CF.INFO command
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
    fn test_cf_reserve_command() {
        let cmd = CfReserveCommand::new("cuckoo", 50, CfReserveOptions::new()).unwrap();
        assert_eq!(cmd.command_name(), "CF.RESERVE");
        assert_eq!(strings(cmd.args()), vec!["cuckoo", "50"]);
        assert!(CfReserveCommand::new("cuckoo", 0, CfReserveOptions::new()).is_err());
    }

    #[test]
    fn test_cf_item_commands() {
        assert_eq!(CfAddCommand::new("c", 1).unwrap().command_name(), "CF.ADD");
        assert_eq!(CfAddNxCommand::new("c", 1).unwrap().command_name(), "CF.ADDNX");
        assert_eq!(CfExistsCommand::new("c", 1).unwrap().command_name(), "CF.EXISTS");
        assert_eq!(CfDelCommand::new("c", 1).unwrap().command_name(), "CF.DEL");

        let cmd = CfCountCommand::new("c", "foo").unwrap();
        assert_eq!(strings(cmd.args()), vec!["c", "foo"]);
        assert_eq!(cmd.parse_response(RespValue::Integer(2)).unwrap(), 2);
    }

    #[test]
    fn test_cf_exists_rejects_invalid_items() {
        let nested = RedisValue::from(vec![RedisValue::from(vec![
            RedisValue::from(1),
            RedisValue::from(2),
        ])]);
        assert!(CfExistsCommand::new("c", nested).unwrap_err().is_invalid_argument());
        assert!(CfExistsCommand::new("c", true).unwrap_err().is_invalid_argument());
    }

    #[test]
    fn test_cf_insert_command() {
        let cmd = CfInsertCommand::new("c", [3, 4, 5], CfInsertOptions::new().with_capacity(100))
            .unwrap();
        assert_eq!(
            strings(cmd.args()),
            vec!["c", "CAPACITY", "100", "ITEMS", "3", "4", "5"]
        );

        let cmd = CfInsertNxCommand::new("c", ["foo"], CfInsertOptions::new().with_no_create(true))
            .unwrap();
        assert_eq!(cmd.command_name(), "CF.INSERTNX");
        assert_eq!(strings(cmd.args()), vec!["c", "NOCREATE", "ITEMS", "foo"]);
    }

    #[test]
    fn test_cf_insertnx_reports_full_filter() {
        let cmd = CfInsertNxCommand::new("c", ["a", "b", "c"], CfInsertOptions::new()).unwrap();
        let reply = RespValue::Array(vec![
            RespValue::Integer(1),
            RespValue::Integer(0),
            RespValue::Integer(-1),
        ]);
        assert_eq!(
            cmd.parse_response(reply).unwrap(),
            vec![
                CfInsertOutcome::Added,
                CfInsertOutcome::Exists,
                CfInsertOutcome::Full
            ]
        );

        let cmd = CfInsertCommand::new("c", ["a", "b"], CfInsertOptions::new()).unwrap();
        let reply = RespValue::Array(vec![RespValue::Integer(1), RespValue::Integer(-1)]);
        let outcomes = cmd.parse_response(reply).unwrap();
        assert!(outcomes[0].is_added());
        assert_eq!(outcomes[1], CfInsertOutcome::Full);
    }

    #[test]
    fn test_cf_insert_validation() {
        let empty: Vec<&str> = Vec::new();
        assert!(CfInsertCommand::new("c", empty, CfInsertOptions::new()).is_err());
        assert!(CfInsertCommand::new("c", [1], CfInsertOptions::new().with_capacity(0)).is_err());
        assert!(CfInsertCommand::new("c", [false], CfInsertOptions::new()).is_err());
    }

    #[test]
    fn test_cf_dump_commands() {
        let cmd = CfScanDumpCommand::new("c", 0).unwrap();
        assert_eq!(cmd.command_name(), "CF.SCANDUMP");
        let cmd = CfLoadChunkCommand::new("c", 1, Bytes::from_static(b"abc")).unwrap();
        assert_eq!(cmd.command_name(), "CF.LOADCHUNK");
        assert_eq!(cmd.args().len(), 3);
    }
}
