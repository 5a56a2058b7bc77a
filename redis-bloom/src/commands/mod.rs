//! Command builders for RedisBloom operations
//!
//! Every builder validates its inputs in `new`, so a constructed command
//! always carries a well-formed argument list. Nothing here performs I/O.

use redis_bloom_core::{
    error::{RedisError, RedisResult},
    types::RedisValue,
    value::RespValue,
};

/// Declares a single-key command struct over [`CommandArgs`] and implements
/// [`Command`] for it with the given reply decoder.
macro_rules! keyed_command {
    ($(#[$meta:meta])* $name:ident, $cmd:literal, $output:ty, $decode:path) => {
        $(#[$meta])*
        #[derive(Debug, Clone)]
        pub struct $name {
            args: $crate::commands::CommandArgs,
        }

        impl $crate::commands::Command for $name {
            type Output = $output;

            fn command_name(&self) -> &str {
                $cmd
            }

            fn args(&self) -> Vec<RespValue> {
                self.args.to_vec()
            }

            fn parse_response(&self, response: RespValue) -> RedisResult<Self::Output> {
                $decode(response)
            }

            fn keys(&self) -> Vec<&[u8]> {
                vec![self.args.key().as_bytes()]
            }
        }
    };
}

pub mod bloom;
pub mod count_min_sketch;
pub mod cuckoo;
pub mod options;
pub mod top_k;

pub use bloom::{
    BfAddCommand, BfExistsCommand, BfInfoCommand, BfInsertCommand, BfLoadChunkCommand,
    BfMAddCommand, BfMExistsCommand, BfReserveCommand, BfScanDumpCommand,
};
pub use count_min_sketch::{
    CmsIncrByCommand, CmsInfoCommand, CmsInitByDimCommand, CmsInitByProbCommand,
    CmsMergeCommand, CmsQueryCommand,
};
pub use cuckoo::{
    CfAddCommand, CfAddNxCommand, CfCountCommand, CfDelCommand, CfExistsCommand, CfInfoCommand,
    CfInsertCommand, CfInsertNxCommand, CfLoadChunkCommand, CfMExistsCommand, CfReserveCommand,
    CfScanDumpCommand,
};
pub use options::{
    BfInsertOptions, BfReserveOptions, CfInsertOptions, CfReserveOptions, TopKDimensions,
};
pub use top_k::{
    TopKAddCommand, TopKCountCommand, TopKIncrByCommand, TopKInfoCommand, TopKListCommand,
    TopKListWithCountCommand, TopKQueryCommand, TopKReserveCommand,
};

/// Trait for commands that can be executed
pub trait Command {
    /// The return type of the command
    type Output;

    /// Get the command name
    fn command_name(&self) -> &str;

    /// Get the command arguments, key first
    fn args(&self) -> Vec<RespValue>;

    /// Parse the response into the output type
    fn parse_response(&self, response: RespValue) -> RedisResult<Self::Output>;

    /// Get the key(s) involved in this command
    fn keys(&self) -> Vec<&[u8]>;
}

/// Argument list of a command addressing one key
#[derive(Debug, Clone)]
pub(crate) struct CommandArgs {
    key: String,
    rest: Vec<RespValue>,
}

impl CommandArgs {
    pub(crate) fn new(key: impl Into<String>) -> RedisResult<Self> {
        Ok(Self {
            key: validate_key(key.into())?,
            rest: Vec::new(),
        })
    }

    pub(crate) fn key(&self) -> &str {
        &self.key
    }

    #[must_use]
    pub(crate) fn arg(mut self, value: impl Into<RespValue>) -> Self {
        self.rest.push(value.into());
        self
    }

    pub(crate) fn item(self, item: impl Into<RedisValue>) -> RedisResult<Self> {
        Ok(self.arg(item.into().into_item()?))
    }

    /// Append a non-empty list of items
    pub(crate) fn items<I, T>(mut self, items: I) -> RedisResult<Self>
    where
        I: IntoIterator<Item = T>,
        T: Into<RedisValue>,
    {
        let start = self.rest.len();
        for item in items {
            self.rest.push(item.into().into_item()?);
        }
        if self.rest.len() == start {
            return Err(RedisError::InvalidArgument(
                "at least one item is required".to_string(),
            ));
        }
        Ok(self)
    }

    #[must_use]
    pub(crate) fn flag(self, token: &'static str, enabled: bool) -> Self {
        if enabled {
            self.arg(token)
        } else {
            self
        }
    }

    #[must_use]
    pub(crate) fn option<V: Into<RespValue>>(self, token: &'static str, value: Option<V>) -> Self {
        match value {
            Some(value) => self.arg(token).arg(value),
            None => self,
        }
    }

    pub(crate) fn to_vec(&self) -> Vec<RespValue> {
        let mut args = Vec::with_capacity(1 + self.rest.len());
        args.push(RespValue::from(self.key.as_str()));
        args.extend(self.rest.iter().cloned());
        args
    }
}

pub(crate) fn validate_key(key: String) -> RedisResult<String> {
    if key.is_empty() {
        return Err(RedisError::InvalidArgument(
            "key name must not be empty".to_string(),
        ));
    }
    Ok(key)
}

/// A rate or probability, strictly between 0 and 1
pub(crate) fn check_rate(name: &str, value: f64) -> RedisResult<f64> {
    if value > 0.0 && value < 1.0 {
        Ok(value)
    } else {
        Err(RedisError::InvalidArgument(format!(
            "{} must be between 0 and 1 exclusive, got {}",
            name, value
        )))
    }
}

pub(crate) fn check_positive<T>(name: &str, value: T) -> RedisResult<T>
where
    T: Copy + Default + PartialOrd + std::fmt::Display,
{
    if value > T::default() {
        Ok(value)
    } else {
        Err(RedisError::InvalidArgument(format!(
            "{} must be greater than 0, got {}",
            name, value
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_args_layout() {
        let args = CommandArgs::new("filter")
            .unwrap()
            .option("CAPACITY", Some(100_u64))
            .option::<u32>("EXPANSION", None)
            .flag("NOCREATE", true)
            .flag("NONSCALING", false)
            .arg("ITEMS")
            .items(["a", "b"])
            .unwrap();
        assert_eq!(
            args.to_vec(),
            vec![
                RespValue::from("filter"),
                RespValue::from("CAPACITY"),
                RespValue::from("100"),
                RespValue::from("NOCREATE"),
                RespValue::from("ITEMS"),
                RespValue::from("a"),
                RespValue::from("b"),
            ]
        );
    }

    #[test]
    fn test_empty_key_rejected() {
        assert!(CommandArgs::new("").unwrap_err().is_invalid_argument());
    }

    #[test]
    fn test_empty_item_list_rejected() {
        let err = CommandArgs::new("k")
            .unwrap()
            .items(Vec::<RedisValue>::new())
            .unwrap_err();
        assert!(err.is_invalid_argument());
    }

    #[test]
    fn test_rate_bounds() {
        assert!(check_rate("error rate", 0.01).is_ok());
        assert!(check_rate("error rate", 0.0).is_err());
        assert!(check_rate("error rate", 1.0).is_err());
        assert!(check_rate("error rate", f64::NAN).is_err());
    }

    #[test]
    fn test_positive_bounds() {
        assert_eq!(check_positive("capacity", 10_u64).unwrap(), 10);
        assert!(check_positive("capacity", 0_u64).is_err());
    }
}
