//! Count-Min Sketch commands (`CMS.*`)

use super::{check_positive, check_rate, validate_key, Command, CommandArgs};
use crate::reply;
use redis_bloom_core::{
    error::{RedisError, RedisResult},
    types::{CountMinSketchInfo, RedisValue},
    value::RespValue,
};

keyed_command!(
    /// CMS.INITBYDIM - Create a sketch of `width` counters by `depth` rows
    CmsInitByDimCommand,
    "CMS.INITBYDIM",
    bool,
    reply::to_ok
);

impl CmsInitByDimCommand {
    /// Create a new CMS.INITBYDIM command
    pub fn new(key: impl Into<String>, width: u64, depth: u64) -> RedisResult<Self> {
        check_positive("width", width)?;
        check_positive("depth", depth)?;
        Ok(Self {
            args: CommandArgs::new(key)?.arg(width).arg(depth),
        })
    }
}

keyed_command!(
    /// CMS.INITBYPROB - Create a sketch sized for an error bound and
    /// probability of exceeding it
    CmsInitByProbCommand,
    "CMS.INITBYPROB",
    bool,
    reply::to_ok
);

impl CmsInitByProbCommand {
    /// Create a new CMS.INITBYPROB command
    pub fn new(key: impl Into<String>, error: f64, probability: f64) -> RedisResult<Self> {
        check_rate("error", error)?;
        check_rate("probability", probability)?;
        Ok(Self {
            args: CommandArgs::new(key)?.arg(error).arg(probability),
        })
    }
}

keyed_command!(
    /// CMS.INCRBY - Increase the count of items; replies with the updated
    /// count of each item
    CmsIncrByCommand,
    "CMS.INCRBY",
    Vec<i64>,
    reply::to_int_array
);

impl CmsIncrByCommand {
    /// Create a new CMS.INCRBY command from `(item, increment)` pairs
    pub fn new<I, T>(key: impl Into<String>, increments: I) -> RedisResult<Self>
    where
        I: IntoIterator<Item = (T, i64)>,
        T: Into<RedisValue>,
    {
        let mut args = CommandArgs::new(key)?;
        let mut pairs = 0_usize;
        for (item, increment) in increments {
            args = args.item(item)?.arg(increment);
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
    /// CMS.QUERY - Estimated count of each item
    CmsQueryCommand,
    "CMS.QUERY",
    Vec<i64>,
    reply::to_int_array
);

impl CmsQueryCommand {
    /// Create a new CMS.QUERY command
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
    /// CMS.INFO - Sketch dimensions and total count
    CmsInfoCommand,
    "CMS.INFO",
    CountMinSketchInfo,
    reply::to_count_min_sketch_info
);

impl CmsInfoCommand {
    /// Create a new CMS.INFO command
    pub fn new(key: impl Into<String>) -> RedisResult<Self> {
        Ok(Self {
            args: CommandArgs::new(key)?,
        })
    }
}

/// CMS.MERGE - Merge several sketches of identical dimensions into
/// `destination`, optionally weighting each source
#[derive(Debug, Clone)]
pub struct CmsMergeCommand {
    destination: String,
    sources: Vec<String>,
    weights: Option<Vec<i64>>,
}

impl CmsMergeCommand {
    /// Create a new CMS.MERGE command
    ///
    /// When `weights` is given it must hold one weight per source.
    pub fn new(
        destination: impl Into<String>,
        sources: Vec<String>,
        weights: Option<Vec<i64>>,
    ) -> RedisResult<Self> {
        let destination = validate_key(destination.into())?;
        if sources.is_empty() {
            return Err(RedisError::InvalidArgument(
                "at least one source sketch is required".to_string(),
            ));
        }
        let sources = sources
            .into_iter()
            .map(validate_key)
            .collect::<RedisResult<Vec<_>>>()?;
        if let Some(ref weights) = weights {
            if weights.len() != sources.len() {
                return Err(RedisError::InvalidArgument(format!(
                    "expected {} weights, got {}",
                    sources.len(),
                    weights.len()
                )));
            }
        }
        Ok(Self {
            destination,
            sources,
            weights,
        })
    }
}

impl Command for CmsMergeCommand {
    type Output = bool;

    fn command_name(&self) -> &str {
        "CMS.MERGE"
    }

    fn args(&self) -> Vec<RespValue> {
        let mut args = vec![
            RespValue::from(self.destination.as_str()),
            RespValue::from(self.sources.len() as u64),
        ];
        args.extend(self.sources.iter().map(|s| RespValue::from(s.as_str())));
        if let Some(ref weights) = self.weights {
            args.push(RespValue::from("WEIGHTS"));
            args.extend(weights.iter().map(|w| RespValue::from(*w)));
        }
        args
    }

    fn parse_response(&self, response: RespValue) -> RedisResult<Self::Output> {
        reply::to_ok(response)
    }

    fn keys(&self) -> Vec<&[u8]> {
        std::iter::once(&self.destination)
            .chain(self.sources.iter())
            .map(String::as_bytes)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(args: Vec<RespValue>) -> Vec<String> {
        args.iter().map(|a| a.as_string().unwrap()).collect()
    }

    #[test]
    fn test_cms_init_commands() {
        let cmd = CmsInitByDimCommand::new("sketch", 100, 4).unwrap();
        assert_eq!(cmd.command_name(), "CMS.INITBYDIM");
        assert_eq!(strings(cmd.args()), vec!["sketch", "100", "4"]);
        assert!(CmsInitByDimCommand::new("sketch", 0, 4).is_err());

        let cmd = CmsInitByProbCommand::new("sketch", 0.001, 0.01).unwrap();
        assert_eq!(strings(cmd.args()), vec!["sketch", "0.001", "0.01"]);
        assert!(CmsInitByProbCommand::new("sketch", 1.5, 0.01).is_err());
    }

    #[test]
    fn test_cms_incrby_pairs() {
        let cmd =
            CmsIncrByCommand::new("sketch", [("green", 40), ("black", 90), ("orange", 6)]).unwrap();
        assert_eq!(
            strings(cmd.args()),
            vec!["sketch", "green", "40", "black", "90", "orange", "6"]
        );
        let reply = RespValue::Array(vec![
            RespValue::Integer(40),
            RespValue::Integer(90),
            RespValue::Integer(6),
        ]);
        assert_eq!(cmd.parse_response(reply).unwrap(), vec![40, 90, 6]);
    }

    #[test]
    fn test_cms_incrby_numeric_items() {
        let cmd = CmsIncrByCommand::new(
            "sketch",
            vec![(RedisValue::from(12), 31), (RedisValue::from(13.4), 32)],
        )
        .unwrap();
        assert_eq!(strings(cmd.args()), vec!["sketch", "12", "31", "13.4", "32"]);
    }

    #[test]
    fn test_cms_incrby_validation() {
        assert!(CmsIncrByCommand::new("sketch", [(true, 44)])
            .unwrap_err()
            .is_invalid_argument());
        assert!(CmsIncrByCommand::new("sketch", Vec::<(&str, i64)>::new())
            .unwrap_err()
            .is_invalid_argument());
    }

    #[test]
    fn test_cms_merge_command() {
        let cmd = CmsMergeCommand::new(
            "dest",
            vec!["a".to_string(), "b".to_string()],
            Some(vec![1, 2]),
        )
        .unwrap();
        assert_eq!(
            strings(cmd.args()),
            vec!["dest", "2", "a", "b", "WEIGHTS", "1", "2"]
        );
        assert_eq!(cmd.keys().len(), 3);

        assert!(CmsMergeCommand::new("dest", vec![], None).is_err());
        assert!(CmsMergeCommand::new("dest", vec!["a".to_string()], Some(vec![1, 2])).is_err());
    }
}
