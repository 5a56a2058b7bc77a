//! Optional parameters of the reserve and insert commands
//!
//! Each option set is validated as a whole before it is flattened into
//! arguments, so incompatible combinations never reach the server.

use super::{check_positive, CommandArgs};
use redis_bloom_core::error::{RedisError, RedisResult};

/// Options for `BF.RESERVE`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BfReserveOptions {
    /// Growth factor of sub-filters (`EXPANSION`)
    pub expansion: Option<u32>,
    /// Refuse to grow once full (`NONSCALING`)
    pub non_scaling: bool,
}

impl BfReserveOptions {
    /// No options
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the expansion factor
    #[must_use]
    pub const fn with_expansion(mut self, expansion: u32) -> Self {
        self.expansion = Some(expansion);
        self
    }

    /// Set the non-scaling flag
    #[must_use]
    pub const fn with_non_scaling(mut self, non_scaling: bool) -> Self {
        self.non_scaling = non_scaling;
        self
    }

    pub(crate) fn validate(&self) -> RedisResult<()> {
        check_scaling(self.expansion, self.non_scaling)
    }

    pub(crate) fn apply(&self, args: CommandArgs) -> CommandArgs {
        args.option("EXPANSION", self.expansion)
            .flag("NONSCALING", self.non_scaling)
    }
}

/// Options for `BF.INSERT`
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BfInsertOptions {
    /// Capacity used if the filter is created (`CAPACITY`)
    pub capacity: Option<u64>,
    /// Error rate used if the filter is created (`ERROR`)
    pub error_rate: Option<f64>,
    /// Growth factor of sub-filters (`EXPANSION`)
    pub expansion: Option<u32>,
    /// Fail instead of creating a missing filter (`NOCREATE`)
    pub no_create: bool,
    /// Refuse to grow once full (`NONSCALING`)
    pub non_scaling: bool,
}

impl BfInsertOptions {
    /// No options
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the capacity
    #[must_use]
    pub const fn with_capacity(mut self, capacity: u64) -> Self {
        self.capacity = Some(capacity);
        self
    }

    /// Set the error rate
    #[must_use]
    pub const fn with_error_rate(mut self, error_rate: f64) -> Self {
        self.error_rate = Some(error_rate);
        self
    }

    /// Set the expansion factor
    #[must_use]
    pub const fn with_expansion(mut self, expansion: u32) -> Self {
        self.expansion = Some(expansion);
        self
    }

    /// Set the no-create flag
    #[must_use]
    pub const fn with_no_create(mut self, no_create: bool) -> Self {
        self.no_create = no_create;
        self
    }

    /// Set the non-scaling flag
    #[must_use]
    pub const fn with_non_scaling(mut self, non_scaling: bool) -> Self {
        self.non_scaling = non_scaling;
        self
    }

    pub(crate) fn validate(&self) -> RedisResult<()> {
        if let Some(capacity) = self.capacity {
            check_positive("capacity", capacity)?;
        }
        if self.no_create && (self.capacity.is_some() || self.error_rate.is_some()) {
            return Err(RedisError::InvalidArgument(
                "NOCREATE cannot be combined with CAPACITY or ERROR".to_string(),
            ));
        }
        check_scaling(self.expansion, self.non_scaling)
    }

    pub(crate) fn apply(&self, args: CommandArgs) -> CommandArgs {
        args.option("CAPACITY", self.capacity)
            .option("ERROR", self.error_rate)
            .option("EXPANSION", self.expansion)
            .flag("NOCREATE", self.no_create)
            .flag("NONSCALING", self.non_scaling)
    }
}

/// Options for `CF.RESERVE`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CfReserveOptions {
    /// Items per bucket (`BUCKETSIZE`)
    pub bucket_size: Option<u32>,
    /// Swap attempts before declaring the filter full (`MAXITERATIONS`)
    pub max_iterations: Option<u32>,
    /// Growth factor of sub-filters (`EXPANSION`)
    pub expansion: Option<u32>,
}

impl CfReserveOptions {
    /// No options
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the bucket size
    #[must_use]
    pub const fn with_bucket_size(mut self, bucket_size: u32) -> Self {
        self.bucket_size = Some(bucket_size);
        self
    }

    /// Set the maximum number of iterations
    #[must_use]
    pub const fn with_max_iterations(mut self, max_iterations: u32) -> Self {
        self.max_iterations = Some(max_iterations);
        self
    }

    /// Set the expansion factor
    #[must_use]
    pub const fn with_expansion(mut self, expansion: u32) -> Self {
        self.expansion = Some(expansion);
        self
    }

    pub(crate) fn validate(&self) -> RedisResult<()> {
        if let Some(bucket_size) = self.bucket_size {
            check_positive("bucket size", bucket_size)?;
        }
        if let Some(max_iterations) = self.max_iterations {
            check_positive("max iterations", max_iterations)?;
        }
        Ok(())
    }

    pub(crate) fn apply(&self, args: CommandArgs) -> CommandArgs {
        args.option("BUCKETSIZE", self.bucket_size)
            .option("MAXITERATIONS", self.max_iterations)
            .option("EXPANSION", self.expansion)
    }
}

/// Options for `CF.INSERT` and `CF.INSERTNX`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CfInsertOptions {
    /// Capacity used if the filter is created (`CAPACITY`)
    pub capacity: Option<u64>,
    /// Fail instead of creating a missing filter (`NOCREATE`)
    pub no_create: bool,
}

impl CfInsertOptions {
    /// No options
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the capacity
    #[must_use]
    pub const fn with_capacity(mut self, capacity: u64) -> Self {
        self.capacity = Some(capacity);
        self
    }

    /// Set the no-create flag
    #[must_use]
    pub const fn with_no_create(mut self, no_create: bool) -> Self {
        self.no_create = no_create;
        self
    }

    pub(crate) fn validate(&self) -> RedisResult<()> {
        if let Some(capacity) = self.capacity {
            check_positive("capacity", capacity)?;
        }
        Ok(())
    }

    pub(crate) fn apply(&self, args: CommandArgs) -> CommandArgs {
        args.option("CAPACITY", self.capacity)
            .flag("NOCREATE", self.no_create)
    }
}

/// Sketch dimensions for `TOPK.RESERVE`; the server defaults apply when
/// omitted
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TopKDimensions {
    /// Counters per array
    pub width: u32,
    /// Number of arrays
    pub depth: u32,
    /// Probability of decaying a counter on collision, in (0, 1]
    pub decay: f64,
}

impl TopKDimensions {
    /// Create a dimension set
    #[must_use]
    pub const fn new(width: u32, depth: u32, decay: f64) -> Self {
        Self {
            width,
            depth,
            decay,
        }
    }

    pub(crate) fn validate(&self) -> RedisResult<()> {
        check_positive("width", self.width)?;
        check_positive("depth", self.depth)?;
        if self.decay > 0.0 && self.decay <= 1.0 {
            Ok(())
        } else {
            Err(RedisError::InvalidArgument(format!(
                "decay must be in (0, 1], got {}",
                self.decay
            )))
        }
    }

    pub(crate) fn apply(&self, args: CommandArgs) -> CommandArgs {
        args.arg(self.width).arg(self.depth).arg(self.decay)
    }
}

fn check_scaling(expansion: Option<u32>, non_scaling: bool) -> RedisResult<()> {
    if expansion.is_some() && non_scaling {
        return Err(RedisError::InvalidArgument(
            "EXPANSION and NONSCALING cannot be combined".to_string(),
        ));
    }
    if let Some(expansion) = expansion {
        check_positive("expansion", expansion)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use redis_bloom_core::value::RespValue;

    fn flatten(args: CommandArgs) -> Vec<RespValue> {
        args.to_vec().into_iter().skip(1).collect()
    }

    #[test]
    fn test_expansion_and_non_scaling_are_exclusive() {
        for expansion in [1, 4, 41] {
            let options = BfReserveOptions::new()
                .with_expansion(expansion)
                .with_non_scaling(true);
            assert!(options.validate().unwrap_err().is_invalid_argument());

            let options = BfInsertOptions::new()
                .with_expansion(expansion)
                .with_non_scaling(true);
            assert!(options.validate().unwrap_err().is_invalid_argument());
        }
    }

    #[test]
    fn test_non_scaling_false_is_omitted() {
        let options = BfReserveOptions::new().with_non_scaling(false);
        assert!(options.validate().is_ok());
        assert!(flatten(options.apply(CommandArgs::new("k").unwrap())).is_empty());
    }

    #[test]
    fn test_reserve_tokens() {
        let options = BfReserveOptions::new().with_non_scaling(true);
        assert_eq!(
            flatten(options.apply(CommandArgs::new("k").unwrap())),
            vec![RespValue::from("NONSCALING")]
        );

        let options = BfReserveOptions::new().with_expansion(4);
        assert_eq!(
            flatten(options.apply(CommandArgs::new("k").unwrap())),
            vec![RespValue::from("EXPANSION"), RespValue::from("4")]
        );
    }

    #[test]
    fn test_zero_expansion_rejected() {
        assert!(BfReserveOptions::new().with_expansion(0).validate().is_err());
    }

    #[test]
    fn test_insert_bounds() {
        assert!(BfInsertOptions::new().with_capacity(0).validate().is_err());
        // ERROR is range-checked by the server
        assert!(BfInsertOptions::new().with_error_rate(1.0).validate().is_ok());
        assert!(BfInsertOptions::new()
            .with_capacity(100)
            .with_error_rate(0.01)
            .validate()
            .is_ok());
    }

    #[test]
    fn test_no_create_excludes_creation_params() {
        let options = BfInsertOptions::new().with_no_create(true).with_capacity(10);
        assert!(options.validate().unwrap_err().is_invalid_argument());
        assert!(BfInsertOptions::new().with_no_create(true).validate().is_ok());
    }

    #[test]
    fn test_cuckoo_reserve_tokens() {
        let options = CfReserveOptions::new()
            .with_bucket_size(4)
            .with_max_iterations(20)
            .with_expansion(2);
        assert!(options.validate().is_ok());
        assert_eq!(
            flatten(options.apply(CommandArgs::new("k").unwrap())),
            vec![
                RespValue::from("BUCKETSIZE"),
                RespValue::from("4"),
                RespValue::from("MAXITERATIONS"),
                RespValue::from("20"),
                RespValue::from("EXPANSION"),
                RespValue::from("2"),
            ]
        );
        assert!(CfReserveOptions::new().with_bucket_size(0).validate().is_err());
    }

    #[test]
    fn test_top_k_dimensions() {
        assert!(TopKDimensions::new(50, 4, 0.9).validate().is_ok());
        assert!(TopKDimensions::new(50, 4, 1.0).validate().is_ok());
        assert!(TopKDimensions::new(50, 4, 0.0).validate().is_err());
        assert!(TopKDimensions::new(0, 4, 0.9).validate().is_err());
    }
}
