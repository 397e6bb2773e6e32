use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Output bound must be positive")]
    ZeroOutputBound,
    #[error("Fetch quota {fetch_quota} must exceed output bound {output_bound}")]
    FetchQuotaTooSmall {
        fetch_quota: usize,
        output_bound: usize,
    },
    #[error("Bucket width must be positive, got {0}")]
    InvalidBucketWidth(i64),
    #[error("Result cache capacity must be positive")]
    ZeroCacheCapacity,
}

// Serializable, comparable, explicit defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LadderConfig {
    /// Maximum number of problems in a ladder.
    pub output_bound: usize,
    /// Candidates requested from the problem store; the slack over
    /// `output_bound` absorbs duplicates removed later.
    pub fetch_quota: usize,
    /// Width of a cacheable rating bucket.
    pub bucket_width: i64,
}

impl LadderConfig {
    pub fn v0() -> Self {
        Self {
            output_bound: 100,
            fetch_quota: 120,
            bucket_width: 100,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.output_bound == 0 {
            return Err(ConfigError::ZeroOutputBound);
        }
        if self.fetch_quota <= self.output_bound {
            return Err(ConfigError::FetchQuotaTooSmall {
                fetch_quota: self.fetch_quota,
                output_bound: self.output_bound,
            });
        }
        if self.bucket_width <= 0 {
            return Err(ConfigError::InvalidBucketWidth(self.bucket_width));
        }
        Ok(())
    }
}

impl Default for LadderConfig {
    fn default() -> Self {
        Self::v0()
    }
}

/// Policy of the bundled in-memory result cache.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResultCacheConfig {
    /// Entries older than this read as misses. `None` keeps them forever.
    pub ttl_seconds: Option<u64>,
    pub max_entries: usize,
}

impl ResultCacheConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_entries == 0 {
            return Err(ConfigError::ZeroCacheCapacity);
        }
        Ok(())
    }
}

impl Default for ResultCacheConfig {
    fn default() -> Self {
        Self {
            ttl_seconds: None,
            max_entries: 1024,
        }
    }
}
