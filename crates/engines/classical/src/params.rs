//! Search parameters and engine configuration.
//!
//! Both load from TOML; every field has a default so a config file only
//! needs to name what it changes:
//!
//! ```toml
//! hash_buckets_log2 = 18
//!
//! [search]
//! max_depth = 8
//! use_null_move = false
//! time_budget_ms = 5000
//! ```

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

/// Deepest iteration the driver will start.
pub const MAX_DEPTH: u8 = 64;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("hash_buckets_log2 must be between {min} and {max}, got {value}")]
    HashSize { value: u32, min: u32, max: u32 },
}

/// Per-search knobs. Each pruning or ordering technique can be switched off
/// on its own, which is how the tests compare results with and without it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SearchParameters {
    pub max_depth: u8,
    pub use_quiescence: bool,
    pub use_null_move: bool,
    pub use_late_move_reduction: bool,
    pub use_transposition_table: bool,
    pub use_killer_moves: bool,
    pub use_history_heuristic: bool,
    /// Wall-clock budget for the whole search, in milliseconds.
    pub time_budget_ms: Option<u64>,
}

impl Default for SearchParameters {
    fn default() -> Self {
        Self {
            max_depth: 5,
            use_quiescence: true,
            use_null_move: true,
            use_late_move_reduction: true,
            use_transposition_table: true,
            use_killer_moves: true,
            use_history_heuristic: true,
            time_budget_ms: None,
        }
    }
}

impl SearchParameters {
    /// Defaults with a fixed depth.
    pub fn with_depth(depth: u8) -> Self {
        Self {
            max_depth: depth,
            ..Self::default()
        }
    }

    /// Plain alpha-beta: every optional technique off.
    pub fn plain(depth: u8) -> Self {
        Self {
            max_depth: depth,
            use_quiescence: false,
            use_null_move: false,
            use_late_move_reduction: false,
            use_transposition_table: false,
            use_killer_moves: false,
            use_history_heuristic: false,
            time_budget_ms: None,
        }
    }

    /// Deep iterative search bounded by the clock.
    pub fn with_time_limit(budget: Duration) -> Self {
        Self {
            max_depth: MAX_DEPTH,
            time_budget_ms: Some(budget.as_millis() as u64),
            ..Self::default()
        }
    }

    pub fn time_budget(&self) -> Option<Duration> {
        self.time_budget_ms.map(Duration::from_millis)
    }

    /// Depth actually searched: at least one ply, at most [`MAX_DEPTH`].
    pub fn target_depth(&self) -> u8 {
        self.max_depth.clamp(1, MAX_DEPTH)
    }
}

/// Engine-wide settings: table sizes plus the default search parameters.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Main transposition table holds `2^hash_buckets_log2` buckets.
    pub hash_buckets_log2: u32,
    pub search: SearchParameters,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            hash_buckets_log2: 18,
            search: SearchParameters::default(),
        }
    }
}

impl EngineConfig {
    pub const MIN_HASH_BUCKETS_LOG2: u32 = 8;
    pub const MAX_HASH_BUCKETS_LOG2: u32 = 26;

    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let range = Self::MIN_HASH_BUCKETS_LOG2..=Self::MAX_HASH_BUCKETS_LOG2;
        if !range.contains(&self.hash_buckets_log2) {
            return Err(ConfigError::HashSize {
                value: self.hash_buckets_log2,
                min: Self::MIN_HASH_BUCKETS_LOG2,
                max: Self::MAX_HASH_BUCKETS_LOG2,
            });
        }
        Ok(())
    }

    /// Largest bucket exponent whose main table fits in `megabytes`.
    pub fn buckets_log2_for_megabytes(megabytes: usize) -> u32 {
        let bytes = megabytes.max(1) * 1024 * 1024;
        let buckets = bytes / crate::tt::BUCKET_BYTES;
        let log2 = usize::BITS - 1 - buckets.max(1).leading_zeros();
        log2.clamp(Self::MIN_HASH_BUCKETS_LOG2, Self::MAX_HASH_BUCKETS_LOG2)
    }
}

#[cfg(test)]
#[path = "params_tests.rs"]
mod params_tests;
