//! Engine configuration, read from TOML.
//!
//! ```toml
//! table = "buckets"        # "buckets", "map" or "none"
//! table_bits = 18          # 2^18 buckets of 4 slots
//! map_limit = 4000000      # entries before the map table wipes itself
//! min_depth = 4
//! max_depth = 32
//! time_budget_secs = 5.0
//! null_move = true
//! null_move_reduction = 2
//! pvs = true
//! ```
//!
//! Missing keys take their defaults.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use xiangqi_core::{MAX_SEARCH_DEPTH, SearchLimits};

use crate::search::SearchOptions;
use crate::tt::{BucketTable, MapTable, NoTable, TranspositionTable};

pub const MAX_TABLE_BITS: u8 = 28;

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),

    #[error("unknown option '{0}'")]
    UnknownOption(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TableKind {
    Buckets,
    Map,
    None,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    pub table: TableKind,
    pub table_bits: u8,
    pub map_limit: usize,
    pub min_depth: u8,
    pub max_depth: u8,
    pub time_budget_secs: f64,
    pub null_move: bool,
    pub null_move_reduction: u8,
    pub pvs: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            table: TableKind::Buckets,
            table_bits: 18,
            map_limit: 4_000_000,
            min_depth: 4,
            max_depth: MAX_SEARCH_DEPTH,
            time_budget_secs: 5.0,
            null_move: true,
            null_move_reduction: 2,
            pvs: true,
        }
    }
}

impl EngineConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=MAX_TABLE_BITS).contains(&self.table_bits) {
            return Err(ConfigError::Invalid(format!(
                "table_bits must be in 1..={MAX_TABLE_BITS}, got {}",
                self.table_bits
            )));
        }
        if self.map_limit == 0 {
            return Err(ConfigError::Invalid("map_limit must be positive".into()));
        }
        if self.min_depth == 0 || self.min_depth > self.max_depth {
            return Err(ConfigError::Invalid(format!(
                "need 1 <= min_depth <= max_depth, got {} and {}",
                self.min_depth, self.max_depth
            )));
        }
        if self.max_depth > MAX_SEARCH_DEPTH {
            return Err(ConfigError::Invalid(format!(
                "max_depth must be at most {MAX_SEARCH_DEPTH}, got {}",
                self.max_depth
            )));
        }
        if !self.time_budget_secs.is_finite() || self.time_budget_secs < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "time_budget_secs must be a non-negative number, got {}",
                self.time_budget_secs
            )));
        }
        Ok(())
    }

    /// Changes one setting by name, validating the result. On error the
    /// config is left unchanged.
    pub fn set(&mut self, name: &str, value: &str) -> Result<(), ConfigError> {
        fn parse<T: std::str::FromStr>(name: &str, value: &str) -> Result<T, ConfigError> {
            value
                .trim()
                .parse()
                .map_err(|_| ConfigError::Invalid(format!("bad value '{value}' for {name}")))
        }

        let mut next = self.clone();
        match name {
            "table" => {
                next.table = match value.trim() {
                    "buckets" => TableKind::Buckets,
                    "map" => TableKind::Map,
                    "none" => TableKind::None,
                    other => {
                        return Err(ConfigError::Invalid(format!("unknown table kind '{other}'")));
                    }
                }
            }
            "table_bits" => next.table_bits = parse(name, value)?,
            "map_limit" => next.map_limit = parse(name, value)?,
            "min_depth" => next.min_depth = parse(name, value)?,
            "max_depth" => next.max_depth = parse(name, value)?,
            "time_budget_secs" => next.time_budget_secs = parse(name, value)?,
            "null_move" => next.null_move = parse(name, value)?,
            "null_move_reduction" => next.null_move_reduction = parse(name, value)?,
            "pvs" => next.pvs = parse(name, value)?,
            _ => return Err(ConfigError::UnknownOption(name.to_string())),
        }
        next.validate()?;
        *self = next;
        Ok(())
    }

    pub fn time_budget(&self) -> Duration {
        Duration::try_from_secs_f64(self.time_budget_secs).unwrap_or(Duration::ZERO)
    }

    /// The limits a plain `search` uses: configured depths and time budget.
    pub fn limits(&self) -> SearchLimits {
        SearchLimits::depth_and_time(self.min_depth, self.max_depth, self.time_budget())
    }

    pub fn search_options(&self) -> SearchOptions {
        SearchOptions {
            null_move: self.null_move,
            null_move_reduction: self.null_move_reduction,
            pvs: self.pvs,
        }
    }

    pub fn build_table(&self) -> Box<dyn TranspositionTable> {
        match self.table {
            TableKind::Buckets => Box::new(BucketTable::new(self.table_bits)),
            TableKind::Map => Box::new(MapTable::new(self.map_limit)),
            TableKind::None => Box::new(NoTable),
        }
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod config_tests;
