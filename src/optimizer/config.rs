//! Optimizer switches.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config file '{path}': {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizerConfig {
    /// Run cost-based analysis; when off every filter takes the fallback path
    pub cbo_enabled: bool,
    /// Split out partition-pruning predicates before estimating
    pub partition_pruning: bool,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            cbo_enabled: true,
            partition_pruning: true,
        }
    }
}

impl OptimizerConfig {
    /// Load from a TOML file; a missing file yields the defaults
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        match fs::read_to_string(path) {
            Ok(contents) => toml::from_str(&contents).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(ConfigError::Io(e)),
        }
    }
}
