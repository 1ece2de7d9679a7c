//! Processor configuration
//!
//! Settings can be built in code or loaded from a TOML file:
//!
//! ```toml
//! sample_days = 14
//! synthesize = false
//! seed = 42
//! ```

use crate::error::ComputeError;
use crate::sample::DEFAULT_SAMPLE_DAYS;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Settings for [`crate::pipeline::CardioProcessor`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessorConfig {
    /// Days of sample data used when an export is replaced by synthetic data
    pub sample_days: usize,
    /// Allow synthesized backfill and fallback data
    pub synthesize: bool,
    /// Seed for the sample generator; OS entropy when absent
    pub seed: Option<u64>,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            sample_days: DEFAULT_SAMPLE_DAYS,
            synthesize: true,
            seed: None,
        }
    }
}

impl ProcessorConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, ComputeError> {
        toml::from_str(s).map_err(|e| ComputeError::ConfigError(e.to_string()))
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ComputeError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            ComputeError::ConfigError(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::from_toml_str(&content)
    }
}
