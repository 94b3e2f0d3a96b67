// Configuration for trout
//
// Loaded from an optional TOML file; every key has a default so an empty
// file (or no file at all) is a valid configuration. Command-line flags
// override whatever is loaded here.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Runtime configuration
///
/// # Example TOML
/// ```toml
/// store_path = "data/behaviors.json"
/// definitions_path = "conf/malicious_behaviors.txt"
/// insertion_probability = 0.05
/// multiple_behaviors = true
/// ignore_arguments = true
/// feature_delimiter = ","
/// log_file = "trout.log"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TroutConfig {
    /// Behavior store file
    pub store_path: PathBuf,

    /// Definitions used to seed an empty store
    pub definitions_path: PathBuf,

    /// Per-offset injection probability (0.0-1.0)
    pub insertion_probability: f64,

    /// Draw a fresh behavior for every insertion instead of one per trace
    pub multiple_behaviors: bool,

    /// Compare call names only when diffing
    pub ignore_arguments: bool,

    /// Separator for flat feature files
    pub feature_delimiter: String,

    /// Append log events to this file instead of stderr
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_file: Option<PathBuf>,
}

impl Default for TroutConfig {
    fn default() -> Self {
        Self {
            store_path: PathBuf::from("trout-behaviors.json"),
            definitions_path: PathBuf::from("malicious_behaviors.txt"),
            insertion_probability: 0.1,
            multiple_behaviors: false,
            ignore_arguments: true,
            feature_delimiter: ",".to_string(),
            log_file: None,
        }
    }
}

impl TroutConfig {
    /// Load configuration from a TOML file
    ///
    /// # Errors
    /// Returns error if the file can't be read, isn't valid TOML, or fails validation.
    pub fn from_toml<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self =
            toml::from_str(&content).with_context(|| "Failed to parse TOML configuration")?;

        config
            .validate()
            .map_err(|e| anyhow::anyhow!("Invalid configuration: {}", e))?;

        Ok(config)
    }

    /// Load from `path` if given, otherwise use defaults
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_toml(path),
            None => Ok(Self::default()),
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if !(0.0..=1.0).contains(&self.insertion_probability) {
            return Err(format!(
                "insertion_probability must be in [0, 1], got {}",
                self.insertion_probability
            ));
        }

        if self.feature_delimiter.is_empty() {
            return Err("feature_delimiter must not be empty".to_string());
        }

        Ok(())
    }
}
