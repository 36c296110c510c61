//! YAML Configuration File Support for vibematch
//!
//! One YAML file configures the matcher (input range handling, the penalty
//! rule table and its floor, parallel scoring) and the command-line output.
//! Every section is optional; omitted fields take the library defaults.
//!
//! ## Example YAML Configuration
//!
//! ```yaml
//! # vibematch configuration
//! version: "1.0"
//! name: "shelf-night"
//! catalog: "data/demo_catalog.yaml"
//!
//! matcher:
//!   version: 1
//!   range_policy: clamp        # pass_through | clamp | reject
//!   penalty_floor: -0.15       # omit for an uncapped penalty sum
//!   use_parallel: true
//!   penalties:                 # omit for the standard five rules
//!     - label: "song too upbeat for melancholic book"
//!       penalty: -0.10
//!       book_dimension: melancholy
//!       book_above: 0.7
//!       signal: { source: audio, name: valence }
//!       bound: { op: above, value: 0.7 }
//!
//! output:
//!   top: 5
//!   pretty: true
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use matcher::{MatchConfig, PenaltyTable, RangePolicy};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur when loading YAML configuration files
#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("unsupported config version: {0}")]
    UnsupportedVersion(String),
}

/// Top-level YAML configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct VibeConfig {
    /// Configuration format version
    pub version: String,

    /// Optional configuration name/description
    #[serde(default)]
    pub name: Option<String>,

    /// Default catalog path, used when none is given on the command line
    #[serde(default)]
    pub catalog: Option<PathBuf>,

    /// Matcher configuration
    #[serde(default)]
    pub matcher: MatcherYamlConfig,

    /// Command-line output configuration
    #[serde(default)]
    pub output: OutputYamlConfig,
}

impl VibeConfig {
    /// Load a YAML configuration file from the given path
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigLoadError> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse YAML configuration from a string
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigLoadError> {
        let config: VibeConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigLoadError> {
        match self.version.as_str() {
            "1.0" | "1" => Ok(()),
            v => Err(ConfigLoadError::UnsupportedVersion(v.to_string())),
        }?;

        self.matcher.validate()?;
        self.output.validate()?;

        Ok(())
    }
}

impl Default for VibeConfig {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            name: None,
            catalog: None,
            matcher: MatcherYamlConfig::default(),
            output: OutputYamlConfig::default(),
        }
    }
}

/// Matcher YAML configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatcherYamlConfig {
    #[serde(default = "default_version")]
    pub version: u32,

    #[serde(default)]
    pub range_policy: RangePolicy,

    #[serde(default)]
    pub penalty_floor: Option<f64>,

    #[serde(default)]
    pub use_parallel: bool,

    /// Replaces the standard rule table when present. An empty list
    /// disables penalties.
    #[serde(default)]
    pub penalties: Option<PenaltyTable>,
}

impl MatcherYamlConfig {
    /// Build the engine configuration this section describes.
    pub fn to_match_config(&self) -> MatchConfig {
        MatchConfig {
            version: self.version,
            range_policy: self.range_policy,
            penalty_floor: self.penalty_floor,
            penalties: self.penalties.clone().unwrap_or_default(),
            use_parallel: self.use_parallel,
        }
    }

    fn validate(&self) -> Result<(), ConfigLoadError> {
        if self.version == 0 {
            return Err(ConfigLoadError::Validation(
                "matcher.version must be >= 1".to_string(),
            ));
        }
        self.to_match_config()
            .validate()
            .map_err(|err| ConfigLoadError::Validation(format!("matcher: {err}")))
    }
}

impl Default for MatcherYamlConfig {
    fn default() -> Self {
        Self {
            version: 1,
            range_policy: RangePolicy::PassThrough,
            penalty_floor: None,
            use_parallel: false,
            penalties: None,
        }
    }
}

/// Output YAML configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputYamlConfig {
    /// Candidates listed per book in ranked mode
    #[serde(default = "default_top")]
    pub top: usize,

    #[serde(default = "true_value")]
    pub pretty: bool,
}

impl OutputYamlConfig {
    fn validate(&self) -> Result<(), ConfigLoadError> {
        if self.top == 0 {
            return Err(ConfigLoadError::Validation(
                "output.top must be >= 1".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for OutputYamlConfig {
    fn default() -> Self {
        Self {
            top: 5,
            pretty: true,
        }
    }
}

fn default_version() -> u32 {
    1
}
fn default_top() -> usize {
    5
}
fn true_value() -> bool {
    true
}
