//! Configuration management for piimask.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::collections::BTreeMap;
use std::path::PathBuf;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default configuration directory name.
const CONFIG_DIR_NAME: &str = "piimask";

/// Prefix for environment variable overrides.
const ENV_PREFIX: &str = "PIIMASK_";

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `PIIMASK_`, sections split by `__`)
/// 2. TOML config file at `~/.config/piimask/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Masking configuration.
    pub masking: MaskingConfig,
    /// Classifier configuration.
    pub classifier: ClassifierConfig,
    /// Output configuration.
    pub output: OutputConfig,
}

/// Masking-related configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaskingConfig {
    /// Largest input accepted, in bytes.
    /// Set to 0 for unlimited.
    pub max_input_bytes: usize,
}

/// Keyword classifier configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Label returned when no keyword matches.
    pub default_label: String,
    /// Keywords per label.
    pub keywords: BTreeMap<String, Vec<String>>,
    /// Match keywords case-sensitively.
    pub case_sensitive: bool,
}

/// Output-related configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Pretty-print JSON output.
    pub pretty_json: bool,
}

impl Default for MaskingConfig {
    fn default() -> Self {
        Self {
            max_input_bytes: 1024 * 1024,
        }
    }
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            default_label: "Unclassified".to_string(),
            keywords: BTreeMap::new(),
            case_sensitive: false,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { pretty_json: true }
    }
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration with an optional custom config path.
    ///
    /// A config file that does not exist is skipped.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading, parsing or validation fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file))
            .merge(Env::prefixed(ENV_PREFIX).split("__"));

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(CONFIG_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        if self.classifier.default_label.trim().is_empty() {
            return Err(Error::config_validation(
                "classifier.default_label must not be empty",
            ));
        }

        for (label, keywords) in &self.classifier.keywords {
            if label.trim().is_empty() {
                return Err(Error::config_validation(
                    "classifier.keywords has an empty label",
                ));
            }
            if keywords.is_empty() {
                return Err(Error::config_validation(format!(
                    "classifier.keywords.{label} has no keywords"
                )));
            }
            if keywords.iter().any(|k| k.trim().is_empty()) {
                return Err(Error::config_validation(format!(
                    "classifier.keywords.{label} contains a blank keyword"
                )));
            }
        }

        Ok(())
    }

    /// The input size limit, or `None` when unlimited.
    #[must_use]
    pub fn max_input_bytes(&self) -> Option<usize> {
        match self.masking.max_input_bytes {
            0 => None,
            limit => Some(limit),
        }
    }
}
