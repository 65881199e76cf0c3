//! Configuration file management.
//!
//! Handles the optional `berth.toml`, which can replace the secrets catalogue
//! and override service sizing. Without it the compiled defaults apply.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::core::constants;
use crate::core::secrets::Catalogue;
use crate::error::{ConfigError, Result};

/// Contents of `berth.toml`.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Replaces the default secrets catalogue when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secrets: Option<SecretsConfig>,
    #[serde(default)]
    pub service: ServiceConfig,
}

/// Application keys injected from the parameter store.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SecretsConfig {
    #[serde(default)]
    pub plain: Vec<String>,
    /// Keys stored as `SecureString` and decrypted with the KMS key.
    #[serde(default)]
    pub encrypted: Vec<String>,
}

/// Service sizing overrides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServiceConfig {
    #[serde(default = "default_desired_count")]
    pub desired_count: u32,
    #[serde(default = "default_min_capacity")]
    pub min_capacity: u32,
    #[serde(default = "default_max_capacity")]
    pub max_capacity: u32,
}

fn default_desired_count() -> u32 {
    constants::DESIRED_COUNT
}

fn default_min_capacity() -> u32 {
    constants::SCALING_MIN
}

fn default_max_capacity() -> u32 {
    constants::SCALING_MAX
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            desired_count: default_desired_count(),
            min_capacity: default_min_capacity(),
            max_capacity: default_max_capacity(),
        }
    }
}

impl Config {
    /// Path of the config file in the current directory.
    pub fn default_path() -> PathBuf {
        PathBuf::from(constants::CONFIG_FILE)
    }

    /// Load configuration.
    ///
    /// An explicit `path` must exist. Without one, `berth.toml` in the
    /// current directory is used if present, otherwise the defaults.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ReadFile` or `ConfigError::Parse`, or a
    /// catalogue error if the `[secrets]` section is invalid.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => {
                let p = Self::default_path();
                if !p.exists() {
                    debug!("no config file, using defaults");
                    return Ok(Self::default());
                }
                p
            }
        };

        debug!(path = %path.display(), "loading config");
        let contents = std::fs::read_to_string(&path).map_err(|source| ConfigError::ReadFile {
            path: path.display().to_string(),
            source,
        })?;
        Self::parse(&contents)
    }

    /// Parse configuration from TOML text.
    pub fn parse(contents: &str) -> Result<Self> {
        let config: Self = toml::from_str(contents).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that the `[secrets]` section, if any, forms a valid catalogue.
    pub fn validate(&self) -> Result<()> {
        self.catalogue().map(|_| ())
    }

    /// The secrets catalogue in effect.
    pub fn catalogue(&self) -> Result<Catalogue> {
        match &self.secrets {
            Some(s) => Catalogue::from_lists(&s.plain, &s.encrypted),
            None => Ok(Catalogue::default()),
        }
    }
}
