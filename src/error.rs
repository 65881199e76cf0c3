//! Error types.
//!
//! Configuration problems are detected before any resource is declared.
//! Synthesis problems mean the declaration graph itself is inconsistent.

use thiserror::Error;

/// Top-level error for berth operations.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Synth(#[from] SynthError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Problems with the deployment environment or `berth.toml`.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required environment variables: {}", .0.join(", "))]
    MissingVariables(Vec<&'static str>),

    #[error("failed to read config file {path}: {source}")]
    ReadFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("secrets catalogue is empty")]
    EmptyCatalogue,

    #[error("secret declared more than once: {0}")]
    DuplicateSecret(String),

    #[error("invalid secret key '{key}': {reason}")]
    InvalidSecretKey { key: String, reason: String },

    #[error("invalid {var} '{value}': {reason}")]
    InvalidIdentity {
        var: &'static str,
        value: String,
        reason: String,
    },
}

/// Problems assembling or emitting the template.
#[derive(Error, Debug)]
pub enum SynthError {
    #[error("resource declared twice: {0}")]
    DuplicateResource(String),

    #[error("{from} references undeclared {target}")]
    DanglingReference { from: String, target: String },

    #[error("address space {base} has no room for another /{mask} block")]
    AddressSpaceExhausted { base: String, mask: u8 },

    #[error("invalid capacity: min {min}, max {max}")]
    InvalidCapacity { min: u32, max: u32 },

    #[error("failed to serialize template: {0}")]
    Serialize(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
