//! Error types for reveal_app

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while setting up a Reveal page
#[derive(Error, Debug)]
pub enum RevealError {
    /// Failed to read a configuration file
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// TOML configuration did not parse
    #[error("Invalid TOML config: {0}")]
    Toml(#[from] toml::de::Error),

    /// JSON configuration did not parse
    #[error("Invalid JSON config: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration parsed but holds unusable values
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    /// Configuration file has an extension we do not read
    #[error("Unsupported config format: {0}")]
    UnsupportedFormat(String),
}

/// Result type for reveal_app operations
pub type Result<T> = std::result::Result<T, RevealError>;
