// src/errors.rs

//! Crate-wide error aliases and helpers.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PollrunError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Failed to start '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, PollrunError>;
