//! Error types for loading configuration and level files.
//!
//! The simulation itself never fails: `tick` and `render` are infallible.
//! Only the file-backed collaborators (config, levels) return errors.

use std::path::PathBuf;

use thiserror::Error;

/// Errors while reading a `GameConfig` file
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Errors while reading or validating a level file
#[derive(Debug, Error)]
pub enum LevelError {
    #[error("failed to read level {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse level {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Platform with a zero or negative extent
    #[error("platform {index} has invalid size {width}x{height}")]
    InvalidPlatform { index: usize, width: f64, height: f64 },
}

impl From<ConfigError> for String {
    fn from(error: ConfigError) -> Self {
        error.to_string()
    }
}

impl From<LevelError> for String {
    fn from(error: LevelError) -> Self {
        error.to_string()
    }
}
