//! Configuration errors

use std::path::PathBuf;

/// Errors that can occur while loading or saving configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_yaml::Error),
}

pub type ConfigResult<T> = Result<T, ConfigError>;
