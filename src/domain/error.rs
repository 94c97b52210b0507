//! Domain error types

use thiserror::Error;

/// Error when an unknown provider name is given
#[derive(Debug, Clone, Error)]
#[error("Invalid provider: \"{input}\". Valid providers are: claude, gemini")]
pub struct InvalidProviderError {
    pub input: String,
}

/// Error when an unknown storage backend is given
#[derive(Debug, Clone, Error)]
#[error("Invalid storage backend: \"{input}\". Valid backends are: sqlite, memory")]
pub struct InvalidStorageError {
    pub input: String,
}

/// Error when configuration fails
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(String),

    #[error("Failed to parse config file: {0}")]
    ParseError(String),

    #[error("Failed to write config file: {0}")]
    WriteError(String),

    #[error("Invalid config value for '{key}': {message}")]
    ValidationError { key: String, message: String },

    #[error("Config file already exists at: {0}")]
    AlreadyExists(String),
}
