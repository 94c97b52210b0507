//! Application configuration value object

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::domain::error::{InvalidProviderError, InvalidStorageError};
use crate::domain::provider::ProviderId;

/// Default sampling temperature, kept low to limit variability
pub const DEFAULT_TEMPERATURE: f32 = 0.1;

/// Default cap on generated tokens
pub const DEFAULT_MAX_OUTPUT_TOKENS: u32 = 1024;

/// Default pause before each provider call
pub const DEFAULT_REQUEST_DELAY_MS: u64 = 200;

/// Default caller-side timeout for a whole process request
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 120;

/// Where templates and reports are kept
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StorageKind {
    /// SQLite database file
    #[default]
    Sqlite,
    /// Process memory, reset on every start
    Memory,
}

impl StorageKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Sqlite => "sqlite",
            Self::Memory => "memory",
        }
    }
}

impl FromStr for StorageKind {
    type Err = InvalidStorageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sqlite" => Ok(Self::Sqlite),
            "memory" => Ok(Self::Memory),
            _ => Err(InvalidStorageError {
                input: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for StorageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Application configuration.
/// All fields are optional to support partial configs and merging.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    pub provider: Option<String>,
    pub api_key: Option<String>,
    pub model: Option<String>,
    pub api_base_url: Option<String>,
    pub temperature: Option<f32>,
    pub max_output_tokens: Option<u32>,
    pub request_delay_ms: Option<u64>,
    pub request_timeout_secs: Option<u64>,
    pub storage: Option<String>,
    pub database: Option<String>,
}

impl AppConfig {
    /// Create config with default values
    pub fn defaults() -> Self {
        Self {
            provider: Some(ProviderId::default().to_string()),
            api_key: None,
            model: None,
            api_base_url: None,
            temperature: Some(DEFAULT_TEMPERATURE),
            max_output_tokens: Some(DEFAULT_MAX_OUTPUT_TOKENS),
            request_delay_ms: Some(DEFAULT_REQUEST_DELAY_MS),
            request_timeout_secs: Some(DEFAULT_REQUEST_TIMEOUT_SECS),
            storage: Some(StorageKind::default().to_string()),
            database: None,
        }
    }

    /// Create an empty config (all None)
    pub fn empty() -> Self {
        Self::default()
    }

    /// Merge this config with another, where other takes precedence.
    /// Only non-None values from other will override this.
    pub fn merge(self, other: Self) -> Self {
        Self {
            provider: other.provider.or(self.provider),
            api_key: other.api_key.or(self.api_key),
            model: other.model.or(self.model),
            api_base_url: other.api_base_url.or(self.api_base_url),
            temperature: other.temperature.or(self.temperature),
            max_output_tokens: other.max_output_tokens.or(self.max_output_tokens),
            request_delay_ms: other.request_delay_ms.or(self.request_delay_ms),
            request_timeout_secs: other.request_timeout_secs.or(self.request_timeout_secs),
            storage: other.storage.or(self.storage),
            database: other.database.or(self.database),
        }
    }

    /// Get the configured provider, or the default if not set
    pub fn provider(&self) -> Result<ProviderId, InvalidProviderError> {
        self.provider
            .as_deref()
            .map_or(Ok(ProviderId::default()), str::parse)
    }

    /// Get the configured storage backend, or the default if not set
    pub fn storage(&self) -> Result<StorageKind, InvalidStorageError> {
        self.storage
            .as_deref()
            .map_or(Ok(StorageKind::default()), str::parse)
    }

    /// Get the model name, or the provider's default
    pub fn model_or_default(&self, provider: ProviderId) -> String {
        self.model
            .clone()
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| provider.default_model().to_string())
    }

    /// Get temperature, or 0.1 if not set
    pub fn temperature_or_default(&self) -> f32 {
        self.temperature.unwrap_or(DEFAULT_TEMPERATURE)
    }

    /// Get max output tokens, or 1024 if not set
    pub fn max_output_tokens_or_default(&self) -> u32 {
        self.max_output_tokens.unwrap_or(DEFAULT_MAX_OUTPUT_TOKENS)
    }

    /// Get the pre-call delay, or 200ms if not set
    pub fn request_delay_or_default(&self) -> Duration {
        Duration::from_millis(self.request_delay_ms.unwrap_or(DEFAULT_REQUEST_DELAY_MS))
    }

    /// Get the request timeout, or 120s if not set
    pub fn request_timeout_or_default(&self) -> Duration {
        Duration::from_secs(
            self.request_timeout_secs
                .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS),
        )
    }

    /// Get the database path, or `<data dir>/rad-scribe/reports.db`
    pub fn database_or_default(&self) -> PathBuf {
        match self.database.as_deref() {
            Some(path) if !path.trim().is_empty() => PathBuf::from(path),
            _ => dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("rad-scribe")
                .join("reports.db"),
        }
    }
}
