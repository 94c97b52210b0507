//! Configuration domain module

mod app_config;

pub use app_config::{
    AppConfig, StorageKind, DEFAULT_MAX_OUTPUT_TOKENS, DEFAULT_REQUEST_DELAY_MS,
    DEFAULT_REQUEST_TIMEOUT_SECS, DEFAULT_TEMPERATURE,
};
