//! Config command handler

use crate::application::ports::ConfigStore;
use crate::domain::config::{AppConfig, StorageKind};
use crate::domain::error::ConfigError;
use crate::domain::provider::ProviderId;

use super::args::{is_valid_config_key, ConfigAction, VALID_CONFIG_KEYS};
use super::presenter::Presenter;

const NOT_SET: &str = "(not set)";

/// Handle config subcommand
pub async fn handle_config_command<S: ConfigStore>(
    action: ConfigAction,
    store: &S,
    presenter: &Presenter,
) -> Result<(), ConfigError> {
    match action {
        ConfigAction::Init => handle_init(store, presenter).await,
        ConfigAction::Set { key, value } => handle_set(store, presenter, &key, &value).await,
        ConfigAction::Get { key } => handle_get(store, presenter, &key).await,
        ConfigAction::List => handle_list(store, presenter).await,
        ConfigAction::Path => {
            presenter.output(&store.path().to_string_lossy());
            Ok(())
        }
    }
}

async fn handle_init<S: ConfigStore>(store: &S, presenter: &Presenter) -> Result<(), ConfigError> {
    store.init().await?;
    presenter.success(&format!(
        "Config file created at: {}",
        store.path().display()
    ));
    Ok(())
}

async fn handle_set<S: ConfigStore>(
    store: &S,
    presenter: &Presenter,
    key: &str,
    value: &str,
) -> Result<(), ConfigError> {
    ensure_known_key(key)?;

    let mut config = store.load().await?;
    apply_config_value(&mut config, key, value)?;
    store.save(&config).await?;

    let shown = if key == "api_key" {
        mask_api_key(value)
    } else {
        value.to_string()
    };
    presenter.success(&format!("{key} = {shown}"));

    Ok(())
}

async fn handle_get<S: ConfigStore>(
    store: &S,
    presenter: &Presenter,
    key: &str,
) -> Result<(), ConfigError> {
    ensure_known_key(key)?;

    let config = store.load().await?;
    let value = display_value(&config, key).unwrap_or_else(|| NOT_SET.to_string());
    presenter.output(&value);

    Ok(())
}

async fn handle_list<S: ConfigStore>(store: &S, presenter: &Presenter) -> Result<(), ConfigError> {
    let config = store.load().await?;

    for key in VALID_CONFIG_KEYS {
        let value = display_value(&config, key).unwrap_or_else(|| NOT_SET.to_string());
        presenter.key_value(key, &value);
    }

    Ok(())
}

fn ensure_known_key(key: &str) -> Result<(), ConfigError> {
    if is_valid_config_key(key) {
        return Ok(());
    }
    Err(ConfigError::ValidationError {
        key: key.to_string(),
        message: format!("Unknown key. Valid keys: {}", VALID_CONFIG_KEYS.join(", ")),
    })
}

fn invalid(key: &str, message: impl Into<String>) -> ConfigError {
    ConfigError::ValidationError {
        key: key.to_string(),
        message: message.into(),
    }
}

/// Validate `value` for `key` and store it in `config`
fn apply_config_value(config: &mut AppConfig, key: &str, value: &str) -> Result<(), ConfigError> {
    match key {
        "provider" => {
            let provider: ProviderId = value.parse().map_err(|e| invalid(key, format!("{e}")))?;
            config.provider = Some(provider.to_string());
        }
        "storage" => {
            let storage: StorageKind = value.parse().map_err(|e| invalid(key, format!("{e}")))?;
            config.storage = Some(storage.to_string());
        }
        "api_key" => config.api_key = Some(non_blank(key, value)?),
        "model" => config.model = Some(non_blank(key, value)?),
        "database" => config.database = Some(non_blank(key, value)?),
        "api_base_url" => {
            if !(value.starts_with("http://") || value.starts_with("https://")) {
                return Err(invalid(key, "Value must start with http:// or https://"));
            }
            config.api_base_url = Some(value.trim_end_matches('/').to_string());
        }
        "temperature" => {
            let temperature: f32 = value
                .parse()
                .map_err(|_| invalid(key, "Value must be a number"))?;
            if !(0.0..=2.0).contains(&temperature) {
                return Err(invalid(key, "Value must be between 0.0 and 2.0"));
            }
            config.temperature = Some(temperature);
        }
        "max_output_tokens" => {
            let tokens: u32 = value
                .parse()
                .map_err(|_| invalid(key, "Value must be a positive integer"))?;
            if tokens == 0 {
                return Err(invalid(key, "Value must be a positive integer"));
            }
            config.max_output_tokens = Some(tokens);
        }
        "request_delay_ms" => {
            config.request_delay_ms = Some(
                value
                    .parse()
                    .map_err(|_| invalid(key, "Value must be a whole number of milliseconds"))?,
            );
        }
        "request_timeout_secs" => {
            let secs: u64 = value
                .parse()
                .map_err(|_| invalid(key, "Value must be a whole number of seconds"))?;
            if secs == 0 {
                return Err(invalid(key, "Value must be at least 1 second"));
            }
            config.request_timeout_secs = Some(secs);
        }
        _ => return Err(invalid(key, "Unknown key")),
    }
    Ok(())
}

fn non_blank(key: &str, value: &str) -> Result<String, ConfigError> {
    if value.trim().is_empty() {
        return Err(invalid(key, "Value must not be empty"));
    }
    Ok(value.trim().to_string())
}

/// Current value of `key` as shown to the user; API keys are masked
fn display_value(config: &AppConfig, key: &str) -> Option<String> {
    match key {
        "provider" => config.provider.clone(),
        "api_key" => config.api_key.as_deref().map(mask_api_key),
        "model" => config.model.clone(),
        "api_base_url" => config.api_base_url.clone(),
        "temperature" => config.temperature.map(|v| v.to_string()),
        "max_output_tokens" => config.max_output_tokens.map(|v| v.to_string()),
        "request_delay_ms" => config.request_delay_ms.map(|v| v.to_string()),
        "request_timeout_secs" => config.request_timeout_secs.map(|v| v.to_string()),
        "storage" => config.storage.clone(),
        "database" => config.database.clone(),
        _ => None,
    }
}

/// Mask API key for display (show first 4 and last 4 chars)
fn mask_api_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 8 {
        "*".repeat(chars.len())
    } else {
        let head: String = chars[..4].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{head}...{tail}")
    }
}
