//! Command runners shared by the binary

use std::env;
use std::io::{IsTerminal, Read};
use std::process::ExitCode;
use std::sync::Arc;

use crate::application::ports::{
    ConfigStore, GenerationConfig, GenerationError, ModelProvider, Storage, StoreError,
};
use crate::application::{
    error_payload, prepare_prompt, ErrorPayload, ProcessCallbacks, ProcessInput, ProcessOutput,
    ProcessTranscriptionUseCase, ReportService, TemplateService,
};
use crate::domain::config::{AppConfig, StorageKind};
use crate::domain::provider::ProviderId;
use crate::infrastructure::{open_storage, ClaudeProvider, GeminiProvider, RetryPolicy};

use super::args::{Cli, Commands, ProcessArgs, ReportAction, TemplateAction};
use super::presenter::Presenter;
use super::reports_cmd::handle_reports_command;
use super::templates_cmd::{handle_templates_command, TemplateCommandError};

/// Exit codes
pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_ERROR: u8 = 1;
pub const EXIT_USAGE_ERROR: u8 = 2;
pub const EXIT_CONFLICT: u8 = 3;
pub const EXIT_NOT_FOUND: u8 = 4;

/// Environment variable selecting the provider
pub const PROVIDER_ENV: &str = "RAD_SCRIBE_PROVIDER";

/// Environment variable pointing at the database file
pub const DATABASE_ENV: &str = "RAD_SCRIBE_DATABASE";

/// Exit code for a storage failure
pub fn exit_code_for(error: &StoreError) -> u8 {
    match error {
        StoreError::NotFound(_) => EXIT_NOT_FOUND,
        StoreError::Conflict(_) => EXIT_CONFLICT,
        StoreError::Backend(_) => EXIT_ERROR,
    }
}

/// Settings given on the command line, as a config layer
pub fn cli_config(cli: &Cli) -> AppConfig {
    let (provider, model) = match &cli.command {
        Commands::Process(args) => (
            args.provider.map(|p| ProviderId::from(p).to_string()),
            args.model.clone(),
        ),
        _ => (None, None),
    };

    AppConfig {
        provider,
        model,
        database: cli.database.clone(),
        storage: cli.storage.map(|s| StorageKind::from(s).to_string()),
        ..Default::default()
    }
}

/// Merge config layers: defaults < file < env < cli.
///
/// The API key is read from the variable belonging to the provider that
/// wins the merge, so switching providers never sends the wrong key.
pub fn merge_config<F>(file_config: AppConfig, cli_config: AppConfig, lookup: F) -> AppConfig
where
    F: Fn(&str) -> Option<String>,
{
    let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

    let env_config = AppConfig {
        provider: var(PROVIDER_ENV),
        database: var(DATABASE_ENV),
        ..Default::default()
    };

    let merged = AppConfig::defaults()
        .merge(file_config)
        .merge(env_config)
        .merge(cli_config);

    let env_key = merged
        .provider()
        .ok()
        .and_then(|provider| var(provider.api_key_env()));

    merged.merge(AppConfig {
        api_key: env_key,
        ..Default::default()
    })
}

/// Load the config file and merge it with the environment and CLI layer
pub async fn load_merged_config<S: ConfigStore>(store: &S, cli_config: AppConfig) -> AppConfig {
    let file_config = match store.load().await {
        Ok(config) => config,
        Err(e) => {
            log::warn!("Ignoring config file {}: {e}", store.path().display());
            AppConfig::empty()
        }
    };

    merge_config(file_config, cli_config, |name| env::var(name).ok())
}

/// Open the configured storage and seed default templates into an empty store
pub async fn open_configured_storage(config: &AppConfig) -> Result<Arc<dyn Storage>, String> {
    let kind = config.storage().map_err(|e| e.to_string())?;
    let database = config.database_or_default();

    let storage = open_storage(kind, &database, &RetryPolicy::default())
        .await
        .map_err(|e| e.to_string())?;

    TemplateService::new(Arc::clone(&storage))
        .seed_defaults()
        .await
        .map_err(|e| e.to_string())?;

    Ok(storage)
}

/// Run `templates` subcommands
pub async fn run_templates(action: TemplateAction, config: &AppConfig) -> ExitCode {
    let presenter = Presenter::new();

    let storage = match open_configured_storage(config).await {
        Ok(storage) => storage,
        Err(e) => {
            presenter.error(&e);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    let service = TemplateService::new(storage);
    match handle_templates_command(action, &service, &presenter).await {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(e) => {
            presenter.error(&e.to_string());
            let code = match &e {
                TemplateCommandError::Store(store_error) => exit_code_for(store_error),
                TemplateCommandError::EmptyContent => EXIT_USAGE_ERROR,
                TemplateCommandError::ReadFile { .. } => EXIT_ERROR,
            };
            ExitCode::from(code)
        }
    }
}

/// Run `reports` subcommands
pub async fn run_reports(action: ReportAction, config: &AppConfig) -> ExitCode {
    let presenter = Presenter::new();

    let storage = match open_configured_storage(config).await {
        Ok(storage) => storage,
        Err(e) => {
            presenter.error(&e);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    let service = ReportService::new(storage);
    match handle_reports_command(action, &service, &presenter).await {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(e) => ExitCode::from(exit_code_for(&e)),
    }
}

/// Run `process`: generate, store and print a report
pub async fn run_process(args: ProcessArgs, config: &AppConfig) -> ExitCode {
    let mut presenter = Presenter::new();

    let text = match read_dictation(args.text) {
        Ok(text) => text,
        Err(e) => {
            presenter.error(&e);
            return ExitCode::from(EXIT_USAGE_ERROR);
        }
    };
    let input = ProcessInput::new(text, args.template);

    let provider_id = match config.provider() {
        Ok(provider) => provider,
        Err(e) => {
            presenter.error(&e.to_string());
            return ExitCode::from(EXIT_USAGE_ERROR);
        }
    };

    if args.dry_run {
        return run_dry_run(&input, provider_id, config, &presenter).await;
    }

    let api_key = config.api_key.clone().unwrap_or_default();
    let model = config.model_or_default(provider_id);

    let result = match provider_id {
        ProviderId::Claude => match ClaudeProvider::new(api_key) {
            Ok(provider) => {
                let provider = provider.with_model(model);
                let provider = match config.api_base_url.as_deref() {
                    Some(url) => provider.with_base_url(url),
                    None => provider,
                };
                generate_report(provider, input, config, &mut presenter).await
            }
            Err(e) => Err(error_payload(&e)),
        },
        ProviderId::Gemini => match GeminiProvider::new(api_key) {
            Ok(provider) => {
                let provider = provider.with_model(model);
                let provider = match config.api_base_url.as_deref() {
                    Some(url) => provider.with_base_url(url),
                    None => provider,
                };
                generate_report(provider, input, config, &mut presenter).await
            }
            Err(e) => Err(error_payload(&e)),
        },
    };

    match result {
        Ok(output) => {
            presenter.json(&output);
            ExitCode::from(EXIT_SUCCESS)
        }
        Err(payload) => {
            presenter.json(&payload);
            ExitCode::from(EXIT_ERROR)
        }
    }
}

/// Run the pipeline against one provider, bounded by the request timeout
async fn generate_report<P: ModelProvider>(
    provider: P,
    input: ProcessInput,
    config: &AppConfig,
    presenter: &mut Presenter,
) -> Result<ProcessOutput, ErrorPayload> {
    let storage = open_configured_storage(config)
        .await
        .map_err(|e| error_payload(&e))?;

    let use_case = ProcessTranscriptionUseCase::new(provider, Arc::clone(&storage), storage)
        .with_generation_config(GenerationConfig {
            temperature: config.temperature_or_default(),
            max_output_tokens: config.max_output_tokens_or_default(),
        })
        .with_request_delay(config.request_delay_or_default());

    presenter.start_spinner("Preparing report...");
    let spinner = presenter.spinner();
    let callbacks = ProcessCallbacks {
        on_generating_start: Some(Box::new(move |name: &str| {
            if let Some(ref spinner) = spinner {
                spinner.set_message(format!("Generating report with {name}..."));
            }
        })),
        on_generating_end: None,
    };

    let timeout = config.request_timeout_or_default();
    let result = match tokio::time::timeout(timeout, use_case.handle(input, &callbacks)).await {
        Ok(result) => result,
        Err(_) => {
            log::error!("Request timed out after {}s", timeout.as_secs());
            Err(error_payload(&GenerationError::Upstream(format!(
                "request timed out after {}s",
                timeout.as_secs()
            ))))
        }
    };

    match &result {
        Ok(output) => presenter.spinner_success(&format!("Report {} saved", output.report_id)),
        Err(_) => presenter.spinner_fail("Report generation failed"),
    }
    result
}

/// Print the prompt that would be sent, without calling a provider
async fn run_dry_run(
    input: &ProcessInput,
    provider: ProviderId,
    config: &AppConfig,
    presenter: &Presenter,
) -> ExitCode {
    let storage = match open_configured_storage(config).await {
        Ok(storage) => storage,
        Err(e) => {
            presenter.error(&e);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    let prepared = prepare_prompt(storage.as_ref(), input).await;
    if let Some(name) = input.template_name.as_deref() {
        if !prepared.prompt.has_template() {
            presenter.warn(&format!("Template '{name}' not found, prompt has no structure"));
        }
    }

    presenter.info(&format!(
        "Dry run: prompt for {} ({}), nothing sent",
        provider.label(),
        config.model_or_default(provider)
    ));
    presenter.output(&prepared.prompt.combined());
    ExitCode::from(EXIT_SUCCESS)
}

/// Dictated text from the argument, or all of stdin
fn read_dictation(text: Option<String>) -> Result<String, String> {
    if let Some(text) = text {
        return Ok(text);
    }

    let mut stdin = std::io::stdin();
    if stdin.is_terminal() {
        return Err("No text given. Pass it as an argument or pipe it on stdin".to_string());
    }

    let mut buffer = String::new();
    stdin
        .read_to_string(&mut buffer)
        .map_err(|e| format!("Failed to read stdin: {e}"))?;
    Ok(buffer)
}
