//! RadScribe CLI entry point

use std::process::ExitCode;

use clap::Parser;

use rad_scribe::cli::{
    app::{cli_config, load_merged_config, run_process, run_reports, run_templates, EXIT_ERROR},
    args::{Cli, Commands},
    config_cmd::handle_config_command,
    presenter::Presenter,
};
use rad_scribe::infrastructure::XdgConfigStore;

#[tokio::main(flavor = "multi_thread", worker_threads = 2)]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .init();

    let store = match cli.config.clone() {
        Some(path) => XdgConfigStore::with_path(path),
        None => XdgConfigStore::new(),
    };

    let cli_layer = cli_config(&cli);

    match cli.command {
        // Config commands operate on the file alone
        Commands::Config { action } => {
            let presenter = Presenter::new();
            if let Err(e) = handle_config_command(action, &store, &presenter).await {
                presenter.error(&e.to_string());
                return ExitCode::from(EXIT_ERROR);
            }
            ExitCode::SUCCESS
        }
        Commands::Process(args) => {
            let config = load_merged_config(&store, cli_layer).await;
            run_process(args, &config).await
        }
        Commands::Templates { action } => {
            let config = load_merged_config(&store, cli_layer).await;
            run_templates(action, &config).await
        }
        Commands::Reports { action } => {
            let config = load_merged_config(&store, cli_layer).await;
            run_reports(action, &config).await
        }
    }
}
