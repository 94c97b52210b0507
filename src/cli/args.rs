//! CLI argument definitions using Clap

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::application::DEFAULT_RECENT_LIMIT;
use crate::domain::config::StorageKind;
use crate::domain::provider::ProviderId;

/// RadScribe - dictated radiology text to structured reports
#[derive(Parser, Debug)]
#[command(name = "rad-scribe")]
#[command(version)]
#[command(about = "Turn dictated radiology text into structured reports using Claude or Gemini")]
#[command(long_about = None)]
pub struct Cli {
    /// Config file to use instead of the XDG default
    #[arg(long, global = true, value_name = "PATH", env = "RAD_SCRIBE_CONFIG")]
    pub config: Option<PathBuf>,

    /// SQLite database file
    #[arg(long, global = true, value_name = "PATH")]
    pub database: Option<String>,

    /// Storage backend for templates and reports
    #[arg(long, global = true, value_name = "BACKEND")]
    pub storage: Option<StorageArg>,

    /// Log debug output to stderr
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate a report from dictated text
    Process(ProcessArgs),
    /// Manage report templates
    Templates {
        #[command(subcommand)]
        action: TemplateAction,
    },
    /// Browse stored reports
    Reports {
        #[command(subcommand)]
        action: ReportAction,
    },
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Options for `process`
#[derive(Args, Debug, Clone)]
pub struct ProcessArgs {
    /// Dictated text (read from stdin when omitted)
    pub text: Option<String>,

    /// Template to structure the report with
    #[arg(short = 't', long = "template", value_name = "NAME")]
    pub template: Option<String>,

    /// LLM provider
    #[arg(short = 'p', long, value_name = "PROVIDER")]
    pub provider: Option<ProviderArg>,

    /// Model name
    #[arg(short = 'm', long, value_name = "MODEL")]
    pub model: Option<String>,

    /// Print the prompt instead of calling the provider
    #[arg(long)]
    pub dry_run: bool,
}

/// Template actions
#[derive(Subcommand, Debug)]
pub enum TemplateAction {
    /// List all templates
    List,
    /// Add a new template
    Add {
        /// Template name
        name: String,
        #[command(flatten)]
        source: ContentSource,
    },
    /// Replace an existing template's content
    Update {
        /// Template name
        name: String,
        #[command(flatten)]
        source: ContentSource,
    },
    /// Delete a template
    Delete {
        /// Template name
        name: String,
    },
}

/// Where template content comes from
#[derive(Args, Debug, Clone)]
#[group(required = true, multiple = false)]
pub struct ContentSource {
    /// Template content
    #[arg(long, value_name = "TEXT")]
    pub content: Option<String>,

    /// Read template content from a file
    #[arg(long, value_name = "FILE")]
    pub file: Option<PathBuf>,
}

/// Report actions
#[derive(Subcommand, Debug)]
pub enum ReportAction {
    /// Most recent reports, newest first
    Recent {
        /// Maximum number of reports
        #[arg(short = 'l', long, default_value_t = DEFAULT_RECENT_LIMIT)]
        limit: usize,
    },
    /// Show one report in full
    Show {
        /// Report id
        id: i64,
    },
}

/// Config action subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Create config file with defaults
    Init,
    /// Set a config value
    Set {
        /// Config key
        key: String,
        /// Config value
        value: String,
    },
    /// Get a config value
    Get {
        /// Config key
        key: String,
    },
    /// List all config values
    List,
    /// Show config file path
    Path,
}

/// Provider argument for clap ValueEnum
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum ProviderArg {
    Claude,
    Gemini,
}

impl From<ProviderArg> for ProviderId {
    fn from(arg: ProviderArg) -> Self {
        match arg {
            ProviderArg::Claude => ProviderId::Claude,
            ProviderArg::Gemini => ProviderId::Gemini,
        }
    }
}

/// Storage argument for clap ValueEnum
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum StorageArg {
    Sqlite,
    Memory,
}

impl From<StorageArg> for StorageKind {
    fn from(arg: StorageArg) -> Self {
        match arg {
            StorageArg::Sqlite => StorageKind::Sqlite,
            StorageArg::Memory => StorageKind::Memory,
        }
    }
}

/// Valid config keys
pub const VALID_CONFIG_KEYS: &[&str] = &[
    "provider",
    "api_key",
    "model",
    "api_base_url",
    "temperature",
    "max_output_tokens",
    "request_delay_ms",
    "request_timeout_secs",
    "storage",
    "database",
];

/// Check if a config key is valid
pub fn is_valid_config_key(key: &str) -> bool {
    VALID_CONFIG_KEYS.contains(&key)
}
