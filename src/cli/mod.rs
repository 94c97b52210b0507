//! CLI layer - Command-line interface
//!
//! Contains argument parsing, output formatting and the command runners.

pub mod app;
pub mod args;
pub mod config_cmd;
pub mod presenter;
pub mod reports_cmd;
pub mod templates_cmd;

// Re-export commonly used types
pub use app::{
    run_process, run_reports, run_templates, EXIT_CONFLICT, EXIT_ERROR, EXIT_NOT_FOUND,
    EXIT_SUCCESS, EXIT_USAGE_ERROR,
};
pub use args::{Cli, Commands, ConfigAction, ProcessArgs, ReportAction, TemplateAction};
pub use presenter::Presenter;
