//! Application layer - Use cases and port interfaces
//!
//! Contains the core business operations and trait definitions
//! for external system interactions.

pub mod ports;
pub mod process;
pub mod reports;
pub mod templates;

// Re-export use cases
pub use process::{
    error_payload, prepare_prompt, ErrorPayload, PreparedPrompt, ProcessCallbacks, ProcessError,
    ProcessInput, ProcessOutput, ProcessTranscriptionUseCase,
};
pub use reports::{ReportService, DEFAULT_RECENT_LIMIT};
pub use templates::{resolve_template, TemplateService};
