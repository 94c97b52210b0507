//! Domain layer - Core business logic
//!
//! Contains value objects, entities, and domain errors.
//! This layer has no dependencies on external systems.

pub mod config;
pub mod error;
pub mod provider;
pub mod report;
pub mod transcription;

// Re-export common types
pub use config::{AppConfig, StorageKind};
pub use error::*;
pub use provider::ProviderId;
pub use report::{NewReport, Report, ReportSummary, Template};
pub use transcription::{normalize, PromptBundle};
