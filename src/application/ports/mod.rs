//! Port interfaces (traits) for external systems
//!
//! These traits define the boundaries between the application
//! and infrastructure layers.

pub mod config;
pub mod model_provider;
pub mod store;

// Re-export common types
pub use config::ConfigStore;
pub use model_provider::{require_api_key, GenerationConfig, GenerationError, ModelProvider};
pub use store::{ReportStore, Storage, StoreError, TemplateStore};
