//! Infrastructure layer - Adapter implementations
//!
//! Contains concrete implementations of the port interfaces,
//! integrating with external systems like SQLite and the LLM APIs.

pub mod config;
pub mod provider;
pub mod storage;

// Re-export adapters
pub use config::XdgConfigStore;
pub use provider::{ClaudeProvider, GeminiProvider};
pub use storage::{open_storage, InMemoryStore, RetryPolicy, SqliteStore};
