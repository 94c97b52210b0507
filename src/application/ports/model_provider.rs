//! Model provider port interface

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::config::{DEFAULT_MAX_OUTPUT_TOKENS, DEFAULT_TEMPERATURE};
use crate::domain::transcription::PromptBundle;

/// Report generation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Upstream generation error: {0}")]
    Upstream(String),

    #[error("Provider returned no report text")]
    EmptyResponse,
}

/// Sampling settings sent with every generation request
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationConfig {
    pub temperature: f32,
    pub max_output_tokens: u32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            temperature: DEFAULT_TEMPERATURE,
            max_output_tokens: DEFAULT_MAX_OUTPUT_TOKENS,
        }
    }
}

/// Port for LLM report synthesis.
///
/// Each vendor keeps its own response envelope; [`ModelProvider::extract_text`]
/// turns it into report text. Implementations do not retry.
#[async_trait]
pub trait ModelProvider: Send + Sync {
    /// Vendor-specific response envelope
    type Response: Send + Sync;

    /// Short provider name for logs
    fn name(&self) -> &str;

    /// Send the prompt and return the raw response.
    ///
    /// # Errors
    /// `Upstream` when the vendor is unreachable or answers with an error.
    async fn generate(
        &self,
        prompt: &PromptBundle,
        config: &GenerationConfig,
    ) -> Result<Self::Response, GenerationError>;

    /// Pull the generated report text out of a response.
    ///
    /// # Errors
    /// `EmptyResponse` when the response carries no text.
    fn extract_text(&self, response: &Self::Response) -> Result<String, GenerationError>;
}

/// Reject blank credentials before any network call is made
pub fn require_api_key(api_key: String, env_var: &str) -> Result<String, GenerationError> {
    if api_key.trim().is_empty() {
        return Err(GenerationError::Configuration(format!(
            "missing API key. Set {env_var} or run 'rad-scribe config set api_key <key>'"
        )));
    }
    Ok(api_key)
}
