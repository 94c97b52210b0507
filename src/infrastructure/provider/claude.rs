//! Anthropic Messages API provider

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::application::ports::{
    require_api_key, GenerationConfig, GenerationError, ModelProvider,
};
use crate::domain::provider::ProviderId;
use crate::domain::report::join_text_segments;
use crate::domain::transcription::PromptBundle;

const API_BASE_URL: &str = "https://api.anthropic.com/v1";
const API_VERSION: &str = "2023-06-01";

// Request types for the Messages API

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    system: &'a str,
    messages: Vec<Message<'a>>,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

// Response types for the Messages API

/// Messages API response envelope
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClaudeResponse {
    #[serde(default)]
    pub content: Vec<ContentBlock>,
    pub stop_reason: Option<String>,
}

impl ClaudeResponse {
    /// Whether generation stopped at the output token limit
    pub fn is_truncated(&self) -> bool {
        self.stop_reason.as_deref() == Some("max_tokens")
    }
}

/// One block of a Messages API response
#[derive(Debug, Clone, Deserialize)]
pub struct ContentBlock {
    #[serde(rename = "type")]
    pub block_type: String,
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ApiError,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    #[serde(rename = "type")]
    error_type: Option<String>,
    message: String,
}

/// Claude report generator
pub struct ClaudeProvider {
    api_key: String,
    model: String,
    base_url: String,
    client: reqwest::Client,
}

impl ClaudeProvider {
    /// Create a provider for the default model.
    ///
    /// # Errors
    /// `Configuration` when the API key is blank.
    pub fn new(api_key: impl Into<String>) -> Result<Self, GenerationError> {
        let api_key = require_api_key(api_key.into(), ProviderId::Claude.api_key_env())?;

        Ok(Self {
            api_key,
            model: ProviderId::Claude.default_model().to_string(),
            base_url: API_BASE_URL.to_string(),
            client: reqwest::Client::new(),
        })
    }

    /// Use a different model
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Point at a different API root (proxies, tests)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Model requested from the API
    pub fn model(&self) -> &str {
        &self.model
    }

    fn api_url(&self) -> String {
        format!("{}/messages", self.base_url)
    }

    fn build_request<'a>(
        &'a self,
        prompt: &'a PromptBundle,
        config: &GenerationConfig,
    ) -> MessagesRequest<'a> {
        MessagesRequest {
            model: &self.model,
            max_tokens: config.max_output_tokens,
            temperature: config.temperature,
            system: prompt.system_instruction(),
            messages: vec![Message {
                role: "user",
                content: prompt.user_content(),
            }],
        }
    }

    fn describe_error(status: reqwest::StatusCode, body: &str) -> String {
        match serde_json::from_str::<ErrorEnvelope>(body) {
            Ok(envelope) => match envelope.error.error_type {
                Some(kind) => format!("HTTP {status}: {kind}: {}", envelope.error.message),
                None => format!("HTTP {status}: {}", envelope.error.message),
            },
            Err(_) => format!("HTTP {status}: {body}"),
        }
    }
}

#[async_trait]
impl ModelProvider for ClaudeProvider {
    type Response = ClaudeResponse;

    fn name(&self) -> &str {
        ProviderId::Claude.label()
    }

    async fn generate(
        &self,
        prompt: &PromptBundle,
        config: &GenerationConfig,
    ) -> Result<ClaudeResponse, GenerationError> {
        let body = self.build_request(prompt, config);
        log::debug!("Sending Claude request (model: {})", self.model);

        let response = self
            .client
            .post(self.api_url())
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .json(&body)
            .send()
            .await
            .map_err(|e| GenerationError::Upstream(format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(GenerationError::Upstream(Self::describe_error(
                status,
                &error_text,
            )));
        }

        response
            .json()
            .await
            .map_err(|e| GenerationError::Upstream(format!("invalid response: {e}")))
    }

    fn extract_text(&self, response: &ClaudeResponse) -> Result<String, GenerationError> {
        if response.is_truncated() {
            log::warn!("Claude stopped at max_tokens; the report may be cut off");
        }

        join_text_segments(
            response
                .content
                .iter()
                .filter(|block| block.block_type == "text")
                .filter_map(|block| block.text.as_deref()),
        )
        .ok_or(GenerationError::EmptyResponse)
    }
}
