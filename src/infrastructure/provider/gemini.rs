//! Gemini generateContent provider

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::application::ports::{
    require_api_key, GenerationConfig, GenerationError, ModelProvider,
};
use crate::domain::provider::ProviderId;
use crate::domain::report::join_text_segments;
use crate::domain::transcription::PromptBundle;

/// Gemini API base URL
const API_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

// Request types for Gemini API

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    system_instruction: SystemInstruction<'a>,
    generation_config: RequestGenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: Vec<TextPart<'a>>,
}

#[derive(Debug, Serialize)]
struct SystemInstruction<'a> {
    parts: Vec<TextPart<'a>>,
}

#[derive(Debug, Serialize)]
struct TextPart<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RequestGenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
}

// Response types for Gemini API

/// generateContent response envelope
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GeminiResponse {
    pub candidates: Option<Vec<Candidate>>,
    pub error: Option<ApiError>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Candidate {
    pub content: Option<CandidateContent>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CandidateContent {
    pub parts: Option<Vec<ResponsePart>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResponsePart {
    pub text: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiError {
    pub message: String,
    pub status: Option<String>,
    pub code: Option<i32>,
}

impl ApiError {
    fn describe(&self) -> String {
        match (&self.code, &self.status) {
            (Some(code), Some(status)) => format!("{code} {status}: {}", self.message),
            (None, Some(status)) => format!("{status}: {}", self.message),
            _ => self.message.clone(),
        }
    }
}

/// Gemini report generator
pub struct GeminiProvider {
    api_key: String,
    model: String,
    base_url: String,
    client: reqwest::Client,
}

impl GeminiProvider {
    /// Create a provider for the default model.
    ///
    /// # Errors
    /// `Configuration` when the API key is blank.
    pub fn new(api_key: impl Into<String>) -> Result<Self, GenerationError> {
        let api_key = require_api_key(api_key.into(), ProviderId::Gemini.api_key_env())?;

        Ok(Self {
            api_key,
            model: ProviderId::Gemini.default_model().to_string(),
            base_url: API_BASE_URL.to_string(),
            client: reqwest::Client::new(),
        })
    }

    /// Use a different model
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Point at a different models endpoint (proxies, tests)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Model requested from the API
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Build the API URL
    fn api_url(&self) -> String {
        format!(
            "{}/{}:generateContent?key={}",
            self.base_url, self.model, self.api_key
        )
    }

    /// Build the request body
    fn build_request<'a>(
        &self,
        prompt: &'a PromptBundle,
        config: &GenerationConfig,
    ) -> GenerateContentRequest<'a> {
        GenerateContentRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![TextPart {
                    text: prompt.user_content(),
                }],
            }],
            system_instruction: SystemInstruction {
                parts: vec![TextPart {
                    text: prompt.system_instruction(),
                }],
            },
            generation_config: RequestGenerationConfig {
                temperature: config.temperature,
                max_output_tokens: config.max_output_tokens,
            },
        }
    }
}

#[async_trait]
impl ModelProvider for GeminiProvider {
    type Response = GeminiResponse;

    fn name(&self) -> &str {
        ProviderId::Gemini.label()
    }

    async fn generate(
        &self,
        prompt: &PromptBundle,
        config: &GenerationConfig,
    ) -> Result<GeminiResponse, GenerationError> {
        let body = self.build_request(prompt, config);
        log::debug!("Sending Gemini request (model: {})", self.model);

        // The URL carries the key, so it is stripped from reqwest errors
        let response = self
            .client
            .post(self.api_url())
            .json(&body)
            .send()
            .await
            .map_err(|e| GenerationError::Upstream(format!("request failed: {}", e.without_url())))?;

        let status = response.status();

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            let detail = serde_json::from_str::<GeminiResponse>(&error_text)
                .ok()
                .and_then(|r| r.error)
                .map(|e| e.describe())
                .unwrap_or(error_text);
            return Err(GenerationError::Upstream(format!("HTTP {status}: {detail}")));
        }

        let response: GeminiResponse = response
            .json()
            .await
            .map_err(|e| GenerationError::Upstream(format!("invalid response: {}", e.without_url())))?;

        // Check for API error in response body
        if let Some(error) = &response.error {
            return Err(GenerationError::Upstream(error.describe()));
        }

        Ok(response)
    }

    fn extract_text(&self, response: &GeminiResponse) -> Result<String, GenerationError> {
        let parts = response
            .candidates
            .as_ref()
            .and_then(|candidates| candidates.first())
            .and_then(|candidate| candidate.content.as_ref())
            .and_then(|content| content.parts.as_ref())
            .ok_or(GenerationError::EmptyResponse)?;

        join_text_segments(parts.iter().filter_map(|p| p.text.as_deref()))
            .ok_or(GenerationError::EmptyResponse)
    }
}
