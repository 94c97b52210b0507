//! Process transcription use case
//!
//! Turns dictated text into a stored report: normalize, resolve the optional
//! template, build the prompt, call the model, extract the text and record
//! the report. Nothing is stored unless every earlier step succeeded.

use std::time::Duration;

use serde::Serialize;
use thiserror::Error;

use crate::domain::report::NewReport;
use crate::domain::transcription::{normalize, PromptBundle};

use super::ports::{
    GenerationConfig, GenerationError, ModelProvider, ReportStore, StoreError, TemplateStore,
};
use super::templates::resolve_template;

/// Errors from the process use case
#[derive(Debug, Error)]
pub enum ProcessError {
    #[error(transparent)]
    Generation(#[from] GenerationError),

    #[error("Failed to store report: {0}")]
    Storage(#[from] StoreError),
}

/// Input parameters for the process use case
#[derive(Debug, Clone, Default)]
pub struct ProcessInput {
    /// Dictated speech-to-text output
    pub text: String,
    /// Optional template to steer the report structure
    pub template_name: Option<String>,
}

impl ProcessInput {
    pub fn new(text: impl Into<String>, template_name: Option<String>) -> Self {
        Self {
            text: text.into(),
            template_name,
        }
    }
}

/// Successful process response
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProcessOutput {
    pub processed_text: String,
    pub report_id: i64,
}

/// Error response returned at the request boundary
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorPayload {
    pub error: String,
}

/// Normalized text and the prompt built from it, before any model call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedPrompt {
    pub normalized_text: String,
    pub prompt: PromptBundle,
}

/// Callbacks for status updates around the model call
#[derive(Default)]
#[allow(clippy::type_complexity)]
pub struct ProcessCallbacks {
    /// Called right before the provider request is sent
    pub on_generating_start: Option<Box<dyn Fn(&str) + Send + Sync>>,
    /// Called once the provider has answered, successfully or not
    pub on_generating_end: Option<Box<dyn Fn() + Send + Sync>>,
}

/// Normalize the dictation and build its prompt. Never fails.
pub async fn prepare_prompt<T>(templates: &T, input: &ProcessInput) -> PreparedPrompt
where
    T: TemplateStore + ?Sized,
{
    let normalized_text = normalize(&input.text);
    log::debug!(
        "Normalized dictation: {} -> {} chars",
        input.text.chars().count(),
        normalized_text.chars().count()
    );

    let template = resolve_template(templates, input.template_name.as_deref()).await;
    let prompt = PromptBundle::build(&normalized_text, template.as_deref());

    PreparedPrompt {
        normalized_text,
        prompt,
    }
}

/// Report synthesis use case
pub struct ProcessTranscriptionUseCase<P, T, R>
where
    P: ModelProvider,
    T: TemplateStore,
    R: ReportStore,
{
    provider: P,
    templates: T,
    reports: R,
    generation: GenerationConfig,
    request_delay: Duration,
}

impl<P, T, R> ProcessTranscriptionUseCase<P, T, R>
where
    P: ModelProvider,
    T: TemplateStore,
    R: ReportStore,
{
    /// Create a new use case with default generation settings and no pre-call delay
    pub fn new(provider: P, templates: T, reports: R) -> Self {
        Self {
            provider,
            templates,
            reports,
            generation: GenerationConfig::default(),
            request_delay: Duration::ZERO,
        }
    }

    /// Set temperature and output token cap
    pub fn with_generation_config(mut self, generation: GenerationConfig) -> Self {
        self.generation = generation;
        self
    }

    /// Pause this long before every provider call
    pub fn with_request_delay(mut self, delay: Duration) -> Self {
        self.request_delay = delay;
        self
    }

    /// Run the pipeline and persist the report
    pub async fn execute(
        &self,
        input: ProcessInput,
        callbacks: &ProcessCallbacks,
    ) -> Result<ProcessOutput, ProcessError> {
        let prepared = prepare_prompt(&self.templates, &input).await;

        if !self.request_delay.is_zero() {
            tokio::time::sleep(self.request_delay).await;
        }

        if let Some(ref cb) = callbacks.on_generating_start {
            cb(self.provider.name());
        }
        log::info!("Requesting report from {}", self.provider.name());

        let response = self.provider.generate(&prepared.prompt, &self.generation).await;

        if let Some(ref cb) = callbacks.on_generating_end {
            cb();
        }

        let processed_text = self.provider.extract_text(&response?)?;

        let report = NewReport::record(
            prepared.normalized_text,
            processed_text,
            input.template_name,
        );
        let stored = self.reports.insert_report(&report).await?;
        log::info!("Stored report {} ({})", stored.id, stored.title);

        Ok(ProcessOutput {
            processed_text: stored.processed_text,
            report_id: stored.id,
        })
    }

    /// Run the pipeline, rendering any failure as an error payload
    pub async fn handle(
        &self,
        input: ProcessInput,
        callbacks: &ProcessCallbacks,
    ) -> Result<ProcessOutput, ErrorPayload> {
        self.execute(input, callbacks).await.map_err(|e| {
            log::error!("Processing failed: {e}");
            error_payload(&e)
        })
    }
}

/// Render an error the way the process endpoint reports it
pub fn error_payload(error: &dyn std::fmt::Display) -> ErrorPayload {
    ErrorPayload {
        error: format!("Error processing text: {error}"),
    }
}
