//! Orchestration: provider resolution, extraction, summarization, assembly.
//!
//! [`SummarizerController`] is what both front ends call. It owns the
//! extraction boundary and the summary service, resolves provider tags
//! into adapters, and assembles the response shape front ends present.

use std::path::PathBuf;
use std::sync::Arc;

use serde::Serialize;
use serde_json::{json, Value};
use tracing::info;

use crate::config::Settings;
use crate::error::SummarizeError;
use crate::extract::{PopplerExtractor, TextExtractor};
use crate::llm::{
    LlmProvider, OllamaProvider, OpenAiProvider, ProviderKind, DEFAULT_TEMPERATURE,
};
use crate::services::{GenerationParams, SummaryService};

/// One summarization job as front ends describe it.
#[derive(Debug, Clone)]
pub struct SummaryRequest {
    pub pdf_path: PathBuf,
    /// Provider tag, e.g. `ollama` or `openai`.
    pub provider: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: Option<u32>,
}

impl SummaryRequest {
    /// Request with default sampling parameters.
    pub fn new(
        pdf_path: impl Into<PathBuf>,
        provider: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            pdf_path: pdf_path.into(),
            provider: provider.into(),
            model: model.into(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: None,
        }
    }
}

/// What the controller hands back to front ends.
#[derive(Debug, Clone, Serialize)]
pub struct SummaryResponse {
    /// The generated summary text.
    pub summary: String,
    /// Model the backend reports having used.
    pub model: String,
    /// Canonical name of the adapter that served the request.
    pub provider: String,
    /// `pdf_pages`, `pdf_metadata` and `llm_metadata` (which includes the
    /// `truncated` flag).
    pub metadata: Value,
    /// RFC 3339 timestamp of when the summary was produced.
    pub generated_at: String,
}

/// Orchestrates one summarization end to end. Stateless across calls, so
/// concurrent summarizations do not interfere.
pub struct SummarizerController {
    settings: Arc<Settings>,
    extractor: Box<dyn TextExtractor>,
    service: SummaryService,
}

impl SummarizerController {
    /// Controller with the shipping poppler-based extractor.
    pub fn new(settings: Arc<Settings>) -> Self {
        Self::with_extractor(settings, Box::new(PopplerExtractor::new()))
    }

    /// Controller with a caller-supplied extraction boundary.
    pub fn with_extractor(settings: Arc<Settings>, extractor: Box<dyn TextExtractor>) -> Self {
        let service = SummaryService::new(
            settings.summary.max_content_chars,
            settings.summary.prompt.clone(),
        );
        Self {
            settings,
            extractor,
            service,
        }
    }

    /// Build the adapter a tag names. Unknown tags and broken adapter
    /// setup both fail here, before any document work happens.
    pub fn resolve_provider(&self, tag: &str) -> Result<Box<dyn LlmProvider>, SummarizeError> {
        let kind = ProviderKind::from_tag(tag).ok_or_else(|| {
            SummarizeError::configuration(format!(
                "unknown provider '{}'; expected 'ollama' or 'openai'",
                tag
            ))
        })?;

        match kind {
            ProviderKind::Ollama => Ok(Box::new(OllamaProvider::new(
                self.settings.ollama.clone(),
            )?)),
            ProviderKind::OpenAi => Ok(Box::new(OpenAiProvider::new(
                self.settings.openai.clone(),
            )?)),
        }
    }

    /// Configured default model for a provider tag.
    pub fn default_model(&self, tag: &str) -> Option<&str> {
        match ProviderKind::from_tag(tag)? {
            ProviderKind::Ollama => Some(self.settings.ollama.model.as_str()),
            ProviderKind::OpenAi => Some(self.settings.openai.model.as_str()),
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Summarize one PDF end to end.
    pub async fn summarize(
        &self,
        request: &SummaryRequest,
    ) -> Result<SummaryResponse, SummarizeError> {
        let provider = self.resolve_provider(&request.provider)?;
        self.summarize_with(provider.as_ref(), request).await
    }

    /// Summarize with a caller-supplied provider, skipping tag resolution.
    pub async fn summarize_with(
        &self,
        provider: &dyn LlmProvider,
        request: &SummaryRequest,
    ) -> Result<SummaryResponse, SummarizeError> {
        info!(
            "summarizing {} via {}",
            request.pdf_path.display(),
            provider.name()
        );
        let document = self.extractor.extract(&request.pdf_path).await?;

        let params = GenerationParams {
            model: request.model.clone(),
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        };
        let generation = self.service.summarize(provider, &document, &params).await?;

        let metadata = json!({
            "pdf_pages": document.page_count,
            "pdf_metadata": {
                "title": document.title,
                "author": document.author,
            },
            "llm_metadata": Value::Object(generation.metadata),
        });

        Ok(SummaryResponse {
            summary: generation.text,
            model: generation.model,
            provider: provider.name().to_string(),
            metadata,
            generated_at: chrono::Utc::now().to_rfc3339(),
        })
    }
}
