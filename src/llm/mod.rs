//! LLM provider abstraction and concrete adapters.
//!
//! [`LlmProvider`] is the seam between the summarization service and
//! backend-specific wire formats. Two adapters ship: [`OllamaProvider`]
//! for a local Ollama-style server and [`OpenAiProvider`] for an
//! OpenAI-style cloud API. Front ends select one by tag through
//! [`ProviderKind::from_tag`].

mod config;
mod ollama;
mod openai;
mod types;

use async_trait::async_trait;

use crate::error::SummarizeError;

pub use config::{OllamaConfig, OpenAiConfig};
pub use ollama::OllamaProvider;
pub use openai::OpenAiProvider;
pub use types::{
    GenerationRequest, GenerationResponse, DEFAULT_TEMPERATURE, MAX_TEMPERATURE, MIN_TEMPERATURE,
};

/// A text-generation backend.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Short stable name used in logs and response metadata.
    fn name(&self) -> &'static str;

    /// Run one generation request to completion.
    async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<GenerationResponse, SummarizeError>;
}

/// Known provider tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    /// Local Ollama-style server.
    Ollama,
    /// OpenAI-style cloud API.
    OpenAi,
}

impl ProviderKind {
    /// Parse a user-facing provider tag. Case-insensitive, accepts aliases.
    pub fn from_tag(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "ollama" | "local" => Some(Self::Ollama),
            "openai" | "cloud" => Some(Self::OpenAi),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ollama => "ollama",
            Self::OpenAi => "openai",
        }
    }
}

/// Maximum bytes of a backend body quoted in error messages.
const EXCERPT_MAX_BYTES: usize = 200;

/// Shorten a response body for inclusion in an error message (UTF-8 safe).
pub(crate) fn response_excerpt(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.len() <= EXCERPT_MAX_BYTES {
        return trimmed.to_string();
    }
    let mut end = EXCERPT_MAX_BYTES;
    while end > 0 && !trimmed.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &trimmed[..end])
}
