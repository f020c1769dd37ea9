//! Summarization service: prompt construction and content truncation.

use serde_json::Value;
use tracing::{debug, info};

use crate::error::SummarizeError;
use crate::extract::DocumentText;
use crate::llm::{GenerationRequest, GenerationResponse, LlmProvider};

/// Default budget for document characters interpolated into the prompt.
pub const DEFAULT_MAX_CONTENT_CHARS: usize = 12_000;

/// Built-in summarization prompt. `{title}`, `{author}`, `{pages}` and
/// `{content}` are interpolated; absent metadata renders as `unknown`.
pub const DEFAULT_SUMMARY_PROMPT: &str = r#"Please write a concise, faithful summary of the following document.

DOCUMENT TITLE: {title}
DOCUMENT AUTHOR: {author}
DOCUMENT PAGES: {pages}

DOCUMENT CONTENT:
{content}

Provide a structured summary covering the main points, key findings, and important details. Do not add information that is not in the document."#;

/// Caller-tunable generation knobs carried from front ends to the service.
#[derive(Debug, Clone)]
pub struct GenerationParams {
    pub model: String,
    pub temperature: f32,
    pub max_tokens: Option<u32>,
}

/// Builds prompts within a character budget and delegates generation.
pub struct SummaryService {
    max_content_chars: usize,
    prompt_template: Option<String>,
}

impl Default for SummaryService {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_CONTENT_CHARS, None)
    }
}

impl SummaryService {
    pub fn new(max_content_chars: usize, prompt_template: Option<String>) -> Self {
        Self {
            max_content_chars,
            prompt_template,
        }
    }

    /// Summarize extracted document text with the given provider.
    ///
    /// Empty text fails before any provider call. Oversized content is cut
    /// deterministically at the budget and flagged in response metadata as
    /// `truncated`. Provider failures pass through unchanged.
    pub async fn summarize(
        &self,
        provider: &dyn LlmProvider,
        document: &DocumentText,
        params: &GenerationParams,
    ) -> Result<GenerationResponse, SummarizeError> {
        if document.text.trim().is_empty() {
            return Err(SummarizeError::invalid_input(
                "document contains no extractable text",
            ));
        }

        let content = self.truncate_content(&document.text);
        let truncated = content.len() < document.text.len();
        if truncated {
            debug!(
                "document content cut from {} to {} chars",
                document.text.len(),
                content.len()
            );
        }

        let prompt = self.render_prompt(document, content);
        let request = GenerationRequest::new(
            prompt,
            params.model.clone(),
            params.temperature,
            params.max_tokens,
        )?;

        info!(
            "requesting summary from {} model {}",
            provider.name(),
            params.model
        );
        let response = provider.generate(&request).await?;

        Ok(response.with_metadata("truncated", Value::Bool(truncated)))
    }

    fn template(&self) -> &str {
        self.prompt_template
            .as_deref()
            .unwrap_or(DEFAULT_SUMMARY_PROMPT)
    }

    fn render_prompt(&self, document: &DocumentText, content: &str) -> String {
        let pages = document
            .page_count
            .map(|n| n.to_string())
            .unwrap_or_else(|| "unknown".to_string());

        self.template()
            .replace("{title}", document.title.as_deref().unwrap_or("unknown"))
            .replace("{author}", document.author.as_deref().unwrap_or("unknown"))
            .replace("{pages}", &pages)
            .replace("{content}", content)
    }

    /// Truncate content to the configured maximum (UTF-8 safe).
    fn truncate_content<'a>(&self, text: &'a str) -> &'a str {
        if text.len() <= self.max_content_chars {
            return text;
        }
        // Find a valid UTF-8 boundary at or before max_content_chars
        let mut end = self.max_content_chars;
        while end > 0 && !text.is_char_boundary(end) {
            end -= 1;
        }
        &text[..end]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::Map;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Test double that records calls and replies with canned text.
    struct RecordingProvider {
        calls: AtomicUsize,
        prompts: Mutex<Vec<String>>,
        reply: Result<String, fn() -> SummarizeError>,
    }

    impl RecordingProvider {
        fn replying(text: &str) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                prompts: Mutex::new(Vec::new()),
                reply: Ok(text.to_string()),
            }
        }

        fn failing(make: fn() -> SummarizeError) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                prompts: Mutex::new(Vec::new()),
                reply: Err(make),
            }
        }
    }

    #[async_trait]
    impl LlmProvider for RecordingProvider {
        fn name(&self) -> &'static str {
            "recording"
        }

        async fn generate(
            &self,
            request: &GenerationRequest,
        ) -> Result<GenerationResponse, SummarizeError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.prompts
                .lock()
                .unwrap()
                .push(request.prompt().to_string());
            match &self.reply {
                Ok(text) => Ok(GenerationResponse {
                    text: text.clone(),
                    model: request.model().to_string(),
                    metadata: Map::new(),
                }),
                Err(make) => Err(make()),
            }
        }
    }

    fn params() -> GenerationParams {
        GenerationParams {
            model: "test-model".to_string(),
            temperature: 0.7,
            max_tokens: Some(256),
        }
    }

    fn document(text: &str) -> DocumentText {
        DocumentText {
            text: text.to_string(),
            title: Some("Quarterly Review".to_string()),
            author: Some("A. Writer".to_string()),
            page_count: Some(3),
        }
    }

    #[tokio::test]
    async fn test_empty_text_fails_before_any_provider_call() {
        let provider = RecordingProvider::replying("unused");
        let service = SummaryService::default();

        for text in ["", "   \n\t  "] {
            let err = service
                .summarize(&provider, &document(text), &params())
                .await
                .unwrap_err();
            assert_eq!(err.kind(), "invalid_input");
        }
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_prompt_interpolates_document_metadata() {
        let provider = RecordingProvider::replying("S");
        let service = SummaryService::default();

        service
            .summarize(&provider, &document("body text"), &params())
            .await
            .unwrap();

        let prompts = provider.prompts.lock().unwrap();
        assert!(prompts[0].contains("DOCUMENT TITLE: Quarterly Review"));
        assert!(prompts[0].contains("DOCUMENT AUTHOR: A. Writer"));
        assert!(prompts[0].contains("DOCUMENT PAGES: 3"));
        assert!(prompts[0].contains("body text"));
    }

    #[tokio::test]
    async fn test_absent_metadata_renders_as_unknown() {
        let provider = RecordingProvider::replying("S");
        let service = SummaryService::default();
        let doc = DocumentText {
            text: "body".to_string(),
            ..Default::default()
        };

        service.summarize(&provider, &doc, &params()).await.unwrap();

        let prompts = provider.prompts.lock().unwrap();
        assert!(prompts[0].contains("DOCUMENT TITLE: unknown"));
        assert!(prompts[0].contains("DOCUMENT PAGES: unknown"));
    }

    #[tokio::test]
    async fn test_custom_template_overrides_default() {
        let provider = RecordingProvider::replying("S");
        let service = SummaryService::new(
            DEFAULT_MAX_CONTENT_CHARS,
            Some("Summarize {title}: {content}".to_string()),
        );

        service
            .summarize(&provider, &document("the text"), &params())
            .await
            .unwrap();

        let prompts = provider.prompts.lock().unwrap();
        assert_eq!(prompts[0], "Summarize Quarterly Review: the text");
    }

    #[tokio::test]
    async fn test_truncation_is_deterministic_and_flagged() {
        let provider = RecordingProvider::replying("S");
        // Two-byte characters ensure the budget lands mid-character.
        let text = "ß".repeat(40);
        let service = SummaryService::new(25, None);

        let first = service
            .summarize(&provider, &document(&text), &params())
            .await
            .unwrap();
        let second = service
            .summarize(&provider, &document(&text), &params())
            .await
            .unwrap();

        assert_eq!(first.metadata["truncated"], Value::Bool(true));
        let prompts = provider.prompts.lock().unwrap();
        assert_eq!(prompts[0], prompts[1]);
        // 25 bytes of two-byte chars backs off to 24 bytes, 12 chars.
        assert!(prompts[0].contains(&"ß".repeat(12)));
        assert!(!prompts[0].contains(&"ß".repeat(13)));
        drop(prompts);

        assert_eq!(second.metadata["truncated"], Value::Bool(true));
    }

    #[tokio::test]
    async fn test_within_budget_content_is_not_flagged() {
        let provider = RecordingProvider::replying("S");
        let service = SummaryService::default();

        let resp = service
            .summarize(&provider, &document("short body"), &params())
            .await
            .unwrap();
        assert_eq!(resp.metadata["truncated"], Value::Bool(false));
        assert_eq!(resp.text, "S");
    }

    #[tokio::test]
    async fn test_provider_failure_passes_through_unchanged() {
        let provider =
            RecordingProvider::failing(|| SummarizeError::connection("backend timed out"));
        let service = SummaryService::default();

        let err = service
            .summarize(&provider, &document("body"), &params())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "connection");
        assert!(err.to_string().contains("backend timed out"));
    }

    #[tokio::test]
    async fn test_invalid_params_rejected_before_provider_call() {
        let provider = RecordingProvider::replying("unused");
        let service = SummaryService::default();
        let bad = GenerationParams {
            model: "m".to_string(),
            temperature: 5.0,
            max_tokens: None,
        };

        let err = service
            .summarize(&provider, &document("body"), &bad)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "invalid_input");
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
    }
}
