//! Adapter for an OpenAI-style chat completions API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::SummarizeError;

use super::config::OpenAiConfig;
use super::types::{GenerationRequest, GenerationResponse};
use super::{response_excerpt, LlmProvider};

/// Completion-token cap sent when a request does not set one.
const DEFAULT_MAX_COMPLETION_TOKENS: u32 = 1024;

/// Client for `/v1/chat/completions` with bearer authentication.
pub struct OpenAiProvider {
    config: OpenAiConfig,
    api_key: String,
    client: Client,
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    choices: Vec<ChatChoice>,
    #[serde(default)]
    usage: Option<ChatUsage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatUsage {
    #[serde(default)]
    prompt_tokens: u64,
    #[serde(default)]
    completion_tokens: u64,
    #[serde(default)]
    total_tokens: u64,
}

/// Error envelope most OpenAI-style servers return.
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
}

impl OpenAiProvider {
    /// Create an adapter from config. A missing or blank API key is fatal
    /// here, before any network activity.
    pub fn new(config: OpenAiConfig) -> Result<Self, SummarizeError> {
        let api_key = match config.api_key.as_deref() {
            Some(key) if !key.trim().is_empty() => key.to_string(),
            _ => {
                return Err(SummarizeError::configuration(
                    "OpenAI API key is not set; provide OPENAI_API_KEY or [openai].api_key",
                ))
            }
        };

        url::Url::parse(&config.base_url).map_err(|e| {
            SummarizeError::configuration(format!(
                "invalid OpenAI base URL '{}': {}",
                config.base_url, e
            ))
        })?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| {
                SummarizeError::configuration(format!("failed to build HTTP client: {}", e))
            })?;

        Ok(Self {
            config,
            api_key,
            client,
        })
    }

    fn build_payload(request: &GenerationRequest) -> ChatRequest {
        ChatRequest {
            model: request.model().to_string(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: request.prompt().to_string(),
            }],
            temperature: request.temperature(),
            max_tokens: request
                .max_tokens()
                .unwrap_or(DEFAULT_MAX_COMPLETION_TOKENS),
        }
    }

    fn parse_response(
        body: ChatResponse,
        requested_model: &str,
    ) -> Result<GenerationResponse, SummarizeError> {
        let model = body
            .model
            .unwrap_or_else(|| requested_model.to_string());

        let choice = body.choices.into_iter().next().ok_or_else(|| {
            SummarizeError::invalid_response("provider returned no choices")
        })?;

        let mut metadata = Map::new();
        metadata.insert("model_name".to_string(), Value::from(model.clone()));
        if let Some(usage) = body.usage {
            metadata.insert("prompt_tokens".to_string(), Value::from(usage.prompt_tokens));
            metadata.insert(
                "completion_tokens".to_string(),
                Value::from(usage.completion_tokens),
            );
            metadata.insert("total_tokens".to_string(), Value::from(usage.total_tokens));
        }
        if let Some(reason) = choice.finish_reason {
            metadata.insert("finish_reason".to_string(), Value::from(reason));
        }

        Ok(GenerationResponse {
            text: choice.message.content,
            model,
            metadata,
        })
    }

    fn map_http_error(status: StatusCode, body: &str) -> SummarizeError {
        let detail = error_message(body).unwrap_or_else(|| response_excerpt(body));
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => SummarizeError::authorization(
                format!("provider rejected credentials (HTTP {}): {}", status.as_u16(), detail),
            ),
            _ => SummarizeError::invalid_response(format!(
                "provider returned HTTP {}: {}",
                status.as_u16(),
                detail
            )),
        }
    }
}

/// Build the chat completions URL, appending `/v1` unless already present.
fn completions_url(base_url: &str) -> String {
    let base = base_url.trim_end_matches('/');
    if base.ends_with("/v1") {
        format!("{}/chat/completions", base)
    } else {
        format!("{}/v1/chat/completions", base)
    }
}

/// Pull the human-readable message out of an OpenAI error envelope.
fn error_message(body: &str) -> Option<String> {
    serde_json::from_str::<ErrorEnvelope>(body)
        .ok()
        .map(|e| e.error.message)
}

#[async_trait]
impl LlmProvider for OpenAiProvider {
    fn name(&self) -> &'static str {
        "openai"
    }

    async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<GenerationResponse, SummarizeError> {
        let payload = Self::build_payload(request);
        let url = completions_url(&self.config.base_url);
        debug!("POST {} model={}", url, request.model());

        let resp = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                SummarizeError::connection(format!("request to {} failed: {}", url, e))
            })?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Self::map_http_error(status, &body));
        }

        // The client timeout can also fire while the body is being read.
        let body: ChatResponse = resp.json().await.map_err(|e| {
            if e.is_timeout() {
                SummarizeError::connection(format!("request to {} timed out: {}", url, e))
            } else {
                SummarizeError::invalid_response(format!(
                    "failed to decode provider response: {}",
                    e
                ))
            }
        })?;

        Self::parse_response(body, request.model())
    }
}
