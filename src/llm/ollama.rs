//! Adapter for a local Ollama-style generation endpoint.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::SummarizeError;

use super::config::OllamaConfig;
use super::types::{GenerationRequest, GenerationResponse};
use super::{response_excerpt, LlmProvider};

/// Client for Ollama's `/api/generate` endpoint.
pub struct OllamaProvider {
    config: OllamaConfig,
    client: Client,
}

/// Ollama API request format.
#[derive(Debug, Serialize)]
struct OllamaApiRequest {
    model: String,
    prompt: String,
    stream: bool,
    options: OllamaOptions,
}

#[derive(Debug, Serialize)]
struct OllamaOptions {
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    num_predict: Option<u32>,
}

/// Ollama API response format. Timing and count fields are optional
/// because older servers omit them.
#[derive(Debug, Deserialize)]
struct OllamaApiResponse {
    response: String,
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    total_duration: Option<u64>,
    #[serde(default)]
    load_duration: Option<u64>,
    #[serde(default)]
    prompt_eval_count: Option<u64>,
    #[serde(default)]
    eval_count: Option<u64>,
    #[serde(default)]
    eval_duration: Option<u64>,
}

impl OllamaProvider {
    /// Create an adapter from config. Fails when the base URL does not
    /// parse or the HTTP client cannot be built.
    pub fn new(config: OllamaConfig) -> Result<Self, SummarizeError> {
        url::Url::parse(&config.base_url).map_err(|e| {
            SummarizeError::configuration(format!(
                "invalid Ollama base URL '{}': {}",
                config.base_url, e
            ))
        })?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| {
                SummarizeError::configuration(format!("failed to build HTTP client: {}", e))
            })?;

        Ok(Self { config, client })
    }

    fn generate_url(&self) -> String {
        format!(
            "{}/api/generate",
            self.config.base_url.trim_end_matches('/')
        )
    }

    fn build_payload(request: &GenerationRequest) -> OllamaApiRequest {
        OllamaApiRequest {
            model: request.model().to_string(),
            prompt: request.prompt().to_string(),
            stream: false,
            options: OllamaOptions {
                temperature: request.temperature(),
                num_predict: request.max_tokens(),
            },
        }
    }

    fn parse_response(body: OllamaApiResponse, requested_model: &str) -> GenerationResponse {
        let model = body
            .model
            .unwrap_or_else(|| requested_model.to_string());

        let mut metadata = Map::new();
        metadata.insert("model_name".to_string(), Value::from(model.clone()));
        if let Some(v) = body.total_duration {
            metadata.insert("total_duration".to_string(), Value::from(v));
        }
        if let Some(v) = body.load_duration {
            metadata.insert("load_duration".to_string(), Value::from(v));
        }
        if let Some(v) = body.prompt_eval_count {
            metadata.insert("prompt_eval_count".to_string(), Value::from(v));
        }
        if let Some(v) = body.eval_count {
            metadata.insert("eval_count".to_string(), Value::from(v));
        }
        if let Some(v) = body.eval_duration {
            metadata.insert("eval_duration".to_string(), Value::from(v));
        }

        GenerationResponse {
            text: body.response,
            model,
            metadata,
        }
    }
}

#[async_trait]
impl LlmProvider for OllamaProvider {
    fn name(&self) -> &'static str {
        "ollama"
    }

    async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<GenerationResponse, SummarizeError> {
        let payload = Self::build_payload(request);
        let url = self.generate_url();
        debug!("POST {} model={}", url, request.model());

        let resp = self
            .client
            .post(&url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                SummarizeError::connection(format!("request to {} failed: {}", url, e))
            })?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(SummarizeError::invalid_response(format!(
                "Ollama returned HTTP {}: {}",
                status,
                response_excerpt(&body)
            )));
        }

        // The client timeout can also fire while the body is being read.
        let body: OllamaApiResponse = resp.json().await.map_err(|e| {
            if e.is_timeout() {
                SummarizeError::connection(format!("request to {} timed out: {}", url, e))
            } else {
                SummarizeError::invalid_response(format!("failed to decode Ollama response: {}", e))
            }
        })?;

        Ok(Self::parse_response(body, request.model()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(max_tokens: Option<u32>) -> GenerationRequest {
        GenerationRequest::new("summarize the attached report", "llama3.2", 0.7, max_tokens)
            .unwrap()
    }

    #[test]
    fn test_payload_has_documented_fields() {
        let payload = OllamaProvider::build_payload(&request(Some(512)));
        let value = serde_json::to_value(&payload).unwrap();

        assert_eq!(value["model"], "llama3.2");
        assert_eq!(value["prompt"], "summarize the attached report");
        assert_eq!(value["stream"], false);
        assert_eq!(value["options"]["num_predict"], 512);
        let temp = value["options"]["temperature"].as_f64().unwrap();
        assert!((temp - 0.7).abs() < 1e-6);

        let top_level: Vec<&String> = value.as_object().unwrap().keys().collect();
        assert_eq!(top_level, ["model", "options", "prompt", "stream"]);
    }

    #[test]
    fn test_payload_omits_num_predict_when_unset() {
        let payload = OllamaProvider::build_payload(&request(None));
        let value = serde_json::to_value(&payload).unwrap();
        assert!(value["options"].get("num_predict").is_none());
    }

    #[test]
    fn test_parse_response_collects_timing_metadata() {
        let raw = r#"{
            "model": "llama3.2",
            "response": "A short summary.",
            "done": true,
            "total_duration": 5000000000,
            "load_duration": 500000,
            "prompt_eval_count": 26,
            "eval_count": 113,
            "eval_duration": 4000000000
        }"#;
        let body: OllamaApiResponse = serde_json::from_str(raw).unwrap();
        let resp = OllamaProvider::parse_response(body, "llama3.2");

        assert_eq!(resp.text, "A short summary.");
        assert_eq!(resp.model, "llama3.2");
        assert_eq!(resp.metadata["model_name"], "llama3.2");
        assert_eq!(resp.metadata["total_duration"], 5_000_000_000u64);
        assert_eq!(resp.metadata["eval_count"], 113);
    }

    #[test]
    fn test_parse_response_tolerates_minimal_body() {
        let body: OllamaApiResponse =
            serde_json::from_str(r#"{"response": "ok"}"#).unwrap();
        let resp = OllamaProvider::parse_response(body, "llama3.2");
        assert_eq!(resp.text, "ok");
        // Falls back to the requested model when the server omits it.
        assert_eq!(resp.model, "llama3.2");
        assert!(resp.metadata.get("total_duration").is_none());
    }

    #[tokio::test]
    async fn test_stalled_body_times_out_as_connection() {
        use tokio::io::AsyncWriteExt;

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            // Headers promise a body that never finishes arriving.
            let head = b"HTTP/1.1 200 OK\r\ncontent-length: 4096\r\n\r\n{\"re";
            socket.write_all(head).await.unwrap();
            tokio::time::sleep(Duration::from_secs(30)).await;
        });

        let provider = OllamaProvider::new(OllamaConfig {
            base_url: format!("http://{}", addr),
            timeout_secs: 1,
            ..Default::default()
        })
        .unwrap();

        let err = provider.generate(&request(None)).await.unwrap_err();
        assert_eq!(err.kind(), "connection");
        assert!(err.to_string().contains("timed out"));
    }

    #[test]
    fn test_rejects_unparseable_base_url() {
        let config = OllamaConfig {
            base_url: "not a url".to_string(),
            ..Default::default()
        };
        let err = OllamaProvider::new(config).err().unwrap();
        assert_eq!(err.kind(), "configuration");
    }

    #[test]
    fn test_generate_url_handles_trailing_slash() {
        let provider = OllamaProvider::new(OllamaConfig {
            base_url: "http://localhost:11434/".to_string(),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(provider.generate_url(), "http://localhost:11434/api/generate");
    }
}
