//! Provider-agnostic request and response types for text generation.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::SummarizeError;

/// Lowest temperature the validating constructor accepts.
pub const MIN_TEMPERATURE: f32 = 0.0;
/// Highest temperature the validating constructor accepts.
pub const MAX_TEMPERATURE: f32 = 2.0;
/// Temperature used when the caller does not pick one.
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

/// A validated, immutable text-generation request.
///
/// Instances only come out of [`GenerationRequest::new`], which rejects
/// empty prompts and models and out-of-range sampling parameters, so
/// adapters never re-check them.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    prompt: String,
    model: String,
    temperature: f32,
    max_tokens: Option<u32>,
}

impl GenerationRequest {
    /// Validate and build a request.
    pub fn new(
        prompt: impl Into<String>,
        model: impl Into<String>,
        temperature: f32,
        max_tokens: Option<u32>,
    ) -> Result<Self, SummarizeError> {
        let prompt = prompt.into();
        let model = model.into();

        if prompt.trim().is_empty() {
            return Err(SummarizeError::invalid_input("prompt must not be empty"));
        }
        if model.trim().is_empty() {
            return Err(SummarizeError::invalid_input(
                "model name must not be empty",
            ));
        }
        if !(MIN_TEMPERATURE..=MAX_TEMPERATURE).contains(&temperature) {
            return Err(SummarizeError::invalid_input(format!(
                "temperature {} is outside the allowed range {} to {}",
                temperature, MIN_TEMPERATURE, MAX_TEMPERATURE
            )));
        }
        if max_tokens == Some(0) {
            return Err(SummarizeError::invalid_input("max_tokens must be positive"));
        }

        Ok(Self {
            prompt,
            model,
            temperature,
            max_tokens,
        })
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn temperature(&self) -> f32 {
        self.temperature
    }

    pub fn max_tokens(&self) -> Option<u32> {
        self.max_tokens
    }
}

/// What a provider produced for one request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationResponse {
    /// Generated text.
    pub text: String,
    /// Model the backend reports having used.
    pub model: String,
    /// Backend-specific scalars: timings, token counts, finish reason.
    #[serde(default)]
    pub metadata: Map<String, Value>,
}

impl GenerationResponse {
    /// Copy of this response with one more metadata entry.
    pub fn with_metadata(mut self, key: &str, value: Value) -> Self {
        self.metadata.insert(key.to_string(), value);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_accepts_valid_parameters() {
        let req = GenerationRequest::new("summarize this", "llama3.2", 0.7, Some(512))
            .expect("valid request");
        assert_eq!(req.prompt(), "summarize this");
        assert_eq!(req.model(), "llama3.2");
        assert_eq!(req.temperature(), 0.7);
        assert_eq!(req.max_tokens(), Some(512));
    }

    #[test]
    fn test_request_rejects_empty_prompt() {
        let err = GenerationRequest::new("   ", "llama3.2", 0.7, None).unwrap_err();
        assert_eq!(err.kind(), "invalid_input");
    }

    #[test]
    fn test_request_rejects_empty_model() {
        let err = GenerationRequest::new("text", "", 0.7, None).unwrap_err();
        assert_eq!(err.kind(), "invalid_input");
    }

    #[test]
    fn test_request_rejects_out_of_range_temperature() {
        assert!(GenerationRequest::new("text", "m", -0.1, None).is_err());
        assert!(GenerationRequest::new("text", "m", 2.1, None).is_err());
        // Range edges are allowed.
        assert!(GenerationRequest::new("text", "m", 0.0, None).is_ok());
        assert!(GenerationRequest::new("text", "m", 2.0, None).is_ok());
    }

    #[test]
    fn test_request_rejects_zero_max_tokens() {
        let err = GenerationRequest::new("text", "m", 0.7, Some(0)).unwrap_err();
        assert_eq!(err.kind(), "invalid_input");
        assert!(GenerationRequest::new("text", "m", 0.7, None).is_ok());
    }

    #[test]
    fn test_response_with_metadata_appends() {
        let resp = GenerationResponse {
            text: "summary".to_string(),
            model: "m".to_string(),
            metadata: Map::new(),
        };
        let resp = resp.with_metadata("truncated", Value::Bool(true));
        assert_eq!(resp.metadata.get("truncated"), Some(&Value::Bool(true)));
    }
}
