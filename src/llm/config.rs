//! Adapter configuration with environment variable overrides.

use serde::{Deserialize, Serialize};

fn default_timeout_secs() -> u64 {
    60
}

/// Configuration for the local Ollama-style backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OllamaConfig {
    /// Base URL of the Ollama server.
    #[serde(default = "default_ollama_base_url")]
    pub base_url: String,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Model used when the caller does not name one.
    #[serde(default = "default_ollama_model")]
    pub model: String,
}

fn default_ollama_base_url() -> String {
    "http://localhost:11434".to_string()
}

fn default_ollama_model() -> String {
    "llama3.2".to_string()
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            base_url: default_ollama_base_url(),
            timeout_secs: default_timeout_secs(),
            model: default_ollama_model(),
        }
    }
}

impl OllamaConfig {
    /// Apply environment variable overrides.
    ///
    /// Supported env vars:
    /// - `OLLAMA_BASE_URL`: server base URL
    /// - `OLLAMA_TIMEOUT_SECS`: request timeout in seconds
    /// - `OLLAMA_MODEL`: default model name
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(val) = std::env::var("OLLAMA_BASE_URL") {
            if !val.is_empty() {
                self.base_url = val;
            }
        }
        if let Ok(val) = std::env::var("OLLAMA_TIMEOUT_SECS") {
            if let Ok(n) = val.parse() {
                self.timeout_secs = n;
            }
        }
        if let Ok(val) = std::env::var("OLLAMA_MODEL") {
            if !val.is_empty() {
                self.model = val;
            }
        }
        self
    }
}

/// Configuration for the cloud OpenAI-style backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpenAiConfig {
    /// Base URL of the API. `/v1/chat/completions` is appended unless the
    /// URL already ends in `/v1`.
    #[serde(default = "default_openai_base_url")]
    pub base_url: String,
    /// API key. Required before the adapter can be constructed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Model used when the caller does not name one.
    #[serde(default = "default_openai_model")]
    pub model: String,
}

fn default_openai_base_url() -> String {
    "https://api.openai.com".to_string()
}

fn default_openai_model() -> String {
    "gpt-4o-mini".to_string()
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            base_url: default_openai_base_url(),
            api_key: None,
            timeout_secs: default_timeout_secs(),
            model: default_openai_model(),
        }
    }
}

impl OpenAiConfig {
    /// Apply environment variable overrides.
    ///
    /// Supported env vars:
    /// - `OPENAI_BASE_URL`: API base URL
    /// - `OPENAI_API_KEY`: credential
    /// - `OPENAI_TIMEOUT_SECS`: request timeout in seconds
    /// - `OPENAI_MODEL`: default model name
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(val) = std::env::var("OPENAI_BASE_URL") {
            if !val.is_empty() {
                self.base_url = val;
            }
        }
        if let Ok(val) = std::env::var("OPENAI_API_KEY") {
            if !val.is_empty() {
                self.api_key = Some(val);
            }
        }
        if let Ok(val) = std::env::var("OPENAI_TIMEOUT_SECS") {
            if let Ok(n) = val.parse() {
                self.timeout_secs = n;
            }
        }
        if let Ok(val) = std::env::var("OPENAI_MODEL") {
            if !val.is_empty() {
                self.model = val;
            }
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ollama_defaults() {
        let config = OllamaConfig::default();
        assert_eq!(config.base_url, "http://localhost:11434");
        assert_eq!(config.timeout_secs, 60);
        assert!(!config.model.is_empty());
    }

    #[test]
    fn test_openai_defaults_have_no_key() {
        let config = OpenAiConfig::default();
        assert_eq!(config.base_url, "https://api.openai.com");
        assert!(config.api_key.is_none());
    }

    #[test]
    fn test_configs_deserialize_from_partial_toml() {
        let config: OllamaConfig = toml::from_str("base_url = \"http://10.0.0.5:11434\"")
            .expect("partial config should fill in defaults");
        assert_eq!(config.base_url, "http://10.0.0.5:11434");
        assert_eq!(config.timeout_secs, 60);

        let config: OpenAiConfig = toml::from_str("api_key = \"sk-test\"")
            .expect("partial config should fill in defaults");
        assert_eq!(config.api_key.as_deref(), Some("sk-test"));
        assert_eq!(config.base_url, "https://api.openai.com");
    }
}
