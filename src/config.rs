//! Application configuration: optional TOML file plus environment overrides.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::SummarizeError;
use crate::llm::{OllamaConfig, OpenAiConfig};
use crate::services::DEFAULT_MAX_CONTENT_CHARS;

/// Config filename looked for in the working directory when `--config`
/// is not given.
pub const DEFAULT_CONFIG_FILENAME: &str = "pdfsummarizer.toml";

/// Settings for prompt construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryConfig {
    /// Maximum document characters interpolated into the prompt.
    #[serde(default = "default_max_content_chars")]
    pub max_content_chars: usize,
    /// Custom prompt template. Supports `{title}`, `{author}`, `{pages}`
    /// and `{content}` placeholders.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
}

fn default_max_content_chars() -> usize {
    DEFAULT_MAX_CONTENT_CHARS
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            max_content_chars: default_max_content_chars(),
            prompt: None,
        }
    }
}

impl SummaryConfig {
    /// Apply environment variable overrides.
    ///
    /// Supported env vars:
    /// - `SUMMARY_MAX_CONTENT_CHARS`: prompt content budget
    /// - `SUMMARY_PROMPT`: custom prompt template
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(val) = std::env::var("SUMMARY_MAX_CONTENT_CHARS") {
            if let Ok(n) = val.parse() {
                self.max_content_chars = n;
            }
        }
        if let Ok(val) = std::env::var("SUMMARY_PROMPT") {
            if !val.is_empty() {
                self.prompt = Some(val);
            }
        }
        self
    }
}

/// Application settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Local Ollama-style backend.
    #[serde(default)]
    pub ollama: OllamaConfig,
    /// Cloud OpenAI-style backend.
    #[serde(default)]
    pub openai: OpenAiConfig,
    /// Prompt construction settings.
    #[serde(default)]
    pub summary: SummaryConfig,
}

impl Settings {
    /// Load settings: explicit config file if given, otherwise
    /// `pdfsummarizer.toml` from the working directory if present,
    /// otherwise defaults. Environment overrides apply last.
    pub async fn load(config_path: Option<&Path>) -> Result<Self, SummarizeError> {
        let settings = match config_path {
            Some(path) => Self::from_file(path).await?,
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_FILENAME);
                if default_path.exists() {
                    Self::from_file(default_path).await?
                } else {
                    Self::default()
                }
            }
        };
        Ok(settings.with_env_overrides())
    }

    /// Load settings from a TOML file.
    pub async fn from_file(path: &Path) -> Result<Self, SummarizeError> {
        let contents = tokio::fs::read_to_string(path).await.map_err(|e| {
            SummarizeError::configuration(format!(
                "failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;
        toml::from_str(&contents).map_err(|e| {
            SummarizeError::configuration(format!("failed to parse {}: {}", path.display(), e))
        })
    }

    /// Apply environment variable overrides to every section.
    pub fn with_env_overrides(mut self) -> Self {
        self.ollama = self.ollama.with_env_overrides();
        self.openai = self.openai.with_env_overrides();
        self.summary = self.summary.with_env_overrides();
        self
    }
}
