//! Failure taxonomy shared across the summarization pipeline.
//!
//! Everything that can go wrong between reading a PDF and receiving a
//! generation collapses into one of five kinds. Adapters raise the
//! narrowest kind that fits, the service layer passes provider failures
//! through untouched, and front ends translate kinds into exit codes or
//! HTTP statuses without ever inspecting message text.

use thiserror::Error;

/// Errors produced by extraction, validation, provider calls, and setup.
#[derive(Debug, Error)]
pub enum SummarizeError {
    /// Caller-supplied input that cannot be processed: missing or non-PDF
    /// file, empty document text, out-of-range generation parameters.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Broken or missing setup: unknown provider tag, absent API key,
    /// unparseable base URL, extraction tool not installed.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Transport-level failure reaching a backend (refused, DNS, timeout).
    #[error("connection error: {0}")]
    Connection(String),

    /// The backend answered, but unusably: non-2xx status, undecodable
    /// body, or a body with nothing generated in it.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// The backend rejected our credential.
    #[error("authorization error: {0}")]
    Authorization(String),
}

impl SummarizeError {
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    pub fn connection(msg: impl Into<String>) -> Self {
        Self::Connection(msg.into())
    }

    pub fn invalid_response(msg: impl Into<String>) -> Self {
        Self::InvalidResponse(msg.into())
    }

    pub fn authorization(msg: impl Into<String>) -> Self {
        Self::Authorization(msg.into())
    }

    /// Stable snake_case tag used in REST error bodies and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => "invalid_input",
            Self::Configuration(_) => "configuration",
            Self::Connection(_) => "connection",
            Self::InvalidResponse(_) => "invalid_response",
            Self::Authorization(_) => "authorization",
        }
    }
}
