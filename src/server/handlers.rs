//! HTTP request handlers for the web server.
//!
//! This is the only place failure kinds become HTTP statuses; everything
//! below the handlers speaks [`SummarizeError`] kinds.

use std::io::Write;
use std::path::PathBuf;

use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::json;
use tracing::warn;

use super::AppState;
use crate::controller::{SummaryRequest, SummaryResponse};
use crate::error::SummarizeError;
use crate::llm::DEFAULT_TEMPERATURE;

fn default_provider_tag() -> String {
    "ollama".to_string()
}

/// Body of `POST /api/summarize`.
#[derive(Debug, Deserialize)]
pub struct SummarizeParams {
    /// Path to a PDF readable by the server.
    pub pdf_path: String,
    /// Provider tag; defaults to the local backend.
    #[serde(default = "default_provider_tag")]
    pub provider: String,
    /// Model name; defaults to the configured model for the provider.
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub temperature: Option<f32>,
    #[serde(default)]
    pub max_tokens: Option<u32>,
}

/// Service descriptor for discovery.
pub async fn api_root() -> impl IntoResponse {
    Json(json!({
        "service": "pdfsummarizer",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "summarize": "/api/summarize",
            "upload": "/api/summarize/upload",
            "health": "/api/health",
        },
    }))
}

/// Health check endpoint for container orchestration.
pub async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

/// Summarize a PDF already on the server's filesystem.
pub async fn summarize(
    State(state): State<AppState>,
    Json(params): Json<SummarizeParams>,
) -> impl IntoResponse {
    let request = build_request(
        &state,
        PathBuf::from(params.pdf_path),
        params.provider,
        params.model,
        params.temperature,
        params.max_tokens,
    );
    respond(state.controller.summarize(&request).await)
}

/// Summarize an uploaded PDF. The upload is spooled to a temp file that
/// is removed once the request completes.
pub async fn summarize_upload(
    State(state): State<AppState>,
    multipart: Multipart,
) -> impl IntoResponse {
    respond(handle_upload(&state, multipart).await)
}

async fn handle_upload(
    state: &AppState,
    mut multipart: Multipart,
) -> Result<SummaryResponse, SummarizeError> {
    let mut file_bytes: Option<Vec<u8>> = None;
    let mut provider = default_provider_tag();
    let mut model: Option<String> = None;
    let mut temperature: Option<f32> = None;
    let mut max_tokens: Option<u32> = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("file") => {
                let bytes = field.bytes().await.map_err(multipart_error)?;
                file_bytes = Some(bytes.to_vec());
            }
            Some("provider") => {
                provider = field.text().await.map_err(multipart_error)?;
            }
            Some("model") => {
                model = Some(field.text().await.map_err(multipart_error)?);
            }
            Some("temperature") => {
                let text = field.text().await.map_err(multipart_error)?;
                temperature = Some(text.trim().parse().map_err(|_| {
                    SummarizeError::invalid_input(format!("invalid temperature '{}'", text))
                })?);
            }
            Some("max_tokens") => {
                let text = field.text().await.map_err(multipart_error)?;
                max_tokens = Some(text.trim().parse().map_err(|_| {
                    SummarizeError::invalid_input(format!("invalid max_tokens '{}'", text))
                })?);
            }
            _ => {}
        }
    }

    let bytes = file_bytes
        .ok_or_else(|| SummarizeError::invalid_input("missing 'file' part in upload"))?;

    let mut spooled = tempfile::Builder::new()
        .suffix(".pdf")
        .tempfile()
        .map_err(|e| {
            SummarizeError::configuration(format!("failed to create temp file: {}", e))
        })?;
    spooled.write_all(&bytes).map_err(|e| {
        SummarizeError::configuration(format!("failed to spool upload: {}", e))
    })?;

    let request = build_request(
        state,
        spooled.path().to_path_buf(),
        provider,
        model,
        temperature,
        max_tokens,
    );
    // `spooled` stays alive until after the call, then the file is removed.
    state.controller.summarize(&request).await
}

fn multipart_error(e: axum::extract::multipart::MultipartError) -> SummarizeError {
    SummarizeError::invalid_input(format!("malformed multipart request: {}", e))
}

fn build_request(
    state: &AppState,
    pdf_path: PathBuf,
    provider: String,
    model: Option<String>,
    temperature: Option<f32>,
    max_tokens: Option<u32>,
) -> SummaryRequest {
    let model = model
        .or_else(|| state.controller.default_model(&provider).map(str::to_string))
        .unwrap_or_default();
    SummaryRequest {
        pdf_path,
        provider,
        model,
        temperature: temperature.unwrap_or(DEFAULT_TEMPERATURE),
        max_tokens,
    }
}

fn respond(result: Result<SummaryResponse, SummarizeError>) -> Response {
    match result {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(err) => {
            warn!("summarize failed ({}): {}", err.kind(), err);
            (
                status_for(&err),
                Json(json!({ "error_kind": err.kind(), "message": err.to_string() })),
            )
                .into_response()
        }
    }
}

/// The uniform kind-to-status translation for this surface.
fn status_for(err: &SummarizeError) -> StatusCode {
    match err {
        SummarizeError::InvalidInput(_) | SummarizeError::Configuration(_) => {
            StatusCode::BAD_REQUEST
        }
        SummarizeError::Connection(_) => StatusCode::SERVICE_UNAVAILABLE,
        SummarizeError::InvalidResponse(_) | SummarizeError::Authorization(_) => {
            StatusCode::BAD_GATEWAY
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_to_status_mapping() {
        assert_eq!(
            status_for(&SummarizeError::invalid_input("x")),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_for(&SummarizeError::configuration("x")),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_for(&SummarizeError::connection("x")),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            status_for(&SummarizeError::invalid_response("x")),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            status_for(&SummarizeError::authorization("x")),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn test_summarize_params_defaults() {
        let params: SummarizeParams =
            serde_json::from_str(r#"{"pdf_path": "/tmp/a.pdf"}"#).unwrap();
        assert_eq!(params.provider, "ollama");
        assert!(params.model.is_none());
        assert!(params.temperature.is_none());
        assert!(params.max_tokens.is_none());
    }
}
