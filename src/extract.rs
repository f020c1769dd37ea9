//! PDF text and metadata extraction via poppler-utils.
//!
//! Extraction sits behind the [`TextExtractor`] trait so the pipeline and
//! its tests never depend on the actual binaries. The shipping
//! implementation shells out to `pdftotext` for content and `pdfinfo` for
//! title/author/page metadata.

use std::path::Path;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use crate::error::SummarizeError;

/// Text and metadata pulled out of one document.
#[derive(Debug, Clone, Default)]
pub struct DocumentText {
    /// Extracted text content.
    pub text: String,
    /// Document title, when the PDF declares one.
    pub title: Option<String>,
    /// Document author, when the PDF declares one.
    pub author: Option<String>,
    /// Number of pages.
    pub page_count: Option<u32>,
}

/// Boundary between the pipeline and whatever turns a PDF into text.
#[async_trait]
pub trait TextExtractor: Send + Sync {
    async fn extract(&self, path: &Path) -> Result<DocumentText, SummarizeError>;
}

/// Extractor backed by poppler's `pdftotext` and `pdfinfo`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PopplerExtractor;

impl PopplerExtractor {
    pub fn new() -> Self {
        Self
    }

    async fn run_pdftotext(&self, path: &Path) -> Result<String, SummarizeError> {
        let result = Command::new("pdftotext")
            .args(["-layout", "-enc", "UTF-8"])
            .arg(path)
            .arg("-")
            .output()
            .await;
        handle_tool_output(result, "pdftotext")
    }

    async fn run_pdfinfo(&self, path: &Path) -> Result<String, SummarizeError> {
        let result = Command::new("pdfinfo").arg(path).output().await;
        handle_tool_output(result, "pdfinfo")
    }
}

#[async_trait]
impl TextExtractor for PopplerExtractor {
    async fn extract(&self, path: &Path) -> Result<DocumentText, SummarizeError> {
        if !path.exists() {
            return Err(SummarizeError::invalid_input(format!(
                "PDF file not found: {}",
                path.display()
            )));
        }
        check_is_pdf(path)?;

        let text = self.run_pdftotext(path).await?;
        debug!(
            "pdftotext extracted {} chars from {}",
            text.len(),
            path.display()
        );

        // Metadata failure only costs us title/author/pages, not the summary.
        let (title, author, page_count) = match self.run_pdfinfo(path).await {
            Ok(output) => parse_pdfinfo(&output),
            Err(e) => {
                debug!("pdfinfo failed for {}: {}", path.display(), e);
                (None, None, None)
            }
        };

        Ok(DocumentText {
            text,
            title,
            author,
            page_count,
        })
    }
}

/// Verify the file's magic bytes say PDF before shelling out.
fn check_is_pdf(path: &Path) -> Result<(), SummarizeError> {
    let kind = infer::get_from_path(path).map_err(|e| {
        SummarizeError::invalid_input(format!("failed to read {}: {}", path.display(), e))
    })?;
    match kind {
        Some(k) if k.mime_type() == "application/pdf" => Ok(()),
        _ => Err(SummarizeError::invalid_input(format!(
            "{} is not a PDF file",
            path.display()
        ))),
    }
}

/// Turn tool output into text, classifying the two interesting failures:
/// binary missing (setup problem) and nonzero exit (unusable document).
fn handle_tool_output(
    result: std::io::Result<std::process::Output>,
    tool: &str,
) -> Result<String, SummarizeError> {
    match result {
        Ok(output) if output.status.success() => {
            Ok(String::from_utf8_lossy(&output.stdout).to_string())
        }
        Ok(output) => {
            let stderr = String::from_utf8_lossy(&output.stderr);
            Err(SummarizeError::invalid_input(format!(
                "{} failed: {}",
                tool,
                stderr.trim()
            )))
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(SummarizeError::configuration(format!(
                "{} not found; install poppler-utils",
                tool
            )))
        }
        Err(e) => Err(SummarizeError::configuration(format!(
            "{} could not run: {}",
            tool, e
        ))),
    }
}

/// Pull Title/Author/Pages out of pdfinfo's line-based output.
fn parse_pdfinfo(output: &str) -> (Option<String>, Option<String>, Option<u32>) {
    let mut title = None;
    let mut author = None;
    let mut pages = None;

    for line in output.lines() {
        if let Some(rest) = line.strip_prefix("Title:") {
            let value = rest.trim();
            if !value.is_empty() {
                title = Some(value.to_string());
            }
        } else if let Some(rest) = line.strip_prefix("Author:") {
            let value = rest.trim();
            if !value.is_empty() {
                author = Some(value.to_string());
            }
        } else if let Some(rest) = line.strip_prefix("Pages:") {
            pages = rest.trim().parse().ok();
        }
    }

    (title, author, pages)
}
