//! Service layer for summarization business logic.
//!
//! Domain logic separated from UI concerns, so the same code serves the
//! CLI and the REST server.

pub mod summarize;

pub use summarize::{
    GenerationParams, SummaryService, DEFAULT_MAX_CONTENT_CHARS, DEFAULT_SUMMARY_PROMPT,
};
