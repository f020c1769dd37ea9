//! PDF summarization with interchangeable local and cloud LLM backends.
//!
//! Extracts text and metadata from a PDF, builds a summarization prompt
//! within a character budget, and delegates generation to a provider
//! behind the [`llm::LlmProvider`] trait. The same
//! [`controller::SummarizerController`] serves the CLI and the REST
//! server.

pub mod cli;
pub mod config;
pub mod controller;
pub mod error;
pub mod extract;
pub mod llm;
pub mod server;
pub mod services;
