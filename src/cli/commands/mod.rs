//! CLI commands implementation.
//!
//! This module contains the CLI parser and dispatches to command-specific modules.

mod helpers;
mod serve;
mod summarize;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::Settings;

#[derive(Parser)]
#[command(name = "pdfsum")]
#[command(about = "Summarize PDF documents with local or cloud LLM backends")]
#[command(version)]
pub struct Cli {
    /// Config file path (defaults to pdfsummarizer.toml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Check if verbose mode is enabled (for early logging setup).
pub fn is_verbose() -> bool {
    std::env::args().any(|arg| arg == "-v" || arg == "--verbose")
}

#[derive(Subcommand)]
enum Commands {
    /// Summarize a PDF document
    Summarize {
        /// Path to the PDF (prompted for when omitted)
        pdf: Option<PathBuf>,

        /// Provider to use: ollama (local) or openai (cloud)
        #[arg(short, long)]
        provider: Option<String>,

        /// Model name (defaults to the configured model for the provider)
        #[arg(short, long)]
        model: Option<String>,

        /// Sampling temperature, 0.0 to 2.0
        #[arg(short, long)]
        temperature: Option<f32>,

        /// Maximum tokens to generate
        #[arg(long)]
        max_tokens: Option<u32>,

        /// Emit the result as JSON instead of formatted text
        #[arg(long)]
        json: bool,
    },

    /// Start the REST server
    Serve {
        /// Bind address: port, host, or host:port
        #[arg(short, long, default_value = "127.0.0.1:8000")]
        bind: String,
    },
}

pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let settings = Settings::load(cli.config.as_deref()).await?;

    match cli.command {
        Commands::Summarize {
            pdf,
            provider,
            model,
            temperature,
            max_tokens,
            json,
        } => {
            summarize::cmd_summarize(
                settings,
                summarize::SummarizeArgs {
                    pdf,
                    provider,
                    model,
                    temperature,
                    max_tokens,
                    json,
                },
            )
            .await
        }
        Commands::Serve { bind } => serve::cmd_serve(settings, &bind).await,
    }
}
