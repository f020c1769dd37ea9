//! Console summarize command.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use crate::config::Settings;
use crate::controller::{SummarizerController, SummaryRequest, SummaryResponse};
use crate::llm::{ProviderKind, DEFAULT_TEMPERATURE};

use super::helpers;

pub struct SummarizeArgs {
    pub pdf: Option<PathBuf>,
    pub provider: Option<String>,
    pub model: Option<String>,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
    pub json: bool,
}

/// Summarize one PDF, collecting missing arguments interactively.
pub async fn cmd_summarize(mut settings: Settings, args: SummarizeArgs) -> anyhow::Result<()> {
    let pdf_path = match args.pdf {
        Some(path) => path,
        None => helpers::prompt_pdf_path()?,
    };

    let provider = match args.provider {
        Some(tag) => tag,
        None => helpers::prompt_provider()?,
    };

    // The cloud backend cannot run without a credential; collect one here
    // rather than failing after extraction.
    let missing_key = settings
        .openai
        .api_key
        .as_deref()
        .is_none_or(|k| k.trim().is_empty());
    if ProviderKind::from_tag(&provider) == Some(ProviderKind::OpenAi) && missing_key {
        let key = helpers::prompt_line("OpenAI API key", None)?;
        if !key.is_empty() {
            settings.openai.api_key = Some(key);
        }
    }

    let controller = SummarizerController::new(Arc::new(settings));

    let model = match args.model {
        Some(model) => model,
        None => {
            let default = controller.default_model(&provider).map(str::to_string);
            helpers::prompt_line("Model", default.as_deref())?
        }
    };

    let request = SummaryRequest {
        pdf_path,
        provider,
        model,
        temperature: args.temperature.unwrap_or(DEFAULT_TEMPERATURE),
        max_tokens: args.max_tokens,
    };

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {wide_msg}")
            .unwrap(),
    );
    spinner.set_message(format!(
        "Summarizing {} via {}...",
        request.pdf_path.display(),
        request.provider
    ));
    spinner.enable_steady_tick(Duration::from_millis(100));

    let started = Instant::now();
    let result = controller.summarize(&request).await;
    spinner.finish_and_clear();

    match result {
        Ok(response) => {
            if args.json {
                println!("{}", serde_json::to_string_pretty(&response)?);
            } else {
                println!(
                    "{} Summary generated in {:.1}s",
                    style("✓").green(),
                    started.elapsed().as_secs_f64()
                );
                print_response(&response);
            }
            Ok(())
        }
        Err(err) => {
            eprintln!("\n{} {} ({})", style("✗").red(), err, err.kind());
            std::process::exit(1);
        }
    }
}

fn print_response(response: &SummaryResponse) {
    print!("{}", render_response(response));
}

fn render_response(response: &SummaryResponse) -> String {
    let rule = "-".repeat(60);
    let mut out = String::new();

    out.push_str(&format!("\n{}\n{}\n", style("Summary").bold(), rule));
    out.push_str(&format!("{}\n{}\n", response.summary.trim(), rule));

    out.push_str(&format!("\n{}\n", style("Metadata").bold()));
    out.push_str(&format!("  Provider: {}\n", response.provider));
    out.push_str(&format!("  Model: {}\n", response.model));
    if let Some(pages) = response.metadata.get("pdf_pages").and_then(|v| v.as_u64()) {
        out.push_str(&format!("  Pages: {}\n", pages));
    }
    if let Some(meta) = response
        .metadata
        .get("pdf_metadata")
        .and_then(|v| v.as_object())
    {
        if let Some(title) = meta.get("title").and_then(|v| v.as_str()) {
            out.push_str(&format!("  Title: {}\n", title));
        }
        if let Some(author) = meta.get("author").and_then(|v| v.as_str()) {
            out.push_str(&format!("  Author: {}\n", author));
        }
    }
    if let Some(llm) = response
        .metadata
        .get("llm_metadata")
        .and_then(|v| v.as_object())
    {
        for (key, value) in llm {
            match value.as_str() {
                Some(s) => out.push_str(&format!("  {}: {}\n", key, s)),
                None => out.push_str(&format!("  {}: {}\n", key, value)),
            }
        }
    }

    out
}
