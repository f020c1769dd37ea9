//! Interactive input helpers for CLI prompts.

use std::io::{self, Write};
use std::path::PathBuf;

use console::style;

use crate::llm::ProviderKind;

/// Prompt for one line of input, returning the default when the answer
/// is empty.
pub fn prompt_line(label: &str, default: Option<&str>) -> io::Result<String> {
    match default {
        Some(d) => print!("{} [{}]: ", label, style(d).dim()),
        None => print!("{}: ", label),
    }
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    let trimmed = input.trim();
    if trimmed.is_empty() {
        Ok(default.unwrap_or_default().to_string())
    } else {
        Ok(trimmed.to_string())
    }
}

/// Prompt until the answer names an existing `.pdf` file.
pub fn prompt_pdf_path() -> io::Result<PathBuf> {
    loop {
        let answer = prompt_line("Path to the PDF file", None)?;
        if answer.is_empty() {
            println!("  {} Please enter a path", style("!").yellow());
            continue;
        }
        let path = PathBuf::from(&answer);
        if !path.exists() {
            println!(
                "  {} File not found: {}",
                style("!").yellow(),
                path.display()
            );
            continue;
        }
        let is_pdf = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"));
        if !is_pdf {
            println!(
                "  {} Not a .pdf file: {}",
                style("!").yellow(),
                path.display()
            );
            continue;
        }
        return Ok(path);
    }
}

/// Prompt for a provider tag until it names a known provider.
pub fn prompt_provider() -> io::Result<String> {
    loop {
        let answer = prompt_line("Provider (ollama/openai)", Some("ollama"))?;
        if ProviderKind::from_tag(&answer).is_some() {
            return Ok(answer);
        }
        println!("  {} Unknown provider '{}'", style("!").yellow(), answer);
    }
}
