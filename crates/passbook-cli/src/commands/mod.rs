//! CLI subcommands.

pub mod batch;
pub mod config;
pub mod process;

use std::fs;
use std::path::Path;

use tracing::debug;

use passbook_core::models::{PageContent, PassbookConfig, ProcessingOutcome};
use passbook_core::pdf::PdfExtractor;
use passbook_core::statement::StatementEngine;

/// Load the configuration file if one was given, otherwise defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<PassbookConfig> {
    let config = if let Some(path) = config_path {
        PassbookConfig::from_file(Path::new(path))?
    } else {
        PassbookConfig::default()
    };
    Ok(config)
}

/// Whether a file is an input the engine accepts.
pub fn is_supported_input(path: &Path) -> bool {
    matches!(input_kind(path).as_str(), "pdf" | "json")
}

fn input_kind(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase()
}

/// Extract transactions from a PDF or from a JSON file of decoded pages.
///
/// `password` wins over the configured one.
pub fn process_file(
    path: &Path,
    config: &PassbookConfig,
    password: Option<&str>,
) -> anyhow::Result<ProcessingOutcome> {
    let engine = StatementEngine::new(config.clone());

    match input_kind(path).as_str() {
        "pdf" => {
            let data = fs::read(path)?;
            let extractor = PdfExtractor::from_config(&config.pdf);
            let password = password.or(config.pdf.password.as_deref());
            debug!("Decoding {} ({} bytes)", path.display(), data.len());
            Ok(engine.process_document(&extractor, &data, password))
        }
        "json" => {
            let content = fs::read_to_string(path)?;
            let pages: Vec<PageContent> = serde_json::from_str(&content)?;
            debug!("Loaded {} pre-decoded pages from {}", pages.len(), path.display());
            Ok(engine.process_pages(&pages))
        }
        other => anyhow::bail!("Unsupported file format: {}", other),
    }
}
