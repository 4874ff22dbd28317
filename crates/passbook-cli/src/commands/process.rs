//! Process command - extract transactions from a single statement.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use chrono::Local;
use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use rust_decimal::Decimal;
use tracing::{debug, info};

use passbook_core::export;
use passbook_core::models::{ProcessingOutcome, Transaction};

/// Arguments for the process command.
#[derive(Args)]
pub struct ProcessArgs {
    /// Input file (PDF, or JSON array of decoded pages)
    #[arg(required = true)]
    input: PathBuf,

    /// Output file or directory (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Password for encrypted PDFs
    #[arg(short, long)]
    password: Option<String>,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// Full outcome as JSON
    Json,
    /// Transactions as CSV
    Csv,
    /// Plain text table
    Text,
    /// Status record as JSON
    Status,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Json | OutputFormat::Status => "json",
            OutputFormat::Csv => "csv",
            OutputFormat::Text => "txt",
        }
    }
}

pub async fn run(args: ProcessArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = super::load_config(config_path)?;

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    info!("Processing file: {}", args.input.display());

    let pb = ProgressBar::new(100);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] {bar:40.cyan/blue} {msg}")?
            .progress_chars("##-"),
    );
    pb.set_message("Extracting transactions...");
    pb.set_position(10);

    let outcome = super::process_file(&args.input, &config, args.password.as_deref())?;

    pb.set_position(100);
    pb.finish_and_clear();

    if !outcome.success {
        let message = outcome
            .error_message
            .clone()
            .unwrap_or_else(|| "Processing failed".to_string());
        if let Some(rendered) = format_failure(&outcome, args.format)? {
            emit(&rendered, args.output.as_deref(), &args.input, &outcome, args.format)?;
        }
        eprintln!("{} {}", style("✗").red(), message);
        anyhow::bail!("Failed to process {}: {}", args.input.display(), message);
    }

    let rendered = format_outcome(&outcome, args.format)?;

    if let Some(output) = &args.output {
        let output_path = resolve_output(output, &args.input, &outcome, args.format);
        fs::write(&output_path, &rendered)?;
        println!(
            "{} {} transactions from {} written to {}",
            style("✓").green(),
            outcome.transaction_count(),
            outcome.bank_name(),
            output_path.display()
        );
    } else {
        println!("{}", rendered);
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

/// Rendering of a failed outcome; only the JSON formats carry the failure.
fn format_failure(
    outcome: &ProcessingOutcome,
    format: OutputFormat,
) -> anyhow::Result<Option<String>> {
    match format {
        OutputFormat::Json | OutputFormat::Status => Ok(Some(format_outcome(outcome, format)?)),
        OutputFormat::Csv | OutputFormat::Text => Ok(None),
    }
}

fn emit(
    rendered: &str,
    output: Option<&Path>,
    input: &Path,
    outcome: &ProcessingOutcome,
    format: OutputFormat,
) -> anyhow::Result<()> {
    match output {
        Some(output) => fs::write(resolve_output(output, input, outcome, format), rendered)?,
        None => println!("{}", rendered),
    }
    Ok(())
}

/// Output file for `output`; a directory gets a generated name.
///
/// CSV downloads are named after the bank and today's date.
fn resolve_output(
    output: &Path,
    input: &Path,
    outcome: &ProcessingOutcome,
    format: OutputFormat,
) -> PathBuf {
    if !output.is_dir() {
        return output.to_path_buf();
    }
    match format {
        OutputFormat::Csv => output.join(export::download_filename(
            outcome.bank_name(),
            Local::now().date_naive(),
        )),
        _ => {
            let stem = input
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("statement");
            output.join(format!("{}.{}", stem, format.extension()))
        }
    }
}

/// Render an outcome in the requested format.
pub fn format_outcome(outcome: &ProcessingOutcome, format: OutputFormat) -> anyhow::Result<String> {
    let output = match format {
        OutputFormat::Json => export::to_json(outcome, true)?,
        OutputFormat::Csv => export::outcome_to_csv(outcome)?,
        OutputFormat::Status => export::status_json(outcome, true)?,
        OutputFormat::Text => format_text(outcome),
    };
    Ok(output)
}

fn format_text(outcome: &ProcessingOutcome) -> String {
    let mut output = String::new();

    output.push_str(&format!("Bank: {}\n", outcome.bank_name()));
    if let Some(range) = &outcome.date_range {
        output.push_str(&format!("Period: {} to {}\n", range.start, range.end));
    }
    output.push_str(&format!("Transactions: {}\n\n", outcome.transaction_count()));

    output.push_str(&format!(
        "{:<10}  {:<40}  {:>12}  {:>12}  {:>12}\n",
        "Date", "Particulars", "Debit", "Credit", "Balance"
    ));
    for tx in &outcome.transactions {
        output.push_str(&format_row(tx));
    }

    output
}

fn format_row(tx: &Transaction) -> String {
    let cell = |value: Option<Decimal>| value.map(|v| v.to_string()).unwrap_or_default();
    let description: String = tx.description.chars().take(40).collect();
    format!(
        "{:<10}  {:<40}  {:>12}  {:>12}  {:>12}\n",
        tx.date,
        description,
        cell(tx.debit),
        cell(tx.credit),
        cell(tx.balance)
    )
}
