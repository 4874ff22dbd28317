//! Batch processing command for multiple statement files.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, error, warn};

use passbook_core::error::ErrorKind;
use passbook_core::models::ProcessingOutcome;
use passbook_core::store::{JobRecord, JobStatus, JobStore, MemoryJobStore};

use super::process::{format_outcome, OutputFormat};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Input files or glob pattern
    #[arg(required = true)]
    input: String,

    /// Output directory
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Output format for each file
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Also generate a summary CSV
    #[arg(long)]
    summary: bool,

    /// Number of parallel workers
    #[arg(short = 'j', long, default_value = "4")]
    jobs: usize,

    /// Continue on error
    #[arg(long)]
    continue_on_error: bool,

    /// Password for encrypted PDFs
    #[arg(short, long)]
    password: Option<String>,
}

/// A finished job as returned by a worker.
struct Finished {
    id: String,
    path: PathBuf,
    outcome: ProcessingOutcome,
    elapsed: Duration,
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = Arc::new(super::load_config(config_path)?);

    let files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| super::is_supported_input(p))
        .collect();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    println!(
        "{} Found {} files to process",
        style("ℹ").blue(),
        files.len()
    );

    if let Some(ref output_dir) = args.output_dir {
        fs::create_dir_all(output_dir)?;
    }

    let store = MemoryJobStore::new();
    let jobs: Vec<(String, PathBuf)> = files
        .into_iter()
        .enumerate()
        .map(|(i, path)| {
            let id = format!("job-{:04}", i + 1);
            store.put(JobRecord::new(id.clone(), file_name(&path)));
            (id, path)
        })
        .collect();

    let pb = ProgressBar::new(jobs.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")?
            .progress_chars("=>-"),
    );

    let semaphore = Arc::new(Semaphore::new(args.jobs.max(1)));
    let mut workers = JoinSet::new();

    for (id, path) in jobs {
        let permit = semaphore.clone().acquire_owned().await?;
        let config = Arc::clone(&config);
        let store = store.clone();
        let password = args.password.clone();

        workers.spawn_blocking(move || {
            let _permit = permit;
            store.update(&id, JobRecord::start);

            let file_start = Instant::now();
            let outcome = super::process_file(&path, &config, password.as_deref())
                .unwrap_or_else(|e| {
                    ProcessingOutcome::failure_with_message(
                        ErrorKind::DecodeFailure,
                        None,
                        e.to_string(),
                    )
                });

            Finished {
                id,
                path,
                outcome,
                elapsed: file_start.elapsed(),
            }
        });
    }

    while let Some(joined) = workers.join_next().await {
        let finished = joined?;
        pb.inc(1);

        if !finished.outcome.success {
            let message = finished.outcome.error_message.clone().unwrap_or_default();
            if args.continue_on_error {
                warn!("Failed to process {}: {}", finished.path.display(), message);
            } else {
                error!("Failed to process {}: {}", finished.path.display(), message);
                workers.abort_all();
                pb.abandon();
                anyhow::bail!("Processing failed: {}", message);
            }
        } else if let Some(output_dir) = &args.output_dir {
            write_output(output_dir, &finished, args.format)?;
        }

        debug!(
            "{} finished in {}ms",
            finished.path.display(),
            finished.elapsed.as_millis()
        );
        store.update(&finished.id, |record| record.finish(finished.outcome));
    }

    pb.finish_with_message("Complete");

    let records = store.list();

    if args.summary {
        let summary_path = args
            .output_dir
            .as_ref()
            .map(|d| d.join("summary.csv"))
            .unwrap_or_else(|| PathBuf::from("summary.csv"));

        write_summary(&summary_path, &records)?;
        println!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    let failed: Vec<&JobRecord> = records
        .iter()
        .filter(|r| r.status == JobStatus::Failed)
        .collect();
    let successful = records.len() - failed.len();

    println!();
    println!(
        "{} Processed {} files in {:?}",
        style("✓").green(),
        records.len(),
        start.elapsed()
    );
    println!(
        "   {} successful, {} failed",
        style(successful).green(),
        style(failed.len()).red()
    );

    if !failed.is_empty() {
        println!();
        println!("{}", style("Failed files:").red());
        for record in &failed {
            let message = record
                .outcome
                .as_ref()
                .and_then(|o| o.error_message.as_deref())
                .unwrap_or("unknown error");
            println!("  - {}: {}", record.file_name, message);
        }
    }

    Ok(())
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("")
        .to_string()
}

fn write_output(output_dir: &Path, finished: &Finished, format: OutputFormat) -> anyhow::Result<()> {
    let stem = finished
        .path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("statement");
    let output_path = output_dir.join(format!("{}.{}", stem, format.extension()));

    fs::write(&output_path, format_outcome(&finished.outcome, format)?)?;
    debug!("Wrote output to {}", output_path.display());
    Ok(())
}

fn write_summary(path: &Path, records: &[JobRecord]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record([
        "filename",
        "status",
        "bank_name",
        "transaction_count",
        "start_date",
        "end_date",
        "error_kind",
        "error",
    ])?;

    for record in records {
        let status = record.status_record();
        let status = status.as_ref();
        let (start, end) = status
            .and_then(|s| s.date_range.as_ref())
            .map(|r| (r.start.as_str(), r.end.as_str()))
            .unwrap_or(("", ""));
        let count = status.map(|s| s.transaction_count).unwrap_or(0).to_string();

        let state = match record.status {
            _ if !record.is_done() => "pending",
            JobStatus::Completed => "success",
            _ => "error",
        };

        wtr.write_record([
            record.file_name.as_str(),
            state,
            status.and_then(|s| s.bank_name.as_deref()).unwrap_or(""),
            count.as_str(),
            start,
            end,
            status.and_then(|s| s.error_kind).map(|k| k.as_str()).unwrap_or(""),
            status.and_then(|s| s.error_message.as_deref()).unwrap_or(""),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_summary_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("summary.csv");

        let mut locked = JobRecord::new("job-0001", "locked.pdf");
        locked.finish(ProcessingOutcome::failure(ErrorKind::PasswordRequired, None));
        let pending = JobRecord::new("job-0002", "pending.json");

        write_summary(&path, &[locked, pending]).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(
            lines[0],
            "filename,status,bank_name,transaction_count,start_date,end_date,error_kind,error"
        );
        assert_eq!(
            lines[1],
            "locked.pdf,error,,0,,,password_required,PDF is password protected. Please provide the password."
        );
        assert_eq!(lines[2], "pending.json,pending,,0,,,,");
    }
}
