//! Batch processing command for multiple statement files.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::Semaphore;
use tracing::{debug, error, warn};

use stmtx_core::{FileSource, ParseOutcome, StatementEngine};

use super::parse::{format_outcome, OutputFormat};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Glob pattern matching statement text files
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

    /// Preferred issuer applied to every file
    #[arg(short, long)]
    bank: Option<String>,
}

/// Result of processing a single file.
struct FileResult {
    path: PathBuf,
    outcome: Result<ParseOutcome, String>,
    processing_time_ms: u64,
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let engine = Arc::new(StatementEngine::new(super::config::load(config_path)?));

    let files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| p.is_file())
        .collect();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    eprintln!(
        "{} Found {} files to process",
        style("ℹ").blue(),
        files.len()
    );

    if let Some(ref output_dir) = args.output_dir {
        fs::create_dir_all(output_dir)?;
    }

    let progress = ProgressBar::new(files.len() as u64);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")?
            .progress_chars("=>-"),
    );

    let semaphore = Arc::new(Semaphore::new(args.jobs.max(1)));
    let mut handles = Vec::with_capacity(files.len());
    for path in files {
        let permit = Arc::clone(&semaphore).acquire_owned().await?;
        let engine = Arc::clone(&engine);
        let bank = args.bank.clone();
        handles.push(tokio::task::spawn_blocking(move || {
            let _permit = permit;
            process_file(&engine, path, bank.as_deref())
        }));
    }

    let mut results = Vec::with_capacity(handles.len());
    for handle in handles {
        let result = handle.await?;
        progress.inc(1);

        if let Err(message) = &result.outcome {
            if args.continue_on_error {
                warn!("Failed to process {}: {}", result.path.display(), message);
            } else {
                error!("Failed to process {}: {}", result.path.display(), message);
                progress.abandon();
                anyhow::bail!("Processing {} failed: {}", result.path.display(), message);
            }
        }
        results.push(result);
    }

    progress.finish_and_clear();

    for result in &results {
        let Ok(outcome) = &result.outcome else {
            continue;
        };
        let content = format_outcome(outcome, args.format)?;

        match &args.output_dir {
            Some(output_dir) => {
                let stem = result
                    .path
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .unwrap_or("statement");
                let output_path = output_dir.join(format!("{}.{}", stem, args.format.extension()));
                fs::write(&output_path, content)?;
                debug!("Wrote output to {}", output_path.display());
            }
            None => println!("{}", content),
        }
    }

    if args.summary {
        let summary_path = args
            .output_dir
            .as_ref()
            .map(|d| d.join("summary.csv"))
            .unwrap_or_else(|| PathBuf::from("summary.csv"));

        write_summary(&summary_path, &results)?;
        eprintln!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    let failed: Vec<_> = results.iter().filter(|r| r.outcome.is_err()).collect();

    eprintln!();
    eprintln!(
        "{} Processed {} files in {:?}",
        style("✓").green(),
        results.len(),
        start.elapsed()
    );
    eprintln!(
        "   {} successful, {} failed",
        style(results.len() - failed.len()).green(),
        style(failed.len()).red()
    );

    if !failed.is_empty() {
        eprintln!();
        eprintln!("{}", style("Failed files:").red());
        for result in &failed {
            if let Err(message) = &result.outcome {
                eprintln!("  - {}: {}", result.path.display(), message);
            }
        }
    }

    Ok(())
}

fn process_file(engine: &StatementEngine, path: PathBuf, bank: Option<&str>) -> FileResult {
    let start = Instant::now();
    let outcome = engine
        .process(&FileSource::new(&path), bank)
        .map_err(|e| e.to_string());

    FileResult {
        path,
        outcome,
        processing_time_ms: start.elapsed().as_millis() as u64,
    }
}

fn write_summary(path: &Path, results: &[FileResult]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record([
        "filename",
        "status",
        "bank_detected",
        "bank_used",
        "card_ending",
        "payment_due_date",
        "total_amount_due",
        "transactions",
        "processing_time_ms",
        "error",
    ])?;

    for result in results {
        let filename = result
            .path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("");
        let time = result.processing_time_ms.to_string();

        match &result.outcome {
            Ok(outcome) => {
                let parsed = &outcome.parsed;
                let due = parsed.payment_due_date.map(|d| d.to_string()).unwrap_or_default();
                let total = parsed.total_amount_due.map(|a| a.to_string()).unwrap_or_default();
                let count = parsed.transactions.len().to_string();
                wtr.write_record([
                    filename,
                    "success",
                    outcome.bank_detected.as_str(),
                    outcome.bank_used.as_str(),
                    parsed.card_ending.as_deref().unwrap_or(""),
                    due.as_str(),
                    total.as_str(),
                    count.as_str(),
                    time.as_str(),
                    "",
                ])?;
            }
            Err(message) => {
                wtr.write_record([
                    filename,
                    "error",
                    "",
                    "",
                    "",
                    "",
                    "",
                    "",
                    time.as_str(),
                    message.as_str(),
                ])?;
            }
        }
    }

    wtr.flush()?;
    Ok(())
}
