//! Parse command - extract fields from a single statement.

use std::fmt::{self, Write as _};
use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use tracing::info;

use stmtx_core::{ParseOutcome, StatementEngine};

use super::open_source;

/// Arguments for the parse command.
#[derive(Args)]
pub struct ParseArgs {
    /// Statement text file, or `-` for stdin
    #[arg(required = true)]
    input: PathBuf,

    /// Preferred issuer (axis, hdfc, sbi, icici, amex)
    #[arg(short, long)]
    bank: Option<String>,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Print detection and completeness scores to stderr
    #[arg(long)]
    show_scores: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output, one row per transaction
    Csv,
    /// Plain text summary
    Text,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
            OutputFormat::Text => "txt",
        }
    }
}

pub async fn run(args: ParseArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let engine = StatementEngine::new(super::config::load(config_path)?);

    info!("Parsing {}", args.input.display());
    let source = open_source(&args.input);
    let outcome = engine.process(source.as_ref(), args.bank.as_deref())?;

    let output = format_outcome(&outcome, args.format)?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        eprintln!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    if args.show_scores {
        eprintln!();
        eprint!("{}", format_scores(&outcome)?);
        eprintln!(
            "{} Parsed in {}ms",
            style("ℹ").blue(),
            start.elapsed().as_millis()
        );
    }

    Ok(())
}

pub fn format_outcome(outcome: &ParseOutcome, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(outcome)?),
        OutputFormat::Csv => format_csv(outcome),
        OutputFormat::Text => Ok(format_text(outcome)?),
    }
}

fn format_csv(outcome: &ParseOutcome) -> anyhow::Result<String> {
    let parsed = &outcome.parsed;
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record([
        "bank",
        "card_ending",
        "card_owner_name",
        "period_from",
        "period_to",
        "payment_due_date",
        "total_amount_due",
        "transaction_date",
        "description",
        "amount",
    ])?;

    let statement = [
        outcome.bank_used.to_string(),
        parsed.card_ending.clone().unwrap_or_default(),
        parsed.card_owner_name.clone().unwrap_or_default(),
        optional(parsed.statement_period.from),
        optional(parsed.statement_period.to),
        optional(parsed.payment_due_date),
        optional(parsed.total_amount_due),
    ];

    if parsed.transactions.is_empty() {
        let mut row = statement.to_vec();
        row.extend([String::new(), String::new(), String::new()]);
        wtr.write_record(&row)?;
    }

    for tx in &parsed.transactions {
        let mut row = statement.to_vec();
        row.extend([
            optional(tx.date),
            tx.description.clone().unwrap_or_default(),
            tx.amount.to_string(),
        ]);
        wtr.write_record(&row)?;
    }

    Ok(String::from_utf8(wtr.into_inner()?)?)
}

fn format_text(outcome: &ParseOutcome) -> Result<String, fmt::Error> {
    let parsed = &outcome.parsed;
    let missing = || style("-").dim().to_string();
    let mut output = String::new();

    writeln!(
        output,
        "Issuer:       {} (detected {})",
        outcome.bank_used, outcome.bank_detected
    )?;
    writeln!(
        output,
        "Card ending:  {}",
        parsed.card_ending.clone().unwrap_or_else(missing)
    )?;
    writeln!(
        output,
        "Card owner:   {}",
        parsed.card_owner_name.clone().unwrap_or_else(missing)
    )?;
    writeln!(
        output,
        "Period:       {} to {}",
        parsed.statement_period.from.map(|d| d.to_string()).unwrap_or_else(missing),
        parsed.statement_period.to.map(|d| d.to_string()).unwrap_or_else(missing)
    )?;
    writeln!(
        output,
        "Payment due:  {}",
        parsed.payment_due_date.map(|d| d.to_string()).unwrap_or_else(missing)
    )?;
    writeln!(
        output,
        "Total due:    {}",
        parsed.total_amount_due.map(|a| a.to_string()).unwrap_or_else(missing)
    )?;

    writeln!(output)?;
    writeln!(output, "Transactions ({}):", parsed.transactions.len())?;
    for tx in &parsed.transactions {
        writeln!(
            output,
            "  {:<10}  {:<40}  {:>12}",
            tx.date.map(|d| d.to_string()).unwrap_or_default(),
            tx.description.as_deref().unwrap_or(""),
            tx.amount.to_string()
        )?;
    }

    Ok(output)
}

pub fn format_scores(outcome: &ParseOutcome) -> Result<String, fmt::Error> {
    let mut output = String::new();
    writeln!(output, "{:<8} {:>9} {:>9}", "issuer", "detection", "parse")?;
    for (bank, parse_score) in &outcome.parse_scores {
        let detection = outcome.detection_scores.get(bank).copied().unwrap_or_default();
        let marker = if *bank == outcome.bank_used { "*" } else { "" };
        writeln!(output, "{:<8} {:>9} {:>9} {}", bank.as_str(), detection, parse_score, marker)?;
    }
    Ok(output)
}

fn optional<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}
