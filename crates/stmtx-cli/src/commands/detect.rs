//! Detect command - show issuer identity scores.

use std::path::PathBuf;

use clap::Args;
use console::style;

use stmtx_core::StatementEngine;

use super::open_source;

/// Arguments for the detect command.
#[derive(Args)]
pub struct DetectArgs {
    /// Statement text file, or `-` for stdin
    #[arg(required = true)]
    input: PathBuf,

    /// Print the detection as JSON
    #[arg(long)]
    json: bool,
}

pub async fn run(args: DetectArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let engine = StatementEngine::new(super::config::load(config_path)?);
    let text = open_source(&args.input).text()?;
    let detection = engine.detect(&text);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&detection)?);
        return Ok(());
    }

    println!(
        "{} Detected issuer: {} (score {})",
        style("✓").green(),
        style(detection.bank).bold(),
        detection.score
    );
    for (bank, score) in &detection.scores {
        println!("  {:<8} {:>4}", bank.as_str(), score);
    }

    Ok(())
}
