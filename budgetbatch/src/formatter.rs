//! Output formatters for the run report

use anyhow::Result;
use budgetcraft_core::batch::{ItemOutcome, RunReport};
use budgetcraft_core::config::BatchConfig;
use colored::*;

/// Print the report in human-readable format with colors
pub fn print_human(config: &BatchConfig, report: &RunReport) {
    println!(
        "{}",
        format!("Batch run: {}", config.source_dir.display()).bold()
    );
    println!();

    for item in &report.items {
        match &item.outcome {
            ItemOutcome::Produced {
                output,
                derived_name,
            } => {
                println!(
                    "  {} {} -> {} ({})",
                    "PRODUCED".green().bold(),
                    item.source,
                    output.display(),
                    derived_name
                );
            }
            ItemOutcome::MissingName => {
                println!(
                    "  {} {} (naming cell is empty)",
                    "MISSING ".yellow().bold(),
                    item.source
                );
            }
            ItemOutcome::Failed { reason } => {
                println!("  {} {}: {}", "FAILED  ".red().bold(), item.source, reason);
            }
        }
    }
    if !report.items.is_empty() {
        println!();
    }

    println!("{}", "Summary:".bold().underline());
    println!("  Source files found:    {}", report.discovered);
    println!("  Skipped (in ledger):   {}", report.skipped);
    println!("  {} {}", "Budgets created:      ".green(), report.produced());
    if report.missing_name() > 0 {
        println!(
            "  {} {}",
            "Missing derived names:".yellow(),
            report.missing_name()
        );
    }
    if report.failed() > 0 {
        println!("  {} {}", "Failed files:         ".red(), report.failed());
    }

    if report.is_consistent() {
        println!("{}", "✓ All source files accounted for.".green().bold());
    } else {
        println!(
            "{}",
            "✗ Bucket counts do not add up to the discovered files."
                .red()
                .bold()
        );
    }
}

/// Print the report in JSON format
pub fn print_json(report: &RunReport) -> Result<()> {
    let output = serde_json::json!({
        "discovered": report.discovered,
        "skipped": report.skipped,
        "items": &report.items,
        "summary": {
            "produced": report.produced(),
            "missing_name": report.missing_name(),
            "failed": report.failed(),
            "consistent": report.is_consistent(),
        }
    });

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
