use anyhow::{Context, Result};
use budgetcraft_core::ledger::Ledger;
use budgetcraft_core::{BatchConfig, CollisionPolicy, discover_sources};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

mod formatter;

#[derive(Parser)]
#[command(name = "budgetbatch")]
#[command(about = "Batch-build budget workbooks from a master template", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to configuration file (TOML)
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Override the source folder of raw .xlsx files
    #[arg(long, value_name = "DIR")]
    source: Option<PathBuf>,

    /// Override the master template path
    #[arg(long, value_name = "FILE")]
    template: Option<PathBuf>,

    /// Override the output folder
    #[arg(long, value_name = "DIR")]
    output: Option<PathBuf>,

    /// Override the audit log path
    #[arg(long, value_name = "FILE")]
    audit_log: Option<PathBuf>,

    /// Override the processed-file ledger path
    #[arg(long, value_name = "FILE")]
    ledger: Option<PathBuf>,

    /// What to do when an output file with the derived name already exists
    #[arg(long, value_enum, value_name = "POLICY")]
    on_collision: Option<OnCollision>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "human")]
    format: OutputFormat,

    /// List the files a run would process, without touching anything
    #[arg(long)]
    dry_run: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum OnCollision {
    /// Replace the existing file
    Overwrite,
    /// Count the file as failed
    Fail,
    /// Append " (2)", " (3)", ... to the name
    Suffix,
}

impl From<OnCollision> for CollisionPolicy {
    fn from(value: OnCollision) -> Self {
        match value {
            OnCollision::Overwrite => CollisionPolicy::Overwrite,
            OnCollision::Fail => CollisionPolicy::Fail,
            OnCollision::Suffix => CollisionPolicy::Suffix,
        }
    }
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    /// Human-readable colored output
    Human,
    /// JSON output for scripting
    Json,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = load_config(&cli)?;
    apply_overrides(&mut config, &cli);
    // Fail on bad references before any file is touched
    config
        .resolve()
        .context("Invalid configuration")?;

    if cli.dry_run {
        return dry_run(&config);
    }

    let report = budgetcraft_core::run(&config)
        .with_context(|| format!("Batch failed for {}", config.source_dir.display()))?;

    match cli.format {
        OutputFormat::Human => formatter::print_human(&config, &report),
        OutputFormat::Json => formatter::print_json(&report)?,
    }

    if report.failed() > 0 {
        std::process::exit(1);
    }
    Ok(())
}

fn load_config(cli: &Cli) -> Result<BatchConfig> {
    if let Some(config_path) = &cli.config {
        return BatchConfig::from_file(config_path)
            .with_context(|| format!("Failed to load config from {}", config_path.display()));
    }

    // Pick up a config from the working directory if one exists
    let default_config_path = PathBuf::from("budgetbatch.toml");
    if default_config_path.exists() {
        return BatchConfig::from_file(&default_config_path).with_context(|| {
            format!(
                "Failed to load config from {}",
                default_config_path.display()
            )
        });
    }

    anyhow::bail!("No configuration found: pass --config or create budgetbatch.toml")
}

fn apply_overrides(config: &mut BatchConfig, cli: &Cli) {
    if let Some(source) = &cli.source {
        config.source_dir = source.clone();
    }
    if let Some(template) = &cli.template {
        config.template = template.clone();
    }
    if let Some(output) = &cli.output {
        config.output_dir = output.clone();
    }
    if let Some(audit_log) = &cli.audit_log {
        config.audit_log = audit_log.clone();
    }
    if let Some(ledger) = &cli.ledger {
        config.ledger = ledger.clone();
    }
    if let Some(policy) = cli.on_collision {
        config.on_collision = policy.into();
    }
}

fn dry_run(config: &BatchConfig) -> Result<()> {
    let ledger = Ledger::load(&config.ledger)?;
    let sources = discover_sources(&config.source_dir)?;

    let mut pending = Vec::new();
    let mut skipped = 0usize;
    for path in &sources {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        if ledger.contains(&file_name) {
            skipped += 1;
        } else {
            pending.push(file_name);
        }
    }

    println!(
        "[DRY RUN] {} source file(s) in {}, {} already in the ledger",
        sources.len(),
        config.source_dir.display(),
        skipped
    );
    for name in pending {
        println!("  would process: {}", name);
    }
    Ok(())
}
