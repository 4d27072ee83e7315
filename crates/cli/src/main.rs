//! rowdedup CLI
//!
//! Reports and removes duplicate rows from tabular datasets

mod config;
mod progress;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use rowdedup_core::{Dataset, DedupOptions, ExactDeduplicator, Keep};
use rowdedup_formats::{open_dataset, save_dataset};
use std::io;
use std::path::{Path, PathBuf};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use config::DedupFileConfig;
use progress::ProgressReporter;

#[derive(Parser)]
#[command(name = "rowdedup")]
#[command(
    version,
    about = "Report and remove duplicate rows from tabular datasets",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output results in JSON format
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Count duplicate rows, remove them, and count again
    Dedup {
        /// Input file (JSONL, CSV or Parquet)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Output file; format follows the extension
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Columns that identify a row (comma separated, defaults to all)
        #[arg(short, long, value_delimiter = ',')]
        subset: Option<Vec<String>>,

        /// Which occurrence to keep: first, last or none
        #[arg(short, long)]
        keep: Option<Keep>,

        /// Config file with dedup settings (YAML or TOML)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Show statistics without writing output
        #[arg(long)]
        dry_run: bool,
    },

    /// Count duplicate rows without removing them
    Count {
        /// Path to the dataset file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Columns that identify a row (comma separated, defaults to all)
        #[arg(short, long, value_delimiter = ',')]
        subset: Option<Vec<String>>,

        /// Which occurrence to keep: first, last or none
        #[arg(short, long)]
        keep: Option<Keep>,
    },

    /// Inspect a dataset file
    Inspect {
        /// Path to the dataset file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Number of rows to show
        #[arg(short = 'n', long, default_value = "10")]
        limit: usize,
    },

    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr; stdout carries the report
    let log_level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_ansi(!cli.json)
        .with_writer(io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Dedup {
            input,
            output,
            subset,
            keep,
            config,
            dry_run,
        } => {
            let file_config = match config {
                Some(path) => DedupFileConfig::load(&path)?,
                None => DedupFileConfig::default(),
            };
            let input = input
                .or_else(|| file_config.input.clone())
                .context("No input dataset given; pass --input or set `input` in the config file")?;
            let output = output.or_else(|| file_config.output.clone());
            let options = file_config.options_with(subset, keep);
            dedup(&input, output.as_deref(), &options, dry_run, cli.json)?;
        }
        Commands::Count {
            input,
            subset,
            keep,
        } => {
            let options = DedupFileConfig::default().options_with(subset, keep);
            count(&input, &options, cli.json)?;
        }
        Commands::Inspect { input, limit } => {
            inspect(&input, limit, cli.json)?;
        }
        Commands::Completions { shell } => {
            generate(shell, &mut Cli::command(), "rowdedup", &mut io::stdout());
        }
    }

    Ok(())
}

fn load(input: &Path, quiet: bool) -> Result<Dataset> {
    let spinner = ProgressReporter::spinner(format!("Loading {}", input.display()), quiet);
    let dataset = open_dataset(input)
        .with_context(|| format!("Failed to load dataset: {}", input.display()))?;
    spinner.finish(format!(
        "Loaded {} rows x {} columns",
        dataset.len(),
        dataset.width()
    ));
    Ok(dataset)
}

fn dedup(
    input: &Path,
    output: Option<&Path>,
    options: &DedupOptions,
    dry_run: bool,
    json_output: bool,
) -> Result<()> {
    info!("Starting deduplication");
    info!("  Input: {:?}", input);
    info!("  Output: {:?}", output);
    info!("  Subset: {:?}", options.subset);
    info!("  Keep: {}", options.keep);

    let mut dataset = load(input, json_output)?;

    let report = if json_output {
        rowdedup_core::run(&mut dataset, options, &mut io::sink())?
    } else {
        rowdedup_core::run(&mut dataset, options, &mut io::stdout().lock())?
    };

    let written = match output {
        Some(path) if !dry_run => {
            let spinner =
                ProgressReporter::spinner(format!("Writing {}", path.display()), json_output);
            save_dataset(&dataset, path)
                .with_context(|| format!("Failed to write dataset: {}", path.display()))?;
            spinner.finish(format!("Wrote {} rows", dataset.len()));
            Some(path)
        }
        _ => None,
    };

    if json_output {
        let summary = serde_json::json!({
            "input": input.to_string_lossy(),
            "output": written.map(|p| p.to_string_lossy().to_string()),
            "keep": options.keep,
            "subset": options.subset,
            "report": report,
            "dry_run": dry_run,
        });
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        progress::print_summary_report(input, written, dry_run, &report);
    }

    Ok(())
}

fn count(input: &Path, options: &DedupOptions, json_output: bool) -> Result<()> {
    let dataset = load(input, json_output)?;
    let duplicates = ExactDeduplicator::new(options.clone()).count_duplicates(&dataset)?;

    if json_output {
        let summary = serde_json::json!({
            "input": input.to_string_lossy(),
            "rows": dataset.len(),
            "duplicates": duplicates,
        });
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!("Number of duplicates: {}", duplicates);
    }

    Ok(())
}

fn inspect(input: &Path, limit: usize, json_output: bool) -> Result<()> {
    let dataset = load(input, json_output)?;

    if json_output {
        let rows: Vec<serde_json::Value> = dataset
            .rows()
            .iter()
            .take(limit)
            .map(|row| {
                let object: serde_json::Map<String, serde_json::Value> = dataset
                    .columns()
                    .iter()
                    .cloned()
                    .zip(row.iter().map(serde_json::to_value))
                    .map(|(column, value)| (column, value.unwrap_or(serde_json::Value::Null)))
                    .collect();
                serde_json::Value::Object(object)
            })
            .collect();
        let summary = serde_json::json!({
            "input": input.to_string_lossy(),
            "rows": dataset.len(),
            "columns": dataset.columns(),
            "head": rows,
        });
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!("File:    {}", input.display());
    println!("Rows:    {}", progress::format_with_commas(dataset.len()));
    println!("Columns: {}", dataset.columns().join(", "));
    println!();
    println!("{}", dataset.columns().join("\t"));
    for row in dataset.rows().iter().take(limit) {
        let cells: Vec<String> = row.iter().map(|v| v.to_string()).collect();
        println!("{}", cells.join("\t"));
    }
    if dataset.len() > limit {
        println!("... {} more rows", dataset.len() - limit);
    }

    Ok(())
}
