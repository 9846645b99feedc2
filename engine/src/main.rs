//! SalesFlow CLI - clean, aggregate and chart sales records
//!
//! # Main Commands
//!
//! ```bash
//! salesflow run sales.csv                  # Full pipeline into ./Output
//! salesflow run sales.csv -o out -c cfg.json --no-charts
//! ```
//!
//! # Debug Commands
//!
//! ```bash
//! salesflow parse sales.csv                # Loaded records as JSON
//! salesflow example-config                 # Default configuration JSON
//! ```

use clap::{Parser, Subcommand};
use salesflow::logs::log_error;
use salesflow::transform::format_delimiter;
use salesflow::{load_records, run_file, PipelineConfig, RunOptions, SourceFormat};
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "salesflow")]
#[command(about = "Clean, aggregate, summarize and chart sales records", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Full pipeline: load, clean, filter, derive, aggregate, analyze, write
    Run {
        /// Input file (.json, or delimited text)
        input: PathBuf,

        /// Output directory
        #[arg(short, long, default_value = "Output")]
        output: PathBuf,

        /// Pipeline configuration JSON (defaults if not specified)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Skip chart rendering
        #[arg(long)]
        no_charts: bool,
    },

    /// Load an input file and output its records as JSON
    Parse {
        /// Input file
        input: PathBuf,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show the default pipeline configuration
    ExampleConfig,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run {
            input,
            output,
            config,
            no_charts,
        } => cmd_run(input, output, config.as_deref(), no_charts),

        Commands::Parse { input, output } => cmd_parse(&input, output.as_deref()),

        Commands::ExampleConfig => cmd_example_config(),
    };

    if let Err(e) = result {
        log_error(format!("Error: {}", e));
        std::process::exit(1);
    }
}

fn cmd_run(
    input: PathBuf,
    output: PathBuf,
    config: Option<&Path>,
    no_charts: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut options = RunOptions::new(input, output);
    if let Some(path) = config {
        options.config = PipelineConfig::from_file(path)?;
    }
    options.charts = !no_charts;

    let outcome = run_file(&options)?;

    let report = &outcome.report;
    eprintln!(
        "\nDone: {} loaded, {} after cleaning, {} kept, {} groups",
        report.loaded,
        report.cleaned,
        report.kept,
        report.aggregates.len()
    );
    Ok(())
}

fn cmd_parse(input: &Path, output: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    eprintln!("Parsing: {}", input.display());

    let result = load_records(input)?;

    eprintln!("   Encoding: {}", result.encoding);
    match result.format {
        SourceFormat::Delimited { delimiter } => {
            eprintln!("   Delimiter: '{}' (auto-detected)", format_delimiter(delimiter))
        }
        SourceFormat::Json => eprintln!("   Format: JSON"),
    }
    eprintln!("   Columns: {}", result.headers.join(", "));
    eprintln!("Parsed {} records", result.records.len());

    let json = serde_json::to_string_pretty(&result.records)?;
    write_output(&json, output)
}

fn cmd_example_config() -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", PipelineConfig::default().to_json()?);
    Ok(())
}

fn write_output(content: &str, path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    match path {
        Some(p) => {
            fs::write(p, content)?;
            eprintln!("Output written to: {}", p.display());
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}
