//! CLI entry point for the glassbox rater.
//!
//! Provides subcommands for running a full JSON-configured analysis, the
//! direction and glass-structure presets, a null-value audit of a single
//! dataset, and dumping the built-in configuration.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use glassbox_rater::analyzers::analyzer::run;
use glassbox_rater::analyzers::formula::Formula;
use glassbox_rater::config::{DatasetConfig, RunConfig};
use glassbox_rater::inspect::audit;
use glassbox_rater::loader::load_table;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "glassbox_rater")]
#[command(
    about = "Find the best facade direction or glass structure from temperature/humidity data",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run every dataset described in a JSON config file
    Run {
        /// Path to the JSON run configuration
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Rank south/west/east facades against north
    Directions {
        /// CSV file with Temperature[C]-<direction> and Humidity[%rH]-<direction> columns
        #[arg(short, long)]
        input: PathBuf,

        /// Include the south concrete sensor (T1ENVIRO/HUMD1ENVIRO columns)
        #[arg(long, default_value_t = false)]
        with_concrete: bool,

        /// Column to group rows by (all rows form one group if omitted)
        #[arg(short, long)]
        group_column: Option<String>,

        /// Directory that receives one subdirectory per formula
        #[arg(short, long, default_value = "output")]
        output_dir: PathBuf,

        /// Formulas to apply (repeatable; all formulas if omitted)
        #[arg(short, long, value_enum)]
        formula: Vec<Formula>,
    },
    /// Rank double/triple/quad glass by closeness to the environment
    Glass {
        /// CSV file with <category>-temp and <category>-humidity columns
        #[arg(short, long)]
        input: PathBuf,

        /// Dataset name used in the output file name
        #[arg(short, long)]
        name: Option<String>,

        /// Column to group rows by (all rows form one group if omitted)
        #[arg(short, long)]
        group_column: Option<String>,

        /// Directory that receives one subdirectory per formula
        #[arg(short, long, default_value = "output")]
        output_dir: PathBuf,

        /// Formulas to apply (repeatable; all formulas if omitted)
        #[arg(short, long, value_enum)]
        formula: Vec<Formula>,
    },
    /// Report null values per column and row without scoring
    Inspect {
        /// CSV file to audit
        #[arg(short, long)]
        input: PathBuf,
    },
    /// Print the built-in run configuration as JSON
    Defaults,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/glassbox_rater.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("glassbox_rater.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run { config } => {
            let config = RunConfig::load(&config)?;
            run(&config)?;
        }
        Commands::Directions {
            input,
            with_concrete,
            group_column,
            output_dir,
            formula,
        } => {
            let dataset =
                DatasetConfig::directions(input, with_concrete).with_group_column(group_column);
            run(&RunConfig::single(output_dir, formula, dataset))?;
        }
        Commands::Glass {
            input,
            name,
            group_column,
            output_dir,
            formula,
        } => {
            let name = match name {
                Some(name) => name,
                None => input
                    .file_stem()
                    .and_then(OsStr::to_str)
                    .unwrap_or("glassbox")
                    .to_string(),
            };
            let dataset = DatasetConfig::glassbox(&name, input).with_group_column(group_column);
            run(&RunConfig::single(output_dir, formula, dataset))?;
        }
        Commands::Inspect { input } => {
            let table = load_table(&input)
                .with_context(|| format!("loading '{}'", input.display()))?;
            let report = audit(&table);
            report.log(&input.display().to_string());
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Commands::Defaults => {
            println!("{}", serde_json::to_string_pretty(&RunConfig::default())?);
        }
    }

    info!("Done");
    Ok(())
}
