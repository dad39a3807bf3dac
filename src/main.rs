use clap::{ArgAction, Parser, ValueEnum};
use miette::{IntoDiagnostic, Result};
use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;
use terminal_capabilities::ReconciliationEngine;
use terminal_capabilities::domain::capability::CapabilityMatrix;
use terminal_capabilities::infrastructure::in_memory::{
    InMemoryAttemptStore, InMemoryConfigurationStore,
};
use terminal_capabilities::interfaces::csv::attempt_reader::AttemptReader;
use terminal_capabilities::interfaces::csv::matrix_writer::MatrixWriter;
use terminal_capabilities::interfaces::json::config_reader::read_configuration;
use terminal_capabilities::interfaces::text::report::write_report;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OutputFormat {
    Table,
    Csv,
    Json,
}

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Field attempts CSV file
    attempts: PathBuf,

    /// Declared configuration JSON document (optional). Without it every
    /// declared state is unknown.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Terminal identifier used in log output
    #[arg(long, default_value = "terminal")]
    terminal: String,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,

    /// Increase log verbosity (-v info, -vv debug). RUST_LOG takes precedence.
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn write_output<W: Write>(
    out: &mut W,
    format: OutputFormat,
    matrix: &CapabilityMatrix,
) -> terminal_capabilities::error::Result<()> {
    match format {
        OutputFormat::Table => write_report(out, matrix),
        OutputFormat::Csv => MatrixWriter::new(out).write_matrix(matrix),
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, matrix)?;
            writeln!(out)?;
            Ok(())
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let engine = ReconciliationEngine::new(
        Box::new(InMemoryAttemptStore::new()),
        Box::new(InMemoryConfigurationStore::new()),
    );

    if let Some(path) = &cli.config {
        let file = File::open(path).into_diagnostic()?;
        let config = read_configuration(file).into_diagnostic()?;
        engine
            .declare_configuration(&cli.terminal, config)
            .await
            .into_diagnostic()?;
    }

    // Load the whole attempt list before reconciling.
    let file = File::open(&cli.attempts).into_diagnostic()?;
    let mut loaded = 0usize;
    for (index, result) in AttemptReader::new(file).attempts().enumerate() {
        match result {
            Ok(attempt) => {
                engine
                    .record_attempt(&cli.terminal, attempt)
                    .await
                    .into_diagnostic()?;
                loaded += 1;
            }
            Err(e) => {
                warn!(row = index + 1, error = %e, "Skipping unreadable attempt");
            }
        }
    }
    info!(terminal = %cli.terminal, attempts = loaded, "Loaded attempts");

    let matrix = engine
        .reconcile_terminal(&cli.terminal)
        .await
        .into_diagnostic()?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_output(&mut out, cli.format, &matrix).into_diagnostic()?;

    Ok(())
}
