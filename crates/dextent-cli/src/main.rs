//! dextent: infer a file's original extension from its magic number.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use colored::Colorize;
use tracing::debug;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use dextent_core::scan_directory;

mod output;

#[derive(Parser)]
#[command(name = "dextent")]
#[command(
    author,
    version,
    about = "Infer a file's original extension from its magic number",
    long_about = None
)]
struct Cli {
    /// File to analyze (a directory with --directory)
    path: PathBuf,

    /// Scan every file directly inside the directory (non-recursive)
    #[arg(short = 'd', long)]
    directory: bool,

    /// Output format
    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

/// Logs go to stderr so stdout stays a clean result channel.
fn setup_logging(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("warn")
        }
    });

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    if cli.directory {
        run_directory(&cli.path, cli.format)
    } else {
        run_file(&cli.path, cli.format)
    }
}

fn run_file(path: &Path, format: Format) -> ExitCode {
    if !path.is_file() {
        println!("{}", format!("File not found: {}", path.display()).red());
        return ExitCode::FAILURE;
    }

    match format {
        Format::Text => output::print_file_text(path),
        Format::Json => output::print_file_json(path),
    }
    ExitCode::SUCCESS
}

fn run_directory(path: &Path, format: Format) -> ExitCode {
    if !path.is_dir() {
        println!("{}", format!("Directory not found: {}", path.display()).red());
        return ExitCode::FAILURE;
    }

    match scan_directory(path) {
        Ok(report) => {
            if let Some(ms) = report.scan_time_ms {
                debug!("scanned {} in {ms}ms", path.display());
            }
            match format {
                Format::Text => output::print_scan_text(&report),
                Format::Json => output::print_scan_json(path, &report),
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            println!("{}", format!("Error scanning directory: {err}").red());
            ExitCode::FAILURE
        }
    }
}
