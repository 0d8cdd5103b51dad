// Lint configuration for this crate
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! Tally CLI - count a substring across files and URLs concurrently.
//!
//! # Examples
//!
//! ```bash
//! # Count "Go" in every subject listed on stdin
//! printf 'https://go.dev\n/etc/hosts\n' | tally
//!
//! # Subjects as arguments, custom target and worker count
//! tally --target Rust --workers 8 https://www.rust-lang.org /usr/share/dict/words
//!
//! # Give up on any single subject after 10 seconds
//! tally --timeout 10 < subjects.txt
//!
//! # JSON summary
//! tally --format json --pretty < subjects.txt
//! ```

mod commands;
mod config;
mod feed;
mod output;
mod report;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

// ============================================================================
// CLI Definition
// ============================================================================

/// Tally CLI - concurrent substring counter.
#[derive(Parser, Debug, Default)]
#[command(name = "tally")]
#[command(about = "Count a substring across local files and URLs")]
#[command(long_about = r#"
Tally counts occurrences of a substring in every subject it is given.

A subject is either an absolute file path or an http(s) URL. Subjects are
read one per line from stdin unless they are passed as arguments. Each
subject is counted by a pool of concurrent workers; results print as they
arrive, followed by the total.

Examples:
  tally < subjects.txt                 # Count "Go" in each subject
  tally --target Rust /tmp/notes.txt   # Different target
  tally --workers 16 < subjects.txt    # More workers
  tally --format json < subjects.txt   # JSON summary
"#)]
#[command(version)]
pub struct Cli {
    /// Subjects to count. Read from stdin when none are given.
    pub subjects: Vec<String>,

    /// Substring to count (case-sensitive, literal).
    #[arg(long, short)]
    pub target: Option<String>,

    /// Number of concurrent workers.
    #[arg(long, short)]
    pub workers: Option<usize>,

    /// Cancel any single subject after this many seconds.
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// HTTP request timeout in seconds.
    #[arg(long, value_name = "SECS")]
    pub http_timeout: Option<u64>,

    /// Configuration file (defaults to the user config directory).
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Output format (text or json).
    #[arg(long, short = 'f', default_value = "text")]
    pub format: OutputFormat,

    /// Pretty-print JSON output.
    #[arg(long)]
    pub pretty: bool,

    /// Disable colored output.
    #[arg(long)]
    pub no_color: bool,

    /// Verbose output (show debug info).
    #[arg(long, short)]
    pub verbose: bool,

    /// Quiet mode (no logging, no per-subject errors).
    #[arg(long, short)]
    pub quiet: bool,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    /// One line per subject, then the total.
    #[default]
    Text,
    /// A single JSON summary.
    Json,
}

/// CLI exit codes.
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Every subject was counted.
    Success = 0,
    /// The run could not be started or finished.
    Error = 1,
    /// At least one subject failed.
    TaskFailed = 2,
}

impl ExitCode {
    /// Returns the exit code for a run that finished.
    pub fn for_report(report: &report::Report) -> Self {
        if report.has_failures() {
            Self::TaskFailed
        } else {
            Self::Success
        }
    }
}

// ============================================================================
// Logging Setup
// ============================================================================

fn setup_logging(verbose: bool, quiet: bool) {
    if quiet {
        return;
    }

    let filter = if verbose {
        EnvFilter::new("tally=debug,info")
    } else {
        EnvFilter::new("tally=warn")
    };

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .without_time()
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}

// ============================================================================
// Main Entry Point
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let code = match commands::count::run(&cli).await {
        Ok(report) => ExitCode::for_report(&report),
        Err(e) => {
            if !cli.quiet {
                eprintln!("Error: {e:#}");
            }
            ExitCode::Error
        }
    };

    if code != ExitCode::Success {
        std::process::exit(code as i32);
    }

    Ok(())
}
