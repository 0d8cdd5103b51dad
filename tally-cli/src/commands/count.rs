//! Count command - run every subject through the worker pool.

use anyhow::{Context, Result};
use futures::{Stream, StreamExt};
use tally_core::{CancellationToken, Outcome};
use tally_engine::WorkerPool;
use tally_fetch::FetchContext;
use tokio::io::BufReader;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::feed::Feed;
use crate::output::{JsonFormatter, TextFormatter};
use crate::report::Report;
use crate::{Cli, OutputFormat};

/// Runs the count command and returns the aggregated report.
pub async fn run(cli: &Cli) -> Result<Report> {
    let config = Config::resolve(cli)?;
    debug!(?config, "Resolved configuration");

    let ctx = FetchContext::builder()
        .settings(config.fetch_settings())
        .build()
        .context("Failed to set up content sources")?;
    let pool = WorkerPool::new(config.pool_config(), ctx)?.spawn();
    let (input, outcomes, handle) = pool.into_outcomes();

    let root = CancellationToken::new();
    spawn_interrupt_handler(root.clone());

    let feed = Feed::new(input, root.clone(), config.task_timeout());
    let producer = if cli.subjects.is_empty() {
        info!("Reading subjects from stdin");
        tokio::spawn(feed.from_lines(BufReader::new(tokio::io::stdin())))
    } else {
        tokio::spawn(feed.from_list(cli.subjects.clone()))
    };

    let text = TextFormatter::new(!cli.no_color);
    let report = aggregate(outcomes, &config.target, |outcome| {
        if cli.format != OutputFormat::Text {
            return;
        }
        match outcome {
            Outcome::Counted(result) => println!("{}", text.format_result(result)),
            Outcome::Failed(failure) if !cli.quiet => {
                eprintln!("{}", text.format_failure(failure));
            }
            Outcome::Failed(_) => {}
        }
    })
    .await;

    let submitted = producer
        .await
        .context("Input reader stopped unexpectedly")?
        .context("Failed to read subjects")?;
    let summary = handle.join().await?;

    // Releases pending timers and the interrupt handler.
    root.cancel();

    debug!(
        submitted,
        processed = summary.processed,
        failed = summary.failed,
        "Run finished"
    );

    match cli.format {
        OutputFormat::Text => {
            println!("{}", text.format_total(report.total));
            if cli.verbose {
                eprintln!("{}", text.format_digest(&report));
            }
        }
        OutputFormat::Json => {
            let formatter = JsonFormatter::new(cli.pretty);
            println!("{}", formatter.format_report(&report)?);
        }
    }

    Ok(report)
}

/// Drains `outcomes` into a report, handing each outcome to `each` as it arrives.
///
/// This is the only place the running total is kept.
pub async fn aggregate<S, F>(mut outcomes: S, target: &str, mut each: F) -> Report
where
    S: Stream<Item = Outcome> + Unpin,
    F: FnMut(&Outcome),
{
    let mut report = Report::new(target);
    while let Some(outcome) = outcomes.next().await {
        each(&outcome);
        report.record(outcome);
    }
    report
}

/// Cancels `root` on Ctrl-C; exits quietly once `root` is cancelled for any other reason.
fn spawn_interrupt_handler(root: CancellationToken) {
    tokio::spawn(async move {
        tokio::select! {
            result = tokio::signal::ctrl_c() => match result {
                Ok(()) => {
                    warn!("Interrupted, cancelling remaining subjects");
                    root.cancel();
                }
                Err(e) => warn!(error = %e, "Could not listen for Ctrl-C"),
            },
            () = root.cancelled() => {}
        }
    });
}

// ============================================================================
// Tests
// ============================================================================
