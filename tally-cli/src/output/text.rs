//! Text output formatting with optional colors.

use tally_core::{CountResult, FailureKind, TaskFailure};

use crate::report::Report;

// ============================================================================
// ANSI Colors
// ============================================================================

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const RED: &str = "\x1b[31m";
const YELLOW: &str = "\x1b[33m";

/// Text formatter with optional colors.
pub struct TextFormatter {
    use_colors: bool,
}

impl TextFormatter {
    /// Creates a new text formatter.
    pub fn new(use_colors: bool) -> Self {
        Self { use_colors }
    }

    /// Formats a successful count as `<subject>: <count>`.
    pub fn format_result(&self, result: &CountResult) -> String {
        format!("{}: {}", result.subject, result.count)
    }

    /// Formats a failure as `<subject>: error: <cause>`.
    pub fn format_failure(&self, failure: &TaskFailure) -> String {
        let label = match failure.kind {
            FailureKind::Cancelled => self.paint(YELLOW, "error"),
            _ => self.paint(RED, "error"),
        };
        format!("{}: {}: {}", failure.subject, label, failure.cause)
    }

    /// Formats the closing total line.
    pub fn format_total(&self, total: u64) -> String {
        format!("{} {}", self.paint(BOLD, "Total:"), total)
    }

    /// Formats a one-line digest of the run, shown in verbose mode.
    pub fn format_digest(&self, report: &Report) -> String {
        let mut digest = format!(
            "{} subjects, {} counted, {} failed",
            report.len(),
            report.results.len(),
            report.failures.len()
        );
        let cancelled = report.cancelled();
        if cancelled > 0 {
            digest.push_str(&format!(" ({cancelled} cancelled)"));
        }
        digest
    }

    fn paint(&self, color: &str, text: &str) -> String {
        if self.use_colors {
            format!("{color}{text}{RESET}")
        } else {
            text.to_string()
        }
    }
}
