//! Aggregation of outcomes into a run report.
//!
//! The report is owned by the one task that drains the merged outcome
//! stream, so the running total needs no synchronization.

use serde::Serialize;
use tally_core::{CountResult, Outcome, TaskFailure};

/// Everything a run produced.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    /// Target that was counted.
    pub target: String,
    /// Successful counts, in arrival order.
    pub results: Vec<CountResult>,
    /// Failures, in arrival order.
    pub failures: Vec<TaskFailure>,
    /// Sum of every successful count.
    pub total: u64,
}

impl Report {
    /// Creates an empty report for `target`.
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            ..Self::default()
        }
    }

    /// Adds one outcome, updating the running total.
    pub fn record(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Counted(result) => {
                self.total += result.count;
                self.results.push(result);
            }
            Outcome::Failed(failure) => self.failures.push(failure),
        }
    }

    /// Returns the number of outcomes recorded.
    pub fn len(&self) -> usize {
        self.results.len() + self.failures.len()
    }

    /// Returns true if nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns true if any subject failed.
    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }

    /// Returns the number of failures caused by cancellation.
    pub fn cancelled(&self) -> usize {
        self.failures.iter().filter(|f| f.is_cancelled()).count()
    }
}
