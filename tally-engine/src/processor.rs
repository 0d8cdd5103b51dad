//! Task processor.
//!
//! Turns one [`Task`] into exactly one outcome: classify the subject, open it
//! with the matching source, and count. The stream is owned by the counting
//! call and dropped when it returns, whatever the result.

use tally_core::{CountResult, FailureKind, SubjectKind, Task, TaskFailure};
use tally_fetch::{FetchContext, FetchError};
use tracing::{debug, instrument};

use crate::counter::Counter;
use crate::error::CountError;

/// Classifies, opens, and counts tasks for a fixed target.
#[derive(Debug, Clone)]
pub struct TaskProcessor {
    counter: Counter,
    ctx: FetchContext,
}

impl TaskProcessor {
    /// Creates a processor counting `target` using the sources in `ctx`.
    pub fn new(target: &str, ctx: FetchContext) -> Self {
        Self {
            counter: Counter::new(target),
            ctx,
        }
    }

    /// Processes one task.
    ///
    /// # Errors
    ///
    /// Returns a [`TaskFailure`] naming the subject if classification,
    /// opening, or counting fails. Partial counts are discarded.
    #[instrument(skip(self, task), fields(subject = %task.subject))]
    pub async fn process(&self, task: &Task) -> Result<CountResult, TaskFailure> {
        let subject = task.subject.as_str();

        let kind = SubjectKind::classify(subject)
            .map_err(|e| TaskFailure::new(subject, FailureKind::Unrecognized, e.to_string()))?;

        let stream = self
            .ctx
            .open(kind, subject, &task.cancel)
            .await
            .map_err(|e| fetch_failure(subject, &e))?;

        let scan = self
            .counter
            .count(stream, &task.cancel)
            .await
            .map_err(|e| count_failure(subject, &e))?;

        debug!(kind = %kind, count = scan.occurrences, lines = scan.lines, "Subject counted");
        Ok(CountResult::new(subject, scan.occurrences))
    }
}

fn fetch_failure(subject: &str, error: &FetchError) -> TaskFailure {
    let kind = if error.is_cancelled() {
        FailureKind::Cancelled
    } else {
        FailureKind::Fetch
    };
    TaskFailure::new(subject, kind, error.to_string())
}

fn count_failure(subject: &str, error: &CountError) -> TaskFailure {
    let kind = match error {
        CountError::Cancelled { .. } => FailureKind::Cancelled,
        CountError::Read { .. } => FailureKind::Read,
    };
    TaskFailure::new(subject, kind, error.to_string())
}

// ============================================================================
// Tests
// ============================================================================
