//! Work items.

use tokio_util::sync::CancellationToken;

/// One subject to count, plus the token that can abort it.
///
/// Tasks are consumed by exactly one worker. The token is only ever read by
/// the pipeline; cancelling it is the caller's business.
#[derive(Debug, Clone)]
pub struct Task {
    /// The raw input line (file path or URL), echoed back in the outcome.
    pub subject: String,
    /// Cooperative cancellation signal for this task alone.
    pub cancel: CancellationToken,
}

impl Task {
    /// Creates a task whose token is never cancelled by anyone else.
    pub fn new(subject: impl Into<String>) -> Self {
        Self::with_cancel(subject, CancellationToken::new())
    }

    /// Creates a task bound to the given token.
    pub fn with_cancel(subject: impl Into<String>, cancel: CancellationToken) -> Self {
        Self {
            subject: subject.into(),
            cancel,
        }
    }

    /// Returns true if the task has been cancelled.
    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }
}
