//! Terminal results of processing a task.
//!
//! Every task ends in exactly one of:
//! - [`CountResult`] - The subject was read to the end
//! - [`TaskFailure`] - Classification, retrieval, reading, or cancellation failed

use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Count Result
// ============================================================================

/// Number of target occurrences found in one subject.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CountResult {
    /// The subject exactly as submitted.
    pub subject: String,
    /// Non-overlapping occurrences of the target.
    pub count: u64,
}

impl CountResult {
    /// Creates a new count result.
    pub fn new(subject: impl Into<String>, count: u64) -> Self {
        Self {
            subject: subject.into(),
            count,
        }
    }
}

impl fmt::Display for CountResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.subject, self.count)
    }
}

// ============================================================================
// Failure Kind
// ============================================================================

/// The stage at which a task failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Subject is neither a URL nor an absolute path.
    Unrecognized,
    /// Opening the file or issuing the request failed.
    Fetch,
    /// The task's token was cancelled.
    Cancelled,
    /// The content stream failed part-way through.
    Read,
}

impl FailureKind {
    /// Returns a short label for this kind.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Unrecognized => "unrecognized subject",
            Self::Fetch => "fetch failed",
            Self::Cancelled => "cancelled",
            Self::Read => "read failed",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

// ============================================================================
// Task Failure
// ============================================================================

/// A task that did not produce a count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskFailure {
    /// The subject exactly as submitted.
    pub subject: String,
    /// Which stage failed.
    pub kind: FailureKind,
    /// Human-readable description of the underlying error.
    pub cause: String,
}

impl TaskFailure {
    /// Creates a new failure.
    pub fn new(subject: impl Into<String>, kind: FailureKind, cause: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            kind,
            cause: cause.into(),
        }
    }

    /// Returns true if the failure was caused by cancellation.
    pub fn is_cancelled(&self) -> bool {
        self.kind == FailureKind::Cancelled
    }
}

impl fmt::Display for TaskFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.subject, self.cause)
    }
}

impl std::error::Error for TaskFailure {}

// ============================================================================
// Outcome
// ============================================================================

/// The merged view of both output queues.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    /// The subject was counted.
    Counted(CountResult),
    /// The subject failed.
    Failed(TaskFailure),
}

impl Outcome {
    /// Returns the subject this outcome belongs to.
    pub fn subject(&self) -> &str {
        match self {
            Self::Counted(result) => &result.subject,
            Self::Failed(failure) => &failure.subject,
        }
    }

    /// Returns the count, if the task succeeded.
    pub fn count(&self) -> Option<u64> {
        match self {
            Self::Counted(result) => Some(result.count),
            Self::Failed(_) => None,
        }
    }

    /// Returns true if the task succeeded.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Counted(_))
    }

    /// Converts into a standard `Result`.
    pub fn into_result(self) -> Result<CountResult, TaskFailure> {
        match self {
            Self::Counted(result) => Ok(result),
            Self::Failed(failure) => Err(failure),
        }
    }
}

impl From<CountResult> for Outcome {
    fn from(result: CountResult) -> Self {
        Self::Counted(result)
    }
}

impl From<TaskFailure> for Outcome {
    fn from(failure: TaskFailure) -> Self {
        Self::Failed(failure)
    }
}

impl From<Result<CountResult, TaskFailure>> for Outcome {
    fn from(result: Result<CountResult, TaskFailure>) -> Self {
        match result {
            Ok(result) => Self::Counted(result),
            Err(failure) => Self::Failed(failure),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
