//! Engine error types.

use thiserror::Error;

// ============================================================================
// Count Error
// ============================================================================

/// Error returned by the counting engine.
///
/// Both variants carry the progress made before stopping.
#[derive(Debug, Error)]
pub enum CountError {
    /// The task's token was cancelled.
    #[error("Job Cancelled")]
    Cancelled {
        /// Occurrences counted before stopping.
        counted: u64,
        /// Lines fully scanned before stopping.
        lines: u64,
    },

    /// Reading the stream failed.
    #[error("Read failed after {lines} lines: {source}")]
    Read {
        /// Occurrences counted before the error.
        counted: u64,
        /// Lines fully scanned before the error.
        lines: u64,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },
}

impl CountError {
    /// Returns the occurrences counted before the error.
    pub fn counted(&self) -> u64 {
        match self {
            CountError::Cancelled { counted, .. } | CountError::Read { counted, .. } => *counted,
        }
    }

    /// Returns the number of lines fully scanned before the error.
    pub fn lines(&self) -> u64 {
        match self {
            CountError::Cancelled { lines, .. } | CountError::Read { lines, .. } => *lines,
        }
    }
}

// ============================================================================
// Pool Error
// ============================================================================

/// Error type for building or joining a worker pool.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PoolError {
    /// Worker count was zero.
    #[error("Worker pool needs at least one worker")]
    NoWorkers,

    /// Target substring was empty.
    #[error("Target substring must not be empty")]
    EmptyTarget,

    /// Queue capacity was zero.
    #[error("Queue capacity must be at least 1")]
    ZeroCapacity,

    /// The supervisor task did not finish normally.
    #[error("Pool supervisor failed: {0}")]
    Supervisor(String),
}
