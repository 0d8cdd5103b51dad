//! Core error types for Tally.

use thiserror::Error;

/// Core error type for Tally operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// Subject is neither a recognised URL nor an absolute path.
    #[error("Invalid filename or url {0}")]
    UnrecognizedSubject(String),
}
