//! Domain models for Tally.
//!
//! ## Submodules
//!
//! - [`task`] - Work items submitted to the pool
//! - [`outcome`] - Terminal results (counts and failures)

mod outcome;
mod task;

// Re-export everything at the models level
pub use outcome::{CountResult, FailureKind, Outcome, TaskFailure};
pub use task::Task;
