// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # Tally Core
//!
//! Core types shared by every Tally crate.
//!
//! This crate provides the data model that flows through the counting
//! pipeline, including:
//!
//! - Task and outcome models
//! - Subject classification (URL vs. absolute path)
//! - Error types
//!
//! ## Key Types
//!
//! ### Tasks
//! - [`Task`] - One subject plus its cancellation token
//! - [`CancellationToken`] - Per-task cooperative cancellation signal
//!
//! ### Outcomes
//! - [`CountResult`] - Successful count for a subject
//! - [`TaskFailure`] - Failed subject with its cause
//! - [`FailureKind`] - Which stage a failure came from
//! - [`Outcome`] - Either of the above, as seen after fan-in
//!
//! ### Classification
//! - [`SubjectKind`] - Whether a subject names a URL or a local path

pub mod error;
pub mod models;
pub mod subject;

// Re-export error types
pub use error::CoreError;

// Re-export all model types
pub use models::{CountResult, FailureKind, Outcome, Task, TaskFailure};

// Re-export classification
pub use subject::SubjectKind;

// Every task carries one of these; re-exported so downstream crates agree on the type.
pub use tokio_util::sync::CancellationToken;
