// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # Tally Engine
//!
//! The concurrent counting pipeline.
//!
//! ## Pipeline
//!
//! - [`counter::Counter`] - Line-by-line literal substring counting
//! - [`processor::TaskProcessor`] - Classify, open, and count one task
//! - [`pool::WorkerPool`] - N workers sharing one input queue
//! - [`fan_in::merge`] - Merge any number of output streams into one
//!
//! ## Example
//!
//! ```ignore
//! use futures::StreamExt;
//! use tally_core::Task;
//! use tally_engine::{create_pool, Outcome};
//! use tally_fetch::FetchContext;
//!
//! let pool = create_pool("Go", FetchContext::builder().build()?, 5)?;
//! let (input, mut outcomes, handle) = pool.into_outcomes();
//!
//! tokio::spawn(async move {
//!     input.send(Task::new("https://example.com")).await.ok();
//!     // input dropped here: the queue is closed
//! });
//!
//! while let Some(outcome) = outcomes.next().await {
//!     println!("{outcome:?}");
//! }
//! let summary = handle.join().await?;
//! ```

pub mod counter;
pub mod error;
pub mod fan_in;
pub mod pool;
pub mod processor;

// Errors
pub use error::{CountError, PoolError};

// Pipeline
pub use counter::{Counter, Scan};
pub use fan_in::{merge, merge_outcomes, FanIn};
pub use pool::{create_pool, PoolChannels, PoolConfig, PoolHandle, PoolSummary, WorkerPool};
pub use processor::TaskProcessor;

// Convenience re-exports so callers need only this crate for the common path.
pub use tally_core::{CancellationToken, CountResult, FailureKind, Outcome, Task, TaskFailure};
