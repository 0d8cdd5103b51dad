//! CLI command implementations.

pub mod count;
