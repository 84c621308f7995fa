//! CLI command handlers
//!
//! Thin wrappers that turn parsed arguments into library calls and print
//! the results.

pub mod download;
pub mod generate;
