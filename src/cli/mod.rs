//! CLI module
//!
//! Command-line interface for splitting files.
//!
//! # Commands
//!
//! - `chunk` - Split a file into chunks of at most N data rows
//! - `split-field` - Explode a multi-value field into additional rows
//! - `run` - Run the operation named in a job file

mod commands;
mod runner;

pub use commands::{Cli, Commands, OutputFormat, RewriteArgs};
pub use runner::Runner;
