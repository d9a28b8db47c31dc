// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::ref_option)]
#![allow(clippy::unused_self)]
#![allow(clippy::struct_excessive_bools)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::match_wildcard_for_single_variants)]
#![allow(clippy::needless_pass_by_value)]

//! # coti - CSV Terminal Interface
//!
//! Reads a delimited text file into memory and re-emits it as a sequence of
//! numbered chunk files, each holding at most N data rows plus an optional
//! repeated header. A second operation explodes one multi-value field into
//! additional rows.
//!
//! ## Features
//!
//! - **Row-count chunking**: `orders.csv` becomes `orders(1).csv`, `orders(2).csv`, ...
//! - **Field explosion**: one output row per value of a list-valued field
//! - **Field rewrite**: append one field's value onto another before writing
//! - **Encodings**: any WHATWG encoding on input and output, strict or replacing
//! - **Job files**: YAML/JSON job descriptions, overridable from the command line
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use coti::config::CsvFormat;
//! use coti::engine::{ChunkEngine, ChunkPlan};
//! use coti::output::{ChunkNaming, FileRotator};
//! use coti::store::RecordStore;
//!
//! fn main() -> coti::Result<()> {
//!     let format = CsvFormat::default();
//!     let store = RecordStore::load("data/orders.csv", &format)?;
//!
//!     let naming = ChunkNaming::from_source("data/orders.csv")?;
//!     let mut rotator = FileRotator::new(naming, format);
//!
//!     let stats = ChunkEngine::new(ChunkPlan::new(5000)?).run(&store, &mut rotator)?;
//!     println!("wrote {} chunks", stats.chunk_count());
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐    ┌────────────────────────┐    ┌──────────────────┐
//! │ RecordStore  │───▶│      ChunkEngine       │───▶│   FileRotator    │
//! │ header, rows │    │ boundaries + pipeline  │    │ name(n).ext sinks│
//! └──────────────┘    └───────────┬────────────┘    └──────────────────┘
//!                                 │
//!                     ┌───────────┴────────────┐
//!                     │      RowPipeline       │
//!                     │ FieldRewrite, Exploder │
//!                     └────────────────────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types and type aliases
pub mod types;

/// Job configuration and validation
pub mod config;

/// In-memory record store
pub mod store;

/// Chunk naming, sinks and rotation
pub mod output;

/// Per-row rewrite and explosion
pub mod transform;

/// Chunking engine
pub mod engine;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

pub use config::{CsvFormat, JobConfig, RunSettings};
pub use engine::{ChunkEngine, ChunkPlan, RunStats};
pub use store::RecordStore;
