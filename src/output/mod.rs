//! Output module
//!
//! Handles chunk naming, chunk file writing and writer rotation.
//!
//! # Overview
//!
//! This module provides:
//! - `ChunkNaming` - derives `name(n).ext` paths from the source path
//! - `CsvSink` - one chunk file, written with the configured delimiter,
//!   encoding and record terminator
//! - `FileRotator` - opens and closes one `CsvSink` per chunk
//! - `ChunkRotator` / `RowSink` - the traits the engine drives

mod naming;
mod sink;
mod types;

pub use naming::ChunkNaming;
pub use sink::{CsvSink, EncodingWriter, FileRotator};
pub use types::{ChunkRotator, ChunkSummary, RowSink};

#[cfg(test)]
mod tests;
