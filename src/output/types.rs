//! Output types
//!
//! The seams between the chunk engine and wherever chunks end up.

use crate::error::Result;
use serde::Serialize;
use std::path::PathBuf;

/// A destination bound to one chunk that accepts rows in order
pub trait RowSink {
    /// Write one data row
    fn write_row(&mut self, row: &[String]) -> Result<()>;

    /// Number of data rows written so far (the header is not counted)
    fn rows_written(&self) -> usize;
}

/// Produces a fresh sink per chunk index and finalizes it on rotation.
///
/// At most one sink is open at a time: the engine always closes the current
/// sink before opening the next.
pub trait ChunkRotator {
    /// Sink type handed out per chunk
    type Sink: RowSink;

    /// Open the sink for `index` (1-based), writing `header` first when given.
    /// An existing destination for the same index is overwritten.
    fn open(&mut self, index: usize, header: Option<&[String]>) -> Result<Self::Sink>;

    /// Flush and close a sink
    fn close(&mut self, sink: Self::Sink) -> Result<ChunkSummary>;
}

/// What was written for one chunk
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChunkSummary {
    /// 1-based chunk number
    pub index: usize,
    /// Data rows written (excluding the header)
    pub rows: usize,
    /// File the chunk was written to
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}
