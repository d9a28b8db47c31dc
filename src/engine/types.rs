//! Engine types
//!
//! Run plan and statistics for the chunk engine.

use crate::config::DEFAULT_CHUNK_SIZE;
use crate::error::{Error, Result};
use crate::output::ChunkSummary;
use serde::Serialize;

/// How input rows are distributed over chunks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkPlan {
    /// Input rows per chunk (always >= 1)
    row_limit: usize,
    /// Whether every chunk starts with the header
    keep_header: bool,
}

impl Default for ChunkPlan {
    fn default() -> Self {
        Self {
            row_limit: DEFAULT_CHUNK_SIZE,
            keep_header: true,
        }
    }
}

impl ChunkPlan {
    /// Create a plan. A zero row limit is rejected.
    pub fn new(row_limit: usize) -> Result<Self> {
        if row_limit == 0 {
            return Err(Error::invalid_value(
                "chunk_size",
                "must be a positive integer, got 0",
            ));
        }
        Ok(Self {
            row_limit,
            ..Self::default()
        })
    }

    /// Set header repetition
    #[must_use]
    pub fn with_keep_header(mut self, keep_header: bool) -> Self {
        self.keep_header = keep_header;
        self
    }

    /// Input rows per chunk
    pub fn row_limit(&self) -> usize {
        self.row_limit
    }

    /// Whether every chunk starts with the header
    pub fn keep_header(&self) -> bool {
        self.keep_header
    }
}

/// Statistics from one engine run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunStats {
    /// Data rows read from the source
    pub rows_read: usize,
    /// Data rows written across all chunks
    pub rows_written: usize,
    /// Input rows whose field was exploded
    pub rows_split: usize,
    /// Input rows written as a single row
    pub rows_passed: usize,
    /// Input rows left out of the output
    pub rows_dropped: usize,
    /// Chunks in index order
    pub chunks: Vec<ChunkSummary>,
    /// Duration in milliseconds
    pub duration_ms: u64,
}

impl RunStats {
    /// Create stats for a source with `rows_read` data rows
    pub fn new(rows_read: usize) -> Self {
        Self {
            rows_read,
            ..Self::default()
        }
    }

    /// Number of chunks produced
    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// Record a closed chunk
    pub fn add_chunk(&mut self, chunk: ChunkSummary) {
        self.chunks.push(chunk);
    }

    /// Record a row written unchanged or rewritten
    pub fn add_passed(&mut self) {
        self.rows_passed += 1;
        self.rows_written += 1;
    }

    /// Record a row exploded into `outputs` rows
    pub fn add_split(&mut self, outputs: usize) {
        self.rows_split += 1;
        self.rows_written += outputs;
    }

    /// Record a dropped row
    pub fn add_dropped(&mut self) {
        self.rows_dropped += 1;
    }

    /// Set duration
    pub fn set_duration(&mut self, ms: u64) {
        self.duration_ms = ms;
    }
}
