//! Execution engine module
//!
//! Main chunking loop.
//!
//! # Overview
//!
//! The engine module provides:
//! - `ChunkEngine` - walks the record store, rotates sinks at chunk boundaries
//!   and writes each row through the row pipeline
//! - `ChunkPlan` - rows per chunk and header repetition
//! - `RunStats` - counters and per-chunk summaries
//!
//! Chunk `k` (1-based) receives input rows `[limit * (k - 1), limit * k)`.
//! Row explosion does not move boundaries: the limit counts input rows
//! consumed, so a chunk can hold more physical lines than the limit.

mod types;

pub use types::{ChunkPlan, RunStats};

use crate::error::Result;
use crate::output::{ChunkRotator, RowSink};
use crate::store::RecordStore;
use crate::transform::{Expansion, RowPipeline};
use std::time::Instant;
use tracing::{info, warn};

/// Chunked-rewrite engine
#[derive(Debug, Clone, Default)]
pub struct ChunkEngine {
    /// Chunk sizing and header policy
    plan: ChunkPlan,
    /// Per-row transforms
    pipeline: RowPipeline,
}

impl ChunkEngine {
    /// Create an engine that copies rows unchanged
    pub fn new(plan: ChunkPlan) -> Self {
        Self {
            plan,
            pipeline: RowPipeline::default(),
        }
    }

    /// Set the row pipeline
    #[must_use]
    pub fn with_pipeline(mut self, pipeline: RowPipeline) -> Self {
        self.pipeline = pipeline;
        self
    }

    /// Write every row of `store` into chunks produced by `rotator`.
    ///
    /// Chunk 1 is opened before the first row, so a header-only source still
    /// yields one chunk. A source without a header yields none. The first
    /// error aborts the run.
    pub fn run<R: ChunkRotator>(&self, store: &RecordStore, rotator: &mut R) -> Result<RunStats> {
        let start = Instant::now();
        let mut stats = RunStats::new(store.len());

        let Some(header) = store.header() else {
            warn!("Source has no header row; no chunks written");
            return Ok(stats);
        };
        let header = self.plan.keep_header().then_some(header);

        let row_limit = self.plan.row_limit();
        let mut chunk_index = 1;
        let mut limit = row_limit;
        let mut sink = rotator.open(chunk_index, header)?;

        for (i, row) in store.rows().iter().enumerate() {
            if i + 1 > limit {
                stats.add_chunk(rotator.close(sink)?);
                chunk_index += 1;
                limit = row_limit.saturating_mul(chunk_index);
                sink = rotator.open(chunk_index, header)?;
            }

            match self.pipeline.apply(i + 1, row)? {
                Expansion::Unchanged => {
                    sink.write_row(row)?;
                    stats.add_passed();
                }
                Expansion::Rewritten(rewritten) => {
                    sink.write_row(&rewritten)?;
                    stats.add_passed();
                }
                Expansion::Split(rows) => {
                    for exploded in &rows {
                        sink.write_row(exploded)?;
                    }
                    stats.add_split(rows.len());
                }
                Expansion::Dropped => stats.add_dropped(),
            }
        }

        stats.add_chunk(rotator.close(sink)?);
        stats.set_duration(start.elapsed().as_millis() as u64);

        info!(
            "Wrote {} rows from {} records into {} chunks",
            stats.rows_written,
            stats.rows_read,
            stats.chunk_count()
        );
        Ok(stats)
    }
}
