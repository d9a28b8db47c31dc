//! Row transform module
//!
//! Per-row rewriting applied by the chunk engine before a row reaches a sink.
//!
//! # Overview
//!
//! - `FieldExploder` - expands one row into several when a field holds multiple values
//! - `FieldRewrite` - appends one field's value onto another
//! - `RowPipeline` - runs the optional rewrite, then the optional explosion
//!
//! Every step reports its result as an [`Expansion`], so the engine can tell
//! pass-through rows from split and dropped ones.

mod explode;
mod rewrite;

pub use explode::FieldExploder;
pub use rewrite::FieldRewrite;

use crate::error::Result;
use crate::types::Row;

/// Outcome of running one input row through the pipeline
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expansion {
    /// Write the input row as-is
    Unchanged,
    /// Write this single rewritten row instead of the input
    Rewritten(Row),
    /// The split field held several values, write one row per value
    Split(Vec<Row>),
    /// Nothing is written for this row
    Dropped,
}

impl Expansion {
    /// Number of output rows this expansion produces
    pub fn output_rows(&self) -> usize {
        match self {
            Self::Unchanged | Self::Rewritten(_) => 1,
            Self::Split(rows) => rows.len(),
            Self::Dropped => 0,
        }
    }
}

/// Ordered set of row transforms
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowPipeline {
    rewrite: Option<FieldRewrite>,
    exploder: Option<FieldExploder>,
}

impl RowPipeline {
    /// Create an empty pipeline (every row passes through)
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the field rewrite step
    #[must_use]
    pub fn with_rewrite(mut self, rewrite: Option<FieldRewrite>) -> Self {
        self.rewrite = rewrite;
        self
    }

    /// Set the field explosion step
    #[must_use]
    pub fn with_exploder(mut self, exploder: Option<FieldExploder>) -> Self {
        self.exploder = exploder;
        self
    }

    /// True when no step is configured
    pub fn is_identity(&self) -> bool {
        self.rewrite.is_none() && self.exploder.is_none()
    }

    /// Run a row through the pipeline.
    ///
    /// `row_number` is the 1-based data row number, used in error reports.
    pub fn apply(&self, row_number: usize, row: &[String]) -> Result<Expansion> {
        let rewritten = match &self.rewrite {
            Some(rewrite) => {
                let mut owned = row.to_vec();
                rewrite.apply(row_number, &mut owned)?;
                Some(owned)
            }
            None => None,
        };

        let Some(exploder) = &self.exploder else {
            return Ok(rewritten.map_or(Expansion::Unchanged, Expansion::Rewritten));
        };

        let current = rewritten.as_deref().unwrap_or(row);
        match exploder.explode(row_number, current)? {
            Expansion::Unchanged => Ok(rewritten.map_or(Expansion::Unchanged, Expansion::Rewritten)),
            other => Ok(other),
        }
    }
}
