//! Field-to-row explosion

use super::Expansion;
use crate::error::{Error, Result};
use crate::types::SplitKey;

/// Splits a multi-value field into one output row per value.
///
/// A row is a split candidate when the target field contains the field
/// delimiter. Candidates are tokenized according to [`SplitKey`]; every other
/// field is copied verbatim into each output row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldExploder {
    /// 0-based index of the field to split
    field: usize,
    /// Marker that identifies a multi-value field
    delimiter: String,
    /// How candidate fields are tokenized
    split_on: SplitKey,
    /// Drop rows that are not split candidates
    split_field_only: bool,
}

impl FieldExploder {
    /// Create an exploder that splits `field` on `delimiter` and drops
    /// rows without a match
    pub fn new(field: usize, delimiter: impl Into<String>) -> Self {
        Self {
            field,
            delimiter: delimiter.into(),
            split_on: SplitKey::Delimiter,
            split_field_only: true,
        }
    }

    /// Set the tokenization key
    #[must_use]
    pub fn with_split_on(mut self, split_on: SplitKey) -> Self {
        self.split_on = split_on;
        self
    }

    /// Keep (`false`) or drop (`true`) rows whose field holds a single value
    #[must_use]
    pub fn with_split_field_only(mut self, split_field_only: bool) -> Self {
        self.split_field_only = split_field_only;
        self
    }

    /// Index of the field being split
    pub fn field(&self) -> usize {
        self.field
    }

    /// Field delimiter
    pub fn delimiter(&self) -> &str {
        &self.delimiter
    }

    /// Tokenization key
    pub fn split_on(&self) -> SplitKey {
        self.split_on
    }

    /// Whether non-matching rows are dropped
    pub fn split_field_only(&self) -> bool {
        self.split_field_only
    }

    /// Check whether the row's target field holds multiple values
    pub fn is_split(&self, row_number: usize, row: &[String]) -> Result<bool> {
        let value = row
            .get(self.field)
            .ok_or_else(|| Error::field_index(row_number, self.field, row.len()))?;
        Ok(value.contains(self.delimiter.as_str()))
    }

    /// Expand a row
    pub fn explode(&self, row_number: usize, row: &[String]) -> Result<Expansion> {
        if !self.is_split(row_number, row)? {
            return Ok(if self.split_field_only {
                Expansion::Dropped
            } else {
                Expansion::Unchanged
            });
        }

        let rows = self
            .tokens(&row[self.field])
            .into_iter()
            .map(|token| {
                let mut out = row.to_vec();
                out[self.field] = token.to_string();
                out
            })
            .collect();
        Ok(Expansion::Split(rows))
    }

    fn tokens<'a>(&self, value: &'a str) -> Vec<&'a str> {
        match self.split_on {
            SplitKey::Delimiter => value
                .split(self.delimiter.as_str())
                .map(|token| token.trim_matches(|c: char| c.is_ascii_whitespace()))
                .collect(),
            SplitKey::Whitespace => value.split_ascii_whitespace().collect(),
        }
    }
}
