//! Field concatenation rewrite

use crate::error::{Error, Result};
use crate::types::Row;

/// Appends `separator + row[source]` to `row[target]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldRewrite {
    target: usize,
    source: usize,
    separator: String,
}

impl FieldRewrite {
    /// Create a rewrite
    pub fn new(target: usize, source: usize, separator: impl Into<String>) -> Self {
        Self {
            target,
            source,
            separator: separator.into(),
        }
    }

    /// Field that receives the appended value
    pub fn target(&self) -> usize {
        self.target
    }

    /// Field whose value is appended
    pub fn source(&self) -> usize {
        self.source
    }

    /// Text placed between the two values
    pub fn separator(&self) -> &str {
        &self.separator
    }

    /// Rewrite a row in place
    pub fn apply(&self, row_number: usize, row: &mut Row) -> Result<()> {
        for index in [self.target, self.source] {
            if index >= row.len() {
                return Err(Error::field_index(row_number, index, row.len()));
            }
        }

        let suffix = row[self.source].clone();
        let target = &mut row[self.target];
        target.push_str(&self.separator);
        target.push_str(&suffix);
        Ok(())
    }
}
