//! Record store module
//!
//! Holds the fully-read contents of a source file in memory.
//!
//! # Overview
//!
//! The source is read in one go, decoded with the configured encoding and
//! parsed with the configured delimiter. The first record is always the
//! header; everything after it is data, kept in file order.

mod reader;

pub use reader::decode_source;

use crate::config::CsvFormat;
use crate::error::{Error, Result};
use crate::types::Row;
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

/// Parsed header and data rows of one source file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordStore {
    header: Option<Row>,
    rows: Vec<Row>,
}

impl RecordStore {
    /// Create a store from an already-parsed header and rows
    pub fn new(header: Option<Row>, rows: Vec<Row>) -> Self {
        Self { header, rows }
    }

    /// Read, decode and parse a source file
    pub fn load(path: impl AsRef<Path>, format: &CsvFormat) -> Result<Self> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|e| Error::read(path, e.to_string()))?;
        debug!("Read {} bytes from {}", bytes.len(), path.display());

        let text = decode_source(path, &bytes, format.encoding, format.decode_policy)?;
        let store =
            Self::parse_csv(&text, format.delimiter).map_err(|e| Error::read(path, describe(&e)))?;

        let blanks = blank_lines(&text);
        if blanks > 0 {
            warn!(
                "Skipped {blanks} blank line(s) in {}; they are not records and do not count toward chunk sizes",
                path.display()
            );
        }

        info!("Total record count: {}", store.len());
        Ok(store)
    }

    /// Parse decoded text. The first record becomes the header.
    pub fn parse(text: &str, delimiter: u8) -> Result<Self> {
        Self::parse_csv(text, delimiter).map_err(|e| Error::read("<input>", describe(&e)))
    }

    fn parse_csv(text: &str, delimiter: u8) -> csv::Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .delimiter(delimiter)
            .from_reader(text.as_bytes());

        let mut records = reader.records();
        let header = match records.next() {
            Some(record) => Some(to_row(&record?)),
            None => None,
        };

        let rows = records
            .map(|record| record.map(|r| to_row(&r)))
            .collect::<csv::Result<Vec<_>>>()?;

        Ok(Self { header, rows })
    }

    /// Header row, absent when the source was empty
    pub fn header(&self) -> Option<&[String]> {
        self.header.as_deref()
    }

    /// Data rows in file order
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Number of data rows (the header is not counted)
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True when there are no data rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// True when there is at least one data row
    pub fn has_data(&self) -> bool {
        !self.rows.is_empty()
    }
}

fn to_row(record: &csv::StringRecord) -> Row {
    record.iter().map(str::to_string).collect()
}

/// Count lines that are empty outside quoted fields. The csv reader skips them.
fn blank_lines(text: &str) -> usize {
    let mut in_quotes = false;
    let mut at_line_start = true;
    let mut blanks = 0;
    for c in text.chars() {
        match c {
            '"' => {
                in_quotes = !in_quotes;
                at_line_start = false;
            }
            '\n' if !in_quotes => {
                if at_line_start {
                    blanks += 1;
                }
                at_line_start = true;
            }
            '\r' if !in_quotes => {}
            _ => at_line_start = false,
        }
    }
    blanks
}

fn describe(e: &csv::Error) -> String {
    match e.position() {
        Some(pos) => format!("line {}: {e}", pos.line()),
        None => e.to_string(),
    }
}

#[cfg(test)]
mod tests;
