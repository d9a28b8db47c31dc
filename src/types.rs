//! Common types used throughout coti
//!
//! This module contains the small shared enums that configuration,
//! the record store, the writers and the CLI all agree on.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Type Aliases
// ============================================================================

/// A single parsed record: an ordered sequence of string fields
pub type Row = Vec<String>;

// ============================================================================
// Operation
// ============================================================================

/// Operation to perform on the source file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    /// Split the file into chunks of at most N data rows
    Chunk,
    /// Explode a multi-value field into additional rows
    SplitField,
}

impl Operation {
    /// All accepted operation names
    pub const NAMES: [&'static str; 2] = ["chunk", "split-field"];

    /// Canonical name of the operation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Chunk => "chunk",
            Self::SplitField => "split-field",
        }
    }
}

impl FromStr for Operation {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "chunk" => Ok(Self::Chunk),
            "split-field" | "split_field" | "splitfield" => Ok(Self::SplitField),
            "" => Err(Error::missing_field("operation")),
            other => Err(Error::invalid_value(
                "operation",
                format!(
                    "'{other}' is not a valid operation. Valid operations are: {}",
                    Self::NAMES.join(", ")
                ),
            )),
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Decode Policy
// ============================================================================

/// What to do with byte sequences that the configured encoding cannot represent
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum DecodePolicy {
    /// Fail the run
    #[default]
    Strict,
    /// Substitute a replacement and keep going
    Replace,
}

// ============================================================================
// Split Key
// ============================================================================

/// How a multi-value field is tokenized once it is known to contain the field delimiter
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum SplitKey {
    /// Split on the field delimiter itself
    #[default]
    Delimiter,
    /// Split on runs of ASCII whitespace
    Whitespace,
}

// ============================================================================
// Line Terminator
// ============================================================================

/// Record terminator written after every output row
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum LineTerminator {
    /// `\r\n`
    #[default]
    Crlf,
    /// `\n`
    Lf,
}

impl LineTerminator {
    /// Terminator setting for the csv writer
    pub fn to_csv(self) -> csv::Terminator {
        match self {
            Self::Crlf => csv::Terminator::CRLF,
            Self::Lf => csv::Terminator::Any(b'\n'),
        }
    }

    /// The terminator as text
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Crlf => "\r\n",
            Self::Lf => "\n",
        }
    }
}
