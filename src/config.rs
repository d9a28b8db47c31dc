//! Job configuration
//!
//! A job is described by a [`JobConfig`], which can be loaded from a YAML or
//! JSON file and overridden by command-line flags. [`JobConfig::resolve`]
//! validates the merged result into [`RunSettings`] before any file I/O.

use crate::error::{Error, Result};
use crate::transform::{FieldExploder, FieldRewrite};
use crate::types::{DecodePolicy, LineTerminator, Operation, SplitKey};
use encoding_rs::Encoding;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

// ============================================================================
// Defaults
// ============================================================================

/// Data rows per chunk when none is configured
pub const DEFAULT_CHUNK_SIZE: usize = 5000;

/// Field delimiter when none is configured
pub const DEFAULT_DELIMITER: u8 = b',';

/// Encoding label when none is configured
pub const DEFAULT_ENCODING: &str = "utf-8";

/// Separator placed between values joined by a field rewrite
pub const DEFAULT_REWRITE_SEPARATOR: &str = "-";

// ============================================================================
// Job Config (file + CLI)
// ============================================================================

/// Unvalidated job description
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct JobConfig {
    /// Operation name (`chunk` or `split-field`)
    pub operation: Option<String>,

    /// Source file
    pub file: Option<PathBuf>,

    /// Directory for chunk files (defaults to the source directory)
    pub output_dir: Option<PathBuf>,

    /// Data rows per chunk
    pub chunk_size: Option<i64>,

    /// Repeat the header at the top of every chunk
    pub keep_header: Option<bool>,

    /// Encoding label (WHATWG names, e.g. `utf-8`, `windows-1252`)
    pub encoding: Option<String>,

    /// Single-character field delimiter
    pub delimiter: Option<String>,

    /// Policy for malformed or unmappable characters
    pub decode_errors: Option<DecodePolicy>,

    /// Record terminator for output files
    pub line_terminator: Option<LineTerminator>,

    /// Field explosion settings (split-field operation)
    pub split: Option<SplitConfig>,

    /// Field concatenation rewrite
    pub rewrite: Option<RewriteConfig>,
}

/// Field explosion settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SplitConfig {
    /// 0-based index of the field to split
    pub field: Option<i64>,

    /// Text marking a multi-value field
    pub field_delimiter: Option<String>,

    /// `yes` drops rows that are not split, `no` keeps them
    pub split_field_only: Option<String>,

    /// Tokenization key
    pub split_on: Option<SplitKey>,
}

/// Field concatenation settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RewriteConfig {
    /// 0-based index of the field that receives the appended value
    pub target: Option<i64>,

    /// 0-based index of the field whose value is appended
    pub source: Option<i64>,

    /// Separator between the two values
    pub separator: Option<String>,
}

impl JobConfig {
    /// Load a job file. `.json` files are parsed as JSON, anything else as YAML.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            Error::config(format!(
                "Failed to read config file '{}': {e}",
                path.display()
            ))
        })?;

        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if is_json {
            Self::from_json(&content)
        } else {
            Self::from_yaml(&content)
        }
    }

    /// Parse a job from YAML
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Parse a job from JSON
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Merge two configs. Values set in `overrides` win.
    #[must_use]
    pub fn merge(self, overrides: JobConfig) -> JobConfig {
        JobConfig {
            operation: overrides.operation.or(self.operation),
            file: overrides.file.or(self.file),
            output_dir: overrides.output_dir.or(self.output_dir),
            chunk_size: overrides.chunk_size.or(self.chunk_size),
            keep_header: overrides.keep_header.or(self.keep_header),
            encoding: overrides.encoding.or(self.encoding),
            delimiter: overrides.delimiter.or(self.delimiter),
            decode_errors: overrides.decode_errors.or(self.decode_errors),
            line_terminator: overrides.line_terminator.or(self.line_terminator),
            split: merge_option(self.split, overrides.split, SplitConfig::merge),
            rewrite: merge_option(self.rewrite, overrides.rewrite, RewriteConfig::merge),
        }
    }

    /// Validate the config into run settings, applying defaults
    pub fn resolve(self) -> Result<RunSettings> {
        let operation: Operation = self
            .operation
            .as_deref()
            .ok_or_else(|| Error::missing_field("operation"))?
            .parse()?;

        let source = self
            .file
            .filter(|p| !p.as_os_str().is_empty())
            .ok_or_else(|| Error::missing_field("file"))?;

        let chunk_size = match self.chunk_size {
            Some(size) => parse_chunk_size(size)?,
            None => {
                info!("No chunk size given. Default chunk size used: {DEFAULT_CHUNK_SIZE}");
                DEFAULT_CHUNK_SIZE
            }
        };

        let encoding = match non_blank(self.encoding.as_deref()) {
            Some(label) => parse_encoding(label)?,
            None => {
                info!("No encoding given. Default encoding used: {DEFAULT_ENCODING}");
                encoding_rs::UTF_8
            }
        };

        let delimiter = match self.delimiter.as_deref().filter(|d| !d.is_empty()) {
            Some(raw) => parse_delimiter(raw)?,
            None => {
                info!(
                    "No delimiter given. Default delimiter used: {}",
                    char::from(DEFAULT_DELIMITER)
                );
                DEFAULT_DELIMITER
            }
        };

        let format = CsvFormat::new()
            .with_delimiter(delimiter)
            .with_encoding(encoding)
            .with_decode_policy(self.decode_errors.unwrap_or_default())
            .with_line_terminator(self.line_terminator.unwrap_or_default());

        let exploder = match operation {
            Operation::SplitField => Some(
                self.split
                    .ok_or_else(|| Error::missing_field("split.field"))?
                    .resolve()?,
            ),
            Operation::Chunk => {
                if self.split.is_some() {
                    tracing::warn!("Split settings are ignored by the chunk operation");
                }
                None
            }
        };

        let rewrite = self.rewrite.map(RewriteConfig::resolve).transpose()?;

        Ok(RunSettings {
            operation,
            source,
            output_dir: self.output_dir,
            chunk_size,
            keep_header: self.keep_header.unwrap_or(true),
            format,
            rewrite,
            exploder,
        })
    }
}

impl SplitConfig {
    fn merge(self, overrides: SplitConfig) -> SplitConfig {
        SplitConfig {
            field: overrides.field.or(self.field),
            field_delimiter: overrides.field_delimiter.or(self.field_delimiter),
            split_field_only: overrides.split_field_only.or(self.split_field_only),
            split_on: overrides.split_on.or(self.split_on),
        }
    }

    fn resolve(self) -> Result<FieldExploder> {
        let field = parse_index(
            "split.field",
            self.field.ok_or_else(|| Error::missing_field("split.field"))?,
        )?;

        let delimiter = self
            .field_delimiter
            .filter(|d| !d.is_empty())
            .ok_or_else(|| Error::missing_field("split.field_delimiter"))?;

        let split_field_only = match non_blank(self.split_field_only.as_deref()) {
            Some(value) => parse_yes_no("split.split_field_only", value)?,
            None => true,
        };

        info!("Field to split: {field}");
        info!("Field delimiter: {delimiter}");
        info!(
            "Split field only: {}",
            if split_field_only { "yes" } else { "no" }
        );

        Ok(FieldExploder::new(field, delimiter)
            .with_split_on(self.split_on.unwrap_or_default())
            .with_split_field_only(split_field_only))
    }
}

impl RewriteConfig {
    fn merge(self, overrides: RewriteConfig) -> RewriteConfig {
        RewriteConfig {
            target: overrides.target.or(self.target),
            source: overrides.source.or(self.source),
            separator: overrides.separator.or(self.separator),
        }
    }

    fn resolve(self) -> Result<FieldRewrite> {
        let target = parse_index(
            "rewrite.target",
            self.target
                .ok_or_else(|| Error::missing_field("rewrite.target"))?,
        )?;
        let source = parse_index(
            "rewrite.source",
            self.source
                .ok_or_else(|| Error::missing_field("rewrite.source"))?,
        )?;
        let separator = self
            .separator
            .unwrap_or_else(|| DEFAULT_REWRITE_SEPARATOR.to_string());
        Ok(FieldRewrite::new(target, source, separator))
    }
}

fn merge_option<T>(base: Option<T>, overrides: Option<T>, merge: fn(T, T) -> T) -> Option<T> {
    match (base, overrides) {
        (Some(base), Some(overrides)) => Some(merge(base, overrides)),
        (base, overrides) => overrides.or(base),
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

// ============================================================================
// Validation helpers
// ============================================================================

/// Validate a chunk size. Zero and negative values are rejected.
pub fn parse_chunk_size(size: i64) -> Result<usize> {
    if size < 1 {
        return Err(Error::invalid_value(
            "chunk_size",
            format!("must be a positive integer, got {size}"),
        ));
    }
    usize::try_from(size)
        .map_err(|_| Error::invalid_value("chunk_size", format!("{size} is too large")))
}

/// Validate a 0-based field index
pub fn parse_index(field: &str, index: i64) -> Result<usize> {
    usize::try_from(index).map_err(|_| {
        Error::invalid_value(field, format!("must be a 0-based field index, got {index}"))
    })
}

/// Parse a delimiter into the single byte the csv reader and writer need.
///
/// `\t` and `tab` name the TAB character.
pub fn parse_delimiter(raw: &str) -> Result<u8> {
    let value = match raw {
        "\\t" | "tab" | "TAB" => "\t",
        other => other,
    };

    let mut chars = value.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii() && !matches!(c, '"' | '\r' | '\n') => Ok(c as u8),
        (Some(c), None) if c.is_ascii() => Err(Error::invalid_value(
            "delimiter",
            format!("{c:?} cannot be used as a delimiter"),
        )),
        _ => Err(Error::invalid_value(
            "delimiter",
            format!("'{raw}' must be a single ASCII character"),
        )),
    }
}

/// Look up an encoding by its WHATWG label
pub fn parse_encoding(label: &str) -> Result<&'static Encoding> {
    Encoding::for_label(label.trim().as_bytes())
        .ok_or_else(|| Error::invalid_value("encoding", format!("unknown encoding '{label}'")))
}

/// Parse a yes/no flag
pub fn parse_yes_no(field: &str, value: &str) -> Result<bool> {
    match value.trim().to_lowercase().as_str() {
        "yes" | "y" | "true" => Ok(true),
        "no" | "n" | "false" => Ok(false),
        other => Err(Error::invalid_value(
            field,
            format!("expected 'yes' or 'no', got '{other}'"),
        )),
    }
}

// ============================================================================
// Resolved settings
// ============================================================================

/// How delimited text is read and written
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CsvFormat {
    /// Field delimiter byte
    pub delimiter: u8,
    /// Text encoding for both input and output
    pub encoding: &'static Encoding,
    /// Policy for malformed or unmappable characters
    pub decode_policy: DecodePolicy,
    /// Output record terminator
    pub line_terminator: LineTerminator,
}

impl Default for CsvFormat {
    fn default() -> Self {
        Self {
            delimiter: DEFAULT_DELIMITER,
            encoding: encoding_rs::UTF_8,
            decode_policy: DecodePolicy::default(),
            line_terminator: LineTerminator::default(),
        }
    }
}

impl CsvFormat {
    /// Comma-delimited UTF-8 with CRLF terminators
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the delimiter
    #[must_use]
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Set the encoding
    #[must_use]
    pub fn with_encoding(mut self, encoding: &'static Encoding) -> Self {
        self.encoding = encoding;
        self
    }

    /// Set the decode policy
    #[must_use]
    pub fn with_decode_policy(mut self, policy: DecodePolicy) -> Self {
        self.decode_policy = policy;
        self
    }

    /// Set the line terminator
    #[must_use]
    pub fn with_line_terminator(mut self, terminator: LineTerminator) -> Self {
        self.line_terminator = terminator;
        self
    }
}

/// Validated settings for one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSettings {
    /// Operation to perform
    pub operation: Operation,
    /// Source file
    pub source: PathBuf,
    /// Directory override for chunk files
    pub output_dir: Option<PathBuf>,
    /// Input rows per chunk (always >= 1)
    pub chunk_size: usize,
    /// Repeat the header in every chunk
    pub keep_header: bool,
    /// Read/write format
    pub format: CsvFormat,
    /// Optional field concatenation
    pub rewrite: Option<FieldRewrite>,
    /// Field explosion, set for the split-field operation
    pub exploder: Option<FieldExploder>,
}
