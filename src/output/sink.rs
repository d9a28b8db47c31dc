//! CSV chunk files
//!
//! Provides the file-backed sink and rotator, plus the writer adapter that
//! re-encodes UTF-8 output into the configured encoding.

use super::naming::ChunkNaming;
use super::types::{ChunkRotator, ChunkSummary, RowSink};
use crate::config::CsvFormat;
use crate::error::{Error, Result};
use crate::types::DecodePolicy;
use encoding_rs::{Encoding, UTF_16BE, UTF_16LE, UTF_8};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

// ============================================================================
// Encoding Writer
// ============================================================================

/// Adapter that accepts UTF-8 bytes and writes them in another encoding.
///
/// Writes may split a multi-byte character; the incomplete tail is held back
/// until the rest arrives. UTF-16 output starts with a byte order mark.
pub struct EncodingWriter<W: Write> {
    inner: W,
    encoding: &'static Encoding,
    policy: DecodePolicy,
    pending: Vec<u8>,
    bom_written: bool,
}

impl<W: Write> EncodingWriter<W> {
    /// Wrap a writer
    pub fn new(inner: W, encoding: &'static Encoding, policy: DecodePolicy) -> Self {
        Self {
            inner,
            encoding,
            policy,
            pending: Vec::new(),
            bom_written: false,
        }
    }

    /// Get a reference to the wrapped writer
    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    /// Unwrap the writer. Fails if a partial character is still buffered.
    pub fn into_inner(self) -> io::Result<W> {
        if !self.pending.is_empty() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                "output ended in the middle of a UTF-8 sequence",
            ));
        }
        Ok(self.inner)
    }

    fn encode(&mut self, text: &str) -> io::Result<()> {
        if self.encoding == UTF_16LE || self.encoding == UTF_16BE {
            return self.encode_utf16(text);
        }

        let (bytes, _, unmappable) = self.encoding.encode(text);
        if unmappable && self.policy == DecodePolicy::Strict {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!(
                    "text contains characters that cannot be encoded as {}",
                    self.encoding.name()
                ),
            ));
        }
        self.inner.write_all(&bytes)
    }

    fn encode_utf16(&mut self, text: &str) -> io::Result<()> {
        if text.is_empty() {
            return Ok(());
        }
        let to_bytes: fn(u16) -> [u8; 2] = if self.encoding == UTF_16BE {
            u16::to_be_bytes
        } else {
            u16::to_le_bytes
        };

        let mut bytes = Vec::with_capacity(2 * (text.len() + 1));
        if !self.bom_written {
            bytes.extend_from_slice(&to_bytes(0xFEFF));
            self.bom_written = true;
        }
        bytes.extend(text.encode_utf16().flat_map(to_bytes));
        self.inner.write_all(&bytes)
    }
}

impl<W: Write> Write for EncodingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.encoding == UTF_8 {
            self.inner.write_all(buf)?;
            return Ok(buf.len());
        }

        self.pending.extend_from_slice(buf);
        let pending = std::mem::take(&mut self.pending);
        let valid = match std::str::from_utf8(&pending) {
            Ok(text) => text.len(),
            Err(e) if e.error_len().is_none() => e.valid_up_to(),
            Err(e) => return Err(io::Error::new(io::ErrorKind::InvalidData, e)),
        };

        // Split at a char boundary found above, so this cannot fail.
        if let Ok(text) = std::str::from_utf8(&pending[..valid]) {
            self.encode(text)?;
        }
        self.pending = pending[valid..].to_vec();
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

// ============================================================================
// CSV Sink
// ============================================================================

type ChunkWriter = csv::Writer<EncodingWriter<BufWriter<File>>>;

/// One chunk file being written
pub struct CsvSink {
    /// Chunk number
    index: usize,
    /// Destination file
    path: PathBuf,
    /// csv writer over the encoded file
    writer: ChunkWriter,
    /// Number of data rows written
    rows_written: usize,
}

impl CsvSink {
    /// Create (or truncate) the chunk file at `path`
    pub fn create(index: usize, path: impl Into<PathBuf>, format: &CsvFormat) -> Result<Self> {
        let path = path.into();
        let file = File::create(&path).map_err(|e| Error::write(index, &path, e.to_string()))?;

        let writer = csv::WriterBuilder::new()
            .delimiter(format.delimiter)
            .terminator(format.line_terminator.to_csv())
            .flexible(true)
            .from_writer(EncodingWriter::new(
                BufWriter::new(file),
                format.encoding,
                format.decode_policy,
            ));

        Ok(Self {
            index,
            path,
            writer,
            rows_written: 0,
        })
    }

    /// Chunk number
    pub fn index(&self) -> usize {
        self.index
    }

    /// Destination file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the header line. It does not count as a data row.
    pub fn write_header(&mut self, header: &[String]) -> Result<()> {
        self.writer
            .write_record(header)
            .map_err(|e| Error::write(self.index, &self.path, e.to_string()))
    }

    /// Flush everything to disk and close the file
    pub fn finish(self) -> Result<ChunkSummary> {
        let Self {
            index,
            path,
            writer,
            rows_written,
        } = self;

        let encoded = writer
            .into_inner()
            .map_err(|e| Error::write(index, &path, e.error().to_string()))?;
        let mut file = encoded
            .into_inner()
            .map_err(|e| Error::write(index, &path, e.to_string()))?;
        file.flush()
            .map_err(|e| Error::write(index, &path, e.to_string()))?;

        Ok(ChunkSummary {
            index,
            rows: rows_written,
            path: Some(path),
        })
    }
}

impl RowSink for CsvSink {
    fn write_row(&mut self, row: &[String]) -> Result<()> {
        self.writer
            .write_record(row)
            .map_err(|e| Error::write(self.index, &self.path, e.to_string()))?;
        self.rows_written += 1;
        Ok(())
    }

    fn rows_written(&self) -> usize {
        self.rows_written
    }
}

// ============================================================================
// File Rotator
// ============================================================================

/// Writes each chunk to its own file named by [`ChunkNaming`]
#[derive(Debug, Clone)]
pub struct FileRotator {
    naming: ChunkNaming,
    format: CsvFormat,
}

impl FileRotator {
    /// Create a rotator
    pub fn new(naming: ChunkNaming, format: CsvFormat) -> Self {
        Self { naming, format }
    }
}

impl ChunkRotator for FileRotator {
    type Sink = CsvSink;

    fn open(&mut self, index: usize, header: Option<&[String]>) -> Result<CsvSink> {
        let path = self.naming.path_for(index);
        debug!("Opening chunk {index} at {}", path.display());

        let mut sink = CsvSink::create(index, path, &self.format)?;
        if let Some(header) = header {
            sink.write_header(header)?;
        }
        Ok(sink)
    }

    fn close(&mut self, sink: CsvSink) -> Result<ChunkSummary> {
        let summary = sink.finish()?;
        info!("Finished writing chunk {}.", summary.index);
        debug!("Chunk {} holds {} rows", summary.index, summary.rows);
        Ok(summary)
    }
}
