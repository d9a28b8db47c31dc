//! Chunk file naming
//!
//! Chunk `n` of `dir/name.ext` is written to `dir/name(n).ext`.

use crate::error::{Error, Result};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Derives chunk file paths from a source path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkNaming {
    directory: PathBuf,
    stem: OsString,
    extension: Option<OsString>,
}

impl ChunkNaming {
    /// Name chunks after `source`, placing them next to it
    pub fn from_source(source: impl AsRef<Path>) -> Result<Self> {
        let source = source.as_ref();
        let stem = source.file_stem().ok_or_else(|| {
            Error::config(format!(
                "Source path '{}' does not name a file",
                source.display()
            ))
        })?;

        Ok(Self {
            directory: source.parent().map(Path::to_path_buf).unwrap_or_default(),
            stem: stem.to_os_string(),
            extension: source.extension().map(|ext| ext.to_os_string()),
        })
    }

    /// Place chunks in `directory` instead of the source directory
    #[must_use]
    pub fn with_directory(mut self, directory: impl Into<PathBuf>) -> Self {
        self.directory = directory.into();
        self
    }

    /// Directory chunks are written to
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// File name of chunk `index`, e.g. `orders(3).csv`
    pub fn file_name(&self, index: usize) -> OsString {
        let mut name = self.stem.clone();
        name.push(format!("({index})"));
        if let Some(ext) = &self.extension {
            name.push(".");
            name.push(ext);
        }
        name
    }

    /// Full path of chunk `index`
    pub fn path_for(&self, index: usize) -> PathBuf {
        self.directory.join(self.file_name(index))
    }
}
