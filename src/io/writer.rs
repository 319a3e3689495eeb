//! Writing output files.
//!
//! This module provides safe output writing with:
//! - Atomic writes (write to temp file, then rename)
//! - Overwrite checks
//! - Write statistics
//!
//! # Examples
//!
//! ```no_run
//! use pdfknife::io::writer::OutputWriter;
//! use std::path::Path;
//!
//! # async fn example(bytes: Vec<u8>) -> Result<(), Box<dyn std::error::Error>> {
//! let writer = OutputWriter::new();
//! let stats = writer.write(bytes, Path::new("merged.pdf")).await?;
//! println!("Wrote {} in {:?}", stats.format_file_size(), stats.write_time);
//! # Ok(())
//! # }
//! ```

use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use tokio::task;
use tracing::debug;

use crate::engine::NamedBlob;
use crate::error::{PdfKnifeError, Result};
use crate::utils::format_file_size;

/// Statistics about a write operation.
#[derive(Debug, Clone)]
pub struct WriteStatistics {
    /// Time taken to write the file.
    pub write_time: Duration,

    /// Size of the written file in bytes.
    pub file_size: u64,

    /// Path where the file was written.
    pub output_path: PathBuf,
}

impl WriteStatistics {
    /// Format file size as human-readable string.
    pub fn format_file_size(&self) -> String {
        format_file_size(self.file_size)
    }
}

/// Writes byte buffers to disk.
///
/// Every write goes to a hidden temp file next to the target and is renamed
/// into place.
#[derive(Debug, Clone, Default)]
pub struct OutputWriter;

impl OutputWriter {
    /// Create a writer.
    pub fn new() -> Self {
        Self
    }

    /// Write `bytes` to `path`, replacing any existing file.
    ///
    /// # Errors
    ///
    /// Returns [`PdfKnifeError::FailedToWrite`] if the file cannot be
    /// created, written or renamed into place.
    pub async fn write(&self, bytes: Vec<u8>, path: &Path) -> Result<WriteStatistics> {
        let path_buf = path.to_path_buf();

        let stats = task::spawn_blocking(move || write_file(&bytes, path_buf))
            .await
            .map_err(|err| PdfKnifeError::FailedToWrite {
                path: path.to_path_buf(),
                source: std::io::Error::other(err),
            })??;

        debug!(
            path = %stats.output_path.display(),
            size = stats.file_size,
            "wrote output file"
        );
        Ok(stats)
    }

    /// Write every blob into `dir` under its own name, in order.
    ///
    /// # Errors
    ///
    /// Stops at the first blob that cannot be written.
    pub async fn write_all(&self, blobs: Vec<NamedBlob>, dir: &Path) -> Result<Vec<WriteStatistics>> {
        let mut stats = Vec::with_capacity(blobs.len());
        for blob in blobs {
            let path = dir.join(&blob.name);
            stats.push(self.write(blob.bytes, &path).await?);
        }
        Ok(stats)
    }

    /// Check if a file can be written to the given path.
    ///
    /// Performs pre-flight checks without actually writing.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Parent directory doesn't exist
    /// - Parent directory is not writable
    pub async fn can_write(&self, path: &Path) -> Result<()> {
        let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) else {
            return Ok(());
        };

        let metadata = tokio::fs::metadata(parent).await.map_err(|err| {
            if err.kind() == std::io::ErrorKind::NotFound {
                PdfKnifeError::invalid_config(format!(
                    "Output directory does not exist: {}",
                    parent.display()
                ))
            } else {
                PdfKnifeError::FileNotAccessible {
                    path: parent.to_path_buf(),
                    source: err,
                }
            }
        })?;

        if metadata.permissions().readonly() {
            return Err(PdfKnifeError::invalid_config(format!(
                "Output directory is not writable: {}",
                parent.display()
            )));
        }

        Ok(())
    }

    /// Check if output file exists.
    pub async fn exists(&self, path: &Path) -> bool {
        tokio::fs::metadata(path).await.is_ok()
    }
}

fn write_file(bytes: &[u8], path: PathBuf) -> Result<WriteStatistics> {
    let start = Instant::now();

    let write_path = temp_path(&path);
    let failed = |source| PdfKnifeError::FailedToWrite {
        path: write_path.clone(),
        source,
    };

    let mut file = std::fs::File::create(&write_path).map_err(failed)?;
    file.write_all(bytes).map_err(failed)?;
    file.sync_all().map_err(failed)?;
    drop(file);

    std::fs::rename(&write_path, &path).map_err(|source| {
        // Best effort; the rename error is what gets reported.
        let _ = std::fs::remove_file(&write_path);
        PdfKnifeError::FailedToWrite {
            path: path.clone(),
            source,
        }
    })?;

    Ok(WriteStatistics {
        write_time: start.elapsed(),
        file_size: bytes.len() as u64,
        output_path: path,
    })
}

/// Hidden sibling of `path` used for atomic writes.
fn temp_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!(".{name}.tmp"))
}
