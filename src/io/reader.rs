//! Loading input files into uploads.
//!
//! # Examples
//!
//! ```no_run
//! use pdfknife::io::reader::UploadReader;
//! use std::path::PathBuf;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let reader = UploadReader::new();
//! let paths = vec![PathBuf::from("a.pdf"), PathBuf::from("b.pdf")];
//! let uploads = reader.load_all(&paths, 4).await?;
//! # Ok(())
//! # }
//! ```

use std::path::{Path, PathBuf};

use futures::stream::{self, StreamExt, TryStreamExt};
use tracing::debug;

use crate::error::{PdfKnifeError, Result, ValidationFailure};
use crate::validation::{PDF_CONTENT_TYPE, Upload};

/// Reads files from disk into [`Upload`]s.
#[derive(Debug, Clone, Default)]
pub struct UploadReader {
    /// Refuse files larger than this before reading them.
    max_file_size: Option<u64>,
}

impl UploadReader {
    /// Create a reader without a size ceiling.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a reader that refuses files above `limit` bytes unread.
    pub fn with_size_limit(limit: u64) -> Self {
        Self {
            max_file_size: Some(limit),
        }
    }

    /// Load a single file.
    ///
    /// Files with a `.pdf` extension are declared as `application/pdf`;
    /// anything else is left undeclared and judged by its header.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file does not exist or is not a regular file
    /// - The file cannot be read
    /// - The file exceeds the size ceiling
    pub async fn load(&self, path: &Path) -> Result<Upload> {
        let metadata = tokio::fs::metadata(path).await.map_err(|err| {
            if err.kind() == std::io::ErrorKind::NotFound {
                PdfKnifeError::file_not_found(path.to_path_buf())
            } else {
                PdfKnifeError::FileNotAccessible {
                    path: path.to_path_buf(),
                    source: err,
                }
            }
        })?;

        if !metadata.is_file() {
            return Err(PdfKnifeError::NotAFile {
                path: path.to_path_buf(),
            });
        }

        let name = display_name(path);

        if let Some(limit) = self.max_file_size
            && metadata.len() > limit
        {
            return Err(ValidationFailure::FileTooLarge {
                name,
                size: metadata.len(),
                limit,
            }
            .into());
        }

        let bytes = tokio::fs::read(path)
            .await
            .map_err(|err| PdfKnifeError::FileNotAccessible {
                path: path.to_path_buf(),
                source: err,
            })?;

        debug!(path = %path.display(), size = bytes.len(), "loaded input file");

        let upload = Upload::new(name, bytes);
        Ok(match declared_content_type(path) {
            Some(content_type) => upload.with_content_type(content_type),
            None => upload,
        })
    }

    /// Load files one at a time in the order provided.
    pub async fn load_sequential(&self, paths: &[PathBuf]) -> Result<Vec<Upload>> {
        let mut uploads = Vec::with_capacity(paths.len());
        for path in paths {
            uploads.push(self.load(path).await?);
        }
        Ok(uploads)
    }

    /// Load files concurrently with up to `workers` reads in flight.
    ///
    /// Results keep the order of `paths`.
    pub async fn load_parallel(&self, paths: &[PathBuf], workers: usize) -> Result<Vec<Upload>> {
        stream::iter(paths.iter().map(|path| self.load(path)))
            .buffered(workers.max(1))
            .try_collect()
            .await
    }

    /// Load all files, choosing sequential or parallel reads by batch size.
    ///
    /// Sequential is used for small batches to reduce overhead.
    pub async fn load_all(&self, paths: &[PathBuf], max_workers: usize) -> Result<Vec<Upload>> {
        if paths.len() <= 3 {
            self.load_sequential(paths).await
        } else {
            self.load_parallel(paths, max_workers).await
        }
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn declared_content_type(path: &Path) -> Option<&'static str> {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
        .then_some(PDF_CONTENT_TYPE)
}
