//! ZIP packaging of split outputs.

use std::io::{Cursor, Write};

use tracing::debug;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, DateTime, ZipWriter};

use crate::engine::NamedBlob;
use crate::error::{PdfKnifeError, Result};

/// Packs named blobs into a single in-memory ZIP archive.
///
/// Entries keep the input order and their exact names, are DEFLATE
/// compressed, and carry a fixed timestamp, so identical inputs always give
/// byte-identical archives. Names are not deduplicated here; a repeated name
/// fails the whole archive.
#[derive(Debug, Clone, Copy)]
pub struct ArchivePackager {
    options: SimpleFileOptions,
}

impl ArchivePackager {
    /// Create a packager using DEFLATE compression.
    pub fn new() -> Self {
        Self {
            options: SimpleFileOptions::default()
                .compression_method(CompressionMethod::Deflated)
                .last_modified_time(DateTime::default()),
        }
    }

    /// Write every blob into one archive and return its bytes.
    ///
    /// # Errors
    ///
    /// Returns [`PdfKnifeError::ArchiveFailed`] if an entry cannot be written,
    /// including when two blobs share a name.
    pub fn package(&self, blobs: &[NamedBlob]) -> Result<Vec<u8>> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));

        for blob in blobs {
            writer.start_file(blob.name.as_str(), self.options)?;
            writer.write_all(&blob.bytes).map_err(|err| {
                PdfKnifeError::archive_failed(format!("cannot write {}: {err}", blob.name))
            })?;
        }

        let bytes = writer.finish()?.into_inner();
        debug!(entries = blobs.len(), size = bytes.len(), "packaged archive");
        Ok(bytes)
    }
}

impl Default for ArchivePackager {
    fn default() -> Self {
        Self::new()
    }
}
