//! Core PDF merging implementation.
//!
//! Every page of every source is copied, in caller order, into one new
//! document. Sources are never reordered.

use std::time::{Duration, Instant};

use tokio::task;
use tracing::{debug, info};

use crate::config::{CompressionLevel, Config};
use crate::document::{OutputDocument, SourceDocument};
use crate::error::{PdfKnifeError, Result};
use crate::utils::format_file_size;

/// Statistics about a merge operation.
#[derive(Debug, Clone)]
pub struct MergeStatistics {
    /// Number of PDFs merged.
    pub files_merged: usize,

    /// Total number of pages in merged document.
    pub total_pages: usize,

    /// Page count contributed by each source, in merge order.
    pub pages_per_file: Vec<usize>,

    /// Total size of input documents.
    pub input_size: u64,

    /// Total time taken for merge.
    pub merge_time: Duration,

    /// Whether compression was applied.
    pub compressed: bool,
}

impl MergeStatistics {
    /// Format input size as human-readable string.
    pub fn format_input_size(&self) -> String {
        format_file_size(self.input_size)
    }
}

/// Result of a merge operation.
#[derive(Debug)]
pub struct MergeResult {
    /// The serialized merged document.
    pub bytes: Vec<u8>,

    /// Statistics about the merge.
    pub statistics: MergeStatistics,
}

/// PDF merger that combines multiple documents.
#[derive(Debug, Clone, Default)]
pub struct Merger {
    compression: CompressionLevel,
}

impl Merger {
    /// Create a merger that writes with the given compression.
    pub fn new(compression: CompressionLevel) -> Self {
        Self { compression }
    }

    /// Create a merger from configuration.
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.compression)
    }

    /// Merge `sources` into one document, in the order given.
    ///
    /// A source without pages contributes nothing and is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Fewer than two sources are supplied
    /// - The merged document cannot be serialized
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # use pdfknife::config::CompressionLevel;
    /// # use pdfknife::document::SourceDocument;
    /// # use pdfknife::engine::Merger;
    /// # async fn example(a: Vec<u8>, b: Vec<u8>) -> pdfknife::Result<()> {
    /// let sources = vec![SourceDocument::open(a)?, SourceDocument::open(b)?];
    /// let result = Merger::new(CompressionLevel::Standard).merge(sources).await?;
    /// println!("Merged {} files into {} pages",
    ///          result.statistics.files_merged,
    ///          result.statistics.total_pages);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn merge(&self, sources: Vec<SourceDocument>) -> Result<MergeResult> {
        if sources.len() < 2 {
            return Err(PdfKnifeError::InsufficientInputs {
                provided: sources.len(),
            });
        }

        let compression = self.compression;
        task::spawn_blocking(move || merge_documents(&sources, compression))
            .await
            .map_err(|err| PdfKnifeError::serialization(format!("merge worker failed: {err}")))?
    }
}

fn merge_documents(sources: &[SourceDocument], compression: CompressionLevel) -> Result<MergeResult> {
    let merge_start = Instant::now();
    let mut merged = OutputDocument::new();

    for source in sources {
        let indices: Vec<usize> = (0..source.page_count()).collect();
        let tokens = merged.copy_pages(source, &indices)?;
        merged.append_pages(tokens);

        debug!(
            source = source.label(),
            pages = source.page_count(),
            "appended source"
        );
    }

    let total_pages = merged.page_count();
    let bytes = merged.serialize(compression)?;

    let statistics = MergeStatistics {
        files_merged: sources.len(),
        total_pages,
        pages_per_file: sources.iter().map(SourceDocument::page_count).collect(),
        input_size: sources.iter().map(|s| s.bytes().len() as u64).sum(),
        merge_time: merge_start.elapsed(),
        compressed: compression != CompressionLevel::None,
    };

    info!(
        files = statistics.files_merged,
        pages = statistics.total_pages,
        "merge complete"
    );

    Ok(MergeResult { bytes, statistics })
}
