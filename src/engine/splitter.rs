//! Split one source document into page-group documents.

use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::{StreamExt, TryStreamExt, stream};
use serde::Serialize;
use tokio::task;
use tracing::{debug, info};

use super::NamedBlob;
use crate::config::{CompressionLevel, Config};
use crate::document::{OutputDocument, SourceDocument};
use crate::error::{PdfKnifeError, Result};
use crate::naming::NameAllocator;
use crate::selection::{PageGroup, PageSelection, resolve_all};

/// One output a split will produce.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlannedOutput {
    /// Filename allocated for the output.
    pub name: String,

    /// 1-based source pages, in output order.
    pub pages: PageGroup,
}

/// Statistics about a split operation.
#[derive(Debug, Clone)]
pub struct SplitStatistics {
    /// Selections in the request.
    pub groups_requested: usize,

    /// Selections that fell entirely outside the document.
    pub groups_dropped: usize,

    /// Page count of the source document.
    pub source_pages: usize,

    /// Pages written across all outputs, repeats included.
    pub pages_written: usize,

    /// Total time taken for the split.
    pub split_time: Duration,
}

/// Result of a split operation.
#[derive(Debug)]
pub struct SplitResult {
    /// Built documents, in request order.
    pub outputs: Vec<NamedBlob>,

    /// Statistics about the split.
    pub statistics: SplitStatistics,
}

/// Builds one document per resolved page group.
#[derive(Debug, Clone)]
pub struct Splitter {
    compression: CompressionLevel,
    jobs: usize,
}

impl Splitter {
    /// Create a splitter that builds up to `jobs` documents at once.
    pub fn new(compression: CompressionLevel, jobs: usize) -> Self {
        Self {
            compression,
            jobs: jobs.max(1),
        }
    }

    /// Create a splitter from configuration.
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.compression, config.effective_jobs())
    }

    /// Resolve selections against a page count and name the outputs.
    ///
    /// Groups that resolve empty are dropped. Names are allocated in a single
    /// ordered pass, so the same request always yields the same names.
    ///
    /// # Errors
    ///
    /// Returns [`PdfKnifeError::NoValidPages`] if every group is dropped.
    pub fn plan(
        &self,
        selections: &[PageSelection],
        total_pages: usize,
    ) -> Result<Vec<PlannedOutput>> {
        let groups = resolve_all(selections, total_pages);
        if groups.is_empty() {
            return Err(PdfKnifeError::NoValidPages { total_pages });
        }

        let mut names = NameAllocator::new();
        Ok(groups
            .into_iter()
            .map(|pages| PlannedOutput {
                name: names.allocate(&pages),
                pages,
            })
            .collect())
    }

    /// Split `source` into one document per surviving selection.
    ///
    /// Documents are built concurrently on the blocking pool and returned in
    /// request order. Dropping the returned future abandons groups that have
    /// not started.
    ///
    /// # Errors
    ///
    /// Returns [`PdfKnifeError::NoValidPages`] if no selection names an
    /// existing page, or [`PdfKnifeError::Serialization`] if a document
    /// cannot be built.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # use std::sync::Arc;
    /// # use pdfknife::config::CompressionLevel;
    /// # use pdfknife::document::SourceDocument;
    /// # use pdfknife::engine::Splitter;
    /// # use pdfknife::selection::parse_selections;
    /// # async fn example(bytes: Vec<u8>) -> pdfknife::Result<()> {
    /// let source = Arc::new(SourceDocument::open(bytes)?);
    /// let selections = parse_selections("1,3-5")?;
    /// let result = Splitter::new(CompressionLevel::Standard, 4)
    ///     .split(source, &selections)
    ///     .await?;
    /// for output in &result.outputs {
    ///     println!("{} ({} bytes)", output.name, output.size());
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn split(
        &self,
        source: Arc<SourceDocument>,
        selections: &[PageSelection],
    ) -> Result<SplitResult> {
        let start = Instant::now();
        let plan = self.plan(selections, source.page_count())?;
        let planned = plan.len();
        let pages_written = plan.iter().map(|output| output.pages.len()).sum();

        debug!(
            source = source.label(),
            outputs = planned,
            jobs = self.jobs,
            "building split outputs"
        );

        let compression = self.compression;
        let outputs: Vec<NamedBlob> = stream::iter(plan.into_iter().map(|output| {
            let source = Arc::clone(&source);
            async move {
                match task::spawn_blocking(move || build_output(&source, output, compression)).await
                {
                    Ok(built) => built,
                    Err(err) => Err(PdfKnifeError::serialization(format!(
                        "document worker failed: {err}"
                    ))),
                }
            }
        }))
        .buffered(self.jobs)
        .try_collect()
        .await?;

        let statistics = SplitStatistics {
            groups_requested: selections.len(),
            groups_dropped: selections.len() - planned,
            source_pages: source.page_count(),
            pages_written,
            split_time: start.elapsed(),
        };

        info!(
            source = source.label(),
            outputs = outputs.len(),
            dropped = statistics.groups_dropped,
            "split complete"
        );

        Ok(SplitResult {
            outputs,
            statistics,
        })
    }
}

fn build_output(
    source: &SourceDocument,
    planned: PlannedOutput,
    compression: CompressionLevel,
) -> Result<NamedBlob> {
    // Resolved pages are always >= 1.
    let indices: Vec<usize> = planned.pages.iter().map(|&p| p as usize - 1).collect();

    let mut document = OutputDocument::new();
    let tokens = document.copy_pages(source, &indices)?;
    document.append_pages(tokens);

    Ok(NamedBlob::new(planned.name, document.serialize(compression)?))
}
