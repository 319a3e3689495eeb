//! The two external operations: split and merge.
//!
//! Each call is self-contained: uploads come in, validated and named byte
//! buffers come out. Nothing is kept between calls.
//!
//! # Examples
//!
//! ```no_run
//! use pdfknife::config::Config;
//! use pdfknife::ops::{self, SplitOutput};
//! use pdfknife::validation::Upload;
//!
//! # async fn example(bytes: Vec<u8>) -> pdfknife::Result<()> {
//! let upload = Upload::new("report.pdf", bytes);
//! match ops::split(upload, "1,3-5", &Config::default()).await? {
//!     SplitOutput::Document(pdf) => println!("single document {}", pdf.name),
//!     SplitOutput::Archive(zip) => println!("archive {}", zip.name),
//! }
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use futures::{StreamExt, TryStreamExt, stream};
use serde::Serialize;
use tokio::task;
use tracing::debug;

use crate::archive::ArchivePackager;
use crate::config::Config;
use crate::document::SourceDocument;
use crate::engine::{MergeResult, Merger, NamedBlob, PlannedOutput, SplitResult, Splitter};
use crate::error::{PdfKnifeError, Result};
use crate::selection::{PageSelection, parse_selections};
use crate::validation::{Upload, ValidationGate};

/// What a split delivers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SplitOutput {
    /// Exactly one group survived; its PDF is returned directly.
    Document(NamedBlob),
    /// Several groups survived; their PDFs are packed into one ZIP.
    Archive(NamedBlob),
}

impl SplitOutput {
    /// The delivered blob.
    pub fn blob(&self) -> &NamedBlob {
        match self {
            Self::Document(blob) | Self::Archive(blob) => blob,
        }
    }

    /// Take the delivered blob.
    pub fn into_blob(self) -> NamedBlob {
        match self {
            Self::Document(blob) | Self::Archive(blob) => blob,
        }
    }

    /// True if the result is a ZIP archive.
    pub fn is_archive(&self) -> bool {
        matches!(self, Self::Archive(_))
    }
}

/// Split `upload` by `range_spec`.
///
/// Returns the lone PDF when one group survives resolution and a ZIP of all
/// outputs otherwise.
///
/// # Errors
///
/// Returns an error if:
/// - The upload is rejected by the validation gate
/// - The range specification contains no page numbers or too many selections
/// - The upload is not a readable PDF
/// - No selection names an existing page
/// - An output document or the archive cannot be written
pub async fn split(upload: Upload, range_spec: &str, config: &Config) -> Result<SplitOutput> {
    let result = split_documents(upload, range_spec, config).await?;
    package_outputs(result.outputs, config)
}

/// Split `upload` by `range_spec` without packaging.
///
/// Returns every output document individually, in request order, together
/// with split statistics.
///
/// # Errors
///
/// Same as [`split`], minus archive failures.
pub async fn split_documents(
    upload: Upload,
    range_spec: &str,
    config: &Config,
) -> Result<SplitResult> {
    let (selections, source) = prepare_split(upload, range_spec, config)?;
    Splitter::from_config(config)
        .split(Arc::new(source), &selections)
        .await
}

/// Deliver split outputs as a single document or an archive.
///
/// # Errors
///
/// Returns [`PdfKnifeError::ArchiveFailed`] if the archive cannot be written.
pub fn package_outputs(mut outputs: Vec<NamedBlob>, config: &Config) -> Result<SplitOutput> {
    if outputs.len() == 1
        && let Some(only) = outputs.pop()
    {
        return Ok(SplitOutput::Document(only));
    }

    let bytes = ArchivePackager::new().package(&outputs)?;
    Ok(SplitOutput::Archive(NamedBlob::new(
        config.archive_name.clone(),
        bytes,
    )))
}

/// What a split would produce, computed without building any document.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SplitPlan {
    /// Name of the source upload.
    pub source: String,

    /// Page count of the source.
    pub source_pages: usize,

    /// Selections parsed from the range specification.
    pub selections_requested: usize,

    /// Outputs that would be built, in order.
    pub outputs: Vec<PlannedOutput>,

    /// Archive name if the outputs would be packaged.
    pub archive: Option<String>,
}

/// Plan a split: validate, parse, resolve and name, but build nothing.
///
/// # Errors
///
/// Same as [`split`], minus serialization and archive failures.
pub fn plan_split(upload: Upload, range_spec: &str, config: &Config) -> Result<SplitPlan> {
    let (selections, source) = prepare_split(upload, range_spec, config)?;
    let outputs = Splitter::from_config(config).plan(&selections, source.page_count())?;

    Ok(SplitPlan {
        source: source.label().to_string(),
        source_pages: source.page_count(),
        selections_requested: selections.len(),
        archive: (outputs.len() > 1).then(|| config.archive_name.clone()),
        outputs,
    })
}

fn prepare_split(
    upload: Upload,
    range_spec: &str,
    config: &Config,
) -> Result<(Vec<PageSelection>, SourceDocument)> {
    let gate = ValidationGate::from_config(config);
    gate.check_split(std::slice::from_ref(&upload))?;

    let selections = parse_selections(range_spec)?;
    gate.check_selections(&selections)?;

    let source = SourceDocument::open_named(upload.name, upload.bytes)?;
    Ok((selections, source))
}

/// Merge `uploads` in the order given.
///
/// # Errors
///
/// Returns an error if:
/// - Fewer than two uploads are supplied
/// - The uploads are rejected by the validation gate
/// - Any upload is not a readable PDF
/// - The merged document cannot be written
pub async fn merge(uploads: Vec<Upload>, config: &Config) -> Result<NamedBlob> {
    let result = merge_documents(uploads, config).await?;
    Ok(NamedBlob::new(config.merged_name.clone(), result.bytes))
}

/// Merge `uploads` in the order given, returning merge statistics.
///
/// # Errors
///
/// Same as [`merge`].
pub async fn merge_documents(uploads: Vec<Upload>, config: &Config) -> Result<MergeResult> {
    let sources = prepare_merge(uploads, config).await?;
    Merger::from_config(config).merge(sources).await
}

/// One source in a merge plan.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlannedSource {
    /// Name of the upload.
    pub name: String,

    /// Pages it contributes.
    pub pages: usize,
}

/// What a merge would produce, computed without building the document.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MergePlan {
    /// Sources in merge order.
    pub sources: Vec<PlannedSource>,

    /// Page count of the merged document.
    pub total_pages: usize,

    /// Name the merged document would get.
    pub output: String,
}

/// Plan a merge: validate and open every upload, but build nothing.
///
/// # Errors
///
/// Same as [`merge`], minus serialization failures.
pub async fn plan_merge(uploads: Vec<Upload>, config: &Config) -> Result<MergePlan> {
    let sources: Vec<PlannedSource> = prepare_merge(uploads, config)
        .await?
        .iter()
        .map(|source| PlannedSource {
            name: source.label().to_string(),
            pages: source.page_count(),
        })
        .collect();

    Ok(MergePlan {
        total_pages: sources.iter().map(|s| s.pages).sum(),
        sources,
        output: config.merged_name.clone(),
    })
}

async fn prepare_merge(uploads: Vec<Upload>, config: &Config) -> Result<Vec<SourceDocument>> {
    if uploads.len() < 2 {
        return Err(PdfKnifeError::InsufficientInputs {
            provided: uploads.len(),
        });
    }

    let summary = ValidationGate::from_config(config).check_merge(&uploads)?;
    debug!(
        files = summary.files_validated,
        total_size = %summary.format_total_size(),
        "merge uploads accepted"
    );

    open_all(uploads, config.effective_jobs()).await
}

/// Parse uploads on the blocking pool, keeping their order.
async fn open_all(uploads: Vec<Upload>, jobs: usize) -> Result<Vec<SourceDocument>> {
    stream::iter(uploads.into_iter().map(|upload| async move {
        match task::spawn_blocking(move || SourceDocument::open_named(upload.name, upload.bytes))
            .await
        {
            Ok(opened) => opened,
            Err(err) => Err(PdfKnifeError::serialization(format!(
                "document reader failed: {err}"
            ))),
        }
    }))
    .buffered(jobs.max(1))
    .try_collect()
    .await
}

/// Outcome of a split, for machine-readable output.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SplitReport {
    /// Name of the source upload.
    pub source: String,

    /// Page count of the source.
    pub source_pages: usize,

    /// Selections in the request.
    pub groups_requested: usize,

    /// Selections dropped for falling outside the document.
    pub groups_dropped: usize,

    /// Output documents, in order.
    pub outputs: Vec<ReportEntry>,

    /// Name of the delivered file, when outputs were packaged.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivered: Option<String>,

    /// Whether the delivered file is a ZIP archive.
    pub archive: bool,

    /// Size of the delivered file in bytes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivered_size: Option<u64>,

    /// Wall time of the split in milliseconds.
    pub duration_ms: u128,
}

/// One output document in a report.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportEntry {
    /// Filename of the output.
    pub name: String,

    /// Size in bytes.
    pub size: u64,
}

impl SplitReport {
    /// Summarize a split whose outputs were kept as separate files.
    pub fn new(source: &str, result: &SplitResult) -> Self {
        let stats = &result.statistics;
        Self {
            source: source.to_string(),
            source_pages: stats.source_pages,
            groups_requested: stats.groups_requested,
            groups_dropped: stats.groups_dropped,
            outputs: result
                .outputs
                .iter()
                .map(|blob| ReportEntry {
                    name: blob.name.clone(),
                    size: blob.size(),
                })
                .collect(),
            delivered: None,
            archive: false,
            delivered_size: None,
            duration_ms: stats.split_time.as_millis(),
        }
    }

    /// Record how the outputs were delivered.
    pub fn delivered_as(mut self, delivered: &SplitOutput) -> Self {
        let blob = delivered.blob();
        self.delivered = Some(blob.name.clone());
        self.archive = delivered.is_archive();
        self.delivered_size = Some(blob.size());
        self
    }
}

/// Outcome of a merge, for machine-readable output.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MergeReport {
    /// Name of the merged document.
    pub output: String,

    /// Number of documents merged.
    pub files_merged: usize,

    /// Pages contributed by each document, in merge order.
    pub pages_per_file: Vec<usize>,

    /// Page count of the merged document.
    pub total_pages: usize,

    /// Combined size of the inputs in bytes.
    pub input_size: u64,

    /// Size of the merged document in bytes.
    pub output_size: u64,

    /// Wall time of the merge in milliseconds.
    pub duration_ms: u128,
}

impl MergeReport {
    /// Summarize a merge.
    pub fn new(output: &str, result: &MergeResult) -> Self {
        let stats = &result.statistics;
        Self {
            output: output.to_string(),
            files_merged: stats.files_merged,
            pages_per_file: stats.pages_per_file.clone(),
            total_pages: stats.total_pages,
            input_size: stats.input_size,
            output_size: result.bytes.len() as u64,
            duration_ms: stats.merge_time.as_millis(),
        }
    }
}
