//! Configuration module for pdfknife.
//!
//! This module holds the validated, normalized settings that drive split and
//! merge invocations:
//! - Upload ceilings enforced by the validation gate
//! - Output compression
//! - Parallelism for per-group document construction
//! - Output naming and overwrite behavior for the command-line surface

use anyhow::{Result, bail};

use crate::PdfKnifeError;
use std::str::FromStr;

/// Default number of documents accepted by merge.
pub const DEFAULT_MAX_MERGE_FILES: usize = 10;

/// Default aggregate size ceiling for merge uploads (4.5 MiB).
pub const DEFAULT_MAX_TOTAL_SIZE: u64 = 4_718_592;

/// Default per-file size ceiling (10 MiB).
pub const DEFAULT_MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// Default filename of the split archive.
pub const DEFAULT_ARCHIVE_NAME: &str = "split_pdfs.zip";

/// Default filename of the merged document.
pub const DEFAULT_MERGED_NAME: &str = "merged.pdf";

/// Compression level for output PDFs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompressionLevel {
    /// No compression - streams are written as copied.
    None,
    /// Compress uncompressed streams (default).
    #[default]
    Standard,
    /// Compress streams and drop unreferenced objects.
    Maximum,
}

impl FromStr for CompressionLevel {
    type Err = PdfKnifeError;

    /// Parse compression level from "none", "standard" or "maximum".
    fn from_str(s: &str) -> crate::Result<Self> {
        match s.to_lowercase().as_str() {
            "none" => Ok(Self::None),
            "standard" => Ok(Self::Standard),
            "maximum" => Ok(Self::Maximum),
            _ => Err(PdfKnifeError::InvalidConfig {
                message: format!(
                    "Invalid compression level: {s}. Must be one of: none, standard, maximum"
                ),
            }),
        }
    }
}

/// Output file overwrite behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverwriteMode {
    /// Prompt the user before overwriting (default).
    #[default]
    Prompt,
    /// Always overwrite without prompting.
    Force,
    /// Never overwrite, error if file exists.
    NoClobber,
}

/// Resource ceilings applied before any document is opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    /// Fewest documents merge accepts.
    pub min_merge_files: usize,

    /// Most documents merge accepts.
    pub max_merge_files: usize,

    /// Aggregate byte ceiling across all merge uploads.
    pub max_total_size: u64,

    /// Byte ceiling for any single upload.
    pub max_file_size: u64,

    /// Most selections a single range specification may contain. Unbounded
    /// when `None`.
    pub max_selections: Option<usize>,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            min_merge_files: 2,
            max_merge_files: DEFAULT_MAX_MERGE_FILES,
            max_total_size: DEFAULT_MAX_TOTAL_SIZE,
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            max_selections: None,
        }
    }
}

/// Complete configuration for a split or merge invocation.
#[derive(Debug, Clone)]
pub struct Config {
    /// Upload ceilings.
    pub limits: Limits,

    /// Compression applied to every output document.
    pub compression: CompressionLevel,

    /// Number of groups built concurrently (None = auto-detect).
    pub jobs: Option<usize>,

    /// Filename of the archive produced by a multi-output split.
    pub archive_name: String,

    /// Filename of the merged document.
    pub merged_name: String,

    /// Dry run mode - plan without building documents.
    pub dry_run: bool,

    /// Verbose output mode.
    pub verbose: bool,

    /// Quiet mode - suppress non-error output.
    pub quiet: bool,

    /// File overwrite behavior.
    pub overwrite_mode: OverwriteMode,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            limits: Limits::default(),
            compression: CompressionLevel::default(),
            jobs: None,
            archive_name: DEFAULT_ARCHIVE_NAME.to_string(),
            merged_name: DEFAULT_MERGED_NAME.to_string(),
            dry_run: false,
            verbose: false,
            quiet: false,
            overwrite_mode: OverwriteMode::default(),
        }
    }
}

impl Config {
    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Verbose and quiet modes are both enabled
    /// - Jobs count is zero
    /// - Merge file bounds are inverted or allow fewer than two files
    /// - A size or selection ceiling is zero
    /// - An output name is empty or contains a path separator
    pub fn validate(&self) -> Result<()> {
        if self.verbose && self.quiet {
            bail!("Cannot use both --verbose and --quiet");
        }

        if let Some(jobs) = self.jobs
            && jobs == 0
        {
            bail!("Number of jobs must be at least 1");
        }

        let limits = &self.limits;
        if limits.min_merge_files < 2 {
            bail!("Merge needs at least 2 files, got a minimum of {}", limits.min_merge_files);
        }

        if limits.max_merge_files < limits.min_merge_files {
            bail!(
                "Maximum merge file count ({}) is below the minimum ({})",
                limits.max_merge_files,
                limits.min_merge_files
            );
        }

        if limits.max_file_size == 0 || limits.max_total_size == 0 {
            bail!("Size limits must be greater than zero");
        }

        if limits.max_selections == Some(0) {
            bail!("Selection limit must be at least 1");
        }

        for name in [&self.archive_name, &self.merged_name] {
            if name.trim().is_empty() {
                bail!("Output names cannot be empty");
            }
            if name.contains(['/', '\\']) {
                bail!("Output name must be a file name, not a path: {name}");
            }
        }

        Ok(())
    }

    /// Get the effective number of parallel jobs.
    ///
    /// Returns the configured job count, or the number of CPU cores if auto-detect.
    pub fn effective_jobs(&self) -> usize {
        self.jobs.unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1)
        })
    }

    /// Check if output should be displayed.
    ///
    /// Returns false if in quiet mode and not doing a dry run.
    pub fn should_print(&self) -> bool {
        !self.quiet || self.dry_run
    }
}
