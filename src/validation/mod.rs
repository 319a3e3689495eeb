//! Upload validation for pdfknife.
//!
//! The gate runs before any document is opened or any range is parsed. It
//! performs:
//! - File count checks (split takes one document, merge a bounded batch)
//! - Per-file and aggregate size ceilings
//! - Declared content-type and `%PDF-` header checks
//! - A cap on the number of selections in a range specification
//!
//! # Examples
//!
//! ```
//! use pdfknife::config::Limits;
//! use pdfknife::validation::{Upload, ValidationGate};
//!
//! let gate = ValidationGate::new(Limits::default());
//! let upload = Upload::new("report.pdf", b"%PDF-1.7\n...".to_vec())
//!     .with_content_type("application/pdf");
//! let summary = gate.check_split(std::slice::from_ref(&upload)).unwrap();
//! assert_eq!(summary.files_validated, 1);
//! ```

use serde::Serialize;

use crate::config::{Config, Limits};
use crate::error::{Result, ValidationFailure};
use crate::selection::PageSelection;
use crate::utils::format_file_size;

/// The only content type accepted when one is declared.
pub const PDF_CONTENT_TYPE: &str = "application/pdf";

/// Marker every PDF starts with.
const PDF_MAGIC: &[u8] = b"%PDF-";

/// How far into the file the header may appear. Some producers emit junk
/// before it, and viewers tolerate that within the first kilobyte.
const HEADER_SEARCH_WINDOW: usize = 1024;

/// A document handed to an operation: a name, an optional declared content
/// type, and its bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Upload {
    /// Original filename, used in messages.
    pub name: String,

    /// Content type declared by the sender, if any.
    pub content_type: Option<String>,

    /// File contents.
    pub bytes: Vec<u8>,
}

impl Upload {
    /// Create an upload without a declared content type.
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            content_type: None,
            bytes,
        }
    }

    /// Attach a declared content type.
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Size of the upload in bytes.
    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

/// Result of validating a single upload.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadSummary {
    /// Name of the upload.
    pub name: String,

    /// Size of the upload in bytes.
    pub size: u64,
}

/// Summary of a validated batch.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationSummary {
    /// Individual results, in upload order.
    pub files: Vec<UploadSummary>,

    /// Total size in bytes.
    pub total_size: u64,

    /// Number of uploads that passed.
    pub files_validated: usize,
}

impl ValidationSummary {
    fn from_uploads(uploads: &[Upload]) -> Self {
        let files: Vec<UploadSummary> = uploads
            .iter()
            .map(|upload| UploadSummary {
                name: upload.name.clone(),
                size: upload.size(),
            })
            .collect();

        Self {
            total_size: files.iter().map(|f| f.size).sum(),
            files_validated: files.len(),
            files,
        }
    }

    /// Format the total size as a human-readable string.
    pub fn format_total_size(&self) -> String {
        format_file_size(self.total_size)
    }
}

/// Enforces upload constraints before any engine runs.
#[derive(Debug, Clone, Default)]
pub struct ValidationGate {
    limits: Limits,
}

impl ValidationGate {
    /// Create a gate enforcing `limits`.
    pub fn new(limits: Limits) -> Self {
        Self { limits }
    }

    /// Create a gate from configuration.
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.limits)
    }

    /// Limits this gate enforces.
    pub fn limits(&self) -> &Limits {
        &self.limits
    }

    /// Validate the uploads of a split request.
    ///
    /// # Errors
    ///
    /// Returns a validation error unless exactly one acceptable PDF is given.
    pub fn check_split(&self, uploads: &[Upload]) -> Result<ValidationSummary> {
        check_count(uploads.len(), 1, 1)?;
        for upload in uploads {
            self.check_upload(upload)?;
        }
        Ok(ValidationSummary::from_uploads(uploads))
    }

    /// Validate the uploads of a merge request.
    ///
    /// # Errors
    ///
    /// Returns a validation error if:
    /// - The file count is outside the merge bounds
    /// - The combined size exceeds the aggregate ceiling
    /// - Any single upload is rejected by [`check_upload`](Self::check_upload)
    pub fn check_merge(&self, uploads: &[Upload]) -> Result<ValidationSummary> {
        check_count(
            uploads.len(),
            self.limits.min_merge_files,
            self.limits.max_merge_files,
        )?;

        let total: u64 = uploads.iter().map(Upload::size).sum();
        if total > self.limits.max_total_size {
            return Err(ValidationFailure::TotalTooLarge {
                size: total,
                limit: self.limits.max_total_size,
            }
            .into());
        }

        for upload in uploads {
            self.check_upload(upload)?;
        }
        Ok(ValidationSummary::from_uploads(uploads))
    }

    /// Validate one upload on its own.
    ///
    /// # Errors
    ///
    /// Returns a validation error if the upload is empty, exceeds the
    /// per-file ceiling, declares a non-PDF content type, or lacks a PDF
    /// header.
    pub fn check_upload(&self, upload: &Upload) -> Result<()> {
        if upload.bytes.is_empty() {
            return Err(ValidationFailure::EmptyFile {
                name: upload.name.clone(),
            }
            .into());
        }

        if upload.size() > self.limits.max_file_size {
            return Err(ValidationFailure::FileTooLarge {
                name: upload.name.clone(),
                size: upload.size(),
                limit: self.limits.max_file_size,
            }
            .into());
        }

        if let Some(content_type) = &upload.content_type
            && !is_pdf_content_type(content_type)
        {
            return Err(ValidationFailure::NotPdf {
                name: upload.name.clone(),
                detail: format!("declared content type {content_type}"),
            }
            .into());
        }

        if !has_pdf_header(&upload.bytes) {
            return Err(ValidationFailure::NotPdf {
                name: upload.name.clone(),
                detail: "missing %PDF- header".to_string(),
            }
            .into());
        }

        Ok(())
    }

    /// Validate the size of a parsed range specification.
    ///
    /// # Errors
    ///
    /// Returns a validation error if a selection cap is configured and there
    /// are more selections than it allows.
    pub fn check_selections(&self, selections: &[PageSelection]) -> Result<()> {
        match self.limits.max_selections {
            Some(limit) if selections.len() > limit => Err(ValidationFailure::TooManySelections {
                count: selections.len(),
                limit,
            }
            .into()),
            _ => Ok(()),
        }
    }
}

fn check_count(provided: usize, min: usize, max: usize) -> Result<()> {
    if provided < min || provided > max {
        return Err(ValidationFailure::FileCount { provided, min, max }.into());
    }
    Ok(())
}

/// Compare the media type, ignoring parameters and case.
fn is_pdf_content_type(content_type: &str) -> bool {
    let media_type = content_type.split(';').next().unwrap_or_default().trim();
    media_type.eq_ignore_ascii_case(PDF_CONTENT_TYPE)
}

fn has_pdf_header(bytes: &[u8]) -> bool {
    let window = &bytes[..bytes.len().min(HEADER_SEARCH_WINDOW)];
    window
        .windows(PDF_MAGIC.len())
        .any(|candidate| candidate == PDF_MAGIC)
}
