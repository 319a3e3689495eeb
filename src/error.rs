//! Error types for pdfknife.
//!
//! Every failure a split or merge invocation can produce is a variant of
//! [`PdfKnifeError`], so callers branch on the kind of failure rather than on
//! its message.
//!
//! # Error Categories
//!
//! - **Validation Errors**: rejected uploads, before any document is opened
//! - **Decode Errors**: a byte stream that is not a usable PDF
//! - **Selection Errors**: nothing to extract from the requested pages
//! - **Engine Errors**: serialization or archive failures
//! - **I/O Errors**: file system problems on the command-line surface

use std::io;
use std::path::PathBuf;

use crate::utils::format_file_size;

/// Result type alias for pdfknife operations.
pub type Result<T> = std::result::Result<T, PdfKnifeError>;

/// Reason an upload was rejected by the validation gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationFailure {
    /// Too few or too many documents were supplied.
    FileCount {
        /// Number of documents supplied.
        provided: usize,
        /// Minimum accepted count.
        min: usize,
        /// Maximum accepted count.
        max: usize,
    },

    /// A single document exceeds the per-file ceiling.
    FileTooLarge {
        /// Name of the offending upload.
        name: String,
        /// Size of the upload in bytes.
        size: u64,
        /// Ceiling in bytes.
        limit: u64,
    },

    /// The documents together exceed the aggregate ceiling.
    TotalTooLarge {
        /// Combined size in bytes.
        size: u64,
        /// Ceiling in bytes.
        limit: u64,
    },

    /// An upload declared or contained something other than a PDF.
    NotPdf {
        /// Name of the offending upload.
        name: String,
        /// What was found instead.
        detail: String,
    },

    /// An upload contained no bytes.
    EmptyFile {
        /// Name of the offending upload.
        name: String,
    },

    /// The range specification expands to more selections than allowed.
    TooManySelections {
        /// Number of selections found.
        count: usize,
        /// Maximum accepted.
        limit: usize,
    },
}

impl std::fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::FileCount { provided, min, max } if min == max => {
                write!(f, "expected exactly {min} PDF file(s), got {provided}")
            }
            Self::FileCount { provided, min, max } => {
                write!(f, "expected between {min} and {max} PDF files, got {provided}")
            }
            Self::FileTooLarge { name, size, limit } => write!(
                f,
                "{name} is {} which exceeds the {} per-file limit",
                format_file_size(*size),
                format_file_size(*limit)
            ),
            Self::TotalTooLarge { size, limit } => write!(
                f,
                "total upload size {} exceeds the {} limit",
                format_file_size(*size),
                format_file_size(*limit)
            ),
            Self::NotPdf { name, detail } => write!(f, "{name} is not a PDF ({detail})"),
            Self::EmptyFile { name } => write!(f, "{name} is empty"),
            Self::TooManySelections { count, limit } => write!(
                f,
                "page selection contains {count} entries, at most {limit} are allowed"
            ),
        }
    }
}

/// Main error type for pdfknife operations.
#[derive(Debug, thiserror::Error)]
pub enum PdfKnifeError {
    /// Upload rejected before any document was opened.
    #[error("Invalid upload: {reason}")]
    Validation {
        /// What the gate rejected.
        reason: ValidationFailure,
    },

    /// A supplied byte stream is not a parseable PDF.
    #[error("Failed to read PDF: {name}\n  Reason: {reason}")]
    Decode {
        /// Name of the document.
        name: String,
        /// Parser message.
        reason: String,
    },

    /// A supplied PDF is encrypted.
    #[error(
        "PDF is encrypted and cannot be processed: {name}\n  \
         Hint: Decrypt the PDF first using 'qpdf --decrypt' or similar tools"
    )]
    Encrypted {
        /// Name of the document.
        name: String,
    },

    /// The page selection contained no page numbers at all.
    #[error(
        "No page numbers found in '{input}'. Use formats like '1', '2-4', '1,3-5', or '1,1-2'"
    )]
    EmptySelection {
        /// The rejected input.
        input: String,
    },

    /// Every requested page group fell outside the document.
    #[error("Nothing to extract: no requested page exists in a {total_pages}-page document")]
    NoValidPages {
        /// Page count of the source document.
        total_pages: usize,
    },

    /// Fewer than two documents were supplied to merge.
    #[error("At least 2 PDF files are required to merge, got {provided}")]
    InsufficientInputs {
        /// Number of documents supplied.
        provided: usize,
    },

    /// An output document could not be serialized.
    #[error("Failed to build output document: {reason}")]
    Serialization {
        /// Underlying failure.
        reason: String,
    },

    /// The output archive could not be written.
    #[error("Failed to write archive: {reason}")]
    ArchiveFailed {
        /// Underlying failure.
        reason: String,
    },

    /// Input file was not found.
    #[error("File not found: {}", .path.display())]
    FileNotFound {
        /// Path to the missing file.
        path: PathBuf,
    },

    /// Path exists but is not a regular file.
    #[error("Not a file: {}", .path.display())]
    NotAFile {
        /// Offending path.
        path: PathBuf,
    },

    /// Input file could not be read.
    #[error("Cannot access file: {}\n  Reason: {source}", .path.display())]
    FileNotAccessible {
        /// Path to the inaccessible file.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// Output file already exists and overwrite is not allowed.
    #[error(
        "Output file already exists: {}\n  \
         Use --force to overwrite or choose a different output path",
        .path.display()
    )]
    OutputExists {
        /// Path to the existing output.
        path: PathBuf,
    },

    /// Failed to write an output file.
    #[error("Failed to write to output file: {}\n  Reason: {source}", .path.display())]
    FailedToWrite {
        /// Path being written to.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// Invalid configuration.
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        /// What is wrong with the configuration.
        message: String,
    },

    /// User cancelled the operation.
    #[error("Operation cancelled by user")]
    Cancelled,

    /// Generic I/O error.
    #[error("I/O error: {source}")]
    Io {
        /// Underlying I/O error.
        #[from]
        source: io::Error,
    },
}

impl From<ValidationFailure> for PdfKnifeError {
    fn from(reason: ValidationFailure) -> Self {
        Self::Validation { reason }
    }
}

impl From<zip::result::ZipError> for PdfKnifeError {
    fn from(err: zip::result::ZipError) -> Self {
        Self::archive_failed(err.to_string())
    }
}

impl From<anyhow::Error> for PdfKnifeError {
    fn from(err: anyhow::Error) -> Self {
        Self::invalid_config(err.to_string())
    }
}

impl PdfKnifeError {
    /// Create a Decode error, recognising encryption failures.
    pub fn decode(name: impl Into<String>, err: &lopdf::Error) -> Self {
        let name = name.into();
        let reason = err.to_string();
        let lowered = reason.to_lowercase();
        if lowered.contains("encrypt") || lowered.contains("password") || lowered.contains("decrypt")
        {
            Self::Encrypted { name }
        } else {
            Self::Decode { name, reason }
        }
    }

    /// Create a Serialization error.
    pub fn serialization(reason: impl Into<String>) -> Self {
        Self::Serialization {
            reason: reason.into(),
        }
    }

    /// Create an ArchiveFailed error.
    pub fn archive_failed(reason: impl Into<String>) -> Self {
        Self::ArchiveFailed {
            reason: reason.into(),
        }
    }

    /// Create a FileNotFound error.
    pub fn file_not_found(path: PathBuf) -> Self {
        Self::FileNotFound { path }
    }

    /// Create an OutputExists error.
    pub fn output_exists(path: PathBuf) -> Self {
        Self::OutputExists { path }
    }

    /// Create an InvalidConfig error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// True for conditions the user caused and can fix by changing the request.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            Self::Validation { .. }
                | Self::EmptySelection { .. }
                | Self::NoValidPages { .. }
                | Self::InsufficientInputs { .. }
        )
    }

    /// True for engine faults that abort the invocation.
    pub fn is_internal(&self) -> bool {
        matches!(self, Self::Serialization { .. } | Self::ArchiveFailed { .. })
    }

    /// Get the process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Validation { .. } => 1,
            Self::Decode { .. } => 3,
            Self::Encrypted { .. } => 3,
            Self::EmptySelection { .. } => 1,
            Self::NoValidPages { .. } => 1,
            Self::InsufficientInputs { .. } => 1,
            Self::Serialization { .. } => 6,
            Self::ArchiveFailed { .. } => 6,
            Self::FileNotFound { .. } => 2,
            Self::NotAFile { .. } => 2,
            Self::FileNotAccessible { .. } => 2,
            Self::OutputExists { .. } => 4,
            Self::FailedToWrite { .. } => 5,
            Self::InvalidConfig { .. } => 1,
            Self::Cancelled => 130, // Standard exit code for SIGINT
            Self::Io { .. } => 5,
        }
    }
}
