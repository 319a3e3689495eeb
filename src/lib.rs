//! pdfknife - Split PDF files by page ranges and merge PDF files.
//!
//! The library exposes two self-contained operations:
//!
//! - [`ops::split`] extracts page groups from one document. A single
//!   surviving group comes back as a PDF; several are packed into a ZIP.
//! - [`ops::merge`] concatenates two or more documents in the order given.
//!
//! Both take uploaded bytes and return named byte buffers. Nothing is kept
//! between calls.
//!
//! # Examples
//!
//! ```no_run
//! use pdfknife::config::Config;
//! use pdfknife::validation::Upload;
//!
//! # async fn example(a: Vec<u8>, b: Vec<u8>) -> pdfknife::Result<()> {
//! let uploads = vec![Upload::new("a.pdf", a), Upload::new("b.pdf", b)];
//! let merged = pdfknife::ops::merge(uploads, &Config::default()).await?;
//! std::fs::write(&merged.name, &merged.bytes)?;
//! # Ok(())
//! # }
//! ```

pub mod archive;
pub mod config;
pub mod document;
pub mod engine;
pub mod error;
pub mod io;
pub mod naming;
pub mod ops;
pub mod output;
pub mod selection;
pub mod utils;
pub mod validation;

pub use error::{PdfKnifeError, PdfKnifeError as Error, Result, ValidationFailure};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
