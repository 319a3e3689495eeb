//! File I/O for the command-line surface.
//!
//! The library operations work on in-memory uploads; this module moves bytes
//! between them and the filesystem.

pub mod reader;
pub mod writer;

pub use reader::UploadReader;
pub use writer::{OutputWriter, WriteStatistics};
