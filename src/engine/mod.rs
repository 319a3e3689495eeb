//! Split and merge engines.
//!
//! Both engines work purely in memory: documents come in as
//! [`SourceDocument`](crate::document::SourceDocument)s and results leave as
//! byte buffers. CPU-bound document construction runs on tokio's blocking
//! pool.

mod merger;
mod splitter;

pub use merger::{MergeResult, MergeStatistics, Merger};
pub use splitter::{PlannedOutput, SplitResult, SplitStatistics, Splitter};

/// A finished output: a filename and its bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedBlob {
    /// Filename the bytes should be delivered under.
    pub name: String,

    /// File contents.
    pub bytes: Vec<u8>,
}

impl NamedBlob {
    /// Pair a filename with its contents.
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }

    /// Size of the contents in bytes.
    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}
