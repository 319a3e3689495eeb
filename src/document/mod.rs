//! Document-model adapter over `lopdf`.
//!
//! [`SourceDocument`] is a read-only handle over uploaded bytes.
//! [`OutputDocument`] is a fresh document assembled page by page from one or
//! more sources and serialized once complete. Pages move between the two as
//! [`PageToken`]s: [`OutputDocument::copy_pages`] imports a page and every
//! object it depends on, and [`OutputDocument::append_pages`] attaches the
//! imported pages to the output's page tree in order.

mod output;
mod source;

#[cfg(test)]
pub(crate) mod testing;

pub use output::{OutputDocument, PageToken};
pub use source::SourceDocument;
