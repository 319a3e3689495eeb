//! Read-only handle over an uploaded PDF.

use lopdf::{Document, ObjectId};
use tracing::debug;

use crate::error::{PdfKnifeError, Result};

/// Label used when a document is opened without a name.
const UNNAMED: &str = "document.pdf";

/// An opened PDF, owned by the invocation that opened it.
///
/// The page list is captured once at open time in document order, so page
/// lookups during a split or merge never walk the page tree again.
#[derive(Debug)]
pub struct SourceDocument {
    label: String,
    bytes: Vec<u8>,
    document: Document,
    page_ids: Vec<ObjectId>,
}

impl SourceDocument {
    /// Open a PDF from its bytes.
    ///
    /// # Errors
    ///
    /// Returns [`PdfKnifeError::Decode`] if the bytes are not a parseable PDF
    /// and [`PdfKnifeError::Encrypted`] if it needs a password.
    pub fn open(bytes: impl Into<Vec<u8>>) -> Result<Self> {
        Self::open_named(UNNAMED, bytes)
    }

    /// Open a PDF from its bytes, labelling it for error messages.
    pub fn open_named(label: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Result<Self> {
        let label = label.into();
        let bytes = bytes.into();

        let document =
            Document::load_mem(&bytes).map_err(|err| PdfKnifeError::decode(label.clone(), &err))?;

        // Loading succeeds even when the empty password fails; no objects are
        // decrypted in that case.
        if document.is_encrypted() && document.encryption_state.is_none() {
            return Err(PdfKnifeError::Encrypted { name: label });
        }

        let page_ids: Vec<ObjectId> = document.get_pages().into_values().collect();

        debug!(
            name = %label,
            pages = page_ids.len(),
            version = %document.version,
            "opened source document"
        );

        Ok(Self {
            label,
            bytes,
            document,
            page_ids,
        })
    }

    /// Name used in messages about this document.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Number of pages in the document.
    pub fn page_count(&self) -> usize {
        self.page_ids.len()
    }

    /// The bytes the document was opened from.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// PDF version declared by the document, e.g. `"1.7"`.
    pub fn version(&self) -> &str {
        &self.document.version
    }

    pub(crate) fn document(&self) -> &Document {
        &self.document
    }

    /// Object id of the page at 0-based `index`.
    pub(crate) fn page_id(&self, index: usize) -> Option<ObjectId> {
        self.page_ids.get(index).copied()
    }
}
