//! Output document assembly.

use std::collections::HashMap;

use lopdf::{Dictionary, Document, Object, ObjectId, dictionary};
use tracing::debug;

use super::SourceDocument;
use crate::config::CompressionLevel;
use crate::error::{PdfKnifeError, Result};

/// Attributes a page may inherit from its ancestors in the page tree.
const INHERITABLE_KEYS: [&[u8]; 4] = [b"Resources", b"MediaBox", b"CropBox", b"Rotate"];

/// Guard against cyclic or absurdly deep page trees.
const MAX_TREE_DEPTH: usize = 64;

/// A page imported into an [`OutputDocument`] but not yet in its page tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageToken {
    id: ObjectId,
}

/// A new document assembled from pages copied out of source documents.
///
/// Pages are imported with [`copy_pages`](Self::copy_pages), attached in
/// order with [`append_pages`](Self::append_pages), and the whole document is
/// written out once by [`serialize`](Self::serialize).
#[derive(Debug)]
pub struct OutputDocument {
    document: Document,
    pages_id: ObjectId,
    kids: Vec<ObjectId>,
}

impl OutputDocument {
    /// Create an empty document with a catalog and an empty page tree.
    pub fn new() -> Self {
        let mut document = Document::with_version("1.5");
        let pages_id = document.new_object_id();
        document.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => Vec::<Object>::new(),
                "Count" => 0,
            }),
        );

        let catalog_id = document.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        document.trailer.set("Root", catalog_id);

        Self {
            document,
            pages_id,
            kids: Vec::new(),
        }
    }

    /// Number of pages attached to the page tree so far.
    pub fn page_count(&self) -> usize {
        self.kids.len()
    }

    /// Import pages from `source` by 0-based index.
    ///
    /// Each index yields its own page object, so a repeated index produces a
    /// repeated page. Objects the pages depend on (content streams, fonts,
    /// images) are imported once per call and shared between the copies.
    /// Inherited attributes are resolved onto each page. References to pages
    /// or page-tree nodes that are not part of this call become `null`, so no
    /// unrequested page is dragged into the output.
    ///
    /// # Errors
    ///
    /// Returns [`PdfKnifeError::Serialization`] if an index is out of range
    /// or a page object cannot be read.
    pub fn copy_pages(
        &mut self,
        source: &SourceDocument,
        indices: &[usize],
    ) -> Result<Vec<PageToken>> {
        let mut importer = ObjectImporter::new(source.document(), &mut self.document);

        // Allocate every page id before rewriting anything, so links between
        // requested pages resolve to their copies.
        let mut pages = Vec::with_capacity(indices.len());
        for &index in indices {
            let source_id = source.page_id(index).ok_or_else(|| {
                PdfKnifeError::serialization(format!(
                    "page {} does not exist in {} ({} pages)",
                    index + 1,
                    source.label(),
                    source.page_count()
                ))
            })?;
            let target_id = importer.reserve_page(source_id);
            pages.push((source_id, target_id));
        }

        let mut tokens = Vec::with_capacity(pages.len());
        for (source_id, target_id) in pages {
            let page = flatten_page(source.document(), source_id)?;
            importer.insert(target_id, Object::Dictionary(page));
            tokens.push(PageToken { id: target_id });
        }

        let imported = importer.finish();

        if source.version() > self.document.version.as_str() {
            self.document.version = source.version().to_string();
        }

        debug!(
            source = source.label(),
            pages = tokens.len(),
            objects = imported,
            "copied pages"
        );
        Ok(tokens)
    }

    /// Attach imported pages to the end of the page tree, in order.
    pub fn append_pages(&mut self, tokens: impl IntoIterator<Item = PageToken>) {
        let pages_id = self.pages_id;
        for token in tokens {
            if let Some(Object::Dictionary(page)) = self.document.objects.get_mut(&token.id) {
                page.set("Parent", pages_id);
            }
            self.kids.push(token.id);
        }
    }

    /// Write the document to a byte buffer.
    ///
    /// # Errors
    ///
    /// Returns [`PdfKnifeError::Serialization`] if lopdf fails to write it.
    pub fn serialize(mut self, compression: CompressionLevel) -> Result<Vec<u8>> {
        let kids: Vec<Object> = self.kids.iter().map(|&id| Object::Reference(id)).collect();
        let count = kids.len() as i64;
        self.document.objects.insert(
            self.pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
            }),
        );

        match compression {
            CompressionLevel::None => {}
            CompressionLevel::Standard => {
                self.document.compress();
            }
            CompressionLevel::Maximum => {
                self.document.prune_objects();
                self.document.compress();
            }
        }

        self.document.renumber_objects();

        let mut buffer = Vec::new();
        self.document
            .save_to(&mut buffer)
            .map_err(|err| PdfKnifeError::serialization(err.to_string()))?;
        Ok(buffer)
    }
}

impl Default for OutputDocument {
    fn default() -> Self {
        Self::new()
    }
}

/// Copy a page dictionary with its inherited attributes made explicit.
///
/// The `Parent` entry is dropped; the output's page tree sets its own.
fn flatten_page(doc: &Document, page_id: ObjectId) -> Result<Dictionary> {
    let mut page = doc
        .get_dictionary(page_id)
        .map_err(|err| {
            PdfKnifeError::serialization(format!("cannot read page object {page_id:?}: {err}"))
        })?
        .clone();

    let mut parent = page.get(b"Parent").and_then(Object::as_reference).ok();
    let mut depth = 0;

    while let Some(parent_id) = parent
        && depth < MAX_TREE_DEPTH
    {
        let Ok(node) = doc.get_dictionary(parent_id) else {
            break;
        };
        for key in INHERITABLE_KEYS {
            if !page.has(key)
                && let Ok(value) = node.get(key)
            {
                page.set(key, value.clone());
            }
        }
        parent = node.get(b"Parent").and_then(Object::as_reference).ok();
        depth += 1;
    }

    page.remove(b"Parent");

    if !page.has(b"MediaBox") {
        // US Letter, the usual viewer fallback for a missing box.
        page.set(
            "MediaBox",
            vec![0.into(), 0.into(), 612.into(), 792.into()],
        );
    }

    Ok(page)
}

/// Copies objects from a source document into a target under fresh ids.
///
/// Only objects reachable from the imported pages are copied. Each source
/// object is copied at most once per importer.
struct ObjectImporter<'a> {
    source: &'a Document,
    target: &'a mut Document,
    id_map: HashMap<ObjectId, ObjectId>,
    pending: Vec<ObjectId>,
    imported: usize,
}

impl<'a> ObjectImporter<'a> {
    fn new(source: &'a Document, target: &'a mut Document) -> Self {
        Self {
            source,
            target,
            id_map: HashMap::new(),
            pending: Vec::new(),
            imported: 0,
        }
    }

    /// Allocate a target id for one occurrence of a page.
    ///
    /// References to the source page resolve to its first occurrence.
    fn reserve_page(&mut self, source_id: ObjectId) -> ObjectId {
        let target_id = self.target.new_object_id();
        self.id_map.entry(source_id).or_insert(target_id);
        target_id
    }

    /// Rewrite `object`'s references and store it under `target_id`.
    fn insert(&mut self, target_id: ObjectId, mut object: Object) {
        self.remap(&mut object);
        self.target.objects.insert(target_id, object);
    }

    /// Copy every object discovered so far. Returns the number copied.
    fn finish(mut self) -> usize {
        while let Some(source_id) = self.pending.pop() {
            let Some(&target_id) = self.id_map.get(&source_id) else {
                continue;
            };
            let object = self
                .source
                .objects
                .get(&source_id)
                .cloned()
                .unwrap_or(Object::Null);
            self.insert(target_id, object);
            self.imported += 1;
        }
        self.imported
    }

    fn remap(&mut self, object: &mut Object) {
        match object {
            Object::Reference(id) => {
                *object = match self.map_reference(*id) {
                    Some(target_id) => Object::Reference(target_id),
                    None => Object::Null,
                };
            }
            Object::Array(items) => {
                for item in items.iter_mut() {
                    self.remap(item);
                }
            }
            Object::Dictionary(dict) => self.remap_dictionary(dict),
            Object::Stream(stream) => self.remap_dictionary(&mut stream.dict),
            _ => {}
        }
    }

    fn remap_dictionary(&mut self, dict: &mut Dictionary) {
        for (_, value) in dict.iter_mut() {
            self.remap(value);
        }
    }

    /// Target id for a source reference, scheduling a copy on first sight.
    ///
    /// Returns `None` for dangling references and for page-tree nodes that
    /// were not requested.
    fn map_reference(&mut self, source_id: ObjectId) -> Option<ObjectId> {
        if let Some(&target_id) = self.id_map.get(&source_id) {
            return Some(target_id);
        }

        let object = self.source.objects.get(&source_id)?;
        if is_page_tree_node(object) {
            return None;
        }

        let target_id = self.target.new_object_id();
        self.id_map.insert(source_id, target_id);
        self.pending.push(source_id);
        Some(target_id)
    }
}

fn is_page_tree_node(object: &Object) -> bool {
    match object {
        Object::Dictionary(dict) => dict.has_type(b"Page") || dict.has_type(b"Pages"),
        _ => false,
    }
}
