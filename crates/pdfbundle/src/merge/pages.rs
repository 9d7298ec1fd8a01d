//! Page tree assembly.
//!
//! [`PageAssembler`] builds a merged document from scratch and grafts the
//! pages of each appended source document onto a single flat page tree.
//! Attributes a page inherits from its original tree (resources, boxes and
//! rotation) are copied onto the page itself before it is re-parented, so
//! every page renders the same as it did in its source.

use lopdf::{Document, Object, ObjectId, dictionary};
use tracing::trace;

use crate::error::{PdfBundleError, Result};

/// Page attributes that may be inherited from ancestor `Pages` nodes.
const INHERITABLE_KEYS: [&[u8]; 4] = [b"Resources", b"MediaBox", b"CropBox", b"Rotate"];

/// Deepest page tree walked when resolving inherited attributes.
const MAX_TREE_DEPTH: usize = 64;

/// US Letter, used when a page has no media box anywhere in its tree.
const DEFAULT_MEDIA_BOX: [i64; 4] = [0, 0, 612, 792];

/// Accumulates pages from several documents into one.
pub struct PageAssembler {
    document: Document,
    pages_id: ObjectId,
    kids: Vec<Object>,
}

impl PageAssembler {
    /// Create an assembler with an empty catalog and page tree.
    pub fn new() -> Self {
        let mut document = Document::with_version("1.5");
        let pages_id = document.new_object_id();
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

    /// Number of pages appended so far.
    pub fn page_count(&self) -> usize {
        self.kids.len()
    }

    /// Append every page of `source`, in page order.
    ///
    /// Returns the number of pages appended.
    ///
    /// # Errors
    ///
    /// Returns [`PdfBundleError::MergeFailed`] if a page object is not a
    /// dictionary.
    pub fn append(&mut self, mut source: Document) -> Result<usize> {
        // Renumber objects to avoid ID conflicts
        source.renumber_objects_with(self.document.max_id + 1);

        let page_ids: Vec<ObjectId> = source.get_pages().into_values().collect();
        for &page_id in &page_ids {
            inherit_attributes(&mut source, page_id)?;
        }

        self.document.max_id = self.document.max_id.max(source.max_id);
        self.document.objects.extend(source.objects);

        for &page_id in &page_ids {
            let page = self
                .document
                .get_object_mut(page_id)
                .and_then(Object::as_dict_mut)
                .map_err(|e| {
                    PdfBundleError::merge_failed(format!("Page {page_id:?} is unusable: {e}"))
                })?;
            page.set("Parent", self.pages_id);
            self.kids.push(Object::Reference(page_id));
        }

        trace!(pages = page_ids.len(), total = self.kids.len(), "appended document");
        Ok(page_ids.len())
    }

    /// Finish the page tree and return the merged document.
    ///
    /// Objects no longer reachable from the catalog (the sources' own
    /// catalogs and page trees) are dropped and the remaining objects are
    /// renumbered from 1.
    pub fn finish(mut self) -> Document {
        let count = self.kids.len() as i64;
        let pages = dictionary! {
            "Type" => "Pages",
            "Kids" => self.kids,
            "Count" => count,
        };
        self.document
            .objects
            .insert(self.pages_id, Object::Dictionary(pages));

        self.document.prune_objects();
        self.document.renumber_objects();
        self.document
    }
}

impl Default for PageAssembler {
    fn default() -> Self {
        Self::new()
    }
}

/// Copy inheritable attributes from a page's ancestors onto the page.
fn inherit_attributes(doc: &mut Document, page_id: ObjectId) -> Result<()> {
    let page = doc
        .get_object(page_id)
        .and_then(Object::as_dict)
        .map_err(|e| PdfBundleError::merge_failed(format!("Page {page_id:?} is unusable: {e}")))?;

    let mut missing: Vec<&[u8]> = INHERITABLE_KEYS
        .iter()
        .copied()
        .filter(|key| !page.has(key))
        .collect();
    if missing.is_empty() {
        return Ok(());
    }

    let mut inherited: Vec<(Vec<u8>, Object)> = Vec::new();
    let mut parent = page.get(b"Parent").and_then(Object::as_reference).ok();
    let mut depth = 0;

    while let Some(node_id) = parent {
        if missing.is_empty() || depth >= MAX_TREE_DEPTH {
            break;
        }
        depth += 1;

        let Ok(node) = doc.get_object(node_id).and_then(Object::as_dict) else {
            break;
        };
        missing.retain(|key| match node.get(key) {
            Ok(value) => {
                inherited.push((key.to_vec(), value.clone()));
                false
            }
            Err(_) => true,
        });
        parent = node.get(b"Parent").and_then(Object::as_reference).ok();
    }

    let needs_media_box = missing.contains(&b"MediaBox".as_slice());

    let page = doc
        .get_object_mut(page_id)
        .and_then(Object::as_dict_mut)
        .map_err(|e| PdfBundleError::merge_failed(format!("Page {page_id:?} is unusable: {e}")))?;
    for (key, value) in inherited {
        page.set(key, value);
    }
    if needs_media_box {
        let media_box: Vec<Object> = DEFAULT_MEDIA_BOX.iter().map(|&v| v.into()).collect();
        page.set("MediaBox", media_box);
    }

    Ok(())
}
