//! Named layouts and reusable blocks on top of a [`Storage`] backend.

use super::{DocumentKind, PageDocument, Storage, StorageError, StorageResult};
use crate::element::{Element, ElementId};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

/// Name given to layouts saved without one.
pub const DEFAULT_LAYOUT_NAME: &str = "New Page";

/// Turn a display name into a URL slug: lowercase, whitespace runs become
/// `-`, characters outside `[a-z0-9_-]` are dropped, repeated dashes
/// collapse and a trailing dash is removed.
pub fn generate_slug(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    for c in name.trim().to_lowercase().chars() {
        if c.is_whitespace() || c == '-' {
            if !slug.ends_with('-') {
                slug.push('-');
            }
        } else if c.is_ascii_alphanumeric() || c == '_' {
            slug.push(c);
        }
    }
    slug.trim_end_matches('-').to_string()
}

/// Listing entry for a stored document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageSummary {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub revision: u64,
    pub element_count: usize,
}

impl From<&PageDocument> for PageSummary {
    fn from(doc: &PageDocument) -> Self {
        Self {
            id: doc.id.clone(),
            name: doc.name.clone(),
            slug: doc.slug.clone(),
            revision: doc.revision,
            element_count: doc.elements.len(),
        }
    }
}

/// Layout and block library.
pub struct PageLibrary<S: Storage> {
    storage: Arc<S>,
}

impl<S: Storage> PageLibrary<S> {
    pub fn new(storage: Arc<S>) -> Self {
        Self { storage }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Every readable document. Unreadable entries are skipped.
    async fn documents(&self) -> StorageResult<Vec<PageDocument>> {
        let mut docs = Vec::new();
        for id in self.storage.list().await? {
            match self.storage.load(&id).await {
                Ok(doc) => docs.push(doc),
                Err(e) => log::warn!("Skipping unreadable document {id}: {e}"),
            }
        }
        Ok(docs)
    }

    fn unique_slug(name: &str, id: &str, docs: &[PageDocument]) -> String {
        let base = match generate_slug(name) {
            slug if slug.is_empty() => "page".to_string(),
            slug => slug,
        };
        let taken = |slug: &str| docs.iter().any(|d| d.id != id && d.slug == slug);

        let mut slug = base.clone();
        while taken(&slug) {
            let suffix = Uuid::new_v4().simple().to_string();
            slug = format!("{base}-{}", &suffix[..4]);
        }
        slug
    }

    async fn store(
        &self,
        id: Option<&str>,
        name: &str,
        kind: DocumentKind,
        elements: Vec<Element>,
        background: &str,
    ) -> StorageResult<PageDocument> {
        let docs = self.documents().await?;
        let id = id.map_or_else(|| Uuid::new_v4().to_string(), str::to_string);
        let name = match name.trim() {
            "" => DEFAULT_LAYOUT_NAME,
            trimmed => trimmed,
        };

        let doc = PageDocument {
            slug: Self::unique_slug(name, &id, &docs),
            revision: docs.iter().map(|d| d.revision).max().unwrap_or(0) + 1,
            id,
            name: name.to_string(),
            kind,
            elements,
            page_background_color: background.to_string(),
        };
        self.storage.save(&doc.id, &doc).await?;
        log::info!("Saved {:?} '{}' as {}", doc.kind, doc.name, doc.slug);
        Ok(doc)
    }

    /// Save a layout. `id` updates an existing layout; `None` creates one.
    pub async fn save_layout(
        &self,
        id: Option<&str>,
        name: &str,
        elements: Vec<Element>,
        background: &str,
    ) -> StorageResult<PageDocument> {
        self.store(id, name, DocumentKind::Layout, elements, background)
            .await
    }

    /// Load a layout by id, falling back to a slug lookup.
    pub async fn load_layout(&self, id_or_slug: &str) -> StorageResult<PageDocument> {
        match self.storage.load(id_or_slug).await {
            Ok(doc) => return Ok(doc),
            Err(StorageError::NotFound(_)) => {}
            Err(e) => return Err(e),
        }
        self.documents()
            .await?
            .into_iter()
            .find(|d| d.kind == DocumentKind::Layout && d.slug == id_or_slug)
            .ok_or_else(|| StorageError::NotFound(id_or_slug.to_string()))
    }

    /// The most recently saved layout, if any.
    pub async fn latest_layout(&self) -> StorageResult<Option<PageDocument>> {
        Ok(self
            .documents()
            .await?
            .into_iter()
            .filter(|d| d.kind == DocumentKind::Layout)
            .max_by_key(|d| d.revision))
    }

    async fn summaries(&self, kind: DocumentKind) -> StorageResult<Vec<PageSummary>> {
        let mut summaries: Vec<PageSummary> = self
            .documents()
            .await?
            .iter()
            .filter(|d| d.kind == kind)
            .map(PageSummary::from)
            .collect();
        summaries.sort_by(|a, b| b.revision.cmp(&a.revision));
        Ok(summaries)
    }

    /// Layouts, newest first.
    pub async fn list_layouts(&self) -> StorageResult<Vec<PageSummary>> {
        self.summaries(DocumentKind::Layout).await
    }

    /// Blocks, newest first.
    pub async fn list_blocks(&self) -> StorageResult<Vec<PageSummary>> {
        self.summaries(DocumentKind::Block).await
    }

    pub async fn delete(&self, id: &str) -> StorageResult<()> {
        self.storage.delete(id).await
    }

    /// Save the selected elements as a block. Selected groups bring their
    /// members along; elements keep document order.
    pub async fn save_block(
        &self,
        name: &str,
        selection: &[ElementId],
        elements: &[Element],
    ) -> StorageResult<PageDocument> {
        let block: Vec<Element> = elements
            .iter()
            .filter(|e| {
                selection.contains(&e.id) || e.group_id.is_some_and(|g| selection.contains(&g))
            })
            .cloned()
            .collect();
        if block.is_empty() {
            return Err(StorageError::Other(
                "Nothing selected to save as a block".to_string(),
            ));
        }
        self.store(None, name, DocumentKind::Block, block, "")
            .await
    }

    /// Elements of a saved block, ready for insertion.
    pub async fn load_block(&self, id: &str) -> StorageResult<Vec<Element>> {
        let doc = self.storage.load(id).await?;
        if doc.kind != DocumentKind::Block {
            return Err(StorageError::NotFound(id.to_string()));
        }
        Ok(doc.elements)
    }
}
