//! Caller-owned store of live editor documents.
//!
//! The dashboard keeps one rich-text editor per form field; each editor's
//! current op-log lives here under a caller-supplied identifier. The
//! store is an explicit object owned by whoever drives the editors, not a
//! process-wide registry: two dashboards get two stores.

use std::sync::Arc;

use dashmap::DashMap;

use crate::domain::delta::{DeltaDocument, Insert};

#[derive(Default, Clone)]
pub struct EditorContentStore {
    inner: Arc<DashMap<String, DeltaDocument>>,
}

impl EditorContentStore {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(DashMap::new()),
        }
    }

    /// Replace the document held for `id`.
    pub fn set_content(&self, id: impl Into<String>, document: DeltaDocument) {
        self.inner.insert(id.into(), document);
    }

    /// Current snapshot of the document held for `id`.
    pub fn get_content(&self, id: &str) -> Option<DeltaDocument> {
        self.inner.get(id).map(|entry| entry.value().clone())
    }

    /// Whether the editor under `id` holds anything beyond structural
    /// whitespace: embeds count, text counts once trimmed.
    pub fn has_content(&self, id: &str) -> bool {
        self.inner.get(id).is_some_and(|entry| {
            entry.value().ops.iter().any(|op| match &op.insert {
                Insert::Text(text) => !text.trim().is_empty(),
                Insert::Embed(embed) => embed.image.is_some() || embed.formula.is_some(),
                Insert::Unsupported(_) => false,
            })
        })
    }

    /// Drop the document for `id`, returning it if one was held.
    pub fn remove(&self, id: &str) -> Option<DeltaDocument> {
        self.inner.remove(id).map(|(_id, document)| document)
    }
}
