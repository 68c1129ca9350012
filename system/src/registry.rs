use std::collections::HashMap;

use uuid::Uuid;

use crate::document::Document;
use crate::message::{DocumentId, DocumentSummary};

/// Owns every document and its version history. `list` reports documents
/// in insertion order, stable across calls.
#[derive(Debug)]
pub struct DocumentRegistry {
    documents: HashMap<DocumentId, Document>,
    insertion_order: Vec<DocumentId>,
}

impl DocumentRegistry {
    pub fn new() -> Self {
        Self {
            documents: HashMap::new(),
            insertion_order: Vec::new(),
        }
    }

    /// Creates a document with its initial empty version. The document is
    /// visible to `get` and `list` immediately.
    pub fn create(&mut self) -> DocumentId {
        let id = Uuid::new_v4();
        self.documents.insert(id, Document::new(id));
        self.insertion_order.push(id);
        log::debug!("Created document {}", id);
        id
    }

    pub fn get(&self, id: &DocumentId) -> Option<&Document> {
        self.documents.get(id)
    }

    pub fn get_mut(&mut self, id: &DocumentId) -> Option<&mut Document> {
        self.documents.get_mut(id)
    }

    pub fn list(&self) -> Vec<DocumentSummary> {
        self.insertion_order
            .iter()
            .filter_map(|id| self.documents.get(id))
            .map(|document| document.summary())
            .collect()
    }

    /// Removes a document and all of its versions. `None` when the id is
    /// unknown.
    pub fn delete(&mut self, id: &DocumentId) -> Option<Document> {
        let removed = self.documents.remove(id);
        if removed.is_some() {
            self.insertion_order.retain(|e| e != id);
            log::debug!("Deleted document {}", id);
        }
        removed
    }
}
