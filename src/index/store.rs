use std::collections::BTreeMap;
use roaring::RoaringTreemap;
use crate::core::types::{DocId, Document};

/// Authoritative copy of every live document, keyed and iterated in id order.
#[derive(Debug, Default)]
pub struct DocumentStore {
    documents: BTreeMap<DocId, Document>,
}

impl DocumentStore {
    pub fn new() -> Self {
        DocumentStore {
            documents: BTreeMap::new(),
        }
    }

    /// Insert or replace, returning the previous document.
    pub fn insert(&mut self, doc: Document) -> Option<Document> {
        self.documents.insert(doc.id, doc)
    }

    pub fn get(&self, id: DocId) -> Option<&Document> {
        self.documents.get(&id)
    }

    pub fn get_mut(&mut self, id: DocId) -> Option<&mut Document> {
        self.documents.get_mut(&id)
    }

    pub fn remove(&mut self, id: DocId) -> Option<Document> {
        self.documents.remove(&id)
    }

    pub fn contains(&self, id: DocId) -> bool {
        self.documents.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Document> {
        self.documents.values()
    }

    pub fn id_bitmap(&self) -> RoaringTreemap {
        RoaringTreemap::from_sorted_iter(self.documents.keys().map(|id| id.0))
            .unwrap_or_else(|_| self.documents.keys().map(|id| id.0).collect())
    }
}
