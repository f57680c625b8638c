use parking_lot::RwLockReadGuard;
use crate::analysis::analyzer::AnalyzerRegistry;
use crate::core::error::{Error, Result};
use crate::core::types::{DocId, Document};
use crate::index::index::{Index, IndexState};
use crate::index::inverted::InvertedIndex;
use crate::index::store::DocumentStore;
use crate::query::ast::SearchRequest;
use crate::schema::schema::Schema;
use crate::search::executor::QueryExecutor;
use crate::search::results::SearchResults;

/// Consistent view of an index. Holds the read lock for its lifetime, so
/// store and postings cannot change underneath it.
pub struct IndexReader<'a> {
    index: &'a Index,
    state: RwLockReadGuard<'a, IndexState>,
}

impl<'a> IndexReader<'a> {
    pub(crate) fn new(index: &'a Index, state: RwLockReadGuard<'a, IndexState>) -> Self {
        IndexReader { index, state }
    }

    pub fn index_name(&self) -> &str {
        self.index.name()
    }

    pub fn schema(&self) -> &Schema {
        self.index.schema()
    }

    pub fn analyzers(&self) -> &AnalyzerRegistry {
        self.index.analyzers()
    }

    pub fn store(&self) -> &DocumentStore {
        &self.state.store
    }

    pub fn inverted(&self) -> &InvertedIndex {
        &self.state.inverted
    }

    pub fn get_document(&self, doc_id: DocId) -> Result<Document> {
        self.state.store
            .get(doc_id)
            .cloned()
            .ok_or_else(|| Error::document_not_found(self.index.name(), doc_id))
    }

    pub fn search(&self, request: &SearchRequest) -> Result<SearchResults> {
        QueryExecutor::new(self, self.index.config()).execute(request)
    }
}
