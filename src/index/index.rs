use parking_lot::RwLock;
use crate::analysis::analyzer::AnalyzerRegistry;
use crate::analysis::token::Token;
use crate::core::config::Config;
use crate::core::error::Result;
use crate::core::stats::IndexStats;
use crate::core::types::{DocId, Document, Fields};
use crate::index::index_reader::IndexReader;
use crate::index::inverted::InvertedIndex;
use crate::index::store::DocumentStore;
use crate::query::ast::SearchRequest;
use crate::schema::schema::Schema;
use crate::search::results::SearchResults;
use crate::writer::batch::{BulkOperation, BulkProcessor, BulkResponse};
use crate::writer::index_writer::{IndexWriter, WriteResult};

/// Mutable half of an index. Store and postings only ever change together,
/// under the write lock.
#[derive(Debug, Default)]
pub struct IndexState {
    pub(crate) store: DocumentStore,
    pub(crate) inverted: InvertedIndex,
}

/// One named index: an immutable schema with its analyzers, and the
/// document store plus inverted index they describe.
pub struct Index {
    name: String,
    schema: Schema,
    analyzers: AnalyzerRegistry,
    config: Config,
    state: RwLock<IndexState>,
}

impl std::fmt::Debug for Index {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Index")
            .field("name", &self.name)
            .field("schema", &self.schema)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Index {
    /// Validates the schema and builds its analyzers; the index starts empty.
    pub fn new(name: &str, schema: Schema, config: Config) -> Result<Self> {
        let analyzers = schema.build_analyzers(config.max_token_length)?;

        Ok(Index {
            name: name.to_string(),
            schema,
            analyzers,
            config,
            state: RwLock::new(IndexState::default()),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn analyzers(&self) -> &AnalyzerRegistry {
        &self.analyzers
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Shared read access; writers wait until the reader is dropped.
    pub fn reader(&self) -> IndexReader<'_> {
        IndexReader::new(self, self.state.read())
    }

    /// Exclusive write access for one or more operations.
    pub fn writer(&self) -> IndexWriter<'_> {
        IndexWriter::new(self, self.state.write())
    }

    pub fn index_document(&self, id: DocId, fields: Fields) -> Result<WriteResult> {
        self.writer().index_document(id, fields)
    }

    pub fn update_document(&self, id: DocId, partial: Fields) -> Result<WriteResult> {
        self.writer().update_document(id, partial)
    }

    pub fn delete_document(&self, id: DocId) -> Result<WriteResult> {
        self.writer().delete_document(id)
    }

    pub fn get_document(&self, id: DocId) -> Result<Document> {
        self.reader().get_document(id)
    }

    pub fn contains(&self, id: DocId) -> bool {
        self.reader().store().contains(id)
    }

    pub fn doc_count(&self) -> usize {
        self.reader().store().len()
    }

    pub fn bulk(&self, operations: Vec<BulkOperation>) -> BulkResponse {
        BulkProcessor::new(&self.config).execute(&mut self.writer(), operations)
    }

    pub fn search(&self, request: &SearchRequest) -> Result<SearchResults> {
        self.reader().search(request)
    }

    /// Run one of this index's analyzers over arbitrary text.
    pub fn analyze(&self, analyzer: &str, text: &str) -> Result<Vec<Token>> {
        self.analyzers.analyze(analyzer, text)
    }

    pub fn stats(&self) -> IndexStats {
        let reader = self.reader();
        IndexStats {
            name: self.name.clone(),
            doc_count: reader.store().len(),
            term_count: reader.inverted().term_count(),
            posting_count: reader.inverted().posting_count(),
            total_tokens: reader.inverted().total_tokens,
            field_count: self.schema.fields.len(),
        }
    }
}
