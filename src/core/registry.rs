use std::collections::HashMap;
use std::sync::Arc;
use log::info;
use parking_lot::RwLock;
use crate::core::config::Config;
use crate::core::error::{Error, ErrorKind, Result};
use crate::core::stats::IndexStats;
use crate::core::types::{DocId, Document, Fields};
use crate::index::index::Index;
use crate::query::ast::SearchRequest;
use crate::schema::schema::Schema;
use crate::search::results::SearchResults;
use crate::writer::batch::{BulkOperation, BulkResponse};
use crate::writer::index_writer::WriteResult;

const INVALID_NAME_CHARS: [char; 10] = ['\\', '/', '*', '?', '"', '<', '>', '|', ',', '#'];

/// Named indices of one engine instance.
///
/// The map lock is held only to look up, insert or remove handles; every
/// document operation runs under the target index's own lock, so work on
/// different indices never contends.
pub struct IndexRegistry {
    config: Config,
    indices: RwLock<HashMap<String, Arc<Index>>>,
}

impl Default for IndexRegistry {
    fn default() -> Self {
        IndexRegistry::new(Config::default())
    }
}

impl IndexRegistry {
    pub fn new(config: Config) -> Self {
        IndexRegistry {
            config,
            indices: RwLock::new(HashMap::new()),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn create_index(&self, name: &str, schema: Schema) -> Result<Arc<Index>> {
        validate_index_name(name)?;

        // Build outside the lock; schema errors never touch the map.
        let index = Arc::new(Index::new(name, schema, self.config.clone())?);

        let mut indices = self.indices.write();
        if indices.contains_key(name) {
            return Err(Error::new(
                ErrorKind::IndexAlreadyExists,
                format!("index [{}] already exists", name),
            ));
        }
        indices.insert(name.to_string(), index.clone());

        info!("[{}] created index with {} fields", name, index.schema().fields.len());
        Ok(index)
    }

    /// Decode an `{"settings": ..., "mappings": ...}` body and create the index.
    pub fn create_index_from_json(&self, name: &str, body: &serde_json::Value) -> Result<Arc<Index>> {
        self.create_index(name, Schema::from_json(body)?)
    }

    /// Remove an index and everything in it. Handles already taken through
    /// [`IndexRegistry::get`] stay usable until dropped.
    pub fn drop_index(&self, name: &str) -> Result<()> {
        match self.indices.write().remove(name) {
            Some(index) => {
                info!("[{}] dropped index ({} documents)", name, index.doc_count());
                Ok(())
            }
            None => Err(Error::index_not_found(name)),
        }
    }

    pub fn exists(&self, name: &str) -> bool {
        self.indices.read().contains_key(name)
    }

    pub fn get(&self, name: &str) -> Result<Arc<Index>> {
        self.indices
            .read()
            .get(name)
            .cloned()
            .ok_or_else(|| Error::index_not_found(name))
    }

    /// Sorted names of all live indices.
    pub fn index_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.indices.read().keys().cloned().collect();
        names.sort();
        names
    }

    pub fn index_document(&self, index: &str, id: impl Into<DocId>, fields: Fields) -> Result<WriteResult> {
        self.get(index)?.index_document(id.into(), fields)
    }

    pub fn update_document(&self, index: &str, id: impl Into<DocId>, partial: Fields) -> Result<WriteResult> {
        self.get(index)?.update_document(id.into(), partial)
    }

    pub fn delete_document(&self, index: &str, id: impl Into<DocId>) -> Result<WriteResult> {
        self.get(index)?.delete_document(id.into())
    }

    pub fn get_document(&self, index: &str, id: impl Into<DocId>) -> Result<Document> {
        self.get(index)?.get_document(id.into())
    }

    /// Only a missing index fails the call; item failures are in the response.
    pub fn bulk(&self, index: &str, operations: Vec<BulkOperation>) -> Result<BulkResponse> {
        Ok(self.get(index)?.bulk(operations))
    }

    pub fn search(&self, index: &str, request: &SearchRequest) -> Result<SearchResults> {
        self.get(index)?.search(request)
    }

    pub fn stats(&self, index: &str) -> Result<IndexStats> {
        Ok(self.get(index)?.stats())
    }
}

fn validate_index_name(name: &str) -> Result<()> {
    let problem = if name.is_empty() {
        Some("must not be empty")
    } else if name.starts_with(['-', '_', '+']) {
        Some("must not start with '-', '_' or '+'")
    } else if name.chars().any(char::is_uppercase) {
        Some("must be lowercase")
    } else if name.chars().any(|c| c.is_whitespace() || INVALID_NAME_CHARS.contains(&c)) {
        Some("must not contain whitespace or any of \\ / * ? \" < > | , #")
    } else {
        None
    };

    match problem {
        Some(problem) => Err(Error::invalid_input(format!("invalid index name [{}]: {}", name, problem))),
        None => Ok(()),
    }
}
