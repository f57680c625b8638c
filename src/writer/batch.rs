use std::time::Instant;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use crate::core::config::Config;
use crate::core::error::{Error, Result};
use crate::core::types::{DocId, Fields};
use crate::parallel::indexer::ParallelIndexer;
use crate::writer::index_writer::{IndexWriter, PreparedDocument, WriteResult};

/// One item of a bulk request.
#[derive(Debug, Clone, PartialEq)]
pub enum BulkOperation {
    /// Full upsert, same as a single index call.
    Index { id: DocId, fields: Fields },
    /// Partial merge into an existing document.
    Update { id: DocId, fields: Fields },
    Delete { id: DocId },
}

impl BulkOperation {
    pub fn index(id: impl Into<DocId>, fields: Fields) -> Self {
        BulkOperation::Index { id: id.into(), fields }
    }

    pub fn update(id: impl Into<DocId>, fields: Fields) -> Self {
        BulkOperation::Update { id: id.into(), fields }
    }

    pub fn delete(id: impl Into<DocId>) -> Self {
        BulkOperation::Delete { id: id.into() }
    }

    pub fn id(&self) -> DocId {
        match self {
            BulkOperation::Index { id, .. }
            | BulkOperation::Update { id, .. }
            | BulkOperation::Delete { id } => *id,
        }
    }

    pub fn action(&self) -> BulkAction {
        match self {
            BulkOperation::Index { .. } => BulkAction::Index,
            BulkOperation::Update { .. } => BulkAction::Update,
            BulkOperation::Delete { .. } => BulkAction::Delete,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BulkAction {
    Index,
    Update,
    Delete,
}

/// Outcome of one bulk item, in request order.
#[derive(Debug, Clone, PartialEq)]
pub struct BulkItemResponse {
    pub id: DocId,
    pub action: BulkAction,
    pub result: Result<WriteResult>,
}

impl BulkItemResponse {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }

    pub fn error(&self) -> Option<&Error> {
        self.result.as_ref().err()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BulkResponse {
    pub items: Vec<BulkItemResponse>,
    /// True when at least one item failed.
    pub errors: bool,
    pub took_ms: u64,
}

impl BulkResponse {
    pub fn failed(&self) -> impl Iterator<Item = &BulkItemResponse> {
        self.items.iter().filter(|item| !item.is_success())
    }

    pub fn success_count(&self) -> usize {
        self.items.iter().filter(|item| item.is_success()).count()
    }
}

/// Applies a batch of operations in order through one writer. Items are
/// independent: a failure is recorded and the loop moves on, nothing is
/// rolled back.
pub struct BulkProcessor {
    pub parallel_threshold: usize,
    pub indexer: ParallelIndexer,
}

impl BulkProcessor {
    pub fn new(config: &Config) -> Self {
        BulkProcessor {
            parallel_threshold: config.bulk_parallel_threshold,
            indexer: ParallelIndexer::default(),
        }
    }

    pub fn execute(&self, writer: &mut IndexWriter<'_>, operations: Vec<BulkOperation>) -> BulkResponse {
        let start = Instant::now();
        let total = operations.len();

        // Large batches get their Index items validated and analyzed up
        // front on the rayon pool; applying stays sequential.
        let mut prepared: Vec<Option<Result<PreparedDocument>>> =
            if self.parallel_threshold > 0 && total >= self.parallel_threshold {
                let index = writer.index();
                self.indexer.prepare_batch(&operations, index.schema(), index.analyzers())
            } else {
                Vec::new()
            };
        prepared.resize_with(total, || None);

        let mut items = Vec::with_capacity(total);
        for (operation, prepared) in operations.into_iter().zip(prepared) {
            let id = operation.id();
            let action = operation.action();

            let result = match (operation, prepared) {
                (BulkOperation::Index { .. }, Some(prepared)) => {
                    prepared.and_then(|doc| writer.apply(doc))
                }
                (BulkOperation::Index { id, fields }, None) => writer.index_document(id, fields),
                (BulkOperation::Update { id, fields }, _) => writer.update_document(id, fields),
                (BulkOperation::Delete { id }, _) => writer.delete_document(id),
            };

            if let Err(err) = &result {
                warn!("[{}] bulk {:?} of document {} failed: {}", writer.index().name(), action, id, err);
            }
            items.push(BulkItemResponse { id, action, result });
        }

        let errors = items.iter().any(|item| !item.is_success());
        let took_ms = start.elapsed().as_millis() as u64;
        debug!("[{}] bulk of {} operations finished in {}ms (errors: {})",
               writer.index().name(), total, took_ms, errors);

        BulkResponse { items, errors, took_ms }
    }
}
