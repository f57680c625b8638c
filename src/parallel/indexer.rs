use rayon::prelude::*;
use crate::analysis::analyzer::AnalyzerRegistry;
use crate::core::error::Result;
use crate::schema::schema::Schema;
use crate::writer::batch::BulkOperation;
use crate::writer::index_writer::PreparedDocument;

/// Parallel document preparation for large bulk batches
pub struct ParallelIndexer {
    pub chunk_size: usize,
}

impl Default for ParallelIndexer {
    fn default() -> Self {
        ParallelIndexer { chunk_size: 256 }
    }
}

impl ParallelIndexer {
    /// Validate and analyze the Index operations of a batch in parallel.
    /// The output is aligned with `operations`; non-Index slots are `None`.
    pub fn prepare_batch(
        &self,
        operations: &[BulkOperation],
        schema: &Schema,
        analyzers: &AnalyzerRegistry,
    ) -> Vec<Option<Result<PreparedDocument>>> {
        operations
            .par_chunks(self.chunk_size)
            .flat_map_iter(|chunk| {
                chunk.iter().map(|operation| match operation {
                    BulkOperation::Index { id, fields } => {
                        Some(PreparedDocument::prepare(schema, analyzers, *id, fields.clone()))
                    }
                    _ => None,
                })
            })
            .collect()
    }
}
