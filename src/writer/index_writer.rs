use log::debug;
use parking_lot::RwLockWriteGuard;
use serde::{Deserialize, Serialize};
use crate::analysis::analyzer::AnalyzerRegistry;
use crate::analysis::token::Token;
use crate::core::error::{Error, Result};
use crate::core::types::{DocId, Document, FieldValue, Fields};
use crate::index::index::{Index, IndexState};
use crate::schema::schema::Schema;

/// What a successful write did to the index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WriteResult {
    Created,
    Updated,
    Deleted,
}

/// A document whose fields passed the schema check, with the tokens of
/// every Text field already produced.
#[derive(Debug, Clone)]
pub struct PreparedDocument {
    pub id: DocId,
    pub fields: Fields,
    pub analyzed: Vec<(String, Vec<Token>)>,
}

impl PreparedDocument {
    /// Validate against the schema and analyze. Touches no index state, so
    /// it can run outside the write lock and in parallel.
    pub fn prepare(schema: &Schema, analyzers: &AnalyzerRegistry, id: DocId, fields: Fields) -> Result<Self> {
        schema.check_fields(&fields)?;
        let analyzed = analyze_text_fields(schema, analyzers, &fields)?;
        Ok(PreparedDocument { id, fields, analyzed })
    }
}

fn analyze_value(schema: &Schema, analyzers: &AnalyzerRegistry, field: &str, value: &FieldValue) -> Result<Option<Vec<Token>>> {
    match (value, schema.get_analyzer_for_field(field)) {
        (FieldValue::Text(text), Some(analyzer)) => Ok(Some(analyzers.analyze(analyzer, text)?)),
        _ => Ok(None),
    }
}

fn analyze_text_fields(schema: &Schema, analyzers: &AnalyzerRegistry, fields: &Fields) -> Result<Vec<(String, Vec<Token>)>> {
    let mut analyzed = Vec::new();
    for (name, value) in fields {
        if let Some(tokens) = analyze_value(schema, analyzers, name, value)? {
            analyzed.push((name.clone(), tokens));
        }
    }
    Ok(analyzed)
}

/// Single writer over one index. Every method leaves store and postings
/// consistent: validation and analysis happen before the first mutation.
pub struct IndexWriter<'a> {
    index: &'a Index,
    state: RwLockWriteGuard<'a, IndexState>,
}

impl<'a> IndexWriter<'a> {
    pub(crate) fn new(index: &'a Index, state: RwLockWriteGuard<'a, IndexState>) -> Self {
        IndexWriter { index, state }
    }

    pub fn index(&self) -> &'a Index {
        self.index
    }

    pub fn prepare(&self, id: DocId, fields: Fields) -> Result<PreparedDocument> {
        PreparedDocument::prepare(self.index.schema(), self.index.analyzers(), id, fields)
    }

    /// Insert, or replace an existing document with exactly `fields`.
    pub fn index_document(&mut self, id: DocId, fields: Fields) -> Result<WriteResult> {
        let prepared = self.prepare(id, fields)?;
        self.apply(prepared)
    }

    /// Write a document prepared by [`IndexWriter::prepare`] or
    /// [`PreparedDocument::prepare`] against this index's schema.
    pub fn apply(&mut self, prepared: PreparedDocument) -> Result<WriteResult> {
        let PreparedDocument { id, fields, analyzed } = prepared;

        let previous = match self.state.store.get(id) {
            Some(old) => Some(analyze_text_fields(self.index.schema(), self.index.analyzers(), &old.fields)?),
            None => None,
        };

        let state = &mut *self.state;
        if let Some(old_tokens) = &previous {
            for (field, tokens) in old_tokens {
                state.inverted.remove_document(id, field, tokens);
            }
        }
        for (field, tokens) in &analyzed {
            state.inverted.add_document(id, field, tokens);
        }
        state.store.insert(Document::with_fields(id, fields));

        let result = if previous.is_some() { WriteResult::Updated } else { WriteResult::Created };
        debug!("[{}] indexed document {} ({:?})", self.index.name(), id, result);
        Ok(result)
    }

    /// Merge `partial` into an existing document. Postings are re-derived
    /// only for Text fields whose value actually changed.
    pub fn update_document(&mut self, id: DocId, partial: Fields) -> Result<WriteResult> {
        let schema = self.index.schema();
        let analyzers = self.index.analyzers();

        let existing = self.state.store
            .get(id)
            .ok_or_else(|| Error::document_not_found(self.index.name(), id))?;
        schema.check_fields(&partial)?;

        let mut reindex = Vec::new();
        for (field, new_value) in &partial {
            let old_value = existing.get_field(field);
            if old_value == Some(new_value) {
                continue;
            }
            let old_tokens = match old_value {
                Some(old) => analyze_value(schema, analyzers, field, old)?,
                None => None,
            };
            let new_tokens = analyze_value(schema, analyzers, field, new_value)?;
            if old_tokens.is_some() || new_tokens.is_some() {
                reindex.push((field.clone(), old_tokens, new_tokens));
            }
        }

        let state = &mut *self.state;
        for (field, old_tokens, new_tokens) in &reindex {
            if let Some(tokens) = old_tokens {
                state.inverted.remove_document(id, field, tokens);
            }
            if let Some(tokens) = new_tokens {
                state.inverted.add_document(id, field, tokens);
            }
        }

        if let Some(doc) = state.store.get_mut(id) {
            doc.fields.extend(partial);
        }

        debug!("[{}] updated document {} ({} text fields re-analyzed)",
               self.index.name(), id, reindex.len());
        Ok(WriteResult::Updated)
    }

    pub fn delete_document(&mut self, id: DocId) -> Result<WriteResult> {
        let schema = self.index.schema();
        let analyzers = self.index.analyzers();

        let existing = self.state.store
            .get(id)
            .ok_or_else(|| Error::document_not_found(self.index.name(), id))?;
        let analyzed = analyze_text_fields(schema, analyzers, &existing.fields)?;

        let state = &mut *self.state;
        for (field, tokens) in &analyzed {
            state.inverted.remove_document(id, field, tokens);
        }
        state.store.remove(id);

        debug!("[{}] deleted document {}", self.index.name(), id);
        Ok(WriteResult::Deleted)
    }
}
