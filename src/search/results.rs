use serde::Serialize;
use serde_json::json;
use crate::core::types::{DocId, Document};

/// One page of a search, plus the size of the whole result set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResults {
    pub hits: Vec<SearchHit>,
    /// Matches before pagination.
    pub total_hits: usize,
    pub max_score: f32,
    pub took_ms: u64,
}

/// Document with relevance score
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchHit {
    pub doc_id: DocId,
    pub score: f32,
    pub document: Document,
}

impl SearchResults {
    pub fn len(&self) -> usize {
        self.hits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }

    /// Ids of this page, in result order.
    pub fn doc_ids(&self) -> Vec<DocId> {
        self.hits.iter().map(|hit| hit.doc_id).collect()
    }

    /// Response body in the usual `hits.hits[]._source` layout.
    pub fn to_json(&self) -> serde_json::Value {
        let hits: Vec<_> = self.hits
            .iter()
            .map(|hit| json!({
                "_id": hit.doc_id.to_string(),
                "_score": hit.score,
                "_source": hit.document.to_json(),
            }))
            .collect();

        json!({
            "took": self.took_ms,
            "hits": {
                "total": { "value": self.total_hits },
                "max_score": self.max_score,
                "hits": hits,
            }
        })
    }
}
