use serde::{Deserialize, Serialize};

/// Point-in-time counters of one index, taken under its read lock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexStats {
    pub name: String,
    pub doc_count: usize,
    /// Distinct (field, token) pairs.
    pub term_count: usize,
    pub posting_count: usize,
    pub total_tokens: usize,
    pub field_count: usize,
}
