use serde::{Deserialize, Serialize};
use crate::core::error::Result;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Longest token the standard tokenizer emits before splitting.
    pub max_token_length: usize,
    /// Page size used when a request does not carry one.
    pub default_page_size: usize,
    /// Bulk batches at least this long are analyzed in parallel.
    pub bulk_parallel_threshold: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            max_token_length: 255,
            default_page_size: 10,
            bulk_parallel_threshold: 100,
        }
    }
}

impl Config {
    /// Missing keys keep their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
