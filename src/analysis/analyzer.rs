use std::collections::HashMap;
use std::sync::Arc;
use serde::{Deserialize, Serialize};
use crate::analysis::filter::TokenFilter;
use crate::analysis::filters::lowercase::LowercaseFilter;
use crate::analysis::filters::stopword::StopWordFilter;
use crate::analysis::token::Token;
use crate::analysis::tokenizer::{StandardTokenizer, Tokenizer};
use crate::core::error::{Error, ErrorKind, Result};

/// Name of the analyzer every index has without declaring it.
pub const STANDARD_ANALYZER: &str = "standard";

/// Text analysis pipeline
pub struct Analyzer {
    pub tokenizer: Box<dyn Tokenizer>,
    pub filters: Vec<Box<dyn TokenFilter>>,
    pub name: String,
}

impl Analyzer {
    pub fn new(name: String, tokenizer: Box<dyn Tokenizer>) -> Self {
        Analyzer {
            tokenizer,
            filters: Vec::new(),
            name,
        }
    }

    pub fn add_filter(mut self, filter: Box<dyn TokenFilter>) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn analyze(&self, text: &str) -> Vec<Token> {
        let mut tokens = self.tokenizer.tokenize(text);

        for filter in &self.filters {
            tokens = filter.filter(tokens);
        }

        tokens
    }

    /// Token texts only, in stream order.
    pub fn terms(&self, text: &str) -> Vec<String> {
        self.analyze(text).into_iter().map(|t| t.text).collect()
    }

    /// Standard analyzer without stop words
    pub fn standard(max_token_length: usize) -> Self {
        Analyzer::new(STANDARD_ANALYZER.to_string(),
                      Box::new(StandardTokenizer::new(max_token_length)))
            .add_filter(Box::new(LowercaseFilter))
    }

    /// Build a named analyzer from its declared configuration.
    pub fn from_config(name: &str, config: &AnalyzerConfig, default_max_token_length: usize) -> Result<Self> {
        match config.kind {
            AnalyzerType::Standard => {
                let max_token_length = config.max_token_length.unwrap_or(default_max_token_length);
                if max_token_length == 0 {
                    return Err(Error::invalid_input(format!(
                        "analyzer [{}]: max_token_length must be positive", name
                    )));
                }

                let mut analyzer = Analyzer::new(name.to_string(),
                                                 Box::new(StandardTokenizer::new(max_token_length)))
                    .add_filter(Box::new(LowercaseFilter));

                let stop_filter = match &config.stopwords {
                    None => None,
                    Some(StopWords::Named(set)) => Some(StopWordFilter::named(set).ok_or_else(|| {
                        Error::invalid_input(format!(
                            "analyzer [{}]: unknown stopword set [{}]", name, set
                        ))
                    })?),
                    Some(StopWords::List(words)) => Some(StopWordFilter::new(words.clone())),
                };

                if let Some(filter) = stop_filter.filter(|f| !f.is_empty()) {
                    analyzer = analyzer.add_filter(Box::new(filter));
                }

                Ok(analyzer)
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalyzerType {
    Standard,
}

/// Stop words either by predefined set name (`"_english_"`) or listed out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StopWords {
    Named(String),
    List(Vec<String>),
}

/// Declared analyzer, as found under `settings.analysis.analyzer.<name>`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    #[serde(rename = "type")]
    pub kind: AnalyzerType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stopwords: Option<StopWords>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_token_length: Option<usize>,
}

impl AnalyzerConfig {
    pub fn standard() -> Self {
        AnalyzerConfig {
            kind: AnalyzerType::Standard,
            stopwords: None,
            max_token_length: None,
        }
    }

    pub fn with_stopwords(mut self, stopwords: StopWords) -> Self {
        self.stopwords = Some(stopwords);
        self
    }

}

/// Analyzers of one index. Built once when the index is created and never
/// mutated afterwards, so lookups need no lock.
pub struct AnalyzerRegistry {
    analyzers: HashMap<String, Arc<Analyzer>>,
}

impl AnalyzerRegistry {
    pub fn new(max_token_length: usize) -> Self {
        let mut registry = AnalyzerRegistry {
            analyzers: HashMap::new(),
        };
        registry.register(STANDARD_ANALYZER, Analyzer::standard(max_token_length));
        registry
    }

    pub fn register(&mut self, name: &str, analyzer: Analyzer) {
        self.analyzers.insert(name.to_string(), Arc::new(analyzer));
    }

    pub fn contains(&self, name: &str) -> bool {
        self.analyzers.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Result<Arc<Analyzer>> {
        self.analyzers.get(name).cloned().ok_or_else(|| Error {
            kind: ErrorKind::UnknownAnalyzer,
            context: format!("analyzer [{}] not found", name),
        })
    }

    pub fn analyze(&self, analyzer_name: &str, text: &str) -> Result<Vec<Token>> {
        self.get(analyzer_name).map(|analyzer| analyzer.analyze(text))
    }
}
