use serde::{Serialize, Deserialize};
use chrono::{DateTime, Utc};
use crate::query::types::{Operator, SortOrder};

/// Full-text match on one field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchQuery {
    pub field: String,
    pub query: String,
    #[serde(default)]
    pub operator: Operator,
}

/// Bound of a range clause
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum RangeValue {
    Float(f64),
    Date(DateTime<Utc>),
}

/// Range query for numeric and date fields. Every bound that is set must hold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RangeQuery {
    pub field: String,
    pub gt: Option<RangeValue>,   // Greater than
    pub gte: Option<RangeValue>,  // Greater than or equal
    pub lt: Option<RangeValue>,   // Less than
    pub lte: Option<RangeValue>,  // Less than or equal
}

/// Must clauses select and score, filter clauses only restrict.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BoolQuery {
    pub must: Vec<MatchQuery>,      // All must match (AND)
    pub filter: Vec<RangeQuery>,    // Must match but don't affect score
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SortField {
    pub field: String,
    pub order: SortOrder,
}

/// A complete search: query, sort keys and page window.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchRequest {
    pub query: BoolQuery,
    pub sort: Vec<SortField>,
    pub from: usize,
    /// Page size; the index default applies when unset.
    pub size: Option<usize>,
}

impl MatchQuery {
    pub fn new(field: &str, query: &str) -> Self {
        MatchQuery {
            field: field.to_string(),
            query: query.to_string(),
            operator: Operator::And,
        }
    }

    pub fn with_operator(mut self, operator: Operator) -> Self {
        self.operator = operator;
        self
    }
}

impl RangeQuery {
    pub fn new(field: &str) -> Self {
        RangeQuery {
            field: field.to_string(),
            gt: None,
            gte: None,
            lt: None,
            lte: None,
        }
    }

    pub fn gt(mut self, value: impl Into<RangeValue>) -> Self {
        self.gt = Some(value.into());
        self
    }

    pub fn gte(mut self, value: impl Into<RangeValue>) -> Self {
        self.gte = Some(value.into());
        self
    }

    pub fn lt(mut self, value: impl Into<RangeValue>) -> Self {
        self.lt = Some(value.into());
        self
    }

    pub fn lte(mut self, value: impl Into<RangeValue>) -> Self {
        self.lte = Some(value.into());
        self
    }

    /// Set bounds as (comparator, value) pairs.
    pub fn bounds(&self) -> [(&'static str, Option<RangeValue>); 4] {
        [("gt", self.gt), ("gte", self.gte), ("lt", self.lt), ("lte", self.lte)]
    }
}

impl From<f64> for RangeValue {
    fn from(value: f64) -> Self {
        RangeValue::Float(value)
    }
}

impl From<DateTime<Utc>> for RangeValue {
    fn from(value: DateTime<Utc>) -> Self {
        RangeValue::Date(value)
    }
}

impl BoolQuery {
    pub fn new() -> Self {
        BoolQuery::default()
    }

    pub fn with_must(mut self, query: MatchQuery) -> Self {
        self.must.push(query);
        self
    }

    pub fn with_filter(mut self, query: RangeQuery) -> Self {
        self.filter.push(query);
        self
    }
}

impl SearchRequest {
    pub fn new() -> Self {
        SearchRequest::default()
    }

    /// Everything, in the default order.
    pub fn match_all() -> Self {
        SearchRequest::default()
    }

    pub fn with_must(mut self, query: MatchQuery) -> Self {
        self.query.must.push(query);
        self
    }

    pub fn with_filter(mut self, query: RangeQuery) -> Self {
        self.query.filter.push(query);
        self
    }

    pub fn with_sort(mut self, field: &str, order: SortOrder) -> Self {
        self.sort.push(SortField {
            field: field.to_string(),
            order,
        });
        self
    }

    pub fn with_from(mut self, from: usize) -> Self {
        self.from = from;
        self
    }

    pub fn with_size(mut self, size: usize) -> Self {
        self.size = Some(size);
        self
    }
}
