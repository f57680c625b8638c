use std::cmp::Ordering;
use std::collections::HashMap;
use std::time::Instant;
use log::debug;
use roaring::RoaringTreemap;
use crate::analysis::analyzer::STANDARD_ANALYZER;
use crate::core::config::Config;
use crate::core::error::{Error, ErrorKind, Result};
use crate::core::types::{DocId, Document, FieldValue};
use crate::index::index_reader::IndexReader;
use crate::index::inverted::Term;
use crate::index::posting::Posting;
use crate::query::ast::{MatchQuery, RangeQuery, RangeValue, SearchRequest, SortField};
use crate::query::types::{Operator, SortOrder};
use crate::schema::schema::FieldType;
use crate::scoring::scorer::{Scorer, TermFrequencyScorer};
use crate::search::results::{SearchHit, SearchResults};

/// A must clause after validation, ready to run against the postings.
#[derive(Debug)]
enum MatchPlan<'q> {
    /// Analyzed tokens of a Text field, deduplicated.
    Terms { field: &'q str, terms: Vec<String>, operator: Operator },
    /// Exact value of a Keyword field.
    Exact { field: &'q str, value: &'q str },
}

/// Evaluates one request against a reader's snapshot: validate, collect
/// candidates, filter, score, sort, paginate. Stateless between calls.
pub struct QueryExecutor<'r, 'a> {
    reader: &'r IndexReader<'a>,
    config: &'r Config,
    scorer: Box<dyn Scorer>,
}

impl<'r, 'a> QueryExecutor<'r, 'a> {
    pub fn new(reader: &'r IndexReader<'a>, config: &'r Config) -> Self {
        QueryExecutor {
            reader,
            config,
            scorer: Box::new(TermFrequencyScorer::default()),
        }
    }

    pub fn execute(&self, request: &SearchRequest) -> Result<SearchResults> {
        let start = Instant::now();

        // Nothing is evaluated until every clause has been checked.
        let plans = self.plan_matches(&request.query.must)?;
        self.validate_filters(&request.query.filter)?;
        self.validate_sort(&request.sort)?;

        let mut scores: HashMap<DocId, f32> = HashMap::new();
        let mut candidates: Option<RoaringTreemap> = None;
        for plan in &plans {
            let matched = self.execute_match(plan, &mut scores);
            candidates = Some(match candidates {
                Some(current) => current & matched,
                None => matched,
            });
        }
        let candidates = candidates.unwrap_or_else(|| self.reader.store().id_bitmap());

        let store = self.reader.store();
        let mut hits: Vec<(&Document, f32)> = candidates
            .iter()
            .filter_map(|id| store.get(DocId(id)))
            .filter(|doc| request.query.filter.iter().all(|range| matches_range(doc, range)))
            .map(|doc| (doc, scores.get(&doc.id).copied().unwrap_or(0.0)))
            .collect();

        if request.sort.is_empty() {
            hits.sort_by(|(a, a_score), (b, b_score)| {
                b_score.total_cmp(a_score).then(a.id.cmp(&b.id))
            });
        } else {
            hits.sort_by(|(a, _), (b, _)| compare_by_sort(a, b, &request.sort).then(a.id.cmp(&b.id)));
        }

        let total_hits = hits.len();
        let max_score = hits.iter().map(|(_, score)| *score).fold(0.0_f32, f32::max);
        let size = request.size.unwrap_or(self.config.default_page_size);

        let hits: Vec<SearchHit> = hits
            .into_iter()
            .skip(request.from)
            .take(size)
            .map(|(doc, score)| SearchHit {
                doc_id: doc.id,
                score,
                document: doc.clone(),
            })
            .collect();

        let took_ms = start.elapsed().as_millis() as u64;
        debug!("[{}] search matched {} documents, returning {} (from {}, size {}) in {}ms",
               self.reader.index_name(), total_hits, hits.len(), request.from, size, took_ms);

        Ok(SearchResults {
            hits,
            total_hits,
            max_score,
            took_ms,
        })
    }

    fn plan_matches<'q>(&self, clauses: &'q [MatchQuery]) -> Result<Vec<MatchPlan<'q>>> {
        let schema = self.reader.schema();

        clauses
            .iter()
            .map(|clause| {
                let definition = schema.require_field(&clause.field)?;
                match definition.field_type {
                    FieldType::Text => {
                        let analyzer_name = definition.analyzer_name().unwrap_or(STANDARD_ANALYZER);
                        let analyzer = self.reader.analyzers().get(analyzer_name)?;

                        let mut terms = analyzer.terms(&clause.query);
                        terms.sort();
                        terms.dedup();

                        Ok(MatchPlan::Terms {
                            field: &clause.field,
                            terms,
                            operator: clause.operator,
                        })
                    }
                    FieldType::Keyword => Ok(MatchPlan::Exact {
                        field: &clause.field,
                        value: &clause.query,
                    }),
                    other => Err(Error::invalid_input(format!(
                        "match query on [{}] of type {:?}; use a range filter", clause.field, other
                    ))),
                }
            })
            .collect()
    }

    fn validate_filters(&self, filters: &[RangeQuery]) -> Result<()> {
        let schema = self.reader.schema();

        for range in filters {
            let definition = schema.require_field(&range.field)?;
            if !definition.field_type.is_comparable() {
                return Err(Error::new(
                    ErrorKind::NonComparableField,
                    format!("range on [{}] of type {:?}", range.field, definition.field_type),
                ));
            }

            for (comparator, bound) in range.bounds() {
                if let (FieldType::Float, Some(RangeValue::Date(_))) = (definition.field_type, bound) {
                    return Err(Error::invalid_input(format!(
                        "date bound [{}] on float field [{}]", comparator, range.field
                    )));
                }
            }
        }
        Ok(())
    }

    fn validate_sort(&self, sort: &[SortField]) -> Result<()> {
        let schema = self.reader.schema();

        for key in sort {
            let definition = schema.require_field(&key.field)?;
            if !definition.field_type.is_sortable() {
                return Err(Error::new(
                    ErrorKind::NonComparableField,
                    format!("cannot sort on analyzed field [{}]", key.field),
                ));
            }
        }
        Ok(())
    }

    /// Documents matching one clause. Scores of every matched token are
    /// added to `scores`.
    fn execute_match(&self, plan: &MatchPlan<'_>, scores: &mut HashMap<DocId, f32>) -> RoaringTreemap {
        match plan {
            MatchPlan::Terms { field, terms, operator } => {
                let inverted = self.reader.inverted();
                let lists: Vec<_> = terms
                    .iter()
                    .map(|text| inverted.search_term(&Term::new(field, text)))
                    .collect();

                let matched = match operator {
                    Operator::And => {
                        let mut lists_iter = lists.iter();
                        let first = match lists_iter.next() {
                            Some(Some(list)) => list.to_bitmap(),
                            // No tokens, or a token nothing contains.
                            _ => return RoaringTreemap::new(),
                        };
                        lists_iter.fold(first, |acc, list| match list {
                            Some(list) => acc & list.to_bitmap(),
                            None => RoaringTreemap::new(),
                        })
                    }
                    Operator::Or => lists
                        .iter()
                        .flatten()
                        .fold(RoaringTreemap::new(), |acc, list| acc | list.to_bitmap()),
                };

                for list in lists.iter().flatten() {
                    for posting in &list.postings {
                        if matched.contains(posting.doc_id.value()) {
                            *scores.entry(posting.doc_id).or_insert(0.0) += self.scorer.score(posting);
                        }
                    }
                }
                matched
            }
            MatchPlan::Exact { field, value } => {
                let mut matched = RoaringTreemap::new();
                for doc in self.reader.store().iter() {
                    if let Some(FieldValue::Keyword(stored)) = doc.get_field(field) {
                        if stored == value {
                            matched.insert(doc.id.value());
                            let posting = Posting { doc_id: doc.id, term_freq: 1 };
                            *scores.entry(doc.id).or_insert(0.0) += self.scorer.score(&posting);
                        }
                    }
                }
                matched
            }
        }
    }
}

/// Every set bound must hold; a document without the field never matches.
fn matches_range(doc: &Document, range: &RangeQuery) -> bool {
    let Some(value) = doc.get_field(&range.field) else {
        return false;
    };

    range.bounds().iter().all(|(comparator, bound)| {
        let Some(bound) = bound else {
            return true;
        };
        match (compare_to_bound(value, bound), *comparator) {
            (Some(Ordering::Greater), "gt" | "gte") => true,
            (Some(Ordering::Equal), "gte" | "lte") => true,
            (Some(Ordering::Less), "lt" | "lte") => true,
            _ => false,
        }
    })
}

fn compare_to_bound(value: &FieldValue, bound: &RangeValue) -> Option<Ordering> {
    match (value, bound) {
        (FieldValue::Float(v), RangeValue::Float(b)) => v.partial_cmp(b),
        (FieldValue::Date(v), RangeValue::Date(b)) => Some(v.cmp(b)),
        // Numeric bounds against dates are epoch milliseconds.
        (FieldValue::Date(v), RangeValue::Float(b)) => (v.timestamp_millis() as f64).partial_cmp(b),
        _ => None,
    }
}

fn compare_by_sort(a: &Document, b: &Document, sort: &[SortField]) -> Ordering {
    for key in sort {
        let ordering = match (a.get_field(&key.field), b.get_field(&key.field)) {
            // Missing values go last whatever the direction.
            (None, None) => Ordering::Equal,
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (Some(x), Some(y)) => {
                let ordering = compare_values(x, y);
                match key.order {
                    SortOrder::Asc => ordering,
                    SortOrder::Desc => ordering.reverse(),
                }
            }
        };
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    Ordering::Equal
}

fn compare_values(a: &FieldValue, b: &FieldValue) -> Ordering {
    match (a, b) {
        (FieldValue::Float(x), FieldValue::Float(y)) => x.total_cmp(y),
        (FieldValue::Date(x), FieldValue::Date(y)) => x.cmp(y),
        (FieldValue::Keyword(x), FieldValue::Keyword(y))
        | (FieldValue::Text(x), FieldValue::Text(y)) => x.cmp(y),
        _ => Ordering::Equal,
    }
}
