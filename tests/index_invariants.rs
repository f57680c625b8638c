//! Store / postings consistency under every kind of write.

use chrono::{TimeZone, Utc};
use sifter::core::error::ErrorKind;
use sifter::core::types::{DocId, FieldValue, Fields};
use sifter::index::inverted::Term;
use sifter::query::ast::{MatchQuery, RangeQuery};
use sifter::writer::batch::BulkOperation;
use sifter::{Config, Index, Schema, SearchRequest, SortOrder, WriteResult};

fn create_index() -> Index {
    let schema = Schema::new()
        .add_text_field("title", None)
        .add_text_field("body", None)
        .add_keyword_field("author")
        .add_date_field("published_date")
        .add_float_field("price");
    Index::new("books", schema, Config::default()).unwrap()
}

fn fields(title: &str, price: f64) -> Fields {
    Fields::from([
        ("title".to_string(), FieldValue::text(title)),
        ("price".to_string(), FieldValue::Float(price)),
    ])
}

fn terms_of(index: &Index, id: u64) -> Vec<Term> {
    let reader = index.reader();
    let mut terms: Vec<Term> = reader.inverted().terms_for_document(DocId(id)).into_iter().cloned().collect();
    terms.sort();
    terms
}

#[test]
fn test_round_trip() {
    let index = create_index();
    let mut input = fields("Rust in Action", 45.0);
    input.insert("author".to_string(), FieldValue::keyword("Tim McNamara"));
    input.insert("published_date".to_string(),
                 FieldValue::Date(Utc.with_ymd_and_hms(2021, 8, 10, 0, 0, 0).unwrap()));

    assert_eq!(index.index_document(DocId(1), input.clone()).unwrap(), WriteResult::Created);
    assert_eq!(index.get_document(DocId(1)).unwrap().fields, input);
}

#[test]
fn test_delete_purges_every_posting() {
    let index = create_index();
    let mut input = fields("the quick brown fox", 10.0);
    input.insert("body".to_string(), FieldValue::text("quick quick slow"));
    index.index_document(DocId(7), input).unwrap();
    index.index_document(DocId(8), fields("quick thinking", 12.0)).unwrap();
    assert!(!terms_of(&index, 7).is_empty());

    index.delete_document(DocId(7)).unwrap();

    assert!(terms_of(&index, 7).is_empty());
    assert!(!index.contains(DocId(7)));
    // Shared terms keep their other documents, private ones disappear.
    let reader = index.reader();
    assert!(reader.inverted().contains(&Term::new("title", "quick"), DocId(8)));
    assert!(reader.inverted().search_term(&Term::new("body", "slow")).is_none());
    assert!(reader.inverted().search_term(&Term::new("title", "fox")).is_none());
}

#[test]
fn test_second_delete_fails_without_damage() {
    let index = create_index();
    index.index_document(DocId(1), fields("one", 1.0)).unwrap();
    index.index_document(DocId(2), fields("two", 2.0)).unwrap();

    index.delete_document(DocId(1)).unwrap();
    let err = index.delete_document(DocId(1)).unwrap_err();
    assert_eq!(err.kind, ErrorKind::DocumentNotFound);

    assert_eq!(index.doc_count(), 1);
    assert_eq!(terms_of(&index, 2), vec![Term::new("title", "two")]);
}

#[test]
fn test_reindex_replaces_document_and_postings() {
    let index = create_index();
    let mut first = fields("old title", 5.0);
    first.insert("author".to_string(), FieldValue::keyword("Someone"));
    index.index_document(DocId(1), first).unwrap();

    let result = index.index_document(DocId(1), fields("new title", 6.0)).unwrap();
    assert_eq!(result, WriteResult::Updated);

    let doc = index.get_document(DocId(1)).unwrap();
    assert!(doc.get_field("author").is_none());
    assert_eq!(terms_of(&index, 1), vec![Term::new("title", "new"), Term::new("title", "title")]);
    assert_eq!(index.stats().total_tokens, 2);
}

#[test]
fn test_update_reanalyzes_changed_text_only() {
    let index = create_index();
    let mut input = fields("graph algorithms", 30.0);
    input.insert("body".to_string(), FieldValue::text("dijkstra"));
    index.index_document(DocId(1), input).unwrap();

    let partial = Fields::from([("title".to_string(), FieldValue::text("graph theory"))]);
    index.update_document(DocId(1), partial).unwrap();

    assert_eq!(terms_of(&index, 1), vec![
        Term::new("body", "dijkstra"),
        Term::new("title", "graph"),
        Term::new("title", "theory"),
    ]);
    let doc = index.get_document(DocId(1)).unwrap();
    assert_eq!(doc.get_field("price").unwrap().as_f64(), Some(30.0));
}

#[test]
fn test_invalid_writes_change_nothing() {
    let index = create_index();
    index.index_document(DocId(1), fields("kept", 1.0)).unwrap();

    let wrong_type = Fields::from([("price".to_string(), FieldValue::text("cheap"))]);
    assert_eq!(index.update_document(DocId(1), wrong_type.clone()).unwrap_err().kind, ErrorKind::SchemaMismatch);
    assert_eq!(index.index_document(DocId(1), wrong_type).unwrap_err().kind, ErrorKind::SchemaMismatch);

    let undeclared = Fields::from([("isbn".to_string(), FieldValue::keyword("123"))]);
    assert_eq!(index.index_document(DocId(2), undeclared).unwrap_err().kind, ErrorKind::SchemaMismatch);

    let missing = Fields::from([("price".to_string(), FieldValue::Float(3.0))]);
    assert_eq!(index.update_document(DocId(9), missing).unwrap_err().kind, ErrorKind::DocumentNotFound);

    assert_eq!(index.doc_count(), 1);
    assert_eq!(index.get_document(DocId(1)).unwrap().fields, fields("kept", 1.0));
    assert_eq!(terms_of(&index, 1), vec![Term::new("title", "kept")]);
}

#[test]
fn test_non_finite_prices_are_rejected() {
    let index = create_index();
    index.index_document(DocId(1), fields("kept", 1.0)).unwrap();

    for price in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
        let err = index.index_document(DocId(2), fields("bad", price)).unwrap_err();
        assert_eq!(err.kind, ErrorKind::SchemaMismatch, "{}", price);

        let partial = Fields::from([("price".to_string(), FieldValue::Float(price))]);
        assert_eq!(index.update_document(DocId(1), partial).unwrap_err().kind, ErrorKind::SchemaMismatch);
    }

    let source = serde_json::json!({ "title": "x", "price": "NaN" });
    assert_eq!(index.schema().fields_from_json(&source).unwrap_err().kind, ErrorKind::SchemaMismatch);

    assert_eq!(index.doc_count(), 1);
    assert_eq!(index.get_document(DocId(1)).unwrap().fields, fields("kept", 1.0));
}

#[test]
fn test_deleted_id_can_be_reused() {
    let index = create_index();
    index.index_document(DocId(1), fields("first life", 1.0)).unwrap();
    index.delete_document(DocId(1)).unwrap();

    assert_eq!(index.index_document(DocId(1), fields("second life", 2.0)).unwrap(), WriteResult::Created);
    assert_eq!(terms_of(&index, 1), vec![Term::new("title", "life"), Term::new("title", "second")]);
}

#[test]
fn test_pagination_reconstructs_full_result() {
    let index = create_index();
    for id in 0..23u64 {
        // Repeating prices force id tie-breaks.
        index.index_document(DocId(id), fields("paged book", (id % 5) as f64)).unwrap();
    }

    let base = SearchRequest::new()
        .with_must(MatchQuery::new("title", "book"))
        .with_filter(RangeQuery::new("price").gte(1.0))
        .with_sort("price", SortOrder::Desc);

    let full = index.search(&base.clone().with_size(100)).unwrap();
    assert_eq!(full.total_hits, 18);

    let mut paged = Vec::new();
    let mut from = 0;
    loop {
        let page = index.search(&base.clone().with_from(from).with_size(4)).unwrap();
        if page.is_empty() {
            break;
        }
        assert_eq!(page.total_hits, 18);
        paged.extend(page.doc_ids());
        from += 4;
    }
    assert_eq!(paged, full.doc_ids());
    assert_eq!(&paged[..3], &[DocId(4), DocId(9), DocId(14)]);

    let beyond = index.search(&base.clone().with_from(500)).unwrap();
    assert!(beyond.is_empty());
    assert_eq!(beyond.total_hits, 18);
}

#[test]
fn test_parallel_bulk_matches_sequential() {
    let operations: Vec<BulkOperation> = (0..150u64)
        .map(|id| match id % 10 {
            3 => BulkOperation::delete(id - 1),
            7 => BulkOperation::update(id + 1000, fields("ghost", 1.0)),
            9 => BulkOperation::index(id, Fields::from([("nope".to_string(), FieldValue::Float(1.0))])),
            _ => BulkOperation::index(id, fields(&format!("bulk item {}", id % 4), id as f64)),
        })
        .collect();

    let schema = create_index().schema().clone();
    let sequential = Index::new("seq", schema.clone(), Config {
        bulk_parallel_threshold: 0,
        ..Config::default()
    }).unwrap();
    let parallel = Index::new("par", schema, Config {
        bulk_parallel_threshold: 10,
        ..Config::default()
    }).unwrap();

    let seq = sequential.bulk(operations.clone());
    let par = parallel.bulk(operations);

    let outcome = |response: &sifter::BulkResponse| -> Vec<_> {
        response.items.iter().map(|item| (item.id, item.result.as_ref().map_err(|e| e.kind).copied())).collect()
    };
    assert_eq!(outcome(&seq), outcome(&par));
    assert!(seq.errors);
    assert_eq!(seq.items[9].error().unwrap().kind, ErrorKind::SchemaMismatch);
    assert_eq!(seq.items[7].error().unwrap().kind, ErrorKind::DocumentNotFound);
    assert_eq!(seq.items[3].result, Ok(WriteResult::Deleted));

    assert_eq!(sequential.stats().doc_count, parallel.stats().doc_count);
    assert_eq!(sequential.stats().posting_count, parallel.stats().posting_count);
    for id in 0..150u64 {
        assert_eq!(sequential.get_document(DocId(id)).ok(), parallel.get_document(DocId(id)).ok());
    }
}
