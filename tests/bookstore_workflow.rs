//! End-to-end catalogue workflow: create, index, search, update, delete, bulk.

use serde_json::json;
use sifter::core::error::ErrorKind;
use sifter::core::types::DocId;
use sifter::index::inverted::Term;
use sifter::writer::batch::BulkOperation;
use sifter::{Config, IndexRegistry, QueryParser, SearchRequest, WriteResult};

const INDEX: &str = "demo_index";

fn mapping() -> serde_json::Value {
    json!({
        "settings": {
            "analysis": {
                "analyzer": {
                    "my_custom_analyzer": { "type": "standard", "stopwords": ["for"] }
                }
            }
        },
        "mappings": {
            "properties": {
                "title": { "type": "text", "analyzer": "my_custom_analyzer" },
                "author": { "type": "keyword" },
                "published_date": { "type": "date" },
                "price": { "type": "float" }
            }
        }
    })
}

fn create_registry() -> IndexRegistry {
    let registry = IndexRegistry::new(Config::default());
    registry.create_index_from_json(INDEX, &mapping()).unwrap();
    registry
}

fn index_book(registry: &IndexRegistry, id: u64, body: serde_json::Value) {
    let fields = registry.get(INDEX).unwrap().schema().fields_from_json(&body).unwrap();
    registry.index_document(INDEX, id, fields).unwrap();
}

fn seeded_registry() -> IndexRegistry {
    let registry = create_registry();
    index_book(&registry, 1, json!({ "title": "Elasticsearch for Beginners", "author": "Jane Doe", "price": 29.99 }));
    index_book(&registry, 2, json!({ "title": "Advanced Elasticsearch", "author": "John Smith", "price": 39.99 }));
    index_book(&registry, 3, json!({ "title": "PHP & Elasticsearch", "author": "Alice", "price": 19.99 }));
    registry
}

fn page_request(from: usize, size: usize, order: &str) -> SearchRequest {
    QueryParser::new().parse(&json!({
        "query": {
            "bool": {
                "must": [ { "match": { "title": "Elasticsearch" } } ],
                "filter": [ { "range": { "price": { "lte": 40 } } } ]
            }
        },
        "from": from,
        "size": size,
        "sort": [ { "price": { "order": order } } ]
    })).unwrap()
}

fn ids(values: &[u64]) -> Vec<DocId> {
    values.iter().copied().map(DocId).collect()
}

#[test]
fn test_first_page_sorted_by_price() {
    let registry = seeded_registry();

    let results = registry.search(INDEX, &page_request(0, 2, "asc")).unwrap();
    assert_eq!(results.doc_ids(), ids(&[3, 1]));
    assert_eq!(results.total_hits, 3);

    let titles: Vec<_> = results.hits.iter()
        .map(|hit| hit.document.get_field("title").unwrap().as_str().unwrap().to_string())
        .collect();
    assert_eq!(titles, vec!["PHP & Elasticsearch", "Elasticsearch for Beginners"]);

    // Document 2 passes the filter and is only on the next page.
    let next = registry.search(INDEX, &page_request(2, 2, "asc")).unwrap();
    assert_eq!(next.doc_ids(), ids(&[2]));
}

#[test]
fn test_partial_update_is_visible_to_search() {
    let registry = seeded_registry();

    let partial = registry.get(INDEX).unwrap().schema()
        .fields_from_json(&json!({ "price": 24.99 })).unwrap();
    assert_eq!(registry.update_document(INDEX, 1, partial).unwrap(), WriteResult::Updated);

    let doc = registry.get_document(INDEX, 1).unwrap();
    assert_eq!(doc.get_field("price").unwrap().as_f64(), Some(24.99));
    assert_eq!(doc.get_field("author").unwrap().as_str(), Some("Jane Doe"));

    let asc = registry.search(INDEX, &page_request(0, 10, "asc")).unwrap();
    assert_eq!(asc.doc_ids(), ids(&[3, 1, 2]));

    let desc = registry.search(INDEX, &page_request(0, 10, "desc")).unwrap();
    assert_eq!(desc.doc_ids(), ids(&[2, 1, 3]));
}

#[test]
fn test_deleted_document_never_matches() {
    let registry = seeded_registry();
    assert_eq!(registry.delete_document(INDEX, 2).unwrap(), WriteResult::Deleted);

    let results = registry.search(INDEX, &page_request(0, 10, "asc")).unwrap();
    assert_eq!(results.doc_ids(), ids(&[3, 1]));

    // "advanced" only ever appeared in document 2.
    let request = QueryParser::new()
        .parse(&json!({ "query": { "match": { "title": "Advanced" } } }))
        .unwrap();
    assert!(registry.search(INDEX, &request).unwrap().is_empty());

    let index = registry.get(INDEX).unwrap();
    let reader = index.reader();
    assert!(reader.inverted().search_term(&Term::new("title", "advanced")).is_none());
    assert!(!reader.inverted().contains(&Term::new("title", "elasticsearch"), DocId(2)));
}

#[test]
fn test_bulk_reports_each_item() {
    let registry = seeded_registry();
    let schema = registry.get(INDEX).unwrap().schema().clone();

    let response = registry.bulk(INDEX, vec![
        BulkOperation::index(4, schema.fields_from_json(
            &json!({ "title": "Search Engines in Depth", "author": "Bob", "price": 49.99 })).unwrap()),
        BulkOperation::delete(999),
        BulkOperation::index(5, schema.fields_from_json(
            &json!({ "title": "New Search Trends", "author": "Charlie", "price": 34.50 })).unwrap()),
    ]).unwrap();

    assert!(response.errors);
    assert_eq!(response.items.len(), 3);
    assert_eq!(response.items[0].result, Ok(WriteResult::Created));
    assert_eq!(response.items[1].error().unwrap().kind, ErrorKind::DocumentNotFound);
    assert_eq!(response.items[2].result, Ok(WriteResult::Created));
    assert_eq!(response.success_count(), 2);

    assert!(registry.get_document(INDEX, 4).is_ok());
    assert!(registry.get_document(INDEX, 5).is_ok());

    let request = QueryParser::new().parse(&json!({
        "query": { "match": { "title": "search" } },
        "sort": "price"
    })).unwrap();
    assert_eq!(registry.search(INDEX, &request).unwrap().doc_ids(), ids(&[5, 4]));
}

#[test]
fn test_recreate_index_after_check() {
    let registry = seeded_registry();

    if registry.exists(INDEX) {
        registry.drop_index(INDEX).unwrap();
    }
    assert_eq!(registry.get(INDEX).unwrap_err().kind, ErrorKind::IndexNotFound);
    assert_eq!(registry.search(INDEX, &SearchRequest::match_all()).unwrap_err().kind,
               ErrorKind::IndexNotFound);

    registry.create_index_from_json(INDEX, &mapping()).unwrap();
    assert_eq!(registry.stats(INDEX).unwrap().doc_count, 0);
    assert_eq!(registry.get_document(INDEX, 1).unwrap_err().kind, ErrorKind::DocumentNotFound);
}
