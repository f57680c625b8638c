/// Bookstore walkthrough
///
/// Replays a small catalogue workflow against an in-process registry:
/// - (re)create an index from a settings + mappings body
/// - index three books, search with match + range + sort + paging
/// - partial update, delete, bulk insert
///
/// Run with `cargo run --example bookstore`.

use serde_json::json;
use sifter::core::types::DocId;
use sifter::writer::batch::BulkOperation;
use sifter::{Config, IndexRegistry, QueryParser, SearchResults};

const INDEX: &str = "demo_index";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_json(r#"{"default_page_size": 10, "bulk_parallel_threshold": 2}"#)?;
    let registry = IndexRegistry::new(config);

    if registry.exists(INDEX) {
        registry.drop_index(INDEX)?;
    }

    let index = registry.create_index_from_json(INDEX, &json!({
        "settings": {
            "analysis": {
                "analyzer": {
                    "my_custom_analyzer": { "type": "standard", "stopwords": "_english_" }
                }
            }
        },
        "mappings": {
            "dynamic": "strict",
            "properties": {
                "title": { "type": "text", "analyzer": "my_custom_analyzer" },
                "author": { "type": "keyword" },
                "published_date": { "type": "date" },
                "price": { "type": "float" }
            }
        }
    }))?;
    println!("Index created successfully.");

    let books = [
        (1_u64, json!({ "title": "Elasticsearch for Beginners", "author": "Jane Doe", "price": 29.99 })),
        (2, json!({ "title": "Advanced Elasticsearch", "author": "John Smith", "price": 39.99 })),
        (3, json!({ "title": "PHP & Elasticsearch", "author": "Alice", "price": 19.99 })),
    ];
    for (id, body) in &books {
        let fields = index.schema().fields_from_json(body)?;
        registry.index_document(INDEX, *id, fields)?;
    }
    println!("Documents indexed.");

    let page = 1;
    let size = 2;
    let request = QueryParser::new().parse(&json!({
        "query": {
            "bool": {
                "must": [ { "match": { "title": "Elasticsearch" } } ],
                "filter": [ { "range": { "price": { "lte": 40 } } } ]
            }
        },
        "from": (page - 1) * size,
        "size": size,
        "sort": [ { "price": { "order": "asc" } } ]
    }))?;

    let results = registry.search(INDEX, &request)?;
    println!("Search results:");
    print_hits(&results);

    let partial = index.schema().fields_from_json(&json!({ "price": 24.99 }))?;
    registry.update_document(INDEX, 1, partial)?;
    println!("Document #1 updated.");

    registry.delete_document(INDEX, 2)?;
    println!("Document #2 deleted.");

    let new_books = [
        (4_u64, json!({ "title": "Search Engines in Depth", "author": "Bob", "price": 49.99 })),
        (5, json!({ "title": "New Search Trends", "author": "Charlie", "price": 34.50 })),
    ];
    let mut operations = Vec::new();
    for (id, body) in &new_books {
        operations.push(BulkOperation::index(DocId(*id), index.schema().fields_from_json(body)?));
    }
    let response = registry.bulk(INDEX, operations)?;
    for failed in response.failed() {
        println!("  bulk item {} failed: {:?}", failed.id, failed.error());
    }
    println!("Bulk documents indexed.");

    let results = registry.search(INDEX, &request)?;
    println!("\nSearch results after changes:");
    print_hits(&results);

    let stats = registry.stats(INDEX)?;
    println!("\n{} documents, {} terms", stats.doc_count, stats.term_count);

    println!("\nDemo completed successfully!");
    Ok(())
}

fn print_hits(results: &SearchResults) {
    for hit in &results.hits {
        let title = hit.document.get_field("title").and_then(|v| v.as_str()).unwrap_or("?");
        let price = hit.document.get_field("price").and_then(|v| v.as_f64()).unwrap_or(0.0);
        println!("- {} ({})", title, price);
    }
}
