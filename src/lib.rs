pub mod core;
pub mod analysis;
pub mod schema;
pub mod index;
pub mod scoring;
pub mod search;
pub mod query;
pub mod writer;
pub mod parallel;

pub use crate::core::config::Config;
pub use crate::core::error::{Error, ErrorKind, Result};
pub use crate::core::registry::IndexRegistry;
pub use crate::core::types::{DocId, Document, FieldValue, Fields};
pub use crate::index::index::Index;
pub use crate::query::ast::{BoolQuery, MatchQuery, RangeQuery, SearchRequest};
pub use crate::query::parser::QueryParser;
pub use crate::query::types::{Operator, SortOrder};
pub use crate::schema::schema::{FieldType, Schema};
pub use crate::search::results::{SearchHit, SearchResults};
pub use crate::writer::batch::{BulkOperation, BulkResponse};
pub use crate::writer::index_writer::WriteResult;

/*
┌──────────────────────────────────── SIFTER ARCHITECTURE ───────────────────────────────────┐
│                                                                                             │
│  ┌───────────────────────────────────────────────────────────────────────────────────┐    │
│  │ struct IndexRegistry                                                               │    │
│  │ config: Config                                  // Shared by every index           │    │
│  │ indices: RwLock<HashMap<String, Arc<Index>>>    // Held only for lookups           │    │
│  └───────────────────────────────────────────────────────────────────────────────────┘    │
│                                        │                                                    │
│  ┌─────────────────────────────────────▼─────────────────────────────────────────────┐    │
│  │ struct Index                                                                       │    │
│  │ schema: Schema                 // Immutable mapping                                │    │
│  │ analyzers: AnalyzerRegistry    // Built from the mapping at creation               │    │
│  │ state: RwLock<IndexState>      // DocumentStore + InvertedIndex, changed together  │    │
│  └───────────────────────────────────────────────────────────────────────────────────┘    │
│              │ writer()                                         │ reader()               │
│  ┌───────────▼──────────────────┐                 ┌─────────────▼─────────────────┐      │
│  │ IndexWriter (write guard)    │                 │ IndexReader (read guard)      │      │
│  │ • index / update / delete    │                 │ • get_document                │      │
│  │ • BulkProcessor              │                 │ • QueryExecutor               │      │
│  │   └ ParallelIndexer (rayon)  │                 │   └ Scorer                    │      │
│  └──────────────────────────────┘                 └───────────────────────────────┘      │
│                                                                                             │
│  Text  ──► StandardTokenizer ──► LowercaseFilter ──► StopWordFilter ──► Vec<Token>         │
│  JSON  ──► Schema::from_json / QueryParser::parse / Schema::document_from_json             │
└─────────────────────────────────────────────────────────────────────────────────────────────┘
*/
