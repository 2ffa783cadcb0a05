//! Graphsight — semantic graph engine for sales analytics
//!
//! A schema (ontology) of typed entities and relationships, a triple-based
//! fact store populated from tabular records, and a pattern-matching query
//! engine that answers multi-entity aggregate questions over that store.
//!
//! # Architecture
//!
//! - [`schema`] — entity classes, class hierarchy, and typed properties,
//!   built once into an immutable [`schema::Schema`] value
//! - [`graph`] — the append-only [`graph::TripleStore`] with index-backed
//!   pattern lookup, plus the stable triple dump
//! - [`loader`] — deterministic conversion of tabular records into triples
//! - [`query`] — basic graph patterns with joins, filtering, grouping,
//!   aggregation (COUNT/SUM/AVG), having, ordering, and limiting
//! - [`insight`] — fixed catalogue of canned analytical queries producing
//!   structured rows for external consumers
//!
//! The engine is single-writer, many-reader: one bulk load phase, after
//! which the store is immutable and may be queried concurrently without
//! locking. A new analysis run constructs a new store.
//!
//! # Example
//!
//! ```rust
//! use graphsight::loader::{GraphLoader, SalesRecords};
//! use graphsight::schema::sales_schema;
//!
//! let schema = sales_schema().unwrap();
//! let store = GraphLoader::new(&schema)
//!     .load(&SalesRecords::default())
//!     .unwrap();
//!
//! // An empty snapshot still seeds the store with the ontology
//! assert_eq!(store.len(), schema.triples().len());
//! ```

#![warn(clippy::all)]

pub mod graph;
pub mod insight;
pub mod loader;
pub mod query;
pub mod schema;

// Re-export main types for convenience
pub use graph::{serialize_triples, Iri, Literal, NamespaceManager, Term, Triple, TripleStore};
pub use insight::InsightReport;
pub use loader::{GraphLoader, LoadError, LoadResult, SalesRecords};
pub use query::{
    evaluate, Aggregate, CompareOp, QueryError, QueryResult, QuerySolution, SelectQuery,
};
pub use schema::{sales_schema, Schema, SchemaBuilder, SchemaError, SchemaResult};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get version string
pub fn version() -> &'static str {
    VERSION
}
