//! Fact store: terms, triples, namespaces, indexing, and serialization
//!
//! The graph *is* the data — entity instances have no struct of their own,
//! they acquire attributes and relationships purely through triples in the
//! [`TripleStore`].

mod namespace;
mod serialization;
mod store;
mod types;

pub use namespace::{
    sales, vocab, NamespaceManager, PrefixError, PrefixResult, OWL, RDF, RDFS, SALES, XSD,
};
pub use serialization::serialize_triples;
pub use store::TripleStore;
pub use types::{Iri, Literal, Term, Triple};
