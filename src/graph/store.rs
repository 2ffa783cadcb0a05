//! In-memory triple store with index-backed pattern lookup
//!
//! The store is an append-only set: duplicate insertion is a no-op and no
//! triple is ever removed within a store's lifetime. A fresh analysis run
//! builds a fresh store. Iteration order is insertion order, which makes
//! query results reproducible across runs on identical input.

use super::types::{Iri, Term, Triple};
use indexmap::IndexSet;
use rustc_hash::{FxBuildHasher, FxHashMap};

/// Triple store with three access-path indexes:
///
/// - subject index: all triples with a given subject
/// - predicate index: all triples with a given predicate
/// - (predicate, object) index: all triples with a given predicate-object pair
///
/// These cover the access patterns of binding-join evaluation, keeping
/// pattern matching sub-linear in total triple count. Positions in the
/// insertion-ordered set stay valid because the store is append-only.
#[derive(Debug, Default, Clone)]
pub struct TripleStore {
    triples: IndexSet<Triple, FxBuildHasher>,
    by_subject: FxHashMap<Iri, Vec<usize>>,
    by_predicate: FxHashMap<Iri, Vec<usize>>,
    by_predicate_object: FxHashMap<(Iri, Term), Vec<usize>>,
}

impl TripleStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a triple. Returns `true` if the triple was new; re-inserting
    /// an existing triple leaves the store unchanged.
    pub fn insert(&mut self, triple: Triple) -> bool {
        if self.triples.contains(&triple) {
            return false;
        }

        let position = self.triples.len();
        self.by_subject
            .entry(triple.subject.clone())
            .or_default()
            .push(position);
        self.by_predicate
            .entry(triple.predicate.clone())
            .or_default()
            .push(position);
        self.by_predicate_object
            .entry((triple.predicate.clone(), triple.object.clone()))
            .or_default()
            .push(position);

        self.triples.insert(triple);
        true
    }

    /// Insert a batch of triples
    pub fn bulk_insert(&mut self, triples: impl IntoIterator<Item = Triple>) {
        for triple in triples {
            self.insert(triple);
        }
    }

    /// Total number of distinct triples
    pub fn len(&self) -> usize {
        self.triples.len()
    }

    /// Check if the store is empty
    pub fn is_empty(&self) -> bool {
        self.triples.is_empty()
    }

    /// Check if a triple exists in the store
    pub fn contains(&self, triple: &Triple) -> bool {
        self.triples.contains(triple)
    }

    /// Iterate all triples in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &Triple> {
        self.triples.iter()
    }

    /// Lazily yield triples whose bound fields equal the given values;
    /// `None` fields act as wildcards. Dispatches to the most selective
    /// index available for the bound fields.
    pub fn matching<'a>(
        &'a self,
        subject: Option<&'a Iri>,
        predicate: Option<&'a Iri>,
        object: Option<&'a Term>,
    ) -> Box<dyn Iterator<Item = &'a Triple> + 'a> {
        let candidates: Box<dyn Iterator<Item = &'a Triple> + 'a> =
            match (subject, predicate, object) {
                (None, Some(p), Some(o)) => {
                    self.positions(self.by_predicate_object.get(&(p.clone(), o.clone())))
                }
                (Some(s), _, _) => self.positions(self.by_subject.get(s)),
                (None, Some(p), None) => self.positions(self.by_predicate.get(p)),
                _ => Box::new(self.triples.iter()),
            };

        Box::new(candidates.filter(move |t| {
            subject.map_or(true, |s| &t.subject == s)
                && predicate.map_or(true, |p| &t.predicate == p)
                && object.map_or(true, |o| &t.object == o)
        }))
    }

    fn positions<'a>(
        &'a self,
        positions: Option<&'a Vec<usize>>,
    ) -> Box<dyn Iterator<Item = &'a Triple> + 'a> {
        Box::new(
            positions
                .into_iter()
                .flatten()
                .filter_map(|&i| self.triples.get_index(i)),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::namespace::{sales, vocab};
    use crate::graph::types::Literal;

    fn sale_triples() -> Vec<Triple> {
        vec![
            Triple::new(sales("S001"), vocab::rdf_type(), sales("Sale")),
            Triple::new(sales("S001"), sales("soldTo"), sales("C001")),
            Triple::new(sales("S001"), sales("quantity"), Literal::Integer(2)),
            Triple::new(sales("S002"), vocab::rdf_type(), sales("Sale")),
            Triple::new(sales("S002"), sales("soldTo"), sales("C002")),
        ]
    }

    #[test]
    fn test_insert_is_idempotent() {
        let mut store = TripleStore::new();
        let triple = Triple::new(sales("S001"), sales("quantity"), Literal::Integer(2));

        assert!(store.insert(triple.clone()));
        assert_eq!(store.len(), 1);
        assert!(!store.insert(triple.clone()));
        assert_eq!(store.len(), 1);
        assert!(store.contains(&triple));
    }

    #[test]
    fn test_match_by_subject() {
        let mut store = TripleStore::new();
        store.bulk_insert(sale_triples());

        let subject = sales("S001");
        let results: Vec<_> = store.matching(Some(&subject), None, None).collect();
        assert_eq!(results.len(), 3);
        assert!(results.iter().all(|t| t.subject == subject));
    }

    #[test]
    fn test_match_by_predicate() {
        let mut store = TripleStore::new();
        store.bulk_insert(sale_triples());

        let predicate = sales("soldTo");
        let results: Vec<_> = store.matching(None, Some(&predicate), None).collect();
        assert_eq!(results.len(), 2);
    }

    #[test]
    fn test_match_by_predicate_object() {
        let mut store = TripleStore::new();
        store.bulk_insert(sale_triples());

        let predicate = vocab::rdf_type();
        let object = Term::Iri(sales("Sale"));
        let results: Vec<_> = store
            .matching(None, Some(&predicate), Some(&object))
            .collect();
        assert_eq!(results.len(), 2);
    }

    #[test]
    fn test_match_fully_bound_and_wildcard() {
        let mut store = TripleStore::new();
        store.bulk_insert(sale_triples());

        let s = sales("S001");
        let p = sales("soldTo");
        let o = Term::Iri(sales("C001"));
        assert_eq!(store.matching(Some(&s), Some(&p), Some(&o)).count(), 1);

        let wrong = Term::Iri(sales("C002"));
        assert_eq!(store.matching(Some(&s), Some(&p), Some(&wrong)).count(), 0);

        assert_eq!(store.matching(None, None, None).count(), 5);
    }

    #[test]
    fn test_iteration_order_is_insertion_order() {
        let mut store = TripleStore::new();
        let triples = sale_triples();
        store.bulk_insert(triples.clone());

        let seen: Vec<_> = store.iter().cloned().collect();
        assert_eq!(seen, triples);
    }
}
