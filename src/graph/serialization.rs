//! Stable textual triple dump
//!
//! One triple per line in namespace-qualified notation, sorted
//! lexicographically so the dump is independent of insertion order.

use super::namespace::NamespaceManager;
use super::store::TripleStore;
use super::types::{Iri, Literal, Term, Triple};

/// Serialize every triple in the store, one line each, sorted
pub fn serialize_triples(store: &TripleStore) -> String {
    let namespaces = NamespaceManager::new();
    let mut lines: Vec<String> = store
        .iter()
        .map(|t| format_triple(t, &namespaces))
        .collect();
    lines.sort_unstable();

    let mut out = lines.join("\n");
    if !out.is_empty() {
        out.push('\n');
    }
    out
}

fn format_triple(triple: &Triple, namespaces: &NamespaceManager) -> String {
    format!(
        "{} {} {} .",
        format_iri(&triple.subject, namespaces),
        format_iri(&triple.predicate, namespaces),
        format_term(&triple.object, namespaces)
    )
}

fn format_iri(iri: &Iri, namespaces: &NamespaceManager) -> String {
    namespaces
        .compact(iri)
        .unwrap_or_else(|| format!("<{}>", iri.as_str()))
}

fn format_term(term: &Term, namespaces: &NamespaceManager) -> String {
    match term {
        Term::Iri(iri) => format_iri(iri, namespaces),
        Term::Literal(Literal::String(s)) => {
            // Backslashes first, so escapes introduced for quotes survive
            let escaped = s.replace('\\', "\\\\").replace('"', "\\\"");
            format!("\"{escaped}\"")
        }
        Term::Literal(Literal::Integer(i)) => i.to_string(),
        Term::Literal(Literal::Decimal(d)) => d.to_string(),
        Term::Literal(Literal::Date(d)) => format!("\"{d}\"^^xsd:date"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::namespace::{sales, vocab};

    #[test]
    fn test_dump_is_sorted_and_qualified() {
        let mut store = TripleStore::new();
        store.insert(Triple::new(
            sales("S001"),
            sales("quantity"),
            Literal::Integer(2),
        ));
        store.insert(Triple::new(sales("S001"), vocab::rdf_type(), sales("Sale")));

        let dump = serialize_triples(&store);
        assert_eq!(
            dump,
            "sales:S001 rdf:type sales:Sale .\nsales:S001 sales:quantity 2 .\n"
        );
    }

    #[test]
    fn test_dump_independent_of_insertion_order() {
        let a = Triple::new(sales("S001"), sales("status"), Literal::from("Completed"));
        let b = Triple::new(sales("S001"), sales("netRevenue"), Literal::Decimal(99.5));

        let mut first = TripleStore::new();
        first.insert(a.clone());
        first.insert(b.clone());

        let mut second = TripleStore::new();
        second.insert(b);
        second.insert(a);

        assert_eq!(serialize_triples(&first), serialize_triples(&second));
    }

    #[test]
    fn test_empty_store_dump() {
        assert_eq!(serialize_triples(&TripleStore::new()), "");
    }

    #[test]
    fn test_string_literal_escaping() {
        let mut store = TripleStore::new();
        store.insert(Triple::new(
            sales("C001"),
            sales("customerName"),
            Literal::from(r#"Back\slash "quoted""#),
        ));

        let dump = serialize_triples(&store);
        assert_eq!(
            dump,
            "sales:C001 sales:customerName \"Back\\\\slash \\\"quoted\\\"\" .\n"
        );
    }
}
