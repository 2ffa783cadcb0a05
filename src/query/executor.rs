//! Binding-join evaluation
//!
//! Patterns are evaluated left to right: the first pattern seeds the
//! binding set, every later pattern substitutes already-bound variables and
//! extends each tuple with the store's matches (inner-join semantics — a
//! tuple with no matches is dropped). Groups are enumerated in order of
//! first occurrence, which also breaks ordering ties, so results are
//! reproducible across runs on identical input.

use super::ast::{Aggregate, CompareOp, Comparison, SelectExpr, SelectQuery, TermPattern};
use super::{QueryError, QueryResult};
use crate::graph::{Iri, Literal, Term, Triple, TripleStore};
use indexmap::IndexMap;
use rustc_hash::FxHashMap;
use std::cmp::Ordering;

/// Variable-to-value assignment produced during evaluation
type Binding = FxHashMap<String, Term>;

/// One output record: projected values keyed by alias, in projection order
#[derive(Debug, Clone, PartialEq)]
pub struct QuerySolution {
    values: IndexMap<String, Term>,
}

impl QuerySolution {
    /// Get a projected value by alias
    pub fn get(&self, alias: &str) -> Option<&Term> {
        self.values.get(alias)
    }

    /// Projection aliases in projection order
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// Textual view: string literals verbatim, other literals by lexical
    /// form, identifiers by local name
    pub fn text(&self, alias: &str) -> Option<String> {
        match self.get(alias)? {
            Term::Literal(Literal::String(s)) => Some(s.clone()),
            Term::Literal(other) => Some(other.lexical_form()),
            Term::Iri(iri) => Some(iri.local_name().to_string()),
        }
    }

    /// Numeric view of a literal value
    pub fn number(&self, alias: &str) -> Option<f64> {
        self.get(alias)?.as_literal()?.as_f64()
    }

    /// Integer view of a literal value
    pub fn integer(&self, alias: &str) -> Option<i64> {
        match self.get(alias)? {
            Term::Literal(Literal::Integer(i)) => Some(*i),
            _ => None,
        }
    }
}

/// Evaluate a query against a store, producing one solution per surviving
/// group
pub fn evaluate(store: &TripleStore, query: &SelectQuery) -> QueryResult<Vec<QuerySolution>> {
    // Steps 1-2: seed from the first pattern, then join-extend per pattern
    let mut bindings: Vec<Binding> = vec![Binding::default()];
    for pattern in &query.patterns {
        let mut extended = Vec::new();
        for binding in &bindings {
            extend_binding(store, pattern, binding, &mut extended);
        }
        bindings = extended;
        if bindings.is_empty() {
            break;
        }
    }

    // Step 3: filter fully bound tuples
    for filter in &query.filters {
        bindings.retain(|binding| {
            binding
                .get(&filter.operand)
                .is_some_and(|value| check(value, filter))
        });
    }

    // Step 4: partition into groups, keyed by grouping-variable values,
    // enumerated in first-occurrence order
    let mut groups: IndexMap<Vec<Term>, Vec<Binding>> = IndexMap::new();
    for binding in bindings {
        let mut key = Vec::with_capacity(query.group_by.len());
        for group_var in &query.group_by {
            match binding.get(group_var) {
                Some(value) => key.push(value.clone()),
                // Construction-time validation makes this unreachable
                None => return Err(QueryError::UnboundVariable(group_var.clone())),
            }
        }
        groups.entry(key).or_default().push(binding);
    }

    // Step 5: project grouping values and compute aggregates per group
    let mut rows = Vec::with_capacity(groups.len());
    for members in groups.values() {
        let mut values = IndexMap::new();
        for item in &query.items {
            let value = match &item.expr {
                SelectExpr::Variable(variable) => match members[0].get(variable) {
                    Some(term) => term.clone(),
                    None => return Err(QueryError::UnboundVariable(variable.clone())),
                },
                SelectExpr::Aggregate { func, var } => {
                    Term::Literal(aggregate(*func, var, members)?)
                }
            };
            values.insert(item.alias.clone(), value);
        }
        rows.push(QuerySolution { values });
    }

    // Step 6: having applies to aggregate results, after grouping
    for having in &query.having {
        rows.retain(|row| {
            row.get(&having.operand)
                .is_some_and(|value| check(value, having))
        });
    }

    // Step 7: stable sort; ties keep group enumeration order
    if let Some(order) = &query.order_by {
        rows.sort_by(|a, b| {
            let ordering = match (a.get(&order.key), b.get(&order.key)) {
                (Some(x), Some(y)) => x.compare(y),
                (Some(_), None) => Ordering::Greater,
                (None, Some(_)) => Ordering::Less,
                (None, None) => Ordering::Equal,
            };
            if order.descending {
                ordering.reverse()
            } else {
                ordering
            }
        });
    }

    // Step 8: cap returned groups
    if let Some(limit) = query.limit {
        rows.truncate(limit);
    }

    tracing::debug!(
        patterns = query.patterns.len(),
        rows = rows.len(),
        "query evaluated"
    );

    Ok(rows)
}

/// Slot resolution against a partial binding
enum Slot<'a, T> {
    /// Unconstrained, matches anything
    Free,
    /// Constrained to one value
    Bound(&'a T),
    /// Cannot match any triple (e.g. a literal in subject position)
    Incompatible,
}

fn iri_slot<'a>(slot: &'a TermPattern, binding: &'a Binding) -> Slot<'a, Iri> {
    match slot {
        TermPattern::Const(Term::Iri(iri)) => Slot::Bound(iri),
        TermPattern::Const(Term::Literal(_)) => Slot::Incompatible,
        TermPattern::Var(name) => match binding.get(name) {
            Some(Term::Iri(iri)) => Slot::Bound(iri),
            Some(Term::Literal(_)) => Slot::Incompatible,
            None => Slot::Free,
        },
    }
}

fn term_slot<'a>(slot: &'a TermPattern, binding: &'a Binding) -> Slot<'a, Term> {
    match slot {
        TermPattern::Const(term) => Slot::Bound(term),
        TermPattern::Var(name) => match binding.get(name) {
            Some(term) => Slot::Bound(term),
            None => Slot::Free,
        },
    }
}

fn extend_binding(
    store: &TripleStore,
    pattern: &super::ast::TriplePattern,
    binding: &Binding,
    out: &mut Vec<Binding>,
) {
    let subject = match iri_slot(&pattern.subject, binding) {
        Slot::Bound(iri) => Some(iri),
        Slot::Free => None,
        Slot::Incompatible => return,
    };
    let predicate = match iri_slot(&pattern.predicate, binding) {
        Slot::Bound(iri) => Some(iri),
        Slot::Free => None,
        Slot::Incompatible => return,
    };
    let object = match term_slot(&pattern.object, binding) {
        Slot::Bound(term) => Some(term),
        Slot::Free => None,
        Slot::Incompatible => return,
    };

    for triple in store.matching(subject, predicate, object) {
        if let Some(next) = bind_triple(binding, pattern, triple) {
            out.push(next);
        }
    }
}

fn bind_triple(
    binding: &Binding,
    pattern: &super::ast::TriplePattern,
    triple: &Triple,
) -> Option<Binding> {
    let mut next = binding.clone();
    let ok = bind_var(&mut next, &pattern.subject, || {
        Term::Iri(triple.subject.clone())
    }) && bind_var(&mut next, &pattern.predicate, || {
        Term::Iri(triple.predicate.clone())
    }) && bind_var(&mut next, &pattern.object, || triple.object.clone());
    ok.then_some(next)
}

// A variable may occur twice in one pattern; the second occurrence must
// agree with the value bound by the first.
fn bind_var(binding: &mut Binding, slot: &TermPattern, value: impl FnOnce() -> Term) -> bool {
    match slot {
        TermPattern::Const(_) => true,
        TermPattern::Var(name) => {
            let value = value();
            match binding.get(name) {
                Some(existing) => *existing == value,
                None => {
                    binding.insert(name.clone(), value);
                    true
                }
            }
        }
    }
}

fn check(value: &Term, comparison: &Comparison) -> bool {
    let ordering = match value {
        Term::Literal(lit) => lit.compare(&comparison.value),
        Term::Iri(iri) => {
            let lex = comparison.value.lexical_form();
            iri.as_str().cmp(lex.as_str())
        }
    };
    match comparison.op {
        CompareOp::Eq => ordering == Ordering::Equal,
        CompareOp::Ne => ordering != Ordering::Equal,
        CompareOp::Gt => ordering == Ordering::Greater,
        CompareOp::Lt => ordering == Ordering::Less,
    }
}

fn aggregate(func: Aggregate, var: &str, members: &[Binding]) -> QueryResult<Literal> {
    match func {
        Aggregate::Count => Ok(Literal::Integer(members.len() as i64)),
        Aggregate::Sum | Aggregate::Avg => {
            let mut sum = 0.0;
            for member in members {
                let value = member
                    .get(var)
                    .and_then(Term::as_literal)
                    .and_then(Literal::as_f64)
                    .ok_or_else(|| QueryError::TypeMismatch(var.to_string()))?;
                sum += value;
            }
            if func == Aggregate::Sum {
                Ok(Literal::Decimal(sum))
            } else {
                // Groups hold at least one tuple by construction
                Ok(Literal::Decimal(sum / members.len() as f64))
            }
        }
    }
}
