//! Term and triple definitions
//!
//! The atomic fact unit is the [`Triple`]: subject and predicate are always
//! identifiers ([`Iri`]), the object is a [`Term`] (identifier or literal).

use chrono::NaiveDate;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Namespace-qualified identifier for a class, property, or entity instance.
///
/// Two identifiers are equal iff their full qualified strings are equal.
/// Immutable after creation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Iri(String);

impl Iri {
    /// Create an identifier from a namespace and a local name
    pub fn new(namespace: &str, local: &str) -> Self {
        Self(format!("{namespace}{local}"))
    }

    /// Create an identifier from an already-qualified string
    pub fn from_full(iri: impl Into<String>) -> Self {
        Self(iri.into())
    }

    /// Get the full qualified string
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Get the local part (after the last `#` or `/`)
    pub fn local_name(&self) -> &str {
        match self.0.rfind(['#', '/']) {
            Some(pos) => &self.0[pos + 1..],
            None => &self.0,
        }
    }
}

impl fmt::Display for Iri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}>", self.0)
    }
}

/// Scalar literal value with an explicit type tag.
///
/// The tag drives ordering and aggregation semantics; values of different
/// variants are never equal. Literals appear only in object position.
#[derive(Debug, Clone)]
pub enum Literal {
    /// Plain string
    String(String),
    /// Integer (xsd:integer)
    Integer(i64),
    /// Decimal, stored as f64 (xsd:decimal)
    Decimal(f64),
    /// Calendar date (xsd:date)
    Date(NaiveDate),
}

impl Literal {
    /// Numeric view, for arithmetic and numeric comparison
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Literal::Integer(i) => Some(*i as f64),
            Literal::Decimal(d) => Some(*d),
            _ => None,
        }
    }

    /// Check whether this literal carries a numeric tag
    pub fn is_numeric(&self) -> bool {
        matches!(self, Literal::Integer(_) | Literal::Decimal(_))
    }

    /// Lexical form without quoting, used for string comparison
    pub fn lexical_form(&self) -> String {
        match self {
            Literal::String(s) => s.clone(),
            Literal::Integer(i) => i.to_string(),
            Literal::Decimal(d) => d.to_string(),
            Literal::Date(d) => d.to_string(),
        }
    }

    /// Compare two literals honoring their type tags: numeric when both
    /// sides are numeric, chronological for dates, else lexical.
    pub fn compare(&self, other: &Literal) -> Ordering {
        match (self, other) {
            (a, b) if a.is_numeric() && b.is_numeric() => {
                // is_numeric guarantees as_f64 succeeds
                let x = a.as_f64().unwrap_or(f64::NAN);
                let y = b.as_f64().unwrap_or(f64::NAN);
                x.total_cmp(&y)
            }
            (Literal::Date(a), Literal::Date(b)) => a.cmp(b),
            (a, b) => a.lexical_form().cmp(&b.lexical_form()),
        }
    }
}

// Decimal compares and hashes by bit pattern so literals can live in hash
// sets; numeric cross-variant equality is a query concern, not term equality.
impl PartialEq for Literal {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Literal::String(a), Literal::String(b)) => a == b,
            (Literal::Integer(a), Literal::Integer(b)) => a == b,
            (Literal::Decimal(a), Literal::Decimal(b)) => a.to_bits() == b.to_bits(),
            (Literal::Date(a), Literal::Date(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Literal {}

impl Hash for Literal {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            Literal::String(s) => {
                0u8.hash(state);
                s.hash(state);
            }
            Literal::Integer(i) => {
                1u8.hash(state);
                i.hash(state);
            }
            Literal::Decimal(d) => {
                2u8.hash(state);
                d.to_bits().hash(state);
            }
            Literal::Date(d) => {
                3u8.hash(state);
                d.hash(state);
            }
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::String(s) => write!(f, "\"{s}\""),
            Literal::Integer(i) => write!(f, "{i}"),
            Literal::Decimal(d) => write!(f, "{d}"),
            Literal::Date(d) => write!(f, "\"{d}\"^^xsd:date"),
        }
    }
}

impl From<&str> for Literal {
    fn from(s: &str) -> Self {
        Literal::String(s.to_string())
    }
}

impl From<String> for Literal {
    fn from(s: String) -> Self {
        Literal::String(s)
    }
}

impl From<i64> for Literal {
    fn from(i: i64) -> Self {
        Literal::Integer(i)
    }
}

impl From<f64> for Literal {
    fn from(d: f64) -> Self {
        Literal::Decimal(d)
    }
}

impl From<NaiveDate> for Literal {
    fn from(d: NaiveDate) -> Self {
        Literal::Date(d)
    }
}

/// Object position of a triple: a reference to another node or a literal
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Term {
    /// Reference to another node
    Iri(Iri),
    /// Scalar value
    Literal(Literal),
}

impl Term {
    /// Get as identifier if this is a node reference
    pub fn as_iri(&self) -> Option<&Iri> {
        match self {
            Term::Iri(iri) => Some(iri),
            _ => None,
        }
    }

    /// Get as literal if this is a scalar value
    pub fn as_literal(&self) -> Option<&Literal> {
        match self {
            Term::Literal(lit) => Some(lit),
            _ => None,
        }
    }

    /// Check if this is a literal
    pub fn is_literal(&self) -> bool {
        matches!(self, Term::Literal(_))
    }

    /// Compare two terms: literals by [`Literal::compare`], identifiers by
    /// their qualified strings, mixed by lexical form.
    pub fn compare(&self, other: &Term) -> Ordering {
        match (self, other) {
            (Term::Literal(a), Term::Literal(b)) => a.compare(b),
            (Term::Iri(a), Term::Iri(b)) => a.as_str().cmp(b.as_str()),
            (Term::Iri(a), Term::Literal(b)) => a.as_str().cmp(&b.lexical_form().as_str()),
            (Term::Literal(a), Term::Iri(b)) => a.lexical_form().as_str().cmp(b.as_str()),
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Iri(iri) => write!(f, "{iri}"),
            Term::Literal(lit) => write!(f, "{lit}"),
        }
    }
}

impl From<Iri> for Term {
    fn from(iri: Iri) -> Self {
        Term::Iri(iri)
    }
}

impl From<Literal> for Term {
    fn from(lit: Literal) -> Self {
        Term::Literal(lit)
    }
}

/// Subject-predicate-object statement
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Triple {
    /// Subject (always an identifier)
    pub subject: Iri,
    /// Predicate (always an identifier)
    pub predicate: Iri,
    /// Object (identifier or literal)
    pub object: Term,
}

impl Triple {
    /// Create a new triple
    pub fn new(subject: Iri, predicate: Iri, object: impl Into<Term>) -> Self {
        Self {
            subject,
            predicate,
            object: object.into(),
        }
    }
}

impl fmt::Display for Triple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} .", self.subject, self.predicate, self.object)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_iri_equality_and_local_name() {
        let a = Iri::new("http://example.org/sales#", "Acme");
        let b = Iri::from_full("http://example.org/sales#Acme");
        assert_eq!(a, b);
        assert_eq!(a.local_name(), "Acme");
        assert_eq!(a.to_string(), "<http://example.org/sales#Acme>");
    }

    #[test]
    fn test_literal_equality_requires_matching_tag() {
        assert_ne!(Literal::Integer(5), Literal::Decimal(5.0));
        assert_ne!(Literal::String("5".into()), Literal::Integer(5));
        assert_eq!(Literal::Decimal(2.5), Literal::Decimal(2.5));
    }

    #[test]
    fn test_literal_numeric_comparison_crosses_tags() {
        assert_eq!(
            Literal::Integer(5).compare(&Literal::Decimal(5.0)),
            Ordering::Equal
        );
        assert_eq!(
            Literal::Decimal(1.5).compare(&Literal::Integer(2)),
            Ordering::Less
        );
    }

    #[test]
    fn test_literal_date_comparison() {
        let early = Literal::Date(NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
        let late = Literal::Date(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
        assert_eq!(early.compare(&late), Ordering::Less);
    }

    #[test]
    fn test_literal_lexical_fallback() {
        // String vs integer falls back to lexical comparison
        assert_eq!(
            Literal::String("10".into()).compare(&Literal::Integer(9)),
            Ordering::Less
        );
    }

    #[test]
    fn test_triple_display() {
        let t = Triple::new(
            Iri::new("http://example.org/sales#", "S001"),
            Iri::new("http://example.org/sales#", "quantity"),
            Literal::Integer(3),
        );
        assert_eq!(
            t.to_string(),
            "<http://example.org/sales#S001> <http://example.org/sales#quantity> 3 ."
        );
    }
}
