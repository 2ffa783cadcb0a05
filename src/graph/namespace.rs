//! Namespace constants, vocabulary helpers, and prefix management
//!
//! Prefix handling is only used for compact notation in the triple dump;
//! the engine itself always works with fully qualified identifiers.

use super::types::Iri;
use rustc_hash::FxHashMap;
use thiserror::Error;

/// RDF syntax namespace
pub const RDF: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";
/// RDF Schema namespace
pub const RDFS: &str = "http://www.w3.org/2000/01/rdf-schema#";
/// OWL namespace
pub const OWL: &str = "http://www.w3.org/2002/07/owl#";
/// XML Schema datatypes namespace
pub const XSD: &str = "http://www.w3.org/2001/XMLSchema#";
/// Sales domain namespace
pub const SALES: &str = "http://example.org/sales#";

/// Identifier in the sales domain namespace
pub fn sales(local: &str) -> Iri {
    Iri::new(SALES, local)
}

/// Well-known vocabulary identifiers used by the schema and loader
pub mod vocab {
    use super::{Iri, OWL, RDF, RDFS};

    pub fn rdf_type() -> Iri {
        Iri::new(RDF, "type")
    }

    pub fn rdfs_label() -> Iri {
        Iri::new(RDFS, "label")
    }

    pub fn rdfs_comment() -> Iri {
        Iri::new(RDFS, "comment")
    }

    pub fn rdfs_sub_class_of() -> Iri {
        Iri::new(RDFS, "subClassOf")
    }

    pub fn rdfs_domain() -> Iri {
        Iri::new(RDFS, "domain")
    }

    pub fn rdfs_range() -> Iri {
        Iri::new(RDFS, "range")
    }

    pub fn owl_class() -> Iri {
        Iri::new(OWL, "Class")
    }

    pub fn owl_object_property() -> Iri {
        Iri::new(OWL, "ObjectProperty")
    }

    pub fn owl_datatype_property() -> Iri {
        Iri::new(OWL, "DatatypeProperty")
    }

    pub fn owl_functional_property() -> Iri {
        Iri::new(OWL, "FunctionalProperty")
    }

    pub fn owl_inverse_of() -> Iri {
        Iri::new(OWL, "inverseOf")
    }
}

/// Prefix errors
#[derive(Error, Debug)]
pub enum PrefixError {
    /// Unknown prefix
    #[error("Unknown prefix: {0}")]
    UnknownPrefix(String),

    /// Not a compact IRI
    #[error("Not a compact IRI: {0}")]
    NotCompact(String),
}

pub type PrefixResult<T> = Result<T, PrefixError>;

/// Namespace manager for compact `prefix:local` notation
pub struct NamespaceManager {
    prefixes: FxHashMap<String, String>,
}

impl NamespaceManager {
    /// Create a manager preloaded with the prefixes this engine emits
    pub fn new() -> Self {
        let mut mgr = Self {
            prefixes: FxHashMap::default(),
        };

        mgr.add_prefix("rdf", RDF);
        mgr.add_prefix("rdfs", RDFS);
        mgr.add_prefix("owl", OWL);
        mgr.add_prefix("xsd", XSD);
        mgr.add_prefix("sales", SALES);

        mgr
    }

    /// Register a prefix
    pub fn add_prefix(&mut self, prefix: impl Into<String>, iri: impl Into<String>) {
        self.prefixes.insert(prefix.into(), iri.into());
    }

    /// Expand a compact IRI (`prefix:local`) to a full identifier
    pub fn expand(&self, compact: &str) -> PrefixResult<Iri> {
        let Some(pos) = compact.find(':') else {
            return Err(PrefixError::NotCompact(compact.to_string()));
        };
        let prefix = &compact[..pos];
        let local = &compact[pos + 1..];
        let iri = self
            .prefixes
            .get(prefix)
            .ok_or_else(|| PrefixError::UnknownPrefix(prefix.to_string()))?;
        Ok(Iri::new(iri, local))
    }

    /// Compact a full identifier using the longest matching namespace
    pub fn compact(&self, iri: &Iri) -> Option<String> {
        let mut best: Option<(&str, &str)> = None;
        for (prefix, namespace) in &self.prefixes {
            if iri.as_str().starts_with(namespace.as_str()) {
                match best {
                    Some((_, ns)) if ns.len() >= namespace.len() => {}
                    _ => best = Some((prefix, namespace)),
                }
            }
        }
        best.map(|(prefix, namespace)| {
            format!("{}:{}", prefix, &iri.as_str()[namespace.len()..])
        })
    }
}

impl Default for NamespaceManager {
    fn default() -> Self {
        Self::new()
    }
}
