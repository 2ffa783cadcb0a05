//! Graph-pattern query engine
//!
//! Evaluates a basic graph pattern (conjunctive triple patterns joined by
//! shared variables) against a [`crate::graph::TripleStore`], with
//! filtering, grouping, aggregation, post-aggregation having, ordering, and
//! limiting. Evaluation is read-only; the engine never mutates the store.

mod ast;
mod executor;

use thiserror::Error;

pub use ast::{
    var, Aggregate, CompareOp, Comparison, OrderBy, SelectExpr, SelectItem, SelectQuery,
    SelectQueryBuilder, TermPattern, TriplePattern,
};
pub use executor::{evaluate, QuerySolution};

/// Query construction and evaluation errors
#[derive(Error, Debug)]
pub enum QueryError {
    /// A projection, filter, grouping, having, or order-by clause references
    /// a variable or alias never bound by any triple pattern
    #[error("variable '?{0}' is not bound by any triple pattern")]
    UnboundVariable(String),

    /// A non-aggregated projected variable is missing from the grouping key
    /// while aggregates are present
    #[error("variable '?{0}' must be part of the grouping key or aggregated")]
    UngroupedVariable(String),

    /// SUM/AVG requested over a variable whose bound values are not all
    /// numeric literals
    #[error("aggregate over non-numeric binding of variable '?{0}'")]
    TypeMismatch(String),
}

pub type QueryResult<T> = Result<T, QueryError>;
