//! Query representation: basic graph patterns with projection, aggregation,
//! grouping, filtering, ordering, and limiting
//!
//! Queries are built programmatically through [`SelectQuery::builder`]; only
//! a fixed family of query shapes is supported, there is no textual grammar.
//! Validation happens at construction: a variable referenced by a
//! projection, filter, grouping, having, or ordering clause must be bound by
//! some triple pattern, and a projected non-aggregated variable must be part
//! of the grouping key whenever aggregates are present.

use super::{QueryError, QueryResult};
use crate::graph::{Iri, Literal, Term};
use rustc_hash::FxHashSet;

/// One slot of a triple pattern: a named variable or a constant term
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TermPattern {
    /// Named variable, shared names join across patterns
    Var(String),
    /// Bound constant
    Const(Term),
}

impl TermPattern {
    /// Variable name if this slot is a variable
    pub fn var_name(&self) -> Option<&str> {
        match self {
            TermPattern::Var(name) => Some(name),
            TermPattern::Const(_) => None,
        }
    }
}

/// Shorthand for a variable slot
pub fn var(name: &str) -> TermPattern {
    TermPattern::Var(name.to_string())
}

impl From<Iri> for TermPattern {
    fn from(iri: Iri) -> Self {
        TermPattern::Const(Term::Iri(iri))
    }
}

impl From<Literal> for TermPattern {
    fn from(lit: Literal) -> Self {
        TermPattern::Const(Term::Literal(lit))
    }
}

impl From<Term> for TermPattern {
    fn from(term: Term) -> Self {
        TermPattern::Const(term)
    }
}

/// Triple pattern: three slots, each bound or variable
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriplePattern {
    pub subject: TermPattern,
    pub predicate: TermPattern,
    pub object: TermPattern,
}

impl TriplePattern {
    /// Create a pattern from slot values
    pub fn new(
        subject: impl Into<TermPattern>,
        predicate: impl Into<TermPattern>,
        object: impl Into<TermPattern>,
    ) -> Self {
        Self {
            subject: subject.into(),
            predicate: predicate.into(),
            object: object.into(),
        }
    }

    /// Variable names bound by this pattern
    pub fn variables(&self) -> impl Iterator<Item = &str> {
        [&self.subject, &self.predicate, &self.object]
            .into_iter()
            .filter_map(TermPattern::var_name)
    }
}

/// Comparison operator for filter and having clauses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    Ne,
    Gt,
    Lt,
}

/// A single comparison of a bound value against a constant literal.
/// Declared type tags are honored: numeric comparison when both sides are
/// numeric, chronological for dates, else lexical.
#[derive(Debug, Clone, PartialEq)]
pub struct Comparison {
    /// Variable (filter) or projection alias (having)
    pub operand: String,
    pub op: CompareOp,
    pub value: Literal,
}

/// Aggregate function over a variable's bound values across a group
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Aggregate {
    Count,
    Sum,
    Avg,
}

/// Projected expression: a plain variable or an aggregate over one
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectExpr {
    Variable(String),
    Aggregate { func: Aggregate, var: String },
}

/// One projection item with its output alias
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectItem {
    pub expr: SelectExpr,
    pub alias: String,
}

/// Ordering key: a projection alias, ascending or descending
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    pub key: String,
    pub descending: bool,
}

/// A validated query, ready for evaluation
#[derive(Debug, Clone)]
pub struct SelectQuery {
    pub(crate) patterns: Vec<TriplePattern>,
    pub(crate) filters: Vec<Comparison>,
    pub(crate) items: Vec<SelectItem>,
    pub(crate) group_by: Vec<String>,
    pub(crate) having: Vec<Comparison>,
    pub(crate) order_by: Option<OrderBy>,
    pub(crate) limit: Option<usize>,
}

impl SelectQuery {
    /// Start building a query
    pub fn builder() -> SelectQueryBuilder {
        SelectQueryBuilder::default()
    }
}

/// Fluent builder for [`SelectQuery`]
#[derive(Debug, Default)]
pub struct SelectQueryBuilder {
    patterns: Vec<TriplePattern>,
    filters: Vec<Comparison>,
    items: Vec<SelectItem>,
    group_by: Vec<String>,
    having: Vec<Comparison>,
    order_by: Option<OrderBy>,
    limit: Option<usize>,
}

impl SelectQueryBuilder {
    /// Add a triple pattern to the basic graph pattern
    pub fn pattern(
        mut self,
        subject: impl Into<TermPattern>,
        predicate: impl Into<TermPattern>,
        object: impl Into<TermPattern>,
    ) -> Self {
        self.patterns.push(TriplePattern::new(subject, predicate, object));
        self
    }

    /// Add a filter comparison over a bound variable
    pub fn filter(mut self, variable: &str, op: CompareOp, value: impl Into<Literal>) -> Self {
        self.filters.push(Comparison {
            operand: variable.to_string(),
            op,
            value: value.into(),
        });
        self
    }

    /// Project a plain variable under its own name
    pub fn select_var(mut self, variable: &str) -> Self {
        self.items.push(SelectItem {
            expr: SelectExpr::Variable(variable.to_string()),
            alias: variable.to_string(),
        });
        self
    }

    /// Project an aggregate over a variable under an alias
    pub fn select_agg(mut self, func: Aggregate, variable: &str, alias: &str) -> Self {
        self.items.push(SelectItem {
            expr: SelectExpr::Aggregate {
                func,
                var: variable.to_string(),
            },
            alias: alias.to_string(),
        });
        self
    }

    /// Explicit grouping key; defaults to the non-aggregated projected
    /// variables when not given
    pub fn group_by(mut self, variables: &[&str]) -> Self {
        self.group_by = variables.iter().map(|v| v.to_string()).collect();
        self
    }

    /// Add a post-aggregation comparison over a projection alias
    pub fn having(mut self, alias: &str, op: CompareOp, value: impl Into<Literal>) -> Self {
        self.having.push(Comparison {
            operand: alias.to_string(),
            op,
            value: value.into(),
        });
        self
    }

    /// Order groups ascending by a projection alias
    pub fn order_by_asc(mut self, alias: &str) -> Self {
        self.order_by = Some(OrderBy {
            key: alias.to_string(),
            descending: false,
        });
        self
    }

    /// Order groups descending by a projection alias
    pub fn order_by_desc(mut self, alias: &str) -> Self {
        self.order_by = Some(OrderBy {
            key: alias.to_string(),
            descending: true,
        });
        self
    }

    /// Cap the number of returned groups
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Validate and freeze the query
    pub fn build(self) -> QueryResult<SelectQuery> {
        let bound: FxHashSet<&str> = self
            .patterns
            .iter()
            .flat_map(TriplePattern::variables)
            .collect();

        for item in &self.items {
            let referenced = match &item.expr {
                SelectExpr::Variable(v) => v,
                SelectExpr::Aggregate { var, .. } => var,
            };
            if !bound.contains(referenced.as_str()) {
                return Err(QueryError::UnboundVariable(referenced.clone()));
            }
        }
        for filter in &self.filters {
            if !bound.contains(filter.operand.as_str()) {
                return Err(QueryError::UnboundVariable(filter.operand.clone()));
            }
        }
        for group_var in &self.group_by {
            if !bound.contains(group_var.as_str()) {
                return Err(QueryError::UnboundVariable(group_var.clone()));
            }
        }

        // Non-aggregated projected variables implicitly form the grouping key
        let plain_vars: Vec<String> = self
            .items
            .iter()
            .filter_map(|item| match &item.expr {
                SelectExpr::Variable(v) => Some(v.clone()),
                SelectExpr::Aggregate { .. } => None,
            })
            .collect();
        let group_by = if self.group_by.is_empty() {
            plain_vars.clone()
        } else {
            self.group_by
        };

        let has_aggregates = self
            .items
            .iter()
            .any(|item| matches!(item.expr, SelectExpr::Aggregate { .. }));
        if has_aggregates {
            for plain in &plain_vars {
                if !group_by.contains(plain) {
                    return Err(QueryError::UngroupedVariable(plain.clone()));
                }
            }
        }

        let aliases: FxHashSet<&str> =
            self.items.iter().map(|item| item.alias.as_str()).collect();
        let aggregate_aliases: FxHashSet<&str> = self
            .items
            .iter()
            .filter(|item| matches!(item.expr, SelectExpr::Aggregate { .. }))
            .map(|item| item.alias.as_str())
            .collect();

        for having in &self.having {
            if !aggregate_aliases.contains(having.operand.as_str()) {
                return Err(QueryError::UnboundVariable(having.operand.clone()));
            }
        }
        if let Some(order) = &self.order_by {
            if !aliases.contains(order.key.as_str()) {
                return Err(QueryError::UnboundVariable(order.key.clone()));
            }
        }

        Ok(SelectQuery {
            patterns: self.patterns,
            filters: self.filters,
            items: self.items,
            group_by,
            having: self.having,
            order_by: self.order_by,
            limit: self.limit,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::sales;

    #[test]
    fn test_unbound_projection_rejected() {
        let err = SelectQuery::builder()
            .pattern(var("sale"), sales("soldTo"), var("customer"))
            .select_var("region")
            .build()
            .unwrap_err();
        assert!(matches!(err, QueryError::UnboundVariable(v) if v == "region"));
    }

    #[test]
    fn test_unbound_filter_rejected() {
        let err = SelectQuery::builder()
            .pattern(var("sale"), sales("soldTo"), var("customer"))
            .select_var("customer")
            .filter("revenue", CompareOp::Gt, Literal::Decimal(0.0))
            .build()
            .unwrap_err();
        assert!(matches!(err, QueryError::UnboundVariable(v) if v == "revenue"));
    }

    #[test]
    fn test_unbound_order_key_rejected() {
        let err = SelectQuery::builder()
            .pattern(var("sale"), sales("soldTo"), var("customer"))
            .select_var("customer")
            .order_by_desc("total")
            .build()
            .unwrap_err();
        assert!(matches!(err, QueryError::UnboundVariable(v) if v == "total"));
    }

    #[test]
    fn test_ungrouped_variable_alongside_aggregate_rejected() {
        let err = SelectQuery::builder()
            .pattern(var("sale"), sales("soldTo"), var("customer"))
            .pattern(var("sale"), sales("netRevenue"), var("revenue"))
            .select_var("customer")
            .select_agg(Aggregate::Sum, "revenue", "total")
            .group_by(&["revenue"])
            .build()
            .unwrap_err();
        assert!(matches!(err, QueryError::UngroupedVariable(v) if v == "customer"));
    }

    #[test]
    fn test_implicit_grouping_key() {
        let query = SelectQuery::builder()
            .pattern(var("sale"), sales("soldTo"), var("customer"))
            .pattern(var("sale"), sales("netRevenue"), var("revenue"))
            .select_var("customer")
            .select_agg(Aggregate::Sum, "revenue", "total")
            .build()
            .unwrap();
        assert_eq!(query.group_by, vec!["customer".to_string()]);
    }

    #[test]
    fn test_having_requires_aggregate_alias() {
        let err = SelectQuery::builder()
            .pattern(var("sale"), sales("soldTo"), var("customer"))
            .select_var("customer")
            .having("customer", CompareOp::Gt, Literal::Integer(5))
            .build()
            .unwrap_err();
        assert!(matches!(err, QueryError::UnboundVariable(v) if v == "customer"));
    }
}
