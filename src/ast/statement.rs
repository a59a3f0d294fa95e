//! The compiled statement handle.
//!
//! A [`Statement`] is dialect-aware but not yet text; rendering happens in
//! [`crate::transpiler`].

use serde::{Deserialize, Serialize};

use super::operators::{Action, LogicalOp, Operator, SortOrder};
use super::values::Value;
use crate::transpiler::Dialect;

/// A table-qualified column, optionally followed by a JSON path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnRef {
    pub table: String,
    pub column: String,
    pub json_path: Vec<String>,
}

impl ColumnRef {
    pub fn new(table: impl Into<String>, column: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            column: column.into(),
            json_path: Vec::new(),
        }
    }

    pub fn with_path(mut self, path: Vec<String>) -> Self {
        self.json_path = path;
        self
    }
}

/// `column op value`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub column: ColumnRef,
    pub op: Operator,
    pub value: Value,
}

impl Condition {
    pub fn new(column: ColumnRef, op: Operator, value: Value) -> Self {
        Self { column, op, value }
    }
}

/// Correlated subquery behind an EXISTS predicate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExistsSubquery {
    pub table: String,
    pub left: ColumnRef,
    pub right: ColumnRef,
}

/// A clause that was understood but cannot be expressed on the active dialect.
/// It contributes no SQL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unsupported {
    pub property: String,
    pub reason: String,
}

/// Dialect-neutral predicate produced by the evaluator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Filter {
    Condition(Condition),
    Group { op: LogicalOp, items: Vec<Filter> },
    Exists { negated: bool, subquery: ExistsSubquery },
    Unsupported(Unsupported),
}

impl Filter {
    /// Collect every unsupported marker in this subtree.
    pub fn collect_unsupported<'a>(&'a self, out: &mut Vec<&'a Unsupported>) {
        match self {
            Filter::Unsupported(u) => out.push(u),
            Filter::Group { items, .. } => {
                for item in items {
                    item.collect_unsupported(out);
                }
            }
            Filter::Condition(_) | Filter::Exists { .. } => {}
        }
    }
}

/// `"table"."column" AS "alias"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectColumn {
    pub column: ColumnRef,
    pub alias: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderBy {
    pub column: ColumnRef,
    pub direction: SortOrder,
}

/// `column = value` in an INSERT or UPDATE.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    pub column: String,
    pub value: Value,
}

/// A compiled statement for one dialect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Statement {
    pub dialect: Dialect,
    pub action: Action,
    pub table: String,
    pub columns: Vec<SelectColumn>,
    /// Combined with AND.
    pub filters: Vec<Filter>,
    pub order_by: Vec<OrderBy>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
    pub count_column: Option<ColumnRef>,
    pub assignments: Vec<Assignment>,
}

impl Statement {
    pub fn new(dialect: Dialect, action: Action, table: impl Into<String>) -> Self {
        Self {
            dialect,
            action,
            table: table.into(),
            columns: Vec::new(),
            filters: Vec::new(),
            order_by: Vec::new(),
            limit: None,
            offset: None,
            count_column: None,
            assignments: Vec::new(),
        }
    }

    /// Clauses that were dropped because the dialect cannot express them.
    pub fn unsupported(&self) -> Vec<&Unsupported> {
        let mut out = Vec::new();
        for filter in &self.filters {
            filter.collect_unsupported(&mut out);
        }
        out
    }
}
