use serde::{Deserialize, Serialize};

use super::operators::{Comparator, LogicalOp};

/// A parsed filter clause, before any schema lookup or coercion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PredicateNode {
    /// `{property: value}` or `{property: {comparator: value}}`.
    Comparison {
        property: String,
        comparator: Comparator,
        value: serde_json::Value,
    },
    /// `{and: [...]}` / `{or: [...]}`, or a nested array inside one.
    Logical {
        kind: LogicalOp,
        children: Vec<PredicateNode>,
    },
}

impl PredicateNode {
    pub fn comparison(
        property: impl Into<String>,
        comparator: Comparator,
        value: serde_json::Value,
    ) -> Self {
        PredicateNode::Comparison {
            property: property.into(),
            comparator,
            value,
        }
    }

    pub fn logical(kind: LogicalOp, children: Vec<PredicateNode>) -> Self {
        PredicateNode::Logical { kind, children }
    }

    /// Number of comparisons in this subtree.
    pub fn comparison_count(&self) -> usize {
        match self {
            PredicateNode::Comparison { .. } => 1,
            PredicateNode::Logical { children, .. } => {
                children.iter().map(|c| c.comparison_count()).sum()
            }
        }
    }
}

impl std::fmt::Display for PredicateNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PredicateNode::Comparison {
                property,
                comparator,
                value,
            } => write!(f, "{} {} {}", property, comparator, value),
            PredicateNode::Logical { kind, children } => {
                let joiner = format!(" {} ", kind.sql_keyword());
                let parts: Vec<String> = children.iter().map(|c| c.to_string()).collect();
                write!(f, "({})", parts.join(&joiner))
            }
        }
    }
}
