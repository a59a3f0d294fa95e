use serde::{Deserialize, Serialize};

use super::operators::SortOrder;
use super::predicate::PredicateNode;

/// One `"property direction"` sort term.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortTerm {
    pub property: String,
    pub direction: SortOrder,
}

impl SortTerm {
    pub fn new(property: impl Into<String>, direction: SortOrder) -> Self {
        Self {
            property: property.into(),
            direction,
        }
    }
}

/// Requested paging window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageSpec {
    pub offset: Option<u64>,
    pub limit: Option<u64>,
}

impl PageSpec {
    pub fn is_paged(&self) -> bool {
        self.offset.is_some() || self.limit.is_some()
    }
}

/// A normalized incoming query: selection, sort, paging and filter clauses.
///
/// Top-level filter clauses combine with AND.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuerySpec {
    pub select: Vec<String>,
    pub sort: Vec<SortTerm>,
    pub page: PageSpec,
    pub filter: Vec<PredicateNode>,
}

impl QuerySpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filter(mut self, node: PredicateNode) -> Self {
        self.filter.push(node);
        self
    }

    pub fn select<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.select = columns.into_iter().map(Into::into).collect();
        self
    }

    pub fn sort_by(mut self, property: impl Into<String>, direction: SortOrder) -> Self {
        self.sort.push(SortTerm::new(property, direction));
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.page.limit = Some(limit);
        self
    }

    pub fn offset(mut self, offset: u64) -> Self {
        self.page.offset = Some(offset);
        self
    }
}
