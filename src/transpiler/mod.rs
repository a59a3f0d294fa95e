//! SQL transpiler for compiled statements.
//!
//! Renders a [`Statement`](crate::ast::Statement) into SQL text for one of the
//! supported dialects.

pub mod conditions;
pub mod dialect;
pub mod dml;
pub mod sql;
pub mod traits;

#[cfg(test)]
mod tests;

pub use conditions::FilterToSql;
pub use dialect::Dialect;
pub use traits::{SqlGenerator, quote_with};

use crate::ast::*;

/// Trait for converting AST nodes to SQL.
pub trait ToSql {
    /// Convert this node to SQL using its own dialect.
    fn to_sql(&self) -> String;
    /// Convert this node to SQL using a specific dialect.
    fn to_sql_with_dialect(&self, dialect: Dialect) -> String;
}

impl ToSql for Statement {
    fn to_sql(&self) -> String {
        self.to_sql_with_dialect(self.dialect)
    }

    fn to_sql_with_dialect(&self, dialect: Dialect) -> String {
        match self.action {
            Action::Select => dml::select::build_select(self, dialect),
            Action::Count => dml::count::build_count(self, dialect),
            Action::Insert => dml::insert::build_insert(self, dialect),
            Action::Update => dml::update::build_update(self, dialect),
            Action::Delete => dml::delete::build_delete(self, dialect),
        }
    }
}
