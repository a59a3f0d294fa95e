//! COUNT SQL generation.

use crate::ast::*;
use crate::transpiler::conditions::{render_column, where_clause};
use crate::transpiler::dialect::Dialect;

pub fn build_count(stmt: &Statement, dialect: Dialect) -> String {
    let generator = dialect.generator();
    let target = match &stmt.count_column {
        Some(col) => render_column(col, generator.as_ref()),
        None => "*".to_string(),
    };

    format!(
        "SELECT COUNT({}) AS {} FROM {}{}",
        target,
        generator.quote_identifier("count"),
        generator.quote_identifier(&stmt.table),
        where_clause(&stmt.filters, generator.as_ref())
    )
}
