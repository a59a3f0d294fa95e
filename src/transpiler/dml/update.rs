//! UPDATE SQL generation.

use crate::ast::*;
use crate::transpiler::conditions::{render_value, where_clause};
use crate::transpiler::dialect::Dialect;

pub fn build_update(stmt: &Statement, dialect: Dialect) -> String {
    let generator = dialect.generator();
    let mut sql = String::from("UPDATE ");
    sql.push_str(&generator.quote_identifier(&stmt.table));

    let set_clauses: Vec<String> = stmt
        .assignments
        .iter()
        .map(|a| {
            format!(
                "{} = {}",
                generator.quote_identifier(&a.column),
                render_value(&a.value, generator.as_ref())
            )
        })
        .collect();

    if !set_clauses.is_empty() {
        sql.push_str(" SET ");
        sql.push_str(&set_clauses.join(", "));
    }

    sql.push_str(&where_clause(&stmt.filters, generator.as_ref()));
    sql
}
