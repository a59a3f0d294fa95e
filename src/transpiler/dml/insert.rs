//! INSERT SQL generation.

use crate::ast::*;
use crate::transpiler::conditions::render_value;
use crate::transpiler::dialect::Dialect;

pub fn build_insert(stmt: &Statement, dialect: Dialect) -> String {
    let generator = dialect.generator();
    let table = generator.quote_identifier(&stmt.table);

    if stmt.assignments.is_empty() {
        return generator.empty_insert(&table);
    }

    let cols: Vec<String> = stmt
        .assignments
        .iter()
        .map(|a| generator.quote_identifier(&a.column))
        .collect();
    let vals: Vec<String> = stmt
        .assignments
        .iter()
        .map(|a| render_value(&a.value, generator.as_ref()))
        .collect();

    format!(
        "INSERT INTO {} ({}) VALUES ({})",
        table,
        cols.join(", "),
        vals.join(", ")
    )
}
