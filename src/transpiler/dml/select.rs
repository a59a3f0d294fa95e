//! SELECT SQL generation.

use super::order_by_clause;
use crate::ast::*;
use crate::transpiler::conditions::{render_column, where_clause};
use crate::transpiler::dialect::Dialect;

pub fn build_select(stmt: &Statement, dialect: Dialect) -> String {
    let generator = dialect.generator();
    let mut sql = String::from("SELECT ");

    if stmt.columns.is_empty() {
        sql.push('*');
    } else {
        let cols: Vec<String> = stmt
            .columns
            .iter()
            .map(|c| {
                format!(
                    "{} AS {}",
                    render_column(&c.column, generator.as_ref()),
                    generator.quote_identifier(&c.alias)
                )
            })
            .collect();
        sql.push_str(&cols.join(", "));
    }

    sql.push_str(" FROM ");
    sql.push_str(&generator.quote_identifier(&stmt.table));
    sql.push_str(&where_clause(&stmt.filters, generator.as_ref()));
    sql.push_str(&order_by_clause(&stmt.order_by, generator.as_ref()));

    // OFFSET ... FETCH is a syntax error without ORDER BY on some backends.
    let paging_allowed = !stmt.order_by.is_empty() || !generator.requires_order_for_offset();
    if paging_allowed {
        sql.push_str(&generator.limit_offset(stmt.limit, stmt.offset));
    }

    sql
}
