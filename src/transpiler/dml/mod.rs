//! Per-action SQL builders.

pub mod count;
pub mod delete;
pub mod insert;
pub mod select;
pub mod update;

use crate::ast::OrderBy;
use crate::transpiler::conditions::render_column;
use crate::transpiler::traits::SqlGenerator;

/// ` ORDER BY a ASC, b DESC`, or empty.
pub(crate) fn order_by_clause(order_by: &[OrderBy], generator: &dyn SqlGenerator) -> String {
    if order_by.is_empty() {
        return String::new();
    }
    let terms: Vec<String> = order_by
        .iter()
        .map(|o| {
            format!(
                "{} {}",
                render_column(&o.column, generator),
                o.direction.sql_keyword()
            )
        })
        .collect();
    format!(" ORDER BY {}", terms.join(", "))
}
