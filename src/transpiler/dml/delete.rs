//! DELETE SQL generation.

use crate::ast::*;
use crate::transpiler::conditions::where_clause;
use crate::transpiler::dialect::Dialect;

pub fn build_delete(stmt: &Statement, dialect: Dialect) -> String {
    let generator = dialect.generator();
    let mut sql = String::from("DELETE FROM ");
    sql.push_str(&generator.quote_identifier(&stmt.table));
    sql.push_str(&where_clause(&stmt.filters, generator.as_ref()));
    sql
}
