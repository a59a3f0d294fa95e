//! Transpiler tests, split by concern.

mod core;

use crate::ast::*;
use crate::transpiler::Dialect;

pub(super) fn col(name: &str) -> ColumnRef {
    ColumnRef::new("users", name)
}

pub(super) fn cond(name: &str, op: Operator, value: impl Into<Value>) -> Filter {
    Filter::Condition(Condition::new(col(name), op, value.into()))
}

pub(super) fn select(dialect: Dialect) -> Statement {
    let mut stmt = Statement::new(dialect, Action::Select, "users");
    stmt.columns = vec![
        SelectColumn {
            column: col("id"),
            alias: "id".into(),
        },
        SelectColumn {
            column: col("full_name"),
            alias: "name".into(),
        },
    ];
    stmt
}
