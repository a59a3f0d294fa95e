//! Statement rendering on the default dialect.

use pretty_assertions::assert_eq;

use super::{col, cond, select};
use crate::ast::*;
use crate::transpiler::{Dialect, FilterToSql, ToSql};

#[test]
fn test_select_columns_are_qualified_and_aliased() {
    let stmt = select(Dialect::Postgres);
    assert_eq!(
        stmt.to_sql(),
        "SELECT \"users\".\"id\" AS \"id\", \"users\".\"full_name\" AS \"name\" FROM \"users\""
    );
}

#[test]
fn test_select_without_columns_is_star() {
    let stmt = Statement::new(Dialect::Postgres, Action::Select, "users");
    assert_eq!(stmt.to_sql(), "SELECT * FROM \"users\"");
}

#[test]
fn test_where_order_limit() {
    let mut stmt = select(Dialect::Postgres);
    stmt.filters = vec![cond("age", Operator::Gte, 18i64), cond("active", Operator::Eq, true)];
    stmt.order_by = vec![OrderBy {
        column: col("created_at"),
        direction: SortOrder::Desc,
    }];
    stmt.limit = Some(10);
    stmt.offset = Some(20);

    assert_eq!(
        stmt.to_sql(),
        "SELECT \"users\".\"id\" AS \"id\", \"users\".\"full_name\" AS \"name\" FROM \"users\" \
         WHERE \"users\".\"age\" >= 18 AND \"users\".\"active\" = true \
         ORDER BY \"users\".\"created_at\" DESC LIMIT 10 OFFSET 20"
    );
}

#[test]
fn test_nested_groups_are_parenthesized() {
    let group = Filter::Group {
        op: LogicalOp::Or,
        items: vec![
            Filter::Group {
                op: LogicalOp::And,
                items: vec![cond("a", Operator::Eq, 1i64), cond("b", Operator::Eq, 2i64)],
            },
            Filter::Group {
                op: LogicalOp::And,
                items: vec![cond("c", Operator::Eq, 3i64)],
            },
        ],
    };
    let generator = Dialect::Postgres.generator();
    assert_eq!(
        group.to_sql(generator.as_ref()).as_deref(),
        Some(
            "((\"users\".\"a\" = 1 AND \"users\".\"b\" = 2) OR (\"users\".\"c\" = 3))"
        )
    );
}

#[test]
fn test_empty_group_renders_nothing() {
    let mut stmt = Statement::new(Dialect::Postgres, Action::Delete, "users");
    stmt.filters = vec![Filter::Group {
        op: LogicalOp::Or,
        items: vec![Filter::Unsupported(Unsupported {
            property: "loc".into(),
            reason: "geo".into(),
        })],
    }];
    assert_eq!(stmt.to_sql(), "DELETE FROM \"users\"");
}

#[test]
fn test_membership_edge_cases() {
    let generator = Dialect::Postgres.generator();
    let empty_in = cond("id", Operator::In, Value::Array(vec![]));
    let empty_nin = cond("id", Operator::NotIn, Value::Array(vec![]));
    assert_eq!(empty_in.to_sql(generator.as_ref()).as_deref(), Some("1 = 0"));
    assert_eq!(empty_nin.to_sql(generator.as_ref()).as_deref(), Some("1 = 1"));

    let list = cond(
        "id",
        Operator::NotIn,
        Value::Array(vec![Value::Int(1), Value::Int(2)]),
    );
    assert_eq!(
        list.to_sql(generator.as_ref()).as_deref(),
        Some("\"users\".\"id\" NOT IN (1, 2)")
    );
}

#[test]
fn test_null_checks() {
    let generator = Dialect::Postgres.generator();
    let is_null = cond("deleted_at", Operator::IsNull, Value::Null);
    let not_null = cond("deleted_at", Operator::IsNotNull, Value::Null);
    assert_eq!(
        is_null.to_sql(generator.as_ref()).as_deref(),
        Some("\"users\".\"deleted_at\" IS NULL")
    );
    assert_eq!(
        not_null.to_sql(generator.as_ref()).as_deref(),
        Some("\"users\".\"deleted_at\" IS NOT NULL")
    );
}

#[test]
fn test_string_literals_are_escaped() {
    let generator = Dialect::Postgres.generator();
    let f = cond("name", Operator::Eq, "O'Brien; DROP TABLE users; --");
    assert_eq!(
        f.to_sql(generator.as_ref()).as_deref(),
        Some("\"users\".\"name\" = 'O''Brien; DROP TABLE users; --'")
    );
}

#[test]
fn test_exists_subquery() {
    let exists = Filter::Exists {
        negated: true,
        subquery: ExistsSubquery {
            table: "posts".into(),
            left: ColumnRef::new("users", "id"),
            right: ColumnRef::new("posts", "author_id"),
        },
    };
    let generator = Dialect::Postgres.generator();
    assert_eq!(
        exists.to_sql(generator.as_ref()).as_deref(),
        Some(
            "NOT EXISTS (SELECT * FROM \"posts\" WHERE \"users\".\"id\" = \"posts\".\"author_id\")"
        )
    );
}

#[test]
fn test_array_and_json_operators() {
    let generator = Dialect::Postgres.generator();
    let tags = Value::Array(vec![Value::from("a"), Value::from("b")]);

    let contains = Filter::Condition(Condition::new(col("tags"), Operator::ArrayContains, tags.clone()));
    assert_eq!(
        contains.to_sql(generator.as_ref()).as_deref(),
        Some("\"users\".\"tags\" @> ARRAY['a', 'b']")
    );

    let not_overlap = Filter::Condition(Condition::new(col("tags"), Operator::ArrayNotOverlaps, tags));
    assert_eq!(
        not_overlap.to_sql(generator.as_ref()).as_deref(),
        Some("NOT (\"users\".\"tags\" && ARRAY['a', 'b'])")
    );

    let path = Filter::Condition(Condition::new(
        col("meta").with_path(vec!["dims".into(), "w".into()]),
        Operator::Eq,
        Value::from("10"),
    ));
    assert_eq!(
        path.to_sql(generator.as_ref()).as_deref(),
        Some("\"users\".\"meta\"->'dims'->>'w' = '10'")
    );
}

#[test]
fn test_count_insert_update() {
    let mut count = Statement::new(Dialect::Postgres, Action::Count, "users");
    count.count_column = Some(col("id"));
    count.filters = vec![cond("active", Operator::Eq, true)];
    assert_eq!(
        count.to_sql(),
        "SELECT COUNT(\"users\".\"id\") AS \"count\" FROM \"users\" WHERE \"users\".\"active\" = true"
    );

    let mut insert = Statement::new(Dialect::Postgres, Action::Insert, "users");
    insert.assignments = vec![
        Assignment {
            column: "full_name".into(),
            value: Value::from("Ada"),
        },
        Assignment {
            column: "age".into(),
            value: Value::Int(36),
        },
    ];
    assert_eq!(
        insert.to_sql(),
        "INSERT INTO \"users\" (\"full_name\", \"age\") VALUES ('Ada', 36)"
    );

    let mut update = Statement::new(Dialect::Postgres, Action::Update, "users");
    update.assignments = vec![Assignment {
        column: "age".into(),
        value: Value::Null,
    }];
    update.filters = vec![cond("id", Operator::Eq, 7i64)];
    assert_eq!(
        update.to_sql(),
        "UPDATE \"users\" SET \"age\" = NULL WHERE \"users\".\"id\" = 7"
    );
}

#[test]
fn test_insert_without_columns() {
    let stmt = Statement::new(Dialect::Postgres, Action::Insert, "users");
    assert_eq!(stmt.to_sql(), "INSERT INTO \"users\" DEFAULT VALUES");
}
