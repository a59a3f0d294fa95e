//! End-to-end compilation against the JSON schema fixtures.

use std::path::PathBuf;
use std::sync::Arc;

use jsql::prelude::*;
use pretty_assertions::assert_eq;
use serde_json::{Value as Json, json};

fn fixtures() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn registry() -> Arc<SchemaRegistry> {
    Arc::new(SchemaRegistry::load_path(fixtures()).expect("fixtures should load"))
}

fn sql(model: &str, dialect: Dialect, query: Json) -> String {
    Compiler::new(registry(), model, dialect)
        .unwrap()
        .select_query(&query)
        .unwrap()
        .sql
}

#[test]
fn test_fixture_directory_loads_every_model() {
    let registry = registry();
    assert_eq!(registry.names(), vec!["Post", "Product", "User"]);
    assert!(registry.get("users").is_some());
    assert_eq!(registry.get("User").unwrap().property("name").unwrap().column_name, "full_name");
}

#[test]
fn test_null_comparisons() {
    assert_eq!(
        sql("User", Dialect::Postgres, json!({"select": "id", "name": {"eq": null}})),
        "SELECT \"users\".\"id\" AS \"id\" FROM \"users\" WHERE \"users\".\"full_name\" IS NULL"
    );
    assert_eq!(
        sql("User", Dialect::Postgres, json!({"select": "id", "name": {"ne": null}})),
        "SELECT \"users\".\"id\" AS \"id\" FROM \"users\" WHERE \"users\".\"full_name\" IS NOT NULL"
    );
}

#[test]
fn test_or_group() {
    assert_eq!(
        sql(
            "User",
            Dialect::Postgres,
            json!({"select": "id", "or": [{"age": 1}, {"email": {"gt": "2"}}]})
        ),
        "SELECT \"users\".\"id\" AS \"id\" FROM \"users\" \
         WHERE (\"users\".\"age\" = 1 OR \"users\".\"email\" > '2')"
    );
}

#[test]
fn test_nested_groups() {
    assert_eq!(
        sql(
            "User",
            Dialect::Postgres,
            json!({"select": "id", "or": [[{"age": "1"}, {"active": "true"}], [{"email": "c"}]]})
        ),
        "SELECT \"users\".\"id\" AS \"id\" FROM \"users\" \
         WHERE ((\"users\".\"age\" = 1 AND \"users\".\"active\" = true) OR (\"users\".\"email\" = 'c'))"
    );
}

#[test]
fn test_top_level_clauses_combine_with_and() {
    assert_eq!(
        sql(
            "User",
            Dialect::MySQL,
            json!({"select": "id", "age": {"gte": "18"}, "email": {"endsWith": "@example.com"}})
        ),
        "SELECT `users`.`id` AS `id` FROM `users` \
         WHERE `users`.`age` >= 18 AND `users`.`email` LIKE '%@example.com'"
    );
}

#[test]
fn test_date_time_values_are_normalized() {
    assert_eq!(
        sql("User", Dialect::Postgres, json!({"select": "id", "createdAt": {"gte": "2024-01-01"}})),
        "SELECT \"users\".\"id\" AS \"id\" FROM \"users\" \
         WHERE \"users\".\"created_at\" >= '2024-01-01 00:00:00'"
    );
    assert_eq!(
        sql("User", Dialect::Postgres, json!({"select": "id", "createdAt": {"lt": "2024"}})),
        "SELECT \"users\".\"id\" AS \"id\" FROM \"users\" \
         WHERE \"users\".\"created_at\" < '2024-01-01 00:00:00'"
    );
}

#[test]
fn test_relation_exists() {
    assert_eq!(
        sql("User", Dialect::Postgres, json!({"select": "id", "posts": {"exists": true}})),
        "SELECT \"users\".\"id\" AS \"id\" FROM \"users\" \
         WHERE EXISTS (SELECT * FROM \"posts\" WHERE \"users\".\"id\" = \"posts\".\"author_id\")"
    );
    assert_eq!(
        sql("Post", Dialect::MySQL, json!({"select": "id", "author": {"exists": "0"}})),
        "SELECT `posts`.`id` AS `id` FROM `posts` \
         WHERE NOT EXISTS (SELECT * FROM `users` WHERE `posts`.`author_id` = `users`.`id`) \
         ORDER BY `posts`.`published_at` DESC"
    );
}

#[test]
fn test_declared_default_sort() {
    assert_eq!(
        sql("Post", Dialect::Postgres, json!({"select": "id"})),
        "SELECT \"posts\".\"id\" AS \"id\" FROM \"posts\" ORDER BY \"posts\".\"published_at\" DESC"
    );
    assert_eq!(
        sql("Post", Dialect::Postgres, json!({"select": "id", "sort": "title"})),
        "SELECT \"posts\".\"id\" AS \"id\" FROM \"posts\" ORDER BY \"posts\".\"title\" ASC"
    );
}

#[test]
fn test_sqlserver_paging_orders_by_default_key() {
    let query = json!({"select": "id", "limit": 5, "skip": 10});
    assert_eq!(
        sql("User", Dialect::SqlServer, query.clone()),
        "SELECT \"users\".\"id\" AS \"id\" FROM \"users\" \
         ORDER BY \"users\".\"created_at\" ASC OFFSET 10 ROWS FETCH NEXT 5 ROWS ONLY"
    );
    assert_eq!(
        sql("User", Dialect::Postgres, query),
        "SELECT \"users\".\"id\" AS \"id\" FROM \"users\" LIMIT 5 OFFSET 10"
    );
    assert_eq!(
        sql("Product", Dialect::SqlServer, json!({"select": "sku", "limit": 1})),
        "SELECT \"products\".\"sku\" AS \"sku\" FROM \"products\" \
         ORDER BY \"products\".\"stock_number\" ASC OFFSET 0 ROWS FETCH NEXT 1 ROWS ONLY"
    );
}

#[test]
fn test_unknown_selection_falls_back_to_all_properties() {
    assert_eq!(
        sql("Product", Dialect::Postgres, json!({"select": ["bogus", "alsoBogus"]})),
        "SELECT \"products\".\"sku\" AS \"sku\", \"products\".\"price\" AS \"price\", \
         \"products\".\"tags\" AS \"tags\", \"products\".\"meta\" AS \"meta\", \
         \"products\".\"stock_number\" AS \"stockNumber\" FROM \"products\""
    );
}

#[test]
fn test_array_and_json_columns_on_postgres() {
    assert_eq!(
        sql(
            "Product",
            Dialect::Postgres,
            json!({"select": "sku,meta.color", "tags": {"in": "sale,new"}, "meta.color": "red"})
        ),
        "SELECT \"products\".\"sku\" AS \"sku\", \"products\".\"meta\"->>'color' AS \"meta.color\" \
         FROM \"products\" WHERE \"products\".\"tags\" && ARRAY['sale', 'new'] \
         AND \"products\".\"meta\"->>'color' = 'red'"
    );
}

#[test]
fn test_array_and_json_columns_elsewhere_are_unsupported() {
    let compiler = Compiler::new(registry(), "Product", Dialect::MySQL).unwrap();
    let result = compiler
        .select_query(&json!({"select": "sku", "tags": "sale", "meta.color": "red", "price": {"lt": 10}}))
        .unwrap();
    assert_eq!(
        result.sql,
        "SELECT `products`.`sku` AS `sku` FROM `products` WHERE `products`.`price` < 10"
    );
    let dropped: Vec<&str> = result.unsupported().iter().map(|u| u.property.as_str()).collect();
    assert_eq!(dropped, vec!["tags", "meta.color"]);
}

#[test]
fn test_membership_lists() {
    assert_eq!(
        sql("User", Dialect::Postgres, json!({"select": "id", "age": {"in": "18,0,x,21"}})),
        "SELECT \"users\".\"id\" AS \"id\" FROM \"users\" WHERE \"users\".\"age\" IN (18, 21)"
    );
    assert_eq!(
        sql("User", Dialect::Postgres, json!({"select": "id", "age": {"nin": []}})),
        "SELECT \"users\".\"id\" AS \"id\" FROM \"users\" WHERE 1 = 1"
    );
}

#[test]
fn test_count_and_delete() {
    let compiler = Compiler::new(registry(), "User", Dialect::SqlServer).unwrap();
    assert_eq!(
        compiler.count_query(&json!({"active": "1", "limit": 3})).unwrap().sql,
        "SELECT COUNT(\"users\".\"id\") AS \"count\" FROM \"users\" WHERE \"users\".\"active\" = 1"
    );
    assert_eq!(
        compiler
            .delete_query(&json!({"where": "{\"email\": {\"contains\": \"spam\"}}"}))
            .unwrap()
            .sql,
        "DELETE FROM \"users\" WHERE \"users\".\"email\" LIKE '%spam%'"
    );
}

#[test]
fn test_insert_validation() {
    let compiler = Compiler::new(registry(), "User", Dialect::Postgres).unwrap();
    let err = compiler.insert(&json!({})).unwrap_err();
    assert_eq!(
        serde_json::to_value(&err).unwrap(),
        json!({"error": ["email"], "message": "Missing or Invalid Fields"})
    );

    let result = compiler
        .insert(&json!({"email": "ada@example.com", "age": "x", "unknown": 1}))
        .unwrap();
    assert!(result.sql.starts_with("INSERT INTO \"users\" (\"id\", \"email\", \"age\") VALUES ('"));
    assert!(result.sql.ends_with("', 'ada@example.com', NULL)"));
}

#[test]
fn test_update() {
    let compiler = Compiler::new(registry(), "User", Dialect::MySQL).unwrap();
    let result = compiler
        .update_query(&json!({"id": "u1"}), &json!({"name": "Ada", "active": "true"}))
        .unwrap();
    assert_eq!(
        result.sql,
        "UPDATE `users` SET `full_name` = 'Ada', `active` = true WHERE `users`.`id` = 'u1'"
    );
}

#[test]
fn test_null_where_keeps_top_level_clauses() {
    let compiler = Compiler::new(registry(), "User", Dialect::Postgres).unwrap();
    assert_eq!(
        compiler.delete_query(&json!({"where": null, "id": "u5"})).unwrap().sql,
        "DELETE FROM \"users\" WHERE \"users\".\"id\" = 'u5'"
    );
}

#[test]
fn test_mysql_offset_only_paging() {
    assert_eq!(
        sql("User", Dialect::MySQL, json!({"select": "id", "offset": 20})),
        "SELECT `users`.`id` AS `id` FROM `users` LIMIT 18446744073709551615 OFFSET 20"
    );
}

#[test]
fn test_malformed_where_is_an_error() {
    let compiler = Compiler::new(registry(), "User", Dialect::Postgres).unwrap();
    assert!(matches!(
        compiler.select_query(&json!({"where": "{oops"})),
        Err(JsqlError::Parse { .. })
    ));
}

#[test]
fn test_compilation_is_repeatable() {
    let compiler = Compiler::new(registry(), "User", Dialect::Postgres).unwrap();
    let query = json!({"or": [[{"age": {"gt": 1}}], {"posts": {"exists": "true"}}], "sort": "email desc"});
    let first = compiler.select_query(&query).unwrap();
    let second = compiler.select_query(&query).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_compiler_is_shareable_across_threads() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Compiler>();

    let compiler = Arc::new(Compiler::new(registry(), "User", Dialect::Postgres).unwrap());
    let handles: Vec<_> = (0..4)
        .map(|i| {
            let compiler = Arc::clone(&compiler);
            std::thread::spawn(move || compiler.select_query(&json!({"age": i})).unwrap().sql)
        })
        .collect();
    for (i, handle) in handles.into_iter().enumerate() {
        assert!(handle.join().unwrap().ends_with(&format!("WHERE \"users\".\"age\" = {}", i)));
    }
}
