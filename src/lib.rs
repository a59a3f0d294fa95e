//! # jsql: JSON queries to dialect-correct SQL
//!
//! jsql compiles a declarative, JSON-shaped filter/sort/paging object into SQL
//! for Postgres, MySQL or SQL Server. Raw input values (mostly strings) are
//! coerced according to a per-model property schema derived from JSON Schema.
//!
//! ## Quick Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use jsql::prelude::*;
//!
//! let registry = Arc::new(SchemaRegistry::load_path("schemas")?);
//! let compiler = Compiler::new(registry, "User", Dialect::Postgres)?;
//!
//! let result = compiler.select_query(&serde_json::json!({
//!     "select": "id,name",
//!     "or": [{"age": {"gt": "21"}}, {"name": {"startsWith": "A"}}],
//!     "limit": 10
//! }))?;
//! // => SELECT "users"."id" AS "id", "users"."name" AS "name" FROM "users"
//! //    WHERE ("users"."age" > 21 OR "users"."name" ILIKE 'A%') LIMIT 10
//! ```
//!
//! ## Comparators
//!
//! | Comparator                 | SQL                              |
//! |----------------------------|----------------------------------|
//! | `eq` `=` `==`              | `=`, `IS NULL`, `IN (...)`       |
//! | `ne` `!` `!=`              | `!=`, `IS NOT NULL`, `NOT IN`    |
//! | `gt` `gte` `lt` `lte`      | `>` `>=` `<` `<=`                |
//! | `in` `nin`                 | `IN (...)`, `NOT IN (...)`       |
//! | `like` `contains`          | `ILIKE '%v%'` / `LIKE '%v%'`     |
//! | `startsWith` `endsWith`    | `'v%'`, `'%v'`                   |
//! | `exists`                   | `EXISTS (...)`, `IS NOT NULL`    |
//! | `and` `or`                 | parenthesized group              |

pub mod ast;
pub mod coerce;
pub mod compiler;
pub mod config;
pub mod error;
pub mod parser;
pub mod schema;
pub mod transpiler;

pub mod prelude {
    pub use crate::ast::*;
    pub use crate::coerce::{Coerced, coerce, coerce_many};
    pub use crate::compiler::{Compiler, StatementResult};
    pub use crate::config::JsqlConfig;
    pub use crate::error::*;
    pub use crate::parser::parse_query;
    pub use crate::schema::{ModelSchema, Property, PropertyType, Relation, SchemaRegistry};
    pub use crate::transpiler::{Dialect, ToSql};
}

/// Parse a JSON query into a [`QuerySpec`](ast::QuerySpec).
///
/// # Example
///
/// ```
/// let spec = jsql::parse(&serde_json::json!({"name": "Ada", "limit": 5})).unwrap();
/// assert_eq!(spec.page.limit, Some(5));
/// assert_eq!(spec.filter.len(), 1);
/// ```
pub fn parse(query: &serde_json::Value) -> error::JsqlResult<ast::QuerySpec> {
    parser::parse_query(query)
}
