//! Schema-driven statement compiler.
//!
//! A [`Compiler`] is bound to one model and one dialect. It turns a parsed
//! [`QuerySpec`] (plus a data payload for writes) into a [`Statement`] and its
//! rendered SQL.
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use jsql::prelude::*;
//!
//! let registry = Arc::new(SchemaRegistry::load_path("schemas")?);
//! let compiler = Compiler::new(registry, "User", Dialect::Postgres)?;
//! let result = compiler.select_query(&serde_json::json!({"age": {"gt": 21}, "limit": 10}))?;
//! println!("{}", result.sql);
//! ```

pub mod evaluator;
pub mod relation;
pub mod sort;

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value as Json;
use uuid::Uuid;

use crate::ast::*;
use crate::coerce::coerce;
use crate::error::{FieldValidationError, JsqlError, JsqlResult};
use crate::parser::parse_query;
use crate::schema::{ModelSchema, PropertyType, SchemaRegistry};
use crate::transpiler::{Dialect, SqlGenerator, ToSql};

pub use evaluator::Evaluator;
pub use relation::resolve_relation_exists;
pub use sort::default_sort_key;

/// A compiled statement and its SQL text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatementResult {
    pub statement: Statement,
    pub sql: String,
}

impl StatementResult {
    fn new(statement: Statement) -> Self {
        let sql = statement.to_sql();
        tracing::debug!("{} on '{}': {}", statement.action, statement.table, sql);
        Self { statement, sql }
    }

    /// Clauses dropped because the dialect cannot express them.
    pub fn unsupported(&self) -> Vec<&Unsupported> {
        self.statement.unsupported()
    }
}

pub struct Compiler {
    registry: Arc<SchemaRegistry>,
    schema: Arc<ModelSchema>,
    dialect: Dialect,
    generator: Box<dyn SqlGenerator>,
}

impl std::fmt::Debug for Compiler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Compiler")
            .field("model", &self.schema.name())
            .field("dialect", &self.dialect)
            .finish()
    }
}

impl Compiler {
    /// Bind a compiler to `model` (by model or table name).
    pub fn new(registry: Arc<SchemaRegistry>, model: &str, dialect: Dialect) -> JsqlResult<Self> {
        let schema = registry
            .get(model)
            .ok_or_else(|| JsqlError::UnknownModel(model.to_string()))?;
        Ok(Self {
            registry,
            schema,
            dialect,
            generator: dialect.generator(),
        })
    }

    pub fn schema(&self) -> &ModelSchema {
        &self.schema
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    fn evaluator(&self) -> Evaluator<'_> {
        Evaluator::new(&self.registry, &self.schema, self.generator.as_ref())
    }

    fn column(&self, property: &str) -> Option<ColumnRef> {
        self.schema
            .property(property)
            .map(|p| ColumnRef::new(self.schema.table_name(), &p.column_name))
    }

    fn statement(&self, action: Action, spec: &QuerySpec) -> Statement {
        let mut stmt = Statement::new(self.dialect, action, self.schema.table_name());
        stmt.filters = self.evaluator().evaluate(&spec.filter);
        stmt
    }

    pub fn select(&self, spec: &QuerySpec) -> StatementResult {
        let mut stmt = self.statement(Action::Select, spec);
        stmt.columns = self.select_columns(&spec.select);
        stmt.order_by = self.order_by(spec);
        stmt.limit = spec.page.limit;
        stmt.offset = spec.page.offset;
        StatementResult::new(stmt)
    }

    pub fn count(&self, spec: &QuerySpec) -> StatementResult {
        let mut stmt = self.statement(Action::Count, spec);
        stmt.count_column = self.column(self.schema.primary_key());
        StatementResult::new(stmt)
    }

    pub fn delete(&self, spec: &QuerySpec) -> StatementResult {
        StatementResult::new(self.statement(Action::Delete, spec))
    }

    /// Build an INSERT from `data`. Every required property must be present,
    /// non-null and coercible.
    pub fn insert(&self, data: &Json) -> Result<StatementResult, FieldValidationError> {
        let empty = serde_json::Map::new();
        let data = data.as_object().unwrap_or(&empty);
        let primary_key = self.schema.declared_primary_key();

        let mut stmt = Statement::new(self.dialect, Action::Insert, self.schema.table_name());
        let mut invalid = Vec::new();

        for (name, property) in self.schema.properties() {
            let raw = data.get(name);
            let absent = matches!(raw, None | Some(Json::Null)) || raw.and_then(Json::as_str) == Some("");

            if absent
                && primary_key == Some(name)
                && property.kind == PropertyType::String
                && property.format_is("uuid")
            {
                stmt.assignments.push(Assignment {
                    column: property.column_name.clone(),
                    value: Value::Uuid(Uuid::new_v4()),
                });
                continue;
            }

            let Some(raw) = raw else {
                if property.required {
                    invalid.push(name.to_string());
                }
                continue;
            };

            let coerced = coerce(raw, property);
            if property.required && (coerced.malformed || coerced.value.is_null()) {
                invalid.push(name.to_string());
                continue;
            }
            stmt.assignments.push(Assignment {
                column: property.column_name.clone(),
                value: coerced.value,
            });
        }

        // Required names without a declared property only need to be present.
        for name in self.schema.required() {
            if self.schema.property(name).is_none() && data.get(name).is_none_or(Json::is_null) {
                invalid.push(name.clone());
            }
        }

        if !invalid.is_empty() {
            tracing::debug!("Rejected insert into '{}': {:?}", self.schema.table_name(), invalid);
            return Err(FieldValidationError::new(invalid));
        }
        Ok(StatementResult::new(stmt))
    }

    /// Build an UPDATE of the rows matching `spec`. Keys of `data` that name no
    /// property are dropped.
    pub fn update(&self, spec: &QuerySpec, data: &Json) -> JsqlResult<StatementResult> {
        let mut stmt = self.statement(Action::Update, spec);

        if let Some(data) = data.as_object() {
            for (key, raw) in data {
                match self.schema.property(key) {
                    Some(property) => stmt.assignments.push(Assignment {
                        column: property.column_name.clone(),
                        value: coerce(raw, property).value,
                    }),
                    None => tracing::debug!("Not updating unknown property '{}'", key),
                }
            }
        }

        if stmt.assignments.is_empty() {
            return Err(JsqlError::EmptyUpdate(self.schema.name().to_string()));
        }
        Ok(StatementResult::new(stmt))
    }

    pub fn select_query(&self, query: &Json) -> JsqlResult<StatementResult> {
        Ok(self.select(&parse_query(query)?))
    }

    pub fn count_query(&self, query: &Json) -> JsqlResult<StatementResult> {
        Ok(self.count(&parse_query(query)?))
    }

    pub fn delete_query(&self, query: &Json) -> JsqlResult<StatementResult> {
        Ok(self.delete(&parse_query(query)?))
    }

    pub fn update_query(&self, query: &Json, data: &Json) -> JsqlResult<StatementResult> {
        self.update(&parse_query(query)?, data)
    }

    fn select_columns(&self, requested: &[String]) -> Vec<SelectColumn> {
        let table = self.schema.table_name();
        let mut columns: Vec<SelectColumn> = requested
            .iter()
            .filter_map(|name| {
                if let Some(property) = self.schema.property(name) {
                    return Some(SelectColumn {
                        column: ColumnRef::new(table, &property.column_name),
                        alias: name.clone(),
                    });
                }
                let (head, path) = name.split_once('.')?;
                let property = self.schema.property(head)?;
                if property.kind != PropertyType::Object || !self.generator.supports_json_columns() {
                    return None;
                }
                let segments: Vec<String> = path.split('.').map(str::to_string).collect();
                Some(SelectColumn {
                    column: ColumnRef::new(table, &property.column_name).with_path(segments),
                    alias: name.clone(),
                })
            })
            .collect();

        if columns.is_empty() {
            columns = self
                .schema
                .properties()
                .map(|(name, property)| SelectColumn {
                    column: ColumnRef::new(table, &property.column_name),
                    alias: name.to_string(),
                })
                .collect();
        }
        columns
    }

    fn order_by(&self, spec: &QuerySpec) -> Vec<OrderBy> {
        let resolve = |terms: &[SortTerm]| -> Vec<OrderBy> {
            terms
                .iter()
                .filter_map(|term| {
                    self.column(&term.property).map(|column| OrderBy {
                        column,
                        direction: term.direction,
                    })
                })
                .collect()
        };

        let explicit = resolve(&spec.sort);
        if !explicit.is_empty() {
            return explicit;
        }

        if let Some(default_sort) = self.schema.default_sort() {
            let declared = resolve(&crate::parser::parse_sort_terms(default_sort));
            if !declared.is_empty() {
                return declared;
            }
        }

        if self.generator.requires_order_for_offset() && spec.page.is_paged() {
            let key = default_sort_key(&self.schema);
            return self
                .column(key)
                .map(|column| OrderBy {
                    column,
                    direction: SortOrder::Asc,
                })
                .into_iter()
                .collect();
        }

        Vec::new()
    }
}
