//! EXISTS predicates across declared relations.

use serde_json::Value as Json;

use crate::ast::{ColumnRef, ExistsSubquery, Filter};
use crate::schema::{ModelSchema, SchemaRegistry};

/// Native `true`, `"true"` and `"1"` ask for existence; anything else for absence.
pub fn wants_existence(value: &Json) -> bool {
    match value {
        Json::Bool(b) => *b,
        Json::String(s) => s == "true" || s == "1",
        _ => false,
    }
}

/// Build `[NOT] EXISTS (SELECT * FROM target WHERE source.from = target.to)`.
///
/// Returns `None` when the relation, its target model or either join property
/// cannot be resolved.
pub fn resolve_relation_exists(
    registry: &SchemaRegistry,
    schema: &ModelSchema,
    relation_name: &str,
    value: &Json,
) -> Option<Filter> {
    let Some(relation) = schema.relation(relation_name) else {
        tracing::warn!("Relation '{}' is not declared on '{}'", relation_name, schema.name());
        return None;
    };
    let Some(target) = registry.get(&relation.target_model) else {
        tracing::warn!(
            "Relation '{}' targets unknown model '{}'",
            relation_name,
            relation.target_model
        );
        return None;
    };
    let (Some(from), Some(to)) = (
        schema.property(&relation.join_from),
        target.property(&relation.join_to),
    ) else {
        tracing::warn!(
            "Relation '{}' joins undeclared properties '{}' -> '{}'",
            relation_name,
            relation.join_from,
            relation.join_to
        );
        return None;
    };

    Some(Filter::Exists {
        negated: !wants_existence(value),
        subquery: ExistsSubquery {
            table: target.table_name().to_string(),
            left: ColumnRef::new(schema.table_name(), &from.column_name),
            right: ColumnRef::new(target.table_name(), &to.column_name),
        },
    })
}
