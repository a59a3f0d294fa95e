//! Predicate tree evaluation.
//!
//! Resolves each [`PredicateNode`] against the model schema into a
//! dialect-neutral [`Filter`], coercing values on the way.

use serde_json::Value as Json;

use super::relation::{resolve_relation_exists, wants_existence};
use crate::ast::*;
use crate::coerce::{coerce, coerce_many, coerce_text};
use crate::schema::{ModelSchema, Property, PropertyType, SchemaRegistry};
use crate::transpiler::SqlGenerator;

pub struct Evaluator<'a> {
    registry: &'a SchemaRegistry,
    schema: &'a ModelSchema,
    generator: &'a dyn SqlGenerator,
}

impl<'a> Evaluator<'a> {
    pub fn new(
        registry: &'a SchemaRegistry,
        schema: &'a ModelSchema,
        generator: &'a dyn SqlGenerator,
    ) -> Self {
        Self {
            registry,
            schema,
            generator,
        }
    }

    /// Evaluate top-level clauses; they combine with AND.
    pub fn evaluate(&self, nodes: &[PredicateNode]) -> Vec<Filter> {
        nodes.iter().filter_map(|n| self.evaluate_node(n)).collect()
    }

    pub fn evaluate_node(&self, node: &PredicateNode) -> Option<Filter> {
        match node {
            PredicateNode::Logical { kind, children } => {
                let items = self.evaluate(children);
                if items.is_empty() {
                    return None;
                }
                Some(Filter::Group { op: *kind, items })
            }
            PredicateNode::Comparison {
                property,
                comparator,
                value,
            } => self.evaluate_comparison(property, *comparator, value),
        }
    }

    fn evaluate_comparison(&self, key: &str, comparator: Comparator, value: &Json) -> Option<Filter> {
        if self.schema.relation(key).is_some() {
            return match comparator {
                Comparator::Exists | Comparator::Eq => {
                    resolve_relation_exists(self.registry, self.schema, key, value)
                }
                other => self.unsupported(key, format!("'{}' on a relation", other)),
            };
        }

        if let Some(property) = self.schema.property(key) {
            let column = ColumnRef::new(self.schema.table_name(), &property.column_name);
            if comparator.is_geo() {
                return self.unsupported(key, format!("geo comparator '{}'", comparator));
            }
            if property.kind == PropertyType::Array {
                return self.array_filter(key, column, property, comparator, value);
            }
            return self.scalar_filter(key, column, property, comparator, value);
        }

        if let Some((head, path)) = key.split_once('.') {
            if let Some(property) = self.schema.property(head) {
                if property.kind == PropertyType::Object {
                    return self.json_path_filter(key, property, path, comparator, value);
                }
            }
        }

        tracing::debug!("Ignoring clause '{}' on '{}': not a property or relation", key, self.schema.name());
        None
    }

    fn scalar_filter(
        &self,
        key: &str,
        column: ColumnRef,
        property: &Property,
        comparator: Comparator,
        value: &Json,
    ) -> Option<Filter> {
        let condition = |op: Operator, value: Value| {
            Some(Filter::Condition(Condition::new(column.clone(), op, value)))
        };

        match comparator {
            Comparator::Gt => condition(Operator::Gt, coerce(value, property).value),
            Comparator::Gte => condition(Operator::Gte, coerce(value, property).value),
            Comparator::Lt => condition(Operator::Lt, coerce(value, property).value),
            Comparator::Lte => condition(Operator::Lte, coerce(value, property).value),
            Comparator::In => condition(Operator::In, Value::Array(coerce_many(value, property))),
            Comparator::Nin => condition(Operator::NotIn, Value::Array(coerce_many(value, property))),
            Comparator::Ne => match value {
                Json::Null => condition(Operator::IsNotNull, Value::Null),
                Json::Array(_) => {
                    condition(Operator::NotIn, Value::Array(coerce_many(value, property)))
                }
                _ => condition(Operator::Ne, coerce(value, property).value),
            },
            Comparator::Like | Comparator::Contains => {
                let text = self.generator.escape_like(&pattern_text(value)?);
                condition(Operator::Fuzzy, Value::String(format!("%{}%", text)))
            }
            Comparator::StartsWith => {
                let text = self.generator.escape_like(&pattern_text(value)?);
                condition(Operator::Fuzzy, Value::String(format!("{}%", text)))
            }
            Comparator::EndsWith => {
                let text = self.generator.escape_like(&pattern_text(value)?);
                condition(Operator::Fuzzy, Value::String(format!("%{}", text)))
            }
            Comparator::Exists => {
                if wants_existence(value) {
                    condition(Operator::IsNotNull, Value::Null)
                } else {
                    condition(Operator::IsNull, Value::Null)
                }
            }
            Comparator::Inside
            | Comparator::Near
            | Comparator::Radius
            | Comparator::Poly
            | Comparator::Geohash
            | Comparator::Box => self.unsupported(key, format!("geo comparator '{}'", comparator)),
            Comparator::Eq | Comparator::And | Comparator::Or => match value {
                Json::Null => condition(Operator::IsNull, Value::Null),
                Json::Array(_) => condition(Operator::In, Value::Array(coerce_many(value, property))),
                _ => condition(Operator::Eq, coerce(value, property).value),
            },
        }
    }

    fn array_filter(
        &self,
        key: &str,
        column: ColumnRef,
        property: &Property,
        comparator: Comparator,
        value: &Json,
    ) -> Option<Filter> {
        if !self.generator.supports_json_columns() {
            return self.unsupported(
                key,
                format!("array columns are not supported on {}", self.generator.name()),
            );
        }

        let op = match (comparator, value) {
            (Comparator::Eq, Json::Null) => Operator::IsNull,
            (Comparator::Ne, Json::Null) => Operator::IsNotNull,
            (Comparator::Exists, _) if wants_existence(value) => Operator::IsNotNull,
            (Comparator::Exists, _) => Operator::IsNull,
            (Comparator::Eq | Comparator::Contains | Comparator::Like, _) => Operator::ArrayContains,
            (Comparator::Ne, _) => Operator::ArrayNotContains,
            (Comparator::In, _) => Operator::ArrayOverlaps,
            (Comparator::Nin, _) => Operator::ArrayNotOverlaps,
            (other, _) => {
                return self.unsupported(key, format!("'{}' on an array column", other));
            }
        };

        let operand = if op.needs_value() {
            coerce(value, property).value
        } else {
            Value::Null
        };
        Some(Filter::Condition(Condition::new(column, op, operand)))
    }

    /// `meta.color` on an object column; values compare as text.
    fn json_path_filter(
        &self,
        key: &str,
        property: &Property,
        path: &str,
        comparator: Comparator,
        value: &Json,
    ) -> Option<Filter> {
        if !self.generator.supports_json_columns() {
            return self.unsupported(
                key,
                format!("JSON paths are not supported on {}", self.generator.name()),
            );
        }
        let segments: Vec<String> = path
            .split('.')
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();
        if segments.is_empty() {
            return None;
        }

        let column = ColumnRef::new(self.schema.table_name(), &property.column_name).with_path(segments);
        let text = Property::new(&property.column_name, PropertyType::String);
        self.scalar_filter(key, column, &text, comparator, value)
    }

    fn unsupported(&self, key: &str, reason: String) -> Option<Filter> {
        tracing::warn!(
            "Dropping clause '{}' on '{}': {}",
            key,
            self.schema.name(),
            reason
        );
        Some(Filter::Unsupported(Unsupported {
            property: key.to_string(),
            reason,
        }))
    }
}

/// Text of a pattern operand, decoded like any string value; `None` for
/// null or structured values.
fn pattern_text(value: &Json) -> Option<String> {
    match value {
        Json::Null | Json::Array(_) | Json::Object(_) => None,
        other => Some(coerce_text(other)),
    }
}
