//! Model schemas and the registry that resolves them.
//!
//! A schema is a JSON-Schema-shaped document describing one model:
//!
//! ```json
//! {
//!   "title": "User",
//!   "tableName": "users",
//!   "primaryKey": "id",
//!   "properties": {
//!     "id": { "type": "string", "format": "uuid", "columnName": "id" },
//!     "firstName": { "type": "string", "columnName": "first_name" }
//!   },
//!   "required": ["firstName"],
//!   "relations": {
//!     "posts": { "model": "Post", "join": { "from": "id", "to": "authorId" } }
//!   }
//! }
//! ```
//!
//! Schemas are validated once when built and are read-only afterwards.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use serde::de::{self, Deserializer, MapAccess, Visitor};
use serde::{Deserialize, Serialize};

use crate::error::{JsqlError, JsqlResult};

/// Declared JSON Schema type of a property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "RawType")]
pub enum PropertyType {
    String,
    Number,
    Integer,
    Boolean,
    Object,
    Array,
}

impl PropertyType {
    pub fn is_numeric(&self) -> bool {
        matches!(self, PropertyType::Number | PropertyType::Integer)
    }
}

impl std::str::FromStr for PropertyType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "string" => Ok(PropertyType::String),
            "number" | "decimal" => Ok(PropertyType::Number),
            "integer" | "int" => Ok(PropertyType::Integer),
            "boolean" => Ok(PropertyType::Boolean),
            "object" => Ok(PropertyType::Object),
            "array" => Ok(PropertyType::Array),
            other => Err(format!("unsupported property type '{}'", other)),
        }
    }
}

/// `type` as written in JSON Schema: a single name or a list such as `["string", "null"]`.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawType {
    One(String),
    Many(Vec<String>),
}

impl TryFrom<RawType> for PropertyType {
    type Error = String;

    fn try_from(raw: RawType) -> Result<Self, Self::Error> {
        match raw {
            RawType::One(name) => name.parse(),
            RawType::Many(names) => names
                .iter()
                .find(|n| n.as_str() != "null")
                .ok_or_else(|| "type list has no non-null type".to_string())?
                .parse(),
        }
    }
}

/// Element schema of an array property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemSchema {
    #[serde(rename = "type")]
    pub kind: PropertyType,
    #[serde(default)]
    pub format: Option<String>,
}

/// A single model property mapped to one storage column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    #[serde(default)]
    pub column_name: String,
    #[serde(rename = "type")]
    pub kind: PropertyType,
    #[serde(default)]
    pub format: Option<String>,
    #[serde(default)]
    pub items: Option<ItemSchema>,
    #[serde(skip)]
    pub required: bool,
}

impl Property {
    pub fn new(column_name: impl Into<String>, kind: PropertyType) -> Self {
        Self {
            column_name: column_name.into(),
            kind,
            format: None,
            items: None,
            required: false,
        }
    }

    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    pub fn format_is(&self, format: &str) -> bool {
        self.format.as_deref() == Some(format)
    }

    /// `date` or `date-time` formatted.
    pub fn is_temporal(&self) -> bool {
        self.format_is("date") || self.format_is("date-time")
    }

    /// The property describing one element of an array column.
    /// Elements without a declared `items` schema are strings.
    pub fn item_property(&self) -> Property {
        let (kind, format) = match &self.items {
            Some(items) => (items.kind, items.format.clone()),
            None => (PropertyType::String, None),
        };
        Property {
            column_name: self.column_name.clone(),
            kind,
            format,
            items: None,
            required: false,
        }
    }
}

/// Join columns between two models, named by property.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Join {
    pub from: String,
    pub to: String,
}

/// A declared reference from this model to another.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawRelation")]
pub struct Relation {
    pub target_model: String,
    pub join_from: String,
    pub join_to: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawRelation {
    Nested {
        model: String,
        join: Join,
    },
    #[serde(rename_all = "camelCase")]
    Flat {
        target_model: String,
        join_from: String,
        join_to: String,
    },
}

impl From<RawRelation> for Relation {
    fn from(raw: RawRelation) -> Self {
        match raw {
            RawRelation::Nested { model, join } => Relation {
                target_model: model,
                join_from: join.from,
                join_to: join.to,
            },
            RawRelation::Flat {
                target_model,
                join_from,
                join_to,
            } => Relation {
                target_model,
                join_from,
                join_to,
            },
        }
    }
}

/// Properties in declaration order.
struct PropertyList(Vec<(String, Property)>);

impl<'de> Deserialize<'de> for PropertyList {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ListVisitor;

        impl<'de> Visitor<'de> for ListVisitor {
            type Value = PropertyList;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of property definitions")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<PropertyList, A::Error> {
                let mut properties = Vec::new();
                while let Some((name, property)) = map.next_entry::<String, Property>()? {
                    if properties.iter().any(|(n, _)| n == &name) {
                        return Err(de::Error::custom(format!("duplicate property '{}'", name)));
                    }
                    properties.push((name, property));
                }
                Ok(PropertyList(properties))
            }
        }

        deserializer.deserialize_map(ListVisitor)
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawModelSchema {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    table_name: String,
    #[serde(default)]
    primary_key: Option<String>,
    #[serde(default)]
    properties: Option<PropertyList>,
    #[serde(default)]
    required: Vec<String>,
    #[serde(default)]
    relations: HashMap<String, Relation>,
    #[serde(default)]
    default_sort: Option<String>,
}

/// Immutable metadata for one model.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelSchema {
    name: String,
    table_name: String,
    primary_key: Option<String>,
    properties: Vec<(String, Property)>,
    required: Vec<String>,
    relations: HashMap<String, Relation>,
    default_sort: Option<String>,
}

impl<'de> Deserialize<'de> for ModelSchema {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = RawModelSchema::deserialize(deserializer)?;
        ModelSchema::from_raw(raw).map_err(de::Error::custom)
    }
}

impl ModelSchema {
    /// Build and validate a schema from its parts.
    pub fn new(
        name: impl Into<String>,
        table_name: impl Into<String>,
        properties: Vec<(String, Property)>,
    ) -> JsqlResult<Self> {
        let name = name.into();
        let table_name = table_name.into();
        let schema = Self {
            name,
            table_name,
            primary_key: None,
            properties,
            required: Vec::new(),
            relations: HashMap::new(),
            default_sort: None,
        };
        schema.validated()
    }

    /// Parse and validate a schema from a JSON value.
    pub fn from_value(value: serde_json::Value) -> JsqlResult<Self> {
        Ok(serde_json::from_value(value)?)
    }

    /// Parse and validate a schema from JSON text.
    pub fn from_json_str(json: &str) -> JsqlResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    fn from_raw(raw: RawModelSchema) -> JsqlResult<Self> {
        let name = raw
            .name
            .or(raw.title)
            .unwrap_or_else(|| raw.table_name.clone());
        let properties = match raw.properties {
            Some(PropertyList(list)) => list,
            None => {
                return Err(JsqlError::schema(name, "no properties declared"));
            }
        };
        let schema = Self {
            name,
            table_name: raw.table_name,
            primary_key: raw.primary_key,
            properties,
            required: raw.required,
            relations: raw.relations,
            default_sort: raw.default_sort,
        };
        schema.validated()
    }

    pub fn with_primary_key(mut self, key: impl Into<String>) -> Self {
        self.primary_key = Some(key.into());
        self
    }

    pub fn with_required(mut self, required: &[&str]) -> Self {
        self.required = required.iter().map(|s| s.to_string()).collect();
        self.mark_required();
        self
    }

    pub fn with_relation(mut self, name: impl Into<String>, relation: Relation) -> Self {
        self.relations.insert(name.into(), relation);
        self
    }

    pub fn with_default_sort(mut self, sort: impl Into<String>) -> Self {
        self.default_sort = Some(sort.into());
        self
    }

    fn validated(mut self) -> JsqlResult<Self> {
        if self.table_name.trim().is_empty() {
            return Err(JsqlError::schema(&self.name, "no tableName declared"));
        }
        if self.properties.is_empty() {
            return Err(JsqlError::schema(&self.name, "no properties declared"));
        }

        let mut columns = HashSet::new();
        for (name, property) in self.properties.iter_mut() {
            if property.column_name.is_empty() {
                property.column_name = name.clone();
            }
            if !columns.insert(property.column_name.clone()) {
                return Err(JsqlError::schema(
                    &self.name,
                    format!("column '{}' is mapped more than once", property.column_name),
                ));
            }
        }

        self.mark_required();
        Ok(self)
    }

    fn mark_required(&mut self) {
        for (name, property) in self.properties.iter_mut() {
            property.required = self.required.iter().any(|r| r == name);
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    pub fn property(&self, name: &str) -> Option<&Property> {
        self.properties
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, p)| p)
    }

    /// Properties in declaration order.
    pub fn properties(&self) -> impl Iterator<Item = (&str, &Property)> {
        self.properties.iter().map(|(n, p)| (n.as_str(), p))
    }

    pub fn required(&self) -> &[String] {
        &self.required
    }

    pub fn relation(&self, name: &str) -> Option<&Relation> {
        self.relations.get(name)
    }

    pub fn relations(&self) -> &HashMap<String, Relation> {
        &self.relations
    }

    pub fn default_sort(&self) -> Option<&str> {
        self.default_sort.as_deref()
    }

    /// The declared primary key, if it names a declared property.
    pub fn declared_primary_key(&self) -> Option<&str> {
        self.primary_key
            .as_deref()
            .filter(|key| self.property(key).is_some())
    }

    /// The primary key, falling back to the first declared property
    /// (views and legacy tables often have none).
    pub fn primary_key(&self) -> &str {
        match self.declared_primary_key() {
            Some(key) => key,
            None => self.properties[0].0.as_str(),
        }
    }
}

/// Read-only lookup of model schemas by model name or table name.
#[derive(Debug, Default, Clone)]
pub struct SchemaRegistry {
    models: HashMap<String, Arc<ModelSchema>>,
    tables: HashMap<String, String>,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a schema, replacing any model registered under the same name.
    pub fn register(&mut self, schema: ModelSchema) {
        tracing::debug!("Registered model '{}' (table '{}')", schema.name(), schema.table_name());
        self.tables
            .insert(schema.table_name().to_string(), schema.name().to_string());
        self.models
            .insert(schema.name().to_string(), Arc::new(schema));
    }

    pub fn with(mut self, schema: ModelSchema) -> Self {
        self.register(schema);
        self
    }

    /// Resolve a model by name, or by table name when no model has that name.
    pub fn get(&self, name: &str) -> Option<Arc<ModelSchema>> {
        self.models.get(name).cloned().or_else(|| {
            self.tables
                .get(name)
                .and_then(|model| self.models.get(model))
                .cloned()
        })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Model names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.models.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    /// Load schemas from a JSON file (one schema or an array of schemas)
    /// or from every `*.json` file in a directory.
    pub fn load_path(path: impl AsRef<Path>) -> JsqlResult<Self> {
        let path = path.as_ref();
        let mut registry = Self::new();

        if path.is_dir() {
            let mut files: Vec<_> = fs::read_dir(path)?
                .filter_map(|entry| entry.ok().map(|e| e.path()))
                .filter(|p| p.extension().is_some_and(|ext| ext == "json"))
                .collect();
            files.sort();
            for file in files {
                registry.load_file(&file)?;
            }
        } else {
            registry.load_file(path)?;
        }

        tracing::info!("Loaded {} model schemas from {}", registry.len(), path.display());
        Ok(registry)
    }

    fn load_file(&mut self, path: &Path) -> JsqlResult<()> {
        let content = fs::read_to_string(path)
            .map_err(|e| JsqlError::Config(format!("Failed to read schema {}: {}", path.display(), e)))?;
        let value: serde_json::Value = serde_json::from_str(&content)?;

        let documents = match value {
            serde_json::Value::Array(items) => items,
            other => vec![other],
        };
        for document in documents {
            let schema = ModelSchema::from_value(document).map_err(|e| {
                JsqlError::Config(format!("Invalid schema in {}: {}", path.display(), e))
            })?;
            self.register(schema);
        }
        Ok(())
    }
}
