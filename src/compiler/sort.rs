//! Default sort key resolution.

use convert_case::{Case, Casing};

use crate::schema::{ModelSchema, PropertyType};

const SORTABLE_SUFFIXES: [&str; 3] = ["id", "number", "date"];

/// Pick a property to order by when the caller gave no sort.
///
/// In declaration order: the first `date`/`date-time` property, then the first
/// non-key property whose column ends in `id`, `number` or `date`, then a
/// scalar primary key, then the first property.
pub fn default_sort_key(schema: &ModelSchema) -> &str {
    if let Some((name, _)) = schema.properties().find(|(_, p)| p.is_temporal()) {
        return name;
    }

    let primary_key = schema.primary_key();
    let by_suffix = schema
        .properties()
        .filter(|(name, _)| *name != primary_key)
        .find(|(_, p)| last_word(&p.column_name).is_some_and(|w| SORTABLE_SUFFIXES.contains(&w.as_str())));
    if let Some((name, _)) = by_suffix {
        return name;
    }

    if let Some(key) = schema.declared_primary_key() {
        let scalar = schema
            .property(key)
            .is_some_and(|p| p.kind.is_numeric() || p.kind == PropertyType::String);
        if scalar {
            return key;
        }
    }

    primary_key
}

/// Last word of a column name, lowercased: `customerID` and `customer_id` both end in `id`.
fn last_word(column: &str) -> Option<String> {
    column
        .to_case(Case::Snake)
        .rsplit('_')
        .find(|w| !w.is_empty())
        .map(str::to_ascii_lowercase)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Property;

    fn schema(props: &[(&str, Property)]) -> ModelSchema {
        ModelSchema::new(
            "m",
            "m",
            props.iter().map(|(n, p)| (n.to_string(), p.clone())).collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_temporal_property_wins() {
        let s = schema(&[
            ("id", Property::new("id", PropertyType::String).with_format("uuid")),
            ("name", Property::new("name", PropertyType::String)),
            (
                "createdAt",
                Property::new("created_at", PropertyType::String).with_format("date-time"),
            ),
        ])
        .with_primary_key("id");
        assert_eq!(default_sort_key(&s), "createdAt");
    }

    #[test]
    fn test_column_suffix() {
        let s = schema(&[
            ("id", Property::new("id", PropertyType::Object)),
            ("label", Property::new("label", PropertyType::String)),
            ("order", Property::new("orderNumber", PropertyType::Integer)),
        ])
        .with_primary_key("id");
        assert_eq!(default_sort_key(&s), "order");
    }

    #[test]
    fn test_scalar_primary_key() {
        let s = schema(&[
            ("label", Property::new("label", PropertyType::String)),
            ("code", Property::new("code", PropertyType::String)),
        ])
        .with_primary_key("code");
        assert_eq!(default_sort_key(&s), "code");
    }

    #[test]
    fn test_first_property_fallback() {
        let s = schema(&[
            ("label", Property::new("label", PropertyType::String)),
            ("flag", Property::new("flag", PropertyType::Boolean)),
        ]);
        assert_eq!(default_sort_key(&s), "label");
    }

    #[test]
    fn test_last_word() {
        assert_eq!(last_word("customerID").as_deref(), Some("id"));
        assert_eq!(last_word("ship_date").as_deref(), Some("date"));
        assert_eq!(last_word("label").as_deref(), Some("label"));
    }
}
