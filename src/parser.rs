//! Query DSL parser.
//!
//! Normalizes an incoming query (a JSON object, or JSON text) into a
//! [`QuerySpec`]: selection, sort terms, paging and a predicate tree.
//!
//! # Shape
//!
//! ```text
//! {
//!   "select": "id,name",              comma-separated or a list
//!   "sort":   "createdAt desc,name",  comma-separated or a list
//!   "offset": 20, "limit": 10,        `skip` is an alias of `offset`
//!   "where":  { ... }                 optional, object or JSON text
//!   "name":   "Ada",                  implied eq
//!   "age":    {"gt": 21},             explicit comparator
//!   "or":     [{"a": 1}, [{"b": 2}, {"c": 3}]]
//! }
//! ```
//!
//! When `where` is present it holds every filter clause and the other
//! top-level property keys are ignored.

use nom::{
    IResult,
    bytes::complete::take_till1,
    character::complete::{alpha1, multispace0, multispace1},
    combinator::opt,
    sequence::{pair, preceded},
};
use percent_encoding::percent_decode_str;
use serde_json::{Map, Value as Json};

use crate::ast::*;
use crate::coerce::parse_int_prefix;
use crate::error::{JsqlError, JsqlResult};

/// Keys that configure the query instead of filtering it.
pub const RESERVED_KEYS: [&str; 7] = ["select", "sort", "skip", "offset", "limit", "join", "count"];

/// Parse a query given as a JSON value. A JSON string is parsed as JSON text.
pub fn parse_query(raw: &Json) -> JsqlResult<QuerySpec> {
    match raw {
        Json::Null => Ok(QuerySpec::default()),
        Json::String(text) => parse_query_str(text),
        Json::Object(map) => parse_query_map(map),
        other => Err(JsqlError::parse(
            "query",
            format!("expected an object, found {}", json_kind(other)),
        )),
    }
}

/// Parse a query given as JSON text. Blank text is an empty query.
pub fn parse_query_str(text: &str) -> JsqlResult<QuerySpec> {
    if text.trim().is_empty() {
        return Ok(QuerySpec::default());
    }
    let value: Json =
        serde_json::from_str(text).map_err(|e| JsqlError::parse("query", e.to_string()))?;
    match value {
        Json::Object(map) => parse_query_map(&map),
        other => Err(JsqlError::parse(
            "query",
            format!("expected an object, found {}", json_kind(&other)),
        )),
    }
}

fn parse_query_map(map: &Map<String, Json>) -> JsqlResult<QuerySpec> {
    let mut spec = QuerySpec::default();

    for (key, value) in map {
        if is_blank(value) {
            continue;
        }
        match key.as_str() {
            "select" => spec.select = parse_select(value),
            "sort" => spec.sort = parse_sort(value),
            "skip" | "offset" => spec.page.offset = parse_page_value(value),
            "limit" => spec.page.limit = parse_page_value(value),
            _ => {}
        }
    }

    let clauses = match map.get("where") {
        Some(where_value) if !is_blank(where_value) && !where_value.is_null() => {
            parse_where(where_value)?
        }
        _ => map.clone(),
    };
    spec.filter = parse_filter(&clauses);

    Ok(spec)
}

fn parse_where(value: &Json) -> JsqlResult<Map<String, Json>> {
    let parsed = match value {
        Json::String(text) => {
            serde_json::from_str(text).map_err(|e| JsqlError::parse("where", e.to_string()))?
        }
        other => other.clone(),
    };
    match parsed {
        Json::Object(map) => Ok(map),
        Json::Null => Ok(Map::new()),
        other => Err(JsqlError::parse(
            "where",
            format!("expected an object, found {}", json_kind(&other)),
        )),
    }
}

/// Parse every filter clause of a mapping, skipping reserved keys.
pub fn parse_filter(clauses: &Map<String, Json>) -> Vec<PredicateNode> {
    clauses
        .iter()
        .filter(|(key, _)| key.as_str() != "where" && !RESERVED_KEYS.contains(&key.as_str()))
        .filter_map(|(key, value)| parse_clause(key, value))
        .collect()
}

/// Parse one `key: value` clause.
pub fn parse_clause(key: &str, value: &Json) -> Option<PredicateNode> {
    if is_blank(value) {
        return None;
    }
    if let Some(kind) = Comparator::parse(key).and_then(|c| c.logical()) {
        return parse_group(kind, value);
    }

    match value {
        Json::Object(inner) => {
            let (name, inner_value) = inner.iter().next()?;
            let comparator = Comparator::from_name(name);
            match comparator.logical() {
                Some(kind) => parse_group(kind, inner_value),
                None => Some(PredicateNode::comparison(key, comparator, inner_value.clone())),
            }
        }
        other => Some(PredicateNode::comparison(key, Comparator::Eq, other.clone())),
    }
}

/// Children of an `and`/`or` group. Nested arrays AND-combine; a multi-key
/// object element AND-combines its clauses.
fn parse_group(kind: LogicalOp, value: &Json) -> Option<PredicateNode> {
    let children: Vec<PredicateNode> = match value {
        Json::Array(elements) => elements.iter().filter_map(parse_group_element).collect(),
        Json::Object(map) => parse_filter(map),
        _ => return None,
    };
    if children.is_empty() {
        return None;
    }
    Some(PredicateNode::logical(kind, children))
}

fn parse_group_element(element: &Json) -> Option<PredicateNode> {
    match element {
        Json::Array(_) => parse_group(LogicalOp::And, element),
        Json::Object(map) => {
            let mut clauses = parse_filter(map);
            match clauses.len() {
                0 => None,
                1 => clauses.pop(),
                _ => Some(PredicateNode::logical(LogicalOp::And, clauses)),
            }
        }
        _ => None,
    }
}

fn parse_select(value: &Json) -> Vec<String> {
    list_items(value)
        .into_iter()
        .map(|item| decode(&item).trim().to_string())
        .filter(|item| !item.is_empty())
        .collect()
}

/// `name` followed by an optional direction word.
fn sort_term(input: &str) -> IResult<&str, (&str, Option<&str>)> {
    preceded(
        multispace0,
        pair(
            take_till1(|c: char| c.is_whitespace()),
            opt(preceded(multispace1, alpha1)),
        ),
    )(input)
}

/// Parse `"name desc, other"` sort text.
pub fn parse_sort_terms(text: &str) -> Vec<SortTerm> {
    parse_sort(&Json::String(text.to_string()))
}

fn parse_sort(value: &Json) -> Vec<SortTerm> {
    list_items(value)
        .iter()
        .filter_map(|item| {
            let decoded = decode(item);
            let (_, (property, direction)) = sort_term(&decoded).ok()?;
            Some(SortTerm::new(
                property,
                direction.map(SortOrder::from_word).unwrap_or_default(),
            ))
        })
        .collect()
}

/// Leading-integer semantics; negative or non-numeric values are ignored.
fn parse_page_value(value: &Json) -> Option<u64> {
    let n = match value {
        Json::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64)),
        Json::String(s) => parse_int_prefix(&decode(s)),
        _ => None,
    }?;
    u64::try_from(n).ok()
}

/// A list, or the comma-separated pieces of a string.
fn list_items(value: &Json) -> Vec<String> {
    match value {
        Json::String(s) => s.split(',').map(str::to_string).collect(),
        Json::Array(items) => items
            .iter()
            .filter_map(|item| item.as_str().map(str::to_string))
            .collect(),
        _ => Vec::new(),
    }
}

fn decode(s: &str) -> String {
    percent_decode_str(s)
        .decode_utf8()
        .map(|cow| cow.into_owned())
        .unwrap_or_else(|_| s.to_string())
}

fn is_blank(value: &Json) -> bool {
    matches!(value, Json::String(s) if s.is_empty())
}

fn json_kind(value: &Json) -> &'static str {
    match value {
        Json::Null => "null",
        Json::Bool(_) => "a boolean",
        Json::Number(_) => "a number",
        Json::String(_) => "a string",
        Json::Array(_) => "an array",
        Json::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_implied_and_explicit_comparators() {
        let spec = parse_query(&json!({"name": "Ada", "age": {"gt": 21}, "x": {"bogus": 1}})).unwrap();
        assert_eq!(
            spec.filter,
            vec![
                PredicateNode::comparison("name", Comparator::Eq, json!("Ada")),
                PredicateNode::comparison("age", Comparator::Gt, json!(21)),
                PredicateNode::comparison("x", Comparator::Eq, json!(1)),
            ]
        );
    }

    #[test]
    fn test_reserved_and_blank_keys_are_skipped() {
        let spec = parse_query(&json!({
            "select": "id", "sort": "id", "limit": 1, "join": "x", "count": true, "name": ""
        }))
        .unwrap();
        assert!(spec.filter.is_empty());
    }

    #[test]
    fn test_or_group() {
        let spec = parse_query(&json!({"or": [{"a": 1}, {"b": {"gt": 2}}]})).unwrap();
        assert_eq!(spec.filter.len(), 1);
        assert_eq!(spec.filter[0].to_string(), "(a eq 1 OR b gt 2)");
    }

    #[test]
    fn test_nested_arrays_and_combine() {
        let spec = parse_query(&json!({"or": [[{"a": 1}, {"b": 2}], [{"c": 3}]]})).unwrap();
        assert_eq!(spec.filter[0].to_string(), "((a eq 1 AND b eq 2) OR (c eq 3))");
    }

    #[test]
    fn test_multi_key_element_and_combines() {
        let spec = parse_query(&json!({"or": [{"a": 1, "b": 2}, {"c": 3}]})).unwrap();
        assert_eq!(spec.filter[0].to_string(), "((a eq 1 AND b eq 2) OR c eq 3)");
    }

    #[test]
    fn test_inner_logical_comparator() {
        let spec = parse_query(&json!({"name": {"or": [{"a": 1}, {"b": 2}]}})).unwrap();
        assert_eq!(spec.filter[0].to_string(), "(a eq 1 OR b eq 2)");
    }

    #[test]
    fn test_empty_groups_are_dropped() {
        let spec = parse_query(&json!({"and": [], "or": [[]], "p": {}})).unwrap();
        assert!(spec.filter.is_empty());
    }

    #[test]
    fn test_where_string_replaces_top_level_clauses() {
        let spec = parse_query(&json!({"ignored": 1, "where": "{\"a\": {\"lt\": 5}}", "limit": "10"}))
            .unwrap();
        assert_eq!(
            spec.filter,
            vec![PredicateNode::comparison("a", Comparator::Lt, json!(5))]
        );
        assert_eq!(spec.page.limit, Some(10));
    }

    #[test]
    fn test_null_or_blank_where_falls_back_to_top_level_clauses() {
        for where_value in [Json::Null, json!("")] {
            let spec = parse_query(&json!({"where": where_value, "age": 5})).unwrap();
            assert_eq!(
                spec.filter,
                vec![PredicateNode::comparison("age", Comparator::Eq, json!(5))]
            );
        }
    }

    #[test]
    fn test_malformed_where_is_parse_error() {
        let err = parse_query(&json!({"where": "{nope"})).unwrap_err();
        assert!(matches!(err, JsqlError::Parse { context: "where", .. }));
    }

    #[test]
    fn test_query_as_json_text() {
        let spec = parse_query(&json!("{\"select\": [\"id\", \"name\"], \"offset\": \"5\"}")).unwrap();
        assert_eq!(spec.select, vec!["id", "name"]);
        assert_eq!(spec.page.offset, Some(5));
        assert!(parse_query(&json!("[1, 2]")).is_err());
        assert!(parse_query(&json!("not json")).is_err());
    }

    #[test]
    fn test_sort_terms() {
        let spec = parse_query(&json!({"sort": "createdAt DESC, name,%20id%20asc"})).unwrap();
        assert_eq!(
            spec.sort,
            vec![
                SortTerm::new("createdAt", SortOrder::Desc),
                SortTerm::new("name", SortOrder::Asc),
                SortTerm::new("id", SortOrder::Asc),
            ]
        );

        let spec = parse_query(&json!({"sort": ["a desc", ""]})).unwrap();
        assert_eq!(spec.sort, vec![SortTerm::new("a", SortOrder::Desc)]);
    }

    #[test]
    fn test_paging_uses_leading_integer() {
        let spec = parse_query(&json!({"skip": "20abc", "limit": 2.9})).unwrap();
        assert_eq!(spec.page.offset, Some(20));
        assert_eq!(spec.page.limit, Some(2));

        let spec = parse_query(&json!({"offset": -1, "limit": "ten"})).unwrap();
        assert!(!spec.page.is_paged());
    }
}
