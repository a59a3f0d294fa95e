//! Type coercion of raw input values.
//!
//! Incoming values are mostly strings (query-string transport). Each one is
//! converted into the type its [`Property`] declares before it can reach SQL.
//! Unusable input becomes [`Value::Null`] with [`Coerced::malformed`] set, so
//! filtering degrades gracefully while callers can still detect bad input.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use nom::{
    IResult,
    branch::alt,
    character::complete::{char, digit0, digit1, multispace0, one_of},
    combinator::{opt, recognize},
    sequence::{pair, preceded, tuple},
};
use percent_encoding::percent_decode_str;
use serde_json::Value as Json;

use crate::ast::Value;
use crate::schema::{Property, PropertyType};

/// Output format for timestamps.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Result of coercing one raw value.
#[derive(Debug, Clone, PartialEq)]
pub struct Coerced {
    pub value: Value,
    /// Input was present but could not be converted.
    pub malformed: bool,
}

impl Coerced {
    fn ok(value: Value) -> Self {
        Self {
            value,
            malformed: false,
        }
    }

    fn malformed() -> Self {
        Self {
            value: Value::Null,
            malformed: true,
        }
    }
}

/// Coerce `raw` into the type declared by `property`.
///
/// JSON `null` is always [`Value::Null`] and never malformed.
pub fn coerce(raw: &Json, property: &Property) -> Coerced {
    if raw.is_null() {
        return Coerced::ok(Value::Null);
    }

    let coerced = match property.kind {
        PropertyType::Integer => coerce_integer(raw),
        PropertyType::Number => coerce_number(raw),
        PropertyType::Boolean => Coerced::ok(Value::Bool(is_loosely_true(raw))),
        PropertyType::String if property.format_is("date-time") => coerce_timestamp(raw),
        PropertyType::String => Coerced::ok(Value::String(coerce_text(raw))),
        PropertyType::Object => coerce_object(raw),
        PropertyType::Array => coerce_array(raw, property),
    };

    if coerced.malformed {
        tracing::debug!(
            "Could not coerce {} into {:?} for column '{}'",
            raw,
            property.kind,
            property.column_name
        );
    }
    coerced
}

/// Coerce a list (native array or comma-separated string) element by element,
/// dropping every falsy result (null, false, zero, empty string).
pub fn coerce_many(raw: &Json, property: &Property) -> Vec<Value> {
    let element = match property.kind {
        PropertyType::Array => property.item_property(),
        _ => property.clone(),
    };

    split_list(raw)
        .iter()
        .map(|item| coerce(item, &element).value)
        .filter(Value::is_truthy)
        .collect()
}

/// A native array, the pieces of a comma-separated string, or a single scalar.
pub(crate) fn split_list(raw: &Json) -> Vec<Json> {
    match raw {
        Json::Array(items) => items.clone(),
        Json::String(s) if s.is_empty() => Vec::new(),
        Json::String(s) => s.split(',').map(|p| Json::String(p.to_string())).collect(),
        Json::Null => Vec::new(),
        other => vec![other.clone()],
    }
}

/// Loose equality against `"1"` and `"true"`.
pub fn is_loosely_true(raw: &Json) -> bool {
    match raw {
        Json::Bool(b) => *b,
        Json::Number(n) => n.as_f64() == Some(1.0),
        Json::String(s) => s == "1" || s == "true",
        _ => false,
    }
}

fn int_prefix(input: &str) -> IResult<&str, &str> {
    preceded(multispace0, recognize(pair(opt(one_of("+-")), digit1)))(input)
}

fn float_prefix(input: &str) -> IResult<&str, &str> {
    preceded(
        multispace0,
        recognize(tuple((
            opt(one_of("+-")),
            alt((
                recognize(pair(digit1, opt(pair(char('.'), digit0)))),
                recognize(pair(char('.'), digit1)),
            )),
            opt(tuple((one_of("eE"), opt(one_of("+-")), digit1))),
        ))),
    )(input)
}

/// Leading integer of `s`, ignoring any trailing text: `"12abc"` is 12.
pub fn parse_int_prefix(s: &str) -> Option<i64> {
    let (_, digits) = int_prefix(s).ok()?;
    digits.parse().ok()
}

/// Leading float of `s`, ignoring any trailing text: `"3.5kg"` is 3.5.
pub fn parse_float_prefix(s: &str) -> Option<f64> {
    let (_, number) = float_prefix(s).ok()?;
    number.parse().ok()
}

fn coerce_integer(raw: &Json) -> Coerced {
    let parsed = match raw {
        Json::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64)),
        Json::String(s) => parse_int_prefix(s),
        _ => None,
    };
    match parsed {
        Some(n) => Coerced::ok(Value::Int(n)),
        None => Coerced::malformed(),
    }
}

fn coerce_number(raw: &Json) -> Coerced {
    let parsed = match raw {
        Json::Number(n) => n.as_f64(),
        Json::String(s) => parse_float_prefix(s),
        _ => None,
    };
    match parsed.filter(|f| f.is_finite()) {
        Some(n) => Coerced::ok(Value::Float(n)),
        None => Coerced::malformed(),
    }
}

fn coerce_timestamp(raw: &Json) -> Coerced {
    let parsed = match raw {
        Json::Number(n) => n.as_i64().and_then(DateTime::<Utc>::from_timestamp_millis),
        Json::String(s) => parse_timestamp(s.trim()),
        _ => None,
    };
    match parsed {
        Some(ts) => Coerced::ok(Value::Timestamp(ts.format(TIMESTAMP_FORMAT).to_string())),
        None => Coerced::malformed(),
    }
}

/// Shortest digit string read as epoch milliseconds (2001-09-09).
const EPOCH_MILLIS_MIN_DIGITS: usize = 10;

/// RFC 3339, naive date-time (read as UTC), bare date, year-month, year, or
/// epoch milliseconds.
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(s) {
        return Some(ts.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(naive.and_utc());
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|naive| naive.and_utc());
    }
    if let Ok(date) = NaiveDate::parse_from_str(&format!("{}-01", s), "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|naive| naive.and_utc());
    }
    if !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    match s.len() {
        4 => s
            .parse()
            .ok()
            .and_then(|year| NaiveDate::from_ymd_opt(year, 1, 1))
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .map(|naive| naive.and_utc()),
        n if n >= EPOCH_MILLIS_MIN_DIGITS => {
            s.parse().ok().and_then(DateTime::<Utc>::from_timestamp_millis)
        }
        _ => None,
    }
}

/// Percent-decode then trim. Text that does not decode to UTF-8 is kept as is.
pub(crate) fn coerce_text(raw: &Json) -> String {
    match raw {
        Json::String(s) => {
            let decoded = percent_decode_str(s)
                .decode_utf8()
                .map(|cow| cow.into_owned())
                .unwrap_or_else(|_| s.clone());
            decoded.trim().to_string()
        }
        other => other.to_string(),
    }
}

fn coerce_object(raw: &Json) -> Coerced {
    match raw {
        Json::String(s) => Coerced::ok(Value::Json(s.clone())),
        other => match serde_json::to_string(other) {
            Ok(text) => Coerced::ok(Value::Json(text)),
            Err(_) => Coerced::malformed(),
        },
    }
}

fn coerce_array(raw: &Json, property: &Property) -> Coerced {
    let element = property.item_property();
    let mut malformed = false;
    let mut items = Vec::new();

    for item in split_list(raw) {
        let coerced = coerce(&item, &element);
        malformed |= coerced.malformed;
        if !coerced.value.is_null() {
            items.push(coerced.value);
        }
    }

    Coerced {
        value: Value::Array(items),
        malformed,
    }
}
