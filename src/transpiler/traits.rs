//! Dialect capability trait.

/// Quote `name` with `quote`, doubling any embedded quote characters.
pub fn quote_with(name: &str, quote: char) -> String {
    let doubled: String = [quote, quote].iter().collect();
    format!("{q}{}{q}", name.replace(quote, &doubled), q = quote)
}

/// Per-backend syntax and capabilities. One implementation per dialect.
pub trait SqlGenerator: Send + Sync {
    /// Short backend name used in logs and unsupported markers.
    fn name(&self) -> &'static str;

    /// Quote an identifier (table or column name).
    fn quote_identifier(&self, name: &str) -> String;

    /// Get the case-insensitive pattern operator (ILIKE vs LIKE).
    fn fuzzy_operator(&self) -> &str;

    /// Whether OFFSET/FETCH is only valid after an ORDER BY.
    fn requires_order_for_offset(&self) -> bool {
        false
    }

    /// Whether array and JSON columns can be filtered natively.
    fn supports_json_columns(&self) -> bool {
        false
    }

    fn bool_literal(&self, val: bool) -> String {
        if val {
            "true".to_string()
        } else {
            "false".to_string()
        }
    }

    /// Render a string as a quoted, escaped SQL literal.
    fn string_literal(&self, s: &str) -> String {
        format!("'{}'", s.replace('\'', "''"))
    }

    fn limit_offset(&self, limit: Option<u64>, offset: Option<u64>) -> String {
        let mut sql = String::new();
        if let Some(n) = limit {
            sql.push_str(&format!(" LIMIT {}", n));
        }
        if let Some(n) = offset {
            sql.push_str(&format!(" OFFSET {}", n));
        }
        sql
    }

    /// Native array literal from already-rendered element literals.
    /// `None` when the backend has no array type.
    fn array_literal(&self, _items: &[String]) -> Option<String> {
        None
    }

    /// JSON access on an already-rendered column; the last step yields text.
    fn json_access(&self, col: &str, _path: &[String]) -> String {
        col.to_string()
    }

    /// Array contains-all expression.
    /// Default implementation returns Postgres-compatible `col @> value`.
    fn array_contains(&self, col: &str, value: &str) -> String {
        format!("{} @> {}", col, value)
    }

    /// Array overlap expression.
    /// Default implementation returns Postgres-compatible `col && value`.
    fn array_overlaps(&self, col: &str, value: &str) -> String {
        format!("{} && {}", col, value)
    }

    /// INSERT with no columns.
    fn empty_insert(&self, table: &str) -> String {
        format!("INSERT INTO {} DEFAULT VALUES", table)
    }

    /// Escape LIKE wildcards so `text` matches literally. Backslash is the
    /// default LIKE escape character.
    fn escape_like(&self, text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        for c in text.chars() {
            if matches!(c, '\\' | '%' | '_') {
                out.push('\\');
            }
            out.push(c);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_with_doubles_embedded_quotes() {
        assert_eq!(quote_with("users", '"'), "\"users\"");
        assert_eq!(quote_with("we\"ird", '"'), "\"we\"\"ird\"");
        assert_eq!(quote_with("a`b", '`'), "`a``b`");
    }

    struct Plain;

    impl SqlGenerator for Plain {
        fn name(&self) -> &'static str {
            "plain"
        }

        fn quote_identifier(&self, name: &str) -> String {
            quote_with(name, '"')
        }

        fn fuzzy_operator(&self) -> &str {
            "LIKE"
        }
    }

    #[test]
    fn test_default_like_escape() {
        assert_eq!(Plain.escape_like("100%_a\\b"), "100\\%\\_a\\\\b");
        assert_eq!(Plain.escape_like("plain"), "plain");
    }
}
