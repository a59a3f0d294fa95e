use crate::transpiler::traits::{SqlGenerator, quote_with};

pub struct SqlServerGenerator;

impl Default for SqlServerGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl SqlServerGenerator {
    pub fn new() -> Self {
        Self
    }
}

impl SqlGenerator for SqlServerGenerator {
    fn name(&self) -> &'static str {
        "sqlserver"
    }

    fn quote_identifier(&self, name: &str) -> String {
        // QUOTED_IDENTIFIER is on by default for every modern client.
        quote_with(name, '"')
    }

    fn fuzzy_operator(&self) -> &str {
        "LIKE"
    }

    fn requires_order_for_offset(&self) -> bool {
        true
    }

    fn bool_literal(&self, val: bool) -> String {
        if val { "1".to_string() } else { "0".to_string() }
    }

    fn escape_like(&self, text: &str) -> String {
        // No default escape character; wildcards are bracketed instead.
        let mut out = String::with_capacity(text.len());
        for c in text.chars() {
            match c {
                '%' | '_' | '[' => {
                    out.push('[');
                    out.push(c);
                    out.push(']');
                }
                _ => out.push(c),
            }
        }
        out
    }

    fn limit_offset(&self, limit: Option<u64>, offset: Option<u64>) -> String {
        // T-SQL: OFFSET n ROWS FETCH NEXT m ROWS ONLY, valid only after ORDER BY.
        let mut sql = String::new();
        if limit.is_some() || offset.is_some() {
            sql.push_str(&format!(" OFFSET {} ROWS", offset.unwrap_or(0)));
            if let Some(lim) = limit {
                sql.push_str(&format!(" FETCH NEXT {} ROWS ONLY", lim));
            }
        }
        sql
    }
}
