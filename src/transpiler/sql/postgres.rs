use crate::transpiler::traits::{SqlGenerator, quote_with};

pub struct PostgresGenerator;

impl Default for PostgresGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl PostgresGenerator {
    pub fn new() -> Self {
        Self
    }
}

impl SqlGenerator for PostgresGenerator {
    fn name(&self) -> &'static str {
        "postgres"
    }

    fn quote_identifier(&self, name: &str) -> String {
        quote_with(name, '"')
    }

    fn fuzzy_operator(&self) -> &str {
        "ILIKE"
    }

    fn supports_json_columns(&self) -> bool {
        true
    }

    fn array_literal(&self, items: &[String]) -> Option<String> {
        if items.is_empty() {
            // An untyped empty ARRAY[] is rejected; the literal adopts the column type.
            return Some("'{}'".to_string());
        }
        Some(format!("ARRAY[{}]", items.join(", ")))
    }

    fn json_access(&self, col: &str, path: &[String]) -> String {
        let mut sql = col.to_string();
        for (i, key) in path.iter().enumerate() {
            let is_last = i == path.len() - 1;
            // -> keeps json for intermediates, ->> yields text for comparison
            let op = if is_last { "->>" } else { "->" };
            sql.push_str(&format!("{}{}", op, self.string_literal(key)));
        }
        sql
    }
}
