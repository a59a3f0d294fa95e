use crate::transpiler::traits::{SqlGenerator, quote_with};

/// MySQL Generator.
pub struct MysqlGenerator;

impl Default for MysqlGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl MysqlGenerator {
    pub fn new() -> Self {
        Self
    }
}

impl SqlGenerator for MysqlGenerator {
    fn name(&self) -> &'static str {
        "mysql"
    }

    fn quote_identifier(&self, name: &str) -> String {
        quote_with(name, '`')
    }

    fn fuzzy_operator(&self) -> &str {
        // Case-insensitivity comes from the column collation.
        "LIKE"
    }

    fn string_literal(&self, s: &str) -> String {
        // Backslash is an escape character unless NO_BACKSLASH_ESCAPES is set.
        format!("'{}'", s.replace('\\', "\\\\").replace('\'', "''"))
    }

    fn limit_offset(&self, limit: Option<u64>, offset: Option<u64>) -> String {
        // OFFSET is only valid after LIMIT.
        match (limit, offset) {
            (Some(n), Some(m)) => format!(" LIMIT {} OFFSET {}", n, m),
            (Some(n), None) => format!(" LIMIT {}", n),
            (None, Some(m)) => format!(" LIMIT {} OFFSET {}", u64::MAX, m),
            (None, None) => String::new(),
        }
    }

    fn empty_insert(&self, table: &str) -> String {
        format!("INSERT INTO {} () VALUES ()", table)
    }
}
