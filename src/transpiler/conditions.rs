use super::traits::SqlGenerator;
use crate::ast::*;

/// `"table"."column"`, followed by a JSON path when present.
pub fn render_column(column: &ColumnRef, generator: &dyn SqlGenerator) -> String {
    let qualified = format!(
        "{}.{}",
        generator.quote_identifier(&column.table),
        generator.quote_identifier(&column.column)
    );
    if column.json_path.is_empty() {
        qualified
    } else {
        generator.json_access(&qualified, &column.json_path)
    }
}

/// Render a value as an escaped SQL literal.
pub fn render_value(value: &Value, generator: &dyn SqlGenerator) -> String {
    match value {
        Value::Null => "NULL".to_string(),
        Value::Bool(b) => generator.bool_literal(*b),
        Value::Int(n) => n.to_string(),
        Value::Float(n) if n.is_finite() => n.to_string(),
        Value::Float(_) => "NULL".to_string(),
        Value::String(s) | Value::Timestamp(s) | Value::Json(s) => generator.string_literal(s),
        Value::Uuid(u) => generator.string_literal(&u.to_string()),
        Value::Array(items) => render_array(items, generator),
    }
}

/// Native array literal, or JSON text where the backend has no arrays.
fn render_array(items: &[Value], generator: &dyn SqlGenerator) -> String {
    let rendered: Vec<String> = items.iter().map(|v| render_value(v, generator)).collect();
    generator.array_literal(&rendered).unwrap_or_else(|| {
        let json = serde_json::Value::Array(items.iter().map(|v| v.to_json()).collect());
        generator.string_literal(&json.to_string())
    })
}

fn render_list(value: &Value, generator: &dyn SqlGenerator) -> Vec<String> {
    match value {
        Value::Array(items) => items.iter().map(|v| render_value(v, generator)).collect(),
        other => vec![render_value(other, generator)],
    }
}

pub trait FilterToSql {
    /// Render this predicate, or `None` when it contributes no SQL.
    fn to_sql(&self, generator: &dyn SqlGenerator) -> Option<String>;
}

impl FilterToSql for Condition {
    fn to_sql(&self, generator: &dyn SqlGenerator) -> Option<String> {
        let col = render_column(&self.column, generator);

        let sql = match self.op {
            Operator::Eq
            | Operator::Ne
            | Operator::Gt
            | Operator::Gte
            | Operator::Lt
            | Operator::Lte => format!(
                "{} {} {}",
                col,
                self.op.sql_symbol(),
                render_value(&self.value, generator)
            ),
            Operator::In | Operator::NotIn => {
                let items = render_list(&self.value, generator);
                if items.is_empty() {
                    // Empty membership: nothing is in it, everything is outside it.
                    if self.op == Operator::In {
                        "1 = 0".to_string()
                    } else {
                        "1 = 1".to_string()
                    }
                } else {
                    format!("{} {} ({})", col, self.op.sql_symbol(), items.join(", "))
                }
            }
            Operator::IsNull => format!("{} IS NULL", col),
            Operator::IsNotNull => format!("{} IS NOT NULL", col),
            Operator::Fuzzy => format!(
                "{} {} {}",
                col,
                generator.fuzzy_operator(),
                render_value(&self.value, generator)
            ),
            Operator::ArrayContains => {
                generator.array_contains(&col, &render_value(&self.value, generator))
            }
            Operator::ArrayNotContains => format!(
                "NOT ({})",
                generator.array_contains(&col, &render_value(&self.value, generator))
            ),
            Operator::ArrayOverlaps => {
                generator.array_overlaps(&col, &render_value(&self.value, generator))
            }
            Operator::ArrayNotOverlaps => format!(
                "NOT ({})",
                generator.array_overlaps(&col, &render_value(&self.value, generator))
            ),
        };
        Some(sql)
    }
}

impl FilterToSql for Filter {
    fn to_sql(&self, generator: &dyn SqlGenerator) -> Option<String> {
        match self {
            Filter::Condition(cond) => cond.to_sql(generator),
            Filter::Group { op, items } => {
                let parts: Vec<String> = items.iter().filter_map(|f| f.to_sql(generator)).collect();
                if parts.is_empty() {
                    return None;
                }
                let joiner = format!(" {} ", op.sql_keyword());
                Some(format!("({})", parts.join(&joiner)))
            }
            Filter::Exists { negated, subquery } => {
                let keyword = if *negated { "NOT EXISTS" } else { "EXISTS" };
                Some(format!(
                    "{} (SELECT * FROM {} WHERE {} = {})",
                    keyword,
                    generator.quote_identifier(&subquery.table),
                    render_column(&subquery.left, generator),
                    render_column(&subquery.right, generator)
                ))
            }
            Filter::Unsupported(_) => None,
        }
    }
}

/// ` WHERE a AND b`, or an empty string when nothing renders.
pub fn where_clause(filters: &[Filter], generator: &dyn SqlGenerator) -> String {
    let parts: Vec<String> = filters.iter().filter_map(|f| f.to_sql(generator)).collect();
    if parts.is_empty() {
        String::new()
    } else {
        format!(" WHERE {}", parts.join(" AND "))
    }
}
