use serde::{Deserialize, Serialize};

/// Statement kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    Select,
    Count,
    Insert,
    Update,
    Delete,
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Action::Select => write!(f, "SELECT"),
            Action::Count => write!(f, "COUNT"),
            Action::Insert => write!(f, "INSERT"),
            Action::Update => write!(f, "UPDATE"),
            Action::Delete => write!(f, "DELETE"),
        }
    }
}

/// Logical operator between conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum LogicalOp {
    #[default]
    And,
    Or,
}

impl LogicalOp {
    pub fn sql_keyword(&self) -> &'static str {
        match self {
            LogicalOp::And => "AND",
            LogicalOp::Or => "OR",
        }
    }
}

/// Sort order direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    /// `desc` in any case is descending; anything else ascends.
    pub fn from_word(word: &str) -> Self {
        if word.eq_ignore_ascii_case("desc") {
            SortOrder::Desc
        } else {
            SortOrder::Asc
        }
    }

    pub fn sql_keyword(&self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

/// Comparator names accepted in a filter, e.g. `{"age": {"gt": 21}}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Comparator {
    Eq,
    Ne,
    Gt,
    Gte,
    Lt,
    Lte,
    In,
    Nin,
    Like,
    Contains,
    StartsWith,
    EndsWith,
    Exists,
    And,
    Or,
    // Reserved for geo extensions.
    Inside,
    Near,
    Radius,
    Poly,
    Geohash,
    Box,
}

impl Comparator {
    /// Look up a comparator by name or symbol alias.
    pub fn parse(name: &str) -> Option<Self> {
        let comparator = match name {
            "eq" | "=" | "==" => Comparator::Eq,
            "ne" | "!" | "!=" => Comparator::Ne,
            "gt" | ">" => Comparator::Gt,
            "gte" | ">=" => Comparator::Gte,
            "lt" | "<" => Comparator::Lt,
            "lte" | "<=" => Comparator::Lte,
            "in" => Comparator::In,
            "nin" => Comparator::Nin,
            "like" => Comparator::Like,
            "contains" => Comparator::Contains,
            "startsWith" => Comparator::StartsWith,
            "endsWith" => Comparator::EndsWith,
            "exists" => Comparator::Exists,
            "and" => Comparator::And,
            "or" => Comparator::Or,
            "inside" => Comparator::Inside,
            "near" => Comparator::Near,
            "radius" => Comparator::Radius,
            "poly" => Comparator::Poly,
            "geohash" => Comparator::Geohash,
            "box" => Comparator::Box,
            _ => return None,
        };
        Some(comparator)
    }

    /// Like [`Comparator::parse`], but unrecognized names fall back to `Eq`.
    pub fn from_name(name: &str) -> Self {
        Self::parse(name).unwrap_or(Comparator::Eq)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Comparator::Eq => "eq",
            Comparator::Ne => "ne",
            Comparator::Gt => "gt",
            Comparator::Gte => "gte",
            Comparator::Lt => "lt",
            Comparator::Lte => "lte",
            Comparator::In => "in",
            Comparator::Nin => "nin",
            Comparator::Like => "like",
            Comparator::Contains => "contains",
            Comparator::StartsWith => "startsWith",
            Comparator::EndsWith => "endsWith",
            Comparator::Exists => "exists",
            Comparator::And => "and",
            Comparator::Or => "or",
            Comparator::Inside => "inside",
            Comparator::Near => "near",
            Comparator::Radius => "radius",
            Comparator::Poly => "poly",
            Comparator::Geohash => "geohash",
            Comparator::Box => "box",
        }
    }

    pub fn is_geo(&self) -> bool {
        matches!(
            self,
            Comparator::Inside
                | Comparator::Near
                | Comparator::Radius
                | Comparator::Poly
                | Comparator::Geohash
                | Comparator::Box
        )
    }

    pub fn logical(&self) -> Option<LogicalOp> {
        match self {
            Comparator::And => Some(LogicalOp::And),
            Comparator::Or => Some(LogicalOp::Or),
            _ => None,
        }
    }
}

impl std::fmt::Display for Comparator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// SQL-level comparison operators a [`Comparator`] resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operator {
    /// Equal (=)
    Eq,
    /// Not equal (!=)
    Ne,
    /// Greater than (>)
    Gt,
    /// Greater than or equal (>=)
    Gte,
    /// Less than (<)
    Lt,
    /// Less than or equal (<=)
    Lte,
    /// IN list
    In,
    /// NOT IN list
    NotIn,
    /// IS NULL
    IsNull,
    /// IS NOT NULL
    IsNotNull,
    /// Case-insensitive pattern match, operator chosen by dialect
    Fuzzy,
    /// Array contains all (@>)
    ArrayContains,
    /// NOT (array contains all)
    ArrayNotContains,
    /// Array overlaps (&&)
    ArrayOverlaps,
    /// NOT (array overlaps)
    ArrayNotOverlaps,
}

impl Operator {
    /// Returns the SQL symbol for the simple binary operators.
    pub fn sql_symbol(&self) -> &'static str {
        match self {
            Operator::Eq => "=",
            Operator::Ne => "!=",
            Operator::Gt => ">",
            Operator::Gte => ">=",
            Operator::Lt => "<",
            Operator::Lte => "<=",
            Operator::In => "IN",
            Operator::NotIn => "NOT IN",
            Operator::IsNull => "IS NULL",
            Operator::IsNotNull => "IS NOT NULL",
            Operator::Fuzzy => "LIKE",
            Operator::ArrayContains | Operator::ArrayNotContains => "@>",
            Operator::ArrayOverlaps | Operator::ArrayNotOverlaps => "&&",
        }
    }

    /// IS NULL and IS NOT NULL take no right-hand value.
    pub fn needs_value(&self) -> bool {
        !matches!(self, Operator::IsNull | Operator::IsNotNull)
    }
}
