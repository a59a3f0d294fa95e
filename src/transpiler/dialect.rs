use serde::{Deserialize, Serialize};

use crate::transpiler::sql::mysql::MysqlGenerator;
use crate::transpiler::sql::postgres::PostgresGenerator;
use crate::transpiler::sql::sqlserver::SqlServerGenerator;
use crate::transpiler::traits::SqlGenerator;

/// Supported SQL Dialects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    #[default]
    #[serde(alias = "pg", alias = "postgresql")]
    Postgres,
    MySQL,
    #[serde(alias = "mssql")]
    SqlServer,
}

impl Dialect {
    pub const ALL: [Dialect; 3] = [Dialect::Postgres, Dialect::MySQL, Dialect::SqlServer];

    pub fn generator(&self) -> Box<dyn SqlGenerator> {
        match self {
            Dialect::Postgres => Box::new(PostgresGenerator),
            Dialect::MySQL => Box::new(MysqlGenerator),
            Dialect::SqlServer => Box::new(SqlServerGenerator),
        }
    }
}

impl std::str::FromStr for Dialect {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pg" | "postgres" | "postgresql" => Ok(Dialect::Postgres),
            "mysql" => Ok(Dialect::MySQL),
            "mssql" | "sqlserver" => Ok(Dialect::SqlServer),
            other => Err(format!(
                "unknown dialect '{}', expected one of: postgres, mysql, sqlserver",
                other
            )),
        }
    }
}

impl std::fmt::Display for Dialect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.generator().name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_aliases() {
        assert_eq!("pg".parse::<Dialect>(), Ok(Dialect::Postgres));
        assert_eq!("PostgreSQL".parse::<Dialect>(), Ok(Dialect::Postgres));
        assert_eq!("mssql".parse::<Dialect>(), Ok(Dialect::SqlServer));
        assert!("oracle".parse::<Dialect>().is_err());
    }

    #[test]
    fn test_display_round_trips() {
        for dialect in Dialect::ALL {
            assert_eq!(dialect.to_string().parse::<Dialect>(), Ok(dialect));
        }
    }

    #[test]
    fn test_capability_table() {
        let pg = Dialect::Postgres.generator();
        let my = Dialect::MySQL.generator();
        let ms = Dialect::SqlServer.generator();

        assert_eq!(pg.quote_identifier("t"), "\"t\"");
        assert_eq!(my.quote_identifier("t"), "`t`");
        assert_eq!(ms.quote_identifier("t"), "\"t\"");

        assert_eq!(pg.fuzzy_operator(), "ILIKE");
        assert_eq!(my.fuzzy_operator(), "LIKE");
        assert_eq!(ms.fuzzy_operator(), "LIKE");

        assert!(!pg.requires_order_for_offset());
        assert!(!my.requires_order_for_offset());
        assert!(ms.requires_order_for_offset());

        assert!(pg.supports_json_columns());
        assert!(!my.supports_json_columns());
        assert!(!ms.supports_json_columns());
    }
}
