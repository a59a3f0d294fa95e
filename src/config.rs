//! jsql configuration
//!
//! Read from TOML:
//!
//! ```toml
//! dialect = "mysql"
//! schema_path = "./schemas"
//! log_filter = "jsql=debug"
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{JsqlError, JsqlResult};
use crate::transpiler::Dialect;

/// Project-local config file name.
pub const LOCAL_CONFIG_FILE: &str = "jsql.toml";

/// Main configuration
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct JsqlConfig {
    /// Target SQL dialect
    pub dialect: Dialect,

    /// Schema file, or directory of `*.json` schemas
    pub schema_path: PathBuf,

    /// `tracing` filter directive
    pub log_filter: String,
}

impl Default for JsqlConfig {
    fn default() -> Self {
        Self {
            dialect: Dialect::Postgres,
            schema_path: PathBuf::from("./schemas"),
            log_filter: "warn".to_string(),
        }
    }
}

impl JsqlConfig {
    /// Create a new configuration builder
    pub fn builder() -> JsqlConfigBuilder {
        JsqlConfigBuilder::default()
    }

    pub fn from_toml_str(text: &str) -> JsqlResult<Self> {
        Ok(toml::from_str(text)?)
    }

    pub fn load_from_file(path: impl AsRef<Path>) -> JsqlResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            JsqlError::Config(format!("cannot read {}: {}", path.display(), e))
        })?;
        let config = Self::from_toml_str(&text)?;
        tracing::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Resolve configuration: an explicit path must exist; otherwise the first
    /// of `./jsql.toml` and `<config dir>/jsql/config.toml` that exists, else
    /// defaults.
    pub fn discover(explicit: Option<&Path>) -> JsqlResult<Self> {
        match Self::locate(explicit) {
            Some(path) => Self::load_from_file(path),
            None => {
                tracing::debug!("No config file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// The file [`discover`](Self::discover) would read. An explicit path is
    /// returned even when it does not exist.
    pub fn locate(explicit: Option<&Path>) -> Option<PathBuf> {
        if let Some(path) = explicit {
            return Some(path.to_path_buf());
        }
        Self::search_paths().into_iter().find(|candidate| candidate.is_file())
    }

    pub fn search_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from(LOCAL_CONFIG_FILE)];
        if let Some(dir) = dirs::config_dir() {
            paths.push(dir.join("jsql").join("config.toml"));
        }
        paths
    }
}

/// Builder for JsqlConfig
#[derive(Debug, Default)]
pub struct JsqlConfigBuilder {
    config: JsqlConfig,
}

impl JsqlConfigBuilder {
    /// Start from an existing configuration
    pub fn from_config(config: JsqlConfig) -> Self {
        Self { config }
    }

    pub fn dialect(mut self, dialect: Dialect) -> Self {
        self.config.dialect = dialect;
        self
    }

    /// Set the schema path
    pub fn schema(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.schema_path = path.into();
        self
    }

    pub fn log_filter(mut self, filter: impl Into<String>) -> Self {
        self.config.log_filter = filter.into();
        self
    }

    /// Build the configuration
    pub fn build(self) -> JsqlConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = JsqlConfig::from_toml_str("dialect = \"mssql\"").unwrap();
        assert_eq!(config.dialect, Dialect::SqlServer);
        assert_eq!(config.schema_path, PathBuf::from("./schemas"));
        assert_eq!(config.log_filter, "warn");
    }

    #[test]
    fn test_invalid_toml() {
        assert!(matches!(
            JsqlConfig::from_toml_str("dialect = \"oracle\""),
            Err(JsqlError::Toml(_))
        ));
    }

    #[test]
    fn test_explicit_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "schema_path = \"/srv/schemas\"\nlog_filter = \"debug\"").unwrap();
        let config = JsqlConfig::discover(Some(file.path())).unwrap();
        assert_eq!(config.schema_path, PathBuf::from("/srv/schemas"));
        assert_eq!(config.log_filter, "debug");
        assert_eq!(config.dialect, Dialect::Postgres);
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let err = JsqlConfig::discover(Some(Path::new("/definitely/not/here.toml"))).unwrap_err();
        assert!(matches!(err, JsqlError::Config(_)));
    }

    #[test]
    fn test_locate_prefers_explicit_path() {
        let explicit = Path::new("/definitely/not/here.toml");
        assert_eq!(JsqlConfig::locate(Some(explicit)), Some(explicit.to_path_buf()));
    }

    #[test]
    fn test_builder() {
        let config = JsqlConfig::builder()
            .dialect(Dialect::MySQL)
            .schema("fixtures")
            .log_filter("jsql=trace")
            .build();
        assert_eq!(config.dialect, Dialect::MySQL);
        assert_eq!(config.schema_path, PathBuf::from("fixtures"));
    }
}
