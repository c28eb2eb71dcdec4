//! Configuration.
//!
//! Looked up in this order, first hit wins:
//!
//! 1. an explicit path (`--config` / `TEXTSQL_CONFIG`)
//! 2. `./textsql.toml`
//! 3. `<config dir>/textsql/config.toml`
//!
//! ```toml
//! schema = "schema.toml"      # relative to this file
//! date_column = "created_at"
//! history_file = "/tmp/textsql_history"
//! ```

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{TextSqlError, TextSqlResult};
use crate::schema::Schema;
use crate::translator::Translator;

/// File name looked up in the working directory.
pub const CONFIG_FILE: &str = "textsql.toml";

/// REPL history file name in the home directory.
pub const HISTORY_FILE: &str = ".textsql_history";

/// Main textsql configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Path to a schema definition (TOML)
    pub schema: Option<PathBuf>,

    /// Column compared against bare date literals
    pub date_column: Option<String>,

    /// REPL history file
    pub history_file: Option<PathBuf>,

    /// Directory of the file this was read from
    #[serde(skip)]
    base_dir: Option<PathBuf>,
}

impl Config {
    /// Parse configuration text. Relative paths resolve against `base_dir`.
    pub fn from_toml_str(
        content: &str,
        origin: &str,
        base_dir: Option<PathBuf>,
    ) -> TextSqlResult<Self> {
        let mut config: Config =
            toml::from_str(content).map_err(|e| TextSqlError::toml(origin, e))?;
        if config.date_column.as_deref().is_some_and(|c| c.trim().is_empty()) {
            return Err(TextSqlError::Config("date_column must not be empty".to_string()));
        }
        config.base_dir = base_dir;
        Ok(config)
    }

    /// Load a configuration file.
    pub fn load(path: impl AsRef<Path>) -> TextSqlResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let base_dir = path.parent().map(Path::to_path_buf);
        let config = Self::from_toml_str(&content, &path.display().to_string(), base_dir)?;
        tracing::debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Find and load the configuration, or fall back to defaults.
    pub fn discover() -> TextSqlResult<Self> {
        let candidates = [
            Some(PathBuf::from(CONFIG_FILE)),
            dirs::config_dir().map(|d| d.join("textsql").join("config.toml")),
        ];
        match candidates.into_iter().flatten().find(|p| p.is_file()) {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    /// Load `path` when given, otherwise [`Config::discover`].
    pub fn resolve(path: Option<&Path>) -> TextSqlResult<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Self::discover(),
        }
    }

    /// Schema file path, resolved against the config file's directory.
    pub fn schema_path(&self) -> Option<PathBuf> {
        self.schema.as_ref().map(|p| self.resolve_path(p))
    }

    /// History file, defaulting to `~/.textsql_history`.
    pub fn history_path(&self) -> Option<PathBuf> {
        match &self.history_file {
            Some(p) => Some(self.resolve_path(p)),
            None => dirs::home_dir().map(|h| h.join(HISTORY_FILE)),
        }
    }

    /// Build a translator for this configuration.
    pub fn translator(&self) -> TextSqlResult<Translator> {
        let schema = match self.schema_path() {
            Some(path) => Schema::load(path)?,
            None => Schema::default(),
        };
        let mut translator = Translator::new(schema);
        if let Some(column) = &self.date_column {
            translator = translator.with_date_column(column.clone());
        }
        Ok(translator)
    }

    fn resolve_path(&self, path: &Path) -> PathBuf {
        match &self.base_dir {
            Some(base) if path.is_relative() => base.join(path),
            _ => path.to_path_buf(),
        }
    }
}

/// Builder for Config
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl Config {
    /// Start from an existing configuration and override parts of it.
    pub fn builder(self) -> ConfigBuilder {
        ConfigBuilder { config: self }
    }
}

impl ConfigBuilder {
    /// Set the schema path
    pub fn schema(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.schema = Some(path.into());
        self.config.base_dir = None;
        self
    }

    /// Set the date column
    pub fn date_column(mut self, column: impl Into<String>) -> Self {
        self.config.date_column = Some(column.into());
        self
    }

    /// Build the configuration
    pub fn build(self) -> Config {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::from_toml_str("", "inline", None).unwrap();
        assert!(config.schema.is_none());
        let t = config.translator().unwrap();
        assert_eq!(t.date_column(), "order_date");
        assert_eq!(t.schema(), &Schema::default());
    }

    #[test]
    fn test_relative_schema_path() {
        let config = Config::from_toml_str(
            r#"schema = "schemas/shop.toml""#,
            "inline",
            Some(PathBuf::from("/etc/textsql")),
        )
        .unwrap();
        assert_eq!(
            config.schema_path(),
            Some(PathBuf::from("/etc/textsql/schemas/shop.toml"))
        );
    }

    #[test]
    fn test_builder_overrides() {
        let config = Config::from_toml_str(
            r#"
            schema = "a.toml"
            date_column = "created_at"
            "#,
            "inline",
            Some(PathBuf::from("/cfg")),
        )
        .unwrap()
        .builder()
        .schema("b.toml")
        .date_column("shipped_at")
        .build();
        assert_eq!(config.schema_path(), Some(PathBuf::from("b.toml")));
        assert_eq!(config.date_column.as_deref(), Some("shipped_at"));
    }

    #[test]
    fn test_rejects_unknown_and_empty_keys() {
        assert!(Config::from_toml_str("colour = true", "inline", None).is_err());
        let err = Config::from_toml_str(r#"date_column = " ""#, "inline", None).unwrap_err();
        assert_eq!(err.to_string(), "Configuration error: date_column must not be empty");
    }

    #[test]
    fn test_load_with_schema_file() {
        let dir = std::env::temp_dir().join(format!("textsql-config-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        fs::write(
            dir.join("library.toml"),
            r#"
            [[tables]]
            name = "books"
            columns = ["id", "title", "published_on"]
            "#,
        )
        .unwrap();
        fs::write(
            dir.join(CONFIG_FILE),
            "schema = \"library.toml\"\ndate_column = \"published_on\"\n",
        )
        .unwrap();

        let translator = Config::load(dir.join(CONFIG_FILE))
            .unwrap()
            .translator()
            .unwrap();
        assert_eq!(
            translator.translate("books published after 2001-01-01"),
            "SELECT * FROM books WHERE published_on > '2001-01-01';"
        );

        fs::remove_dir_all(&dir).unwrap();
    }
}
