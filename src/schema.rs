//! Schema registry.
//!
//! Tables, their ordered columns and the foreign-key edges used for join
//! inference. A [`Schema`] is an immutable value: build it once (from
//! [`Schema::default`] or a TOML definition) and hand it to
//! [`crate::Translator::new`].
//!
//! ```toml
//! fallback_order = ["orders", "customers"]
//!
//! [[tables]]
//! name = "customers"
//! columns = ["id", "name", "city"]
//!
//! [[tables]]
//! name = "orders"
//! columns = ["id", "customer_id", "amount"]
//!
//! [[foreign_keys]]
//! table = "orders"
//! column = "customer_id"
//! references_table = "customers"
//! references_column = "id"
//! ```

use crate::error::{TextSqlError, TextSqlResult};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// A table and its columns, in definition order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    pub name: String,
    pub columns: Vec<String>,
}

impl Table {
    pub fn new(name: &str, columns: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            columns: columns.iter().map(|c| c.to_string()).collect(),
        }
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }
}

/// A directed edge `table.column -> references_table.references_column`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForeignKey {
    pub table: String,
    pub column: String,
    pub references_table: String,
    pub references_column: String,
}

impl ForeignKey {
    pub fn new(table: &str, column: &str, references_table: &str, references_column: &str) -> Self {
        Self {
            table: table.to_string(),
            column: column.to_string(),
            references_table: references_table.to_string(),
            references_column: references_column.to_string(),
        }
    }

    pub fn is_self_reference(&self) -> bool {
        self.table == self.references_table
    }
}

/// Schema definition as written in a TOML file.
#[derive(Debug, Clone, Deserialize)]
struct SchemaDef {
    tables: Vec<Table>,
    #[serde(default)]
    foreign_keys: Vec<ForeignKey>,
    #[serde(default)]
    fallback_order: Vec<String>,
}

/// Immutable table/column/foreign-key registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "SchemaDef")]
pub struct Schema {
    tables: Vec<Table>,
    foreign_keys: Vec<ForeignKey>,
    fallback_order: Vec<String>,
}

impl TryFrom<SchemaDef> for Schema {
    type Error = TextSqlError;

    fn try_from(def: SchemaDef) -> TextSqlResult<Self> {
        Schema::new(def.tables, def.foreign_keys, def.fallback_order)
    }
}

impl Schema {
    /// Build and validate a schema.
    ///
    /// Table names must be unique, column names unique within a table, and
    /// every `fallback_order` entry must name a table. An empty
    /// `fallback_order` means "schema order".
    ///
    /// Foreign keys may reference tables outside the schema; they simply
    /// never match during join inference.
    pub fn new(
        tables: Vec<Table>,
        foreign_keys: Vec<ForeignKey>,
        fallback_order: Vec<String>,
    ) -> TextSqlResult<Self> {
        if tables.is_empty() {
            return Err(TextSqlError::schema("no tables defined"));
        }

        let mut names: HashSet<&str> = HashSet::new();
        for table in &tables {
            if !names.insert(table.name.as_str()) {
                return Err(TextSqlError::schema(format!(
                    "duplicate table '{}'",
                    table.name
                )));
            }
            let mut columns = HashSet::new();
            for column in &table.columns {
                if !columns.insert(column.as_str()) {
                    return Err(TextSqlError::schema(format!(
                        "duplicate column '{}' in table '{}'",
                        column, table.name
                    )));
                }
            }
        }

        for fk in &foreign_keys {
            let source_known = tables
                .iter()
                .any(|t| t.name == fk.table && t.has_column(&fk.column));
            if !source_known {
                return Err(TextSqlError::schema(format!(
                    "foreign key source '{}.{}' is not a schema column",
                    fk.table, fk.column
                )));
            }
        }

        if let Some(unknown) = fallback_order.iter().find(|n| !names.contains(n.as_str())) {
            return Err(TextSqlError::schema(format!(
                "fallback table '{}' is not defined",
                unknown
            )));
        }
        drop(names);

        let fallback_order = if fallback_order.is_empty() {
            tables.iter().map(|t| t.name.clone()).collect()
        } else {
            fallback_order
        };

        Ok(Self {
            tables,
            foreign_keys,
            fallback_order,
        })
    }

    /// Parse a schema from TOML text. `origin` names the document in errors.
    pub fn from_toml_str(content: &str, origin: &str) -> TextSqlResult<Self> {
        toml::from_str(content).map_err(|e| TextSqlError::toml(origin, e))
    }

    /// Load a schema definition file.
    pub fn load(path: impl AsRef<Path>) -> TextSqlResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let schema = Self::from_toml_str(&content, &path.display().to_string())?;
        tracing::debug!(
            "Loaded {} tables and {} foreign keys from {}",
            schema.tables.len(),
            schema.foreign_keys.len(),
            path.display()
        );
        Ok(schema)
    }

    /// Tables in definition order.
    pub fn tables(&self) -> &[Table] {
        &self.tables
    }

    pub fn table(&self, name: &str) -> Option<&Table> {
        self.tables.iter().find(|t| t.name == name)
    }

    /// Columns of `table`, or an empty slice for an unknown table.
    pub fn columns(&self, table: &str) -> &[String] {
        self.table(table).map(|t| t.columns.as_slice()).unwrap_or(&[])
    }

    pub fn has_column(&self, table: &str, column: &str) -> bool {
        self.table(table).is_some_and(|t| t.has_column(column))
    }

    pub fn foreign_keys(&self) -> &[ForeignKey] {
        &self.foreign_keys
    }

    /// Tables tried, in order, when no table name appears verbatim.
    pub fn fallback_order(&self) -> &[String] {
        &self.fallback_order
    }
}

impl Default for Schema {
    /// The built-in demonstration schema.
    fn default() -> Self {
        Self {
            tables: vec![
                Table::new("students", &["id", "name", "age", "score", "class"]),
                Table::new(
                    "employees",
                    &["id", "name", "age", "salary", "email", "department", "manager_id"],
                ),
                Table::new("products", &["id", "name", "price", "category", "stock"]),
                Table::new(
                    "customers",
                    &["id", "name", "age", "city", "phone_number", "email"],
                ),
                Table::new(
                    "orders",
                    &["id", "customer_id", "product_id", "order_date", "amount", "status"],
                ),
            ],
            foreign_keys: vec![
                ForeignKey::new("orders", "customer_id", "customers", "id"),
                ForeignKey::new("orders", "product_id", "products", "id"),
                ForeignKey::new("employees", "manager_id", "employees", "id"),
                // categories is not modelled; the edge never matches a detected table
                ForeignKey::new("products", "category", "categories", "name"),
            ],
            fallback_order: ["orders", "products", "customers", "students", "employees"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

/// Singular stem of a plural table name (`orders` -> `order`).
pub fn singular(name: &str) -> &str {
    match name.strip_suffix('s') {
        Some(stem) if !stem.is_empty() => stem,
        _ => name,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_schema_order() {
        let schema = Schema::default();
        let names: Vec<&str> = schema.tables().iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["students", "employees", "products", "customers", "orders"]);
        assert_eq!(schema.columns("orders")[3], "order_date");
        assert!(schema.columns("categories").is_empty());
    }

    #[test]
    fn test_default_passes_validation() {
        let d = Schema::default();
        let rebuilt = Schema::new(
            d.tables().to_vec(),
            d.foreign_keys().to_vec(),
            d.fallback_order().to_vec(),
        )
        .unwrap();
        assert_eq!(rebuilt, d);
    }

    #[test]
    fn test_singular() {
        assert_eq!(singular("orders"), "order");
        assert_eq!(singular("employees"), "employee");
        assert_eq!(singular("staff"), "staff");
        assert_eq!(singular("s"), "s");
    }

    #[test]
    fn test_from_toml() {
        let schema = Schema::from_toml_str(
            r#"
            [[tables]]
            name = "authors"
            columns = ["id", "name"]

            [[tables]]
            name = "books"
            columns = ["id", "author_id", "title"]

            [[foreign_keys]]
            table = "books"
            column = "author_id"
            references_table = "authors"
            references_column = "id"
            "#,
            "inline",
        )
        .unwrap();
        assert_eq!(schema.tables().len(), 2);
        assert_eq!(schema.foreign_keys().len(), 1);
        assert_eq!(schema.fallback_order(), ["authors", "books"]);
        assert!(schema.has_column("books", "title"));
    }

    #[test]
    fn test_duplicate_column_rejected() {
        let err = Schema::new(vec![Table::new("t", &["a", "a"])], vec![], vec![]).unwrap_err();
        assert_eq!(err.to_string(), "Invalid schema: duplicate column 'a' in table 't'");
    }

    #[test]
    fn test_unknown_fallback_rejected() {
        let err = Schema::new(
            vec![Table::new("t", &["a"])],
            vec![],
            vec!["missing".to_string()],
        )
        .unwrap_err();
        assert!(matches!(err, TextSqlError::InvalidSchema(_)));
    }

    #[test]
    fn test_bad_toml_reports_origin() {
        let err = Schema::from_toml_str("tables = 3", "schema.toml").unwrap_err();
        assert!(err.to_string().starts_with("Failed to parse schema.toml"));
    }
}
