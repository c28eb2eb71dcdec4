//! Query assembly.
//!
//! [`Translator`] runs the whole pipeline for one sentence:
//!
//! ```text
//! normalize -> detect tables -> split projection / conditions
//!           -> parse conditions -> pick fields -> resolve FROM -> render
//! ```
//!
//! It owns the schema it was built with and keeps no other state, so a
//! single instance can serve any number of callers.

use regex::Regex;
use serde::Serialize;
use std::sync::OnceLock;

use crate::ast::{Fields, Filter, SelectQuery};
use crate::detector::EntityDetector;
use crate::error::TranslateError;
use crate::joins::resolve_from;
use crate::normalizer::normalize;
use crate::parser::{ConditionParser, MatchContext};
use crate::schema::Schema;
use crate::transpiler::ToSql;

/// Date column used when none is configured.
pub const DEFAULT_DATE_COLUMN: &str = "order_date";

/// Leading verbs removed from the condition text.
const LEADING_VERBS: &[&str] = &["show", "get", "list", "find"];

/// Demonstration sentences for the default schema.
pub const SAMPLE_SENTENCES: &[&str] = &[
    "Show all students",
    "Get name and age of students",
    "Show employees with salary >= 50000 and department equals sales",
    "List products where price between 100 and 500 and category equals toys",
    "Show customers with age greater than 25 and city equals delhi",
    "Show orders placed after date 2023-01-01",
    "Orders before 2022-12-31",
    "Get orders where amount > 2000 and status = pending",
    "Find employees whose manager_id = 3",
    "Show products where stock < 10 or price < 50",
    "Get customers where email = abc@example.com",
    "List orders where order_date between 2023-01-01 and 2023-03-31",
];

fn select_all_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\b(?:all|everything|show all|list all|get all)\b")
            .expect("valid select-all regex")
    })
}

fn condition_keyword_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)\b(?:where|with)\b\s+(.+)").expect("valid keyword regex"))
}

/// Everything the pipeline worked out for one sentence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Translation {
    pub input: String,
    pub normalized: String,
    /// Detected tables, in schema order.
    pub tables: Vec<String>,
    /// Text the conditions were parsed from.
    pub condition_text: String,
    pub query: SelectQuery,
    pub sql: String,
}

/// Natural-language to SELECT translator over one schema.
#[derive(Debug, Clone)]
pub struct Translator {
    schema: Schema,
    detector: EntityDetector,
    date_column: String,
}

impl Default for Translator {
    fn default() -> Self {
        Self::new(Schema::default())
    }
}

impl Translator {
    pub fn new(schema: Schema) -> Self {
        let detector = EntityDetector::new(&schema);
        Self {
            schema,
            detector,
            date_column: DEFAULT_DATE_COLUMN.to_string(),
        }
    }

    /// Column bare date literals compare against.
    pub fn with_date_column(mut self, column: impl Into<String>) -> Self {
        self.date_column = column.into();
        self
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn date_column(&self) -> &str {
        &self.date_column
    }

    /// Translate a sentence into SQL, or into one of the diagnostic
    /// sentences `"Empty input."` / `"Could not detect table."`.
    pub fn translate(&self, input: &str) -> String {
        match self.analyze(input) {
            Ok(translation) => translation.sql,
            Err(e) => e.to_string(),
        }
    }

    /// Run the pipeline and keep every intermediate result.
    pub fn analyze(&self, input: &str) -> Result<Translation, TranslateError> {
        if input.trim().is_empty() {
            return Err(TranslateError::EmptyInput);
        }

        let normalized = normalize(input);
        tracing::debug!("Normalized: '{}'", normalized);

        let tables = self.detector.detect_tables(&normalized);
        if tables.is_empty() {
            tracing::debug!("No table detected in '{}'", normalized);
            return Err(TranslateError::NoTable);
        }
        tracing::debug!("Tables: {:?}", tables);

        // Projection is what precedes "where"/"with"; conditions follow it
        let keyword = condition_keyword_pattern()
            .captures(&normalized)
            .and_then(|caps| Some((caps.get(0)?.start(), caps.get(1)?.range())));
        let (projection, condition_source, has_keyword) = match keyword {
            Some((start, rest)) => (&normalized[..start], &normalized[rest], true),
            None => (normalized.as_str(), normalized.as_str(), false),
        };

        let condition_text = strip_leading(condition_source, &tables);
        let filter = self.parse_conditions(&condition_text, &tables);
        tracing::debug!("Parsed {} condition(s) from '{}'", filter.clauses.len(), condition_text);

        let fields = self.select_fields(&normalized, projection, &tables, &filter, has_keyword);

        let Some(from) = resolve_from(&self.schema, &tables) else {
            return Err(TranslateError::NoTable);
        };

        let query = SelectQuery {
            fields,
            from,
            filter,
        };
        let sql = query.to_sql();

        Ok(Translation {
            input: input.to_string(),
            normalized,
            tables,
            condition_text,
            query,
            sql,
        })
    }

    fn parse_conditions(&self, text: &str, tables: &[String]) -> Filter {
        let known_columns = tables
            .iter()
            .flat_map(|t| self.schema.columns(t))
            .map(String::as_str)
            .collect();
        let patterns = tables
            .iter()
            .filter_map(|t| self.detector.table_pattern(t))
            .collect();
        let context = MatchContext {
            date_column: &self.date_column,
            known_columns,
        };
        ConditionParser::new(context, patterns).parse(text)
    }

    /// `*` for "all"-style requests or when nothing was named; otherwise the
    /// named columns, qualified when several tables are involved.
    ///
    /// Without a where/with keyword the projection is the whole sentence, so
    /// columns already constrained by a clause are left out of it.
    fn select_fields(
        &self,
        normalized: &str,
        projection: &str,
        tables: &[String],
        filter: &Filter,
        has_keyword: bool,
    ) -> Fields {
        if select_all_pattern().is_match(normalized) {
            return Fields::Star;
        }

        let qualify = tables.len() > 1;
        let mut columns = Vec::new();
        for table in tables {
            for column in self.detector.detect_fields(projection, table) {
                let constrained = filter.clauses.iter().any(|c| c.column == column);
                if !has_keyword && constrained {
                    continue;
                }
                if qualify {
                    columns.push(format!("{}.{}", table, column));
                } else {
                    columns.push(column);
                }
            }
        }

        if columns.is_empty() {
            Fields::Star
        } else {
            Fields::Columns(columns)
        }
    }
}

/// Drop a leading verb, then a leading detected table name.
fn strip_leading(text: &str, tables: &[String]) -> String {
    let mut text = text.trim();
    if let Some(rest) = LEADING_VERBS.iter().find_map(|v| strip_word(text, v)) {
        text = rest.trim();
    }
    if let Some(rest) = tables.iter().find_map(|t| strip_word(text, t)) {
        text = rest.trim();
    }
    text.to_string()
}

/// `text` without its leading `word`, if it starts with that whole word.
fn strip_word<'a>(text: &'a str, word: &str) -> Option<&'a str> {
    let rest = text.strip_prefix(word)?;
    match rest.chars().next() {
        Some(c) if c.is_alphanumeric() || c == '_' => None,
        _ => Some(rest),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentinels() {
        let t = Translator::default();
        assert_eq!(t.translate(""), "Empty input.");
        assert_eq!(t.translate(" \t\n"), "Empty input.");
        assert_eq!(t.translate("what is the weather"), "Could not detect table.");
        assert_eq!(t.analyze("   "), Err(TranslateError::EmptyInput));
    }

    #[test]
    fn test_strip_leading() {
        let tables = vec!["orders".to_string()];
        assert_eq!(
            strip_leading("show orders placed after date 2023-01-01", &tables),
            "placed after date 2023-01-01"
        );
        // a verb prefix that is not a whole word stays
        assert_eq!(strip_leading("showcase orders", &tables), "showcase orders");
        assert_eq!(strip_leading("orders_archive x", &tables), "orders_archive x");
    }

    #[test]
    fn test_analyze_keeps_stages() {
        let t = Translator::default();
        let tr = t
            .analyze("Show customers with age greater than 25 and city equals delhi")
            .unwrap();
        assert_eq!(tr.normalized, "show customers with age > 25 and city = delhi");
        assert_eq!(tr.tables, vec!["customers".to_string()]);
        assert_eq!(tr.condition_text, "age > 25 and city = delhi");
        assert_eq!(tr.query.filter.clauses.len(), 2);
        assert_eq!(
            tr.sql,
            "SELECT * FROM customers WHERE age > 25 AND city = 'delhi';"
        );
    }

    #[test]
    fn test_projection_before_keyword() {
        let t = Translator::default();
        assert_eq!(
            t.translate("Show name of customers with city = delhi"),
            "SELECT name FROM customers WHERE city = 'delhi';"
        );
    }

    #[test]
    fn test_constrained_column_not_selected() {
        let t = Translator::default();
        assert_eq!(
            t.translate("Find employees whose manager_id = 3"),
            "SELECT * FROM employees WHERE manager_id = 3;"
        );
    }

    #[test]
    fn test_custom_date_column() {
        let t = Translator::default().with_date_column("created_at");
        assert_eq!(
            t.translate("orders before 2022-12-31"),
            "SELECT * FROM orders WHERE created_at < '2022-12-31';"
        );
    }

    #[test]
    fn test_translator_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Translator>();
    }
}
