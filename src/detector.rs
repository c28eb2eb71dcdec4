//! Table and column detection.
//!
//! Everything is exact word matching against the schema: `order` does not
//! match inside `order_date`, and results come back in schema order rather
//! than the order the user typed them.

use crate::schema::{Schema, singular};
use regex::Regex;

/// Compiled word-boundary matchers for one schema.
#[derive(Debug, Clone)]
pub struct EntityDetector {
    tables: Vec<TableMatcher>,
    fallbacks: Vec<(String, Regex)>,
}

#[derive(Debug, Clone)]
struct TableMatcher {
    name: String,
    pattern: Regex,
    columns: Vec<(String, Regex)>,
}

/// Compile `\bword\b`.
pub(crate) fn word_pattern(word: &str) -> Regex {
    Regex::new(&format!(r"\b{}\b", regex::escape(word))).expect("escaped word is a valid regex")
}

impl EntityDetector {
    pub fn new(schema: &Schema) -> Self {
        let tables = schema
            .tables()
            .iter()
            .map(|t| TableMatcher {
                name: t.name.clone(),
                pattern: word_pattern(&t.name),
                columns: t
                    .columns
                    .iter()
                    .map(|c| (c.clone(), word_pattern(c)))
                    .collect(),
            })
            .collect();

        let fallbacks = schema
            .fallback_order()
            .iter()
            .map(|name| {
                let stem = singular(name);
                let pattern = Regex::new(&format!(
                    r"\b(?:{}|{})\b",
                    regex::escape(stem),
                    regex::escape(name)
                ))
                .expect("escaped stems form a valid regex");
                (name.clone(), pattern)
            })
            .collect();

        Self { tables, fallbacks }
    }

    /// Every table named verbatim in `text`, in schema order.
    pub fn find_tables(&self, text: &str) -> Vec<String> {
        self.tables
            .iter()
            .filter(|t| t.pattern.is_match(text))
            .map(|t| t.name.clone())
            .collect()
    }

    /// Columns of `table` named in `text`, in column-definition order.
    pub fn detect_fields(&self, text: &str, table: &str) -> Vec<String> {
        self.tables
            .iter()
            .find(|t| t.name == table)
            .map(|t| {
                t.columns
                    .iter()
                    .filter(|(_, re)| re.is_match(text))
                    .map(|(name, _)| name.clone())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Compiled `\btable\b` pattern for a schema table.
    pub fn table_pattern(&self, table: &str) -> Option<&Regex> {
        self.tables.iter().find(|t| t.name == table).map(|t| &t.pattern)
    }

    /// First fallback table whose singular or plural name appears in `text`.
    pub fn fallback_table(&self, text: &str) -> Option<String> {
        self.fallbacks
            .iter()
            .find(|(_, re)| re.is_match(text))
            .map(|(name, _)| name.clone())
    }

    /// Tables for `text`: verbatim names first, then the fallback ladder.
    pub fn detect_tables(&self, text: &str) -> Vec<String> {
        let found = self.find_tables(text);
        if !found.is_empty() {
            return found;
        }
        match self.fallback_table(text) {
            Some(table) => {
                tracing::debug!("No table named verbatim, fell back to '{}'", table);
                vec![table]
            }
            None => Vec::new(),
        }
    }
}
