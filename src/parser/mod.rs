//! Condition parser.
//!
//! Turns the free-text condition part of a sentence into a [`Filter`]:
//!
//! ```text
//! "salary >= 50000 and department = sales"
//!   split    -> ["salary >= 50000", "department = sales"], [AND]
//!   match    -> salary >= 50000 | department = 'sales'
//!   assemble -> salary >= 50000 AND department = 'sales'
//! ```
//!
//! Fragments no matcher understands are dropped. That is the only failure
//! mode, and it is silent.

pub mod matchers;
pub mod split;

pub use matchers::{MATCHERS, MatchContext, Matcher, classify, parse_clause, quote_if_string};
pub use split::{SplitConditions, split_conditions};

use regex::Regex;

use crate::ast::{Clause, Filter};

/// Parses condition text for one translation.
#[derive(Debug, Clone)]
pub struct ConditionParser<'a> {
    context: MatchContext<'a>,
    /// Word patterns of the detected tables, removed before a retry.
    table_patterns: Vec<&'a Regex>,
}

impl<'a> ConditionParser<'a> {
    pub fn new(context: MatchContext<'a>, table_patterns: Vec<&'a Regex>) -> Self {
        Self {
            context,
            table_patterns,
        }
    }

    /// Parse one fragment, retrying once with table names removed
    /// ("customers city = delhi" -> "city = delhi").
    pub fn parse_fragment(&self, fragment: &str) -> Option<Clause> {
        if let Some(clause) = parse_clause(fragment, &self.context) {
            return Some(clause);
        }

        let mut stripped = fragment.to_string();
        for re in &self.table_patterns {
            stripped = re.replace_all(&stripped, "").into_owned();
        }
        let stripped = stripped.trim();
        if stripped == fragment.trim() {
            return None;
        }
        parse_clause(stripped, &self.context)
    }

    /// Split, parse every fragment and keep the connectors positional.
    pub fn parse(&self, text: &str) -> Filter {
        let split = split_conditions(text);
        let mut clauses = Vec::with_capacity(split.fragments.len());
        let mut negate_first = false;

        for (i, fragment) in split.fragments.iter().enumerate() {
            match self.parse_fragment(fragment) {
                Some(clause) => {
                    if i == 0 {
                        negate_first = split.negate_first;
                    }
                    clauses.push(clause);
                }
                None => tracing::debug!("Dropped condition fragment '{}'", fragment),
            }
        }

        Filter {
            clauses,
            connectors: split.connectors,
            negate_first,
        }
    }
}
