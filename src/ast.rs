//! Query AST produced by the translator.
//!
//! Only the SELECT shape the translator can emit is modelled: a field list,
//! a FROM clause with inferred joins and an optional flat WHERE chain.

use serde::{Deserialize, Serialize};

/// Comparison operator of a single clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operator {
    Eq,
    Gt,
    Lt,
    Gte,
    Lte,
}

impl Operator {
    /// Parse one of the symbolic operators the normalizer emits.
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "=" => Some(Operator::Eq),
            ">" => Some(Operator::Gt),
            "<" => Some(Operator::Lt),
            ">=" => Some(Operator::Gte),
            "<=" => Some(Operator::Lte),
            _ => None,
        }
    }
}

impl std::fmt::Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Operator::Eq => write!(f, "="),
            Operator::Gt => write!(f, ">"),
            Operator::Lt => write!(f, "<"),
            Operator::Gte => write!(f, ">="),
            Operator::Lte => write!(f, "<="),
        }
    }
}

/// A literal on the right-hand side of a clause.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Value {
    /// Integer or decimal, optionally negative, emitted bare.
    Number(String),
    /// A string literal including its surrounding quotes.
    Quoted(String),
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Number(n) => write!(f, "{}", n),
            Value::Quoted(s) => write!(f, "{}", s),
        }
    }
}

/// What a clause asserts about its column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Predicate {
    Compare { op: Operator, value: Value },
    Between { low: Value, high: Value },
}

/// One `column <op> value` comparison.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Clause {
    pub column: String,
    pub predicate: Predicate,
}

impl Clause {
    pub fn compare(column: impl Into<String>, op: Operator, value: Value) -> Self {
        Self {
            column: column.into(),
            predicate: Predicate::Compare { op, value },
        }
    }

    pub fn between(column: impl Into<String>, low: Value, high: Value) -> Self {
        Self {
            column: column.into(),
            predicate: Predicate::Between { low, high },
        }
    }
}

/// Logical joiner placed before a clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Connector {
    And,
    Or,
    /// `AND NOT (clause)`
    Not,
    /// `OR NOT (clause)`
    OrNot,
}

impl Connector {
    pub fn from_word(word: &str) -> Option<Self> {
        match word.to_ascii_lowercase().as_str() {
            "and" => Some(Connector::And),
            "or" => Some(Connector::Or),
            "not" => Some(Connector::Not),
            _ => None,
        }
    }

    pub fn negates(&self) -> bool {
        matches!(self, Connector::Not | Connector::OrNot)
    }
}

impl std::fmt::Display for Connector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Connector::And => write!(f, "AND"),
            Connector::Or => write!(f, "OR"),
            Connector::Not => write!(f, "NOT"),
            Connector::OrNot => write!(f, "OR NOT"),
        }
    }
}

/// Flat WHERE chain: `clauses[0] c[0] clauses[1] c[1] ...`.
///
/// `connectors` is positional and may be shorter than `clauses.len() - 1`;
/// missing slots read as AND.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filter {
    pub clauses: Vec<Clause>,
    pub connectors: Vec<Connector>,
    /// Sentence opened with `not`.
    #[serde(default)]
    pub negate_first: bool,
}

impl Filter {
    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// Connector in front of clause `index` (index >= 1).
    pub fn connector_before(&self, index: usize) -> Connector {
        index
            .checked_sub(1)
            .and_then(|slot| self.connectors.get(slot))
            .copied()
            .unwrap_or(Connector::And)
    }
}

/// SELECT list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Fields {
    Star,
    Columns(Vec<String>),
}

/// A table attached to the FROM clause after the first one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Join {
    /// `JOIN table ON left = right`
    Inner {
        table: String,
        left: ColumnRef,
        right: ColumnRef,
    },
    /// `, table`
    Cross { table: String },
}

impl Join {
    pub fn table(&self) -> &str {
        match self {
            Join::Inner { table, .. } | Join::Cross { table } => table,
        }
    }
}

/// `table.column`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnRef {
    pub table: String,
    pub column: String,
}

impl ColumnRef {
    pub fn new(table: &str, column: &str) -> Self {
        Self {
            table: table.to_string(),
            column: column.to_string(),
        }
    }
}

impl std::fmt::Display for ColumnRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.table, self.column)
    }
}

/// FROM clause: the first table plus each attached table, in input order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FromClause {
    pub base: String,
    pub joins: Vec<Join>,
}

impl FromClause {
    pub fn table(name: &str) -> Self {
        Self {
            base: name.to_string(),
            joins: Vec::new(),
        }
    }
}

/// A complete SELECT statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectQuery {
    pub fields: Fields,
    pub from: FromClause,
    #[serde(default)]
    pub filter: Filter,
}
