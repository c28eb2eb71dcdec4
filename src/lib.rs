//! # textsql
//!
//! > **Say what you want. Get the SELECT.**
//!
//! textsql turns short English requests into a single SQL SELECT statement
//! over a small, known schema. It is a heuristic translator: it matches
//! words against table and column names, rewrites comparison phrases into
//! operators and infers joins from foreign keys. Nothing is executed.
//!
//! ## Quick Example
//!
//! ```
//! let sql = textsql::translate("Show employees with salary greater than 50000");
//! assert_eq!(sql, "SELECT * FROM employees WHERE salary > 50000;");
//! ```
//!
//! ## Pipeline
//!
//! | Stage       | Module         | Job                                      |
//! |-------------|----------------|------------------------------------------|
//! | Normalize   | [`normalizer`] | lowercase, "at least" -> `>=`, ...        |
//! | Detect      | [`detector`]   | tables and columns named in the sentence |
//! | Conditions  | [`parser`]     | split on and/or/not, match clauses       |
//! | Joins       | [`joins`]      | FROM clause from foreign keys            |
//! | Assemble    | [`translator`] | fields, FROM, WHERE, `;`                  |
//!
//! Anything the pipeline cannot make sense of is dropped rather than
//! reported. The only outcomes besides SQL are the sentences
//! `"Empty input."` and `"Could not detect table."`.

pub mod ast;
pub mod config;
pub mod detector;
pub mod error;
pub mod joins;
pub mod normalizer;
pub mod parser;
pub mod repl;
pub mod schema;
pub mod translator;
pub mod transpiler;

pub use translator::{Translation, Translator};

use std::sync::OnceLock;

pub mod prelude {
    pub use crate::ast::*;
    pub use crate::config::Config;
    pub use crate::error::*;
    pub use crate::parser::quote_if_string;
    pub use crate::schema::{ForeignKey, Schema, Table};
    pub use crate::translator::{Translation, Translator};
    pub use crate::transpiler::ToSql;
}

/// Translator over the built-in schema, built on first use.
pub fn default_translator() -> &'static Translator {
    static DEFAULT: OnceLock<Translator> = OnceLock::new();
    DEFAULT.get_or_init(Translator::default)
}

/// Translate a sentence against the built-in schema.
///
/// # Example
///
/// ```
/// assert_eq!(textsql::translate("Show all students"), "SELECT * FROM students;");
/// assert_eq!(textsql::translate("   "), "Empty input.");
/// ```
pub fn translate(input: &str) -> String {
    default_translator().translate(input)
}
