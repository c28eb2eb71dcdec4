//! Text normalization.
//!
//! Lowercases the sentence and rewrites comparison phrases into the symbolic
//! operators the condition parser understands:
//!
//! ```text
//! "Salary greater than 5000"  ->  "salary > 5000"
//! "Status is pending"         ->  "status = pending"
//! ```

use regex::Regex;
use std::sync::OnceLock;

/// Phrase rewrites, applied in this order.
const REWRITES: &[(&str, &str)] = &[
    ("greater than", ">"),
    ("more than", ">"),
    ("above", ">"),
    ("less than", "<"),
    ("below", "<"),
    ("at least", ">="),
    ("minimum", ">="),
    ("at most", "<="),
    ("maximum", "<="),
    ("equals", "="),
    ("is", "="),
];

fn rewrite_rules() -> &'static [(Regex, &'static str)] {
    static RULES: OnceLock<Vec<(Regex, &'static str)>> = OnceLock::new();
    RULES.get_or_init(|| {
        REWRITES
            .iter()
            .map(|(phrase, symbol)| {
                let pattern = format!(r"\b{}\b", regex::escape(phrase));
                let re = Regex::new(&pattern).expect("valid rewrite pattern");
                (re, *symbol)
            })
            .collect()
    })
}

/// Lowercase, trim and rewrite comparison phrases.
pub fn normalize(text: &str) -> String {
    let mut out = text.trim().to_lowercase();
    for (re, symbol) in rewrite_rules() {
        if re.is_match(&out) {
            out = re.replace_all(&out, *symbol).into_owned();
        }
    }
    out
}
