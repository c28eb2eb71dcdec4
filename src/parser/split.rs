//! Lexical clause splitting.
//!
//! Splitting on the words `and`/`or`/`not` would cut a range such as
//! `price between 100 and 500` in two, so splitting runs in two passes:
//!
//! 1. mask: the `and` inside every BETWEEN range becomes [`RANGE_AND`];
//! 2. split on connector words, then put the masked `and` back.
//!
//! A connector is a whole whitespace-separated word. Values such as
//! `black-and-white` or `john.and.jane@x.com` are never cut.

use regex::{Captures, Regex};
use std::sync::OnceLock;

use crate::ast::Connector;

/// Stand-in for a BETWEEN range's `and`. It is not a connector word, and
/// [`mask_ranges`] blanks any copy already present in the input.
const RANGE_AND: char = '\u{1}';

/// Condition text cut into fragments.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SplitConditions {
    pub fragments: Vec<String>,
    /// `connectors[i]` sits between `fragments[i]` and `fragments[i + 1]`.
    pub connectors: Vec<Connector>,
    /// The text opened with `not`.
    pub negate_first: bool,
}

fn range_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r#"(?i)(\b\w+\s+between\s+['"]?[\w\-:@.]+['"]?)\s+and\s+(['"]?[\w\-:@.]+['"]?)"#,
        )
        .expect("valid BETWEEN range regex")
    })
}

/// Whitespace-separated words; a connector must be one of them on its own.
fn word_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\S+").expect("valid word regex"))
}

/// Pass 1: hide the `and` of every BETWEEN range.
///
/// Placeholder characters already in `text` become spaces first, so after
/// masking every [`RANGE_AND`] belongs to a range.
pub fn mask_ranges(text: &str) -> String {
    let text = text.replace(RANGE_AND, " ");
    range_pattern()
        .replace_all(&text, |caps: &Captures| {
            format!("{} {} {}", &caps[1], RANGE_AND, &caps[2])
        })
        .into_owned()
}

/// Undo [`mask_ranges`].
pub fn unmask_ranges(text: &str) -> String {
    text.replace(RANGE_AND, "and")
}

/// Pass 2: split `text` into fragments and the connectors between them.
///
/// Connector runs collapse: `and not` reads as NOT, `or not` as OR NOT.
/// A leading `not` negates the first fragment; other leading or trailing
/// connectors are dropped.
pub fn split_conditions(text: &str) -> SplitConditions {
    let masked = mask_ranges(text.trim());
    let mut out = SplitConditions::default();
    let mut pending: Option<Connector> = None;
    let mut last = 0;

    let mut push_fragment = |piece: &str, pending: &mut Option<Connector>| {
        let piece = piece.trim();
        if piece.is_empty() {
            return;
        }
        match pending.take() {
            Some(conn) if !out.fragments.is_empty() => out.connectors.push(conn),
            Some(conn) if conn.negates() => out.negate_first = true,
            _ => {}
        }
        out.fragments.push(unmask_ranges(piece));
    };

    for m in word_pattern().find_iter(&masked) {
        let Some(conn) = Connector::from_word(m.as_str()) else {
            continue;
        };
        push_fragment(&masked[last..m.start()], &mut pending);
        last = m.end();

        pending = Some(match (pending, conn) {
            (Some(Connector::Or | Connector::OrNot), Connector::Not) => Connector::OrNot,
            (_, conn) => conn,
        });
    }
    push_fragment(&masked[last..], &mut pending);

    out
}
