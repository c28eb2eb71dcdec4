//! Atomic clause matchers.
//!
//! Each matcher looks at one condition fragment and either produces a
//! [`Clause`] or declines. [`MATCHERS`] fixes the order they are tried in;
//! the first match wins.
//!
//! | Matcher            | Shape                                 |
//! |--------------------|---------------------------------------|
//! | `between`          | `col between low and high`            |
//! | `comparison`       | `col <op> value` ending the fragment  |
//! | `date`             | any `YYYY-MM-DD`, operator from words |
//! | `implied_equality` | `col = value` or bare `col value`     |

use nom::{
    IResult,
    branch::alt,
    bytes::complete::{tag, tag_no_case, take_while_m_n, take_while1},
    character::complete::{char, digit1, multispace0, multispace1, one_of},
    combinator::{all_consuming, eof, map_opt, opt, recognize},
    sequence::{pair, tuple},
};

use crate::ast::{Clause, Operator, Value};

/// Everything a matcher may consult besides the fragment itself.
#[derive(Debug, Clone)]
pub struct MatchContext<'a> {
    /// Column used for bare date literals.
    pub date_column: &'a str,
    /// Columns of the detected tables.
    pub known_columns: Vec<&'a str>,
}

impl MatchContext<'_> {
    pub fn is_known_column(&self, column: &str) -> bool {
        self.known_columns.contains(&column)
    }
}

/// A clause matcher: `None` means "not my shape".
pub type Matcher = fn(&str, &MatchContext<'_>) -> Option<Clause>;

/// Matchers in priority order.
pub const MATCHERS: &[(&str, Matcher)] = &[
    ("between", match_between),
    ("comparison", match_comparison),
    ("date", match_date),
    ("implied_equality", match_implied_equality),
];

/// Words that never stand as the value of a bare `col value` fragment.
const FILLER_WORDS: &[&str] = &[
    "a", "an", "the", "of", "for", "from", "in", "to", "by", "and", "or", "all", "with", "whose",
    "where", "each", "every",
];

/// Run the matchers in order and return the first clause produced.
pub fn parse_clause(fragment: &str, ctx: &MatchContext<'_>) -> Option<Clause> {
    let fragment = fragment.trim();
    if fragment.is_empty() {
        return None;
    }
    for (name, matcher) in MATCHERS {
        if let Some(clause) = matcher(fragment, ctx) {
            tracing::trace!("'{}' matched by {}", fragment, name);
            return Some(clause);
        }
    }
    tracing::trace!("'{}' matched nothing", fragment);
    None
}

/// `col between low and high`
pub fn match_between(fragment: &str, _ctx: &MatchContext<'_>) -> Option<Clause> {
    let (column, low, high) = search(fragment, parse_between)?;
    Some(Clause::between(column, classify(low), classify(high)))
}

/// `col <op> value`, where the value ends the fragment.
pub fn match_comparison(fragment: &str, _ctx: &MatchContext<'_>) -> Option<Clause> {
    let (column, op, value) = search(fragment, parse_comparison)?;
    Some(Clause::compare(column, op, classify(value)))
}

/// Any fragment carrying an ISO date. The operator comes from the
/// surrounding words; the column is the context's date column.
pub fn match_date(fragment: &str, ctx: &MatchContext<'_>) -> Option<Clause> {
    let date = (0..fragment.len())
        .filter(|&i| fragment.is_char_boundary(i))
        .find_map(|i| parse_iso_date(&fragment[i..]).ok().map(|(_, d)| d))?;

    let has_word = |w: &str| fragment.split(|c: char| !is_word_char(c)).any(|t| t == w);
    let op = if has_word("after") || fragment.contains('>') {
        Operator::Gt
    } else if has_word("before") || fragment.contains('<') {
        Operator::Lt
    } else {
        // "on", "=" and no hint at all all mean equality
        Operator::Eq
    };

    Some(Clause::compare(
        ctx.date_column,
        op,
        Value::Quoted(format!("'{}'", date)),
    ))
}

/// `col = value` anywhere in the fragment, or a fragment that is just
/// `col value` for a known column.
pub fn match_implied_equality(fragment: &str, ctx: &MatchContext<'_>) -> Option<Clause> {
    if let Some((column, value)) = search(fragment, parse_equality) {
        return Some(Clause::compare(column, Operator::Eq, classify(value)));
    }

    let (_, (column, value)) = parse_bare_pair(fragment).ok()?;
    if !ctx.is_known_column(column) || FILLER_WORDS.contains(&value) {
        return None;
    }
    Some(Clause::compare(column, Operator::Eq, classify(value)))
}

/// Classify a raw token as a bare number or a quoted string literal.
///
/// Tokens already wrapped in matching quotes are kept as written.
pub fn classify(token: &str) -> Value {
    let token = token.trim();
    if is_quoted(token) {
        return Value::Quoted(token.to_string());
    }
    if all_consuming(number)(token).is_ok() {
        Value::Number(token.to_string())
    } else {
        Value::Quoted(format!("'{}'", token))
    }
}

/// [`classify`] rendered as SQL text.
pub fn quote_if_string(token: &str) -> String {
    classify(token).to_string()
}

fn is_quoted(token: &str) -> bool {
    token.len() >= 2
        && ((token.starts_with('\'') && token.ends_with('\''))
            || (token.starts_with('"') && token.ends_with('"')))
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn is_token_char(c: char) -> bool {
    is_word_char(c) || matches!(c, '-' | ':' | '@' | '.')
}

/// Try `parser` at every word start of `input`, leftmost first.
fn search<'a, O, F>(input: &'a str, mut parser: F) -> Option<O>
where
    F: FnMut(&'a str) -> IResult<&'a str, O>,
{
    let mut prev_is_word = false;
    for (i, c) in input.char_indices() {
        if !prev_is_word {
            if let Ok((_, out)) = parser(&input[i..]) {
                return Some(out);
            }
        }
        prev_is_word = is_word_char(c);
    }
    None
}

/// Parse an identifier (column name).
fn word(input: &str) -> IResult<&str, &str> {
    take_while1(is_word_char)(input)
}

/// Parse a value token, optionally quoted: `50000`, `delhi`, `'new-york'`,
/// `abc@example.com`, `2023-01-01`.
fn token(input: &str) -> IResult<&str, &str> {
    recognize(tuple((
        opt(one_of("'\"")),
        take_while1(is_token_char),
        opt(one_of("'\"")),
    )))(input)
}

/// Parse a number (integer or decimal, optionally negative).
fn number(input: &str) -> IResult<&str, &str> {
    recognize(tuple((opt(char('-')), digit1, opt(pair(char('.'), digit1)))))(input)
}

fn operator(input: &str) -> IResult<&str, Operator> {
    map_opt(
        alt((tag(">="), tag("<="), tag("="), tag(">"), tag("<"))),
        Operator::from_symbol,
    )(input)
}

fn parse_between(input: &str) -> IResult<&str, (&str, &str, &str)> {
    let (input, column) = word(input)?;
    let (input, _) = multispace1(input)?;
    let (input, _) = tag_no_case("between")(input)?;
    let (input, _) = multispace1(input)?;
    let (input, low) = token(input)?;
    let (input, _) = multispace1(input)?;
    let (input, _) = tag_no_case("and")(input)?;
    let (input, _) = multispace1(input)?;
    let (input, high) = token(input)?;
    Ok((input, (column, low, high)))
}

fn parse_comparison(input: &str) -> IResult<&str, (&str, Operator, &str)> {
    let (input, column) = word(input)?;
    let (input, _) = multispace0(input)?;
    let (input, op) = operator(input)?;
    let (input, _) = multispace0(input)?;
    let (input, value) = token(input)?;
    let (input, _) = multispace0(input)?;
    let (input, _) = eof(input)?;
    Ok((input, (column, op, value)))
}

fn parse_equality(input: &str) -> IResult<&str, (&str, &str)> {
    let (input, column) = word(input)?;
    let (input, _) = multispace0(input)?;
    let (input, _) = char('=')(input)?;
    let (input, _) = multispace0(input)?;
    let (input, value) = token(input)?;
    Ok((input, (column, value)))
}

fn parse_bare_pair(input: &str) -> IResult<&str, (&str, &str)> {
    let (input, column) = word(input)?;
    let (input, _) = multispace1(input)?;
    let (input, value) = token(input)?;
    let (input, _) = eof(input)?;
    Ok((input, (column, value)))
}

fn parse_iso_date(input: &str) -> IResult<&str, &str> {
    recognize(tuple((
        take_while_m_n(4, 4, |c: char| c.is_ascii_digit()),
        char('-'),
        take_while_m_n(2, 2, |c: char| c.is_ascii_digit()),
        char('-'),
        take_while_m_n(2, 2, |c: char| c.is_ascii_digit()),
    )))(input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transpiler::ToSql;

    fn ctx() -> MatchContext<'static> {
        MatchContext {
            date_column: "order_date",
            known_columns: vec!["age", "city", "salary"],
        }
    }

    fn sql(fragment: &str) -> Option<String> {
        parse_clause(fragment, &ctx()).map(|c| c.to_sql())
    }

    #[test]
    fn test_quote_if_string() {
        assert_eq!(quote_if_string("123"), "123");
        assert_eq!(quote_if_string("-4.5"), "-4.5");
        assert_eq!(quote_if_string("delhi"), "'delhi'");
        assert_eq!(quote_if_string("'delhi'"), "'delhi'");
        assert_eq!(quote_if_string("\"delhi\""), "\"delhi\"");
        assert_eq!(quote_if_string("4.5.6"), "'4.5.6'");
        assert_eq!(quote_if_string("2023-01-01"), "'2023-01-01'");
    }

    #[test]
    fn test_quote_if_string_idempotent() {
        let once = quote_if_string("pending");
        assert_eq!(quote_if_string(&once), once);
    }

    #[test]
    fn test_between() {
        assert_eq!(
            sql("price between 100 and 500").as_deref(),
            Some("price BETWEEN 100 AND 500")
        );
        assert_eq!(
            sql("order_date BETWEEN 2023-01-01 AND 2023-03-31").as_deref(),
            Some("order_date BETWEEN '2023-01-01' AND '2023-03-31'")
        );
    }

    #[test]
    fn test_comparison() {
        assert_eq!(sql("salary >= 50000").as_deref(), Some("salary >= 50000"));
        assert_eq!(sql("stock<10").as_deref(), Some("stock < 10"));
        assert_eq!(
            sql("whose manager_id = 3").as_deref(),
            Some("manager_id = 3")
        );
        assert_eq!(
            sql("email = abc@example.com").as_deref(),
            Some("email = 'abc@example.com'")
        );
    }

    #[test]
    fn test_comparison_beats_date() {
        assert_eq!(
            sql("order_date > 2023-01-01").as_deref(),
            Some("order_date > '2023-01-01'")
        );
    }

    #[test]
    fn test_date_operators() {
        assert_eq!(
            sql("placed after date 2023-01-01").as_deref(),
            Some("order_date > '2023-01-01'")
        );
        assert_eq!(sql("before 2022-12-31").as_deref(), Some("order_date < '2022-12-31'"));
        assert_eq!(sql("placed on 2022-12-31").as_deref(), Some("order_date = '2022-12-31'"));
        assert_eq!(sql("2022-12-31 please").as_deref(), Some("order_date = '2022-12-31'"));
    }

    #[test]
    fn test_date_column_from_context() {
        let ctx = MatchContext {
            date_column: "hired_on",
            known_columns: vec![],
        };
        let clause = match_date("after 2020-05-01", &ctx).unwrap();
        assert_eq!(clause.to_sql(), "hired_on > '2020-05-01'");
    }

    #[test]
    fn test_implied_equality() {
        assert_eq!(sql("city = delhi today").as_deref(), Some("city = 'delhi'"));
        assert_eq!(sql("age 25").as_deref(), Some("age = 25"));
        assert_eq!(sql("city mumbai").as_deref(), Some("city = 'mumbai'"));
    }

    #[test]
    fn test_bare_pair_needs_known_column() {
        assert_eq!(sql("all students"), None);
        assert_eq!(sql("age of"), None);
        assert_eq!(sql("name"), None);
        assert_eq!(sql("age of students"), None);
    }

    #[test]
    fn test_matcher_order() {
        let names: Vec<&str> = MATCHERS.iter().map(|(n, _)| *n).collect();
        assert_eq!(names, vec!["between", "comparison", "date", "implied_equality"]);
    }
}
