//! Join inference.
//!
//! Builds the FROM clause for the detected tables. Tables are attached in
//! the order given, each one against the table attached just before it:
//!
//! 1. foreign key `previous.col -> next.col`
//! 2. foreign key `next.col -> previous.col`
//! 3. naming convention `previous.<singular next>_id = next.id`
//! 4. cross join (`, next`)
//!
//! The list is never reordered or deduplicated. A repeated table therefore
//! yields an un-aliased self join such as
//! `employees JOIN employees ON employees.manager_id = employees.id`, which
//! most databases reject as ambiguous.

use crate::ast::{ColumnRef, FromClause, Join};
use crate::schema::{Schema, singular};

/// FROM clause for `tables`, or `None` when the list is empty.
pub fn resolve_from(schema: &Schema, tables: &[String]) -> Option<FromClause> {
    let (first, rest) = tables.split_first()?;
    let mut from = FromClause::table(first);
    let mut previous = first.as_str();

    for table in rest {
        let join = infer_join(schema, previous, table);
        if let Join::Cross { .. } = join {
            tracing::debug!("No join key between '{}' and '{}', cross joining", previous, table);
        }
        from.joins.push(join);
        previous = table.as_str();
    }

    Some(from)
}

/// How to attach `table` to `previous`.
pub fn infer_join(schema: &Schema, previous: &str, table: &str) -> Join {
    let fks = schema.foreign_keys();

    if let Some(fk) = fks
        .iter()
        .find(|fk| fk.table == previous && fk.references_table == table)
    {
        if fk.is_self_reference() {
            tracing::debug!("Self join on '{}' is emitted without aliases", table);
        }
        return Join::Inner {
            table: table.to_string(),
            left: ColumnRef::new(&fk.table, &fk.column),
            right: ColumnRef::new(table, &fk.references_column),
        };
    }

    if let Some(fk) = fks
        .iter()
        .find(|fk| fk.table == table && fk.references_table == previous)
    {
        return Join::Inner {
            table: table.to_string(),
            left: ColumnRef::new(table, &fk.column),
            right: ColumnRef::new(previous, &fk.references_column),
        };
    }

    let convention = format!("{}_id", singular(table));
    if schema.has_column(previous, &convention) {
        return Join::Inner {
            table: table.to_string(),
            left: ColumnRef::new(previous, &convention),
            right: ColumnRef::new(table, "id"),
        };
    }

    Join::Cross {
        table: table.to_string(),
    }
}
