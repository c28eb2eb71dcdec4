//! SQL rendering for the query AST.

use crate::ast::*;

/// Trait for converting AST nodes to SQL.
pub trait ToSql {
    /// Convert this node to a SQL string.
    fn to_sql(&self) -> String;
}

impl ToSql for SelectQuery {
    fn to_sql(&self) -> String {
        let mut sql = String::from("SELECT ");
        sql.push_str(&self.fields.to_sql());
        sql.push_str(" FROM ");
        sql.push_str(&self.from.to_sql());

        if !self.filter.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&self.filter.to_sql());
        }

        sql.push(';');
        sql
    }
}

impl ToSql for Fields {
    fn to_sql(&self) -> String {
        match self {
            Fields::Star => "*".to_string(),
            Fields::Columns(cols) if cols.is_empty() => "*".to_string(),
            Fields::Columns(cols) => cols.join(", "),
        }
    }
}

impl ToSql for FromClause {
    fn to_sql(&self) -> String {
        let mut sql = self.base.clone();
        for join in &self.joins {
            match join {
                Join::Inner { table, left, right } => {
                    sql.push_str(&format!(" JOIN {} ON {} = {}", table, left, right));
                }
                Join::Cross { table } => {
                    sql.push_str(", ");
                    sql.push_str(table);
                }
            }
        }
        sql
    }
}

impl ToSql for Clause {
    fn to_sql(&self) -> String {
        match &self.predicate {
            Predicate::Compare { op, value } => format!("{} {} {}", self.column, op, value),
            Predicate::Between { low, high } => {
                format!("{} BETWEEN {} AND {}", self.column, low, high)
            }
        }
    }
}

impl ToSql for Filter {
    fn to_sql(&self) -> String {
        let mut parts: Vec<String> = Vec::with_capacity(self.clauses.len() * 2);

        for (i, clause) in self.clauses.iter().enumerate() {
            let sql = clause.to_sql();
            if i == 0 {
                if self.negate_first {
                    parts.push(format!("NOT ({})", sql));
                } else {
                    parts.push(sql);
                }
                continue;
            }

            // NOT wraps the following clause instead of sitting between two
            match self.connector_before(i) {
                Connector::And => parts.push(format!("AND {}", sql)),
                Connector::Or => parts.push(format!("OR {}", sql)),
                Connector::Not => parts.push(format!("AND NOT ({})", sql)),
                Connector::OrNot => parts.push(format!("OR NOT ({})", sql)),
            }
        }

        parts.join(" ")
    }
}
