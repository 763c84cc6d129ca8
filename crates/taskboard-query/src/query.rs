//! SQL query object: base select, AND-combined conditions, sort keys and limit.

use std::fmt;

use log::{debug, warn};
use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection};

use crate::error::QueryResult;
use crate::record::Record;

/// A SQL boolean expression with its positional (`?`) parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    sql: String,
    params: Vec<Value>,
}

impl Condition {
    /// Creates a condition from raw SQL; `params` bind its `?` placeholders
    /// in order.
    pub fn new(sql: impl Into<String>, params: Vec<Value>) -> Self {
        Self {
            sql: sql.into(),
            params,
        }
    }

    /// A condition no row satisfies.
    pub fn never() -> Self {
        Self::new("0 = 1", Vec::new())
    }

    /// `column = value`.
    pub fn eq(column: &str, value: impl Into<Value>) -> Self {
        Self::new(format!("{column} = ?"), vec![value.into()])
    }

    /// Compares `column` with `value` using `op` (`<`, `<=`, `>`, `>=`, `=`).
    pub fn compare(column: &str, op: &str, value: impl Into<Value>) -> Self {
        Self::new(format!("{column} {op} ?"), vec![value.into()])
    }

    /// `column IN (...)`; an empty set matches nothing.
    pub fn in_ids(column: &str, ids: &[i64]) -> Self {
        if ids.is_empty() {
            return Self::never();
        }
        let placeholders = vec!["?"; ids.len()].join(", ");
        Self::new(
            format!("{column} IN ({placeholders})"),
            ids.iter().map(|id| Value::Integer(*id)).collect(),
        )
    }

    /// Case-insensitive substring match.
    pub fn contains(column: &str, text: &str) -> Self {
        let escaped = text
            .replace('\\', "\\\\")
            .replace('%', "\\%")
            .replace('_', "\\_");
        Self::new(
            format!("{column} LIKE ? ESCAPE '\\'"),
            vec![Value::Text(format!("%{escaped}%"))],
        )
    }

    /// Case-insensitive equality on text.
    pub fn eq_nocase(column: &str, text: &str) -> Self {
        Self::new(
            format!("{column} = ? COLLATE NOCASE"),
            vec![Value::Text(text.to_string())],
        )
    }

    /// Joins conditions with AND. An empty list matches every row.
    pub fn all(conditions: Vec<Condition>) -> Self {
        Self::join(conditions, " AND ", "1 = 1")
    }

    /// Joins conditions with OR. An empty list matches nothing.
    pub fn any(conditions: Vec<Condition>) -> Self {
        Self::join(conditions, " OR ", "0 = 1")
    }

    fn join(conditions: Vec<Condition>, separator: &str, empty: &str) -> Self {
        if conditions.is_empty() {
            return Self::new(empty, Vec::new());
        }
        let mut sql = Vec::with_capacity(conditions.len());
        let mut params = Vec::new();
        for condition in conditions {
            sql.push(format!("({})", condition.sql));
            params.extend(condition.params);
        }
        Self::new(sql.join(separator), params)
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn params(&self) -> &[Value] {
        &self.params
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Direction::Asc => "ASC",
            Direction::Desc => "DESC",
        })
    }
}

/// Returns true if `key` is a plain (optionally table-qualified) identifier.
fn is_sort_key(key: &str) -> bool {
    !key.is_empty()
        && !key.starts_with('.')
        && !key.ends_with('.')
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.')
}

/// A select over one table family.
///
/// Conditions are AND-combined. Sort keys accumulate in call order; the
/// limit is replaced by each call.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    select: String,
    conditions: Vec<Condition>,
    order: Vec<(String, Direction)>,
    limit: Option<usize>,
}

impl Query {
    /// Creates a query from a `SELECT ... FROM ... [JOIN ...]` clause.
    pub fn new(select: impl Into<String>) -> Self {
        Self {
            select: select.into(),
            conditions: Vec::new(),
            order: Vec::new(),
            limit: None,
        }
    }

    /// Adds a condition.
    pub fn and_where(&mut self, condition: Condition) -> &mut Self {
        self.conditions.push(condition);
        self
    }

    /// Appends an ascending sort key.
    pub fn asc(&mut self, key: &str) -> &mut Self {
        self.order_by(key, Direction::Asc)
    }

    /// Appends a descending sort key.
    pub fn desc(&mut self, key: &str) -> &mut Self {
        self.order_by(key, Direction::Desc)
    }

    fn order_by(&mut self, key: &str, direction: Direction) -> &mut Self {
        if is_sort_key(key) {
            self.order.push((key.to_string(), direction));
        } else {
            warn!("event=query_sort module=query status=ignored key={key:?}");
        }
        self
    }

    /// Limits the number of rows.
    pub fn limit(&mut self, limit: usize) -> &mut Self {
        self.limit = Some(limit);
        self
    }

    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    pub fn order(&self) -> &[(String, Direction)] {
        &self.order
    }

    pub fn current_limit(&self) -> Option<usize> {
        self.limit
    }

    /// Renders the statement and its parameters.
    pub fn to_sql(&self) -> (String, Vec<Value>) {
        let mut sql = self.select.clone();
        let mut params = Vec::new();

        if !self.conditions.is_empty() {
            let clauses: Vec<String> = self
                .conditions
                .iter()
                .map(|c| format!("({})", c.sql))
                .collect();
            sql.push_str(" WHERE ");
            sql.push_str(&clauses.join(" AND "));
            for condition in &self.conditions {
                params.extend(condition.params.iter().cloned());
            }
        }

        if !self.order.is_empty() {
            let keys: Vec<String> = self
                .order
                .iter()
                .map(|(key, direction)| format!("{key} {direction}"))
                .collect();
            sql.push_str(" ORDER BY ");
            sql.push_str(&keys.join(", "));
        }

        if let Some(limit) = self.limit {
            sql.push_str(&format!(" LIMIT {limit}"));
        }

        (sql, params)
    }

    /// Runs the query and returns every row in database order.
    pub fn fetch(&self, conn: &Connection) -> QueryResult<Vec<Record>> {
        let (sql, params) = self.to_sql();
        debug!("event=query_fetch module=query sql={sql:?} params={}", params.len());

        let mut stmt = conn.prepare(&sql)?;
        let columns: Vec<String> = stmt.column_names().iter().map(|c| c.to_string()).collect();
        let rows = stmt.query_map(params_from_iter(params), |row| Record::from_row(row, &columns))?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_keys_append() {
        let mut query = Query::new("SELECT * FROM tasks");
        query.asc("tasks.date_started").asc("tasks.date_creation");
        let (sql, _) = query.to_sql();
        assert_eq!(
            sql,
            "SELECT * FROM tasks ORDER BY tasks.date_started ASC, tasks.date_creation ASC"
        );
    }

    #[test]
    fn test_last_limit_wins() {
        let mut query = Query::new("SELECT * FROM tasks");
        query.limit(50).desc("id").limit(500);
        assert_eq!(query.current_limit(), Some(500));
        assert_eq!(query.to_sql().0, "SELECT * FROM tasks ORDER BY id DESC LIMIT 500");
    }

    #[test]
    fn test_unsafe_sort_key_ignored() {
        let mut query = Query::new("SELECT * FROM tasks");
        query.asc("id; DROP TABLE tasks").asc("").desc("position");
        assert_eq!(query.order(), &[("position".to_string(), Direction::Desc)]);
    }

    #[test]
    fn test_conditions_and_combined_with_params_in_order() {
        let mut query = Query::new("SELECT * FROM tasks");
        query
            .and_where(Condition::eq("project_id", 3_i64))
            .and_where(Condition::contains("title", "50%_off"));
        let (sql, params) = query.to_sql();
        assert_eq!(
            sql,
            "SELECT * FROM tasks WHERE (project_id = ?) AND (title LIKE ? ESCAPE '\\')"
        );
        assert_eq!(
            params,
            vec![Value::Integer(3), Value::Text("%50\\%\\_off%".to_string())]
        );
    }

    #[test]
    fn test_empty_in_list_matches_nothing() {
        assert_eq!(Condition::in_ids("id", &[]), Condition::never());
        let condition = Condition::in_ids("id", &[1, 2]);
        assert_eq!(condition.sql(), "id IN (?, ?)");
    }

    #[test]
    fn test_any_and_all() {
        let any = Condition::any(vec![Condition::eq("a", 1_i64), Condition::eq("b", 2_i64)]);
        assert_eq!(any.sql(), "(a = ?) OR (b = ?)");
        assert_eq!(any.params().len(), 2);
        assert_eq!(Condition::any(Vec::new()).sql(), "0 = 1");
        assert_eq!(Condition::all(Vec::new()).sql(), "1 = 1");
    }
}
