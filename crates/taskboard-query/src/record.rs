//! A fetched row, addressed by column name.

use rusqlite::types::Value;
use rusqlite::Row;

/// One row of a query result, keeping the select order of its columns.
///
/// Accessors return `None` for absent columns and SQL `NULL`, so formatters
/// never fail on a missing optional field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    fields: Vec<(String, Value)>,
}

impl Record {
    pub(crate) fn from_row(row: &Row<'_>, columns: &[String]) -> rusqlite::Result<Self> {
        let mut fields = Vec::with_capacity(columns.len());
        for (index, name) in columns.iter().enumerate() {
            fields.push((name.clone(), row.get::<_, Value>(index)?));
        }
        Ok(Self { fields })
    }

    /// Builds a record from `(column, value)` pairs.
    pub fn from_pairs<K: Into<String>, V: Into<Value>>(pairs: impl IntoIterator<Item = (K, V)>) -> Self {
        Self {
            fields: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Raw value of a column; `NULL` is reported as absent.
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
            .filter(|value| !matches!(value, Value::Null))
    }

    /// Integer value; numeric text is accepted.
    pub fn int(&self, column: &str) -> Option<i64> {
        match self.get(column)? {
            Value::Integer(i) => Some(*i),
            Value::Real(f) => Some(*f as i64),
            Value::Text(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Floating point value.
    pub fn float(&self, column: &str) -> Option<f64> {
        match self.get(column)? {
            Value::Integer(i) => Some(*i as f64),
            Value::Real(f) => Some(*f),
            Value::Text(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Text value.
    pub fn text(&self, column: &str) -> Option<&str> {
        match self.get(column)? {
            Value::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Non-empty text value.
    pub fn non_empty(&self, column: &str) -> Option<&str> {
        self.text(column).filter(|s| !s.trim().is_empty())
    }

    /// Text value or the empty string.
    pub fn text_or_empty(&self, column: &str) -> String {
        self.text(column).unwrap_or_default().to_string()
    }

    /// Id value where `0` means none.
    pub fn id(&self, column: &str) -> Option<i64> {
        self.int(column).filter(|id| *id > 0)
    }

    /// Timestamp value where `0` means unset.
    pub fn timestamp(&self, column: &str) -> Option<i64> {
        self.int(column).filter(|ts| *ts != 0)
    }

    /// Boolean stored as an integer.
    pub fn flag(&self, column: &str) -> Option<bool> {
        self.int(column).map(|v| v != 0)
    }

    pub fn contains(&self, column: &str) -> bool {
        self.fields.iter().any(|(name, _)| name == column)
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }
}
