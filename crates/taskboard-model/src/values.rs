//! Loosely typed field maps.
//!
//! Form submissions and API calls arrive as string fields; validators check
//! them before anything is converted into typed store input. [`Changes`]
//! describes a partial update of one row.

use std::collections::BTreeMap;

use rusqlite::types::Value;
use serde::{Deserialize, Serialize};

/// Submitted field values, keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Values(BTreeMap<String, String>);

impl Values {
    /// Creates an empty set of values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, field: impl Into<String>, value: impl ToString) -> Self {
        self.insert(field, value);
        self
    }

    /// Sets a field.
    pub fn insert(&mut self, field: impl Into<String>, value: impl ToString) {
        self.0.insert(field.into(), value.to_string());
    }

    /// Sets a field only when it is not present yet.
    pub fn insert_default(&mut self, field: impl Into<String>, value: impl ToString) {
        self.0.entry(field.into()).or_insert_with(|| value.to_string());
    }

    /// Returns a raw field value.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    /// Returns a trimmed, non-empty field value.
    pub fn text(&self, field: &str) -> Option<&str> {
        self.get(field).map(str::trim).filter(|s| !s.is_empty())
    }

    /// Returns a field parsed as an integer.
    pub fn int(&self, field: &str) -> Option<i64> {
        self.text(field).and_then(|s| s.parse().ok())
    }

    /// Returns an integer field where `0` means "not set".
    pub fn id(&self, field: &str) -> Option<i64> {
        self.int(field).filter(|id| *id > 0)
    }

    /// Returns true if the field was submitted at all.
    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    /// Returns true if no field was submitted.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Copies every field of `other` over this map.
    pub fn merge(&mut self, other: &Values) {
        for (key, value) in &other.0 {
            self.0.insert(key.clone(), value.clone());
        }
    }

    /// Iterates over fields in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: ToString> FromIterator<(K, V)> for Values {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut values = Values::new();
        for (k, v) in iter {
            values.insert(k, v);
        }
        values
    }
}

/// A partial update: column name to new value, in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Changes {
    fields: Vec<(String, Value)>,
}

impl Changes {
    /// Creates an empty change set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a column to a value, replacing an earlier value for the same column.
    pub fn set(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        let column = column.into();
        let value = value.into();
        if let Some(existing) = self.fields.iter_mut().find(|(c, _)| *c == column) {
            existing.1 = value;
        } else {
            self.fields.push((column, value));
        }
        self
    }

    /// Returns the changed columns and their values.
    pub fn fields(&self) -> &[(String, Value)] {
        &self.fields
    }

    /// Returns the new value of one column, if it changes.
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.fields.iter().find(|(c, _)| c == column).map(|(_, v)| v)
    }

    /// Returns true if nothing changes.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
