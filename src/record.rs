//! Records and operation outcomes
//!
//! A [`Record`] is an open-ended ordered mapping of column name to scalar
//! value. The same type doubles as the condition map and the update map used
//! by the gateway, so column order is preserved: INSERT statements list
//! columns in the order the caller set them.

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

use crate::value::Value;

/// One row of an arbitrary table, or a column->value condition/update map.
///
/// No schema is enforced by this layer; schema is entirely the caller's
/// responsibility.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    entries: Vec<(String, Value)>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a column value. Re-setting an existing column replaces its value
    /// in place without changing the column's position.
    pub fn set(&mut self, column: &str, value: impl Into<Value>) {
        let value = value.into();
        match self.entries.iter_mut().find(|(name, _)| name == column) {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((column.to_string(), value)),
        }
    }

    /// Builder-style variant of [`Record::set`]
    pub fn with(mut self, column: &str, value: impl Into<Value>) -> Self {
        self.set(column, value);
        self
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Column names in insertion order
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    /// Values in insertion order
    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.entries.iter().map(|(_, value)| value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries
            .iter()
            .map(|(name, value)| (name.as_str(), value))
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, value) in &self.entries {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// Row payload of a read, or the synthesized payload of a write
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Payload {
    One(Record),
    Many(Vec<Record>),
}

/// Outcome of one database operation.
///
/// Reads populate `payload` and leave the count fields absent; writes populate
/// `last_insert_id` and `rows_affected`, with `payload` synthesized by the
/// caller where it makes sense (e.g. insert echoes the stored record).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct QueryResult {
    pub last_insert_id: Option<i64>,
    pub rows_affected: Option<usize>,
    pub payload: Option<Payload>,
}

impl QueryResult {
    /// Result of a read: all matching rows, no counts
    pub fn rows(records: Vec<Record>) -> Self {
        QueryResult {
            last_insert_id: None,
            rows_affected: None,
            payload: Some(Payload::Many(records)),
        }
    }

    /// Result of a mutation: counts, no payload
    pub fn mutation(last_insert_id: i64, rows_affected: usize) -> Self {
        QueryResult {
            last_insert_id: Some(last_insert_id),
            rows_affected: Some(rows_affected),
            payload: None,
        }
    }
}
