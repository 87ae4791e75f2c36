use std::collections::{BTreeMap, BTreeSet};
use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use crate::error::{DndError, DndResult};
use crate::value::Value;

/// A flat key/value record describing one resource.
///
/// The host stores exactly one of these per tracked resource. Desired
/// configuration, planned values, and persisted attributes all share this
/// shape.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    fields: BTreeMap<String, Value>,
}

impl Record {
    /// Create an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a raw field value.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Set a field, replacing any previous value.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(key.into(), value.into());
    }

    /// Builder-style [`Record::set`].
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(key, value);
        self
    }

    /// Remove a field, returning its previous value.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.fields.remove(key)
    }

    /// Returns true if the field is present.
    pub fn contains(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    /// Iterate over fields in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.fields.iter()
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if the record has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Get an integer field. Absent is `Ok(None)`; any other type is a
    /// validation error.
    pub fn get_i64(&self, key: &str) -> DndResult<Option<i64>> {
        self.typed(key, Value::as_i64)
    }

    /// Get an integer field that must lie within `range`.
    pub fn get_i64_in(&self, key: &str, range: RangeInclusive<i64>) -> DndResult<Option<i64>> {
        match self.get_i64(key)? {
            Some(n) if !range.contains(&n) => Err(DndError::validation(
                key,
                format!("expected {}..={}, got {n}", range.start(), range.end()),
            )),
            other => Ok(other),
        }
    }

    /// Get a string field. Absent is `Ok(None)`; any other type is a
    /// validation error.
    pub fn get_str(&self, key: &str) -> DndResult<Option<&str>> {
        self.typed(key, Value::as_str)
    }

    /// Get a list field. Absent is `Ok(None)`; any other type is a
    /// validation error.
    pub fn get_list(&self, key: &str) -> DndResult<Option<&[Value]>> {
        self.typed(key, Value::as_list)
    }

    /// Get a map field. Absent is `Ok(None)`; any other type is a
    /// validation error.
    pub fn get_map(&self, key: &str) -> DndResult<Option<&BTreeMap<String, Value>>> {
        self.typed(key, Value::as_map)
    }

    /// Keys whose values differ between `self` and `other`.
    ///
    /// A key present on only one side counts as changed.
    pub fn changed_keys(&self, other: &Record) -> BTreeSet<String> {
        self.fields
            .keys()
            .chain(other.fields.keys())
            .filter(|key| self.fields.get(*key) != other.fields.get(*key))
            .cloned()
            .collect()
    }

    fn typed<'a, T>(
        &'a self,
        key: &str,
        extract: impl Fn(&'a Value) -> Option<T>,
    ) -> DndResult<Option<T>> {
        match self.fields.get(key) {
            None => Ok(None),
            Some(value) => extract(value).map(Some).ok_or_else(|| {
                DndError::validation(key, format!("unexpected {}", value.type_name()))
            }),
        }
    }
}

impl FromIterator<(String, Value)> for Record {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}
