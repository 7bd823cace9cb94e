//! Dynamic table row

use std::collections::BTreeMap;

use serde::Deserialize;
use serde::Serialize;

use super::Value;

static EMPTY: Value = Value::String(String::new());

/// One row of table data: field name to value.
///
/// # Example
///
/// ```
/// use datagrid_lib::model::Row;
///
/// let row = Row::new().set("id", 1).set("name", "Contoso");
/// assert_eq!(row.get("name").map(|v| v.to_display_string()), Some("Contoso".into()));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Row {
    fields: BTreeMap<String, Value>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // Builder
    // =========================================================================

    /// Sets a field value, returning the row for chaining.
    pub fn set(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(field.into(), value.into());
        self
    }

    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.fields.insert(field.into(), value.into())
    }

    pub fn remove(&mut self, field: &str) -> Option<Value> {
        self.fields.remove(field)
    }

    // =========================================================================
    // Field access
    // =========================================================================

    /// Returns a reference to the field value, if it exists.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// Field lookup used by the engines: an exact key first, then a dotted
    /// path through nested objects.
    pub fn lookup(&self, field: &str) -> Option<&Value> {
        self.fields
            .get(field)
            .or_else(|| field.contains('.').then(|| self.get_path(field)).flatten())
    }

    /// Walks `a.b.c` through nested objects.
    pub fn get_path(&self, path: &str) -> Option<&Value> {
        let mut segments = path.split('.');
        let mut current = self.fields.get(segments.next()?)?;
        for segment in segments {
            current = current.as_object()?.get(segment)?;
        }
        Some(current)
    }

    /// Dotted lookup where anything missing or null reads as `""`.
    pub fn get_nested(&self, path: &str) -> &Value {
        match self.lookup(path) {
            Some(Value::Null) | None => &EMPTY,
            Some(value) => value,
        }
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.fields.values()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl AsRef<Row> for Row {
    fn as_ref(&self) -> &Row {
        self
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Row {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}
