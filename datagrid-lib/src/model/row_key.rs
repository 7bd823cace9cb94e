//! Row identity

use std::fmt;
use std::sync::Arc;

use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;

use super::Row;
use super::Value;

/// Identity of a row for selection and expansion membership.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RowId {
    Int(i64),
    Str(String),
}

impl RowId {
    /// Identity carried by a cell value. Null and `""` carry none.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Null => None,
            Value::String(s) if s.is_empty() => None,
            Value::Int(n) => Some(RowId::Int(*n)),
            Value::Float(f) if f.fract() == 0.0 && f.is_finite() => Some(RowId::Int(*f as i64)),
            other => Some(RowId::Str(other.to_display_string())),
        }
    }
}

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowId::Int(n) => write!(f, "{n}"),
            RowId::Str(s) => write!(f, "{s}"),
        }
    }
}

impl From<i64> for RowId {
    fn from(v: i64) -> Self {
        RowId::Int(v)
    }
}

impl From<i32> for RowId {
    fn from(v: i32) -> Self {
        RowId::Int(v.into())
    }
}

impl From<usize> for RowId {
    fn from(v: usize) -> Self {
        RowId::Int(v as i64)
    }
}

impl From<&str> for RowId {
    fn from(v: &str) -> Self {
        RowId::Str(v.to_string())
    }
}

impl From<String> for RowId {
    fn from(v: String) -> Self {
        RowId::Str(v)
    }
}

pub type RowKeyFn = Arc<dyn Fn(&Row, usize) -> RowId + Send + Sync>;

/// How a row's identity is derived: a named field or a function of
/// `(row, index)`.
#[derive(Clone)]
pub enum RowKey {
    /// Value of this field. Rows where it is missing, null or `""` fall back
    /// to their index.
    Field(String),
    Fn(RowKeyFn),
}

impl RowKey {
    pub fn field(name: impl Into<String>) -> Self {
        RowKey::Field(name.into())
    }

    pub fn func(f: impl Fn(&Row, usize) -> RowId + Send + Sync + 'static) -> Self {
        RowKey::Fn(Arc::new(f))
    }

    /// Identity of `row` at position `index`.
    pub fn id_of(&self, row: &Row, index: usize) -> RowId {
        match self {
            RowKey::Field(field) => row
                .lookup(field)
                .and_then(RowId::from_value)
                .unwrap_or(RowId::from(index)),
            RowKey::Fn(f) => f(row, index),
        }
    }
}

impl Default for RowKey {
    fn default() -> Self {
        RowKey::Field("id".to_string())
    }
}

impl fmt::Debug for RowKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowKey::Field(field) => f.debug_tuple("Field").field(field).finish(),
            RowKey::Fn(_) => f.write_str("Fn(..)"),
        }
    }
}

/// Configuration files name the key field.
impl<'de> Deserialize<'de> for RowKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(RowKey::Field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_key() {
        let key = RowKey::default();
        let row = Row::new().set("id", 42);
        assert_eq!(key.id_of(&row, 3), RowId::Int(42));
    }

    #[test]
    fn test_missing_field_falls_back_to_index() {
        let key = RowKey::field("uuid");
        assert_eq!(key.id_of(&Row::new().set("id", 1), 7), RowId::Int(7));
        assert_eq!(key.id_of(&Row::new().set("uuid", ""), 2), RowId::Int(2));
    }

    #[test]
    fn test_fn_key() {
        let key = RowKey::func(|row, _| RowId::from(row.get_nested("code").to_display_string()));
        let row = Row::new().set("code", "A-1");
        assert_eq!(key.id_of(&row, 0), RowId::from("A-1"));
    }

    #[test]
    fn test_deserialize_from_field_name() {
        let key: RowKey = serde_json::from_str("\"sku\"").unwrap_or_default();
        assert!(matches!(key, RowKey::Field(ref f) if f == "sku"));
    }
}
