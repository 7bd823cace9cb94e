//! Value enum for dynamic cell values

use std::collections::BTreeMap;

use chrono::DateTime;
use chrono::NaiveDate;
use chrono::NaiveDateTime;
use chrono::SecondsFormat;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

/// A dynamic value that can hold any cell content.
///
/// Coercions follow loose scripting-language rules so that filters behave the
/// same whether a number arrives as `15` or `"15"`:
///
/// | Variant | display string | number |
/// |---------|----------------|--------|
/// | `Null` | `""` | `0` |
/// | `Bool` | `"true"`/`"false"` | `1`/`0` |
/// | `String` | itself | parsed, `""` is `0`, garbage is NaN |
/// | `DateTime` | RFC 3339 | epoch millis |
/// | `Array` | items joined by `,` | single item coerced, else NaN |
/// | `Object` | compact JSON | NaN |
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Null/empty value.
    #[default]
    Null,
    /// Boolean value.
    Bool(bool),
    /// 64-bit integer.
    Int(i64),
    /// 64-bit floating point.
    Float(f64),
    /// String value.
    String(String),
    /// Date and time. Only constructed programmatically; serialized values
    /// come back as strings and are parsed on demand.
    DateTime(DateTime<Utc>),
    /// List of values.
    Array(Vec<Value>),
    /// Nested object, reachable with dotted paths.
    Object(BTreeMap<String, Value>),
}

impl Value {
    /// Returns `true` if this is a null value.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns the type name of this value.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::DateTime(_) => "datetime",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Value::Int(_) | Value::Float(_))
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&BTreeMap<String, Value>> {
        match self {
            Value::Object(map) => Some(map),
            _ => None,
        }
    }

    /// Null or exactly the empty string. Whitespace is not empty.
    pub fn is_raw_empty(&self) -> bool {
        match self {
            Value::Null => true,
            Value::String(s) => s.is_empty(),
            _ => false,
        }
    }

    /// String form used for matching and display. Null renders as `""`.
    pub fn to_display_string(&self) -> String {
        match self {
            Value::Null => String::new(),
            Value::Bool(b) => b.to_string(),
            Value::Int(n) => n.to_string(),
            Value::Float(f) => format_number(*f),
            Value::String(s) => s.clone(),
            Value::DateTime(dt) => dt.to_rfc3339_opts(SecondsFormat::AutoSi, true),
            Value::Array(items) => items
                .iter()
                .map(Value::to_display_string)
                .collect::<Vec<_>>()
                .join(","),
            Value::Object(_) => serde_json::to_string(self).unwrap_or_default(),
        }
    }

    /// Numeric coercion. Unparseable input yields NaN.
    pub fn to_number(&self) -> f64 {
        match self {
            Value::Null => 0.0,
            Value::Bool(b) => f64::from(u8::from(*b)),
            Value::Int(n) => *n as f64,
            Value::Float(f) => *f,
            Value::String(s) => parse_number(s),
            Value::DateTime(dt) => dt.timestamp_millis() as f64,
            Value::Array(items) => match items.as_slice() {
                [] => 0.0,
                [single] => single.to_number(),
                _ => f64::NAN,
            },
            Value::Object(_) => f64::NAN,
        }
    }

    /// Date coercion. Numbers are epoch milliseconds.
    pub fn to_date(&self) -> Option<DateTime<Utc>> {
        match self {
            Value::DateTime(dt) => Some(*dt),
            Value::String(s) => parse_date(s),
            Value::Int(n) => DateTime::from_timestamp_millis(*n),
            Value::Float(f) if f.is_finite() => DateTime::from_timestamp_millis(*f as i64),
            _ => None,
        }
    }
}

/// Number coercion for optional lookups: a missing value is NaN.
pub fn coerce_number(value: Option<&Value>) -> f64 {
    value.map_or(f64::NAN, Value::to_number)
}

/// Format a float the way it reads in a table: integral values drop `.0`.
pub fn format_number(f: f64) -> String {
    if f.is_nan() {
        "NaN".to_string()
    } else if f.is_infinite() {
        let text = if f > 0.0 { "Infinity" } else { "-Infinity" };
        text.to_string()
    } else if f.fract() == 0.0 && f.abs() < 1e21 {
        format!("{}", f as i64)
    } else {
        f.to_string()
    }
}

/// Parse a number from text. Blank text is zero.
pub fn parse_number(s: &str) -> f64 {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return 0.0;
    }
    match trimmed {
        "Infinity" | "+Infinity" => return f64::INFINITY,
        "-Infinity" => return f64::NEG_INFINITY,
        _ => {}
    }
    if let Some(hex) = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
    {
        return i64::from_str_radix(hex, 16).map_or(f64::NAN, |n| n as f64);
    }
    // Rust accepts "inf" and "nan" spellings that should not count as numbers
    if trimmed
        .chars()
        .any(|c| c.is_ascii_alphabetic() && !matches!(c, 'e' | 'E'))
    {
        return f64::NAN;
    }
    trimmed.parse::<f64>().unwrap_or(f64::NAN)
}

/// Parse a date from the formats rows commonly carry.
///
/// Date-only and zone-less forms are read as UTC.
pub fn parse_date(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%d %H:%M",
    ] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return Some(naive.and_utc());
        }
    }
    for format in ["%Y-%m-%d", "%m/%d/%Y", "%Y/%m/%d"] {
        if let Ok(date) = NaiveDate::parse_from_str(s, format) {
            return date.and_hms_opt(0, 0, 0).map(|naive| naive.and_utc());
        }
    }
    DateTime::parse_from_rfc2822(s)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

// =============================================================================
// From implementations
// =============================================================================

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v.into())
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Value::Int(v.into())
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(v: DateTime<Utc>) -> Self {
        Value::DateTime(v)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Value::Array(v.into_iter().map(Into::into).collect())
    }
}

impl From<BTreeMap<String, Value>> for Value {
    fn from(v: BTreeMap<String, Value>) -> Self {
        Value::Object(v)
    }
}

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::Array(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => {
                Value::Object(map.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
            }
        }
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(v) => v.into(),
            None => Value::Null,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Datelike;

    use super::*;

    #[test]
    fn test_display_string() {
        assert_eq!(Value::Null.to_display_string(), "");
        assert_eq!(Value::Float(5.0).to_display_string(), "5");
        assert_eq!(Value::Float(2.5).to_display_string(), "2.5");
        assert_eq!(Value::from(vec![1, 2]).to_display_string(), "1,2");
        assert_eq!(Value::from(true).to_display_string(), "true");
    }

    #[test]
    fn test_number_coercion() {
        assert_eq!(Value::from("15").to_number(), 15.0);
        assert_eq!(Value::from("  8 ").to_number(), 8.0);
        assert_eq!(Value::from("").to_number(), 0.0);
        assert_eq!(Value::from("0x10").to_number(), 16.0);
        assert_eq!(Value::from("1e3").to_number(), 1000.0);
        assert!(Value::from("abc").to_number().is_nan());
        assert!(Value::from("inf").to_number().is_nan());
        assert!(coerce_number(None).is_nan());
        assert_eq!(Value::Null.to_number(), 0.0);
    }

    #[test]
    fn test_raw_empty() {
        assert!(Value::Null.is_raw_empty());
        assert!(Value::from("").is_raw_empty());
        assert!(!Value::from(" ").is_raw_empty());
        assert!(!Value::from(0).is_raw_empty());
    }

    #[test]
    fn test_parse_date_formats() {
        let date = parse_date("2024-03-05").map(|d| (d.year(), d.month(), d.day()));
        assert_eq!(date, Some((2024, 3, 5)));
        assert!(parse_date("2024-03-05T10:30:00Z").is_some());
        assert!(parse_date("2024-03-05 10:30:00").is_some());
        assert_eq!(
            parse_date("03/05/2024").map(|d| d.day()),
            Some(5),
            "month first"
        );
        assert!(parse_date("not a date").is_none());
        assert!(Value::Null.to_date().is_none());
    }

    #[test]
    fn test_from_json() {
        let json = serde_json::json!({"a": 1, "b": [true, null], "c": 1.5});
        let Value::Object(map) = Value::from(json) else {
            panic!("expected object");
        };
        assert_eq!(map.get("a"), Some(&Value::Int(1)));
        assert_eq!(map.get("c"), Some(&Value::Float(1.5)));
        assert_eq!(
            map.get("b"),
            Some(&Value::Array(vec![Value::Bool(true), Value::Null]))
        );
    }

    #[test]
    fn test_deserialize_untagged() {
        let value: Value = serde_json::from_str(r#"{"n": 3, "s": "x"}"#).unwrap_or_default();
        assert_eq!(value.as_object().map(|m| m.len()), Some(2));
    }
}
