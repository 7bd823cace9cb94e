//! Free-text search across row values

use serde::Deserialize;
use serde::Serialize;

use crate::model::{Row, Value};

/// Which values a search query is matched against.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SearchScope {
    /// Every value in the row, including fields no column shows.
    #[default]
    AllFields,
    /// Only the fields of declared leaf columns.
    DeclaredColumns,
    /// An explicit field list.
    Fields(Vec<String>),
}

/// Keep rows where any searched value contains `query`, case-insensitively.
///
/// A blank query returns the rows unchanged. `fields` restricts matching to
/// those fields; `None` matches every value of the row.
pub fn search_rows<R: AsRef<Row> + Clone>(
    rows: &[R],
    query: &str,
    fields: Option<&[String]>,
) -> Vec<R> {
    if query.trim().is_empty() {
        return rows.to_vec();
    }
    let needle = query.to_lowercase();

    rows.iter()
        .filter(|row| {
            let row = row.as_ref();
            match fields {
                Some(fields) => fields
                    .iter()
                    .any(|field| matches(row.lookup(field), &needle)),
                None => row.values().any(|value| matches(Some(value), &needle)),
            }
        })
        .cloned()
        .collect()
}

/// Nested arrays and objects match on their leaf values, never on keys.
fn matches(value: Option<&Value>, needle: &str) -> bool {
    match value {
        None => false,
        Some(Value::Array(items)) => items.iter().any(|v| matches(Some(v), needle)),
        Some(Value::Object(map)) => map.values().any(|v| matches(Some(v), needle)),
        Some(v) => v.to_display_string().to_lowercase().contains(needle),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows() -> Vec<Row> {
        vec![
            Row::new().set("name", "Alice").set("note", "vip"),
            Row::new().set("name", "Bob").set("note", "Alice's friend"),
            Row::new().set("name", "Carol").set("age", 41),
        ]
    }

    #[test]
    fn test_blank_query_is_identity() {
        assert_eq!(search_rows(&rows(), "   ", None).len(), 3);
        assert_eq!(search_rows(&rows(), "", None).len(), 3);
    }

    #[test]
    fn test_all_fields_case_insensitive() {
        let result = search_rows(&rows(), "ALICE", None);
        assert_eq!(result.len(), 2);
        assert_eq!(search_rows(&rows(), "41", None).len(), 1, "numbers match as text");
    }

    #[test]
    fn test_field_subset() {
        let fields = vec!["name".to_string()];
        let result = search_rows(&rows(), "alice", Some(fields.as_slice()));
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].get("name"), Some(&Value::from("Alice")));
    }

    #[test]
    fn test_query_is_not_trimmed_when_matching() {
        assert_eq!(search_rows(&rows(), "bob ", None).len(), 0);
    }

    #[test]
    fn test_nested_values_match_but_keys_do_not() {
        let address = Value::from(serde_json::json!({"city": "Paris", "tags": ["home"]}));
        let rows = vec![Row::new().set("name", "Bob").set("address", address)];
        assert!(search_rows(&rows, "city", None).is_empty());
        assert!(search_rows(&rows, "tags", None).is_empty());
        assert_eq!(search_rows(&rows, "paris", None).len(), 1);
        assert_eq!(search_rows(&rows, "HOME", None).len(), 1);

        let fields = vec!["address".to_string()];
        assert!(search_rows(&rows, "city", Some(fields.as_slice())).is_empty());
        assert_eq!(search_rows(&rows, "paris", Some(fields.as_slice())).len(), 1);
    }

    #[test]
    fn test_works_on_borrowed_rows() {
        let owned = rows();
        let borrowed: Vec<&Row> = owned.iter().collect();
        let result = search_rows(&borrowed, "carol", None);
        assert!(std::ptr::eq(result[0], &owned[2]));
    }
}
