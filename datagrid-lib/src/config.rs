//! Table configuration

use serde::Deserialize;

use crate::error::DatagridError;
use crate::model::RowKey;
use crate::query::SearchScope;

/// Behaviour settings of one [`DataTable`](crate::DataTable).
///
/// # Example
///
/// ```
/// use datagrid_lib::TableConfig;
///
/// let config = TableConfig::from_json(r#"{"rowsPerPage": 25, "accordion": true}"#).unwrap();
/// assert_eq!(config.rows_per_page, Some(25));
/// assert!(config.multi_sort_enabled);
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TableConfig {
    /// Page size. `None` or `0` shows every row on one page.
    ///
    /// Default: `Some(10)`
    pub rows_per_page: Option<usize>,

    /// Row identity for selection and expansion.
    ///
    /// Default: the `"id"` field
    pub row_key: RowKey,

    /// Values matched by the search box.
    ///
    /// Default: every value of the row
    pub search_scope: SearchScope,

    /// At most one expanded row.
    ///
    /// Default: `false`
    pub accordion: bool,

    /// Whether a modifier-click appends sort keys.
    ///
    /// Default: `true`
    pub multi_sort_enabled: bool,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            rows_per_page: Some(10),
            row_key: RowKey::default(),
            search_scope: SearchScope::default(),
            accordion: false,
            multi_sort_enabled: true,
        }
    }
}

impl TableConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(json: &str) -> Result<Self, DatagridError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn with_rows_per_page(mut self, rows_per_page: Option<usize>) -> Self {
        self.rows_per_page = rows_per_page;
        self
    }

    pub fn with_row_key(mut self, row_key: RowKey) -> Self {
        self.row_key = row_key;
        self
    }

    pub fn with_search_scope(mut self, scope: SearchScope) -> Self {
        self.search_scope = scope;
        self
    }

    pub fn with_accordion(mut self, accordion: bool) -> Self {
        self.accordion = accordion;
        self
    }

    pub fn with_multi_sort(mut self, enabled: bool) -> Self {
        self.multi_sort_enabled = enabled;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = TableConfig::default();
        assert_eq!(config.rows_per_page, Some(10));
        assert!(matches!(config.row_key, RowKey::Field(ref f) if f == "id"));
        assert_eq!(config.search_scope, SearchScope::AllFields);
        assert!(!config.accordion);
        assert!(config.multi_sort_enabled);
    }

    #[test]
    fn test_from_json() {
        let config = TableConfig::from_json(
            r#"{"rowsPerPage": null, "rowKey": "uuid", "searchScope": "declaredColumns"}"#,
        )
        .unwrap();
        assert_eq!(config.rows_per_page, None);
        assert!(matches!(config.row_key, RowKey::Field(ref f) if f == "uuid"));
        assert_eq!(config.search_scope, SearchScope::DeclaredColumns);
    }

    #[test]
    fn test_field_list_scope() {
        let config = TableConfig::from_json(r#"{"searchScope": {"fields": ["name"]}}"#).unwrap();
        assert_eq!(
            config.search_scope,
            SearchScope::Fields(vec!["name".to_string()])
        );
    }

    #[test]
    fn test_invalid_json_is_config_error() {
        let err = TableConfig::from_json("{").unwrap_err();
        assert!(matches!(err, DatagridError::Config(_)));
    }
}
