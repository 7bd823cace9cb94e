use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use super::builtin;
use super::types::{ColumnFilter, FilterFn, FilterType};
use crate::model::Row;

/// Name to predicate lookup for filter evaluation.
///
/// Starts with the five built-ins registered under their type names
/// (`"text"`, `"multi-select"`, ...). Custom predicates are registered under
/// the `filterKey` columns refer to; registering a built-in name replaces it.
#[derive(Clone)]
pub struct FilterRegistry {
    fns: HashMap<String, FilterFn>,
}

impl FilterRegistry {
    /// Registry with the built-in predicates.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with nothing registered.
    pub fn empty() -> Self {
        Self {
            fns: HashMap::new(),
        }
    }

    /// Register a predicate, returning the one it replaced.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        f: impl Fn(&Row, &str, &ColumnFilter) -> bool + Send + Sync + 'static,
    ) -> Option<FilterFn> {
        self.fns.insert(name.into(), Arc::new(f))
    }

    pub fn with(
        mut self,
        name: impl Into<String>,
        f: impl Fn(&Row, &str, &ColumnFilter) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.register(name, f);
        self
    }

    pub fn unregister(&mut self, name: &str) -> Option<FilterFn> {
        self.fns.remove(name)
    }

    pub fn get(&self, name: &str) -> Option<&FilterFn> {
        self.fns.get(name)
    }

    pub fn for_type(&self, filter_type: FilterType) -> Option<&FilterFn> {
        self.get(filter_type.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fns.contains_key(name)
    }

    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.fns.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl Default for FilterRegistry {
    fn default() -> Self {
        Self::empty()
            .with(FilterType::Text.as_str(), builtin::text)
            .with(FilterType::MultiSelect.as_str(), builtin::multi_select)
            .with(FilterType::NumberRange.as_str(), builtin::number_range)
            .with(FilterType::DateRange.as_str(), builtin::date_range)
            .with(FilterType::Custom.as_str(), builtin::custom)
    }
}

impl fmt::Debug for FilterRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterRegistry")
            .field("names", &self.names())
            .finish()
    }
}
