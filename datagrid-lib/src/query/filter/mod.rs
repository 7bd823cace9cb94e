//! Filter engine
//!
//! Per-column predicates combined with AND. Each column's filter is evaluated
//! by, in order: the column's inline `filter_fn`, the registry entry named by
//! a custom filter's `filterKey`, or the registry entry for the filter type.

mod builtin;
mod registry;
mod types;

use std::collections::BTreeMap;

use serde::Deserialize;
use serde::Serialize;

pub use builtin::{custom, date_range, multi_select, number_range, text};
pub use registry::FilterRegistry;
pub use types::*;

use crate::model::{Column, Row, Value, leaf_columns};

/// Active filters keyed by column field.
pub type FilterState = BTreeMap<String, ColumnFilter>;

/// Keep the rows every filtered leaf column accepts, in their original order.
///
/// Filters on fields no leaf column renders are ignored, as are columns
/// without a field.
pub fn apply_filters<R: AsRef<Row> + Clone>(
    rows: &[R],
    columns: &[Column],
    filters: &FilterState,
    registry: &FilterRegistry,
) -> Vec<R> {
    let active: Vec<(&Column, &ColumnFilter)> = leaf_columns(columns)
        .into_iter()
        .filter(|column| !column.field.is_empty())
        .filter_map(|column| filters.get(&column.field).map(|filter| (column, filter)))
        .collect();

    if active.is_empty() {
        return rows.to_vec();
    }

    rows.iter()
        .filter(|row| {
            active
                .iter()
                .all(|(column, filter)| evaluate(registry, column, filter, row.as_ref()))
        })
        .cloned()
        .collect()
}

/// Evaluate one column filter against one row.
pub fn evaluate(
    registry: &FilterRegistry,
    column: &Column,
    filter: &ColumnFilter,
    row: &Row,
) -> bool {
    let spec = column.filter.as_ref();
    if let Some(inline) = spec.and_then(|s| s.filter_fn.as_ref()) {
        return inline.call(row.lookup(&column.field), &filter.value(), row);
    }

    if let ColumnFilter::Custom { filter_key, .. } = filter {
        let key = filter_key
            .as_deref()
            .or_else(|| spec.and_then(|s| s.filter_key.as_deref()));
        if let Some(f) = key.and_then(|key| registry.get(key)) {
            return f(row, &column.field, filter);
        }
        if let Some(key) = key {
            log::debug!("No filter registered under '{key}', using equality");
        }
    }

    match registry.for_type(filter.filter_type()) {
        Some(f) => f(row, &column.field, filter),
        None => true,
    }
}

/// Neutral filter for a type, as a freshly opened filter menu starts.
pub fn init_filter(filter_type: FilterType) -> ColumnFilter {
    match filter_type {
        FilterType::Text => ColumnFilter::Text {
            operator: Some(TextOperator::Contains),
            value: String::new(),
        },
        FilterType::MultiSelect => ColumnFilter::MultiSelect { value: Vec::new() },
        FilterType::NumberRange => ColumnFilter::between(None, None),
        FilterType::DateRange => ColumnFilter::date_between(None, None),
        FilterType::Custom => ColumnFilter::Custom {
            operator: None,
            value: None,
            filter_key: None,
        },
    }
}

/// Whether a filter constrains anything at all.
pub fn has_value(filter: &ColumnFilter) -> bool {
    let present = |v: &Option<Value>| v.as_ref().is_some_and(|v| !v.is_raw_empty());
    match filter {
        ColumnFilter::Text { operator, value } => {
            operator.is_some_and(|op| op.is_presence()) || !value.trim().is_empty()
        }
        ColumnFilter::MultiSelect { value } => !value.is_empty(),
        ColumnFilter::NumberRange {
            operator,
            value,
            min,
            max,
        } => match operator.unwrap_or_default() {
            op if op.is_presence() => true,
            NumberOperator::Between => min.is_some() || max.is_some(),
            _ => value.is_some(),
        },
        ColumnFilter::DateRange {
            operator,
            value,
            start,
            end,
        } => match operator.unwrap_or_default() {
            op if op.is_presence() => true,
            DateOperator::Between => present(start) || present(end),
            _ => present(value),
        },
        ColumnFilter::Custom {
            operator, value, ..
        } => operator.is_some() || present(value),
    }
}

/// Filter as forwarded to an external data source in server mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedFilter {
    #[serde(rename = "type")]
    pub filter_type: FilterType,
    pub operator: Option<String>,
    pub value: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter_key: Option<String>,
}

impl From<&ColumnFilter> for NormalizedFilter {
    fn from(filter: &ColumnFilter) -> Self {
        let mut normalized = NormalizedFilter {
            filter_type: filter.filter_type(),
            operator: filter.operator_name(),
            value: filter.value(),
            min: None,
            max: None,
            start: None,
            end: None,
            filter_key: None,
        };
        match filter {
            ColumnFilter::NumberRange { min, max, .. } => {
                normalized.min = *min;
                normalized.max = *max;
            }
            ColumnFilter::DateRange { start, end, .. } => {
                normalized.start = start.clone();
                normalized.end = end.clone();
            }
            ColumnFilter::Custom { filter_key, .. } => {
                normalized.filter_key = filter_key.clone();
            }
            _ => {}
        }
        normalized
    }
}

/// Active filters in their server-mode form. Neutral filters are dropped.
pub fn normalize_filters(filters: &FilterState) -> BTreeMap<String, NormalizedFilter> {
    filters
        .iter()
        .filter(|(_, filter)| has_value(filter))
        .map(|(field, filter)| (field.clone(), NormalizedFilter::from(filter)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::StickySide;

    fn rows() -> Vec<Row> {
        vec![
            Row::new().set("id", 1).set("name", "Alpha").set("amount", 5),
            Row::new().set("id", 2).set("name", "beta").set("amount", 50),
            Row::new().set("id", 3).set("name", "Gamma").set("amount", 500),
        ]
    }

    fn columns() -> Vec<Column> {
        vec![
            Column::new("id", "ID").sticky(StickySide::Left),
            Column::group(
                "Info",
                vec![Column::new("name", "Name"), Column::new("amount", "Amount")],
            ),
        ]
    }

    fn ids(rows: &[Row]) -> Vec<i64> {
        rows.iter()
            .filter_map(|r| match r.get("id") {
                Some(Value::Int(n)) => Some(*n),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_filters_combine_with_and() {
        let mut filters = FilterState::new();
        filters.insert("name".into(), ColumnFilter::text(TextOperator::Contains, "a"));
        filters.insert("amount".into(), ColumnFilter::between(Some(10.0), None));
        let result = apply_filters(&rows(), &columns(), &filters, &FilterRegistry::new());
        assert_eq!(ids(&result), vec![2, 3]);
    }

    #[test]
    fn test_filter_on_unknown_field_is_ignored() {
        let mut filters = FilterState::new();
        filters.insert("nope".into(), ColumnFilter::text(TextOperator::Equals, "zzz"));
        let result = apply_filters(&rows(), &columns(), &filters, &FilterRegistry::new());
        assert_eq!(result.len(), 3);
    }

    #[test]
    fn test_inline_filter_fn_preempts_builtin() {
        let mut columns = columns();
        columns[0].filter = Some(
            FilterSpec::new(FilterType::Text)
                .with_filter_fn(|cell, _, _| cell.is_some_and(|v| v.to_number() >= 2.0)),
        );
        let mut filters = FilterState::new();
        filters.insert("id".into(), ColumnFilter::text(TextOperator::Equals, "1"));
        let result = apply_filters(&rows(), &columns, &filters, &FilterRegistry::new());
        assert_eq!(ids(&result), vec![2, 3]);
    }

    #[test]
    fn test_custom_filter_key_resolves_registry() {
        let registry = FilterRegistry::new().with("even", |row: &Row, field: &str, _: &ColumnFilter| {
            row.lookup(field).is_some_and(|v| v.to_number() % 2.0 == 0.0)
        });
        let mut filters = FilterState::new();
        filters.insert("id".into(), ColumnFilter::custom(Some("even".into()), true));
        let result = apply_filters(&rows(), &columns(), &filters, &registry);
        assert_eq!(ids(&result), vec![2]);
    }

    #[test]
    fn test_custom_without_function_uses_equality() {
        let mut filters = FilterState::new();
        filters.insert("id".into(), ColumnFilter::custom(Some("missing".into()), "3"));
        let result = apply_filters(&rows(), &columns(), &filters, &FilterRegistry::new());
        assert_eq!(ids(&result), vec![3]);
    }

    #[test]
    fn test_filtering_preserves_order() {
        let mut filters = FilterState::new();
        filters.insert("name".into(), ColumnFilter::text(TextOperator::NotEmpty, ""));
        let result = apply_filters(&rows(), &columns(), &filters, &FilterRegistry::new());
        assert_eq!(ids(&result), vec![1, 2, 3]);
    }

    #[test]
    fn test_init_filter_is_neutral() {
        for filter_type in [
            FilterType::Text,
            FilterType::MultiSelect,
            FilterType::NumberRange,
            FilterType::DateRange,
            FilterType::Custom,
        ] {
            let filter = init_filter(filter_type);
            assert_eq!(filter.filter_type(), filter_type);
            assert!(!has_value(&filter), "{filter_type:?} starts neutral");
        }
    }

    #[test]
    fn test_normalize_drops_neutral_filters() {
        let mut filters = FilterState::new();
        filters.insert("name".into(), init_filter(FilterType::Text));
        filters.insert("amount".into(), ColumnFilter::between(Some(1.0), Some(9.0)));
        let normalized = normalize_filters(&filters);
        assert_eq!(normalized.len(), 1);
        let json = serde_json::to_value(&normalized).unwrap_or_default();
        assert_eq!(
            json,
            serde_json::json!({
                "amount": {"type": "number-range", "operator": "between", "value": null, "min": 1.0, "max": 9.0}
            })
        );
    }

    #[test]
    fn test_column_filter_json_shape() {
        let filter: ColumnFilter =
            serde_json::from_str(r#"{"type": "custom", "value": "x", "filterKey": "k"}"#)
                .unwrap_or_else(|_| init_filter(FilterType::Text));
        assert_eq!(filter, ColumnFilter::custom(Some("k".into()), "x"));
    }
}
