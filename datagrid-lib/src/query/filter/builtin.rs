//! Built-in filter predicates, one per filter type

use chrono::DateTime;
use chrono::Utc;

use super::types::{ColumnFilter, DateOperator, NumberOperator, TextOperator};
use super::has_value;
use crate::model::{Row, Value, coerce_number};

/// Case-insensitive text match. An empty search passes every row unless the
/// operator tests presence.
pub fn text(row: &Row, field: &str, filter: &ColumnFilter) -> bool {
    let ColumnFilter::Text { operator, value } = filter else {
        return true;
    };
    let cell = row
        .lookup(field)
        .map(Value::to_display_string)
        .unwrap_or_default()
        .to_lowercase();
    let search = value.to_lowercase();
    let search = search.trim();

    let Some(operator) = operator else {
        return true;
    };
    if search.is_empty() && !operator.is_presence() {
        return true;
    }

    match operator {
        TextOperator::Contains => cell.contains(search),
        TextOperator::DoesNotContains => !cell.contains(search),
        TextOperator::Equals => cell == search,
        TextOperator::DoesNotEqual => cell != search,
        TextOperator::StartsWith => cell.starts_with(search),
        TextOperator::EndsWith => cell.ends_with(search),
        TextOperator::Empty => cell.trim().is_empty(),
        TextOperator::NotEmpty => !cell.trim().is_empty(),
    }
}

/// Membership of the cell's string form in the chosen values.
pub fn multi_select(row: &Row, field: &str, filter: &ColumnFilter) -> bool {
    let ColumnFilter::MultiSelect { value } = filter else {
        return true;
    };
    if value.is_empty() {
        return true;
    }
    let cell = row
        .lookup(field)
        .map(Value::to_display_string)
        .unwrap_or_default();
    value.contains(&cell)
}

/// Numeric comparison. Cells that do not coerce to a number fail, except
/// under `empty`/`notEmpty` which look at the raw value.
pub fn number_range(row: &Row, field: &str, filter: &ColumnFilter) -> bool {
    let ColumnFilter::NumberRange {
        operator,
        value,
        min,
        max,
    } = filter
    else {
        return true;
    };
    if !has_value(filter) {
        return true;
    }

    let raw = row.lookup(field);
    let operator = operator.unwrap_or_default();
    match operator {
        NumberOperator::Empty => return raw.is_none_or(Value::is_raw_empty),
        NumberOperator::NotEmpty => return !raw.is_none_or(Value::is_raw_empty),
        _ => {}
    }

    let num = coerce_number(raw);
    if num.is_nan() {
        return false;
    }

    match (operator, value) {
        (NumberOperator::Between, _) => {
            min.is_none_or(|min| num >= min) && max.is_none_or(|max| num <= max)
        }
        (NumberOperator::Equals, Some(v)) => num == *v,
        (NumberOperator::NotEqual, Some(v)) => num != *v,
        (NumberOperator::GreaterThan, Some(v)) => num > *v,
        (NumberOperator::LessThan, Some(v)) => num < *v,
        _ => true,
    }
}

/// Date comparison. Unparseable cells fail, except under `empty`/`notEmpty`.
///
/// `equals`/`notEqual` compare calendar dates (UTC) and ignore the time.
pub fn date_range(row: &Row, field: &str, filter: &ColumnFilter) -> bool {
    let ColumnFilter::DateRange {
        operator,
        value,
        start,
        end,
    } = filter
    else {
        return true;
    };

    let raw = row.lookup(field);
    let operator = operator.unwrap_or_default();
    match operator {
        DateOperator::Empty => return raw.is_none_or(Value::is_raw_empty),
        DateOperator::NotEmpty => return !raw.is_none_or(Value::is_raw_empty),
        _ => {}
    }
    if !has_value(filter) {
        return true;
    }

    let Some(date) = raw.and_then(Value::to_date) else {
        return false;
    };

    if operator == DateOperator::Between {
        // An unparseable bound constrains nothing
        let after_start = bound(start).is_none_or(|start| date >= start);
        let before_end = bound(end).is_none_or(|end| date <= end);
        return after_start && before_end;
    }

    // has_value guarantees a non-empty value here
    let target = value.as_ref().and_then(Value::to_date);
    match (operator, target) {
        (DateOperator::Equals, Some(t)) => date.date_naive() == t.date_naive(),
        (DateOperator::NotEqual, Some(t)) => date.date_naive() != t.date_naive(),
        (DateOperator::Before, Some(t)) => date < t,
        (DateOperator::After, Some(t)) => date > t,
        // Invalid comparison target
        (DateOperator::NotEqual, None) => true,
        _ => false,
    }
}

fn bound(value: &Option<Value>) -> Option<DateTime<Utc>> {
    value
        .as_ref()
        .filter(|v| !v.is_raw_empty())
        .and_then(Value::to_date)
}

/// Fallback for custom filters with no resolvable function: string equality
/// between cell and value. A filter without a value passes.
pub fn custom(row: &Row, field: &str, filter: &ColumnFilter) -> bool {
    let ColumnFilter::Custom { value, .. } = filter else {
        return true;
    };
    let Some(value) = value else {
        return true;
    };
    let cell = row
        .lookup(field)
        .map(Value::to_display_string)
        .unwrap_or_default();
    cell == value.to_display_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(value: impl Into<Value>) -> Row {
        Row::new().set("f", value)
    }

    // =========================================================================
    // Text
    // =========================================================================

    #[test]
    fn test_text_contains_is_case_insensitive() {
        let filter = ColumnFilter::text(TextOperator::Contains, "Ab");
        assert!(text(&row("abc"), "f", &filter));
        assert!(!text(&row("xyz"), "f", &filter));
    }

    #[test]
    fn test_text_empty_search_is_neutral() {
        let filter = ColumnFilter::text(TextOperator::Equals, "   ");
        assert!(text(&row("anything"), "f", &filter));
        let unset = ColumnFilter::Text {
            operator: None,
            value: "zzz".into(),
        };
        assert!(text(&row("abc"), "f", &unset), "no operator, no constraint");
    }

    #[test]
    fn test_text_search_is_trimmed_cell_is_not() {
        let filter = ColumnFilter::text(TextOperator::Equals, " abc ");
        assert!(text(&row("ABC"), "f", &filter));
        assert!(!text(&row("abc "), "f", &filter));
    }

    #[test]
    fn test_text_operators() {
        let cell = row("Hello World");
        let check = |op, v: &str| text(&cell, "f", &ColumnFilter::text(op, v));
        assert!(check(TextOperator::StartsWith, "hello"));
        assert!(check(TextOperator::EndsWith, "WORLD"));
        assert!(check(TextOperator::DoesNotContains, "xyz"));
        assert!(check(TextOperator::DoesNotEqual, "hello"));
        assert!(!check(TextOperator::Equals, "hello"));
    }

    #[test]
    fn test_text_presence_operators() {
        let empty = ColumnFilter::text(TextOperator::Empty, "");
        let not_empty = ColumnFilter::text(TextOperator::NotEmpty, "");
        assert!(text(&row("  "), "f", &empty));
        assert!(text(&Row::new(), "f", &empty), "missing field is empty");
        assert!(text(&row(Value::Null), "f", &empty));
        assert!(text(&row("x"), "f", &not_empty));
        assert!(!text(&row(""), "f", &not_empty));
    }

    // =========================================================================
    // Multi-select
    // =========================================================================

    #[test]
    fn test_multi_select_membership() {
        let filter = ColumnFilter::multi_select(["paid", "3"]);
        assert!(multi_select(&row("paid"), "f", &filter));
        assert!(multi_select(&row(3), "f", &filter), "numbers compare as strings");
        assert!(!multi_select(&row("due"), "f", &filter));
        assert!(multi_select(
            &row("due"),
            "f",
            &ColumnFilter::multi_select(Vec::<String>::new())
        ));
    }

    // =========================================================================
    // Number range
    // =========================================================================

    #[test]
    fn test_number_between_min_only() {
        let filter = ColumnFilter::between(Some(10.0), None);
        assert!(!number_range(&row("8"), "f", &filter));
        assert!(number_range(&row("15"), "f", &filter));
        assert!(number_range(&row(10), "f", &filter), "inclusive");
    }

    #[test]
    fn test_number_nan_fails() {
        let filter = ColumnFilter::between(Some(0.0), Some(100.0));
        assert!(!number_range(&row("n/a"), "f", &filter));
        assert!(!number_range(&Row::new(), "f", &filter));
    }

    #[test]
    fn test_number_neutral_filter_passes_nan() {
        let filter = ColumnFilter::between(None, None);
        assert!(number_range(&row("n/a"), "f", &filter));
        let no_value = ColumnFilter::number(NumberOperator::GreaterThan, None);
        assert!(number_range(&row("n/a"), "f", &no_value));
    }

    #[test]
    fn test_number_comparisons() {
        let cell = row(5.5);
        let check = |op, v| number_range(&cell, "f", &ColumnFilter::number(op, Some(v)));
        assert!(check(NumberOperator::Equals, 5.5));
        assert!(check(NumberOperator::NotEqual, 5.0));
        assert!(check(NumberOperator::GreaterThan, 5.0));
        assert!(check(NumberOperator::LessThan, 6.0));
        assert!(!check(NumberOperator::LessThan, 5.5));
    }

    #[test]
    fn test_number_presence_uses_raw_value() {
        let empty = ColumnFilter::number(NumberOperator::Empty, None);
        let not_empty = ColumnFilter::number(NumberOperator::NotEmpty, None);
        assert!(number_range(&row(""), "f", &empty));
        assert!(number_range(&row(Value::Null), "f", &empty));
        assert!(!number_range(&row("abc"), "f", &empty));
        assert!(number_range(&row("abc"), "f", &not_empty), "NaN rule not applied");
        assert!(!number_range(&row(""), "f", &not_empty));
    }

    // =========================================================================
    // Date range
    // =========================================================================

    #[test]
    fn test_date_between_inclusive() {
        let filter = ColumnFilter::date_between(Some("2024-01-01".into()), Some("2024-01-31".into()));
        assert!(date_range(&row("2024-01-01"), "f", &filter));
        assert!(date_range(&row("2024-01-15T08:00:00Z"), "f", &filter));
        assert!(!date_range(&row("2024-02-01"), "f", &filter));
        assert!(!date_range(&row("not a date"), "f", &filter));
    }

    #[test]
    fn test_date_open_bound_is_vacuous() {
        let filter = ColumnFilter::date_between(None, Some("2024-01-31".into()));
        assert!(date_range(&row("1999-12-31"), "f", &filter));
        let garbage = ColumnFilter::date_between(Some("garbage".into()), None);
        assert!(date_range(&row("2024-05-05"), "f", &garbage));
    }

    #[test]
    fn test_date_equals_ignores_time() {
        let filter = ColumnFilter::date(DateOperator::Equals, Some("2024-03-05".into()));
        assert!(date_range(&row("2024-03-05T23:15:00Z"), "f", &filter));
        assert!(!date_range(&row("2024-03-06T00:00:00Z"), "f", &filter));
        let not_equal = ColumnFilter::date(DateOperator::NotEqual, Some("2024-03-05".into()));
        assert!(date_range(&row("2024-03-06"), "f", &not_equal));
    }

    #[test]
    fn test_date_before_after() {
        let before = ColumnFilter::date(DateOperator::Before, Some("2024-03-05".into()));
        let after = ColumnFilter::date(DateOperator::After, Some("2024-03-05".into()));
        assert!(date_range(&row("2024-03-04"), "f", &before));
        assert!(!date_range(&row("2024-03-04"), "f", &after));
        let unset = ColumnFilter::date(DateOperator::Before, None);
        assert!(date_range(&row("2024-03-09"), "f", &unset));
    }

    #[test]
    fn test_date_presence() {
        let empty = ColumnFilter::date(DateOperator::Empty, None);
        assert!(date_range(&row(""), "f", &empty));
        assert!(!date_range(&row("2024-01-01"), "f", &empty));
    }

    // =========================================================================
    // Custom
    // =========================================================================

    #[test]
    fn test_custom_fallback_equality() {
        let filter = ColumnFilter::custom(None, 42);
        assert!(custom(&row("42"), "f", &filter));
        assert!(!custom(&row(41), "f", &filter));
        let no_value = ColumnFilter::Custom {
            operator: None,
            value: None,
            filter_key: None,
        };
        assert!(custom(&row(41), "f", &no_value));
    }
}
