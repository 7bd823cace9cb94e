//! Multi-key sorting and the click-to-sort toggle protocol

use std::cmp::Ordering;

use serde::Deserialize;
use serde::Serialize;

use crate::model::{Row, Value};

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Order {
    /// Ascending order (A-Z, 0-9).
    Asc,
    /// Descending order (Z-A, 9-0).
    Desc,
}

/// One sort key. `priority` is the 1-based position shown next to the header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortEntry {
    pub field: String,
    pub order: Order,
    #[serde(default)]
    pub priority: usize,
}

impl SortEntry {
    pub fn new(field: impl Into<String>, order: Order) -> Self {
        Self {
            field: field.into(),
            order,
            priority: 0,
        }
    }
}

/// Ordered list of sort keys. Earlier entries win; later ones break ties.
///
/// # Example
///
/// ```
/// use datagrid_lib::query::{Order, Sort};
///
/// let mut sort = Sort::asc("name").then_desc("amount");
/// assert_eq!(sort.priority("amount"), Some(2));
///
/// sort.toggle("name", false);
/// assert_eq!(sort.direction("name"), Some(Order::Desc));
/// assert_eq!(sort.len(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<SortEntry>", into = "Vec<SortEntry>")]
pub struct Sort {
    entries: Vec<SortEntry>,
}

impl Sort {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an ascending sort on a field.
    pub fn asc(field: impl Into<String>) -> Self {
        Self::from(vec![SortEntry::new(field, Order::Asc)])
    }

    /// Creates a descending sort on a field.
    pub fn desc(field: impl Into<String>) -> Self {
        Self::from(vec![SortEntry::new(field, Order::Desc)])
    }

    /// Adds a secondary ascending key.
    pub fn then_asc(mut self, field: impl Into<String>) -> Self {
        self.entries.push(SortEntry::new(field, Order::Asc));
        self.renumber();
        self
    }

    /// Adds a secondary descending key.
    pub fn then_desc(mut self, field: impl Into<String>) -> Self {
        self.entries.push(SortEntry::new(field, Order::Desc));
        self.renumber();
        self
    }

    pub fn entries(&self) -> &[SortEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_sorted_by(&self, field: &str) -> bool {
        self.entries.iter().any(|e| e.field == field)
    }

    pub fn direction(&self, field: &str) -> Option<Order> {
        self.entries.iter().find(|e| e.field == field).map(|e| e.order)
    }

    pub fn priority(&self, field: &str) -> Option<usize> {
        self.entries
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.priority)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Advance `field` one step through unsorted, asc, desc.
    ///
    /// Without `multi_key` the result holds at most this field. With it the
    /// field is appended, flipped in place, or removed, and other keys keep
    /// their positions. Priorities are renumbered afterwards.
    pub fn toggle(&mut self, field: &str, multi_key: bool) {
        let index = self.entries.iter().position(|e| e.field == field);
        let current = index.map(|i| self.entries[i].order);

        if multi_key {
            match (index, current) {
                (Some(i), Some(Order::Asc)) => self.entries[i].order = Order::Desc,
                (Some(i), _) => {
                    self.entries.remove(i);
                }
                (None, _) => self.entries.push(SortEntry::new(field, Order::Asc)),
            }
        } else {
            self.entries = match current {
                None => vec![SortEntry::new(field, Order::Asc)],
                Some(Order::Asc) => vec![SortEntry::new(field, Order::Desc)],
                Some(Order::Desc) => Vec::new(),
            };
        }

        self.renumber();
    }

    fn renumber(&mut self) {
        for (i, entry) in self.entries.iter_mut().enumerate() {
            entry.priority = i + 1;
        }
    }
}

impl From<Vec<SortEntry>> for Sort {
    fn from(entries: Vec<SortEntry>) -> Self {
        let mut sort = Self { entries };
        sort.renumber();
        sort
    }
}

impl From<Sort> for Vec<SortEntry> {
    fn from(sort: Sort) -> Self {
        sort.entries
    }
}

/// Stable multi-key sort. Keys are compared in list order, not by priority.
pub fn sort_rows<R: AsRef<Row> + Clone>(rows: &[R], sort: &[SortEntry]) -> Vec<R> {
    let mut sorted = rows.to_vec();
    if sort.is_empty() {
        return sorted;
    }

    // Vec::sort_by is stable
    sorted.sort_by(|a, b| {
        let (a, b) = (a.as_ref(), b.as_ref());
        for entry in sort {
            let ordering = compare_values(a.get_nested(&entry.field), b.get_nested(&entry.field));
            if ordering != Ordering::Equal {
                return match entry.order {
                    Order::Asc => ordering,
                    Order::Desc => ordering.reverse(),
                };
            }
        }
        Ordering::Equal
    });
    sorted
}

/// Numeric when both sides are numbers, chronological for two dates,
/// otherwise by string form.
pub fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Int(x), Value::Int(y)) => x.cmp(y),
        (x, y) if x.is_numeric() && y.is_numeric() => x
            .to_number()
            .partial_cmp(&y.to_number())
            .unwrap_or(Ordering::Equal),
        (Value::DateTime(x), Value::DateTime(y)) => x.cmp(y),
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        _ => a.to_display_string().cmp(&b.to_display_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(rows: &[Row]) -> Vec<i64> {
        rows.iter()
            .filter_map(|r| match r.get("id") {
                Some(Value::Int(n)) => Some(*n),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_stable_sort_scenario() {
        let rows = vec![
            Row::new().set("id", 1).set("n", 5),
            Row::new().set("id", 2).set("n", 3),
            Row::new().set("id", 3).set("n", 5),
        ];
        let sorted = sort_rows(&rows, Sort::asc("n").entries());
        assert_eq!(ids(&sorted), vec![2, 1, 3]);
    }

    #[test]
    fn test_desc_keeps_ties_in_original_order() {
        let rows = vec![
            Row::new().set("id", 1).set("n", 5),
            Row::new().set("id", 2).set("n", 3),
            Row::new().set("id", 3).set("n", 5),
        ];
        let sorted = sort_rows(&rows, Sort::desc("n").entries());
        assert_eq!(ids(&sorted), vec![1, 3, 2]);
    }

    #[test]
    fn test_secondary_key_breaks_ties() {
        let rows = vec![
            Row::new().set("id", 1).set("a", "x").set("b", 2),
            Row::new().set("id", 2).set("a", "x").set("b", 1),
            Row::new().set("id", 3).set("a", "w").set("b", 9),
        ];
        let sorted = sort_rows(&rows, Sort::asc("a").then_desc("b").entries());
        assert_eq!(ids(&sorted), vec![3, 1, 2]);
    }

    #[test]
    fn test_list_order_beats_priority_field() {
        let rows = vec![
            Row::new().set("id", 1).set("a", 2).set("b", 1),
            Row::new().set("id", 2).set("a", 1).set("b", 2),
        ];
        let mut entries = Sort::asc("a").then_asc("b").entries().to_vec();
        entries[0].priority = 2;
        entries[1].priority = 1;
        assert_eq!(ids(&sort_rows(&rows, &entries)), vec![2, 1]);
    }

    #[test]
    fn test_nested_and_missing_values() {
        let nested = |city: &str| {
            Value::from(serde_json::json!({ "city": city }))
        };
        let rows = vec![
            Row::new().set("id", 1).set("addr", nested("Oslo")),
            Row::new().set("id", 2),
            Row::new().set("id", 3).set("addr", nested("Bergen")),
        ];
        let sorted = sort_rows(&rows, Sort::asc("addr.city").entries());
        assert_eq!(ids(&sorted), vec![2, 3, 1], "missing sorts as empty string");
    }

    #[test]
    fn test_numbers_compare_numerically() {
        assert_eq!(compare_values(&Value::Int(9), &Value::Int(10)), Ordering::Less);
        assert_eq!(compare_values(&Value::Float(9.5), &Value::Int(10)), Ordering::Less);
        assert_eq!(
            compare_values(&Value::from("9"), &Value::from("10")),
            Ordering::Greater,
            "strings compare lexicographically"
        );
    }

    // =========================================================================
    // Toggle protocol
    // =========================================================================

    #[test]
    fn test_single_key_three_state_cycle() {
        let mut sort = Sort::new();
        sort.toggle("name", false);
        assert_eq!(sort.direction("name"), Some(Order::Asc));
        sort.toggle("name", false);
        assert_eq!(sort.direction("name"), Some(Order::Desc));
        sort.toggle("name", false);
        assert!(sort.is_empty());
    }

    #[test]
    fn test_single_key_replaces_other_fields() {
        let mut sort = Sort::asc("a").then_desc("b");
        sort.toggle("c", false);
        assert_eq!(sort.entries(), &[SortEntry {
            field: "c".into(),
            order: Order::Asc,
            priority: 1
        }]);
    }

    #[test]
    fn test_multi_key_toggle_in_place() {
        let mut sort = Sort::new();
        sort.toggle("a", true);
        sort.toggle("b", true);
        sort.toggle("a", true);
        assert_eq!(sort.direction("a"), Some(Order::Desc));
        assert_eq!(sort.priority("a"), Some(1), "flipped entry keeps its slot");
        sort.toggle("a", true);
        assert_eq!(sort.direction("a"), None);
        assert_eq!(sort.priority("b"), Some(1), "renumbered after removal");
    }

    #[test]
    fn test_deserialized_sort_is_renumbered() {
        let sort: Sort = serde_json::from_str(
            r#"[{"field": "a", "order": "asc"}, {"field": "b", "order": "desc", "priority": 7}]"#,
        )
        .unwrap();
        assert_eq!(sort.priority("a"), Some(1));
        assert_eq!(sort.priority("b"), Some(2));

        let json = serde_json::to_value(&sort).unwrap();
        assert_eq!(json[1]["priority"], 2);
        assert_eq!(json.as_array().map(Vec::len), Some(2));
    }
}
