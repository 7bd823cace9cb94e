//! Column definitions

use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;
use serde::Serialize;

use crate::error::ColumnValidationError;
use crate::query::filter::FilterSpec;

static WIDTH_PATTERN: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"^\d+%?$").ok());

/// Side a column pins to when the table scrolls horizontally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StickySide {
    Left,
    Right,
}

/// Declared column width: pixels, or a string such as `"120"` or `"25%"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ColumnWidth {
    Px(f64),
    Text(String),
}

impl ColumnWidth {
    pub fn is_valid(&self) -> bool {
        match self {
            ColumnWidth::Px(_) => true,
            ColumnWidth::Text(text) => WIDTH_PATTERN
                .as_ref()
                .is_some_and(|pattern| pattern.is_match(text)),
        }
    }
}

impl From<u32> for ColumnWidth {
    fn from(px: u32) -> Self {
        ColumnWidth::Px(px.into())
    }
}

impl From<&str> for ColumnWidth {
    fn from(text: &str) -> Self {
        ColumnWidth::Text(text.to_string())
    }
}

/// A table column. A column with `children` is a header group; only leaf
/// columns render body cells.
///
/// # Example
///
/// ```
/// use datagrid_lib::model::{Column, StickySide};
///
/// let columns = vec![
///     Column::new("id", "ID").sticky(StickySide::Left),
///     Column::group("Customer", vec![Column::new("name", "Name"), Column::new("email", "Email")]),
/// ];
/// assert_eq!(datagrid_lib::model::leaf_columns(&columns).len(), 3);
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    #[serde(default)]
    pub field: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub sortable: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<ColumnWidth>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sticky: Option<StickySide>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<FilterSpec>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Column>,
}

impl Column {
    pub fn new(field: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            label: label.into(),
            ..Default::default()
        }
    }

    pub fn group(label: impl Into<String>, children: Vec<Column>) -> Self {
        Self {
            label: label.into(),
            children,
            ..Default::default()
        }
    }

    pub fn sortable(mut self) -> Self {
        self.sortable = true;
        self
    }

    pub fn width(mut self, width: impl Into<ColumnWidth>) -> Self {
        self.width = Some(width.into());
        self
    }

    pub fn sticky(mut self, side: StickySide) -> Self {
        self.sticky = Some(side);
        self
    }

    pub fn filter(mut self, filter: FilterSpec) -> Self {
        self.filter = Some(filter);
        self
    }

    pub fn is_group(&self) -> bool {
        !self.children.is_empty()
    }
}

/// Header cell id of the group at `path`, the child indexes leading to it
/// from the top level. Labels may repeat; positions do not.
pub fn group_id(path: &[usize]) -> String {
    let path: Vec<String> = path.iter().map(usize::to_string).collect();
    format!("group-{}", path.join("."))
}

/// Leaf columns in display order.
pub fn leaf_columns(columns: &[Column]) -> Vec<&Column> {
    let mut leaves = Vec::new();
    collect_leaves(columns, None, &mut leaves);
    leaves.into_iter().map(|(column, _)| column).collect()
}

/// Leaf columns with their effective sticky side. A child of a sticky group
/// takes the group's side; otherwise its own.
pub fn sticky_leaves(columns: &[Column]) -> Vec<(&Column, Option<StickySide>)> {
    let mut leaves = Vec::new();
    collect_leaves(columns, None, &mut leaves);
    leaves
}

fn collect_leaves<'a>(
    columns: &'a [Column],
    inherited: Option<StickySide>,
    out: &mut Vec<(&'a Column, Option<StickySide>)>,
) {
    for column in columns {
        let side = inherited.or(column.sticky);
        if column.is_group() {
            collect_leaves(&column.children, side, out);
        } else {
            out.push((column, side));
        }
    }
}

/// Leaf column rendering `field`.
pub fn find_column<'a>(columns: &'a [Column], field: &str) -> Option<&'a Column> {
    leaf_columns(columns)
        .into_iter()
        .find(|column| column.field == field)
}

/// Group whose header id is `id`, as built by [`group_id`].
pub fn find_group<'a>(columns: &'a [Column], id: &str) -> Option<&'a Column> {
    let path = id.strip_prefix("group-")?;
    let mut level = columns;
    let mut found = None;
    for index in path.split('.') {
        let column = level.get(index.parse::<usize>().ok()?)?;
        level = &column.children;
        found = Some(column);
    }
    found.filter(|c| c.is_group())
}

/// Check column definitions and collect every problem found.
///
/// Groups need a label but no field; leaves need both. Never fails.
pub fn validate_columns(columns: &[Column]) -> Vec<ColumnValidationError> {
    let mut errors = Vec::new();
    if columns.is_empty() {
        errors.push(ColumnValidationError::NoColumns);
        return errors;
    }
    validate_level(columns, "", &mut errors);
    errors
}

fn validate_level(columns: &[Column], prefix: &str, errors: &mut Vec<ColumnValidationError>) {
    for (i, column) in columns.iter().enumerate() {
        let path = format!("{prefix}{i}");
        if column.label.trim().is_empty() {
            errors.push(ColumnValidationError::label_required(&path));
        }
        if !column.is_group() && column.field.trim().is_empty() {
            errors.push(ColumnValidationError::field_required(&path));
        }
        if let Some(width) = &column.width
            && !width.is_valid()
        {
            let text = match width {
                ColumnWidth::Px(px) => px.to_string(),
                ColumnWidth::Text(text) => text.clone(),
            };
            errors.push(ColumnValidationError::invalid_width(&path, text));
        }
        if column.is_group() {
            validate_level(&column.children, &format!("{path}."), errors);
        }
    }
}
