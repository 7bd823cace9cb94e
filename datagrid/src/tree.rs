//! Element tree for the current page of a table.
//!
//! The tree mirrors the markup a browser table would have: a header with one
//! row per column-group level, a body with one row per page row (plus detail
//! rows under expanded rows, or an empty-state row), and an optional footer.
//! Every cell rendering a leaf column carries that column's field as its
//! `field` data attribute, which is what the sticky engine keys on.

use std::fmt;
use std::sync::Arc;

use datagrid_lib::model::{Column, ColumnWidth, Row, RowId, group_id, leaf_columns};
use datagrid_lib::query::Order;
use datagrid_lib::{DataTable, ProcessedRow};
use griddom::{Element, Size};

use crate::classes;

/// Renders the content of an expanded row's detail row.
pub type DetailFn = Arc<dyn Fn(&Row) -> String + Send + Sync>;

/// Data attribute holding a body row's identity.
pub const ROW_ID_ATTR: &str = "row-id";

/// Attribute form of a row id. The prefix keeps `1` and `"1"` apart.
pub fn encode_row_id(id: &RowId) -> String {
    match id {
        RowId::Int(n) => format!("i:{n}"),
        RowId::Str(s) => format!("s:{s}"),
    }
}

pub fn decode_row_id(value: &str) -> Option<RowId> {
    if let Some(n) = value.strip_prefix("i:") {
        return n.parse().ok().map(RowId::Int);
    }
    value.strip_prefix("s:").map(RowId::from)
}

/// What the grid renders besides the data columns.
#[derive(Clone)]
pub struct GridOptions {
    /// Leading checkbox column.
    pub selectable: bool,
    /// Leading expand toggle column.
    pub expandable: bool,
    /// Footer values keyed by field.
    pub footer: Option<Row>,
    /// Detail content of expanded rows. Defaults to the row as JSON.
    pub detail: Option<DetailFn>,
    pub empty_text: String,
}

impl Default for GridOptions {
    fn default() -> Self {
        Self {
            selectable: false,
            expandable: false,
            footer: None,
            detail: None,
            empty_text: "No data available".to_string(),
        }
    }
}

impl GridOptions {
    pub fn selectable(mut self) -> Self {
        self.selectable = true;
        self
    }

    pub fn expandable(mut self) -> Self {
        self.expandable = true;
        self
    }

    pub fn with_footer(mut self, footer: Row) -> Self {
        self.footer = Some(footer);
        self
    }

    pub fn with_detail(mut self, f: impl Fn(&Row) -> String + Send + Sync + 'static) -> Self {
        self.detail = Some(Arc::new(f));
        self
    }

    pub fn with_empty_text(mut self, text: impl Into<String>) -> Self {
        self.empty_text = text.into();
        self
    }

    fn utility_count(&self) -> usize {
        usize::from(self.selectable) + usize::from(self.expandable)
    }
}

impl fmt::Debug for GridOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GridOptions")
            .field("selectable", &self.selectable)
            .field("expandable", &self.expandable)
            .field("footer", &self.footer)
            .field("detail", &self.detail.as_ref().map(|_| ".."))
            .field("empty_text", &self.empty_text)
            .finish()
    }
}

/// Build the table element for the current page of `table`.
pub fn build_table(grid_id: &str, table: &DataTable, options: &GridOptions) -> Element {
    let columns = table.columns();
    let leaves = leaf_columns(columns);
    let span = (leaves.len() + options.utility_count()).max(1) as u16;

    let mut root = Element::table()
        .id(grid_id)
        .child(header(grid_id, table, options))
        .child(body(grid_id, table, options, &leaves, span));
    if let Some(footer_row) = &options.footer {
        root = root.child(footer(grid_id, footer_row, options, &leaves));
    }
    root
}

/// Declared column width as a layout size.
pub fn column_size(column: &Column) -> Size {
    match &column.width {
        Some(ColumnWidth::Px(px)) if *px >= 0.0 => Size::Fixed(px.round() as u32),
        Some(ColumnWidth::Text(text)) => Size::parse(text).unwrap_or_default(),
        _ => Size::Auto,
    }
}

fn header(grid_id: &str, table: &DataTable, options: &GridOptions) -> Element {
    let depth = depth(table.columns());
    let mut head = Element::thead().id(format!("{grid_id}-head"));
    let mut frontier: Vec<(Vec<usize>, &Column)> = table
        .columns()
        .iter()
        .enumerate()
        .map(|(i, column)| (vec![i], column))
        .collect();

    for level in 0..depth {
        let row_id = format!("{grid_id}-h{level}");
        let mut cells = utility_headers(table, options);
        let mut next = Vec::new();

        for (path, column) in frontier {
            if column.is_group() {
                let width = leaf_columns(&column.children).len().max(1) as u16;
                cells.push(
                    Element::th(column.label.clone())
                        .colspan(width)
                        .field(group_id(&path))
                        .class(classes::GROUP_HEADER),
                );
                next.extend(column.children.iter().enumerate().map(|(i, child)| {
                    let mut child_path = path.clone();
                    child_path.push(i);
                    (child_path, child)
                }));
            } else if level + 1 < depth {
                cells.push(
                    Element::th("")
                        .field(column.field.clone())
                        .class(classes::HEADER_PLACEHOLDER),
                );
                next.push((path, column));
            } else {
                let mut cell = Element::th(header_label(table, column))
                    .field(column.field.clone())
                    .width(column_size(column));
                if column.sortable {
                    cell = cell.class(classes::SORTABLE);
                }
                cells.push(cell);
            }
        }

        head = head.child(number_cells(Element::tr().id(&row_id), &row_id, cells));
        frontier = next;
    }
    head
}

fn utility_headers(table: &DataTable, options: &GridOptions) -> Vec<Element> {
    let mut cells = Vec::new();
    if options.expandable {
        cells.push(Element::th("").class(classes::EXPAND_COLUMN));
    }
    if options.selectable {
        let mark = if table.is_all_selected() {
            "[x]"
        } else if table.is_some_selected() {
            "[-]"
        } else {
            "[ ]"
        };
        cells.push(Element::th(mark).class(classes::CHECKBOX_COLUMN));
    }
    cells
}

fn header_label(table: &DataTable, column: &Column) -> String {
    let arrow = match table.sort_direction(&column.field) {
        Some(Order::Asc) => "↑",
        Some(Order::Desc) => "↓",
        None => return column.label.clone(),
    };
    match table.sort_priority(&column.field) {
        Some(priority) if table.active_sort().len() > 1 => {
            format!("{} {arrow}{priority}", column.label)
        }
        _ => format!("{} {arrow}", column.label),
    }
}

fn body(
    grid_id: &str,
    table: &DataTable,
    options: &GridOptions,
    leaves: &[&Column],
    span: u16,
) -> Element {
    let mut tbody = Element::tbody().id(format!("{grid_id}-body"));
    let page = table.paginated_rows();

    if page.is_empty() {
        let row = Element::tr()
            .id(format!("{grid_id}-empty"))
            .class(classes::EMPTY_ROW)
            .child(Element::td(options.empty_text.clone()).colspan(span));
        return tbody.child(row);
    }

    for (pos, processed) in page.iter().enumerate() {
        let row_id = format!("{grid_id}-r{pos}");
        tbody = tbody.child(data_row(&row_id, table, options, leaves, processed));
        if processed.expanded {
            let text = match &options.detail {
                Some(detail) => detail(&processed.row),
                None => serde_json::to_string(processed.row.as_ref()).unwrap_or_default(),
            };
            tbody = tbody.child(
                Element::tr()
                    .id(format!("{row_id}-detail"))
                    .class(classes::EXPANDED_ROW)
                    .data(ROW_ID_ATTR, encode_row_id(&processed.id))
                    .child(Element::td(text).id(format!("{row_id}-detail-c0")).colspan(span)),
            );
        }
    }
    tbody
}

fn data_row(
    row_id: &str,
    table: &DataTable,
    options: &GridOptions,
    leaves: &[&Column],
    processed: &ProcessedRow,
) -> Element {
    let mut cells = Vec::with_capacity(leaves.len() + options.utility_count());
    if options.expandable {
        let mark = if table.is_row_loading(&processed.id) {
            "…"
        } else if processed.expanded {
            "▾"
        } else {
            "▸"
        };
        cells.push(Element::td(mark).class(classes::EXPAND_COLUMN));
    }
    let selected = table.is_row_selected(&processed.id);
    if options.selectable {
        let mark = if selected { "[x]" } else { "[ ]" };
        cells.push(Element::td(mark).class(classes::CHECKBOX_COLUMN));
    }
    for column in leaves {
        let text = processed.row.get_nested(&column.field).to_display_string();
        cells.push(
            Element::td(text)
                .field(column.field.clone())
                .width(column_size(column)),
        );
    }

    let mut row = Element::tr()
        .id(row_id)
        .data(ROW_ID_ATTR, encode_row_id(&processed.id));
    if selected {
        row = row.class(classes::SELECTED_ROW);
    }
    number_cells(row, row_id, cells)
}

fn footer(grid_id: &str, values: &Row, options: &GridOptions, leaves: &[&Column]) -> Element {
    let row_id = format!("{grid_id}-f0");
    let mut cells = Vec::new();
    let utility = options.utility_count();
    if utility > 0 {
        cells.push(Element::td("").colspan(utility as u16));
    }
    for column in leaves {
        let text = values
            .lookup(&column.field)
            .map(|v| v.to_display_string())
            .unwrap_or_default();
        cells.push(Element::td(text).field(column.field.clone()));
    }
    Element::tfoot()
        .id(format!("{grid_id}-foot"))
        .child(number_cells(Element::tr().id(&row_id), &row_id, cells))
}

/// Give cells stable ids derived from their row and position.
fn number_cells(row: Element, row_id: &str, cells: Vec<Element>) -> Element {
    row.children(
        cells
            .into_iter()
            .enumerate()
            .map(|(n, cell)| cell.id(format!("{row_id}-c{n}"))),
    )
}

fn depth(columns: &[Column]) -> usize {
    columns
        .iter()
        .map(|c| if c.is_group() { 1 + depth(&c.children) } else { 1 })
        .max()
        .unwrap_or(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use datagrid_lib::model::StickySide;
    use griddom::{Section, rows};

    fn table() -> DataTable {
        let rows = (1..=3)
            .map(|i| Row::new().set("id", i).set("name", format!("n{i}")).set("city", "Ghent"))
            .collect();
        DataTable::new(
            vec![
                Column::new("id", "ID").sticky(StickySide::Left),
                Column::group(
                    "Person",
                    vec![Column::new("name", "Name").sortable(), Column::new("city", "City")],
                ),
            ],
            rows,
        )
    }

    #[test]
    fn test_grouped_header_rows() {
        let tree = build_table("g", &table(), &GridOptions::default());
        let head: Vec<&Element> = rows(&tree, Section::Head).collect();
        assert_eq!(head.len(), 2);

        let top = head[0].child_elements();
        assert_eq!(top.len(), 2);
        assert!(top[0].has_class(classes::HEADER_PLACEHOLDER));
        assert_eq!(top[0].get_field(), Some("id"));
        assert_eq!(top[1].get_field(), Some("group-1"));
        assert_eq!(top[1].colspan, 2);

        let leaf: Vec<Option<&str>> = head[1].child_elements().iter().map(|c| c.get_field()).collect();
        assert_eq!(leaf, vec![Some("id"), Some("name"), Some("city")]);
    }

    #[test]
    fn test_utility_cells_lead_each_row() {
        let options = GridOptions::default().selectable().expandable();
        let tree = build_table("g", &table(), &options);
        let body: Vec<&Element> = rows(&tree, Section::Body).collect();
        let cells = body[0].child_elements();

        assert!(cells[0].has_class(classes::EXPAND_COLUMN));
        assert!(cells[1].has_class(classes::CHECKBOX_COLUMN));
        assert_eq!(cells[2].get_field(), Some("id"));
        assert_eq!(cells[2].id, "g-r0-c2");
    }

    #[test]
    fn test_expanded_row_adds_detail_row() {
        let mut table = table();
        table.toggle_row_expansion(&RowId::Int(2));
        let options = GridOptions::default().with_detail(|row| {
            format!("details of {}", row.get_nested("name").to_display_string())
        });
        let tree = build_table("g", &table, &options);
        let body: Vec<&Element> = rows(&tree, Section::Body).collect();

        assert_eq!(body.len(), 4);
        assert!(body[2].has_class(classes::EXPANDED_ROW));
        assert_eq!(body[2].child_elements()[0].text(), "details of n2");
        assert_eq!(body[2].child_elements()[0].colspan, 3);
    }

    #[test]
    fn test_empty_state_row() {
        let table = DataTable::new(vec![Column::new("id", "ID")], Vec::new());
        let tree = build_table("g", &table, &GridOptions::default());
        let body: Vec<&Element> = rows(&tree, Section::Body).collect();

        assert_eq!(body.len(), 1);
        assert!(body[0].has_class(classes::EMPTY_ROW));
        assert_eq!(body[0].child_elements()[0].text(), "No data available");
    }

    #[test]
    fn test_sort_indicator() {
        let mut table = table();
        table.handle_sort("name", false);
        let tree = build_table("g", &table, &GridOptions::default());
        let head: Vec<&Element> = rows(&tree, Section::Head).collect();
        assert_eq!(head[1].child_elements()[1].text(), "Name ↑");
    }

    #[test]
    fn test_footer_spans_utility_columns() {
        let options = GridOptions::default()
            .selectable()
            .expandable()
            .with_footer(Row::new().set("id", "Total"));
        let tree = build_table("g", &table(), &options);
        let foot: Vec<&Element> = rows(&tree, Section::Foot).collect();
        let cells = foot[0].child_elements();

        assert_eq!(cells[0].colspan, 2);
        assert_eq!(cells[1].text(), "Total");
        assert_eq!(cells[2].text(), "");
    }

    #[test]
    fn test_column_size() {
        assert_eq!(column_size(&Column::new("a", "A").width(120u32)), Size::Fixed(120));
        assert_eq!(column_size(&Column::new("a", "A").width("25%")), Size::Percent(25.0));
        assert_eq!(column_size(&Column::new("a", "A")), Size::Auto);
    }

    #[test]
    fn test_same_label_groups_get_distinct_ids() {
        let table = DataTable::new(
            vec![
                Column::group("Q", vec![Column::new("a", "A")]),
                Column::group("Q", vec![Column::new("b", "B")]),
            ],
            vec![Row::new().set("a", 1).set("b", 2)],
        );
        let tree = build_table("g", &table, &GridOptions::default());
        let head: Vec<&Element> = rows(&tree, Section::Head).collect();
        let fields: Vec<Option<&str>> =
            head[0].child_elements().iter().map(|c| c.get_field()).collect();
        assert_eq!(fields, vec![Some("group-0"), Some("group-1")]);
    }

    #[test]
    fn test_row_id_attribute_keeps_type() {
        let int = encode_row_id(&RowId::Int(1));
        let text = encode_row_id(&RowId::from("1"));
        assert_ne!(int, text);
        assert_eq!(decode_row_id(&int), Some(RowId::Int(1)));
        assert_eq!(decode_row_id(&text), Some(RowId::from("1")));
        assert_eq!(decode_row_id("s:"), Some(RowId::from("")));
        assert_eq!(decode_row_id("1"), None);
    }
}
