//! Class names the grid puts on its elements.
//!
//! Hosts style against these; the sticky engine reads the utility column
//! markers and writes the sticky ones.

/// Selection checkbox cells.
pub const CHECKBOX_COLUMN: &str = "datagrid-checkbox-column";
/// Expand toggle cells.
pub const EXPAND_COLUMN: &str = "datagrid-expand-column";
/// Detail row under an expanded row.
pub const EXPANDED_ROW: &str = "datagrid-expanded-row";
/// The "no data" row.
pub const EMPTY_ROW: &str = "datagrid-empty-row";
/// A data row that is selected.
pub const SELECTED_ROW: &str = "datagrid-selected-row";
/// Header cell spanning a column group.
pub const GROUP_HEADER: &str = "datagrid-group-header";
/// Header cell standing in for a leaf column in an upper header row.
pub const HEADER_PLACEHOLDER: &str = "datagrid-header-placeholder";
/// Header cell of a sortable column.
pub const SORTABLE: &str = "datagrid-sortable";

pub const STICKY_LEFT: &str = "datagrid-sticky-left";
pub const STICKY_RIGHT: &str = "datagrid-sticky-right";
/// Sticky cell currently pinned at the viewport edge while scrolling.
pub const STICKY_EDGE: &str = "datagrid-sticky-edge";

/// Header id prefix of a column group, followed by its label.
pub const GROUP_PREFIX: &str = "group-";
