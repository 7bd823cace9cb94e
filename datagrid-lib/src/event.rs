//! Notifications emitted to the host application
//!
//! The table queues events as its state changes; the host drains them with
//! [`DataTable::drain_events`](crate::DataTable::drain_events).

use std::collections::BTreeMap;

use serde::Deserialize;
use serde::Serialize;

use crate::model::{Row, RowId};
use crate::query::Sort;
use crate::query::filter::NormalizedFilter;

/// Page, page size and sort mirrored to an external data source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerOptions {
    pub page: usize,
    /// `None` requests every row.
    pub rows_per_page: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort: Option<Sort>,
}

impl ServerOptions {
    pub fn new(page: usize, rows_per_page: Option<usize>) -> Self {
        Self {
            page,
            rows_per_page,
            sort: None,
        }
    }

    pub fn with_sort(mut self, sort: Sort) -> Self {
        self.sort = Some(sort);
        self
    }
}

impl Default for ServerOptions {
    fn default() -> Self {
        Self::new(1, Some(10))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TableEvent {
    /// Server mode: the full options object after a page, size or sort change.
    UpdateServerOptions(ServerOptions),
    /// The requested selection.
    UpdateItemSelected(Vec<Row>),
    /// The requested expanded set.
    UpdateExpanded(Vec<RowId>),
    PageUpdated(usize),
    SortChanged { sort: Sort },
    /// Client mode: the new local sort.
    UpdateSort(Sort),
    /// Server mode: active filters, normalized, keyed by field.
    FilterChange(BTreeMap<String, NormalizedFilter>),
    ExpandRow { row: Row, index: usize, row_id: RowId },
    CollapseRow { row: Row, index: usize, row_id: RowId },
    RowClick { row: Row, index: usize },
    InputTyped(String),
    RowsPerPageChanged(Option<usize>),
    RowSelected { row: Row, index: usize },
    RowDeselected { row: Row, index: usize },
    AllRowsSelected(Vec<Row>),
}

impl TableEvent {
    /// Host-facing event name.
    pub fn name(&self) -> &'static str {
        match self {
            TableEvent::UpdateServerOptions(_) => "update:serverOptions",
            TableEvent::UpdateItemSelected(_) => "update:itemSelected",
            TableEvent::UpdateExpanded(_) => "update:expanded",
            TableEvent::PageUpdated(_) => "page-updated",
            TableEvent::SortChanged { .. } => "sort-changed",
            TableEvent::UpdateSort(_) => "update:sort",
            TableEvent::FilterChange(_) => "filterChange",
            TableEvent::ExpandRow { .. } => "expand-row",
            TableEvent::CollapseRow { .. } => "collapse-row",
            TableEvent::RowClick { .. } => "row-click",
            TableEvent::InputTyped(_) => "input-typed",
            TableEvent::RowsPerPageChanged(_) => "rowsPerPageChanged",
            TableEvent::RowSelected { .. } => "rowSelected",
            TableEvent::RowDeselected { .. } => "rowDeselected",
            TableEvent::AllRowsSelected(_) => "allRowsSelected",
        }
    }
}
