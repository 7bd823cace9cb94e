//! Pipeline orchestrator
//!
//! [`DataTable`] owns rows, columns and every piece of interactive state of
//! one table and derives the rendered page from them:
//!
//! ```text
//! rows -> filter -> search -> sort -> (expansion annotation) -> paginate
//! ```
//!
//! Stages are memoized: the filtered set is only recomputed when rows,
//! columns or filters change, and the search/sort result only when its own
//! inputs change.
//!
//! With [`ServerOptions`] present the table is in server mode: rows are taken
//! as already filtered, sorted and paged by the data source, and interaction
//! is forwarded as [`TableEvent`]s instead of being applied locally.

use std::cell::OnceCell;
use std::sync::Arc;

use crate::config::TableConfig;
use crate::error::ColumnValidationError;
use crate::event::{ServerOptions, TableEvent};
use crate::model::{Column, Row, RowId, RowKey, leaf_columns, validate_columns};
use crate::query::filter::{
    ColumnFilter, FilterRegistry, FilterState, apply_filters, normalize_filters,
};
use crate::query::{
    Order, RecordRange, SearchScope, Sort, paginate, reclamp_page, record_range, search_rows,
    sort_rows, total_pages,
};
use crate::state::{Expansion, Selection, SelectionChange};

const LARGE_DATASET: usize = 1000;

/// A row as it flows through the pipeline.
#[derive(Debug, Clone)]
pub struct ProcessedRow {
    pub row: Arc<Row>,
    /// Position in the rows handed to the table.
    pub index: usize,
    pub id: RowId,
    pub expanded: bool,
}

impl AsRef<Row> for ProcessedRow {
    fn as_ref(&self) -> &Row {
        &self.row
    }
}

/// One table instance: data, configuration and interactive state.
///
/// # Example
///
/// ```
/// use datagrid_lib::{Column, DataTable, Row, TableConfig};
///
/// let rows = vec![
///     Row::new().set("id", 1).set("n", 5),
///     Row::new().set("id", 2).set("n", 3),
/// ];
/// let mut table = DataTable::new(vec![Column::new("n", "N").sortable()], rows)
///     .with_config(TableConfig::default().with_rows_per_page(Some(1)));
///
/// table.handle_sort("n", false);
/// let page = table.paginated_rows();
/// assert_eq!(page[0].row.get("id").map(|v| v.to_display_string()), Some("2".into()));
/// ```
#[derive(Debug)]
pub struct DataTable {
    columns: Vec<Column>,
    source: Vec<ProcessedRow>,
    config: TableConfig,
    registry: FilterRegistry,

    filters: FilterState,
    search: String,
    sort: Sort,
    page: usize,
    rows_per_page: Option<usize>,

    server_options: Option<ServerOptions>,
    server_items_length: Option<usize>,

    selection: Selection,
    expansion: Expansion,
    events: Vec<TableEvent>,

    filtered: OnceCell<Vec<ProcessedRow>>,
    processed: OnceCell<Vec<ProcessedRow>>,
}

impl DataTable {
    pub fn new(columns: Vec<Column>, rows: Vec<Row>) -> Self {
        let config = TableConfig::default();
        let mut table = Self {
            columns,
            source: Vec::new(),
            rows_per_page: config.rows_per_page,
            expansion: Expansion::new().with_accordion(config.accordion),
            config,
            registry: FilterRegistry::new(),
            filters: FilterState::new(),
            search: String::new(),
            sort: Sort::new(),
            page: 1,
            server_options: None,
            server_items_length: None,
            selection: Selection::new(),
            events: Vec::new(),
            filtered: OnceCell::new(),
            processed: OnceCell::new(),
        };
        table.set_rows(rows);
        table
    }

    pub fn with_config(mut self, config: TableConfig) -> Self {
        self.rows_per_page = config.rows_per_page;
        self.expansion.set_accordion(config.accordion);
        self.config = config;
        self.rekey();
        self
    }

    pub fn with_registry(mut self, registry: FilterRegistry) -> Self {
        self.registry = registry;
        self.invalidate_filtered();
        self
    }

    /// Start in server mode.
    pub fn with_server_options(mut self, options: ServerOptions) -> Self {
        self.set_server_options(Some(options));
        self
    }

    pub fn with_sort(mut self, sort: Sort) -> Self {
        self.set_sort(sort);
        self
    }

    // =========================================================================
    // Data
    // =========================================================================

    pub fn set_rows(&mut self, rows: Vec<Row>) {
        if rows.len() > LARGE_DATASET {
            log::debug!("Large dataset updated ({} rows)", rows.len());
        }
        let key = &self.config.row_key;
        self.source = rows
            .into_iter()
            .enumerate()
            .map(|(index, row)| ProcessedRow {
                id: key.id_of(&row, index),
                row: Arc::new(row),
                index,
                expanded: false,
            })
            .collect();
        self.invalidate_filtered();
    }

    pub fn rows(&self) -> impl Iterator<Item = &Row> {
        self.source.iter().map(|r| r.row.as_ref())
    }

    pub fn row_count(&self) -> usize {
        self.source.len()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn set_columns(&mut self, columns: Vec<Column>) {
        self.columns = columns;
        self.invalidate_filtered();
    }

    /// Configuration diagnostics for the current columns. Never fails.
    pub fn validate(&self) -> Vec<ColumnValidationError> {
        validate_columns(&self.columns)
    }

    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    pub fn set_row_key(&mut self, key: RowKey) {
        self.config.row_key = key;
        self.rekey();
    }

    pub fn registry(&self) -> &FilterRegistry {
        &self.registry
    }

    /// Register a filter function under a `filterKey`.
    pub fn register_filter(
        &mut self,
        name: impl Into<String>,
        f: impl Fn(&Row, &str, &ColumnFilter) -> bool + Send + Sync + 'static,
    ) {
        self.registry.register(name, f);
        self.invalidate_filtered();
    }

    /// Identity of a row under the configured key.
    pub fn row_id(&self, row: &Row, index: usize) -> RowId {
        self.config.row_key.id_of(row, index)
    }

    pub fn find_row(&self, id: &RowId) -> Option<&ProcessedRow> {
        self.source.iter().find(|r| &r.id == id)
    }

    // =========================================================================
    // Server mode
    // =========================================================================

    pub fn is_server_mode(&self) -> bool {
        self.server_options.is_some()
    }

    pub fn server_options(&self) -> Option<&ServerOptions> {
        self.server_options.as_ref()
    }

    /// Mirror the host's options. `None` returns to client mode.
    pub fn set_server_options(&mut self, options: Option<ServerOptions>) {
        self.server_options = options;
        self.invalidate_filtered();
    }

    /// Total rows at the data source, for range display.
    pub fn set_server_items_length(&mut self, length: Option<usize>) {
        self.server_items_length = length;
    }

    // =========================================================================
    // Filtering
    // =========================================================================

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    pub fn filter(&self, field: &str) -> Option<&ColumnFilter> {
        self.filters.get(field)
    }

    pub fn set_filter(&mut self, field: impl Into<String>, filter: ColumnFilter) {
        self.filters.insert(field.into(), filter);
        self.on_filters_changed();
    }

    pub fn clear_filter(&mut self, field: &str) {
        if self.filters.remove(field).is_some() {
            self.on_filters_changed();
        }
    }

    pub fn clear_all_filters(&mut self) {
        if !self.filters.is_empty() {
            self.filters.clear();
            self.on_filters_changed();
        }
    }

    /// Rows passing every column filter. Server mode passes rows unchanged.
    pub fn filtered_rows(&self) -> &[ProcessedRow] {
        self.filtered.get_or_init(|| {
            if self.is_server_mode() {
                return self.source.clone();
            }
            apply_filters(&self.source, &self.columns, &self.filters, &self.registry)
        })
    }

    fn on_filters_changed(&mut self) {
        self.invalidate_filtered();
        if self.is_server_mode() {
            self.events
                .push(TableEvent::FilterChange(normalize_filters(&self.filters)));
        }
        self.reset_page();
    }

    // =========================================================================
    // Search
    // =========================================================================

    pub fn search_query(&self) -> &str {
        &self.search
    }

    pub fn set_search(&mut self, query: impl Into<String>) {
        self.search = query.into();
        self.invalidate_processed();
        self.events.push(TableEvent::InputTyped(self.search.clone()));
        self.reset_page();
    }

    pub fn clear_search(&mut self) {
        self.set_search(String::new());
    }

    fn search_fields(&self) -> Option<Vec<String>> {
        match &self.config.search_scope {
            SearchScope::AllFields => None,
            SearchScope::DeclaredColumns => Some(
                leaf_columns(&self.columns)
                    .into_iter()
                    .filter(|c| !c.field.is_empty())
                    .map(|c| c.field.clone())
                    .collect(),
            ),
            SearchScope::Fields(fields) => Some(fields.clone()),
        }
    }

    // =========================================================================
    // Sorting
    // =========================================================================

    /// Sort shown in the headers: the server's when mirrored, else local.
    pub fn active_sort(&self) -> &Sort {
        self.server_options
            .as_ref()
            .and_then(|o| o.sort.as_ref())
            .unwrap_or(&self.sort)
    }

    /// Replace the local sort without emitting anything.
    pub fn set_sort(&mut self, sort: Sort) {
        self.sort = sort;
        self.invalidate_processed();
    }

    pub fn is_column_sorted(&self, field: &str) -> bool {
        self.active_sort().is_sorted_by(field)
    }

    pub fn sort_direction(&self, field: &str) -> Option<Order> {
        self.active_sort().direction(field)
    }

    pub fn sort_priority(&self, field: &str) -> Option<usize> {
        self.active_sort().priority(field)
    }

    /// Header click: advance `field` through unsorted, asc, desc.
    ///
    /// `multi_key` (a held modifier) appends or edits one key of a multi-key
    /// sort; it is ignored when multi-sort is disabled. Returns to page 1.
    pub fn handle_sort(&mut self, field: &str, multi_key: bool) {
        let mut sort = self.active_sort().clone();
        sort.toggle(field, multi_key && self.config.multi_sort_enabled);
        log::debug!("Sort on '{field}' -> {:?}", sort.entries());
        self.sort = sort.clone();
        self.invalidate_processed();

        match self.server_options.as_mut() {
            Some(options) => {
                options.sort = Some(sort.clone());
                options.page = 1;
                let options = options.clone();
                self.events.push(TableEvent::UpdateServerOptions(options));
            }
            None => {
                self.page = 1;
                self.events.push(TableEvent::UpdateSort(sort.clone()));
            }
        }
        self.events.push(TableEvent::SortChanged { sort });
    }

    pub fn clear_sort(&mut self) {
        if self.active_sort().is_empty() {
            return;
        }
        match self.server_options.as_mut() {
            Some(options) => {
                options.sort = Some(Sort::new());
                let options = options.clone();
                self.events.push(TableEvent::UpdateServerOptions(options));
            }
            None => self.events.push(TableEvent::UpdateSort(Sort::new())),
        }
        self.sort = Sort::new();
        self.invalidate_processed();
        self.events.push(TableEvent::SortChanged { sort: Sort::new() });
    }

    // =========================================================================
    // Derived rows
    // =========================================================================

    /// Filtered, searched and sorted rows across all pages, annotated with
    /// their expansion state.
    pub fn processed_rows(&self) -> Vec<ProcessedRow> {
        self.annotate(self.processed())
    }

    /// Number of rows after filter, search and sort.
    pub fn processed_len(&self) -> usize {
        self.processed().len()
    }

    /// Rows of the current page. Server mode shows the supplied rows as-is.
    pub fn paginated_rows(&self) -> Vec<ProcessedRow> {
        let processed = self.processed();
        if self.is_server_mode() {
            return self.annotate(processed);
        }
        self.annotate(&paginate(processed, self.page, self.rows_per_page))
    }

    fn processed(&self) -> &[ProcessedRow] {
        self.processed.get_or_init(|| {
            let filtered = self.filtered_rows();
            if self.is_server_mode() {
                return filtered.to_vec();
            }
            let fields = self.search_fields();
            let searched = search_rows(filtered, &self.search, fields.as_deref());
            if self.sort.is_empty() {
                searched
            } else {
                sort_rows(&searched, self.sort.entries())
            }
        })
    }

    fn annotate(&self, rows: &[ProcessedRow]) -> Vec<ProcessedRow> {
        rows.iter()
            .map(|r| ProcessedRow {
                expanded: self.expansion.is_expanded(&r.id),
                ..r.clone()
            })
            .collect()
    }

    // =========================================================================
    // Pagination
    // =========================================================================

    pub fn page(&self) -> usize {
        self.server_options
            .as_ref()
            .map(|o| o.page)
            .unwrap_or(self.page)
    }

    pub fn rows_per_page(&self) -> Option<usize> {
        match &self.server_options {
            Some(options) => options.rows_per_page,
            None => self.rows_per_page,
        }
    }

    /// Rows known to exist: the source's count in server mode when given,
    /// else the processed row count.
    pub fn total_records(&self) -> usize {
        self.server_items_length
            .unwrap_or_else(|| self.processed_len())
    }

    pub fn total_pages(&self) -> usize {
        total_pages(self.total_records(), self.rows_per_page())
    }

    pub fn record_range(&self) -> RecordRange {
        record_range(self.page(), self.rows_per_page(), self.total_records())
    }

    pub fn is_first_page(&self) -> bool {
        self.page() <= 1
    }

    pub fn is_last_page(&self) -> bool {
        self.page() >= self.total_pages()
    }

    /// Go to `page` (1-based; 0 is treated as 1).
    pub fn handle_page_change(&mut self, page: usize) {
        let page = page.max(1);
        match self.server_options.as_mut() {
            Some(options) => {
                options.page = page;
                let options = options.clone();
                self.events.push(TableEvent::UpdateServerOptions(options));
            }
            None => self.page = page,
        }
        self.events.push(TableEvent::PageUpdated(page));
    }

    pub fn next_page(&mut self) {
        if !self.is_last_page() {
            self.handle_page_change(self.page() + 1);
        }
    }

    pub fn previous_page(&mut self) {
        if !self.is_first_page() {
            self.handle_page_change(self.page() - 1);
        }
    }

    /// Change the page size and pull the page back into range. `None` or `0`
    /// shows every row.
    pub fn handle_rows_per_page(&mut self, rows_per_page: Option<usize>) {
        let rows_per_page = rows_per_page.filter(|n| *n > 0);
        let page = reclamp_page(self.page(), self.total_records(), rows_per_page);
        match self.server_options.as_mut() {
            Some(options) => {
                options.rows_per_page = rows_per_page;
                options.page = page;
                let options = options.clone();
                self.events.push(TableEvent::UpdateServerOptions(options));
            }
            None => {
                self.rows_per_page = rows_per_page;
                self.page = page;
            }
        }
        self.events.push(TableEvent::RowsPerPageChanged(rows_per_page));
    }

    fn reset_page(&mut self) {
        match self.server_options.as_mut() {
            Some(options) if options.page != 1 => {
                options.page = 1;
                let options = options.clone();
                self.events.push(TableEvent::UpdateServerOptions(options));
            }
            Some(_) => {}
            None => self.page = 1,
        }
    }

    // =========================================================================
    // Rows
    // =========================================================================

    pub fn handle_row_click(&mut self, id: &RowId) {
        if let Some(row) = self.find_row(id) {
            let event = TableEvent::RowClick {
                row: row.row.as_ref().clone(),
                index: row.index,
            };
            self.events.push(event);
        }
    }

    // =========================================================================
    // Selection
    // =========================================================================

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn selected_rows(&self) -> Vec<Row> {
        self.selection.rows()
    }

    pub fn is_row_selected(&self, id: &RowId) -> bool {
        self.selection.is_selected(id)
    }

    /// Every processed row (all pages) is selected.
    pub fn is_all_selected(&self) -> bool {
        self.selection.is_all_selected(self.processed_len())
    }

    pub fn is_some_selected(&self) -> bool {
        let visible: Vec<RowId> = self.processed().iter().map(|r| r.id.clone()).collect();
        self.selection.is_some_selected(&visible)
    }

    /// Host-controlled selection. `None` hands ownership back to the table.
    pub fn set_item_selected(&mut self, rows: Option<Vec<Row>>) {
        match rows {
            Some(rows) => {
                let entries = rows
                    .into_iter()
                    .enumerate()
                    .map(|(i, row)| (self.identify(&row, i), row))
                    .collect();
                self.selection.set_external(entries);
            }
            None => self.selection.release(),
        }
    }

    /// Returns `false` when no row has this id.
    pub fn toggle_row(&mut self, id: &RowId) -> bool {
        let Some((row, index)) = self.lookup(id) else {
            return false;
        };
        let change = self.selection.toggle(id.clone(), &row);
        self.emit_selection(change, row, index);
        true
    }

    pub fn select_row(&mut self, id: &RowId) -> bool {
        let Some((row, index)) = self.lookup(id) else {
            return false;
        };
        let change = self.selection.select(id.clone(), &row);
        self.emit_selection(change, row, index);
        true
    }

    pub fn deselect_row(&mut self, id: &RowId) -> bool {
        let Some((row, index)) = self.lookup(id) else {
            return false;
        };
        let change = self.selection.deselect(id);
        self.emit_selection(change, row, index);
        true
    }

    /// Select every processed row, across all pages.
    pub fn select_all(&mut self) {
        let visible = self
            .processed()
            .iter()
            .map(|r| (r.id.clone(), r.row.as_ref().clone()))
            .collect();
        let change = self.selection.select_all(visible);
        self.events
            .push(TableEvent::UpdateItemSelected(change.rows.clone()));
        self.events.push(TableEvent::AllRowsSelected(change.rows));
    }

    pub fn deselect_all(&mut self) {
        self.selection.clear();
        self.events.push(TableEvent::UpdateItemSelected(Vec::new()));
        self.events.push(TableEvent::AllRowsSelected(Vec::new()));
    }

    /// Empty the selection, reporting only the new selection.
    pub fn clear_selection(&mut self) {
        self.selection.clear();
        self.events.push(TableEvent::UpdateItemSelected(Vec::new()));
    }

    fn emit_selection(&mut self, change: SelectionChange, row: Row, index: usize) {
        if change.is_empty() {
            return;
        }
        let selected = !change.added.is_empty();
        self.events.push(TableEvent::UpdateItemSelected(change.rows));
        self.events.push(if selected {
            TableEvent::RowSelected { row, index }
        } else {
            TableEvent::RowDeselected { row, index }
        });
    }

    // =========================================================================
    // Expansion
    // =========================================================================

    pub fn expansion(&self) -> &Expansion {
        &self.expansion
    }

    pub fn expanded_ids(&self) -> &[RowId] {
        self.expansion.ids()
    }

    pub fn is_row_expanded(&self, id: &RowId) -> bool {
        self.expansion.is_expanded(id)
    }

    /// Host-controlled expansion. `None` hands ownership back to the table.
    pub fn set_expanded(&mut self, ids: Option<Vec<RowId>>) {
        match ids {
            Some(ids) => self.expansion.set_external(ids),
            None => self.expansion.release(),
        }
    }

    pub fn toggle_row_expansion(&mut self, id: &RowId) -> bool {
        let Some((row, index)) = self.lookup(id) else {
            return false;
        };
        let change = self.expansion.toggle(id.clone());
        if self.expansion.is_controlled() {
            self.events.push(TableEvent::UpdateExpanded(change.ids));
        }
        let row_id = change.row_id;
        self.events.push(if change.expanded {
            TableEvent::ExpandRow { row, index, row_id }
        } else {
            TableEvent::CollapseRow { row, index, row_id }
        });
        true
    }

    pub fn expand_row(&mut self, id: &RowId) -> bool {
        !self.is_row_expanded(id) && self.toggle_row_expansion(id)
    }

    pub fn collapse_row(&mut self, id: &RowId) -> bool {
        self.is_row_expanded(id) && self.toggle_row_expansion(id)
    }

    pub fn collapse_all(&mut self) {
        let previous = self.expansion.collapse_all();
        if self.expansion.is_controlled() {
            self.events.push(TableEvent::UpdateExpanded(Vec::new()));
        }
        for row_id in previous {
            if let Some((row, index)) = self.lookup(&row_id) {
                self.events
                    .push(TableEvent::CollapseRow { row, index, row_id });
            }
        }
    }

    pub fn set_row_loading(&mut self, id: RowId, loading: bool) {
        self.expansion.set_loading(id, loading);
    }

    pub fn is_row_loading(&self, id: &RowId) -> bool {
        self.expansion.is_loading(id)
    }

    // =========================================================================
    // Events
    // =========================================================================

    pub fn pending_events(&self) -> &[TableEvent] {
        &self.events
    }

    /// Take every event queued since the last drain, oldest first.
    pub fn drain_events(&mut self) -> Vec<TableEvent> {
        std::mem::take(&mut self.events)
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn lookup(&self, id: &RowId) -> Option<(Row, usize)> {
        self.find_row(id)
            .map(|r| (r.row.as_ref().clone(), r.index))
    }

    /// Identity of a host-supplied row: the id of the equal source row when
    /// there is one, else the key applied at `fallback_index`.
    fn identify(&self, row: &Row, fallback_index: usize) -> RowId {
        self.source
            .iter()
            .find(|r| r.row.as_ref() == row)
            .map(|r| r.id.clone())
            .unwrap_or_else(|| self.row_id(row, fallback_index))
    }

    fn rekey(&mut self) {
        let key = &self.config.row_key;
        for entry in &mut self.source {
            entry.id = key.id_of(&entry.row, entry.index);
        }
        self.invalidate_filtered();
    }

    fn invalidate_filtered(&mut self) {
        self.filtered = OnceCell::new();
        self.processed = OnceCell::new();
    }

    fn invalidate_processed(&mut self) {
        self.processed = OnceCell::new();
    }
}
