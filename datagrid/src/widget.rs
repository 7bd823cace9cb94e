//! The data grid widget.
//!
//! [`DataGrid`] owns a [`DataTable`], renders its current page into a
//! `griddom` tree and keeps sticky columns, sticky header/footer regions and
//! scroll shadows in step with it:
//!
//! - Changes to data or columns mark the tree stale and queue a layout
//!   trigger.
//! - The host calls [`DataGrid::frame_ready`] once the previous frame is
//!   painted. Stale trees are rebuilt there and one layout pass runs for all
//!   triggers queued since the last frame.
//! - Scrolling only moves offsets, updates shadows and elevates the pinned
//!   cells that sit on the viewport edge. No pass runs.

use std::collections::BTreeSet;

use datagrid_lib::model::{Column, Row, RowId, StickySide, find_column};
use datagrid_lib::{DataTable, TableEvent};
use griddom::{
    Element, LayoutMetrics, LayoutResult, Rect, ScrollMetrics, ScrollState, Section, all_rows,
    layout_table,
};

use crate::classes;
use crate::config::StickyConfig;
use crate::error::LayoutError;
use crate::scheduler::{LayoutPhase, LayoutScheduler, LayoutTrigger};
use crate::sticky::{
    Shadows, StickyPlan, TableGeometry, apply_plan, clear_mirrored_widths, clear_sticky,
    compute_sticky, elevate_edges, is_at_edge, mirror_widths, pin_region, settle_edges,
    unpin_region,
};
use crate::tree::{GridOptions, ROW_ID_ATTR, build_table, decode_row_id};

/// What a click on the grid did.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum GridAction {
    /// Click hit nothing interactive.
    #[default]
    Ignored,
    /// A sortable header was clicked.
    Sorted { field: String },
    /// The header checkbox selected or cleared every row.
    AllToggled,
    SelectionToggled(RowId),
    ExpansionToggled(RowId),
    RowClicked(RowId),
}

impl GridAction {
    pub fn is_handled(&self) -> bool {
        !matches!(self, GridAction::Ignored)
    }
}

pub struct DataGrid {
    id: String,
    table: DataTable,
    options: GridOptions,
    sticky: StickyConfig,
    metrics: LayoutMetrics,

    tree: Element,
    tree_dirty: bool,
    layout: LayoutResult,
    geometry: TableGeometry,
    plan: StickyPlan,

    scheduler: LayoutScheduler,
    scroll: ScrollState,
    viewport: Rect,
    shadows: Shadows,
    scrolling: bool,
}

impl DataGrid {
    pub fn new(id: impl Into<String>, table: DataTable) -> Self {
        let id = id.into();
        let options = GridOptions::default();
        let tree = build_table(&id, &table, &options);
        Self {
            id,
            table,
            options,
            sticky: StickyConfig::default(),
            metrics: LayoutMetrics::default(),
            tree,
            tree_dirty: false,
            layout: LayoutResult::default(),
            geometry: TableGeometry::default(),
            plan: StickyPlan::default(),
            scheduler: LayoutScheduler::new(),
            scroll: ScrollState::new(),
            viewport: Rect::default(),
            shadows: Shadows::default(),
            scrolling: false,
        }
    }

    pub fn with_options(mut self, options: GridOptions) -> Self {
        self.options = options;
        self.tree_dirty = true;
        self
    }

    pub fn with_sticky(mut self, sticky: StickyConfig) -> Self {
        self.sticky = sticky;
        self
    }

    pub fn with_metrics(mut self, metrics: LayoutMetrics) -> Self {
        self.metrics = metrics;
        self
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn table(&self) -> &DataTable {
        &self.table
    }

    /// Mutable access to the table. The tree is rebuilt on the next frame.
    pub fn table_mut(&mut self) -> &mut DataTable {
        self.invalidate(LayoutTrigger::RowsChanged);
        &mut self.table
    }

    pub fn options(&self) -> &GridOptions {
        &self.options
    }

    pub fn sticky_config(&self) -> &StickyConfig {
        &self.sticky
    }

    pub fn tree(&self) -> &Element {
        &self.tree
    }

    pub fn layout(&self) -> &LayoutResult {
        &self.layout
    }

    pub fn geometry(&self) -> &TableGeometry {
        &self.geometry
    }

    pub fn plan(&self) -> &StickyPlan {
        &self.plan
    }

    pub fn scheduler(&self) -> &LayoutScheduler {
        &self.scheduler
    }

    pub fn viewport(&self) -> Rect {
        self.viewport
    }

    pub fn shadows(&self) -> Shadows {
        self.shadows
    }

    pub fn is_scrolling(&self) -> bool {
        self.scrolling
    }

    pub fn head_id(&self) -> String {
        format!("{}-head", self.id)
    }

    /// The body is the horizontal scroll container.
    pub fn body_id(&self) -> String {
        format!("{}-body", self.id)
    }

    pub fn foot_id(&self) -> String {
        format!("{}-foot", self.id)
    }

    pub fn scroll_metrics(&self) -> ScrollMetrics {
        self.scroll.metrics(&self.body_id())
    }

    pub fn scroll_state(&self) -> &ScrollState {
        &self.scroll
    }

    pub fn drain_events(&mut self) -> Vec<TableEvent> {
        self.table.drain_events()
    }

    // =========================================================================
    // Data
    // =========================================================================

    pub fn set_columns(&mut self, columns: Vec<Column>) {
        self.table.set_columns(columns);
        self.invalidate(LayoutTrigger::ColumnsChanged);
    }

    pub fn set_rows(&mut self, rows: Vec<Row>) {
        self.table.set_rows(rows);
        self.invalidate(LayoutTrigger::RowsChanged);
    }

    /// Replace the render options. Adding or removing utility columns
    /// changes the column structure.
    pub fn set_options(&mut self, options: GridOptions) {
        self.options = options;
        self.invalidate(LayoutTrigger::ColumnsChanged);
    }

    /// A column group was collapsed or expanded by the host.
    pub fn groups_toggled(&mut self) {
        self.invalidate(LayoutTrigger::GroupsToggled);
    }

    /// Queue a layout pass without touching the data.
    pub fn request_layout(&mut self, trigger: LayoutTrigger) -> bool {
        self.scheduler.request(trigger)
    }

    /// Queue every trigger of a batch, as received from a layout channel.
    pub fn request_all(&mut self, triggers: BTreeSet<LayoutTrigger>) {
        for trigger in triggers {
            self.scheduler.request(trigger);
        }
    }

    fn invalidate(&mut self, trigger: LayoutTrigger) {
        self.tree_dirty = true;
        self.scheduler.request(trigger);
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Attach the grid to a viewport. The first pass runs on the next frame.
    pub fn mount(&mut self, viewport: Rect) {
        log::debug!(
            "[grid] {} mounted at {}x{}",
            self.id,
            viewport.width,
            viewport.height
        );
        self.set_viewport(viewport);
        self.tree_dirty = true;
        self.scheduler.mount();
    }

    /// Detach the grid, removing every sticky style and mirrored width.
    pub fn unmount(&mut self) {
        clear_sticky(&mut self.tree);
        for section in [Section::Head, Section::Foot] {
            clear_mirrored_widths(&mut self.tree, section);
            unpin_region(&mut self.tree, section);
        }
        self.plan = StickyPlan::default();
        self.shadows = Shadows::default();
        self.scrolling = false;
        self.scheduler.unmount();
        log::debug!("[grid] {} unmounted", self.id);
    }

    pub fn on_resize(&mut self, width: u32, height: u32) {
        self.set_viewport(Rect::new(self.viewport.x, self.viewport.y, width, height));
        self.scheduler.request(LayoutTrigger::Resize);
    }

    fn set_viewport(&mut self, viewport: Rect) {
        self.viewport = viewport;
        for id in [self.head_id(), self.body_id(), self.foot_id()] {
            self.scroll.set_viewport(&id, viewport.width, viewport.height);
        }
    }

    /// The previous frame is painted and the tree reflects current state.
    ///
    /// Rebuilds a stale tree and runs one layout pass if any trigger is
    /// queued. Returns true when a pass completed. A pass that cannot
    /// measure the table is abandoned and logged; the next trigger retries.
    pub fn frame_ready(&mut self) -> bool {
        if self.tree_dirty {
            self.tree = build_table(&self.id, &self.table, &self.options);
            self.tree_dirty = false;
            // A fresh tree carries no sticky styles
            self.scheduler.request(LayoutTrigger::RowsChanged);
        }

        let Some(triggers) = self.scheduler.begin() else {
            return false;
        };
        let result = self.run_pass();
        self.scheduler.finish();

        match result {
            Ok(()) => true,
            Err(e) => {
                log::warn!("[sticky] pass for {triggers:?} aborted: {e}");
                false
            }
        }
    }

    fn run_pass(&mut self) -> Result<(), LayoutError> {
        clear_sticky(&mut self.tree);
        for section in [Section::Head, Section::Foot] {
            clear_mirrored_widths(&mut self.tree, section);
            unpin_region(&mut self.tree, section);
        }
        self.plan = StickyPlan::default();

        self.layout = layout_table(&self.tree, self.viewport, &self.metrics);
        self.record_content_size();
        self.geometry = TableGeometry::measure(&self.tree, &self.layout)?;

        self.scheduler.enter(LayoutPhase::ComputingOffsets);
        self.plan = compute_sticky(&self.geometry, self.table.columns(), &self.sticky)?;

        self.scheduler.enter(LayoutPhase::ApplyingStyles);
        let applied = apply_plan(&mut self.tree, &self.plan);
        if self.sticky.sticky_header {
            mirror_widths(&mut self.tree, Section::Head, &self.geometry);
            pin_region(&mut self.tree, Section::Head, self.sticky.z.region_layer());
        }
        if self.sticky.sticky_footer {
            mirror_widths(&mut self.tree, Section::Foot, &self.geometry);
            pin_region(&mut self.tree, Section::Foot, self.sticky.z.region_layer());
        }

        let relaid = layout_table(&self.tree, self.viewport, &self.metrics);
        if relaid.content_width != self.layout.content_width {
            // Dropped by the in-progress guard, the pass is already using
            // the new widths
            self.scheduler.request(LayoutTrigger::Resize);
        }
        self.layout = relaid;
        self.record_content_size();
        self.refresh_shadows();
        if self.scrolling {
            let metrics = self.scroll_metrics();
            elevate_edges(&mut self.tree, &self.plan, &metrics, &self.sticky.z);
        }

        log::debug!(
            "[sticky] {} pinned {} cells ({} left, {} right)",
            self.id,
            applied,
            self.plan.left.len(),
            self.plan.right.len()
        );
        Ok(())
    }

    fn record_content_size(&mut self) {
        let (width, height) = (self.layout.content_width, self.layout.content_height);
        for id in [self.head_id(), self.body_id(), self.foot_id()] {
            self.scroll.set_content_size(&id, width, height);
        }
    }

    fn refresh_shadows(&mut self) {
        self.shadows = if self.sticky.show_shadows {
            Shadows::from_metrics(&self.scroll_metrics())
        } else {
            Shadows::default()
        };
    }

    // =========================================================================
    // Scrolling
    // =========================================================================

    /// Scroll the body and keep header and footer aligned with it.
    /// Returns true if the offset changed.
    pub fn on_scroll(&mut self, dx: i32, dy: i32) -> bool {
        let body = self.body_id();
        if !self.scroll.scroll_by(&body, dx, dy) {
            return false;
        }
        let (head, foot) = (self.head_id(), self.foot_id());
        self.scroll.sync_x(&body, &[&head, &foot]);

        self.scrolling = true;
        self.refresh_shadows();
        let metrics = self.scroll_metrics();
        elevate_edges(&mut self.tree, &self.plan, &metrics, &self.sticky.z);
        true
    }

    pub fn on_scroll_end(&mut self) {
        self.scrolling = false;
        settle_edges(&mut self.tree, &self.plan);
    }

    // =========================================================================
    // Clicks
    // =========================================================================

    /// Handle a click at viewport coordinates. `multi` extends a multi-column
    /// sort instead of replacing it.
    pub fn handle_click(&mut self, x: u32, y: u32, multi: bool) -> GridAction {
        let Some((section, row_id, cell_id)) = self.hit_test(x, y) else {
            return GridAction::Ignored;
        };
        let action = match section {
            Section::Head => self.header_click(&cell_id, multi),
            Section::Body => self.body_click(&row_id, &cell_id),
            Section::Foot => GridAction::Ignored,
        };
        if action.is_handled() {
            self.invalidate(LayoutTrigger::RowsChanged);
        }
        action
    }

    fn header_click(&mut self, cell_id: &str, multi: bool) -> GridAction {
        let Some(cell) = griddom::find_element(&self.tree, cell_id) else {
            return GridAction::Ignored;
        };
        if cell.has_class(classes::CHECKBOX_COLUMN) {
            if self.table.is_all_selected() {
                self.table.deselect_all();
            } else {
                self.table.select_all();
            }
            return GridAction::AllToggled;
        }
        let Some(field) = cell.get_field().map(str::to_string) else {
            return GridAction::Ignored;
        };
        if !cell.has_class(classes::SORTABLE)
            || !find_column(self.table.columns(), &field).is_some_and(|c| c.sortable)
        {
            return GridAction::Ignored;
        }
        self.table.handle_sort(&field, multi);
        GridAction::Sorted { field }
    }

    fn body_click(&mut self, row_el: &str, cell_id: &str) -> GridAction {
        let Some(row) = griddom::find_element(&self.tree, row_el) else {
            return GridAction::Ignored;
        };
        if row.has_class(classes::EXPANDED_ROW) || row.has_class(classes::EMPTY_ROW) {
            return GridAction::Ignored;
        }
        let Some(key) = row
            .get_data(ROW_ID_ATTR)
            .and_then(|v| decode_row_id(v.as_str()))
        else {
            return GridAction::Ignored;
        };
        let Some(id) = self
            .table
            .paginated_rows()
            .into_iter()
            .map(|r| r.id)
            .find(|id| *id == key)
        else {
            return GridAction::Ignored;
        };

        let cell = griddom::find_element(&self.tree, cell_id);
        if cell.is_some_and(|c| c.has_class(classes::CHECKBOX_COLUMN)) {
            self.table.toggle_row(&id);
            return GridAction::SelectionToggled(id);
        }
        if cell.is_some_and(|c| c.has_class(classes::EXPAND_COLUMN)) {
            self.table.toggle_row_expansion(&id);
            return GridAction::ExpansionToggled(id);
        }
        self.table.handle_row_click(&id);
        GridAction::RowClicked(id)
    }

    /// Find the row and cell under a viewport point. Pinned cells sit on
    /// top of the cells they cover, so they are checked first.
    fn hit_test(&self, x: u32, y: u32) -> Option<(Section, String, String)> {
        let body = self.scroll.get(&self.body_id());
        let metrics = self.scroll_metrics();
        let content_x = x + body.x;

        for (section, row) in all_rows(&self.tree) {
            let Some(rect) = self.layout.get(&row.id) else {
                continue;
            };
            let row_y = if section == Section::Head && self.sticky.sticky_header {
                y
            } else {
                y + body.y
            };
            if row_y < rect.top() || row_y >= rect.bottom() {
                continue;
            }

            let mut cells: Vec<(&Element, u32, u32, bool)> = Vec::new();
            for cell in row.child_elements().iter().filter(|c| c.tag.is_cell()) {
                let Some(cell_rect) = self.layout.get(&cell.id) else {
                    continue;
                };
                let (left, pinned) = match self.plan.placement(&cell.id) {
                    Some(p) if is_at_edge(p, &metrics) => match p.side {
                        StickySide::Left => (body.x + p.offset, true),
                        StickySide::Right => (
                            (body.x + metrics.client_width)
                                .saturating_sub(p.offset + cell_rect.width),
                            true,
                        ),
                    },
                    _ => (cell_rect.x, false),
                };
                cells.push((cell, left, cell_rect.width, pinned));
            }
            cells.sort_by_key(|(_, _, _, pinned)| !pinned);

            return cells
                .into_iter()
                .find(|(_, left, width, _)| content_x >= *left && content_x < left + width)
                .map(|(cell, _, _, _)| (section, row.id.clone(), cell.id.clone()));
        }
        None
    }
}

impl std::fmt::Debug for DataGrid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataGrid")
            .field("id", &self.id)
            .field("rows", &self.table.row_count())
            .field("phase", &self.scheduler.phase())
            .field("viewport", &self.viewport)
            .field("pinned", &self.plan.placements.len())
            .finish()
    }
}
