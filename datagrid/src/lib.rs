//! Data grid widget
//!
//! Renders a [`datagrid_lib::DataTable`] into a `griddom` element tree and
//! runs the sticky layout engine over it: pinned columns, sticky header and
//! footer regions, scroll shadows and edge elevation.

pub mod classes;
pub mod config;
pub mod error;
pub mod scheduler;
pub mod sticky;
pub mod tree;
pub mod widget;

pub use config::{StickyConfig, ZLayers};
pub use error::LayoutError;
pub use tree::{GridOptions, build_table};
pub use widget::{DataGrid, GridAction};

pub mod prelude {
    pub use crate::config::{StickyConfig, ZLayers};
    pub use crate::scheduler::{LayoutHandle, LayoutReceiver, LayoutTrigger, channel};
    pub use crate::sticky::{Shadows, StickyPlan};
    pub use crate::tree::GridOptions;
    pub use crate::widget::{DataGrid, GridAction};

    pub use datagrid_lib::model::{Column, Row, RowId, StickySide};
    pub use datagrid_lib::{DataTable, TableConfig, TableEvent};
    pub use griddom::{LayoutMetrics, Rect};
}
