pub mod element;
pub mod layout;
pub mod scroll;
pub mod text;
pub mod types;

pub use element::{
    Content, Element, FIELD_ATTR, all_rows, find_element, find_element_mut, for_each_cell_mut,
    rows, section, section_mut,
};
pub use layout::{LayoutMetrics, LayoutResult, Rect, layout_table};
pub use scroll::{ScrollMetrics, ScrollOffset, ScrollState};
pub use types::*;
