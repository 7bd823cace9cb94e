//! Auto table layout: column widths from cell content, then cell geometry.

mod rect;
mod table;

use std::collections::HashMap;

pub use rect::Rect;
pub use table::layout_table;

/// Font and box metrics used to turn text into pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutMetrics {
    /// Width of one display column of text.
    /// Default: 8
    pub char_width: u32,
    /// Height of every table row.
    /// Default: 36
    pub row_height: u32,
    /// Horizontal padding on each side of a cell.
    /// Default: 12
    pub cell_padding: u32,
}

impl Default for LayoutMetrics {
    fn default() -> Self {
        Self {
            char_width: 8,
            row_height: 36,
            cell_padding: 12,
        }
    }
}

/// Geometry computed by one layout pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayoutResult {
    rects: HashMap<String, Rect>,
    /// Resolved width of every grid column, left to right.
    pub column_widths: Vec<u32>,
    pub content_width: u32,
    pub content_height: u32,
}

impl LayoutResult {
    pub fn get(&self, id: &str) -> Option<&Rect> {
        self.rects.get(id)
    }

    pub fn width_of(&self, id: &str) -> Option<u32> {
        self.rects.get(id).map(|r| r.width)
    }

    pub fn len(&self) -> usize {
        self.rects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rects.is_empty()
    }

    pub(crate) fn insert(&mut self, id: &str, rect: Rect) {
        self.rects.insert(id.to_string(), rect);
    }
}
