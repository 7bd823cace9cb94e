//! Measured cell geometry.
//!
//! The sticky plan is computed from what layout produced, not from the
//! column definitions: the body's first data row decides which grid column
//! renders which field.

use griddom::{Element, LayoutResult, Section, all_rows};

use crate::classes;
use crate::error::LayoutError;

/// Utility column a cell belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UtilityKind {
    Checkbox,
    Expand,
}

impl UtilityKind {
    fn of(cell: &Element) -> Option<Self> {
        if cell.has_class(classes::CHECKBOX_COLUMN) {
            Some(UtilityKind::Checkbox)
        } else if cell.has_class(classes::EXPAND_COLUMN) {
            Some(UtilityKind::Expand)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CellGeometry {
    pub id: String,
    pub field: Option<String>,
    pub utility: Option<UtilityKind>,
    pub colspan: usize,
    /// Left edge relative to the table origin.
    pub x: u32,
    pub width: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RowGeometry {
    pub id: String,
    pub section: Section,
    pub cells: Vec<CellGeometry>,
    /// Row renders real data (not an empty-state or expanded detail row).
    pub data: bool,
}

/// Geometry of every row of a laid out table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableGeometry {
    pub rows: Vec<RowGeometry>,
    pub column_widths: Vec<u32>,
    pub content_width: u32,
}

impl TableGeometry {
    /// Pair each cell of `table` with its rect from `layout`.
    pub fn measure(table: &Element, layout: &LayoutResult) -> Result<Self, LayoutError> {
        let mut rows = Vec::new();
        for (section, row) in all_rows(table) {
            let mut cells = Vec::with_capacity(row.child_elements().len());
            for cell in row.child_elements().iter().filter(|c| c.tag.is_cell()) {
                let rect = layout
                    .get(&cell.id)
                    .ok_or_else(|| LayoutError::missing_geometry(&cell.id))?;
                cells.push(CellGeometry {
                    id: cell.id.clone(),
                    field: cell.get_field().map(str::to_string),
                    utility: UtilityKind::of(cell),
                    colspan: cell.colspan.max(1) as usize,
                    x: rect.x,
                    width: rect.width,
                });
            }
            rows.push(RowGeometry {
                id: row.id.clone(),
                section,
                cells,
                data: !row.has_class(classes::EXPANDED_ROW) && !row.has_class(classes::EMPTY_ROW),
            });
        }

        if rows.is_empty() {
            return Err(LayoutError::NoRows);
        }

        Ok(Self {
            rows,
            column_widths: layout.column_widths.clone(),
            content_width: layout.content_width,
        })
    }

    /// First body row rendering data.
    pub fn first_data_row(&self) -> Result<&RowGeometry, LayoutError> {
        if !self.rows.iter().any(|r| r.section == Section::Body) {
            return Err(LayoutError::MissingSection(Section::Body));
        }
        self.rows
            .iter()
            .find(|r| r.section == Section::Body && r.data)
            .ok_or(LayoutError::NoDataRows)
    }

    pub fn rows_in(&self, section: Section) -> impl Iterator<Item = &RowGeometry> {
        self.rows.iter().filter(move |r| r.section == section)
    }
}
