//! Sticky offset computation.
//!
//! [`compute_sticky`] is a pure function of measured geometry and column
//! configuration; applying its result to the element tree is left to
//! [`super::apply`].

use std::collections::HashMap;

use datagrid_lib::model::{Column, StickySide, find_group, leaf_columns, sticky_leaves};
use griddom::Section;

use super::geometry::{CellGeometry, TableGeometry, UtilityKind};
use crate::classes;
use crate::config::StickyConfig;
use crate::error::LayoutError;

/// A grid column pinned to one side.
#[derive(Debug, Clone, PartialEq)]
pub struct StickyColumn {
    /// Grid column index in the body's first data row.
    pub index: usize,
    /// Field rendered there. Utility columns have none.
    pub field: Option<String>,
    pub side: StickySide,
    /// Distance from the pinned edge.
    pub offset: u32,
    pub width: u32,
    /// Natural left edge relative to the table origin.
    pub x: u32,
}

/// Where one cell is pinned.
#[derive(Debug, Clone, PartialEq)]
pub struct CellPlacement {
    pub cell_id: String,
    pub section: Section,
    pub side: StickySide,
    pub offset: u32,
    pub z_index: i16,
    /// Natural geometry of the cell, used for edge detection while scrolling.
    pub x: u32,
    pub width: u32,
}

impl CellPlacement {
    pub fn background_inherit(&self) -> bool {
        self.side == StickySide::Right
    }
}

/// Result of one offset computation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StickyPlan {
    /// Left pinned columns, ascending by index.
    pub left: Vec<StickyColumn>,
    /// Right pinned columns, descending by index.
    pub right: Vec<StickyColumn>,
    pub placements: Vec<CellPlacement>,
}

impl StickyPlan {
    pub fn is_empty(&self) -> bool {
        self.left.is_empty() && self.right.is_empty()
    }

    pub fn column(&self, index: usize) -> Option<&StickyColumn> {
        self.left
            .iter()
            .chain(self.right.iter())
            .find(|c| c.index == index)
    }

    pub fn placement(&self, cell_id: &str) -> Option<&CellPlacement> {
        self.placements.iter().find(|p| p.cell_id == cell_id)
    }
}

/// Compute sticky offsets and per-cell placements.
///
/// The first data row of the body maps fields to grid columns. A leaf is
/// sticky when it or an enclosing group declares a side. Utility columns join
/// the left side only when some column is pinned left explicitly. Left
/// offsets accumulate from the leftmost pinned column, right offsets from
/// the rightmost. Group header cells take the offset of their first leaf on
/// the left and their last leaf on the right. Expanded detail and empty-state
/// rows are never pinned.
pub fn compute_sticky(
    geometry: &TableGeometry,
    columns: &[Column],
    config: &StickyConfig,
) -> Result<StickyPlan, LayoutError> {
    let declared = sticky_leaves(columns);
    if declared.iter().all(|(_, side)| side.is_none()) {
        return Ok(StickyPlan::default());
    }

    let first = geometry.first_data_row()?;
    let index = ColumnIndex::from_cells(&first.cells);

    let mut left: Vec<usize> = Vec::new();
    let mut right: Vec<usize> = Vec::new();
    for (column, side) in &declared {
        let Some(i) = index.field(&column.field) else {
            continue;
        };
        match side {
            Some(StickySide::Left) => left.push(i),
            Some(StickySide::Right) => right.push(i),
            None => {}
        }
    }
    if !left.is_empty() {
        left.extend(index.utilities.values().copied());
    }

    left.sort_unstable();
    left.dedup();
    right.sort_unstable_by(|a, b| b.cmp(a));
    right.dedup();
    // A column pinned on both sides stays left
    right.retain(|i| !left.contains(i));

    let left = pinned(geometry, &index, &left, StickySide::Left);
    let right = pinned(geometry, &index, &right, StickySide::Right);

    log::debug!(
        "[sticky] left {:?} right {:?}",
        left.iter().map(|c| (c.index, c.offset)).collect::<Vec<_>>(),
        right.iter().map(|c| (c.index, c.offset)).collect::<Vec<_>>()
    );

    let mut plan = StickyPlan {
        left,
        right,
        placements: Vec::new(),
    };

    for row in geometry.rows.iter().filter(|r| r.data) {
        let z_index = match row.section {
            Section::Head => config.z.header,
            Section::Body | Section::Foot => config.z.body,
        };
        let mut start = 0;
        for cell in &row.cells {
            let target = resolve(cell, start, columns, &index, &plan);
            start += cell.colspan;
            let Some(sticky) = target.and_then(|i| plan.column(i)) else {
                continue;
            };
            plan.placements.push(CellPlacement {
                cell_id: cell.id.clone(),
                section: row.section,
                side: sticky.side,
                offset: sticky.offset,
                z_index,
                x: cell.x,
                width: cell.width,
            });
        }
    }

    Ok(plan)
}

/// Field and utility positions in the body's first data row.
struct ColumnIndex {
    fields: HashMap<String, usize>,
    utilities: HashMap<UtilityKind, usize>,
}

impl ColumnIndex {
    fn from_cells(cells: &[CellGeometry]) -> Self {
        let mut fields = HashMap::new();
        let mut utilities = HashMap::new();
        let mut start = 0;
        for cell in cells {
            if let Some(field) = &cell.field {
                fields.entry(field.clone()).or_insert(start);
            }
            if let Some(kind) = cell.utility {
                utilities.entry(kind).or_insert(start);
            }
            start += cell.colspan;
        }
        Self { fields, utilities }
    }

    fn field(&self, field: &str) -> Option<usize> {
        self.fields.get(field).copied()
    }

    fn field_of(&self, index: usize) -> Option<String> {
        self.fields
            .iter()
            .find(|(_, i)| **i == index)
            .map(|(f, _)| f.clone())
    }
}

fn pinned(
    geometry: &TableGeometry,
    index: &ColumnIndex,
    indices: &[usize],
    side: StickySide,
) -> Vec<StickyColumn> {
    let widths = &geometry.column_widths;
    let mut acc = 0;
    indices
        .iter()
        .filter(|i| **i < widths.len())
        .map(|&i| {
            let width = widths[i];
            let column = StickyColumn {
                index: i,
                field: index.field_of(i),
                side,
                offset: acc,
                width,
                x: widths[..i].iter().sum(),
            };
            acc += width;
            column
        })
        .collect()
}

/// Grid column whose placement a cell takes, if any.
fn resolve(
    cell: &CellGeometry,
    start: usize,
    columns: &[Column],
    index: &ColumnIndex,
    plan: &StickyPlan,
) -> Option<usize> {
    if let Some(field) = &cell.field {
        if field.starts_with(classes::GROUP_PREFIX)
            && let Some(group) = find_group(columns, field)
        {
            let leaves = leaf_columns(&group.children);
            let first = leaves.first().and_then(|c| index.field(&c.field));
            let last = leaves.last().and_then(|c| index.field(&c.field));
            return match (first, last) {
                (Some(i), _) if plan.left.iter().any(|c| c.index == i) => Some(i),
                (_, Some(i)) if plan.right.iter().any(|c| c.index == i) => Some(i),
                _ => None,
            };
        }
        return index.field(field);
    }
    if let Some(kind) = cell.utility {
        return index.utilities.get(&kind).copied();
    }
    Some(start)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sticky::geometry::RowGeometry;

    fn cell(id: &str, field: Option<&str>, x: u32, width: u32) -> CellGeometry {
        CellGeometry {
            id: id.to_string(),
            field: field.map(str::to_string),
            utility: None,
            colspan: 1,
            x,
            width,
        }
    }

    fn body_row(id: &str, fields: &[&str], widths: &[u32]) -> RowGeometry {
        let mut x = 0;
        let cells = fields
            .iter()
            .zip(widths)
            .enumerate()
            .map(|(n, (f, w))| {
                let c = cell(&format!("{id}-c{n}"), Some(f), x, *w);
                x += w;
                c
            })
            .collect();
        RowGeometry {
            id: id.to_string(),
            section: Section::Body,
            cells,
            data: true,
        }
    }

    fn geometry(rows: Vec<RowGeometry>, widths: Vec<u32>) -> TableGeometry {
        TableGeometry {
            rows,
            content_width: widths.iter().sum(),
            column_widths: widths,
        }
    }

    #[test]
    fn test_no_sticky_columns_is_empty_plan() {
        let columns = vec![Column::new("a", "A")];
        let plan = compute_sticky(&TableGeometry::default(), &columns, &StickyConfig::default())
            .unwrap();
        assert!(plan.is_empty());
    }

    #[test]
    fn test_left_offsets_accumulate() {
        let columns = vec![
            Column::new("a", "A").sticky(StickySide::Left),
            Column::new("b", "B").sticky(StickySide::Left),
            Column::new("c", "C"),
        ];
        let geo = geometry(
            vec![body_row("r0", &["a", "b", "c"], &[100, 50, 80])],
            vec![100, 50, 80],
        );
        let plan = compute_sticky(&geo, &columns, &StickyConfig::default()).unwrap();

        let offsets: Vec<(usize, u32)> = plan.left.iter().map(|c| (c.index, c.offset)).collect();
        assert_eq!(offsets, vec![(0, 0), (1, 100)]);
        assert_eq!(plan.placements.len(), 2);
        assert_eq!(plan.placement("r0-c1").map(|p| p.z_index), Some(3));
    }

    #[test]
    fn test_right_offsets_from_right_edge() {
        let columns = vec![
            Column::new("a", "A"),
            Column::new("b", "B").sticky(StickySide::Right),
            Column::new("c", "C").sticky(StickySide::Right),
        ];
        let geo = geometry(
            vec![body_row("r0", &["a", "b", "c"], &[100, 50, 80])],
            vec![100, 50, 80],
        );
        let plan = compute_sticky(&geo, &columns, &StickyConfig::default()).unwrap();

        let offsets: Vec<(usize, u32)> = plan.right.iter().map(|c| (c.index, c.offset)).collect();
        assert_eq!(offsets, vec![(2, 0), (1, 80)]);
        assert!(plan.placement("r0-c1").is_some_and(|p| p.background_inherit()));
    }

    #[test]
    fn test_utility_columns_need_manual_left() {
        let mut row = body_row("r0", &["x", "a", "b"], &[40, 100, 50]);
        row.cells[0].field = None;
        row.cells[0].utility = Some(UtilityKind::Checkbox);
        let geo = geometry(vec![row], vec![40, 100, 50]);

        let right_only = vec![Column::new("a", "A"), Column::new("b", "B").sticky(StickySide::Right)];
        let plan = compute_sticky(&geo, &right_only, &StickyConfig::default()).unwrap();
        assert!(plan.left.is_empty());

        let with_left = vec![Column::new("a", "A").sticky(StickySide::Left), Column::new("b", "B")];
        let plan = compute_sticky(&geo, &with_left, &StickyConfig::default()).unwrap();
        let offsets: Vec<(usize, u32)> = plan.left.iter().map(|c| (c.index, c.offset)).collect();
        assert_eq!(offsets, vec![(0, 0), (1, 40)]);
    }

    #[test]
    fn test_group_header_resolves_to_first_leaf() {
        let columns = vec![
            Column::group(
                "Who",
                vec![Column::new("a", "A"), Column::new("b", "B")],
            )
            .sticky(StickySide::Left),
            Column::new("c", "C"),
        ];
        let mut group = cell("h0-c0", Some("group-0"), 0, 150);
        group.colspan = 2;
        let head = RowGeometry {
            id: "h0".to_string(),
            section: Section::Head,
            cells: vec![group, cell("h0-c1", Some("c"), 150, 80)],
            data: true,
        };
        let geo = geometry(
            vec![head, body_row("r0", &["a", "b", "c"], &[100, 50, 80])],
            vec![100, 50, 80],
        );
        let plan = compute_sticky(&geo, &columns, &StickyConfig::default()).unwrap();

        let header = plan.placement("h0-c0").unwrap();
        assert_eq!(header.offset, 0);
        assert_eq!(header.z_index, 4);
        assert!(plan.placement("h0-c1").is_none());
    }

    #[test]
    fn test_detail_rows_are_skipped() {
        let columns = vec![Column::new("a", "A").sticky(StickySide::Left)];
        let mut detail = body_row("r0-detail", &["a"], &[100]);
        detail.cells[0].field = None;
        detail.data = false;
        let geo = geometry(vec![body_row("r0", &["a"], &[100]), detail], vec![100]);
        let plan = compute_sticky(&geo, &columns, &StickyConfig::default()).unwrap();
        assert!(plan.placement("r0-detail-c0").is_none());
    }

    #[test]
    fn test_no_data_rows_aborts() {
        let columns = vec![Column::new("a", "A").sticky(StickySide::Left)];
        let mut empty = body_row("empty", &["a"], &[100]);
        empty.data = false;
        let geo = geometry(vec![empty], vec![100]);
        assert_eq!(
            compute_sticky(&geo, &columns, &StickyConfig::default()).unwrap_err(),
            LayoutError::NoDataRows
        );
    }
}
