use super::{LayoutMetrics, LayoutResult, Rect};
use crate::element::{Content, Element, section};
use crate::text::display_width;
use crate::types::{Section, Tag};

const SECTIONS: [Section; 3] = [Section::Head, Section::Body, Section::Foot];

/// Lay out a `table` element within `viewport`.
///
/// Column widths follow the auto table algorithm: each column is as wide as
/// its widest single-span cell, spanning cells widen the columns they cover
/// when they do not fit, and a table with a resolvable width stretches its
/// flexible columns to fill it. Rects are relative to the table origin.
pub fn layout_table(table: &Element, viewport: Rect, metrics: &LayoutMetrics) -> LayoutResult {
    let mut result = LayoutResult::default();
    let rows: Vec<&Element> = SECTIONS
        .iter()
        .filter_map(|s| section(table, *s))
        .flat_map(|s| s.child_elements().iter().filter(|r| r.tag == Tag::Row))
        .collect();

    let column_count = rows.iter().map(|row| span_total(row)).max().unwrap_or(0);
    let widths = column_widths(table, &rows, column_count, viewport.width, metrics);

    let mut offsets = Vec::with_capacity(column_count + 1);
    let mut acc = 0;
    offsets.push(0);
    for width in &widths {
        acc += width;
        offsets.push(acc);
    }
    let content_width = acc;

    let mut y = 0;
    for which in SECTIONS {
        let Some(section_el) = section(table, which) else {
            continue;
        };
        let section_top = y;
        for row in section_el.child_elements().iter().filter(|r| r.tag == Tag::Row) {
            result.insert(&row.id, Rect::new(0, y, content_width, metrics.row_height));
            let mut start = 0;
            for cell in cells(row) {
                let end = (start + span(cell)).min(column_count);
                let rect = Rect::new(
                    offsets[start],
                    y,
                    offsets[end] - offsets[start],
                    metrics.row_height,
                );
                result.insert(&cell.id, rect);
                start = end;
            }
            y += metrics.row_height;
        }
        result.insert(
            &section_el.id,
            Rect::new(0, section_top, content_width, y - section_top),
        );
    }

    result.insert(&table.id, Rect::new(0, 0, content_width, y));
    result.content_width = content_width;
    result.content_height = y;
    result.column_widths = widths;

    log::trace!(
        "[layout] table {} -> {} columns, {}x{}",
        table.id,
        column_count,
        content_width,
        y
    );

    result
}

fn column_widths(
    table: &Element,
    rows: &[&Element],
    column_count: usize,
    available: u32,
    metrics: &LayoutMetrics,
) -> Vec<u32> {
    let mut widths = vec![0u32; column_count];
    let mut fixed = vec![false; column_count];

    // Single-span cells decide the base width
    for row in rows {
        let mut start = 0;
        for cell in cells(row) {
            if span(cell) == 1 && start < column_count {
                let (preferred, is_fixed) = preferred_width(cell, available, metrics);
                widths[start] = widths[start].max(preferred);
                fixed[start] |= is_fixed;
            }
            start += span(cell);
        }
    }

    // Spanning cells widen what they cover
    for row in rows {
        let mut start = 0;
        for cell in cells(row) {
            let end = (start + span(cell)).min(column_count);
            if end - start > 1 {
                let (preferred, _) = preferred_width(cell, available, metrics);
                let covered: u32 = widths[start..end].iter().sum();
                if preferred > covered {
                    let indices: Vec<usize> = (start..end).collect();
                    distribute(&mut widths, &indices, preferred - covered);
                }
            }
            start = end;
        }
    }

    // Stretch flexible columns to the table width
    if let Some(target) = table.width.resolve(available) {
        let total: u32 = widths.iter().sum();
        if target > total && column_count > 0 {
            let mut indices: Vec<usize> = (0..column_count).filter(|i| !fixed[*i]).collect();
            if indices.is_empty() {
                indices = (0..column_count).collect();
            }
            distribute(&mut widths, &indices, target - total);
        }
    }

    widths
}

/// Spread `extra` evenly over `indices`; the last index takes the remainder.
fn distribute(widths: &mut [u32], indices: &[usize], extra: u32) {
    let Some(&last) = indices.last() else {
        return;
    };
    let share = extra / indices.len() as u32;
    for &i in indices {
        widths[i] += share;
    }
    widths[last] += extra - share * indices.len() as u32;
}

fn preferred_width(cell: &Element, available: u32, metrics: &LayoutMetrics) -> (u32, bool) {
    let min = cell
        .min_width
        .into_iter()
        .chain(cell.style.min_width)
        .max()
        .unwrap_or(0);

    if let Some(width) = cell.style.width {
        return (width.max(min), true);
    }

    let (base, fixed) = match cell.width.resolve(available) {
        Some(px) => (px, true),
        None => (
            content_width(cell) * metrics.char_width + 2 * metrics.cell_padding,
            false,
        ),
    };
    (base.max(min), fixed)
}

fn content_width(element: &Element) -> u32 {
    match &element.content {
        Content::None => 0,
        Content::Text(text) => text
            .lines()
            .map(|line| display_width(line) as u32)
            .max()
            .unwrap_or(0),
        Content::Children(children) => children.iter().map(content_width).max().unwrap_or(0),
    }
}

fn cells(row: &Element) -> impl Iterator<Item = &Element> {
    row.child_elements().iter().filter(|c| c.tag.is_cell())
}

fn span(cell: &Element) -> usize {
    cell.colspan.max(1) as usize
}

fn span_total(row: &Element) -> usize {
    cells(row).map(span).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Size;

    #[test]
    fn test_distribute_remainder_goes_last() {
        let mut widths = vec![10, 10, 10];
        distribute(&mut widths, &[0, 1, 2], 10);
        assert_eq!(widths, vec![13, 13, 14]);
    }

    #[test]
    fn test_preferred_width_from_text() {
        let metrics = LayoutMetrics::default();
        let cell = Element::td("abcd");
        assert_eq!(preferred_width(&cell, 1000, &metrics), (4 * 8 + 24, false));
    }

    #[test]
    fn test_inline_width_wins() {
        let metrics = LayoutMetrics::default();
        let mut cell = Element::td("a very long text").width(Size::Fixed(50));
        cell.style.width = Some(70);
        assert_eq!(preferred_width(&cell, 1000, &metrics), (70, true));
    }
}
