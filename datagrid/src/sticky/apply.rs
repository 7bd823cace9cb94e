//! Writing a sticky plan onto the element tree.
//!
//! Every pass starts from a clean tree: [`clear_sticky`] removes whatever a
//! previous pass pinned so that applying the same plan twice is a no-op.

use std::collections::HashMap;

use griddom::{Element, Position, Section, for_each_cell_mut, section_mut};

use datagrid_lib::model::StickySide;

use super::geometry::TableGeometry;
use super::plan::{CellPlacement, StickyPlan};
use crate::classes;

/// Remove sticky positioning and marker classes from every cell.
pub fn clear_sticky(table: &mut Element) {
    for_each_cell_mut(table, |cell| {
        cell.style.clear_position();
        cell.remove_class(classes::STICKY_LEFT);
        cell.remove_class(classes::STICKY_RIGHT);
        cell.remove_class(classes::STICKY_EDGE);
    });
}

/// Pin every cell the plan places. Returns how many cells were pinned.
pub fn apply_plan(table: &mut Element, plan: &StickyPlan) -> usize {
    let placements: HashMap<&str, &CellPlacement> = plan
        .placements
        .iter()
        .map(|p| (p.cell_id.as_str(), p))
        .collect();

    let mut applied = 0;
    for_each_cell_mut(table, |cell| {
        let Some(placement) = placements.get(cell.id.as_str()) else {
            return;
        };
        let style = &mut cell.style;
        style.position = Position::Sticky;
        style.z_index = Some(placement.z_index);
        match placement.side {
            StickySide::Left => {
                style.left = Some(placement.offset);
                cell.add_class(classes::STICKY_LEFT);
            }
            StickySide::Right => {
                style.right = Some(placement.offset);
                style.background_inherit = true;
                cell.add_class(classes::STICKY_RIGHT);
            }
        }
        applied += 1;
    });
    applied
}

/// Copy measured column widths onto the cells of one section.
///
/// A spanning cell gets the sum of the columns it covers. Width and minimum
/// width are both set so the section cannot shrink below the body.
pub fn mirror_widths(table: &mut Element, which: Section, geometry: &TableGeometry) -> usize {
    let widths = &geometry.column_widths;
    let Some(section) = section_mut(table, which) else {
        return 0;
    };

    let mut mirrored = 0;
    for row in section.child_elements_mut() {
        let mut start = 0;
        for cell in row.child_elements_mut().iter_mut().filter(|c| c.tag.is_cell()) {
            let end = (start + cell.colspan.max(1) as usize).min(widths.len());
            if start < end {
                let width = widths[start..end].iter().sum();
                cell.style.width = Some(width);
                cell.style.min_width = Some(width);
                mirrored += 1;
            }
            start = end;
        }
    }
    mirrored
}

pub fn clear_mirrored_widths(table: &mut Element, which: Section) {
    let Some(section) = section_mut(table, which) else {
        return;
    };
    for row in section.child_elements_mut() {
        for cell in row.child_elements_mut() {
            cell.style.clear_width();
        }
    }
}

/// Pin a whole header (top) or footer (bottom) region.
pub fn pin_region(table: &mut Element, which: Section, z_index: i16) -> bool {
    let Some(section) = section_mut(table, which) else {
        return false;
    };
    section.style.position = Position::Sticky;
    section.style.z_index = Some(z_index);
    match which {
        Section::Foot => section.style.bottom = Some(0),
        _ => section.style.top = Some(0),
    }
    true
}

pub fn unpin_region(table: &mut Element, which: Section) {
    if let Some(section) = section_mut(table, which) {
        section.style.clear_position();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use griddom::find_element;

    fn table() -> Element {
        Element::table()
            .child(
                Element::thead().child(
                    Element::tr()
                        .child(Element::th("Who").id("g").colspan(2))
                        .child(Element::th("C").id("hc")),
                ),
            )
            .child(
                Element::tbody().child(
                    Element::tr()
                        .child(Element::td("a").id("a"))
                        .child(Element::td("b").id("b"))
                        .child(Element::td("c").id("c")),
                ),
            )
    }

    fn plan() -> StickyPlan {
        let placement = |id: &str, side, offset| CellPlacement {
            cell_id: id.to_string(),
            section: Section::Body,
            side,
            offset,
            z_index: 3,
            x: 0,
            width: 10,
        };
        StickyPlan {
            placements: vec![
                placement("a", StickySide::Left, 0),
                placement("c", StickySide::Right, 0),
            ],
            ..Default::default()
        }
    }

    #[test]
    fn test_apply_then_clear() {
        let mut table = table();
        assert_eq!(apply_plan(&mut table, &plan()), 2);

        let a = find_element(&table, "a").unwrap();
        assert!(a.style.is_sticky());
        assert_eq!(a.style.left, Some(0));
        assert!(a.has_class(classes::STICKY_LEFT));
        let c = find_element(&table, "c").unwrap();
        assert_eq!(c.style.right, Some(0));
        assert!(c.style.background_inherit);

        clear_sticky(&mut table);
        let a = find_element(&table, "a").unwrap();
        assert!(!a.style.is_sticky());
        assert!(!a.has_class(classes::STICKY_LEFT));
    }

    #[test]
    fn test_reapply_is_idempotent() {
        let mut once = table();
        apply_plan(&mut once, &plan());

        let mut twice = once.clone();
        clear_sticky(&mut twice);
        apply_plan(&mut twice, &plan());

        assert_eq!(once, twice);
    }

    #[test]
    fn test_mirror_widths_sums_colspan() {
        let mut table = table();
        let geometry = TableGeometry {
            column_widths: vec![30, 40, 50],
            ..Default::default()
        };
        assert_eq!(mirror_widths(&mut table, Section::Head, &geometry), 2);

        let group = find_element(&table, "g").unwrap();
        assert_eq!(group.style.width, Some(70));
        assert_eq!(group.style.min_width, Some(70));
        assert_eq!(find_element(&table, "hc").unwrap().style.width, Some(50));

        clear_mirrored_widths(&mut table, Section::Head);
        assert_eq!(find_element(&table, "g").unwrap().style.width, None);
    }

    #[test]
    fn test_pin_region() {
        let mut table = table();
        assert!(pin_region(&mut table, Section::Head, 5));
        assert!(!pin_region(&mut table, Section::Foot, 5));

        let head = section_mut(&mut table, Section::Head).unwrap();
        assert_eq!(head.style.top, Some(0));
        assert_eq!(head.style.z_index, Some(5));

        unpin_region(&mut table, Section::Head);
        assert!(!section_mut(&mut table, Section::Head).unwrap().style.is_sticky());
    }
}
