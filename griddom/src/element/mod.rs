mod content;
mod node;

pub use content::Content;
pub use node::{Element, FIELD_ATTR};

use crate::types::{Section, Tag};

/// Find an element by ID in the tree.
pub fn find_element<'a>(root: &'a Element, id: &str) -> Option<&'a Element> {
    if root.id == id {
        return Some(root);
    }

    for child in root.child_elements() {
        if let Some(found) = find_element(child, id) {
            return Some(found);
        }
    }

    None
}

pub fn find_element_mut<'a>(root: &'a mut Element, id: &str) -> Option<&'a mut Element> {
    if root.id == id {
        return Some(root);
    }

    for child in root.child_elements_mut() {
        if let Some(found) = find_element_mut(child, id) {
            return Some(found);
        }
    }

    None
}

/// The first `thead`/`tbody`/`tfoot` child of a table.
pub fn section(table: &Element, section: Section) -> Option<&Element> {
    table
        .child_elements()
        .iter()
        .find(|child| child.tag == section.tag())
}

pub fn section_mut(table: &mut Element, section: Section) -> Option<&mut Element> {
    table
        .child_elements_mut()
        .iter_mut()
        .find(|child| child.tag == section.tag())
}

/// Rows of one table section, in document order.
pub fn rows(table: &Element, which: Section) -> impl Iterator<Item = &Element> {
    section(table, which)
        .map(|s| s.child_elements())
        .unwrap_or_default()
        .iter()
        .filter(|row| row.tag == Tag::Row)
}

/// Every row of the table with the section it belongs to: head, body, then foot.
pub fn all_rows(table: &Element) -> Vec<(Section, &Element)> {
    [Section::Head, Section::Body, Section::Foot]
        .into_iter()
        .flat_map(|which| rows(table, which).map(move |row| (which, row)))
        .collect()
}

/// Apply `f` to every cell in every row.
pub fn for_each_cell_mut(table: &mut Element, mut f: impl FnMut(&mut Element)) {
    for section in table.child_elements_mut() {
        if section.tag.section().is_none() {
            continue;
        }
        for row in section.child_elements_mut() {
            for cell in row.child_elements_mut() {
                if cell.tag.is_cell() {
                    f(cell);
                }
            }
        }
    }
}
