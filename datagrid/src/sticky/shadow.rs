//! Scroll boundary shadows and edge elevation.

use std::collections::HashSet;

use datagrid_lib::model::StickySide;
use griddom::{Element, ScrollMetrics, for_each_cell_mut};

use super::plan::{CellPlacement, StickyPlan};
use crate::classes;
use crate::config::ZLayers;

/// Which scroll boundaries currently hide content.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Shadows {
    pub left: bool,
    pub right: bool,
}

impl Shadows {
    pub fn from_metrics(metrics: &ScrollMetrics) -> Self {
        Self {
            left: metrics.scroll_left > 0,
            right: metrics.remaining_right() > 1,
        }
    }
}

/// Whether a pinned cell has left its natural position and now sits on the
/// viewport edge.
pub fn is_at_edge(placement: &CellPlacement, metrics: &ScrollMetrics) -> bool {
    match placement.side {
        StickySide::Left => placement.x < metrics.scroll_left + placement.offset,
        StickySide::Right => {
            placement.x + placement.width + placement.offset
                > metrics.scroll_left + metrics.client_width
        }
    }
}

/// Raise pinned cells on the edge above their neighbours and lower the
/// rest back to their base layer. Returns the number of elevated cells.
pub fn elevate_edges(
    table: &mut Element,
    plan: &StickyPlan,
    metrics: &ScrollMetrics,
    z: &ZLayers,
) -> usize {
    let edge: HashSet<&str> = plan
        .placements
        .iter()
        .filter(|p| is_at_edge(p, metrics))
        .map(|p| p.cell_id.as_str())
        .collect();
    set_layers(table, plan, |p| edge.contains(p.cell_id.as_str()), z.elevation);
    edge.len()
}

/// Return every pinned cell to its base layer.
pub fn settle_edges(table: &mut Element, plan: &StickyPlan) {
    set_layers(table, plan, |_| false, 0);
}

fn set_layers(
    table: &mut Element,
    plan: &StickyPlan,
    elevated: impl Fn(&CellPlacement) -> bool,
    bump: i16,
) {
    for_each_cell_mut(table, |cell| {
        let Some(placement) = plan.placement(&cell.id) else {
            return;
        };
        if elevated(placement) {
            cell.style.z_index = Some(placement.z_index + bump);
            cell.add_class(classes::STICKY_EDGE);
        } else {
            cell.style.z_index = Some(placement.z_index);
            cell.remove_class(classes::STICKY_EDGE);
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use griddom::{Section, find_element};

    fn metrics(scroll_left: u32) -> ScrollMetrics {
        ScrollMetrics {
            scroll_left,
            scroll_width: 500,
            client_width: 200,
        }
    }

    fn placement(id: &str, side: StickySide, x: u32, offset: u32) -> CellPlacement {
        CellPlacement {
            cell_id: id.to_string(),
            section: Section::Body,
            side,
            offset,
            z_index: 3,
            x,
            width: 50,
        }
    }

    #[test]
    fn test_shadows() {
        assert_eq!(
            Shadows::from_metrics(&metrics(0)),
            Shadows {
                left: false,
                right: true
            }
        );
        assert_eq!(
            Shadows::from_metrics(&metrics(150)),
            Shadows {
                left: true,
                right: true
            }
        );
        // One pixel of slack on the right
        assert_eq!(
            Shadows::from_metrics(&metrics(299)),
            Shadows {
                left: true,
                right: false
            }
        );
    }

    #[test]
    fn test_left_edge() {
        let cell = placement("a", StickySide::Left, 50, 0);
        assert!(!is_at_edge(&cell, &metrics(0)));
        assert!(!is_at_edge(&cell, &metrics(50)));
        assert!(is_at_edge(&cell, &metrics(51)));
    }

    #[test]
    fn test_right_edge() {
        // Natural right edge at 500, viewport right at scroll_left + 200
        let cell = placement("z", StickySide::Right, 450, 0);
        assert!(is_at_edge(&cell, &metrics(0)));
        assert!(!is_at_edge(&cell, &metrics(300)));
    }

    #[test]
    fn test_elevate_and_settle() {
        let mut table = Element::table().child(
            Element::tbody().child(
                Element::tr()
                    .child(Element::td("a").id("a"))
                    .child(Element::td("b").id("b")),
            ),
        );
        let plan = StickyPlan {
            placements: vec![
                placement("a", StickySide::Left, 0, 0),
                placement("b", StickySide::Left, 50, 50),
            ],
            ..Default::default()
        };

        let elevated = elevate_edges(&mut table, &plan, &metrics(20), &ZLayers::default());
        assert_eq!(elevated, 1);
        let a = find_element(&table, "a").unwrap();
        assert_eq!(a.style.z_index, Some(5));
        assert!(a.has_class(classes::STICKY_EDGE));
        assert_eq!(find_element(&table, "b").unwrap().style.z_index, Some(3));

        settle_edges(&mut table, &plan);
        let a = find_element(&table, "a").unwrap();
        assert_eq!(a.style.z_index, Some(3));
        assert!(!a.has_class(classes::STICKY_EDGE));
    }
}
