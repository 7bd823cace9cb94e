//! Identity-keyed row selection

use crate::model::{Row, RowId};

/// Outcome of a selection mutation.
///
/// `rows` is the selection the mutation asks for, in selection order. When
/// the selection is controlled it has not been applied locally.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectionChange {
    pub added: Vec<RowId>,
    pub removed: Vec<RowId>,
    pub rows: Vec<Row>,
}

impl SelectionChange {
    /// Whether the mutation changed membership at all.
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

/// Selected rows, kept in the order they were selected.
///
/// Rows are stored alongside their identity so the host can be handed the
/// full selected rows, not just keys.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    entries: Vec<(RowId, Row)>,
    controlled: bool,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Selection driven by the host. Local mutations only request changes.
    pub fn controlled(entries: Vec<(RowId, Row)>) -> Self {
        Self {
            entries,
            controlled: true,
        }
    }

    pub fn is_controlled(&self) -> bool {
        self.controlled
    }

    /// Overwrite with the host's selection and mark it controlled.
    pub fn set_external(&mut self, entries: Vec<(RowId, Row)>) {
        self.entries = entries;
        self.controlled = true;
    }

    /// Hand ownership back to the table. The current selection is kept.
    pub fn release(&mut self) {
        self.controlled = false;
    }

    pub fn ids(&self) -> Vec<RowId> {
        self.entries.iter().map(|(id, _)| id.clone()).collect()
    }

    pub fn rows(&self) -> Vec<Row> {
        self.entries.iter().map(|(_, row)| row.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_selected(&self, id: &RowId) -> bool {
        self.entries.iter().any(|(selected, _)| selected == id)
    }

    /// Flip membership of one row.
    pub fn toggle(&mut self, id: RowId, row: &Row) -> SelectionChange {
        if self.is_selected(&id) {
            self.deselect(&id)
        } else {
            self.select(id, row)
        }
    }

    /// Add a row. Selecting an already selected row changes nothing.
    pub fn select(&mut self, id: RowId, row: &Row) -> SelectionChange {
        if self.is_selected(&id) {
            return SelectionChange {
                rows: self.rows(),
                ..Default::default()
            };
        }
        let mut next = self.entries.clone();
        next.push((id.clone(), row.clone()));
        self.commit(next, vec![id], vec![])
    }

    /// Remove a row. Deselecting an unselected row changes nothing.
    pub fn deselect(&mut self, id: &RowId) -> SelectionChange {
        if !self.is_selected(id) {
            return SelectionChange {
                rows: self.rows(),
                ..Default::default()
            };
        }
        let next = self
            .entries
            .iter()
            .filter(|(selected, _)| selected != id)
            .cloned()
            .collect();
        self.commit(next, vec![], vec![id.clone()])
    }

    /// Replace the selection with exactly `visible`.
    pub fn select_all(&mut self, visible: Vec<(RowId, Row)>) -> SelectionChange {
        let added = visible
            .iter()
            .filter(|(id, _)| !self.is_selected(id))
            .map(|(id, _)| id.clone())
            .collect();
        let removed = self
            .entries
            .iter()
            .filter(|(id, _)| !visible.iter().any(|(v, _)| v == id))
            .map(|(id, _)| id.clone())
            .collect();
        self.commit(visible, added, removed)
    }

    /// Remove everything.
    pub fn clear(&mut self) -> SelectionChange {
        let removed = self.ids();
        self.commit(Vec::new(), vec![], removed)
    }

    /// True when there is at least one visible row and the selection holds
    /// as many rows as are visible.
    pub fn is_all_selected(&self, visible_count: usize) -> bool {
        visible_count > 0 && self.entries.len() == visible_count
    }

    /// True when the selection is non-empty, not all selected, and at least
    /// one of `visible` is selected.
    pub fn is_some_selected(&self, visible: &[RowId]) -> bool {
        if visible.is_empty() || self.entries.is_empty() {
            return false;
        }
        !self.is_all_selected(visible.len()) && visible.iter().any(|id| self.is_selected(id))
    }

    fn commit(
        &mut self,
        next: Vec<(RowId, Row)>,
        added: Vec<RowId>,
        removed: Vec<RowId>,
    ) -> SelectionChange {
        let rows = next.iter().map(|(_, row)| row.clone()).collect();
        if !self.controlled {
            self.entries = next;
        }
        SelectionChange {
            added,
            removed,
            rows,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(id: i64) -> (RowId, Row) {
        (RowId::Int(id), Row::new().set("id", id))
    }

    fn rows(ids: &[i64]) -> Vec<(RowId, Row)> {
        ids.iter().map(|id| row(*id)).collect()
    }

    #[test]
    fn test_toggle_is_its_own_inverse() {
        let mut selection = Selection::new();
        let (id, r) = row(1);

        let change = selection.toggle(id.clone(), &r);
        assert_eq!(change.added, vec![id.clone()]);
        assert!(selection.is_selected(&id));

        let change = selection.toggle(id.clone(), &r);
        assert_eq!(change.removed, vec![id.clone()]);
        assert!(selection.is_empty());
    }

    #[test]
    fn test_select_is_idempotent() {
        let mut selection = Selection::new();
        let (id, r) = row(1);
        selection.select(id.clone(), &r);
        let change = selection.select(id, &r);
        assert!(change.is_empty());
        assert_eq!(selection.len(), 1);
    }

    #[test]
    fn test_deselect_unselected_is_noop() {
        let mut selection = Selection::new();
        let change = selection.deselect(&RowId::Int(9));
        assert!(change.is_empty());
    }

    #[test]
    fn test_select_all_then_deselect() {
        let mut selection = Selection::new();
        let visible = rows(&[1, 2, 3]);
        selection.select_all(visible.clone());
        assert!(selection.is_all_selected(visible.len()));

        selection.deselect(&RowId::Int(2));
        assert!(!selection.is_all_selected(visible.len()));
        let ids: Vec<RowId> = visible.iter().map(|(id, _)| id.clone()).collect();
        assert!(selection.is_some_selected(&ids));
    }

    #[test]
    fn test_select_all_reports_added_and_removed() {
        let mut selection = Selection::new();
        selection.select_all(rows(&[1, 2]));
        let change = selection.select_all(rows(&[2, 3]));
        assert_eq!(change.added, vec![RowId::Int(3)]);
        assert_eq!(change.removed, vec![RowId::Int(1)]);
        assert_eq!(selection.ids(), vec![RowId::Int(2), RowId::Int(3)]);
    }

    #[test]
    fn test_all_selected_requires_visible_rows() {
        let selection = Selection::new();
        assert!(!selection.is_all_selected(0));
        assert!(!selection.is_some_selected(&[]));
    }

    #[test]
    fn test_some_selected_needs_visible_match() {
        let mut selection = Selection::new();
        let (id, r) = row(7);
        selection.select(id, &r);
        assert!(!selection.is_some_selected(&[RowId::Int(1), RowId::Int(2)]));
    }

    #[test]
    fn test_controlled_mutation_only_requests() {
        let mut selection = Selection::controlled(rows(&[1]));
        let (id, r) = row(2);
        let change = selection.select(id.clone(), &r);

        assert_eq!(change.rows.len(), 2);
        assert!(!selection.is_selected(&id));
        assert_eq!(selection.len(), 1);
    }

    #[test]
    fn test_external_update_overwrites() {
        let mut selection = Selection::new();
        selection.select_all(rows(&[1, 2, 3]));
        selection.set_external(rows(&[5]));
        assert!(selection.is_controlled());
        assert_eq!(selection.ids(), vec![RowId::Int(5)]);
    }

    #[test]
    fn test_clear() {
        let mut selection = Selection::new();
        selection.select_all(rows(&[1, 2]));
        let change = selection.clear();
        assert_eq!(change.removed.len(), 2);
        assert!(change.rows.is_empty());
        assert!(selection.is_empty());
    }
}
