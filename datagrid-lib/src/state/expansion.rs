//! Identity-keyed row expansion

use std::collections::HashMap;

use crate::model::RowId;

/// Outcome of toggling one row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpansionChange {
    pub row_id: RowId,
    /// New state of `row_id`.
    pub expanded: bool,
    /// Expanded set the mutation asks for.
    pub ids: Vec<RowId>,
}

/// Expanded row identities, with optional accordion mode and per-row loading
/// flags for detail content fetched asynchronously by the host.
#[derive(Debug, Clone, Default)]
pub struct Expansion {
    expanded: Vec<RowId>,
    accordion: bool,
    controlled: bool,
    loading: HashMap<RowId, bool>,
}

impl Expansion {
    pub fn new() -> Self {
        Self::default()
    }

    /// At most one row expanded at a time.
    pub fn with_accordion(mut self, accordion: bool) -> Self {
        self.accordion = accordion;
        self
    }

    pub fn set_accordion(&mut self, accordion: bool) {
        self.accordion = accordion;
    }

    pub fn is_accordion(&self) -> bool {
        self.accordion
    }

    pub fn is_controlled(&self) -> bool {
        self.controlled
    }

    /// Overwrite with the host's expanded set and mark it controlled.
    pub fn set_external(&mut self, ids: Vec<RowId>) {
        self.expanded = ids;
        self.controlled = true;
    }

    pub fn release(&mut self) {
        self.controlled = false;
    }

    pub fn ids(&self) -> &[RowId] {
        &self.expanded
    }

    pub fn is_expanded(&self, id: &RowId) -> bool {
        self.expanded.contains(id)
    }

    /// Flip one row. Expanding under accordion mode collapses every other
    /// row.
    pub fn toggle(&mut self, id: RowId) -> ExpansionChange {
        let expanded = !self.is_expanded(&id);
        let next = if expanded {
            if self.accordion {
                vec![id.clone()]
            } else {
                let mut next = self.expanded.clone();
                next.push(id.clone());
                next
            }
        } else {
            self.expanded
                .iter()
                .filter(|current| **current != id)
                .cloned()
                .collect()
        };
        self.commit(next.clone());
        ExpansionChange {
            row_id: id,
            expanded,
            ids: next,
        }
    }

    /// Expand a collapsed row. `None` when already expanded.
    pub fn expand(&mut self, id: RowId) -> Option<ExpansionChange> {
        (!self.is_expanded(&id)).then(|| self.toggle(id))
    }

    /// Collapse an expanded row. `None` when already collapsed.
    pub fn collapse(&mut self, id: RowId) -> Option<ExpansionChange> {
        self.is_expanded(&id).then(|| self.toggle(id))
    }

    /// Collapse everything. Returns the ids that were expanded.
    pub fn collapse_all(&mut self) -> Vec<RowId> {
        let previous = self.expanded.clone();
        self.commit(Vec::new());
        previous
    }

    pub fn set_loading(&mut self, id: RowId, loading: bool) {
        self.loading.insert(id, loading);
    }

    pub fn is_loading(&self, id: &RowId) -> bool {
        self.loading.get(id).copied().unwrap_or(false)
    }

    fn commit(&mut self, next: Vec<RowId>) {
        if !self.controlled {
            self.expanded = next;
        }
    }
}
