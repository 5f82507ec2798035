//! Multi-select state over the visible document list
//!
//! Selection is a set of document ids with no inherent order. It survives
//! filter changes; ids hidden by the current filter stay selected and are
//! still acted on by bulk operations. After each list refresh the set is
//! pruned so it never references a document the server no longer has.

use std::collections::HashSet;

use crate::app::models::{Document, DocumentId};

/// Set of selected document ids
#[derive(Debug, Clone, Default)]
pub struct SelectionSet {
    ids: HashSet<DocumentId>,
}

impl SelectionSet {
    /// An empty selection
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or remove a single id
    pub fn toggle(&mut self, id: DocumentId, included: bool) {
        if included {
            self.ids.insert(id);
        } else {
            self.ids.remove(&id);
        }
    }

    /// Toggle against the visible list
    ///
    /// If every visible id is already selected, clears the selection;
    /// otherwise the selection becomes exactly the visible ids. The
    /// replacement drops any previously selected ids that are not in
    /// `visible`, which makes a double toggle return to empty.
    pub fn select_all(&mut self, visible: &[DocumentId]) {
        let all_selected = visible.iter().all(|id| self.ids.contains(id));
        if all_selected {
            self.ids.clear();
        } else {
            self.ids = visible.iter().cloned().collect();
        }
    }

    /// Drop ids not present in the given document list
    pub fn prune(&mut self, documents: &[Document]) {
        let live: HashSet<&DocumentId> = documents.iter().map(|d| &d.id).collect();
        self.ids.retain(|id| live.contains(id));
    }

    /// Whether the id is selected
    pub fn contains(&self, id: &DocumentId) -> bool {
        self.ids.contains(id)
    }

    /// Number of selected ids
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Whether nothing is selected
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Remove everything
    pub fn clear(&mut self) {
        self.ids.clear();
    }

    /// Iterate over the selected ids in arbitrary order
    pub fn iter(&self) -> impl Iterator<Item = &DocumentId> {
        self.ids.iter()
    }

    /// Whether bulk action controls should be offered
    pub fn bulk_actions_visible(&self) -> bool {
        !self.ids.is_empty()
    }
}
