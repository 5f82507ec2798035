//! Filter and sort pipeline for the document list
//!
//! The canonical list held by the store is never reordered in place. Every
//! render derives a fresh view: filter by category first, then sort newest
//! first. Deriving rather than mutating keeps the pipeline idempotent, so
//! re-rendering an unchanged list yields an identical view.

use crate::app::category::CategoryFilter;
use crate::app::models::Document;

/// Derive the display view of a document list
///
/// Filters by the given category, then sorts by upload timestamp descending.
/// The sort is stable, so documents sharing a timestamp keep their fetched
/// order. The input slice is left untouched.
pub fn view(documents: &[Document], filter: &CategoryFilter) -> Vec<Document> {
    let mut visible: Vec<Document> = documents
        .iter()
        .filter(|doc| filter.matches(&doc.file_name))
        .cloned()
        .collect();
    visible.sort_by(|a, b| b.uploaded_at.cmp(&a.uploaded_at));
    visible
}
