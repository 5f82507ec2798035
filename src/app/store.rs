//! Document store: single-owner application state
//!
//! The store owns the canonical document list, the selection, the category
//! filter, and the transient upload session, and it mediates every mutation
//! through [`DocumentsClient`]. It is designed for single ownership: all
//! methods take `&mut self` and there is no interior locking. The one piece
//! of shared state is the displayed upload percentage, which lives in an
//! atomic cell because the progress simulator task writes it concurrently.
//!
//! The server stays the source of truth. Mutations never patch the local
//! list; they re-fetch it after the server confirms the change.

use std::path::PathBuf;
use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::app::bulk;
use crate::app::category::CategoryFilter;
use crate::app::client::{DocumentsClient, EmptyReason, ListingOutcome};
use crate::app::models::{CandidateFile, Document, DocumentId, Notice, PatientId, UploadPhase, UploadSession};
use crate::app::progress::{DisplayedPercent, ProgressSink, SimulatedProgress};
use crate::app::selection::SelectionSet;
use crate::app::view;
use crate::constants::progress;
use crate::errors::{BulkDeleteError, DeleteError, UploadError, UploadResult};

/// Callback invoked whenever observable store state changes
pub type ChangeListener = Box<dyn Fn() + Send + Sync>;

/// Application state and mutation controller
pub struct DocumentStore {
    client: Arc<DocumentsClient>,
    patient_id: Option<PatientId>,
    documents: Vec<Document>,
    selection: SelectionSet,
    filter: CategoryFilter,
    session: UploadSession,
    displayed: Arc<DisplayedPercent>,
    notice: Option<Notice>,
    listener: Option<ChangeListener>,
    /// Status and detail of the last degraded listing, kept for diagnostics
    last_degradation: Option<(u16, String)>,
    /// Why the last listing came back empty, if it did
    empty_reason: Option<EmptyReason>,
}

impl DocumentStore {
    /// Create a store for the given patient scope
    pub fn new(client: Arc<DocumentsClient>, patient_id: Option<PatientId>) -> Self {
        Self {
            client,
            patient_id,
            documents: Vec::new(),
            selection: SelectionSet::new(),
            filter: CategoryFilter::All,
            session: UploadSession::idle(),
            displayed: Arc::new(DisplayedPercent::new()),
            notice: None,
            listener: None,
            last_degradation: None,
            empty_reason: None,
        }
    }

    /// Register the change listener; replaces any previous one
    pub fn set_listener(&mut self, listener: ChangeListener) {
        self.listener = Some(listener);
    }

    fn notify_changed(&self) {
        if let Some(listener) = &self.listener {
            listener();
        }
    }

    /// The patient the store is scoped to
    pub fn patient_id(&self) -> Option<&PatientId> {
        self.patient_id.as_ref()
    }

    /// Re-fetch the document list from the server
    ///
    /// On a successful listing the canonical list is wholly replaced and the
    /// selection pruned. A degraded listing clears the list too: an empty
    /// panel is preferred over a stale one, and the status is recorded for
    /// diagnostics.
    pub async fn refresh(&mut self) {
        match self.client.fetch_documents(self.patient_id.as_ref()).await {
            ListingOutcome::Listed(documents) => {
                debug!(count = documents.len(), "Refreshed document list");
                self.documents = documents;
                self.selection.prune(&self.documents);
                self.last_degradation = None;
                self.empty_reason = None;
            }
            ListingOutcome::Empty(reason) => {
                debug!(?reason, "Listing came back empty");
                self.documents.clear();
                self.selection.clear();
                self.last_degradation = None;
                self.empty_reason = Some(reason);
            }
            ListingOutcome::Degraded { status, detail } => {
                warn!(status, detail = %detail, "Clearing document list after degraded refresh");
                self.documents.clear();
                self.selection.clear();
                self.empty_reason = None;
                self.last_degradation = Some((status, detail));
            }
        }
        self.notify_changed();
    }

    /// The filtered, newest-first view of the document list
    pub fn visible(&self) -> Vec<Document> {
        view::view(&self.documents, &self.filter)
    }

    /// The full unfiltered list
    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    /// Why the last listing was empty, if it was
    pub fn empty_reason(&self) -> Option<EmptyReason> {
        self.empty_reason
    }

    /// Status and detail of the last degraded listing, if any
    pub fn last_degradation(&self) -> Option<&(u16, String)> {
        self.last_degradation.as_ref()
    }

    /// Current category filter
    pub fn filter(&self) -> &CategoryFilter {
        &self.filter
    }

    /// Change the category filter
    ///
    /// The selection is untouched: ids hidden by the new filter stay
    /// selected and bulk operations still act on them.
    pub fn set_filter(&mut self, filter: CategoryFilter) {
        self.filter = filter;
        self.notify_changed();
    }

    /// Selection accessor
    pub fn selection(&self) -> &SelectionSet {
        &self.selection
    }

    /// Add or remove a document from the selection
    pub fn toggle_selected(&mut self, id: DocumentId, included: bool) {
        self.selection.toggle(id, included);
        self.notify_changed();
    }

    /// Toggle select-all against the currently visible documents
    pub fn select_all_visible(&mut self) {
        let visible_ids: Vec<DocumentId> =
            self.visible().into_iter().map(|d| d.id).collect();
        self.selection.select_all(&visible_ids);
        self.notify_changed();
    }

    /// Handle to the displayed upload percentage
    ///
    /// Shared with whatever renders the progress display; safe to poll from
    /// another task while an upload is in flight.
    pub fn display_percent(&self) -> Arc<DisplayedPercent> {
        Arc::clone(&self.displayed)
    }

    /// Current upload session state
    pub fn session(&self) -> &UploadSession {
        &self.session
    }

    /// Current notice, if one is showing
    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    /// Dismiss the current notice
    pub fn dismiss_notice(&mut self) {
        self.notice = None;
        self.notify_changed();
    }

    fn show_notice(&mut self, notice: Notice) {
        self.notice = Some(notice);
    }

    /// Upload a file for the bound patient
    ///
    /// Runs the full orchestration: pre-flight validation, the simulated
    /// progress display, the transfer itself, and the post-success list
    /// refresh. Only one upload may be in flight at a time.
    ///
    /// # Errors
    ///
    /// Returns [`UploadError::SessionActive`] if an upload is already
    /// running, [`UploadError::MissingPatient`] when no patient is bound,
    /// [`UploadError::Invalid`] when validation fails (no network call is
    /// made), and the transfer errors otherwise.
    pub async fn upload(&mut self, file: CandidateFile) -> UploadResult<DocumentId> {
        if self.session.is_active() {
            return Err(UploadError::SessionActive);
        }
        let Some(patient_id) = self.patient_id.clone() else {
            return Err(UploadError::MissingPatient);
        };

        self.session = UploadSession::begin(&file);
        self.displayed.reset();
        self.notify_changed();

        let violations = file.validate();
        if !violations.is_empty() {
            let error = UploadError::Invalid(violations);
            warn!(file_name = %file.file_name, "Upload rejected by validation: {error}");
            self.session.phase = UploadPhase::Failed;
            self.show_notice(Notice::error(error.to_string()));
            self.notify_changed();
            return Err(error);
        }

        info!(file_name = %file.file_name, size_bytes = file.size_bytes(), "Starting upload");
        self.session.phase = UploadPhase::Uploading;
        self.notify_changed();

        let simulator =
            SimulatedProgress::start(Arc::clone(&self.displayed) as Arc<dyn ProgressSink>);
        let result = self.client.upload_document(&patient_id, &file).await;
        // Simulator must stop before any terminal display state is written
        simulator.stop();

        match result {
            Ok(id) => {
                self.displayed.force(100);
                self.session.phase = UploadPhase::Finalizing;
                self.notify_changed();
                tokio::time::sleep(progress::SUCCESS_HOLD).await;

                self.session.phase = UploadPhase::Succeeded;
                self.session.clear_display();
                self.displayed.reset();
                self.notify_changed();

                // Give the backend a moment to commit before re-listing
                tokio::time::sleep(progress::REFRESH_SETTLE).await;
                self.refresh().await;

                info!(document_id = %id, "Upload finished");
                self.show_notice(Notice::success(format!("Uploaded {}", file.file_name)));
                self.notify_changed();
                Ok(id)
            }
            Err(e) => {
                warn!(file_name = %file.file_name, "Upload failed: {e}");
                self.displayed.reset();
                self.session.phase = UploadPhase::Failed;
                self.show_notice(Notice::error(e.to_string()));
                self.notify_changed();
                Err(e)
            }
        }
    }

    /// Delete a single document and refresh the list
    pub async fn delete(&mut self, id: &DocumentId) -> Result<(), DeleteError> {
        match self.client.delete_document(id).await {
            Ok(()) => {
                self.selection.toggle(id.clone(), false);
                self.refresh().await;
                self.show_notice(Notice::success("Document deleted"));
                self.notify_changed();
                Ok(())
            }
            Err(e) => {
                self.show_notice(Notice::error(e.to_string()));
                self.notify_changed();
                Err(e)
            }
        }
    }

    /// Delete every selected document sequentially
    ///
    /// Aborts at the first failure; documents deleted before the failure
    /// stay deleted on the server and the list is not refreshed until the
    /// user retries, so the error notice is read against the stale list.
    pub async fn bulk_delete_selected(&mut self) -> Result<usize, BulkDeleteError> {
        let ids: Vec<DocumentId> = self.selection.iter().cloned().collect();
        if ids.is_empty() {
            return Ok(0);
        }

        match bulk::bulk_delete(&self.client, &ids).await {
            Ok(deleted) => {
                self.selection.clear();
                self.refresh().await;
                self.show_notice(Notice::success(format!("Deleted {deleted} documents")));
                self.notify_changed();
                Ok(deleted)
            }
            Err(e) => {
                self.show_notice(Notice::error(e.to_string()));
                self.notify_changed();
                Err(e)
            }
        }
    }

    /// Start staggered downloads for every selected document
    ///
    /// Downloads run in the background; the selection is kept so the user
    /// can retry individual failures.
    pub fn bulk_download_selected(&self, dest_dir: PathBuf, force: bool) -> Vec<JoinHandle<()>> {
        let selected: Vec<Document> = self
            .visible()
            .into_iter()
            .chain(
                // Hidden-but-selected documents are still downloaded
                self.documents
                    .iter()
                    .filter(|d| !self.filter.matches(&d.file_name))
                    .cloned(),
            )
            .filter(|d| self.selection.contains(&d.id))
            .collect();
        bulk::bulk_download(Arc::clone(&self.client), selected, dest_dir, force)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::app::category::Category;

    fn store() -> DocumentStore {
        let client = Arc::new(DocumentsClient::new("http://localhost:8000").unwrap());
        DocumentStore::new(client, Some(PatientId::new("42")))
    }

    fn doc(id: &str, file_name: &str, day: u32) -> Document {
        Document {
            id: DocumentId::new(id),
            file_name: file_name.to_string(),
            file_path: format!("/media/documents/{file_name}"),
            patient_id: PatientId::new("42"),
            uploaded_at: Utc.with_ymd_and_hms(2024, 5, day, 12, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_visible_applies_filter_and_sort() {
        let mut store = store();
        store.documents = vec![
            doc("a", "lab-panel.pdf", 1),
            doc("b", "consent.pdf", 2),
            doc("c", "blood-test.pdf", 3),
        ];
        store.set_filter(CategoryFilter::Only(Category::LabResults));
        let ids: Vec<String> = store.visible().iter().map(|d| d.id.to_string()).collect();
        assert_eq!(ids, ["c", "a"]);
    }

    #[test]
    fn test_selection_survives_filter_change() {
        let mut store = store();
        store.documents = vec![doc("a", "lab-panel.pdf", 1), doc("b", "consent.pdf", 2)];
        store.toggle_selected(DocumentId::new("b"), true);
        store.set_filter(CategoryFilter::Only(Category::LabResults));
        // "b" is hidden now but stays selected
        assert!(store.selection().contains(&DocumentId::new("b")));
    }

    #[test]
    fn test_select_all_visible_double_toggle() {
        let mut store = store();
        store.documents = vec![doc("a", "one.pdf", 1), doc("b", "two.pdf", 2)];
        store.select_all_visible();
        assert_eq!(store.selection().len(), 2);
        store.select_all_visible();
        assert!(store.selection().is_empty());
    }

    #[tokio::test]
    async fn test_upload_without_patient_is_rejected() {
        let client = Arc::new(DocumentsClient::new("http://localhost:8000").unwrap());
        let mut store = DocumentStore::new(client, None);
        let file = CandidateFile::new("report.pdf", "application/pdf", vec![1, 2, 3]);
        let result = store.upload(file).await;
        assert!(matches!(result, Err(UploadError::MissingPatient)));
    }

    #[tokio::test]
    async fn test_invalid_file_fails_without_network() {
        // Base URL points nowhere; validation must reject before any request
        let client = Arc::new(DocumentsClient::new("http://localhost:1").unwrap());
        let mut store = DocumentStore::new(client, Some(PatientId::new("42")));
        let file = CandidateFile::new("x.exe", "application/x-msdownload", vec![0u8; 8]);

        let result = store.upload(file).await;
        assert!(matches!(result, Err(UploadError::Invalid(_))));
        assert_eq!(store.session().phase, UploadPhase::Failed);
        assert!(matches!(
            store.notice().map(|n| n.level),
            Some(crate::app::models::NoticeLevel::Error)
        ));
    }

    #[test]
    fn test_bulk_delete_with_empty_selection_is_noop() {
        let mut store = store();
        let deleted = tokio_test::block_on(store.bulk_delete_selected()).unwrap();
        assert_eq!(deleted, 0);
    }

    #[test]
    fn test_listener_fires_on_mutation() {
        use std::sync::atomic::{AtomicUsize, Ordering};

        let mut store = store();
        let fired = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&fired);
        store.set_listener(Box::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        }));

        store.set_filter(CategoryFilter::All);
        store.toggle_selected(DocumentId::new("a"), true);
        assert_eq!(fired.load(Ordering::SeqCst), 2);
    }
}
