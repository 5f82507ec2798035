//! Bulk operations over the selection
//!
//! Downloads fan out as independent tasks with staggered starts; each
//! succeeds or fails on its own. Deletes run strictly sequentially and abort
//! at the first failure, so the count of documents actually removed is
//! always knowable and no later delete races a failed earlier one.

use std::path::PathBuf;
use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::app::client::DocumentsClient;
use crate::app::models::{Document, DocumentId};
use crate::constants::bulk;
use crate::errors::BulkDeleteError;

/// Start a staggered download for each document
///
/// Each document gets its own task, delayed by its index times the stagger
/// offset so the backend never sees all requests at once. Tasks are
/// fire-and-forget: a failed download logs a warning without affecting the
/// others. The handles are returned so callers that need to wait (the CLI
/// does) can join them.
pub fn bulk_download(
    client: Arc<DocumentsClient>,
    documents: Vec<Document>,
    dest_dir: PathBuf,
    force: bool,
) -> Vec<JoinHandle<()>> {
    info!(count = documents.len(), "Starting bulk download");
    documents
        .into_iter()
        .enumerate()
        .map(|(index, document)| {
            let client = Arc::clone(&client);
            let dest_dir = dest_dir.clone();
            tokio::spawn(async move {
                tokio::time::sleep(bulk::DOWNLOAD_STAGGER * index as u32).await;
                match client.download_document(&document, &dest_dir, force).await {
                    Ok(path) => {
                        debug!(path = %path.display(), "Bulk download item finished")
                    }
                    Err(e) => {
                        warn!(document_id = %document.id, "Bulk download item failed: {e}")
                    }
                }
            })
        })
        .collect()
}

/// Delete the given documents one at a time, aborting on the first failure
///
/// Returns the number of documents deleted on full success.
///
/// # Errors
///
/// Returns [`BulkDeleteError`] naming the failing id and how many deletes
/// completed before it; ids after the failing one were never attempted.
pub async fn bulk_delete(
    client: &DocumentsClient,
    ids: &[DocumentId],
) -> Result<usize, BulkDeleteError> {
    info!(count = ids.len(), "Starting bulk delete");
    let mut deleted = 0usize;
    for id in ids {
        if let Err(e) = client.delete_document(id).await {
            warn!(
                document_id = %id,
                deleted_before_failure = deleted,
                "Bulk delete aborted: {e}"
            );
            return Err(BulkDeleteError {
                failed_id: id.clone(),
                deleted_before_failure: deleted,
                message: e.to_string(),
            });
        }
        deleted += 1;
    }
    info!(deleted, "Bulk delete finished");
    Ok(deleted)
}
