//! Document retrieval and file saving
//!
//! Documents are fetched from the URL derived from their server-relative
//! file path and written atomically: content lands in a temporary file
//! beside the destination and is renamed into place only once fully
//! written, so an interrupted download never leaves a partial file under
//! the final name.

use std::path::{Path, PathBuf};

use reqwest::Client;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};
use url::Url;

use crate::app::models::Document;
use crate::errors::{DownloadError, DownloadResult};

/// Build the retrieval URL for a document
///
/// The document's `file_path` is server-relative and already begins with a
/// slash, so it is appended to the base URL with the trailing slash trimmed.
pub(crate) fn retrieval_url(base_url: &Url, document: &Document) -> DownloadResult<Url> {
    let raw = format!(
        "{}{}",
        base_url.as_str().trim_end_matches('/'),
        document.file_path
    );
    Url::parse(&raw).map_err(|e| DownloadError::InvalidUrl {
        url: raw,
        error: e.to_string(),
    })
}

/// Download a document to the given directory
///
/// The file is saved under the document's display name. Refuses to
/// overwrite an existing file unless `force` is set.
///
/// # Errors
///
/// Returns [`DownloadError::FileExists`] when the destination exists and
/// `force` is false, [`DownloadError::ServerError`] on a non-2xx response,
/// and I/O errors from writing the file.
pub(crate) async fn download_document(
    http: &Client,
    base_url: &Url,
    document: &Document,
    dest_dir: &Path,
    force: bool,
) -> DownloadResult<PathBuf> {
    let final_path = dest_dir.join(&document.file_name);
    if final_path.exists() && !force {
        return Err(DownloadError::FileExists {
            path: final_path.display().to_string(),
        });
    }

    let url = retrieval_url(base_url, document)?;
    debug!(url = %url, "Downloading document");

    let response = http.get(url).send().await?;
    let status = response.status();
    if !status.is_success() {
        warn!(status = status.as_u16(), document_id = %document.id, "Download failed");
        return Err(DownloadError::ServerError {
            status: status.as_u16(),
        });
    }
    let bytes = response.bytes().await?;

    fs::create_dir_all(dest_dir).await?;
    let temp_path = dest_dir.join(format!(".{}.tmp", document.file_name));

    let mut temp_file = fs::File::create(&temp_path).await?;
    temp_file.write_all(&bytes).await?;
    temp_file.sync_all().await?;
    drop(temp_file);

    if let Err(e) = fs::rename(&temp_path, &final_path).await {
        warn!("Atomic rename failed: {e}");
        let _ = fs::remove_file(&temp_path).await;
        return Err(DownloadError::AtomicOperationFailed {
            temp_path,
            final_path,
        });
    }

    debug!(path = %final_path.display(), bytes = bytes.len(), "Saved document");
    Ok(final_path)
}
