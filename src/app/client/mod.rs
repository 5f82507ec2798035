//! HTTP client for the documents backend
//!
//! [`DocumentsClient`] is the single gateway for all network traffic: listing
//! negotiation, multipart upload, delete, and file retrieval. It owns one
//! pooled reqwest client built at startup and a validated base URL; the
//! per-operation logic lives in the submodules.

pub mod config;
pub mod download;
pub mod listing;
pub mod upload;

use std::path::{Path, PathBuf};

use reqwest::Client;
use tracing::{debug, warn};
use url::Url;

pub use config::ClientConfig;
pub use listing::{EmptyReason, ListingOutcome};

use crate::app::models::{CandidateFile, Document, DocumentId, PatientId};
use crate::constants::endpoints;
use crate::errors::{
    ConfigError, ConfigResult, DeleteError, DeleteResult, DownloadResult, UploadResult,
};

/// Build an endpoint URL under the base, preserving any base path prefix
///
/// A base of `http://host/api` maps `/documents/` to `/api/documents/`,
/// consistent with how retrieval URLs are built from `file_path`.
pub(crate) fn endpoint_url(base_url: &Url, path: &str) -> Url {
    let mut url = base_url.clone();
    let prefix = base_url.path().trim_end_matches('/');
    url.set_path(&format!("{prefix}{path}"));
    url
}

/// Client for the documents backend
#[derive(Debug, Clone)]
pub struct DocumentsClient {
    http: Client,
    base_url: Url,
}

impl DocumentsClient {
    /// Create a client with default settings
    pub fn new(base_url: &str) -> ConfigResult<Self> {
        Self::with_config(base_url, &ClientConfig::default())
    }

    /// Create a client with custom settings
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidBaseUrl`] when the base URL does not
    /// parse or cannot carry a path, and [`ConfigError::ClientBuild`] when
    /// the underlying HTTP client cannot be constructed.
    pub fn with_config(base_url: &str, config: &ClientConfig) -> ConfigResult<Self> {
        let parsed = Url::parse(base_url).map_err(|e| ConfigError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;
        if parsed.cannot_be_a_base() {
            return Err(ConfigError::InvalidBaseUrl {
                url: base_url.to_string(),
                reason: "URL cannot serve as a base".to_string(),
            });
        }

        let http = config.build_http_client()?;
        debug!(base_url = %parsed, "Created documents client");
        Ok(Self {
            http,
            base_url: parsed,
        })
    }

    /// The configured base URL
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Fetch the document listing for a patient
    ///
    /// Negotiates the filtered/unfiltered fallback and never fails; see
    /// [`ListingOutcome`] for how failures are represented.
    pub async fn fetch_documents(&self, patient_id: Option<&PatientId>) -> ListingOutcome {
        listing::fetch_documents(&self.http, &self.base_url, patient_id).await
    }

    /// Upload a file for a patient, returning the new document's id
    pub async fn upload_document(
        &self,
        patient_id: &PatientId,
        file: &CandidateFile,
    ) -> UploadResult<DocumentId> {
        upload::upload_document(&self.http, &self.base_url, patient_id, file).await
    }

    /// Delete a single document
    ///
    /// # Errors
    ///
    /// Returns [`DeleteError::Rejected`] with the extracted server message
    /// on any non-2xx response.
    pub async fn delete_document(&self, id: &DocumentId) -> DeleteResult<()> {
        let url = endpoint_url(
            &self.base_url,
            &format!("{}{}", endpoints::DOCUMENTS_PATH, id.as_str()),
        );

        debug!(document_id = %id, "Deleting document");
        let response = self.http.delete(url).send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        let message = upload::extract_error_message(status.as_u16(), &body);
        warn!(document_id = %id, status = status.as_u16(), message = %message, "Delete rejected");
        Err(DeleteError::Rejected { message })
    }

    /// Download a document into the given directory
    pub async fn download_document(
        &self,
        document: &Document,
        dest_dir: &Path,
        force: bool,
    ) -> DownloadResult<PathBuf> {
        download::download_document(&self.http, &self.base_url, document, dest_dir, force).await
    }

    /// The URL a document's content is served from
    pub fn retrieval_url(&self, document: &Document) -> DownloadResult<Url> {
        download::retrieval_url(&self.base_url, document)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_unparseable_base_url() {
        let result = DocumentsClient::new("not a url");
        assert!(matches!(result, Err(ConfigError::InvalidBaseUrl { .. })));
    }

    #[test]
    fn test_rejects_cannot_be_a_base_url() {
        let result = DocumentsClient::new("mailto:clinic@example.com");
        assert!(matches!(result, Err(ConfigError::InvalidBaseUrl { .. })));
    }

    #[test]
    fn test_accepts_http_base_url() {
        let client = DocumentsClient::new("http://localhost:8000").unwrap();
        assert_eq!(client.base_url().as_str(), "http://localhost:8000/");
    }

    #[test]
    fn test_endpoint_url_preserves_base_path_prefix() {
        let base = Url::parse("http://localhost:8000/api").unwrap();
        assert_eq!(
            endpoint_url(&base, "/documents/").as_str(),
            "http://localhost:8000/api/documents/"
        );
        assert_eq!(
            endpoint_url(&base, "/documents/doc-1").as_str(),
            "http://localhost:8000/api/documents/doc-1"
        );

        // Trailing slash on the base does not double up
        let base = Url::parse("http://localhost:8000/api/").unwrap();
        assert_eq!(
            endpoint_url(&base, "/documents/upload").as_str(),
            "http://localhost:8000/api/documents/upload"
        );
    }

    #[test]
    fn test_endpoint_url_without_prefix() {
        let base = Url::parse("http://localhost:8000").unwrap();
        assert_eq!(
            endpoint_url(&base, "/documents/").as_str(),
            "http://localhost:8000/documents/"
        );
    }
}
