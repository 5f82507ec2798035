//! Multipart document upload
//!
//! The upload endpoint takes a multipart form with the file content under
//! `file` and the owning patient under `patient_id`. The multipart builder
//! sets the content-type boundary itself; setting it manually breaks the
//! request. Error responses come back in several shapes depending on the
//! backend layer that rejected the request, so the error message extraction
//! works through a ladder of known formats before giving up.

use reqwest::multipart::{Form, Part};
use reqwest::Client;
use tracing::{debug, warn};
use url::Url;

use crate::app::models::{CandidateFile, DocumentId, PatientId};
use crate::constants::endpoints;
use crate::errors::{UploadError, UploadResult};

/// Upload a candidate file for a patient
///
/// Returns the server-assigned id of the new document. Validation is the
/// caller's concern; this function only performs the transfer.
///
/// # Errors
///
/// Returns [`UploadError::InvalidMime`] if the declared MIME type cannot be
/// used for the part, [`UploadError::Rejected`] on a non-2xx response, and
/// [`UploadError::MissingDocumentId`] when a 2xx response carries no id.
pub(crate) async fn upload_document(
    http: &Client,
    base_url: &Url,
    patient_id: &PatientId,
    file: &CandidateFile,
) -> UploadResult<DocumentId> {
    let url = crate::app::client::endpoint_url(base_url, endpoints::UPLOAD_PATH);

    let part = Part::bytes(file.content.clone())
        .file_name(file.file_name.clone())
        .mime_str(&file.mime_type)
        .map_err(|_| UploadError::InvalidMime {
            mime_type: file.mime_type.clone(),
        })?;

    let form = Form::new()
        .part("file", part)
        .text("patient_id", patient_id.as_str().to_string());

    debug!(
        file_name = %file.file_name,
        size_bytes = file.size_bytes(),
        "Uploading document"
    );

    let response = http.post(url).multipart(form).send().await?;
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        let message = extract_error_message(status.as_u16(), &body);
        warn!(status = status.as_u16(), message = %message, "Upload rejected");
        return Err(UploadError::Rejected { message });
    }

    match extract_document_id(&body) {
        Some(id) => {
            debug!(document_id = %id, "Upload accepted");
            Ok(id)
        }
        None => {
            warn!("Upload accepted but response carried no document id");
            Err(UploadError::MissingDocumentId)
        }
    }
}

/// Pull the new document's id out of an upload response body
///
/// Accepts the known response shapes: a top-level `id`, a top-level
/// `document_id`, or a nested `document.id`. Ids may be strings or numbers.
fn extract_document_id(body: &str) -> Option<DocumentId> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    let id = value
        .get("id")
        .or_else(|| value.get("document_id"))
        .or_else(|| value.get("document").and_then(|d| d.get("id")))?;
    match id {
        serde_json::Value::String(s) => Some(DocumentId::new(s.clone())),
        serde_json::Value::Number(n) => Some(DocumentId::new(n.to_string())),
        _ => None,
    }
}

/// Extract a human-readable message from an error response body
///
/// Works through the known error shapes in order: a FastAPI-style `detail`
/// array of `{loc, msg}` objects, a `detail` or `message` string, the raw
/// body if it is short enough to be a message, and finally the bare status.
pub(crate) fn extract_error_message(status: u16, body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        if let Some(items) = value.get("detail").and_then(|d| d.as_array()) {
            let rendered: Vec<String> = items
                .iter()
                .filter_map(|item| {
                    let msg = item.get("msg").and_then(|m| m.as_str())?;
                    let loc = item.get("loc").and_then(|l| l.as_array()).map(|parts| {
                        parts
                            .iter()
                            .map(|p| match p {
                                serde_json::Value::String(s) => s.clone(),
                                other => other.to_string(),
                            })
                            .collect::<Vec<_>>()
                            .join(".")
                    });
                    Some(match loc {
                        Some(loc) if !loc.is_empty() => format!("{loc}: {msg}"),
                        _ => msg.to_string(),
                    })
                })
                .collect();
            if !rendered.is_empty() {
                return rendered.join("; ");
            }
        }
        for key in ["detail", "message"] {
            if let Some(text) = value.get(key).and_then(|v| v.as_str()) {
                return text.to_string();
            }
        }
    }

    let trimmed = body.trim();
    if !trimmed.is_empty() && trimmed.len() <= 200 {
        return trimmed.to_string();
    }
    format!("HTTP {status}")
}
