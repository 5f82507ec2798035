//! Listing negotiation with the documents backend
//!
//! Some backend versions reject the `patient_id` query parameter with a 400
//! even though it is the documented way to scope a listing. The negotiator
//! tries the filtered request first and, on a 400, falls back to the
//! unfiltered listing and filters client-side. Every failure mode collapses
//! into a typed [`ListingOutcome`] instead of an error: callers render an
//! empty panel, but the reason is preserved for logging and diagnostics.

use reqwest::{Client, StatusCode};
use tracing::{debug, warn};
use url::Url;

use crate::app::client::upload::extract_error_message;
use crate::app::models::{Document, PatientId};
use crate::constants::endpoints;

/// Result of a listing attempt
#[derive(Debug, Clone, PartialEq)]
pub enum ListingOutcome {
    /// Documents fetched (possibly zero of them after client-side filtering)
    Listed(Vec<Document>),
    /// Nothing to show, with the reason why
    Empty(EmptyReason),
    /// Backend answered with an unexpected status; the list is cleared
    /// rather than left stale, and the status kept for diagnostics
    Degraded { status: u16, detail: String },
}

impl ListingOutcome {
    /// Documents carried by the outcome, empty for non-listed variants
    pub fn documents(self) -> Vec<Document> {
        match self {
            Self::Listed(docs) => docs,
            _ => Vec::new(),
        }
    }
}

/// Why a listing produced no documents
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyReason {
    /// No patient bound; no request was issued
    NoPatient,
    /// Backend answered 404 for the patient
    NotFound,
    /// Response body was not a JSON document array
    MalformedBody,
    /// Filtered request was rejected and the unfiltered fallback failed too
    FallbackFailed,
    /// Transport failure; the backend could not be reached
    Unreachable,
}

/// How the primary (filtered) response should be handled
#[derive(Debug)]
enum Primary {
    Listed(Vec<Document>),
    Empty(EmptyReason),
    /// 400: retry without the patient filter
    Fallback,
    Degraded { status: u16, detail: String },
}

/// Fetch the documents for a patient
///
/// Issues the filtered listing and negotiates the fallback on a 400. Never
/// returns an error; transport failures map to
/// [`EmptyReason::Unreachable`].
pub(crate) async fn fetch_documents(
    http: &Client,
    base_url: &Url,
    patient_id: Option<&PatientId>,
) -> ListingOutcome {
    let Some(patient_id) = patient_id else {
        debug!("No patient bound, skipping listing request");
        return ListingOutcome::Empty(EmptyReason::NoPatient);
    };

    let mut url = documents_url(base_url);
    url.query_pairs_mut()
        .append_pair(endpoints::PATIENT_ID_PARAM, patient_id.as_str());

    let (status, body) = match issue(http, url).await {
        Ok(pair) => pair,
        Err(e) => {
            warn!("Listing request failed: {e}");
            return ListingOutcome::Empty(EmptyReason::Unreachable);
        }
    };

    match interpret_primary(status, &body) {
        Primary::Listed(docs) => {
            debug!(count = docs.len(), "Fetched filtered document listing");
            ListingOutcome::Listed(docs)
        }
        Primary::Empty(reason) => ListingOutcome::Empty(reason),
        Primary::Degraded { status, detail } => {
            warn!(status, detail = %detail, "Listing degraded");
            ListingOutcome::Degraded { status, detail }
        }
        Primary::Fallback => {
            debug!("Filtered listing rejected with 400, falling back to unfiltered");
            fetch_unfiltered(http, base_url, patient_id).await
        }
    }
}

/// Unfiltered fallback: fetch everything, filter by patient client-side
async fn fetch_unfiltered(
    http: &Client,
    base_url: &Url,
    patient_id: &PatientId,
) -> ListingOutcome {
    let url = documents_url(base_url);
    let (status, body) = match issue(http, url).await {
        Ok(pair) => pair,
        Err(e) => {
            warn!("Unfiltered fallback request failed: {e}");
            return ListingOutcome::Empty(EmptyReason::FallbackFailed);
        }
    };

    if status != StatusCode::OK.as_u16() {
        warn!(status, "Unfiltered fallback returned non-200");
        return ListingOutcome::Empty(EmptyReason::FallbackFailed);
    }

    match parse_document_array(&body) {
        Some(docs) => {
            let mine: Vec<Document> = docs
                .into_iter()
                .filter(|doc| &doc.patient_id == patient_id)
                .collect();
            debug!(count = mine.len(), "Client-side filtered fallback listing");
            ListingOutcome::Listed(mine)
        }
        None => ListingOutcome::Empty(EmptyReason::FallbackFailed),
    }
}

/// Classify the filtered response
fn interpret_primary(status: u16, body: &str) -> Primary {
    match status {
        200 => match parse_document_array(body) {
            Some(docs) => Primary::Listed(docs),
            None => Primary::Empty(EmptyReason::MalformedBody),
        },
        400 => Primary::Fallback,
        404 => Primary::Empty(EmptyReason::NotFound),
        other => Primary::Degraded {
            status: other,
            detail: extract_error_message(other, body),
        },
    }
}

/// Parse a JSON body as an array of documents
///
/// Returns `None` when the body is not an array or any element fails to
/// deserialize; a partially valid listing is not worth showing.
fn parse_document_array(body: &str) -> Option<Vec<Document>> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    if !value.is_array() {
        return None;
    }
    serde_json::from_value(value).ok()
}

fn documents_url(base_url: &Url) -> Url {
    crate::app::client::endpoint_url(base_url, endpoints::DOCUMENTS_PATH)
}

async fn issue(http: &Client, url: Url) -> Result<(u16, String), reqwest::Error> {
    let response = http.get(url).send().await?;
    let status = response.status().as_u16();
    let body = response.text().await?;
    Ok((status, body))
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = r#"{
        "id": "doc-1",
        "file_name": "lab-results.pdf",
        "file_path": "/media/documents/lab-results.pdf",
        "patient_id": "42",
        "uploaded_at": "2024-05-01T10:30:00Z"
    }"#;

    #[test]
    fn test_ok_array_is_listed() {
        let body = format!("[{DOC}]");
        match interpret_primary(200, &body) {
            Primary::Listed(docs) => assert_eq!(docs.len(), 1),
            other => panic!("expected Listed, got {other:?}"),
        }
    }

    #[test]
    fn test_ok_empty_array_is_listed_empty() {
        match interpret_primary(200, "[]") {
            Primary::Listed(docs) => assert!(docs.is_empty()),
            other => panic!("expected Listed, got {other:?}"),
        }
    }

    #[test]
    fn test_ok_non_array_is_malformed() {
        for body in [r#"{"documents": []}"#, "\"hello\"", "not json"] {
            assert!(matches!(
                interpret_primary(200, body),
                Primary::Empty(EmptyReason::MalformedBody)
            ));
        }
    }

    #[test]
    fn test_bad_request_triggers_fallback() {
        assert!(matches!(interpret_primary(400, ""), Primary::Fallback));
    }

    #[test]
    fn test_not_found_is_empty() {
        assert!(matches!(
            interpret_primary(404, ""),
            Primary::Empty(EmptyReason::NotFound)
        ));
    }

    #[test]
    fn test_server_error_degrades_with_detail() {
        match interpret_primary(500, r#"{"detail": "db down"}"#) {
            Primary::Degraded { status, detail } => {
                assert_eq!(status, 500);
                assert_eq!(detail, "db down");
            }
            other => panic!("expected Degraded, got {other:?}"),
        }
    }

    #[test]
    fn test_array_with_bad_element_is_malformed() {
        let body = format!("[{DOC}, {{\"id\": true}}]");
        assert!(matches!(
            interpret_primary(200, &body),
            Primary::Empty(EmptyReason::MalformedBody)
        ));
    }

    #[test]
    fn test_outcome_documents_accessor() {
        let outcome = ListingOutcome::Empty(EmptyReason::NotFound);
        assert!(outcome.documents().is_empty());
    }
}
