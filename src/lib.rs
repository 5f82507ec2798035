//! # chartfile
//!
//! Client-side document manager for patient records. Talks to a documents
//! backend over HTTP to list, upload, download, and delete files attached
//! to a patient, with client-side validation, category classification, and
//! multi-select bulk operations.
//!
//! ## Features
//!
//! - **Pre-flight validation**: type allow-list, size and name limits,
//!   checked before any byte leaves the machine
//! - **Listing negotiation**: transparent fallback to an unfiltered listing
//!   with client-side filtering when the backend rejects the patient filter
//! - **Simulated progress**: responsive upload feedback even though the
//!   backend emits no transfer events
//! - **Bulk operations**: staggered parallel downloads, sequential
//!   abort-on-first-failure deletes
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use chartfile::prelude::*;
//!
//! # async fn example() -> chartfile::Result<()> {
//! let client = Arc::new(DocumentsClient::new("http://localhost:8000")?);
//! let mut store = DocumentStore::new(client, Some(PatientId::new("42")));
//!
//! store.refresh().await;
//! let file = CandidateFile::new("report.pdf", "application/pdf", vec![/* bytes */]);
//! let id = store.upload(file).await?;
//! println!("uploaded as {id}");
//! # Ok(())
//! # }
//! ```

pub mod app;
pub mod cli;
pub mod config;
pub mod constants;
pub mod errors;
pub mod prelude;

pub use errors::{AppError, Result};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_surface_is_reachable() {
        let _ = constants::upload::MAX_FILE_SIZE_BYTES;
        let err = AppError::generic("test");
        assert_eq!(err.category(), "generic");
    }
}
