//! Core application logic for the chartfile client
//!
//! This module contains the document manager's moving parts: the data
//! models, the validation and classification rules, the HTTP client with
//! its listing negotiation, the simulated upload progress, and the store
//! that ties them together.
//!
//! # Architecture
//!
//! The design centers on a single-owner [`DocumentStore`] that mediates all
//! mutations, with the server as the source of truth:
//!
//! - **Models**: server-owned documents and the transient upload session
//! - **Client**: one pooled HTTP client behind [`DocumentsClient`]
//! - **Store**: canonical list, selection, filter, and orchestration
//! - **Progress**: a simulator task feeding a shared atomic display cell
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use chartfile::app::{DocumentStore, DocumentsClient};
//! use chartfile::app::models::PatientId;
//!
//! # async fn example() -> chartfile::Result<()> {
//! let client = Arc::new(DocumentsClient::new("http://localhost:8000")?);
//! let mut store = DocumentStore::new(client, Some(PatientId::new("42")));
//! store.refresh().await;
//! for doc in store.visible() {
//!     println!("{} ({})", doc.file_name, doc.uploaded_at);
//! }
//! # Ok(())
//! # }
//! ```

pub mod bulk;
pub mod category;
pub mod client;
pub mod models;
pub mod progress;
pub mod selection;
pub mod store;
pub mod validate;
pub mod view;

// Re-export commonly used types
pub use category::{Category, CategoryFilter};
pub use client::{DocumentsClient, EmptyReason, ListingOutcome};
pub use models::{CandidateFile, Document, DocumentId, Notice, PatientId, UploadPhase};
pub use progress::{DisplayedPercent, ProgressSink, SimulatedProgress};
pub use selection::SelectionSet;
pub use store::DocumentStore;
pub use validate::Violation;
