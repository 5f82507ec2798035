//! Convenience re-exports for common chartfile types
//!
//! ```rust
//! use chartfile::prelude::*;
//! ```

pub use crate::app::category::{Category, CategoryFilter};
pub use crate::app::client::{ClientConfig, DocumentsClient, EmptyReason, ListingOutcome};
pub use crate::app::models::{
    CandidateFile, Document, DocumentId, Notice, NoticeLevel, PatientId, UploadPhase,
};
pub use crate::app::progress::{DisplayedPercent, ProgressSink};
pub use crate::app::selection::SelectionSet;
pub use crate::app::store::DocumentStore;
pub use crate::app::validate::Violation;
pub use crate::config::AppConfig;
pub use crate::errors::{
    AppError, BulkDeleteError, ConfigError, DeleteError, DownloadError, Result, UploadError,
};
