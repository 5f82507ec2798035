//! Error types for the chartfile client
//!
//! This module defines the error types for every component of the crate.
//! Listing failures are deliberately absent: the listing negotiator absorbs
//! all of its failure modes into a typed outcome so callers can render an
//! empty panel instead of an error (see `app::client::listing`).

use std::path::PathBuf;

use thiserror::Error;

use crate::app::models::DocumentId;
use crate::app::validate::Violation;

/// Upload errors, covering orchestration and transport
#[derive(Error, Debug)]
pub enum UploadError {
    /// Pre-flight validation rejected the file; no network call was made
    #[error("File failed validation: {}", format_violations(.0))]
    Invalid(Vec<Violation>),

    /// Another upload session is still active
    #[error("An upload is already in progress")]
    SessionActive,

    /// No patient is bound to the store, so the upload cannot be scoped
    #[error("No patient selected for upload")]
    MissingPatient,

    /// The declared MIME type could not be used for the multipart part
    #[error("Invalid MIME type '{mime_type}'")]
    InvalidMime { mime_type: String },

    /// Server rejected the upload; message extracted from the response
    #[error("{message}")]
    Rejected { message: String },

    /// Transport-level failure issuing the request
    #[error("Upload request failed")]
    Transport(#[from] reqwest::Error),

    /// Server accepted the upload but the response carried no document id
    #[error("Upload response did not contain a document id")]
    MissingDocumentId,
}

fn format_violations(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Single-document delete errors
#[derive(Error, Debug)]
pub enum DeleteError {
    /// Server rejected the delete; message extracted from the response
    #[error("{message}")]
    Rejected { message: String },

    /// Transport-level failure issuing the request
    #[error("Delete request failed")]
    Transport(#[from] reqwest::Error),
}

/// Bulk delete failure: the sequence aborted at the first failing item
///
/// Items counted by `deleted_before_failure` were removed on the server;
/// items after the failing id were never attempted.
#[derive(Error, Debug)]
#[error("Failed to delete some documents: {message}")]
pub struct BulkDeleteError {
    /// The document whose delete failed
    pub failed_id: DocumentId,
    /// How many deletes completed before the failure
    pub deleted_before_failure: usize,
    /// The underlying failure message
    pub message: String,
}

/// Document retrieval and file-save errors
#[derive(Error, Debug)]
pub enum DownloadError {
    /// HTTP request error
    #[error("HTTP request failed")]
    Http(#[from] reqwest::Error),

    /// File already exists and force flag not set
    #[error("File already exists: {path}. Use --force to overwrite")]
    FileExists { path: String },

    /// I/O error during file operations
    #[error("File I/O error")]
    Io(#[from] std::io::Error),

    /// Retrieval URL could not be built from the document's file path
    #[error("Invalid retrieval URL: {url} - {error}")]
    InvalidUrl { url: String, error: String },

    /// Server returned error status
    #[error("Server error: HTTP {status}")]
    ServerError { status: u16 },

    /// Atomic file operation failed
    #[error("Atomic file operation failed: could not rename {} to {}", .temp_path.display(), .final_path.display())]
    AtomicOperationFailed {
        temp_path: PathBuf,
        final_path: PathBuf,
    },
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Configuration file not found
    #[error("Configuration file not found: {}", .path.display())]
    NotFound { path: PathBuf },

    /// Invalid configuration format
    #[error("Invalid configuration format")]
    InvalidFormat(#[from] toml::de::Error),

    /// Base URL is not a usable HTTP(S) URL
    #[error("Invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    /// HTTP client construction failed
    #[error("Failed to build HTTP client")]
    ClientBuild(#[from] reqwest::Error),

    /// I/O error reading or writing configuration
    #[error("Configuration I/O error")]
    Io(#[from] std::io::Error),
}

/// Top-level application error that can represent any error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Upload error
    #[error(transparent)]
    Upload(#[from] UploadError),

    /// Delete error
    #[error(transparent)]
    Delete(#[from] DeleteError),

    /// Bulk delete error
    #[error(transparent)]
    BulkDelete(#[from] BulkDeleteError),

    /// Download error
    #[error(transparent)]
    Download(#[from] DownloadError),

    /// Configuration error
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Generic I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Generic application error with context
    #[error("Application error: {message}")]
    Generic { message: String },
}

impl AppError {
    /// Create a generic application error with a message
    pub fn generic(message: impl Into<String>) -> Self {
        Self::Generic {
            message: message.into(),
        }
    }

    /// Check if the error is recoverable by the user retrying or
    /// re-selecting a file
    pub fn is_recoverable(&self) -> bool {
        match self {
            AppError::Upload(UploadError::Invalid(_))
            | AppError::Upload(UploadError::SessionActive)
            | AppError::Upload(UploadError::Transport(_))
            | AppError::Delete(DeleteError::Transport(_))
            | AppError::Download(DownloadError::Http(_))
            | AppError::Download(DownloadError::FileExists { .. }) => true,

            AppError::Config(_) | AppError::Upload(UploadError::MissingPatient) => false,

            _ => false,
        }
    }

    /// Get error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            AppError::Upload(_) => "upload",
            AppError::Delete(_) => "delete",
            AppError::BulkDelete(_) => "bulk-delete",
            AppError::Download(_) => "download",
            AppError::Config(_) => "config",
            AppError::Io(_) => "io",
            AppError::Generic { .. } => "generic",
        }
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, AppError>;

/// Upload result type alias
pub type UploadResult<T> = std::result::Result<T, UploadError>;

/// Delete result type alias
pub type DeleteResult<T> = std::result::Result<T, DeleteError>;

/// Download result type alias
pub type DownloadResult<T> = std::result::Result<T, DownloadError>;

/// Configuration result type alias
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
