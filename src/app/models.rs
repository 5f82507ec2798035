//! Data models for the chartfile client
//!
//! This module defines the core data structures used throughout the
//! application: server-owned document records, upload candidates, the
//! transient upload session, and user-facing notices.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};

use crate::app::validate::{self, Violation};
use crate::constants::notices;

/// Opaque server-assigned document identifier
///
/// Some backends serialize ids as JSON strings, others as integers; both are
/// accepted and normalized to their string form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct DocumentId(String);

impl DocumentId {
    /// Create an identifier from its string form
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The identifier as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for DocumentId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserialize_string_or_number(deserializer).map(Self)
    }
}

/// Foreign key to the patient a document belongs to
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct PatientId(String);

impl PatientId {
    /// Create an identifier from its string form
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The identifier as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PatientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for PatientId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserialize_string_or_number(deserializer).map(Self)
    }
}

/// Accept a JSON string or integer and normalize to String
fn deserialize_string_or_number<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<String, D::Error> {
    let value = serde_json::Value::deserialize(deserializer)?;
    match value {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        other => Err(de::Error::custom(format!(
            "expected string or number identifier, got {other}"
        ))),
    }
}

/// Server-owned record of a file attached to a patient
///
/// The in-memory list of these is wholly replaced on every successful fetch,
/// never merged or patched in place, so server-assigned fields cannot drift.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Opaque unique identifier
    pub id: DocumentId,
    /// Display name of the stored file
    pub file_name: String,
    /// Server-relative path used to build the retrieval URL
    pub file_path: String,
    /// Patient this document belongs to
    pub patient_id: PatientId,
    /// Server-side upload timestamp
    pub uploaded_at: DateTime<Utc>,
}

/// A file selected for upload, prior to any network activity
#[derive(Debug, Clone)]
pub struct CandidateFile {
    /// Name the file will be stored under
    pub file_name: String,
    /// Declared MIME type
    pub mime_type: String,
    /// Raw file content
    pub content: Vec<u8>,
}

impl CandidateFile {
    /// Create a candidate from its parts
    pub fn new(file_name: impl Into<String>, mime_type: impl Into<String>, content: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            mime_type: mime_type.into(),
            content,
        }
    }

    /// Size of the file content in bytes
    pub fn size_bytes(&self) -> u64 {
        self.content.len() as u64
    }

    /// Run the pre-flight validation rules against this candidate
    ///
    /// Empty result means the file is acceptable for upload.
    pub fn validate(&self) -> Vec<Violation> {
        validate::validate(&self.file_name, &self.mime_type, self.size_bytes())
    }
}

/// Phase of an upload session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadPhase {
    /// No upload underway
    Idle,
    /// Pre-flight validation in progress
    Validating,
    /// Transfer request in flight
    Uploading,
    /// Transfer accepted; holding the completed display state
    Finalizing,
    /// Terminal: upload completed
    Succeeded,
    /// Terminal: validation or transfer failed
    Failed,
}

impl UploadPhase {
    /// Whether the phase represents an in-flight session
    pub fn is_active(self) -> bool {
        matches!(self, Self::Validating | Self::Uploading | Self::Finalizing)
    }

    /// Whether the phase is terminal
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed)
    }
}

/// Transient state for one in-flight upload
///
/// Exactly one session may be active at a time; the store rejects a new
/// upload while one is active. The displayed percentage lives in a shared
/// cell owned by the store (see `app::progress`), not here, because the
/// simulator task updates it concurrently.
#[derive(Debug, Clone)]
pub struct UploadSession {
    /// Name of the file being uploaded, cleared once the display is reset
    pub file_name: Option<String>,
    /// Declared MIME type of the file
    pub mime_type: Option<String>,
    /// Size of the file in bytes
    pub size_bytes: u64,
    /// Current phase
    pub phase: UploadPhase,
}

impl UploadSession {
    /// An idle session with no file bound
    pub fn idle() -> Self {
        Self {
            file_name: None,
            mime_type: None,
            size_bytes: 0,
            phase: UploadPhase::Idle,
        }
    }

    /// Begin a session for the given candidate, entering the validating phase
    pub fn begin(file: &CandidateFile) -> Self {
        Self {
            file_name: Some(file.file_name.clone()),
            mime_type: Some(file.mime_type.clone()),
            size_bytes: file.size_bytes(),
            phase: UploadPhase::Validating,
        }
    }

    /// Whether an upload is currently in flight
    pub fn is_active(&self) -> bool {
        self.phase.is_active()
    }

    /// Clear the filename display while keeping the terminal phase
    pub fn clear_display(&mut self) {
        self.file_name = None;
        self.mime_type = None;
        self.size_bytes = 0;
    }
}

impl Default for UploadSession {
    fn default() -> Self {
        Self::idle()
    }
}

/// Severity of a user-facing notice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    /// Informational success notice
    Success,
    /// Error notice; held longer so it can be read
    Error,
}

/// A dismissible user-facing message produced by a mutation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    /// Severity
    pub level: NoticeLevel,
    /// Message text
    pub message: String,
}

impl Notice {
    /// Build a success notice
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    /// Build an error notice
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }

    /// How long the notice should stay on screen before auto-dismissing
    pub fn dismiss_after(&self) -> std::time::Duration {
        match self.level {
            NoticeLevel::Success => notices::SUCCESS_DISMISS,
            NoticeLevel::Error => notices::ERROR_DISMISS,
        }
    }
}
