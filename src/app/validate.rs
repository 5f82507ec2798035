//! Pre-flight upload validation
//!
//! Pure rule set consulted before any network call. All rules are evaluated
//! rather than short-circuited, so a single file can report several
//! violations at once. The size rule only applies to files whose type is on
//! the allow-list; an unlisted type already fails on its own terms.

use thiserror::Error;

use crate::constants::upload;

/// A single validation failure, rendered as a human-readable message
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    /// MIME type not on the allow-list
    #[error("File type '{mime_type}' is not accepted. Accepted types: {}", upload::ACCEPTED_SUMMARY)]
    UnsupportedType { mime_type: String },

    /// File larger than the uniform size limit
    #[error("{} exceeds the {} limit", human_size(*.size_bytes), human_size(*.limit_bytes))]
    TooLarge { size_bytes: u64, limit_bytes: u64 },

    /// File name longer than the allowed number of characters
    #[error("File name is {length} characters long; the limit is {limit}")]
    NameTooLong { length: usize, limit: usize },

    /// Zero-byte file
    #[error("File is empty")]
    Empty,

    /// File name carries control characters or reserved punctuation
    #[error("File name contains invalid characters")]
    InvalidCharacters,
}

/// Validate a candidate file against the upload rules
///
/// Returns the list of violations; an empty list means the file is
/// acceptable. Purely local, no side effects.
pub fn validate(file_name: &str, mime_type: &str, size_bytes: u64) -> Vec<Violation> {
    let mut violations = Vec::new();

    let type_allowed = upload::ALLOWED_MIME_TYPES.contains(&mime_type);
    if !type_allowed {
        violations.push(Violation::UnsupportedType {
            mime_type: mime_type.to_string(),
        });
    }

    // Size limit is uniform across allowed types; an unlisted type already
    // reports the type violation and is not additionally measured.
    if type_allowed && size_bytes > upload::MAX_FILE_SIZE_BYTES {
        violations.push(Violation::TooLarge {
            size_bytes,
            limit_bytes: upload::MAX_FILE_SIZE_BYTES,
        });
    }

    let length = file_name.chars().count();
    if length > upload::MAX_FILE_NAME_CHARS {
        violations.push(Violation::NameTooLong {
            length,
            limit: upload::MAX_FILE_NAME_CHARS,
        });
    }

    if size_bytes == 0 {
        violations.push(Violation::Empty);
    }

    if file_name
        .chars()
        .any(|c| c.is_control() || upload::FORBIDDEN_NAME_CHARS.contains(&c))
    {
        violations.push(Violation::InvalidCharacters);
    }

    violations
}

/// Render a byte count as a MiB figure for violation messages
fn human_size(bytes: u64) -> String {
    const MIB: u64 = 1024 * 1024;
    if bytes % MIB == 0 {
        format!("{} MiB", bytes / MIB)
    } else {
        format!("{:.1} MiB", bytes as f64 / MIB as f64)
    }
}
