//! Application constants for the chartfile client
//!
//! This module centralizes all constants used throughout the application,
//! organized by functional domain for maintainability and clarity.

use std::time::Duration;

/// Environment variable names
pub mod env {
    /// Environment variable overriding the configured base URL
    pub const BASE_URL: &str = "CHARTFILE_BASE_URL";
}

/// HTTP client configuration constants
pub mod http {
    use super::Duration;

    /// Default user agent for all HTTP requests
    pub const USER_AGENT: &str = "chartfile/0.1.0 (Practice Document Client)";

    /// Default HTTP request timeout
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

    /// Connection establishment timeout
    pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

    /// Connection pool idle timeout
    pub const POOL_IDLE_TIMEOUT: Duration = Duration::from_secs(90);

    /// Maximum connections per host in pool
    pub const POOL_MAX_PER_HOST: usize = 8;

    /// Default backend base URL when no configuration is present
    pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";
}

/// Backend endpoint paths
pub mod endpoints {
    /// Listing endpoint; also the unfiltered fallback target
    pub const DOCUMENTS_PATH: &str = "/documents/";

    /// Multipart upload endpoint
    pub const UPLOAD_PATH: &str = "/documents/upload";

    /// Query parameter carrying the patient scope on the filtered listing
    pub const PATIENT_ID_PARAM: &str = "patient_id";
}

/// Upload validation limits and the MIME allow-list
pub mod upload {
    /// Maximum accepted file size, uniform across all allowed types (50 MiB)
    pub const MAX_FILE_SIZE_BYTES: u64 = 52_428_800;

    /// Maximum accepted file name length in characters
    pub const MAX_FILE_NAME_CHARS: usize = 255;

    /// Characters that must not appear in a file name
    pub const FORBIDDEN_NAME_CHARS: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

    /// MIME types accepted for upload
    pub const ALLOWED_MIME_TYPES: &[&str] = &[
        "image/jpeg",
        "image/png",
        "image/gif",
        "image/webp",
        "application/pdf",
        "application/msword",
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "application/vnd.ms-excel",
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        "application/vnd.ms-powerpoint",
        "application/vnd.openxmlformats-officedocument.presentationml.presentation",
        "text/plain",
        "text/csv",
        "video/mp4",
        "video/quicktime",
        "audio/mpeg",
        "audio/wav",
    ];

    /// Summary of the accepted categories, used in violation messages
    pub const ACCEPTED_SUMMARY: &str =
        "images (JPEG/PNG/GIF/WebP), PDF, Office documents, plain text/CSV, MP4/QuickTime video, MP3/WAV audio";
}

/// Upload progress presentation timings
///
/// The displayed percentage is synthesized on a timer and is independent of
/// actual transfer state; the real request outcome drives the terminal phase.
pub mod progress {
    use super::Duration;

    /// Interval between simulated progress increments
    pub const SIMULATOR_TICK: Duration = Duration::from_millis(300);

    /// Ceiling for the simulated percentage; 100 is reserved for real completion
    pub const SIMULATED_CAP: u8 = 90;

    /// Minimum random increment per tick
    pub const MIN_STEP: u8 = 5;

    /// Maximum random increment per tick
    pub const MAX_STEP: u8 = 18;

    /// How long the 100% state is held before the session is marked succeeded
    pub const SUCCESS_HOLD: Duration = Duration::from_millis(800);

    /// Delay before the post-upload list refresh, giving the backend time to commit
    pub const REFRESH_SETTLE: Duration = Duration::from_millis(500);
}

/// Bulk operation pacing
pub mod bulk {
    use super::Duration;

    /// Offset between successive bulk-download starts, to avoid
    /// simultaneous-download throttling on the receiving side
    pub const DOWNLOAD_STAGGER: Duration = Duration::from_millis(100);
}

/// Notice auto-dismiss windows
pub mod notices {
    use super::Duration;

    /// Dismiss window for success notices
    pub const SUCCESS_DISMISS: Duration = Duration::from_secs(4);

    /// Dismiss window for error notices; longer because errors need reading time
    pub const ERROR_DISMISS: Duration = Duration::from_secs(10);
}

// Re-export commonly used constants for convenience
pub use endpoints::{DOCUMENTS_PATH, UPLOAD_PATH};
pub use http::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT as HTTP_TIMEOUT, USER_AGENT};
pub use upload::{ALLOWED_MIME_TYPES, MAX_FILE_SIZE_BYTES};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size_limit_is_fifty_mib() {
        assert_eq!(upload::MAX_FILE_SIZE_BYTES, 50 * 1024 * 1024);
    }

    #[test]
    fn test_allow_list_covers_accepted_families() {
        for mime in ["image/jpeg", "application/pdf", "text/csv", "video/quicktime", "audio/wav"] {
            assert!(upload::ALLOWED_MIME_TYPES.contains(&mime), "missing {mime}");
        }
        assert!(!upload::ALLOWED_MIME_TYPES.contains(&"application/x-msdownload"));
    }

    #[test]
    fn test_simulated_cap_below_completion() {
        assert!(progress::SIMULATED_CAP < 100);
        assert!(progress::MIN_STEP <= progress::MAX_STEP);
    }
}
