//! Upload validation for Materials Hub.
//!
//! These rules run before any storage or database work: an upload that
//! fails validation must leave no trace.

use thiserror::Error;

/// Maximum upload size in bytes (50 MiB).
pub const MAX_FILE_SIZE: u64 = 50 * 1024 * 1024;

/// MIME types accepted for upload.
pub const ALLOWED_TYPES: &[&str] = &[
    "application/pdf",
    "video/mp4",
    "video/avi",
    "video/mov",
    "video/wmv",
    "image/jpeg",
    "image/png",
    "image/gif",
    "application/msword",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    "application/vnd.ms-powerpoint",
    "application/vnd.openxmlformats-officedocument.presentationml.presentation",
];

/// Upload validation errors. Display strings are part of the API contract.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UploadError {
    /// No file content or no title was provided.
    #[error("Please select a file and enter a title")]
    MissingFileOrTitle,

    /// File exceeds the size limit.
    #[error("File size must be less than 50MB")]
    TooLarge,

    /// MIME type is not in the allow-list.
    #[error("File type not supported. Please upload PDF, video, image, or document files.")]
    UnsupportedType,
}

/// Check whether a MIME type is accepted.
pub fn is_allowed_type(content_type: &str) -> bool {
    ALLOWED_TYPES.iter().any(|&t| t == content_type)
}

/// Validate an upload before any storage or record work.
///
/// Checks, in order:
/// - file present and title non-empty after trimming
/// - size within the 50 MiB limit
/// - MIME type in the allow-list
pub fn validate_upload(size: u64, content_type: &str, title: &str) -> Result<(), UploadError> {
    if size == 0 || title.trim().is_empty() {
        return Err(UploadError::MissingFileOrTitle);
    }
    if size > MAX_FILE_SIZE {
        return Err(UploadError::TooLarge);
    }
    if !is_allowed_type(content_type) {
        return Err(UploadError::UnsupportedType);
    }
    Ok(())
}
