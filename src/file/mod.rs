//! Material management module for Materials Hub.
//!
//! Upload validation, object storage, material records, and the
//! workflows that tie them together.

mod metadata;
mod service;
mod storage;
pub mod validation;

pub use metadata::{Material, MaterialRepository, NewMaterial};
pub use service::{DownloadResult, MaterialService, UploadRequest};
pub use storage::{ObjectStore, UPLOADS_PREFIX};
pub use validation::{is_allowed_type, validate_upload, UploadError, ALLOWED_TYPES, MAX_FILE_SIZE};
