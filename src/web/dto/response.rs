//! Response DTOs for the Web API.

use serde::Serialize;

use crate::file::Material;

/// Generic API response wrapper.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    /// Response data.
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Create a new API response.
    pub fn new(data: T) -> Self {
        Self { data }
    }
}

/// User information in responses.
#[derive(Debug, Serialize)]
pub struct UserInfo {
    /// User ID.
    pub id: i64,
    /// Email address.
    pub email: String,
}

/// Session response, returned by register, login, and refresh.
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    /// Access token (JWT).
    pub access_token: String,
    /// Refresh token.
    pub refresh_token: String,
    /// Access token expiry in seconds.
    pub expires_in: u64,
    /// User information.
    pub user: UserInfo,
}

/// Current user response (for /api/auth/me).
#[derive(Debug, Serialize)]
pub struct MeResponse {
    /// User ID.
    pub id: i64,
    /// Email address.
    pub email: String,
    /// Account creation timestamp.
    pub created_at: String,
    /// Last login timestamp.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_login_at: Option<String>,
}

/// Material record in responses.
#[derive(Debug, Serialize)]
pub struct MaterialResponse {
    /// Record ID.
    pub id: i64,
    /// Display title.
    pub title: String,
    /// Free-form description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Original filename.
    pub file_name: String,
    /// Storage path of the object.
    pub file_path: String,
    /// Publicly resolvable URL of the object.
    pub file_url: String,
    /// Declared MIME type.
    pub file_type: String,
    /// File size in bytes.
    pub file_size: i64,
    /// User ID of the uploader.
    pub uploaded_by: i64,
    /// Creation timestamp.
    pub created_at: String,
}

impl From<Material> for MaterialResponse {
    fn from(m: Material) -> Self {
        Self {
            id: m.id,
            title: m.title,
            description: m.description,
            file_name: m.file_name,
            file_path: m.file_path,
            file_url: m.file_url,
            file_type: m.file_type,
            file_size: m.file_size,
            uploaded_by: m.uploaded_by,
            created_at: m.created_at,
        }
    }
}
