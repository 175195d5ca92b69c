//! Material handlers for the Web API.

use axum::{
    body::Body,
    extract::{multipart::MultipartError, Multipart, Path, State},
    http::{header, StatusCode},
    response::Response,
    Json,
};
use std::sync::Arc;

use crate::file::{MaterialService, UploadError, UploadRequest};
use crate::web::dto::{ApiResponse, MaterialResponse};
use crate::web::error::ApiError;
use crate::web::handlers::AppState;
use crate::web::middleware::AuthUser;

/// Generate a safe Content-Disposition header value for downloads.
///
/// Sanitizes the filename to prevent header injection and uses RFC 5987
/// encoding for non-ASCII filenames:
/// - Removes control characters (including CR, LF)
/// - Escapes double quotes and backslashes
/// - Adds a UTF-8 filename* parameter when needed
fn content_disposition_header(filename: &str) -> String {
    let sanitized: String = filename
        .chars()
        .filter(|c| !c.is_control())
        .map(|c| match c {
            '"' => '_',
            '\\' => '_',
            _ => c,
        })
        .collect();

    // ASCII-only filenames use the simple form
    if filename.is_ascii() && !filename.chars().any(|c| c.is_control() || c == '"' || c == '\\') {
        return format!("attachment; filename=\"{}\"", filename);
    }

    let encoded = urlencoding::encode(filename);

    format!(
        "attachment; filename=\"{}\"; filename*=UTF-8''{}",
        sanitized, encoded
    )
}

/// Map a multipart read error to an API error.
///
/// A body that blows past the request body limit fails during the
/// multipart read, before the size rule ever sees the file; such
/// failures get the size rule's message.
fn multipart_read_error(e: MultipartError) -> ApiError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return ApiError::bad_request(UploadError::TooLarge.to_string());
    }
    tracing::error!("Failed to read multipart field: {}", e);
    ApiError::bad_request("Invalid multipart data")
}

/// GET /api/materials - List all materials, newest first.
///
/// Always returns the complete current set; clients replace their view
/// with the response rather than merging.
pub async fn list_materials(
    State(state): State<Arc<AppState>>,
    AuthUser(_claims): AuthUser,
) -> Result<Json<ApiResponse<Vec<MaterialResponse>>>, ApiError> {
    let service = MaterialService::new(&state.db, &state.store);
    let materials = service.list().await.map_err(|e| {
        tracing::error!("Failed to list materials: {}", e);
        ApiError::internal("Failed to list materials")
    })?;

    let responses: Vec<MaterialResponse> =
        materials.into_iter().map(MaterialResponse::from).collect();

    Ok(Json(ApiResponse::new(responses)))
}

/// POST /api/materials - Upload a material.
///
/// Request body: multipart/form-data with "file", "title", and optional
/// "description" fields. Validation failures are 400s whose messages are
/// part of the API contract.
pub async fn upload_material(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
    mut multipart: Multipart,
) -> Result<Json<ApiResponse<MaterialResponse>>, ApiError> {
    let mut title: Option<String> = None;
    let mut description: Option<String> = None;
    let mut file_name: Option<String> = None;
    let mut content_type: Option<String> = None;
    let mut content: Option<Vec<u8>> = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_read_error)? {
        let name = field.name().unwrap_or("").to_string();

        match name.as_str() {
            "file" => {
                file_name = field.file_name().map(|s| s.to_string());
                content_type = field.content_type().map(|s| s.to_string());
                content = Some(field.bytes().await.map_err(multipart_read_error)?.to_vec());
            }
            "title" => {
                title = Some(field.text().await.map_err(|e| {
                    tracing::error!("Failed to read title: {}", e);
                    ApiError::bad_request("Invalid title")
                })?);
            }
            "description" => {
                description = Some(field.text().await.map_err(|e| {
                    tracing::error!("Failed to read description: {}", e);
                    ApiError::bad_request("Invalid description")
                })?);
            }
            _ => {}
        }
    }

    // A missing file or title is the same contract violation as an empty one
    let (file_name, content) = match (file_name, content) {
        (Some(n), Some(c)) => (n, c),
        _ => return Err(ApiError::bad_request("Please select a file and enter a title")),
    };
    let title = title.unwrap_or_default();
    let content_type = content_type
        .unwrap_or_else(|| "application/octet-stream".to_string());

    let mut request = UploadRequest::new(title, file_name, content_type, content);
    if let Some(desc) = description {
        if !desc.trim().is_empty() {
            request = request.with_description(desc);
        }
    }

    let service = MaterialService::new(&state.db, &state.store);
    let material = service.upload(&request, claims.sub).await?;

    Ok(Json(ApiResponse::new(MaterialResponse::from(material))))
}

/// GET /api/materials/:id/download - Download a material's content.
///
/// The Content-Disposition filename is the record's original file name,
/// so the browser saves the file under the name it was uploaded with.
pub async fn download_material(
    State(state): State<Arc<AppState>>,
    AuthUser(_claims): AuthUser,
    Path(material_id): Path<i64>,
) -> Result<Response<Body>, ApiError> {
    let service = MaterialService::new(&state.db, &state.store);
    let result = service.download(material_id).await?;

    let content_type = mime_guess::from_path(&result.material.file_name)
        .first_or_octet_stream()
        .to_string();

    let response = Response::builder()
        .header(header::CONTENT_TYPE, content_type)
        .header(
            header::CONTENT_DISPOSITION,
            content_disposition_header(&result.material.file_name),
        )
        .header(header::CONTENT_LENGTH, result.content.len())
        .body(Body::from(result.content))
        .map_err(|e| {
            tracing::error!("Failed to build response: {}", e);
            ApiError::internal("Failed to build response")
        })?;

    Ok(response)
}

/// DELETE /api/materials/:id - Delete a material.
///
/// Any authenticated user may delete; interactive confirmation is a
/// client concern.
pub async fn delete_material(
    State(state): State<Arc<AppState>>,
    AuthUser(_claims): AuthUser,
    Path(material_id): Path<i64>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let service = MaterialService::new(&state.db, &state.store);
    service.delete(material_id).await?;

    Ok(Json(ApiResponse::new(())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_disposition_header_simple_ascii() {
        let result = content_disposition_header("document.pdf");
        assert_eq!(result, "attachment; filename=\"document.pdf\"");
    }

    #[test]
    fn test_content_disposition_header_with_spaces() {
        let result = content_disposition_header("session 1 drills.pdf");
        assert_eq!(result, "attachment; filename=\"session 1 drills.pdf\"");
    }

    #[test]
    fn test_content_disposition_header_non_ascii() {
        let result = content_disposition_header("exercices d'été.pdf");
        assert!(result.starts_with("attachment; filename=\""));
        assert!(result.contains("filename*=UTF-8''"));
    }

    #[test]
    fn test_content_disposition_header_double_quote() {
        let result = content_disposition_header("test\"file.pdf");
        assert!(result.contains("filename=\"test_file.pdf\""));
        assert!(result.contains("filename*=UTF-8''"));
        assert!(result.contains("%22"));
    }

    #[test]
    fn test_content_disposition_header_injection_attempt() {
        let result = content_disposition_header("test\r\nX-Injected: bad.pdf");
        assert!(!result.contains('\r'));
        assert!(!result.contains('\n'));
        assert!(result.starts_with("attachment; filename="));
    }
}
